use crate::record::{InfractionRecord, Severity};

/// Equality filters of the explorer. `None` (or a blank string) matches
/// every record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExplorerFilters {
    pub severity: Option<String>,
    pub responsible_party: Option<String>,
    pub points: Option<u32>,
}

impl ExplorerFilters {
    pub fn is_empty(&self) -> bool {
        non_blank(self.severity.as_deref()).is_none()
            && non_blank(self.responsible_party.as_deref()).is_none()
            && self.points.is_none()
    }

    pub fn matches(&self, record: &InfractionRecord) -> bool {
        if let Some(wanted) = non_blank(self.severity.as_deref()) {
            if !severity_matches(wanted, &record.severity) {
                return false;
            }
        }
        if let Some(wanted) = non_blank(self.responsible_party.as_deref()) {
            if !text_equals(wanted, &record.responsible_party) {
                return false;
            }
        }
        if let Some(wanted) = self.points {
            if record.points != wanted {
                return false;
            }
        }
        true
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub(in crate::explorer) fn fold(value: &str) -> String {
    value.trim().to_lowercase()
}

fn text_equals(a: &str, b: &str) -> bool {
    fold(a) == fold(b)
}

// "not applicable" selects "nan" records, "very severe" selects "Gravíssima"
fn severity_matches(wanted: &str, raw: &str) -> bool {
    if text_equals(wanted, raw) {
        return true;
    }
    let wanted = Severity::parse(wanted);
    wanted.is_recognized() && wanted == Severity::parse(raw)
}

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use super::filters::fold;
use crate::record::InfractionRecord;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Code,
    Description,
    ResponsibleParty,
    Points,
    FineAmount,
    Severity,
}

impl SortField {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().replace('-', "_").as_str() {
            "code" | "codigo" => Some(Self::Code),
            "description" | "descricao" => Some(Self::Description),
            "responsible" | "responsible_party" | "responsavel" => Some(Self::ResponsibleParty),
            "points" | "pontos" => Some(Self::Points),
            "fine" | "fine_amount" | "valor_multa" => Some(Self::FineAmount),
            "severity" | "gravidade" => Some(Self::Severity),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Description => "description",
            Self::ResponsibleParty => "responsible_party",
            Self::Points => "points",
            Self::FineAmount => "fine_amount",
            Self::Severity => "severity",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Ascending),
            "desc" | "descending" => Some(Self::Descending),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn numeric(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

pub fn compare(a: &InfractionRecord, b: &InfractionRecord, field: SortField) -> Ordering {
    match field {
        SortField::Points => a.points.cmp(&b.points),
        SortField::FineAmount => numeric(a.fine_amount).total_cmp(&numeric(b.fine_amount)),
        SortField::Code => fold(&a.code).cmp(&fold(&b.code)),
        SortField::Description => fold(&a.description).cmp(&fold(&b.description)),
        SortField::ResponsibleParty => fold(&a.responsible_party).cmp(&fold(&b.responsible_party)),
        SortField::Severity => fold(&a.severity).cmp(&fold(&b.severity)),
    }
}

/// Stable sort: records with equal keys keep their relative order in both
/// directions.
pub fn sort_records(records: &mut [InfractionRecord], field: SortField, direction: SortDirection) {
    match direction {
        SortDirection::Ascending => records.sort_by(|a, b| compare(a, b, field)),
        SortDirection::Descending => records.sort_by(|a, b| compare(b, a, field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(code: &str, description: &str, points: u32, fine: f64) -> InfractionRecord {
        InfractionRecord {
            code: code.to_string(),
            description: description.to_string(),
            points,
            fine_amount: fine,
            ..InfractionRecord::default()
        }
    }

    fn codes(records: &[InfractionRecord]) -> Vec<&str> {
        records.iter().map(|r| r.code.as_str()).collect()
    }

    #[test]
    fn parses_field_and_direction_names() {
        assert_eq!(SortField::parse("valor_multa"), Some(SortField::FineAmount));
        assert_eq!(SortField::parse("Fine-Amount"), Some(SortField::FineAmount));
        assert_eq!(SortField::parse("gravidade"), Some(SortField::Severity));
        assert_eq!(SortField::parse("weight"), None);
        assert_eq!(SortDirection::parse("DESC"), Some(SortDirection::Descending));
        assert_eq!(SortDirection::parse("up"), None);
    }

    #[test]
    fn numeric_fields_compare_as_numbers() {
        let mut records = vec![
            rec("a", "", 10, 1000.0),
            rec("b", "", 9, 88.38),
            rec("c", "", 2, 293.47),
        ];
        sort_records(&mut records, SortField::Points, SortDirection::Ascending);
        assert_eq!(codes(&records), vec!["c", "b", "a"]);
        sort_records(&mut records, SortField::FineAmount, SortDirection::Descending);
        assert_eq!(codes(&records), vec!["a", "c", "b"]);
    }

    #[test]
    fn text_fields_ignore_case() {
        let mut records = vec![
            rec("1", "velocidade", 0, 0.0),
            rec("2", "Avançar sinal", 0, 0.0),
            rec("3", "estacionar", 0, 0.0),
        ];
        sort_records(&mut records, SortField::Description, SortDirection::Ascending);
        assert_eq!(codes(&records), vec!["2", "3", "1"]);
    }

    #[test]
    fn equal_keys_keep_original_order_in_both_directions() {
        let mut records = vec![
            rec("x", "", 5, 0.0),
            rec("y", "", 7, 0.0),
            rec("z", "", 5, 0.0),
        ];
        sort_records(&mut records, SortField::Points, SortDirection::Ascending);
        assert_eq!(codes(&records), vec!["x", "z", "y"]);

        let mut records = vec![
            rec("x", "", 5, 0.0),
            rec("y", "", 7, 0.0),
            rec("z", "", 5, 0.0),
        ];
        sort_records(&mut records, SortField::Points, SortDirection::Descending);
        assert_eq!(codes(&records), vec!["y", "x", "z"]);
    }

    #[test]
    fn non_finite_fines_sort_as_zero() {
        let mut records = vec![rec("a", "", 0, 10.0), rec("b", "", 0, f64::NAN)];
        sort_records(&mut records, SortField::FineAmount, SortDirection::Ascending);
        assert_eq!(codes(&records), vec!["b", "a"]);
    }
}

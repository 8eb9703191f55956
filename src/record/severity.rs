use std::fmt;

/// Canonical severity of an infraction.
///
/// The backend sends free text (usually the Portuguese labels, sometimes with
/// suffixes such as `gravissima10x`) and uses the literal `"nan"` for
/// infractions without a severity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Light,
    Medium,
    Severe,
    VerySevere,
    NotApplicable,
    Unrecognized(String),
}

impl Severity {
    pub fn parse(raw: &str) -> Self {
        let folded = raw.trim().to_lowercase();
        if folded.is_empty() {
            return Self::Unrecognized(String::new());
        }
        if folded == "nan"
            || folded == "n/a"
            || folded.contains("not applicable")
            || folded.contains("não aplicável")
            || folded.contains("nao aplicavel")
        {
            return Self::NotApplicable;
        }
        // "very severe" and "gravíssima" first, they contain the shorter labels
        if folded.contains("gravissima")
            || folded.contains("gravíssima")
            || folded.contains("very severe")
        {
            return Self::VerySevere;
        }
        if folded.contains("grave") || folded.contains("severe") {
            return Self::Severe;
        }
        if folded.contains("media") || folded.contains("média") || folded.contains("medium") {
            return Self::Medium;
        }
        if folded.contains("leve") || folded.contains("light") {
            return Self::Light;
        }
        Self::Unrecognized(raw.trim().to_string())
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Light => "light",
            Self::Medium => "medium",
            Self::Severe => "severe",
            Self::VerySevere => "very severe",
            Self::NotApplicable => "not applicable",
            Self::Unrecognized(raw) => raw.as_str(),
        }
    }

    /// Style class used for badges; unknown values fall back to `media`.
    pub fn badge_class(&self) -> &'static str {
        match self {
            Self::Light => "leve",
            Self::Medium | Self::Unrecognized(_) => "media",
            Self::Severe => "grave",
            Self::VerySevere => "gravissima",
            Self::NotApplicable => "nan",
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

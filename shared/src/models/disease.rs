//! Static disease information records

use serde::Serialize;

/// Severity of a disease as shown to growers
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    None,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::None => write!(f, "None"),
            Severity::Medium => write!(f, "Medium"),
            Severity::High => write!(f, "High"),
            Severity::Critical => write!(f, "Critical"),
        }
    }
}

/// Symptoms and treatment for one (crop, disease) pair.
///
/// Records are baked into the binary and never change at runtime.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct DiseaseInfo {
    pub symptoms: &'static [&'static str],
    pub recommendations: &'static [&'static str],
    pub severity: Severity,
    pub affected_area: &'static str,
}

impl DiseaseInfo {
    pub fn is_healthy(&self) -> bool {
        self.severity == Severity::None
    }
}

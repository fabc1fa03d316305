use std::fmt;

use serde::{Deserialize, Serialize};

/// Estado de un Step.
///
/// `Info` es transitorio: un paso puede arrancar en `Info` mientras acumula
/// detalles y el runner lo finaliza a `Success` o `Failed` al terminar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepStatus {
    Success,
    Failed,
    Skipped,
    Info,
}

impl StepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Success => "SUCCESS",
            StepStatus::Failed => "FAILED",
            StepStatus::Skipped => "SKIPPED",
            StepStatus::Info => "INFO",
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_upper_case() {
        assert_eq!(serde_json::to_string(&StepStatus::Skipped).unwrap(), "\"SKIPPED\"");
        let back: StepStatus = serde_json::from_str("\"INFO\"").unwrap();
        assert_eq!(back, StepStatus::Info);
    }
}

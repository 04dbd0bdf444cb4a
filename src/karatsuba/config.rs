use serde::{Deserialize, Serialize};

use crate::bigint::is_decimal;
use crate::ReplayError;

/// Longest accepted operand
pub const MAX_OPERAND_DIGITS: usize = 64;

/// Operands and base-case threshold
///
/// JSON shape: `{"num1": "123", "num2": "456", "threshold": 2}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KaratsubaConfig {
    /// Left operand, non-negative decimal
    pub num1: String,
    /// Right operand, non-negative decimal
    pub num2: String,
    /// Operands this short (or shorter) are multiplied directly
    pub threshold: usize,
}

impl KaratsubaConfig {
    /// Build a config without validating it
    pub fn new(num1: impl Into<String>, num2: impl Into<String>, threshold: usize) -> Self {
        Self {
            num1: num1.into(),
            num2: num2.into(),
            threshold,
        }
    }

    /// Reject non-numeric or oversized operands and a zero threshold
    pub fn validate(&self) -> Result<(), ReplayError> {
        for operand in [&self.num1, &self.num2] {
            if !is_decimal(operand) {
                return Err(ReplayError::InvalidOperand(operand.clone()));
            }
            if operand.len() > MAX_OPERAND_DIGITS {
                return Err(ReplayError::OperandTooLong {
                    digits: operand.len(),
                    max: MAX_OPERAND_DIGITS,
                });
            }
        }
        if self.threshold == 0 {
            return Err(ReplayError::InvalidThreshold(self.threshold));
        }
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json(text: &str) -> Result<Self, ReplayError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| ReplayError::ImportFailed(e.to_string()))?;
        config
            .validate()
            .map_err(|e| ReplayError::ImportFailed(e.to_string()))?;
        Ok(config)
    }

    /// Serialize to the import shape
    pub fn to_json(&self) -> Result<String, ReplayError> {
        serde_json::to_string_pretty(self).map_err(|e| ReplayError::InvalidConfig(e.to_string()))
    }
}

/// Preset problems: small, medium and the 19-digit pair
pub fn standard_test_cases() -> Vec<KaratsubaConfig> {
    vec![
        KaratsubaConfig::new("123", "456", 2),
        KaratsubaConfig::new("123456789", "987654321", 4),
        KaratsubaConfig::new("9876543210987654321", "1234567890123456789", 6),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_bad_operands() {
        assert!(matches!(
            KaratsubaConfig::new("12a", "4", 1).validate(),
            Err(ReplayError::InvalidOperand(s)) if s == "12a"
        ));
        assert!(KaratsubaConfig::new("", "4", 1).validate().is_err());
        assert!(KaratsubaConfig::new("-3", "4", 1).validate().is_err());
        assert!(matches!(
            KaratsubaConfig::new("1", "4", 0).validate(),
            Err(ReplayError::InvalidThreshold(0))
        ));
        let long = "9".repeat(MAX_OPERAND_DIGITS + 1);
        assert!(matches!(
            KaratsubaConfig::new(long, "4", 1).validate(),
            Err(ReplayError::OperandTooLong { .. })
        ));
    }

    #[test]
    fn test_json_shape() {
        let config = KaratsubaConfig::from_json(r#"{"num1":"123","num2":"456","threshold":2}"#)
            .unwrap();
        assert_eq!(config, KaratsubaConfig::new("123", "456", 2));

        let text = config.to_json().unwrap();
        assert_eq!(KaratsubaConfig::from_json(&text).unwrap(), config);
    }

    #[test]
    fn test_json_rejects_missing_fields() {
        assert!(matches!(
            KaratsubaConfig::from_json(r#"{"num1":"123","threshold":2}"#),
            Err(ReplayError::ImportFailed(_))
        ));
        assert!(matches!(
            KaratsubaConfig::from_json(r#"{"num1":123,"num2":"4","threshold":2}"#),
            Err(ReplayError::ImportFailed(_))
        ));
    }

    #[test]
    fn test_standard_cases_are_valid() {
        for case in standard_test_cases() {
            assert!(case.validate().is_ok(), "{:?}", case);
        }
    }
}

//! The stable reading handed back to callers.

use crate::error::WeightError;

/// Unit label attached to every reading; the scale reports kilograms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Unit {
    #[default]
    Kg,
}

impl Unit {
    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Kg => "KG",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StableWeight {
    pub value: f64,
    pub unit: Unit,
}

impl StableWeight {
    pub fn kg(value: f64) -> Self {
        Self {
            value,
            unit: Unit::Kg,
        }
    }

    /// Parse a confirmed token as a decimal number.
    ///
    /// Anything `f64::from_str` rejects, or a non-finite result, is a
    /// `MalformedToken`; nothing is coerced to zero.
    pub fn parse(token: &str) -> Result<Self, WeightError> {
        match token.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Self::kg(v)),
            _ => Err(WeightError::MalformedToken {
                token: token.to_string(),
            }),
        }
    }
}

/// Renders the value with at least one fractional digit: `50.0 KG`, `12.34 KG`.
impl std::fmt::Display for StableWeight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} {}", self.value, self.unit)
    }
}

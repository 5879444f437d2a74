//! Day-over-day volatility classification

use serde::{Serialize, Serializer};
use std::fmt::Display;

const STABLE_BELOW: f64 = 0.5;
const MODERATE_BELOW: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VolatilityLevel {
    Stable,
    Moderate,
    Volatile,
    Unavailable,
}

impl VolatilityLevel {
    /// Display color tag for the level.
    pub fn color(&self) -> &'static str {
        match self {
            VolatilityLevel::Stable => "green",
            VolatilityLevel::Moderate => "orange",
            VolatilityLevel::Volatile => "red",
            VolatilityLevel::Unavailable => "gray",
        }
    }
}

impl Display for VolatilityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                VolatilityLevel::Stable => "Stable",
                VolatilityLevel::Moderate => "Moderate",
                VolatilityLevel::Volatile => "Volatile",
                VolatilityLevel::Unavailable => "Unavailable",
            }
        )
    }
}

impl Serialize for VolatilityLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Volatility {
    pub level: VolatilityLevel,
    /// Signed percentage change, rounded to two decimals. `None` when there
    /// was no usable past rate.
    pub change: Option<f64>,
    pub color: &'static str,
}

impl Volatility {
    fn new(level: VolatilityLevel, change: Option<f64>) -> Self {
        Self {
            level,
            change,
            color: level.color(),
        }
    }

    pub fn unavailable() -> Self {
        Self::new(VolatilityLevel::Unavailable, None)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compares today's rate against yesterday's. A zero, negative or missing
/// past rate cannot anchor a percentage and yields `Unavailable`.
pub fn classify(current: f64, past: Option<f64>) -> Volatility {
    let past = match past {
        Some(p) if p.is_finite() && p > 0.0 => p,
        _ => return Volatility::unavailable(),
    };

    let change = round2(((current - past) / past) * 100.0);
    let level = if change.abs() < STABLE_BELOW {
        VolatilityLevel::Stable
    } else if change.abs() < MODERATE_BELOW {
        VolatilityLevel::Moderate
    } else {
        VolatilityLevel::Volatile
    };

    Volatility::new(level, Some(change))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_thresholds() {
        let stable = classify(100.4, Some(100.0));
        assert_eq!(stable.change, Some(0.4));
        assert_eq!(stable.level, VolatilityLevel::Stable);
        assert_eq!(stable.color, "green");

        let moderate = classify(101.0, Some(100.0));
        assert_eq!(moderate.change, Some(1.0));
        assert_eq!(moderate.level, VolatilityLevel::Moderate);
        assert_eq!(moderate.color, "orange");

        let volatile = classify(102.0, Some(100.0));
        assert_eq!(volatile.change, Some(2.0));
        assert_eq!(volatile.level, VolatilityLevel::Volatile);
        assert_eq!(volatile.color, "red");
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(100.5, Some(100.0)).level, VolatilityLevel::Moderate);
        assert_eq!(classify(101.5, Some(100.0)).level, VolatilityLevel::Volatile);
        assert_eq!(classify(100.0, Some(100.0)).level, VolatilityLevel::Stable);
    }

    #[test]
    fn test_classify_negative_change() {
        let result = classify(98.0, Some(100.0));
        assert_eq!(result.change, Some(-2.0));
        assert_eq!(result.level, VolatilityLevel::Volatile);

        let result = classify(99.3, Some(100.0));
        assert_eq!(result.change, Some(-0.7));
        assert_eq!(result.level, VolatilityLevel::Moderate);
    }

    #[test]
    fn test_classify_without_usable_past_rate() {
        for past in [None, Some(0.0), Some(-1.0), Some(f64::NAN)] {
            let result = classify(4.2, past);
            assert_eq!(result.level, VolatilityLevel::Unavailable);
            assert_eq!(result.color, "gray");
            assert!(result.change.is_none());
        }
    }

    #[test]
    fn test_change_is_rounded_to_two_decimals() {
        let result = classify(4.2137, Some(4.2));
        assert_eq!(result.change, Some(0.33));
    }

    #[test]
    fn test_volatility_serializes_as_response_contract() {
        let json = serde_json::to_value(classify(101.0, Some(100.0))).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"level": "Moderate", "change": 1.0, "color": "orange"})
        );

        let json = serde_json::to_value(Volatility::unavailable()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"level": "Unavailable", "change": null, "color": "gray"})
        );
    }
}

//! Threshold rules that turn a reading into an alert verdict.
//!
//! Evaluation is pure: it takes the sensor classification and the reading value
//! and performs no I/O. Looking up the sensor type and persisting a triggered
//! alert are the caller's job (see `service.rs`).
//!
//! Classification is keyword based over the lowercased sensor type. The rule
//! table is ordered and the first entry with a matching keyword is the only one
//! evaluated, so a type like `"soil_temperature"` is treated as moisture.

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

// ---

/// Alert severity, fixed per rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    // ---
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A triggered rule: what to store in the `alerts` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    // ---
    pub message: String,
    pub severity: Severity,
}

/// One row of the rule table.
pub struct Rule {
    // ---
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    check: fn(Decimal) -> Option<Verdict>,
}

impl Rule {
    // ---
    fn matches(&self, sensor_type: &str) -> bool {
        self.keywords.iter().any(|k| sensor_type.contains(k))
    }

    /// Apply this rule's thresholds. Comparisons are strict, so the boundary
    /// values themselves never trigger.
    pub fn evaluate(&self, value: Decimal) -> Option<Verdict> {
        (self.check)(value)
    }
}

/// Rule table in precedence order.
pub static RULES: &[Rule] = &[
    Rule {
        name: "moisture",
        keywords: &["moisture", "soil"],
        check: moisture,
    },
    Rule {
        name: "temperature",
        keywords: &["temperature", "temp"],
        check: temperature,
    },
    Rule {
        name: "humidity",
        keywords: &["humidity"],
        check: humidity,
    },
];

/// Find the rule that governs a sensor type, if any.
pub fn classify(sensor_type: &str) -> Option<&'static Rule> {
    // ---
    let sensor_type = sensor_type.to_lowercase();
    RULES.iter().find(|rule| rule.matches(&sensor_type))
}

fn moisture(value: Decimal) -> Option<Verdict> {
    // ---
    (value < Decimal::from(20)).then(|| Verdict {
        message: format!("Low soil moisture detected: {value}%"),
        severity: Severity::High,
    })
}

fn temperature(value: Decimal) -> Option<Verdict> {
    // ---
    if value > Decimal::from(35) {
        Some(Verdict {
            message: format!("High temperature detected: {value}°C"),
            severity: Severity::Medium,
        })
    } else if value < Decimal::ZERO {
        Some(Verdict {
            message: format!("Freezing temperature detected: {value}°C"),
            severity: Severity::High,
        })
    } else {
        None
    }
}

fn humidity(value: Decimal) -> Option<Verdict> {
    // ---
    (value < Decimal::from(30)).then(|| Verdict {
        message: format!("Low humidity detected: {value}%"),
        severity: Severity::Low,
    })
}

//! Routing of specification labels to measurement families.

use crate::comparison::models::NormalizedSpec;
use crate::comparison::normalize;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A measurement category with its own unit rules and direction preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpecFamily {
    Size,
    Weight,
    Power,
    Capacity,
    Resolution,
    RefreshRate,
    Speed,
}

/// Label keywords per family, in priority order.
///
/// A label matching several families ("画面サイズ (Hz)") goes to the first one
/// listed. Keywords are matched as substrings of the lower-cased label.
const ROUTING: &[(SpecFamily, &[&str])] = &[
    (SpecFamily::Size, &["サイズ", "寸法", "size", "dimensions"]),
    (SpecFamily::Weight, &["重量", "重さ", "weight"]),
    (SpecFamily::Power, &["消費電力", "電力", "power consumption"]),
    (SpecFamily::Capacity, &["容量", "ストレージ", "storage", "capacity"]),
    (SpecFamily::Resolution, &["解像度", "resolution"]),
    (SpecFamily::RefreshRate, &["リフレッシュレート", "refresh rate", "hz"]),
    (SpecFamily::Speed, &["転送速度", "速度", "speed", "転送レート"]),
];

impl SpecFamily {
    /// Classifies a specification label, or `None` when no keyword matches.
    pub fn classify(label: &str) -> Option<Self> {
        let label = label.to_lowercase();
        ROUTING
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| label.contains(*k)))
            .map(|(family, _)| *family)
    }

    /// Whether a larger normalized value is the better one.
    pub fn higher_is_better(&self) -> bool {
        match self {
            SpecFamily::Size | SpecFamily::Weight | SpecFamily::Power => false,
            SpecFamily::Capacity
            | SpecFamily::Resolution
            | SpecFamily::RefreshRate
            | SpecFamily::Speed => true,
        }
    }

    /// Parses a raw value with this family's unit rules.
    pub fn normalize(&self, value: &str) -> NormalizedSpec {
        match self {
            SpecFamily::Size => normalize::normalize_size(value),
            SpecFamily::Weight => normalize::normalize_weight(value),
            SpecFamily::Power => normalize::normalize_power(value),
            SpecFamily::Capacity => normalize::normalize_capacity(value),
            SpecFamily::Resolution => normalize::normalize_resolution(value),
            SpecFamily::RefreshRate => normalize::normalize_refresh_rate(value),
            SpecFamily::Speed => normalize::normalize_speed(value),
        }
    }

    /// Returns all families in routing order.
    pub fn all() -> &'static [SpecFamily] {
        &[
            SpecFamily::Size,
            SpecFamily::Weight,
            SpecFamily::Power,
            SpecFamily::Capacity,
            SpecFamily::Resolution,
            SpecFamily::RefreshRate,
            SpecFamily::Speed,
        ]
    }
}

impl fmt::Display for SpecFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SpecFamily::Size => "size",
            SpecFamily::Weight => "weight",
            SpecFamily::Power => "power",
            SpecFamily::Capacity => "capacity",
            SpecFamily::Resolution => "resolution",
            SpecFamily::RefreshRate => "refresh-rate",
            SpecFamily::Speed => "speed",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for SpecFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "size" | "dimensions" => Ok(SpecFamily::Size),
            "weight" => Ok(SpecFamily::Weight),
            "power" => Ok(SpecFamily::Power),
            "capacity" | "storage" => Ok(SpecFamily::Capacity),
            "resolution" => Ok(SpecFamily::Resolution),
            "refresh-rate" | "refresh" | "hz" => Ok(SpecFamily::RefreshRate),
            "speed" | "transfer-speed" => Ok(SpecFamily::Speed),
            _ => Err(format!(
                "Unknown family: {}. Use: size, weight, power, capacity, resolution, refresh-rate, speed",
                s
            )),
        }
    }
}

// src/domain/kinds.rs
use serde::{Deserialize, Serialize};

/// Category of a loss line-item. Only merchandise items feed the
/// merchandise loss total; material items are tracked but not summed there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LossCategory {
    Merchandise,
    Material,
}

impl LossCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            LossCategory::Merchandise => "merchandise",
            LossCategory::Material => "material",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LossCategory::Merchandise => "Merchandise",
            LossCategory::Material => "Material",
        }
    }

    pub fn from_str(raw: &str) -> Option<Self> {
        match raw.trim() {
            "merchandise" => Some(LossCategory::Merchandise),
            "material" => Some(LossCategory::Material),
            _ => None,
        }
    }
}

/// Suspect status as the API codes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuspectStatus {
    AtLarge,
    Identified,
    Detained,
    Convicted,
}

impl SuspectStatus {
    pub const ALL: [SuspectStatus; 4] = [
        SuspectStatus::AtLarge,
        SuspectStatus::Identified,
        SuspectStatus::Detained,
        SuspectStatus::Convicted,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SuspectStatus::AtLarge => "at_large",
            SuspectStatus::Identified => "identified",
            SuspectStatus::Detained => "detained",
            SuspectStatus::Convicted => "convicted",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SuspectStatus::AtLarge => "At large",
            SuspectStatus::Identified => "Identified",
            SuspectStatus::Detained => "Detained",
            SuspectStatus::Convicted => "Convicted",
        }
    }

    /// CSS class for the status badge in tables and the edit form.
    pub fn badge_class(self) -> &'static str {
        match self {
            SuspectStatus::AtLarge => "badge badge-red",
            SuspectStatus::Identified => "badge badge-yellow",
            SuspectStatus::Detained => "badge badge-blue",
            SuspectStatus::Convicted => "badge badge-gray",
        }
    }

    pub fn from_str(raw: &str) -> Option<Self> {
        match raw.trim() {
            "at_large" => Some(SuspectStatus::AtLarge),
            "identified" => Some(SuspectStatus::Identified),
            "detained" => Some(SuspectStatus::Detained),
            "convicted" => Some(SuspectStatus::Convicted),
            _ => None,
        }
    }
}

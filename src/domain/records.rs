// src/domain/records.rs

use crate::domain::kinds::{LossCategory, SuspectStatus};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Office {
    pub id: i64,
    pub name: String,
}

impl Office {
    /// Stand-in for an office the API no longer returns (404 or missing
    /// expansion). List and detail pages render it instead of failing.
    pub fn placeholder(id: i64) -> Self {
        Self {
            id,
            name: "Unknown office".to_string(),
        }
    }
}

/// An incident as persisted remotely, normalized from the wire shape.
/// Money fields are whole currency units; the cash sub-breakdown
/// (fund vs. collection) lives in `tags`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentRecord {
    pub id: i64,
    pub office: Office,
    pub incident_type: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub description: String,
    pub notes: String,
    pub cash_loss: i64,
    pub merchandise_loss: i64,
    pub other_losses: i64,
    pub total_loss: i64,
    pub tags: BTreeMap<String, String>,
    pub suspects: Vec<i64>,
    pub attachments: Vec<String>,
    pub images: Vec<ImageMeta>,
}

pub const TAG_CASH_FUND: &str = "CashFund";
pub const TAG_CASH_COLLECTION: &str = "CashCollection";

impl IncidentRecord {
    pub fn cash_fund(&self) -> i64 {
        self.tags
            .get(TAG_CASH_FUND)
            .map(|raw| crate::domain::money::parse_money(raw))
            .unwrap_or(0)
    }

    pub fn cash_collection(&self) -> i64 {
        self.tags
            .get(TAG_CASH_COLLECTION)
            .map(|raw| crate::domain::money::parse_money(raw))
            .unwrap_or(0)
    }

    /// Identifiers of the images persisted on this incident.
    pub fn image_ids(&self) -> Vec<i64> {
        self.images.iter().map(|img| img.id).collect()
    }
}

/// One priced entry of lost merchandise or material. The same shape is
/// used for persisted items (id set) and form rows (id absent until the
/// item is created remotely). The line total is always derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LossItem {
    pub id: Option<i64>,
    pub category: LossCategory,
    pub description: String,
    pub quantity: i64,
    pub unit_price: i64,
}

impl LossItem {
    pub fn line_total(&self) -> i64 {
        self.quantity * self.unit_price
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suspect {
    pub id: i64,
    pub alias: String,
    pub status: SuspectStatus,
    pub physical_description: String,
    pub photo_url: Option<String>,
}

impl Suspect {
    /// Stand-in for a suspect reference that 404s.
    pub fn placeholder(id: i64) -> Self {
        Self {
            id,
            alias: "(unknown suspect)".to_string(),
            status: SuspectStatus::AtLarge,
            physical_description: String::new(),
            photo_url: None,
        }
    }
}

/// Creation payload for a suspect, photo already resolved to a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSuspect {
    pub alias: String,
    pub status: SuspectStatus,
    pub physical_description: String,
    pub photo_url: Option<String>,
}

/// Persisted metadata describing an uploaded incident photo, distinct
/// from the raw file bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMeta {
    pub id: i64,
    pub name: String,
    pub content_type: String,
    pub url: String,
}

/// Creation payload for an image-metadata record. The file bytes travel
/// separately as a multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImageMetadata {
    pub filename: String,
    pub user_id: i64,
    pub description: String,
}

/// Full-replace update payload for an incident. Child collections are
/// already resolved to flat id lists by the submit workflow.
#[derive(Debug, Clone)]
pub struct IncidentUpdate {
    pub office: i64,
    pub incident_type: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub description: String,
    pub notes: String,
    pub cash_loss: i64,
    pub merchandise_loss: i64,
    pub other_losses: i64,
    pub total_loss: i64,
    pub tags: BTreeMap<String, String>,
    pub suspects: Vec<i64>,
    pub attachments: Vec<String>,
    pub images: Vec<i64>,
}

/// The operator behind the stored API token, as the remote API reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteUser {
    pub id: i64,
    pub name: String,
}

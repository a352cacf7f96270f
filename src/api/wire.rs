// api/wire.rs
//
// Wire shapes for the remote incident API (PascalCase fields, money as
// decimal strings) plus the mapping into the internal model. Wire types
// stay inside the api module; nothing downstream sees them.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::kinds::{LossCategory, SuspectStatus};
use crate::domain::money::{money_string, parse_money};
use crate::domain::records::{
    ImageMeta, IncidentRecord, IncidentUpdate, LossItem, Office, RemoteUser, Suspect,
};

/// Envelope every list endpoint wraps its results in.
#[derive(Debug, Deserialize)]
pub struct Paginated<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OfficeWire {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

impl OfficeWire {
    pub fn into_office(self) -> Office {
        Office {
            id: self.id,
            name: self.name,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageMetadataWire {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub url: String,
}

impl ImageMetadataWire {
    pub fn into_meta(self) -> ImageMeta {
        ImageMeta {
            id: self.id,
            name: self.name,
            content_type: self.content_type,
            url: self.url,
        }
    }
}

/// Incident as GET returns it: office expanded, images expanded to
/// metadata records, suspects as a flat id list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IncidentWire {
    pub id: i64,
    pub office: Option<OfficeWire>,
    #[serde(default)]
    pub incident_type: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub cash_loss: String,
    #[serde(default)]
    pub merchandise_loss: String,
    #[serde(default)]
    pub other_losses: String,
    #[serde(default)]
    pub total_loss: String,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(default)]
    pub suspects: Vec<i64>,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default)]
    pub images: Vec<ImageMetadataWire>,
}

impl IncidentWire {
    pub fn into_record(self) -> IncidentRecord {
        let id = self.id;
        IncidentRecord {
            id,
            office: self
                .office
                .map(OfficeWire::into_office)
                .unwrap_or_else(|| Office::placeholder(0)),
            incident_type: self.incident_type,
            date: self.date,
            time: self.time,
            description: self.description,
            notes: self.notes,
            cash_loss: parse_money(&self.cash_loss),
            merchandise_loss: parse_money(&self.merchandise_loss),
            other_losses: parse_money(&self.other_losses),
            total_loss: parse_money(&self.total_loss),
            tags: self.tags,
            suspects: self.suspects,
            attachments: self.attachments,
            images: self
                .images
                .into_iter()
                .map(ImageMetadataWire::into_meta)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct IncidentUpdateWire {
    pub office: i64,
    pub incident_type: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub description: String,
    pub notes: String,
    pub cash_loss: String,
    pub merchandise_loss: String,
    pub other_losses: String,
    pub total_loss: String,
    pub tags: BTreeMap<String, String>,
    pub suspects: Vec<i64>,
    pub attachments: Vec<String>,
    pub images: Vec<i64>,
}

impl IncidentUpdateWire {
    pub fn from_update(update: &IncidentUpdate) -> Self {
        Self {
            office: update.office,
            incident_type: update.incident_type,
            date: update.date,
            time: update.time,
            description: update.description.clone(),
            notes: update.notes.clone(),
            cash_loss: money_string(update.cash_loss),
            merchandise_loss: money_string(update.merchandise_loss),
            other_losses: money_string(update.other_losses),
            total_loss: money_string(update.total_loss),
            tags: update.tags.clone(),
            suspects: update.suspects.clone(),
            attachments: update.attachments.clone(),
            images: update.images.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LossItemWire {
    pub id: i64,
    #[serde(rename = "Type", default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub price: String,
    // Total is derived on our side; the wire value is ignored.
}

impl LossItemWire {
    pub fn into_item(self) -> LossItem {
        LossItem {
            id: Some(self.id),
            category: LossCategory::from_str(&self.category).unwrap_or(LossCategory::Merchandise),
            description: self.description,
            quantity: self.quantity.max(0),
            unit_price: parse_money(&self.price),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewLossItemWire {
    pub incident: i64,
    #[serde(rename = "Type")]
    pub category: &'static str,
    pub description: String,
    pub quantity: i64,
    pub price: String,
    pub total: String,
}

impl NewLossItemWire {
    pub fn from_item(incident: i64, item: &LossItem) -> Self {
        Self {
            incident,
            category: item.category.as_str(),
            description: item.description.clone(),
            quantity: item.quantity,
            price: money_string(item.unit_price),
            total: money_string(item.line_total()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LossItemPatchWire {
    #[serde(rename = "Type")]
    pub category: &'static str,
    pub description: String,
    pub quantity: i64,
    pub price: String,
    pub total: String,
}

impl LossItemPatchWire {
    pub fn from_item(item: &LossItem) -> Self {
        Self {
            category: item.category.as_str(),
            description: item.description.clone(),
            quantity: item.quantity,
            price: money_string(item.unit_price),
            total: money_string(item.line_total()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SuspectWire {
    pub id: i64,
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub physical_description: String,
    #[serde(default)]
    pub photo_url: Option<String>,
}

impl SuspectWire {
    pub fn into_suspect(self) -> Suspect {
        Suspect {
            id: self.id,
            alias: self.alias,
            status: SuspectStatus::from_str(&self.status).unwrap_or(SuspectStatus::AtLarge),
            physical_description: self.physical_description,
            photo_url: self.photo_url,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewSuspectWire {
    pub alias: String,
    pub status: &'static str,
    pub physical_description: String,
    pub photo_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChangeRecordWire {
    pub entity_type: String,
    pub entity_id: i64,
    pub field_name: String,
    pub old_value: String,
    pub new_value: String,
    pub user_id: i64,
    pub description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoteUserWire {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

impl RemoteUserWire {
    pub fn into_user(self) -> RemoteUser {
        RemoteUser {
            id: self.id,
            name: self.name,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UploadWire {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incident_wire_normalizes_money_and_missing_office() {
        let raw = r#"{
            "Id": 12,
            "IncidentType": 2,
            "Date": "2025-11-04",
            "Time": "14:30:00",
            "Description": "Till robbed",
            "CashLoss": "150000.00",
            "TotalLoss": "195000",
            "Suspects": [42],
            "Images": [{ "Id": 7, "Name": "scene.jpg", "ContentType": "image/jpeg", "Url": "https://cdn/x.jpg" }]
        }"#;

        let record = serde_json::from_str::<IncidentWire>(raw)
            .unwrap()
            .into_record();

        assert_eq!(record.id, 12);
        assert_eq!(record.office.name, "Unknown office");
        assert_eq!(record.cash_loss, 150000);
        assert_eq!(record.total_loss, 195000);
        assert_eq!(record.image_ids(), vec![7]);
    }

    #[test]
    fn loss_item_wire_defaults_bad_category() {
        let raw = r#"{ "Id": 5, "Type": "unknown_thing", "Quantity": 3, "Price": "100" }"#;
        let item = serde_json::from_str::<LossItemWire>(raw).unwrap().into_item();

        assert_eq!(item.id, Some(5));
        assert_eq!(item.category, LossCategory::Merchandise);
        assert_eq!(item.line_total(), 300);
    }

    #[test]
    fn update_wire_serializes_money_as_strings() {
        let update = IncidentUpdate {
            office: 3,
            incident_type: 2,
            date: NaiveDate::from_ymd_opt(2025, 11, 4).unwrap(),
            time: NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
            description: "d".to_string(),
            notes: String::new(),
            cash_loss: 150000,
            merchandise_loss: 20000,
            other_losses: 25000,
            total_loss: 195000,
            tags: BTreeMap::new(),
            suspects: vec![42],
            attachments: vec![],
            images: vec![7],
        };

        let json = serde_json::to_value(IncidentUpdateWire::from_update(&update)).unwrap();
        assert_eq!(json["CashLoss"], "150000");
        assert_eq!(json["TotalLoss"], "195000");
        assert_eq!(json["Suspects"], serde_json::json!([42]));
        assert_eq!(json["Date"], "2025-11-04");
    }

    #[test]
    fn paginated_envelope_decodes() {
        let raw = r#"{ "count": 2, "next": null, "previous": null, "results": [{ "Id": 1 }, { "Id": 2, "Name": "Centro" }] }"#;
        let page: Paginated<OfficeWire> = serde_json::from_str(raw).unwrap();

        assert_eq!(page.count, 2);
        assert!(page.next.is_none());
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[1].name, "Centro");
    }
}

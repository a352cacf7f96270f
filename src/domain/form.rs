// src/domain/form.rs
//
// The in-progress incident as one normalized structure. Wire shapes and
// urlencoded form fields are both mapped into this model at the boundary;
// everything downstream (totals, reconciliation, the submit workflow)
// works on this shape only.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::kinds::{LossCategory, SuspectStatus};
use crate::domain::money::{self, parse_money};
use crate::domain::records::{
    IncidentRecord, IncidentUpdate, LossItem, Suspect, TAG_CASH_COLLECTION, TAG_CASH_FUND,
};
use crate::errors::FieldError;

/// Where a suspect photo comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhotoSource {
    /// Already hosted somewhere the API accepts as-is.
    Hosted { url: String },
    /// Needs to be fetched and uploaded before the suspect is created.
    Pending {
        url: String,
        filename: String,
        content_type: String,
    },
}

/// A person linked to the incident: either a pointer to an existing
/// suspect record, or a request to create one at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuspectRef {
    Existing {
        id: i64,
        alias: String,
    },
    New {
        alias: String,
        status: SuspectStatus,
        description: String,
        photo: Option<PhotoSource>,
    },
}

impl SuspectRef {
    pub fn existing_id(&self) -> Option<i64> {
        match self {
            SuspectRef::Existing { id, .. } => Some(*id),
            SuspectRef::New { .. } => None,
        }
    }

    pub fn alias(&self) -> &str {
        match self {
            SuspectRef::Existing { alias, .. } => alias,
            SuspectRef::New { alias, .. } => alias,
        }
    }
}

/// An image attached to the incident. With an id that the persisted set
/// already contains, it is reused as-is; otherwise the bytes at `url`
/// are uploaded as new metadata during submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub id: Option<i64>,
    pub name: String,
    pub content_type: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentForm {
    pub office_id: i64,
    pub incident_type: i64,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub description: String,
    pub notes: String,

    pub cash_fund: i64,
    pub cash_collection: i64,
    pub other_losses: i64,

    pub loss_items: Vec<LossItem>,
    pub suspects: Vec<SuspectRef>,
    pub attachments: Vec<String>,
    pub images: Vec<ImageRef>,

    // Derived; recomputed on every line-item mutation, never edited.
    pub cash_loss: i64,
    pub merchandise_loss: i64,
    pub total_loss: i64,
}

impl IncidentForm {
    /// Populate the form from the persisted incident, its loss items, and
    /// the suspects its id list resolved to (placeholders included).
    pub fn from_record(
        record: &IncidentRecord,
        loss_items: &[LossItem],
        suspects: &[Suspect],
    ) -> Self {
        let suspect_refs = suspects
            .iter()
            .map(|s| SuspectRef::Existing {
                id: s.id,
                alias: s.alias.clone(),
            })
            .collect();

        let images = record
            .images
            .iter()
            .map(|img| ImageRef {
                id: Some(img.id),
                name: img.name.clone(),
                content_type: img.content_type.clone(),
                url: img.url.clone(),
            })
            .collect();

        let mut form = Self {
            office_id: record.office.id,
            incident_type: record.incident_type,
            date: Some(record.date),
            time: Some(record.time),
            description: record.description.clone(),
            notes: record.notes.clone(),
            cash_fund: record.cash_fund(),
            cash_collection: record.cash_collection(),
            other_losses: record.other_losses,
            loss_items: loss_items.to_vec(),
            suspects: suspect_refs,
            attachments: record.attachments.clone(),
            images,
            cash_loss: 0,
            merchandise_loss: 0,
            total_loss: 0,
        };
        form.recompute();
        form
    }

    /// Recompute the derived loss figures and write them back into the
    /// form state.
    pub fn recompute(&mut self) {
        let totals = money::recompute(
            self.cash_fund,
            self.cash_collection,
            &self.loss_items,
            self.other_losses,
        );
        self.cash_loss = totals.cash_loss;
        self.merchandise_loss = totals.merchandise_loss;
        self.total_loss = totals.total_loss;
    }

    pub fn add_loss_item(&mut self, item: LossItem) {
        self.loss_items.push(item);
        self.recompute();
    }

    pub fn remove_loss_item(&mut self, index: usize) {
        if index < self.loss_items.len() {
            self.loss_items.remove(index);
            self.recompute();
        }
    }

    /// Attach an existing suspect. Selecting one that is already present
    /// is a no-op; returns whether the list changed.
    pub fn add_existing_suspect(&mut self, id: i64, alias: &str) -> bool {
        if self.suspects.iter().any(|s| s.existing_id() == Some(id)) {
            return false;
        }
        self.suspects.push(SuspectRef::Existing {
            id,
            alias: alias.to_string(),
        });
        true
    }

    pub fn add_new_suspect(
        &mut self,
        alias: &str,
        status: SuspectStatus,
        description: &str,
        photo: Option<PhotoSource>,
    ) {
        self.suspects.push(SuspectRef::New {
            alias: alias.to_string(),
            status,
            description: description.to_string(),
            photo,
        });
    }

    pub fn remove_suspect(&mut self, index: usize) {
        if index < self.suspects.len() {
            self.suspects.remove(index);
        }
    }

    /// Required-field checks; run before any remote call.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.office_id <= 0 {
            errors.push(FieldError::new("office_id", "Office is required"));
        }
        if self.incident_type <= 0 {
            errors.push(FieldError::new("incident_type", "Incident type is required"));
        }
        if self.date.is_none() {
            errors.push(FieldError::new("date", "Date is required"));
        }
        if self.time.is_none() {
            errors.push(FieldError::new("time", "Time is required"));
        }
        if self.description.trim().is_empty() {
            errors.push(FieldError::new("description", "Description is required"));
        }

        for (i, suspect) in self.suspects.iter().enumerate() {
            if let SuspectRef::New { alias, .. } = suspect {
                if alias.trim().is_empty() {
                    errors.push(FieldError::new(
                        format!("suspect_alias_{i}"),
                        "New suspects need an alias",
                    ));
                }
            }
        }

        errors
    }

    /// The cash sub-breakdown, as the API stores it in the tag map.
    pub fn tags(&self) -> BTreeMap<String, String> {
        let mut tags = BTreeMap::new();
        tags.insert(TAG_CASH_FUND.to_string(), money::money_string(self.cash_fund));
        tags.insert(
            TAG_CASH_COLLECTION.to_string(),
            money::money_string(self.cash_collection),
        );
        tags
    }

    /// Assemble the full-replace update payload once suspects and images
    /// have been resolved to flat id lists.
    pub fn to_update(&self, suspects: Vec<i64>, images: Vec<i64>) -> IncidentUpdate {
        IncidentUpdate {
            office: self.office_id,
            incident_type: self.incident_type,
            date: self.date.unwrap_or_default(),
            time: self.time.unwrap_or_default(),
            description: self.description.clone(),
            notes: self.notes.clone(),
            cash_loss: self.cash_loss,
            merchandise_loss: self.merchandise_loss,
            other_losses: self.other_losses,
            total_loss: self.total_loss,
            tags: self.tags(),
            suspects,
            attachments: self.attachments.clone(),
            images,
        }
    }

    /// Decode the urlencoded edit form. Row fields are indexed
    /// (`item_description_0`, `suspect_alias_2`, ...); gaps in the index
    /// sequence are tolerated, blank template rows are skipped, and rows
    /// with their remove box ticked are dropped.
    pub fn from_form_pairs(pairs: &[(String, String)]) -> Self {
        let map: BTreeMap<&str, &str> = pairs
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        let get = |name: &str| -> &str { map.get(name).copied().unwrap_or("") };

        let date = NaiveDate::parse_from_str(get("date"), "%Y-%m-%d").ok();
        let time = NaiveTime::parse_from_str(get("time"), "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(get("time"), "%H:%M"))
            .ok();

        let attachments = get("attachments")
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        let mut form = Self {
            office_id: parse_count(get("office_id")),
            incident_type: parse_count(get("incident_type")),
            date,
            time,
            description: get("description").trim().to_string(),
            notes: get("notes").trim().to_string(),
            cash_fund: parse_money(get("cash_fund")),
            cash_collection: parse_money(get("cash_collection")),
            other_losses: parse_money(get("other_losses")),
            loss_items: parse_loss_item_rows(&map),
            suspects: parse_suspect_rows(&map),
            attachments,
            images: parse_image_rows(&map),
            cash_loss: 0,
            merchandise_loss: 0,
            total_loss: 0,
        };
        form.recompute();
        form
    }
}

/// Parse a non-negative integer; empty or non-numeric input coerces to 0.
fn parse_count(raw: &str) -> i64 {
    raw.trim().parse::<i64>().unwrap_or(0).max(0)
}

/// Indices present for any of the given per-row field prefixes.
fn row_indices(map: &BTreeMap<&str, &str>, prefixes: &[&str]) -> BTreeSet<usize> {
    let mut indices = BTreeSet::new();
    for key in map.keys() {
        for prefix in prefixes {
            if let Some(rest) = key.strip_prefix(prefix) {
                if let Some(index) = rest.strip_prefix('_').and_then(|s| s.parse().ok()) {
                    indices.insert(index);
                }
            }
        }
    }
    indices
}

fn parse_loss_item_rows(map: &BTreeMap<&str, &str>) -> Vec<LossItem> {
    let get = |name: &String| -> &str { map.get(name.as_str()).copied().unwrap_or("") };

    let mut items = Vec::new();
    for i in row_indices(
        map,
        &["item_id", "item_category", "item_description", "item_quantity", "item_price"],
    ) {
        if get(&format!("item_remove_{i}")) == "on" {
            continue;
        }

        let description = get(&format!("item_description_{i}")).trim().to_string();
        let quantity = parse_count(get(&format!("item_quantity_{i}")));
        let unit_price = parse_money(get(&format!("item_price_{i}")));

        // untouched template row
        if description.is_empty() && quantity == 0 && unit_price == 0 {
            continue;
        }

        let id = get(&format!("item_id_{i}"))
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|&id| id > 0);

        let category = LossCategory::from_str(get(&format!("item_category_{i}")))
            .unwrap_or(LossCategory::Merchandise);

        items.push(LossItem {
            id,
            category,
            description,
            quantity,
            unit_price,
        });
    }
    items
}

fn parse_suspect_rows(map: &BTreeMap<&str, &str>) -> Vec<SuspectRef> {
    let get = |name: &String| -> &str { map.get(name.as_str()).copied().unwrap_or("") };

    let mut suspects = Vec::new();
    for i in row_indices(map, &["suspect_existing_id", "suspect_alias"]) {
        if get(&format!("suspect_remove_{i}")) == "on" {
            continue;
        }

        let alias = get(&format!("suspect_alias_{i}")).trim().to_string();
        let existing_id = get(&format!("suspect_existing_id_{i}"))
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|&id| id > 0);

        if let Some(id) = existing_id {
            suspects.push(SuspectRef::Existing { id, alias });
            continue;
        }

        if alias.is_empty() {
            continue;
        }

        let status = SuspectStatus::from_str(get(&format!("suspect_status_{i}")))
            .unwrap_or(SuspectStatus::AtLarge);
        let description = get(&format!("suspect_description_{i}")).trim().to_string();

        let photo_url = get(&format!("suspect_photo_url_{i}")).trim().to_string();
        let photo = if photo_url.is_empty() {
            None
        } else {
            Some(PhotoSource::Pending {
                filename: filename_from_url(&photo_url),
                content_type: guess_content_type(&photo_url),
                url: photo_url,
            })
        };

        suspects.push(SuspectRef::New {
            alias,
            status,
            description,
            photo,
        });
    }
    suspects
}

fn parse_image_rows(map: &BTreeMap<&str, &str>) -> Vec<ImageRef> {
    let get = |name: &String| -> &str { map.get(name.as_str()).copied().unwrap_or("") };

    let mut images = Vec::new();
    for i in row_indices(map, &["image_id", "image_url"]) {
        if get(&format!("image_remove_{i}")) == "on" {
            continue;
        }

        let url = get(&format!("image_url_{i}")).trim().to_string();
        if url.is_empty() {
            continue;
        }

        let id = get(&format!("image_id_{i}"))
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|&id| id > 0);

        let name = {
            let entered = get(&format!("image_name_{i}")).trim().to_string();
            if entered.is_empty() {
                filename_from_url(&url)
            } else {
                entered
            }
        };

        let content_type = {
            let entered = get(&format!("image_type_{i}")).trim().to_string();
            if entered.is_empty() {
                guess_content_type(&url)
            } else {
                entered
            }
        };

        images.push(ImageRef {
            id,
            name,
            content_type,
            url,
        });
    }
    images
}

/// Last path segment of a URL, for use as an upload filename.
pub fn filename_from_url(url: &str) -> String {
    url.rsplit('/')
        .next()
        .map(|segment| segment.split('?').next().unwrap_or(segment))
        .filter(|name| !name.is_empty())
        .unwrap_or("photo.jpg")
        .to_string()
}

/// Content type from the file extension; octet-stream when unknown.
pub fn guess_content_type(name_or_url: &str) -> String {
    let lower = name_or_url.split('?').next().unwrap_or("").to_lowercase();

    let mime = if lower.ends_with(".png") {
        mime::IMAGE_PNG
    } else if lower.ends_with(".gif") {
        mime::IMAGE_GIF
    } else if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        mime::IMAGE_JPEG
    } else {
        mime::APPLICATION_OCTET_STREAM
    };

    mime.as_ref().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn base_form_pairs() -> Vec<(String, String)> {
        pairs(&[
            ("office_id", "3"),
            ("incident_type", "2"),
            ("date", "2025-11-04"),
            ("time", "14:30"),
            ("description", "Till robbed during closing"),
            ("notes", "Back door forced"),
            ("cash_fund", "100000"),
            ("cash_collection", "50000"),
            ("other_losses", "25000"),
            ("item_category_0", "merchandise"),
            ("item_description_0", "Cigarette cartons"),
            ("item_quantity_0", "2"),
            ("item_price_0", "10000"),
        ])
    }

    #[test]
    fn decodes_scalars_and_recomputes_totals() {
        let form = IncidentForm::from_form_pairs(&base_form_pairs());

        assert_eq!(form.office_id, 3);
        assert_eq!(form.date, NaiveDate::from_ymd_opt(2025, 11, 4));
        assert_eq!(form.cash_loss, 150000);
        assert_eq!(form.merchandise_loss, 20000);
        assert_eq!(form.total_loss, 195000);
    }

    #[test]
    fn non_numeric_money_coerces_to_zero() {
        let mut raw = base_form_pairs();
        raw.push(("cash_fund".to_string(), "not a number".to_string()));

        // BTreeMap takes the later value for the duplicate key
        let form = IncidentForm::from_form_pairs(&raw);
        assert_eq!(form.cash_fund, 0);
        assert_eq!(form.cash_loss, 50000);
    }

    #[test]
    fn blank_template_rows_are_skipped() {
        let mut raw = base_form_pairs();
        raw.extend(pairs(&[
            ("item_category_5", "merchandise"),
            ("item_description_5", ""),
            ("item_quantity_5", ""),
            ("item_price_5", ""),
        ]));

        let form = IncidentForm::from_form_pairs(&raw);
        assert_eq!(form.loss_items.len(), 1);
    }

    #[test]
    fn remove_checkbox_drops_the_row() {
        let mut raw = base_form_pairs();
        raw.push(("item_remove_0".to_string(), "on".to_string()));

        let form = IncidentForm::from_form_pairs(&raw);
        assert!(form.loss_items.is_empty());
        assert_eq!(form.merchandise_loss, 0);
        assert_eq!(form.total_loss, 175000);
    }

    #[test]
    fn row_indices_tolerate_gaps() {
        let mut raw = base_form_pairs();
        raw.extend(pairs(&[
            ("item_category_7", "material"),
            ("item_description_7", "Shelving"),
            ("item_quantity_7", "1"),
            ("item_price_7", "30000"),
        ]));

        let form = IncidentForm::from_form_pairs(&raw);
        assert_eq!(form.loss_items.len(), 2);
        assert_eq!(form.loss_items[1].category, LossCategory::Material);
    }

    #[test]
    fn suspect_rows_split_existing_and_new() {
        let mut raw = base_form_pairs();
        raw.extend(pairs(&[
            ("suspect_existing_id_0", "42"),
            ("suspect_alias_0", "El Flaco"),
            ("suspect_alias_1", "Unknown tall man"),
            ("suspect_status_1", "at_large"),
            ("suspect_description_1", "Grey hoodie"),
            ("suspect_photo_url_1", "https://cdn.example.com/p/cam3.jpg"),
        ]));

        let form = IncidentForm::from_form_pairs(&raw);
        assert_eq!(form.suspects.len(), 2);
        assert_eq!(form.suspects[0].existing_id(), Some(42));

        match &form.suspects[1] {
            SuspectRef::New { photo, .. } => match photo {
                Some(PhotoSource::Pending {
                    filename,
                    content_type,
                    ..
                }) => {
                    assert_eq!(filename, "cam3.jpg");
                    assert_eq!(content_type, "image/jpeg");
                }
                other => panic!("expected pending photo, got: {:?}", other),
            },
            other => panic!("expected new suspect, got: {:?}", other),
        }
    }

    #[test]
    fn selecting_a_present_suspect_is_a_no_op() {
        let mut form = IncidentForm::from_form_pairs(&base_form_pairs());
        assert!(form.add_existing_suspect(42, "El Flaco"));
        assert_eq!(form.suspects.len(), 1);

        // same id again: unchanged list
        assert!(!form.add_existing_suspect(42, "El Flaco"));
        assert_eq!(form.suspects.len(), 1);
        assert_eq!(form.suspects[0].existing_id(), Some(42));
    }

    #[test]
    fn line_item_mutations_write_totals_back() {
        let mut form = IncidentForm::from_form_pairs(&base_form_pairs());
        assert_eq!(form.merchandise_loss, 20000);

        form.add_loss_item(LossItem {
            id: None,
            category: LossCategory::Merchandise,
            description: "Bottles".to_string(),
            quantity: 10,
            unit_price: 500,
        });
        assert_eq!(form.merchandise_loss, 25000);
        assert_eq!(form.total_loss, 200000);

        form.remove_loss_item(0);
        assert_eq!(form.merchandise_loss, 5000);
    }

    #[test]
    fn validation_flags_missing_required_fields() {
        let form = IncidentForm::from_form_pairs(&pairs(&[("notes", "only notes")]));
        let errors = form.validate();

        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"office_id"));
        assert!(fields.contains(&"incident_type"));
        assert!(fields.contains(&"date"));
        assert!(fields.contains(&"time"));
        assert!(fields.contains(&"description"));
    }

    #[test]
    fn update_payload_carries_tags_and_derived_totals() {
        let form = IncidentForm::from_form_pairs(&base_form_pairs());
        let update = form.to_update(vec![42], vec![7, 9]);

        assert_eq!(update.total_loss, 195000);
        assert_eq!(update.tags.get(TAG_CASH_FUND).map(String::as_str), Some("100000"));
        assert_eq!(
            update.tags.get(TAG_CASH_COLLECTION).map(String::as_str),
            Some("50000")
        );
        assert_eq!(update.suspects, vec![42]);
        assert_eq!(update.images, vec![7, 9]);
    }

    #[test]
    fn draft_round_trip_preserves_the_form() {
        let form = IncidentForm::from_form_pairs(&base_form_pairs());

        let json = serde_json::to_string(&form).unwrap();
        let back: IncidentForm = serde_json::from_str(&json).unwrap();

        assert_eq!(back.description, form.description);
        assert_eq!(back.loss_items, form.loss_items);
        assert_eq!(back.total_loss, form.total_loss);
    }
}

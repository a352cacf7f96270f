// src/workflow/mod.rs
//
// The save workflow for the incident edit form:
//
//   validate -> resolve images -> resolve suspects -> core update
//            -> loss-item reconciliation -> change history (best effort)
//
// Images and suspects must both be resolved before the update payload is
// assembled; the core update must succeed before reconciliation and
// change tracking run. Per-item failures in the child steps warn and
// continue; only validation and the core update abort.

use serde_json::{json, Value};
use std::collections::HashSet;

use crate::api::images::FetchedImage;
use crate::api::{self, ApiClient, ApiError};
use crate::domain::changes::{self, FieldChange, TRACKED_INCIDENT_FIELDS};
use crate::domain::form::{ImageRef, IncidentForm, PhotoSource, SuspectRef};
use crate::domain::records::{
    IncidentRecord, IncidentUpdate, LossItem, NewImageMetadata, NewSuspect, Suspect,
};
use crate::domain::reconcile;
use crate::errors::{FieldError, ServerError};

/// The remote operations the submit workflow needs. One seam so the
/// workflow can run against a recording stub in tests.
pub trait RemoteApi {
    fn update_incident(
        &self,
        id: i64,
        update: &IncidentUpdate,
    ) -> Result<IncidentRecord, ApiError>;

    fn create_loss_item(&self, incident_id: i64, item: &LossItem) -> Result<i64, ApiError>;
    fn update_loss_item(&self, item: &LossItem) -> Result<(), ApiError>;
    fn delete_loss_item(&self, id: i64) -> Result<(), ApiError>;

    fn create_suspect(&self, new: &NewSuspect) -> Result<i64, ApiError>;

    fn fetch_image(&self, url: &str, fallback_content_type: &str)
        -> Result<FetchedImage, ApiError>;
    fn create_image_metadata(
        &self,
        meta: &NewImageMetadata,
        file: FetchedImage,
    ) -> Result<i64, ApiError>;
    fn upload_photo(&self, filename: &str, file: FetchedImage) -> Result<String, ApiError>;

    fn create_change_record(
        &self,
        incident_id: i64,
        user_id: i64,
        change: &FieldChange,
    ) -> Result<(), ApiError>;
}

impl RemoteApi for ApiClient {
    fn update_incident(
        &self,
        id: i64,
        update: &IncidentUpdate,
    ) -> Result<IncidentRecord, ApiError> {
        api::incidents::update_incident(self, id, update)
    }

    fn create_loss_item(&self, incident_id: i64, item: &LossItem) -> Result<i64, ApiError> {
        api::losses::create_loss_item(self, incident_id, item)
    }

    fn update_loss_item(&self, item: &LossItem) -> Result<(), ApiError> {
        api::losses::update_loss_item(self, item)
    }

    fn delete_loss_item(&self, id: i64) -> Result<(), ApiError> {
        api::losses::delete_loss_item(self, id)
    }

    fn create_suspect(&self, new: &NewSuspect) -> Result<i64, ApiError> {
        api::suspects::create_suspect(self, new).map(|s| s.id)
    }

    fn fetch_image(
        &self,
        url: &str,
        fallback_content_type: &str,
    ) -> Result<FetchedImage, ApiError> {
        api::images::fetch_image_bytes(self, url, fallback_content_type)
    }

    fn create_image_metadata(
        &self,
        meta: &NewImageMetadata,
        file: FetchedImage,
    ) -> Result<i64, ApiError> {
        api::images::create_image_metadata(self, meta, file)
    }

    fn upload_photo(&self, filename: &str, file: FetchedImage) -> Result<String, ApiError> {
        api::images::upload_photo(self, filename, file)
    }

    fn create_change_record(
        &self,
        incident_id: i64,
        user_id: i64,
        change: &FieldChange,
    ) -> Result<(), ApiError> {
        api::incidents::create_change_record(self, incident_id, user_id, change)
    }
}

/// Everything the edit page loaded from the API, kept as the baseline
/// the submission is diffed against.
#[derive(Debug, Clone)]
pub struct PersistedIncident {
    pub record: IncidentRecord,
    pub loss_items: Vec<LossItem>,
    pub suspects: Vec<Suspect>,
}

/// Load the full edit-page bundle. The incident fetch itself is fatal
/// on 404; suspect lookups substitute placeholders.
pub fn load_incident(api: &ApiClient, id: i64) -> Result<PersistedIncident, ApiError> {
    let record = api::incidents::fetch_incident(api, id)?;
    let loss_items = api::losses::list_loss_items(api, id)?;

    let mut suspects = Vec::with_capacity(record.suspects.len());
    for &suspect_id in &record.suspects {
        suspects.push(api::suspects::fetch_suspect_or_placeholder(api, suspect_id)?);
    }

    Ok(PersistedIncident {
        record,
        loss_items,
        suspects,
    })
}

#[derive(Debug, Clone)]
pub struct SubmitContext {
    /// Remote id of the operator, used for uploads and audit records.
    pub user_id: i64,
}

#[derive(Debug)]
pub struct SubmitReport {
    pub incident_id: i64,
    /// One entry per child record that failed; the save itself succeeded.
    pub warnings: Vec<String>,
    pub changes_recorded: usize,
}

#[derive(Debug)]
pub enum SubmitError {
    /// Required fields missing; nothing was sent to the API.
    Validation(Vec<FieldError>),
    /// The core incident update failed; the form stays populated for retry.
    Api(ApiError),
}

impl From<SubmitError> for ServerError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Validation(errors) => ServerError::Validation(errors),
            SubmitError::Api(err) => ServerError::from(err),
        }
    }
}

pub fn submit_incident(
    api: &dyn RemoteApi,
    form: &mut IncidentForm,
    persisted: &PersistedIncident,
    ctx: &SubmitContext,
) -> Result<SubmitReport, SubmitError> {
    form.recompute();

    let errors = form.validate();
    if !errors.is_empty() {
        return Err(SubmitError::Validation(errors));
    }

    let mut warnings = Vec::new();

    // Both resolutions complete before the payload is assembled.
    let image_ids = resolve_images(
        api,
        &form.images,
        &persisted.record.image_ids(),
        ctx,
        &mut warnings,
    );
    let suspect_ids = resolve_suspects(api, &mut form.suspects, &mut warnings);

    let update = form.to_update(suspect_ids, image_ids);
    let updated = api
        .update_incident(persisted.record.id, &update)
        .map_err(SubmitError::Api)?;

    reconcile_loss_items(
        api,
        persisted.record.id,
        &mut form.loss_items,
        &persisted.loss_items,
        &mut warnings,
    );

    let changes_recorded = track_changes(api, &persisted.record, &updated, ctx);

    Ok(SubmitReport {
        incident_id: updated.id,
        warnings,
        changes_recorded,
    })
}

/// Resolve the form's image list to metadata ids. Ids the persisted set
/// already contains pass through untouched; anything else is fetched and
/// registered as new metadata. A failed image is omitted with a warning.
fn resolve_images(
    api: &dyn RemoteApi,
    images: &[ImageRef],
    persisted_ids: &[i64],
    ctx: &SubmitContext,
    warnings: &mut Vec<String>,
) -> Vec<i64> {
    let known: HashSet<i64> = persisted_ids.iter().copied().collect();
    let mut out = Vec::new();

    for image in images {
        if let Some(id) = image.id {
            if known.contains(&id) {
                out.push(id);
                continue;
            }
        }

        match register_new_image(api, image, ctx) {
            Ok(id) => out.push(id),
            Err(err) => warnings.push(format!("Image '{}' was not attached: {err}", image.name)),
        }
    }

    out
}

fn register_new_image(
    api: &dyn RemoteApi,
    image: &ImageRef,
    ctx: &SubmitContext,
) -> Result<i64, ApiError> {
    let file = api.fetch_image(&image.url, &image.content_type)?;

    let meta = NewImageMetadata {
        filename: image.name.clone(),
        user_id: ctx.user_id,
        description: String::new(),
    };

    api.create_image_metadata(&meta, file)
}

/// Resolve suspect references to a flat id list. Existing references
/// pass through; new ones are created (photo uploaded first) and the
/// reference is rewritten to Existing so a retry cannot re-create it.
fn resolve_suspects(
    api: &dyn RemoteApi,
    suspects: &mut [SuspectRef],
    warnings: &mut Vec<String>,
) -> Vec<i64> {
    let mut out = Vec::new();

    for suspect in suspects.iter_mut() {
        let resolved = match &*suspect {
            SuspectRef::Existing { id, .. } => {
                out.push(*id);
                None
            }
            SuspectRef::New {
                alias,
                status,
                description,
                photo,
            } => {
                let photo_url = match photo {
                    None => None,
                    Some(PhotoSource::Hosted { url }) => Some(url.clone()),
                    Some(PhotoSource::Pending {
                        url,
                        filename,
                        content_type,
                    }) => match upload_pending_photo(api, url, filename, content_type) {
                        Ok(hosted) => Some(hosted),
                        Err(err) => {
                            warnings.push(format!(
                                "Suspect '{alias}' was not created (photo upload failed): {err}"
                            ));
                            continue;
                        }
                    },
                };

                let new = NewSuspect {
                    alias: alias.clone(),
                    status: *status,
                    physical_description: description.clone(),
                    photo_url,
                };

                match api.create_suspect(&new) {
                    Ok(id) => {
                        out.push(id);
                        Some((id, new.alias))
                    }
                    Err(err) => {
                        warnings.push(format!("Suspect '{alias}' was not created: {err}"));
                        None
                    }
                }
            }
        };

        if let Some((id, alias)) = resolved {
            *suspect = SuspectRef::Existing { id, alias };
        }
    }

    out
}

fn upload_pending_photo(
    api: &dyn RemoteApi,
    url: &str,
    filename: &str,
    content_type: &str,
) -> Result<String, ApiError> {
    let file = api.fetch_image(url, content_type)?;
    api.upload_photo(filename, file)
}

/// Execute the reconciliation plan. Creates back-fill their assigned id
/// into the form item; every failure is an individual warning and the
/// remaining operations still run.
fn reconcile_loss_items(
    api: &dyn RemoteApi,
    incident_id: i64,
    submitted: &mut [LossItem],
    original: &[LossItem],
    warnings: &mut Vec<String>,
) {
    let plan = reconcile::plan(original, submitted);

    for &index in &plan.create {
        let item = &mut submitted[index];
        match api.create_loss_item(incident_id, item) {
            Ok(id) => item.id = Some(id),
            Err(err) => warnings.push(format!(
                "Loss item '{}' was not created: {err}",
                item.description
            )),
        }
    }

    for &index in &plan.update {
        let item = &submitted[index];
        if let Err(err) = api.update_loss_item(item) {
            warnings.push(format!(
                "Loss item '{}' was not updated: {err}",
                item.description
            ));
        }
    }

    for &id in &plan.delete {
        if let Err(err) = api.delete_loss_item(id) {
            warnings.push(format!("Loss item #{id} was not deleted: {err}"));
        }
    }
}

/// The tracked field-value snapshot of a record. The office is tracked
/// by id so placeholder names cannot fake a change.
fn snapshot(record: &IncidentRecord) -> Value {
    json!({
        "office": record.office.id,
        "incident_type": record.incident_type,
        "date": record.date,
        "time": record.time,
        "description": record.description,
        "notes": record.notes,
        "cash_loss": record.cash_loss,
        "merchandise_loss": record.merchandise_loss,
        "other_losses": record.other_losses,
        "total_loss": record.total_loss,
    })
}

/// Best-effort audit trail: one record per changed tracked field. A
/// failed write is logged and swallowed; the save already succeeded.
fn track_changes(
    api: &dyn RemoteApi,
    old: &IncidentRecord,
    new: &IncidentRecord,
    ctx: &SubmitContext,
) -> usize {
    let changes = changes::diff_tracked(&snapshot(old), &snapshot(new), TRACKED_INCIDENT_FIELDS);

    let mut recorded = 0;
    for change in &changes {
        match api.create_change_record(new.id, ctx.user_id, change) {
            Ok(()) => recorded += 1,
            Err(err) => {
                eprintln!("change history write failed for '{}': {err}", change.field);
            }
        }
    }

    recorded
}

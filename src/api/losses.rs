// api/losses.rs
use crate::api::client::ApiClient;
use crate::api::wire::{LossItemPatchWire, LossItemWire, NewLossItemWire};
use crate::api::ApiError;
use crate::domain::records::LossItem;

/// Loss items persisted for one incident, every page collected.
pub fn list_loss_items(api: &ApiClient, incident_id: i64) -> Result<Vec<LossItem>, ApiError> {
    let mut url = api.endpoint("/api/incidentItemLosses/")?;
    url.query_pairs_mut()
        .append_pair("incident", &incident_id.to_string());

    let wires: Vec<LossItemWire> = api.fetch_all_pages(url, None)?;
    Ok(wires.into_iter().map(LossItemWire::into_item).collect())
}

/// Create one loss item and return the assigned id.
pub fn create_loss_item(
    api: &ApiClient,
    incident_id: i64,
    item: &LossItem,
) -> Result<i64, ApiError> {
    let url = api.endpoint("/api/incidentItemLosses/")?;
    let body = NewLossItemWire::from_item(incident_id, item);

    let resp = api.send(api.http().post(url).json(&body))?;
    let wire: LossItemWire = resp.json().map_err(|e| ApiError::Decode(e.to_string()))?;
    Ok(wire.id)
}

/// Patch an already-persisted loss item. The item must carry its id.
pub fn update_loss_item(api: &ApiClient, item: &LossItem) -> Result<(), ApiError> {
    let id = item
        .id
        .ok_or_else(|| ApiError::Upload("cannot patch a loss item without an id".into()))?;

    let url = api.endpoint(&format!("/api/incidentItemLosses/{id}/"))?;
    let body = LossItemPatchWire::from_item(item);

    api.send(api.http().patch(url).json(&body))?;
    Ok(())
}

pub fn delete_loss_item(api: &ApiClient, id: i64) -> Result<(), ApiError> {
    let url = api.endpoint(&format!("/api/incidentItemLosses/{id}/"))?;
    api.send(api.http().delete(url))?;
    Ok(())
}

// api/incidents.rs
use crate::api::client::ApiClient;
use crate::api::wire::{
    ChangeRecordWire, IncidentUpdateWire, IncidentWire, OfficeWire, RemoteUserWire,
};
use crate::api::ApiError;
use crate::domain::changes::FieldChange;
use crate::domain::records::{IncidentRecord, IncidentUpdate, Office, RemoteUser};

/// Fetch one incident. A 404 here is fatal to the calling page; the
/// error is passed through untouched.
pub fn fetch_incident(api: &ApiClient, id: i64) -> Result<IncidentRecord, ApiError> {
    let url = api.endpoint(&format!("/api/incidents/{id}/"))?;
    let wire: IncidentWire = api.get_json(url)?;
    Ok(wire.into_record())
}

/// All incidents, every page collected.
pub fn list_incidents(api: &ApiClient) -> Result<Vec<IncidentRecord>, ApiError> {
    let url = api.endpoint("/api/incidents/")?;
    let wires: Vec<IncidentWire> = api.fetch_all_pages(url, None)?;
    Ok(wires.into_iter().map(IncidentWire::into_record).collect())
}

/// Full replace of the incident's scalar fields and resolved id lists.
pub fn update_incident(
    api: &ApiClient,
    id: i64,
    update: &IncidentUpdate,
) -> Result<IncidentRecord, ApiError> {
    let url = api.endpoint(&format!("/api/incidents/{id}/"))?;
    let body = IncidentUpdateWire::from_update(update);

    let resp = api.send(api.http().put(url).json(&body))?;
    let wire: IncidentWire = resp.json().map_err(|e| ApiError::Decode(e.to_string()))?;
    Ok(wire.into_record())
}

/// Look up an office, substituting a placeholder when it 404s so list
/// and detail pages keep rendering.
pub fn fetch_office_or_placeholder(api: &ApiClient, id: i64) -> Result<Office, ApiError> {
    let url = api.endpoint(&format!("/api/offices/{id}/"))?;
    match api.get_json::<OfficeWire>(url) {
        Ok(wire) => Ok(wire.into_office()),
        Err(err) if err.is_not_found() => Ok(Office::placeholder(id)),
        Err(err) => Err(err),
    }
}

/// The operator behind the current token. Doubles as the login probe.
pub fn fetch_current_user(api: &ApiClient) -> Result<RemoteUser, ApiError> {
    let url = api.endpoint("/api/users/current/")?;
    let wire: RemoteUserWire = api.get_json(url)?;
    Ok(wire.into_user())
}

/// Post one audit record for a single field mutation.
pub fn create_change_record(
    api: &ApiClient,
    incident_id: i64,
    user_id: i64,
    change: &FieldChange,
) -> Result<(), ApiError> {
    let url = api.endpoint("/api/change-history/")?;

    let body = ChangeRecordWire {
        entity_type: "incident".to_string(),
        entity_id: incident_id,
        field_name: change.field.clone(),
        old_value: change.old.to_string(),
        new_value: change.new.to_string(),
        user_id,
        description: format!("Field '{}' updated", change.field),
    };

    api.send(api.http().post(url).json(&body))?;
    Ok(())
}

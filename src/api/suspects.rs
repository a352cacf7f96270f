// api/suspects.rs
use crate::api::client::{ApiClient, CancelToken};
use crate::api::wire::{NewSuspectWire, SuspectWire};
use crate::api::ApiError;
use crate::domain::records::{NewSuspect, Suspect};

/// Search suspects by alias. The token is checked before dispatch and
/// between pages; a superseded search returns ApiError::Cancelled
/// instead of wasted pages.
pub fn search_suspects(
    api: &ApiClient,
    cancel: &CancelToken,
    query: &str,
) -> Result<Vec<Suspect>, ApiError> {
    if cancel.is_cancelled() {
        return Err(ApiError::Cancelled);
    }

    let mut url = api.endpoint("/api/suspects/")?;
    url.query_pairs_mut().append_pair("search", query.trim());

    let wires: Vec<SuspectWire> = api.fetch_all_pages(url, Some(cancel))?;
    Ok(wires.into_iter().map(SuspectWire::into_suspect).collect())
}

/// Look up a suspect by id, substituting a placeholder when the record
/// no longer exists.
pub fn fetch_suspect_or_placeholder(api: &ApiClient, id: i64) -> Result<Suspect, ApiError> {
    let url = api.endpoint(&format!("/api/suspects/{id}/"))?;
    match api.get_json::<SuspectWire>(url) {
        Ok(wire) => Ok(wire.into_suspect()),
        Err(err) if err.is_not_found() => Ok(Suspect::placeholder(id)),
        Err(err) => Err(err),
    }
}

/// Create a suspect; the photo, if any, must already be a hosted URL.
pub fn create_suspect(api: &ApiClient, new: &NewSuspect) -> Result<Suspect, ApiError> {
    let url = api.endpoint("/api/suspects/")?;

    let body = NewSuspectWire {
        alias: new.alias.clone(),
        status: new.status.as_str(),
        physical_description: new.physical_description.clone(),
        photo_url: new.photo_url.clone(),
    };

    let resp = api.send(api.http().post(url).json(&body))?;
    let wire: SuspectWire = resp.json().map_err(|e| ApiError::Decode(e.to_string()))?;
    Ok(wire.into_suspect())
}

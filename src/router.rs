// router.rs
use astra::Request;
use std::collections::HashMap;
use std::io::Read;

use crate::api::{self, ApiClient, ApiError, CancelToken, Credentials};
use crate::auth::sessions::{self, OperatorSession};
use crate::config::AppConfig;
use crate::db::{drafts, Database};
use crate::domain::form::IncidentForm;
use crate::errors::{FieldError, ServerError};
use crate::responses::{html_response, redirect, ResultResp};
use crate::templates::pages::{
    incident_form_page, incidents_page, login_page, submit_result_page,
    suspect_results_fragment, IncidentFormVm, IncidentListVm,
};
use crate::workflow::{self, SubmitContext, SubmitError};

pub struct AppCtx {
    pub db: Database,
    pub config: AppConfig,
}

pub fn handle(mut req: Request, ctx: &AppCtx) -> ResultResp {
    let path = req.uri().path().to_string();

    let result = route(&mut req, ctx, &path);

    // A rejected or missing token sends the operator back to the login
    // page, unless they are already on it.
    match result {
        Err(ServerError::Unauthorized(_)) if !path.starts_with("/login") => {
            redirect("/login", None)
        }
        other => other,
    }
}

fn route(req: &mut Request, ctx: &AppCtx, path: &str) -> ResultResp {
    let method = req.method().as_str().to_string();

    match (method.as_str(), path) {
        ("GET", "/") => redirect("/incidents", None),
        ("GET", "/login") => html_response(login_page(None)),
        ("POST", "/login") => post_login(req, ctx),
        ("POST", "/logout") => post_logout(req, ctx),
        ("GET", "/incidents") => incidents_list(req, ctx),
        ("GET", "/incidents/export") => incidents_export(req, ctx),
        _ => {
            let parts: Vec<&str> = path.trim_matches('/').split('/').collect();
            match (method.as_str(), parts.as_slice()) {
                ("GET", ["incidents", id, "edit"]) => {
                    incident_edit_page(req, ctx, parse_id(id)?)
                }
                ("POST", ["incidents", id, "edit"]) => {
                    incident_edit_submit(req, ctx, parse_id(id)?)
                }
                ("GET", ["incidents", id, "suspects", "search"]) => {
                    suspects_search(req, ctx, parse_id(id)?)
                }
                ("POST", ["incidents", id, "suspects", "add"]) => {
                    suspects_attach(req, ctx, parse_id(id)?)
                }
                _ => Err(ServerError::NotFound),
            }
        }
    }
}

fn parse_id(raw: &str) -> Result<i64, ServerError> {
    raw.parse()
        .map_err(|_| ServerError::BadRequest(format!("bad incident id '{raw}'")))
}

// ---- auth plumbing ----

fn now_unix() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

fn get_cookie(req: &Request, name: &str) -> Option<String> {
    let header = req.headers().get("Cookie")?.to_str().ok()?;

    for pair in header.split(';') {
        let mut parts = pair.trim().splitn(2, '=');
        let key = parts.next().unwrap_or("");
        if key == name {
            return parts.next().map(str::to_string);
        }
    }

    None
}

fn require_session(req: &Request, ctx: &AppCtx) -> Result<OperatorSession, ServerError> {
    let token = get_cookie(req, "session")
        .ok_or_else(|| ServerError::Unauthorized("sign in to continue".into()))?;

    let session = ctx
        .db
        .with_conn(|conn| sessions::load_session(conn, &token, now_unix()))?;

    session.ok_or_else(|| ServerError::Unauthorized("session expired, sign in again".into()))
}

/// Build the remote client for one request. The 401 hook revokes this
/// session so the next request lands on the login page.
fn api_client(ctx: &AppCtx, session: &OperatorSession) -> Result<ApiClient, ServerError> {
    let db = ctx.db.clone();
    let session_id = session.id;

    let client = ApiClient::new(
        &ctx.config.api_base,
        Credentials::new(session.api_token.clone()),
    )?
    .on_unauthorized(Box::new(move || {
        let revoked =
            db.with_conn(|conn| sessions::revoke_session(conn, session_id, now_unix()));
        if let Err(err) = revoked {
            eprintln!("failed to revoke session after 401: {err}");
        }
    }));

    Ok(client)
}

// ---- request parsing ----

fn parse_query(req: &Request) -> HashMap<String, String> {
    match req.uri().query() {
        Some(q) => url::form_urlencoded::parse(q.as_bytes())
            .into_owned()
            .collect(),
        None => HashMap::new(),
    }
}

fn parse_form_body(req: &mut Request) -> Result<Vec<(String, String)>, ServerError> {
    let mut buf = Vec::new();
    req.body_mut()
        .reader()
        .read_to_end(&mut buf)
        .map_err(|e| ServerError::BadRequest(format!("failed to read request body: {e}")))?;

    Ok(url::form_urlencoded::parse(&buf).into_owned().collect())
}

fn form_value<'a>(pairs: &'a [(String, String)], name: &str) -> &'a str {
    pairs
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
        .unwrap_or("")
}

// ---- handlers ----

fn post_login(req: &mut Request, ctx: &AppCtx) -> ResultResp {
    let pairs = parse_form_body(req)?;
    let api_token = form_value(&pairs, "api_token").trim().to_string();

    if api_token.is_empty() {
        return html_response(login_page(Some("Enter your API token.")));
    }

    // Probe the token before opening a session.
    let client = ApiClient::new(&ctx.config.api_base, Credentials::new(api_token.clone()))?;

    match api::incidents::fetch_current_user(&client) {
        Ok(user) => {
            let raw_token = ctx.db.with_conn(|conn| {
                sessions::create_session(conn, &api_token, user.id, &user.name, now_unix())
            })?;

            redirect(
                "/incidents",
                Some(&format!(
                    "session={raw_token}; Path=/; HttpOnly; SameSite=Lax"
                )),
            )
        }
        Err(ApiError::Unauthorized) => html_response(login_page(Some(
            "That token was rejected by the incident API.",
        ))),
        Err(err) => Err(err.into()),
    }
}

fn post_logout(req: &mut Request, ctx: &AppCtx) -> ResultResp {
    if let Some(token) = get_cookie(req, "session") {
        let session = ctx
            .db
            .with_conn(|conn| sessions::load_session(conn, &token, now_unix()))?;
        if let Some(session) = session {
            ctx.db
                .with_conn(|conn| sessions::revoke_session(conn, session.id, now_unix()))?;
        }
    }

    redirect("/login", Some("session=; Path=/; Max-Age=0"))
}

fn incidents_list(req: &Request, ctx: &AppCtx) -> ResultResp {
    let session = require_session(req, ctx)?;
    let client = api_client(ctx, &session)?;

    let incidents = api::incidents::list_incidents(&client)?;

    html_response(incidents_page(&IncidentListVm {
        operator_name: session.display_name,
        incidents,
    }))
}

fn incidents_export(req: &Request, ctx: &AppCtx) -> ResultResp {
    let session = require_session(req, ctx)?;
    let client = api_client(ctx, &session)?;

    let incidents = api::incidents::list_incidents(&client)?;
    crate::spreadsheets::export_incidents_xlsx(&incidents)
}

/// The current working form: the saved draft when one exists, otherwise
/// the form populated from the API. Returns whether a draft was used.
fn current_form(
    ctx: &AppCtx,
    session: &OperatorSession,
    persisted: &workflow::PersistedIncident,
    incident_id: i64,
) -> Result<(IncidentForm, bool), ServerError> {
    let draft_json = ctx
        .db
        .with_conn(|conn| drafts::load_draft(conn, session.id, incident_id))?;

    if let Some(json) = draft_json {
        match serde_json::from_str::<IncidentForm>(&json) {
            Ok(form) => return Ok((form, true)),
            Err(err) => eprintln!("discarding unreadable draft for incident {incident_id}: {err}"),
        }
    }

    Ok((
        IncidentForm::from_record(&persisted.record, &persisted.loss_items, &persisted.suspects),
        false,
    ))
}

fn save_draft(
    ctx: &AppCtx,
    session: &OperatorSession,
    incident_id: i64,
    form: &IncidentForm,
) -> Result<(), ServerError> {
    let json = serde_json::to_string(form)
        .map_err(|e| ServerError::DbError(format!("failed to serialize draft: {e}")))?;

    ctx.db
        .with_conn(|conn| drafts::save_draft(conn, session.id, incident_id, &json, now_unix()))
}

fn incident_edit_page(req: &Request, ctx: &AppCtx, incident_id: i64) -> ResultResp {
    let session = require_session(req, ctx)?;
    let client = api_client(ctx, &session)?;

    // A 404 on the primary fetch is fatal to this page.
    let persisted = workflow::load_incident(&client, incident_id)?;
    let (form, from_draft) = current_form(ctx, &session, &persisted, incident_id)?;

    // Some API deployments return the office unexpanded; look it up, and
    // fall back to a placeholder if it is gone.
    let office = if persisted.record.office.name.is_empty() {
        api::incidents::fetch_office_or_placeholder(&client, persisted.record.office.id)?
    } else {
        persisted.record.office.clone()
    };

    html_response(incident_form_page(&IncidentFormVm {
        incident_id,
        office_name: &office.name,
        form: &form,
        errors: &[],
        from_draft,
    }))
}

fn incident_edit_submit(req: &mut Request, ctx: &AppCtx, incident_id: i64) -> ResultResp {
    let session = require_session(req, ctx)?;
    let pairs = parse_form_body(req)?;
    let mut form = IncidentForm::from_form_pairs(&pairs);

    // Required-field failures come back before the API is touched at all.
    let field_errors = form.validate();
    if !field_errors.is_empty() {
        save_draft(ctx, &session, incident_id, &form)?;
        return html_response(incident_form_page(&IncidentFormVm {
            incident_id,
            office_name: &format!("#{}", form.office_id),
            form: &form,
            errors: &field_errors,
            from_draft: false,
        }));
    }

    let client = api_client(ctx, &session)?;
    let persisted = workflow::load_incident(&client, incident_id)?;

    let submit_ctx = SubmitContext {
        user_id: session.user_id,
    };

    match workflow::submit_incident(&client, &mut form, &persisted, &submit_ctx) {
        Ok(report) => {
            ctx.db
                .with_conn(|conn| drafts::clear_draft(conn, session.id, incident_id))?;
            html_response(submit_result_page(&report))
        }

        Err(SubmitError::Validation(errors)) => {
            save_draft(ctx, &session, incident_id, &form)?;
            html_response(incident_form_page(&IncidentFormVm {
                incident_id,
                office_name: &persisted.record.office.name,
                form: &form,
                errors: &errors,
                from_draft: false,
            }))
        }

        Err(SubmitError::Api(err)) => {
            // Keep the operator's values; re-render with a blocking banner.
            save_draft(ctx, &session, incident_id, &form)?;
            let errors = vec![FieldError::new(
                "__submit",
                format!("The incident could not be saved: {err}. Your values were kept."),
            )];
            html_response(incident_form_page(&IncidentFormVm {
                incident_id,
                office_name: &persisted.record.office.name,
                form: &form,
                errors: &errors,
                from_draft: false,
            }))
        }
    }
}

fn suspects_search(req: &Request, ctx: &AppCtx, incident_id: i64) -> ResultResp {
    let session = require_session(req, ctx)?;
    let client = api_client(ctx, &session)?;

    let query = parse_query(req).remove("q").unwrap_or_default();
    if query.trim().is_empty() {
        return html_response(maud::html! {});
    }

    let cancel = CancelToken::new();
    let results = api::suspects::search_suspects(&client, &cancel, &query)?;

    let persisted = workflow::load_incident(&client, incident_id)?;
    let (form, _) = current_form(ctx, &session, &persisted, incident_id)?;
    let attached: Vec<i64> = form
        .suspects
        .iter()
        .filter_map(|s| s.existing_id())
        .collect();

    html_response(suspect_results_fragment(incident_id, &results, &attached))
}

/// Attaching from search happens eagerly: the suspect lands in the
/// working draft right away, and re-selecting an attached suspect
/// changes nothing.
fn suspects_attach(req: &mut Request, ctx: &AppCtx, incident_id: i64) -> ResultResp {
    let session = require_session(req, ctx)?;
    let pairs = parse_form_body(req)?;

    let suspect_id: i64 = form_value(&pairs, "suspect_id")
        .parse()
        .map_err(|_| ServerError::BadRequest("bad suspect id".into()))?;
    let alias = form_value(&pairs, "alias").to_string();

    let client = api_client(ctx, &session)?;
    let persisted = workflow::load_incident(&client, incident_id)?;
    let (mut form, _) = current_form(ctx, &session, &persisted, incident_id)?;

    form.add_existing_suspect(suspect_id, &alias);
    save_draft(ctx, &session, incident_id, &form)?;

    redirect(&format!("/incidents/{incident_id}/edit"), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_header_is_parsed_by_name() {
        let mut req = Request::new(astra::Body::empty());
        req.headers_mut().insert(
            "Cookie",
            "theme=dark; session=abc123; lang=es".parse().unwrap(),
        );

        assert_eq!(get_cookie(&req, "session").as_deref(), Some("abc123"));
        assert_eq!(get_cookie(&req, "theme").as_deref(), Some("dark"));
        assert_eq!(get_cookie(&req, "missing"), None);
    }

    #[test]
    fn query_strings_are_url_decoded() {
        let mut req = Request::new(astra::Body::empty());
        *req.uri_mut() = "/incidents/5/suspects/search?q=el%20flaco".parse().unwrap();

        let params = parse_query(&req);
        assert_eq!(params.get("q").map(String::as_str), Some("el flaco"));
    }

    #[test]
    fn bad_incident_id_is_a_bad_request() {
        match parse_id("twelve") {
            Err(ServerError::BadRequest(_)) => {}
            other => panic!("expected BadRequest, got: {:?}", other),
        }
        assert_eq!(parse_id("12").unwrap(), 12);
    }
}

use crate::domain::form::{ImageRef, IncidentForm, PhotoSource, SuspectRef};
use crate::domain::kinds::{LossCategory, SuspectStatus};
use crate::domain::money::format_money;
use crate::domain::records::{LossItem, Suspect};
use crate::errors::FieldError;
use crate::templates::components::{error_summary, field_error, status_badge};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub struct IncidentFormVm<'a> {
    pub incident_id: i64,
    pub office_name: &'a str,
    pub form: &'a IncidentForm,
    pub errors: &'a [FieldError],
    /// The page was populated from a saved draft, not the API.
    pub from_draft: bool,
}

// Blank rows appended after the populated ones so new entries can be
// added without any client scripting.
const EXTRA_ITEM_ROWS: usize = 2;
const EXTRA_SUSPECT_ROWS: usize = 1;
const EXTRA_IMAGE_ROWS: usize = 1;

pub fn incident_form_page(vm: &IncidentFormVm) -> Markup {
    let form = vm.form;

    desktop_layout(
        &format!("Incident #{}", vm.incident_id),
        true,
        html! {
            main class="container" {
                h1 { "Incident #" (vm.incident_id) }
                p { "Office: " strong { (vm.office_name) } }

                @if vm.from_draft {
                    div class="toast toast-info" {
                        "Restored your unsaved draft. Saving will submit these values."
                    }
                }

                (error_summary(vm.errors))

                form method="post" action=(format!("/incidents/{}/edit", vm.incident_id)) {
                    (details_card(form, vm.errors))
                    (losses_card(form))
                    (suspects_card(vm.incident_id, form, vm.errors))
                    (images_card(form))
                    (attachments_card(form))

                    button type="submit" class="primary" { "Save incident" }
                }
            }
        },
    )
}

fn inline_error(errors: &[FieldError], field: &str) -> Markup {
    html! {
        @if let Some(msg) = field_error(errors, field) {
            p class="field-error" { (msg) }
        }
    }
}

fn details_card(form: &IncidentForm, errors: &[FieldError]) -> Markup {
    let date_value = form
        .date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    let time_value = form
        .time
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_default();

    html! {
        section class="card" {
            h3 { "Details" }

            div class="form-grid" {
                div {
                    label for="office_id" { "Office" }
                    input type="number" id="office_id" name="office_id" value=(form.office_id);
                    (inline_error(errors, "office_id"))
                }
                div {
                    label for="incident_type" { "Incident type" }
                    input type="number" id="incident_type" name="incident_type" value=(form.incident_type);
                    (inline_error(errors, "incident_type"))
                }
                div {
                    label for="date" { "Date" }
                    input type="date" id="date" name="date" value=(date_value);
                    (inline_error(errors, "date"))
                }
                div {
                    label for="time" { "Time" }
                    input type="time" id="time" name="time" value=(time_value);
                    (inline_error(errors, "time"))
                }
            }

            label for="description" { "Description" }
            textarea id="description" name="description" rows="3" { (form.description) }
            (inline_error(errors, "description"))

            label for="notes" { "Notes" }
            textarea id="notes" name="notes" rows="2" { (form.notes) }
        }
    }
}

fn losses_card(form: &IncidentForm) -> Markup {
    html! {
        section class="card" {
            h3 { "Losses" }

            div class="form-grid" {
                div {
                    label for="cash_fund" { "Cash: fund" }
                    input type="text" id="cash_fund" name="cash_fund" value=(form.cash_fund);
                }
                div {
                    label for="cash_collection" { "Cash: collection" }
                    input type="text" id="cash_collection" name="cash_collection" value=(form.cash_collection);
                }
                div {
                    label for="other_losses" { "Other losses" }
                    input type="text" id="other_losses" name="other_losses" value=(form.other_losses);
                }
            }

            p {
                "Cash " strong { (format_money(form.cash_loss)) }
                " · Merchandise " strong { (format_money(form.merchandise_loss)) }
                " · Total " strong { (format_money(form.total_loss)) }
                span style="color: #6b7280;" { " (recomputed on save)" }
            }

            h4 { "Line items" }
            table style="width: 100%; border-collapse: collapse;" {
                thead {
                    tr {
                        th style="text-align: left; padding: 6px;" { "Category" }
                        th style="text-align: left; padding: 6px;" { "Description" }
                        th style="text-align: right; padding: 6px;" { "Qty" }
                        th style="text-align: right; padding: 6px;" { "Unit price" }
                        th style="text-align: right; padding: 6px;" { "Line total" }
                        th style="padding: 6px;" { "Remove" }
                    }
                }
                tbody {
                    @for (i, item) in form.loss_items.iter().enumerate() {
                        (loss_item_row(i, Some(item)))
                    }
                    @for i in form.loss_items.len()..form.loss_items.len() + EXTRA_ITEM_ROWS {
                        (loss_item_row(i, None))
                    }
                }
            }
        }
    }
}

fn loss_item_row(i: usize, item: Option<&LossItem>) -> Markup {
    let id = item.and_then(|it| it.id);
    let category = item.map(|it| it.category);
    let description = item.map(|it| it.description.as_str()).unwrap_or("");
    let quantity = item.map(|it| it.quantity.to_string()).unwrap_or_default();
    let price = item.map(|it| it.unit_price.to_string()).unwrap_or_default();

    html! {
        tr {
            td style="padding: 6px;" {
                @if let Some(id) = id {
                    input type="hidden" name=(format!("item_id_{i}")) value=(id);
                }
                select name=(format!("item_category_{i}")) {
                    @for cat in [LossCategory::Merchandise, LossCategory::Material] {
                        option value=(cat.as_str()) selected[category == Some(cat)] { (cat.label()) }
                    }
                }
            }
            td style="padding: 6px;" {
                input type="text" name=(format!("item_description_{i}")) value=(description);
            }
            td style="padding: 6px; text-align: right;" {
                input type="text" name=(format!("item_quantity_{i}")) value=(quantity) size="4";
            }
            td style="padding: 6px; text-align: right;" {
                input type="text" name=(format!("item_price_{i}")) value=(price) size="8";
            }
            td style="padding: 6px; text-align: right;" {
                @match item {
                    Some(it) => (format_money(it.line_total())),
                    None => "—",
                }
            }
            td style="padding: 6px; text-align: center;" {
                @if item.is_some() {
                    input type="checkbox" name=(format!("item_remove_{i}"));
                }
            }
        }
    }
}

fn suspects_card(incident_id: i64, form: &IncidentForm, errors: &[FieldError]) -> Markup {
    html! {
        section class="card" {
            h3 { "Suspects" }

            @for (i, suspect) in form.suspects.iter().enumerate() {
                (suspect_row(i, suspect, errors))
            }
            @for i in form.suspects.len()..form.suspects.len() + EXTRA_SUSPECT_ROWS {
                (new_suspect_row(i))
            }

            h4 { "Attach an existing suspect" }
            input
                type="search"
                name="q"
                placeholder="Search by alias…"
                hx-get=(format!("/incidents/{incident_id}/suspects/search"))
                hx-target="#suspect-results"
                hx-swap="innerHTML"
                hx-trigger="keyup changed delay:300ms";
            div id="suspect-results" {}
        }
    }
}

fn suspect_row(i: usize, suspect: &SuspectRef, errors: &[FieldError]) -> Markup {
    match suspect {
        SuspectRef::Existing { id, alias } => html! {
            div class="suspect-row" {
                input type="hidden" name=(format!("suspect_existing_id_{i}")) value=(id);
                input type="hidden" name=(format!("suspect_alias_{i}")) value=(alias);
                span { strong { (alias) } " (#" (id) ")" }
                label {
                    input type="checkbox" name=(format!("suspect_remove_{i}"));
                    " remove"
                }
            }
        },
        SuspectRef::New {
            alias,
            status,
            description,
            photo,
        } => {
            let photo_url = match photo {
                Some(PhotoSource::Pending { url, .. }) => url.as_str(),
                Some(PhotoSource::Hosted { url }) => url.as_str(),
                None => "",
            };
            html! {
                div class="suspect-row" {
                    span { "New: " }
                    input type="text" name=(format!("suspect_alias_{i}")) value=(alias) placeholder="Alias";
                    (status_select(i, Some(*status)))
                    input type="text" name=(format!("suspect_description_{i}")) value=(description) placeholder="Physical description";
                    input type="text" name=(format!("suspect_photo_url_{i}")) value=(photo_url) placeholder="Photo URL (optional)";
                    label {
                        input type="checkbox" name=(format!("suspect_remove_{i}"));
                        " remove"
                    }
                    (inline_error(errors, &format!("suspect_alias_{i}")))
                }
            }
        }
    }
}

fn new_suspect_row(i: usize) -> Markup {
    html! {
        div class="suspect-row" {
            span { "Add new: " }
            input type="text" name=(format!("suspect_alias_{i}")) value="" placeholder="Alias";
            (status_select(i, None))
            input type="text" name=(format!("suspect_description_{i}")) value="" placeholder="Physical description";
            input type="text" name=(format!("suspect_photo_url_{i}")) value="" placeholder="Photo URL (optional)";
        }
    }
}

fn status_select(i: usize, selected: Option<SuspectStatus>) -> Markup {
    html! {
        select name=(format!("suspect_status_{i}")) {
            @for status in SuspectStatus::ALL {
                option value=(status.as_str()) selected[selected == Some(status)] { (status.label()) }
            }
        }
    }
}

/// Fragment returned by the suspect search endpoint.
pub fn suspect_results_fragment(
    incident_id: i64,
    results: &[Suspect],
    attached: &[i64],
) -> Markup {
    html! {
        @if results.is_empty() {
            p style="color: #6b7280;" { "No suspects matched." }
        }
        ul class="search-results" {
            @for suspect in results {
                li {
                    strong { (suspect.alias) }
                    " " (status_badge(suspect.status))
                    @if attached.contains(&suspect.id) {
                        span style="color: #6b7280;" { " already attached" }
                    } @else {
                        form
                            method="post"
                            action=(format!("/incidents/{incident_id}/suspects/add"))
                            style="display: inline; margin-left: 8px;"
                        {
                            input type="hidden" name="suspect_id" value=(suspect.id);
                            input type="hidden" name="alias" value=(suspect.alias);
                            button type="submit" { "Attach" }
                        }
                    }
                }
            }
        }
    }
}

fn images_card(form: &IncidentForm) -> Markup {
    html! {
        section class="card" {
            h3 { "Images" }
            p style="color: #6b7280;" {
                "Images already on the incident are kept as-is; new URLs are fetched and registered on save."
            }

            @for (i, image) in form.images.iter().enumerate() {
                (image_row(i, Some(image)))
            }
            @for i in form.images.len()..form.images.len() + EXTRA_IMAGE_ROWS {
                (image_row(i, None))
            }
        }
    }
}

fn image_row(i: usize, image: Option<&ImageRef>) -> Markup {
    let id = image.and_then(|img| img.id);
    let name = image.map(|img| img.name.as_str()).unwrap_or("");
    let url = image.map(|img| img.url.as_str()).unwrap_or("");

    html! {
        div class="image-row" {
            @if let Some(id) = id {
                input type="hidden" name=(format!("image_id_{i}")) value=(id);
            }
            input type="text" name=(format!("image_name_{i}")) value=(name) placeholder="Name";
            input type="text" name=(format!("image_url_{i}")) value=(url) placeholder="Image URL" size="50";
            @if image.is_some() {
                label {
                    input type="checkbox" name=(format!("image_remove_{i}"));
                    " remove"
                }
            }
        }
    }
}

fn attachments_card(form: &IncidentForm) -> Markup {
    html! {
        section class="card" {
            h3 { "Attachments" }
            label for="attachments" { "One reference per line" }
            textarea id="attachments" name="attachments" rows="3" {
                (form.attachments.join("\n"))
            }
        }
    }
}

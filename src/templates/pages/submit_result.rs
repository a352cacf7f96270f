use crate::templates::components::card;
use crate::templates::desktop_layout;
use crate::workflow::SubmitReport;
use maud::{html, Markup};

pub fn submit_result_page(report: &SubmitReport) -> Markup {
    desktop_layout(
        "Incident saved",
        true,
        html! {
            main class="container narrow" {
                h1 { "Incident #" (report.incident_id) " saved" }

                @if report.warnings.is_empty() {
                    div class="toast toast-success" { "All changes were saved." }
                } @else {
                    div class="toast toast-warning" {
                        strong { "Saved, but some entries could not be processed:" }
                        ul {
                            @for warning in &report.warnings {
                                li { (warning) }
                            }
                        }
                        p { "Re-open the incident to retry the entries above." }
                    }
                }

                @if report.changes_recorded > 0 {
                    (card("Audit trail", html! {
                        p { (report.changes_recorded) " field change(s) recorded in the history." }
                    }))
                }

                p {
                    a href=(format!("/incidents/{}/edit", report.incident_id)) { "Back to the incident" }
                    " · "
                    a href="/incidents" { "All incidents" }
                }
            }
        },
    )
}

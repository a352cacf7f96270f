use crate::domain::money::format_money;
use crate::domain::records::IncidentRecord;
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub struct IncidentListVm {
    pub operator_name: String,
    pub incidents: Vec<IncidentRecord>,
}

pub fn incidents_page(vm: &IncidentListVm) -> Markup {
    desktop_layout(
        "Incidents",
        true,
        html! {
            main class="container" {
                h1 { "Incidents" }
                p { "Signed in as " strong { (vm.operator_name) } }

                div class="card" {
                    div style="display: flex; justify-content: space-between; align-items: center;" {
                        h3 { "All incidents" }
                        a href="/incidents/export" {
                            button type="button" { "Download XLSX" }
                        }
                    }

                    div style="overflow-x: auto;" {
                        table style="width: 100%; border-collapse: collapse; margin-top: 1rem;" {
                            thead {
                                tr {
                                    th style="padding: 12px 8px; border-bottom: 2px solid #e5e7eb; text-align: left;" { "ID" }
                                    th style="padding: 12px 8px; border-bottom: 2px solid #e5e7eb; text-align: left;" { "Office" }
                                    th style="padding: 12px 8px; border-bottom: 2px solid #e5e7eb; text-align: left;" { "Date" }
                                    th style="padding: 12px 8px; border-bottom: 2px solid #e5e7eb; text-align: right;" { "Cash" }
                                    th style="padding: 12px 8px; border-bottom: 2px solid #e5e7eb; text-align: right;" { "Merchandise" }
                                    th style="padding: 12px 8px; border-bottom: 2px solid #e5e7eb; text-align: right;" { "Total" }
                                    th style="padding: 12px 8px; border-bottom: 2px solid #e5e7eb; text-align: left;" { "Description" }
                                    th style="padding: 12px 8px; border-bottom: 2px solid #e5e7eb;" { "" }
                                }
                            }
                            tbody {
                                @for incident in &vm.incidents {
                                    tr {
                                        td style="padding: 8px; border-bottom: 1px solid #f3f4f6;" { (incident.id) }
                                        td style="padding: 8px; border-bottom: 1px solid #f3f4f6;" { (incident.office.name) }
                                        td style="padding: 8px; border-bottom: 1px solid #f3f4f6;" { (incident.date) " " (incident.time) }
                                        td style="padding: 8px; border-bottom: 1px solid #f3f4f6; text-align: right;" { (format_money(incident.cash_loss)) }
                                        td style="padding: 8px; border-bottom: 1px solid #f3f4f6; text-align: right;" { (format_money(incident.merchandise_loss)) }
                                        td style="padding: 8px; border-bottom: 1px solid #f3f4f6; text-align: right;" { strong { (format_money(incident.total_loss)) } }
                                        td style="padding: 8px; border-bottom: 1px solid #f3f4f6;" { (truncate(&incident.description, 60)) }
                                        td style="padding: 8px; border-bottom: 1px solid #f3f4f6;" {
                                            a href=(format!("/incidents/{}/edit", incident.id)) { "Edit" }
                                        }
                                    }
                                }
                                @if vm.incidents.is_empty() {
                                    tr {
                                        td colspan="8" style="padding: 16px; color: #6b7280;" { "No incidents recorded." }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}…")
    }
}

use crate::domain::records::IncidentRecord;
use crate::errors::ServerError;
use crate::responses::xlsx_response;
use crate::responses::ResultResp;
use rust_xlsxwriter::Workbook;

pub fn export_incidents_xlsx(incidents: &[IncidentRecord]) -> ResultResp {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    // Headers
    let headers = [
        "ID",
        "Office",
        "Type",
        "Date",
        "Time",
        "Cash Loss",
        "Merchandise Loss",
        "Other Losses",
        "Total Loss",
        "Suspects",
        "Description",
    ];

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(|e| {
                ServerError::XlsxError(format!("Failed to write header '{}': {}", header, e))
            })?;
    }

    // Rows
    for (i, incident) in incidents.iter().enumerate() {
        let r = (i + 1) as u32;
        let date = incident.date.to_string();
        let time = incident.time.to_string();

        worksheet
            .write_number(r, 0, incident.id as f64)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write id: {}", e)))?;

        worksheet
            .write_string(r, 1, incident.office.name.as_str())
            .map_err(|e| ServerError::XlsxError(format!("Failed to write office: {}", e)))?;

        worksheet
            .write_number(r, 2, incident.incident_type as f64)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write type: {}", e)))?;

        worksheet
            .write_string(r, 3, date.as_str())
            .map_err(|e| ServerError::XlsxError(format!("Failed to write date: {}", e)))?;

        worksheet
            .write_string(r, 4, time.as_str())
            .map_err(|e| ServerError::XlsxError(format!("Failed to write time: {}", e)))?;

        worksheet
            .write_number(r, 5, incident.cash_loss as f64)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write cash loss: {}", e)))?;

        worksheet
            .write_number(r, 6, incident.merchandise_loss as f64)
            .map_err(|e| {
                ServerError::XlsxError(format!("Failed to write merchandise loss: {}", e))
            })?;

        worksheet
            .write_number(r, 7, incident.other_losses as f64)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write other losses: {}", e)))?;

        worksheet
            .write_number(r, 8, incident.total_loss as f64)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write total loss: {}", e)))?;

        worksheet
            .write_number(r, 9, incident.suspects.len() as f64)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write suspects: {}", e)))?;

        worksheet
            .write_string(r, 10, incident.description.as_str())
            .map_err(|e| ServerError::XlsxError(format!("Failed to write description: {}", e)))?;
    }

    let buffer = workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {}", e)))?;

    xlsx_response(buffer, "incidents.xlsx")
}

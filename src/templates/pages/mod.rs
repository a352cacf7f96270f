pub mod incident_form;
pub mod incidents;
pub mod login;
pub mod submit_result;

pub use incident_form::{incident_form_page, suspect_results_fragment, IncidentFormVm};
pub use incidents::{incidents_page, IncidentListVm};
pub use login::login_page;
pub use submit_result::submit_result_page;

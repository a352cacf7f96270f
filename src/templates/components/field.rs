use crate::errors::FieldError;
use maud::{html, Markup};

/// First error message recorded for a field, if any.
pub fn field_error<'a>(errors: &'a [FieldError], field: &str) -> Option<&'a str> {
    errors
        .iter()
        .find(|e| e.field == field)
        .map(|e| e.message.as_str())
}

/// Toast-style summary shown above the form when validation failed.
pub fn error_summary(errors: &[FieldError]) -> Markup {
    html! {
        @if !errors.is_empty() {
            div class="toast toast-error" {
                strong { "The incident was not saved." }
                ul {
                    @for error in errors {
                        li { (error.message) }
                    }
                }
            }
        }
    }
}

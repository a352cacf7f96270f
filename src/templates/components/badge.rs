use crate::domain::kinds::SuspectStatus;
use maud::{html, Markup};

pub fn status_badge(status: SuspectStatus) -> Markup {
    html! {
        span class=(status.badge_class()) { (status.label()) }
    }
}

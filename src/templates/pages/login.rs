use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn login_page(error: Option<&str>) -> Markup {
    desktop_layout(
        "Sign in",
        false,
        html! {
            main class="container narrow" {
                h1 { "Sign in" }
                p class="lead" {
                    "Paste your incident API token. It is verified against the API and kept only for this session."
                }

                @if let Some(msg) = error {
                    div class="toast toast-error" { (msg) }
                }

                form method="post" action="/login" class="card" {
                    label for="api_token" { "API token" }
                    input
                        type="password"
                        id="api_token"
                        name="api_token"
                        autocomplete="off"
                        required;

                    button type="submit" class="primary" { "Sign in" }
                }
            }
        },
    )
}

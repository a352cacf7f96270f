use maud::{html, Markup, DOCTYPE};

pub fn desktop_layout(title: &str, signed_in: bool, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " – Incident Desk" }
                link rel="icon" href="/static/favicon/favicon.ico";
                link rel="stylesheet" href="/static/main.css";
                script src="/static/htmx.js" defer {};
            }
            body {
                header class="flex items-center justify-between px-6 py-3 shadow" {
                    h3 { "Incident Desk" }
                    nav {
                        ul {
                            li { a href="/incidents" { "Incidents" } }
                            @if signed_in {
                                li { a href="/incidents/export" { "Export" } }
                            }
                        }
                    }
                    @if signed_in {
                        form action="/logout" method="post" style="margin: 0;" {
                            button type="submit" class="linklike" { "Log out" }
                        }
                    } @else {
                        a href="/login" { "Log in" }
                    }
                }
                (content)
            }
        }
    }
}

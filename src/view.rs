//! HTML screens.
//!
//! One full page per [`Screen`], rendered with [maud](https://maud.lambda.xyz/)
//! from the current [`SessionState`]. Pages hold no client-side state: every
//! button is a small form that POSTs an action and gets redirected back to
//! `/`, so the view is always recomputed from the session.
//!
//! ## Pages
//!
//! - **start**: catalog size, load warning, start button
//! - **checking**: progress bar, product image, skip/order buttons
//! - **ordering**: quantity form, confirm/cancel buttons
//! - **summary**: order table, PDF download, share link, restart button
//!
//! The stylesheet `static/style.css` is embedded at compile time.

use crate::session::{Action, Screen, SessionState};
use maud::{DOCTYPE, Markup, html};

const CSS: &str = include_str!("../static/style.css");

pub const APP_TITLE: &str = "Stock review";

/// Values the session alone cannot answer.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    /// Whether the current product has an image that decodes.
    pub has_image: bool,
    /// Prefilled chat link for the summary screen.
    pub share_link: String,
}

/// Render the page for the session's current screen.
pub fn render_page(state: &SessionState, ctx: &PageContext) -> Markup {
    let content = match state.screen {
        Screen::Start => render_start(state),
        Screen::Checking => render_checking(state, ctx),
        Screen::Ordering => render_ordering(state),
        Screen::Summary => render_summary(state, ctx),
    };
    base_document(APP_TITLE, content)
}

fn base_document(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (CSS) }
            }
            body {
                h1 { (title) }
                (content)
            }
        }
    }
}

/// A single-button form posting to `action`.
fn action_button(action: &str, label: &str, primary: bool, enabled: bool) -> Markup {
    html! {
        form method="post" action=(action) {
            button type="submit" class=[primary.then_some("primary")] disabled[!enabled] {
                (label)
            }
        }
    }
}

fn render_start(state: &SessionState) -> Markup {
    let can_start = state.accepts(&Action::Start);
    html! {
        div class="notice info" { "Get ready for a quick stock check." }
        @if let Some(warning) = &state.catalog.warning {
            div class="notice warning" { (warning.to_string()) }
        }
        p { "Products in catalog: " strong { (state.catalog.len()) } }
        div class="actions single" {
            (action_button("/start", "Start review", true, can_start))
        }
        @if !can_start {
            p class="muted" { "Add products to the catalog file to begin." }
        }
    }
}

fn render_checking(state: &SessionState, ctx: &PageContext) -> Markup {
    let Some(product) = state.current_product() else {
        return html! {};
    };
    let (position, total) = state.progress();
    html! {
        @if let Some(line) = &state.last_confirmed {
            div class="notice success" {
                "Added: " (line.name) " (" (line.quantity) ")"
            }
        }
        progress value=(position) max=(total) {}
        p class="muted" { "Product " (position) " of " (total) }
        @if ctx.has_image {
            img class="product-image"
                src=(format!("/product/{}/image", state.index))
                alt=(product.name);
        } @else {
            div class="image-placeholder" { "No image" }
        }
        h2 { (product.name) }
        p class="muted" {
            "Category: " (product.category) " | Unit: " (product.unit)
        }
        div class="actions" {
            (action_button("/skip", "We have it", false, true))
            (action_button("/order", "Need it", true, true))
        }
    }
}

fn render_ordering(state: &SessionState) -> Markup {
    let Some(product) = state.current_product() else {
        return html! {};
    };
    html! {
        h2 { "How many: " (product.name) "?" }
        p { "Unit: " strong { (product.unit) } }
        form id="confirm-form" method="post" action="/confirm" {
            label for="quantity" { "Quantity:" }
            input id="quantity" type="number" name="quantity"
                min="1" step="1" value="1" required autofocus;
        }
        div class="actions" {
            (action_button("/cancel", "Back", false, true))
            button type="submit" form="confirm-form" class="primary" { "Confirm" }
        }
    }
}

fn render_summary(state: &SessionState, ctx: &PageContext) -> Markup {
    html! {
        div class="notice success" { "Review complete!" }
        h2 { "Your order list" }
        @if state.orders.is_empty() {
            div class="notice warning" { "The order list is empty. Nothing was selected." }
        } @else {
            table class="orders" {
                thead {
                    tr { th { "Product" } th { "Quantity" } th { "Unit" } }
                }
                tbody {
                    @for line in &state.orders {
                        tr {
                            td { (line.name) }
                            td class="quantity" { (line.quantity) }
                            td { (line.unit) }
                        }
                    }
                }
            }
            h2 { "Send the order" }
            div class="notice info" {
                "Step 1: download the PDF. Step 2: open the chat and attach the file."
            }
            div class="actions" {
                a class="button" href="/order.pdf" download { "Download PDF" }
                a class="button share-button" href=(ctx.share_link)
                    target="_blank" rel="noopener" { "Open chat" }
            }
        }
        div class="actions single" {
            (action_button("/restart", "Start over", false, true))
        }
    }
}

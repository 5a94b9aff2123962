//! Prefilled messaging links.
//!
//! Builds `wa.me` click-to-chat links. With a recipient the link opens that
//! chat directly; without one the app asks the user to pick a contact.

use crate::config::DATE_PLACEHOLDER;
use chrono::NaiveDate;

const SHARE_BASE: &str = "https://wa.me/";

/// Fill the `{date}` placeholder of a message template with `DD-MM-YYYY`.
pub fn share_message(template: &str, date: NaiveDate) -> String {
    template.replace(DATE_PLACEHOLDER, &date.format("%d-%m-%Y").to_string())
}

/// Build `https://wa.me/[<recipient>]?text=<percent-encoded message>`.
///
/// An empty recipient is treated the same as `None`.
pub fn build_share_link(message: &str, recipient: Option<&str>) -> String {
    let encoded = urlencoding::encode(message);
    match recipient.map(str::trim).filter(|r| !r.is_empty()) {
        Some(number) => format!("{SHARE_BASE}{number}?text={encoded}"),
        None => format!("{SHARE_BASE}?text={encoded}"),
    }
}

//! # Stock Review
//!
//! A phone-friendly stock check. The product catalog lives in a spreadsheet;
//! the app walks it one product at a time, collects quantities for whatever
//! needs ordering, and hands back the order as a PDF plus a prefilled chat
//! link.
//!
//! # Architecture
//!
//! ```text
//! catalog file  →  Catalog  →  SessionState  →  order lines  →  PDF / share link
//!                                   ↑
//!                     Action (one per button press)
//! ```
//!
//! The review itself is a pure state machine ([`session`]): each button press
//! is an [`Action`](session::Action) applied to an owned
//! [`SessionState`](session::SessionState), producing the next state. Loading
//! files, decoding images and building the PDF all happen around it, so the
//! whole review can be tested without a server or a filesystem.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalog`] | Reads xlsx/xls/ods/csv into product records; degrades to an empty catalog with a warning |
//! | [`imaging`] | Square crop + Lanczos3 resize of product images, JPEG encoding for serving |
//! | [`session`] | Review state machine: start → checking ⇄ ordering → summary |
//! | [`export`] | Order PDF rendering, transliteration, share link building |
//! | [`view`] | Maud HTML for each screen |
//! | [`server`] | Axum routes holding the session, serving images and the PDF |
//! | [`config`] | `stock-review.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI output for `check` |
//!
//! # Design Decisions
//!
//! ## Server-Rendered Screens
//!
//! Every screen is plain HTML rendered from the session on `GET /`, and every
//! button is a form POST followed by a redirect. The phone needs no
//! JavaScript, and reloading the page never replays an action.
//!
//! ## Standard PDF Fonts
//!
//! The order document uses the built-in Helvetica fonts, so nothing has to be
//! embedded or shipped. Text outside their single-byte encoding is
//! transliterated (`ż` → `z`) or dropped rather than failing the export.

pub mod catalog;
pub mod config;
pub mod export;
pub mod imaging;
pub mod output;
pub mod server;
pub mod session;
pub mod view;

#[cfg(test)]
pub(crate) mod test_helpers;

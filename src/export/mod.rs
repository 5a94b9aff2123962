//! Order export: the PDF document and the share link.
//!
//! | Output | Function |
//! |---|---|
//! | PDF bytes | [`render_document`] |
//! | Download name | [`document_filename`] |
//! | Chat link | [`build_share_link`] + [`share_message`] |

pub mod pdf;
pub mod share;
pub mod transliterate;

pub use pdf::{ExportError, document_filename, document_title, render_document};
pub use share::{build_share_link, share_message};
pub use transliterate::transliterate;

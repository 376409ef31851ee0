//! Page extraction utilities.
//!
//! - Streaming tag-event extractor (`extract`) for title, h1/h2 and links
//! - Result type, list caps and JSON rendering (`summary`)
//! - Raw markup persistence (`snapshot`)

pub mod extract;
pub mod snapshot;
pub mod summary;

pub use extract::{CaptureMode, Extractor, PendingLink, TagEvent, extract, normalize};
pub use snapshot::save_raw_html;
pub use pagesum_common::Limits;
pub use summary::{NavLink, PageSummary};

use pagesum_common::Limits;
use serde::Serialize;

/// One anchor with an `href` and non-empty normalized text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub href: String,
    pub text: String,
}

/// Everything the extractor collects from one page.
///
/// Field order is the JSON key order: `title`, `h1`, `h2`, `nav_links`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub title: String,
    pub h1: Vec<String>,
    pub h2: Vec<String>,
    pub nav_links: Vec<NavLink>,
}

impl PageSummary {
    /// Keep the first entries of each list, in document order.
    pub fn truncate(&mut self, limits: Limits) {
        self.h1.truncate(limits.h1);
        self.h2.truncate(limits.h2);
        self.nav_links.truncate(limits.nav_links);
    }

    /// Two-space indented JSON with non-ASCII characters written as-is.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

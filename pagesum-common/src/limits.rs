use serde::Deserialize;

/// Caps applied to each summary list before it is printed.
///
/// ```
/// use pagesum_common::Limits;
///
/// let limits = Limits::default();
/// assert_eq!((limits.h1, limits.h2, limits.nav_links), (5, 15, 30));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub h1: usize,
    pub h2: usize,
    pub nav_links: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            h1: 5,
            h2: 15,
            nav_links: 30,
        }
    }
}

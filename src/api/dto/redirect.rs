//! Query flags accepted by the redirect endpoint.

use serde::Deserialize;

/// Optional click attribution flags, e.g. `/r/abc?conversion=1`.
///
/// Values are kept as strings so an unexpected value never fails the redirect.
#[derive(Debug, Default, Deserialize)]
pub struct RedirectQuery {
    pub conversion: Option<String>,
    pub high_value: Option<String>,
}

impl RedirectQuery {
    pub fn conversion(&self) -> bool {
        is_truthy(self.conversion.as_deref())
    }

    pub fn high_value(&self) -> bool {
        is_truthy(self.high_value.as_deref())
    }
}

fn is_truthy(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}

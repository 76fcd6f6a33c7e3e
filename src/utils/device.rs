//! Device type classification from the user-agent.

use woothee::parser::Parser;

/// Device type stored with each click.
///
/// Returns `None` for empty or unclassifiable user-agents; analytics groups
/// those under `"unknown"`.
pub fn device_type(user_agent: &str) -> Option<&'static str> {
    if user_agent.trim().is_empty() {
        return None;
    }

    let parsed = Parser::new().parse(user_agent)?;

    match parsed.category {
        "pc" => Some("desktop"),
        "smartphone" | "mobilephone" => Some("mobile"),
        "crawler" => Some("bot"),
        "appliance" => Some("appliance"),
        _ => None,
    }
}

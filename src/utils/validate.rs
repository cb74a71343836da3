//! Discord snowflake validation for id inputs.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::traits::{DisplaySurface, ToastKind};

/// Discord snowflakes are 17 to 19 ASCII digits.
static SNOWFLAKE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{17,19}$").expect("Invalid snowflake regex"));

pub fn validate_channel_id(id: &str) -> bool {
    SNOWFLAKE_REGEX.is_match(id)
}

pub fn validate_role_id(id: &str) -> bool {
    SNOWFLAKE_REGEX.is_match(id)
}

/// Validate an id input when it loses focus.
///
/// Fields whose id contains `channel` or `role` are checked against the
/// snowflake format; an empty value is accepted. An invalid value shows a
/// warning toast. Returns whether the value is acceptable.
pub fn check_id_field(field_id: &str, value: &str, surface: &dyn DisplaySurface) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return true;
    }

    let (valid, message) = if field_id.contains("channel") {
        (validate_channel_id(value), "Invalid channel ID format")
    } else if field_id.contains("role") {
        (validate_role_id(value), "Invalid role ID format")
    } else {
        return true;
    };

    if !valid {
        debug!(field = field_id, value, "Rejected id input");
        surface.show_toast(message, ToastKind::Warning);
    }
    valid
}

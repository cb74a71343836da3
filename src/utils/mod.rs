//! Small helpers shared by the controller, the request helper and the
//! dashboard's input handlers.

pub mod format;
pub mod text;
pub mod timing;
pub mod validate;

pub use format::{
    capitalize_first, format_count, format_date, format_datetime, format_json_number, format_number,
};
pub use text::{escape_html, parse_discord_mentions};
pub use timing::{Debouncer, Throttle};
pub use validate::{check_id_field, validate_channel_id, validate_role_id};

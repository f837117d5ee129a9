//! Helpers for handling service-provided strings in the terminal: text
//! sanitising and truncation, and link validation before opening.

mod link;
mod text;

pub use link::{validate_link_for_open, LinkError};
pub use text::{single_line, strip_control_chars, strip_html_tags, truncate_to_width};

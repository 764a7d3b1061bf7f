//! Terminal output utilities.
//!
//! Provides formatting helpers for terminal output.

use crate::models::SubnetPurpose;
use colored::{ColoredString, Colorize};

/// Format a value as a quoted, right-aligned field.
///
/// # Arguments
/// * `value` - The value to format
/// * `width` - The minimum width of the field
///
/// # Returns
/// A quoted, right-aligned string
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let value_str = value.to_string();
    let quoted = format!("\"{value_str}\"");
    let quoted_len = quoted.len();

    if quoted_len >= width {
        quoted
    } else {
        format!("{quoted:>width$}")
    }
}

/// Purpose word colored by exposure: public green, private blue.
pub fn purpose_label(purpose: &SubnetPurpose) -> ColoredString {
    let label = purpose.to_string();
    match purpose {
        SubnetPurpose::Utility => label.yellow(),
        SubnetPurpose::Public => label.green(),
        SubnetPurpose::Private(_) => label.blue(),
    }
}

/// One-line verdict for the `validate` command.
pub fn verdict(ok: bool, message: &str) -> String {
    if ok {
        format!("{} {message}", "OK".on_green())
    } else {
        format!("{} {message}", "FAILED".on_red())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DeployColor;

    #[test]
    fn test_format_field_short() {
        assert_eq!(format_field("test", 10), "    \"test\"");
    }

    #[test]
    fn test_format_field_exact() {
        assert_eq!(format_field("test", 6), "\"test\"");
    }

    #[test]
    fn test_format_field_long() {
        assert_eq!(format_field("10.20.16.0/24", 5), "\"10.20.16.0/24\"");
    }

    #[test]
    fn test_format_field_number() {
        assert_eq!(format_field(251, 6), " \"251\"");
    }

    #[test]
    fn test_purpose_label_keeps_text() {
        colored::control::set_override(false);
        let blue = SubnetPurpose::Private(DeployColor::new("blue"));
        assert_eq!(purpose_label(&blue).to_string(), "private/blue");
        assert!(verdict(true, "dev").ends_with("OK dev"));
        assert!(verdict(false, "dev").starts_with("FAILED"));
    }
}

//! Field length and presence rules applied before any write.

use crate::error::FieldErrors;

pub const BOARD_NAME_MAX: usize = 255;
pub const BOARD_DESCRIPTION_MAX: usize = 1000;
pub const COLUMN_NAME_MAX: usize = 255;
pub const CARD_TITLE_MAX: usize = 255;
pub const CARD_DESCRIPTION_MAX: usize = 50_000;
pub const COMMENT_CONTENT_MAX: usize = 1000;

/// Records an error when `value` is blank or longer than `max` characters.
pub fn required(errors: &mut FieldErrors, field: &str, label: &str, value: &str, max: usize) {
    if value.trim().is_empty() {
        errors.add(field, format!("The {} field is required.", label));
    } else {
        max_length(errors, field, label, value, max);
    }
}

pub fn optional(errors: &mut FieldErrors, field: &str, label: &str, value: Option<&str>, max: usize) {
    if let Some(value) = value {
        max_length(errors, field, label, value, max);
    }
}

fn max_length(errors: &mut FieldErrors, field: &str, label: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.add(
            field,
            format!("The {} may not be greater than {} characters.", label, max),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_required_value_is_rejected() {
        let mut errors = FieldErrors::new();
        required(&mut errors, "name", "name", "   ", BOARD_NAME_MAX);
        assert_eq!(
            errors.get("name"),
            Some(&["The name field is required.".to_string()][..])
        );
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let mut errors = FieldErrors::new();
        let title = "é".repeat(CARD_TITLE_MAX);
        required(&mut errors, "title", "title", &title, CARD_TITLE_MAX);
        assert!(errors.is_empty());

        required(&mut errors, "title", "title", &format!("{}x", title), CARD_TITLE_MAX);
        assert!(errors.contains("title"));
    }

    #[test]
    fn absent_optional_value_passes() {
        let mut errors = FieldErrors::new();
        optional(&mut errors, "description", "description", None, BOARD_DESCRIPTION_MAX);
        optional(
            &mut errors,
            "description",
            "description",
            Some(&"x".repeat(BOARD_DESCRIPTION_MAX + 1)),
            BOARD_DESCRIPTION_MAX,
        );
        assert_eq!(errors.get("description").map(|m| m.len()), Some(1));
    }
}

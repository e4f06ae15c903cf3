//! Validation Utilities
//!
//! Field validators shared by the form DTOs, and conversion of
//! `validator` failures into field-level [`AppError::Validation`] errors.

use std::borrow::Cow;

use validator::{ValidationError, ValidationErrors};

use super::error::{AppError, FieldError};

/// File extensions accepted for post attachments.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpe", "jpeg", "png", "gif", "svg", "bmp"];

/// Convert validation errors to AppError
pub fn validation_error(errors: ValidationErrors) -> AppError {
    let mut field_errors: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| FieldError {
                field: field.to_string(),
                message: e
                    .message
                    .clone()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Invalid value".into()),
            })
        })
        .collect();

    // HashMap order is arbitrary; keep responses stable.
    field_errors.sort_by(|a, b| a.field.cmp(&b.field));

    AppError::Validation(field_errors)
}

/// Names may only contain printable ASCII and no slashes.
pub fn is_valid_name(text: &str) -> bool {
    text.chars().all(|ch| (' '..='~').contains(&ch) && ch != '/')
}

/// `validator` hook for chat names and usernames.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(ValidationError::new("name").with_message(Cow::Borrowed(
            "Name must contain only ASCII printable characters",
        )))
    }
}

/// `validator` hook for mandatory names: present and charset-valid.
pub fn validate_required_name(name: &str) -> Result<(), ValidationError> {
    validate_required(name)?;
    validate_name(name)
}

/// `validator` hook rejecting empty or whitespace-only input.
pub fn validate_required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("required").with_message(Cow::Borrowed("This field is required.")))
    } else {
        Ok(())
    }
}

/// Whether an uploaded filename carries an accepted image extension.
pub fn is_image_filename(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

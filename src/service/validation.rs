//! Field validation shared by provisioning and login.

use rust_decimal::Decimal;

/// The one failure kind callers see for bad input.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub const MOBILE_NUMBER_MAX_LENGTH: usize = 15;
/// Width of every free-text column.
pub const TEXT_MAX_LENGTH: usize = 255;
/// Fractional digits kept by the coordinate columns.
pub const COORDINATE_MAX_SCALE: u32 = 6;
pub const LATITUDE_LIMIT: i64 = 90;
pub const LONGITUDE_LIMIT: i64 = 180;

/// Rejects anything that is not all digits, then strips non-digits.
///
/// The strip is a no-op once the first check passed; it is kept so the
/// returned value is digits-only even if the check is ever relaxed.
pub fn validate_mobile_number(mobile_number: &str) -> Result<String, ValidationError> {
    if mobile_number.is_empty() || !mobile_number.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(ValidationError::new(
            "Mobile number must contain only digits.",
        ));
    }

    let cleaned: String = mobile_number
        .chars()
        .filter(|ch| ch.is_ascii_digit())
        .collect();

    Ok(cleaned)
}

/// Trims and lower-cases an email address.
pub fn normalize_email(email: &str) -> Result<String, ValidationError> {
    let value = email.trim().to_lowercase();
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(ValidationError::new("Enter a valid email address."));
    }
    Ok(value)
}

/// Length is counted in characters, as the column does.
pub fn check_text_length(field: &str, value: Option<&str>) -> Result<(), ValidationError> {
    match value {
        Some(value) if value.chars().count() > TEXT_MAX_LENGTH => Err(ValidationError::new(
            format!("Ensure {field} has at most {TEXT_MAX_LENGTH} characters."),
        )),
        _ => Ok(()),
    }
}

/// Bounds a latitude or longitude to `[-limit, limit]` and six decimal places.
pub fn check_coordinate(
    field: &str,
    value: Option<Decimal>,
    limit: i64,
) -> Result<(), ValidationError> {
    let Some(value) = value else {
        return Ok(());
    };
    if value.abs() > Decimal::from(limit) {
        return Err(ValidationError::new(format!(
            "Ensure {field} is between -{limit} and {limit}."
        )));
    }
    if value.normalize().scale() > COORDINATE_MAX_SCALE {
        return Err(ValidationError::new(format!(
            "Ensure {field} has no more than {COORDINATE_MAX_SCALE} decimal places."
        )));
    }
    Ok(())
}

/// Blank strings count as absent.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

use crate::errors::AppError;

/// Normalizes a US phone number to E.164 (`+1XXXXXXXXXX`).
///
/// Formatting characters are dropped, then a single leading `+1` (or bare
/// `1`) country code is stripped. Exactly ten digits must remain.
pub fn normalize_phone_number(raw: &str) -> Result<String, AppError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();

    let national = cleaned
        .strip_prefix("+1")
        .or_else(|| cleaned.strip_prefix('1'))
        .unwrap_or(&cleaned);

    if national.len() != 10 || !national.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(
            "Phone number must be a valid 10-digit US number".to_string(),
        ));
    }

    Ok(format!("+1{national}"))
}

/// Accepts exactly six ASCII digits.
pub fn validate_verification_code(code: &str) -> Result<&str, AppError> {
    if code.len() == 6 && code.chars().all(|c| c.is_ascii_digit()) {
        Ok(code)
    } else {
        Err(AppError::Validation(
            "Verification code must be 6 digits".to_string(),
        ))
    }
}

//! User account rules shared by sign-in, password reset and provisioning.

use crate::error::CoreError;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Lifetime of a password reset token, in minutes.
pub const RESET_TOKEN_TTL_MINS: i64 = 60;

/// Canonical form of an email address: trimmed and lowercased.
///
/// Emails are unique per user and compared in this form.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Check a new password and its confirmation.
pub fn validate_new_password(password: &str, confirm: &str) -> Result<(), CoreError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CoreError::invalid(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters long"),
        ));
    }
    if password != confirm {
        return Err(CoreError::invalid(
            "confirmPassword",
            "Passwords do not match",
        ));
    }
    Ok(())
}

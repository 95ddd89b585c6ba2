use validator::ValidateEmail;

use crate::{error::AppError, output, profile::ProfileStore};

/// Maximum length for user alias
const MAX_ALIAS_LENGTH: usize = 30;
/// Maximum length for Git username
const MAX_USER_LENGTH: usize = 100;
/// Maximum length for Git email address
const MAX_EMAIL_LENGTH: usize = 254;
/// Alias reserved for leaving a sub-menu
pub const BACK_OPTION: &str = "back";

/// Source of free-text answers, so the re-prompt loop can be driven in tests
pub trait LineSource {
    fn read_line(&mut self, prompt_message: &str) -> Result<String, AppError>;
}

/// Prompts user for input until valid input is provided.
///
/// Validation failures are printed and the question is asked again; any other
/// error (Escape, Ctrl-C, terminal failure) is returned to the caller.
pub fn prompt_until_valid<S, F>(
    source: &mut S,
    prompt_message: &str,
    input_validation: F,
) -> Result<String, AppError>
where
    S: LineSource + ?Sized,
    F: Fn(&str) -> Result<(), AppError>,
{
    loop {
        let input = source.read_line(prompt_message)?;
        let input = input.trim();
        match input_validation(input) {
            Ok(()) => break Ok(input.to_string()),
            Err(e @ (AppError::InvalidInput(_) | AppError::DuplicateAlias(_))) => {
                output::warn(&e.to_string())
            }
            Err(e) => return Err(e),
        }
    }
}

/// Validates an alias against the field rules and the existing store
pub fn validate_alias(alias: &str, existing: &ProfileStore) -> Result<(), AppError> {
    validate_alias_format(alias)?;
    if existing.contains(alias) {
        Err(AppError::DuplicateAlias(alias.to_string()))
    } else {
        Ok(())
    }
}

/// Alias field rules alone, without the uniqueness check
pub fn validate_alias_format(alias: &str) -> Result<(), AppError> {
    if alias.trim().is_empty() {
        Err(AppError::InvalidInput("alias cannot be empty".to_string()))
    } else if alias.chars().count() > MAX_ALIAS_LENGTH {
        Err(AppError::InvalidInput(format!(
            "alias too long (max {MAX_ALIAS_LENGTH} characters)"
        )))
    } else if alias.chars().any(char::is_whitespace) {
        Err(AppError::InvalidInput(
            "alias cannot contain spaces".to_string(),
        ))
    } else if alias == BACK_OPTION {
        Err(AppError::InvalidInput(format!(
            "alias cannot be '{BACK_OPTION}'"
        )))
    } else {
        Ok(())
    }
}

/// Validates username input
pub fn validate_user(user: &str) -> Result<(), AppError> {
    if user.trim().is_empty() {
        Err(AppError::InvalidInput("username cannot be empty".to_string()))
    } else if user.chars().count() > MAX_USER_LENGTH {
        Err(AppError::InvalidInput(format!(
            "username too long (max {MAX_USER_LENGTH} characters)"
        )))
    } else {
        Ok(())
    }
}

/// Validates email input
pub fn validate_email(email: &str) -> Result<(), AppError> {
    if email.trim().is_empty() {
        Err(AppError::InvalidInput("email cannot be empty".to_string()))
    } else if email.len() > MAX_EMAIL_LENGTH {
        Err(AppError::InvalidInput(format!(
            "email too long (max {MAX_EMAIL_LENGTH} characters)"
        )))
    } else if !email.validate_email() {
        Err(AppError::InvalidInput(format!(
            "'{email}' is not a valid email address"
        )))
    } else {
        Ok(())
    }
}

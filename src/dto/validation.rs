//! Validation helpers for DTOs.

use validator::ValidationError;

/// Longest identifier accepted for matches and participants.
const MAX_ID_LENGTH: usize = 64;

/// Validates an external match reference: 1 to 64 ASCII letters, digits, `-`, `_`, `.` or `:`.
///
/// The id ends up in storage document keys, hence the restricted alphabet.
///
/// # Examples
///
/// ```ignore
/// validate_match_id("t42-r1-m3") // Ok
/// validate_match_id("t42/r1")    // Err - slash
/// validate_match_id("")          // Err - empty
/// ```
pub fn validate_match_id(id: &str) -> Result<(), ValidationError> {
    validate_length(id, "match_id_length")?;

    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
    {
        let mut err = ValidationError::new("match_id_format");
        err.message = Some(
            "Match ID may only contain ASCII letters, digits, '-', '_', '.' and ':'".into(),
        );
        return Err(err);
    }

    Ok(())
}

/// Validates a participant identifier: 1 to 64 characters, no surrounding whitespace.
pub fn validate_participant_id(id: &str) -> Result<(), ValidationError> {
    validate_length(id, "participant_id_length")?;

    if id.trim() != id {
        let mut err = ValidationError::new("participant_id_format");
        err.message = Some("Participant ID must not start or end with whitespace".into());
        return Err(err);
    }

    Ok(())
}

fn validate_length(id: &str, code: &'static str) -> Result<(), ValidationError> {
    let len = id.chars().count();
    if len == 0 || len > MAX_ID_LENGTH {
        let mut err = ValidationError::new(code);
        err.message = Some(
            format!("ID must be between 1 and {MAX_ID_LENGTH} characters (got {len})").into(),
        );
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_match_id_valid() {
        assert!(validate_match_id("t42-r1-m3").is_ok());
        assert!(validate_match_id("challenge_7").is_ok());
        assert!(validate_match_id("club:2024.final").is_ok());
    }

    #[test]
    fn test_validate_match_id_invalid() {
        assert!(validate_match_id("").is_err());
        assert!(validate_match_id("t42/r1").is_err());
        assert!(validate_match_id("with space").is_err());
        assert!(validate_match_id(&"m".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_participant_id() {
        assert!(validate_participant_id("Ana Ivanović").is_ok());
        assert!(validate_participant_id("").is_err());
        assert!(validate_participant_id(" bob").is_err());
        assert!(validate_participant_id("bob\n").is_err());
    }
}

//! Input checks applied before languages and vocabulary are stored.
use crate::error::{Error, Result};
use crate::models::{NewLanguage, NewVocabulary};

pub fn validate_not_empty(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{} cannot be empty", field)));
    }
    Ok(())
}

/// Length is counted in characters after trimming.
pub fn validate_string_length(value: &str, field: &str, min: usize, max: usize) -> Result<()> {
    let len = value.trim().chars().count();
    if len < min {
        return Err(Error::Validation(format!(
            "{} must be at least {} characters",
            field, min
        )));
    }
    if len > max {
        return Err(Error::Validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

pub fn validate_language_code(code: &str) -> Result<()> {
    validate_not_empty(code, "Language code")?;
    let code = code.trim();
    if code.len() < 2 || code.len() > 5 {
        return Err(Error::Validation(
            "Language code must be between 2 and 5 characters".to_string(),
        ));
    }
    if !code.chars().all(|c| c.is_ascii_alphabetic() || c == '-') {
        return Err(Error::Validation(
            "Language code must contain only letters and hyphens".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_difficulty_level(level: i32) -> Result<()> {
    if !(1..=5).contains(&level) {
        return Err(Error::Validation(
            "Difficulty level must be between 1 and 5".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_language(req: &NewLanguage) -> Result<()> {
    validate_not_empty(&req.name, "Language name")?;
    validate_string_length(&req.name, "Language name", 1, 50)?;
    validate_language_code(&req.code)?;
    validate_not_empty(&req.flag_emoji, "Flag emoji")
}

pub fn validate_vocabulary(req: &NewVocabulary) -> Result<()> {
    validate_not_empty(&req.word, "Word")?;
    validate_string_length(&req.word, "Word", 1, 200)?;
    validate_not_empty(&req.translation, "Translation")?;
    validate_string_length(&req.translation, "Translation", 1, 500)?;
    validate_difficulty_level(req.difficulty_level)
}

pub fn sanitize_string(value: String) -> String {
    value.trim().to_string()
}

/// Trims the value; blank strings become `None`.
pub fn sanitize_optional_string(value: Option<String>) -> Option<String> {
    value.map(sanitize_string).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_code() {
        assert!(validate_language_code("pl").is_ok());
        assert!(validate_language_code("pt-BR").is_ok());
        assert!(validate_language_code("p").is_err());
        assert!(validate_language_code("polish").is_err());
        assert!(validate_language_code("p1").is_err());
    }

    #[test]
    fn test_string_length_counts_characters() {
        let word = "ż".repeat(200);
        assert!(validate_string_length(&word, "Word", 1, 200).is_ok());
        assert!(validate_string_length(&format!("{}a", word), "Word", 1, 200).is_err());
    }

    #[test]
    fn test_vocabulary_rules() {
        let mut req = NewVocabulary::new(1, "dom", "house");
        assert!(validate_vocabulary(&req).is_ok());

        req.translation = " ".to_string();
        assert!(matches!(validate_vocabulary(&req), Err(Error::Validation(_))));

        req.translation = "house".to_string();
        req.difficulty_level = 0;
        assert!(validate_vocabulary(&req).is_err());
    }

    #[test]
    fn test_sanitize_optional_string() {
        assert_eq!(sanitize_optional_string(Some("  x ".to_string())), Some("x".to_string()));
        assert_eq!(sanitize_optional_string(Some("   ".to_string())), None);
        assert_eq!(sanitize_optional_string(None), None);
    }
}

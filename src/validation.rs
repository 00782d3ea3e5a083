//! Input rules shared by the HTTP and CLI write paths
//!
//! Anything accepted here survives a round trip through the dictionary
//! file: `:` and line breaks are rejected along with the other special
//! characters.

use thiserror::Error;

/// Characters rejected in both words and definitions
const SPECIAL_CHARACTERS: &str = "~!@#$%^&*()-+={}[]|;:'\",.<>?/";

const MIN_WORD_LEN: usize = 3;
const MIN_DEFINITION_LEN: usize = 5;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error(
        "invalid data: Word and definition must be at least 3 and 5 characters long, respectively"
    )]
    TooShort,

    #[error("invalid data: Word and definition must not contain special characters")]
    SpecialCharacters,
}

/// Check a word/definition pair before it is handed to the dictionary
pub fn validate_entry(word: &str, definition: &str) -> Result<(), ValidationError> {
    if word.chars().count() < MIN_WORD_LEN || definition.chars().count() < MIN_DEFINITION_LEN {
        return Err(ValidationError::TooShort);
    }

    if contains_special_characters(word) || contains_special_characters(definition) {
        return Err(ValidationError::SpecialCharacters);
    }

    Ok(())
}

fn contains_special_characters(s: &str) -> bool {
    s.chars()
        .any(|c| SPECIAL_CHARACTERS.contains(c) || c == '\n' || c == '\r')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_entry_valid() {
        assert_eq!(validate_entry("valid_word", "valid_definition"), Ok(()));
        assert_eq!(validate_entry("cat", "a small feline"), Ok(()));
    }

    #[test]
    fn test_validate_entry_too_short() {
        assert_eq!(validate_entry("sh", "def"), Err(ValidationError::TooShort));
        assert_eq!(validate_entry("cat", "tiny"), Err(ValidationError::TooShort));
    }

    #[test]
    fn test_validate_entry_special_characters() {
        assert_eq!(
            validate_entry("cat!", "a small feline"),
            Err(ValidationError::SpecialCharacters)
        );
        assert_eq!(
            validate_entry("ratio", "three: four"),
            Err(ValidationError::SpecialCharacters)
        );
        assert_eq!(
            validate_entry("cat", "a small\nfeline"),
            Err(ValidationError::SpecialCharacters)
        );
    }

    #[test]
    fn test_validate_entry_rejects_unencodable_input() {
        assert_eq!(
            validate_entry("a:b", "definition here"),
            Err(ValidationError::SpecialCharacters)
        );
        assert_eq!(
            validate_entry("cat", "a small\r\nfeline"),
            Err(ValidationError::SpecialCharacters)
        );
        assert_eq!(
            validate_entry("line\nbreak", "a definition"),
            Err(ValidationError::SpecialCharacters)
        );
    }

    #[test]
    fn test_validate_counts_characters_not_bytes() {
        assert_eq!(validate_entry("né", "short"), Err(ValidationError::TooShort));
        assert_eq!(validate_entry("café", "a coffee house"), Ok(()));
    }
}

use super::error_codes::ErrorCode;

/// Trims, truncates to 20 characters, and rejects an empty result.
pub fn validate_player_name(raw: &str) -> Result<String, ErrorCode> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ErrorCode::InvalidName);
    }

    let truncated: String = trimmed.chars().take(20).collect();
    Ok(truncated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_whitespace() {
        assert_eq!(validate_player_name("  Alice  ").unwrap(), "Alice");
    }

    #[test]
    fn truncates_to_twenty_chars() {
        let name = validate_player_name("a".repeat(30).as_str()).unwrap();
        assert_eq!(name.chars().count(), 20);
    }

    #[test]
    fn rejects_empty_after_trim() {
        assert_eq!(validate_player_name("   ").unwrap_err(), ErrorCode::InvalidName);
    }

    #[test]
    fn rejects_empty_string() {
        assert_eq!(validate_player_name("").unwrap_err(), ErrorCode::InvalidName);
    }
}

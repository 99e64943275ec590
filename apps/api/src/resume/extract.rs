use crate::errors::AppError;

/// Extracts plain text from an uploaded PDF.
/// Rejects files with no extractable text.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, AppError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| AppError::Validation(format!("Failed to extract PDF text: {e}")))?;

    let cleaned = sanitize_text(&text);
    if cleaned.is_empty() {
        return Err(AppError::Validation(
            "The PDF contains no extractable text".to_string(),
        ));
    }
    Ok(cleaned)
}

/// Drops NUL bytes and blanks other C0 control characters (keeping tab,
/// newline and carriage return) so the text is safe to store in Postgres.
pub fn sanitize_text(text: &str) -> String {
    text.chars()
        .filter(|c| *c != '\0')
        .map(|c| match c {
            '\u{01}'..='\u{08}' | '\u{0B}' | '\u{0C}' | '\u{0E}'..='\u{1F}' => ' ',
            other => other,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// First `max_chars` characters followed by an ellipsis.
pub fn preview(text: &str, max_chars: usize) -> String {
    let head: String = text.chars().take(max_chars).collect();
    format!("{head}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_nul_and_control_chars() {
        let raw = "\u{0}Jane\u{7}Doe\u{0B}Rust\tEngineer\r\n";
        assert_eq!(sanitize_text(raw), "Jane Doe Rust\tEngineer");
    }

    #[test]
    fn test_sanitize_keeps_unicode() {
        assert_eq!(sanitize_text("  Zoë — Ingeniera  "), "Zoë — Ingeniera");
    }

    #[test]
    fn test_garbage_bytes_are_rejected() {
        let err = extract_pdf_text(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_preview_is_char_safe() {
        assert_eq!(preview("ñañaña", 3), "ñañ...");
        assert_eq!(preview("ab", 500), "ab...");
    }
}

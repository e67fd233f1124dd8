//! Shared helper functions for CLI commands

use crate::core::field::FieldId;
use crate::core::record::FormRecord;

/// Truncate a string to max_len, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}

/// Display a field value, masking secrets
pub fn display_value(field: FieldId, record: &FormRecord) -> String {
    match record.get(field) {
        None => String::new(),
        Some(_) if field.is_secret() => "********".to_string(),
        Some(value) => value.to_string(),
    }
}

/// Escape a string for CSV output
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
    }

    #[test]
    fn test_display_value_masks_secrets() {
        let mut record = FormRecord::new();
        record.set(FieldId::Password, "secret1");
        record.set(FieldId::Username, "janedoe");

        assert_eq!(display_value(FieldId::Password, &record), "********");
        assert_eq!(display_value(FieldId::Username, &record), "janedoe");
        assert_eq!(display_value(FieldId::Email, &record), "");
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}

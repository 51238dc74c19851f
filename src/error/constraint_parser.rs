use std::sync::OnceLock;

use regex::Regex;

/// Extracts structured details from PostgreSQL constraint violation messages.
///
/// Constraint names follow the default PostgreSQL naming scheme
/// (`<table>_<column>_key`, `<table>_<column>_check`, `<table>_<column>_fkey`),
/// where the column part may itself contain underscores.
pub struct ConstraintParser;

struct Patterns {
    key_value: Regex,
    column_name: Regex,
    relation_name: Regex,
}

static PATTERNS: OnceLock<Option<Patterns>> = OnceLock::new();

const CONSTRAINT_SUFFIXES: &[&str] = &["_key", "_check", "_fkey", "_idx", "_not_null"];

impl ConstraintParser {
    fn patterns() -> Option<&'static Patterns> {
        PATTERNS
            .get_or_init(|| {
                Some(Patterns {
                    // "Key (email)=(someone@example.com) already exists."
                    key_value: Regex::new(r"Key \(([^)]+)\)=\(([^)]*)\)").ok()?,
                    column_name: Regex::new(r#"column "([^"]+)""#).ok()?,
                    relation_name: Regex::new(r#"(?:relation|table) "([^"]+)""#).ok()?,
                })
            })
            .as_ref()
    }

    /// Parses a unique violation into `(table, column, value)`.
    ///
    /// ```
    /// use postboard::error::ConstraintParser;
    ///
    /// let message = "duplicate key value violates unique constraint \"users_email_key\"\nDETAIL: Key (email)=(a@b.io) already exists.";
    /// let parsed = ConstraintParser::parse_unique_violation(message, Some("users_email_key"));
    /// assert_eq!(parsed, Some(("users".into(), "email".into(), "a@b.io".into())));
    /// ```
    pub fn parse_unique_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let key_value = Self::extract_key_value(message);

        if let Some((table, column)) = constraint_name.and_then(Self::parse_constraint_name) {
            let value = key_value
                .map(|(_, value)| value)
                .unwrap_or_else(|| "duplicate_value".to_string());
            return Some((table, column, value));
        }

        let (column, value) = key_value?;
        let table = Self::extract_relation(message).unwrap_or_else(|| "resource".to_string());
        Some((table, column, value))
    }

    /// Parses a not-null, check or foreign key violation into `(table, column)`.
    pub fn parse_column_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String)> {
        if let Some(parsed) = constraint_name.and_then(Self::parse_constraint_name) {
            return Some(parsed);
        }

        let column = Self::extract_column(message)
            .or_else(|| Self::extract_key_value(message).map(|(column, _)| column))?;
        let table = Self::extract_relation(message).unwrap_or_else(|| "resource".to_string());
        Some((table, column))
    }

    /// Splits a constraint name such as `posts_user_id_fkey` into
    /// `("posts", "user_id")`.
    pub fn parse_constraint_name(constraint_name: &str) -> Option<(String, String)> {
        let stem = CONSTRAINT_SUFFIXES
            .iter()
            .find_map(|suffix| constraint_name.strip_suffix(suffix))?;
        let (table, column) = stem.split_once('_')?;
        if table.is_empty() || column.is_empty() {
            return None;
        }
        Some((table.to_string(), column.to_string()))
    }

    pub fn extract_key_value(message: &str) -> Option<(String, String)> {
        let caps = Self::patterns()?.key_value.captures(message)?;
        Some((caps.get(1)?.as_str().to_string(), caps.get(2)?.as_str().to_string()))
    }

    pub fn extract_column(message: &str) -> Option<String> {
        Self::patterns()?
            .column_name
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    pub fn extract_relation(message: &str) -> Option<String> {
        Self::patterns()?
            .relation_name
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}

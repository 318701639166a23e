use regex::Regex;
use std::sync::OnceLock;

/// Utility for parsing PostgreSQL constraint violation reports.
///
/// PostgreSQL splits a violation into a primary message, an optional
/// `DETAIL` line and metadata fields (table, column, constraint). The parser
/// looks at all of them and keeps the first answer it finds.
pub struct ConstraintParser;

/// Compiled regex patterns for constraint parsing
struct RegexPatterns {
    key_value: Regex,
    column_name: Regex,
    relation_name: Regex,
}

impl RegexPatterns {
    fn new() -> Self {
        Self {
            // "Key (field)=(value)" in DETAIL lines
            key_value: Regex::new(r"Key \(([^)]+)\)=\((.*)\)").unwrap(),
            column_name: Regex::new(r#"column "([^"]+)""#).unwrap(),
            // Matches both `table "x"` and `relation "x"`
            relation_name: Regex::new(r#"(?:table|relation) "([^"]+)""#).unwrap(),
        }
    }
}

static REGEX_PATTERNS: OnceLock<RegexPatterns> = OnceLock::new();

/// Suffixes PostgreSQL appends to generated constraint names
const CONSTRAINT_SUFFIXES: [&str; 3] = ["_key", "_idx", "_pkey"];

/// Fields reported by the database alongside a violation.
#[derive(Debug, Default, Clone, Copy)]
pub struct ViolationReport<'a> {
    pub message: &'a str,
    pub details: Option<&'a str>,
    pub table_name: Option<&'a str>,
    pub column_name: Option<&'a str>,
    pub constraint_name: Option<&'a str>,
}

impl ConstraintParser {
    fn patterns() -> &'static RegexPatterns {
        REGEX_PATTERNS.get_or_init(RegexPatterns::new)
    }

    /// Parses a unique constraint violation into `(entity, field, value)`.
    ///
    /// # Examples
    /// ```
    /// use catalog_rs::error::{ConstraintParser, ViolationReport};
    ///
    /// let report = ViolationReport {
    ///     message: "duplicate key value violates unique constraint \"category_category_name_key\"",
    ///     details: Some("Key (category_name)=(Soccer) already exists."),
    ///     table_name: Some("category"),
    ///     column_name: None,
    ///     constraint_name: Some("category_category_name_key"),
    /// };
    /// assert_eq!(
    ///     ConstraintParser::parse_unique_violation(&report),
    ///     Some(("category".to_string(), "category_name".to_string(), "Soccer".to_string()))
    /// );
    /// ```
    pub fn parse_unique_violation(report: &ViolationReport<'_>) -> Option<(String, String, String)> {
        let key_value = report
            .details
            .and_then(Self::extract_key_value_from_message)
            .or_else(|| Self::extract_key_value_from_message(report.message));

        let from_constraint = report
            .constraint_name
            .and_then(|c| Self::parse_constraint_name(c, report.table_name));

        let entity = report
            .table_name
            .map(str::to_string)
            .or_else(|| from_constraint.as_ref().map(|(e, _)| e.clone()))
            .or_else(|| Self::extract_table_from_message(report.message))
            .unwrap_or_else(|| "resource".to_string());

        match (key_value, from_constraint) {
            (Some((field, value)), _) => Some((entity, field, value)),
            (None, Some((_, field))) => Some((entity, field, "duplicate_value".to_string())),
            (None, None) => None,
        }
    }

    /// Parses a not-null violation into `(entity, field)`.
    pub fn parse_not_null_violation(report: &ViolationReport<'_>) -> Option<(String, String)> {
        let field = report
            .column_name
            .map(str::to_string)
            .or_else(|| Self::extract_column_from_message(report.message))?;
        let entity = report
            .table_name
            .map(str::to_string)
            .or_else(|| Self::extract_table_from_message(report.message))
            .unwrap_or_else(|| "resource".to_string());
        Some((entity, field))
    }

    /// Splits a generated constraint name such as `category_image_url_key`
    /// into `(table, column)`.
    ///
    /// When the table is known the prefix is stripped exactly, so multi-word
    /// columns survive. Otherwise the first segment is taken as the table.
    pub fn parse_constraint_name(constraint: &str, table: Option<&str>) -> Option<(String, String)> {
        let stem = CONSTRAINT_SUFFIXES
            .iter()
            .find_map(|suffix| constraint.strip_suffix(suffix))
            .unwrap_or(constraint);

        if let Some(table) = table {
            if let Some(column) = stem
                .strip_prefix(table)
                .and_then(|rest| rest.strip_prefix('_'))
                .filter(|c| !c.is_empty())
            {
                return Some((table.to_string(), column.to_string()));
            }
        }

        let (entity, column) = stem.split_once('_')?;
        if entity.is_empty() || column.is_empty() {
            return None;
        }
        Some((entity.to_string(), column.to_string()))
    }

    /// Extracts `(field, value)` from a `Key (field)=(value)` fragment.
    pub fn extract_key_value_from_message(message: &str) -> Option<(String, String)> {
        let captures = Self::patterns().key_value.captures(message)?;
        Some((captures[1].to_string(), captures[2].to_string()))
    }

    pub fn extract_column_from_message(message: &str) -> Option<String> {
        Self::patterns()
            .column_name
            .captures(message)
            .map(|c| c[1].to_string())
    }

    pub fn extract_table_from_message(message: &str) -> Option<String> {
        Self::patterns()
            .relation_name
            .captures(message)
            .map(|c| c[1].to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_constraint_name_with_known_table() {
        assert_eq!(
            ConstraintParser::parse_constraint_name("category_category_name_key", Some("category")),
            Some(("category".to_string(), "category_name".to_string()))
        );
        assert_eq!(
            ConstraintParser::parse_constraint_name("category_image_url_key", Some("category")),
            Some(("category".to_string(), "image_url".to_string()))
        );
    }

    #[test]
    fn test_parse_constraint_name_without_table() {
        assert_eq!(
            ConstraintParser::parse_constraint_name("products_sku_key", None),
            Some(("products".to_string(), "sku".to_string()))
        );
        assert_eq!(ConstraintParser::parse_constraint_name("nounderscore", None), None);
    }

    #[test]
    fn test_unique_violation_prefers_details() {
        let report = ViolationReport {
            message: "duplicate key value violates unique constraint \"category_image_url_key\"",
            details: Some("Key (image_url)=(https://img/x.png) already exists."),
            table_name: Some("category"),
            constraint_name: Some("category_image_url_key"),
            ..Default::default()
        };
        assert_eq!(
            ConstraintParser::parse_unique_violation(&report),
            Some((
                "category".to_string(),
                "image_url".to_string(),
                "https://img/x.png".to_string()
            ))
        );
    }

    #[test]
    fn test_unique_violation_falls_back_to_constraint_name() {
        let report = ViolationReport {
            message: "duplicate key value violates unique constraint \"category_category_name_key\"",
            constraint_name: Some("category_category_name_key"),
            ..Default::default()
        };
        // Without a table name the first segment wins
        assert_eq!(
            ConstraintParser::parse_unique_violation(&report),
            Some((
                "category".to_string(),
                "category_name".to_string(),
                "duplicate_value".to_string()
            ))
        );
    }

    #[test]
    fn test_unique_violation_unparseable() {
        let report = ViolationReport {
            message: "something odd happened",
            ..Default::default()
        };
        assert_eq!(ConstraintParser::parse_unique_violation(&report), None);
    }

    #[test]
    fn test_not_null_violation_from_message() {
        let report = ViolationReport {
            message: "null value in column \"image_url\" of relation \"category\" violates not-null constraint",
            ..Default::default()
        };
        assert_eq!(
            ConstraintParser::parse_not_null_violation(&report),
            Some(("category".to_string(), "image_url".to_string()))
        );
    }

    #[test]
    fn test_extract_key_value_from_message() {
        let message = "Key (category_name)=(Soccer Balls) already exists.";
        assert_eq!(
            ConstraintParser::extract_key_value_from_message(message),
            Some(("category_name".to_string(), "Soccer Balls".to_string()))
        );
    }
}

use regex::Regex;
use validator::ValidationError;

lazy_static::lazy_static! {
    // Statement keywords that have no business appearing in a task search.
    static ref SQL_KEYWORD_REGEX: Regex = Regex::new(
        r"(?i)\b(select|insert|delete|drop|union|alter|exec|execute|declare|waitfor)\b"
    )
    .unwrap();
}

/// Strips quoting and comment sequences from a free-text search term before
/// it is embedded in an ILIKE pattern. The term is always bound as a query
/// parameter; this is an extra layer for the pattern metacharacters.
pub fn sanitize_search(input: &str) -> String {
    let sanitized = input
        .replace('\'', "''")
        .replace(';', "")
        .replace("--", "")
        .replace("/*", "")
        .replace("*/", "")
        .replace('%', "\\%")
        .replace('_', "\\_");

    sanitized.trim().to_string()
}

/// Rejects search terms that look like SQL statements.
pub fn validate_search(input: &str) -> Result<(), ValidationError> {
    if SQL_KEYWORD_REGEX.is_match(input) {
        return Err(ValidationError::new("sql_injection"));
    }

    Ok(())
}

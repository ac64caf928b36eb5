//! Identifier and string literal quoting for generated SQL
//!
//! These helpers are for DDL-style text where values cannot be bound as
//! parameters. They do not make arbitrary input safe to splice into SQL.

/// Quote a table or column name: `my"col` becomes `"my""col"`
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", sanitize_quoted(name).replace('"', "\"\""))
}

/// Quote a string literal: `it's` becomes `'it''s'`
pub fn quote_str(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Reverse [`quote_ident`]
///
/// Returns `None` if `quoted` is not wrapped in double quotes.
pub fn unquote_ident(quoted: &str) -> Option<String> {
    let inner = quoted.strip_prefix('"')?.strip_suffix('"')?;
    Some(inner.replace("\"\"", "\""))
}

// Characters allowed inside quoted identifiers by MySQL and Postgres:
// everything from U+0001 through U+FFFF.
fn sanitize_quoted(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '\u{0001}'..='\u{FFFF}' => c,
            _ => '_',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("cpu"), "\"cpu\"");
        assert_eq!(quote_ident("my\"col"), "\"my\"\"col\"");
    }

    #[test]
    fn test_quote_ident_replaces_nul_and_astral() {
        assert_eq!(quote_ident("a\0b"), "\"a_b\"");
        assert_eq!(quote_ident("a😀b"), "\"a_b\"");
        assert_eq!(quote_ident("tab\there"), "\"tab\there\"");
    }

    #[test]
    fn test_quote_str() {
        assert_eq!(quote_str("plain"), "'plain'");
        assert_eq!(quote_str("it's"), "'it''s'");
        assert_eq!(quote_str("''"), "''''''");
    }

    #[test]
    fn test_unquote_ident() {
        assert_eq!(unquote_ident("\"my\"\"col\"").as_deref(), Some("my\"col"));
        assert_eq!(unquote_ident(&quote_ident("x\"\"y")).as_deref(), Some("x\"\"y"));
        assert_eq!(unquote_ident("cpu"), None);
        assert_eq!(unquote_ident("\""), None);
    }
}

//! String literal escape processing.

/// Resolve backslash escapes in the body of a quoted string.
///
/// Returns `None` for an unknown escape so the lexer can flag the literal.
pub(crate) fn cook_string(content: &str) -> Option<String> {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let escaped = match chars.next()? {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            '\\' => '\\',
            '\'' => '\'',
            '"' => '"',
            _ => return None,
        };
        out.push(escaped);
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::cook_string;

    #[test]
    fn test_plain() {
        assert_eq!(cook_string("hello").as_deref(), Some("hello"));
    }

    #[test]
    fn test_escapes() {
        assert_eq!(cook_string(r"a\nb\t\\").as_deref(), Some("a\nb\t\\"));
        assert_eq!(cook_string(r"it\'s").as_deref(), Some("it's"));
        assert_eq!(cook_string(r#"\"q\""#).as_deref(), Some("\"q\""));
    }

    #[test]
    fn test_unknown_escape() {
        assert_eq!(cook_string(r"\q"), None);
    }
}

//! Escaping helpers shared by the expression and pattern renderers.

/// Quote an identifier with back-ticks only when it contains characters
/// outside `[A-Za-z0-9_]`. Back-ticks inside the identifier are doubled.
pub fn escape_identifier(ident: &str) -> String {
    let safe = !ident.is_empty()
        && ident
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if safe {
        ident.to_string()
    } else {
        format!("`{}`", ident.replace('`', "``"))
    }
}

/// Quote a label or relationship type. Labels are always back-tick quoted in
/// rendered patterns, with inner back-ticks doubled.
pub fn escape_label(label: &str) -> String {
    format!("`{}`", label.replace('`', "``"))
}

/// Render a string literal with double quotes, escaping backslashes and
/// embedded double quotes.
pub fn escape_string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_identifier_is_untouched() {
        assert_eq!(escape_identifier("title"), "title");
        assert_eq!(escape_identifier("released_year"), "released_year");
    }

    #[test]
    fn test_identifier_with_special_chars_is_backticked() {
        assert_eq!(escape_identifier("my prop"), "`my prop`");
        assert_eq!(escape_identifier("weird-name"), "`weird-name`");
    }

    #[test]
    fn test_backticks_inside_identifier_are_doubled() {
        assert_eq!(escape_identifier("a`b"), "`a``b`");
    }

    #[test]
    fn test_labels_are_always_quoted() {
        assert_eq!(escape_label("Movie"), "`Movie`");
        assert_eq!(escape_label("A`B"), "`A``B`");
    }

    #[test]
    fn test_string_literal_escaping() {
        assert_eq!(escape_string_literal("The Matrix"), "\"The Matrix\"");
        assert_eq!(escape_string_literal("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(escape_string_literal("back\\slash"), "\"back\\\\slash\"");
    }
}

/// Composite (row type) literal parser
///
/// PostgreSQL renders a row-typed value as text like:
///
/// ```text
/// (00000000-0000-0000-0000-000000000000,"2024-01-01 00:00:00",,admin)
/// ```
///
/// Fields are separated by commas and may be wrapped in double quotes. Inside
/// quotes a doubled quote (`""`) or a backslash escape stands for the literal
/// character, so quoted fields may carry commas and even nested composites.
/// An empty field is the empty string.
///
/// Field positions are significant: every caller knows the column order of its
/// type and asks for an exact arity.
///
/// # Example
///
/// ```
/// use roster_shared::codec::composite::parse_composite_exact;
///
/// let fields = parse_composite_exact(r#"(a,"b,c",)"#, 3).unwrap();
/// assert_eq!(fields, vec!["a", "b,c", ""]);
/// ```

use super::error::DecodeError;

/// Splits a composite literal into its raw field strings
///
/// # Errors
///
/// [`DecodeError::MalformedComposite`] if the input is not wrapped in exactly one
/// pair of parentheses, or ends inside a quote or escape.
pub fn parse_composite(input: &str) -> Result<Vec<String>, DecodeError> {
    let inner = input
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| {
            DecodeError::MalformedComposite(format!("expected (...), got {:?}", input))
        })?;

    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = inner.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => field.push(escaped),
                None => {
                    return Err(DecodeError::MalformedComposite(
                        "trailing backslash".to_string(),
                    ))
                }
            },
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(DecodeError::MalformedComposite(format!(
            "unterminated quote in {:?}",
            input
        )));
    }
    fields.push(field);

    Ok(fields)
}

/// Splits a composite literal and checks it has exactly `arity` fields
///
/// # Errors
///
/// [`DecodeError::InvalidFieldCount`] on any mismatch. Nothing is truncated or
/// padded.
pub fn parse_composite_exact(input: &str, arity: usize) -> Result<Vec<String>, DecodeError> {
    let fields = parse_composite(input)?;
    check_arity(&fields, arity)?;
    Ok(fields)
}

/// Fails with [`DecodeError::InvalidFieldCount`] unless `fields.len() == arity`
pub fn check_arity<S>(fields: &[S], arity: usize) -> Result<(), DecodeError> {
    if fields.len() != arity {
        return Err(DecodeError::InvalidFieldCount {
            expected: arity,
            found: fields.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_fields() {
        let fields = parse_composite("(a,b,c)").unwrap();
        assert_eq!(fields, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_quoted_fields_are_trimmed() {
        let fields =
            parse_composite(r#"("2024-01-01 00:00:00","2024-01-02 00:00:00","")"#).unwrap();
        assert_eq!(
            fields,
            vec!["2024-01-01 00:00:00", "2024-01-02 00:00:00", ""]
        );
    }

    #[test]
    fn test_empty_fields() {
        assert_eq!(parse_composite("(,,)").unwrap(), vec!["", "", ""]);
        assert_eq!(parse_composite("()").unwrap(), vec![""]);
    }

    #[test]
    fn test_quoted_comma_does_not_split() {
        let fields = parse_composite(r#"(1,"Gold, yearly",USD)"#).unwrap();
        assert_eq!(fields, vec!["1", "Gold, yearly", "USD"]);
    }

    #[test]
    fn test_doubled_quote_and_backslash_escapes() {
        let fields = parse_composite(r#"("say ""hi""","a\\b",c\,d)"#).unwrap();
        assert_eq!(fields, vec![r#"say "hi""#, r"a\b", "c,d"]);
    }

    #[test]
    fn test_nested_composite_field() {
        let fields = parse_composite(r#"(x,"(y,""2024-01-01 00:00:00"",)")"#).unwrap();
        assert_eq!(fields[1], r#"(y,"2024-01-01 00:00:00",)"#);

        let inner = parse_composite(&fields[1]).unwrap();
        assert_eq!(inner, vec!["y", "2024-01-01 00:00:00", ""]);
    }

    #[test]
    fn test_missing_parentheses() {
        for input in ["a,b", "(a,b", "a,b)", ""] {
            assert!(
                matches!(
                    parse_composite(input),
                    Err(DecodeError::MalformedComposite(_))
                ),
                "{input:?}"
            );
        }
    }

    #[test]
    fn test_unterminated_quote() {
        assert!(matches!(
            parse_composite(r#"("abc,def)"#),
            Err(DecodeError::MalformedComposite(_))
        ));
    }

    #[test]
    fn test_arity_mismatch() {
        let err = parse_composite_exact("(a,b)", 3).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::InvalidFieldCount {
                expected: 3,
                found: 2
            }
        ));

        let err = parse_composite_exact("(a,b,c,d)", 3).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::InvalidFieldCount {
                expected: 3,
                found: 4
            }
        ));

        assert!(parse_composite_exact("(a,b,c)", 3).is_ok());
    }
}

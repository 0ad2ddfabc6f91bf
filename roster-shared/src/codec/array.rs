/// Array literal parser and array-of-composite decoding
///
/// PostgreSQL renders a one-dimensional array as text like:
///
/// ```text
/// {"(a,b,admin)","(c,d,member)",NULL}
/// ```
///
/// This is a separate grammar layer from composite literals: elements are
/// quoted with `"` and escaped with `\`, and once unescaped each element is a
/// composite literal in its own right. Quoted elements keep their commas.
/// An unquoted `NULL` is a null element.
///
/// # Example
///
/// ```
/// use roster_shared::codec::array::parse_array;
///
/// let elements = parse_array(r#"{"(a,\"b c\")",NULL}"#).unwrap();
/// assert_eq!(elements, vec![Some(r#"(a,"b c")"#.to_string()), None]);
/// ```

use super::error::{DecodeError, DecodeResultExt};
use std::iter::Peekable;
use std::str::Chars;
use tracing::debug;

/// Splits an array literal into its elements
///
/// Accepts an optional dimension prefix (`[1:3]={...}`). Whitespace around
/// elements is ignored.
///
/// # Errors
///
/// [`DecodeError::MalformedArray`] when the braces are missing, an element is
/// empty, a quote is unterminated, or the array has more than one dimension.
pub fn parse_array(input: &str) -> Result<Vec<Option<String>>, DecodeError> {
    let mut body = input.trim();

    if body.starts_with('[') {
        let eq = body.find('=').ok_or_else(|| {
            DecodeError::MalformedArray(format!("dimension prefix without '=' in {:?}", input))
        })?;
        body = body[eq + 1..].trim_start();
    }

    let inner = body
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .ok_or_else(|| DecodeError::MalformedArray(format!("expected {{...}}, got {:?}", input)))?;

    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut elements = Vec::new();
    let mut chars = inner.chars().peekable();

    loop {
        skip_whitespace(&mut chars);

        let element = match chars.peek() {
            Some('"') => {
                chars.next();
                Some(read_quoted(&mut chars)?)
            }
            Some('{') => {
                return Err(DecodeError::MalformedArray(
                    "multidimensional arrays are not supported".to_string(),
                ))
            }
            _ => read_unquoted(&mut chars)?,
        };
        elements.push(element);

        skip_whitespace(&mut chars);
        match chars.next() {
            Some(',') => continue,
            None => break,
            Some(c) => {
                return Err(DecodeError::MalformedArray(format!(
                    "unexpected {:?} after element {}",
                    c,
                    elements.len() - 1
                )))
            }
        }
    }

    Ok(elements)
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
    }
}

/// Reads a quoted element; the opening quote is already consumed
fn read_quoted(chars: &mut Peekable<Chars<'_>>) -> Result<String, DecodeError> {
    let mut element = String::new();
    loop {
        match chars.next() {
            Some('\\') => match chars.next() {
                Some(escaped) => element.push(escaped),
                None => break,
            },
            Some('"') => return Ok(element),
            Some(c) => element.push(c),
            None => break,
        }
    }
    Err(DecodeError::MalformedArray(
        "unterminated quoted element".to_string(),
    ))
}

/// Reads an unquoted element up to the next delimiter
fn read_unquoted(chars: &mut Peekable<Chars<'_>>) -> Result<Option<String>, DecodeError> {
    let mut element = String::new();
    let mut escaped = false;

    while let Some(&c) = chars.peek() {
        match c {
            ',' => break,
            '"' | '{' | '}' => {
                return Err(DecodeError::MalformedArray(format!(
                    "unexpected {:?} in unquoted element",
                    c
                )))
            }
            '\\' => {
                chars.next();
                let next = chars.next().ok_or_else(|| {
                    DecodeError::MalformedArray("trailing backslash".to_string())
                })?;
                element.push(next);
                escaped = true;
            }
            _ => {
                chars.next();
                element.push(c);
            }
        }
    }

    let trimmed = element.trim_end();
    if trimmed.is_empty() {
        return Err(DecodeError::MalformedArray("empty element".to_string()));
    }
    if !escaped && trimmed.eq_ignore_ascii_case("NULL") {
        return Ok(None);
    }
    Ok(Some(trimmed.to_string()))
}

/// Decodes every element of an array literal with `decode_element`
///
/// Order is preserved. Null elements are skipped: an aggregate over an outer
/// join with no matching rows yields `{NULL}`. The first failing element aborts
/// the whole decode and its error is wrapped with the element's index.
pub fn decode_array<T, F>(input: &str, decode_element: F) -> Result<Vec<T>, DecodeError>
where
    F: Fn(&str) -> Result<T, DecodeError>,
{
    let elements = parse_array(input)?;
    let mut decoded = Vec::with_capacity(elements.len());

    for (index, element) in elements.iter().enumerate() {
        let Some(element) = element else {
            continue;
        };
        let value = decode_element(element.as_str())
            .with_context(|| format!("element {}", index))?;
        decoded.push(value);
    }

    debug!(
        elements = elements.len(),
        decoded = decoded.len(),
        "Decoded composite array"
    );
    Ok(decoded)
}

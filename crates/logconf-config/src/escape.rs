//! Backslash-escape decoding for property values.
//!
//! Values in the text format may carry Java-style escapes. Decoding is only
//! done on the read path; serialization writes values back verbatim.
//!
//! | Escape | Result |
//! |--------|--------|
//! | `\\` `\"` `\'` | the escaped character |
//! | `\t` `\n` `\r` `\b` `\f` | tab, newline, carriage return, backspace, form feed |
//! | `\uXXXX` / `\UXXXX` | the code point (exactly four hex digits) |
//! | unpaired surrogate `\uD800`-`\uDFFF` | `U+FFFD` |
//! | `\` + anything else | the character, backslash dropped |
//! | trailing `\` | kept literally |

use std::borrow::Cow;

use crate::error::EscapeError;

/// Decodes the escapes in `value`.
///
/// Returns the input unchanged (borrowed) when it holds no backslash.
/// A UTF-16 surrogate pair written as two consecutive unicode escapes is
/// combined into one character; an unpaired surrogate decodes to
/// `U+FFFD`.
///
/// # Errors
///
/// Returns [`EscapeError`] for a truncated or non-hex `\u` escape.
///
/// # Example
///
/// ```
/// use logconf_config::unescape;
///
/// assert_eq!(unescape(r"a\tb\n\u0041").unwrap(), "a\tb\nA");
/// assert_eq!(unescape(r"abc\").unwrap(), "abc\\");
/// assert!(unescape(r"\u00G1").is_err());
/// ```
pub fn unescape(value: &str) -> Result<Cow<'_, str>, EscapeError> {
    if !value.contains('\\') {
        return Ok(Cow::Borrowed(value));
    }

    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len());
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        if ch != '\\' || i + 1 >= chars.len() {
            out.push(ch);
            i += 1;
            continue;
        }

        match chars[i + 1] {
            '\\' => out.push('\\'),
            '"' => out.push('"'),
            '\'' => out.push('\''),
            't' => out.push('\t'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'u' | 'U' => {
                let (decoded, consumed) = decode_unicode(&chars, i)?;
                out.push(decoded);
                i += consumed;
                continue;
            }
            other => out.push(other),
        }
        i += 2;
    }

    Ok(Cow::Owned(out))
}

/// Decodes the unicode escape starting at `start` (the backslash).
///
/// Returns the character and the number of chars consumed.
fn decode_unicode(chars: &[char], start: usize) -> Result<(char, usize), EscapeError> {
    let unit = hex_unit(chars, start)?;

    if (0xD800..0xDC00).contains(&unit) {
        // High surrogate: combined only when a low surrogate escape follows.
        let next = start + 6;
        let follows_escape = chars.get(next) == Some(&'\\')
            && matches!(chars.get(next + 1), Some('u' | 'U'));
        if follows_escape {
            if let Ok(low) = hex_unit(chars, next) {
                if (0xDC00..0xE000).contains(&low) {
                    let code = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                    return Ok((to_char(code), 12));
                }
            }
        }
    }

    Ok((to_char(unit), 6))
}

/// Unpaired surrogates become `U+FFFD`.
fn to_char(code: u32) -> char {
    char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Reads the four hex digits of the `\u` escape at `start`.
fn hex_unit(chars: &[char], start: usize) -> Result<u32, EscapeError> {
    let digits = chars
        .get(start + 2..start + 6)
        .ok_or(EscapeError::TruncatedUnicode { position: start })?;

    digits.iter().try_fold(0u32, |acc, &c| {
        c.to_digit(16)
            .map(|d| (acc << 4) | d)
            .ok_or(EscapeError::InvalidHexDigit {
                position: start,
                found: c,
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_value_is_borrowed() {
        let value = unescape("plain value").unwrap();
        assert!(matches!(value, Cow::Borrowed("plain value")));
    }

    #[test]
    fn test_simple_escapes() {
        assert_eq!(unescape(r"a\tb\nc").unwrap(), "a\tb\nc");
        assert_eq!(unescape(r"\r\b\f").unwrap(), "\r\u{8}\u{c}");
        assert_eq!(
            unescape(r#"say \"hi\" and \'bye\'"#).unwrap(),
            r#"say "hi" and 'bye'"#
        );
        assert_eq!(unescape(r"C:\\temp").unwrap(), r"C:\temp");
    }

    #[test]
    fn test_escape_in_the_middle_keeps_prefix() {
        assert_eq!(unescape(r"prefix\tsuffix").unwrap(), "prefix\tsuffix");
        assert_eq!(unescape(r"x\qy").unwrap(), "xqy");
    }

    #[test]
    fn test_unicode_escape() {
        assert_eq!(unescape(r"a\tb\n\u0041").unwrap(), "a\tb\nA");
        assert_eq!(unescape(r"\U00e9t\u00E9").unwrap(), "été");
        assert_eq!(unescape(r"\u4e2d\u6587").unwrap(), "中文");
    }

    #[test]
    fn test_surrogate_pair() {
        assert_eq!(unescape(r"\uD83D\uDE00").unwrap(), "😀");
    }

    #[test]
    fn test_lone_surrogate_is_replaced() {
        assert_eq!(unescape(r"\uD83D").unwrap(), "\u{FFFD}");
        assert_eq!(unescape(r"\uDE00x").unwrap(), "\u{FFFD}x");
        assert_eq!(unescape(r"\uD83D\u0041").unwrap(), "\u{FFFD}A");
        assert_eq!(unescape(r"\uD83D\t").unwrap(), "\u{FFFD}\t");
    }

    #[test]
    fn test_unknown_escape_drops_backslash() {
        assert_eq!(unescape(r"\z\.\=").unwrap(), "z.=");
    }

    #[test]
    fn test_trailing_backslash_is_literal() {
        assert_eq!(unescape(r"abc\").unwrap(), r"abc\");
        assert_eq!(unescape(r"\").unwrap(), r"\");
        assert_eq!(unescape(r"a\tb\").unwrap(), "a\tb\\");
    }

    #[test]
    fn test_truncated_unicode() {
        assert_eq!(
            unescape(r"x\u12"),
            Err(EscapeError::TruncatedUnicode { position: 1 })
        );
        assert_eq!(
            unescape(r"\u"),
            Err(EscapeError::TruncatedUnicode { position: 0 })
        );
    }

    #[test]
    fn test_non_hex_unicode() {
        assert_eq!(
            unescape(r"\u00G1"),
            Err(EscapeError::InvalidHexDigit {
                position: 0,
                found: 'G'
            })
        );
        assert!(unescape(r"\u+041").is_err());
    }
}

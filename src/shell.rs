//! Command line tokenizing.
//!
//! Splits an `Exec`-style command line into arguments the way a POSIX shell
//! would, without expanding anything: whitespace separates words, single
//! quotes are literal, double quotes allow `\"`, `\\`, `\$` and `` \` ``
//! escapes, a backslash outside quotes escapes the next character, and `#` at
//! the start of a word begins a comment.

use crate::error::{Error, Result};

/// Split a command line into arguments.
///
/// # Errors
///
/// Returns [`Error::InvalidCommand`] for an unterminated quote, a trailing
/// backslash, or a command line with no words at all.
pub fn split(command: &str) -> Result<Vec<String>> {
    let invalid = |message: &str| Error::InvalidCommand {
        command: command.to_string(),
        message: message.to_string(),
    };

    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = command.chars();

    while let Some(c) = chars.next() {
        match c {
            ' ' | '\t' | '\n' => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            '#' if !in_word => {
                // Comment runs to the end of the line
                for next in chars.by_ref() {
                    if next == '\n' {
                        break;
                    }
                }
            }
            '\'' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(other) => current.push(other),
                        None => return Err(invalid("unterminated single quote")),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(escaped @ ('"' | '\\' | '$' | '`')) => current.push(escaped),
                            Some('\n') => {}
                            Some(other) => {
                                current.push('\\');
                                current.push(other);
                            }
                            None => return Err(invalid("unterminated double quote")),
                        },
                        Some(other) => current.push(other),
                        None => return Err(invalid("unterminated double quote")),
                    }
                }
            }
            '\\' => match chars.next() {
                Some('\n') => {}
                Some(other) => {
                    in_word = true;
                    current.push(other);
                }
                None => return Err(invalid("trailing backslash")),
            },
            other => {
                in_word = true;
                current.push(other);
            }
        }
    }

    if in_word {
        words.push(current);
    }

    if words.is_empty() {
        return Err(invalid("command line is empty"));
    }

    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_simple_words() {
        assert_eq!(split("foo --flag  bar").unwrap(), vec!["foo", "--flag", "bar"]);
    }

    #[test]
    fn test_split_quotes() {
        assert_eq!(
            split(r#"sh -c 'echo "hi there"'"#).unwrap(),
            vec!["sh", "-c", r#"echo "hi there""#]
        );
        assert_eq!(
            split(r#"notify "a \"quoted\" word""#).unwrap(),
            vec!["notify", r#"a "quoted" word"#]
        );
    }

    #[test]
    fn test_split_backslash_outside_quotes() {
        assert_eq!(split(r"my\ app --x").unwrap(), vec!["my app", "--x"]);
    }

    #[test]
    fn test_split_adjacent_quoted_parts_join() {
        assert_eq!(split(r#"a'b'"c"d"#).unwrap(), vec!["abcd"]);
    }

    #[test]
    fn test_split_empty_quotes_make_a_word() {
        assert_eq!(split("run ''").unwrap(), vec!["run", ""]);
    }

    #[test]
    fn test_split_comment() {
        assert_eq!(split("foo # bar baz").unwrap(), vec!["foo"]);
        assert_eq!(split("foo#bar").unwrap(), vec!["foo#bar"]);
    }

    #[test]
    fn test_split_errors() {
        assert!(matches!(split("'open"), Err(Error::InvalidCommand { .. })));
        assert!(matches!(split("\"open"), Err(Error::InvalidCommand { .. })));
        assert!(matches!(split("foo \\"), Err(Error::InvalidCommand { .. })));
        assert!(matches!(split("   "), Err(Error::InvalidCommand { .. })));
        assert!(matches!(split("# only a comment"), Err(Error::InvalidCommand { .. })));
    }
}

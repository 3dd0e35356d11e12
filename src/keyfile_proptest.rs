//! Property-based tests for value escaping and command line splitting.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::keyfile::{escape, unescape, DesktopFile};
    use crate::shell;
    use proptest::prelude::*;

    // ============================================================================
    // escape / unescape property tests
    // ============================================================================

    proptest! {
        /// Property: unescape undoes escape for every string
        #[test]
        fn unescape_inverts_escape(input in ".*") {
            prop_assert_eq!(unescape(&escape(&input)), input);
        }

        /// Property: an escaped value always fits on one line
        #[test]
        fn escape_never_produces_line_breaks(input in ".*") {
            let escaped = escape(&input);
            prop_assert!(!escaped.contains('\n'));
            prop_assert!(!escaped.contains('\r'));
        }

        /// Property: an escaped value never starts with a space
        #[test]
        fn escape_protects_leading_space(input in " .*") {
            prop_assert!(escape(&input).starts_with("\\s"));
        }
    }

    // ============================================================================
    // DesktopFile round trip property tests
    // ============================================================================

    proptest! {
        /// Property: a value written with set_string reads back the same after
        /// serializing and parsing the document again
        #[test]
        fn set_string_survives_reparse(value in "[ -~\t\n]{0,40}") {
            let mut file = DesktopFile::new_application();
            file.set_string("Exec", &value);

            let reparsed = DesktopFile::parse(&file.to_string()).unwrap();
            prop_assert_eq!(reparsed.get_string("Exec"), Some(value));
        }

        /// Property: setting a key to its current value leaves the text unchanged
        #[test]
        fn set_same_value_is_stable(value in "[a-zA-Z0-9 ]{1,20}") {
            let mut file = DesktopFile::new_application();
            file.set_string("Name", &value);
            let before = file.to_string();
            file.set_string("Name", &value);
            prop_assert_eq!(file.to_string(), before);
        }
    }

    // ============================================================================
    // shell::split property tests
    // ============================================================================

    proptest! {
        /// Property: plain words separated by spaces split back into the words
        #[test]
        fn split_plain_words(words in prop::collection::vec("[a-zA-Z0-9_./=-]{1,12}", 1..6)) {
            let command = words.join(" ");
            prop_assert_eq!(shell::split(&command).unwrap(), words);
        }

        /// Property: anything inside single quotes is one literal word
        #[test]
        fn split_single_quoted_is_literal(inner in "[^']{0,30}") {
            let command = format!("run '{}'", inner);
            prop_assert_eq!(shell::split(&command).unwrap(), vec!["run".to_string(), inner]);
        }
    }
}

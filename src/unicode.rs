//! Identifier and whitespace classification for the lexer, built directly
//! on `unicode-general-category` rather than a bespoke classification table.

use unicode_general_category::{get_general_category, GeneralCategory};

/// ES5 `IdentifierStart` (ES5 §7.6): Unicode letter, `$`, `_`, or a
/// `\uXXXX` escape (escapes are already decoded by the time this is
/// called, in the lexer's identifier scanner).
pub fn is_identifier_start(c: char) -> bool {
    c == '$'
        || c == '_'
        || c.is_alphabetic()
        || matches!(
            get_general_category(c),
            GeneralCategory::LetterNumber
        )
}

/// ES5 `IdentifierPart`: `IdentifierStart` plus combining marks, digits,
/// connector punctuation, and a couple of zero-width format characters.
pub fn is_identifier_continue(c: char) -> bool {
    if is_identifier_start(c) || c.is_ascii_digit() {
        return true;
    }
    matches!(c, '\u{200C}' | '\u{200D}')
        || matches!(
            get_general_category(c),
            GeneralCategory::NonspacingMark
                | GeneralCategory::SpacingMark
                | GeneralCategory::DecimalNumber
                | GeneralCategory::ConnectorPunctuation
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dollar_and_underscore_start_identifiers() {
        assert!(is_identifier_start('$'));
        assert!(is_identifier_start('_'));
        assert!(!is_identifier_start('1'));
    }

    #[test]
    fn digits_continue_but_dont_start() {
        assert!(is_identifier_continue('1'));
        assert!(!is_identifier_start('1'));
    }
}

use unicode_general_category::{GeneralCategory, get_general_category};

use crate::data_models::{CharCategory, UnicodeMetadata};
use crate::envelope::Status;
use crate::error::AdapterError;

const CONTROL_NAME: &str = "<control>";

/// Describes the first code point of `input`; anything after it is ignored.
/// No upstream call is involved.
pub fn describe(input: Option<&str>) -> Result<UnicodeMetadata, AdapterError> {
    // Not trimmed: whitespace is a legitimate subject here.
    let c = input
        .and_then(|s| s.chars().next())
        .ok_or(AdapterError::MissingParameter("char"))?;
    Ok(metadata(c))
}

pub fn metadata(c: char) -> UnicodeMetadata {
    let code = u32::from(c);
    let category = categorize(c);
    UnicodeMetadata {
        status: Status::Success,
        character: c.to_string(),
        name: char_name(c, category),
        codepoint: format!("U+{code:04X}"),
        decimal: code,
        hex: format!("{code:X}"),
        category,
        html: format!("&#{code};"),
    }
}

/// Control characters have no name in the Unicode name table.
fn char_name(c: char, category: CharCategory) -> String {
    match unicode_names2::name(c) {
        Some(name) => name.to_string(),
        None if category == CharCategory::Control => CONTROL_NAME.to_string(),
        None => String::new(),
    }
}

/// First matching class wins, in this order: Control, Digit, Letter, Number,
/// Space, Symbol, Punctuation, Mark.
pub fn categorize(c: char) -> CharCategory {
    use GeneralCategory::*;

    let general = get_general_category(c);
    if c.is_control() {
        CharCategory::Control
    } else if matches!(general, DecimalNumber) {
        CharCategory::Digit
    } else if matches!(
        general,
        UppercaseLetter | LowercaseLetter | TitlecaseLetter | ModifierLetter | OtherLetter
    ) {
        CharCategory::Letter
    } else if matches!(general, LetterNumber | OtherNumber) {
        CharCategory::Number
    } else if c.is_whitespace() {
        CharCategory::Space
    } else if matches!(general, MathSymbol | CurrencySymbol | ModifierSymbol | OtherSymbol) {
        CharCategory::Symbol
    } else if matches!(
        general,
        ConnectorPunctuation
            | DashPunctuation
            | OpenPunctuation
            | ClosePunctuation
            | InitialPunctuation
            | FinalPunctuation
            | OtherPunctuation
    ) {
        CharCategory::Punctuation
    } else if matches!(general, NonspacingMark | SpacingMark | EnclosingMark) {
        CharCategory::Mark
    } else {
        CharCategory::Unknown
    }
}

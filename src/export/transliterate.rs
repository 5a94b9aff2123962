//! Text cleanup for the PDF standard fonts.
//!
//! The built-in Helvetica only covers a single-byte encoding. Characters
//! outside it are first mapped through a fixed table to their closest ASCII
//! spelling, then anything still unencodable is dropped.

/// Fixed substitution table: character → ASCII replacement.
const SUBSTITUTIONS: &[(char, &str)] = &[
    // Polish
    ('ą', "a"),
    ('ć', "c"),
    ('ę', "e"),
    ('ł', "l"),
    ('ń', "n"),
    ('ó', "o"),
    ('ś', "s"),
    ('ź', "z"),
    ('ż', "z"),
    ('Ą', "A"),
    ('Ć', "C"),
    ('Ę', "E"),
    ('Ł', "L"),
    ('Ń', "N"),
    ('Ó', "O"),
    ('Ś', "S"),
    ('Ź', "Z"),
    ('Ż', "Z"),
    // Czech / Slovak
    ('č', "c"),
    ('ď', "d"),
    ('ě', "e"),
    ('ň', "n"),
    ('ř', "r"),
    ('š', "s"),
    ('ť', "t"),
    ('ů', "u"),
    ('ž', "z"),
    ('Č', "C"),
    ('Ď', "D"),
    ('Ě', "E"),
    ('Ň', "N"),
    ('Ř', "R"),
    ('Š', "S"),
    ('Ť', "T"),
    ('Ů', "U"),
    ('Ž', "Z"),
    // Typography
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    ('\u{201A}', "'"),
    ('\u{201C}', "\""),
    ('\u{201D}', "\""),
    ('\u{201E}', "\""),
    ('\u{2013}', "-"),
    ('\u{2014}', "-"),
    ('\u{2026}', "..."),
    ('\u{2022}', "-"),
    ('\u{00A0}', " "),
    // Symbols
    ('\u{20AC}', "EUR"),
    ('\u{2116}', "No."),
    ('\u{00D7}', "x"),
];

fn substitute(c: char) -> Option<&'static str> {
    SUBSTITUTIONS
        .iter()
        .find(|(from, _)| *from == c)
        .map(|(_, to)| *to)
}

/// Whether `c` can be written as a single byte for the standard fonts.
///
/// Printable ASCII plus the printable Latin-1 supplement. The C1 control
/// block (U+0080–U+009F) has no glyphs and is excluded.
fn is_encodable(c: char) -> bool {
    matches!(c as u32, 0x20..=0x7E | 0xA0..=0xFF)
}

/// Replace characters through the substitution table, then drop anything
/// the standard fonts cannot encode.
pub fn transliterate(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if let Some(replacement) = substitute(c) {
            out.push_str(replacement);
        } else if is_encodable(c) {
            out.push(c);
        }
    }
    out
}

/// Encode transliterated text to the single-byte form stored in the PDF.
pub fn encode_single_byte(text: &str) -> Vec<u8> {
    transliterate(text).chars().map(|c| c as u32 as u8).collect()
}

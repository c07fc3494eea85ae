use {crate::automaton::CharRange, once_cell::sync::Lazy};

/// Ranges for `\d`: ASCII digits.
pub static DIGIT: Lazy<Vec<CharRange>> = Lazy::new(|| vec![CharRange::new('0' as u32, '9' as u32).unwrap()]);

/// Ranges for `\s`: the classic ASCII whitespace set (space, tab, newline, carriage return, form
/// feed, vertical tab).
pub static SPACE: Lazy<Vec<CharRange>> = Lazy::new(|| {
    vec![
        CharRange::single(' ' as u32),
        CharRange::single('\t' as u32),
        CharRange::single('\n' as u32),
        CharRange::single('\r' as u32),
        CharRange::single(0x0c),
        CharRange::single(0x0b),
    ]
});

/// Ranges for `\w`: ASCII letters, digits, and underscore.
pub static WORD: Lazy<Vec<CharRange>> = Lazy::new(|| {
    vec![
        CharRange::new('a' as u32, 'z' as u32).unwrap(),
        CharRange::new('A' as u32, 'Z' as u32).unwrap(),
        CharRange::new('0' as u32, '9' as u32).unwrap(),
        CharRange::single('_' as u32),
    ]
});

/// The full Unicode scalar range, minus nothing: what `.` matches.
pub fn any_codepoint_range() -> CharRange {
    CharRange::new(0, 0x10_ffff).expect("0 <= 0x10ffff")
}

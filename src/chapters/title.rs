/// Chapter title cleanup

/// Glyphs treated as decoration in front of a title: the common emoji and
/// dingbat blocks, the emoji variation selector and the star used in
/// "⭐️ Contents ⭐️" style headings.
fn is_decorative(c: char) -> bool {
    matches!(
        c,
        '\u{1F300}'..='\u{1F9FF}'
            | '\u{2600}'..='\u{26FF}'
            | '\u{2700}'..='\u{27BF}'
            | '\u{FE0F}'
            | '\u{2B50}'
    )
}

/// Build a chapter title from a line and the timestamp text matched in it.
///
/// `chapter_number` is the number assigned to the chapter being built. An
/// empty result falls back to `Chapter {chapter_number + 1}`; existing
/// chapter data was produced with that numbering, so it stays.
pub fn sanitize_title(line: &str, matched: &str, chapter_number: u32) -> String {
    let without_token = line.replacen(matched, "", 1);

    let title = without_token
        .trim()
        .trim_start_matches(|c: char| c == '-' || c == '(' || c == ')' || c.is_whitespace())
        .trim()
        .trim_start_matches(is_decorative)
        .trim();

    if title.is_empty() {
        format!("Chapter {}", chapter_number + 1)
    } else {
        title.to_string()
    }
}

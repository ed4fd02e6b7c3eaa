/// Chapter parsing from freeform description text
use super::timestamp::parse_timestamp;
use super::title::sanitize_title;
use super::Chapter;
use tracing::debug;

/// Parse every timestamped line of `text` into a chapter.
///
/// Lines without a timestamp are skipped and do not consume a chapter number.
/// End times are left unset; see [`parse_chapters_from_description`].
pub fn parse_chapters(text: &str) -> Vec<Chapter> {
    let mut chapters = Vec::new();
    let mut chapter_number = 1u32;

    for line in text.lines() {
        let Some(token) = parse_timestamp(line) else {
            continue;
        };

        let title = sanitize_title(line, &token.matched, chapter_number);
        chapters.push(Chapter::new(chapter_number, title, token.seconds));
        chapter_number += 1;
    }

    chapters
}

/// Parse chapters from `text` and derive their end times.
///
/// Each chapter ends where the next one starts and the last one ends at
/// `total_duration_seconds`, which is 0 when the duration is unknown. Start
/// times are taken in line order without sorting, so out-of-order source text
/// yields out-of-order chapters.
pub fn parse_chapters_from_description(text: &str, total_duration_seconds: u64) -> Vec<Chapter> {
    let mut chapters = parse_chapters(text);

    let next_starts: Vec<u64> = chapters
        .iter()
        .skip(1)
        .map(|chapter| chapter.start_time_seconds)
        .chain(std::iter::once(total_duration_seconds))
        .collect();

    for (chapter, end) in chapters.iter_mut().zip(next_starts) {
        chapter.end_time_seconds = Some(end);
    }

    debug!("Parsed {} chapters from description text", chapters.len());
    chapters
}

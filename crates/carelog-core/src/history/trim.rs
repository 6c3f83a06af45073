//! Size cap enforcement for transcripts.

use super::entry::ENTRY_DELIMITER;

/// Cap `text` at `max_chars` characters, keeping the most recent content.
///
/// When the text is over budget only the trailing `max_chars` characters are
/// kept, then anything before the first entry delimiter is dropped so the
/// result never opens with a partial entry. If no delimiter survives the cut,
/// the tail is returned as is. Lengths count Unicode scalar values.
pub fn trim_transcript(text: &str, max_chars: usize) -> &str {
    let total = text.chars().count();
    if total <= max_chars {
        return text;
    }

    let start = text
        .char_indices()
        .nth(total - max_chars)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());
    let tail = &text[start..];

    match tail.find(ENTRY_DELIMITER) {
        Some(pos) if pos > 0 => &tail[pos..],
        _ => tail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_under_budget_is_untouched() {
        let text = "\n\n--- 04/03/2025, 09:05 ---\nPaciente/Profissional: a\nAssistente: b";
        assert_eq!(trim_transcript(text, 8000), text);
        assert_eq!(trim_transcript(text, text.chars().count()), text);
    }

    #[test]
    fn test_cut_lands_on_delimiter_boundary() {
        let text = "\n--- one ---\nxxxxxxxxxx\n--- two ---\nyy";
        let trimmed = trim_transcript(text, 20);
        assert_eq!(trimmed, "\n--- two ---\nyy");
    }

    #[test]
    fn test_tail_without_delimiter_is_kept() {
        let text = "\n--- one ---\nabcdefghijklmnopqrstuvwxyz";
        assert_eq!(trim_transcript(text, 5), "vwxyz");
    }

    #[test]
    fn test_delimiter_at_cut_point_is_kept() {
        let text = "abc\n--- two ---";
        assert_eq!(trim_transcript(text, 12), "\n--- two ---");
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let text = "ááááá\n--- b ---\nééé";
        let trimmed = trim_transcript(text, 16);
        assert_eq!(trimmed, "\n--- b ---\nééé");
        assert!(trimmed.chars().count() <= 16);
    }

    #[test]
    fn test_trim_is_idempotent() {
        let text = "\n--- a ---\n".to_string() + &"x".repeat(50) + "\n--- b ---\n" + &"y".repeat(30);
        for max in [0, 5, 20, 45, 70, 200] {
            let once = trim_transcript(&text, max);
            let twice = trim_transcript(once, max);
            assert_eq!(once, twice, "max = {max}");
            assert!(once.chars().count() <= max);
        }
    }
}

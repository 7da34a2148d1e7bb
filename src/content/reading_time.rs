//! Reading time estimate

/// Average silent reading speed used when nothing else is configured
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 200;

/// Reading time statistics for a body of text
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingTime {
    /// Counted words (each CJK character counts as one word)
    pub words: usize,
    /// Exact minutes at the configured speed
    pub minutes: f64,
    /// Display text, e.g. "3 min read"
    pub text: String,
}

impl ReadingTime {
    /// Estimate the reading time of `text` at `words_per_minute`
    pub fn estimate(text: &str, words_per_minute: u32) -> Self {
        let words = count_words(text);
        let wpm = words_per_minute.max(1) as f64;
        let minutes = words as f64 / wpm;
        // Round to two decimals before taking the ceiling
        let displayed = ((minutes * 100.0).round() / 100.0).ceil() as u64;

        Self {
            words,
            minutes,
            text: format!("{} min read", displayed),
        }
    }
}

/// Count words: runs of alphanumeric characters, plus every CJK character
pub fn count_words(text: &str) -> usize {
    let mut count = 0;
    let mut in_word = false;

    for c in text.chars() {
        if is_cjk(c) {
            count += 1;
            in_word = false;
        } else if c.is_alphanumeric() || (in_word && (c == '\'' || c == '’')) {
            if !in_word {
                in_word = true;
                count += 1;
            }
        } else {
            in_word = false;
        }
    }

    count
}

fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{309F}'   // Hiragana
        | '\u{30A0}'..='\u{30FF}' // Katakana
        | '\u{3400}'..='\u{4DBF}' // CJK extension A
        | '\u{4E00}'..='\u{9FFF}' // CJK unified ideographs
        | '\u{AC00}'..='\u{D7AF}' // Hangul syllables
        | '\u{F900}'..='\u{FAFF}' // CJK compatibility ideographs
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_english_words() {
        assert_eq!(count_words("Hello, world! It's a test."), 5);
        assert_eq!(count_words("  spaced   out\n\nwords  "), 3);
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("--- *** ###"), 0);
    }

    #[test]
    fn test_count_cjk_characters() {
        assert_eq!(count_words("안녕하세요"), 5);
        assert_eq!(count_words("Rust 개발"), 3);
        assert_eq!(count_words("中文内容"), 4);
    }

    #[test]
    fn test_estimate_rounds_up() {
        let text = "word ".repeat(210);
        let rt = ReadingTime::estimate(&text, 200);
        assert_eq!(rt.words, 210);
        assert_eq!(rt.text, "2 min read");

        let rt = ReadingTime::estimate(&"word ".repeat(200), 200);
        assert_eq!(rt.text, "1 min read");

        let rt = ReadingTime::estimate("just a few words", 200);
        assert_eq!(rt.text, "1 min read");
    }

    #[test]
    fn test_estimate_empty_body() {
        let rt = ReadingTime::estimate("", 200);
        assert_eq!(rt.words, 0);
        assert_eq!(rt.text, "0 min read");
    }

    #[test]
    fn test_estimate_zero_speed_is_clamped() {
        let rt = ReadingTime::estimate("one two", 0);
        assert_eq!(rt.text, "2 min read");
    }
}

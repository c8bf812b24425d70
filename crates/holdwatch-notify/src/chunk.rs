//! Message chunking.
//!
//! Lengths are UTF-16 code units, which is what Telegram counts.

/// Units kept free in each part for the "Part i of n" header.
pub const HEADER_RESERVE: usize = 50;

fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Split `text` into parts of at most `max_len` UTF-16 units.
///
/// Text that already fits is returned unchanged as the only part.
/// Otherwise lines are packed greedily into parts of `max_len -
/// HEADER_RESERVE` units; a single line longer than that is cut on
/// character boundaries. Every part of a multi-part result starts with a
/// `📄 Part i of n` header.
pub fn split_message(text: &str, max_len: usize) -> Vec<String> {
    if utf16_len(text) <= max_len {
        return vec![text.to_string()];
    }

    let budget = max_len.saturating_sub(HEADER_RESERVE).max(1);
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for line in text.split_inclusive('\n') {
        let line_len = utf16_len(line);

        if line_len > budget {
            if !current.is_empty() {
                parts.push(std::mem::take(&mut current));
            }
            current_len = 0;
            for c in line.chars() {
                let width = c.len_utf16();
                if current_len + width > budget && !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                current.push(c);
                current_len += width;
            }
        } else if current_len + line_len <= budget {
            current.push_str(line);
            current_len += line_len;
        } else {
            if !current.is_empty() {
                parts.push(std::mem::take(&mut current));
            }
            current.push_str(line);
            current_len = line_len;
        }
    }

    if !current.is_empty() {
        parts.push(current);
    }

    let total = parts.len();
    if total <= 1 {
        return parts;
    }
    parts
        .into_iter()
        .enumerate()
        .map(|(i, part)| format!("📄 Part {} of {}\n\n{}", i + 1, total, part))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_header(part: &str) -> &str {
        part.split_once("\n\n").map(|(_, body)| body).unwrap_or(part)
    }

    #[test]
    fn test_short_text_is_unchanged() {
        assert_eq!(split_message("hello\nworld", 4096), vec!["hello\nworld"]);
        assert_eq!(split_message("", 10), vec![""]);
    }

    #[test]
    fn test_splits_on_line_boundaries() {
        let line = format!("{}\n", "x".repeat(29));
        let text = line.repeat(10);
        let parts = split_message(&text, 110);

        // 60-char budget fits two 30-char lines per part.
        assert_eq!(parts.len(), 5);
        for part in &parts {
            assert!(utf16_len(part) <= 110);
            assert_eq!(strip_header(part), line.repeat(2));
        }
        assert!(parts[0].starts_with("📄 Part 1 of 5\n\n"));
        assert!(parts[4].starts_with("📄 Part 5 of 5\n\n"));
    }

    #[test]
    fn test_reassembles_to_original() {
        let text: String = (0..200)
            .map(|i| format!("{i}. BTCUSDT LONG size {}\n", i * 7))
            .collect();
        let parts = split_message(&text, 500);
        assert!(parts.len() > 1);
        let joined: String = parts.iter().map(|p| strip_header(p)).collect();
        assert_eq!(joined, text);
    }

    #[test]
    fn test_overlong_line_is_hard_split_on_char_boundaries() {
        let text = "я".repeat(250);
        let parts = split_message(&text, 150);
        let bodies: Vec<&str> = parts.iter().map(|p| strip_header(p)).collect();
        assert_eq!(bodies.len(), 3);
        assert_eq!(bodies[0].chars().count(), 100);
        assert_eq!(bodies[1].chars().count(), 100);
        assert_eq!(bodies[2].chars().count(), 50);
        assert_eq!(bodies.concat(), text);
    }

    #[test]
    fn test_astral_characters_count_twice() {
        // 60 chars, but 120 UTF-16 units.
        let text = "😀".repeat(60);
        assert_eq!(split_message(&text, 120), vec![text.clone()]);

        let parts = split_message(&text, 100);
        let bodies: Vec<&str> = parts.iter().map(|p| strip_header(p)).collect();
        assert_eq!(bodies.len(), 3);
        assert_eq!(bodies[0].chars().count(), 25);
        assert_eq!(bodies[2].chars().count(), 10);
        for part in &parts {
            assert!(utf16_len(part) <= 100);
        }
        assert_eq!(bodies.concat(), text);
    }

    #[test]
    fn test_overlong_line_remainder_joins_following_lines() {
        let text = format!("{}\nshort\n", "a".repeat(130));
        let parts = split_message(&text, 120);
        let bodies: Vec<&str> = parts.iter().map(|p| strip_header(p)).collect();
        assert_eq!(bodies, vec!["a".repeat(70), format!("{}\nshort\n", "a".repeat(60))]);
    }
}

//! Splitting long documents into overlapping, bounded chunks.
//!
//! Two strategies:
//!
//! * [`chunk_text`] — fixed windows by raw character offset. Cheap and
//!   exact, but cuts through words and sentences.
//! * [`chunk_text_smart`] — packs whole sentences into each chunk and seeds
//!   every chunk after the first with a word-aligned tail of its
//!   predecessor, so a question about a boundary still sees both sides.
//!
//! Sizes are counted in characters, not bytes. Both functions reject
//! `chunk_size <= overlap`, which would otherwise never advance.

use crate::error::DocChatError;

/// Split `text` into windows of `chunk_size` characters, each starting
/// `chunk_size - overlap` characters after the previous one.
///
/// The last chunk always ends at the end of `text`. Empty input yields no
/// chunks.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Result<Vec<String>, DocChatError> {
    validate(chunk_size, overlap)?;

    // Byte offset of every char boundary, plus the end of the string.
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let total = bounds.len() - 1;

    let mut chunks = Vec::new();
    let mut start = 0usize;
    while start < total {
        let end = (start + chunk_size).min(total);
        chunks.push(text[bounds[start]..bounds[end]].to_string());
        if end == total {
            break;
        }
        start = end - overlap;
    }
    Ok(chunks)
}

/// Split `text` into chunks of whole sentences, at most `chunk_size`
/// characters unless a single sentence is longer on its own.
///
/// Each chunk after the first begins with up to `overlap` trailing
/// characters of the previous chunk, trimmed forward to a word boundary.
pub fn chunk_text_smart(
    text: &str,
    chunk_size: usize,
    overlap: usize,
) -> Result<Vec<String>, DocChatError> {
    validate(chunk_size, overlap)?;

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for sentence in split_sentences(text) {
        let sentence_len = sentence.chars().count();
        let joined_len = if current.is_empty() {
            sentence_len
        } else {
            current_len + 1 + sentence_len
        };

        if joined_len > chunk_size && !current.is_empty() {
            let seed = overlap_tail(&current, overlap).to_string();
            chunks.push(std::mem::take(&mut current));
            if !seed.is_empty() {
                current.push_str(&seed);
                current.push(' ');
            }
            current.push_str(sentence);
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(sentence);
        }
        current_len = current.chars().count();
    }

    if !current.trim().is_empty() {
        chunks.push(current);
    }
    Ok(chunks)
}

/// Split on `.`, `!` or `?` followed by whitespace. The terminator stays
/// with its sentence; surrounding whitespace is dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0usize;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let Some(&(_, next)) = chars.peek() else {
            continue;
        };
        if !next.is_whitespace() {
            continue;
        }
        let end = i + c.len_utf8();
        push_trimmed(&mut sentences, &text[start..end]);
        start = end;
    }
    push_trimmed(&mut sentences, &text[start..]);
    sentences
}

fn push_trimmed<'a>(out: &mut Vec<&'a str>, s: &'a str) {
    let s = s.trim();
    if !s.is_empty() {
        out.push(s);
    }
}

/// The last `overlap` characters of `chunk`. If the window starts inside a
/// word, the partial word is dropped by starting after the first space.
fn overlap_tail(chunk: &str, overlap: usize) -> &str {
    if overlap == 0 {
        return "";
    }
    let char_count = chunk.chars().count();
    let skip = char_count.saturating_sub(overlap);
    let start = chunk
        .char_indices()
        .nth(skip)
        .map(|(i, _)| i)
        .unwrap_or(chunk.len());
    let tail = &chunk[start..];

    let at_word_start = chunk[..start]
        .chars()
        .next_back()
        .map_or(true, char::is_whitespace);
    if at_word_start {
        return tail.trim();
    }
    match tail.find(' ') {
        Some(pos) => tail[pos + 1..].trim(),
        None => tail.trim(),
    }
}

fn validate(chunk_size: usize, overlap: usize) -> Result<(), DocChatError> {
    if chunk_size <= overlap {
        return Err(DocChatError::InvalidConfig(format!(
            "chunk_size must be greater than overlap (got {chunk_size} <= {overlap})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Rebuild the source from fixed-size chunks by dropping each chunk's
    /// leading overlap.
    fn dedup_concat(chunks: &[String], overlap: usize) -> String {
        let mut out = String::new();
        for (i, c) in chunks.iter().enumerate() {
            if i == 0 {
                out.push_str(c);
            } else {
                out.extend(c.chars().skip(overlap));
            }
        }
        out
    }

    #[test]
    fn fixed_size_reference_example() {
        let text = "a".repeat(10_000);
        let chunks = chunk_text(&text, 3000, 200).unwrap();
        // ceil((10000 - 200) / (3000 - 200)) = 4
        assert_eq!(chunks.len(), 4);
        assert!(chunks.iter().all(|c| c.chars().count() <= 3000));
        assert_eq!(chunks[3].len(), 10_000 - 8400);
        assert_eq!(dedup_concat(&chunks, 200), text);
    }

    #[test]
    fn fixed_size_overlap_is_exact() {
        let text: String = ('a'..='z').cycle().take(1000).collect();
        let chunks = chunk_text(&text, 300, 50).unwrap();
        for pair in chunks.windows(2) {
            let prev_tail: String = pair[0].chars().skip(pair[0].chars().count() - 50).collect();
            let next_head: String = pair[1].chars().take(50).collect();
            assert_eq!(prev_tail, next_head);
        }
        assert!(text.ends_with(chunks.last().unwrap().as_str()));
        assert_eq!(dedup_concat(&chunks, 50), text);
    }

    #[test]
    fn fixed_size_short_text_is_one_chunk() {
        let chunks = chunk_text("hello world", 100, 10).unwrap();
        assert_eq!(chunks, vec!["hello world".to_string()]);
    }

    #[test]
    fn fixed_size_counts_chars_not_bytes() {
        let text = "é".repeat(25);
        let chunks = chunk_text(&text, 10, 2).unwrap();
        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
        assert_eq!(dedup_concat(&chunks, 2), text);
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        assert!(chunk_text("", 10, 2).unwrap().is_empty());
        assert!(chunk_text_smart("", 10, 2).unwrap().is_empty());
    }

    #[test]
    fn rejects_overlap_not_below_chunk_size() {
        for (size, overlap) in [(100, 100), (50, 100), (0, 0)] {
            assert!(matches!(
                chunk_text("abc", size, overlap),
                Err(DocChatError::InvalidConfig(_))
            ));
            assert!(matches!(
                chunk_text_smart("abc", size, overlap),
                Err(DocChatError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn sentence_split_on_terminator_and_whitespace() {
        let s = split_sentences("One. Two! Three? Four");
        assert_eq!(s, vec!["One.", "Two!", "Three?", "Four"]);
    }

    #[test]
    fn sentence_split_ignores_inner_dots() {
        let s = split_sentences("Version 1.2 shipped. See e.g.this one.");
        assert_eq!(s, vec!["Version 1.2 shipped.", "See e.g.this one."]);
    }

    #[test]
    fn smart_keeps_sentences_whole() {
        let sentences: Vec<String> = (0..40)
            .map(|i| format!("Sentence number {i} talks about topic {i}."))
            .collect();
        let text = sentences.join(" ");
        let chunks = chunk_text_smart(&text, 200, 40).unwrap();
        assert!(chunks.len() > 1);
        for s in &sentences {
            assert!(
                chunks.iter().any(|c| c.contains(s.as_str())),
                "sentence split across chunks: {s}"
            );
        }
    }

    #[test]
    fn smart_respects_size_for_short_sentences() {
        let text = "Alpha beta gamma. ".repeat(100);
        let chunks = chunk_text_smart(text.trim(), 120, 20).unwrap();
        // Overlap seed (≤ 20) + sentences, never more than size + seed.
        for c in &chunks {
            assert!(c.chars().count() <= 120 + 21, "chunk too long: {}", c.len());
        }
    }

    #[test]
    fn smart_seeds_next_chunk_with_word_aligned_overlap() {
        let text = "The quick brown fox jumps. Over the lazy dog today. And then it sleeps.";
        let chunks = chunk_text_smart(text, 30, 12).unwrap();
        assert_eq!(chunks[0], "The quick brown fox jumps.");
        // Last 12 chars of chunk 0 are "n fox jumps."; the partial word is dropped.
        assert!(
            chunks[1].starts_with("fox jumps. Over the lazy dog today."),
            "got {:?}",
            chunks[1]
        );
    }

    #[test]
    fn smart_oversized_sentence_stays_intact() {
        let long = format!("{}.", "word ".repeat(50).trim());
        let text = format!("Short one. {long} Tail.");
        let chunks = chunk_text_smart(&text, 40, 5).unwrap();
        assert!(chunks.iter().any(|c| c.contains(long.as_str())));
    }

    #[test]
    fn smart_zero_overlap_has_no_seed() {
        let chunks = chunk_text_smart("Aaaa. Bbbb. Cccc.", 6, 0).unwrap();
        assert_eq!(chunks, vec!["Aaaa.", "Bbbb.", "Cccc."]);
    }

    #[test]
    fn overlap_tail_keeps_whole_first_word() {
        // window "beta gamma" starts right after a space
        assert_eq!(overlap_tail("alpha beta gamma", 10), "beta gamma");
        // window "eta gamma" starts mid-word
        assert_eq!(overlap_tail("alpha beta gamma", 9), "gamma");
        assert_eq!(overlap_tail("alpha beta", 50), "alpha beta");
    }

    #[test]
    fn overlap_tail_without_space_keeps_window() {
        assert_eq!(overlap_tail("abcdefgh", 3), "fgh");
        assert_eq!(overlap_tail("ab", 5), "ab");
    }
}

//! Splitting display text around the search keyword.

use serde::Serialize;

/// A run of display text, highlighted if it matched the keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub highlighted: bool,
}

/// Splits `text` into segments, marking every non-overlapping,
/// case-insensitive occurrence of `keyword`.
///
/// The segments concatenate back to `text`.
pub fn highlight<'a>(text: &'a str, keyword: &str) -> Vec<Segment<'a>> {
    let needle = keyword.to_lowercase();
    if text.is_empty() {
        return Vec::new();
    }
    if needle.is_empty() {
        return vec![Segment {
            text,
            highlighted: false,
        }];
    }

    let mut segments = Vec::new();
    let mut plain_start = 0;
    let mut cursor = 0;

    while cursor < text.len() {
        match match_len_at(&text[cursor..], &needle) {
            Some(len) => {
                if plain_start < cursor {
                    segments.push(Segment {
                        text: &text[plain_start..cursor],
                        highlighted: false,
                    });
                }
                segments.push(Segment {
                    text: &text[cursor..cursor + len],
                    highlighted: true,
                });
                cursor += len;
                plain_start = cursor;
            }
            None => {
                // Step one char; cursor always stays on a char boundary
                cursor += text[cursor..].chars().next().map_or(1, char::len_utf8);
            }
        }
    }

    if plain_start < text.len() {
        segments.push(Segment {
            text: &text[plain_start..],
            highlighted: false,
        });
    }

    segments
}

/// Byte length of the prefix of `haystack` that lowercases to `needle`.
fn match_len_at(haystack: &str, needle: &str) -> Option<usize> {
    let mut lowered = String::new();
    for (offset, ch) in haystack.char_indices() {
        lowered.extend(ch.to_lowercase());
        if !needle.starts_with(lowered.as_str()) {
            return None;
        }
        if lowered.len() == needle.len() {
            return Some(offset + ch.len_utf8());
        }
    }
    None
}

// WHY: Input cleanup is split in two: byte-level normalization of the whole call input
// and per-span text cleaning that produces what the feature extractor sees

use std::borrow::Cow;

use crate::script::{classify, CharClass};

use super::MAX_NUM_INPUT_BYTES;

const REPLACEMENT: char = '\u{FFFD}';

/// Cut `raw` to at most `max_num_bytes` input bytes and decode it as UTF-8
/// Each maximal invalid sequence becomes one U+FFFD; a character split by the cut is dropped
/// The budget counts input bytes, so inputs shorter than it are never altered by the cut
/// Borrows when the kept bytes are already valid UTF-8
/// Never examines more than `MAX_NUM_INPUT_BYTES`; detector configs above that are rejected earlier
pub fn normalize(raw: &[u8], max_num_bytes: usize) -> Cow<'_, str> {
    let budget = max_num_bytes.min(MAX_NUM_INPUT_BYTES);
    let capped = raw.len() > budget;
    let input = &raw[..raw.len().min(budget)];

    match std::str::from_utf8(input) {
        Ok(text) => return Cow::Borrowed(text),
        // only our own cut produced the incomplete tail
        Err(error) if capped && error.error_len().is_none() => {
            return Cow::Borrowed(valid_prefix(input, error.valid_up_to()));
        }
        Err(_) => {}
    }

    let mut output = String::with_capacity(input.len() + 8);
    let mut rest = input;
    loop {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                output.push_str(valid);
                break;
            }
            Err(error) => {
                output.push_str(valid_prefix(rest, error.valid_up_to()));
                match error.error_len() {
                    Some(invalid_len) => {
                        output.push(REPLACEMENT);
                        rest = &rest[error.valid_up_to() + invalid_len..];
                    }
                    None => {
                        if !capped {
                            output.push(REPLACEMENT);
                        }
                        break;
                    }
                }
            }
        }
    }

    Cow::Owned(output)
}

fn valid_prefix(bytes: &[u8], valid_up_to: usize) -> &str {
    // valid_up_to comes from a Utf8Error, so this cannot fail
    std::str::from_utf8(&bytes[..valid_up_to]).unwrap_or_default()
}

/// Clean a span for scoring: lowercase letters, collapse every run of separators
/// (digits, punctuation, whitespace, symbols) into one space, pad with one space on each side
/// Returns an empty string when the span holds no letters
pub fn clean_span_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + 2);
    clean_span_text_into(text, &mut result);
    result
}

/// Clean a span into a reusable buffer
pub fn clean_span_text_into(text: &str, buffer: &mut String) {
    buffer.clear();
    buffer.reserve(text.len() + 2);
    buffer.push(' ');

    let mut prev_was_space = true;
    let mut saw_letter = false;
    for ch in text.chars() {
        match classify(ch) {
            CharClass::Letter(_) => {
                buffer.extend(ch.to_lowercase());
                prev_was_space = false;
                saw_letter = true;
            }
            CharClass::Mark => {
                // A mark with no base letter carries nothing
                if !prev_was_space {
                    buffer.push(ch);
                }
            }
            CharClass::Other => {
                if !prev_was_space {
                    buffer.push(' ');
                    prev_was_space = true;
                }
            }
        }
    }

    if !saw_letter {
        buffer.clear();
        return;
    }
    if !prev_was_space {
        buffer.push(' ');
    }
}

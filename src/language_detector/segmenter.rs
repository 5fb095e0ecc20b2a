// WHY: Spans of one writing system are the unit the model scores
// Lazy iterator over the normalized text; callers collect it once per call

use std::ops::Range;

use crate::script::{classify, CharClass, Script};

/// Maximal run of one script; separators and marks ride along with the span they follow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span<'a> {
    /// Byte range inside the normalized text
    pub byte_range: Range<usize>,
    /// `Script::Common` only for a leading run with no letters at all
    pub script: Script,
    pub text: &'a str,
}

impl<'a> Span<'a> {
    pub fn len(&self) -> usize {
        self.byte_range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.byte_range.is_empty()
    }

    /// Whether the span has letters to score
    pub fn has_letters(&self) -> bool {
        self.script != Script::Common
    }
}

/// Iterator producing consecutive, non-overlapping spans covering the whole text
pub struct ScriptSpans<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> ScriptSpans<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }
}

impl<'a> Iterator for ScriptSpans<'a> {
    type Item = Span<'a>;

    fn next(&mut self) -> Option<Span<'a>> {
        if self.pos >= self.text.len() {
            return None;
        }

        let start = self.pos;
        let mut script: Option<Script> = None;
        let mut end = self.text.len();

        for (offset, ch) in self.text[start..].char_indices() {
            if let CharClass::Letter(letter_script) = classify(ch) {
                match script {
                    None if offset == 0 => script = Some(letter_script),
                    // a letter after a leading run of separators closes that run
                    None => {
                        end = start + offset;
                        break;
                    }
                    Some(current) if current != letter_script => {
                        end = start + offset;
                        break;
                    }
                    Some(_) => {}
                }
            }
        }

        self.pos = end;
        Some(Span {
            byte_range: start..end,
            script: script.unwrap_or(Script::Common),
            text: &self.text[start..end],
        })
    }
}

/// Split normalized text into script spans; empty text yields no spans
pub fn segment(text: &str) -> Vec<Span<'_>> {
    ScriptSpans::new(text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_has_no_spans() {
        assert!(segment("").is_empty());
    }

    #[test]
    fn test_single_script_is_one_span() {
        let text = "This text is written in English.";
        let spans = segment(text);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].script, Script::Latin);
        assert_eq!(spans[0].byte_range, 0..text.len());
        assert_eq!(spans[0].text, text);
    }

    #[test]
    fn test_bilingual_split_attaches_punctuation_to_previous_span() {
        let text = "This piece of text is in English. Този текст е на Български.";
        let spans = segment(text);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].script, Script::Latin);
        assert_eq!(spans[0].text, "This piece of text is in English. ");
        assert_eq!(spans[1].script, Script::Cyrillic);
        assert_eq!(spans[1].text, "Този текст е на Български.");
        assert_eq!(spans[0].byte_range.end, spans[1].byte_range.start);
    }

    #[test]
    fn test_leading_separators_form_their_own_span() {
        let spans = segment("  123 hello");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].script, Script::Common);
        assert_eq!(spans[0].text, "  123 ");
        assert!(!spans[0].has_letters());
        assert_eq!(spans[1].script, Script::Latin);
        assert_eq!(spans[1].text, "hello");
    }

    #[test]
    fn test_punctuation_only_is_one_common_span() {
        let spans = segment("!!! ... 42");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].script, Script::Common);
    }

    #[test]
    fn test_separators_do_not_break_a_script_run() {
        let spans = segment("abc, 123 - def");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].script, Script::Latin);
    }

    #[test]
    fn test_spans_cover_text_contiguously() {
        let text = "Hello мир 世界 and Ελληνικά!";
        let spans = segment(text);
        let scripts: Vec<Script> = spans.iter().map(|s| s.script).collect();
        assert_eq!(
            scripts,
            vec![Script::Latin, Script::Cyrillic, Script::Han, Script::Latin, Script::Greek]
        );
        let mut expected_start = 0;
        for span in &spans {
            assert_eq!(span.byte_range.start, expected_start);
            assert_eq!(&text[span.byte_range.clone()], span.text);
            expected_start = span.byte_range.end;
        }
        assert_eq!(expected_start, text.len());
    }

    #[test]
    fn test_combining_marks_stay_in_span() {
        let spans = segment("cafe\u{0301} noir");
        assert_eq!(spans.len(), 1);
    }
}

// WHY: Coarse writing-system classification driven by a sorted range table
// Adding a script means adding table rows, the segmenter control flow never changes

/// Coarse script id; the discriminant doubles as the feature id fed to the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Script {
    /// Digits, punctuation, whitespace, symbols
    Common = 0,
    /// Combining marks that take the script of their base letter
    Inherited = 1,
    Latin = 2,
    Greek = 3,
    Cyrillic = 4,
    Armenian = 5,
    Hebrew = 6,
    Arabic = 7,
    Devanagari = 8,
    Bengali = 9,
    Gurmukhi = 10,
    Gujarati = 11,
    Oriya = 12,
    Tamil = 13,
    Telugu = 14,
    Kannada = 15,
    Malayalam = 16,
    Sinhala = 17,
    Thai = 18,
    Lao = 19,
    Tibetan = 20,
    Myanmar = 21,
    Georgian = 22,
    Hangul = 23,
    Ethiopic = 24,
    Khmer = 25,
    Mongolian = 26,
    /// Han ideographs together with Japanese kana
    Han = 27,
    /// Letters from scripts the table does not list
    Other = 28,
}

impl Script {
    /// Size of the script feature domain
    pub const COUNT: usize = 29;

    pub fn id(self) -> usize {
        self as usize
    }
}

/// How a single codepoint participates in segmentation and cleaning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// A letter carrying a concrete script
    Letter(Script),
    /// Belongs to a word but carries no script of its own (combining marks, vowel signs)
    Mark,
    /// Separator material: whitespace, digits, punctuation, symbols
    Other,
}

impl CharClass {
    pub fn is_letter(self) -> bool {
        matches!(self, CharClass::Letter(_))
    }
}

/// Inclusive codepoint ranges, sorted by start and non-overlapping
const SCRIPT_RANGES: &[(u32, u32, Script)] = &[
    (0x0041, 0x005A, Script::Latin),
    (0x0061, 0x007A, Script::Latin),
    (0x00AA, 0x00AA, Script::Latin),
    (0x00BA, 0x00BA, Script::Latin),
    (0x00C0, 0x00D6, Script::Latin),
    (0x00D8, 0x00F6, Script::Latin),
    (0x00F8, 0x024F, Script::Latin),
    (0x0250, 0x02AF, Script::Latin),
    (0x0300, 0x036F, Script::Inherited),
    (0x0370, 0x03FF, Script::Greek),
    (0x0400, 0x052F, Script::Cyrillic),
    (0x0530, 0x058F, Script::Armenian),
    (0x0590, 0x05FF, Script::Hebrew),
    (0x0600, 0x06FF, Script::Arabic),
    (0x0750, 0x077F, Script::Arabic),
    (0x0900, 0x097F, Script::Devanagari),
    (0x0980, 0x09FF, Script::Bengali),
    (0x0A00, 0x0A7F, Script::Gurmukhi),
    (0x0A80, 0x0AFF, Script::Gujarati),
    (0x0B00, 0x0B7F, Script::Oriya),
    (0x0B80, 0x0BFF, Script::Tamil),
    (0x0C00, 0x0C7F, Script::Telugu),
    (0x0C80, 0x0CFF, Script::Kannada),
    (0x0D00, 0x0D7F, Script::Malayalam),
    (0x0D80, 0x0DFF, Script::Sinhala),
    (0x0E00, 0x0E7F, Script::Thai),
    (0x0E80, 0x0EFF, Script::Lao),
    (0x0F00, 0x0FFF, Script::Tibetan),
    (0x1000, 0x109F, Script::Myanmar),
    (0x10A0, 0x10FF, Script::Georgian),
    (0x1100, 0x11FF, Script::Hangul),
    (0x1200, 0x139F, Script::Ethiopic),
    (0x1780, 0x17FF, Script::Khmer),
    (0x1800, 0x18AF, Script::Mongolian),
    (0x1AB0, 0x1AFF, Script::Inherited),
    (0x1C80, 0x1C8F, Script::Cyrillic),
    (0x1C90, 0x1CBF, Script::Georgian),
    (0x1DC0, 0x1DFF, Script::Inherited),
    (0x1E00, 0x1EFF, Script::Latin),
    (0x1F00, 0x1FFF, Script::Greek),
    (0x20D0, 0x20FF, Script::Inherited),
    (0x2C60, 0x2C7F, Script::Latin),
    (0x2D00, 0x2D2F, Script::Georgian),
    (0x2DE0, 0x2DFF, Script::Cyrillic),
    (0x2E80, 0x2FDF, Script::Han),
    (0x3005, 0x3007, Script::Han),
    (0x3021, 0x3029, Script::Han),
    (0x3041, 0x309F, Script::Han),
    (0x30A0, 0x30FF, Script::Han),
    (0x3130, 0x318F, Script::Hangul),
    (0x31F0, 0x31FF, Script::Han),
    (0x3400, 0x4DBF, Script::Han),
    (0x4E00, 0x9FFF, Script::Han),
    (0xA640, 0xA69F, Script::Cyrillic),
    (0xA720, 0xA7FF, Script::Latin),
    (0xA960, 0xA97F, Script::Hangul),
    (0xAB30, 0xAB6F, Script::Latin),
    (0xAC00, 0xD7AF, Script::Hangul),
    (0xD7B0, 0xD7FF, Script::Hangul),
    (0xF900, 0xFAFF, Script::Han),
    (0xFB00, 0xFB06, Script::Latin),
    (0xFB1D, 0xFB4F, Script::Hebrew),
    (0xFB50, 0xFDFF, Script::Arabic),
    (0xFE20, 0xFE2F, Script::Inherited),
    (0xFE70, 0xFEFF, Script::Arabic),
    (0xFF21, 0xFF3A, Script::Latin),
    (0xFF41, 0xFF5A, Script::Latin),
    (0xFF66, 0xFF9F, Script::Han),
    (0xFFA0, 0xFFDC, Script::Hangul),
    (0x20000, 0x2FA1F, Script::Han),
];

/// Table lookup only; `Common` for codepoints outside every listed block
pub fn script_of(ch: char) -> Script {
    let cp = ch as u32;
    match SCRIPT_RANGES.binary_search_by(|&(start, end, _)| {
        if end < cp {
            std::cmp::Ordering::Less
        } else if start > cp {
            std::cmp::Ordering::Greater
        } else {
            std::cmp::Ordering::Equal
        }
    }) {
        Ok(index) => SCRIPT_RANGES[index].2,
        Err(_) => Script::Common,
    }
}

/// Classify a codepoint for segmentation and cleaning
pub fn classify(ch: char) -> CharClass {
    match script_of(ch) {
        Script::Inherited => CharClass::Mark,
        Script::Common => {
            if ch.is_alphabetic() {
                CharClass::Letter(Script::Other)
            } else {
                CharClass::Other
            }
        }
        script => {
            if ch.is_alphabetic() {
                CharClass::Letter(script)
            } else if ch.is_whitespace() || ch.is_numeric() || ch.is_ascii() {
                CharClass::Other
            } else {
                // Vowel signs and viramas inside a script block stay with their word
                CharClass::Mark
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted_and_disjoint() {
        for pair in SCRIPT_RANGES.windows(2) {
            let (start_a, end_a, _) = pair[0];
            let (start_b, _, _) = pair[1];
            assert!(start_a <= end_a, "range {start_a:#x}..={end_a:#x} is inverted");
            assert!(end_a < start_b, "range {start_a:#x} overlaps {start_b:#x}");
        }
    }

    #[test]
    fn test_common_scripts() {
        assert_eq!(classify('a'), CharClass::Letter(Script::Latin));
        assert_eq!(classify('Z'), CharClass::Letter(Script::Latin));
        assert_eq!(classify('é'), CharClass::Letter(Script::Latin));
        assert_eq!(classify('ж'), CharClass::Letter(Script::Cyrillic));
        assert_eq!(classify('λ'), CharClass::Letter(Script::Greek));
        assert_eq!(classify('字'), CharClass::Letter(Script::Han));
        assert_eq!(classify('ひ'), CharClass::Letter(Script::Han));
        assert_eq!(classify('워'), CharClass::Letter(Script::Hangul));
        assert_eq!(classify('ש'), CharClass::Letter(Script::Hebrew));
        assert_eq!(classify('ب'), CharClass::Letter(Script::Arabic));
        assert_eq!(classify('क'), CharClass::Letter(Script::Devanagari));
    }

    #[test]
    fn test_separators_and_marks() {
        for ch in [' ', '\t', '.', ',', '7', '!', '×', '€', '\u{FFFD}'] {
            assert_eq!(classify(ch), CharClass::Other, "{ch:?} should be separator material");
        }
        assert_eq!(classify('\u{0301}'), CharClass::Mark);
        // Devanagari virama
        assert_eq!(classify('\u{094D}'), CharClass::Mark);
    }

    #[test]
    fn test_unlisted_letters_are_other_script() {
        // Cherokee
        assert_eq!(classify('Ꭰ'), CharClass::Letter(Script::Other));
    }

    #[test]
    fn test_script_ids_fit_domain() {
        assert_eq!(Script::Common.id(), 0);
        assert_eq!(Script::Other.id(), Script::COUNT - 1);
    }
}

// WHY: Closed label set as a typed enumeration resolved once when the model loads
// Scoring and aggregation never touch free-form strings, so invalid labels cannot appear

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

macro_rules! languages {
    ($($variant:ident => ($code:literal, $name:literal)),+ $(,)?) => {
        /// Language labels the scoring model can emit, plus `Unknown` ("und")
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Language {
            $($variant,)+
        }

        impl Language {
            /// Every label, in declaration order
            pub const ALL: &'static [Language] = &[$(Language::$variant,)+];

            /// ISO-like code as emitted by the model ("en", "zh-Latn", "und", ...)
            pub fn code(self) -> &'static str {
                match self {
                    $(Language::$variant => $code,)+
                }
            }

            /// Human readable English name
            pub fn name(self) -> &'static str {
                match self {
                    $(Language::$variant => $name,)+
                }
            }

            /// Resolve a label code, `None` for codes outside the closed set
            pub fn from_code(code: &str) -> Option<Language> {
                match code {
                    $($code => Some(Language::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

languages! {
    Unknown => ("und", "Undetermined"),
    Afrikaans => ("af", "Afrikaans"),
    Amharic => ("am", "Amharic"),
    Arabic => ("ar", "Arabic"),
    Bulgarian => ("bg", "Bulgarian"),
    BulgarianLatin => ("bg-Latn", "Bulgarian (Latin script)"),
    Bengali => ("bn", "Bengali"),
    Bosnian => ("bs", "Bosnian"),
    Catalan => ("ca", "Catalan"),
    Cebuano => ("ceb", "Cebuano"),
    Corsican => ("co", "Corsican"),
    Czech => ("cs", "Czech"),
    Welsh => ("cy", "Welsh"),
    Danish => ("da", "Danish"),
    German => ("de", "German"),
    Greek => ("el", "Greek"),
    GreekLatin => ("el-Latn", "Greek (Latin script)"),
    English => ("en", "English"),
    Esperanto => ("eo", "Esperanto"),
    Spanish => ("es", "Spanish"),
    Estonian => ("et", "Estonian"),
    Basque => ("eu", "Basque"),
    Persian => ("fa", "Persian"),
    Finnish => ("fi", "Finnish"),
    Filipino => ("fil", "Filipino"),
    French => ("fr", "French"),
    WesternFrisian => ("fy", "Western Frisian"),
    Irish => ("ga", "Irish"),
    ScottishGaelic => ("gd", "Scottish Gaelic"),
    Galician => ("gl", "Galician"),
    Gujarati => ("gu", "Gujarati"),
    Hausa => ("ha", "Hausa"),
    Hawaiian => ("haw", "Hawaiian"),
    Hindi => ("hi", "Hindi"),
    HindiLatin => ("hi-Latn", "Hindi (Latin script)"),
    Hmong => ("hmn", "Hmong"),
    Croatian => ("hr", "Croatian"),
    HaitianCreole => ("ht", "Haitian Creole"),
    Hungarian => ("hu", "Hungarian"),
    Armenian => ("hy", "Armenian"),
    Indonesian => ("id", "Indonesian"),
    Igbo => ("ig", "Igbo"),
    Icelandic => ("is", "Icelandic"),
    Italian => ("it", "Italian"),
    Hebrew => ("iw", "Hebrew"),
    Japanese => ("ja", "Japanese"),
    JapaneseLatin => ("ja-Latn", "Japanese (Latin script)"),
    Javanese => ("jv", "Javanese"),
    Georgian => ("ka", "Georgian"),
    Kazakh => ("kk", "Kazakh"),
    Khmer => ("km", "Khmer"),
    Kannada => ("kn", "Kannada"),
    Korean => ("ko", "Korean"),
    Kurdish => ("ku", "Kurdish"),
    Kyrgyz => ("ky", "Kyrgyz"),
    Latin => ("la", "Latin"),
    Luxembourgish => ("lb", "Luxembourgish"),
    Lao => ("lo", "Lao"),
    Lithuanian => ("lt", "Lithuanian"),
    Latvian => ("lv", "Latvian"),
    Malagasy => ("mg", "Malagasy"),
    Maori => ("mi", "Maori"),
    Macedonian => ("mk", "Macedonian"),
    Malayalam => ("ml", "Malayalam"),
    Mongolian => ("mn", "Mongolian"),
    Marathi => ("mr", "Marathi"),
    Malay => ("ms", "Malay"),
    Maltese => ("mt", "Maltese"),
    Burmese => ("my", "Burmese"),
    Nepali => ("ne", "Nepali"),
    Dutch => ("nl", "Dutch"),
    Norwegian => ("no", "Norwegian"),
    Chichewa => ("ny", "Chichewa"),
    Punjabi => ("pa", "Punjabi"),
    Polish => ("pl", "Polish"),
    Pashto => ("ps", "Pashto"),
    Portuguese => ("pt", "Portuguese"),
    Romanian => ("ro", "Romanian"),
    Russian => ("ru", "Russian"),
    RussianLatin => ("ru-Latn", "Russian (Latin script)"),
    Sindhi => ("sd", "Sindhi"),
    Sinhala => ("si", "Sinhala"),
    Slovak => ("sk", "Slovak"),
    Slovenian => ("sl", "Slovenian"),
    Samoan => ("sm", "Samoan"),
    Shona => ("sn", "Shona"),
    Somali => ("so", "Somali"),
    Albanian => ("sq", "Albanian"),
    Serbian => ("sr", "Serbian"),
    SouthernSotho => ("st", "Southern Sotho"),
    Sundanese => ("su", "Sundanese"),
    Swedish => ("sv", "Swedish"),
    Swahili => ("sw", "Swahili"),
    Tamil => ("ta", "Tamil"),
    Telugu => ("te", "Telugu"),
    Tajik => ("tg", "Tajik"),
    Thai => ("th", "Thai"),
    Turkish => ("tr", "Turkish"),
    Ukrainian => ("uk", "Ukrainian"),
    Urdu => ("ur", "Urdu"),
    Uzbek => ("uz", "Uzbek"),
    Vietnamese => ("vi", "Vietnamese"),
    Xhosa => ("xh", "Xhosa"),
    Yiddish => ("yi", "Yiddish"),
    Yoruba => ("yo", "Yoruba"),
    Chinese => ("zh", "Chinese"),
    ChineseLatin => ("zh-Latn", "Chinese (Latin script)"),
    Zulu => ("zu", "Zulu"),
}

impl Language {
    pub fn is_unknown(self) -> bool {
        self == Language::Unknown
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::Unknown
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// Serialized as the bare code so JSON output matches what bindings expose
impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Language::from_code(&code)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown language code '{code}'")))
    }
}

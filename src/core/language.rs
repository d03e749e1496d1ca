use once_cell::sync::Lazy;
use regex::Regex;

/// Common ISO 639-2 codes offered by the language picker. Any code is accepted.
pub const LANGUAGES: [(&str, &str); 12] = [
    ("eng", "English"),
    ("per", "Persian"),
    ("ara", "Arabic"),
    ("spa", "Spanish"),
    ("fre", "French"),
    ("ger", "German"),
    ("ita", "Italian"),
    ("por", "Portuguese"),
    ("rus", "Russian"),
    ("tur", "Turkish"),
    ("jpn", "Japanese"),
    ("chi", "Chinese"),
];

static RE_LANGUAGE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z]{2,3}(-[A-Za-z0-9]{2,8})?$").unwrap());

pub fn looks_like_language_code(code: &str) -> bool {
    RE_LANGUAGE_CODE.is_match(code)
}

pub fn language_name(code: &str) -> Option<&'static str> {
    LANGUAGES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, name)| *name)
}

/// Characters only found in simplified Chinese text
const SIMPLIFIED_MARKERS: [char; 6] = ['简', '国', '学', '门', '车', '书'];

fn is_han(c: char) -> bool {
    matches!(c, '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}')
}

fn is_kana(c: char) -> bool {
    matches!(c, '\u{3040}'..='\u{309F}' | '\u{30A0}'..='\u{30FF}')
}

fn is_hangul(c: char) -> bool {
    matches!(c, '\u{AC00}'..='\u{D7AF}')
}

/// Best-effort script based language guess for text with no declared language.
///
/// Kana wins over Han so mixed Japanese text is not taken for Chinese.
pub fn detect_language(text: &str) -> &'static str {
    if text.chars().any(is_kana) {
        return "ja";
    }
    if text.chars().any(is_hangul) {
        return "ko";
    }
    if text.chars().any(is_han) {
        if text.chars().any(|c| SIMPLIFIED_MARKERS.contains(&c)) {
            return "zh-CN";
        }
        return "zh-TW";
    }
    "en"
}

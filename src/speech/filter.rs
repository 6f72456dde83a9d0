use strum_macros::Display;

/// Why a transcript was judged not to be speech
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum FilterReason {
    Empty,
    Boilerplate,
    Filler,
    Repetitive,
}

/// Lines recognizers hallucinate on silence or background noise
const BOILERPLATE: &[&str] = &[
    "謝謝大家",
    "謝謝觀看",
    "谢谢观看",
    "感謝收看",
    "字幕由Amara.org社區提供",
    "字幕由Amara.org社区提供",
    "請不吝點贊訂閱轉發打賞支持明鏡與點點欄目",
    "thanks for watching",
    "thank you for watching",
    "please subscribe",
    "ご視聴ありがとうございました",
];

const FILLER_WORDS: &[&str] = &["uh", "um", "umm", "hmm", "mm", "ah", "er", "えー", "あの", "えっと"];
const FILLER_CHARS: &[char] = &['嗯', '啊', '呃', '哦', '欸', '喔'];

/// Entries at least this long also match when embedded in a longer line
const SUBSTRING_MATCH_CHARS: usize = 8;

/// Strips surrounding punctuation and whitespace, lowercases
fn normalize(text: &str) -> String {
    text.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase()
}

fn is_filler(normalized: &str) -> bool {
    let compact: String = normalized.chars().filter(|c| c.is_alphanumeric()).collect();
    if !compact.is_empty() && compact.chars().all(|c| FILLER_CHARS.contains(&c)) {
        return true;
    }
    normalized
        .split(|c: char| !c.is_alphanumeric() && c != 'ー')
        .filter(|word| !word.is_empty())
        .all(|word| FILLER_WORDS.contains(&word))
}

fn is_repetitive(normalized: &str) -> bool {
    let chars: Vec<char> = normalized.chars().filter(|c| !c.is_whitespace()).collect();
    if chars.len() >= 3 && chars.iter().all(|c| *c == chars[0]) {
        return true;
    }

    let words: Vec<&str> = normalized.split_whitespace().collect();
    words.len() >= 4 && words.iter().all(|w| *w == words[0])
}

fn is_boilerplate(normalized: &str) -> bool {
    BOILERPLATE.iter().any(|entry| {
        let entry = normalize(entry);
        normalized == entry
            || (entry.chars().count() >= SUBSTRING_MATCH_CHARS && normalized.contains(&entry))
    })
}

/// Classifies recognized text; `None` means it should be processed
pub fn classify(text: &str) -> Option<FilterReason> {
    let normalized = normalize(text);
    if normalized.is_empty() {
        return Some(FilterReason::Empty);
    }
    if is_boilerplate(&normalized) {
        return Some(FilterReason::Boilerplate);
    }
    if is_filler(&normalized) {
        return Some(FilterReason::Filler);
    }
    if is_repetitive(&normalized) {
        return Some(FilterReason::Repetitive);
    }
    None
}

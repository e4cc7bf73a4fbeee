//! 번역 응답 정리.
//!
//! 모델은 `TRANSLATION: ...` 형식을 따르라는 지시를 받지만 종종
//! 코드 블록, 지시문 반복, 마크다운 기호를 덧붙인다. 여기서 번역문만 남긴다.

/// 번역문 시작 표식
const MARKER: &str = "translation:";

/// 이 표현이 처음 나오는 지점부터 끝까지는 지시문 반복으로 보고 버린다
const TRAILING_NOISE: &[&str] = &[
    "instructions:",
    "instruction:",
    "the above",
    "as requested",
    "no other commentary",
    "do not include",
];

/// 줄 맨 앞에서 하나만 제거하는 마크다운 기호
const LEADING_MARKS: &[char] = &['#', '>', '*', '-', '`'];

/// 모델 응답에서 번역문만 추출
pub fn extract_translation(content: &str) -> String {
    let without_code = strip_code_blocks(content);

    let body = match find_ascii_ci(&without_code, MARKER) {
        Some(idx) => without_code[idx + MARKER.len()..].trim(),
        None => without_code.trim(),
    };

    let cut = TRAILING_NOISE
        .iter()
        .filter_map(|needle| find_ascii_ci(body, needle))
        .min()
        .unwrap_or(body.len());
    let body = body[..cut].trim();

    body.lines()
        .map(|line| line.strip_prefix(LEADING_MARKS).unwrap_or(line))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// 닫힌 ``` 블록 제거 (닫히지 않은 블록은 그대로 둔다)
fn strip_code_blocks(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut rest = content;
    loop {
        let Some(open) = rest.find("```") else {
            out.push_str(rest);
            break;
        };
        let after_open = &rest[open + 3..];
        let Some(close) = after_open.find("```") else {
            out.push_str(rest);
            break;
        };
        out.push_str(&rest[..open]);
        rest = &after_open[close + 3..];
    }
    out
}

/// ASCII 대소문자 무시 검색. 반환 인덱스는 원문 바이트 기준.
fn find_ascii_ci(haystack: &str, needle: &str) -> Option<usize> {
    haystack.to_ascii_lowercase().find(needle)
}

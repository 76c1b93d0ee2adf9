//! 검색어 토크나이저
//!
//! 자유 입력 검색어를 검색 항목 목록으로 분리합니다.
//!
//! # 문법
//! - `"..."`: 따옴표 안의 내용 전체가 하나의 항목 (내부 공백 유지)
//! - 그 외: 공백이나 쉼표가 아닌 문자의 최대 연속 구간 (단어 안의 `"`는 항목에 포함)
//! - 따옴표 개수가 홀수: 마지막 따옴표 이후 나머지 전체가 추가 항목
//!
//! 앞뒤 공백을 제거한 뒤 빈 항목은 버립니다.
//!
//! ```
//! use logsift_pipeline::search::tokenize;
//!
//! assert_eq!(tokenize(r#"error "not found" test"#), vec!["error", "not found", "test"]);
//! assert_eq!(tokenize("a,b c"), vec!["a", "b", "c"]);
//! assert_eq!(tokenize(r#"foo "bar"#), vec!["foo", "bar"]);
//! ```

/// 검색어를 항목 목록으로 분리합니다.
///
/// `"`는 항목의 첫 글자일 때만 여는 따옴표로 취급합니다.
pub fn tokenize(query: &str) -> Vec<String> {
    let mut terms = Vec::new();
    let mut rest = query;
    let mut remainder_emitted = false;

    while let Some(start) = rest.find(|c: char| !is_separator(c)) {
        rest = &rest[start..];

        if let Some(quoted) = rest.strip_prefix('"') {
            if let Some(end) = quoted.find('"') {
                push_term(&mut terms, &quoted[..end]);
                rest = &quoted[end + 1..];
                continue;
            }
            // 닫히지 않은 여는 따옴표: 나머지 전체가 하나의 항목
            push_term(&mut terms, quoted);
            remainder_emitted = true;
            break;
        }

        let end = rest.find(is_separator).unwrap_or(rest.len());
        push_term(&mut terms, &rest[..end]);
        rest = &rest[end..];
    }

    // 따옴표 개수가 홀수: 마지막 따옴표 이후 나머지를 추가 항목으로
    let odd_quotes = query.matches('"').count() % 2 == 1;
    if let Some(last) = query.rfind('"').filter(|_| odd_quotes && !remainder_emitted) {
        push_term(&mut terms, &query[last + 1..]);
    }

    terms
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == ','
}

fn push_term(terms: &mut Vec<String>, raw: &str) {
    let term = raw.trim();
    if !term.is_empty() {
        terms.push(term.to_owned());
    }
}

//! 검색 모듈 -- 토크나이저, 필터 & 매치 엔진, 매치 커서
//!
//! # 사용 예시
//! ```ignore
//! use logsift_pipeline::search::{FilterState, SearchMode, evaluate};
//!
//! let mut state = FilterState::with_mode(SearchMode::Highlight);
//! state.query = r#"error "not found""#.to_owned();
//! let outcome = evaluate(&records, &state);
//! ```

pub mod cursor;
pub mod filter;
pub mod tokenizer;

pub use cursor::MatchCursor;
pub use filter::{DateRange, FilterEngine, FilterOutcome, FilterState, SearchQuery, evaluate};
pub use tokenizer::tokenize;

use std::fmt;

use serde::{Deserialize, Serialize};

/// 검색 결과 표시 모드
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// 보이는 목록은 그대로 두고 매치 위치만 기록
    #[default]
    Highlight,
    /// 매치하는 레코드만 표시
    OnlyMatching,
}

impl SearchMode {
    /// 문자열에서 모드를 파싱합니다. 대소문자를 구분하지 않습니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "highlight" => Some(Self::Highlight),
            "only_matching" => Some(Self::OnlyMatching),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Highlight => "highlight",
            Self::OnlyMatching => "only_matching",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_mode_from_str_loose() {
        assert_eq!(SearchMode::from_str_loose("Highlight"), Some(SearchMode::Highlight));
        assert_eq!(
            SearchMode::from_str_loose("only-matching"),
            Some(SearchMode::OnlyMatching)
        );
        assert_eq!(SearchMode::from_str_loose("filter"), None);
    }

    #[test]
    fn search_mode_default_is_highlight() {
        assert_eq!(SearchMode::default(), SearchMode::Highlight);
        assert_eq!(SearchMode::OnlyMatching.to_string(), "only_matching");
    }
}

//! 파일 수집 모듈 -- 디스크에서 로그 파일 배치를 읽습니다.
//!
//! # 수집 흐름
//! 1. 경로 확장: 디렉터리는 한 단계만 펼쳐 최상위 파일만 포함
//! 2. 분류: 인식되지 않는 파일 이름은 읽지 않고 건너뜀
//! 3. 읽기: 파일마다 tokio 태스크 하나, 모든 태스크가 끝날 때까지 대기
//!
//! 한 파일의 읽기 실패는 그 파일만 실패로 기록되며 배치 완료를 막지 않습니다.

pub mod file;

pub use file::{FileCollector, expand_paths};

use std::path::PathBuf;

use crate::error::LogPipelineError;

/// 이름과 텍스트 내용을 가진 입력 파일
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// 분류에 사용하는 파일 이름
    pub name: String,
    /// 파일 텍스트 전체
    pub content: String,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// 배치 내 파일 하나의 수집 결과
#[derive(Debug)]
pub enum FileOutcome {
    /// 읽기 성공
    Read(SourceFile),
    /// 읽기 실패 -- 레코드 0개
    Failed {
        path: PathBuf,
        error: LogPipelineError,
    },
    /// 인식되지 않는 파일 이름 -- 읽지 않음
    Skipped { path: PathBuf },
}

impl FileOutcome {
    pub fn is_read(&self) -> bool {
        matches!(self, Self::Read(_))
    }
}

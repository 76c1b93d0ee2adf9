//! 파일 기반 배치 수집기
//!
//! 경로 목록을 받아 파일마다 tokio 태스크를 띄워 동시에 읽고,
//! 모든 태스크가 끝나면 제출 순서대로 결과를 돌려줍니다.
//! 동시 읽기 수는 세마포어로 제한합니다.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::{FileOutcome, SourceFile};
use crate::classifier::{Classification, SourceClassifier};
use crate::config::PipelineConfig;
use crate::error::LogPipelineError;

/// 경로 목록을 확장합니다.
///
/// 디렉터리는 바로 아래의 파일만 이름순으로 포함합니다 (하위 디렉터리는 무시).
/// 존재하지 않는 경로는 그대로 남겨 읽기 단계에서 실패로 기록되게 합니다.
pub async fn expand_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut expanded = Vec::new();

    for path in paths {
        match tokio::fs::metadata(path).await {
            Ok(meta) if meta.is_dir() => match list_files(path).await {
                Ok(files) => expanded.extend(files),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to list directory");
                    expanded.push(path.clone());
                }
            },
            _ => expanded.push(path.clone()),
        }
    }

    expanded
}

async fn list_files(dir: &Path) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_file = tokio::fs::metadata(&path)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false);
        if is_file {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// 경로의 파일 이름 부분 (분류에 사용)
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// 파일 하나를 읽습니다. UTF-8이 아닌 바이트는 대체 문자로 바꿉니다.
async fn read_source(path: &Path, name: String) -> Result<SourceFile, LogPipelineError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| LogPipelineError::Collector {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    Ok(SourceFile {
        name,
        content: String::from_utf8_lossy(&bytes).into_owned(),
    })
}

/// 배치 파일 수집기
#[derive(Debug, Clone)]
pub struct FileCollector {
    classifier: SourceClassifier,
    max_concurrent_reads: usize,
}

impl FileCollector {
    pub fn new(classifier: SourceClassifier, max_concurrent_reads: usize) -> Self {
        Self {
            classifier,
            max_concurrent_reads: max_concurrent_reads.max(1),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(
            SourceClassifier::from_config(config),
            config.max_concurrent_reads,
        )
    }

    /// 경로 목록을 수집합니다.
    ///
    /// 결과는 입력 순서와 같은 순서이며 길이도 같습니다.
    pub async fn collect(&self, paths: Vec<PathBuf>) -> Vec<FileOutcome> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_reads));
        let mut tasks = JoinSet::new();
        let mut outcomes = Vec::with_capacity(paths.len());

        for (index, path) in paths.into_iter().enumerate() {
            let name = file_name(&path);

            if self.classifier.classify(&name) == Classification::Unrecognized {
                tracing::debug!(path = %path.display(), "skipping unrecognized file");
                outcomes.push(FileOutcome::Skipped { path });
                continue;
            }

            // 태스크가 결과를 남기지 못하면 이 값이 그대로 남습니다.
            outcomes.push(FileOutcome::Failed {
                path: path.clone(),
                error: LogPipelineError::Join("file read task did not complete".to_owned()),
            });

            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                let result = read_source(&path, name).await;
                (index, path, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, _path, Ok(file))) => {
                    tracing::debug!(file = %file.name, bytes = file.content.len(), "file read");
                    outcomes[index] = FileOutcome::Read(file);
                }
                Ok((index, path, Err(error))) => {
                    tracing::warn!(path = %path.display(), error = %error, "failed to read log file");
                    outcomes[index] = FileOutcome::Failed { path, error };
                }
                Err(e) => {
                    let error = LogPipelineError::Join(e.to_string());
                    tracing::warn!(error = %error, "file read task failed");
                }
            }
        }

        outcomes
    }
}

impl Default for FileCollector {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

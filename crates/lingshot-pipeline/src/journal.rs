//! 번역 기록 파일.
//!
//! 완료된 번역마다 사람이 읽을 수 있는 블록을 평문 파일 끝에 덧붙인다.
//! 기록 실패는 경고 로그만 남기고 작업 결과에는 영향을 주지 않는다.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

const SEPARATOR_WIDTH: usize = 60;

/// 추가 전용 번역 기록
#[derive(Debug, Clone)]
pub struct TranslationJournal {
    path: PathBuf,
}

impl TranslationJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 기록 블록 형식
    pub fn format_entry(timestamp: DateTime<Local>, extracted: &str, translation: &str) -> String {
        format!(
            "\n{}\nTimestamp: {}\nExtracted: {}\nTranslation: {}\n",
            "=".repeat(SEPARATOR_WIDTH),
            timestamp.format("%Y-%m-%d %H:%M:%S"),
            extracted,
            translation
        )
    }

    /// 블록 추가. 실패는 로그로만 남긴다.
    pub async fn append(&self, extracted: &str, translation: &str) {
        let entry = Self::format_entry(Local::now(), extracted, translation);
        if let Err(e) = self.write(&entry).await {
            warn!(path = %self.path.display(), "번역 기록 실패: {e}");
        } else {
            debug!(path = %self.path.display(), "번역 기록 추가");
        }
    }

    async fn write(&self, entry: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(entry.as_bytes()).await?;
        file.flush().await
    }
}

//! 설정 파일 관리.
//!
//! [`AppConfig`]를 pretty JSON 한 파일로 유지한다. 저장은 임시 파일에 쓴 뒤
//! rename하므로 쓰는 도중 종료돼도 직전 설정이 남는다.

use crate::config::AppConfig;
use crate::error::CoreError;
use directories::ProjectDirs;
use parking_lot::RwLock;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

const CONFIG_FILE_NAME: &str = "config.json";
const TRANSLATION_LOG_FILE_NAME: &str = "translation_log.txt";

/// 공유 설정 핸들. 복제본끼리 같은 설정과 파일을 가리킨다.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    current: Arc<RwLock<AppConfig>>,
    path: PathBuf,
}

impl ConfigManager {
    /// 플랫폼 설정 디렉토리의 `config.json`
    pub fn new() -> Result<Self, CoreError> {
        Self::with_path(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// `path`의 설정을 연다. 파일이 없으면 기본값으로 만든다.
    pub fn with_path(path: PathBuf) -> Result<Self, CoreError> {
        ensure_parent(&path)?;

        let config = if path.exists() {
            read_config(&path)?
        } else {
            let fresh = AppConfig::default_config();
            write_config(&path, &fresh)?;
            info!(path = %path.display(), "기본 설정 파일 생성");
            fresh
        };

        Ok(Self {
            current: Arc::new(RwLock::new(config)),
            path,
        })
    }

    pub fn get(&self) -> AppConfig {
        self.current.read().clone()
    }

    /// 검증 후 파일에 먼저 쓰고, 성공하면 메모리 설정을 바꾼다
    pub fn update(&self, next: AppConfig) -> Result<(), CoreError> {
        next.translation.validate()?;
        let mut current = self.current.write();
        write_config(&self.path, &next)?;
        *current = next;
        debug!(path = %self.path.display(), "설정 저장");
        Ok(())
    }

    /// 현재 설정의 복제본을 고쳐 [`update`](Self::update)한다
    pub fn update_with<F>(&self, edit: F) -> Result<AppConfig, CoreError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut next = self.get();
        edit(&mut next);
        self.update(next.clone())?;
        Ok(next)
    }

    pub fn config_path(&self) -> &Path {
        &self.path
    }

    /// 외부에서 고친 파일 다시 읽기. 실패하면 기존 설정 유지.
    pub fn reload(&self) -> Result<(), CoreError> {
        let config = read_config(&self.path)?;
        *self.current.write() = config;
        info!(path = %self.path.display(), "설정 다시 로드");
        Ok(())
    }

    /// `storage.translation_log_path`, 없으면 `<data_dir>/logs/translation_log.txt`
    pub fn translation_log_path(&self) -> Result<PathBuf, CoreError> {
        if let Some(path) = self.current.read().storage.translation_log_path.clone() {
            return Ok(path);
        }
        Ok(Self::data_dir()?.join("logs").join(TRANSLATION_LOG_FILE_NAME))
    }

    pub fn config_dir() -> Result<PathBuf, CoreError> {
        project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
    }

    pub fn data_dir() -> Result<PathBuf, CoreError> {
        project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
    }
}

fn project_dirs() -> Result<ProjectDirs, CoreError> {
    ProjectDirs::from("dev", "lingshot", "lingshot")
        .ok_or_else(|| CoreError::Config("홈 디렉토리를 찾을 수 없습니다".to_string()))
}

fn ensure_parent(path: &Path) -> Result<(), CoreError> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if parent.exists() {
        return Ok(());
    }
    fs::create_dir_all(parent)
        .map_err(|e| CoreError::Config(format!("{} 생성 실패: {e}", parent.display())))?;
    info!(dir = %parent.display(), "설정 디렉토리 생성");
    Ok(())
}

fn read_config(path: &Path) -> Result<AppConfig, CoreError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| CoreError::Config(format!("{} 읽기 실패: {e}", path.display())))?;
    let config: AppConfig = serde_json::from_str(&raw)
        .map_err(|e| CoreError::Config(format!("{} 파싱 실패: {e}", path.display())))?;
    config.translation.validate()?;
    debug!(path = %path.display(), "설정 로드");
    Ok(config)
}

fn write_config(path: &Path, config: &AppConfig) -> Result<(), CoreError> {
    let json = serde_json::to_string_pretty(config)?;
    let staging = path.with_extension("json.tmp");
    fs::write(&staging, json)
        .and_then(|()| fs::rename(&staging, path))
        .map_err(|e| CoreError::Config(format!("{} 저장 실패: {e}", path.display())))
}

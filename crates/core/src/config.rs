//! 설정 관리 -- pwlog.toml 파싱 및 런타임 설정
//!
//! [`PwlogConfig`]는 로깅과 디스패치 엔진 설정을 담는 최상위 구조체입니다.
//! 설정은 시작 시 한 번 로드되며, 이후 레지스트리는 읽기 전용입니다.
//!
//! # 설정 로딩 우선순위
//! 1. 환경변수 (`PWLOG_DISPATCH_RULE_DIR=/etc/pwlog/rules` 형식)
//! 2. 설정 파일 (`pwlog.toml`)
//! 3. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), pwlog_core::error::PwlogError> {
//! use pwlog_core::config::PwlogConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = PwlogConfig::load("pwlog.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = PwlogConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::path::{Component, Path};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, PwlogError};
use crate::logging::LogFormat;

/// 라인 최대 길이 상한 (16MB)
const MAX_LINE_BYTES_LIMIT: usize = 16 * 1024 * 1024;

/// pwlog 통합 설정
///
/// `pwlog.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PwlogConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 디스패치 엔진 설정
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

impl PwlogConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, PwlogError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, PwlogError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PwlogError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                PwlogError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, PwlogError> {
        toml::from_str(toml_str).map_err(|e| {
            PwlogError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `PWLOG_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "PWLOG_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "PWLOG_GENERAL_LOG_FORMAT");

        // Dispatch
        override_bool(
            &mut self.dispatch.builtin_signatures,
            "PWLOG_DISPATCH_BUILTIN_SIGNATURES",
        );
        override_string(&mut self.dispatch.rule_dir, "PWLOG_DISPATCH_RULE_DIR");
        override_usize(
            &mut self.dispatch.max_line_bytes,
            "PWLOG_DISPATCH_MAX_LINE_BYTES",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), PwlogError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        if let Err(reason) = self.general.log_format.parse::<LogFormat>() {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason,
            }
            .into());
        }

        self.dispatch.validate()
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// 디스패치 엔진 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// 내장 시그니처 테이블 사용 여부
    pub builtin_signatures: bool,
    /// 확장 시그니처 YAML 디렉토리 (빈 문자열이면 사용하지 않음)
    pub rule_dir: String,
    /// 패턴을 실행할 라인의 최대 바이트 수
    pub max_line_bytes: usize,
    /// 길드 직위 이름 재정의 (숫자 문자열 -> 표시 이름)
    pub rank_names: BTreeMap<String, String>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            builtin_signatures: true,
            rule_dir: String::new(),
            max_line_bytes: 64 * 1024,
            rank_names: BTreeMap::new(),
        }
    }
}

impl DispatchConfig {
    /// 디스패치 설정의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), PwlogError> {
        if self.max_line_bytes == 0 || self.max_line_bytes > MAX_LINE_BYTES_LIMIT {
            return Err(ConfigError::InvalidValue {
                field: "dispatch.max_line_bytes".to_owned(),
                reason: format!("must be 1-{MAX_LINE_BYTES_LIMIT}"),
            }
            .into());
        }

        if !self.rule_dir.is_empty()
            && Path::new(&self.rule_dir)
                .components()
                .any(|c| c == Component::ParentDir)
        {
            return Err(ConfigError::InvalidValue {
                field: "dispatch.rule_dir".to_owned(),
                reason: format!(
                    "rule dir '{}' contains path traversal pattern '..'",
                    self.rule_dir
                ),
            }
            .into());
        }

        if !self.builtin_signatures && self.rule_dir.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "dispatch.rule_dir".to_owned(),
                reason: "rule dir is required when builtin signatures are disabled".to_owned(),
            }
            .into());
        }

        for (code, name) in &self.rank_names {
            if code.parse::<u32>().is_err() {
                return Err(ConfigError::InvalidValue {
                    field: format!("dispatch.rank_names.{code}"),
                    reason: "rank code must be a decimal integer".to_owned(),
                }
                .into());
            }
            if name.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("dispatch.rank_names.{code}"),
                    reason: "rank name must not be empty".to_owned(),
                }
                .into());
            }
        }

        Ok(())
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

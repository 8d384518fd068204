//! 디스패처 설정
//!
//! [`DispatcherConfig`]는 core의 [`DispatchConfig`](pwlog_core::config::DispatchConfig)를
//! 기반으로 디스패치 엔진 전용 설정을 제공합니다.
//!
//! # 사용 예시
//! ```ignore
//! use pwlog_core::config::PwlogConfig;
//! use pwlog_dispatch::config::DispatcherConfig;
//!
//! let core_config = PwlogConfig::default();
//! let config = DispatcherConfig::from_core(&core_config.dispatch);
//! ```

use std::collections::BTreeMap;
use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

use crate::error::DispatchError;

/// 라인 최대 길이 상한 (16MB)
const MAX_LINE_BYTES_LIMIT: usize = 16 * 1024 * 1024;

/// 디스패처 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// 내장 시그니처 테이블 사용 여부
    pub builtin_signatures: bool,
    /// 확장 시그니처 YAML 디렉토리
    pub rule_dir: Option<String>,
    /// 패턴을 실행할 라인의 최대 바이트 수
    pub max_line_bytes: usize,
    /// 길드 직위 이름 재정의
    pub rank_names: BTreeMap<u32, String>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            builtin_signatures: true,
            rule_dir: None,
            max_line_bytes: 64 * 1024,
            rank_names: BTreeMap::new(),
        }
    }
}

impl DispatcherConfig {
    /// core의 `DispatchConfig`에서 디스패처 설정을 생성합니다.
    ///
    /// 숫자가 아닌 직위 코드는 경고 후 무시합니다. core 검증을 통과한
    /// 설정이라면 이런 항목은 존재하지 않습니다.
    pub fn from_core(core: &pwlog_core::config::DispatchConfig) -> Self {
        let rank_names = core
            .rank_names
            .iter()
            .filter_map(|(code, name)| match code.parse::<u32>() {
                Ok(code) => Some((code, name.clone())),
                Err(_) => {
                    tracing::warn!(code = %code, "ignoring non-numeric rank code");
                    None
                }
            })
            .collect();

        Self {
            builtin_signatures: core.builtin_signatures,
            rule_dir: (!core.rule_dir.is_empty()).then(|| core.rule_dir.clone()),
            max_line_bytes: core.max_line_bytes,
            rank_names,
        }
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), DispatchError> {
        if self.max_line_bytes == 0 || self.max_line_bytes > MAX_LINE_BYTES_LIMIT {
            return Err(DispatchError::Config {
                field: "max_line_bytes".to_owned(),
                reason: format!("must be 1-{MAX_LINE_BYTES_LIMIT}"),
            });
        }

        match &self.rule_dir {
            Some(dir) if dir.is_empty() => {
                return Err(DispatchError::Config {
                    field: "rule_dir".to_owned(),
                    reason: "rule dir must not be empty".to_owned(),
                });
            }
            Some(dir) if Path::new(dir).components().any(|c| c == Component::ParentDir) => {
                return Err(DispatchError::Config {
                    field: "rule_dir".to_owned(),
                    reason: format!("rule dir '{dir}' contains path traversal pattern '..'"),
                });
            }
            None if !self.builtin_signatures => {
                return Err(DispatchError::Config {
                    field: "rule_dir".to_owned(),
                    reason: "rule dir is required when builtin signatures are disabled"
                        .to_owned(),
                });
            }
            _ => {}
        }

        if let Some((code, _)) = self.rank_names.iter().find(|(_, n)| n.trim().is_empty()) {
            return Err(DispatchError::Config {
                field: format!("rank_names.{code}"),
                reason: "rank name must not be empty".to_owned(),
            });
        }

        Ok(())
    }
}

/// 디스패처 설정 빌더
#[derive(Default)]
pub struct DispatcherConfigBuilder {
    config: DispatcherConfig,
}

impl DispatcherConfigBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 내장 시그니처 사용 여부를 설정합니다.
    pub fn builtin_signatures(mut self, enabled: bool) -> Self {
        self.config.builtin_signatures = enabled;
        self
    }

    /// 확장 시그니처 디렉토리를 설정합니다.
    pub fn rule_dir(mut self, dir: impl Into<String>) -> Self {
        self.config.rule_dir = Some(dir.into());
        self
    }

    /// 라인 최대 길이를 설정합니다.
    pub fn max_line_bytes(mut self, bytes: usize) -> Self {
        self.config.max_line_bytes = bytes;
        self
    }

    /// 직위 이름 하나를 재정의합니다.
    pub fn rank_name(mut self, code: u32, name: impl Into<String>) -> Self {
        self.config.rank_names.insert(code, name.into());
        self
    }

    /// 설정을 검증하고 `DispatcherConfig`를 생성합니다.
    pub fn build(self) -> Result<DispatcherConfig, DispatchError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

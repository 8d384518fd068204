//! 디스패치 엔진 에러 타입
//!
//! [`DispatchError`]는 시작 시점(설정 검증, 시그니처 로딩, 레지스트리 구성)에서만
//! 발생합니다. 라인 단위 결과는 [`DispatchOutcome`](pwlog_core::types::DispatchOutcome)
//! 값이며 에러가 아닙니다.
//! `From<DispatchError> for PwlogError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use pwlog_core::error::{ConfigError, PwlogError, RegistryError};

/// 디스패치 엔진 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// 레지스트리 구성 에러 (필드/캡처 수 불일치, 중복 트리거 등)
    #[error("configuration error: {subject}: {reason}")]
    Configuration {
        /// 문제가 된 이벤트 종류 또는 트리거
        subject: String,
        /// 실패 사유
        reason: String,
    },

    /// 시그니처 파일 로딩 실패
    #[error("rule load error: {path}: {reason}")]
    RuleLoad {
        /// 파일 또는 디렉토리 경로
        path: String,
        /// 로딩 실패 사유
        reason: String,
    },

    /// 추출 패턴 컴파일 실패
    #[error("regex error in rule '{kind}': {source}")]
    Regex {
        /// 패턴을 선언한 이벤트 종류
        kind: String,
        /// 원본 정규식 에러
        #[source]
        source: regex::Error,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DispatchError {
    /// 구성 에러를 생성합니다.
    pub(crate) fn configuration(subject: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Configuration {
            subject: subject.into(),
            reason: reason.into(),
        }
    }
}

impl From<DispatchError> for PwlogError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Config { field, reason } => {
                PwlogError::Config(ConfigError::InvalidValue { field, reason })
            }
            DispatchError::Io(e) => PwlogError::Io(e),
            other => PwlogError::Registry(RegistryError::InitFailed(other.to_string())),
        }
    }
}

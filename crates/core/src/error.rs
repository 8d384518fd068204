//! 에러 타입 -- 도메인별 에러 정의
//!
//! 라인 단위의 결과(매칭 실패, 시그니처 드리프트 등)는 에러가 아니라
//! [`DispatchOutcome`](crate::types::DispatchOutcome) 값으로 표현됩니다.
//! 이 모듈의 에러는 시작 시점(설정, 레지스트리 로딩)과
//! 외부 협력자(싱크) 경계에서만 사용됩니다.

/// pwlog 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum PwlogError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 시그니처 레지스트리 구성 에러 (시작 거부)
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// 이벤트 싱크 에러
    #[error("sink error: {0}")]
    Sink(#[from] SinkError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 시그니처 레지스트리 에러
///
/// 레지스트리가 일관되지 않으면 디스패치를 시작하지 않습니다.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// 레지스트리 초기화 실패
    #[error("registry init failed: {0}")]
    InitFailed(String),
}

/// 이벤트 싱크 에러
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// 기록 실패
    #[error("write failed: {0}")]
    WriteFailed(String),

    /// 싱크가 닫힘
    #[error("sink closed: {0}")]
    Closed(String),
}

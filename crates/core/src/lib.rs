#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod event;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod types;

// --- 주요 타입 re-export ---
// 각 모듈의 핵심 타입을 크레이트 루트에서 바로 사용할 수 있도록 합니다.

// 에러
pub use error::{ConfigError, PwlogError, RegistryError, SinkError};

// 설정
pub use config::{DispatchConfig, GeneralConfig, PwlogConfig};

// 이벤트
pub use event::{EventKind, Field, FieldValue, StructuredEvent};

// 로깅
pub use logging::{LogFormat, init_tracing};

// 협력자 trait
pub use pipeline::{DriftReporter, EventSink};

// 디스패치 결과
pub use types::{DispatchOutcome, DriftReason};

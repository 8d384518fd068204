#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`rule`]: 시그니처 선언 타입, YAML 로더, 컴파일된 추출 규칙
//! - [`registry`]: 트리거 순서와 이벤트 종류별 처리기, 내장 시그니처 테이블
//! - [`normalize`]: 원시 캡처 -> 타입이 있는 구조화 이벤트
//! - [`dispatch`]: 라인 하나 -> 결과 하나
//! - [`pipeline`]: 디스패처 결과를 싱크/리포터 협력자에게 전달
//! - [`config`]: 디스패처 설정 (core 설정 확장)
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! line -> SignatureRegistry::find -> Handler::Rule     -> ExtractionRule -> Normalizer -> Matched
//!                                 -> Handler::Umbrella -> discriminator -> (recursive)
//!                                 -> None              -> NoMatch
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod registry;
pub mod rule;

// --- 주요 타입 re-export ---

// 디스패처
pub use dispatch::Dispatcher;

// 파이프라인
pub use pipeline::{LinePipeline, LinePipelineBuilder, PipelineStats};

// 설정
pub use config::{DispatcherConfig, DispatcherConfigBuilder};

// 에러
pub use error::DispatchError;

// 레지스트리
pub use registry::{RegistryBuilder, ShadowedTrigger, Signature, SignatureRegistry};

// 규칙
pub use rule::{ExtractionRule, SignatureDefinition, SignatureLoader};

// 정규화
pub use normalize::{Normalizer, RankTable};

//! 협력자 trait -- 디스패치 엔진 바깥의 확장 포인트 정의
//!
//! 엔진은 I/O를 수행하지 않습니다. 인식된 이벤트의 영속화와
//! 운영자 진단 노출은 이 trait을 구현하는 외부 모듈의 책임입니다.

use crate::error::PwlogError;
use crate::event::{EventKind, StructuredEvent};
use crate::types::DriftReason;

/// 인식된 이벤트를 기록하는 싱크 trait
///
/// 파일 순서대로 기록해야 한다면 구현체가 쓰기를 직렬화해야 합니다.
pub trait EventSink: Send + Sync {
    /// 싱크 이름
    fn name(&self) -> &str;

    /// 이벤트 하나를 내구성 있게 추가
    fn append(&self, event: &StructuredEvent) -> Result<(), PwlogError>;
}

/// 시그니처 드리프트 등 운영 진단을 받는 trait
pub trait DriftReporter: Send + Sync {
    /// 트리거는 맞았지만 추출에 실패한 라인
    fn report_drift(&self, kind: &EventKind, line: &str, reason: &DriftReason);

    /// 우산 트리거는 맞았지만 판별 토큰을 찾지 못한 라인
    ///
    /// 기본 구현은 아무것도 하지 않습니다.
    fn report_uncategorized(&self, _umbrella: &EventKind, _line: &str) {}
}

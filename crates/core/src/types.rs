//! 디스패치 결과 타입 -- 라인 하나당 하나의 결과
//!
//! [`DispatchOutcome`]의 네 가지 경우는 서로 배타적이며,
//! 운영상 대응이 다르므로 하나로 합치지 않습니다.
//!
//! - `Matched`: 정상 인식
//! - `NoMatch`: 알려진 트리거 없음 (정상적인 잡음)
//! - `Uncategorized`: 우산(umbrella) 트리거는 맞았지만 판별 토큰이 없음
//! - `SignatureDrift`: 트리거는 맞았지만 추출 실패 (상위 로그 형식 변경)

use std::fmt;

use crate::event::{EventKind, StructuredEvent};

/// 시그니처 드리프트 사유
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DriftReason {
    /// 트리거는 있지만 추출 패턴이 매칭되지 않음
    #[error("extraction pattern did not match")]
    PatternMismatch,

    /// 타임스탬프 캡처가 유효한 시각이 아님
    #[error("invalid timestamp '{value}'")]
    InvalidTimestamp { value: String },

    /// 정수로 선언된 필드의 파싱 실패
    #[error("field '{field}' is not a decimal integer: '{value}'")]
    InvalidInteger { field: String, value: String },

    /// 후처리 중 정수 오버플로우
    #[error("field '{field}' overflowed during adjustment")]
    Overflow { field: String },

    /// 라인이 허용 길이를 초과하여 패턴을 실행하지 않음
    #[error("line exceeds {max} bytes ({len} bytes)")]
    Oversized { len: usize, max: usize },
}

/// 라인 하나에 대한 디스패치 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// 인식된 이벤트
    Matched(StructuredEvent),
    /// 어떤 트리거도 포함하지 않음
    NoMatch,
    /// 우산 트리거는 맞았지만 알려진 판별 토큰이 없음
    Uncategorized {
        /// 매칭된 우산 이벤트 종류
        umbrella: EventKind,
        /// 원본 라인
        line: String,
    },
    /// 트리거는 맞았지만 추출 또는 타입 변환 실패
    SignatureDrift {
        /// 만족시켜야 했던 이벤트 종류
        kind: EventKind,
        /// 원본 라인
        line: String,
        /// 실패 사유
        reason: DriftReason,
    },
}

impl DispatchOutcome {
    /// 메트릭/로그용 결과 라벨
    pub fn label(&self) -> &'static str {
        match self {
            Self::Matched(_) => "matched",
            Self::NoMatch => "no_match",
            Self::Uncategorized { .. } => "uncategorized",
            Self::SignatureDrift { .. } => "signature_drift",
        }
    }

    /// 인식된 이벤트인지 여부
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched(_))
    }

    /// 드리프트인지 여부
    pub fn is_drift(&self) -> bool {
        matches!(self, Self::SignatureDrift { .. })
    }

    /// 인식된 이벤트를 참조로 반환합니다.
    pub fn event(&self) -> Option<&StructuredEvent> {
        match self {
            Self::Matched(event) => Some(event),
            _ => None,
        }
    }

    /// 인식된 이벤트를 소유권과 함께 반환합니다.
    pub fn into_event(self) -> Option<StructuredEvent> {
        match self {
            Self::Matched(event) => Some(event),
            _ => None,
        }
    }
}

impl fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Matched(event) => write!(f, "matched {event}"),
            Self::NoMatch => write!(f, "no match"),
            Self::Uncategorized { umbrella, .. } => {
                write!(f, "uncategorized {umbrella} line")
            }
            Self::SignatureDrift { kind, reason, .. } => {
                write!(f, "signature drift for {kind}: {reason}")
            }
        }
    }
}

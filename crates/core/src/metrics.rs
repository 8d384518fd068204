//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 디스패처는 이 상수를 사용하여 `metrics::counter!()`, `metrics::gauge!()`
//! 매크로를 호출합니다. 레코더가 설치되지 않으면 호출은 아무 효과가 없습니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `pwlog_`
//! - 모듈명: `dispatch_`, `registry_`
//! - 접미어: `_total` (counter), 없음 (gauge)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(pwlog_core::metrics::DISPATCH_LINES_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 이벤트 종류 레이블 키 (login, faction_upgrade 등)
pub const LABEL_KIND: &str = "kind";

/// 우산 이벤트 종류 레이블 키 (faction, trade, task)
pub const LABEL_UMBRELLA: &str = "umbrella";

// ─── Dispatch 메트릭 ────────────────────────────────────────────────

/// Dispatch: 처리된 전체 라인 수 (counter)
pub const DISPATCH_LINES_TOTAL: &str = "pwlog_dispatch_lines_total";

/// Dispatch: 인식된 이벤트 수 (counter, label: kind)
pub const DISPATCH_MATCHED_TOTAL: &str = "pwlog_dispatch_matched_total";

/// Dispatch: 트리거 없는 라인 수 (counter)
pub const DISPATCH_NO_MATCH_TOTAL: &str = "pwlog_dispatch_no_match_total";

/// Dispatch: 판별 토큰이 없는 우산 라인 수 (counter, label: umbrella)
pub const DISPATCH_UNCATEGORIZED_TOTAL: &str = "pwlog_dispatch_uncategorized_total";

/// Dispatch: 시그니처 드리프트 수 (counter, label: kind)
pub const DISPATCH_SIGNATURE_DRIFT_TOTAL: &str = "pwlog_dispatch_signature_drift_total";

// ─── Registry 메트릭 ────────────────────────────────────────────────

/// Registry: 로드된 최상위 시그니처 수 (gauge)
pub const REGISTRY_SIGNATURES_LOADED: &str = "pwlog_registry_signatures_loaded";

/// Registry: 가려져 도달할 수 없는 트리거 수 (gauge)
pub const REGISTRY_SHADOWED_TRIGGERS: &str = "pwlog_registry_shadowed_triggers";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더 설치 후 한 번만 호출해야 합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_gauge};

    describe_counter!(
        DISPATCH_LINES_TOTAL,
        "Total number of log lines handed to the dispatcher"
    );
    describe_counter!(
        DISPATCH_MATCHED_TOTAL,
        "Total number of lines recognized as structured events"
    );
    describe_counter!(
        DISPATCH_NO_MATCH_TOTAL,
        "Total number of lines containing no registered trigger"
    );
    describe_counter!(
        DISPATCH_UNCATEGORIZED_TOTAL,
        "Umbrella trigger matched but no discriminator was recognized"
    );
    describe_counter!(
        DISPATCH_SIGNATURE_DRIFT_TOTAL,
        "Trigger matched but extraction or type coercion failed"
    );

    describe_gauge!(
        REGISTRY_SIGNATURES_LOADED,
        "Number of top-level signatures in the loaded registry"
    );
    describe_gauge!(
        REGISTRY_SHADOWED_TRIGGERS,
        "Number of triggers that can never win because an earlier trigger is contained in them"
    );
}

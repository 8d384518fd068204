//! 이벤트 정규화 -- 원시 캡처를 타입이 있는 구조화 이벤트로 변환합니다.
//!
//! 타임스탬프는 항상 라인에서 캡처한 값이며 프로세스 시계를 사용하지 않습니다.
//! 정수 파싱 실패와 후처리 오버플로우는 0으로 대체하지 않고
//! [`DriftReason`]으로 보고합니다.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use pwlog_core::event::{Field, FieldValue, StructuredEvent, TIMESTAMP_FORMAT};
use pwlog_core::types::DriftReason;

use crate::rule::{Adjustment, ExtractionRule, FieldType, Lookup};

/// 알 수 없는 직위 코드의 표시 이름
pub const UNKNOWN_RANK: &str = "Unknown";

/// 길드 직위 코드 -> 직위 이름 테이블
#[derive(Debug, Clone)]
pub struct RankTable {
    names: BTreeMap<u64, String>,
}

impl Default for RankTable {
    fn default() -> Self {
        let names = [
            (2, "Marshal"),
            (3, "General"),
            (4, "Major"),
            (5, "Captain"),
            (6, "Member"),
        ]
        .into_iter()
        .map(|(code, name)| (code, name.to_owned()))
        .collect();
        Self { names }
    }
}

impl RankTable {
    /// 기본 테이블 위에 재정의 항목을 덮어씁니다.
    pub fn with_overrides(overrides: &BTreeMap<u32, String>) -> Self {
        let mut table = Self::default();
        for (code, name) in overrides {
            table.names.insert(u64::from(*code), name.clone());
        }
        table
    }

    /// 직위 이름을 조회합니다. 모르는 코드는 [`UNKNOWN_RANK`]입니다.
    pub fn name(&self, code: u64) -> &str {
        self.names.get(&code).map_or(UNKNOWN_RANK, String::as_str)
    }
}

/// 이벤트 정규화기
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    ranks: RankTable,
}

impl Normalizer {
    /// 직위 테이블로 정규화기를 생성합니다.
    pub fn new(ranks: RankTable) -> Self {
        Self { ranks }
    }

    /// 직위 테이블
    pub fn ranks(&self) -> &RankTable {
        &self.ranks
    }

    /// 규칙의 필드 선언에 따라 원시 캡처를 구조화 이벤트로 변환합니다.
    ///
    /// `raw`는 [`ExtractionRule::captures`]의 결과이며 길이가 필드 수와 같습니다.
    pub fn normalize(
        &self,
        rule: &ExtractionRule,
        raw: &[&str],
    ) -> Result<StructuredEvent, DriftReason> {
        let specs = rule.fields();
        if raw.len() != specs.len() {
            return Err(DriftReason::PatternMismatch);
        }

        let ts_raw = raw[0];
        let timestamp = NaiveDateTime::parse_from_str(ts_raw, TIMESTAMP_FORMAT).map_err(|_| {
            DriftReason::InvalidTimestamp {
                value: ts_raw.to_owned(),
            }
        })?;

        let mut fields = Vec::with_capacity(specs.len() - 1 + rule.derived().len());
        for (spec, value) in specs.iter().zip(raw).skip(1) {
            let value = match spec.field_type {
                FieldType::Id | FieldType::Quantity => {
                    let parsed = parse_integer(&spec.name, value)?;
                    let adjusted = apply_adjustment(&spec.name, parsed, spec.adjust)?;
                    if spec.field_type == FieldType::Id {
                        FieldValue::Id(adjusted)
                    } else {
                        FieldValue::Quantity(adjusted)
                    }
                }
                FieldType::Text => FieldValue::Text((*value).to_owned()),
                // 첫 필드 이외의 타임스탬프는 로딩 시 거부됨
                FieldType::Timestamp => {
                    return Err(DriftReason::InvalidTimestamp {
                        value: (*value).to_owned(),
                    });
                }
            };
            fields.push(Field::new(spec.name.clone(), value));
        }

        for derived in rule.derived() {
            // fields에는 timestamp가 없으므로 인덱스가 하나 앞당겨짐
            let code = derived
                .source
                .checked_sub(1)
                .and_then(|i| fields.get(i))
                .and_then(|f| f.value.as_u64())
                .ok_or(DriftReason::PatternMismatch)?;
            let value = match derived.lookup {
                Lookup::FactionRank => FieldValue::Text(self.ranks.name(code).to_owned()),
            };
            fields.push(Field::new(derived.name.clone(), value));
        }

        Ok(StructuredEvent::new(rule.kind().clone(), timestamp, fields))
    }
}

/// 10진 숫자만으로 된 캡처를 `u64`로 변환합니다.
///
/// 값은 수치로 보관되므로 앞자리 0은 남지 않습니다 (`01088` -> `1088`).
fn parse_integer(field: &str, value: &str) -> Result<u64, DriftReason> {
    // u64::from_str는 '+' 접두어를 허용하므로 숫자만 받음
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DriftReason::InvalidInteger {
            field: field.to_owned(),
            value: value.to_owned(),
        });
    }
    value.parse::<u64>().map_err(|_| DriftReason::InvalidInteger {
        field: field.to_owned(),
        value: value.to_owned(),
    })
}

fn apply_adjustment(field: &str, value: u64, adjust: Adjustment) -> Result<u64, DriftReason> {
    match adjust {
        Adjustment::None => Ok(value),
        Adjustment::Increment => value.checked_add(1).ok_or_else(|| DriftReason::Overflow {
            field: field.to_owned(),
        }),
    }
}

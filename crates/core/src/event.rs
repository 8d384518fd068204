//! 구조화 이벤트 -- 인식된 로그 한 줄의 정규화 결과
//!
//! [`StructuredEvent`]는 이벤트 종류([`EventKind`])와 순서가 있는
//! 이름 붙은 필드 목록으로 구성됩니다. 첫 번째 필드는 항상 `timestamp`이며,
//! 값은 처리 중인 로그 라인에서 추출한 시각입니다 (프로세스 시계가 아님).
//!
//! 이벤트는 불변 값이며 라인 간 상태를 가지지 않습니다.
//! 싱크 협력자가 한 번 소비합니다.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// 로그 타임스탬프 형식 (`YYYY-MM-DD HH:MM:SS`, 타임존 없음)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 모든 이벤트의 첫 번째 필드 이름
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// 직렬화 시 이벤트 종류를 담는 키
pub const KIND_KEY: &str = "kind";

/// 이벤트 종류 식별자 (예: `login`, `faction_upgrade`)
///
/// 레지스트리가 소유하며 로딩 이후 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventKind(String);

impl EventKind {
    /// 새 이벤트 종류를 생성합니다.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// 문자열 표현을 반환합니다.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventKind {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl Borrow<str> for EventKind {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// 타입이 정해진 필드 값
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// 로그 라인 시각
    Timestamp(NaiveDateTime),
    /// 정수 식별자 (roleid, itemid 등)
    Id(u64),
    /// 정수 수량 (금액, 개수, 레벨 등)
    Quantity(u64),
    /// 자유 텍스트 (플레이 시간, 직위명 등)
    Text(String),
}

impl FieldValue {
    /// 정수 값(Id, Quantity)을 반환합니다.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Id(v) | Self::Quantity(v) => Some(*v),
            _ => None,
        }
    }

    /// 텍스트 값을 반환합니다.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// 타임스탬프 값을 반환합니다.
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timestamp(ts) => write!(f, "{}", ts.format(TIMESTAMP_FORMAT)),
            Self::Id(v) | Self::Quantity(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Timestamp(ts) => serializer.collect_str(&ts.format(TIMESTAMP_FORMAT)),
            Self::Id(v) | Self::Quantity(v) => serializer.serialize_u64(*v),
            Self::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// 이름 붙은 필드
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// 필드 이름 (규칙 선언에서 공유)
    pub name: Arc<str>,
    /// 필드 값
    pub value: FieldValue,
}

impl Field {
    /// 새 필드를 생성합니다.
    pub fn new(name: impl Into<Arc<str>>, value: FieldValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// 구조화 이벤트
///
/// `fields[0]`은 항상 `timestamp`입니다. 생성자가 이 불변식을 보장합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredEvent {
    kind: EventKind,
    fields: Vec<Field>,
}

impl StructuredEvent {
    /// 타임스탬프와 나머지 필드로 이벤트를 생성합니다.
    ///
    /// `fields`는 규칙에 선언된 순서를 유지해야 하며, `timestamp`를 포함하지 않습니다.
    pub fn new(kind: EventKind, timestamp: NaiveDateTime, fields: Vec<Field>) -> Self {
        let mut all = Vec::with_capacity(fields.len() + 1);
        all.push(Field::new(TIMESTAMP_FIELD, FieldValue::Timestamp(timestamp)));
        all.extend(fields);
        Self { kind, fields: all }
    }

    /// 이벤트 종류
    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    /// 로그 라인에서 추출한 시각
    pub fn timestamp(&self) -> NaiveDateTime {
        match self.fields.first().map(|f| &f.value) {
            Some(FieldValue::Timestamp(ts)) => *ts,
            // 생성자가 첫 필드를 타임스탬프로 고정하므로 도달하지 않음
            _ => NaiveDateTime::default(),
        }
    }

    /// 타임스탬프를 원본 로그 형식 문자열로 반환합니다.
    pub fn timestamp_str(&self) -> String {
        self.timestamp().format(TIMESTAMP_FORMAT).to_string()
    }

    /// 선언 순서대로 정렬된 전체 필드 (타임스탬프 포함)
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// 필드 이름 목록 (선언 순서)
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_ref())
    }

    /// 이름으로 필드 값을 조회합니다.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|f| f.name.as_ref() == name)
            .map(|f| &f.value)
    }

    /// 정수 필드 값을 조회합니다.
    pub fn get_u64(&self, name: &str) -> Option<u64> {
        self.get(name).and_then(FieldValue::as_u64)
    }

    /// 텍스트 필드 값을 조회합니다.
    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    /// 한 줄짜리 JSON 문자열로 직렬화합니다.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for StructuredEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.kind)?;
        for field in &self.fields {
            write!(f, " {}={}", field.name, field.value)?;
        }
        Ok(())
    }
}

/// `{"kind": ..., "timestamp": ..., <fields...>}` 형태의 평탄한 맵으로 직렬화합니다.
impl Serialize for StructuredEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry(KIND_KEY, &self.kind)?;
        for field in &self.fields {
            map.serialize_entry(field.name.as_ref(), &field.value)?;
        }
        map.end()
    }
}

//! 시그니처 선언 데이터 타입
//!
//! YAML 확장 파일에서 역직렬화되고, 내장 시그니처 테이블도 같은 타입으로 선언됩니다.
//! 이 단계에서는 구조만 검사하며, 정규식 컴파일과 캡처 수 검증은
//! [`ExtractionRule::compile`](super::ExtractionRule::compile)에서 수행합니다.

use serde::{Deserialize, Serialize};

use pwlog_core::event::TIMESTAMP_FIELD;

use crate::error::DispatchError;

/// 시그니처 파일 -- 하나의 YAML 파일에 대응합니다.
///
/// # YAML 스키마
/// ```yaml
/// signatures:
///   - trigger: "formatlog:auction_bid"
///     rule:
///       kind: auction_bid
///       pattern: '(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}).*roleid=(\d+):auctionid=(\d+):bid=(\d+)'
///       fields:
///         - { name: timestamp, type: timestamp }
///         - { name: roleid, type: id }
///         - { name: auctionid, type: id }
///         - { name: bid, type: quantity }
///   - trigger: "formatlog:stall"
///     umbrella:
///       kind: stall
///       branches:
///         - discriminator: "type=open"
///           rule: { ... }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignatureFile {
    /// 선언 순서대로 추가될 시그니처 목록
    #[serde(default)]
    pub signatures: Vec<SignatureDefinition>,
}

/// 최상위 시그니처 -- 트리거 하나와 그 처리기
///
/// `rule`과 `umbrella` 중 정확히 하나를 가져야 합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureDefinition {
    /// 라인에서 찾을 부분 문자열 (대소문자 구분)
    pub trigger: String,
    /// 리프 추출 규칙
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<RuleDefinition>,
    /// 2단계 판별 처리기
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub umbrella: Option<UmbrellaDefinition>,
}

impl SignatureDefinition {
    /// 리프 규칙 시그니처를 생성합니다.
    pub fn leaf(trigger: impl Into<String>, rule: RuleDefinition) -> Self {
        Self {
            trigger: trigger.into(),
            rule: Some(rule),
            umbrella: None,
        }
    }

    /// 우산 시그니처를 생성합니다.
    pub fn umbrella(trigger: impl Into<String>, umbrella: UmbrellaDefinition) -> Self {
        Self {
            trigger: trigger.into(),
            rule: None,
            umbrella: Some(umbrella),
        }
    }

    /// 처리기를 반환합니다. `rule`과 `umbrella`가 정확히 하나가 아니면 에러입니다.
    pub fn handler(&self) -> Result<HandlerRef<'_>, DispatchError> {
        handler_of(&self.trigger, self.rule.as_ref(), self.umbrella.as_ref())
    }

    /// 구조 유효성을 재귀적으로 검증합니다.
    pub fn validate(&self) -> Result<(), DispatchError> {
        if self.trigger.is_empty() {
            return Err(DispatchError::configuration(
                "(empty)",
                "trigger must not be empty",
            ));
        }
        self.handler()?.validate()
    }
}

/// 우산 처리기 -- 판별 토큰으로 하위 처리기를 선택합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UmbrellaDefinition {
    /// 우산 이벤트 종류 (faction, trade, task)
    pub kind: String,
    /// 선언 순서대로 검사할 분기
    pub branches: Vec<BranchDefinition>,
}

impl UmbrellaDefinition {
    /// 새 우산 처리기를 생성합니다.
    pub fn new(kind: impl Into<String>, branches: Vec<BranchDefinition>) -> Self {
        Self {
            kind: kind.into(),
            branches,
        }
    }

    fn validate(&self) -> Result<(), DispatchError> {
        if self.kind.is_empty() {
            return Err(DispatchError::configuration(
                "(empty)",
                "umbrella kind must not be empty",
            ));
        }
        if self.branches.is_empty() {
            return Err(DispatchError::configuration(
                &self.kind,
                "umbrella must declare at least one branch",
            ));
        }
        for branch in &self.branches {
            if branch.discriminator.is_empty() {
                return Err(DispatchError::configuration(
                    &self.kind,
                    "discriminator must not be empty",
                ));
            }
            branch.handler()?.validate()?;
        }
        Ok(())
    }
}

/// 우산 분기 -- 판별 토큰 하나와 그 처리기
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchDefinition {
    /// 라인에서 찾을 판별 토큰
    pub discriminator: String,
    /// 리프 추출 규칙
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<RuleDefinition>,
    /// 중첩 우산
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub umbrella: Option<Box<UmbrellaDefinition>>,
}

impl BranchDefinition {
    /// 리프 규칙 분기를 생성합니다.
    pub fn leaf(discriminator: impl Into<String>, rule: RuleDefinition) -> Self {
        Self {
            discriminator: discriminator.into(),
            rule: Some(rule),
            umbrella: None,
        }
    }

    /// 처리기를 반환합니다.
    pub fn handler(&self) -> Result<HandlerRef<'_>, DispatchError> {
        handler_of(
            &self.discriminator,
            self.rule.as_ref(),
            self.umbrella.as_deref(),
        )
    }
}

/// 선언된 처리기에 대한 참조
#[derive(Debug, Clone, Copy)]
pub enum HandlerRef<'a> {
    /// 리프 추출 규칙
    Rule(&'a RuleDefinition),
    /// 우산 처리기
    Umbrella(&'a UmbrellaDefinition),
}

impl<'a> HandlerRef<'a> {
    /// 처리기가 선언한 이벤트 종류
    pub fn kind(&self) -> &'a str {
        match self {
            Self::Rule(rule) => &rule.kind,
            Self::Umbrella(umbrella) => &umbrella.kind,
        }
    }

    fn validate(&self) -> Result<(), DispatchError> {
        match self {
            Self::Rule(rule) => rule.validate(),
            Self::Umbrella(umbrella) => umbrella.validate(),
        }
    }
}

fn handler_of<'a>(
    token: &str,
    rule: Option<&'a RuleDefinition>,
    umbrella: Option<&'a UmbrellaDefinition>,
) -> Result<HandlerRef<'a>, DispatchError> {
    match (rule, umbrella) {
        (Some(rule), None) => Ok(HandlerRef::Rule(rule)),
        (None, Some(umbrella)) => Ok(HandlerRef::Umbrella(umbrella)),
        (Some(_), Some(_)) => Err(DispatchError::configuration(
            token,
            "declares both 'rule' and 'umbrella'",
        )),
        (None, None) => Err(DispatchError::configuration(
            token,
            "declares neither 'rule' nor 'umbrella'",
        )),
    }
}

/// 리프 추출 규칙 선언
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleDefinition {
    /// 이벤트 종류
    pub kind: String,
    /// 추출 정규식 (캡처 그룹 수 == 필드 수)
    pub pattern: String,
    /// 캡처 순서대로 선언된 필드 (첫 번째는 `timestamp`)
    pub fields: Vec<FieldDefinition>,
    /// 다른 필드에서 계산되는 파생 필드
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub derived: Vec<DerivedDefinition>,
}

impl RuleDefinition {
    /// 새 규칙을 생성합니다.
    pub fn new(
        kind: impl Into<String>,
        pattern: impl Into<String>,
        fields: Vec<FieldDefinition>,
    ) -> Self {
        Self {
            kind: kind.into(),
            pattern: pattern.into(),
            fields,
            derived: Vec::new(),
        }
    }

    /// 파생 필드를 추가합니다.
    pub fn with_derived(mut self, derived: DerivedDefinition) -> Self {
        self.derived.push(derived);
        self
    }

    /// 필드 선언의 구조 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), DispatchError> {
        if self.kind.is_empty() {
            return Err(DispatchError::configuration(
                "(empty)",
                "rule kind must not be empty",
            ));
        }

        match self.fields.first() {
            Some(first)
                if first.name == TIMESTAMP_FIELD && first.field_type == FieldType::Timestamp => {}
            _ => {
                return Err(DispatchError::configuration(
                    &self.kind,
                    "first field must be 'timestamp' of type timestamp",
                ));
            }
        }

        let mut seen: Vec<&str> = Vec::with_capacity(self.fields.len() + self.derived.len());
        for field in &self.fields {
            if field.name.is_empty() {
                return Err(DispatchError::configuration(
                    &self.kind,
                    "field name must not be empty",
                ));
            }
            if seen.contains(&field.name.as_str()) {
                return Err(DispatchError::configuration(
                    &self.kind,
                    format!("duplicate field '{}'", field.name),
                ));
            }
            seen.push(&field.name);
        }

        for field in &self.fields[1..] {
            if field.field_type == FieldType::Timestamp {
                return Err(DispatchError::configuration(
                    &self.kind,
                    format!("only the first field may be a timestamp, '{}' is", field.name),
                ));
            }
            if field.adjust != Adjustment::None && !field.field_type.is_integer() {
                return Err(DispatchError::configuration(
                    &self.kind,
                    format!("adjustment on non-integer field '{}'", field.name),
                ));
            }
        }

        for derived in &self.derived {
            let source = self.fields[1..].iter().find(|f| f.name == derived.from);
            match source {
                Some(source) if source.field_type.is_integer() => {}
                Some(_) => {
                    return Err(DispatchError::configuration(
                        &self.kind,
                        format!(
                            "derived field '{}' must source an integer field",
                            derived.name
                        ),
                    ));
                }
                None => {
                    return Err(DispatchError::configuration(
                        &self.kind,
                        format!(
                            "derived field '{}' sources unknown field '{}'",
                            derived.name, derived.from
                        ),
                    ));
                }
            }
            if derived.name.is_empty() || seen.contains(&derived.name.as_str()) {
                return Err(DispatchError::configuration(
                    &self.kind,
                    format!("derived field name '{}' is empty or duplicated", derived.name),
                ));
            }
            seen.push(&derived.name);
        }

        Ok(())
    }
}

/// 필드 선언
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// 필드 이름
    pub name: String,
    /// 의미 타입
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// 수치 후처리
    #[serde(default, skip_serializing_if = "Adjustment::is_none")]
    pub adjust: Adjustment,
}

impl FieldDefinition {
    /// 후처리 없는 필드를 생성합니다.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            adjust: Adjustment::None,
        }
    }

    /// 타임스탬프 필드
    pub fn timestamp() -> Self {
        Self::new(TIMESTAMP_FIELD, FieldType::Timestamp)
    }

    /// 후처리를 지정합니다.
    pub fn adjusted(mut self, adjust: Adjustment) -> Self {
        self.adjust = adjust;
        self
    }
}

/// 필드 의미 타입
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// `YYYY-MM-DD HH:MM:SS`
    Timestamp,
    /// 정수 식별자 (roleid, itemid 등), 앞자리 0은 보존하지 않음
    Id,
    /// 정수 수량 (count, money 등)
    Quantity,
    /// 자유 텍스트
    Text,
}

impl FieldType {
    /// 10진 정수로 파싱해야 하는 타입인지 여부
    pub fn is_integer(self) -> bool {
        matches!(self, Self::Id | Self::Quantity)
    }
}

/// 수치 후처리
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Adjustment {
    /// 그대로 전달
    #[default]
    None,
    /// 1 증가 (길드 업그레이드는 업그레이드 전 레벨을 기록함)
    Increment,
}

impl Adjustment {
    fn is_none(&self) -> bool {
        *self == Self::None
    }
}

/// 파생 필드 선언
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedDefinition {
    /// 파생 필드 이름
    pub name: String,
    /// 원천 필드 이름
    pub from: String,
    /// 변환 테이블
    pub lookup: Lookup,
}

impl DerivedDefinition {
    /// 새 파생 필드를 생성합니다.
    pub fn new(name: impl Into<String>, from: impl Into<String>, lookup: Lookup) -> Self {
        Self {
            name: name.into(),
            from: from.into(),
            lookup,
        }
    }
}

/// 파생 필드 변환 테이블
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lookup {
    /// 길드 직위 코드 -> 직위 이름
    FactionRank,
}

//! 추출 규칙 -- 선언을 컴파일된 규칙으로 변환하고 캡처를 수행합니다.
//!
//! # 아키텍처
//! - [`types`]: YAML/내장 테이블 공용 선언 구조
//! - [`loader`]: YAML 확장 파일 로딩
//! - [`ExtractionRule`]: 컴파일된 리프 규칙 (정규식 + 필드 스펙)
//!
//! 정규식은 레지스트리 로딩 시 한 번만 컴파일하며,
//! 필드 수와 캡처 그룹 수의 불일치는 이 시점에 구성 에러가 됩니다.

pub mod loader;
pub mod types;

pub use loader::SignatureLoader;
pub use types::{
    Adjustment, BranchDefinition, DerivedDefinition, FieldDefinition, FieldType, HandlerRef,
    Lookup, RuleDefinition, SignatureDefinition, SignatureFile, UmbrellaDefinition,
};

use std::sync::Arc;

use regex::Regex;

use pwlog_core::event::EventKind;

use crate::error::DispatchError;

/// 컴파일된 필드 스펙
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// 필드 이름 (이벤트마다 복제되지 않도록 공유)
    pub name: Arc<str>,
    /// 의미 타입
    pub field_type: FieldType,
    /// 수치 후처리
    pub adjust: Adjustment,
}

/// 컴파일된 파생 필드 스펙
#[derive(Debug, Clone)]
pub struct DerivedSpec {
    /// 파생 필드 이름
    pub name: Arc<str>,
    /// 원천 필드의 `fields` 인덱스
    pub source: usize,
    /// 변환 테이블
    pub lookup: Lookup,
}

/// 컴파일된 리프 추출 규칙
#[derive(Debug, Clone)]
pub struct ExtractionRule {
    kind: EventKind,
    regex: Regex,
    fields: Vec<FieldSpec>,
    derived: Vec<DerivedSpec>,
}

impl ExtractionRule {
    /// 규칙 선언을 검증하고 컴파일합니다.
    ///
    /// # Errors
    /// - 구조 검증 실패 (첫 필드가 timestamp가 아님, 중복 필드 등)
    /// - 정규식 컴파일 실패
    /// - 선언된 필드 수와 캡처 그룹 수 불일치
    /// - 이름 있는 그룹을 사용하면서 이름이 필드 선언과 다름
    pub fn compile(def: &RuleDefinition) -> Result<Self, DispatchError> {
        def.validate()?;

        let regex = Regex::new(&def.pattern).map_err(|source| DispatchError::Regex {
            kind: def.kind.clone(),
            source,
        })?;

        let captures = regex.captures_len() - 1;
        if captures != def.fields.len() {
            return Err(DispatchError::configuration(
                &def.kind,
                format!(
                    "declares {} fields but pattern has {} capture groups",
                    def.fields.len(),
                    captures
                ),
            ));
        }

        // 이름 있는 그룹: 전부 이름이 있고 선언 순서와 같아야 함
        let names: Vec<Option<&str>> = regex.capture_names().skip(1).collect();
        if names.iter().any(Option::is_some) {
            for (name, field) in names.iter().zip(&def.fields) {
                if *name != Some(field.name.as_str()) {
                    return Err(DispatchError::configuration(
                        &def.kind,
                        format!(
                            "named group {:?} does not match declared field '{}'",
                            name.unwrap_or("(unnamed)"),
                            field.name
                        ),
                    ));
                }
            }
        }

        let fields: Vec<FieldSpec> = def
            .fields
            .iter()
            .map(|f| FieldSpec {
                name: Arc::from(f.name.as_str()),
                field_type: f.field_type,
                adjust: f.adjust,
            })
            .collect();

        let derived = def
            .derived
            .iter()
            .map(|d| {
                let source = def
                    .fields
                    .iter()
                    .position(|f| f.name == d.from)
                    .ok_or_else(|| {
                        DispatchError::configuration(
                            &def.kind,
                            format!("derived field '{}' sources unknown field", d.name),
                        )
                    })?;
                Ok(DerivedSpec {
                    name: Arc::from(d.name.as_str()),
                    source,
                    lookup: d.lookup,
                })
            })
            .collect::<Result<Vec<_>, DispatchError>>()?;

        Ok(Self {
            kind: EventKind::new(def.kind.as_str()),
            regex,
            fields,
            derived,
        })
    }

    /// 이벤트 종류
    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    /// 원본 패턴 문자열
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// 캡처 순서대로 정렬된 필드 스펙 (첫 번째는 timestamp)
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// 파생 필드 스펙
    pub fn derived(&self) -> &[DerivedSpec] {
        &self.derived
    }

    /// 패턴을 라인에 적용하여 원시 캡처를 필드 순서대로 반환합니다.
    ///
    /// 패턴이 매칭되지 않으면 `None`입니다. 참여하지 않은 선택적 그룹은
    /// 빈 문자열로 반환되어 정규화 단계에서 판단합니다.
    pub fn captures<'l>(&self, line: &'l str) -> Option<Vec<&'l str>> {
        let caps = self.regex.captures(line)?;
        Some(
            (1..=self.fields.len())
                .map(|i| caps.get(i).map_or("", |m| m.as_str()))
                .collect(),
        )
    }
}

//! 시그니처 레지스트리 -- 트리거 순서와 이벤트 종류별 처리기를 보관합니다.
//!
//! 레지스트리는 시작 시 한 번 구성되며 이후 읽기 전용입니다.
//!
//! # 순서 규칙
//! - 트리거는 선언 순서대로 검사하고 처음 포함된 트리거가 이깁니다.
//! - 확장은 항상 뒤에 추가되며 기존 순서를 바꾸지 않습니다.
//! - 앞선 트리거를 부분 문자열로 포함하는 뒤의 트리거는 절대 선택되지 않으므로
//!   로딩 시 경고하고 [`SignatureRegistry::shadowed`]로 조회할 수 있습니다.
//!   우산 내부 판별 토큰에도 같은 규칙을 적용합니다.

pub mod builtin;

use std::collections::{HashMap, HashSet};

use pwlog_core::event::EventKind;
use pwlog_core::metrics as m;

use crate::error::DispatchError;
use crate::rule::{ExtractionRule, HandlerRef, SignatureDefinition};

/// 최상위 시그니처 (트리거 -> 처리기)
#[derive(Debug, Clone)]
pub struct Signature {
    trigger: String,
    kind: EventKind,
    handler: usize,
}

impl Signature {
    /// 트리거 부분 문자열
    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    /// 트리거가 가리키는 이벤트 종류 (리프 또는 우산)
    pub fn kind(&self) -> &EventKind {
        &self.kind
    }
}

/// 가려진 트리거 -- 앞선 트리거를 포함하므로 선택될 수 없음
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowedTrigger {
    /// 우산 내부 판별 토큰이면 우산 종류, 최상위 트리거면 `None`
    pub scope: Option<EventKind>,
    /// 선택될 수 없는 트리거
    pub trigger: String,
    /// 먼저 선언되어 항상 이기는 트리거
    pub shadowed_by: String,
}

/// 컴파일된 처리기
#[derive(Debug)]
pub(crate) enum Handler {
    /// 리프 추출 규칙
    Rule(ExtractionRule),
    /// 우산: 판별 토큰 순서대로 하위 처리기 선택
    Umbrella(Umbrella),
}

impl Handler {
    pub(crate) fn kind(&self) -> &EventKind {
        match self {
            Self::Rule(rule) => rule.kind(),
            Self::Umbrella(umbrella) => &umbrella.kind,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Umbrella {
    pub(crate) kind: EventKind,
    pub(crate) branches: Vec<Branch>,
}

#[derive(Debug)]
pub(crate) struct Branch {
    pub(crate) discriminator: String,
    pub(crate) handler: usize,
}

/// 시그니처 레지스트리
///
/// 처리기는 arena(`handlers`)에 저장되고 시그니처와 우산 분기는 인덱스로 참조합니다.
#[derive(Debug)]
pub struct SignatureRegistry {
    signatures: Vec<Signature>,
    handlers: Vec<Handler>,
    by_kind: HashMap<EventKind, usize>,
    shadowed: Vec<ShadowedTrigger>,
}

impl SignatureRegistry {
    /// 빈 빌더를 생성합니다.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// 내장 시그니처 테이블만으로 레지스트리를 구성합니다.
    pub fn builtin() -> Result<Self, DispatchError> {
        RegistryBuilder::new().builtin().build()
    }

    /// 라인에 처음으로 포함된 트리거의 이벤트 종류를 반환합니다.
    pub fn lookup(&self, line: &str) -> Option<&EventKind> {
        self.find(line).map(Signature::kind)
    }

    /// 라인에 처음으로 포함된 트리거의 시그니처를 반환합니다.
    pub fn find(&self, line: &str) -> Option<&Signature> {
        self.signatures
            .iter()
            .find(|sig| line.contains(sig.trigger.as_str()))
    }

    /// 최상위 시그니처 수
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    /// 시그니처가 없는지 여부
    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    /// 선언 순서대로의 최상위 시그니처
    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    /// 등록된 모든 이벤트 종류 (리프와 우산)
    pub fn kinds(&self) -> impl Iterator<Item = &EventKind> {
        self.handlers.iter().map(Handler::kind)
    }

    /// 이벤트 종류가 등록되어 있는지 여부
    pub fn contains_kind(&self, kind: &str) -> bool {
        self.by_kind.contains_key(kind)
    }

    /// 리프 종류의 추출 규칙
    pub fn rule(&self, kind: &str) -> Option<&ExtractionRule> {
        match self.handler_for_kind(kind)? {
            Handler::Rule(rule) => Some(rule),
            Handler::Umbrella(_) => None,
        }
    }

    /// 우산 종류인지 여부
    pub fn is_umbrella(&self, kind: &str) -> bool {
        matches!(self.handler_for_kind(kind), Some(Handler::Umbrella(_)))
    }

    /// 우산 종류의 (판별 토큰, 하위 종류) 목록
    pub fn branches(&self, kind: &str) -> Option<Vec<(&str, &EventKind)>> {
        match self.handler_for_kind(kind)? {
            Handler::Umbrella(umbrella) => Some(
                umbrella
                    .branches
                    .iter()
                    .map(|b| (b.discriminator.as_str(), self.handlers[b.handler].kind()))
                    .collect(),
            ),
            Handler::Rule(_) => None,
        }
    }

    /// 로딩 시 발견된 가려진 트리거 목록
    pub fn shadowed(&self) -> &[ShadowedTrigger] {
        &self.shadowed
    }

    pub(crate) fn handler(&self, index: usize) -> &Handler {
        &self.handlers[index]
    }

    pub(crate) fn handler_index(&self, kind: &str) -> Option<usize> {
        self.by_kind.get(kind).copied()
    }

    pub(crate) fn signature_handler(&self, signature: &Signature) -> usize {
        signature.handler
    }

    fn handler_for_kind(&self, kind: &str) -> Option<&Handler> {
        self.handler_index(kind).map(|i| &self.handlers[i])
    }

    fn add_handler(&mut self, handler: HandlerRef<'_>) -> Result<usize, DispatchError> {
        let kind = handler.kind();
        if self.by_kind.contains_key(kind) {
            return Err(DispatchError::configuration(kind, "duplicate event kind"));
        }

        let compiled = match handler {
            HandlerRef::Rule(def) => Handler::Rule(ExtractionRule::compile(def)?),
            HandlerRef::Umbrella(def) => {
                let mut seen = HashSet::new();
                let mut branches = Vec::with_capacity(def.branches.len());
                for branch in &def.branches {
                    if !seen.insert(branch.discriminator.as_str()) {
                        return Err(DispatchError::configuration(
                            &def.kind,
                            format!("duplicate discriminator '{}'", branch.discriminator),
                        ));
                    }
                    let child = self.add_handler(branch.handler()?)?;
                    branches.push(Branch {
                        discriminator: branch.discriminator.clone(),
                        handler: child,
                    });
                }
                Handler::Umbrella(Umbrella {
                    kind: EventKind::new(def.kind.as_str()),
                    branches,
                })
            }
        };

        // 하위 처리기가 같은 종류를 선언했을 수 있음
        if self.by_kind.contains_key(kind) {
            return Err(DispatchError::configuration(kind, "duplicate event kind"));
        }

        let index = self.handlers.len();
        self.by_kind.insert(compiled.kind().clone(), index);
        self.handlers.push(compiled);
        Ok(index)
    }

    fn detect_shadowing(&mut self) {
        let top: Vec<&str> = self.signatures.iter().map(|s| s.trigger.as_str()).collect();
        let mut shadowed = find_shadowed(None, &top);

        for handler in &self.handlers {
            if let Handler::Umbrella(umbrella) = handler {
                let tokens: Vec<&str> = umbrella
                    .branches
                    .iter()
                    .map(|b| b.discriminator.as_str())
                    .collect();
                shadowed.extend(find_shadowed(Some(&umbrella.kind), &tokens));
            }
        }

        self.shadowed = shadowed;
    }
}

/// 앞선 토큰을 부분 문자열로 포함하는 뒤의 토큰을 찾습니다.
fn find_shadowed(scope: Option<&EventKind>, tokens: &[&str]) -> Vec<ShadowedTrigger> {
    tokens
        .iter()
        .enumerate()
        .filter_map(|(i, later)| {
            tokens[..i]
                .iter()
                .find(|earlier| later.contains(**earlier))
                .map(|earlier| ShadowedTrigger {
                    scope: scope.cloned(),
                    trigger: (*later).to_owned(),
                    shadowed_by: (*earlier).to_owned(),
                })
        })
        .collect()
}

/// 레지스트리 빌더 -- 시그니처를 선언 순서대로 추가만 합니다.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    definitions: Vec<SignatureDefinition>,
}

impl RegistryBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 내장 시그니처 테이블을 뒤에 추가합니다.
    pub fn builtin(self) -> Self {
        self.signatures(builtin::signatures())
    }

    /// 시그니처 하나를 뒤에 추가합니다.
    pub fn signature(mut self, definition: SignatureDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    /// 여러 시그니처를 순서대로 뒤에 추가합니다.
    pub fn signatures(mut self, definitions: impl IntoIterator<Item = SignatureDefinition>) -> Self {
        self.definitions.extend(definitions);
        self
    }

    /// 모든 선언을 검증/컴파일하여 레지스트리를 생성합니다.
    ///
    /// # Errors
    /// 구성 에러가 하나라도 있으면 레지스트리를 만들지 않습니다.
    pub fn build(self) -> Result<SignatureRegistry, DispatchError> {
        let mut registry = SignatureRegistry {
            signatures: Vec::with_capacity(self.definitions.len()),
            handlers: Vec::new(),
            by_kind: HashMap::new(),
            shadowed: Vec::new(),
        };

        let mut seen_triggers = HashSet::new();
        for definition in &self.definitions {
            definition.validate()?;
            if !seen_triggers.insert(definition.trigger.as_str()) {
                return Err(DispatchError::configuration(
                    &definition.trigger,
                    "duplicate trigger",
                ));
            }

            let handler = registry.add_handler(definition.handler()?)?;
            registry.signatures.push(Signature {
                trigger: definition.trigger.clone(),
                kind: registry.handlers[handler].kind().clone(),
                handler,
            });
        }

        registry.detect_shadowing();
        for shadow in &registry.shadowed {
            tracing::warn!(
                scope = shadow.scope.as_ref().map_or("(top)", EventKind::as_str),
                trigger = %shadow.trigger,
                shadowed_by = %shadow.shadowed_by,
                "trigger can never be selected; an earlier trigger is contained in it"
            );
        }

        metrics::gauge!(m::REGISTRY_SIGNATURES_LOADED).set(registry.signatures.len() as f64);
        metrics::gauge!(m::REGISTRY_SHADOWED_TRIGGERS).set(registry.shadowed.len() as f64);

        tracing::info!(
            signatures = registry.signatures.len(),
            kinds = registry.handlers.len(),
            shadowed = registry.shadowed.len(),
            "signature registry loaded"
        );

        Ok(registry)
    }
}

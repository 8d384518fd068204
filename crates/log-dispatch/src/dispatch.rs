//! 디스패처 -- 라인 하나를 받아 [`DispatchOutcome`] 하나를 반환합니다.
//!
//! 디스패처는 순수 동기 함수이며 호출 간 상태를 가지지 않습니다.
//! 레지스트리는 로딩 후 읽기 전용이므로 `Arc<Dispatcher>`로 여러 스레드에서
//! 동시에 호출할 수 있습니다. 유일한 전역 부수 효과는 메트릭 카운터 증가입니다.

use std::path::Path;

use metrics::counter;

use pwlog_core::event::EventKind;
use pwlog_core::metrics as m;
use pwlog_core::types::{DispatchOutcome, DriftReason};

use crate::config::DispatcherConfig;
use crate::error::DispatchError;
use crate::normalize::{Normalizer, RankTable};
use crate::registry::{Handler, RegistryBuilder, SignatureRegistry};
use crate::rule::SignatureLoader;

/// 시그니처 디스패처
#[derive(Debug)]
pub struct Dispatcher {
    registry: SignatureRegistry,
    normalizer: Normalizer,
    max_line_bytes: usize,
}

impl Dispatcher {
    /// 구성된 레지스트리와 설정으로 디스패처를 생성합니다.
    pub fn new(registry: SignatureRegistry, config: &DispatcherConfig) -> Self {
        Self {
            registry,
            normalizer: Normalizer::new(RankTable::with_overrides(&config.rank_names)),
            max_line_bytes: config.max_line_bytes,
        }
    }

    /// 내장 시그니처와 기본 설정으로 디스패처를 생성합니다.
    pub fn builtin() -> Result<Self, DispatchError> {
        Ok(Self::new(
            SignatureRegistry::builtin()?,
            &DispatcherConfig::default(),
        ))
    }

    /// 설정에 따라 내장 시그니처와 확장 디렉토리를 로드하여 디스패처를 생성합니다.
    ///
    /// 확장 시그니처는 내장 시그니처 뒤에 추가됩니다.
    pub async fn from_config(config: &DispatcherConfig) -> Result<Self, DispatchError> {
        config.validate()?;

        let mut builder = RegistryBuilder::new();
        if config.builtin_signatures {
            builder = builder.builtin();
        }
        if let Some(dir) = &config.rule_dir {
            builder = builder.signatures(SignatureLoader::load_directory(Path::new(dir)).await?);
        }

        Ok(Self::new(builder.build()?, config))
    }

    /// 레지스트리
    pub fn registry(&self) -> &SignatureRegistry {
        &self.registry
    }

    /// 라인을 분류하고 필드를 추출합니다.
    pub fn dispatch(&self, line: &str) -> DispatchOutcome {
        let outcome = match self.registry.find(line) {
            Some(signature) => self.run(self.registry.signature_handler(signature), line),
            None => DispatchOutcome::NoMatch,
        };
        record(&outcome);
        outcome
    }

    /// 트리거 검색 없이 지정한 이벤트 종류의 처리기로 라인을 처리합니다.
    ///
    /// 우산 종류를 지정하면 판별 단계부터 수행합니다.
    /// 등록되지 않은 종류면 `None`입니다.
    pub fn dispatch_as(&self, line: &str, kind: &str) -> Option<DispatchOutcome> {
        let index = self.registry.handler_index(kind)?;
        let outcome = self.run(index, line);
        record(&outcome);
        Some(outcome)
    }

    fn run(&self, index: usize, line: &str) -> DispatchOutcome {
        match self.registry.handler(index) {
            Handler::Rule(rule) => {
                if line.len() > self.max_line_bytes {
                    return drift(
                        rule.kind(),
                        line,
                        DriftReason::Oversized {
                            len: line.len(),
                            max: self.max_line_bytes,
                        },
                    );
                }
                let Some(raw) = rule.captures(line) else {
                    return drift(rule.kind(), line, DriftReason::PatternMismatch);
                };
                match self.normalizer.normalize(rule, &raw) {
                    Ok(event) => DispatchOutcome::Matched(event),
                    Err(reason) => drift(rule.kind(), line, reason),
                }
            }
            Handler::Umbrella(umbrella) => umbrella
                .branches
                .iter()
                .find(|b| line.contains(b.discriminator.as_str()))
                .map_or_else(
                    || DispatchOutcome::Uncategorized {
                        umbrella: umbrella.kind.clone(),
                        line: line.to_owned(),
                    },
                    |b| self.run(b.handler, line),
                ),
        }
    }
}

fn drift(kind: &EventKind, line: &str, reason: DriftReason) -> DispatchOutcome {
    DispatchOutcome::SignatureDrift {
        kind: kind.clone(),
        line: line.to_owned(),
        reason,
    }
}

/// 결과별 메트릭과 로그를 남깁니다.
fn record(outcome: &DispatchOutcome) {
    counter!(m::DISPATCH_LINES_TOTAL).increment(1);
    match outcome {
        DispatchOutcome::Matched(event) => {
            counter!(m::DISPATCH_MATCHED_TOTAL, m::LABEL_KIND => event.kind().as_str().to_owned())
                .increment(1);
        }
        DispatchOutcome::NoMatch => {
            counter!(m::DISPATCH_NO_MATCH_TOTAL).increment(1);
            tracing::trace!("no trigger matched");
        }
        DispatchOutcome::Uncategorized { umbrella, line } => {
            counter!(m::DISPATCH_UNCATEGORIZED_TOTAL, m::LABEL_UMBRELLA => umbrella.as_str().to_owned())
                .increment(1);
            tracing::debug!(umbrella = %umbrella, line = %line, "no discriminator matched");
        }
        DispatchOutcome::SignatureDrift { kind, line, reason } => {
            counter!(m::DISPATCH_SIGNATURE_DRIFT_TOTAL, m::LABEL_KIND => kind.as_str().to_owned())
                .increment(1);
            tracing::warn!(kind = %kind, reason = %reason, line = %line, "signature drift");
        }
    }
}

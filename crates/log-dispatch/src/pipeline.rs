//! 라인 파이프라인 -- 디스패처 결과를 협력자에게 전달합니다.
//!
//! [`LinePipeline`]은 라인을 순서대로 디스패치하고, 인식된 이벤트는
//! [`EventSink`]에, 드리프트와 미분류 우산 라인은 [`DriftReporter`]에 넘깁니다.
//! 라인 단위 결과는 흐름을 멈추지 않으며, 싱크 에러만 호출자에게 전파됩니다.
//!
//! # 내부 흐름
//! ```text
//! tailer -> lines -> Dispatcher -> Matched        -> EventSink
//!                               -> SignatureDrift -> DriftReporter
//!                               -> Uncategorized  -> DriftReporter
//!                               -> NoMatch        -> (counted only)
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;

use pwlog_core::error::PwlogError;
use pwlog_core::pipeline::{DriftReporter, EventSink};
use pwlog_core::types::DispatchOutcome;

use crate::dispatch::Dispatcher;
use crate::error::DispatchError;

/// 결과별 처리 통계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// 처리한 라인 수
    pub lines: u64,
    /// 싱크에 전달한 이벤트 수
    pub matched: u64,
    /// 트리거 없는 라인 수
    pub no_match: u64,
    /// 미분류 우산 라인 수
    pub uncategorized: u64,
    /// 시그니처 드리프트 수
    pub drift: u64,
}

impl PipelineStats {
    fn record(&mut self, outcome: &DispatchOutcome) {
        self.lines += 1;
        match outcome {
            DispatchOutcome::Matched(_) => self.matched += 1,
            DispatchOutcome::NoMatch => self.no_match += 1,
            DispatchOutcome::Uncategorized { .. } => self.uncategorized += 1,
            DispatchOutcome::SignatureDrift { .. } => self.drift += 1,
        }
    }
}

/// 라인 파이프라인
///
/// # 사용 예시
/// ```ignore
/// use pwlog_dispatch::{Dispatcher, LinePipelineBuilder};
///
/// let pipeline = LinePipelineBuilder::new()
///     .dispatcher(Arc::new(Dispatcher::builtin()?))
///     .sink(sink)
///     .reporter(reporter)
///     .build()?;
///
/// let stats = pipeline.run(lines)?;
/// ```
pub struct LinePipeline {
    dispatcher: Arc<Dispatcher>,
    sink: Arc<dyn EventSink>,
    reporter: Option<Arc<dyn DriftReporter>>,
}

impl LinePipeline {
    /// 디스패처
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// 라인 하나를 처리하고 결과를 반환합니다.
    ///
    /// # Errors
    /// 싱크가 이벤트를 기록하지 못한 경우에만 에러입니다.
    pub fn process_line(&self, line: &str) -> Result<DispatchOutcome, PwlogError> {
        let outcome = self.dispatcher.dispatch(line);
        match &outcome {
            DispatchOutcome::Matched(event) => self.sink.append(event)?,
            DispatchOutcome::SignatureDrift { kind, line, reason } => {
                if let Some(reporter) = &self.reporter {
                    reporter.report_drift(kind, line, reason);
                }
            }
            DispatchOutcome::Uncategorized { umbrella, line } => {
                if let Some(reporter) = &self.reporter {
                    reporter.report_uncategorized(umbrella, line);
                }
            }
            DispatchOutcome::NoMatch => {}
        }
        Ok(outcome)
    }

    /// 라인들을 순서대로 처리하고 통계를 반환합니다.
    pub fn run<I, S>(&self, lines: I) -> Result<PipelineStats, PwlogError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut stats = PipelineStats::default();
        for line in lines {
            let outcome = self.process_line(line.as_ref())?;
            stats.record(&outcome);
        }
        tracing::debug!(
            sink = self.sink.name(),
            lines = stats.lines,
            matched = stats.matched,
            drift = stats.drift,
            "line batch processed"
        );
        Ok(stats)
    }

    /// 채널이 닫힐 때까지 라인을 받아 처리합니다.
    ///
    /// tailer 협력자가 별도 태스크에서 라인을 보내는 구성에 사용합니다.
    pub async fn run_channel(
        &self,
        mut rx: mpsc::Receiver<String>,
    ) -> Result<PipelineStats, PwlogError> {
        let mut stats = PipelineStats::default();
        while let Some(line) = rx.recv().await {
            let outcome = self.process_line(&line)?;
            stats.record(&outcome);
        }
        tracing::info!(
            sink = self.sink.name(),
            lines = stats.lines,
            matched = stats.matched,
            no_match = stats.no_match,
            uncategorized = stats.uncategorized,
            drift = stats.drift,
            "line channel closed"
        );
        Ok(stats)
    }
}

/// 라인 파이프라인 빌더
#[derive(Default)]
pub struct LinePipelineBuilder {
    dispatcher: Option<Arc<Dispatcher>>,
    sink: Option<Arc<dyn EventSink>>,
    reporter: Option<Arc<dyn DriftReporter>>,
}

impl LinePipelineBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 디스패처를 설정합니다.
    pub fn dispatcher(mut self, dispatcher: Arc<Dispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// 이벤트 싱크를 설정합니다.
    pub fn sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// 드리프트 리포터를 설정합니다. 설정하지 않으면 로그와 메트릭으로만 남습니다.
    pub fn reporter(mut self, reporter: Arc<dyn DriftReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// 파이프라인을 빌드합니다.
    pub fn build(self) -> Result<LinePipeline, DispatchError> {
        let dispatcher = self.dispatcher.ok_or_else(|| DispatchError::Config {
            field: "dispatcher".to_owned(),
            reason: "dispatcher is required".to_owned(),
        })?;
        let sink = self.sink.ok_or_else(|| DispatchError::Config {
            field: "sink".to_owned(),
            reason: "event sink is required".to_owned(),
        })?;

        Ok(LinePipeline {
            dispatcher,
            sink,
            reporter: self.reporter,
        })
    }
}

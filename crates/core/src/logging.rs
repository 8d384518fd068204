//! 로깅 초기화 -- `[general]` 설정으로 tracing 구독자를 설치합니다.
//!
//! 엔진 자체는 구독자를 설치하지 않습니다. 디스패처를 임베딩하는 프로세스가
//! 레지스트리를 만들기 전에 [`init_tracing`]을 한 번 호출해야
//! 로딩 시 가려진 트리거 경고와 요약 로그가 남습니다.

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::GeneralConfig;

/// 허용되는 로그 출력 형식 이름
pub const LOG_FORMATS: &[&str] = &["json", "pretty"];

/// 로그 출력 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// 한 줄당 JSON 객체 하나 (운영 기본값)
    Json,
    /// 사람이 읽기 쉬운 여러 줄 출력
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            other => Err(format!(
                "unknown log format '{other}', expected one of: {}",
                LOG_FORMATS.join(", ")
            )),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Pretty => "pretty",
        })
    }
}

/// 로그 필터를 만듭니다. `RUST_LOG`가 설정되어 있으면 그것이 우선합니다.
pub fn env_filter(config: &GeneralConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.log_level)
        .with_context(|| format!("invalid log level '{}'", config.log_level))
}

/// 전역 tracing 구독자를 설치하고 메트릭 설명을 등록합니다.
///
/// 메트릭 레코더를 쓰는 경우 이 함수보다 먼저 설치해야 설명이 남습니다.
pub fn init_tracing(config: &GeneralConfig) -> Result<()> {
    let format: LogFormat = config.log_format.parse().map_err(anyhow::Error::msg)?;
    let filter = env_filter(config)?;

    // 드리프트 로그의 line 필드가 그대로 보이도록 span 정보는 생략
    let fmt_layer = match format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(false)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().pretty().boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .with_context(|| format!("failed to initialize {format} tracing subscriber"))?;

    crate::metrics::describe_all();
    tracing::info!(level = %config.log_level, format = %format, "tracing initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn general(level: &str, format: &str) -> GeneralConfig {
        GeneralConfig {
            log_level: level.to_owned(),
            log_format: format.to_owned(),
        }
    }

    #[test]
    fn log_format_parses_known_names() {
        assert_eq!("json".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("pretty".parse::<LogFormat>(), Ok(LogFormat::Pretty));
        for name in LOG_FORMATS {
            let format: LogFormat = name.parse().unwrap();
            assert_eq!(format.to_string(), *name);
        }
    }

    #[test]
    fn log_format_is_case_sensitive() {
        let err = "JSON".parse::<LogFormat>().unwrap_err();
        assert!(err.contains("JSON"));
    }

    #[test]
    fn unknown_format_is_rejected_before_install() {
        let err = init_tracing(&general("info", "xml")).unwrap_err();
        assert!(err.to_string().contains("xml"));
    }

    #[test]
    fn env_filter_accepts_level_directive() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert!(env_filter(&general("pwlog_dispatch=debug", "json")).is_ok());
    }
}

//! 시그니처 파일 로더 -- YAML 확장 시그니처를 디스크에서 로드합니다.
//!
//! 디렉토리 내의 `.yml`/`.yaml` 파일을 파일 이름 순으로 읽어
//! 선언 순서를 그대로 이어 붙입니다. 레지스트리가 불완전한 상태로
//! 시작하면 안 되므로 파일 하나라도 실패하면 전체 로딩이 실패합니다.

use std::path::{Path, PathBuf};

use crate::error::DispatchError;

use super::types::{SignatureDefinition, SignatureFile};

/// 시그니처 파일 최대 크기
const MAX_RULE_FILE_SIZE: u64 = 10 * 1024 * 1024; // 10MB
/// 디렉토리 하나에서 허용하는 최대 시그니처 수
const MAX_SIGNATURES_COUNT: usize = 10_000;

/// 시그니처 파일 로더
pub struct SignatureLoader;

impl SignatureLoader {
    /// 디렉토리에서 모든 YAML 시그니처 파일을 로드합니다.
    ///
    /// 파일 이름 순으로 정렬하여 처리하므로 결과 순서는 결정적입니다.
    ///
    /// # Errors
    /// - 디렉토리를 읽을 수 없는 경우
    /// - 어떤 파일이든 읽기/파싱/구조 검증에 실패한 경우
    /// - 시그니처 수가 `MAX_SIGNATURES_COUNT`를 초과하는 경우
    pub async fn load_directory(
        dir: impl AsRef<Path>,
    ) -> Result<Vec<SignatureDefinition>, DispatchError> {
        let dir = dir.as_ref();

        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(|e| DispatchError::RuleLoad {
                path: dir.display().to_string(),
                reason: format!("failed to read directory: {e}"),
            })?;

        let mut paths: Vec<PathBuf> = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| DispatchError::RuleLoad {
                path: dir.display().to_string(),
                reason: format!("failed to read directory entry: {e}"),
            })?
        {
            let path = entry.path();

            // .yml / .yaml 확장자만 처리
            let is_yaml = path
                .extension()
                .is_some_and(|ext| ext == "yml" || ext == "yaml");

            if is_yaml {
                paths.push(path);
            }
        }
        paths.sort();

        let mut signatures = Vec::new();
        for path in &paths {
            let loaded = Self::load_file(path).await?;
            tracing::debug!(
                path = %path.display(),
                count = loaded.len(),
                "loaded signature file"
            );
            signatures.extend(loaded);

            if signatures.len() > MAX_SIGNATURES_COUNT {
                return Err(DispatchError::RuleLoad {
                    path: dir.display().to_string(),
                    reason: format!("too many signatures: max {MAX_SIGNATURES_COUNT}"),
                });
            }
        }

        tracing::info!(
            dir = %dir.display(),
            files = paths.len(),
            count = signatures.len(),
            "loaded extension signatures"
        );

        Ok(signatures)
    }

    /// 단일 YAML 파일에서 시그니처를 로드합니다.
    pub async fn load_file(
        path: impl AsRef<Path>,
    ) -> Result<Vec<SignatureDefinition>, DispatchError> {
        let path = path.as_ref();

        // 파일 크기 검증
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| DispatchError::RuleLoad {
                path: path.display().to_string(),
                reason: format!("failed to read file metadata: {e}"),
            })?;

        if metadata.len() > MAX_RULE_FILE_SIZE {
            return Err(DispatchError::RuleLoad {
                path: path.display().to_string(),
                reason: format!(
                    "file too large: {} bytes (max: {MAX_RULE_FILE_SIZE})",
                    metadata.len()
                ),
            });
        }

        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| DispatchError::RuleLoad {
                    path: path.display().to_string(),
                    reason: format!("failed to read file: {e}"),
                })?;

        Self::parse_yaml(&content, &path.display().to_string())
    }

    /// YAML 문자열을 파싱하여 시그니처 목록을 생성합니다.
    pub fn parse_yaml(
        yaml_str: &str,
        source: &str,
    ) -> Result<Vec<SignatureDefinition>, DispatchError> {
        let file: SignatureFile =
            serde_yaml::from_str(yaml_str).map_err(|e| DispatchError::RuleLoad {
                path: source.to_owned(),
                reason: format!("YAML parse error: {e}"),
            })?;

        // 구조 검증 (정규식은 레지스트리 빌드 시 컴파일)
        for signature in &file.signatures {
            signature.validate().map_err(|e| DispatchError::RuleLoad {
                path: source.to_owned(),
                reason: e.to_string(),
            })?;
        }

        Ok(file.signatures)
    }
}

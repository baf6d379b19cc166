//! 설정 관리 — apiscan.toml 파싱 및 런타임 설정
//!
//! [`ApiScanConfig`]는 모든 크레이트의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`APISCAN_SCANNER_OUTPUT_DIR=build/api` 형식)
//! 3. 설정 파일 (`apiscan.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), apiscan_core::error::ApiScanError> {
//! use apiscan_core::config::ApiScanConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = ApiScanConfig::load("apiscan.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = ApiScanConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ApiScanError, ConfigError};

/// 경로 문자열 최대 길이
const MAX_PATH_LEN: usize = 4096;

/// 병렬 스캔 수 상한
pub const MAX_PARALLEL_SCANS_LIMIT: usize = 256;

/// apiscan 통합 설정
///
/// `apiscan.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiScanConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// API 스캐너 설정
    #[serde(default)]
    pub scanner: ScannerConfig,
}

impl ApiScanConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ApiScanError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 설정 파일이 없으면 기본값으로 시작합니다.
    ///
    /// 파일이 있으면 [`load`](Self::load)와 동일하게 동작하고,
    /// 없으면 기본값에 환경변수 오버라이드만 적용합니다.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ApiScanError> {
        let path = path.as_ref();
        match Self::load(path).await {
            Err(ApiScanError::Config(ConfigError::FileNotFound { .. })) => {
                debug!(path = %path.display(), "config file not found, using defaults");
                let mut config = Self::default();
                config.apply_env_overrides();
                config.validate()?;
                Ok(config)
            }
            other => other,
        }
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ApiScanError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ApiScanError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                ApiScanError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, ApiScanError> {
        toml::from_str(toml_str).map_err(|e| {
            ApiScanError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `APISCAN_{SECTION}_{FIELD}`
    /// 예: `APISCAN_SCANNER_OUTPUT_DIR=build/api`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "APISCAN_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "APISCAN_GENERAL_LOG_FORMAT");

        // Scanner
        override_csv(&mut self.scanner.artifacts, "APISCAN_SCANNER_ARTIFACTS");
        override_csv(&mut self.scanner.classpath, "APISCAN_SCANNER_CLASSPATH");
        override_string(&mut self.scanner.output_dir, "APISCAN_SCANNER_OUTPUT_DIR");
        override_string(
            &mut self.scanner.internal_marker,
            "APISCAN_SCANNER_INTERNAL_MARKER",
        );
        override_bool(
            &mut self.scanner.include_synthetic,
            "APISCAN_SCANNER_INCLUDE_SYNTHETIC",
        );
        override_bool(
            &mut self.scanner.strict_resolution,
            "APISCAN_SCANNER_STRICT_RESOLUTION",
        );
        override_usize(
            &mut self.scanner.max_parallel_scans,
            "APISCAN_SCANNER_MAX_PARALLEL_SCANS",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), ApiScanError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        self.scanner.validate()
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// API 스캐너 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// 스캔 대상 아티팩트 경로 (JAR/ZIP 또는 클래스 디렉토리)
    pub artifacts: Vec<String>,
    /// 타입 해석용 의존성 경로 (열거 대상 아님)
    pub classpath: Vec<String>,
    /// 리포트 출력 디렉토리
    pub output_dir: String,
    /// 내부 패키지 표식 세그먼트
    pub internal_marker: String,
    /// synthetic/bridge 멤버 포함 여부
    pub include_synthetic: bool,
    /// 상위 타입 해석 실패를 에러로 처리할지 여부
    pub strict_resolution: bool,
    /// 동시에 실행할 최대 스캔 수
    pub max_parallel_scans: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            artifacts: Vec::new(),
            classpath: Vec::new(),
            output_dir: "build/api".to_owned(),
            internal_marker: "internal".to_owned(),
            include_synthetic: true,
            strict_resolution: false,
            max_parallel_scans: 4,
        }
    }
}

impl ScannerConfig {
    /// 스캐너 섹션의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), ApiScanError> {
        if self.output_dir.is_empty() {
            return Err(invalid("scanner.output_dir", "must not be empty"));
        }

        if Path::new(&self.output_dir)
            .components()
            .any(|c| c == std::path::Component::ParentDir)
        {
            return Err(invalid(
                "scanner.output_dir",
                "contains path traversal pattern '..'",
            ));
        }

        if self.output_dir.len() > MAX_PATH_LEN {
            return Err(invalid(
                "scanner.output_dir",
                &format!("exceeds maximum length {MAX_PATH_LEN}"),
            ));
        }

        if self.internal_marker.is_empty() {
            return Err(invalid("scanner.internal_marker", "must not be empty"));
        }

        if self.internal_marker.contains(['.', '/']) {
            return Err(invalid(
                "scanner.internal_marker",
                "must be a single package segment (no '.' or '/')",
            ));
        }

        if self.max_parallel_scans == 0 || self.max_parallel_scans > MAX_PARALLEL_SCANS_LIMIT {
            return Err(invalid(
                "scanner.max_parallel_scans",
                &format!("must be 1-{MAX_PARALLEL_SCANS_LIMIT}"),
            ));
        }

        for (field, paths) in [
            ("scanner.artifacts", &self.artifacts),
            ("scanner.classpath", &self.classpath),
        ] {
            for path in paths {
                if path.is_empty() {
                    return Err(invalid(field, "path must not be empty"));
                }
                if path.len() > MAX_PATH_LEN {
                    return Err(invalid(
                        field,
                        &format!("path '{path}' exceeds maximum length {MAX_PATH_LEN}"),
                    ));
                }
            }
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ApiScanError {
    ConfigError::InvalidValue {
        field: field.to_owned(),
        reason: reason.to_owned(),
    }
    .into()
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();
    }
}

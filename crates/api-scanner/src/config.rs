//! API 스캐너 설정
//!
//! [`ApiScannerConfig`]는 core의 [`ScannerConfig`](apiscan_core::config::ScannerConfig)를
//! 확장하여 스캐너 고유 설정(클래스 파일 크기 제한)을 추가합니다.
//!
//! # 사용 예시
//!
//! ```
//! use apiscan_scanner::ApiScannerConfig;
//!
//! // 기본값으로 생성
//! let config = ApiScannerConfig::default();
//! config.validate().unwrap();
//!
//! // 빌더로 생성
//! use apiscan_scanner::ApiScannerConfigBuilder;
//!
//! let config = ApiScannerConfigBuilder::new()
//!     .artifacts(vec!["build/libs/core.jar".to_owned()])
//!     .strict_resolution(true)
//!     .build()
//!     .unwrap();
//! ```

use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

use apiscan_core::config::MAX_PARALLEL_SCANS_LIMIT;

use crate::error::ApiScannerError;

/// 설정 상한값 상수
const MAX_CLASS_FILE_SIZE: usize = 64 * 1024 * 1024; // 64 MB
const MAX_PATH_LEN: usize = 4096;

/// API 스캐너 설정
///
/// core의 `ScannerConfig`에서 파생되며, 모듈 고유 확장 필드를 포함합니다.
///
/// # 필드
///
/// - **artifacts**: 리포트를 생성할 아티팩트 경로
/// - **classpath**: 타입 해석에만 쓰이는 의존성 경로
/// - **output_dir**: 리포트 출력 디렉토리
/// - **internal_marker**: 리포트에서 제외할 패키지 세그먼트
/// - **include_synthetic**: synthetic/bridge 멤버 포함 여부
/// - **strict_resolution**: 상위 타입 해석 실패 시 아티팩트를 건너뛸지 여부
/// - **max_parallel_scans**: 동시에 스캔할 아티팩트 수
/// - **max_class_file_size**: 클래스 파일 하나의 최대 크기 (바이트)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiScannerConfig {
    /// 스캔 대상 아티팩트 경로
    pub artifacts: Vec<String>,
    /// 의존성 경로 (클래스패스 순서)
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

    // --- 모듈 고유 확장 ---
    /// 클래스 파일 최대 허용 크기 (바이트)
    pub max_class_file_size: usize,
}

impl Default for ApiScannerConfig {
    fn default() -> Self {
        Self {
            artifacts: Vec::new(),
            classpath: Vec::new(),
            output_dir: "build/api".to_owned(),
            internal_marker: "internal".to_owned(),
            include_synthetic: true,
            strict_resolution: false,
            max_parallel_scans: 4,
            max_class_file_size: 16 * 1024 * 1024, // 16 MB
        }
    }
}

impl ApiScannerConfig {
    /// core의 `ScannerConfig`에서 스캐너 설정을 생성합니다.
    ///
    /// core 설정에 없는 확장 필드는 기본값을 사용합니다.
    pub fn from_core(core: &apiscan_core::config::ScannerConfig) -> Self {
        Self {
            artifacts: core.artifacts.clone(),
            classpath: core.classpath.clone(),
            output_dir: core.output_dir.clone(),
            internal_marker: core.internal_marker.clone(),
            include_synthetic: core.include_synthetic,
            strict_resolution: core.strict_resolution,
            max_parallel_scans: core.max_parallel_scans,
            ..Self::default()
        }
    }

    /// 설정 값의 유효성을 검증합니다.
    ///
    /// # 검증 규칙
    ///
    /// - `output_dir`: 비어있지 않고 `..` 컴포넌트 없음
    /// - `internal_marker`: 비어있지 않은 단일 패키지 세그먼트
    /// - `max_parallel_scans`: 1-256
    /// - `max_class_file_size`: 1-67108864 (64MB)
    /// - `artifacts` / `classpath`: 각 경로가 비어있지 않고 4096바이트 이하
    pub fn validate(&self) -> Result<(), ApiScannerError> {
        if self.output_dir.is_empty() {
            return Err(config_error("output_dir", "must not be empty"));
        }

        if Path::new(&self.output_dir)
            .components()
            .any(|c| c == Component::ParentDir)
        {
            return Err(config_error(
                "output_dir",
                "contains path traversal pattern '..'",
            ));
        }

        if self.internal_marker.is_empty() || self.internal_marker.contains(['.', '/']) {
            return Err(config_error(
                "internal_marker",
                "must be a single non-empty package segment",
            ));
        }

        if self.max_parallel_scans == 0 || self.max_parallel_scans > MAX_PARALLEL_SCANS_LIMIT {
            return Err(config_error(
                "max_parallel_scans",
                &format!("must be 1-{MAX_PARALLEL_SCANS_LIMIT}"),
            ));
        }

        if self.max_class_file_size == 0 || self.max_class_file_size > MAX_CLASS_FILE_SIZE {
            return Err(config_error(
                "max_class_file_size",
                &format!("must be 1-{MAX_CLASS_FILE_SIZE}"),
            ));
        }

        for (field, paths) in [("artifacts", &self.artifacts), ("classpath", &self.classpath)] {
            for path in paths {
                if path.is_empty() {
                    return Err(config_error(field, "path must not be empty"));
                }
                if path.len() > MAX_PATH_LEN {
                    return Err(config_error(
                        field,
                        &format!("path exceeds maximum length {MAX_PATH_LEN}"),
                    ));
                }
            }
        }

        Ok(())
    }
}

fn config_error(field: &str, reason: &str) -> ApiScannerError {
    ApiScannerError::Config {
        field: field.to_owned(),
        reason: reason.to_owned(),
    }
}

/// [`ApiScannerConfig`] 빌더
///
/// 유연한 설정 구성 및 빌드 시 유효성 검증을 제공합니다.
#[derive(Default)]
pub struct ApiScannerConfigBuilder {
    config: ApiScannerConfig,
}

impl ApiScannerConfigBuilder {
    /// 기본값을 가진 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 스캔 대상 아티팩트 목록을 설정합니다.
    pub fn artifacts(mut self, artifacts: Vec<String>) -> Self {
        self.config.artifacts = artifacts;
        self
    }

    /// 의존성 경로 목록을 설정합니다.
    pub fn classpath(mut self, classpath: Vec<String>) -> Self {
        self.config.classpath = classpath;
        self
    }

    /// 출력 디렉토리를 설정합니다.
    pub fn output_dir(mut self, dir: impl Into<String>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    /// 내부 패키지 표식을 설정합니다.
    pub fn internal_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.internal_marker = marker.into();
        self
    }

    /// synthetic/bridge 멤버 포함 여부를 설정합니다.
    pub fn include_synthetic(mut self, include: bool) -> Self {
        self.config.include_synthetic = include;
        self
    }

    /// strict 해석 모드를 설정합니다.
    pub fn strict_resolution(mut self, strict: bool) -> Self {
        self.config.strict_resolution = strict;
        self
    }

    /// 최대 병렬 스캔 수를 설정합니다.
    pub fn max_parallel_scans(mut self, max: usize) -> Self {
        self.config.max_parallel_scans = max;
        self
    }

    /// 클래스 파일 최대 크기(바이트)를 설정합니다.
    pub fn max_class_file_size(mut self, size: usize) -> Self {
        self.config.max_class_file_size = size;
        self
    }

    /// 설정을 검증하고 빌드합니다.
    ///
    /// # Errors
    ///
    /// 유효성 검증 실패 시 `ApiScannerError::Config` 반환
    pub fn build(self) -> Result<ApiScannerConfig, ApiScannerError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

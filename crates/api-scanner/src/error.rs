//! API 스캐너 에러 타입
//!
//! [`ApiScannerError`]는 스캐너 모듈 내에서 발생할 수 있는 모든 에러를 나타냅니다.
//! `From<ApiScannerError> for ApiScanError` 구현을 통해 `?` 연산자로
//! 상위 에러 타입으로 자연스럽게 전파됩니다.
//!
//! # 에러 카테고리
//!
//! - **배치 수준 (치명적)**: `Directory`, `Config`
//! - **해석**: `Resolution`, `UnresolvedType`, `FileTooBig`
//! - **리포트 쓰기**: `Write`, `OutputCollision`
//! - **기타**: `Io`, `Task`
//!
//! 클래스 파일 디코딩 실패는 [`ClassParseError`](crate::classfile::ClassParseError)로
//! 별도 표현되며, 아티팩트 내부 엔트리의 경우 에러가 아니라 로딩 불가로 기록됩니다.

use apiscan_core::error::{ApiScanError, ConfigError, ScanError};

/// API 스캐너 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum ApiScannerError {
    /// 출력 디렉토리 생성 실패 (배치 전체 중단)
    #[error("output directory error: {path}: {source}")]
    Directory {
        /// 출력 디렉토리 경로
        path: String,
        /// 원본 I/O 에러
        source: std::io::Error,
    },

    /// 아티팩트 또는 의존성 위치를 열 수 없음
    #[error("resolution error: {artifact}: {reason}")]
    Resolution {
        /// 아티팩트 또는 의존성 경로
        artifact: String,
        /// 실패 사유
        reason: String,
    },

    /// strict 모드에서 상위 타입을 해석할 수 없음
    #[error("unresolved type in {artifact}: {type_name} (referenced by {referenced_by})")]
    UnresolvedType {
        /// 스캔 중인 아티팩트 경로
        artifact: String,
        /// 해석 실패한 타입명
        type_name: String,
        /// 참조한 타입명
        referenced_by: String,
    },

    /// 클래스 파일 크기 초과
    #[error("file too large: {path}: {size} bytes (max: {max})")]
    FileTooBig {
        /// 엔트리 경로 (`artifact!entry` 형식)
        path: String,
        /// 실제 크기 (바이트)
        size: u64,
        /// 최대 허용 크기 (바이트)
        max: usize,
    },

    /// 리포트 파일 쓰기 실패
    #[error("write error: {path}: {source}")]
    Write {
        /// 리포트 파일 경로
        path: String,
        /// 원본 I/O 에러
        source: std::io::Error,
    },

    /// 두 아티팩트가 같은 리포트 파일에 매핑됨
    #[error("output collision: {path} is already produced by another artifact")]
    OutputCollision {
        /// 충돌한 리포트 파일 경로
        path: String,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 파일 I/O 에러
    #[error("io error: {path}: {source}")]
    Io {
        /// 관련 파일 경로
        path: String,
        /// 원본 I/O 에러
        source: std::io::Error,
    },

    /// blocking 태스크 실행 실패
    #[error("task error: {0}")]
    Task(String),
}

impl ApiScannerError {
    /// 배치 전체를 중단해야 하는 에러인지 반환합니다.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Directory { .. } | Self::Config { .. })
    }

    /// 로그와 메트릭 레이블에 쓰이는 고정 분류명을 반환합니다.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Directory { .. } => "directory",
            Self::Resolution { .. } | Self::UnresolvedType { .. } | Self::FileTooBig { .. } => {
                "resolution"
            }
            Self::Write { .. } | Self::OutputCollision { .. } => "write",
            Self::Config { .. } => "config",
            Self::Io { .. } => "io",
            Self::Task(_) => "task",
        }
    }
}

impl From<ApiScannerError> for ApiScanError {
    fn from(err: ApiScannerError) -> Self {
        match err {
            ApiScannerError::Directory { path, source } => ApiScanError::Scan(
                ScanError::Directory(format!("{path}: {source}")),
            ),
            err @ (ApiScannerError::Resolution { .. }
            | ApiScannerError::UnresolvedType { .. }
            | ApiScannerError::FileTooBig { .. }) => {
                ApiScanError::Scan(ScanError::Resolution(err.to_string()))
            }
            err @ (ApiScannerError::Write { .. } | ApiScannerError::OutputCollision { .. }) => {
                ApiScanError::Scan(ScanError::Write(err.to_string()))
            }
            ApiScannerError::Config { field, reason } => {
                ApiScanError::Config(ConfigError::InvalidValue { field, reason })
            }
            err @ (ApiScannerError::Io { .. } | ApiScannerError::Task(_)) => {
                ApiScanError::Scan(ScanError::Failed(err.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn io_err() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied")
    }

    #[test]
    fn resolution_error_display() {
        let err = ApiScannerError::Resolution {
            artifact: "lib.jar".to_owned(),
            reason: "invalid Zip archive".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("lib.jar"));
        assert!(msg.contains("invalid Zip archive"));
    }

    #[test]
    fn unresolved_type_display() {
        let err = ApiScannerError::UnresolvedType {
            artifact: "lib.jar".to_owned(),
            type_name: "org.dep.Base".to_owned(),
            referenced_by: "com.example.Child".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("org.dep.Base"));
        assert!(msg.contains("com.example.Child"));
    }

    #[test]
    fn file_too_big_display() {
        let err = ApiScannerError::FileTooBig {
            path: "lib.jar!com/x/Huge.class".to_owned(),
            size: 20_000_000,
            max: 16_777_216,
        };
        let msg = err.to_string();
        assert!(msg.contains("20000000"));
        assert!(msg.contains("16777216"));
    }

    #[test]
    fn kinds_are_stable() {
        let cases = [
            (
                ApiScannerError::Directory {
                    path: "out".to_owned(),
                    source: io_err(),
                },
                "directory",
            ),
            (
                ApiScannerError::FileTooBig {
                    path: "x".to_owned(),
                    size: 2,
                    max: 1,
                },
                "resolution",
            ),
            (
                ApiScannerError::OutputCollision {
                    path: "lib.txt".to_owned(),
                },
                "write",
            ),
            (
                ApiScannerError::Config {
                    field: "f".to_owned(),
                    reason: "r".to_owned(),
                },
                "config",
            ),
            (
                ApiScannerError::Io {
                    path: "x".to_owned(),
                    source: io_err(),
                },
                "io",
            ),
            (ApiScannerError::Task("panicked".to_owned()), "task"),
        ];
        for (err, kind) in cases {
            assert_eq!(err.kind(), kind);
        }
    }

    #[test]
    fn only_directory_and_config_are_fatal() {
        assert!(
            ApiScannerError::Directory {
                path: "out".to_owned(),
                source: io_err(),
            }
            .is_fatal()
        );
        assert!(
            ApiScannerError::Config {
                field: "f".to_owned(),
                reason: "r".to_owned(),
            }
            .is_fatal()
        );
        assert!(
            !ApiScannerError::Resolution {
                artifact: "a".to_owned(),
                reason: "r".to_owned(),
            }
            .is_fatal()
        );
        assert!(!ApiScannerError::Task("x".to_owned()).is_fatal());
    }

    #[test]
    fn converts_directory_to_fatal_core_error() {
        let err: ApiScanError = ApiScannerError::Directory {
            path: "out".to_owned(),
            source: io_err(),
        }
        .into();
        assert!(matches!(err, ApiScanError::Scan(ScanError::Directory(_))));
        assert!(err.is_fatal());
    }

    #[test]
    fn converts_resolution_family_to_core_resolution() {
        let err: ApiScanError = ApiScannerError::UnresolvedType {
            artifact: "a".to_owned(),
            type_name: "t".to_owned(),
            referenced_by: "r".to_owned(),
        }
        .into();
        assert!(matches!(err, ApiScanError::Scan(ScanError::Resolution(_))));
    }

    #[test]
    fn converts_collision_to_core_write() {
        let err: ApiScanError = ApiScannerError::OutputCollision {
            path: "lib.txt".to_owned(),
        }
        .into();
        assert!(matches!(err, ApiScanError::Scan(ScanError::Write(_))));
    }

    #[test]
    fn converts_config_to_core_config() {
        let err: ApiScanError = ApiScannerError::Config {
            field: "max_class_file_size".to_owned(),
            reason: "must be 1-67108864".to_owned(),
        }
        .into();
        assert!(matches!(
            err,
            ApiScanError::Config(ConfigError::InvalidValue { .. })
        ));
    }
}

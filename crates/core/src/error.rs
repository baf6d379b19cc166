//! 에러 타입 — 도메인별 에러 정의

/// apiscan 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum ApiScanError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// API 스캔 에러
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiScanError {
    /// 배치 전체를 중단해야 하는 에러인지 반환합니다.
    ///
    /// 설정 에러와 출력 디렉토리 생성 실패만 배치 수준 에러입니다.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::Scan(ScanError::Directory(_))
        )
    }
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// API 스캔 에러
///
/// 스캐너 크레이트의 세부 에러가 이 분류로 변환됩니다.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// 출력 디렉토리 생성 실패 (배치 전체 중단)
    #[error("output directory error: {0}")]
    Directory(String),

    /// 아티팩트 또는 의존성 해석 실패 (아티팩트 단위)
    #[error("resolution failed: {0}")]
    Resolution(String),

    /// 리포트 쓰기 실패 (아티팩트 단위)
    #[error("report write failed: {0}")]
    Write(String),

    /// 기타 스캔 실패
    #[error("scan failed: {0}")]
    Failed(String),
}

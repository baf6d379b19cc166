//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 스캐너는 이 상수를 사용하여 `metrics::counter!()`, `metrics::histogram!()`
//! 매크로를 호출합니다. 레코더가 설치되지 않았다면 기록은 무시됩니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `apiscan_`
//! - 모듈명: `scanner_`
//! - 접미어: `_total` (counter), `_seconds` (histogram)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(apiscan_core::metrics::SCANNER_SCANS_COMPLETED_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 에러 종류 레이블 키 (resolution, write, io, task)
pub const LABEL_KIND: &str = "kind";

// ─── API Scanner 메트릭 ─────────────────────────────────────────────

/// Scanner: 리포트 작성까지 완료된 아티팩트 수 (counter)
pub const SCANNER_SCANS_COMPLETED_TOTAL: &str = "apiscan_scanner_scans_completed_total";

/// Scanner: 건너뛴 아티팩트 수 (counter, label: kind)
pub const SCANNER_SCAN_FAILURES_TOTAL: &str = "apiscan_scanner_scan_failures_total";

/// Scanner: 리포트에 기록된 타입 수 (counter)
pub const SCANNER_TYPES_EMITTED_TOTAL: &str = "apiscan_scanner_types_emitted_total";

/// Scanner: 리포트에 기록된 메서드/필드 수 (counter)
pub const SCANNER_MEMBERS_EMITTED_TOTAL: &str = "apiscan_scanner_members_emitted_total";

/// Scanner: 아티팩트 하나의 스캔 소요 시간 (histogram, 초)
pub const SCANNER_SCAN_DURATION_SECONDS: &str = "apiscan_scanner_scan_duration_seconds";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 프로세스 시작 시 한 번 호출합니다. 레코더가 없으면 아무 일도 하지 않습니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!(
        SCANNER_SCANS_COMPLETED_TOTAL,
        "Total number of artifacts whose API report was written"
    );
    describe_counter!(
        SCANNER_SCAN_FAILURES_TOTAL,
        "Total number of artifacts skipped because of a per-artifact error"
    );
    describe_counter!(
        SCANNER_TYPES_EMITTED_TOTAL,
        "Total number of type headers written to API reports"
    );
    describe_counter!(
        SCANNER_MEMBERS_EMITTED_TOTAL,
        "Total number of method and field lines written to API reports"
    );
    describe_histogram!(
        SCANNER_SCAN_DURATION_SECONDS,
        "Time spent scanning one artifact in seconds"
    );
}

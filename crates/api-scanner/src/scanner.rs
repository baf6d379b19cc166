//! API 스캐너 오케스트레이터 -- 아티팩트별 스캔과 병렬 배치 실행
//!
//! # 내부 아키텍처
//!
//! ```text
//! ScanRequest --> ResolutionContext --> ArtifactWalker --> MemberFilter
//!                                                              |
//!                                               render + order (type_block)
//!                                                              |
//!                                                           Report --> ReportWriter --> <name>.txt
//! ```
//!
//! 배치는 tokio blocking 풀에서 아티팩트를 병렬로 스캔하며, 동시 스캔 수는
//! `max_parallel_scans` 세마포어로 제한됩니다. 아티팩트별 에러는 경계에서 잡혀
//! 요약에 기록되고, 출력 디렉토리 생성 실패만 배치 전체를 중단합니다.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use apiscan_core::metrics as m;

use crate::config::ApiScannerConfig;
use crate::error::ApiScannerError;
use crate::filter::MemberFilter;
use crate::ordering::type_block;
use crate::report::{Report, ReportWriter};
use crate::resolver::ResolutionContext;
use crate::types::ScanRequest;
use crate::walker::ArtifactWalker;

/// 아티팩트 하나의 배치 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ArtifactOutcome {
    /// 리포트 작성 완료
    Written {
        /// 아티팩트 경로
        artifact: PathBuf,
        /// 리포트 파일 경로
        report: PathBuf,
        /// 타입 수
        types: usize,
        /// 메서드/필드 수
        members: usize,
    },
    /// 에러로 건너뜀
    Skipped {
        /// 아티팩트 경로
        artifact: PathBuf,
        /// 에러 분류 (`ApiScannerError::kind`)
        kind: &'static str,
        /// 에러 메시지
        reason: String,
    },
}

impl ArtifactOutcome {
    fn skipped(artifact: PathBuf, error: &ApiScannerError) -> Self {
        warn!(
            artifact = %artifact.display(),
            kind = error.kind(),
            error = %error,
            "skipping artifact"
        );
        metrics::counter!(m::SCANNER_SCAN_FAILURES_TOTAL, m::LABEL_KIND => error.kind())
            .increment(1);
        Self::Skipped {
            artifact,
            kind: error.kind(),
            reason: error.to_string(),
        }
    }

    /// 아티팩트 경로
    pub fn artifact(&self) -> &Path {
        match self {
            Self::Written { artifact, .. } | Self::Skipped { artifact, .. } => artifact,
        }
    }

    /// 리포트 작성 여부
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written { .. })
    }
}

/// 배치 실행 요약 (입력 순서 유지)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// 아티팩트별 결과
    pub outcomes: Vec<ArtifactOutcome>,
}

impl BatchSummary {
    /// 리포트가 작성된 아티팩트 수
    pub fn written(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_written()).count()
    }

    /// 건너뛴 아티팩트 수
    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.written()
    }

    /// 모든 아티팩트가 작성되었는지 여부
    pub fn is_complete(&self) -> bool {
        self.skipped() == 0
    }
}

enum Pending {
    Done(ArtifactOutcome),
    Running {
        artifact: PathBuf,
        handle: JoinHandle<Result<ArtifactOutcome, ApiScannerError>>,
    },
}

/// API 스캐너
///
/// 스캔 메커니즘(`scan`)과 배치 오케스트레이션(`scan_batch`, `run`)을 제공합니다.
/// 복제 비용이 작으며, 복제본은 같은 설정을 공유합니다.
#[derive(Debug, Clone)]
pub struct ApiScanner {
    config: Arc<ApiScannerConfig>,
}

impl ApiScanner {
    /// 설정을 검증하고 스캐너를 만듭니다.
    pub fn new(config: ApiScannerConfig) -> Result<Self, ApiScannerError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
        })
    }

    /// 스캐너 설정
    pub fn config(&self) -> &ApiScannerConfig {
        &self.config
    }

    /// 아티팩트 하나를 스캔하여 리포트를 만듭니다 (blocking).
    ///
    /// 컨텍스트는 호출마다 새로 만들어지고 반환 시 drop 됩니다.
    pub fn scan(&self, request: &ScanRequest) -> Result<Report, ApiScannerError> {
        let context = ResolutionContext::resolve(request, self.config.max_class_file_size)?;
        let walker = ArtifactWalker::new(self.config.internal_marker.as_str());
        let filter = MemberFilter::new(self.config.include_synthetic);

        let mut lines = Vec::new();
        for ty in walker.enumerate(&context) {
            context.check_supertypes(ty, self.config.strict_resolution)?;
            trace!(type_name = %ty.name, "emitting type");
            lines.extend(type_block(ty, &filter));
        }

        Ok(Report::new(request.artifact.display().to_string(), lines))
    }

    /// 스캔 후 리포트를 파일로 씁니다 (blocking).
    fn scan_to_path(
        &self,
        request: &ScanRequest,
        report_path: &Path,
    ) -> Result<ArtifactOutcome, ApiScannerError> {
        let started = Instant::now();
        let report = self.scan(request)?;
        ReportWriter::write_to_path(&report, report_path)?;
        metrics::histogram!(m::SCANNER_SCAN_DURATION_SECONDS)
            .record(started.elapsed().as_secs_f64());

        let types = report.type_count();
        let members = report.member_count();
        metrics::counter!(m::SCANNER_SCANS_COMPLETED_TOTAL).increment(1);
        metrics::counter!(m::SCANNER_TYPES_EMITTED_TOTAL).increment(as_u64(types));
        metrics::counter!(m::SCANNER_MEMBERS_EMITTED_TOTAL).increment(as_u64(members));

        info!(
            artifact = %request.artifact.display(),
            report = %report_path.display(),
            types,
            members,
            "api report written"
        );

        Ok(ArtifactOutcome::Written {
            artifact: request.artifact.clone(),
            report: report_path.to_path_buf(),
            types,
            members,
        })
    }

    /// 여러 아티팩트를 병렬로 스캔하여 `output_dir`에 리포트를 씁니다.
    ///
    /// # Errors
    ///
    /// 출력 디렉토리를 만들 수 없으면 `Directory` 에러로 배치 전체가 실패합니다.
    /// 아티팩트별 에러는 요약의 `Skipped` 항목으로 기록됩니다.
    pub async fn scan_batch(
        &self,
        requests: Vec<ScanRequest>,
        output_dir: &Path,
    ) -> Result<BatchSummary, ApiScannerError> {
        info!(
            artifacts = requests.len(),
            output_dir = %output_dir.display(),
            max_parallel = self.config.max_parallel_scans,
            "starting api scan batch"
        );

        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|source| ApiScannerError::Directory {
                path: output_dir.display().to_string(),
                source,
            })?;

        let semaphore = Arc::new(Semaphore::new(self.config.max_parallel_scans));
        let mut claimed = HashSet::new();
        let mut pending = Vec::with_capacity(requests.len());

        for request in requests {
            let report_path = match output_path_for(&request.artifact, output_dir) {
                Ok(path) => path,
                Err(e) => {
                    pending.push(Pending::Done(ArtifactOutcome::skipped(request.artifact, &e)));
                    continue;
                }
            };

            if !claimed.insert(report_path.clone()) {
                let err = ApiScannerError::OutputCollision {
                    path: report_path.display().to_string(),
                };
                pending.push(Pending::Done(ArtifactOutcome::skipped(request.artifact, &err)));
                continue;
            }

            // 동시 스캔 수 제한
            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    let err = ApiScannerError::Task(format!("scan permit unavailable: {e}"));
                    pending.push(Pending::Done(ArtifactOutcome::skipped(request.artifact, &err)));
                    continue;
                }
            };

            debug!(artifact = %request.artifact.display(), "scheduling scan");
            let scanner = self.clone();
            let artifact = request.artifact.clone();
            let handle = tokio::task::spawn_blocking(move || {
                let outcome = scanner.scan_to_path(&request, &report_path);
                drop(permit); // 스캔 종료 시 세마포어 반환
                outcome
            });
            pending.push(Pending::Running { artifact, handle });
        }

        let mut outcomes = Vec::with_capacity(pending.len());
        for entry in pending {
            let outcome = match entry {
                Pending::Done(outcome) => outcome,
                Pending::Running { artifact, handle } => match handle.await {
                    Ok(Ok(outcome)) => outcome,
                    Ok(Err(e)) => ArtifactOutcome::skipped(artifact, &e),
                    Err(e) => ArtifactOutcome::skipped(
                        artifact,
                        &ApiScannerError::Task(format!("scan task failed: {e}")),
                    ),
                },
            };
            outcomes.push(outcome);
        }

        let summary = BatchSummary { outcomes };
        info!(
            written = summary.written(),
            skipped = summary.skipped(),
            "api scan batch finished"
        );
        Ok(summary)
    }

    /// 설정의 아티팩트/클래스패스/출력 디렉토리로 배치를 실행합니다.
    pub async fn run(&self) -> Result<BatchSummary, ApiScannerError> {
        let classpath: Vec<PathBuf> = self.config.classpath.iter().map(PathBuf::from).collect();
        let requests = self
            .config
            .artifacts
            .iter()
            .map(|artifact| ScanRequest::new(artifact, classpath.clone()))
            .collect();
        self.scan_batch(requests, Path::new(&self.config.output_dir))
            .await
    }
}

/// 아티팩트의 리포트 파일 경로를 계산합니다.
///
/// 파일 아티팩트는 확장자(`.jar`, `.zip` 등)를 `.txt`로 바꾸고,
/// 디렉토리 아티팩트는 디렉토리 이름에 `.txt`를 붙입니다.
pub fn output_path_for(artifact: &Path, output_dir: &Path) -> Result<PathBuf, ApiScannerError> {
    let name = match artifact.file_name() {
        Some(name) => PathBuf::from(name),
        None => artifact
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(PathBuf::from))
            .ok_or_else(|| ApiScannerError::Resolution {
                artifact: artifact.display().to_string(),
                reason: "cannot derive report file name".to_owned(),
            })?,
    };

    let file_name = if artifact.is_dir() {
        let mut dir_name = name.into_os_string();
        dir_name.push(".txt");
        PathBuf::from(dir_name)
    } else {
        name.with_extension("txt")
    };
    Ok(output_dir.join(file_name))
}

fn as_u64(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}

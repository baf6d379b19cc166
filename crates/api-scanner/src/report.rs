//! 리포트 모델과 작성기
//!
//! [`Report`]는 아티팩트 하나의 불변 라인 목록입니다.
//! [`ReportWriter`]는 라인마다 고정 접두사(`C: `, `M:  `, `F:  `)를 붙여 UTF-8로 씁니다.
//! 파일 출력은 형제 임시 파일에 쓴 뒤 대상 위치로 rename 하므로
//! 부분적으로 쓰인 파일이 관찰되지 않습니다.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::error::ApiScannerError;

/// 라인 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Type,
    Method,
    Field,
}

impl RecordKind {
    /// 라인 접두사
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Type => "C: ",
            Self::Method => "M:  ",
            Self::Field => "F:  ",
        }
    }
}

/// 리포트 한 줄
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportLine {
    /// 라인 종류
    pub kind: RecordKind,
    /// 접두사를 제외한 텍스트
    pub text: String,
}

impl ReportLine {
    pub fn new(kind: RecordKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.text)
    }
}

/// 아티팩트 하나의 API 리포트
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    artifact: String,
    lines: Vec<ReportLine>,
}

impl Report {
    /// 라인 목록으로 리포트를 만듭니다.
    pub fn new(artifact: impl Into<String>, lines: Vec<ReportLine>) -> Self {
        Self {
            artifact: artifact.into(),
            lines,
        }
    }

    /// 원본 아티팩트 경로
    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    /// 모든 라인
    pub fn lines(&self) -> &[ReportLine] {
        &self.lines
    }

    /// 타입 수
    pub fn type_count(&self) -> usize {
        self.count(RecordKind::Type)
    }

    /// 메서드와 필드 수
    pub fn member_count(&self) -> usize {
        self.lines.len() - self.type_count()
    }

    /// 빈 리포트 여부
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn count(&self, kind: RecordKind) -> usize {
        self.lines.iter().filter(|l| l.kind == kind).count()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// 리포트 작성기
pub struct ReportWriter;

impl ReportWriter {
    /// 리포트를 싱크에 씁니다. 라인마다 `\n`으로 끝납니다.
    ///
    /// 싱크 실패는 아티팩트 경로를 담은 `Write` 에러가 됩니다.
    pub fn write<W: Write>(report: &Report, sink: W) -> Result<(), ApiScannerError> {
        Self::write_lines(report, sink).map_err(|source| ApiScannerError::Write {
            path: report.artifact().to_owned(),
            source,
        })
    }

    fn write_lines<W: Write>(report: &Report, mut sink: W) -> std::io::Result<()> {
        for line in report.lines() {
            sink.write_all(line.kind.prefix().as_bytes())?;
            sink.write_all(line.text.as_bytes())?;
            sink.write_all(b"\n")?;
        }
        sink.flush()
    }

    /// 리포트로 대상 파일을 완전히 덮어씁니다.
    ///
    /// 같은 디렉토리의 임시 파일에 쓴 뒤 rename 합니다.
    /// 실패하면 임시 파일을 지우고 `Write` 에러를 반환합니다.
    pub fn write_to_path(report: &Report, path: &Path) -> Result<(), ApiScannerError> {
        let write_error = |source| ApiScannerError::Write {
            path: path.display().to_string(),
            source,
        };

        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "report".to_owned());
        let temp_path = parent.join(format!(".{file_name}.{}.tmp", uuid::Uuid::new_v4()));

        let result = File::create(&temp_path).and_then(|file| {
            let mut writer = BufWriter::new(file);
            Self::write_lines(report, &mut writer)?;
            writer.into_inner().map_err(|e| e.into_error())?.sync_all()?;
            std::fs::rename(&temp_path, path)
        });

        if let Err(e) = result {
            let _ = std::fs::remove_file(&temp_path);
            return Err(write_error(e));
        }

        debug!(path = %path.display(), lines = report.lines().len(), "report written");
        Ok(())
    }
}

//! 클래스 컨테이너 접근 -- JAR/ZIP 아카이브와 클래스 디렉토리
//!
//! [`ClassContainer`]는 아티팩트/의존성 위치 하나를 열고 `.class` 엔트리를
//! 발견 순서대로 나열하고 읽습니다.
//!
//! # 발견 순서
//!
//! - 아카이브: central directory 순서
//! - 디렉토리: 파일명 정렬 재귀 탐색
//!
//! `META-INF/` 아래 엔트리(멀티 릴리스 `META-INF/versions/` 포함),
//! `module-info.class`, `package-info.class`는 후보가 아닙니다.

use std::cell::RefCell;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;
use zip::ZipArchive;

use crate::error::ApiScannerError;

/// 컨테이너 안의 클래스 엔트리
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassEntry {
    /// `/` 구분 상대 경로 (`com/example/Foo.class`)
    pub name: String,
    /// 압축 해제 크기 (바이트)
    pub size: u64,
}

impl ClassEntry {
    /// 경로에서 유추한 이진 이름 (`com.example.Foo`)
    pub fn binary_name(&self) -> String {
        entry_binary_name(&self.name)
    }
}

/// 열린 클래스 컨테이너
///
/// 아카이브 리더는 내부 가변성을 가지므로 컨테이너는 `Sync`가 아닙니다.
/// 스캔마다 새로 열고 스캔 종료 시 drop 됩니다.
pub enum ClassContainer {
    /// JAR/ZIP 아카이브
    Archive {
        /// 아카이브 경로
        path: PathBuf,
        /// ZIP 리더
        archive: RefCell<ZipArchive<BufReader<File>>>,
    },
    /// 클래스 디렉토리
    Directory {
        /// 루트 디렉토리
        path: PathBuf,
    },
}

impl std::fmt::Debug for ClassContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Archive { path, .. } => f.debug_struct("Archive").field("path", path).finish(),
            Self::Directory { path } => f.debug_struct("Directory").field("path", path).finish(),
        }
    }
}

impl ClassContainer {
    /// 경로를 엽니다.
    ///
    /// 디렉토리는 클래스 디렉토리로, 일반 파일은 ZIP 아카이브로 엽니다.
    /// 경로가 없거나 읽을 수 없거나 손상된 아카이브이면 `Resolution` 에러입니다.
    pub fn open(path: &Path) -> Result<Self, ApiScannerError> {
        let metadata = std::fs::metadata(path).map_err(|e| resolution(path, e))?;

        if metadata.is_dir() {
            debug!(path = %path.display(), "opened class directory");
            return Ok(Self::Directory {
                path: path.to_path_buf(),
            });
        }

        if !metadata.is_file() {
            return Err(resolution(path, "not a regular file or directory"));
        }

        let file = File::open(path).map_err(|e| resolution(path, e))?;
        let archive = ZipArchive::new(BufReader::new(file)).map_err(|e| resolution(path, e))?;
        debug!(path = %path.display(), entries = archive.len(), "opened class archive");

        Ok(Self::Archive {
            path: path.to_path_buf(),
            archive: RefCell::new(archive),
        })
    }

    /// 컨테이너 경로
    pub fn path(&self) -> &Path {
        match self {
            Self::Archive { path, .. } | Self::Directory { path } => path,
        }
    }

    /// 아카이브 여부
    pub fn is_archive(&self) -> bool {
        matches!(self, Self::Archive { .. })
    }

    /// 후보 클래스 엔트리를 발견 순서대로 나열합니다.
    pub fn class_entries(&self) -> Result<Vec<ClassEntry>, ApiScannerError> {
        match self {
            Self::Archive { path, archive } => {
                let mut archive = archive.borrow_mut();
                let mut entries = Vec::new();
                for idx in 0..archive.len() {
                    let entry = archive.by_index(idx).map_err(|e| resolution(path, e))?;
                    if !entry.is_file() || !is_candidate(entry.name()) {
                        continue;
                    }
                    entries.push(ClassEntry {
                        name: entry.name().to_owned(),
                        size: entry.size(),
                    });
                }
                Ok(entries)
            }
            Self::Directory { path } => {
                let mut entries = Vec::new();
                for entry in WalkDir::new(path).sort_by_file_name() {
                    let entry = entry.map_err(|e| resolution(path, e))?;
                    if !entry.file_type().is_file() {
                        continue;
                    }
                    let Some(name) = relative_entry_name(path, entry.path()) else {
                        continue;
                    };
                    if !is_candidate(&name) {
                        continue;
                    }
                    let size = entry.metadata().map_err(|e| resolution(path, e))?.len();
                    entries.push(ClassEntry { name, size });
                }
                Ok(entries)
            }
        }
    }

    /// 이름으로 엔트리를 찾습니다 (의존성 지연 로딩용).
    pub fn contains(&self, name: &str) -> bool {
        match self {
            Self::Archive { archive, .. } => archive.borrow().index_for_name(name).is_some(),
            Self::Directory { path } => path.join(name).is_file(),
        }
    }

    /// 엔트리 바이트를 읽습니다.
    ///
    /// `max_size`보다 큰 엔트리는 `FileTooBig` 에러입니다.
    /// 압축 헤더의 크기를 믿지 않고 실제로 읽은 바이트 수도 확인합니다.
    pub fn read(&self, name: &str, max_size: usize) -> Result<Vec<u8>, ApiScannerError> {
        let limit = u64::try_from(max_size).unwrap_or(u64::MAX);
        let location = format!("{}!{}", self.path().display(), name);
        let too_big = |size: u64| ApiScannerError::FileTooBig {
            path: location.clone(),
            size,
            max: max_size,
        };
        let io_error = |source: std::io::Error| ApiScannerError::Io {
            path: location.clone(),
            source,
        };

        let bytes = match self {
            Self::Archive { path, archive } => {
                let mut archive = archive.borrow_mut();
                let mut entry = archive.by_name(name).map_err(|e| resolution(path, e))?;
                if entry.size() > limit {
                    return Err(too_big(entry.size()));
                }
                read_capped(&mut entry, limit).map_err(io_error)?
            }
            Self::Directory { path } => {
                let mut file = File::open(path.join(name)).map_err(io_error)?;
                let size = file.metadata().map_err(io_error)?.len();
                if size > limit {
                    return Err(too_big(size));
                }
                read_capped(&mut file, limit).map_err(io_error)?
            }
        };

        let actual = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        if actual > limit {
            return Err(too_big(actual));
        }

        Ok(bytes)
    }
}

/// 최대 `cap + 1` 바이트까지 읽습니다. 초과 여부는 호출자가 길이로 판단합니다.
fn read_capped(reader: &mut impl Read, cap: u64) -> std::io::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    reader
        .take(cap.saturating_add(1))
        .read_to_end(&mut buffer)?;
    Ok(buffer)
}

/// 리포트 후보 클래스 엔트리인지 확인합니다.
pub fn is_candidate(name: &str) -> bool {
    if !name.ends_with(".class") || name.starts_with("META-INF/") {
        return false;
    }
    let file_name = name.rsplit('/').next().unwrap_or(name);
    file_name != "module-info.class" && file_name != "package-info.class"
}

/// 엔트리 경로를 이진 이름으로 바꿉니다 (`com/example/Foo.class` -> `com.example.Foo`).
pub fn entry_binary_name(name: &str) -> String {
    name.strip_suffix(".class").unwrap_or(name).replace('/', ".")
}

/// 이진 이름을 엔트리 경로로 바꿉니다 (`com.example.Foo` -> `com/example/Foo.class`).
pub fn binary_name_to_entry(binary_name: &str) -> String {
    format!("{}.class", binary_name.replace('.', "/"))
}

fn relative_entry_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Option<Vec<&str>> = relative.components().map(|c| c.as_os_str().to_str()).collect();
    Some(parts?.join("/"))
}

fn resolution(path: &Path, reason: impl std::fmt::Display) -> ApiScannerError {
    ApiScannerError::Resolution {
        artifact: path.display().to_string(),
        reason: reason.to_string(),
    }
}

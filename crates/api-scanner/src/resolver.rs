//! 타입 유니버스 해석 -- 스캔마다 격리된 [`ResolutionContext`]
//!
//! 아티팩트는 해석 가능하면서 열거 대상이고, 의존성은 해석 전용입니다.
//! 아티팩트 엔트리는 열 때 모두 디코딩하고, 의존성 엔트리는 이름만 색인한 뒤
//! 필요할 때 디코딩합니다.
//!
//! # 우선순위
//!
//! - 아티팩트 정의가 같은 이름의 의존성 정의보다 우선합니다.
//! - 의존성끼리는 클래스패스 앞쪽 위치가 우선합니다.
//!
//! 컨텍스트는 내부 가변 상태(아카이브 리더, 로딩 캐시)를 가지므로 `Sync`가 아니며
//! 동시 스캔 사이에 공유될 수 없습니다.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::classfile::parse_class;
use crate::container::{ClassContainer, binary_name_to_entry};
use crate::error::ApiScannerError;
use crate::types::{ScanRequest, TypeDescriptor};

/// 상위 타입 검사를 생략하는 플랫폼 네임스페이스
pub const PLATFORM_PREFIXES: [&str; 4] = ["java.", "javax.", "jdk.", "sun."];

/// 플랫폼 타입인지 확인합니다.
pub fn is_platform_type(name: &str) -> bool {
    PLATFORM_PREFIXES.iter().any(|p| name.starts_with(p))
}

/// 아티팩트 엔트리 하나의 디코딩 결과
#[derive(Debug, Clone)]
pub enum Definition {
    /// 정상 디코딩된 타입
    Loaded(Arc<TypeDescriptor>),
    /// 클래스 파일로 디코딩할 수 없는 엔트리
    Unloadable {
        /// 엔트리 경로
        entry: String,
        /// 실패 사유
        reason: String,
    },
}

/// 이름 해석 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// 아티팩트에 정의됨
    Artifact,
    /// 의존성 위치에서 찾음
    Dependency {
        /// 의존성 위치
        location: PathBuf,
    },
}

/// 스캔 하나를 위한 격리된 타입 유니버스
#[derive(Debug)]
pub struct ResolutionContext {
    /// 아티팩트 경로 (에러/로그용)
    artifact: PathBuf,
    /// 아티팩트 엔트리 (발견 순서)
    definitions: Vec<Definition>,
    /// 이진 이름 -> `definitions` 인덱스
    by_name: HashMap<String, usize>,
    /// 의존성 컨테이너 (클래스패스 순서)
    dependencies: Vec<ClassContainer>,
    /// 지연 로딩 캐시
    loaded: RefCell<HashMap<String, Option<Arc<TypeDescriptor>>>>,
    /// 클래스 파일 최대 크기
    max_class_file_size: usize,
}

impl ResolutionContext {
    /// 스캔 요청에서 새 컨텍스트를 만듭니다.
    ///
    /// # Errors
    ///
    /// - 아티팩트를 열 수 없거나 유효한 컨테이너가 아님: `Resolution`
    /// - 아티팩트 엔트리가 크기 제한 초과: `FileTooBig`
    /// - 존재하는 의존성 위치를 열 수 없음: `Resolution`
    ///
    /// 존재하지 않는 의존성 위치는 debug 로그와 함께 건너뜁니다.
    pub fn resolve(
        request: &ScanRequest,
        max_class_file_size: usize,
    ) -> Result<Self, ApiScannerError> {
        let artifact = ClassContainer::open(&request.artifact)?;

        let mut definitions = Vec::new();
        let mut by_name = HashMap::new();
        for entry in artifact.class_entries()? {
            let bytes = artifact.read(&entry.name, max_class_file_size)?;
            let definition = match parse_class(&bytes)
                .and_then(|class| TypeDescriptor::from_class_file(&class))
            {
                Ok(ty) => ty,
                Err(e) => {
                    debug!(
                        artifact = %request.artifact.display(),
                        entry = %entry.name,
                        error = %e,
                        "unloadable class entry"
                    );
                    definitions.push(Definition::Unloadable {
                        entry: entry.name,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            if by_name.contains_key(&definition.name) {
                debug!(
                    artifact = %request.artifact.display(),
                    entry = %entry.name,
                    type_name = %definition.name,
                    "duplicate definition, keeping first"
                );
                continue;
            }
            by_name.insert(definition.name.clone(), definitions.len());
            definitions.push(Definition::Loaded(Arc::new(definition)));
        }

        let mut dependencies = Vec::with_capacity(request.classpath.len());
        for location in &request.classpath {
            if !location.exists() {
                debug!(
                    artifact = %request.artifact.display(),
                    dependency = %location.display(),
                    "dependency location does not exist, skipping"
                );
                continue;
            }
            dependencies.push(ClassContainer::open(location)?);
        }

        debug!(
            artifact = %request.artifact.display(),
            types = by_name.len(),
            dependencies = dependencies.len(),
            "resolution context ready"
        );

        Ok(Self {
            artifact: request.artifact.clone(),
            definitions,
            by_name,
            dependencies,
            loaded: RefCell::new(HashMap::new()),
            max_class_file_size,
        })
    }

    /// 아티팩트 경로
    pub fn artifact(&self) -> &Path {
        &self.artifact
    }

    /// 아티팩트 엔트리를 발견 순서대로 반환합니다.
    pub fn definitions(&self) -> &[Definition] {
        &self.definitions
    }

    /// 아티팩트에 정의된 타입을 찾습니다.
    pub fn artifact_type(&self, name: &str) -> Option<&TypeDescriptor> {
        self.shared_artifact_type(name).map(Arc::as_ref)
    }

    fn shared_artifact_type(&self, name: &str) -> Option<&Arc<TypeDescriptor>> {
        match self.definitions.get(*self.by_name.get(name)?) {
            Some(Definition::Loaded(ty)) => Some(ty),
            _ => None,
        }
    }

    /// 이름이 어디에 정의되어 있는지 찾습니다.
    pub fn resolve_name(&self, name: &str) -> Option<Resolution> {
        if self.by_name.contains_key(name) {
            return Some(Resolution::Artifact);
        }
        let entry = binary_name_to_entry(name);
        self.dependencies
            .iter()
            .find(|dep| dep.contains(&entry))
            .map(|dep| Resolution::Dependency {
                location: dep.path().to_path_buf(),
            })
    }

    /// 타입을 로드합니다. 의존성 타입은 처음 요청될 때 디코딩됩니다.
    ///
    /// 아티팩트 타입은 컨텍스트가 가진 정의를 공유합니다.
    ///
    /// 정의가 없거나 디코딩할 수 없으면 `Ok(None)`입니다.
    pub fn load(&self, name: &str) -> Result<Option<Arc<TypeDescriptor>>, ApiScannerError> {
        if let Some(ty) = self.shared_artifact_type(name) {
            return Ok(Some(Arc::clone(ty)));
        }
        if let Some(cached) = self.loaded.borrow().get(name) {
            return Ok(cached.clone());
        }

        let entry = binary_name_to_entry(name);
        let mut result = None;
        if let Some(dep) = self.dependencies.iter().find(|dep| dep.contains(&entry)) {
            let bytes = dep.read(&entry, self.max_class_file_size)?;
            match parse_class(&bytes).and_then(|class| TypeDescriptor::from_class_file(&class)) {
                Ok(ty) => {
                    trace!(type_name = name, dependency = %dep.path().display(), "loaded dependency type");
                    result = Some(Arc::new(ty));
                }
                Err(e) => {
                    debug!(
                        type_name = name,
                        dependency = %dep.path().display(),
                        error = %e,
                        "dependency type could not be decoded"
                    );
                }
            }
        }

        self.loaded
            .borrow_mut()
            .insert(name.to_owned(), result.clone());
        Ok(result)
    }

    /// 타입의 직접 상위 타입이 해석 가능한지 확인합니다.
    ///
    /// `strict`이면 플랫폼 네임스페이스 밖의 해석 불가 상위 타입이 `UnresolvedType`
    /// 에러가 되고, 아니면 debug 로그만 남깁니다.
    pub fn check_supertypes(
        &self,
        ty: &TypeDescriptor,
        strict: bool,
    ) -> Result<(), ApiScannerError> {
        for supertype in ty.supertypes() {
            if is_platform_type(supertype) || self.by_name.contains_key(supertype) {
                continue;
            }

            let resolved = match self.load(supertype) {
                Ok(found) => found.is_some(),
                Err(e) => {
                    debug!(type_name = supertype, error = %e, "failed to load supertype");
                    false
                }
            };
            if resolved {
                continue;
            }

            if strict {
                return Err(ApiScannerError::UnresolvedType {
                    artifact: self.artifact.display().to_string(),
                    type_name: supertype.to_owned(),
                    referenced_by: ty.name.clone(),
                });
            }
            debug!(
                artifact = %self.artifact.display(),
                type_name = supertype,
                referenced_by = %ty.name,
                "unresolved supertype"
            );
        }
        Ok(())
    }
}

//! 아티팩트 타입 열거
//!
//! 아티팩트에 물리적으로 정의된 타입을 발견 순서대로 나열하고,
//! 내부 네임스페이스 타입과 로딩 불가 엔트리를 조용히 제외합니다.

use tracing::{debug, trace};

use crate::resolver::{Definition, ResolutionContext};
use crate::types::TypeDescriptor;

/// 아티팩트 타입 열거기
#[derive(Debug, Clone)]
pub struct ArtifactWalker {
    internal_marker: String,
}

impl ArtifactWalker {
    /// 내부 패키지 표식으로 열거기를 만듭니다.
    pub fn new(internal_marker: impl Into<String>) -> Self {
        Self {
            internal_marker: internal_marker.into(),
        }
    }

    /// 리포트 대상 타입을 발견 순서대로 반환합니다.
    pub fn enumerate<'c>(&self, context: &'c ResolutionContext) -> Vec<&'c TypeDescriptor> {
        let mut types = Vec::new();
        for definition in context.definitions() {
            match definition {
                Definition::Loaded(ty) if self.is_internal(ty) => {
                    trace!(type_name = %ty.name, "excluding internal type");
                }
                Definition::Loaded(ty) => types.push(ty.as_ref()),
                Definition::Unloadable { entry, reason } => {
                    debug!(entry = %entry, reason = %reason, "skipping unloadable entry");
                }
            }
        }
        types
    }

    /// 타입의 패키지에 내부 표식 세그먼트가 있는지 확인합니다.
    pub fn is_internal(&self, ty: &TypeDescriptor) -> bool {
        is_internal_package(ty.package(), &self.internal_marker)
    }
}

/// 패키지 세그먼트 중 하나가 `marker`와 같은지 확인합니다.
pub fn is_internal_package(package: &str, marker: &str) -> bool {
    !package.is_empty() && package.split('.').any(|segment| segment == marker)
}

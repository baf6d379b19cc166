//! 멤버 가시성 필터
//!
//! public/protected 멤버만 남깁니다. private/package 멤버는 항상 제외되고,
//! synthetic/bridge 멤버는 설정에 따라 제외할 수 있습니다.

use crate::types::{FieldDescriptor, MethodDescriptor, TypeDescriptor};

/// 멤버 가시성 필터
#[derive(Debug, Clone, Copy)]
pub struct MemberFilter {
    include_synthetic: bool,
}

impl Default for MemberFilter {
    fn default() -> Self {
        Self {
            include_synthetic: true,
        }
    }
}

impl MemberFilter {
    /// 새 필터를 만듭니다.
    pub fn new(include_synthetic: bool) -> Self {
        Self { include_synthetic }
    }

    /// 내보낼 메서드와 필드를 선언 순서대로 반환합니다.
    pub fn filter_members<'t>(
        &self,
        ty: &'t TypeDescriptor,
    ) -> (Vec<&'t MethodDescriptor>, Vec<&'t FieldDescriptor>) {
        let methods = ty
            .methods
            .iter()
            .filter(|m| m.visibility().is_exported())
            .filter(|m| self.include_synthetic || !m.is_synthetic())
            .collect();
        let fields = ty
            .fields
            .iter()
            .filter(|f| f.visibility().is_exported())
            .filter(|f| self.include_synthetic || !f.is_synthetic())
            .collect();
        (methods, fields)
    }
}

//! 결정적 멤버 정렬
//!
//! 타입 하나 안에서 메서드 다음 필드 순으로, 각각 렌더링된 텍스트(바이트 순),
//! 멤버 이름, 원시 디스크립터 순으로 정렬합니다. 같은 텍스트는 한 번만 남깁니다.
//! 선언 순서는 결과에 영향을 주지 않습니다.

use crate::filter::MemberFilter;
use crate::render::{render_field, render_method, render_type_header};
use crate::report::{RecordKind, ReportLine};
use crate::types::TypeDescriptor;

/// 정렬 키를 가진 렌더링된 멤버
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RenderedMember {
    /// 렌더링된 텍스트 (1차 키)
    pub text: String,
    /// 멤버 이름 (2차 키)
    pub name: String,
    /// 원시 디스크립터 (3차 키)
    pub descriptor: String,
}

/// 멤버를 정렬하고 텍스트가 같은 항목을 제거합니다.
pub fn order_members(mut members: Vec<RenderedMember>) -> Vec<RenderedMember> {
    members.sort();
    members.dedup_by(|a, b| a.text == b.text);
    members
}

/// 타입 하나의 리포트 블록을 만듭니다 (헤더, 메서드, 필드).
pub fn type_block(ty: &TypeDescriptor, filter: &MemberFilter) -> Vec<ReportLine> {
    let (methods, fields) = filter.filter_members(ty);

    let methods = order_members(
        methods
            .into_iter()
            .map(|m| RenderedMember {
                text: render_method(ty.kind, m),
                name: m.name.clone(),
                descriptor: m.descriptor.clone(),
            })
            .collect(),
    );
    let fields = order_members(
        fields
            .into_iter()
            .map(|f| RenderedMember {
                text: render_field(f),
                name: f.name.clone(),
                descriptor: f.descriptor.clone(),
            })
            .collect(),
    );

    let mut lines = Vec::with_capacity(1 + methods.len() + fields.len());
    lines.push(ReportLine::new(RecordKind::Type, render_type_header(ty)));
    lines.extend(
        methods
            .into_iter()
            .map(|m| ReportLine::new(RecordKind::Method, m.text)),
    );
    lines.extend(
        fields
            .into_iter()
            .map(|f| ReportLine::new(RecordKind::Field, f.text)),
    );
    lines
}

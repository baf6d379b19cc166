//! 시그니처 렌더링 -- 타입/메서드/필드의 정규 텍스트
//!
//! # 형식
//!
//! ```text
//! final class com.example.Greeter extends com.example.Base
//! public <T extends java.lang.Comparable<T>> T max(java.util.Collection<? extends T>)
//! public com.example.Greeter(java.lang.String)
//! public static final java.util.Map<java.lang.String, int[]> TABLE
//! ```
//!
//! 헤더의 타입명은 소거된 이진 이름(`$` 중첩 유지)이고,
//! 멤버 시그니처는 제네릭 시그니처가 있으면 Java 소스 형식으로 씁니다.

use crate::classfile::AccessFlags;
use crate::classfile::signature::{ClassType, JavaType, TypeArg, TypeParam};
use crate::types::{ClassModifier, FieldDescriptor, MethodDescriptor, TypeDescriptor, TypeKind};

/// 타입 헤더를 렌더링합니다.
pub fn render_type_header(ty: &TypeDescriptor) -> String {
    match ty.kind {
        TypeKind::Annotation => format!("@interface {}", ty.name),
        TypeKind::Interface => {
            let mut out = format!("interface {}", ty.name);
            if !ty.interfaces.is_empty() {
                out.push_str(" extends ");
                out.push_str(&ty.interfaces.join(", "));
            }
            out
        }
        TypeKind::Class => {
            let prefix = match ty.modifier {
                ClassModifier::Abstract => "abstract class",
                ClassModifier::Final => "final class",
                ClassModifier::None => "class",
            };
            let mut out = format!("{prefix} {}", ty.name);
            if let Some(superclass) = ty
                .superclass
                .as_deref()
                .filter(|s| *s != "java.lang.Object")
            {
                out.push_str(" extends ");
                out.push_str(superclass);
            }
            out
        }
    }
}

/// 메서드를 렌더링합니다.
///
/// `owner`는 `default` 수정자 판단에 쓰입니다.
pub fn render_method(owner: TypeKind, method: &MethodDescriptor) -> String {
    let mut out = String::new();
    for modifier in method_modifiers(owner, method) {
        out.push_str(modifier);
        out.push(' ');
    }

    if !method.type_params.is_empty() {
        out.push_str(&render_type_params(&method.type_params));
        out.push(' ');
    }

    if method.is_constructor() {
        out.push_str(&method.declaring_type);
    } else {
        write_java_type(&mut out, &method.return_type);
        out.push(' ');
        out.push_str(&method.name);
    }

    out.push('(');
    let varargs = method.access.contains(AccessFlags::VARARGS);
    let last = method.params.len().saturating_sub(1);
    for (i, param) in method.params.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        match param {
            JavaType::Array(element) if varargs && i == last => {
                write_java_type(&mut out, element);
                out.push_str("...");
            }
            _ => write_java_type(&mut out, param),
        }
    }
    out.push(')');

    if !method.throws.is_empty() {
        out.push_str(" throws ");
        write_list(&mut out, &method.throws);
    }
    out
}

fn method_modifiers(owner: TypeKind, method: &MethodDescriptor) -> Vec<&'static str> {
    let flags = method.access;
    let mut modifiers = Vec::new();

    if flags.contains(AccessFlags::PUBLIC) {
        modifiers.push("public");
    } else if flags.contains(AccessFlags::PROTECTED) {
        modifiers.push("protected");
    } else if flags.contains(AccessFlags::PRIVATE) {
        modifiers.push("private");
    }

    let is_abstract = flags.contains(AccessFlags::ABSTRACT);
    let is_static = flags.contains(AccessFlags::STATIC);
    if is_abstract {
        modifiers.push("abstract");
    }
    if matches!(owner, TypeKind::Interface | TypeKind::Annotation)
        && flags.contains(AccessFlags::PUBLIC)
        && !is_abstract
        && !is_static
        && !method.is_constructor()
    {
        modifiers.push("default");
    }
    for (flag, keyword) in [
        (AccessFlags::STATIC, "static"),
        (AccessFlags::FINAL, "final"),
        (AccessFlags::SYNCHRONIZED, "synchronized"),
        (AccessFlags::NATIVE, "native"),
        (AccessFlags::STRICT, "strictfp"),
    ] {
        if flags.contains(flag) {
            modifiers.push(keyword);
        }
    }
    modifiers
}

/// 필드를 렌더링합니다.
pub fn render_field(field: &FieldDescriptor) -> String {
    let flags = field.access;
    let mut out = String::new();
    for (flag, keyword) in [
        (AccessFlags::PUBLIC, "public"),
        (AccessFlags::PROTECTED, "protected"),
        (AccessFlags::PRIVATE, "private"),
        (AccessFlags::STATIC, "static"),
        (AccessFlags::FINAL, "final"),
        (AccessFlags::TRANSIENT, "transient"),
        (AccessFlags::VOLATILE, "volatile"),
    ] {
        if flags.contains(flag) {
            out.push_str(keyword);
            out.push(' ');
        }
    }
    write_java_type(&mut out, &field.field_type);
    out.push(' ');
    out.push_str(&field.name);
    out
}

/// 타입 파라미터 목록을 렌더링합니다 (`<T, U extends java.lang.Number>`).
///
/// `java.lang.Object`만 있는 클래스 바운드는 생략합니다.
pub fn render_type_params(params: &[TypeParam]) -> String {
    let mut out = String::from("<");
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&param.name);
        let bounds: Vec<&JavaType> = param
            .class_bound
            .iter()
            .filter(|b| !b.is_object())
            .chain(param.interface_bounds.iter())
            .collect();
        for (j, bound) in bounds.iter().enumerate() {
            out.push_str(if j == 0 { " extends " } else { " & " });
            write_java_type(&mut out, bound);
        }
    }
    out.push('>');
    out
}

/// 타입을 Java 소스 형식으로 렌더링합니다.
pub fn render_java_type(ty: &JavaType) -> String {
    let mut out = String::new();
    write_java_type(&mut out, ty);
    out
}

fn write_java_type(out: &mut String, ty: &JavaType) {
    match ty {
        JavaType::Base(base) => out.push_str(base.keyword()),
        JavaType::TypeVar(name) => out.push_str(name),
        JavaType::Array(element) => {
            write_java_type(out, element);
            out.push_str("[]");
        }
        JavaType::Class(class) => write_class_type(out, class),
    }
}

fn write_class_type(out: &mut String, class: &ClassType) {
    for (i, segment) in class.segments.iter().enumerate() {
        if i > 0 {
            out.push('$');
        }
        out.push_str(&segment.name);
        if !segment.args.is_empty() {
            out.push('<');
            for (j, arg) in segment.args.iter().enumerate() {
                if j > 0 {
                    out.push_str(", ");
                }
                match arg {
                    TypeArg::Any => out.push('?'),
                    TypeArg::Extends(bound) => {
                        out.push_str("? extends ");
                        write_java_type(out, bound);
                    }
                    TypeArg::Super(bound) => {
                        out.push_str("? super ");
                        write_java_type(out, bound);
                    }
                    TypeArg::Exact(inner) => write_java_type(out, inner),
                }
            }
            out.push('>');
        }
    }
}

fn write_list(out: &mut String, types: &[JavaType]) {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_java_type(out, ty);
    }
}

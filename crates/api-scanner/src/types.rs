//! 도메인 타입 정의
//!
//! 스캔 요청([`ScanRequest`])과 클래스 파일에서 만들어지는 타입/멤버 서술자를 정의합니다.
//! 서술자는 생성 후 변경되지 않으며, 렌더링에 필요한 제네릭 정보를 모두 포함합니다.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::classfile::signature::{
    self, JavaType, MethodSignature, TypeParam, parse_field_descriptor, parse_method_descriptor,
};
use crate::classfile::{AccessFlags, ClassFile, ClassParseError, MemberInfo};

/// 아티팩트 하나에 대한 스캔 요청
///
/// 의존성은 타입 해석에만 쓰이며 열거 대상이 아닙니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRequest {
    /// 스캔 대상 아티팩트 (JAR/ZIP 또는 클래스 디렉토리)
    pub artifact: PathBuf,
    /// 의존성 위치 (클래스패스 순서)
    pub classpath: Vec<PathBuf>,
}

impl ScanRequest {
    /// 새 스캔 요청을 생성합니다.
    pub fn new(artifact: impl Into<PathBuf>, classpath: Vec<PathBuf>) -> Self {
        Self {
            artifact: artifact.into(),
            classpath,
        }
    }
}

/// 타입 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Class,
    Interface,
    Annotation,
}

/// 클래스 수정자 (상호 배타적)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassModifier {
    Abstract,
    Final,
    None,
}

/// 멤버 가시성
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Protected,
    Package,
    Private,
}

impl Visibility {
    /// 접근 플래그에서 가시성을 계산합니다.
    pub fn from_flags(flags: AccessFlags) -> Self {
        if flags.contains(AccessFlags::PUBLIC) {
            Self::Public
        } else if flags.contains(AccessFlags::PROTECTED) {
            Self::Protected
        } else if flags.contains(AccessFlags::PRIVATE) {
            Self::Private
        } else {
            Self::Package
        }
    }

    /// 아티팩트 외부에서 보이는지 여부
    pub fn is_exported(self) -> bool {
        matches!(self, Self::Public | Self::Protected)
    }
}

/// 아티팩트에 정의된 타입
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    /// 이진 이름 (`com.example.Outer$Inner`)
    pub name: String,
    /// 타입 종류
    pub kind: TypeKind,
    /// 클래스 수정자 (인터페이스는 항상 `None`)
    pub modifier: ClassModifier,
    /// 클래스 접근 플래그
    pub access: AccessFlags,
    /// 클래스 타입 파라미터 (시그니처가 없으면 비어있음)
    pub type_params: Vec<TypeParam>,
    /// 직접 상위 클래스 (인터페이스와 `java.lang.Object`는 `None`)
    pub superclass: Option<String>,
    /// 직접 상위 인터페이스 (클래스 파일 순서)
    pub interfaces: Vec<String>,
    /// 선언된 메서드
    pub methods: Vec<MethodDescriptor>,
    /// 선언된 필드
    pub fields: Vec<FieldDescriptor>,
}

impl TypeDescriptor {
    /// 디코딩된 클래스 파일에서 서술자를 만듭니다.
    ///
    /// 멤버 디스크립터가 잘못되었으면 타입 전체가 로딩 불가입니다.
    /// 제네릭 시그니처 오류는 디스크립터로 대체되므로 실패 원인이 아닙니다.
    pub fn from_class_file(class: &ClassFile) -> Result<Self, ClassParseError> {
        let name = internal_to_binary(&class.this_class);
        let flags = class.access_flags;

        let kind = if flags.contains(AccessFlags::ANNOTATION) {
            TypeKind::Annotation
        } else if flags.contains(AccessFlags::INTERFACE) {
            TypeKind::Interface
        } else {
            TypeKind::Class
        };

        let modifier = match kind {
            TypeKind::Class if flags.contains(AccessFlags::ABSTRACT) => ClassModifier::Abstract,
            TypeKind::Class if flags.contains(AccessFlags::FINAL) => ClassModifier::Final,
            _ => ClassModifier::None,
        };

        let superclass = match kind {
            TypeKind::Class => class.super_class.as_deref().map(internal_to_binary),
            _ => None,
        };

        let type_params = match class.signature.as_deref() {
            Some(sig) => match signature::parse_class_signature(sig) {
                Ok(parsed) => parsed.type_params,
                Err(e) => {
                    trace!(class = %name, error = %e, "ignoring malformed class signature");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        let methods = class
            .methods
            .iter()
            .map(|m| MethodDescriptor::from_member(&name, m))
            .collect::<Result<Vec<_>, _>>()?;
        let fields = class
            .fields
            .iter()
            .map(|f| FieldDescriptor::from_member(&name, f))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            interfaces: class
                .interfaces
                .iter()
                .map(String::as_str)
                .map(internal_to_binary)
                .collect(),
            name,
            kind,
            modifier,
            access: flags,
            type_params,
            superclass,
            methods,
            fields,
        })
    }

    /// 패키지명 (기본 패키지는 빈 문자열)
    pub fn package(&self) -> &str {
        self.name.rsplit_once('.').map_or("", |(pkg, _)| pkg)
    }

    /// 직접 상위 타입 (상위 클래스, 인터페이스 순)
    pub fn supertypes(&self) -> impl Iterator<Item = &str> {
        self.superclass
            .iter()
            .chain(self.interfaces.iter())
            .map(String::as_str)
    }
}

/// 선언된 메서드
#[derive(Debug, Clone)]
pub struct MethodDescriptor {
    /// 선언 타입의 이진 이름
    pub declaring_type: String,
    /// 접근 플래그
    pub access: AccessFlags,
    /// 메서드 이름 (`<init>` 포함)
    pub name: String,
    /// 원시 디스크립터
    pub descriptor: String,
    /// 타입 파라미터
    pub type_params: Vec<TypeParam>,
    /// 파라미터 타입
    pub params: Vec<JavaType>,
    /// 반환 타입
    pub return_type: JavaType,
    /// 선언된 예외
    pub throws: Vec<JavaType>,
}

impl MethodDescriptor {
    /// 멤버 정보에서 메서드 서술자를 만듭니다.
    ///
    /// 제네릭 시그니처가 없거나 잘못되었거나 파라미터 수가 디스크립터와 다르면
    /// (컴파일러가 추가한 outer 인스턴스 / enum 파라미터) 디스크립터를 사용합니다.
    pub fn from_member(declaring_type: &str, member: &MemberInfo) -> Result<Self, ClassParseError> {
        let erased = parse_method_descriptor(&member.descriptor)?;
        let generic = member
            .signature
            .as_deref()
            .and_then(|sig| match signature::parse_method_signature(sig) {
                Ok(parsed) if parsed.params.len() == erased.params.len() => Some(parsed),
                Ok(_) => {
                    trace!(
                        class = declaring_type,
                        method = %member.name,
                        "signature parameter count differs from descriptor, using descriptor"
                    );
                    None
                }
                Err(e) => {
                    trace!(
                        class = declaring_type,
                        method = %member.name,
                        error = %e,
                        "ignoring malformed method signature"
                    );
                    None
                }
            });

        let MethodSignature {
            type_params,
            params,
            return_type,
            throws,
        } = generic.unwrap_or(erased);

        let throws = if throws.is_empty() {
            member
                .exceptions
                .iter()
                .map(String::as_str)
                .map(JavaType::from_internal_name)
                .collect()
        } else {
            throws
        };

        Ok(Self {
            declaring_type: declaring_type.to_owned(),
            access: member.access_flags,
            name: member.name.clone(),
            descriptor: member.descriptor.clone(),
            type_params,
            params,
            return_type,
            throws,
        })
    }

    /// 가시성
    pub fn visibility(&self) -> Visibility {
        Visibility::from_flags(self.access)
    }

    /// 생성자 여부
    pub fn is_constructor(&self) -> bool {
        self.name == "<init>"
    }

    /// synthetic 또는 bridge 메서드 여부
    pub fn is_synthetic(&self) -> bool {
        self.access.contains(AccessFlags::SYNTHETIC) || self.access.contains(AccessFlags::BRIDGE)
    }
}

/// 선언된 필드
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// 선언 타입의 이진 이름
    pub declaring_type: String,
    /// 접근 플래그
    pub access: AccessFlags,
    /// 필드 이름
    pub name: String,
    /// 원시 디스크립터
    pub descriptor: String,
    /// 값 타입 (제네릭 시그니처 우선)
    pub field_type: JavaType,
}

impl FieldDescriptor {
    /// 멤버 정보에서 필드 서술자를 만듭니다.
    pub fn from_member(declaring_type: &str, member: &MemberInfo) -> Result<Self, ClassParseError> {
        let erased = parse_field_descriptor(&member.descriptor)?;
        let field_type = member
            .signature
            .as_deref()
            .and_then(|sig| signature::parse_field_signature(sig).ok())
            .unwrap_or(erased);

        Ok(Self {
            declaring_type: declaring_type.to_owned(),
            access: member.access_flags,
            name: member.name.clone(),
            descriptor: member.descriptor.clone(),
            field_type,
        })
    }

    /// 가시성
    pub fn visibility(&self) -> Visibility {
        Visibility::from_flags(self.access)
    }

    /// synthetic 필드 여부 (`this$0` 등)
    pub fn is_synthetic(&self) -> bool {
        self.access.contains(AccessFlags::SYNTHETIC)
    }
}

/// 내부 이름(`com/example/Foo`)을 이진 이름(`com.example.Foo`)으로 바꿉니다.
pub fn internal_to_binary(internal: &str) -> String {
    internal.replace('/', ".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classfile::signature::BaseType;

    fn member(flags: u16, name: &str, descriptor: &str, signature: Option<&str>) -> MemberInfo {
        MemberInfo {
            access_flags: AccessFlags::new(flags),
            name: name.to_owned(),
            descriptor: descriptor.to_owned(),
            signature: signature.map(str::to_owned),
            exceptions: Vec::new(),
        }
    }

    fn class_file(flags: u16, name: &str) -> ClassFile {
        ClassFile {
            minor_version: 0,
            major_version: 61,
            access_flags: AccessFlags::new(flags),
            this_class: name.to_owned(),
            super_class: Some("java/lang/Object".to_owned()),
            interfaces: Vec::new(),
            signature: None,
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    #[test]
    fn visibility_from_flags() {
        assert_eq!(Visibility::from_flags(AccessFlags::new(0x0001)), Visibility::Public);
        assert_eq!(Visibility::from_flags(AccessFlags::new(0x0004)), Visibility::Protected);
        assert_eq!(Visibility::from_flags(AccessFlags::new(0x0002)), Visibility::Private);
        assert_eq!(Visibility::from_flags(AccessFlags::new(0x0008)), Visibility::Package);
        assert!(Visibility::Protected.is_exported());
        assert!(!Visibility::Package.is_exported());
    }

    #[test]
    fn kind_and_modifier_from_flags() {
        let annotation = TypeDescriptor::from_class_file(&class_file(0x2601, "a/Ann")).unwrap();
        assert_eq!(annotation.kind, TypeKind::Annotation);
        assert_eq!(annotation.modifier, ClassModifier::None);
        assert!(annotation.superclass.is_none());

        let iface = TypeDescriptor::from_class_file(&class_file(0x0601, "a/Shape")).unwrap();
        assert_eq!(iface.kind, TypeKind::Interface);
        assert!(iface.superclass.is_none());

        let abstract_class =
            TypeDescriptor::from_class_file(&class_file(0x0421, "a/Base")).unwrap();
        assert_eq!(abstract_class.modifier, ClassModifier::Abstract);
        assert_eq!(abstract_class.superclass.as_deref(), Some("java.lang.Object"));

        let final_class = TypeDescriptor::from_class_file(&class_file(0x0031, "a/Leaf")).unwrap();
        assert_eq!(final_class.modifier, ClassModifier::Final);
    }

    #[test]
    fn package_of_nested_and_default_package_types() {
        let nested =
            TypeDescriptor::from_class_file(&class_file(0x0021, "com/example/Outer$Inner"))
                .unwrap();
        assert_eq!(nested.name, "com.example.Outer$Inner");
        assert_eq!(nested.package(), "com.example");

        let top = TypeDescriptor::from_class_file(&class_file(0x0021, "Top")).unwrap();
        assert_eq!(top.package(), "");
    }

    #[test]
    fn method_prefers_generic_signature() {
        let m = member(
            0x0001,
            "first",
            "(Ljava/util/List;)Ljava/lang/Object;",
            Some("<T:Ljava/lang/Object;>(Ljava/util/List<TT;>;)TT;"),
        );
        let method = MethodDescriptor::from_member("a.B", &m).unwrap();
        assert_eq!(method.type_params.len(), 1);
        assert_eq!(method.return_type, JavaType::TypeVar("T".to_owned()));
    }

    #[test]
    fn method_falls_back_on_parameter_count_mismatch() {
        // inner class constructor: descriptor has the synthetic outer parameter
        let m = member(
            0x0001,
            "<init>",
            "(Lcom/a/Outer;Ljava/util/List;)V",
            Some("(Ljava/util/List<Ljava/lang/String;>;)V"),
        );
        let method = MethodDescriptor::from_member("com.a.Outer$Inner", &m).unwrap();
        assert_eq!(method.params.len(), 2);
        assert_eq!(method.params[1], JavaType::class("java.util.List"));
        assert!(method.is_constructor());
    }

    #[test]
    fn method_falls_back_on_malformed_signature() {
        let m = member(0x0001, "size", "()I", Some("()garbage"));
        let method = MethodDescriptor::from_member("a.B", &m).unwrap();
        assert_eq!(method.return_type, JavaType::Base(BaseType::Int));
    }

    #[test]
    fn method_with_bad_descriptor_is_error() {
        let m = member(0x0001, "broken", "(Q)V", None);
        assert!(MethodDescriptor::from_member("a.B", &m).is_err());
    }

    #[test]
    fn throws_come_from_exceptions_attribute_without_signature_throws() {
        let mut m = member(0x0001, "read", "()I", Some("()I"));
        m.exceptions = vec!["java/io/IOException".to_owned()];
        let method = MethodDescriptor::from_member("a.B", &m).unwrap();
        assert_eq!(method.throws, vec![JavaType::class("java.io.IOException")]);
    }

    #[test]
    fn bridge_and_synthetic_methods_are_flagged() {
        let bridge = MethodDescriptor::from_member("a.B", &member(0x1041, "get", "()Ljava/lang/Object;", None)).unwrap();
        assert!(bridge.is_synthetic());
        let plain = MethodDescriptor::from_member("a.B", &member(0x0001, "get", "()I", None)).unwrap();
        assert!(!plain.is_synthetic());
    }

    #[test]
    fn field_prefers_signature() {
        let f = member(
            0x0001,
            "items",
            "Ljava/util/List;",
            Some("Ljava/util/List<Ljava/lang/String;>;"),
        );
        let field = FieldDescriptor::from_member("a.B", &f).unwrap();
        assert_ne!(field.field_type, JavaType::class("java.util.List"));
        assert_eq!(field.visibility(), Visibility::Public);
    }

    #[test]
    fn supertypes_lists_superclass_then_interfaces() {
        let mut class = class_file(0x0021, "a/Impl");
        class.super_class = Some("a/Base".to_owned());
        class.interfaces = vec!["a/Second".to_owned(), "a/First".to_owned()];
        let ty = TypeDescriptor::from_class_file(&class).unwrap();
        let supers: Vec<&str> = ty.supertypes().collect();
        assert_eq!(supers, vec!["a.Base", "a.Second", "a.First"]);
    }
}

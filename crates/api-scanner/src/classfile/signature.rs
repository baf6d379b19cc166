//! 디스크립터 및 제네릭 시그니처 파싱 (JVMS 4.3, 4.7.9.1)
//!
//! 디스크립터(`(Ljava/lang/String;I)V`)와 `Signature` 속성
//! (`<T:Ljava/lang/Object;>(TT;)Ljava/util/List<TT;>;`)을 같은 커서로 파싱하여
//! [`JavaType`] 모델을 만듭니다. 디스크립터 모드에서는 타입 변수와 타입 인자를 허용하지 않습니다.

use super::ClassParseError;

/// 배열 차원 상한 (JVMS 4.3.2)
pub const MAX_ARRAY_DIMENSIONS: usize = 255;

/// 타입 인자 중첩 상한
pub const MAX_TYPE_ARG_NESTING: usize = 64;

/// 에러 메시지에 담는 원문 길이
const ERROR_CONTEXT_CHARS: usize = 120;

/// 기본 타입 (`void` 포함)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
    Void,
}

impl BaseType {
    /// Java 소스 키워드를 반환합니다.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Byte => "byte",
            Self::Char => "char",
            Self::Double => "double",
            Self::Float => "float",
            Self::Int => "int",
            Self::Long => "long",
            Self::Short => "short",
            Self::Boolean => "boolean",
            Self::Void => "void",
        }
    }

    fn from_tag(tag: u8) -> Option<Self> {
        Some(match tag {
            b'B' => Self::Byte,
            b'C' => Self::Char,
            b'D' => Self::Double,
            b'F' => Self::Float,
            b'I' => Self::Int,
            b'J' => Self::Long,
            b'S' => Self::Short,
            b'Z' => Self::Boolean,
            _ => return None,
        })
    }
}

/// JVM 타입 모델
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JavaType {
    /// 기본 타입 또는 `void`
    Base(BaseType),
    /// 클래스 타입
    Class(ClassType),
    /// 타입 변수 (`T`)
    TypeVar(String),
    /// 배열
    Array(Box<JavaType>),
}

impl JavaType {
    /// 타입 인자가 없는 클래스 타입을 만듭니다 (이진 이름 사용).
    pub fn class(binary_name: impl Into<String>) -> Self {
        Self::Class(ClassType {
            segments: vec![ClassSegment {
                name: binary_name.into(),
                args: Vec::new(),
            }],
        })
    }

    /// 내부 이름(`java/lang/String`)에서 클래스 타입을 만듭니다.
    pub fn from_internal_name(internal: &str) -> Self {
        Self::class(internal.replace('/', "."))
    }

    /// 클래스 타입이면 소거된 이진 이름을 반환합니다.
    pub fn erased_class_name(&self) -> Option<String> {
        match self {
            Self::Class(class) => Some(class.erased_name()),
            _ => None,
        }
    }

    /// `java.lang.Object`인지 확인합니다.
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Class(c) if c.segments.len() == 1 && c.segments[0].name == "java.lang.Object")
    }
}

/// 클래스 타입
///
/// 중첩 제네릭 클래스(`Outer<T>.Inner<U>`)는 세그먼트마다 타입 인자를 가집니다.
/// 첫 세그먼트 이름은 패키지를 포함한 이진 이름입니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassType {
    /// 이름 세그먼트
    pub segments: Vec<ClassSegment>,
}

impl ClassType {
    /// 세그먼트를 `$`로 이은 소거된 이진 이름
    pub fn erased_name(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join("$")
    }
}

/// 클래스 타입의 한 세그먼트
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassSegment {
    /// 세그먼트 이름
    pub name: String,
    /// 타입 인자
    pub args: Vec<TypeArg>,
}

/// 타입 인자
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeArg {
    /// `?`
    Any,
    /// `? extends T`
    Extends(JavaType),
    /// `? super T`
    Super(JavaType),
    /// `T`
    Exact(JavaType),
}

/// 타입 파라미터 선언 (`U extends Number & Comparable<U>`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeParam {
    /// 파라미터 이름
    pub name: String,
    /// 클래스 바운드 (인터페이스 바운드만 있으면 `None`)
    pub class_bound: Option<JavaType>,
    /// 인터페이스 바운드
    pub interface_bounds: Vec<JavaType>,
}

/// 메서드 디스크립터/시그니처
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub type_params: Vec<TypeParam>,
    pub params: Vec<JavaType>,
    pub return_type: JavaType,
    pub throws: Vec<JavaType>,
}

/// 클래스 시그니처
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSignature {
    pub type_params: Vec<TypeParam>,
    pub superclass: JavaType,
    pub interfaces: Vec<JavaType>,
}

/// 필드 디스크립터를 파싱합니다 (`[Ljava/lang/String;`).
pub fn parse_field_descriptor(descriptor: &str) -> Result<JavaType, ClassParseError> {
    let mut cursor = Cursor::new(descriptor, Mode::Descriptor);
    let ty = cursor.parse_value_type()?;
    cursor.finish()?;
    Ok(ty)
}

/// 메서드 디스크립터를 파싱합니다 (`(ILjava/lang/String;)V`).
pub fn parse_method_descriptor(descriptor: &str) -> Result<MethodSignature, ClassParseError> {
    let mut cursor = Cursor::new(descriptor, Mode::Descriptor);
    let sig = cursor.parse_method()?;
    cursor.finish()?;
    Ok(sig)
}

/// 필드 시그니처를 파싱합니다 (`Ljava/util/List<TT;>;`).
pub fn parse_field_signature(signature: &str) -> Result<JavaType, ClassParseError> {
    let mut cursor = Cursor::new(signature, Mode::Signature);
    let ty = cursor.parse_value_type()?;
    cursor.finish()?;
    Ok(ty)
}

/// 메서드 시그니처를 파싱합니다.
pub fn parse_method_signature(signature: &str) -> Result<MethodSignature, ClassParseError> {
    let mut cursor = Cursor::new(signature, Mode::Signature);
    let sig = cursor.parse_method()?;
    cursor.finish()?;
    Ok(sig)
}

/// 클래스 시그니처를 파싱합니다.
pub fn parse_class_signature(signature: &str) -> Result<ClassSignature, ClassParseError> {
    let mut cursor = Cursor::new(signature, Mode::Signature);
    let type_params = cursor.parse_type_params()?;
    let superclass = cursor.parse_class_type()?;
    let mut interfaces = Vec::new();
    while !cursor.at_end() {
        interfaces.push(cursor.parse_class_type()?);
    }
    Ok(ClassSignature {
        type_params,
        superclass,
        interfaces,
    })
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Descriptor,
    Signature,
}

struct Cursor<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    mode: Mode,
    /// 현재 경로의 배열 차원 합
    dimensions: usize,
    /// 현재 경로의 타입 인자 중첩 깊이
    nesting: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str, mode: Mode) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            mode,
            dimensions: 0,
            nesting: 0,
        }
    }

    fn error(&self, what: &str) -> ClassParseError {
        let shown: String = self.src.chars().take(ERROR_CONTEXT_CHARS).collect();
        let ellipsis = if shown.len() < self.src.len() { "..." } else { "" };
        let msg = format!("{what} at offset {} in '{shown}{ellipsis}'", self.pos);
        match self.mode {
            Mode::Descriptor => ClassParseError::InvalidDescriptor(msg),
            Mode::Signature => ClassParseError::InvalidSignature(msg),
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn expect(&mut self, byte: u8) -> Result<(), ClassParseError> {
        if self.peek() != Some(byte) {
            return Err(self.error(&format!("expected '{}'", byte as char)));
        }
        self.pos += 1;
        Ok(())
    }

    fn finish(&self) -> Result<(), ClassParseError> {
        if self.at_end() {
            Ok(())
        } else {
            Err(self.error("trailing characters"))
        }
    }

    fn parse_method(&mut self) -> Result<MethodSignature, ClassParseError> {
        let type_params = self.parse_type_params()?;
        self.expect(b'(')?;
        let mut params = Vec::new();
        while self.peek() != Some(b')') {
            if self.at_end() {
                return Err(self.error("unterminated parameter list"));
            }
            params.push(self.parse_value_type()?);
        }
        self.expect(b')')?;
        let return_type = if self.peek() == Some(b'V') {
            self.pos += 1;
            JavaType::Base(BaseType::Void)
        } else {
            self.parse_value_type()?
        };

        let mut throws = Vec::new();
        while self.peek() == Some(b'^') {
            if self.mode == Mode::Descriptor {
                return Err(self.error("throws clause in descriptor"));
            }
            self.pos += 1;
            throws.push(self.parse_reference_type()?);
        }

        Ok(MethodSignature {
            type_params,
            params,
            return_type,
            throws,
        })
    }

    fn parse_type_params(&mut self) -> Result<Vec<TypeParam>, ClassParseError> {
        if self.peek() != Some(b'<') {
            return Ok(Vec::new());
        }
        if self.mode == Mode::Descriptor {
            return Err(self.error("type parameters in descriptor"));
        }
        self.pos += 1;
        let mut params = Vec::new();
        while self.peek() != Some(b'>') {
            let name = self.identifier(b':')?.to_owned();
            self.expect(b':')?;
            let class_bound = match self.peek() {
                Some(b'L' | b'T' | b'[') => Some(self.parse_reference_type()?),
                _ => None,
            };
            let mut interface_bounds = Vec::new();
            while self.peek() == Some(b':') {
                self.pos += 1;
                interface_bounds.push(self.parse_reference_type()?);
            }
            params.push(TypeParam {
                name,
                class_bound,
                interface_bounds,
            });
        }
        self.expect(b'>')?;
        if params.is_empty() {
            return Err(self.error("empty type parameter list"));
        }
        Ok(params)
    }

    /// 기본 타입 또는 참조 타입
    fn parse_value_type(&mut self) -> Result<JavaType, ClassParseError> {
        let tag = self.peek().ok_or_else(|| self.error("unexpected end"))?;
        if let Some(base) = BaseType::from_tag(tag) {
            self.pos += 1;
            return Ok(JavaType::Base(base));
        }
        self.parse_reference_type()
    }

    fn parse_reference_type(&mut self) -> Result<JavaType, ClassParseError> {
        match self.peek() {
            Some(b'L') => self.parse_class_type(),
            Some(b'[') => {
                let mut dims = 0;
                while self.peek() == Some(b'[') {
                    self.pos += 1;
                    dims += 1;
                }
                if self.dimensions + dims > MAX_ARRAY_DIMENSIONS {
                    return Err(self.error("too many array dimensions"));
                }
                self.dimensions += dims;
                let element = self.parse_value_type();
                self.dimensions -= dims;
                let mut ty = element?;
                for _ in 0..dims {
                    ty = JavaType::Array(Box::new(ty));
                }
                Ok(ty)
            }
            Some(b'T') if self.mode == Mode::Signature => {
                self.pos += 1;
                let name = self.identifier(b';')?.to_owned();
                self.expect(b';')?;
                Ok(JavaType::TypeVar(name))
            }
            _ => Err(self.error("expected reference type")),
        }
    }

    fn parse_class_type(&mut self) -> Result<JavaType, ClassParseError> {
        self.expect(b'L')?;
        let mut segments = Vec::new();
        loop {
            let start = self.pos;
            while let Some(b) = self.peek() {
                match b {
                    b';' | b'<' | b'.' => break,
                    b'[' | b'>' | b':' => return Err(self.error("illegal character in class name")),
                    _ => self.pos += 1,
                }
            }
            if self.pos == start {
                return Err(self.error("empty class name"));
            }
            let raw = &self.src[start..self.pos];
            let name = if segments.is_empty() {
                raw.replace('/', ".")
            } else if raw.contains('/') {
                return Err(self.error("package separator in inner class name"));
            } else {
                raw.to_owned()
            };

            let args = if self.peek() == Some(b'<') {
                if self.mode == Mode::Descriptor {
                    return Err(self.error("type arguments in descriptor"));
                }
                self.parse_type_args()?
            } else {
                Vec::new()
            };
            segments.push(ClassSegment { name, args });

            match self.peek() {
                Some(b';') => {
                    self.pos += 1;
                    break;
                }
                Some(b'.') if self.mode == Mode::Signature => self.pos += 1,
                _ => return Err(self.error("unterminated class type")),
            }
        }
        Ok(JavaType::Class(ClassType { segments }))
    }

    fn parse_type_args(&mut self) -> Result<Vec<TypeArg>, ClassParseError> {
        if self.nesting >= MAX_TYPE_ARG_NESTING {
            return Err(self.error("nesting too deep"));
        }
        self.nesting += 1;
        let args = self.parse_type_arg_list();
        self.nesting -= 1;
        args
    }

    fn parse_type_arg_list(&mut self) -> Result<Vec<TypeArg>, ClassParseError> {
        self.expect(b'<')?;
        let mut args = Vec::new();
        while self.peek() != Some(b'>') {
            let arg = match self.peek() {
                Some(b'*') => {
                    self.pos += 1;
                    TypeArg::Any
                }
                Some(b'+') => {
                    self.pos += 1;
                    TypeArg::Extends(self.parse_reference_type()?)
                }
                Some(b'-') => {
                    self.pos += 1;
                    TypeArg::Super(self.parse_reference_type()?)
                }
                _ => TypeArg::Exact(self.parse_reference_type()?),
            };
            args.push(arg);
        }
        self.expect(b'>')?;
        if args.is_empty() {
            return Err(self.error("empty type argument list"));
        }
        Ok(args)
    }

    /// `stop` 또는 구분 문자 전까지의 식별자
    fn identifier(&mut self, stop: u8) -> Result<&'a str, ClassParseError> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b == stop {
                break;
            }
            if matches!(b, b'.' | b';' | b'[' | b'/' | b'<' | b'>' | b':') {
                return Err(self.error("illegal character in identifier"));
            }
            self.pos += 1;
        }
        if self.pos == start || self.at_end() {
            return Err(self.error("malformed identifier"));
        }
        Ok(&self.src[start..self.pos])
    }
}

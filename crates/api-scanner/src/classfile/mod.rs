//! 클래스 파일 디코딩
//!
//! JVM 클래스 파일에서 공개 API 추출에 필요한 구조만 읽습니다:
//! 상수 풀, 접근 플래그, this/super 클래스, 인터페이스,
//! 필드/메서드와 그 `Signature`/`Exceptions` 속성, 클래스 `Signature` 속성.
//! 메서드 본문(`Code`)은 디코딩하지 않고 건너뜁니다.

pub mod signature;

use std::fmt;

/// 클래스 파일 디코딩 에러
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassParseError {
    /// 입력이 예상보다 짧음
    #[error("unexpected end of class file")]
    UnexpectedEof,

    /// 0xCAFEBABE 매직 불일치
    #[error("invalid class file magic header")]
    InvalidMagic,

    /// 알 수 없는 상수 풀 태그
    #[error("unsupported constant pool tag {tag}")]
    UnsupportedConstant { tag: u8 },

    /// 잘못된 상수 풀 인덱스 또는 타입 불일치
    #[error("invalid constant pool index {index}")]
    InvalidConstantIndex { index: u16 },

    /// modified UTF-8 디코딩 실패
    #[error("invalid modified UTF-8 in constant pool")]
    InvalidUtf8,

    /// 잘못된 디스크립터
    #[error("malformed descriptor: {0}")]
    InvalidDescriptor(String),

    /// 잘못된 제네릭 시그니처
    #[error("malformed signature: {0}")]
    InvalidSignature(String),
}

/// 클래스/멤버 접근 플래그
///
/// 같은 비트가 위치에 따라 다른 의미를 가집니다
/// (`ACC_VOLATILE`/`ACC_BRIDGE`, `ACC_TRANSIENT`/`ACC_VARARGS`,
/// `ACC_SYNCHRONIZED`/`ACC_SUPER`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AccessFlags(u16);

impl AccessFlags {
    pub const PUBLIC: u16 = 0x0001;
    pub const PRIVATE: u16 = 0x0002;
    pub const PROTECTED: u16 = 0x0004;
    pub const STATIC: u16 = 0x0008;
    pub const FINAL: u16 = 0x0010;
    pub const SYNCHRONIZED: u16 = 0x0020;
    pub const VOLATILE: u16 = 0x0040;
    pub const BRIDGE: u16 = 0x0040;
    pub const TRANSIENT: u16 = 0x0080;
    pub const VARARGS: u16 = 0x0080;
    pub const NATIVE: u16 = 0x0100;
    pub const INTERFACE: u16 = 0x0200;
    pub const ABSTRACT: u16 = 0x0400;
    pub const STRICT: u16 = 0x0800;
    pub const SYNTHETIC: u16 = 0x1000;
    pub const ANNOTATION: u16 = 0x2000;
    pub const ENUM: u16 = 0x4000;

    /// 원시 비트에서 생성합니다.
    pub const fn new(bits: u16) -> Self {
        Self(bits)
    }

    /// 원시 비트를 반환합니다.
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// 주어진 플래그가 모두 설정되어 있는지 확인합니다.
    pub const fn contains(self, flag: u16) -> bool {
        self.0 & flag == flag
    }
}

impl fmt::Debug for AccessFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessFlags({:#06x})", self.0)
    }
}

/// 디코딩된 클래스 파일
///
/// 클래스명은 내부 형식(`com/example/Outer$Inner`) 그대로 보관합니다.
#[derive(Debug, Clone)]
pub struct ClassFile {
    /// 마이너 버전
    pub minor_version: u16,
    /// 메이저 버전 (Java 8 = 52, Java 21 = 65)
    pub major_version: u16,
    /// 클래스 접근 플래그
    pub access_flags: AccessFlags,
    /// 이 클래스의 내부 이름
    pub this_class: String,
    /// 상위 클래스의 내부 이름 (`java/lang/Object`와 `module-info`는 없음)
    pub super_class: Option<String>,
    /// 직접 구현 인터페이스 (선언 순서)
    pub interfaces: Vec<String>,
    /// 클래스 `Signature` 속성
    pub signature: Option<String>,
    /// 선언된 필드
    pub fields: Vec<MemberInfo>,
    /// 선언된 메서드
    pub methods: Vec<MemberInfo>,
}

/// 필드 또는 메서드 정보
#[derive(Debug, Clone)]
pub struct MemberInfo {
    /// 접근 플래그
    pub access_flags: AccessFlags,
    /// 멤버 이름
    pub name: String,
    /// 원시 디스크립터
    pub descriptor: String,
    /// `Signature` 속성
    pub signature: Option<String>,
    /// `Exceptions` 속성의 예외 클래스 (내부 이름, 메서드 전용)
    pub exceptions: Vec<String>,
}

/// 클래스 파일 바이트를 디코딩합니다.
pub fn parse_class(bytes: &[u8]) -> Result<ClassFile, ClassParseError> {
    let mut reader = ClassReader::new(bytes);
    reader.expect_magic()?;
    let minor_version = reader.read_u2()?;
    let major_version = reader.read_u2()?;
    let pool = ConstantPool::parse(&mut reader)?;

    let access_flags = AccessFlags::new(reader.read_u2()?);
    let this_class = pool.class_name(reader.read_u2()?)?.to_owned();
    let super_index = reader.read_u2()?;
    let super_class = if super_index == 0 {
        None
    } else {
        Some(pool.class_name(super_index)?.to_owned())
    };

    let interfaces_count = reader.read_u2()?;
    let mut interfaces = Vec::with_capacity(usize::from(interfaces_count));
    for _ in 0..interfaces_count {
        interfaces.push(pool.class_name(reader.read_u2()?)?.to_owned());
    }

    let fields = read_members(&mut reader, &pool)?;
    let methods = read_members(&mut reader, &pool)?;

    let mut signature = None;
    let attributes_count = reader.read_u2()?;
    for _ in 0..attributes_count {
        let name = pool.utf8(reader.read_u2()?)?;
        let length = reader.read_u4_len()?;
        let body = reader.read_slice(length)?;
        if name == "Signature" {
            signature = Some(read_signature_attribute(body, &pool)?);
        }
    }

    Ok(ClassFile {
        minor_version,
        major_version,
        access_flags,
        this_class,
        super_class,
        interfaces,
        signature,
        fields,
        methods,
    })
}

fn read_members(
    reader: &mut ClassReader<'_>,
    pool: &ConstantPool,
) -> Result<Vec<MemberInfo>, ClassParseError> {
    let count = reader.read_u2()?;
    let mut members = Vec::with_capacity(usize::from(count));
    for _ in 0..count {
        let access_flags = AccessFlags::new(reader.read_u2()?);
        let name = pool.utf8(reader.read_u2()?)?.to_owned();
        let descriptor = pool.utf8(reader.read_u2()?)?.to_owned();

        let mut signature = None;
        let mut exceptions = Vec::new();
        let attributes_count = reader.read_u2()?;
        for _ in 0..attributes_count {
            let attr_name = pool.utf8(reader.read_u2()?)?;
            let length = reader.read_u4_len()?;
            let body = reader.read_slice(length)?;
            match attr_name {
                "Signature" => signature = Some(read_signature_attribute(body, pool)?),
                "Exceptions" => {
                    let mut sub = ClassReader::new(body);
                    let n = sub.read_u2()?;
                    for _ in 0..n {
                        exceptions.push(pool.class_name(sub.read_u2()?)?.to_owned());
                    }
                }
                _ => {}
            }
        }

        members.push(MemberInfo {
            access_flags,
            name,
            descriptor,
            signature,
            exceptions,
        });
    }
    Ok(members)
}

fn read_signature_attribute(body: &[u8], pool: &ConstantPool) -> Result<String, ClassParseError> {
    let mut sub = ClassReader::new(body);
    Ok(pool.utf8(sub.read_u2()?)?.to_owned())
}

#[derive(Debug, Clone)]
enum Constant {
    Utf8(String),
    Class { name_index: u16 },
    Other,
    Unusable,
}

struct ConstantPool {
    entries: Vec<Constant>,
}

impl ConstantPool {
    fn parse(reader: &mut ClassReader<'_>) -> Result<Self, ClassParseError> {
        let count = usize::from(reader.read_u2()?);
        let mut entries = Vec::with_capacity(count);
        entries.push(Constant::Unusable); // index 0 unused

        let mut index = 1;
        while index < count {
            let tag = reader.read_u1()?;
            let entry = match tag {
                // Utf8
                1 => {
                    let length = usize::from(reader.read_u2()?);
                    Constant::Utf8(decode_modified_utf8(reader.read_slice(length)?)?)
                }
                // Integer, Float
                3 | 4 => {
                    reader.skip(4)?;
                    Constant::Other
                }
                // Long, Double: 두 슬롯 차지
                5 | 6 => {
                    reader.skip(8)?;
                    entries.push(Constant::Other);
                    index += 1;
                    Constant::Unusable
                }
                // Class
                7 => Constant::Class {
                    name_index: reader.read_u2()?,
                },
                // String, MethodType, Module, Package
                8 | 16 | 19 | 20 => {
                    reader.skip(2)?;
                    Constant::Other
                }
                // Fieldref, Methodref, InterfaceMethodref, NameAndType, Dynamic, InvokeDynamic
                9 | 10 | 11 | 12 | 17 | 18 => {
                    reader.skip(4)?;
                    Constant::Other
                }
                // MethodHandle
                15 => {
                    reader.skip(3)?;
                    Constant::Other
                }
                other => return Err(ClassParseError::UnsupportedConstant { tag: other }),
            };

            entries.push(entry);
            index += 1;
        }

        Ok(Self { entries })
    }

    fn get(&self, index: u16) -> Result<&Constant, ClassParseError> {
        self.entries
            .get(usize::from(index))
            .ok_or(ClassParseError::InvalidConstantIndex { index })
    }

    fn utf8(&self, index: u16) -> Result<&str, ClassParseError> {
        match self.get(index)? {
            Constant::Utf8(value) => Ok(value.as_str()),
            _ => Err(ClassParseError::InvalidConstantIndex { index }),
        }
    }

    fn class_name(&self, index: u16) -> Result<&str, ClassParseError> {
        match self.get(index)? {
            Constant::Class { name_index } => self.utf8(*name_index),
            _ => Err(ClassParseError::InvalidConstantIndex { index }),
        }
    }
}

/// modified UTF-8 (JVMS 4.4.7)을 디코딩합니다.
///
/// NUL은 `C0 80`, 보조 평면 문자는 3바이트 서로게이트 두 개로 인코딩됩니다.
pub fn decode_modified_utf8(bytes: &[u8]) -> Result<String, ClassParseError> {
    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b0 = bytes[i];
        match b0 {
            0x01..=0x7F => {
                units.push(u16::from(b0));
                i += 1;
            }
            0xC0..=0xDF => {
                let b1 = continuation(bytes, i + 1)?;
                units.push((u16::from(b0 & 0x1F) << 6) | b1);
                i += 2;
            }
            0xE0..=0xEF => {
                let b1 = continuation(bytes, i + 1)?;
                let b2 = continuation(bytes, i + 2)?;
                units.push((u16::from(b0 & 0x0F) << 12) | (b1 << 6) | b2);
                i += 3;
            }
            _ => return Err(ClassParseError::InvalidUtf8),
        }
    }
    String::from_utf16(&units).map_err(|_| ClassParseError::InvalidUtf8)
}

fn continuation(bytes: &[u8], at: usize) -> Result<u16, ClassParseError> {
    match bytes.get(at) {
        Some(b) if b & 0xC0 == 0x80 => Ok(u16::from(b & 0x3F)),
        _ => Err(ClassParseError::InvalidUtf8),
    }
}

struct ClassReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ClassReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn expect_magic(&mut self) -> Result<(), ClassParseError> {
        const MAGIC: u32 = 0xCAFE_BABE;
        if self.read_u4()? != MAGIC {
            return Err(ClassParseError::InvalidMagic);
        }
        Ok(())
    }

    fn read_u1(&mut self) -> Result<u8, ClassParseError> {
        let value = *self
            .data
            .get(self.pos)
            .ok_or(ClassParseError::UnexpectedEof)?;
        self.pos += 1;
        Ok(value)
    }

    fn read_u2(&mut self) -> Result<u16, ClassParseError> {
        let slice = self.read_slice(2)?;
        Ok(u16::from_be_bytes([slice[0], slice[1]]))
    }

    fn read_u4(&mut self) -> Result<u32, ClassParseError> {
        let slice = self.read_slice(4)?;
        Ok(u32::from_be_bytes([slice[0], slice[1], slice[2], slice[3]]))
    }

    fn read_u4_len(&mut self) -> Result<usize, ClassParseError> {
        usize::try_from(self.read_u4()?).map_err(|_| ClassParseError::UnexpectedEof)
    }

    fn read_slice(&mut self, len: usize) -> Result<&'a [u8], ClassParseError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or(ClassParseError::UnexpectedEof)?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn skip(&mut self, len: usize) -> Result<(), ClassParseError> {
        self.read_slice(len).map(|_| ())
    }
}

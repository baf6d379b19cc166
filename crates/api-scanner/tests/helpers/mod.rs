//! 통합 테스트 공용 도구: 클래스 파일 조립기와 JAR/디렉토리 픽스처

#![allow(dead_code)]

use std::io::Write;
use std::path::Path;

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_PRIVATE: u16 = 0x0002;
pub const ACC_PROTECTED: u16 = 0x0004;
pub const ACC_STATIC: u16 = 0x0008;
pub const ACC_FINAL: u16 = 0x0010;
pub const ACC_SUPER: u16 = 0x0020;
pub const ACC_BRIDGE: u16 = 0x0040;
pub const ACC_VARARGS: u16 = 0x0080;
pub const ACC_INTERFACE: u16 = 0x0200;
pub const ACC_ABSTRACT: u16 = 0x0400;
pub const ACC_SYNTHETIC: u16 = 0x1000;

struct Member {
    access: u16,
    name: String,
    descriptor: String,
    signature: Option<String>,
    exceptions: Vec<String>,
}

/// 테스트용 클래스 파일 조립기
///
/// 내부 이름(`com/example/Greeter`)으로 타입과 멤버를 선언하고
/// 유효한 클래스 파일 바이트를 만듭니다.
pub struct ClassBuilder {
    access: u16,
    name: String,
    superclass: Option<String>,
    interfaces: Vec<String>,
    signature: Option<String>,
    fields: Vec<Member>,
    methods: Vec<Member>,
}

impl ClassBuilder {
    /// `public class <name> extends java.lang.Object`
    pub fn class(name: &str) -> Self {
        Self {
            access: ACC_PUBLIC | ACC_SUPER,
            name: name.to_owned(),
            superclass: Some("java/lang/Object".to_owned()),
            interfaces: Vec::new(),
            signature: None,
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// `public interface <name>`
    pub fn interface(name: &str) -> Self {
        Self {
            access: ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT,
            ..Self::class(name)
        }
    }

    pub fn access(mut self, access: u16) -> Self {
        self.access = access;
        self
    }

    pub fn extends(mut self, superclass: &str) -> Self {
        self.superclass = Some(superclass.to_owned());
        self
    }

    pub fn implements(mut self, interface: &str) -> Self {
        self.interfaces.push(interface.to_owned());
        self
    }

    pub fn signature(mut self, signature: &str) -> Self {
        self.signature = Some(signature.to_owned());
        self
    }

    pub fn field(mut self, access: u16, name: &str, descriptor: &str) -> Self {
        self.fields.push(Member {
            access,
            name: name.to_owned(),
            descriptor: descriptor.to_owned(),
            signature: None,
            exceptions: Vec::new(),
        });
        self
    }

    pub fn method(mut self, access: u16, name: &str, descriptor: &str) -> Self {
        self.methods.push(Member {
            access,
            name: name.to_owned(),
            descriptor: descriptor.to_owned(),
            signature: None,
            exceptions: Vec::new(),
        });
        self
    }

    /// 마지막으로 추가한 멤버(메서드 우선)에 `Signature` 속성을 붙입니다.
    pub fn with_signature(mut self, signature: &str) -> Self {
        if let Some(member) = self.methods.last_mut().or(self.fields.last_mut()) {
            member.signature = Some(signature.to_owned());
        }
        self
    }

    /// 마지막으로 추가한 메서드에 `Exceptions` 속성을 붙입니다.
    pub fn throws(mut self, exception: &str) -> Self {
        if let Some(method) = self.methods.last_mut() {
            method.exceptions.push(exception.to_owned());
        }
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut pool = Pool::default();
        let this = pool.class(&self.name);
        let sup = self.superclass.as_deref().map_or(0, |s| pool.class(s));
        let interfaces: Vec<u16> = self.interfaces.iter().map(|i| pool.class(i)).collect();

        let mut body = Vec::new();
        put_u2(&mut body, self.access);
        put_u2(&mut body, this);
        put_u2(&mut body, sup);
        put_u2(&mut body, interfaces.len() as u16);
        for index in interfaces {
            put_u2(&mut body, index);
        }
        write_members(&mut body, &mut pool, &self.fields);
        write_members(&mut body, &mut pool, &self.methods);

        match &self.signature {
            Some(signature) => {
                put_u2(&mut body, 1);
                write_signature(&mut body, &mut pool, signature);
            }
            None => put_u2(&mut body, 0),
        }

        let mut out = vec![0xCA, 0xFE, 0xBA, 0xBE, 0, 0, 0, 61];
        put_u2(&mut out, pool.count + 1);
        out.extend_from_slice(&pool.bytes);
        out.extend_from_slice(&body);
        out
    }
}

#[derive(Default)]
struct Pool {
    bytes: Vec<u8>,
    count: u16,
}

impl Pool {
    fn utf8(&mut self, s: &str) -> u16 {
        self.bytes.push(1);
        put_u2(&mut self.bytes, s.len() as u16);
        self.bytes.extend_from_slice(s.as_bytes());
        self.count += 1;
        self.count
    }

    fn class(&mut self, name: &str) -> u16 {
        let name_index = self.utf8(name);
        self.bytes.push(7);
        put_u2(&mut self.bytes, name_index);
        self.count += 1;
        self.count
    }
}

fn put_u2(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn put_u4(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn write_signature(out: &mut Vec<u8>, pool: &mut Pool, signature: &str) {
    let attr = pool.utf8("Signature");
    let value = pool.utf8(signature);
    put_u2(out, attr);
    put_u4(out, 2);
    put_u2(out, value);
}

fn write_members(out: &mut Vec<u8>, pool: &mut Pool, members: &[Member]) {
    put_u2(out, members.len() as u16);
    for member in members {
        let name = pool.utf8(&member.name);
        let descriptor = pool.utf8(&member.descriptor);
        put_u2(out, member.access);
        put_u2(out, name);
        put_u2(out, descriptor);

        let attributes =
            u16::from(member.signature.is_some()) + u16::from(!member.exceptions.is_empty());
        put_u2(out, attributes);
        if let Some(signature) = &member.signature {
            write_signature(out, pool, signature);
        }
        if !member.exceptions.is_empty() {
            let attr = pool.utf8("Exceptions");
            let classes: Vec<u16> = member.exceptions.iter().map(|e| pool.class(e)).collect();
            put_u2(out, attr);
            put_u4(out, 2 + 2 * classes.len() as u32);
            put_u2(out, classes.len() as u16);
            for class in classes {
                put_u2(out, class);
            }
        }
    }
}

/// `(엔트리 경로, 바이트)` 목록으로 JAR를 만듭니다. 엔트리 순서가 유지됩니다.
pub fn write_jar(path: &Path, entries: &[(&str, Vec<u8>)]) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    for (name, bytes) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(bytes).unwrap();
    }
    zip.finish().unwrap();
}

/// 클래스 디렉토리에 엔트리들을 씁니다.
pub fn write_class_dir(root: &Path, entries: &[(&str, Vec<u8>)]) {
    for (name, bytes) in entries {
        let path = root.join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, bytes).unwrap();
    }
}

/// 기본 생성자 (`public <init>()V`)
pub fn default_constructor(builder: ClassBuilder) -> ClassBuilder {
    builder.method(ACC_PUBLIC, "<init>", "()V")
}

#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: 도메인 에러 타입 (`ApiScannerError`)
//! - [`config`]: 스캐너 설정 (`ApiScannerConfig`, builder)
//! - [`classfile`]: 클래스 파일 디코딩과 디스크립터/시그니처 파싱
//! - [`types`]: 도메인 타입 (`ScanRequest`, `TypeDescriptor`, `MethodDescriptor`, `FieldDescriptor`)
//! - [`container`]: JAR/ZIP 아카이브와 클래스 디렉토리 접근 (`ClassContainer`)
//! - [`resolver`]: 스캔별 격리된 타입 해석 컨텍스트 (`ResolutionContext`)
//! - [`walker`]: 내부 패키지를 제외한 타입 열거 (`ArtifactWalker`)
//! - [`filter`]: 멤버 가시성 필터 (`MemberFilter`)
//! - [`render`]: 타입/메서드/필드 정규 텍스트
//! - [`ordering`]: 결정적 멤버 정렬 (`type_block`)
//! - [`report`]: 리포트 모델과 작성기 (`Report`, `ReportWriter`)
//! - [`scanner`]: 메인 오케스트레이터 (`ApiScanner`, `BatchSummary`)

pub mod classfile;
pub mod config;
pub mod container;
pub mod error;
pub mod filter;
pub mod ordering;
pub mod render;
pub mod report;
pub mod resolver;
pub mod scanner;
pub mod types;
pub mod walker;

// --- Public API Re-exports ---

// Scanner (main orchestrator)
pub use scanner::{ApiScanner, ArtifactOutcome, BatchSummary, output_path_for};

// Configuration
pub use config::{ApiScannerConfig, ApiScannerConfigBuilder};

// Error
pub use error::ApiScannerError;

// Types
pub use types::{
    ClassModifier, FieldDescriptor, MethodDescriptor, ScanRequest, TypeDescriptor, TypeKind,
    Visibility,
};

// Pipeline stages
pub use container::ClassContainer;
pub use filter::MemberFilter;
pub use report::{RecordKind, Report, ReportLine, ReportWriter};
pub use resolver::ResolutionContext;
pub use walker::ArtifactWalker;

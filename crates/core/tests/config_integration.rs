//! apiscan.toml 통합 설정 테스트
//!
//! - apiscan.toml.example 파싱 테스트
//! - 부분 설정 (일부 섹션만) 로딩 테스트
//! - 환경변수 우선순위 테스트
//! - 빈 파일 / 잘못된 형식 에러 테스트

use apiscan_core::config::ApiScanConfig;
use apiscan_core::error::{ApiScanError, ConfigError};

// =============================================================================
// apiscan.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_successfully() {
    let content = include_str!("../../../apiscan.toml.example");
    let config = ApiScanConfig::parse(content).expect("example config should parse");

    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.general.log_format, "pretty");
    assert_eq!(config.scanner.output_dir, "build/api");
}

#[test]
fn example_config_passes_validation() {
    let content = include_str!("../../../apiscan.toml.example");
    let config = ApiScanConfig::parse(content).expect("should parse");
    config
        .validate()
        .expect("example config should pass validation");
}

#[test]
fn example_config_matches_code_defaults() {
    let content = include_str!("../../../apiscan.toml.example");
    let from_file = ApiScanConfig::parse(content).expect("should parse");
    let from_code = ApiScanConfig::default();

    assert_eq!(from_file.general.log_level, from_code.general.log_level);
    assert_eq!(from_file.general.log_format, from_code.general.log_format);
    assert_eq!(from_file.scanner.artifacts, from_code.scanner.artifacts);
    assert_eq!(from_file.scanner.classpath, from_code.scanner.classpath);
    assert_eq!(from_file.scanner.output_dir, from_code.scanner.output_dir);
    assert_eq!(
        from_file.scanner.internal_marker,
        from_code.scanner.internal_marker
    );
    assert_eq!(
        from_file.scanner.include_synthetic,
        from_code.scanner.include_synthetic
    );
    assert_eq!(
        from_file.scanner.strict_resolution,
        from_code.scanner.strict_resolution
    );
    assert_eq!(
        from_file.scanner.max_parallel_scans,
        from_code.scanner.max_parallel_scans
    );
}

// =============================================================================
// 부분 설정 로딩 테스트
// =============================================================================

#[test]
fn partial_config_general_only() {
    let toml = r#"
[general]
log_level = "debug"
log_format = "json"
"#;
    let config = ApiScanConfig::parse(toml).expect("should parse");
    config.validate().expect("should validate");

    assert_eq!(config.general.log_level, "debug");
    assert_eq!(config.general.log_format, "json");
    // scanner 섹션은 기본값
    assert_eq!(config.scanner.output_dir, "build/api");
    assert!(config.scanner.artifacts.is_empty());
}

#[test]
fn partial_config_scanner_only() {
    let toml = r#"
[scanner]
artifacts = ["build/libs/core.jar", "build/libs/rpc.jar"]
classpath = ["libs/guava.jar"]
output_dir = "out/api"
internal_marker = "impl"
max_parallel_scans = 2
"#;
    let config = ApiScanConfig::parse(toml).expect("should parse");
    config.validate().expect("should validate");

    assert_eq!(config.scanner.artifacts.len(), 2);
    assert_eq!(config.scanner.classpath, vec!["libs/guava.jar"]);
    assert_eq!(config.scanner.output_dir, "out/api");
    assert_eq!(config.scanner.internal_marker, "impl");
    assert_eq!(config.scanner.max_parallel_scans, 2);
    // general은 기본값
    assert_eq!(config.general.log_level, "info");
}

// =============================================================================
// 환경변수 우선순위 테스트
// =============================================================================

#[test]
#[serial_test::serial]
fn env_override_takes_precedence_over_toml() {
    let toml = r#"
[general]
log_level = "info"
"#;

    let original = std::env::var("APISCAN_GENERAL_LOG_LEVEL").ok();
    // SAFETY: serial 테스트로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("APISCAN_GENERAL_LOG_LEVEL", "error");
    }

    let mut config = ApiScanConfig::parse(toml).expect("should parse");
    config.apply_env_overrides();
    let result = config.general.log_level.clone();

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("APISCAN_GENERAL_LOG_LEVEL", val),
            None => std::env::remove_var("APISCAN_GENERAL_LOG_LEVEL"),
        }
    }

    assert_eq!(result, "error");
}

#[test]
#[serial_test::serial]
fn env_override_csv_for_classpath() {
    let original = std::env::var("APISCAN_SCANNER_CLASSPATH").ok();
    // SAFETY: serial 테스트로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("APISCAN_SCANNER_CLASSPATH", "a.jar, b.jar, classes");
    }

    let mut config = ApiScanConfig::default();
    config.apply_env_overrides();
    let result = config.scanner.classpath.clone();

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("APISCAN_SCANNER_CLASSPATH", val),
            None => std::env::remove_var("APISCAN_SCANNER_CLASSPATH"),
        }
    }

    assert_eq!(result, vec!["a.jar", "b.jar", "classes"]);
}

#[test]
#[serial_test::serial]
fn env_override_bool_and_numeric_fields() {
    let original_strict = std::env::var("APISCAN_SCANNER_STRICT_RESOLUTION").ok();
    let original_jobs = std::env::var("APISCAN_SCANNER_MAX_PARALLEL_SCANS").ok();
    // SAFETY: serial 테스트로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("APISCAN_SCANNER_STRICT_RESOLUTION", "true");
        std::env::set_var("APISCAN_SCANNER_MAX_PARALLEL_SCANS", "12");
    }

    let mut config = ApiScanConfig::default();
    config.apply_env_overrides();

    // SAFETY: 테스트 정리
    unsafe {
        match original_strict {
            Some(val) => std::env::set_var("APISCAN_SCANNER_STRICT_RESOLUTION", val),
            None => std::env::remove_var("APISCAN_SCANNER_STRICT_RESOLUTION"),
        }
        match original_jobs {
            Some(val) => std::env::set_var("APISCAN_SCANNER_MAX_PARALLEL_SCANS", val),
            None => std::env::remove_var("APISCAN_SCANNER_MAX_PARALLEL_SCANS"),
        }
    }

    assert!(config.scanner.strict_resolution);
    assert_eq!(config.scanner.max_parallel_scans, 12);
}

#[test]
#[serial_test::serial]
fn env_override_missing_var_keeps_toml_value() {
    let toml = r#"
[scanner]
output_dir = "custom/api"
"#;
    let original = std::env::var("APISCAN_SCANNER_OUTPUT_DIR").ok();
    // SAFETY: serial 테스트로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::remove_var("APISCAN_SCANNER_OUTPUT_DIR");
    }

    let mut config = ApiScanConfig::parse(toml).expect("should parse");
    config.apply_env_overrides();

    // SAFETY: 테스트 정리
    unsafe {
        if let Some(val) = original {
            std::env::set_var("APISCAN_SCANNER_OUTPUT_DIR", val);
        }
    }

    assert_eq!(config.scanner.output_dir, "custom/api");
}

// =============================================================================
// 에러 케이스 테스트
// =============================================================================

#[test]
fn empty_string_parses_with_defaults() {
    let config = ApiScanConfig::parse("").expect("empty string should parse");
    config.validate().expect("defaults should validate");
    assert_eq!(config.scanner.internal_marker, "internal");
}

#[test]
fn comments_only_parses_with_defaults() {
    let toml = r#"
# apiscan configuration
# all defaults
"#;
    let config = ApiScanConfig::parse(toml).expect("comments only should parse");
    assert_eq!(config.general.log_level, "info");
}

#[test]
fn malformed_toml_returns_parse_error() {
    let result = ApiScanConfig::parse("[scanner\noutput_dir = \"x\"");
    assert!(matches!(
        result,
        Err(ApiScanError::Config(ConfigError::ParseFailed { .. }))
    ));
}

#[test]
fn wrong_type_for_numeric_field() {
    let toml = r#"
[scanner]
max_parallel_scans = "many"
"#;
    let result = ApiScanConfig::parse(toml);
    assert!(result.is_err(), "string for usize should fail");
}

#[test]
fn unknown_section_is_ignored() {
    let toml = r#"
[general]
log_level = "warn"

[gradle]
task = "scanApi"
"#;
    let config = ApiScanConfig::parse(toml).expect("unknown section should be ignored");
    assert_eq!(config.general.log_level, "warn");
}

#[tokio::test]
async fn from_file_nonexistent_returns_file_not_found() {
    let result = ApiScanConfig::from_file("/tmp/apiscan_test_nonexistent_12345.toml").await;
    assert!(matches!(
        result,
        Err(ApiScanError::Config(ConfigError::FileNotFound { .. }))
    ));
}

#[tokio::test]
async fn from_file_reads_written_config() {
    let temp_dir = tempfile::tempdir().expect("should create temp dir");
    let path = temp_dir.path().join("apiscan.toml");
    std::fs::write(
        &path,
        "[scanner]\nartifacts = [\"lib.jar\"]\noutput_dir = \"api\"\n",
    )
    .expect("should write config");

    let config = ApiScanConfig::from_file(&path).await.expect("should load");
    assert_eq!(config.scanner.artifacts, vec!["lib.jar"]);
    assert_eq!(config.scanner.output_dir, "api");
}

#[tokio::test]
async fn from_file_rejects_invalid_values() {
    let temp_dir = tempfile::tempdir().expect("should create temp dir");
    let path = temp_dir.path().join("apiscan.toml");
    std::fs::write(&path, "[scanner]\ninternal_marker = \"\"\n").expect("should write config");

    let result = ApiScanConfig::from_file(&path).await;
    assert!(matches!(
        result,
        Err(ApiScanError::Config(ConfigError::InvalidValue { .. }))
    ));
}

// =============================================================================
// 직렬화 라운드트립 테스트
// =============================================================================

#[test]
fn example_config_serialize_roundtrip() {
    let content = include_str!("../../../apiscan.toml.example");
    let config = ApiScanConfig::parse(content).expect("should parse");
    let serialized = toml::to_string_pretty(&config).expect("should serialize");
    let reparsed = ApiScanConfig::parse(&serialized).expect("should reparse");
    reparsed.validate().expect("should validate");

    assert_eq!(config.scanner.output_dir, reparsed.scanner.output_dir);
    assert_eq!(
        config.scanner.max_parallel_scans,
        reparsed.scanner.max_parallel_scans
    );
}

//! Integration tests for the Engine logging system
//!
//! These tests verify the logger plumbing and that shader components report
//! through it. No GPU required.
//!
//! Run with: cargo test --test logging_integration_tests

use galaxy_3d_shader::galaxy3d::Engine;
use galaxy_3d_shader::galaxy3d::log::{format_entry, Logger, LogEntry, LogSeverity};
use galaxy_3d_shader::galaxy3d::render::ShaderStage;
use galaxy_3d_shader::galaxy3d::shader::{Pass, ShaderKeyword, ShaderVariant};
use std::sync::{Arc, Mutex};
use serial_test::serial;

// ============================================================================
// TEST LOGGER IMPLEMENTATION
// ============================================================================

/// Test logger that captures log entries for verification
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_custom_logger() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    Engine::log(LogSeverity::Info, "test::module", "Test info message".to_string());
    Engine::log(LogSeverity::Warn, "test::module", "Test warning message".to_string());
    Engine::log(LogSeverity::Error, "test::module", "Test error message".to_string());

    {
        let captured = entries.lock().unwrap();
        assert_eq!(captured.len(), 3);
        assert_eq!(captured[0].severity, LogSeverity::Info);
        assert_eq!(captured[0].message, "Test info message");
        assert_eq!(captured[1].severity, LogSeverity::Warn);
        assert_eq!(captured[2].severity, LogSeverity::Error);
        assert!(captured.iter().all(|e| e.source == "test::module"));
        assert!(captured.iter().all(|e| e.file.is_none()));
    }

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_error_logging_with_location() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    Engine::log_detailed(
        LogSeverity::Error,
        "test::error",
        "Critical error occurred".to_string(),
        "test_file.rs",
        42,
    );

    {
        let captured = entries.lock().unwrap();
        assert_eq!(captured.len(), 1);
        let entry = &captured[0];
        assert_eq!(entry.file, Some("test_file.rs"));
        assert_eq!(entry.line, Some(42));
        assert!(format_entry(entry).ends_with("Critical error occurred (test_file.rs:42)"));
    }

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_logger_reset() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);
    Engine::log(LogSeverity::Info, "test::reset", "captured".to_string());

    Engine::reset_logger();
    Engine::log(LogSeverity::Info, "test::reset", "printed to console".to_string());

    assert_eq!(entries.lock().unwrap().len(), 1);
}

#[test]
#[serial]
fn test_integration_duplicate_variant_is_warned() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    let keyword = ShaderKeyword::from_keywords(["FOG"]);
    let mut pass = Pass::new("Forward");
    let first = Arc::new(ShaderVariant::new(keyword.clone(), ShaderStage::Pixel, "first"));
    let second = Arc::new(ShaderVariant::new(keyword.clone(), ShaderStage::Pixel, "second"));

    assert!(pass.add_variant(first).unwrap());
    assert!(!pass.add_variant(second).unwrap());

    {
        let captured = entries.lock().unwrap();
        let warning = captured
            .iter()
            .find(|e| e.severity == LogSeverity::Warn)
            .expect("duplicate registration should be warned");
        assert_eq!(warning.source, "galaxy3d::Pass");
        assert!(warning.message.contains("_FOG"));
    }

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_unsupported_stage_is_logged_as_error() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    let mut pass = Pass::new("Forward");
    let compute = Arc::new(ShaderVariant::new(ShaderKeyword::new(), ShaderStage::Compute, "cs"));
    assert!(pass.add_variant(compute).is_err());

    {
        let captured = entries.lock().unwrap();
        let error = captured
            .iter()
            .find(|e| e.severity == LogSeverity::Error)
            .expect("rejected stage should be logged");
        assert!(error.message.contains("compute"));
        assert!(error.file.is_some());
        assert!(error.line.is_some());
    }

    Engine::reset_logger();
}

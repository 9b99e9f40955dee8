//! Integration tests for construction-time logging.
//!
//! The logging policy is process-wide, so everything that toggles it runs
//! inside a single test to keep the steps ordered.

use std::{
    panic,
    sync::{Mutex, MutexGuard},
};

use log::{Level, LevelFilter, Log, Metadata, Record, kv::Key};

use deeperror::{
    DeepError, ErrorLevel,
    config::{LoggingConfig, ReportConfig, TraceConfig},
    error_logging_enabled, exec_without_error_logging, set_auto_log_level,
    set_error_logging_enabled,
};

#[derive(Debug, Clone)]
struct Captured {
    level: Level,
    num: Option<i64>,
    message: String,
}

struct CaptureLogger {
    records: Mutex<Vec<Captured>>,
}

static LOGGER: CaptureLogger = CaptureLogger {
    records: Mutex::new(Vec::new()),
};

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let num = record
            .key_values()
            .get(Key::from("num"))
            .and_then(|value| value.to_i64());
        self.records().push(Captured {
            level: record.level(),
            num,
            message: record.args().to_string(),
        });
    }

    fn flush(&self) {}
}

impl CaptureLogger {
    fn records(&self) -> MutexGuard<'_, Vec<Captured>> {
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn find(&self, num: i64) -> Option<Captured> {
        self.records().iter().find(|c| c.num == Some(num)).cloned()
    }
}

#[test]
fn test_construction_logging_policy() {
    log::set_logger(&LOGGER).expect("logger installed once");
    log::set_max_level(LevelFilter::Trace);

    // Disabled by default.
    assert!(!error_logging_enabled());
    DeepError::new(5001, "quiet by default", None);
    assert!(LOGGER.find(5001).is_none());

    // Enabled: the full rendering is logged at error level.
    set_error_logging_enabled(true);
    DeepError::new(5002, "logged", None);
    let record = LOGGER.find(5002).expect("record for 5002");
    assert_eq!(record.level, Level::Error);
    assert!(record.message.starts_with("-- DeepError 5002 500 auto_logging.rs "));
    assert!(record.message.contains("-- EndUserMsg: logged"));

    // Suppressed inside the scope, restored afterwards.
    let err = exec_without_error_logging(|| {
        assert!(!error_logging_enabled());
        DeepError::new(5003, "suppressed", None)
    });
    assert_eq!(err.num(), 5003);
    assert!(LOGGER.find(5003).is_none());
    assert!(error_logging_enabled());

    // Restored even when the action panics.
    let result = panic::catch_unwind(|| {
        exec_without_error_logging(|| panic!("action failed"));
    });
    assert!(result.is_err());
    assert!(error_logging_enabled());

    // Off level silences logging without touching the flag.
    set_auto_log_level(ErrorLevel::Off);
    DeepError::new(5004, "silenced", None);
    assert!(LOGGER.find(5004).is_none());
    assert!(error_logging_enabled());

    // Configuration drives level and trace bound.
    ReportConfig::new(
        LoggingConfig::new(true, ErrorLevel::Warn),
        TraceConfig::new(64),
    )
    .apply();
    let err = DeepError::new(5005, "configured", None);
    let record = LOGGER.find(5005).expect("record for 5005");
    assert_eq!(record.level, Level::Warn);
    assert!(err.stack_trace().len() <= 64);

    ReportConfig::default().apply();
    assert!(!error_logging_enabled());
    DeepError::new(5006, "back to default", None);
    assert!(LOGGER.find(5006).is_none());
}

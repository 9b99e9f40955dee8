//! Integration tests for building and walking error chains through the
//! public API.

use std::{error::Error, io};

use deeperror::{DEFAULT_STACK_TRACE_LIMIT, DeepError, ResultExt, level_name, level_ordinal};

#[inline(never)]
fn failing_helper(skip: usize) -> DeepError {
    DeepError::new_with_skip(6001, "helper failed", None, skip)
}

fn open_settings() -> Result<String, DeepError> {
    Err(io::Error::new(io::ErrorKind::PermissionDenied, "settings.toml"))
        .deep_context(6010, "Could not open settings")
}

fn load_profile() -> Result<String, DeepError> {
    open_settings().deep_http_context(6011, "Could not load profile", 503)
}

#[test]
#[cfg(debug_assertions)]
fn test_skip_attributes_callers_frame() {
    let line = line!() + 1;
    let err = failing_helper(1);

    assert_eq!(err.filename(), "error_chain.rs");
    assert_eq!(err.line(), line);
    assert!(err.calling_method().contains("test_skip_attributes_callers_frame"));
}

#[test]
#[cfg(debug_assertions)]
fn test_zero_skip_names_the_helper() {
    let err = failing_helper(0);

    assert_eq!(err.filename(), "error_chain.rs");
    assert!(err.calling_method().ends_with("failing_helper"));
}

#[test]
fn test_max_skip_is_unknown() {
    let err = failing_helper(usize::MAX);

    assert_eq!(err.num(), 6001);
    assert!(err.call_site().is_unknown());
}

#[test]
fn test_skip_beyond_stack_is_unknown() {
    let err = DeepError::new_with_skip(6002, "too far", None, 10_000);

    assert!(err.call_site().is_unknown());
    assert!(err.to_string().starts_with("-- DeepError 6002 500   line: 0\n"));
}

#[test]
fn test_three_level_chain() {
    let err = load_profile().unwrap_err();

    assert_eq!(err.num(), 6011);
    assert_eq!(err.status_code(), 503);
    assert_eq!(err.chain().count(), 3);

    let middle = err.find_cause::<DeepError>().expect("middle link");
    assert_eq!(middle.num(), 6010);
    assert_eq!(middle.status_code(), 500);

    let io_err = err.find_cause::<io::Error>().expect("io link");
    assert_eq!(io_err.kind(), io::ErrorKind::PermissionDenied);

    let source = err.source().expect("source");
    assert!(source.is::<DeepError>());
}

#[test]
fn test_three_level_rendering_nests_markers() {
    let rendered = load_profile().unwrap_err().to_string();

    assert!(rendered.starts_with("-- DeepError 6011 503 error_chain.rs "));
    assert!(rendered.contains("\n-- -- DeepError 6010 500 error_chain.rs "));
    assert!(rendered.contains("\n-- -- EndUserMsg: Could not open settings\n"));
    assert!(rendered.ends_with("-- -- ParentError:\n-- -- settings.toml"));
}

#[test]
fn test_stack_trace_bounded_by_default_limit() {
    let err = DeepError::new(6003, "bounded", None);

    assert!(err.stack_trace().len() <= DEFAULT_STACK_TRACE_LIMIT);
}

#[test]
fn test_level_lookup_round_trip() {
    for ordinal in -1..=8 {
        let name = level_name(ordinal);
        let back = level_ordinal(name);
        if (0..=7).contains(&ordinal) {
            assert_eq!(back, ordinal);
        } else {
            assert_eq!(back, -1);
        }
    }
}

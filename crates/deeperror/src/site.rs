//! Call-site attribution and stack trace capture.
//!
//! The file and line of the immediate caller come from
//! [`Location::caller`], which is exact as long as every constructor on the
//! path is `#[track_caller]`. The function name, and any frame further up
//! the stack, come from parsing a captured [`Backtrace`]. Parsing is best
//! effort: without debug info the frames carry only symbol names, so frames
//! above the caller resolve to a function name with no file or line.

use std::{
    backtrace::{Backtrace, BacktraceStatus},
    panic::Location,
    path::Path,
};

/// Source location attributed to an error.
///
/// A default `CallSite` (empty strings, line `0`) means the location could
/// not be determined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallSite {
    filename: String,
    calling_method: String,
    line: u32,
}

impl CallSite {
    /// Create a call site from its parts.
    ///
    /// Only the last path segment of `file` is kept.
    pub fn new(file: &str, calling_method: impl Into<String>, line: u32) -> Self {
        Self {
            filename: basename(file),
            calling_method: calling_method.into(),
            line,
        }
    }

    /// File basename of the call site.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Function path of the call site, without the symbol hash.
    pub fn calling_method(&self) -> &str {
        &self.calling_method
    }

    /// Line of the call site.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Returns `true` if no location information was resolved.
    pub fn is_unknown(&self) -> bool {
        self.filename.is_empty() && self.calling_method.is_empty() && self.line == 0
    }

    /// Attribute `location`, or the frame `skip` levels above it.
    ///
    /// With `skip == 0` the file and line come straight from `location` and
    /// only the function name is looked up in `frames`. Otherwise the walk
    /// starts at the caller's frame: the one that contains `location`, or,
    /// when frames carry no locations, the first frame above this crate's
    /// own. If that frame, or the frame `skip` levels above it, is missing
    /// the result is unknown.
    pub(crate) fn resolve(location: &Location<'_>, frames: &[Frame], skip: usize) -> Self {
        let anchor = frames
            .iter()
            .position(|frame| frame.contains(location))
            .or_else(|| first_external_frame(frames));

        if skip == 0 {
            let calling_method = anchor
                .map(|idx| frames[idx].function.clone())
                .unwrap_or_default();
            return Self::new(location.file(), calling_method, location.line());
        }

        anchor
            .and_then(|idx| idx.checked_add(skip))
            .and_then(|idx| frames.get(idx))
            .map(Frame::call_site)
            .unwrap_or_default()
    }
}

/// One symbol of a parsed backtrace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Frame {
    function: String,
    file: Option<String>,
    line: Option<u32>,
}

impl Frame {
    fn contains(&self, location: &Location<'_>) -> bool {
        self.line == Some(location.line())
            && self
                .file
                .as_deref()
                .is_some_and(|file| same_source_file(file, location.file()))
    }

    /// Frames of this crate's constructors and capture path.
    fn is_internal(&self) -> bool {
        let function = self.function.trim_start_matches('<');
        (function.starts_with("deeperror::") || function.contains(" as deeperror::"))
            && !function.contains("::tests::")
    }

    fn call_site(&self) -> CallSite {
        CallSite::new(
            self.file.as_deref().unwrap_or_default(),
            self.function.clone(),
            self.line.unwrap_or_default(),
        )
    }
}

/// Index of the first frame after the leading run of internal frames.
fn first_external_frame(frames: &[Frame]) -> Option<usize> {
    let first_internal = frames.iter().position(Frame::is_internal)?;
    frames[first_internal..]
        .iter()
        .position(|frame| !frame.is_internal())
        .map(|offset| first_internal + offset)
}

/// Result of a stack capture at construction time.
#[derive(Debug, Default)]
pub(crate) struct Capture {
    pub(crate) site: CallSite,
    pub(crate) stack_trace: String,
}

/// Capture the stack and attribute the call site.
///
/// `limit` bounds the stored trace in bytes. When the platform cannot
/// capture a backtrace the trace is empty and only the `location`-derived
/// fields are filled in.
pub(crate) fn capture(location: &Location<'_>, skip: usize, limit: usize) -> Capture {
    let backtrace = Backtrace::force_capture();
    let trace = match backtrace.status() {
        BacktraceStatus::Captured => backtrace.to_string(),
        _ => String::new(),
    };

    let frames = parse_frames(&trace);
    Capture {
        site: CallSite::resolve(location, &frames, skip),
        stack_trace: truncate_to_boundary(trace, limit),
    }
}

/// Parse the textual form of a [`Backtrace`].
///
/// Each symbol is printed as `N: path::to::function`, optionally followed
/// by an `at file:line:column` line.
pub(crate) fn parse_frames(trace: &str) -> Vec<Frame> {
    let mut frames: Vec<Frame> = Vec::new();

    for line in trace.lines() {
        let line = line.trim();

        if let Some(location) = line.strip_prefix("at ") {
            if let Some(frame) = frames.last_mut() {
                let (file, line) = split_location(location);
                frame.file = file;
                frame.line = line;
            }
            continue;
        }

        let Some((index, function)) = line.split_once(": ") else {
            continue;
        };
        if !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) {
            frames.push(Frame {
                function: strip_symbol_hash(function.trim()).to_string(),
                file: None,
                line: None,
            });
        }
    }

    frames
}

/// Split `file:line:column` (or `file:line`) from the right.
fn split_location(location: &str) -> (Option<String>, Option<u32>) {
    let mut parts = location.rsplitn(3, ':');
    let last = parts.next();
    let middle = parts.next();
    let rest = parts.next();

    match (rest, middle, last) {
        (Some(file), Some(line), Some(_column)) => (Some(file.to_string()), line.parse().ok()),
        (None, Some(file), Some(line)) => (Some(file.to_string()), line.parse().ok()),
        _ => (Some(location.to_string()), None),
    }
}

/// Drop a trailing `::h0123456789abcdef` mangling hash.
fn strip_symbol_hash(function: &str) -> &str {
    match function.rsplit_once("::h") {
        Some((path, hash)) if hash.len() == 16 && hash.bytes().all(|b| b.is_ascii_hexdigit()) => {
            path
        }
        _ => function,
    }
}

fn same_source_file(trace_file: &str, location_file: &str) -> bool {
    let trace_file = normalize_path(trace_file);
    let location_file = normalize_path(location_file);
    !location_file.is_empty()
        && !trace_file.is_empty()
        && (trace_file.ends_with(&location_file) || location_file.ends_with(&trace_file))
}

fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    path.trim_start_matches("./").to_string()
}

fn basename(file: &str) -> String {
    let normalized = file.replace('\\', "/");
    Path::new(&normalized)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Truncate `text` to at most `limit` bytes without splitting a character.
pub(crate) fn truncate_to_boundary(mut text: String, limit: usize) -> String {
    if text.len() > limit {
        let mut end = limit;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text.truncate(end);
    }
    text
}

//! Lenient text loaders for digitised fracture traces.
//!
//! Both formats are line based. Blank lines and lines starting with `#` are ignored, a
//! line containing a comma is split on commas and any other line on whitespace.
//! Lines that cannot be read are skipped without error.

use std::fs;
use std::path::Path;

use nalgebra::Point2;
use tracing::{debug, trace};

use crate::errors::LoadError;
use crate::geometry::{Segment, Trace, TraceMap};

/// Split a trimmed line into tokens, or `None` for blank and comment lines.
fn tokens(line: &str) -> Option<Vec<&str>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let parts: Vec<&str> = if line.contains(',') {
        line.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect()
    } else {
        line.split_whitespace().collect()
    };
    Some(parts)
}

/// Parse a token as a finite number.
fn finite(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Parse one segment per line from the first four columns `x1 y1 x2 y2`.
///
/// Extra columns are ignored. Lines with fewer than four columns or with a
/// non-numeric or non-finite value among the first four are skipped.
///
/// # Examples
/// ```
/// use fracpaq::{parse_segments, segment};
///
/// let text = "# x1 y1 x2 y2\n0 0 1 1 extra\n\n2,2,3,2\nbad line\n";
/// assert_eq!(
///     parse_segments(text),
///     vec![segment(0.0, 0.0, 1.0, 1.0), segment(2.0, 2.0, 3.0, 2.0)]
/// );
/// ```
#[must_use]
pub fn parse_segments(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    for (number, line) in text.lines().enumerate() {
        let Some(parts) = tokens(line) else {
            continue;
        };
        if parts.len() < 4 {
            trace!(line = number + 1, "skipping line with fewer than four columns");
            continue;
        }
        let coords: Option<Vec<f64>> = parts[..4].iter().map(|token| finite(token)).collect();
        match coords.as_deref() {
            Some(&[x1, y1, x2, y2]) => segments.push(Segment::new(x1, y1, x2, y2)),
            _ => trace!(line = number + 1, "skipping line with unreadable coordinates"),
        }
    }
    segments
}

/// Parse one polyline trace per line from alternating `x y` values.
///
/// Values are read until the first token that is not a finite number. An odd
/// trailing value is dropped, consecutive duplicate vertices are collapsed, and a
/// line that yields no segment is skipped.
///
/// # Examples
/// ```
/// use fracpaq::parse_traces;
///
/// let traces = parse_traces("0 0 1 0 1 0 1 1 note\n5 5 5 5\n");
/// assert_eq!(traces.len(), 1);
/// assert_eq!(traces[0].segments().len(), 2);
/// ```
#[must_use]
pub fn parse_traces(text: &str) -> Vec<Trace> {
    let mut traces = Vec::new();
    for (number, line) in text.lines().enumerate() {
        let Some(parts) = tokens(line) else {
            continue;
        };
        let values: Vec<f64> = parts.iter().map_while(|token| finite(token)).collect();
        if values.len() < 4 {
            trace!(line = number + 1, "skipping line with fewer than two vertices");
            continue;
        }
        let points: Vec<Point2<f64>> = values
            .chunks_exact(2)
            .map(|pair| Point2::new(pair[0], pair[1]))
            .collect();
        match Trace::from_points(&points) {
            Some(polyline) => traces.push(polyline),
            None => trace!(line = number + 1, "skipping line without distinct vertices"),
        }
    }
    traces
}

/// Read a whole file, attaching the path to I/O failures.
fn read_text(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a segment file.
///
/// # Errors
///
/// Returns [`LoadError::Io`] when the file cannot be read.
pub fn read_segments_txt(path: impl AsRef<Path>) -> Result<Vec<Segment>, LoadError> {
    let path = path.as_ref();
    let segments = parse_segments(&read_text(path)?);
    debug!(path = %path.display(), segments = segments.len(), "loaded segment file");
    Ok(segments)
}

/// Read a polyline trace file.
///
/// # Errors
///
/// Returns [`LoadError::Io`] when the file cannot be read.
pub fn read_traces_txt(path: impl AsRef<Path>) -> Result<Vec<Trace>, LoadError> {
    let path = path.as_ref();
    let traces = parse_traces(&read_text(path)?);
    debug!(path = %path.display(), traces = traces.len(), "loaded trace file");
    Ok(traces)
}

/// Read either file format into a trace map.
///
/// Segment files produce one single-segment trace per line.
///
/// # Errors
///
/// Returns [`LoadError::Io`] when the file cannot be read.
pub fn read_map(path: impl AsRef<Path>, polylines: bool) -> Result<TraceMap, LoadError> {
    if polylines {
        Ok(TraceMap::new(read_traces_txt(path)?))
    } else {
        Ok(TraceMap::from_segments(read_segments_txt(path)?))
    }
}

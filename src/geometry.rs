//! Fundamental geometric types for fracture trace maps.

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Straight fracture segment between two digitised endpoints.
///
/// Coordinates are planar and unit-agnostic (usually image pixels). The segment is
/// undirected: swapping the endpoints changes neither its length nor its angle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// X coordinate of the first endpoint.
    pub x1: f64,
    /// Y coordinate of the first endpoint.
    pub y1: f64,
    /// X coordinate of the second endpoint.
    pub x2: f64,
    /// Y coordinate of the second endpoint.
    pub y2: f64,
}

impl Segment {
    /// Create a [`Segment`] with explicit endpoint coordinates.
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Create a segment joining two points.
    #[must_use]
    pub fn between(start: Point2<f64>, end: Point2<f64>) -> Self {
        Self::new(start.x, start.y, end.x, end.y)
    }

    /// First endpoint.
    #[must_use]
    pub fn start(&self) -> Point2<f64> {
        Point2::new(self.x1, self.y1)
    }

    /// Second endpoint.
    #[must_use]
    pub fn end(&self) -> Point2<f64> {
        Point2::new(self.x2, self.y2)
    }

    /// Displacement from the first to the second endpoint.
    #[must_use]
    pub fn to_vector(&self) -> Vector2<f64> {
        self.end() - self.start()
    }

    /// The same segment with its endpoints swapped.
    #[must_use]
    pub const fn reversed(&self) -> Self {
        Self::new(self.x2, self.y2, self.x1, self.y1)
    }

    /// Returns `true` when both endpoints coincide.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.x1 == self.x2 && self.y1 == self.y2
    }

    /// Returns `true` when every coordinate is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x1.is_finite() && self.y1.is_finite() && self.x2.is_finite() && self.y2.is_finite()
    }

    /// Euclidean length. Degenerate segments have length zero.
    ///
    /// # Examples
    /// ```
    /// use fracpaq::segment;
    ///
    /// assert_eq!(segment(0.0, 0.0, 3.0, 4.0).length(), 5.0);
    /// ```
    #[must_use]
    pub fn length(&self) -> f64 {
        self.to_vector().norm()
    }

    /// Point halfway between the endpoints.
    #[must_use]
    pub fn midpoint(&self) -> Point2<f64> {
        Point2::new(0.5 * (self.x1 + self.x2), 0.5 * (self.y1 + self.y2))
    }

    /// Orientation in degrees measured counter-clockwise from the X axis, folded to `[0, 180)`.
    ///
    /// The direction vector is first flipped into the upper half plane so that both
    /// endpoint orders produce bit-identical results. A degenerate segment reports 0.
    ///
    /// # Examples
    /// ```
    /// use fracpaq::segment;
    ///
    /// assert_eq!(segment(0.0, 0.0, 0.0, 1.0).angle_deg(), 90.0);
    /// assert_eq!(segment(0.0, 0.0, -1.0, -1.0).angle_deg(), 45.0);
    /// ```
    #[must_use]
    pub fn angle_deg(&self) -> f64 {
        let mut delta = self.to_vector();
        if delta.y < 0.0 || (delta.y == 0.0 && delta.x < 0.0) {
            delta = -delta;
        }
        let angle = delta.y.atan2(delta.x).to_degrees();
        fold_half_turn(angle)
    }
}

/// Fold an angle in degrees into `[0, 180)`, snapping values within 1e-12 of zero.
pub(crate) fn fold_half_turn(angle: f64) -> f64 {
    let folded = angle.rem_euclid(180.0);
    if folded.abs() < 1.0e-12 || folded >= 180.0 {
        0.0
    } else {
        folded
    }
}

/// A fracture trace: a non-empty polyline of contiguous segments.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Trace {
    /// Segments in digitising order.
    segments: Vec<Segment>,
}

impl Trace {
    /// Wrap a single segment as a trace.
    #[must_use]
    pub fn from_segment(segment: Segment) -> Self {
        Self {
            segments: vec![segment],
        }
    }

    /// Build a trace from already contiguous segments, or `None` when empty.
    #[must_use]
    pub fn from_segments(segments: Vec<Segment>) -> Option<Self> {
        if segments.is_empty() {
            None
        } else {
            Some(Self { segments })
        }
    }

    /// Build a trace from polyline vertices.
    ///
    /// Consecutive duplicate vertices are skipped so that no zero-length segment is
    /// created. Returns `None` when fewer than two distinct vertices remain.
    ///
    /// # Examples
    /// ```
    /// use fracpaq::Trace;
    /// use nalgebra::Point2;
    ///
    /// let trace = Trace::from_points(&[
    ///     Point2::new(0.0, 0.0),
    ///     Point2::new(0.0, 0.0),
    ///     Point2::new(3.0, 4.0),
    /// ])
    /// .expect("two distinct vertices");
    /// assert_eq!(trace.segments().len(), 1);
    /// assert_eq!(trace.total_length(), 5.0);
    /// ```
    #[must_use]
    pub fn from_points(points: &[Point2<f64>]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut previous = *first;
        let mut segments = Vec::with_capacity(rest.len());
        for &current in rest {
            if current == previous {
                continue;
            }
            segments.push(Segment::between(previous, current));
            previous = current;
        }
        Self::from_segments(segments)
    }

    /// Segments making up the trace.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Sum of segment lengths.
    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.segments.iter().map(Segment::length).sum()
    }

    /// Folded orientation of every segment, in order.
    #[must_use]
    pub fn orientations_deg(&self) -> Vec<f64> {
        self.segments.iter().map(Segment::angle_deg).collect()
    }

    /// Number of polyline vertices.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.segments.len() + 1
    }

    /// Point halfway along the polyline, measured by cumulative length.
    ///
    /// A trace of zero total length reports the midpoint between its first and last
    /// vertex. If the halfway distance is never reached (non-finite lengths), the last
    /// vertex is returned.
    ///
    /// # Examples
    /// ```
    /// use fracpaq::Trace;
    /// use nalgebra::Point2;
    ///
    /// let trace = Trace::from_points(&[
    ///     Point2::new(0.0, 0.0),
    ///     Point2::new(2.0, 0.0),
    ///     Point2::new(2.0, 4.0),
    /// ])
    /// .expect("three distinct vertices");
    /// assert_eq!(trace.midpoint(), Point2::new(2.0, 1.0));
    /// ```
    #[must_use]
    pub fn midpoint(&self) -> Point2<f64> {
        // Non-empty by construction.
        let first = self.segments[0];
        let last = self.segments[self.segments.len() - 1];
        let total = self.total_length();
        if total <= 0.0 {
            return Segment::between(first.start(), last.end()).midpoint();
        }
        let half = 0.5 * total;
        let mut travelled = 0.0;
        for segment in &self.segments {
            let length = segment.length();
            if length > 0.0 && travelled + length >= half {
                return segment.start() + segment.to_vector() * ((half - travelled) / length);
            }
            travelled += length;
        }
        last.end()
    }
}

/// Axis-aligned bounding box of a trace map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MapLimits {
    /// Smallest X coordinate.
    pub xmin: f64,
    /// Largest X coordinate.
    pub xmax: f64,
    /// Smallest Y coordinate.
    pub ymin: f64,
    /// Largest Y coordinate.
    pub ymax: f64,
}

impl From<MapLimits> for (f64, f64, f64, f64) {
    fn from(value: MapLimits) -> Self {
        (value.xmin, value.xmax, value.ymin, value.ymax)
    }
}

/// A collection of traces digitised from one map.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TraceMap {
    /// Traces in load order.
    traces: Vec<Trace>,
}

impl TraceMap {
    /// Create a map from traces.
    #[must_use]
    pub fn new(traces: Vec<Trace>) -> Self {
        Self { traces }
    }

    /// Create a map where every segment is its own trace.
    pub fn from_segments<I: IntoIterator<Item = Segment>>(segments: I) -> Self {
        segments.into_iter().map(Trace::from_segment).collect()
    }

    /// Traces in load order.
    #[must_use]
    pub fn traces(&self) -> &[Trace] {
        &self.traces
    }

    /// Iterate over every segment of every trace.
    pub fn iter_segments(&self) -> impl Iterator<Item = &Segment> + '_ {
        self.traces.iter().flat_map(|trace| trace.segments.iter())
    }

    /// Flattened copy of every segment.
    #[must_use]
    pub fn segments(&self) -> Vec<Segment> {
        self.iter_segments().copied().collect()
    }

    /// Number of traces.
    #[must_use]
    pub fn trace_count(&self) -> usize {
        self.traces.len()
    }

    /// Number of segments over all traces.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.traces.iter().map(|trace| trace.segments.len()).sum()
    }

    /// Number of polyline vertices over all traces.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.traces.iter().map(Trace::node_count).sum()
    }

    /// Midpoint of every segment, in load order.
    #[must_use]
    pub fn segment_midpoints(&self) -> Vec<Point2<f64>> {
        self.iter_segments().map(Segment::midpoint).collect()
    }

    /// Along-length midpoint of every trace, in load order.
    #[must_use]
    pub fn trace_midpoints(&self) -> Vec<Point2<f64>> {
        self.traces.iter().map(Trace::midpoint).collect()
    }

    /// Returns `true` when the map holds no traces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    /// Bounding box over all segment endpoints; all zero for an empty map.
    ///
    /// # Examples
    /// ```
    /// use fracpaq::{segment, TraceMap};
    ///
    /// let map = TraceMap::from_segments([segment(0.0, 5.0, 2.0, -1.0)]);
    /// let limits: (f64, f64, f64, f64) = map.map_limits().into();
    /// assert_eq!(limits, (0.0, 2.0, -1.0, 5.0));
    ///
    /// let empty: (f64, f64, f64, f64) = TraceMap::default().map_limits().into();
    /// assert_eq!(empty, (0.0, 0.0, 0.0, 0.0));
    /// ```
    #[must_use]
    pub fn map_limits(&self) -> MapLimits {
        let mut endpoints = self
            .iter_segments()
            .flat_map(|segment| [segment.start(), segment.end()]);
        let Some(first) = endpoints.next() else {
            return MapLimits::default();
        };
        endpoints.fold(
            MapLimits {
                xmin: first.x,
                xmax: first.x,
                ymin: first.y,
                ymax: first.y,
            },
            |limits, point| MapLimits {
                xmin: limits.xmin.min(point.x),
                xmax: limits.xmax.max(point.x),
                ymin: limits.ymin.min(point.y),
                ymax: limits.ymax.max(point.y),
            },
        )
    }
}

impl FromIterator<Trace> for TraceMap {
    fn from_iter<I: IntoIterator<Item = Trace>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Convenience helper for creating [`Segment`] instances.
///
/// # Examples
/// ```
/// use fracpaq::segment;
///
/// let horizontal = segment(0.0, 0.0, 1.0, 0.0);
/// assert_eq!(horizontal.length(), 1.0);
/// assert_eq!(horizontal.angle_deg(), 0.0);
/// ```
#[must_use]
pub const fn segment(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
    Segment::new(x1, y1, x2, y2)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn angle_is_folded_into_half_turn() {
        assert_eq!(segment(0.0, 0.0, 1.0, 0.0).angle_deg(), 0.0);
        assert_eq!(segment(0.0, 0.0, -1.0, 0.0).angle_deg(), 0.0);
        assert_eq!(segment(0.0, 0.0, 0.0, -1.0).angle_deg(), 90.0);
        assert_relative_eq!(segment(0.0, 0.0, 1.0, -1.0).angle_deg(), 135.0, epsilon = 1.0e-12);
        assert_relative_eq!(segment(0.0, 0.0, -1.0, 1.0).angle_deg(), 135.0, epsilon = 1.0e-12);
    }

    #[test]
    fn angle_ignores_endpoint_order() {
        let segments = [
            segment(0.0, 0.0, 1.0, 0.0),
            segment(2.0, 3.0, -7.5, 1.25),
            segment(1.0, 1.0, 1.0 + 1.0e-9, 0.0),
            segment(-4.0, 0.0, 5.0, -1.0e-14),
        ];
        for s in segments {
            let angle = s.angle_deg();
            assert_eq!(angle, s.reversed().angle_deg());
            assert!((0.0..180.0).contains(&angle), "angle {angle} out of range");
        }
    }

    #[test]
    fn degenerate_segment_has_zero_length_and_angle() {
        let point = segment(4.0, 4.0, 4.0, 4.0);
        assert!(point.is_degenerate());
        assert_eq!(point.length(), 0.0);
        assert_eq!(point.angle_deg(), 0.0);
    }

    #[test]
    fn fold_snaps_signed_zero_and_full_turn() {
        assert_eq!(fold_half_turn(-0.0).to_bits(), 0.0_f64.to_bits());
        assert_eq!(fold_half_turn(-1.0e-15), 0.0);
        assert_eq!(fold_half_turn(180.0), 0.0);
        assert_relative_eq!(fold_half_turn(-135.0), 45.0);
    }

    #[test]
    fn trace_skips_duplicate_vertices() {
        let trace = Trace::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 2.0),
        ])
        .expect("trace has segments");
        assert_eq!(trace.segments().len(), 2);
        assert_eq!(trace.node_count(), 3);
        assert_relative_eq!(trace.total_length(), 3.0);
        assert_eq!(trace.orientations_deg(), vec![0.0, 90.0]);
    }

    #[test]
    fn segment_midpoint_ignores_direction() {
        let s = segment(-1.0, 2.0, 3.0, 6.0);
        assert_eq!(s.midpoint(), Point2::new(1.0, 4.0));
        assert_eq!(s.reversed().midpoint(), s.midpoint());
    }

    #[test]
    fn trace_midpoint_follows_cumulative_length() {
        let trace = Trace::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 8.0),
        ])
        .expect("polyline");
        assert_eq!(trace.midpoint(), Point2::new(2.0, 3.0));
        let single = Trace::from_segment(segment(1.0, 1.0, 3.0, 5.0));
        assert_eq!(single.midpoint(), Point2::new(2.0, 3.0));
    }

    #[test]
    fn trace_midpoint_skips_zero_length_pieces() {
        let trace = Trace::from_segments(vec![
            segment(0.0, 0.0, 0.0, 0.0),
            segment(0.0, 0.0, 0.0, 8.0),
            segment(0.0, 8.0, 0.0, 8.0),
        ])
        .expect("segments");
        assert_eq!(trace.midpoint(), Point2::new(0.0, 4.0));
    }

    #[test]
    fn zero_length_trace_uses_endpoint_average() {
        let trace = Trace::from_segments(vec![
            segment(0.0, 0.0, 0.0, 0.0),
            segment(4.0, 2.0, 4.0, 2.0),
        ])
        .expect("segments");
        assert_eq!(trace.midpoint(), Point2::new(2.0, 1.0));
        let point = Trace::from_segment(segment(5.0, 5.0, 5.0, 5.0));
        assert_eq!(point.midpoint(), Point2::new(5.0, 5.0));
    }

    #[test]
    fn unreachable_midpoint_falls_back_to_last_vertex() {
        let trace = Trace::from_segments(vec![
            segment(0.0, 0.0, 1.0, 0.0),
            segment(1.0, 0.0, f64::NAN, 0.0),
            segment(5.0, 5.0, 6.0, 7.0),
        ])
        .expect("segments");
        assert_eq!(trace.midpoint(), Point2::new(6.0, 7.0));
    }

    #[test]
    fn map_reports_midpoints_in_load_order() {
        let map = TraceMap::new(vec![
            Trace::from_segment(segment(0.0, 0.0, 2.0, 0.0)),
            Trace::from_points(&[
                Point2::new(0.0, 0.0),
                Point2::new(0.0, 2.0),
                Point2::new(2.0, 2.0),
            ])
            .expect("polyline"),
        ]);
        assert_eq!(
            map.segment_midpoints(),
            vec![Point2::new(1.0, 0.0), Point2::new(0.0, 1.0), Point2::new(1.0, 2.0)]
        );
        assert_eq!(
            map.trace_midpoints(),
            vec![Point2::new(1.0, 0.0), Point2::new(0.0, 2.0)]
        );
    }

    #[test]
    fn trace_requires_two_distinct_vertices() {
        assert!(Trace::from_points(&[]).is_none());
        assert!(Trace::from_points(&[Point2::new(1.0, 1.0), Point2::new(1.0, 1.0)]).is_none());
        assert!(Trace::from_segments(Vec::new()).is_none());
    }

    #[test]
    fn map_counts_and_limits() {
        let polyline = Trace::from_points(&[
            Point2::new(-2.0, 1.0),
            Point2::new(0.0, 3.0),
            Point2::new(4.0, 3.0),
        ])
        .expect("polyline");
        let map = TraceMap::new(vec![polyline, Trace::from_segment(segment(1.0, -5.0, 2.0, 0.0))]);
        assert_eq!(map.trace_count(), 2);
        assert_eq!(map.segment_count(), 3);
        assert_eq!(map.node_count(), 5);
        assert_eq!(
            map.map_limits(),
            MapLimits {
                xmin: -2.0,
                xmax: 4.0,
                ymin: -5.0,
                ymax: 3.0,
            }
        );
    }
}

//! Per-segment orientation and length statistics and the simple count rose.

use nalgebra::Point2;
use ndarray::Array1;
use serde::Serialize;

use crate::geometry::{MapLimits, Segment, TraceMap};

/// Folded orientation of each segment in degrees, in input order.
#[must_use]
pub fn orientations_deg(segments: &[Segment]) -> Vec<f64> {
    segments.iter().map(Segment::angle_deg).collect()
}

/// Length of each segment, in input order.
#[must_use]
pub fn lengths(segments: &[Segment]) -> Vec<f64> {
    segments.iter().map(Segment::length).collect()
}

/// Unweighted circular histogram of orientations.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoseHistogram {
    /// Bin edges in degrees, `bins + 1` values spanning `0..=360`.
    pub edges_deg: Array1<f64>,
    /// Bin centres in radians.
    pub theta: Array1<f64>,
    /// Number of (mirrored) angles per bin.
    pub counts: Array1<f64>,
}

impl RoseHistogram {
    /// Number of sectors.
    #[must_use]
    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    /// Sum of all bin counts.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.counts.sum()
    }
}

/// Histogram orientations into `bins` equal sectors covering the full circle.
///
/// With `bidirectional` set, angles are folded to `[0, 180)` and each one is counted
/// twice, once at its own azimuth and once at the opposite one. Otherwise angles are
/// wrapped to `[0, 360)` and counted once. Sectors are half-open except the last,
/// which also includes 360. A `bins` of zero is treated as one.
///
/// # Examples
/// ```
/// use fracpaq::rose_hist;
///
/// let rose = rose_hist(&[10.0, 100.0], 4, true);
/// assert_eq!(rose.counts.to_vec(), vec![1.0, 1.0, 1.0, 1.0]);
/// assert_eq!(rose.total(), 4.0);
/// ```
#[must_use]
pub fn rose_hist(angles_deg: &[f64], bins: usize, bidirectional: bool) -> RoseHistogram {
    let bins = bins.max(1);
    let edges_deg: Array1<f64> = Array1::linspace(0.0, 360.0, bins + 1);
    let theta = Array1::from_shape_fn(bins, |i| {
        (0.5 * (edges_deg[i] + edges_deg[i + 1])).to_radians()
    });
    let mut counts = Array1::<f64>::zeros(bins);

    let mirrored: Vec<f64> = if bidirectional {
        let folded: Vec<f64> = angles_deg.iter().map(|a| a.rem_euclid(180.0)).collect();
        folded
            .iter()
            .copied()
            .chain(folded.iter().map(|a| a + 180.0))
            .collect()
    } else {
        angles_deg.iter().map(|a| a.rem_euclid(360.0)).collect()
    };

    for angle in mirrored {
        if let Some(bin) = histogram_bin(&edges_deg, angle) {
            counts[bin] += 1.0;
        }
    }

    RoseHistogram {
        edges_deg,
        theta,
        counts,
    }
}

/// Locate `value` among uniform `edges`, correcting for rounding against the stored edges.
fn histogram_bin(edges: &Array1<f64>, value: f64) -> Option<usize> {
    let bins = edges.len() - 1;
    let (first, last) = (edges[0], edges[bins]);
    if !(first..=last).contains(&value) {
        return None;
    }
    let mut bin = (((value - first) / (last - first)) * bins as f64) as usize;
    bin = bin.min(bins - 1);
    if bin > 0 && value < edges[bin] {
        bin -= 1;
    } else if bin + 1 < bins && value >= edges[bin + 1] {
        bin += 1;
    }
    Some(bin)
}

/// Summary of segment lengths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct LengthSummary {
    /// Number of lengths summarised.
    pub count: usize,
    /// Sum of lengths.
    pub total: f64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Median (mean of the two central values for even counts).
    pub median: f64,
    /// Shortest length.
    pub min: f64,
    /// Longest length.
    pub max: f64,
}

impl LengthSummary {
    /// Summarise a set of lengths; every field is zero for empty input.
    #[must_use]
    pub fn from_lengths(lengths: &[f64]) -> Self {
        if lengths.is_empty() {
            return Self::default();
        }
        let mut sorted = lengths.to_vec();
        sorted.sort_by(f64::total_cmp);
        let count = sorted.len();
        let total: f64 = sorted.iter().sum();
        let median = if count % 2 == 1 {
            sorted[count / 2]
        } else {
            0.5 * (sorted[count / 2 - 1] + sorted[count / 2])
        };
        Self {
            count,
            total,
            mean: total / count as f64,
            median,
            min: sorted[0],
            max: sorted[count - 1],
        }
    }
}

/// Counts, extent and node positions of a loaded trace map.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MapSummary {
    /// Number of traces.
    pub traces: usize,
    /// Number of segments.
    pub segments: usize,
    /// Number of polyline vertices.
    pub nodes: usize,
    /// Bounding box of every endpoint.
    pub limits: MapLimits,
    /// Midpoint of every segment.
    pub segment_midpoints: Vec<Point2<f64>>,
    /// Along-length midpoint of every trace.
    pub trace_midpoints: Vec<Point2<f64>>,
}

impl MapSummary {
    /// Summarise a trace map.
    #[must_use]
    pub fn from_map(map: &TraceMap) -> Self {
        Self {
            traces: map.trace_count(),
            segments: map.segment_count(),
            nodes: map.node_count(),
            limits: map.map_limits(),
            segment_midpoints: map.segment_midpoints(),
            trace_midpoints: map.trace_midpoints(),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::Point2;
    use std::f64::consts::PI;

    use super::*;
    use crate::geometry::{segment, Trace};

    #[test]
    fn per_segment_maps_preserve_order() {
        let segments = [
            segment(0.0, 0.0, 0.0, 2.0),
            segment(0.0, 0.0, 3.0, 0.0),
            segment(0.0, 0.0, -1.0, -1.0),
        ];
        let angles = orientations_deg(&segments);
        assert_eq!(angles.len(), 3);
        assert_eq!(angles[0], 90.0);
        assert_eq!(angles[1], 0.0);
        assert_relative_eq!(angles[2], 45.0, epsilon = 1.0e-12);
        let lens = lengths(&segments);
        assert_eq!(lens[0], 2.0);
        assert_eq!(lens[1], 3.0);
        assert_relative_eq!(lens[2], 2.0_f64.sqrt());
        assert!(orientations_deg(&[]).is_empty());
    }

    #[test]
    fn bidirectional_rose_mirrors_each_angle() {
        let rose = rose_hist(&[5.0, 95.0, 185.0], 18, true);
        assert_eq!(rose.bins(), 18);
        assert_eq!(rose.total(), 6.0);
        // 185 folds to 5, so the 0-20 sector holds two entries and 180-200 two more.
        assert_eq!(rose.counts[0], 2.0);
        assert_eq!(rose.counts[9], 2.0);
        assert_eq!(rose.counts[4], 1.0);
        assert_eq!(rose.counts[13], 1.0);
    }

    #[test]
    fn centres_and_edges_follow_linspace() {
        let rose = rose_hist(&[], 4, true);
        assert_eq!(rose.edges_deg.to_vec(), vec![0.0, 90.0, 180.0, 270.0, 360.0]);
        assert_relative_eq!(rose.theta[0], PI / 4.0, epsilon = 1.0e-12);
        assert_relative_eq!(rose.theta[3], 7.0 * PI / 4.0, epsilon = 1.0e-12);
        assert_eq!(rose.total(), 0.0);
    }

    #[test]
    fn sector_edges_are_half_open() {
        let rose = rose_hist(&[90.0], 4, false);
        assert_eq!(rose.counts.to_vec(), vec![0.0, 1.0, 0.0, 0.0]);
        let rose = rose_hist(&[-90.0], 4, false);
        assert_eq!(rose.counts.to_vec(), vec![0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn zero_bins_falls_back_to_one_sector() {
        let rose = rose_hist(&[10.0, 20.0], 0, true);
        assert_eq!(rose.counts.to_vec(), vec![4.0]);
    }

    #[test]
    fn length_summary_handles_even_and_empty_inputs() {
        let summary = LengthSummary::from_lengths(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(summary.count, 4);
        assert_eq!(summary.total, 10.0);
        assert_eq!(summary.mean, 2.5);
        assert_eq!(summary.median, 2.5);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 4.0);
        assert_eq!(LengthSummary::from_lengths(&[]), LengthSummary::default());
        assert_eq!(LengthSummary::from_lengths(&[1.0, 9.0, 2.0]).median, 2.0);
    }

    #[test]
    fn map_summary_counts_nodes_per_trace() {
        let polyline = Trace::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 0.0),
        ])
        .expect("polyline");
        let map = TraceMap::new(vec![polyline]);
        let summary = MapSummary::from_map(&map);
        assert_eq!(summary.traces, 1);
        assert_eq!(summary.segments, 2);
        assert_eq!(summary.nodes, 3);
        assert_eq!(summary.limits.xmax, 2.0);
        assert_eq!(summary.limits.ymax, 1.0);
        assert_eq!(summary.segment_midpoints.len(), 2);
        assert_eq!(summary.trace_midpoints, vec![Point2::new(1.0, 1.0)]);
    }
}

use std::fmt;

use crate::analysis::AnalysisSummary;

/// Plain-text rendering of an [`AnalysisSummary`].
pub struct Report<'a>(pub &'a AnalysisSummary);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.0;

        // Start with what was loaded so the reader can sanity-check the input file.
        let map = &summary.map;
        writeln!(
            f,
            "Trace map: {} traces, {} segments, {} nodes",
            map.traces, map.segments, map.nodes
        )?;
        let limits = &map.limits;
        writeln!(
            f,
            "Extent: x {:.3} .. {:.3}, y {:.3} .. {:.3}",
            limits.xmin, limits.xmax, limits.ymin, limits.ymax
        )?;

        let lengths = &summary.lengths;
        writeln!(
            f,
            "Segment length: total {:.3}, mean {:.3}, median {:.3}, min {:.3}, max {:.3}",
            lengths.total, lengths.mean, lengths.median, lengths.min, lengths.max
        )?;

        let rose = &summary.orientation_rose;
        writeln!(f, "Orientation rose ({} sectors, mirrored):", rose.bins())?;
        for (i, count) in rose.counts.iter().enumerate() {
            writeln!(
                f,
                "  {:>5.1} - {:>5.1} deg: {count}",
                rose.edges_deg[i],
                rose.edges_deg[i + 1]
            )?;
        }

        // The stress state as used, flips included, followed by the Mohr construction.
        // See https://en.wikipedia.org/wiki/Mohr%27s_circle.
        let params = &summary.parameters;
        writeln!(
            f,
            "Stress: sigma1 = {:.2} MPa, sigma2 = {:.2} MPa, theta = {:.1} deg, flip x/y = {}/{}",
            params.sigma1, params.sigma2, params.theta_deg, params.flip.flip_x, params.flip.flip_y
        )?;
        writeln!(
            f,
            "Coulomb: C0 = {:.2} MPa, pf = {:.2} MPa, mu = {:.3}",
            params.cohesion, params.pore_pressure, params.friction
        )?;

        let mohr = &summary.mohr;
        writeln!(
            f,
            "Mohr circle: center {:.3} MPa, radius {:.3} MPa",
            mohr.circle.center, mohr.circle.radius
        )?;
        let [(x0, y0), (x1, y1)] = mohr.envelope_points;
        writeln!(f, "Failure envelope: ({x0:.3}, {y0:.3}) to ({x1:.3}, {y1:.3})")?;
        match mohr.intercept {
            Some(intercept) => writeln!(f, "Envelope meets tau = 0 at {intercept:.3} MPa")?,
            None => writeln!(f, "Envelope is horizontal (zero friction)")?,
        }

        writeln!(f, "Reference slip ratio: {:.4}", summary.slip_reference)?;
        writeln!(
            f,
            "Critically stressed: {} of {} segments",
            summary.critically_stressed, map.segments
        )?;

        // Empty sectors are left out; their radius and mean are zero.
        let scalar_rose = &summary.rose;
        let directional = &scalar_rose.rose;
        writeln!(
            f,
            "{} rose ({} sectors, outer ring {}%):",
            scalar_rose.scalar,
            directional.bins.len(),
            directional.reference.outer_percent
        )?;
        for (bin, level) in directional.bins.iter().zip(&scalar_rose.levels) {
            if bin.count == 0 {
                continue;
            }
            writeln!(
                f,
                "  {:>5.1} - {:>5.1} deg: n = {}, mean = {:.4}, r = {:.3}, level {level}",
                bin.start.to_degrees(),
                bin.end.to_degrees(),
                bin.count,
                bin.mean,
                bin.radius
            )?;
        }
        Ok(())
    }
}

/// Render the text report.
#[must_use]
pub fn render_summary(summary: &AnalysisSummary) -> String {
    Report(summary).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::run_analysis;
    use fracpaq::{segment, AnalysisConfig, RoseScalar, TraceMap};

    #[test]
    fn formats_human_readable_report() {
        let map = TraceMap::from_segments([
            segment(0.0, 0.0, 3.0, 4.0),
            segment(1.0, 1.0, 1.0, 2.0),
        ]);
        let summary = run_analysis(&map, &AnalysisConfig::default(), RoseScalar::SlipTendency)
            .expect("finite input");
        let report = render_summary(&summary);
        assert!(report.contains("Trace map: 2 traces, 2 segments, 4 nodes"));
        assert!(report.contains("total 6.000"));
        assert!(report.contains("Mohr circle: center 75.000 MPa, radius 25.000 MPa"));
        assert!(report.contains("slip-tendency rose (36 sectors"));
        assert!(report.contains("Critically stressed: 0 of 2 segments"));
    }
}

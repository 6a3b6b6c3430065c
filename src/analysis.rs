use fracpaq::{
    lengths, orientations_deg, project, rose_hist, AnalysisConfig, LengthSummary, MapSummary,
    MohrDiagram, ParameterError, RoseHistogram, RoseScalar, ScalarRose, StressParameters,
    TraceMap,
};
use serde::Serialize;

/// Everything the binary reports for one trace map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSummary {
    /// Counts and extent of the map.
    pub map: MapSummary,
    /// Segment length statistics.
    pub lengths: LengthSummary,
    /// Bidirectional orientation rose of the raw segment angles.
    pub orientation_rose: RoseHistogram,
    /// Parameters the stress projection used, flips included.
    pub parameters: StressParameters,
    /// Mohr circle and failure envelope.
    pub mohr: MohrDiagram,
    /// Reference maximum slip ratio.
    pub slip_reference: f64,
    /// Number of critically stressed segments.
    pub critically_stressed: usize,
    /// Equal-area rose of the requested scalar.
    pub rose: ScalarRose,
}

/// Compute the map statistics and the stress projection for `map`.
pub fn run_analysis(
    map: &TraceMap,
    config: &AnalysisConfig,
    scalar: RoseScalar,
) -> Result<AnalysisSummary, ParameterError> {
    let segments = map.segments();
    let parameters = config.parameters();
    let projection = project(&segments, &parameters)?;

    Ok(AnalysisSummary {
        map: MapSummary::from_map(map),
        lengths: LengthSummary::from_lengths(&lengths(&segments)),
        orientation_rose: rose_hist(&orientations_deg(&segments), config.rose.bins, true),
        parameters,
        mohr: MohrDiagram::new(&parameters),
        slip_reference: projection.slip_reference(),
        critically_stressed: projection.critically_stressed_count(),
        rose: projection.rose(scalar, config.rose.dir_bins),
    })
}

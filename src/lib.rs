#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_doc_code_examples)]
#![warn(clippy::missing_docs_in_private_items)]
#![doc = include_str!("../README.md")]

pub mod config;
pub mod errors;
pub mod flip;
pub mod geometry;
pub mod io;
pub mod rose;
pub mod stats;
pub mod stress;

pub use config::{AnalysisConfig, RoseConfig, ORIENTATION_ROSE_BINS};
pub use errors::{ConfigError, LoadError, ParameterError, ParseScalarError};
pub use flip::AxisFlip;
pub use geometry::{segment, MapLimits, Segment, Trace, TraceMap};
pub use io::{parse_segments, parse_traces, read_map, read_segments_txt, read_traces_txt};
pub use rose::{
    count_rose, ColorScale, DirectionalBin, DirectionalRose, ReferenceRing, ReferenceRings,
    RoseScalar, ScalarRose, REFERENCE_LADDER, STRESS_ROSE_BINS,
};
pub use stats::{lengths, orientations_deg, rose_hist, LengthSummary, MapSummary, RoseHistogram};
pub use stress::{
    north_azimuth_deg, project, resolve_stress, slip_ratio, FailureEnvelope, FractureStress,
    MohrCircle, MohrDiagram, StressParameters, StressProjection,
};

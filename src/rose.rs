//! Equal-area rose diagrams of per-segment scalars.
//!
//! Azimuths are mirrored onto the full circle, binned into sectors numbered clockwise
//! from north, and each sector is given a radius proportional to the square root of
//! its share of the total so that sector area tracks frequency.

use std::fmt;
use std::str::FromStr;

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ParseScalarError;
use crate::flip::AxisFlip;
use crate::geometry::Segment;
use crate::stress::{north_azimuth_deg, FractureStress, StressProjection};

/// Sector count used for stress roses.
pub const STRESS_ROSE_BINS: usize = 36;

/// Candidate outer reference rings, in percent of the total count.
pub const REFERENCE_LADDER: [u32; 6] = [1, 5, 10, 20, 30, 50];

/// Slack allowed when comparing a percentage against a ladder value.
const LADDER_TOLERANCE: f64 = 1.0e-9;

/// Scalar attached to each segment when building a rose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoseScalar {
    /// Every segment weighs one.
    Count,
    /// Normalised slip tendency.
    SlipTendency,
    /// Dilation tendency.
    DilationTendency,
    /// Fracture susceptibility.
    Susceptibility,
    /// Critically-stressed flag (1 or 0).
    CriticallyStressed,
}

impl RoseScalar {
    /// Every scalar, in report order.
    pub const ALL: [Self; 5] = [
        Self::Count,
        Self::SlipTendency,
        Self::DilationTendency,
        Self::Susceptibility,
        Self::CriticallyStressed,
    ];

    /// Short machine-readable name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::SlipTendency => "slip-tendency",
            Self::DilationTendency => "dilation-tendency",
            Self::Susceptibility => "susceptibility",
            Self::CriticallyStressed => "csf",
        }
    }
}

impl fmt::Display for RoseScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RoseScalar {
    type Err = ParseScalarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "count" => Ok(Self::Count),
            "slip-tendency" | "slip" | "ts" => Ok(Self::SlipTendency),
            "dilation-tendency" | "dilation" | "td" => Ok(Self::DilationTendency),
            "susceptibility" | "sf" => Ok(Self::Susceptibility),
            "csf" | "critically-stressed" => Ok(Self::CriticallyStressed),
            _ => Err(ParseScalarError(s.to_string())),
        }
    }
}

/// One azimuthal sector of a rose.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DirectionalBin {
    /// Sector start, radians clockwise from north.
    pub start: f64,
    /// Sector end, radians clockwise from north.
    pub end: f64,
    /// Number of mirrored azimuths in the sector.
    pub count: usize,
    /// Mean scalar of the members, zero for an empty sector.
    pub mean: f64,
    /// Share of all mirrored azimuths.
    pub fraction: f64,
    /// Equal-area radius, `sqrt(fraction)`.
    pub radius: f64,
}

/// A concentric reference ring.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ReferenceRing {
    /// Percentage the ring stands for.
    pub percent: u32,
    /// Equal-area radius of the ring.
    pub radius: f64,
}

/// Reference rings up to the adaptively chosen outer ring.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReferenceRings {
    /// Ladder value chosen as the plot rim.
    pub outer_percent: u32,
    /// Radial limit of the plot.
    pub outer_radius: f64,
    /// Rings for every ladder value up to the rim, innermost first.
    pub rings: Vec<ReferenceRing>,
}

impl ReferenceRings {
    /// Choose the smallest ladder value at or above the largest sector share.
    ///
    /// Shares above the last ladder value fall back to it.
    ///
    /// # Examples
    /// ```
    /// use fracpaq::ReferenceRings;
    ///
    /// let rings = ReferenceRings::for_max_fraction(0.25);
    /// assert_eq!(rings.outer_percent, 30);
    /// assert_eq!(rings.rings.len(), 5);
    /// assert_eq!(ReferenceRings::for_max_fraction(0.8).outer_percent, 50);
    /// ```
    #[must_use]
    pub fn for_max_fraction(max_fraction: f64) -> Self {
        let percent = max_fraction * 100.0;
        let last = REFERENCE_LADDER[REFERENCE_LADDER.len() - 1];
        let outer_percent = REFERENCE_LADDER
            .iter()
            .copied()
            .find(|&level| percent <= f64::from(level) + LADDER_TOLERANCE)
            .unwrap_or(last);
        let rings = REFERENCE_LADDER
            .iter()
            .copied()
            .take_while(|&level| level <= outer_percent)
            .map(|percent| ReferenceRing {
                percent,
                radius: ring_radius(percent),
            })
            .collect();
        Self {
            outer_percent,
            outer_radius: ring_radius(outer_percent),
            rings,
        }
    }
}

/// Equal-area radius of a ring standing for `percent` of the total.
fn ring_radius(percent: u32) -> f64 {
    (f64::from(percent) / 100.0).sqrt()
}

/// Sectors of an equal-area rose together with its reference rings.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DirectionalRose {
    /// Sectors clockwise from north.
    pub bins: Vec<DirectionalBin>,
    /// Number of mirrored azimuths over all sectors.
    pub total_count: usize,
    /// Largest sector share.
    pub max_fraction: f64,
    /// Reference rings chosen for `max_fraction`.
    pub reference: ReferenceRings,
}

impl DirectionalRose {
    /// Aggregate `(azimuth_deg, value)` samples into `dir_bins` sectors.
    ///
    /// Each azimuth (north-referenced, degrees) is counted twice, once as given and
    /// once rotated by 180 degrees, carrying the same value. Non-finite azimuths are
    /// ignored. An empty input yields well-formed all-zero sectors. A `dir_bins` of zero
    /// is treated as one.
    ///
    /// # Examples
    /// ```
    /// use fracpaq::DirectionalRose;
    ///
    /// let rose = DirectionalRose::aggregate([(0.0, 1.0), (90.0, 1.0)], 4);
    /// assert!(rose.bins.iter().all(|bin| bin.count == 1));
    /// assert_eq!(rose.bins[0].radius, 0.5);
    /// assert_eq!(rose.reference.outer_percent, 30);
    /// ```
    pub fn aggregate<I>(samples: I, dir_bins: usize) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let dir_bins = dir_bins.max(1);
        let width_deg = 360.0 / dir_bins as f64;
        let mut counts = vec![0_usize; dir_bins];
        let mut sums = vec![0.0_f64; dir_bins];

        for (azimuth, value) in samples {
            if !azimuth.is_finite() {
                continue;
            }
            for mirrored in [azimuth, azimuth + 180.0] {
                let theta = mirrored.rem_euclid(360.0);
                let bin = (theta / width_deg).floor() as usize % dir_bins;
                counts[bin] += 1;
                sums[bin] += value;
            }
        }

        let total_count: usize = counts.iter().sum();
        let edges = Array1::linspace(0.0, 360.0, dir_bins + 1).mapv(f64::to_radians);
        let bins: Vec<DirectionalBin> = counts
            .iter()
            .zip(&sums)
            .enumerate()
            .map(|(i, (&count, &sum))| {
                let fraction = if total_count > 0 {
                    count as f64 / total_count as f64
                } else {
                    0.0
                };
                DirectionalBin {
                    start: edges[i],
                    end: edges[i + 1],
                    count,
                    mean: if count > 0 { sum / count as f64 } else { 0.0 },
                    fraction,
                    radius: fraction.sqrt(),
                }
            })
            .collect();
        let max_fraction = bins.iter().map(|bin| bin.fraction).fold(0.0, f64::max);
        let reference = ReferenceRings::for_max_fraction(max_fraction);

        debug!(
            dir_bins,
            total_count,
            max_fraction,
            outer_percent = reference.outer_percent,
            "aggregated directional rose"
        );

        Self {
            bins,
            total_count,
            max_fraction,
            reference,
        }
    }

    /// Sector edges in radians, `bins + 1` values.
    #[must_use]
    pub fn edges(&self) -> Vec<f64> {
        let mut edges: Vec<f64> = self.bins.iter().map(|bin| bin.start).collect();
        if let Some(last) = self.bins.last() {
            edges.push(last.end);
        }
        edges
    }

    /// Sector counts.
    #[must_use]
    pub fn counts(&self) -> Vec<usize> {
        self.bins.iter().map(|bin| bin.count).collect()
    }

    /// Sector means.
    #[must_use]
    pub fn means(&self) -> Vec<f64> {
        self.bins.iter().map(|bin| bin.mean).collect()
    }

    /// Sector radii.
    #[must_use]
    pub fn radii(&self) -> Vec<f64> {
        self.bins.iter().map(|bin| bin.radius).collect()
    }
}

/// Orientation rose of raw segments, every segment weighing one.
///
/// Azimuths are converted from the X-axis angle to north and flipped before binning.
#[must_use]
pub fn count_rose(segments: &[Segment], flip: AxisFlip, dir_bins: usize) -> DirectionalRose {
    DirectionalRose::aggregate(
        segments.iter().map(|segment| {
            let azimuth = north_azimuth_deg(segment.angle_deg());
            (flip.apply_deg(azimuth), 1.0)
        }),
        dir_bins,
    )
}

/// Discrete colour levels for sector means.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ColorScale {
    /// One colour for every sector.
    Uniform,
    /// Equal levels on `[0, 1]`.
    Unit {
        /// Number of levels.
        levels: usize,
    },
    /// Equal levels on a data range.
    Range {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
        /// Number of levels.
        levels: usize,
    },
    /// Two classes split at 0.5.
    Classes,
}

impl ColorScale {
    /// Level count used for continuous scalars on a rose with `dir_bins` sectors.
    #[must_use]
    pub const fn continuous_levels(dir_bins: usize) -> usize {
        dir_bins / 2 + 1
    }

    /// Range scale over `[min, max]`, widened to one unit when degenerate.
    #[must_use]
    pub fn range(min: f64, max: f64, levels: usize) -> Self {
        let max = if (max - min).abs() < 1.0e-12 { min + 1.0 } else { max };
        Self::Range { min, max, levels }
    }

    /// Number of discrete levels.
    #[must_use]
    pub fn level_count(&self) -> usize {
        match *self {
            Self::Uniform => 1,
            Self::Unit { levels } | Self::Range { levels, .. } => levels.max(1),
            Self::Classes => 2,
        }
    }

    /// Level boundaries, `level_count() + 1` values.
    #[must_use]
    pub fn boundaries(&self) -> Vec<f64> {
        let levels = self.level_count();
        match *self {
            Self::Uniform => vec![0.0, 1.0],
            Self::Unit { .. } => Array1::linspace(0.0, 1.0, levels + 1).to_vec(),
            Self::Range { min, max, .. } => Array1::linspace(min, max, levels + 1).to_vec(),
            Self::Classes => vec![-0.5, 0.5, 1.5],
        }
    }

    /// Level of `value`, clipped to the first and last level.
    ///
    /// # Examples
    /// ```
    /// use fracpaq::ColorScale;
    ///
    /// assert_eq!(ColorScale::Classes.level(0.5), 1);
    /// assert_eq!(ColorScale::Classes.level(0.49), 0);
    /// assert_eq!(ColorScale::Unit { levels: 4 }.level(0.6), 2);
    /// assert_eq!(ColorScale::Unit { levels: 4 }.level(7.0), 3);
    /// ```
    #[must_use]
    pub fn level(&self, value: f64) -> usize {
        if matches!(self, Self::Uniform) {
            return 0;
        }
        let boundaries = self.boundaries();
        let above = boundaries.partition_point(|&bound| bound <= value);
        above.saturating_sub(1).min(self.level_count() - 1)
    }

    /// Colour-bar tick positions.
    #[must_use]
    pub fn ticks(&self) -> Vec<f64> {
        match *self {
            Self::Uniform => Vec::new(),
            Self::Unit { .. } => Array1::linspace(0.0, 1.0, 11).to_vec(),
            Self::Range { min, max, .. } => nice_ticks(min, max, 8),
            Self::Classes => vec![0.0, 1.0],
        }
    }
}

/// Round tick positions (1, 2 or 5 times a power of ten) covering `[min, max]`.
///
/// Ticks start at the first multiple of the step not below `min` and extend to the
/// first multiple at or above `max`.
fn nice_ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    let span = (max - min).max(1.0e-12);
    let base = 10.0_f64.powf((span / target as f64).log10().floor());
    let mut best: Option<(usize, f64)> = None;
    for multiple in [1.0, 2.0, 5.0, 10.0] {
        let step = multiple * base;
        let count = ((max / step).floor() - (min / step).ceil() + 1.0).max(0.0) as usize;
        let score = count.abs_diff(target);
        if best.map_or(true, |(best_score, _)| score < best_score) {
            best = Some((score, step));
        }
    }
    let Some((_, step)) = best else {
        return vec![min, max];
    };
    let start = (min / step).ceil() * step;
    let end = (max / step).ceil() * step;
    let ticks: Vec<f64> = (0_u32..)
        .map(|i| start + f64::from(i) * step)
        .take_while(|&tick| tick < end + 0.5 * step)
        .map(|tick| (tick * 1.0e10).round() / 1.0e10)
        .collect();
    if ticks.len() >= 2 {
        ticks
    } else {
        vec![min, max]
    }
}

/// Rose of one scalar together with its colour scale and per-sector levels.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScalarRose {
    /// Scalar that was aggregated.
    pub scalar: RoseScalar,
    /// Sectors and reference rings.
    pub rose: DirectionalRose,
    /// Colour scale for sector means.
    pub scale: ColorScale,
    /// Colour level of every sector.
    pub levels: Vec<usize>,
}

impl StressProjection {
    /// Aggregate one per-segment scalar into an equal-area rose.
    ///
    /// Sectors use the flip-adjusted azimuths of the projection.
    ///
    /// # Examples
    /// ```
    /// use fracpaq::{project, segment, RoseScalar, StressParameters, STRESS_ROSE_BINS};
    ///
    /// let segments = [segment(0.0, 0.0, 1.0, 0.0), segment(0.0, 0.0, 1.0, 1.0)];
    /// let projection = project(&segments, &StressParameters::default())?;
    /// let rose = projection.rose(RoseScalar::SlipTendency, STRESS_ROSE_BINS);
    /// assert_eq!(rose.rose.total_count, 4);
    /// assert_eq!(rose.levels.len(), 36);
    /// # Ok::<(), fracpaq::ParameterError>(())
    /// ```
    #[must_use]
    pub fn rose(&self, scalar: RoseScalar, dir_bins: usize) -> ScalarRose {
        let dir_bins = dir_bins.max(1);
        let value: fn(&FractureStress) -> f64 = match scalar {
            RoseScalar::Count => |_| 1.0,
            RoseScalar::SlipTendency => |f| f.slip_tendency,
            RoseScalar::DilationTendency => |f| f.dilation_tendency,
            RoseScalar::Susceptibility => |f| f.susceptibility,
            RoseScalar::CriticallyStressed => |f| f64::from(u8::from(f.critically_stressed)),
        };
        let rose = DirectionalRose::aggregate(
            self.fractures().iter().map(|f| (f.azimuth_deg, value(f))),
            dir_bins,
        );
        let levels = ColorScale::continuous_levels(dir_bins);
        let scale = match scalar {
            RoseScalar::Count => ColorScale::Uniform,
            RoseScalar::SlipTendency | RoseScalar::DilationTendency => ColorScale::Unit { levels },
            RoseScalar::Susceptibility => match self.susceptibility_range() {
                Some((min, max)) => ColorScale::range(min, max, levels),
                None => ColorScale::range(0.0, 1.0, levels),
            },
            RoseScalar::CriticallyStressed => ColorScale::Classes,
        };
        let sector_levels = rose.bins.iter().map(|bin| scale.level(bin.mean)).collect();
        ScalarRose {
            scalar,
            rose,
            scale,
            levels: sector_levels,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    use super::*;
    use crate::geometry::segment;
    use crate::stress::{project, StressParameters};

    #[test]
    fn cardinal_azimuths_fill_four_sectors_evenly() {
        let rose =
            DirectionalRose::aggregate([0.0, 90.0, 180.0, 270.0].map(|a| (a, 1.0)), 4);
        assert_eq!(rose.total_count, 8);
        for bin in &rose.bins {
            assert_eq!(bin.count, 2);
            assert_eq!(bin.fraction, 0.25);
            assert_eq!(bin.radius, 0.5);
            assert_eq!(bin.mean, 1.0);
        }
        assert_eq!(rose.reference.outer_percent, 30);
        assert_relative_eq!(rose.reference.outer_radius, 0.3_f64.sqrt());
        let expected = [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2, 2.0 * PI];
        for (edge, want) in rose.edges().iter().zip(expected) {
            assert_relative_eq!(*edge, want, epsilon = 1.0e-12);
        }
    }

    #[test]
    fn empty_rose_is_well_formed() {
        let rose = DirectionalRose::aggregate(std::iter::empty(), STRESS_ROSE_BINS);
        assert_eq!(rose.bins.len(), STRESS_ROSE_BINS);
        assert_eq!(rose.total_count, 0);
        assert!(rose
            .bins
            .iter()
            .all(|bin| bin.count == 0 && bin.mean == 0.0 && bin.radius == 0.0));
        assert_eq!(rose.max_fraction, 0.0);
        assert_eq!(rose.reference.outer_percent, 1);
        assert_eq!(rose.reference.rings.len(), 1);
    }

    #[test]
    fn fractions_sum_to_one() {
        let samples = (0..97).map(|i| (i as f64 * 7.3, (i % 5) as f64));
        let rose = DirectionalRose::aggregate(samples, STRESS_ROSE_BINS);
        let sum: f64 = rose.bins.iter().map(|bin| bin.fraction).sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1.0e-12);
        assert_eq!(rose.total_count, 194);
    }

    #[test]
    fn sector_means_average_mirrored_members() {
        let rose = DirectionalRose::aggregate([(5.0, 1.0), (8.0, 0.0), (95.0, 0.2)], 4);
        assert_eq!(rose.counts(), vec![2, 1, 2, 1]);
        assert_relative_eq!(rose.bins[0].mean, 0.5);
        assert_relative_eq!(rose.bins[1].mean, 0.2);
        assert_relative_eq!(rose.bins[2].mean, 0.5);
    }

    #[test]
    fn ladder_picks_smallest_sufficient_ring() {
        assert_eq!(ReferenceRings::for_max_fraction(0.0).outer_percent, 1);
        assert_eq!(ReferenceRings::for_max_fraction(0.01).outer_percent, 1);
        assert_eq!(ReferenceRings::for_max_fraction(0.011).outer_percent, 5);
        assert_eq!(ReferenceRings::for_max_fraction(0.2).outer_percent, 20);
        assert_eq!(ReferenceRings::for_max_fraction(0.25).outer_percent, 30);
        assert_eq!(ReferenceRings::for_max_fraction(0.5).outer_percent, 50);
        assert_eq!(ReferenceRings::for_max_fraction(1.0).outer_percent, 50);
        let rings = ReferenceRings::for_max_fraction(0.07);
        let percents: Vec<u32> = rings.rings.iter().map(|ring| ring.percent).collect();
        assert_eq!(percents, vec![1, 5, 10]);
        assert_relative_eq!(rings.rings[0].radius, 0.1);
    }

    #[test]
    fn color_scales_partition_their_range() {
        let unit = ColorScale::Unit {
            levels: ColorScale::continuous_levels(36),
        };
        assert_eq!(unit.level_count(), 19);
        assert_eq!(unit.boundaries().len(), 20);
        assert_eq!(unit.level(0.0), 0);
        assert_eq!(unit.level(1.0), 18);
        assert_eq!(unit.level(-3.0), 0);
        assert_eq!(unit.ticks().len(), 11);

        let flat = ColorScale::range(4.0, 4.0, 3);
        assert_eq!(flat, ColorScale::Range { min: 4.0, max: 5.0, levels: 3 });
        assert_eq!(ColorScale::Uniform.level(123.0), 0);
        assert_eq!(ColorScale::Classes.ticks(), vec![0.0, 1.0]);
    }

    #[test]
    fn nice_ticks_use_round_steps() {
        assert_eq!(
            nice_ticks(0.0, 100.0, 8),
            vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]
        );
        let ticks = nice_ticks(-13.0, 42.0, 8);
        assert_eq!(ticks.first().copied(), Some(-10.0));
        assert_eq!(ticks.last().copied(), Some(50.0));
        assert!(ticks.windows(2).all(|pair| (pair[1] - pair[0] - 10.0).abs() < 1.0e-9));
    }

    #[test]
    fn csf_rose_classifies_sector_majority() {
        let params = StressParameters {
            sigma1: 60.0,
            sigma2: 10.0,
            pore_pressure: 15.0,
            cohesion: 2.0,
            ..StressParameters::default()
        };
        let segments: Vec<_> = (0..36)
            .map(|i| {
                let angle = (i as f64 * 5.0).to_radians();
                segment(0.0, 0.0, angle.cos(), angle.sin())
            })
            .collect();
        let projection = project(&segments, &params).expect("finite input");
        let rose = projection.rose(RoseScalar::CriticallyStressed, STRESS_ROSE_BINS);
        assert_eq!(rose.scale, ColorScale::Classes);
        for (bin, level) in rose.rose.bins.iter().zip(&rose.levels) {
            assert_eq!(*level == 1, bin.mean >= 0.5);
        }
        assert!(rose.levels.contains(&1));
        assert!(rose.levels.contains(&0));
    }

    #[test]
    fn count_rose_matches_projection_count_rose() {
        let segments = [
            segment(0.0, 0.0, 1.0, 0.2),
            segment(0.0, 0.0, -0.4, 1.0),
            segment(3.0, 3.0, 1.0, 0.0),
        ];
        let flip = AxisFlip::new(true, false);
        let params = StressParameters {
            flip,
            ..StressParameters::default()
        };
        let projection = project(&segments, &params).expect("finite input");
        let from_projection = projection.rose(RoseScalar::Count, 12);
        assert_eq!(from_projection.rose, count_rose(&segments, flip, 12));
        assert!(from_projection.levels.iter().all(|&level| level == 0));
    }

    #[test]
    fn scalar_names_round_trip_through_from_str() {
        for scalar in RoseScalar::ALL {
            assert_eq!(scalar.name().parse::<RoseScalar>(), Ok(scalar));
        }
        assert_eq!("TS".parse::<RoseScalar>(), Ok(RoseScalar::SlipTendency));
        assert!("porosity".parse::<RoseScalar>().is_err());
    }
}

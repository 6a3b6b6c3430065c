//! Projection of a regional 2-D stress state onto fracture segments.
//!
//! Every fracture is treated as a plane whose strike is the north-referenced azimuth of
//! its segment. The principal stress `sigma1` acts along azimuth `theta_deg` and
//! `sigma2` perpendicular to it. Normal and shear stress follow from the Mohr-circle
//! projection; slip tendency, dilation tendency, fracture susceptibility and the
//! critically-stressed classification are derived from them.
//!
//! Slip tendency is normalised against a reference pass that ignores both `theta_deg`
//! and the axis flips, so the colour scale of a map does not change while the operator
//! rotates the stress field.

use std::f64::consts::PI;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ParameterError;
use crate::flip::AxisFlip;
use crate::geometry::{fold_half_turn, Segment};

/// Differences of principal stresses below this are treated as an isotropic state.
pub const ISOTROPIC_TOLERANCE: f64 = 1.0e-12;

/// Friction coefficients with magnitude below this are replaced by it when dividing.
pub const FRICTION_EPSILON: f64 = 1.0e-12;

/// Regional stress state, failure criterion and viewing convention for one analysis.
///
/// Stresses share one unit (MPa in the reports). Values are not range-checked; only
/// non-finite numbers are rejected by [`StressParameters::validate`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StressParameters {
    /// Maximum principal stress.
    pub sigma1: f64,
    /// Minimum principal stress.
    pub sigma2: f64,
    /// Azimuth of `sigma1` in degrees clockwise from north.
    pub theta_deg: f64,
    /// Cohesion `C0` of the Coulomb criterion.
    pub cohesion: f64,
    /// Pore fluid pressure `pf`.
    pub pore_pressure: f64,
    /// Coefficient of friction `mu`.
    pub friction: f64,
    /// Mirrored viewing convention applied before projection.
    pub flip: AxisFlip,
}

impl Default for StressParameters {
    fn default() -> Self {
        Self {
            sigma1: 100.0,
            sigma2: 50.0,
            theta_deg: 0.0,
            cohesion: 0.0,
            pore_pressure: 0.0,
            friction: 0.6,
            flip: AxisFlip::NONE,
        }
    }
}

impl StressParameters {
    /// Check that every numeric parameter is finite.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::NonFiniteParameter`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ParameterError> {
        let fields = [
            ("sigma1", self.sigma1),
            ("sigma2", self.sigma2),
            ("theta_deg", self.theta_deg),
            ("cohesion", self.cohesion),
            ("pore_pressure", self.pore_pressure),
            ("friction", self.friction),
        ];
        match fields.iter().find(|(_, value)| !value.is_finite()) {
            Some(&(name, value)) => Err(ParameterError::NonFiniteParameter { name, value }),
            None => Ok(()),
        }
    }

    /// Friction coefficient safe to divide by.
    #[must_use]
    pub fn effective_friction(&self) -> f64 {
        if self.friction.abs() > FRICTION_EPSILON {
            self.friction
        } else {
            FRICTION_EPSILON
        }
    }

    /// Mohr circle of the principal stresses.
    #[must_use]
    pub fn mohr_circle(&self) -> MohrCircle {
        MohrCircle::from_principal(self.sigma1, self.sigma2)
    }

    /// Linear Coulomb failure envelope.
    #[must_use]
    pub fn failure_envelope(&self) -> FailureEnvelope {
        FailureEnvelope {
            friction: self.friction,
            cohesion: self.cohesion,
            pore_pressure: self.pore_pressure,
        }
    }

    /// Normal and shear stress on a plane with north azimuth `azimuth_deg`.
    #[must_use]
    pub fn resolve(&self, azimuth_deg: f64) -> (f64, f64) {
        resolve_stress(self.sigma1, self.sigma2, azimuth_deg + 90.0 - self.theta_deg)
    }

    /// Dilation tendency for a plane carrying normal stress `normal_stress`.
    ///
    /// Evaluated on halved stresses, so any finite input gives a value in `[0, 1]`.
    #[must_use]
    pub fn dilation_tendency(&self, normal_stress: f64) -> f64 {
        let half_difference = 0.5 * self.sigma1 - 0.5 * self.sigma2;
        let denominator = if half_difference.abs() > 0.5 * ISOTROPIC_TOLERANCE {
            half_difference
        } else {
            0.5
        };
        unit_clamp((0.5 * self.sigma1 - 0.5 * normal_stress) / denominator)
    }

    /// Pore-pressure increase needed to bring a plane to Coulomb failure.
    #[must_use]
    pub fn susceptibility(&self, normal_stress: f64, shear_stress: f64) -> f64 {
        normal_stress.abs()
            - self.pore_pressure
            - (shear_stress.abs() - self.cohesion) / self.effective_friction()
    }
}

/// North-referenced azimuth in `[0, 180)` of a segment whose X-axis angle is `angle_x_deg`.
#[must_use]
pub fn north_azimuth_deg(angle_x_deg: f64) -> f64 {
    fold_half_turn(90.0 - angle_x_deg)
}

/// Normal and shear stress on a plane at `alpha_deg` from the `sigma1` direction.
///
/// # Examples
/// ```
/// use fracpaq::resolve_stress;
///
/// let (normal, shear) = resolve_stress(100.0, 50.0, 45.0);
/// assert!((normal - 75.0).abs() < 1e-9);
/// assert!((shear + 25.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn resolve_stress(sigma1: f64, sigma2: f64, alpha_deg: f64) -> (f64, f64) {
    let (sin, cos) = sin_cos_deg(2.0 * alpha_deg);
    let mean = 0.5 * sigma1 + 0.5 * sigma2;
    let deviator = 0.5 * sigma1 - 0.5 * sigma2;
    (mean + deviator * cos, -deviator * sin)
}

/// Sine and cosine of an angle in degrees, exact on multiples of 90.
fn sin_cos_deg(angle_deg: f64) -> (f64, f64) {
    let reduced = angle_deg.rem_euclid(360.0);
    if reduced == 0.0 || reduced == 360.0 {
        (0.0, 1.0)
    } else if reduced == 90.0 {
        (1.0, 0.0)
    } else if reduced == 180.0 {
        (0.0, -1.0)
    } else if reduced == 270.0 {
        (-1.0, 0.0)
    } else {
        reduced.to_radians().sin_cos()
    }
}

/// Raw slip tendency `|tau| / |sigma_n|`, zero when the normal stress vanishes.
///
/// Ratios that overflow are capped at `f64::MAX`.
#[must_use]
pub fn slip_ratio(normal_stress: f64, shear_stress: f64) -> f64 {
    if normal_stress.abs() > 0.0 {
        (shear_stress.abs() / normal_stress.abs()).min(f64::MAX)
    } else {
        0.0
    }
}

/// Clamp into `[0, 1]`, mapping NaN to 0.
fn unit_clamp(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Stress state resolved on one fracture segment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FractureStress {
    /// North azimuth in degrees after the axis flip, in `[0, 360)`.
    pub azimuth_deg: f64,
    /// Normal stress `sigma_n`.
    pub normal_stress: f64,
    /// Shear stress `tau`.
    pub shear_stress: f64,
    /// Raw slip tendency `|tau| / |sigma_n|`.
    pub slip_ratio: f64,
    /// Slip tendency normalised by the reference maximum, in `[0, 1]`.
    pub slip_tendency: f64,
    /// Dilation tendency, in `[0, 1]`.
    pub dilation_tendency: f64,
    /// Fracture susceptibility (pore-pressure increase to failure).
    pub susceptibility: f64,
    /// Whether the fracture already meets the failure criterion.
    pub critically_stressed: bool,
}

/// Result of projecting a stress state onto every segment of a map.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StressProjection {
    /// Parameters the projection was computed with.
    parameters: StressParameters,
    /// Reference maximum slip ratio used for normalisation.
    slip_reference: f64,
    /// Per-segment results in input order.
    fractures: Vec<FractureStress>,
}

/// Project `parameters` onto every segment.
///
/// The result holds one [`FractureStress`] per segment in input order. An empty input
/// yields an empty projection.
///
/// # Errors
///
/// Returns [`ParameterError`] when a parameter or a segment coordinate is not finite.
///
/// # Examples
/// ```
/// use fracpaq::{project, segment, StressParameters};
///
/// let segments = [segment(0.0, 0.0, 1.0, 0.0), segment(0.0, 0.0, 1.0, 1.0)];
/// let projection = project(&segments, &StressParameters::default())?;
/// assert_eq!(projection.len(), 2);
/// assert!((projection.fractures()[0].normal_stress - 100.0).abs() < 1e-9);
/// assert!(!projection.fractures()[0].critically_stressed);
/// # Ok::<(), fracpaq::ParameterError>(())
/// ```
pub fn project(
    segments: &[Segment],
    parameters: &StressParameters,
) -> Result<StressProjection, ParameterError> {
    parameters.validate()?;
    if let Some(index) = segments.iter().position(|segment| !segment.is_finite()) {
        return Err(ParameterError::NonFiniteSegment { index });
    }

    let unflipped: Vec<f64> = segments
        .par_iter()
        .map(|segment| north_azimuth_deg(segment.angle_deg()))
        .collect();

    let slip_reference = slip_reference(&unflipped, parameters);

    let fractures: Vec<FractureStress> = unflipped
        .par_iter()
        .map(|&azimuth| {
            let azimuth_deg = parameters.flip.apply_deg(azimuth);
            let (normal_stress, shear_stress) = parameters.resolve(azimuth_deg);
            let slip_ratio = slip_ratio(normal_stress, shear_stress);
            let susceptibility = parameters.susceptibility(normal_stress, shear_stress);
            FractureStress {
                azimuth_deg,
                normal_stress,
                shear_stress,
                slip_ratio,
                slip_tendency: unit_clamp(slip_ratio / slip_reference),
                dilation_tendency: parameters.dilation_tendency(normal_stress),
                susceptibility,
                // Negative friction flips the sign of the Coulomb inequality; the
                // susceptibility sign is authoritative.
                critically_stressed: susceptibility <= 0.0,
            }
        })
        .collect();

    debug!(
        segments = fractures.len(),
        slip_reference,
        critically_stressed = fractures.iter().filter(|f| f.critically_stressed).count(),
        "projected stress onto fractures"
    );

    Ok(StressProjection {
        parameters: *parameters,
        slip_reference,
        fractures,
    })
}

/// Maximum slip ratio with `sigma1` pointing north and no flips; 1.0 when not positive.
fn slip_reference(unflipped_azimuths: &[f64], parameters: &StressParameters) -> f64 {
    let max_ratio = unflipped_azimuths
        .par_iter()
        .map(|&azimuth| {
            let (normal, shear) =
                resolve_stress(parameters.sigma1, parameters.sigma2, azimuth + 90.0);
            slip_ratio(normal, shear)
        })
        .reduce(|| 0.0, f64::max);
    if max_ratio > 0.0 {
        max_ratio
    } else {
        1.0
    }
}

impl StressProjection {
    /// Parameters used for the projection.
    #[must_use]
    pub fn parameters(&self) -> &StressParameters {
        &self.parameters
    }

    /// Reference maximum slip ratio (`Tsmax`).
    #[must_use]
    pub fn slip_reference(&self) -> f64 {
        self.slip_reference
    }

    /// Per-segment results.
    #[must_use]
    pub fn fractures(&self) -> &[FractureStress] {
        &self.fractures
    }

    /// Number of projected segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fractures.len()
    }

    /// Returns `true` when no segment was projected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fractures.is_empty()
    }

    /// Flip-adjusted north azimuths in degrees.
    #[must_use]
    pub fn azimuths_deg(&self) -> Vec<f64> {
        self.column(|f| f.azimuth_deg)
    }

    /// Normal stresses.
    #[must_use]
    pub fn normal_stresses(&self) -> Vec<f64> {
        self.column(|f| f.normal_stress)
    }

    /// Shear stresses.
    #[must_use]
    pub fn shear_stresses(&self) -> Vec<f64> {
        self.column(|f| f.shear_stress)
    }

    /// Normalised slip tendencies.
    #[must_use]
    pub fn slip_tendencies(&self) -> Vec<f64> {
        self.column(|f| f.slip_tendency)
    }

    /// Dilation tendencies.
    #[must_use]
    pub fn dilation_tendencies(&self) -> Vec<f64> {
        self.column(|f| f.dilation_tendency)
    }

    /// Fracture susceptibilities.
    #[must_use]
    pub fn susceptibilities(&self) -> Vec<f64> {
        self.column(|f| f.susceptibility)
    }

    /// Critically-stressed flags.
    #[must_use]
    pub fn critically_stressed(&self) -> Vec<bool> {
        self.fractures.iter().map(|f| f.critically_stressed).collect()
    }

    /// Number of critically-stressed segments.
    #[must_use]
    pub fn critically_stressed_count(&self) -> usize {
        self.fractures.iter().filter(|f| f.critically_stressed).count()
    }

    /// `(sigma_n, tau)` of every segment, for plotting on the Mohr diagram.
    #[must_use]
    pub fn mohr_points(&self) -> Vec<(f64, f64)> {
        self.fractures
            .iter()
            .map(|f| (f.normal_stress, f.shear_stress))
            .collect()
    }

    /// Smallest and largest susceptibility, or `None` for an empty projection.
    #[must_use]
    pub fn susceptibility_range(&self) -> Option<(f64, f64)> {
        let mut values = self.fractures.iter().map(|f| f.susceptibility);
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    /// One scalar of every fracture, in input order.
    fn column(&self, field: impl Fn(&FractureStress) -> f64) -> Vec<f64> {
        self.fractures.iter().map(field).collect()
    }
}

/// Circle of all `(sigma_n, tau)` pairs for a principal stress state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MohrCircle {
    /// Mean stress.
    pub center: f64,
    /// Half the principal stress difference.
    pub radius: f64,
}

impl MohrCircle {
    /// Circle for the principal stresses `sigma1` and `sigma2` (in either order).
    #[must_use]
    pub fn from_principal(sigma1: f64, sigma2: f64) -> Self {
        Self {
            center: 0.5 * sigma1 + 0.5 * sigma2,
            radius: (0.5 * sigma1 - 0.5 * sigma2).abs(),
        }
    }

    /// `(sigma_n - center)^2 + tau^2 - radius^2`; zero for points on the circle.
    #[must_use]
    pub fn residual(&self, normal_stress: f64, shear_stress: f64) -> f64 {
        (normal_stress - self.center).powi(2) + shear_stress.powi(2) - self.radius.powi(2)
    }

    /// Upper half of the circle as `samples + 1` points from `sigma_n = center + radius`.
    #[must_use]
    pub fn arc(&self, samples: usize) -> Vec<(f64, f64)> {
        let samples = samples.max(1);
        (0..=samples)
            .map(|i| {
                let t = PI * i as f64 / samples as f64;
                (self.center + self.radius * t.cos(), self.radius * t.sin())
            })
            .collect()
    }
}

/// Linear Coulomb failure envelope `tau = mu * (sigma_n - pf) + C0`, upper branch.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FailureEnvelope {
    /// Coefficient of friction.
    pub friction: f64,
    /// Cohesion.
    pub cohesion: f64,
    /// Pore fluid pressure.
    pub pore_pressure: f64,
}

impl FailureEnvelope {
    /// Shear stress on the envelope at `normal_stress`.
    #[must_use]
    pub fn shear_at(&self, normal_stress: f64) -> f64 {
        self.friction * (normal_stress - self.pore_pressure) + self.cohesion
    }

    /// Normal stress where the envelope meets `tau = 0`; `None` for a horizontal envelope.
    #[must_use]
    pub fn intercept(&self) -> Option<f64> {
        (self.friction.abs() > FRICTION_EPSILON)
            .then(|| self.pore_pressure - self.cohesion / self.friction)
    }

    /// End points of the drawable envelope for the given principal stresses.
    ///
    /// The right end lies beyond `sigma1` (at least 1.2 radii past the circle centre).
    /// The left end is the `tau = 0` intercept when it exists, otherwise a point 1.2
    /// radii left of the centre or at `sigma2`. Shear values are clipped at zero.
    #[must_use]
    pub fn points(&self, sigma1: f64, sigma2: f64) -> [(f64, f64); 2] {
        let circle = MohrCircle::from_principal(sigma1, sigma2);
        let right = sigma1.max(circle.center + 1.2 * circle.radius);
        let (left, right) = match self.intercept() {
            Some(intercept) => (intercept.min(right), intercept.max(right)),
            None => (sigma2.min(circle.center - 1.2 * circle.radius), right),
        };
        [
            (left, self.shear_at(left).max(0.0)),
            (right, self.shear_at(right).max(0.0)),
        ]
    }
}

/// Mohr circle, its drawable arc and the failure envelope for one parameter set.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MohrDiagram {
    /// Circle of the principal stresses.
    pub circle: MohrCircle,
    /// Upper half of the circle.
    pub arc: Vec<(f64, f64)>,
    /// Failure envelope coefficients.
    pub envelope: FailureEnvelope,
    /// End points of the drawable envelope.
    pub envelope_points: [(f64, f64); 2],
    /// Envelope intercept with `tau = 0`.
    pub intercept: Option<f64>,
}

impl MohrDiagram {
    /// Build the diagram with a one-degree arc resolution.
    #[must_use]
    pub fn new(parameters: &StressParameters) -> Self {
        let envelope = parameters.failure_envelope();
        let circle = parameters.mohr_circle();
        Self {
            circle,
            arc: circle.arc(180),
            envelope,
            envelope_points: envelope.points(parameters.sigma1, parameters.sigma2),
            intercept: envelope.intercept(),
        }
    }
}

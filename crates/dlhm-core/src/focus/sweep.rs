use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DlhmError, Result};
use crate::frame::ComplexField;
use crate::optics::propagation::propagate_scaled;

use super::metrics::{metric_acutance, metric_variance};

/// Figure of merit minimised by the distance sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusMetric {
    #[default]
    Variance,
    Acutance,
    /// Sum of both curves after min-max normalization.
    Combined,
}

impl std::fmt::Display for FocusMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Variance => write!(f, "Variance"),
            Self::Acutance => write!(f, "Acutance"),
            Self::Combined => write!(f, "Combined"),
        }
    }
}

/// Distances scanned by [`focus_sweep`], endpoints included.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SweepRange {
    pub z_min: f64,
    pub z_max: f64,
    pub steps: usize,
}

impl SweepRange {
    pub fn distances(&self) -> Vec<f64> {
        match self.steps {
            0 => Vec::new(),
            1 => vec![self.z_min],
            n => {
                let dz = (self.z_max - self.z_min) / (n - 1) as f64;
                (0..n).map(|i| self.z_min + i as f64 * dz).collect()
            }
        }
    }
}

/// Optical geometry of the propagation used by the sweep.
#[derive(Clone, Copy, Debug)]
pub struct SweepOptics {
    pub wavelength: f64,
    pub dx: f64,
    pub dy: f64,
    pub scale_factor: f64,
}

pub struct FocusSweep {
    pub best_z: f64,
    pub best_index: usize,
    /// Field propagated to `best_z`.
    pub field: ComplexField,
    /// `(z, metric)` per scanned distance, in scan order.
    pub curve: Vec<(f64, f64)>,
}

/// Propagate `field` to every distance of `range` and keep the one that
/// minimises `metric` on the amplitude. Ties keep the nearer-to-`z_min`
/// distance.
///
/// `on_progress` is called with the number of distances evaluated so far.
pub fn focus_sweep(
    field: &ComplexField,
    range: &SweepRange,
    optics: &SweepOptics,
    metric: FocusMetric,
    on_progress: Option<&dyn Fn(usize)>,
) -> Result<FocusSweep> {
    let distances = range.distances();
    if distances.is_empty() {
        return Err(DlhmError::InvalidParameter {
            name: "steps".into(),
            reason: "focus sweep needs at least one distance".into(),
        });
    }

    let mut variances = Vec::with_capacity(distances.len());
    let mut acutances = Vec::with_capacity(distances.len());

    for (i, &z) in distances.iter().enumerate() {
        let amplitude = propagate_amplitude(field, z, optics);
        let variance = match metric {
            FocusMetric::Variance | FocusMetric::Combined => metric_variance(&amplitude),
            FocusMetric::Acutance => 0.0,
        };
        let acutance = match metric {
            FocusMetric::Acutance | FocusMetric::Combined => metric_acutance(&amplitude),
            FocusMetric::Variance => 0.0,
        };
        debug!(z, variance, acutance, "Focus sweep sample");
        variances.push(variance);
        acutances.push(acutance);
        if let Some(progress) = on_progress {
            progress(i + 1);
        }
    }

    let values: Vec<f64> = match metric {
        FocusMetric::Variance => variances,
        FocusMetric::Acutance => acutances,
        FocusMetric::Combined => {
            let v = min_max_normalize(&variances);
            let a = min_max_normalize(&acutances);
            v.iter().zip(&a).map(|(x, y)| x + y).collect()
        }
    };

    let mut best_index = 0;
    for (i, &v) in values.iter().enumerate() {
        if v < values[best_index] {
            best_index = i;
        }
    }
    let best_z = distances[best_index];
    let best_field = propagate_scaled(
        field,
        best_z,
        optics.wavelength,
        optics.dx,
        optics.dy,
        optics.scale_factor,
    );

    Ok(FocusSweep {
        best_z,
        best_index,
        field: best_field,
        curve: distances.into_iter().zip(values).collect(),
    })
}

fn propagate_amplitude(field: &ComplexField, z: f64, optics: &SweepOptics) -> ndarray::Array2<f32> {
    propagate_scaled(
        field,
        z,
        optics.wavelength,
        optics.dx,
        optics.dy,
        optics.scale_factor,
    )
    .mapv(|v| v.norm() as f32)
}

fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = if max - min > 0.0 { max - min } else { 1.0 };
    values.iter().map(|v| (v - min) / span).collect()
}

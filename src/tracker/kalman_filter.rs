//! Constant-velocity Kalman filter over a TLWH bounding box.
//!
//! State is `[x, y, w, h, vx, vy, vw, vh]`, measurement is `[x, y, w, h]`.
//! All matrices are fixed-size and stack allocated, so predict/correct never
//! touch the heap.

use nalgebra::{SMatrix, SVector};

use crate::detection::Rect;

pub type StateVector = SVector<f64, 8>;
pub type StateCovariance = SMatrix<f64, 8, 8>;
pub type Measurement = SVector<f64, 4>;

const PROCESS_NOISE: f64 = 1e-2;
const MEASUREMENT_NOISE: f64 = 1e-1;
const INITIAL_ERROR: f64 = 1.0;

/// Shared, immutable filter model: transition, measurement and noise matrices.
#[derive(Debug, Clone)]
pub struct KalmanFilter {
    motion_mat: SMatrix<f64, 8, 8>,
    update_mat: SMatrix<f64, 4, 8>,
    process_noise: SMatrix<f64, 8, 8>,
    measurement_noise: SMatrix<f64, 4, 4>,
}

/// Per-track filter state, updated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct KalmanState {
    pub mean: StateVector,
    pub covariance: StateCovariance,
}

impl KalmanState {
    /// Current box estimate (the position half of the state).
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.mean[0] as f32,
            self.mean[1] as f32,
            self.mean[2] as f32,
            self.mean[3] as f32,
        )
    }
}

impl Default for KalmanFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl KalmanFilter {
    pub fn new() -> Self {
        let ndim = 4;
        let mut motion_mat = SMatrix::<f64, 8, 8>::identity();
        for i in 0..ndim {
            motion_mat[(i, ndim + i)] = 1.0;
        }

        let mut update_mat = SMatrix::<f64, 4, 8>::zeros();
        for i in 0..ndim {
            update_mat[(i, i)] = 1.0;
        }

        Self {
            motion_mat,
            update_mat,
            process_noise: SMatrix::<f64, 8, 8>::identity() * PROCESS_NOISE,
            measurement_noise: SMatrix::<f64, 4, 4>::identity() * MEASUREMENT_NOISE,
        }
    }

    /// Start a track at `bbox` with zero velocity.
    pub fn initiate(&self, bbox: &Rect) -> KalmanState {
        let mut mean = StateVector::zeros();
        mean.fixed_rows_mut::<4>(0).copy_from(&measurement(bbox));
        KalmanState {
            mean,
            covariance: StateCovariance::identity() * INITIAL_ERROR,
        }
    }

    /// Advance the state one frame.
    pub fn predict(&self, state: &mut KalmanState) {
        state.mean = self.motion_mat * state.mean;
        state.covariance =
            self.motion_mat * state.covariance * self.motion_mat.transpose() + self.process_noise;
    }

    /// Fold a measured box into the predicted state.
    pub fn update(&self, state: &mut KalmanState, bbox: &Rect) {
        let innovation = measurement(bbox) - self.update_mat * state.mean;
        let pht = state.covariance * self.update_mat.transpose(); // 8x4
        let innovation_cov = self.update_mat * pht + self.measurement_noise;

        // S is symmetric positive definite while R is; if rounding ever breaks
        // that, keep the prediction rather than corrupting the state.
        let Some(s_inv) = innovation_cov.try_inverse() else {
            return;
        };
        let kalman_gain = pht * s_inv; // 8x4

        let correction = kalman_gain * self.update_mat * state.covariance;
        state.mean += kalman_gain * innovation;
        state.covariance -= correction;
    }
}

fn measurement(bbox: &Rect) -> Measurement {
    Measurement::new(
        bbox.x as f64,
        bbox.y as f64,
        bbox.width as f64,
        bbox.height as f64,
    )
}

//! Two-state recursive estimator for one noisy telemetry channel
//!
//! Constant-velocity model: the state couples a channel's value with its rate
//! of change, assuming the rate is locally constant between updates. Process
//! noise enters as a continuous white-noise acceleration of spectral density
//! `Q`, discretized over the fixed sample interval; measurement noise is the
//! scalar variance `R` of the observed channel.

use nalgebra::{Matrix2, Vector2};

/// Smoothed output of one estimator step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub value: f64,
    pub rate: f64,
}

/// Scalar Kalman filter with a constant-velocity process model
///
/// One instance owns its state exclusively and must be driven by a single
/// caller, one measurement per fixed sample interval, strictly in time order.
/// The filter trusts the caller's timing; it does not read timestamps, and
/// sequential calls are the only defined use. Every measurement is accepted
/// and blended by the current gain: no clamping, no outlier rejection.
///
/// There is no way to read the state without advancing it, and no reset
/// other than constructing a new instance.
pub struct ScalarKalmanFilter {
    dt: f64,
    r: f64,
    x: Vector2<f64>,
    p: Matrix2<f64>,
    q0: Matrix2<f64>,
}

impl ScalarKalmanFilter {
    /// Create a filter with fixed sample interval `dt`, process-noise
    /// spectral density `q`, measurement-noise variance `r`, and an initial
    /// diagonal covariance of `initial_covariance`.
    ///
    /// Value and rate start at zero. The discretized process-noise matrix is
    /// computed once here and added on every predict step.
    pub fn new(dt: f64, q: f64, r: f64, initial_covariance: f64) -> Self {
        let q0 = Matrix2::new(
            q * dt.powi(4) / 4.0,
            q * dt.powi(3) / 2.0,
            q * dt.powi(3) / 2.0,
            q * dt.powi(2),
        );

        Self {
            dt,
            r,
            x: Vector2::zeros(),
            p: Matrix2::identity() * initial_covariance,
            q0,
        }
    }

    /// Create a filter from session configuration
    pub fn from_config(config: &crate::utils::config::FilterConfig) -> Self {
        Self::new(
            config.sample_interval_s,
            config.process_noise,
            config.measurement_noise,
            config.initial_covariance,
        )
    }

    /// Fold in one measurement and return the updated (value, rate) estimate.
    ///
    /// Runs a predict step under the constant-velocity transition followed by
    /// a scalar measurement update. The first call operates from the
    /// configured initial covariance; behavior is uniform from then on.
    pub fn update(&mut self, z: f64) -> Estimate {
        let dt = self.dt;

        // Predict: x' = F x, P' = F P F' + Q0, written out entrywise for the
        // 2-state transition [[1, dt], [0, 1]].
        self.x[0] += self.x[1] * dt;

        let mut pp = Matrix2::zeros();
        pp[(0, 0)] = self.p[(0, 0)] + self.p[(1, 0)] * dt;
        pp[(0, 1)] = self.p[(0, 1)] + self.p[(1, 1)] * dt;
        pp[(1, 0)] = self.p[(1, 0)] + self.p[(1, 1)] * dt;
        pp[(1, 1)] = self.p[(1, 1)];
        pp[(0, 0)] += pp[(0, 1)] * dt;
        pp += self.q0;

        // Update: innovation against the predicted value, scalar gain,
        // symmetric covariance reduction.
        let y = z - self.x[0];
        let k = 1.0 / (pp[(0, 0)] + self.r);
        self.x[0] += k * pp[(0, 0)] * y;
        self.x[1] += k * pp[(1, 0)] * y;

        self.p[(0, 0)] = pp[(0, 0)] - k * pp[(0, 0)] * pp[(0, 0)];
        self.p[(0, 1)] = pp[(0, 1)] - k * pp[(0, 0)] * pp[(0, 1)];
        self.p[(1, 0)] = pp[(1, 0)] - k * pp[(1, 0)] * pp[(0, 0)];
        self.p[(1, 1)] = pp[(1, 1)] - k * pp[(1, 0)] * pp[(0, 1)];

        Estimate {
            value: self.x[0],
            rate: self.x[1],
        }
    }

    /// Run the filter over a recorded measurement sequence
    pub fn process_sequence<I>(&mut self, measurements: I) -> Vec<Estimate>
    where
        I: IntoIterator<Item = f64>,
    {
        measurements.into_iter().map(|z| self.update(z)).collect()
    }
}

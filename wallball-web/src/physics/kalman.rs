//! Kalman Filter for scalar signal smoothing
//!
//! State vector: [x, v]ᵀ (value and rate of change)
//! Constant-velocity model, one measurement of x per frame.

use nalgebra::{SMatrix, SVector};

use crate::config::SmoothingConfig;

/// 2-element state vector type
type State = SVector<f32, 2>;
/// 2x2 matrix type
type Matrix2 = SMatrix<f32, 2, 2>;
/// 1x2 matrix type (observation)
type Matrix1x2 = SMatrix<f32, 1, 2>;

/// Kalman Filter for a single noisy measurement per tick (e.g. knee angle)
#[derive(Clone, Debug)]
pub struct KalmanFilter {
    /// State: [x, v]
    state: State,

    /// State covariance matrix (uncertainty)
    covariance: Matrix2,

    /// Process noise
    process_noise: Matrix2,

    /// Measurement noise variance
    measurement_noise: f32,

    initialized: bool,
}

impl KalmanFilter {
    pub fn new(process_noise: f32, measurement_noise: f32) -> Self {
        Self::with_covariance(process_noise, measurement_noise, 1000.0)
    }

    pub fn from_config(config: &SmoothingConfig) -> Self {
        Self::with_covariance(
            config.process_noise,
            config.measurement_noise,
            config.initial_covariance,
        )
    }

    fn with_covariance(process_noise: f32, measurement_noise: f32, initial_covariance: f32) -> Self {
        Self {
            state: State::zeros(),
            covariance: Matrix2::identity() * initial_covariance,
            process_noise: Matrix2::identity() * process_noise,
            measurement_noise,
            initialized: false,
        }
    }

    /// Build transition matrix F for given timestep
    ///
    /// ```text
    /// | 1  dt |
    /// | 0  1  |
    /// ```
    fn transition_matrix(dt: f32) -> Matrix2 {
        Matrix2::new(
            1.0, dt,
            0.0, 1.0,
        )
    }

    /// Observation matrix H (we only measure x)
    fn observation_matrix() -> Matrix1x2 {
        Matrix1x2::new(1.0, 0.0)
    }

    /// Predict step: x += v*dt, P = F P Fᵀ + Q
    fn predict(&mut self, dt: f32) {
        let f = Self::transition_matrix(dt);
        self.state = f * self.state;
        self.covariance = f * self.covariance * f.transpose() + self.process_noise;
    }

    /// Update step against the raw measurement
    fn update(&mut self, measurement: f32) {
        let h = Self::observation_matrix();

        // Innovation: y = z - H * x
        let innovation = measurement - (h * self.state)[0];

        // Innovation covariance: S = H * P * Hᵀ + R (scalar)
        let s = (h * self.covariance * h.transpose())[0] + self.measurement_noise;
        if s <= f32::EPSILON {
            return;
        }

        // Kalman gain: K = P * Hᵀ / S
        let k = self.covariance * h.transpose() / s;

        self.state += k * innovation;

        // Covariance update: P = (I - K * H) * P
        self.covariance = (Matrix2::identity() - k * h) * self.covariance;
    }

    /// Smooth one measurement taken `dt` seconds after the previous one.
    ///
    /// The first call returns the raw measurement and seeds the state with it.
    pub fn filter(&mut self, measurement: f32, dt: f32) -> f32 {
        if !self.initialized {
            self.initialize(measurement);
            return measurement;
        }

        self.predict(dt);
        self.update(measurement);
        self.state[0]
    }

    /// Seed the filter with a first measurement
    pub fn initialize(&mut self, value: f32) {
        self.state = State::new(value, 0.0);
        self.initialized = true;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Current estimate
    pub fn value(&self) -> f32 {
        self.state[0]
    }

    /// Estimated rate of change (units per second)
    pub fn velocity(&self) -> f32 {
        self.state[1]
    }
}

impl Default for KalmanFilter {
    fn default() -> Self {
        Self::from_config(&SmoothingConfig::default())
    }
}

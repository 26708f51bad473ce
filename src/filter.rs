use crate::config::FilterConfig;
use crate::history::AzimuthHistory;
use crate::Float;

use serde_derive::Serialize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KalmanFilter1D<F: Float> {
    pub estimate: F,
    pub uncertainty: F,
    pub process_variance: F,
    pub measurement_variance: F,
}

pub type FilterState = KalmanFilter1D<f32>;

impl<F: Float> KalmanFilter1D<F> {
    pub fn new(initial_state: F, initial_uncertainty: F, process_variance: F, measurement_variance: F) -> Self {
        Self {
            estimate: initial_state,
            uncertainty: initial_uncertainty,
            process_variance,
            measurement_variance,
        }
    }

    #[inline]
    pub fn update(&mut self, measurement: F) {
        let gain = self.uncertainty / (self.uncertainty + self.measurement_variance);

        self.estimate += gain * (measurement - self.estimate);
        self.uncertainty -= gain * self.uncertainty;
    }

    #[inline]
    pub fn predict(&mut self) {
        self.uncertainty += self.process_variance;
    }

    #[inline]
    pub fn get_state(&self) -> F {
        self.estimate
    }
}

impl FilterState {
    pub fn from_config(config: &FilterConfig) -> Self {
        Self::new(
            config.initial_state,
            config.initial_uncertainty,
            config.process_variance,
            config.measurement_variance,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AzimuthGate {
    bands: Vec<(f32, f32)>,
}

impl AzimuthGate {
    pub fn new<I: IntoIterator<Item = (f32, f32)>>(bands: I) -> Self {
        Self {
            bands: bands.into_iter().collect(),
        }
    }

    #[inline]
    pub fn unreliable(&self, degrees: f32) -> bool {
        self.bands
            .iter()
            .any(|&(lo, hi)| lo <= degrees && degrees <= hi)
    }
}

impl Default for AzimuthGate {
    fn default() -> Self {
        Self::new([(70.0, 110.0), (250.0, 290.0)])
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct FilteredAzimuth {
    pub degrees: f32,

    pub filtered: bool,
}

/// Inside a band the whole history is replayed through the Kalman update,
/// then one predict. Outside the bands the Kalman state is left as it was.
#[derive(Debug, Clone)]
pub struct AdaptiveAzimuthFilter {
    history: AzimuthHistory,
    kalman: FilterState,
    gate: AzimuthGate,
    initial: FilterState,
}

impl AdaptiveAzimuthFilter {
    pub fn new(kalman: FilterState, history_len: usize, gate: AzimuthGate) -> Self {
        Self {
            history: AzimuthHistory::with_capacity(history_len),
            kalman,
            gate,
            initial: kalman,
        }
    }

    pub fn from_config(config: &FilterConfig) -> Self {
        let gate = AzimuthGate::new(config.unreliable_bands.iter().map(|&[lo, hi]| (lo, hi)));

        Self::new(FilterState::from_config(config), config.history_len, gate)
    }

    pub fn apply(&mut self, raw_degrees: f32) -> FilteredAzimuth {
        self.history.push(raw_degrees);

        if !self.gate.unreliable(raw_degrees) {
            return FilteredAzimuth {
                degrees: raw_degrees,
                filtered: false,
            };
        }

        for &measurement in self.history.iter() {
            self.kalman.update(measurement);
        }

        self.kalman.predict();

        FilteredAzimuth {
            degrees: self.kalman.get_state().rem_euclid(360.0),
            filtered: true,
        }
    }

    pub fn reset(&mut self) {
        self.kalman = self.initial;
        self.history.clear();
    }

    #[inline]
    pub fn state(&self) -> &FilterState {
        &self.kalman
    }

    #[inline]
    pub fn history(&self) -> &AzimuthHistory {
        &self.history
    }
}

impl Default for AdaptiveAzimuthFilter {
    fn default() -> Self {
        Self::from_config(&FilterConfig::default())
    }
}

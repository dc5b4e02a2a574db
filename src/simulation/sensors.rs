//! Noisy synthetic sensor streams and source-trait adapters.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::Sender;
use rand::RngExt;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use super::{NoiseConfig, SyntheticRoute};
use crate::error::{NavError, Result};
use crate::fusion::OrientationSample;
use crate::geo::{self, Coordinate};
use crate::pipeline::SourceEvent;
use crate::sources::{LocationSource, OrientationSource};

/// Generator of fused-rotation samples around a true heading, with
/// seeded Gaussian noise on all three axes.
pub struct NoisyOrientation {
    rng: ChaCha8Rng,
    heading_noise: Normal<f64>,
    tilt_noise: Normal<f64>,
}

impl NoisyOrientation {
    pub fn new(noise: &NoiseConfig) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(noise.seed),
            heading_noise: Normal::new(0.0, noise.heading_sigma_deg.max(0.0)).unwrap(),
            tilt_noise: Normal::new(0.0, noise.tilt_sigma_deg.max(0.0)).unwrap(),
        }
    }

    /// One sample for a device pointing at `true_heading_deg` while held
    /// roughly level.
    pub fn sample(&mut self, true_heading_deg: f64) -> OrientationSample {
        let heading = true_heading_deg + self.heading_noise.sample(&mut self.rng);
        OrientationSample {
            alpha: heading.to_radians(),
            beta: self.tilt_noise.sample(&mut self.rng).to_radians(),
            gamma: self.tilt_noise.sample(&mut self.rng).to_radians(),
        }
    }
}

/// Scatters GPS fixes by a Gaussian radial error in a uniformly random
/// direction.
pub struct FixJitter {
    rng: ChaCha8Rng,
    radial: Normal<f64>,
}

impl FixJitter {
    pub fn new(noise: &NoiseConfig) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(noise.seed.wrapping_add(1)),
            radial: Normal::new(0.0, noise.fix_sigma_m.max(0.0)).unwrap(),
        }
    }

    pub fn apply(&mut self, fix: Coordinate) -> Coordinate {
        let error_m = self.radial.sample(&mut self.rng).abs();
        if error_m <= 0.0 {
            return fix;
        }
        let direction: f64 = self.rng.random::<f64>() * 360.0;
        geo::destination(fix, direction, error_m)
    }
}

/// Location source replaying a [`SyntheticRoute`] on a worker thread.
pub struct SimulatedLocationSource {
    route: Option<SyntheticRoute>,
    noise: NoiseConfig,
    fix_interval: Duration,
    stop_flag: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl SimulatedLocationSource {
    pub fn new(route: SyntheticRoute, noise: NoiseConfig, fix_interval: Duration) -> Self {
        Self {
            route: Some(route),
            noise,
            fix_interval,
            stop_flag: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }
}

impl LocationSource for SimulatedLocationSource {
    fn start(&mut self, events: Sender<SourceEvent>) -> Result<()> {
        let route = self
            .route
            .take()
            .ok_or_else(|| NavError::SourceUnavailable("simulated route already started".into()))?;
        let stop_flag = Arc::clone(&self.stop_flag);
        let interval = self.fix_interval;
        let mut jitter = FixJitter::new(&self.noise);

        self.handle = Some(thread::spawn(move || {
            for fix in route {
                if stop_flag.load(Ordering::Relaxed) {
                    break;
                }
                if events.send(SourceEvent::Location(jitter.apply(fix))).is_err() {
                    break;
                }
                thread::sleep(interval);
            }
        }));
        Ok(())
    }

    fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Orientation source emitting noisy fused-rotation samples at a fixed
/// cadence. The simulated device starts at `initial_heading_deg` and
/// turns at `turn_rate_deg_s` until stopped.
pub struct SimulatedOrientationSource {
    initial_heading_deg: f64,
    turn_rate_deg_s: f64,
    cadence_hz: f64,
    noise: NoiseConfig,
    stop_flag: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl SimulatedOrientationSource {
    pub fn new(
        initial_heading_deg: f64,
        turn_rate_deg_s: f64,
        cadence_hz: f64,
        noise: NoiseConfig,
    ) -> Self {
        Self {
            initial_heading_deg,
            turn_rate_deg_s,
            cadence_hz: cadence_hz.max(0.1),
            noise,
            stop_flag: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }
}

impl OrientationSource for SimulatedOrientationSource {
    fn supports_fused_rotation(&self) -> bool {
        true
    }

    fn start(&mut self, events: Sender<SourceEvent>) -> Result<()> {
        if self.handle.is_some() {
            return Err(NavError::SourceUnavailable(
                "simulated orientation source already started".into(),
            ));
        }
        let stop_flag = Arc::clone(&self.stop_flag);
        let period = Duration::from_secs_f64(1.0 / self.cadence_hz);
        let dt = period.as_secs_f64();
        let initial = self.initial_heading_deg;
        let rate = self.turn_rate_deg_s;
        let mut generator = NoisyOrientation::new(&self.noise);

        self.handle = Some(thread::spawn(move || {
            let mut heading = initial;
            while !stop_flag.load(Ordering::Relaxed) {
                let sample = generator.sample(heading);
                if events.send(SourceEvent::Orientation(sample)).is_err() {
                    break;
                }
                heading += rate * dt;
                thread::sleep(period);
            }
        }));
        Ok(())
    }

    fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

//! Orientation fusion engine.
//!
//! Consumes raw orientation samples, smooths the heading through a
//! swappable filter, applies the calibration offset and fans out
//! `(heading, pitch, roll)` updates to subscribers. Two ingest paths
//! exist: fused rotation (preferred) and compass-only fallback. An engine
//! instance is fed by exactly one of them at a time; running both would
//! produce conflicting heading writers.

use crate::config::HeadingFilterConfig;
use crate::constants::MIN_VECTOR_MAGNITUDE;
use crate::filters::{SmoothingFilter, create_filter};
use crate::fusion::{MagneticVector, OrientationSample, OrientationUpdate};
use crate::geo::normalize_angle;
use crate::subscription::{SubscriberRegistry, Subscription};

pub struct OrientationFusion {
    filter: Box<dyn SmoothingFilter>,
    /// Smoothed heading before the calibration offset, degrees
    smoothed_raw: Option<f64>,
    /// Calibration offset in degrees; zero means uncalibrated
    calibration_offset: f64,
    heading: Option<f64>,
    pitch: f64,
    roll: f64,
    subscribers: SubscriberRegistry<OrientationUpdate>,
}

impl OrientationFusion {
    pub fn new(config: &HeadingFilterConfig) -> Self {
        Self {
            filter: create_filter(config.kind, config),
            smoothed_raw: None,
            calibration_offset: 0.0,
            heading: None,
            pitch: 0.0,
            roll: 0.0,
            subscribers: SubscriberRegistry::new(),
        }
    }

    /// Ingest a fused-rotation sample.
    ///
    /// The alpha component becomes the heading: converted to degrees,
    /// smoothed, offset by the calibration value and normalized to
    /// `[0, 360)`. Pitch and roll come straight from beta/gamma in
    /// degrees; only the heading drives navigation, so only the heading
    /// is smoothed. Returns the fanned-out update, or `None` when the
    /// sample was dropped.
    pub fn ingest_orientation(&mut self, sample: OrientationSample) -> Option<OrientationUpdate> {
        if !sample.alpha.is_finite() || !sample.beta.is_finite() || !sample.gamma.is_finite() {
            log::warn!("dropping non-finite orientation sample: {:?}", sample);
            return None;
        }

        self.pitch = sample.beta.to_degrees();
        self.roll = sample.gamma.to_degrees();
        Some(self.apply_heading(normalize_angle(sample.alpha.to_degrees())))
    }

    /// Ingest a compass-only magnetic vector (fallback when no fused
    /// rotation is available). The heading is `atan2(y, x)` and then runs
    /// through the same smoothing, calibration and normalization steps.
    pub fn ingest_compass(&mut self, vector: MagneticVector) -> Option<OrientationUpdate> {
        if !vector.x.is_finite() || !vector.y.is_finite() {
            log::warn!("dropping non-finite magnetic vector: {:?}", vector);
            return None;
        }
        if vector.x.hypot(vector.y) < MIN_VECTOR_MAGNITUDE {
            log::warn!("dropping magnetic vector with no horizontal component");
            return None;
        }

        Some(self.apply_heading(normalize_angle(vector.y.atan2(vector.x).to_degrees())))
    }

    fn apply_heading(&mut self, raw_degrees: f64) -> OrientationUpdate {
        let smoothed = self.filter.update(raw_degrees);
        self.smoothed_raw = Some(smoothed);

        let heading = normalize_angle(smoothed + self.calibration_offset);
        self.heading = Some(heading);

        let update = OrientationUpdate {
            heading,
            pitch: self.pitch,
            roll: self.roll,
        };
        self.subscribers.notify(&update);
        update
    }

    /// Set the calibration offset so the current physical orientation
    /// reads as `true_heading` degrees.
    ///
    /// Calling again overwrites the previous offset; the adjustment is
    /// not cumulative. Never fails.
    pub fn calibrate(&mut self, true_heading: f64) {
        let current = self.smoothed_raw.unwrap_or(0.0);
        self.calibration_offset = true_heading - current;
        if let Some(raw) = self.smoothed_raw {
            self.heading = Some(normalize_angle(raw + self.calibration_offset));
        }
        log::info!(
            "calibrated: offset {:.1}° (true heading {:.1}°)",
            self.calibration_offset,
            true_heading
        );
    }

    /// Clear the calibration offset. Never fails.
    pub fn reset_calibration(&mut self) {
        self.calibration_offset = 0.0;
        if let Some(raw) = self.smoothed_raw {
            self.heading = Some(normalize_angle(raw));
        }
    }

    /// Smoothed, calibrated heading in degrees, once a sample has
    /// arrived.
    pub fn heading(&self) -> Option<f64> {
        self.heading
    }

    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    pub fn roll(&self) -> f64 {
        self.roll
    }

    pub fn calibration_offset(&self) -> f64 {
        self.calibration_offset
    }

    /// Register a callback for orientation updates, invoked synchronously
    /// in registration order on every ingest.
    pub fn subscribe<F>(&mut self, callback: F) -> Subscription
    where
        F: FnMut(&OrientationUpdate) + Send + 'static,
    {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, subscription: &Subscription) {
        self.subscribers.unsubscribe(subscription);
    }

    /// Tear down: clear subscribers and filter state. The calibration
    /// offset survives, matching its process-lifetime contract.
    /// Idempotent and safe to call when never started.
    pub fn shutdown(&mut self) {
        self.subscribers.clear();
        self.filter.reset();
        self.smoothed_raw = None;
        self.heading = None;
        self.pitch = 0.0;
        self.roll = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::sync::{Arc, Mutex};

    fn engine() -> OrientationFusion {
        OrientationFusion::new(&HeadingFilterConfig::default())
    }

    fn sample(alpha_deg: f64) -> OrientationSample {
        OrientationSample {
            alpha: alpha_deg.to_radians(),
            beta: 0.0,
            gamma: 0.0,
        }
    }

    #[test]
    fn test_first_sample_sets_heading() {
        let mut fusion = engine();
        let _ = fusion.ingest_orientation(sample(90.0));
        assert_relative_eq!(fusion.heading().unwrap(), 90.0, epsilon = 1e-6);
    }

    #[test]
    fn test_pitch_roll_pass_through_unsmoothed() {
        let mut fusion = engine();
        let _ = fusion.ingest_orientation(OrientationSample {
            alpha: 0.0,
            beta: 0.3,
            gamma: -0.1,
        });
        assert_relative_eq!(fusion.pitch(), 0.3_f64.to_degrees(), epsilon = 1e-9);
        assert_relative_eq!(fusion.roll(), (-0.1_f64).to_degrees(), epsilon = 1e-9);

        // A second sample replaces them outright
        let _ = fusion.ingest_orientation(OrientationSample {
            alpha: 0.0,
            beta: 0.6,
            gamma: 0.2,
        });
        assert_relative_eq!(fusion.pitch(), 0.6_f64.to_degrees(), epsilon = 1e-9);
    }

    #[test]
    fn test_compass_fallback_heading() {
        let mut fusion = engine();
        // atan2(1, 0) = 90°
        let _ = fusion.ingest_compass(MagneticVector {
            x: 0.0,
            y: 1.0,
            z: 0.0,
        });
        assert_relative_eq!(fusion.heading().unwrap(), 90.0, epsilon = 1e-6);
    }

    #[test]
    fn test_compass_zero_vector_dropped() {
        let mut fusion = engine();
        let _ = fusion.ingest_compass(MagneticVector {
            x: 0.0,
            y: 0.0,
            z: 0.5,
        });
        assert!(fusion.heading().is_none());
    }

    #[test]
    fn test_non_finite_sample_dropped() {
        let mut fusion = engine();
        let _ = fusion.ingest_orientation(OrientationSample {
            alpha: f64::NAN,
            beta: 0.0,
            gamma: 0.0,
        });
        assert!(fusion.heading().is_none());
    }

    #[test]
    fn test_calibration_lands_on_true_heading() {
        let mut fusion = engine();
        // Converge the filter on a steady reading
        for _ in 0..200 {
            let _ = fusion.ingest_orientation(sample(120.0));
        }

        fusion.calibrate(45.0);
        assert_relative_eq!(fusion.heading().unwrap(), 45.0, epsilon = 1e-3);

        // Repeating the same physical orientation keeps reading 45°
        let _ = fusion.ingest_orientation(sample(120.0));
        assert_relative_eq!(fusion.heading().unwrap(), 45.0, epsilon = 1e-3);
    }

    #[test]
    fn test_recalibration_overwrites_offset() {
        let mut fusion = engine();
        for _ in 0..200 {
            let _ = fusion.ingest_orientation(sample(120.0));
        }

        fusion.calibrate(45.0);
        fusion.calibrate(200.0);
        let _ = fusion.ingest_orientation(sample(120.0));
        assert_relative_eq!(fusion.heading().unwrap(), 200.0, epsilon = 1e-3);
    }

    #[test]
    fn test_reset_calibration() {
        let mut fusion = engine();
        for _ in 0..200 {
            let _ = fusion.ingest_orientation(sample(120.0));
        }

        fusion.calibrate(45.0);
        fusion.reset_calibration();
        assert_relative_eq!(fusion.calibration_offset(), 0.0);
        assert_relative_eq!(fusion.heading().unwrap(), 120.0, epsilon = 1e-3);
    }

    #[test]
    fn test_fan_out_in_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut fusion = engine();

        for tag in ["a", "b"] {
            let order = Arc::clone(&order);
            fusion.subscribe(move |u: &OrientationUpdate| {
                order.lock().unwrap().push((tag, u.heading));
            });
        }

        let _ = fusion.ingest_orientation(sample(90.0));
        let seen = order.lock().unwrap().clone();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, "a");
        assert_eq!(seen[1].0, "b");
        assert_relative_eq!(seen[0].1, 90.0, epsilon = 1e-6);
    }

    #[test]
    fn test_unsubscribe_twice_is_noop() {
        let hits = Arc::new(Mutex::new(0u32));
        let mut fusion = engine();

        let hits2 = Arc::clone(&hits);
        let sub = fusion.subscribe(move |_| *hits2.lock().unwrap() += 1);
        let _ = fusion.ingest_orientation(sample(10.0));
        fusion.unsubscribe(&sub);
        fusion.unsubscribe(&sub);
        let _ = fusion.ingest_orientation(sample(20.0));
        assert_eq!(*hits.lock().unwrap(), 1);
    }

    #[test]
    fn test_shutdown_idempotent_and_preserves_offset() {
        let mut fusion = engine();
        for _ in 0..50 {
            let _ = fusion.ingest_orientation(sample(120.0));
        }
        fusion.calibrate(45.0);
        let offset = fusion.calibration_offset();

        fusion.shutdown();
        fusion.shutdown();

        assert!(fusion.heading().is_none());
        assert_relative_eq!(fusion.calibration_offset(), offset);

        // Safe on a never-started engine too
        let mut fresh = engine();
        fresh.shutdown();
    }
}

//! Navigation state aggregator.
//!
//! Folds the two independent input streams (location fixes, heading
//! updates) into one coherent [`NavigationData`] snapshot. Each stream
//! has its own reducer over the shared snapshot; the reducers never
//! assume the other stream has delivered yet, so updates may interleave
//! in any order. Callers serialize the two paths (see the event
//! pipeline) because both read-modify-write the same state.

use serde::Serialize;

use crate::geo::{self, Coordinate};
use crate::subscription::{SubscriberRegistry, Subscription};

/// One immutable navigation snapshot.
///
/// `target_location` is fixed at construction; everything else fills in
/// as each source delivers its first sample. `distance_m` and `bearing`
/// are present exactly when `user_location` is; `relative_angle` is
/// present exactly when both `bearing` and `device_heading` are.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NavigationData {
    pub user_location: Option<Coordinate>,
    pub target_location: Coordinate,
    /// Great-circle distance to the target in meters
    pub distance_m: Option<f64>,
    /// Initial bearing toward the target, degrees `[0, 360)`
    pub bearing: Option<f64>,
    /// Smoothed device heading, degrees `[0, 360)`
    pub device_heading: Option<f64>,
    /// Shortest signed rotation from the device heading to the target
    /// bearing, degrees `(-180, 180]`; positive means turn left
    pub relative_angle: Option<f64>,
}

/// Which way to turn to face the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TurnDirection {
    Aligned,
    Left,
    Right,
}

impl NavigationData {
    fn new(target: Coordinate) -> Self {
        Self {
            user_location: None,
            target_location: target,
            distance_m: None,
            bearing: None,
            device_heading: None,
            relative_angle: None,
        }
    }

    /// True when the device points within `threshold_degrees` of the
    /// target bearing. False while either stream is still missing.
    pub fn is_aligned(&self, threshold_degrees: f64) -> bool {
        self.relative_angle
            .is_some_and(|angle| angle.abs() < threshold_degrees)
    }

    /// Turn advice for the display, once a relative angle exists.
    pub fn turn_direction(&self, threshold_degrees: f64) -> Option<TurnDirection> {
        let angle = self.relative_angle?;
        Some(if angle.abs() < threshold_degrees {
            TurnDirection::Aligned
        } else if angle > 0.0 {
            TurnDirection::Left
        } else {
            TurnDirection::Right
        })
    }
}

/// Owns the authoritative snapshot and recomputes it on every update
/// from either stream.
pub struct Navigator {
    data: NavigationData,
    subscribers: SubscriberRegistry<NavigationData>,
}

impl Navigator {
    pub fn new(target: Coordinate) -> Self {
        Self {
            data: NavigationData::new(target),
            subscribers: SubscriberRegistry::new(),
        }
    }

    /// Current snapshot, no side effects.
    pub fn snapshot(&self) -> NavigationData {
        self.data
    }

    pub fn target(&self) -> Coordinate {
        self.data.target_location
    }

    /// Location reducer: recompute distance and bearing toward the
    /// target, then the relative angle if a heading is already known.
    /// Fields untouched by this update carry forward unchanged.
    pub fn update_location(&mut self, location: Coordinate) -> NavigationData {
        if !location.is_valid() {
            log::warn!("navigator ignoring invalid location: {:?}", location);
            return self.data;
        }

        let target = self.data.target_location;
        let bearing = geo::initial_bearing(location, target);

        self.data.user_location = Some(location);
        self.data.distance_m = Some(geo::distance(location, target));
        self.data.bearing = Some(bearing);
        self.data.relative_angle = self
            .data
            .device_heading
            .map(|heading| geo::angle_difference(heading, bearing));

        self.publish()
    }

    /// Heading reducer: store the normalized heading and recompute the
    /// relative angle if a bearing is already known.
    pub fn update_heading(&mut self, heading: f64) -> NavigationData {
        if !heading.is_finite() {
            log::warn!("navigator ignoring non-finite heading");
            return self.data;
        }

        let heading = geo::normalize_angle(heading);
        self.data.device_heading = Some(heading);
        self.data.relative_angle = self
            .data
            .bearing
            .map(|bearing| geo::angle_difference(heading, bearing));

        self.publish()
    }

    fn publish(&mut self) -> NavigationData {
        let snapshot = self.data;
        self.subscribers.notify(&snapshot);
        snapshot
    }

    /// Register a display callback, invoked with every published
    /// snapshot in registration order.
    pub fn subscribe<F>(&mut self, callback: F) -> Subscription
    where
        F: FnMut(&NavigationData) + Send + 'static,
    {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, subscription: &Subscription) {
        self.subscribers.unsubscribe(subscription);
    }

    /// Clear subscribers and forget everything except the target.
    /// Idempotent.
    pub fn shutdown(&mut self) {
        self.subscribers.clear();
        self.data = NavigationData::new(self.data.target_location);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn target() -> Coordinate {
        Coordinate::new(13.0453132, 77.5733936)
    }

    fn south_of_target() -> Coordinate {
        Coordinate::new(13.0443132, 77.5733936)
    }

    #[test]
    fn test_snapshot_starts_with_target_only() {
        let nav = Navigator::new(target());
        let snap = nav.snapshot();
        assert_eq!(snap.target_location, target());
        assert!(snap.user_location.is_none());
        assert!(snap.distance_m.is_none());
        assert!(snap.bearing.is_none());
        assert!(snap.device_heading.is_none());
        assert!(snap.relative_angle.is_none());
    }

    #[test]
    fn test_location_update_fills_distance_and_bearing() {
        let mut nav = Navigator::new(target());
        let snap = nav.update_location(south_of_target());

        // 0.001° of latitude is ~111 m due north of the user
        let d = snap.distance_m.unwrap();
        assert!((d - 111.0).abs() < 2.0, "expected ~111 m, got {}", d);
        assert_relative_eq!(snap.bearing.unwrap(), 0.0, epsilon = 0.01);
        // No heading yet: relative angle must stay absent
        assert!(snap.relative_angle.is_none());
    }

    #[test]
    fn test_heading_update_without_location() {
        let mut nav = Navigator::new(target());
        let snap = nav.update_heading(370.0);
        assert_relative_eq!(snap.device_heading.unwrap(), 10.0, epsilon = 1e-9);
        assert!(snap.relative_angle.is_none());
        assert!(snap.distance_m.is_none());
    }

    #[test]
    fn test_update_order_independence() {
        let location = south_of_target();
        let heading = 190.0;

        let mut nav_a = Navigator::new(target());
        nav_a.update_location(location);
        let snap_a = nav_a.update_heading(heading);

        let mut nav_b = Navigator::new(target());
        nav_b.update_heading(heading);
        let snap_b = nav_b.update_location(location);

        assert_relative_eq!(
            snap_a.relative_angle.unwrap(),
            snap_b.relative_angle.unwrap(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_relative_angle_and_turn_contract() {
        let mut nav = Navigator::new(target());
        nav.update_location(south_of_target());

        // Facing the target dead on
        let aligned = nav.update_heading(0.0);
        assert_relative_eq!(aligned.relative_angle.unwrap(), 0.0, epsilon = 0.01);
        assert!(aligned.is_aligned(10.0));
        assert_eq!(aligned.turn_direction(10.0), Some(TurnDirection::Aligned));

        // Facing almost opposite: shortest rotation is +170° (turn left)
        let opposite = nav.update_heading(190.0);
        assert_relative_eq!(opposite.relative_angle.unwrap(), 170.0, epsilon = 0.01);
        assert!(!opposite.is_aligned(10.0));
        assert_eq!(opposite.turn_direction(10.0), Some(TurnDirection::Left));

        // Slightly past north the other way: turn right
        let right = nav.update_heading(30.0);
        assert!(right.relative_angle.unwrap() < 0.0);
        assert_eq!(right.turn_direction(10.0), Some(TurnDirection::Right));
    }

    #[test]
    fn test_location_refresh_recomputes_relative_angle() {
        let mut nav = Navigator::new(target());
        nav.update_heading(90.0);
        let snap = nav.update_location(south_of_target());
        // bearing 0°, heading 90° → shortest rotation is -90°
        assert_relative_eq!(snap.relative_angle.unwrap(), -90.0, epsilon = 0.01);
    }

    #[test]
    fn test_invalid_inputs_leave_snapshot_untouched() {
        let mut nav = Navigator::new(target());
        nav.update_location(south_of_target());
        let before = nav.snapshot();

        nav.update_location(Coordinate::new(f64::NAN, 0.0));
        nav.update_heading(f64::INFINITY);

        assert_eq!(nav.snapshot(), before);
    }

    #[test]
    fn test_publish_on_every_update() {
        use std::sync::{Arc, Mutex};

        let count = Arc::new(Mutex::new(0u32));
        let mut nav = Navigator::new(target());

        let count2 = Arc::clone(&count);
        nav.subscribe(move |_| *count2.lock().unwrap() += 1);

        nav.update_location(south_of_target());
        nav.update_heading(45.0);
        nav.update_heading(46.0);

        assert_eq!(*count.lock().unwrap(), 3);
    }

    #[test]
    fn test_shutdown_preserves_target() {
        let mut nav = Navigator::new(target());
        nav.update_location(south_of_target());
        nav.shutdown();
        let snap = nav.snapshot();
        assert_eq!(snap.target_location, target());
        assert!(snap.user_location.is_none());
    }
}

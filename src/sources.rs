//! Source traits for the two input streams.
//!
//! The engine only consumes the numeric samples; platform sensor and GPS
//! bindings live behind these traits. A source pushes discrete
//! [`SourceEvent`]s into the pipeline channel at its own cadence and
//! reports acquisition failures from `start` as explicit error values —
//! the engine never retries on its own.

use crossbeam_channel::Sender;

use crate::error::Result;
use crate::pipeline::SourceEvent;

/// Provider of GPS fixes.
///
/// Expected to deliver on movement beyond a minimum distance or elapsed
/// time threshold (see `LocationConfig`), at best-available accuracy.
pub trait LocationSource: Send {
    /// Begin delivering `SourceEvent::Location` events into `events`.
    ///
    /// Fails with `NavError::PermissionDenied` when positioning access
    /// was refused and `NavError::SourceUnavailable` when no positioning
    /// is obtainable at all.
    fn start(&mut self, events: Sender<SourceEvent>) -> Result<()>;

    /// Stop delivering. Idempotent; safe when never started.
    fn stop(&mut self);
}

/// Provider of orientation samples.
pub trait OrientationSource: Send {
    /// Whether this source can deliver fused-rotation samples. When it
    /// can, the pipeline runs the fused path and compass events are not
    /// expected; otherwise the source delivers `SourceEvent::Compass`.
    fn supports_fused_rotation(&self) -> bool;

    /// Begin delivering orientation events into `events`.
    ///
    /// Fails with `NavError::PermissionDenied` when motion-sensor access
    /// was refused and `NavError::SourceUnavailable` when neither fused
    /// rotation nor compass data can be obtained.
    fn start(&mut self, events: Sender<SourceEvent>) -> Result<()>;

    /// Stop delivering. Idempotent; safe when never started.
    fn stop(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NavError;
    use crossbeam_channel::unbounded;

    struct DeniedGps;

    impl LocationSource for DeniedGps {
        fn start(&mut self, _events: Sender<SourceEvent>) -> Result<()> {
            Err(NavError::PermissionDenied("location access refused".into()))
        }

        fn stop(&mut self) {}
    }

    struct NoSensors;

    impl OrientationSource for NoSensors {
        fn supports_fused_rotation(&self) -> bool {
            false
        }

        fn start(&mut self, _events: Sender<SourceEvent>) -> Result<()> {
            Err(NavError::SourceUnavailable("no orientation hardware".into()))
        }

        fn stop(&mut self) {}
    }

    #[test]
    fn test_permission_denied_distinct_from_unavailable() {
        let (tx, _rx) = unbounded();

        let err = DeniedGps.start(tx.clone()).unwrap_err();
        assert!(matches!(err, NavError::PermissionDenied(_)));

        let err = NoSensors.start(tx).unwrap_err();
        assert!(matches!(err, NavError::SourceUnavailable(_)));
    }
}

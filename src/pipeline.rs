//! Event pipeline wiring sources, fusion, tracking and aggregation.
//!
//! The two sources may deliver on different threads; their events are
//! routed through one crossbeam channel and drained here, so both
//! aggregator reducers run serialized on the draining thread and no
//! component needs its own locking.

use std::panic::{AssertUnwindSafe, catch_unwind};

use crossbeam_channel::Receiver;

use crate::config::NavConfig;
use crate::error::Result;
use crate::fusion::{MagneticVector, OrientationFusion, OrientationSample};
use crate::geo::Coordinate;
use crate::location::LocationTracker;
use crate::navigator::{NavigationData, Navigator};

/// One discrete sample event from either source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourceEvent {
    /// Fused-rotation orientation sample (radians)
    Orientation(OrientationSample),
    /// Compass-only magnetic vector (fallback path)
    Compass(MagneticVector),
    /// GPS fix (degrees)
    Location(Coordinate),
}

pub struct NavigationPipeline {
    fusion: OrientationFusion,
    tracker: LocationTracker,
    navigator: Navigator,
    prefer_fused: bool,
    fused_seen: bool,
}

impl NavigationPipeline {
    pub fn new(config: &NavConfig) -> Self {
        Self {
            fusion: OrientationFusion::new(&config.heading_filter),
            tracker: LocationTracker::new(),
            navigator: Navigator::new(config.target),
            prefer_fused: config.orientation.prefer_fused,
            fused_seen: false,
        }
    }

    /// Apply one source event, returning the recomputed snapshot when
    /// the event was accepted.
    ///
    /// Once fused-rotation samples have been seen, compass events are
    /// ignored: the two paths must never write the heading concurrently.
    pub fn handle_event(&mut self, event: SourceEvent) -> Option<NavigationData> {
        match event {
            SourceEvent::Orientation(sample) => {
                let update = self.fusion.ingest_orientation(sample)?;
                self.fused_seen = true;
                Some(self.navigator.update_heading(update.heading))
            }
            SourceEvent::Compass(vector) => {
                if self.prefer_fused && self.fused_seen {
                    log::debug!("ignoring compass event while fused rotation is active");
                    return None;
                }
                let update = self.fusion.ingest_compass(vector)?;
                Some(self.navigator.update_heading(update.heading))
            }
            SourceEvent::Location(coordinate) => {
                let fix = self.tracker.ingest_location(coordinate)?;
                Some(self.navigator.update_location(fix))
            }
        }
    }

    /// Drain events until every sender has disconnected, pushing each
    /// recomputed snapshot to `on_snapshot`.
    ///
    /// A panicking callback must not take down the loop: the failure is
    /// logged, that fan-out is skipped and the last snapshot stays
    /// valid.
    pub fn run<F>(&mut self, events: Receiver<SourceEvent>, mut on_snapshot: F) -> Result<()>
    where
        F: FnMut(&NavigationData),
    {
        for event in events.iter() {
            if let Some(snapshot) = self.handle_event(event) {
                if catch_unwind(AssertUnwindSafe(|| on_snapshot(&snapshot))).is_err() {
                    log::warn!("snapshot consumer panicked; skipping this update");
                }
            }
        }
        log::info!("all sources disconnected, pipeline stopping");
        Ok(())
    }

    /// Latest aggregated snapshot.
    pub fn snapshot(&self) -> NavigationData {
        self.navigator.snapshot()
    }

    /// Calibrate the heading so the current orientation reads as
    /// `true_heading` degrees.
    pub fn calibrate(&mut self, true_heading: f64) {
        self.fusion.calibrate(true_heading);
    }

    pub fn reset_calibration(&mut self) {
        self.fusion.reset_calibration();
    }

    pub fn fusion(&mut self) -> &mut OrientationFusion {
        &mut self.fusion
    }

    pub fn tracker(&mut self) -> &mut LocationTracker {
        &mut self.tracker
    }

    pub fn navigator(&mut self) -> &mut Navigator {
        &mut self.navigator
    }

    /// Tear down every component. Idempotent, safe when never run.
    pub fn shutdown(&mut self) {
        self.fusion.shutdown();
        self.tracker.shutdown();
        self.navigator.shutdown();
        self.fused_seen = false;
    }
}

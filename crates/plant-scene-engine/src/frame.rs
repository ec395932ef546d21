// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Frame scheduling.
//!
//! There is no background thread. The host owns the clock and pumps the
//! driver; the scheduler only decides whether a given instant gets a frame.

use std::time::Duration;

use tracing::{debug, info, instrument};

use crate::controls::InteractionControls;
use crate::engine::SceneEngine;
use crate::render::{FrameInfo, OverlaySurface, RenderSurface};
use crate::EngineError;

/// Decides when frames run.
pub trait FrameScheduler {
    /// Starts issuing frames.
    fn start(&mut self);
    /// Stops issuing frames.
    fn stop(&mut self);
    /// Whether the scheduler is running.
    fn is_running(&self) -> bool;
    /// Whether a frame is due at `now`. Consumes the due frame.
    fn poll(&mut self, now: Duration) -> bool;
}

/// Runs one frame per poll while started. For tests and offline drivers.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    running: bool,
}

impl ManualScheduler {
    /// Stopped scheduler.
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameScheduler for ManualScheduler {
    fn start(&mut self) {
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn poll(&mut self, _now: Duration) -> bool {
        self.running
    }
}

/// Fixed-interval scheduler. Missed frames are dropped, not replayed.
#[derive(Clone, Debug)]
pub struct IntervalScheduler {
    interval: Duration,
    next_due: Option<Duration>,
}

impl IntervalScheduler {
    /// Scheduler ticking every `interval_ms` milliseconds.
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval: Duration::from_millis(interval_ms.max(1)),
            next_due: None,
        }
    }

    /// Tick interval.
    pub const fn interval(&self) -> Duration {
        self.interval
    }
}

impl FrameScheduler for IntervalScheduler {
    fn start(&mut self) {
        if self.next_due.is_none() {
            self.next_due = Some(Duration::ZERO);
        }
    }

    fn stop(&mut self) {
        self.next_due = None;
    }

    fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    fn poll(&mut self, now: Duration) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }
        let mut next = due + self.interval;
        while next <= now {
            next += self.interval;
        }
        self.next_due = Some(next);
        true
    }
}

/// Couples a scheduler to an engine.
#[derive(Debug)]
pub struct FrameDriver<S> {
    scheduler: S,
    frames: u64,
}

impl<S: FrameScheduler> FrameDriver<S> {
    /// Driver over `scheduler` (not started).
    pub const fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            frames: 0,
        }
    }

    /// Starts the scheduler.
    pub fn start(&mut self) {
        self.scheduler.start();
        info!("frame driver started");
    }

    /// Stops the scheduler.
    pub fn stop(&mut self) {
        self.scheduler.stop();
        info!(frames = self.frames, "frame driver stopped");
    }

    /// Whether frames are being issued.
    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Frames run so far.
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// The wrapped scheduler.
    pub const fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Runs a frame on `engine` if one is due at `now`.
    #[instrument(skip_all, fields(frame = self.frames))]
    pub fn pump<R, O, C>(
        &mut self,
        engine: &mut SceneEngine<R, O, C>,
        now: Duration,
    ) -> Result<Option<FrameInfo>, EngineError>
    where
        R: RenderSurface,
        O: OverlaySurface,
        C: InteractionControls,
    {
        if !self.scheduler.poll(now) {
            return Ok(None);
        }
        let info = engine.frame(now)?;
        self.frames += 1;
        if self.frames.is_multiple_of(60) {
            debug!("frame #{}", self.frames);
        }
        Ok(Some(info))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn manual_scheduler_runs_only_while_started() {
        let mut s = ManualScheduler::new();
        assert!(!s.poll(ms(0)));
        s.start();
        assert!(s.poll(ms(0)) && s.poll(ms(0)));
        s.stop();
        assert!(!s.is_running() && !s.poll(ms(1)));
    }

    #[test]
    fn interval_scheduler_drops_missed_frames() {
        let mut s = IntervalScheduler::new(16);
        assert!(!s.poll(ms(0)));
        s.start();
        assert!(s.poll(ms(0)));
        assert!(!s.poll(ms(10)));
        assert!(s.poll(ms(16)));
        assert!(s.poll(ms(100)));
        assert!(!s.poll(ms(110)));
        assert!(s.poll(ms(112)));
    }

    #[test]
    fn driver_requires_a_ready_engine() {
        let mut engine: SceneEngine = SceneEngine::default();
        let mut driver = FrameDriver::new(ManualScheduler::new());
        assert_eq!(driver.pump(&mut engine, ms(0)), Ok(None));
        driver.start();
        assert_eq!(driver.pump(&mut engine, ms(0)), Err(EngineError::NotReady));
        assert_eq!(driver.frames(), 0);
    }
}

//! Frame pacing and the FPS counter.

use crate::config::EngineConfig;
use crate::render::Engine;
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior};

/// How often the FPS figure is recomputed, in milliseconds.
pub const FPS_INTERVAL_MS: u32 = 1000;

/// Tracks frame timing against a target frame rate.
///
/// All times are engine ticks in milliseconds, so the timer works the same
/// on every backend and can be driven by fake clocks in tests.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    target_fps: u32,
    budget_ms: u32,
    frame_start: u32,
    sample_start: u32,
    frames: u32,
    fps: u32,
    skipped: u32,
}

impl FrameTimer {
    pub fn new(target_fps: u32) -> Self {
        let target_fps = target_fps.max(1);
        Self {
            target_fps,
            budget_ms: 1000 / target_fps,
            frame_start: 0,
            sample_start: 0,
            frames: 0,
            fps: 0,
            skipped: 0,
        }
    }

    /// A timer pacing at the config's `target_fps`.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.target_fps)
    }

    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    /// Milliseconds one frame may take.
    pub fn frame_budget_ms(&self) -> u32 {
        self.budget_ms
    }

    pub fn begin_frame(&mut self, ticks: u32) {
        self.frame_start = ticks;
    }

    /// Closes the current frame and returns how long to sleep to hold the
    /// target rate. Frames that ran over budget count as skipped.
    pub fn end_frame(&mut self, ticks: u32) -> u32 {
        let elapsed = ticks.wrapping_sub(self.frame_start);

        self.frames += 1;
        if ticks.wrapping_sub(self.sample_start) >= FPS_INTERVAL_MS {
            self.fps = self.frames;
            self.frames = 0;
            self.sample_start = ticks;
        }

        if elapsed < self.budget_ms {
            self.budget_ms - elapsed
        } else {
            if elapsed > self.budget_ms {
                self.skipped += 1;
                log::trace!("frame took {}ms, budget is {}ms", elapsed, self.budget_ms);
            }
            0
        }
    }

    /// Frames completed during the last full sampling interval.
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Frames that overran their budget so far.
    pub fn skipped(&self) -> u32 {
        self.skipped
    }

    /// Ends the frame against the engine clock, sleeps off the rest of the
    /// budget and starts the next frame. Returns the delay used.
    pub fn pace(&mut self, engine: &dyn Engine) -> u32 {
        let delay = self.end_frame(engine.get_ticks());
        if delay > 0 {
            engine.delay(delay);
        }
        self.begin_frame(engine.get_ticks());
        delay
    }

    /// A tokio interval ticking at the target rate, for hosts that drive
    /// frames from an async task. Late ticks are skipped rather than burst.
    ///
    /// Must be called from within a tokio runtime.
    pub fn interval(&self) -> Interval {
        let mut interval = tokio::time::interval(Duration::from_millis(self.budget_ms.max(1) as u64));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_fill_the_budget() {
        let mut timer = FrameTimer::new(60);
        assert_eq!(timer.frame_budget_ms(), 16);

        timer.begin_frame(100);
        assert_eq!(timer.end_frame(106), 10);

        timer.begin_frame(200);
        assert_eq!(timer.end_frame(216), 0);
        assert_eq!(timer.skipped(), 0);

        timer.begin_frame(300);
        assert_eq!(timer.end_frame(340), 0);
        assert_eq!(timer.skipped(), 1);
    }

    #[test]
    fn fps_is_sampled_once_per_interval() {
        let mut timer = FrameTimer::new(50);
        let mut now = 0;
        for _ in 0..49 {
            timer.begin_frame(now);
            now += 20;
            timer.end_frame(now);
        }
        // 980ms in, no full interval yet.
        assert_eq!(timer.fps(), 0);

        timer.begin_frame(now);
        now += 20;
        timer.end_frame(now);
        assert_eq!(timer.fps(), 50);
    }

    #[test]
    fn budget_follows_the_config() {
        let config = EngineConfig::builder().target_fps(25).build().unwrap();
        let timer = FrameTimer::from_config(&config);
        assert_eq!(timer.target_fps(), 25);
        assert_eq!(timer.frame_budget_ms(), 40);

        assert_eq!(FrameTimer::from_config(&EngineConfig::default()).frame_budget_ms(), 16);
    }

    #[test]
    fn zero_target_is_clamped() {
        let timer = FrameTimer::new(0);
        assert_eq!(timer.target_fps(), 1);
        assert_eq!(timer.frame_budget_ms(), 1000);
    }

    #[test]
    fn ticks_wrapping_around() {
        let mut timer = FrameTimer::new(100);
        timer.begin_frame(u32::MAX - 2);
        assert_eq!(timer.end_frame(2), 5);
    }

    #[test]
    fn pace_sleeps_through_the_engine() {
        use crate::render::backends::software::SoftwareEngine;

        let mut engine = SoftwareEngine::new(EngineConfig::default());
        engine.setup().unwrap();

        let mut timer = FrameTimer::new(10);
        timer.begin_frame(engine.get_ticks());
        let delay = timer.pace(&engine);
        assert!(delay > 0 && delay <= 100);
        assert!(engine.get_ticks() >= delay);
    }

    #[tokio::test]
    async fn interval_ticks() {
        let timer = FrameTimer::new(500);
        let mut interval = timer.interval();
        interval.tick().await;
        interval.tick().await;
    }
}

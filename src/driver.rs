/// Fixed-timestep frame driver.
///
/// Wall-clock time goes into an accumulator which is drained in whole
/// `fixed_step` slices; the fractional remainder carries to the next frame.
/// The simulation therefore advances identically whatever the render rate.
/// At most `max_steps_per_frame` steps run per frame; a backlog still left
/// at the cap is dropped rather than chased.

use crate::compute::{sync_overlays, tick};
use crate::config::{Tuning, MAX_STEPS_PER_FRAME};
use crate::entities::SimulationState;

#[derive(Clone, Debug, PartialEq)]
pub struct FrameDriver {
    fixed_step: f32,
    accumulator: f32,
    max_steps_per_frame: u32,
}

impl FrameDriver {
    pub fn new(fixed_step: f32) -> Self {
        Self {
            fixed_step,
            accumulator: 0.0,
            max_steps_per_frame: MAX_STEPS_PER_FRAME,
        }
    }

    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(tuning.fixed_timestep).with_max_steps(tuning.max_steps_per_frame)
    }

    pub fn with_max_steps(mut self, max_steps_per_frame: u32) -> Self {
        self.max_steps_per_frame = max_steps_per_frame.max(1);
        self
    }

    pub fn max_steps_per_frame(&self) -> u32 {
        self.max_steps_per_frame
    }

    pub fn fixed_step(&self) -> f32 {
        self.fixed_step
    }

    /// Time banked towards the next step.
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Feed one rendered frame's wall-clock delta (seconds).  Negative or
    /// non-finite deltas count as zero.
    ///
    /// Returns the new state and the number of physics steps taken.  Nothing
    /// is stepped once the round is won or lost.
    pub fn advance(
        &mut self,
        state: &SimulationState,
        frame_delta: f32,
        tuning: &Tuning,
    ) -> (SimulationState, u32) {
        if state.outcome.is_terminal() {
            return (state.clone(), 0);
        }

        let delta = if frame_delta.is_finite() {
            frame_delta.max(0.0)
        } else {
            0.0
        };
        let mut time = self.accumulator + delta;
        let mut next = state.clone();
        let mut steps = 0;

        while time >= self.fixed_step
            && steps < self.max_steps_per_frame
            && !next.outcome.is_terminal()
        {
            next = tick(&next, self.fixed_step, tuning);
            time -= self.fixed_step;
            steps += 1;
        }

        if steps == self.max_steps_per_frame && time >= self.fixed_step {
            tracing::debug!(backlog = time, "dropping simulation backlog");
            time = 0.0;
        }

        self.accumulator = time;
        sync_overlays(&mut next);
        tracing::debug!(steps, accumulator = self.accumulator, "frame advanced");
        (next, steps)
    }
}

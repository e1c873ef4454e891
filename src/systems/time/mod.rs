use std::time::Duration;

use bevy::prelude::*;

pub mod clock;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Continue,
    Finished,
}

/// Fixed-interval driver for finite timed sequences.
///
/// Each elapsed interval runs one step of the sequence; the first step that
/// reports [`Step::Finished`] stops the schedule for good. A `once` schedule
/// is a one-step sequence after a delay.
#[derive(Clone, Debug)]
pub struct StepSchedule {
    timer: Timer,
    finished: bool,
}

impl StepSchedule {
    pub fn every(interval: Duration) -> Self {
        Self {
            timer: Timer::new(interval, TimerMode::Repeating),
            finished: false,
        }
    }

    pub fn once(delay: Duration) -> Self {
        Self {
            timer: Timer::new(delay, TimerMode::Once),
            finished: false,
        }
    }

    /// Advances by `delta`, running `step` once per elapsed interval.
    pub fn advance<F>(&mut self, delta: Duration, mut step: F) -> Step
    where
        F: FnMut() -> Step,
    {
        if self.finished {
            return Step::Finished;
        }

        self.timer.tick(delta);
        let due = self.timer.times_finished_this_tick();
        for _ in 0..due {
            if step() == Step::Finished {
                self.finished = true;
                return Step::Finished;
            }
        }

        if due > 0 && self.timer.mode() == TimerMode::Once {
            self.finished = true;
            return Step::Finished;
        }
        Step::Continue
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeating_schedule_runs_one_step_per_interval_until_finished() {
        let mut schedule = StepSchedule::every(Duration::from_millis(100));
        let mut remaining = 3;
        let mut calls = 0;
        let mut step = || {
            calls += 1;
            remaining -= 1;
            if remaining == 0 {
                Step::Finished
            } else {
                Step::Continue
            }
        };

        assert_eq!(
            schedule.advance(Duration::from_millis(50), &mut step),
            Step::Continue
        );
        assert_eq!(
            schedule.advance(Duration::from_millis(250), &mut step),
            Step::Continue
        );
        assert_eq!(
            schedule.advance(Duration::from_millis(100), &mut step),
            Step::Finished
        );
        assert_eq!(
            schedule.advance(Duration::from_secs(5), &mut step),
            Step::Finished
        );
        assert_eq!(calls, 3);
        assert!(schedule.is_finished());
    }

    #[test]
    fn once_schedule_fires_a_single_step_after_its_delay() {
        let mut schedule = StepSchedule::once(Duration::from_millis(500));
        let mut fired = 0;

        schedule.advance(Duration::from_millis(499), || {
            fired += 1;
            Step::Continue
        });
        assert_eq!(fired, 0);

        let outcome = schedule.advance(Duration::from_millis(1), || {
            fired += 1;
            Step::Continue
        });
        assert_eq!(outcome, Step::Finished);

        schedule.advance(Duration::from_secs(1), || {
            fired += 1;
            Step::Continue
        });
        assert_eq!(fired, 1);
    }
}

use std::time::Duration;

use bevy::prelude::*;
use chrono::{Datelike, Local, Timelike};

pub struct ClockPlugin;
impl Plugin for ClockPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WallClock>()
            .add_systems(Startup, WallClock::refresh_now)
            .add_systems(Update, WallClock::tick);
    }
}

/// Taskbar format, `h:mm AM`.
pub fn taskbar_time(hour: u32, minute: u32) -> String {
    let suffix = if hour >= 12 { "PM" } else { "AM" };
    let hour = match hour % 12 {
        0 => 12,
        hour => hour,
    };
    format!("{hour}:{minute:02} {suffix}")
}

/// Status bar format, `HH:MM`.
pub fn status_time(hour: u32, minute: u32) -> String {
    format!("{hour:02}:{minute:02}")
}

#[derive(Resource)]
pub struct WallClock {
    timer: Timer,
    pub taskbar: String,
    pub status: String,
    pub year: i32,
}

impl Default for WallClock {
    fn default() -> Self {
        Self {
            timer: Timer::new(Self::REFRESH_INTERVAL, TimerMode::Repeating),
            taskbar: String::new(),
            status: String::new(),
            year: 0,
        }
    }
}

impl WallClock {
    const REFRESH_INTERVAL: Duration = Duration::from_secs(60);

    pub fn set(&mut self, hour: u32, minute: u32, year: i32) {
        self.taskbar = taskbar_time(hour, minute);
        self.status = status_time(hour, minute);
        self.year = year;
    }

    fn refresh_now(mut clock: ResMut<WallClock>) {
        let now = Local::now();
        clock.set(now.hour(), now.minute(), now.year());
    }

    fn tick(time: Res<Time>, mut clock: ResMut<WallClock>) {
        if clock.timer.tick(time.delta()).just_finished() {
            let now = Local::now();
            clock.set(now.hour(), now.minute(), now.year());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midnight_and_noon_read_as_twelve() {
        assert_eq!(taskbar_time(0, 5), "12:05 AM");
        assert_eq!(taskbar_time(12, 0), "12:00 PM");
        assert_eq!(taskbar_time(23, 59), "11:59 PM");
        assert_eq!(taskbar_time(9, 7), "9:07 AM");
    }

    #[test]
    fn status_clock_is_zero_padded_twenty_four_hour() {
        assert_eq!(status_time(0, 5), "00:05");
        assert_eq!(status_time(17, 30), "17:30");
    }

    #[test]
    fn set_updates_both_readouts_and_year() {
        let mut clock = WallClock::default();
        clock.set(14, 3, 2026);
        assert_eq!(clock.taskbar, "2:03 PM");
        assert_eq!(clock.status, "14:03");
        assert_eq!(clock.year, 2026);
    }
}

use chrono::{NaiveDate, NaiveTime};

use crate::model::*;

const MINUTES_PER_DAY: u32 = 24 * 60;
/// Widest real-world UTC offset is ±14:00.
const MAX_OFFSET_MINUTES: i32 = 14 * 60;

/// The venue's static daily calendar: bookable slot marks from opening to
/// closing, plus the UTC offset that anchors a calendar day to absolute time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    open_minute: u32,
    close_minute: u32,
    step_minutes: u32,
    utc_offset_minutes: i32,
}

impl Default for Schedule {
    /// 09:00 to 22:00, hourly, UTC.
    fn default() -> Self {
        Self {
            open_minute: 9 * 60,
            close_minute: 22 * 60,
            step_minutes: 60,
            utc_offset_minutes: 0,
        }
    }
}

impl Schedule {
    pub fn new(
        open_hour: u32,
        close_hour: u32,
        step_minutes: u32,
        utc_offset_minutes: i32,
    ) -> Result<Self, ScheduleError> {
        if open_hour >= close_hour || close_hour > 24 {
            return Err(ScheduleError::InvalidHours { open_hour, close_hour });
        }
        if step_minutes == 0 || step_minutes > MINUTES_PER_DAY {
            return Err(ScheduleError::InvalidStep(step_minutes));
        }
        if utc_offset_minutes.abs() > MAX_OFFSET_MINUTES {
            return Err(ScheduleError::InvalidOffset(utc_offset_minutes));
        }
        Ok(Self {
            open_minute: open_hour * 60,
            close_minute: close_hour * 60,
            step_minutes,
            utc_offset_minutes,
        })
    }

    pub fn step_ms(&self) -> Ms {
        self.step_minutes as Ms * MINUTE_MS
    }

    /// Local midnight to the next local midnight, as absolute instants.
    pub fn day_window(&self, date: NaiveDate) -> Span {
        let utc_midnight = date.and_time(NaiveTime::MIN).and_utc().timestamp_millis();
        let start = utc_midnight - self.utc_offset_minutes as Ms * MINUTE_MS;
        Span::new(start, start + DAY_MS)
    }

    /// Opening to closing on `date`.
    pub fn operating_window(&self, date: NaiveDate) -> Span {
        let day = self.day_window(date);
        Span::new(
            day.start + self.open_minute as Ms * MINUTE_MS,
            day.start + self.close_minute as Ms * MINUTE_MS,
        )
    }

    /// Slot marks as minutes after local midnight. The last mark is strictly
    /// before closing.
    pub fn slot_minutes(&self) -> impl Iterator<Item = u32> + '_ {
        (self.open_minute..self.close_minute).step_by(self.step_minutes as usize)
    }

    pub fn slot_count(&self) -> usize {
        self.slot_minutes().count()
    }

    pub fn slots(&self, date: NaiveDate) -> Vec<TimeSlot> {
        let day_start = self.day_window(date).start;
        self.slot_minutes()
            .map(|minute| TimeSlot {
                minute_of_day: minute,
                label: slot_label(minute),
                at: day_start + minute as Ms * MINUTE_MS,
            })
            .collect()
    }
}

fn slot_label(minute_of_day: u32) -> String {
    format!("{:02}:{:02}", minute_of_day / 60, minute_of_day % 60)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    InvalidHours { open_hour: u32, close_hour: u32 },
    InvalidStep(u32),
    InvalidOffset(i32),
}

impl std::fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleError::InvalidHours { open_hour, close_hour } => write!(
                f,
                "opening hour {open_hour} must be before closing hour {close_hour} (max 24)"
            ),
            ScheduleError::InvalidStep(step) => {
                write!(f, "slot step of {step} minutes is out of range")
            }
            ScheduleError::InvalidOffset(offset) => {
                write!(f, "UTC offset of {offset} minutes is out of range")
            }
        }
    }
}

impl std::error::Error for ScheduleError {}

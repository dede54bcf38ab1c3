//! # Availability Resolution
//!
//! Turns a programmer's declared working-hour windows and existing bookings
//! into the list of hourly slots a visitor can pick for one calendar date.
//!
//! ## Algorithm
//!
//! 1. Keep only active schedules dated today or later.
//! 2. Take the first schedule (by date, then start time) on the requested date.
//! 3. Emit one slot per whole hour from the start hour (inclusive) to the end
//!    hour (exclusive). Minutes are ignored; an empty or inverted window
//!    yields no slots.
//! 4. Mark a slot unavailable when a pending or approved advisory on the same
//!    date holds exactly that time.
//!
//! Dates are plain calendar dates on both sides of every comparison, so no
//! timezone offset can shift a schedule onto a neighbouring day.

use chrono::NaiveDate;

use crate::models::{
    advisory::Advisory, clock::ClockTime, schedule::Schedule, time_slot::TimeSlot,
};

/// Whole-hour slot starts inside `[start, end)`.
///
/// `09:00`–`17:00` gives eight slots; `09:30`–`11:45` gives `09:00` and
/// `10:00` because only the hour components are considered.
pub fn hourly_slots(start: ClockTime, end: ClockTime) -> Vec<ClockTime> {
    (start.hour()..end.hour())
        .filter_map(ClockTime::on_the_hour)
        .collect()
}

/// Picks the schedule that governs `date`, if any.
///
/// Several active schedules on the same date are not merged; the earliest
/// starting one wins so the choice is deterministic.
pub fn schedule_for_date<'a>(
    schedules: &'a [Schedule],
    date: NaiveDate,
    today: NaiveDate,
) -> Option<&'a Schedule> {
    schedules
        .iter()
        .filter(|schedule| schedule.is_active && schedule.date >= today)
        .filter(|schedule| schedule.date == date)
        .min_by_key(|schedule| (schedule.date, schedule.start_time))
}

/// Computes the ordered slot list for one programmer on one date.
///
/// `schedules` and `advisories` are expected to belong to the same
/// programmer; advisories on other dates or in non-blocking statuses are
/// ignored, so callers may pass a wider set than strictly needed.
pub fn resolve_slots(
    schedules: &[Schedule],
    advisories: &[Advisory],
    date: NaiveDate,
    today: NaiveDate,
) -> Vec<TimeSlot> {
    let Some(schedule) = schedule_for_date(schedules, date, today) else {
        return Vec::new();
    };

    let holding: Vec<&Advisory> = advisories
        .iter()
        .filter(|advisory| advisory.date == date && advisory.status.holds_slot())
        .collect();

    hourly_slots(schedule.start_time, schedule.end_time)
        .into_iter()
        .map(|time| {
            let blocker = holding.iter().find(|advisory| advisory.time == time);
            TimeSlot {
                time,
                available: blocker.is_none(),
                advisory_id: blocker.map(|advisory| advisory.id),
            }
        })
        .collect()
}

/// Whether `time` is currently bookable on `date`.
pub fn is_bookable(
    schedules: &[Schedule],
    advisories: &[Advisory],
    date: NaiveDate,
    time: ClockTime,
    today: NaiveDate,
) -> bool {
    resolve_slots(schedules, advisories, date, today)
        .iter()
        .any(|slot| slot.time == time && slot.available)
}

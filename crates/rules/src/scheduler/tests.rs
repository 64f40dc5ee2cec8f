//! Tests for the scheduler module.

use std::str::FromStr;

use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::America::Sao_Paulo;
use cron::Schedule;

use crate::scheduler::cron::{daily_cron, is_cron_due, next_fire};
use crate::scheduler::{ScheduleError, TriggerScheduler};

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

// -- daily_cron -----------------------------------------------------------

#[test]
fn daily_cron_is_six_fields() {
    assert_eq!(daily_cron(hm(9, 0)), "0 0 9 * * *");
    assert_eq!(daily_cron(hm(17, 30)), "0 30 17 * * *");
    assert!(Schedule::from_str(&daily_cron(hm(23, 59))).is_ok());
}

// -- is_cron_due ----------------------------------------------------------

#[test]
fn due_check_uses_configured_timezone() {
    // 09:00 in São Paulo (UTC-3) is 12:00 UTC.
    let schedule = Schedule::from_str(&daily_cron(hm(9, 0))).unwrap();
    let start = utc(2025, 6, 10, 10, 0);
    assert!(!is_cron_due(&schedule, Sao_Paulo, utc(2025, 6, 10, 11, 59), start));
    assert!(is_cron_due(&schedule, Sao_Paulo, utc(2025, 6, 10, 12, 0), start));
}

#[test]
fn next_fire_is_strictly_after() {
    let schedule = Schedule::from_str(&daily_cron(hm(9, 0))).unwrap();
    let at_fire = utc(2025, 6, 10, 12, 0);
    assert_eq!(
        next_fire(&schedule, Sao_Paulo, at_fire),
        Some(utc(2025, 6, 11, 12, 0))
    );
}

// -- TriggerScheduler -----------------------------------------------------

#[test]
fn one_entry_per_time() {
    let sched =
        TriggerScheduler::new(&[hm(9, 0), hm(11, 0), hm(13, 0)], Sao_Paulo, Utc::now()).unwrap();
    assert_eq!(sched.len(), 3);
    assert!(!sched.is_empty());
    assert_eq!(sched.get("11:00").unwrap().cron_expression, "0 0 11 * * *");
    assert_eq!(sched.timezone(), Sao_Paulo);
}

#[test]
fn empty_times_rejected() {
    let err = TriggerScheduler::new(&[], Sao_Paulo, Utc::now()).unwrap_err();
    assert!(matches!(err, ScheduleError::Empty));
}

#[test]
fn not_due_again_after_recording() {
    let mut sched = TriggerScheduler::new(&[hm(9, 0)], Sao_Paulo, utc(2025, 6, 10, 10, 0)).unwrap();
    let fire = utc(2025, 6, 10, 12, 0);
    assert!(sched.is_due("09:00", fire));
    sched.record_trigger_at("09:00", fire);
    assert!(!sched.is_due("09:00", utc(2025, 6, 10, 20, 0)));
    assert!(sched.is_due("09:00", utc(2025, 6, 11, 12, 0)));
}

#[test]
fn nothing_fires_retroactively_at_startup() {
    // Process starts at 10:00 local; the 09:00 trigger waits for tomorrow.
    let sched =
        TriggerScheduler::new(&[hm(9, 0), hm(11, 0)], Sao_Paulo, utc(2025, 6, 10, 13, 0)).unwrap();
    assert_eq!(sched.due(utc(2025, 6, 10, 13, 1)), Vec::<&str>::new());
    assert_eq!(sched.due(utc(2025, 6, 10, 14, 0)), vec!["11:00"]);
}

#[test]
fn take_due_coalesces_and_records() {
    let mut sched =
        TriggerScheduler::new(&[hm(9, 0), hm(11, 0)], Sao_Paulo, utc(2025, 6, 10, 10, 0)).unwrap();
    // A slow run kept the loop busy until 12:00 local.
    let now = utc(2025, 6, 10, 15, 0);
    assert_eq!(sched.take_due(now), vec!["09:00", "11:00"]);
    assert!(sched.take_due(now).is_empty());
    assert_eq!(sched.get("09:00").unwrap().last_triggered, now);
}

#[test]
fn unknown_label_is_never_due() {
    let sched = TriggerScheduler::new(&[hm(9, 0)], Sao_Paulo, utc(2025, 6, 10, 10, 0)).unwrap();
    assert!(!sched.is_due("10:00", utc(2025, 6, 11, 0, 0)));
}

#[test]
fn next_fire_is_earliest_entry() {
    let sched =
        TriggerScheduler::new(&[hm(9, 0), hm(17, 0)], Sao_Paulo, utc(2025, 6, 10, 13, 0)).unwrap();
    // 10:00 local: next is 17:00 local = 20:00 UTC.
    assert_eq!(sched.next_fire(), Some(utc(2025, 6, 10, 20, 0)));
}

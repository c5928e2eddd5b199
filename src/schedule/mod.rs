//! Report scheduling.
//!
//! Daily and weekly fire times come from the configured time of day and
//! weekday, evaluated in a fixed UTC offset. The loop runs one cycle at a
//! time: the next fire time is computed only after the previous cycle,
//! distribution included, has finished.

use crate::config::ScheduleConfig;
use crate::models::ReportKind;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use std::future::Future;
use tracing::{info, warn};

/// Parse a `HH:MM` time of day.
pub fn parse_time(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .with_context(|| format!("Invalid time of day {:?}, expected HH:MM", value))
}

/// Parse `UTC`/`Z` or a `+HH:MM` / `-HH:MM` offset.
pub fn parse_offset(value: &str) -> Result<FixedOffset> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("utc") || value == "Z" {
        return FixedOffset::east_opt(0).context("zero offset");
    }

    let (sign, rest) = match value.as_bytes().first() {
        Some(b'+') => (1, &value[1..]),
        Some(b'-') => (-1, &value[1..]),
        _ => bail!("Invalid timezone {:?}, expected UTC or +HH:MM", value),
    };
    let (hours, minutes) = rest
        .split_once(':')
        .with_context(|| format!("Invalid timezone {:?}, expected UTC or +HH:MM", value))?;
    let hours: i32 = hours.parse().with_context(|| format!("Invalid timezone {:?}", value))?;
    let minutes: i32 = minutes.parse().with_context(|| format!("Invalid timezone {:?}", value))?;
    if hours > 23 || minutes > 59 {
        bail!("Timezone offset out of range: {}", value);
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .with_context(|| format!("Timezone offset out of range: {}", value))
}

/// Cron day-of-week number, sunday = 0. Unknown names fall back to monday.
pub fn weekday_number(name: &str) -> u32 {
    match name.trim().to_lowercase().as_str() {
        "sunday" => 0,
        "monday" => 1,
        "tuesday" => 2,
        "wednesday" => 3,
        "thursday" => 4,
        "friday" => 5,
        "saturday" => 6,
        other => {
            warn!("Unknown weekday {:?}, using monday", other);
            1
        }
    }
}

/// The configured daily and weekly triggers.
#[derive(Debug, Clone)]
pub struct Schedule {
    offset: FixedOffset,
    daily: Option<NaiveTime>,
    weekly: Option<(u32, NaiveTime)>,
}

/// Reports due at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fire {
    pub at: DateTime<Utc>,
    /// Daily before weekly when both are due.
    pub kinds: Vec<ReportKind>,
}

impl Schedule {
    pub fn from_config(config: &ScheduleConfig) -> Result<Self> {
        let offset = parse_offset(&config.timezone)?;
        let daily = if config.daily_enabled {
            Some(parse_time(&config.daily_time)?)
        } else {
            None
        };
        let weekly = if config.weekly_enabled {
            Some((
                weekday_number(&config.weekly_day),
                parse_time(&config.weekly_time)?,
            ))
        } else {
            None
        };

        Ok(Self {
            offset,
            daily,
            weekly,
        })
    }

    /// Cron expression of the daily report, e.g. `0 0 9 * * *`.
    pub fn daily_cron(&self) -> Option<String> {
        self.daily
            .map(|t| format!("0 {} {} * * *", t.minute(), t.hour()))
    }

    /// Cron expression of the weekly report, e.g. `0 0 9 * * 1`.
    pub fn weekly_cron(&self) -> Option<String> {
        self.weekly
            .map(|(day, t)| format!("0 {} {} * * {}", t.minute(), t.hour(), day))
    }

    /// The next instant strictly after `now` at which a report is due.
    pub fn next_fire(&self, now: DateTime<Utc>) -> Option<Fire> {
        let daily = self.daily.map(|t| (self.next_daily(now, t), ReportKind::Daily));
        let weekly = self
            .weekly
            .map(|(day, t)| (self.next_weekly(now, day, t), ReportKind::Weekly));

        let candidates: Vec<(DateTime<Utc>, ReportKind)> = daily.into_iter().chain(weekly).collect();
        let at = candidates.iter().map(|(at, _)| *at).min()?;
        let kinds = candidates
            .into_iter()
            .filter(|(t, _)| *t == at)
            .map(|(_, kind)| kind)
            .collect();

        Some(Fire { at, kinds })
    }

    fn at_local(&self, date: NaiveDate, t: NaiveTime) -> DateTime<Utc> {
        let naive = date.and_time(t);
        // A fixed offset maps every local time to exactly one instant.
        self.offset
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| naive.and_utc())
    }

    fn next_daily(&self, now: DateTime<Utc>, t: NaiveTime) -> DateTime<Utc> {
        let today = now.with_timezone(&self.offset).date_naive();
        let candidate = self.at_local(today, t);
        if candidate > now {
            candidate
        } else {
            self.at_local(today + Duration::days(1), t)
        }
    }

    fn next_weekly(&self, now: DateTime<Utc>, day: u32, t: NaiveTime) -> DateTime<Utc> {
        let local = now.with_timezone(&self.offset);
        let today = local.date_naive();
        let ahead = (day + 7 - local.weekday().num_days_from_sunday()) % 7;
        let candidate = self.at_local(today + Duration::days(i64::from(ahead)), t);
        if candidate > now {
            candidate
        } else {
            self.at_local(today + Duration::days(i64::from(ahead) + 7), t)
        }
    }
}

/// Run scheduled cycles until `stop` resolves.
///
/// Each due report runs to completion before the next fire time is
/// computed. A stop request is honoured between cycles.
pub async fn run_until<S, F, Fut>(schedule: &Schedule, stop: S, mut cycle: F)
where
    S: Future,
    F: FnMut(ReportKind) -> Fut,
    Fut: Future<Output = ()>,
{
    tokio::pin!(stop);
    let mut reference = Utc::now();

    loop {
        let Some(fire) = schedule.next_fire(reference) else {
            info!("No reports enabled, scheduler exiting");
            return;
        };

        info!(
            "Next run at {} ({})",
            fire.at.to_rfc3339(),
            fire.kinds
                .iter()
                .map(|k| k.to_string())
                .collect::<Vec<_>>()
                .join(" + ")
        );

        let wait = (fire.at - Utc::now()).to_std().unwrap_or_default();
        tokio::select! {
            _ = tokio::time::sleep(wait) => {}
            _ = &mut stop => {
                info!("Scheduler stopped");
                return;
            }
        }

        for kind in &fire.kinds {
            cycle(*kind).await;
        }

        reference = Utc::now().max(fire.at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule(daily: &str, day: &str, weekly: &str, tz: &str) -> Schedule {
        Schedule::from_config(&ScheduleConfig {
            daily_time: daily.to_string(),
            weekly_day: day.to_string(),
            weekly_time: weekly.to_string(),
            timezone: tz.to_string(),
            daily_enabled: true,
            weekly_enabled: true,
        })
        .unwrap()
    }

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_cron_expressions() {
        let s = schedule("09:00", "monday", "10:30", "UTC");
        assert_eq!(s.daily_cron().unwrap(), "0 0 9 * * *");
        assert_eq!(s.weekly_cron().unwrap(), "0 30 10 * * 1");

        let s = schedule("07:15", "sunday", "18:05", "UTC");
        assert_eq!(s.weekly_cron().unwrap(), "0 5 18 * * 0");
    }

    #[test]
    fn test_unknown_weekday_falls_back_to_monday() {
        assert_eq!(weekday_number("Funday"), 1);
        assert_eq!(weekday_number("Saturday"), 6);
    }

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset("UTC").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_offset("+05:30").unwrap().local_minus_utc(), 19800);
        assert_eq!(parse_offset("-04:00").unwrap().local_minus_utc(), -14400);
        assert!(parse_offset("America/New_York").is_err());
        assert!(parse_offset("+25:00").is_err());
    }

    #[test]
    fn test_invalid_time_is_rejected() {
        assert!(parse_time("9am").is_err());
        assert!(parse_time("24:00").is_err());
    }

    #[test]
    fn test_next_daily_fire() {
        // 2026-10-14 is a Wednesday.
        let s = schedule("09:00", "monday", "09:00", "UTC");

        let fire = s.next_fire(utc(2026, 10, 14, 8, 0)).unwrap();
        assert_eq!(fire.at, utc(2026, 10, 14, 9, 0));
        assert_eq!(fire.kinds, vec![ReportKind::Daily]);

        let fire = s.next_fire(utc(2026, 10, 14, 9, 0)).unwrap();
        assert_eq!(fire.at, utc(2026, 10, 15, 9, 0));
    }

    #[test]
    fn test_daily_and_weekly_coincide() {
        let s = schedule("09:00", "monday", "09:00", "UTC");
        let fire = s.next_fire(utc(2026, 10, 18, 12, 0)).unwrap();

        assert_eq!(fire.at, utc(2026, 10, 19, 9, 0));
        assert_eq!(fire.kinds, vec![ReportKind::Daily, ReportKind::Weekly]);
    }

    #[test]
    fn test_weekly_fire_after_this_weeks_slot() {
        let mut s = schedule("09:00", "wednesday", "10:00", "UTC");
        s.daily = None;

        let fire = s.next_fire(utc(2026, 10, 14, 9, 30)).unwrap();
        assert_eq!(fire.at, utc(2026, 10, 14, 10, 0));

        let fire = s.next_fire(utc(2026, 10, 14, 10, 0)).unwrap();
        assert_eq!(fire.at, utc(2026, 10, 21, 10, 0));
        assert_eq!(fire.kinds, vec![ReportKind::Weekly]);
    }

    #[test]
    fn test_offset_is_applied() {
        let s = schedule("09:00", "monday", "09:00", "+05:30");

        // 09:00 at +05:30 is 03:30 UTC.
        let fire = s.next_fire(utc(2026, 10, 14, 1, 0)).unwrap();
        assert_eq!(fire.at, utc(2026, 10, 14, 3, 30));

        // 22:00 UTC is already the next local day.
        let fire = s.next_fire(utc(2026, 10, 14, 22, 0)).unwrap();
        assert_eq!(fire.at, utc(2026, 10, 15, 3, 30));
    }

    #[test]
    fn test_nothing_enabled() {
        let s = Schedule::from_config(&ScheduleConfig {
            daily_enabled: false,
            weekly_enabled: false,
            ..Default::default()
        })
        .unwrap();
        assert!(s.next_fire(utc(2026, 10, 14, 8, 0)).is_none());
        assert!(s.daily_cron().is_none());
    }

    #[tokio::test]
    async fn test_stop_before_first_fire_runs_nothing() {
        let s = schedule("09:00", "monday", "09:00", "UTC");
        let mut runs = 0;

        run_until(&s, async {}, |_| {
            runs += 1;
            async {}
        })
        .await;

        assert_eq!(runs, 0);
    }
}

//! Checking that the latest backup is recent enough.
//!

use core::fmt;

use chrono::{DateTime, NaiveDateTime, TimeDelta, TimeZone};
use thiserror::Error;
use tracing::debug;

use crate::{
    invocation::{Invocation, InvocationError},
    runner::{CommandRunner, RunError},
    status::{ParseStatusError, parse_last_backup_time},
};

/// `ctime` style layout used when reporting backup times.
pub const CTIME_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Default maximum backup age, two weeks.
pub const DEFAULT_CRITICAL_SECONDS: u64 = 14 * 24 * 3600;

/// The outcome of a freshness check, as a monitoring system sees it.
#[derive(Hash, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FreshnessVerdict {
    /// The latest backup is within the allowed age.
    Ok,

    /// There is no recent backup, or the check failed.
    Critical,
}

impl FreshnessVerdict {
    /// The exit status a monitoring plugin expects.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::Critical => 2,
        }
    }
}

/// The result of a freshness check with what justified it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Freshness {
    /// The latest backup, within the allowed age.
    Fresh(NaiveDateTime),

    /// The latest backup, older than the allowed age.
    Stale(NaiveDateTime),

    /// The backup times could not be determined.
    Failed(String),
}

impl Freshness {
    /// Compare the age of `last_backup` at `now` with `max_age_seconds`.
    ///
    /// A backup exactly `max_age_seconds` old is still fresh.
    pub fn classify<Tz: TimeZone>(
        last_backup: &DateTime<Tz>,
        max_age_seconds: u64,
        now: &DateTime<Tz>,
    ) -> Self {
        let age = now.clone().signed_duration_since(last_backup.clone());

        // Thresholds beyond what `TimeDelta` can hold are never exceeded.
        let too_old = i64::try_from(max_age_seconds)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .is_some_and(|max_age| age > max_age);

        if too_old {
            Self::Stale(last_backup.naive_local())
        } else {
            Self::Fresh(last_backup.naive_local())
        }
    }

    /// `Ok` for a fresh backup, `Critical` for anything else.
    pub fn verdict(&self) -> FreshnessVerdict {
        match self {
            Self::Fresh(_) => FreshnessVerdict::Ok,
            Self::Stale(_) | Self::Failed(_) => FreshnessVerdict::Critical,
        }
    }
}

impl fmt::Display for Freshness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fresh(time) => write!(f, "OK: Last backup is ok: {}", time.format(CTIME_FORMAT)),
            Self::Stale(time) => write!(f, "CRITICAL: Backup too old: {}", time.format(CTIME_FORMAT)),
            Self::Failed(message) => write!(f, "CRITICAL: Caught exception - {message}"),
        }
    }
}

/// Ask duplicity for the collection status of the target and return the newest backup time.
///
/// Returns the Unix epoch when the target holds no backups.
pub fn query_last_backup_time<R: CommandRunner, Tz: TimeZone>(
    runner: &mut R,
    invocation: &Invocation,
    timezone: &Tz,
) -> Result<DateTime<Tz>, StatusQueryError> {
    let command = invocation.collection_status()?;
    let report = runner.capture(&command)?;

    Ok(parse_last_backup_time(&report, timezone)?)
}

/// Check that the latest backup in the target is at most `max_age_seconds` old at `now`.
///
/// Never fails, any error while querying or parsing the status is reported as
/// [`Freshness::Failed`].
pub fn check_freshness<R: CommandRunner, Tz: TimeZone>(
    runner: &mut R,
    invocation: &Invocation,
    max_age_seconds: u64,
    now: &DateTime<Tz>,
) -> Freshness {
    let freshness = match query_last_backup_time(runner, invocation, &now.timezone()) {
        Ok(last_backup) => Freshness::classify(&last_backup, max_age_seconds, now),
        Err(error) => Freshness::Failed(error.to_string()),
    };

    debug!("{freshness:?}");

    freshness
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum StatusQueryError {
    #[error("Could not build status command: {0}")]
    Invocation(#[from] InvocationError),

    #[error("Could not get collection status: {0}")]
    Run(#[from] RunError),

    #[error("Could not parse collection status: {0}")]
    Parse(#[from] ParseStatusError),
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn huge_threshold_is_never_exceeded() {
        let last_backup = Utc.with_ymd_and_hms(2016, 5, 18, 21, 47, 38).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 5, 18, 21, 47, 38).unwrap();

        let freshness = Freshness::classify(&last_backup, u64::MAX, &now);
        assert_eq!(freshness.verdict(), FreshnessVerdict::Ok);
    }

    #[test]
    fn messages() {
        let time = Utc
            .with_ymd_and_hms(2016, 5, 8, 21, 47, 38)
            .unwrap()
            .naive_utc();

        assert_eq!(
            Freshness::Fresh(time).to_string(),
            "OK: Last backup is ok: Sun May  8 21:47:38 2016"
        );
        assert_eq!(
            Freshness::Stale(time).to_string(),
            "CRITICAL: Backup too old: Sun May  8 21:47:38 2016"
        );
        assert_eq!(
            Freshness::Failed("no such directory".into()).to_string(),
            "CRITICAL: Caught exception - no such directory"
        );
    }
}

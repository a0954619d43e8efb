//! Parsing of duplicity `collection-status` reports.
//!

use core::str::FromStr;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

/// The layout duplicity uses for backup set times, e.g. `Wed May 18 21:47:38 2016`.
pub const STATUS_TIME_FORMAT: &str = "%a %b %d %H:%M:%S %Y";

/// The kind of a backup set.
#[derive(Hash, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackupKind {
    /// A complete snapshot.
    Full,

    /// Only the changes since a previous backup.
    Incremental,
}

impl FromStr for BackupKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Full" => Ok(Self::Full),
            "Incremental" => Ok(Self::Incremental),
            _ => Err(format!("invalid backup kind '{s}'")),
        }
    }
}

/// A backup set listed in a status report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackupRecord {
    /// The kind of backup.
    pub kind: BackupKind,

    /// When the backup was made, as printed by duplicity.
    pub timestamp: NaiveDateTime,
}

/// The backup sets of one target, in the order duplicity listed them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusReport {
    /// The recognised backup sets.
    pub records: Vec<BackupRecord>,
}

impl StatusReport {
    /// Parse the text output of `duplicity collection-status`.
    ///
    /// Lines may end with `\n`, `\r\n` or `\r`. Only lines starting with `Full` or `Incremental`
    /// are records, every other line is ignored. A record without a valid date fails the whole
    /// report.
    pub fn parse(report: &str) -> Result<Self, ParseStatusError> {
        let mut records = Vec::new();

        for line in report.split(['\r', '\n']) {
            let mut fields = line.split_whitespace();

            let Some(first) = fields.next() else {
                continue;
            };
            let Ok(kind) = BackupKind::from_str(first) else {
                continue;
            };

            let date_fields: Vec<&str> = fields.take(5).collect();
            if date_fields.len() < 5 {
                return Err(ParseStatusError::MissingFields {
                    line: line.trim().to_string(),
                    found: date_fields.len() + 1,
                });
            }

            let date = date_fields.join(" ");
            let timestamp = NaiveDateTime::parse_from_str(&date, STATUS_TIME_FORMAT).map_err(
                |source| ParseStatusError::InvalidDate {
                    line: line.trim().to_string(),
                    source,
                },
            )?;

            records.push(BackupRecord { kind, timestamp });
        }

        Ok(Self { records })
    }

    /// The newest backup time in the report, `None` if there are no backups.
    pub fn last_backup(&self) -> Option<NaiveDateTime> {
        self.records.iter().map(|record| record.timestamp).max()
    }

    /// The newest backup time in the report interpreted in `timezone`.
    ///
    /// Returns the Unix epoch if the report holds no backups.
    pub fn last_backup_time<Tz: TimeZone>(
        &self,
        timezone: &Tz,
    ) -> Result<DateTime<Tz>, ParseStatusError> {
        let Some(last_backup) = self.last_backup() else {
            return Ok(timezone.from_utc_datetime(&DateTime::<Utc>::UNIX_EPOCH.naive_utc()));
        };

        timezone
            .from_local_datetime(&last_backup)
            .earliest()
            .ok_or(ParseStatusError::NonexistentTime(last_backup))
    }
}

/// Parse a `collection-status` report and return the newest backup time in `timezone`.
///
/// Returns the Unix epoch if the report holds no `Full` or `Incremental` backups.
pub fn parse_last_backup_time<Tz: TimeZone>(
    report: &str,
    timezone: &Tz,
) -> Result<DateTime<Tz>, ParseStatusError> {
    StatusReport::parse(report)?.last_backup_time(timezone)
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum ParseStatusError {
    #[error("Backup record has {found} fields, expected at least 6: '{line}'")]
    MissingFields { line: String, found: usize },

    #[error("Invalid backup date in '{line}': {source}")]
    InvalidDate {
        line: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Backup time {0} does not exist in the local timezone")]
    NonexistentTime(NaiveDateTime),
}

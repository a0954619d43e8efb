#![allow(dead_code)]

use std::path::Path;

use chrono::{FixedOffset, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeZone, Timelike};
use local_backup::invocation::{Invocation, Passphrase};
use tempfile::TempDir;

/// A `collection-status` report as duplicity prints it.
pub const REPORT: &str = "\
Local and Remote metadata are synchronized, no sync needed.
Last full backup date: Wed May 18 21:47:38 2016
Collection Status
-----------------
Connecting with backend: BackendWrapper
Archive dir: /home/duplicity/.cache/duplicity/3d7f2b1c

Found 0 secondary backup chains.

Found primary backup chain with matching signature chain:
-------------------------
Chain start time: Wed May 18 21:47:38 2016
Chain end time: Fri May 20 03:00:12 2016
Number of contained backup sets: 3
Total number of contained volumes: 3
 Type of backup set:                            Time:      Num volumes:
                Full         Wed May 18 21:47:38 2016                 1
         Incremental         Thu May 19 03:00:05 2016                 1
         Incremental         Fri May 20 03:00:12 2016                 1
-------------------------
No orphaned or incomplete backup sets found.
";

/// Source and target directories that are removed on drop.
pub struct Directories {
    pub from: TempDir,
    pub to: TempDir,
    pub cache: TempDir,
}

impl Directories {
    pub fn new() -> Self {
        Self {
            from: TempDir::new().unwrap(),
            to: TempDir::new().unwrap(),
            cache: TempDir::new().unwrap(),
        }
    }

    pub fn invocation(&self, passphrase: Option<&str>) -> Invocation {
        test_invocation(
            self.from.path(),
            self.to.path(),
            self.cache.path(),
            passphrase,
        )
    }
}

pub fn test_invocation(
    from: &Path,
    to: &Path,
    cache: &Path,
    passphrase: Option<&str>,
) -> Invocation {
    Invocation {
        runtime: "docker".into(),
        image: "wernight/duplicity".into(),
        cache_directory: cache.to_path_buf(),
        from_directory: from.to_path_buf(),
        to_directory: to.to_path_buf(),
        passphrase: passphrase.map(|passphrase| Passphrase::new(passphrase)),
        tty: false,
    }
}

/// UTC, except that the clocks skip 02:00 to 03:00 every night.
#[derive(Clone, Copy, Debug)]
pub struct SpringForward;

impl TimeZone for SpringForward {
    type Offset = FixedOffset;

    fn from_offset(_offset: &FixedOffset) -> Self {
        Self
    }

    fn offset_from_local_date(&self, _local: &NaiveDate) -> LocalResult<FixedOffset> {
        LocalResult::Single(utc_offset())
    }

    fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
        if local.hour() == 2 {
            LocalResult::None
        } else {
            LocalResult::Single(utc_offset())
        }
    }

    fn offset_from_utc_date(&self, _utc: &NaiveDate) -> FixedOffset {
        utc_offset()
    }

    fn offset_from_utc_datetime(&self, _utc: &NaiveDateTime) -> FixedOffset {
        utc_offset()
    }
}

fn utc_offset() -> FixedOffset {
    chrono::Utc.fix()
}

//! Per-target staleness evaluation.

use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use crate::fs::Filesystem;
use crate::ir::Target;

/// Why a target will or will not be rebuilt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Staleness {
    /// The output exists and nothing requires a rebuild.
    Fresh,
    /// The output does not exist or its modification time is unreadable.
    MissingOutput,
    /// The named prerequisite was modified after the output.
    NewerPrerequisite(String),
    /// The named prerequisite target is rebuilt earlier in this run.
    ScheduledPrerequisite(String),
}

impl Staleness {
    /// Report whether the target must be rebuilt.
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        !matches!(self, Self::Fresh)
    }
}

impl fmt::Display for Staleness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fresh => f.write_str("up to date"),
            Self::MissingOutput => f.write_str("output missing"),
            Self::NewerPrerequisite(prereq) => write!(f, "{prereq} is newer"),
            Self::ScheduledPrerequisite(prereq) => write!(f, "{prereq} is being rebuilt"),
        }
    }
}

/// Keys of the targets already placed in the build sequence.
#[derive(Debug, Clone, Default)]
pub struct ScheduledSet<'a> {
    keys: HashSet<&'a str>,
}

impl<'a> ScheduledSet<'a> {
    /// Record that `key` will be rebuilt.
    pub fn insert(&mut self, key: &'a str) -> bool {
        self.keys.insert(key)
    }

    /// Report whether `key` will be rebuilt.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }
}

impl<'a> FromIterator<&'a str> for ScheduledSet<'a> {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

/// Decide whether `target` must be rebuilt.
///
/// A missing output is always stale. Otherwise each prerequisite token is
/// checked in order: a token naming a scheduled target, or an existing path
/// modified strictly after the output, makes the target stale.
#[must_use]
pub fn evaluate(target: &Target, scheduled: &ScheduledSet<'_>, fs: &dyn Filesystem) -> Staleness {
    debug!("Examining target {}", target.name);
    if !fs.exists(&target.name) {
        return Staleness::MissingOutput;
    }
    let Some(output_time) = fs.modified(&target.name) else {
        return Staleness::MissingOutput;
    };

    for prereq in &target.prerequisites {
        if scheduled.contains(prereq) {
            debug!("{prereq} is scheduled before {}", target.name);
            return Staleness::ScheduledPrerequisite(prereq.clone());
        }
        debug!("Checking file {prereq}");
        if let Some(prereq_time) = fs.modified(prereq) {
            let newer = prereq_time > output_time;
            debug!(
                "{prereq} is {} than {}",
                if newer { "newer" } else { "older" },
                target.name
            );
            if newer {
                return Staleness::NewerPrerequisite(prereq.clone());
            }
        }
    }
    Staleness::Fresh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFilesystem;
    use std::time::{Duration, SystemTime};

    fn at(secs: u64) -> Option<SystemTime> {
        Some(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
    }

    /// Filesystem where each listed path exists with the given mtime.
    fn files(entries: &'static [(&'static str, u64)]) -> MockFilesystem {
        let mut fs = MockFilesystem::new();
        fs.expect_exists()
            .returning(move |path| entries.iter().any(|(p, _)| *p == path));
        fs.expect_modified().returning(move |path| {
            entries
                .iter()
                .find(|(p, _)| *p == path)
                .and_then(|(_, secs)| at(*secs))
        });
        fs
    }

    #[test]
    fn missing_output_is_stale() {
        let target = Target::new("app.o", "cc -c app.c", "app.c");
        let fs = files(&[("app.c", 10)]);
        let verdict = evaluate(&target, &ScheduledSet::default(), &fs);
        assert_eq!(verdict, Staleness::MissingOutput);
        assert!(verdict.is_stale());
    }

    #[test]
    fn newer_prerequisite_is_stale() {
        let target = Target::new("app.o", "cc -c app.c", "app.h app.c");
        let fs = files(&[("app.o", 10), ("app.h", 5), ("app.c", 20)]);
        let verdict = evaluate(&target, &ScheduledSet::default(), &fs);
        assert_eq!(verdict, Staleness::NewerPrerequisite("app.c".into()));
    }

    #[test]
    fn equal_mtime_is_fresh() {
        let target = Target::new("app.o", "cc -c app.c", "app.c");
        let fs = files(&[("app.o", 10), ("app.c", 10)]);
        assert_eq!(
            evaluate(&target, &ScheduledSet::default(), &fs),
            Staleness::Fresh
        );
    }

    #[test]
    fn scheduled_prerequisite_is_stale_even_when_older() {
        let target = Target::new("app", "cc -o app app.o", "app.o");
        let fs = files(&[("app", 30), ("app.o", 10)]);
        let scheduled: ScheduledSet<'_> = ["app.o"].into_iter().collect();
        assert_eq!(
            evaluate(&target, &scheduled, &fs),
            Staleness::ScheduledPrerequisite("app.o".into())
        );
    }

    #[test]
    fn scheduled_phony_prerequisite_without_file_is_stale() {
        let target = Target::new("app", "cc -o app app.o", "gen");
        let fs = files(&[("app", 30)]);
        let scheduled: ScheduledSet<'_> = ["gen"].into_iter().collect();
        assert!(evaluate(&target, &scheduled, &fs).is_stale());
    }

    #[test]
    fn output_name_is_checked_not_key() {
        let target = Target::new("app", "cc -o bin/app main.c", "main.c").with_name("bin/app");
        let fs = files(&[("bin/app", 30), ("main.c", 10)]);
        assert_eq!(
            evaluate(&target, &ScheduledSet::default(), &fs),
            Staleness::Fresh
        );
    }
}

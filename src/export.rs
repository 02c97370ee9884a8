//! CSV reports written at the end of a run.

use crate::error::{Error, Result};
use crate::github::GitHubRepo;
use crate::metrics::RepositoryStats;
use crate::types::RepoId;
use chrono::{Duration, NaiveDate};
use std::io;
use std::path::{Path, PathBuf};

pub const PULL_REQUEST_HEADER: [&str; 7] = [
    "Repository",
    "Merged",
    "Closed",
    "Open",
    "ClosedDuration",
    "MergedDuration",
    "OpenDuration",
];

pub const REPOSITORY_HEADER: [&str; 6] = [
    "Repository",
    "Stars",
    "Watchers",
    "Forks",
    "OpenIssues",
    "Size",
];

/// Pull-request statistics of one repository, ready for export.
#[derive(Debug, Clone)]
pub struct RepositoryReport {
    pub repo: RepoId,
    pub stats: RepositoryStats,
}

/// The rows of one output file.
#[derive(Debug, Clone)]
pub enum Report {
    PullRequests(Vec<RepositoryReport>),
    Repositories(Vec<GitHubRepo>),
}

impl Report {
    pub fn len(&self) -> usize {
        match self {
            Self::PullRequests(rows) => rows.len(),
            Self::Repositories(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn write_csv<W: io::Write>(&self, writer: W) -> csv::Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);

        match self {
            Self::PullRequests(rows) => {
                writer.write_record(PULL_REQUEST_HEADER)?;
                for row in rows {
                    let stats = &row.stats;
                    writer.write_record([
                        row.repo.to_string(),
                        stats.merged.to_string(),
                        stats.closed.to_string(),
                        stats.open.to_string(),
                        format_duration(stats.closed_duration),
                        format_duration(stats.merged_duration),
                        format_duration(stats.open_duration),
                    ])?;
                }
            }
            Self::Repositories(repos) => {
                writer.write_record(REPOSITORY_HEADER)?;
                for repo in repos {
                    writer.write_record([
                        repo.full_name.clone(),
                        repo.stargazers_count.to_string(),
                        repo.watchers_count.to_string(),
                        repo.forks_count.to_string(),
                        repo.open_issues_count.to_string(),
                        repo.size.to_string(),
                    ])?;
                }
            }
        }

        writer.flush()?;
        Ok(())
    }

    /// Writes the report to `repos-<date>.csv` inside `dir` and returns the file path.
    ///
    /// The CSV is rendered in memory first so a failure never leaves a truncated file behind.
    pub fn write_to_dir(&self, dir: &Path, date: NaiveDate) -> Result<PathBuf> {
        let path = dir.join(report_file_name(date));

        let mut buffer = Vec::new();
        self.write_csv(&mut buffer).map_err(|e| Error::Export {
            path: path.clone(),
            source: e.into(),
        })?;
        std::fs::write(&path, buffer).map_err(|source| Error::Export {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }
}

pub fn report_file_name(date: NaiveDate) -> String {
    format!("repos-{}.csv", date.format("%Y-%m-%d"))
}

/// Renders a duration the way Go's `time.Duration` prints: `1h30m0s`, `2m3.5s`, `1.5ms`, `0s`.
pub fn format_duration(duration: Duration) -> String {
    let sign = if duration < Duration::zero() { "-" } else { "" };
    let duration = duration.abs();
    let secs = duration.num_seconds().unsigned_abs();
    let nanos = duration.subsec_nanos().unsigned_abs();

    if secs == 0 {
        return match nanos {
            0 => "0s".to_string(),
            1..=999 => format!("{sign}{nanos}ns"),
            1_000..=999_999 => {
                let micros = with_fraction(u64::from(nanos / 1_000), nanos % 1_000, 3);
                format!("{sign}{micros}µs")
            }
            _ => {
                let millis = with_fraction(u64::from(nanos / 1_000_000), nanos % 1_000_000, 6);
                format!("{sign}{millis}ms")
            }
        };
    }

    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = with_fraction(secs % 60, nanos, 9);

    if hours > 0 {
        format!("{sign}{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{sign}{minutes}m{seconds}s")
    } else {
        format!("{sign}{seconds}s")
    }
}

/// `whole` followed by `fraction` as a `digits`-wide decimal with trailing zeros removed.
fn with_fraction(whole: u64, fraction: u32, digits: usize) -> String {
    if fraction == 0 {
        return whole.to_string();
    }
    let fraction = format!("{fraction:0digits$}");
    format!("{whole}.{}", fraction.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> Report {
        Report::PullRequests(vec![
            RepositoryReport {
                repo: RepoId {
                    owner: "actions".to_string(),
                    repo: "checkout".to_string(),
                },
                stats: RepositoryStats {
                    merged: 1,
                    closed: 2,
                    open: 1,
                    merged_duration: Duration::hours(1),
                    closed_duration: Duration::minutes(90),
                    open_duration: Duration::hours(26),
                },
            },
            RepositoryReport {
                repo: RepoId {
                    owner: "actions".to_string(),
                    repo: "cache".to_string(),
                },
                stats: RepositoryStats::default(),
            },
        ])
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::zero()), "0s");
        assert_eq!(format_duration(Duration::minutes(90)), "1h30m0s");
        assert_eq!(format_duration(Duration::hours(26)), "26h0m0s");
        assert_eq!(format_duration(Duration::seconds(123)), "2m3s");
        assert_eq!(format_duration(Duration::milliseconds(90_500)), "1m30.5s");
        assert_eq!(format_duration(Duration::seconds(42)), "42s");
        assert_eq!(format_duration(Duration::microseconds(1_500)), "1.5ms");
        assert_eq!(format_duration(Duration::nanoseconds(2_500)), "2.5µs");
        assert_eq!(format_duration(Duration::nanoseconds(12)), "12ns");
        assert_eq!(format_duration(Duration::seconds(-5)), "-5s");
    }

    #[test]
    fn test_pull_request_report_csv() {
        let mut out = Vec::new();
        sample_report().write_csv(&mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "Repository,Merged,Closed,Open,ClosedDuration,MergedDuration,OpenDuration"
        );
        assert_eq!(lines[1], "actions/checkout,1,2,1,1h30m0s,1h0m0s,26h0m0s");
        assert_eq!(lines[2], "actions/cache,0,0,0,0s,0s,0s");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_repository_report_csv() {
        let repo: GitHubRepo = serde_json::from_str(
            r#"{
                "name": "checkout",
                "full_name": "actions/checkout",
                "owner": { "login": "actions" },
                "stargazers_count": 5000,
                "watchers_count": 5000,
                "forks_count": 1500,
                "open_issues_count": 300,
                "size": 2048
            }"#,
        )
        .unwrap();

        let mut out = Vec::new();
        Report::Repositories(vec![repo]).write_csv(&mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();

        assert_eq!(
            csv,
            "Repository,Stars,Watchers,Forks,OpenIssues,Size\n\
             actions/checkout,5000,5000,1500,300,2048\n"
        );
    }

    #[test]
    fn test_empty_report_has_header_only() {
        let mut out = Vec::new();
        Report::PullRequests(Vec::new()).write_csv(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Repository,Merged,Closed,Open,ClosedDuration,MergedDuration,OpenDuration\n"
        );
    }

    #[test]
    fn test_write_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();

        let path = sample_report().write_to_dir(dir.path(), date).unwrap();

        assert_eq!(path.file_name().unwrap(), "repos-2024-02-29.csv");
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("Repository,Merged"));
        assert!(contents.contains("actions/checkout"));
    }

    #[test]
    fn test_write_to_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let err = sample_report().write_to_dir(&missing, date).unwrap_err();
        assert!(matches!(err, Error::Export { .. }));
        assert!(!missing.join("repos-2024-01-01.csv").exists());
    }
}

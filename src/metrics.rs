use crate::github::{GitHubPR, PRState};
use chrono::{DateTime, Duration, Utc};

/// Pull-request lifecycle summary for one repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepositoryStats {
    /// Number of closed PRs that were merged.
    pub merged: usize,
    /// Number of closed PRs, merged or not.
    pub closed: usize,
    /// Number of PRs still open.
    pub open: usize,
    /// Average time from creation to merge.
    pub merged_duration: Duration,
    /// Average time from creation to close.
    pub closed_duration: Duration,
    /// Average age of the open PRs at `now`.
    pub open_duration: Duration,
}

impl Default for RepositoryStats {
    fn default() -> Self {
        Self {
            merged: 0,
            closed: 0,
            open: 0,
            merged_duration: Duration::zero(),
            closed_duration: Duration::zero(),
            open_duration: Duration::zero(),
        }
    }
}

/// Running count and total duration of one lifecycle bucket.
#[derive(Debug)]
struct Bucket {
    count: usize,
    total: Duration,
}

impl Bucket {
    fn new() -> Self {
        Self {
            count: 0,
            total: Duration::zero(),
        }
    }

    fn add(&mut self, elapsed: Duration) {
        self.count += 1;
        // Clock skew can put an end before its start.
        self.total = self.total + elapsed.max(Duration::zero());
    }

    fn average(&self) -> Duration {
        match i32::try_from(self.count) {
            Ok(0) => Duration::zero(),
            Ok(count) => self.total / count,
            Err(_) => Duration::milliseconds(self.total.num_milliseconds() / self.count as i64),
        }
    }
}

/// Calculates lifecycle statistics from a list of pull requests.
///
/// Each PR is classified by its own recorded state, whatever filter was used to fetch it.
/// `now` is the reference point for the age of open PRs; everything else depends only on `prs`.
pub fn calculate_stats(prs: &[GitHubPR], now: DateTime<Utc>) -> RepositoryStats {
    let mut merged = Bucket::new();
    let mut closed = Bucket::new();
    let mut open = Bucket::new();

    for pr in prs {
        match pr.state {
            PRState::Closed => {
                // A closed PR without a close time still counts, at zero duration.
                let closed_at = pr.closed_at.or(pr.merged_at).unwrap_or(pr.created_at);
                closed.add(closed_at - pr.created_at);

                if let Some(merged_at) = pr.merged_at {
                    merged.add(merged_at - pr.created_at);
                }
            }
            PRState::Open => open.add(now - pr.created_at),
            PRState::Unknown => {
                tracing::warn!(number = pr.number, "Skipping pull request with unknown state");
            }
        }
    }

    RepositoryStats {
        merged: merged.count,
        closed: closed.count,
        open: open.count,
        merged_duration: merged.average(),
        closed_duration: closed.average(),
        open_duration: open.average(),
    }
}

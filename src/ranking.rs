use crate::models::RepoSummary;
use crate::types::CandidateRepo;

/// Drops forks, puts the most recently pushed repositories first and keeps at most `limit`.
pub fn select_candidates(repos: Vec<CandidateRepo>, limit: usize) -> Vec<CandidateRepo> {
    let mut candidates: Vec<CandidateRepo> = repos.into_iter().filter(|repo| !repo.fork).collect();
    // `None < Some(_)`, so repositories never pushed to end up last
    candidates.sort_by(|a, b| b.pushed_at.cmp(&a.pushed_at));
    candidates.truncate(limit);
    candidates
}

/// Orders by commit count, highest first, keeping earlier entries ahead on ties.
pub fn rank(mut summaries: Vec<RepoSummary>, show: usize) -> Vec<RepoSummary> {
    summaries.sort_by(|a, b| b.commits.cmp(&a.commits));
    summaries.truncate(show);
    summaries
}

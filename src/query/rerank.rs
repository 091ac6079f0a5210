// src/query/rerank.rs
use crate::types::JobSummary;

/// Narrow the server's result set by the raw search text.
///
/// Exact (trimmed, case-insensitive) title matches win outright: when any
/// exist, only they are returned. Otherwise jobs whose title or job type
/// contains the term are kept. Server order is preserved in every case, and
/// an empty term returns the input unchanged.
pub fn rerank<'a>(jobs: &'a [JobSummary], search: &str) -> Vec<&'a JobSummary> {
    let term = search.trim().to_lowercase();
    if term.is_empty() {
        return jobs.iter().collect();
    }

    let exact: Vec<&JobSummary> = jobs
        .iter()
        .filter(|job| job.title().trim().to_lowercase() == term)
        .collect();
    if !exact.is_empty() {
        return exact;
    }

    jobs.iter()
        .filter(|job| {
            job.title().to_lowercase().contains(&term)
                || job.job_type().to_lowercase().contains(&term)
        })
        .collect()
}

/// Owned variant for publishing to renderers
pub fn rerank_owned(jobs: &[JobSummary], search: &str) -> Vec<JobSummary> {
    rerank(jobs, search).into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(jobs: &[&JobSummary]) -> Vec<String> {
        jobs.iter().map(|job| job.title().to_string()).collect()
    }

    fn sample() -> Vec<JobSummary> {
        vec![
            JobSummary::new("1", "Engineer", "Full-time"),
            JobSummary::new("2", "Senior Engineer", "Full-time"),
        ]
    }

    #[test]
    fn test_exact_match_overrides_partial_matches() {
        let jobs = sample();
        assert_eq!(titles(&rerank(&jobs, "Engineer")), vec!["Engineer"]);
        assert_eq!(titles(&rerank(&jobs, "  engineer ")), vec!["Engineer"]);
    }

    #[test]
    fn test_substring_fallback_is_case_insensitive() {
        let jobs = sample();
        assert_eq!(
            titles(&rerank(&jobs, "engin")),
            vec!["Engineer", "Senior Engineer"]
        );
    }

    #[test]
    fn test_empty_search_passes_through_in_order() {
        let jobs = vec![
            JobSummary::new("b", "Zeta", "Contract"),
            JobSummary::new("a", "Alpha", "Internship"),
        ];
        assert_eq!(titles(&rerank(&jobs, "")), vec!["Zeta", "Alpha"]);
        assert_eq!(titles(&rerank(&jobs, "   ")), vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn test_job_type_matches_when_title_does_not() {
        let jobs = vec![
            JobSummary::new("1", "Designer", "Internship"),
            JobSummary::new("2", "Analyst", "Full-time"),
        ];
        assert_eq!(titles(&rerank(&jobs, "intern")), vec!["Designer"]);
    }

    #[test]
    fn test_exact_matches_keep_server_order() {
        let jobs = vec![
            JobSummary::new("1", "Tester", "Contract"),
            JobSummary::new("2", "QA Tester", "Contract"),
            JobSummary::new("3", "tester ", "Full-time"),
        ];
        let ranked = rerank(&jobs, "TESTER");
        let ids: Vec<&str> = ranked.iter().map(|job| job.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_missing_fields_never_match() {
        let mut untitled = JobSummary::new("1", "", "");
        untitled.title = None;
        untitled.job_type = None;
        let jobs = vec![untitled];
        assert!(rerank(&jobs, "dev").is_empty());
    }
}

use super::domain::{Job, JobType};

/// Optional listing filters, mirroring the search controls: free text over
/// title and company, a location fragment, and an exact employment type.
///
/// Blank strings count as inactive, so a submitted-but-empty search box never
/// narrows the listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilter {
    pub search: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<JobType>,
}

impl JobFilter {
    pub fn is_empty(&self) -> bool {
        active(&self.search).is_none() && active(&self.location).is_none() && self.job_type.is_none()
    }

    /// True when the job passes every active filter. Text and location use
    /// case-insensitive substring matching; type is an exact match.
    pub fn matches(&self, job: &Job) -> bool {
        if let Some(needle) = active(&self.search) {
            let needle = needle.to_lowercase();
            let in_title = job.title.to_lowercase().contains(&needle);
            let in_company = job.company.to_lowercase().contains(&needle);
            if !in_title && !in_company {
                return false;
            }
        }

        if let Some(fragment) = active(&self.location) {
            if !job.location.to_lowercase().contains(&fragment.to_lowercase()) {
                return false;
            }
        }

        if let Some(job_type) = self.job_type {
            if job.job_type != job_type {
                return false;
            }
        }

        true
    }

    /// Produces the matching subsequence, preserving the input order.
    pub fn apply(&self, jobs: &[Job]) -> Vec<Job> {
        jobs.iter()
            .filter(|job| self.matches(job))
            .cloned()
            .collect()
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample::sample_jobs;

    fn filter(
        search: Option<&str>,
        location: Option<&str>,
        job_type: Option<JobType>,
    ) -> JobFilter {
        JobFilter {
            search: search.map(str::to_string),
            location: location.map(str::to_string),
            job_type,
        }
    }

    #[test]
    fn no_filters_keep_the_full_listing() {
        let jobs = sample_jobs();
        let filtered = JobFilter::default().apply(&jobs);
        assert_eq!(filtered.len(), 3);
    }

    #[test]
    fn text_filter_is_a_case_insensitive_substring_over_title_and_company() {
        let jobs = sample_jobs();

        let by_title = filter(Some("frontend"), None, None).apply(&jobs);
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].title, "Senior Frontend Developer");

        let by_company = filter(Some("startup"), None, None).apply(&jobs);
        assert_eq!(by_company.len(), 1);
        assert_eq!(by_company[0].company, "StartupXYZ");
    }

    #[test]
    fn location_filter_is_a_case_insensitive_substring() {
        let jobs = sample_jobs();
        let filtered = filter(None, Some("francisco"), None).apply(&jobs);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].location, "San Francisco, CA");
    }

    #[test]
    fn type_filter_is_an_exact_match() {
        let jobs = sample_jobs();
        let filtered = filter(None, None, Some(JobType::Contract)).apply(&jobs);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "UX Designer");
        assert!(filtered.iter().all(|job| job.job_type != JobType::FullTime));
    }

    #[test]
    fn blank_strings_are_inactive_filters() {
        let jobs = sample_jobs();
        let filtered = filter(Some("   "), Some(""), None).apply(&jobs);
        assert_eq!(filtered.len(), 3);
    }

    #[test]
    fn filtering_is_idempotent() {
        let jobs = sample_jobs();
        let filter = filter(Some("designer"), Some("remote"), Some(JobType::Contract));
        let once = filter.apply(&jobs);
        let twice = filter.apply(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn filter_order_does_not_matter() {
        let jobs = sample_jobs();
        let combined = filter(Some("developer"), Some("san"), Some(JobType::FullTime));

        // Applying the three filters one at a time, in either order, matches
        // the combined pass.
        let text_first = filter(None, Some("san"), Some(JobType::FullTime))
            .apply(&filter(Some("developer"), None, None).apply(&jobs));
        let type_first = filter(Some("developer"), Some("san"), None)
            .apply(&filter(None, None, Some(JobType::FullTime)).apply(&jobs));

        assert_eq!(combined.apply(&jobs), text_first);
        assert_eq!(text_first, type_first);
    }
}

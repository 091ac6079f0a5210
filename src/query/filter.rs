// src/query/filter.rs
//! Filter state, partial updates to it, and the query tuple derived from it

/// Slider range of the original salary control, in thousands per month
pub const SALARY_BAND_MIN: u64 = 10;
pub const SALARY_BAND_MAX: u64 = 100;
/// Width of the band the slider selects, in thousands
pub const SALARY_BAND_WIDTH: u64 = 30;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Raw text as typed, before debouncing
    pub search: String,
    pub job_type: Option<String>,
    pub location: Option<String>,
    pub min_salary: Option<u64>,
    pub max_salary: Option<u64>,
    pub remote: bool,
}

/// A partial update to [`FilterState`].
///
/// `None` leaves a field alone. For the optional filters, `Some(None)`
/// clears the field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub search: Option<String>,
    pub job_type: Option<Option<String>>,
    pub location: Option<Option<String>>,
    pub min_salary: Option<Option<u64>>,
    pub max_salary: Option<Option<u64>>,
    pub remote: Option<bool>,
}

impl FilterPatch {
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn job_type(mut self, job_type: Option<String>) -> Self {
        self.job_type = Some(job_type);
        self
    }

    pub fn location(mut self, location: Option<String>) -> Self {
        self.location = Some(location);
        self
    }

    pub fn salary(mut self, min: Option<u64>, max: Option<u64>) -> Self {
        self.min_salary = Some(min);
        self.max_salary = Some(max);
        self
    }

    /// Both bounds from a single slider position, see [`SalaryBand`]
    pub fn salary_band(self, band: SalaryBand) -> Self {
        self.salary(Some(band.min()), Some(band.max()))
    }

    /// Toggle remote-only. Turning it on also clears `location`, since a
    /// location filter and remote-only are mutually exclusive.
    pub fn remote_only(mut self, remote: bool) -> Self {
        self.remote = Some(remote);
        if remote {
            self.location = Some(None);
        }
        self
    }

    /// Reset every field to its empty default
    pub fn clear_all() -> Self {
        Self {
            search: Some(String::new()),
            job_type: Some(None),
            location: Some(None),
            min_salary: Some(None),
            max_salary: Some(None),
            remote: Some(false),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl FilterState {
    /// Merge a patch in place. Returns true when `search` changed, which is
    /// the caller's cue to restart the debounce timer.
    pub fn apply(&mut self, patch: FilterPatch) -> bool {
        let mut search_changed = false;
        if let Some(search) = patch.search {
            search_changed = search != self.search;
            self.search = search;
        }
        if let Some(job_type) = patch.job_type {
            self.job_type = job_type;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(min) = patch.min_salary {
            self.min_salary = min;
        }
        if let Some(max) = patch.max_salary {
            self.max_salary = max;
        }
        if let Some(remote) = patch.remote {
            self.remote = remote;
        }
        search_changed
    }
}

/// The single-slider salary control: position `v` selects
/// `[v * 1000, (v + 30) * 1000]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalaryBand(u64);

impl SalaryBand {
    /// Positions outside the slider's range are clamped onto it
    pub fn from_slider(position: u64) -> Self {
        Self(position.clamp(SALARY_BAND_MIN, SALARY_BAND_MAX))
    }

    pub fn position(&self) -> u64 {
        self.0
    }

    pub fn min(&self) -> u64 {
        self.0 * 1000
    }

    pub fn max(&self) -> u64 {
        (self.0 + SALARY_BAND_WIDTH) * 1000
    }
}

/// The effective parameters of one list request.
///
/// Built from the filter with the debounced search text; empty strings are
/// normalized to absent so that `""` and "not set" compare equal and are
/// both left out of the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobQuery {
    pub search: Option<String>,
    pub job_type: Option<String>,
    pub location: Option<String>,
    pub min_salary: Option<u64>,
    pub max_salary: Option<u64>,
    pub remote: bool,
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl JobQuery {
    pub fn from_filter(filter: &FilterState, debounced_search: &str) -> Self {
        Self {
            search: non_empty(debounced_search),
            job_type: filter.job_type.as_deref().and_then(non_empty),
            location: filter.location.as_deref().and_then(non_empty),
            min_salary: filter.min_salary,
            max_salary: filter.max_salary,
            remote: filter.remote,
        }
    }

    /// Query-string pairs in wire naming; absent values produce no pair
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(job_type) = &self.job_type {
            pairs.push(("jobType", job_type.clone()));
        }
        if let Some(location) = &self.location {
            pairs.push(("location", location.clone()));
        }
        if let Some(min) = self.min_salary {
            pairs.push(("minSalary", min.to_string()));
        }
        if let Some(max) = self.max_salary {
            pairs.push(("maxSalary", max.to_string()));
        }
        if self.remote {
            pairs.push(("remote", "true".to_string()));
        }
        pairs
    }
}

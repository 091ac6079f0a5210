// src/display.rs
//! Plain-text rendering of jobs for the terminal

use chrono::{DateTime, Utc};

use crate::query::JobListView;
use crate::types::{Job, JobSummary, SalaryRange};

const NOT_AVAILABLE: &str = "Not available";

fn plural(count: i64, unit: &str) -> String {
    format!("{} {}{} ago", count, unit, if count > 1 { "s" } else { "" })
}

/// "3 hours ago" style age label. Future or unknown timestamps read as
/// "Just now".
pub fn time_ago(created_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(created_at) = created_at else {
        return "Just now".to_string();
    };

    let minutes = (now - created_at).num_minutes();
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        plural(days, "day")
    } else if hours > 0 {
        plural(hours, "hour")
    } else if minutes > 0 {
        plural(minutes, "minute")
    } else {
        "Just now".to_string()
    }
}

fn thousands(amount: u64) -> String {
    if amount % 1000 == 0 {
        (amount / 1000).to_string()
    } else {
        (amount as f64 / 1000.0).to_string()
    }
}

pub fn salary_label(range: Option<&SalaryRange>) -> String {
    match range {
        Some(SalaryRange {
            min: Some(min),
            max: Some(max),
            ..
        }) => format!("{}K - {}K", thousands(*min), thousands(*max)),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn or_not_available(value: &str) -> &str {
    if value.is_empty() {
        NOT_AVAILABLE
    } else {
        value
    }
}

/// Card for the list view: title, type, salary, age and the first two
/// requirements
pub fn job_card(job: &JobSummary, now: DateTime<Utc>) -> String {
    let mut card = format!(
        "{}\n  {} | {} | {}\n",
        or_not_available(job.title()),
        or_not_available(job.job_type()),
        salary_label(job.salary_range().as_ref()),
        time_ago(job.created_at(), now),
    );

    let requirements = job.requirements();
    if requirements.is_empty() {
        card.push_str(&format!("  - {}\n", NOT_AVAILABLE));
    } else {
        for requirement in requirements.iter().take(2) {
            card.push_str(&format!("  - {}\n", requirement));
        }
    }
    card.push_str(&format!("  id: {}\n", job.id));
    card
}

pub fn job_list(view: &JobListView, now: DateTime<Utc>) -> String {
    if view.jobs.is_empty() {
        return if view.loaded {
            "Data not available\n".to_string()
        } else {
            "Loading...\n".to_string()
        };
    }

    view.jobs
        .iter()
        .map(|job| job_card(job, now))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn job_detail(job: &Job) -> String {
    let mut out = format!(
        "{}\n{} • {}\n{}\nSalary: {}\n",
        job.title,
        job.company_name,
        job.location,
        job.job_type,
        salary_label(job.salary_range.as_ref()),
    );
    if let Some(deadline) = &job.application_deadline {
        out.push_str(&format!("Apply by: {}\n", deadline));
    }
    out.push('\n');
    out.push_str(&job.description);
    out.push('\n');
    out
}

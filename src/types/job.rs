// src/types/job.rs
//! Job records as the backend serves them, plus the payloads we send back

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use super::lenient::{rfc3339, take_id, take_string, take_timestamp};
use crate::error::ApiError;

pub const DEFAULT_CURRENCY: &str = "INR";
pub const DEFAULT_PERIOD: &str = "per_month";

// ===== Listing =====

/// A job as it appears in the list endpoint.
///
/// Only `title` and `jobType` are interpreted, and only when they are
/// strings. The id comes from `_id` or `id`. Every other field is kept in
/// `extra` and written back out untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct JobSummary {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "jobType", skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<Map<String, Value>> for JobSummary {
    fn from(mut fields: Map<String, Value>) -> Self {
        Self {
            id: take_id(&mut fields),
            title: take_string(&mut fields, "title"),
            job_type: take_string(&mut fields, "jobType"),
            extra: fields,
        }
    }
}

impl JobSummary {
    pub fn new(id: impl Into<String>, title: impl Into<String>, job_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: Some(title.into()),
            job_type: Some(job_type.into()),
            extra: Map::new(),
        }
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn job_type(&self) -> &str {
        self.job_type.as_deref().unwrap_or("")
    }

    /// `createdAt` from the pass-through fields, if it parses as RFC 3339
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.extra.get("createdAt").and_then(rfc3339)
    }

    pub fn salary_range(&self) -> Option<SalaryRange> {
        self.extra
            .get("salaryRange")
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn requirements(&self) -> Vec<String> {
        self.extra
            .get("requirements")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

// ===== Detail =====

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
}

/// Full record from the detail endpoint. `createdAt` is read only when it is
/// RFC 3339; otherwise it stays in `extra` as sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "Map<String, Value>")]
pub struct Job {
    pub id: String,
    pub title: String,
    pub company_name: String,
    pub location: String,
    pub job_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_range: Option<SalaryRange>,
    pub description: String,
    pub requirements: Vec<String>,
    pub responsibilities: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_deadline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Typed part of a [`Job`] once the id and timestamp are taken out
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobFields {
    #[serde(default)]
    title: String,
    #[serde(default)]
    company_name: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    job_type: String,
    #[serde(default)]
    salary_range: Option<SalaryRange>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    requirements: Vec<String>,
    #[serde(default)]
    responsibilities: Vec<String>,
    #[serde(default)]
    application_deadline: Option<String>,
    #[serde(default)]
    is_published: Option<bool>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl TryFrom<Map<String, Value>> for Job {
    type Error = serde_json::Error;

    fn try_from(mut fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let id = take_id(&mut fields);
        let created_at = take_timestamp(&mut fields, "createdAt");
        let body: JobFields = serde_json::from_value(Value::Object(fields))?;

        Ok(Self {
            id,
            title: body.title,
            company_name: body.company_name,
            location: body.location,
            job_type: body.job_type,
            salary_range: body.salary_range,
            description: body.description,
            requirements: body.requirements,
            responsibilities: body.responsibilities,
            application_deadline: body.application_deadline,
            is_published: body.is_published,
            created_at,
            extra: body.extra,
        })
    }
}

// ===== Job types =====

/// Categories the backend accepts for `jobType`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobType {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    #[serde(rename = "Contract")]
    Contract,
    #[serde(rename = "Internship")]
    Internship,
}

impl JobType {
    pub const ALL: [JobType; 4] = [
        JobType::FullTime,
        JobType::PartTime,
        JobType::Contract,
        JobType::Internship,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "Full-time",
            JobType::PartTime => "Part-time",
            JobType::Contract => "Contract",
            JobType::Internship => "Internship",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobType::ALL
            .into_iter()
            .find(|job_type| job_type.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "Unknown job type: {}. Use one of: Full-time, Part-time, Contract, Internship",
                    s
                )
            })
    }
}

// ===== Outgoing payloads =====

/// Form input for a new posting
#[derive(Debug, Clone)]
pub struct JobDraft {
    pub title: String,
    pub company_name: String,
    pub location: String,
    pub job_type: JobType,
    pub salary_min: Option<u64>,
    pub salary_max: Option<u64>,
    pub application_deadline: Option<NaiveDate>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    pub company_name: String,
    pub location: String,
    pub job_type: JobType,
    pub salary_range: SalaryRange,
    pub description: String,
    pub requirements: Vec<String>,
    pub responsibilities: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_deadline: Option<NaiveDate>,
    pub is_published: bool,
}

impl JobDraft {
    /// Shape the draft into the create payload.
    ///
    /// A zero salary counts as "not entered", so the range check only fires
    /// when both bounds carry a value.
    pub fn into_payload(self) -> Result<NewJob, ApiError> {
        let min = self.salary_min.filter(|v| *v > 0);
        let max = self.salary_max.filter(|v| *v > 0);
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(ApiError::InvalidDraft(
                    "Minimum salary cannot be greater than maximum salary.".to_string(),
                ));
            }
        }

        Ok(NewJob {
            title: self.title.trim().to_string(),
            company_name: self.company_name.trim().to_string(),
            location: self.location,
            job_type: self.job_type,
            salary_range: SalaryRange {
                min,
                max,
                currency: Some(DEFAULT_CURRENCY.to_string()),
                period: Some(DEFAULT_PERIOD.to_string()),
            },
            description: self.description,
            requirements: Vec::new(),
            responsibilities: Vec::new(),
            application_deadline: self.application_deadline,
            is_published: true,
        })
    }
}

/// Fields the edit form sends back on update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobUpdate {
    pub title: String,
    pub company_name: String,
    pub location: String,
    pub job_type: String,
    pub description: String,
}

impl From<&Job> for JobUpdate {
    fn from(job: &Job) -> Self {
        Self {
            title: job.title.clone(),
            company_name: job.company_name.clone(),
            location: job.location.clone(),
            job_type: job.job_type.clone(),
            description: job.description.clone(),
        }
    }
}

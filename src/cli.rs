// src/cli.rs
use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

use crate::app_log;
use crate::config::ConfigManager;
use crate::core::JobApiClient;
use crate::display;
use crate::error::ApiError;
use crate::query::{
    rerank, CoordinatorSettings, FilterPatch, FilterState, JobListView, JobQuery,
    JobQueryCoordinator, SalaryBand,
};
use crate::session::check_admin_access;
use crate::types::{Credentials, JobDraft, JobType, JobUpdate};

#[derive(Parser)]
#[command(name = "jobboard")]
#[command(about = "Browse and manage postings on the job board")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Backend base URL, overrides config.yaml and JOB_BOARD_API_URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List jobs matching the given filters
    Jobs(FilterArgs),
    /// Interactive search: each line typed is a search edit, `:help` for filters
    Browse,
    /// Show one job in full
    Show { id: String },
    /// Publish a new job (admin)
    Create(CreateArgs),
    /// Edit an existing job (admin)
    Update(UpdateArgs),
    /// Delete a job (admin)
    Delete {
        id: String,
        #[command(flatten)]
        auth: AuthArgs,
    },
    /// Log in and print the session user
    Login(AuthArgs),
    /// Create an account
    Signup(AuthArgs),
    /// Print the user behind the session
    Me(AuthArgs),
    /// Check whether the session has admin access
    AdminCheck(AuthArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub job_type: Option<String>,
    #[arg(long, conflicts_with = "remote")]
    pub location: Option<String>,
    #[arg(long)]
    pub min_salary: Option<u64>,
    #[arg(long)]
    pub max_salary: Option<u64>,
    /// Slider position in thousands; selects [N, N+30] thousand
    #[arg(long, conflicts_with_all = ["min_salary", "max_salary"])]
    pub salary_band: Option<u64>,
    #[arg(long)]
    pub remote: bool,
}

impl FilterArgs {
    pub fn to_patch(&self) -> FilterPatch {
        let mut patch = FilterPatch::default()
            .job_type(self.job_type.clone())
            .location(self.location.clone())
            .salary(self.min_salary, self.max_salary)
            .remote_only(self.remote);
        if let Some(search) = &self.search {
            patch = patch.search(search.clone());
        }
        if let Some(position) = self.salary_band {
            patch = patch.salary_band(SalaryBand::from_slider(position));
        }
        patch
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct AuthArgs {
    #[arg(long, env = "JOB_BOARD_EMAIL")]
    pub email: Option<String>,
    #[arg(long, env = "JOB_BOARD_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

impl AuthArgs {
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.email, &self.password) {
            (Some(email), Some(password)) => Some(Credentials::new(email, password)),
            _ => None,
        }
    }

    fn require(&self) -> Result<Credentials> {
        self.credentials()
            .ok_or_else(|| anyhow::anyhow!("--email and --password are required"))
    }
}

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub company: String,
    #[arg(long)]
    pub location: String,
    #[arg(long)]
    pub job_type: JobType,
    #[arg(long)]
    pub salary_min: Option<u64>,
    #[arg(long)]
    pub salary_max: Option<u64>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub deadline: Option<NaiveDate>,
    #[arg(long)]
    pub description: String,
    #[command(flatten)]
    pub auth: AuthArgs,
}

#[derive(Args, Debug, Clone)]
pub struct UpdateArgs {
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub job_type: Option<JobType>,
    #[arg(long)]
    pub description: Option<String>,
    #[command(flatten)]
    pub auth: AuthArgs,
}

impl UpdateArgs {
    /// Overlay the given flags onto the job's current values
    pub fn apply_to(&self, mut update: JobUpdate) -> JobUpdate {
        if let Some(title) = &self.title {
            update.title = title.clone();
        }
        if let Some(company) = &self.company {
            update.company_name = company.clone();
        }
        if let Some(location) = &self.location {
            update.location = location.clone();
        }
        if let Some(job_type) = self.job_type {
            update.job_type = job_type.to_string();
        }
        if let Some(description) = &self.description {
            update.description = description.clone();
        }
        update
    }
}

/// One line of `browse` input
#[derive(Debug, PartialEq)]
pub enum BrowseInput {
    Patch(FilterPatch),
    Help,
    Quit,
    Invalid(String),
}

const BROWSE_HELP: &str = "Type to search. Filters:
  :type <Full-time|Part-time|Contract|Internship>   (no argument clears)
  :location <city>                                  (no argument clears)
  :salary <10-100>    salary band in thousands      (no argument clears)
  :min <amount>  :max <amount>
  :remote on|off
  :clear   :help   :quit";

fn optional(arg: &str) -> Option<String> {
    if arg.is_empty() {
        None
    } else {
        Some(arg.to_string())
    }
}

fn parse_amount(arg: &str) -> std::result::Result<Option<u64>, String> {
    if arg.is_empty() {
        return Ok(None);
    }
    arg.parse()
        .map(Some)
        .map_err(|_| format!("Not a number: {}", arg))
}

pub fn parse_browse_line(line: &str) -> BrowseInput {
    let Some(rest) = line.strip_prefix(':') else {
        return BrowseInput::Patch(FilterPatch::default().search(line));
    };

    let (command, arg) = match rest.split_once(' ') {
        Some((command, arg)) => (command, arg.trim()),
        None => (rest.trim(), ""),
    };

    match command {
        "q" | "quit" => BrowseInput::Quit,
        "help" => BrowseInput::Help,
        "clear" => BrowseInput::Patch(FilterPatch::clear_all()),
        "type" => BrowseInput::Patch(FilterPatch::default().job_type(optional(arg))),
        "location" => BrowseInput::Patch(FilterPatch::default().location(optional(arg))),
        "remote" => match arg {
            "on" | "true" | "yes" => BrowseInput::Patch(FilterPatch::default().remote_only(true)),
            "off" | "false" | "no" => {
                BrowseInput::Patch(FilterPatch::default().remote_only(false))
            }
            other => BrowseInput::Invalid(format!("Expected on or off, got: {}", other)),
        },
        "salary" => match parse_amount(arg) {
            Ok(Some(position)) => {
                BrowseInput::Patch(FilterPatch::default().salary_band(SalaryBand::from_slider(position)))
            }
            Ok(None) => BrowseInput::Patch(FilterPatch::default().salary(None, None)),
            Err(e) => BrowseInput::Invalid(e),
        },
        "min" => match parse_amount(arg) {
            Ok(min) => BrowseInput::Patch(FilterPatch {
                min_salary: Some(min),
                ..FilterPatch::default()
            }),
            Err(e) => BrowseInput::Invalid(e),
        },
        "max" => match parse_amount(arg) {
            Ok(max) => BrowseInput::Patch(FilterPatch {
                max_salary: Some(max),
                ..FilterPatch::default()
            }),
            Err(e) => BrowseInput::Invalid(e),
        },
        other => BrowseInput::Invalid(format!("Unknown command: :{}", other)),
    }
}

pub async fn handle_command(cli: Cli, mut config: ConfigManager) -> Result<()> {
    if let Some(url) = cli.api_url {
        config.api.base_url = url.trim_end_matches('/').to_string();
    }
    let api = Arc::new(JobApiClient::new(&config.api)?);

    match cli.command {
        Command::Jobs(filters) => list_jobs(&api, &filters).await,
        Command::Browse => browse(api, CoordinatorSettings::from(config.query.clone())).await,
        Command::Show { id } => show_job(&api, &id).await,
        Command::Create(args) => create_job(&api, args).await,
        Command::Update(args) => update_job(&api, args).await,
        Command::Delete { id, auth } => {
            sign_in(&api, &auth).await?;
            match api.delete_job(&id).await {
                Ok(()) => {
                    println!("✅ Deleted job {}", id);
                    Ok(())
                }
                Err(e) => Err(admin_failure(e, "Delete failed")),
            }
        }
        Command::Login(auth) => {
            let user = api
                .login(&auth.require()?)
                .await
                .map_err(|e| failure(e, "Login failed"))?;
            print_user(user.as_ref());
            Ok(())
        }
        Command::Signup(auth) => {
            let user = api
                .signup(&auth.require()?)
                .await
                .map_err(|e| failure(e, "Signup failed"))?;
            println!("✅ Account created");
            print_user(user.as_ref());
            Ok(())
        }
        Command::Me(auth) => {
            sign_in(&api, &auth).await?;
            let user = api
                .current_user(&CancellationToken::new())
                .await
                .map_err(|e| failure(e, "Failed to load user info"))?;
            print_user(user.as_ref());
            Ok(())
        }
        Command::AdminCheck(auth) => {
            sign_in(&api, &auth).await?;
            let status = check_admin_access(&api, &CancellationToken::new()).await;
            println!("{}", status.as_str());
            Ok(())
        }
    }
}

/// Log in first when credentials were given; otherwise go on anonymously
async fn sign_in(api: &JobApiClient, auth: &AuthArgs) -> Result<()> {
    if let Some(credentials) = auth.credentials() {
        api.login(&credentials)
            .await
            .map_err(|e| failure(e, "Login failed"))?;
        app_log!(info, "Logged in as {}", credentials.email);
    }
    Ok(())
}

fn failure(e: ApiError, fallback: &str) -> anyhow::Error {
    match e {
        ApiError::Status { message, .. } => anyhow::anyhow!("❌ {}", message),
        other => anyhow::Error::new(other).context(fallback.to_string()),
    }
}

fn admin_failure(e: ApiError, fallback: &str) -> anyhow::Error {
    if e.is_unauthorized() {
        anyhow::anyhow!("❌ Please login as admin to manage jobs.")
    } else {
        failure(e, fallback)
    }
}

fn print_user(user: Option<&crate::types::User>) {
    match user {
        Some(user) => println!(
            "{} ({})",
            user.email,
            user.role.as_deref().unwrap_or("no role")
        ),
        None => println!("Not logged in"),
    }
}

async fn list_jobs(api: &JobApiClient, filters: &FilterArgs) -> Result<()> {
    let mut state = FilterState::default();
    state.apply(filters.to_patch());
    let query = JobQuery::from_filter(&state, &state.search);

    let jobs = api
        .list_jobs(&query, &CancellationToken::new())
        .await
        .context("Error fetching jobs")?;
    let view = JobListView {
        jobs: rerank(&jobs, &state.search).into_iter().cloned().collect(),
        loaded: true,
    };
    print!("{}", display::job_list(&view, Utc::now()));
    Ok(())
}

async fn show_job(api: &JobApiClient, id: &str) -> Result<()> {
    let cancel = CancellationToken::new();
    let job = api
        .get_job(id, &cancel)
        .await
        .map_err(|e| failure(e, "Failed to load job"))?;

    match job {
        Some(job) => {
            print!("{}", display::job_detail(&job));
            let is_admin = api
                .current_user(&cancel)
                .await
                .ok()
                .flatten()
                .map(|u| u.is_admin())
                .unwrap_or(false);
            if is_admin {
                println!("\n(admin: `update {}` / `delete {}` available)", id, id);
            }
        }
        None => println!("Job not found"),
    }
    Ok(())
}

async fn create_job(api: &JobApiClient, args: CreateArgs) -> Result<()> {
    sign_in(api, &args.auth).await?;

    let payload = JobDraft {
        title: args.title,
        company_name: args.company,
        location: args.location,
        job_type: args.job_type,
        salary_min: args.salary_min,
        salary_max: args.salary_max,
        application_deadline: args.deadline,
        description: args.description,
    }
    .into_payload()?;

    match api.create_job(&payload).await {
        Ok(created) => {
            println!("✅ Job created successfully");
            if let Some(job) = created {
                println!("   ID: {}", job.id);
            }
            Ok(())
        }
        Err(e) => Err(admin_failure(e, "Failed to create job")),
    }
}

async fn update_job(api: &JobApiClient, args: UpdateArgs) -> Result<()> {
    sign_in(api, &args.auth).await?;

    let cancel = CancellationToken::new();
    let job = api
        .get_job(&args.id, &cancel)
        .await
        .map_err(|e| failure(e, "Failed to load job"))?
        .ok_or_else(|| anyhow::anyhow!("Job not found: {}", args.id))?;

    let update = args.apply_to(JobUpdate::from(&job));
    api.update_job(&args.id, &update)
        .await
        .map_err(|e| admin_failure(e, "Update failed"))?;

    // Show what the backend now holds rather than what we sent
    if let Some(job) = api
        .get_job(&args.id, &cancel)
        .await
        .map_err(|e| failure(e, "Failed to reload job"))?
    {
        print!("{}", display::job_detail(&job));
    }
    Ok(())
}

async fn browse(api: Arc<JobApiClient>, settings: CoordinatorSettings) -> Result<()> {
    let coordinator = JobQueryCoordinator::spawn(api, settings);
    let mut view = coordinator.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", BROWSE_HELP);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    break;
                };
                match parse_browse_line(&line) {
                    BrowseInput::Patch(patch) => coordinator.set_filter(patch),
                    BrowseInput::Help => println!("{}", BROWSE_HELP),
                    BrowseInput::Quit => break,
                    BrowseInput::Invalid(message) => eprintln!("{}", message),
                }
            }
            changed = view.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = view.borrow_and_update().clone();
                println!("----");
                print!("{}", display::job_list(&snapshot, Utc::now()));
            }
        }
    }

    coordinator.shutdown().await;
    Ok(())
}

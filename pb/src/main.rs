//! Planboard - training day-plan workflow client
//!
//! CLI entry point: sign in, list/create/review/delete day plans, or launch
//! the interactive TUI.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::info;

use planboard::capability::capabilities;
use planboard::cli::{Cli, Command, OutputFormat, parse_task_spec};
use planboard::config::Config;
use planboard::tui;
use planboard::workflow::{Identity, LoadOutcome, Notice, NoticeLevel, PlanDraft, WorkflowController};
use trainapi::{DayPlan, HttpClient, PlanStatus, ReviewDecision, Session, SessionStore, Trainee};

fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("planboard")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Setup tracing subscriber - write to log file, not stdout/stderr
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(log_dir.join("planboard.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

fn session_store(config: &Config) -> SessionStore {
    match &config.session.file {
        Some(path) => SessionStore::with_path(path),
        None => SessionStore::new(),
    }
}

fn build_controller(config: &Config, session: Option<&Session>) -> Result<WorkflowController<HttpClient>> {
    let repo = HttpClient::new(&config.api.base_url, config.api.timeout_ms, session)?;
    let identity = session.map(Identity::from);
    Ok(WorkflowController::new(repo, identity))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!("Planboard loaded config: base_url={}", config.api.base_url);

    let store = session_store(&config);
    let session = store.load();

    match cli.command {
        Some(Command::Login {
            token,
            role,
            user_id,
            name,
            email,
            employee_id,
        }) => cmd_login(&store, token, role, user_id, name, email, employee_id),
        Some(Command::Logout) => cmd_logout(&store),
        Some(Command::Whoami) => cmd_whoami(session.as_ref()),
        Some(Command::Plans {
            status,
            detailed,
            format,
        }) => cmd_plans(&config, session.as_ref(), status.as_deref(), detailed, format).await,
        Some(Command::Create { date, trainees, tasks }) => {
            cmd_create(&config, session.as_ref(), date, trainees, tasks).await
        }
        Some(Command::Review {
            plan_id,
            approve,
            reject,
            remarks,
        }) => cmd_review(&config, session.as_ref(), &plan_id, approve, reject, &remarks).await,
        Some(Command::Delete { plan_id, yes }) => cmd_delete(&config, session.as_ref(), &plan_id, yes).await,
        Some(Command::Roster { format }) => cmd_roster(&config, session.as_ref(), format).await,
        Some(Command::Tui) => cmd_tui(&config, session).await,
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}

/// Persist the token and identity with the 7-day expiry
#[allow(clippy::too_many_arguments)]
fn cmd_login(
    store: &SessionStore,
    token: String,
    role: trainapi::Role,
    user_id: String,
    name: String,
    email: String,
    employee_id: String,
) -> Result<()> {
    let user = Trainee {
        id: user_id,
        name,
        email,
        employee_id,
    };
    let session = Session::new(token, user, role);
    store.save(&session).context("Failed to save session")?;

    println!(
        "Signed in as {} ({}). Session expires {}.",
        session.user.name.bold(),
        session.role,
        session.expires_at.format("%Y-%m-%d %H:%M UTC")
    );
    Ok(())
}

fn cmd_logout(store: &SessionStore) -> Result<()> {
    store.clear().context("Failed to remove session")?;
    println!("Signed out.");
    Ok(())
}

fn cmd_whoami(session: Option<&Session>) -> Result<()> {
    match session {
        Some(session) => {
            println!("{} <{}>", session.user.name.bold(), session.user.email);
            println!("Role: {}", session.role);
            println!("Session expires: {}", session.expires_at.format("%Y-%m-%d %H:%M UTC"));
        }
        None => println!("Not signed in. Run `pb login` first."),
    }
    Ok(())
}

/// List day plans, optionally filtered by status
async fn cmd_plans(
    config: &Config,
    session: Option<&Session>,
    status: Option<&str>,
    detailed: bool,
    format: OutputFormat,
) -> Result<()> {
    let status_filter = status
        .map(|s| s.parse::<PlanStatus>())
        .transpose()
        .map_err(|e| eyre::eyre!(e))?;

    let mut controller = build_controller(config, session)?;
    match controller.load_plans().await {
        Ok(LoadOutcome::NotSignedIn) => {
            println!("Not signed in. Run `pb login` first.");
            return Ok(());
        }
        Ok(LoadOutcome::Loaded(_)) => {}
        Err(e) => {
            print_notices(controller.take_notices());
            return Err(eyre::eyre!(e.user_message()));
        }
    }

    let plans: Vec<&DayPlan> = controller
        .plans()
        .iter()
        .filter(|p| status_filter.is_none_or(|s| p.status == s))
        .collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plans)?),
        OutputFormat::Text => {
            if plans.is_empty() {
                println!("No day plans.");
                return Ok(());
            }
            for plan in &plans {
                print_plan(plan, detailed);
            }
        }
    }

    Ok(())
}

fn print_plan(plan: &DayPlan, detailed: bool) {
    let eod_marker = if plan.eod_update.is_some() { "  [EOD filed]" } else { "" };
    println!(
        "{}  {}  {} <{}>  {}{}",
        plan.id.bold(),
        plan.date,
        plan.trainee.name,
        plan.trainee.email.dimmed(),
        colored_status(plan.status),
        eod_marker.cyan()
    );

    if !detailed {
        return;
    }

    for (index, task) in plan.tasks.iter().enumerate() {
        let time = if task.time_allocation.is_empty() {
            String::new()
        } else {
            format!("{}  ", task.time_allocation)
        };
        println!("    [{}] {}{}  ({})", index + 1, time, task.title, task.status);

        if let Some(checkboxes) = plan.checkboxes_for_task(index) {
            for checkbox in checkboxes.values() {
                let mark = if checkbox.checked { "x" } else { " " };
                println!("          [{}] {}", mark, checkbox.label);
            }
        }
    }

    if let Some(eod) = &plan.eod_update {
        if !eod.overall_remarks.is_empty() {
            println!("    EOD: {}", eod.overall_remarks);
        }
    }
}

fn colored_status(status: PlanStatus) -> colored::ColoredString {
    let text = status.to_string();
    match status {
        PlanStatus::Draft => text.dimmed(),
        PlanStatus::Pending => text.yellow(),
        PlanStatus::InProgress => text.green(),
        PlanStatus::Completed => text.blue(),
        PlanStatus::Rejected => text.red(),
    }
}

/// Create one plan per selected trainee
async fn cmd_create(
    config: &Config,
    session: Option<&Session>,
    date: NaiveDate,
    trainees: Vec<String>,
    task_specs: Vec<String>,
) -> Result<()> {
    let Some(session) = session else {
        println!("Not signed in. Run `pb login` first.");
        return Ok(());
    };

    let caps = capabilities(session.role);
    if !caps.can_create() {
        return Err(eyre::eyre!("The {} role cannot create day plans", session.role));
    }

    // Trainees self-author when no --trainee is given
    let trainees = if trainees.is_empty() && caps.can_self_author {
        vec![session.user.id.clone()]
    } else {
        trainees
    };
    if !caps.can_create_for_others && trainees != [session.user.id.clone()] {
        return Err(eyre::eyre!("The {} role can only author their own plan", session.role));
    }

    let draft = PlanDraft {
        date,
        tasks: task_specs.iter().map(|s| parse_task_spec(s)).collect(),
    };

    let mut controller = build_controller(config, Some(session))?;
    match controller.create_plans(&draft, &trainees).await {
        Ok(report) => {
            print_notices(controller.take_notices());
            println!("Created {} plan(s), {} failed.", report.created, report.failed);
            Ok(())
        }
        Err(e) => {
            print_notices(controller.take_notices());
            Err(eyre::eyre!(e.user_message()))
        }
    }
}

/// Approve or reject a plan
async fn cmd_review(
    config: &Config,
    session: Option<&Session>,
    plan_id: &str,
    approve: bool,
    reject: bool,
    remarks: &str,
) -> Result<()> {
    let Some(session) = session else {
        println!("Not signed in. Run `pb login` first.");
        return Ok(());
    };

    if !capabilities(session.role).can_review {
        return Err(eyre::eyre!("The {} role cannot review day plans", session.role));
    }

    let decision = match (approve, reject) {
        (_, true) => ReviewDecision::Rejected,
        (true, false) => ReviewDecision::Approved,
        (false, false) => return Err(eyre::eyre!("Specify --approve or --reject")),
    };

    let mut controller = build_controller(config, Some(session))?;
    if let Err(e) = controller.load_plans().await {
        print_notices(controller.take_notices());
        return Err(eyre::eyre!(e.user_message()));
    }

    match controller.review_plan(plan_id, decision, remarks).await {
        Ok(()) => {
            print_notices(controller.take_notices());
            Ok(())
        }
        Err(e) => {
            print_notices(controller.take_notices());
            Err(eyre::eyre!(e.user_message()))
        }
    }
}

/// Delete a plan, after confirmation
async fn cmd_delete(config: &Config, session: Option<&Session>, plan_id: &str, yes: bool) -> Result<()> {
    let Some(session) = session else {
        println!("Not signed in. Run `pb login` first.");
        return Ok(());
    };

    if !capabilities(session.role).can_delete {
        return Err(eyre::eyre!("The {} role cannot delete day plans", session.role));
    }

    let mut controller = build_controller(config, Some(session))?;
    if let Err(e) = controller.load_plans().await {
        print_notices(controller.take_notices());
        return Err(eyre::eyre!(e.user_message()));
    }

    let Some(plan) = controller.plan(plan_id) else {
        return Err(eyre::eyre!("Plan {} is no longer available", plan_id));
    };

    if !yes {
        print!("Delete plan {} for {} on {}? [y/N] ", plan.id, plan.trainee.name, plan.date);
        io::stdout().flush()?;
        let mut answer = String::new();
        io::stdin().read_line(&mut answer)?;
        if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            println!("Aborted.");
            return Ok(());
        }
    }

    match controller.delete_plan(plan_id).await {
        Ok(()) => {
            print_notices(controller.take_notices());
            Ok(())
        }
        Err(e) => {
            print_notices(controller.take_notices());
            Err(eyre::eyre!(e.user_message()))
        }
    }
}

/// List the trainee roster
async fn cmd_roster(config: &Config, session: Option<&Session>, format: OutputFormat) -> Result<()> {
    let Some(session) = session else {
        println!("Not signed in. Run `pb login` first.");
        return Ok(());
    };

    if !capabilities(session.role).can_view_roster() {
        return Err(eyre::eyre!("The {} role cannot view the roster", session.role));
    }

    let mut controller = build_controller(config, Some(session))?;
    match controller.roster().await {
        Ok(trainees) => match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&trainees)?);
                Ok(())
            }
            OutputFormat::Text => {
                if trainees.is_empty() {
                    println!("No trainees.");
                    return Ok(());
                }
                for trainee in &trainees {
                    println!(
                        "{}  {} <{}>  {}",
                        trainee.id.bold(),
                        trainee.name,
                        trainee.email.dimmed(),
                        trainee.employee_id
                    );
                }
                Ok(())
            }
        },
        Err(e) => {
            print_notices(controller.take_notices());
            Err(eyre::eyre!(e.user_message()))
        }
    }
}

/// Launch the interactive TUI
async fn cmd_tui(config: &Config, session: Option<Session>) -> Result<()> {
    let controller = build_controller(config, session.as_ref())?;
    tui::run(controller).await
}

fn print_notices(notices: Vec<Notice>) {
    for notice in notices {
        match notice.level {
            NoticeLevel::Info => println!("{}", notice.message),
            NoticeLevel::Warn => println!("{} {}", "warning:".yellow().bold(), notice.message),
            NoticeLevel::Error => eprintln!("{} {}", "error:".red().bold(), notice.message),
        }
    }
}

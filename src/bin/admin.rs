//! CLI administration tool for formly.
//!
//! Provides commands for managing API tokens, inspecting forms and their
//! analytics, and performing database operations without HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # Create a new API token for an owner
//! cargo run --bin admin -- token create --owner alice
//!
//! # List all tokens
//! cargo run --bin admin -- token list
//!
//! # Revoke a token
//! cargo run --bin admin -- token revoke "Production API"
//!
//! # Forms of an owner, a report and a CSV export
//! cargo run --bin admin -- forms list --owner alice
//! cargo run --bin admin -- report 42 --range month
//! cargo run --bin admin -- export 42 -o responses.csv
//!
//! # Aggregate a JSON dump of responses without a database
//! cargo run --bin admin -- analyze --responses dump.json --schema fields.json
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`: PostgreSQL connection string (all commands except `analyze`)
//! - `TOKEN_SIGNING_SECRET`: HMAC key, must match the server (`token create`)

use formly::application::services::{AnalyticsService, AuthService};
use formly::domain::analytics::{DateRange, FormReport, ResponseAggregator};
use formly::domain::entities::{FieldDefinition, FormId, parse_response_documents};
use formly::domain::repositories::{FormRepository, TokenRepository};
use formly::infrastructure::persistence::{PgFormRepository, PgTokenRepository};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::path::PathBuf;
use std::sync::Arc;

/// CLI tool for managing formly.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage API tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Inspect forms
    Forms {
        #[command(subcommand)]
        action: FormsAction,
    },

    /// Print the analytics report of a form
    Report {
        /// Form id
        form_id: FormId,

        /// Reporting window: week, month, year or all
        #[arg(short, long, default_value = "all")]
        range: DateRange,

        /// Top values listed per field
        #[arg(short, long, default_value_t = 5)]
        top: usize,
    },

    /// Export all responses of a form as CSV
    Export {
        /// Form id
        form_id: FormId,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Aggregate a JSON array of responses from a file
    Analyze {
        /// JSON array of response records
        #[arg(long)]
        responses: PathBuf,

        /// JSON array of field definitions used for labels and completeness
        #[arg(long)]
        schema: Option<PathBuf>,

        /// Reporting window: week, month, year or all
        #[arg(short, long, default_value = "all")]
        range: DateRange,

        /// Top values listed per field
        #[arg(short, long, default_value_t = 5)]
        top: usize,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Token management subcommands.
#[derive(Subcommand)]
enum TokenAction {
    /// Create a new API token
    Create {
        /// Token name (e.g., "Production API", "Zapier")
        #[arg(short, long)]
        name: Option<String>,

        /// Owner the token acts as
        #[arg(short, long)]
        owner: Option<String>,

        /// Custom token value (optional, auto-generated if not provided)
        #[arg(short, long)]
        token: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all tokens
    List,

    /// Revoke a token
    Revoke {
        /// Token name or ID to revoke
        name_or_id: String,
    },
}

/// Form inspection subcommands.
#[derive(Subcommand)]
enum FormsAction {
    /// List the forms of an owner
    List {
        /// Owner id
        #[arg(short, long)]
        owner: String,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            responses,
            schema,
            range,
            top,
        } => analyze_file(responses, schema, range, top)?,
        Commands::Token { action } => handle_token_action(action, &connect().await?).await?,
        Commands::Forms {
            action: FormsAction::List { owner },
        } => list_forms(&connect().await?, &owner).await?,
        Commands::Report {
            form_id,
            range,
            top,
        } => print_report(&connect().await?, form_id, range, top).await?,
        Commands::Export { form_id, output } => {
            export_csv(&connect().await?, form_id, output).await?
        }
        Commands::Db { action } => handle_db_action(action, &connect().await?).await?,
    }

    Ok(())
}

async fn connect() -> Result<PgPool> {
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")
}

/// Dispatches token management commands.
async fn handle_token_action(action: TokenAction, pool: &PgPool) -> Result<()> {
    let repo = Arc::new(PgTokenRepository::new(Arc::new(pool.clone())));

    match action {
        TokenAction::Create {
            name,
            owner,
            token,
            yes,
        } => {
            create_token(repo, name, owner, token, yes).await?;
        }
        TokenAction::List => {
            list_tokens(repo).await?;
        }
        TokenAction::Revoke { name_or_id } => {
            revoke_token(repo, name_or_id).await?;
        }
    }

    Ok(())
}

/// Creates a new API token with interactive prompts.
///
/// Only the HMAC of the token is stored; the raw value is displayed once.
async fn create_token(
    repo: Arc<PgTokenRepository>,
    name: Option<String>,
    owner: Option<String>,
    token: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    let secret =
        std::env::var("TOKEN_SIGNING_SECRET").context("TOKEN_SIGNING_SECRET must be set")?;

    println!("{}", "🔑 Create API Token".bright_blue().bold());
    println!();

    let token_name = match name {
        Some(n) => n,
        None => Input::new()
            .with_prompt("Token name")
            .with_initial_text("Production API")
            .interact_text()?,
    };

    let owner_id = match owner {
        Some(o) => o,
        None => Input::new().with_prompt("Owner id").interact_text()?,
    };

    if token.is_some() {
        println!("{}", "⚠️  Using provided token value".yellow());
    }

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Create token '{token_name}' for owner '{owner_id}'?"))
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let auth_service = AuthService::new(repo, secret);
    let (created, token_value) = auth_service
        .issue_token(&token_name, &owner_id, token)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create token: {}", e))?;

    println!();
    println!("{}", "✅ Token created successfully!".green().bold());
    println!();
    println!("  Name:  {}", created.name.cyan());
    println!("  Owner: {}", created.owner_id.cyan());
    println!("  Token: {}", token_value.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "⚠️  IMPORTANT: Save this token now! You won't be able to see it again."
            .red()
            .bold()
    );
    println!();
    println!("{}", "Example:".bright_white());
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/forms",
        token_value.bright_yellow()
    );
    println!();

    Ok(())
}

/// Lists all API tokens with status indicators.
async fn list_tokens(repo: Arc<PgTokenRepository>) -> Result<()> {
    println!("{}", "📋 API Tokens".bright_blue().bold());
    println!();

    let tokens = repo
        .list_tokens()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list tokens: {}", e))?;

    if tokens.is_empty() {
        println!("{}", "  No tokens found".yellow());
        println!();
        println!(
            "  Create one with: {} admin token create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<4} {:<26} {:<16} {:<17} {:<17} {:<8}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Owner".bright_white().bold(),
        "Created".bright_white().bold(),
        "Last used".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(92).bright_black());

    for token in &tokens {
        let status = if token.is_active() {
            "ACTIVE".green()
        } else {
            "REVOKED".red()
        };
        let last_used = token
            .last_used_at
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());

        println!(
            "  {:<4} {:<26} {:<16} {:<17} {:<17} {}",
            token.id.to_string().bright_black(),
            token.name.cyan(),
            token.owner_id,
            token
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            last_used.bright_black(),
            status
        );
    }

    println!();
    println!(
        "  Total: {}",
        tokens.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Revokes a token by name or ID with confirmation prompt.
///
/// Numeric input is looked up by ID, anything else by exact name.
async fn revoke_token(repo: Arc<PgTokenRepository>, name_or_id: String) -> Result<()> {
    println!("{}", "🔒 Revoke API Token".bright_blue().bold());
    println!();

    let token = match name_or_id.parse::<i64>() {
        Ok(id) => repo
            .find_by_id(id)
            .await
            .map_err(|e| anyhow::anyhow!("Database error: {}", e))?,
        Err(_) => repo
            .find_by_name(&name_or_id)
            .await
            .map_err(|e| anyhow::anyhow!("Database error: {}", e))?,
    };

    let token = token.context("Token not found")?;

    if !token.is_active() {
        println!("{}", "⚠️  This token is already revoked".yellow());
        return Ok(());
    }

    println!("  Token: {}", token.name.cyan());
    println!("  Owner: {}", token.owner_id.cyan());
    println!("  ID:    {}", token.id.to_string().bright_black());
    println!();

    let confirmed = Confirm::new()
        .with_prompt("Revoke this token?")
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    repo.revoke_token(token.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke token: {}", e))?;

    println!();
    println!("{}", "✅ Token revoked successfully!".green().bold());
    println!();

    Ok(())
}

/// Lists an owner's forms with visibility and response counts.
async fn list_forms(pool: &PgPool, owner: &str) -> Result<()> {
    let repo = PgFormRepository::new(Arc::new(pool.clone()));

    println!("{}", "📝 Forms".bright_blue().bold());
    println!();

    let forms = repo
        .list_forms(owner)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list forms: {}", e))?;

    if forms.is_empty() {
        println!("  {} '{}'", "No forms for owner".yellow(), owner);
        return Ok(());
    }

    println!(
        "  {:<6} {:<14} {:<34} {:<10} {:<9}",
        "ID".bright_white().bold(),
        "Slug".bright_white().bold(),
        "Title".bright_white().bold(),
        "Status".bright_white().bold(),
        "Responses".bright_white().bold()
    );
    println!("  {}", "─".repeat(78).bright_black());

    for form in &forms {
        let status = if form.published {
            "PUBLISHED".green()
        } else {
            "DRAFT".yellow()
        };

        println!(
            "  {:<6} {:<14} {:<34} {:<10} {}",
            form.id.to_string().bright_black(),
            form.slug,
            form.title.cyan(),
            status,
            form.responses_count.to_string().bright_white()
        );
    }
    println!();

    Ok(())
}

/// Prints the report of a form, acting as its owner.
async fn print_report(pool: &PgPool, form_id: FormId, range: DateRange, top: usize) -> Result<()> {
    let repo = Arc::new(PgFormRepository::new(Arc::new(pool.clone())));
    let owner = form_owner(repo.as_ref(), form_id).await?;

    let (form, report) = AnalyticsService::new(repo)
        .report(&owner, form_id, range, top, Utc::now().date_naive())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to build report: {}", e))?;

    println!(
        "{} {} ({})",
        "📊".bright_blue(),
        form.title.bright_blue().bold(),
        range
    );
    println!();
    render_report(&report);

    Ok(())
}

/// Writes the CSV export of a form to a file or stdout.
async fn export_csv(pool: &PgPool, form_id: FormId, output: Option<PathBuf>) -> Result<()> {
    let repo = Arc::new(PgFormRepository::new(Arc::new(pool.clone())));
    let owner = form_owner(repo.as_ref(), form_id).await?;

    let export = AnalyticsService::new(repo)
        .export_csv(&owner, form_id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to export responses: {}", e))?;

    match output {
        Some(path) => {
            std::fs::write(&path, export.body)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "{} {}",
                "✅ Exported to".green().bold(),
                path.display().to_string().bright_white()
            );
        }
        None => print!("{}", export.body),
    }

    Ok(())
}

async fn form_owner(repo: &PgFormRepository, form_id: FormId) -> Result<String> {
    let form = repo
        .get_form(form_id)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .with_context(|| format!("Form {form_id} not found"))?;

    Ok(form.owner_id)
}

/// Aggregates a JSON dump of responses, labelled with an optional schema.
fn analyze_file(
    responses: PathBuf,
    schema: Option<PathBuf>,
    range: DateRange,
    top: usize,
) -> Result<()> {
    let raw = std::fs::read_to_string(&responses)
        .with_context(|| format!("Failed to read {}", responses.display()))?;
    let imported = parse_response_documents(&raw)
        .context("Responses file must be a JSON array of responses")?;
    if imported.skipped > 0 {
        println!(
            "{} Skipped {} malformed entries",
            "⚠️ ".yellow(),
            imported.skipped.to_string().yellow().bold()
        );
    }
    let records = imported.records;

    let fields: Vec<FieldDefinition> = match schema {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&raw)
                .context("Schema file must be a JSON array of field definitions")?
        }
        None => Vec::new(),
    };

    let aggregator = if fields.is_empty() {
        ResponseAggregator::new()
    } else {
        ResponseAggregator::with_schema(&fields)
    };
    let result = aggregator.aggregate(range.filter(&records, Utc::now().date_naive()));

    println!(
        "{} {} ({})",
        "📊".bright_blue(),
        responses.display().to_string().bright_blue().bold(),
        range
    );
    println!();
    render_report(&FormReport::build(&result, &fields, top));

    Ok(())
}

fn render_report(report: &FormReport) {
    println!(
        "  Responses: {}",
        report.total_responses.to_string().bright_green().bold()
    );
    if report.undated_responses > 0 {
        println!(
            "  Undated:   {}",
            report.undated_responses.to_string().yellow()
        );
    }
    if let (Some(complete), Some(pct)) = (report.complete_responses, report.completion_pct) {
        println!(
            "  Complete:  {} ({:.1}%)",
            complete.to_string().bright_green(),
            pct
        );
    }
    println!();

    if !report.timeline.is_empty() {
        println!("{}", "  Per day".bright_white().bold());
        for day in &report.timeline {
            println!(
                "    {}  {}",
                day.date.to_string().bright_black(),
                day.count
            );
        }
        println!();
    }

    for field in &report.fields {
        let label = field.label.as_deref().unwrap_or(&field.field_id);
        let marker = match field.field_type {
            Some(field_type) if field.in_schema => {
                format!(" [{}]", field_type.label()).bright_black().to_string()
            }
            _ => " (not in schema)".bright_black().to_string(),
        };

        println!(
            "  {}{}  {} answered, {:.1}%",
            label.cyan().bold(),
            marker,
            field.answered,
            field.completion_pct
        );
        for value in &field.top_values {
            println!("    {:<40} {}", value.value, value.count);
        }
    }
    println!();
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let forms_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM forms")
                .fetch_one(pool)
                .await?;

            let responses_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM form_responses")
                .fetch_one(pool)
                .await?;

            let tokens_count: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM api_tokens WHERE revoked_at IS NULL")
                    .fetch_one(pool)
                    .await?;

            println!("  PostgreSQL:    {}", version.bright_white());
            println!(
                "  Forms:         {}",
                forms_count.to_string().bright_green().bold()
            );
            println!(
                "  Responses:     {}",
                responses_count.to_string().bright_green().bold()
            );
            println!(
                "  Active tokens: {}",
                tokens_count.to_string().bright_green().bold()
            );
            println!();
        }
    }

    Ok(())
}

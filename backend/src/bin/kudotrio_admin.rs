//! Administrative commands run against the configured deployment.
//!
//! `migrate` applies pending database migrations, `import-users` runs a CSV
//! through the same upload and confirm steps the HTTP API uses, and `openapi`
//! prints the API document as YAML.

use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing_subscriber::{EnvFilter, fmt};
use utoipa::OpenApi;

use kudotrio::ApiDoc;
use kudotrio::domain::ports::UserRepository;
use kudotrio::domain::{Actor, EmailAddress};
use kudotrio::outbound::persistence::{DieselUserRepository, run_pending_migrations};
use kudotrio::server::{connect_database, http_state_from_settings};
use kudotrio::settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "kudotrio-admin", about = "KudoTrio administration")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply pending database migrations.
    Migrate,
    /// Import users from a CSV file on behalf of an administrator.
    ImportUsers {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        actor_email: String,
    },
    /// Print the OpenAPI document as YAML.
    Openapi,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    // Diagnostics go to stderr so `openapi` output stays clean.
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    match cli.command {
        Command::Openapi => {
            let yaml = ApiDoc::openapi()
                .to_yaml()
                .wrap_err("failed to render OpenAPI document")?;
            print!("{yaml}");
            Ok(())
        }
        Command::Migrate => run_async(migrate()),
        Command::ImportUsers { file, actor_email } => run_async(import_users(file, actor_email)),
    }
}

fn run_async<F>(task: F) -> Result<()>
where
    F: std::future::Future<Output = Result<()>>,
{
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build admin runtime")?;
    runtime.block_on(task)
}

/// Settings from defaults, config file and `KUDOS_*` variables only; the
/// command line belongs to the subcommands.
fn load_settings() -> Result<Settings> {
    Settings::load_from_iter([OsString::from("kudotrio-admin")])
        .map_err(|err| eyre!("failed to load settings: {err}"))
}

fn require_database_url(settings: &Settings) -> Result<&str> {
    settings
        .database_url
        .as_deref()
        .ok_or_else(|| eyre!("KUDOS_DATABASE_URL must be set"))
}

async fn migrate() -> Result<()> {
    let settings = load_settings()?;
    let url = require_database_url(&settings)?;
    let applied = run_pending_migrations(url)
        .await
        .wrap_err("failed to apply migrations")?;
    if applied.is_empty() {
        println!("database schema is up to date");
    }
    for version in applied {
        println!("applied {version}");
    }
    Ok(())
}

async fn import_users(file: PathBuf, actor_email: String) -> Result<()> {
    let settings = load_settings()?;
    let url = require_database_url(&settings)?;

    let contents =
        fs::read(&file).with_context(|| format!("failed to read {}", file.display()))?;
    let filename = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| eyre!("{} has no file name", file.display()))?;

    let email = EmailAddress::new(&actor_email)
        .map_err(|err| eyre!("invalid actor email '{actor_email}': {err}"))?;
    let pool = connect_database(&settings, url).await?;
    let actor = DieselUserRepository::new(pool)
        .find_by_email(&email)
        .await
        .wrap_err("failed to look up actor")?
        .ok_or_else(|| eyre!("no account for {email}"))?;
    let actor = Actor::from(&actor.profile());

    let state = http_state_from_settings(&settings).await?;
    let upload_id = state
        .imports
        .upload(&actor, &filename, contents)
        .await
        .map_err(|err| eyre!("upload rejected: {}", err.message()))?;
    let summary = state
        .imports
        .confirm(&actor, &upload_id)
        .await
        .map_err(|err| eyre!("import failed: {}", err.message()))?;

    for email in &summary.created {
        println!("created {email}");
    }
    for email in &summary.skipped {
        println!("skipped {email} (already registered)");
    }
    println!(
        "{} created, {} skipped",
        summary.created.len(),
        summary.skipped.len()
    );
    Ok(())
}

//! `LeadDesk` CLI: submit leads and run the admin dashboard from a terminal.
//!
//! A standalone HTTP client for the `LeadDesk` server. No internal crate
//! dependencies; it talks exclusively via the REST API.

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod credentials;
mod leads;
mod validate;

use std::io::{BufRead, Write as _};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use reqwest::Url;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use leads::{Filter, Lead, Stats};

// ── ANSI color helpers ───────────────────────────────────────────────

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const WHITE: &str = "\x1b[37m";

const ADMIN_KEY_HEADER: &str = "x-admin-api-key";

// ── CLI structure ────────────────────────────────────────────────────

/// `LeadDesk`: capture leads and manage them.
#[derive(Parser)]
#[command(
    name = "leaddesk",
    version,
    about = "LeadDesk CLI: submit leads and manage them through the admin API",
    long_about = None,
    after_help = format!(
        "{DIM}Environment variables:{RESET}\n  \
         LEADDESK_ADDR        Server address (default: http://127.0.0.1:5000)\n  \
         LEADDESK_ADMIN_KEY   Admin API key\n\n\
         {DIM}Examples:{RESET}\n  \
         leaddesk submit --name \"Priya Nair\" --contact 9876543210 --resume cv.pdf\n  \
         leaddesk login --key $ADMIN_API_KEY\n  \
         leaddesk leads list --search priya --with-resume\n  \
         leaddesk leads stats"
    ),
)]
struct Cli {
    /// `LeadDesk` server address.
    #[arg(long, env = "LEADDESK_ADDR", default_value = "http://127.0.0.1:5000")]
    addr: String,

    /// Admin API key. Falls back to the key saved by `leaddesk login`.
    #[arg(long, env = "LEADDESK_ADMIN_KEY", hide_env_values = true)]
    admin_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a lead through the public intake endpoint.
    Submit(SubmitArgs),
    /// Verify an admin key and save it for later commands.
    Login {
        /// Admin API key to verify and save.
        #[arg(long)]
        key: String,
    },
    /// Forget the saved admin key.
    Logout,
    /// Admin lead operations.
    Leads {
        #[command(subcommand)]
        action: LeadCommands,
    },
}

#[derive(Args)]
struct SubmitArgs {
    /// Full name (letters and spaces).
    #[arg(long)]
    name: String,
    /// Phone number (up to 10 digits).
    #[arg(long)]
    contact: String,
    /// `LinkedIn` profile URL.
    #[arg(long)]
    linkedin: Option<String>,
    /// Naukri profile URL.
    #[arg(long)]
    naukri: Option<String>,
    /// Resume file to upload.
    #[arg(long)]
    resume: Option<PathBuf>,
}

#[derive(Subcommand)]
enum LeadCommands {
    /// List leads, newest first.
    List {
        /// Match name (case-insensitive) or contact.
        #[arg(long)]
        search: Option<String>,
        /// Only leads that uploaded a resume.
        #[arg(long)]
        with_resume: bool,
    },
    /// Show one lead.
    Show {
        /// Lead ID.
        id: String,
    },
    /// Permanently delete a lead.
    Delete {
        /// Lead ID.
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Show lead counters.
    Stats,
}

// ── Pretty output helpers ────────────────────────────────────────────

fn header(icon: &str, title: &str) {
    println!("{BOLD}{CYAN}{icon} {title}{RESET}");
    println!("{DIM}─────────────────────────────────────────{RESET}");
}

fn kv_line(key: &str, value: &str) {
    println!("  {DIM}{key:<12}{RESET} {WHITE}{value}{RESET}");
}

fn success(msg: &str) {
    println!("{GREEN}{BOLD}✓{RESET} {msg}");
}

fn warning(msg: &str) {
    println!("{YELLOW}{BOLD}⚠{RESET} {YELLOW}{msg}{RESET}");
}

fn print_lead(lead: &Lead) {
    println!("  {BOLD}{}{RESET}  {DIM}{}{RESET}", lead.name, lead.id);
    kv_line("Contact", &lead.contact);
    kv_line("LinkedIn", &lead.linkedin);
    kv_line("Naukri", &lead.naukri);
    kv_line("Resume", &lead.resume);
    kv_line(
        "Created",
        &lead.created_at.format("%Y-%m-%d %H:%M UTC").to_string(),
    );
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{YELLOW}{prompt}{RESET}");
    std::io::stdout().flush().context("failed to flush stdout")?;
    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

// ── HTTP client ──────────────────────────────────────────────────────

struct Client {
    http: reqwest::Client,
    addr: String,
    admin_key: Option<String>,
}

impl Client {
    fn new(addr: &str, admin_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            addr: addr.trim_end_matches('/').to_owned(),
            admin_key,
        }
    }

    /// `addr` plus `segments`, each percent-encoded as one path segment.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.addr)
            .with_context(|| format!("invalid server address '{}'", self.addr))?;
        url.path_segments_mut()
            .map_err(|()| anyhow::anyhow!("server address '{}' cannot take a path", self.addr))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn key(&self) -> Result<&str> {
        self.admin_key.as_deref().ok_or_else(|| {
            anyhow::anyhow!("no admin key; run `leaddesk login --key <KEY>` or set LEADDESK_ADMIN_KEY")
        })
    }

    async fn get(&self, segments: &[&str]) -> Result<Value> {
        let key = self.key()?;
        let resp = self
            .http
            .get(self.url(segments)?)
            .header(ADMIN_KEY_HEADER, key)
            .send()
            .await
            .context("request failed")?;
        handle_response(resp).await
    }

    async fn delete(&self, segments: &[&str]) -> Result<Value> {
        let key = self.key()?;
        let resp = self
            .http
            .delete(self.url(segments)?)
            .header(ADMIN_KEY_HEADER, key)
            .send()
            .await
            .context("request failed")?;
        handle_response(resp).await
    }

    async fn post_form(&self, segments: &[&str], form: Form) -> Result<Value> {
        let resp = self
            .http
            .post(self.url(segments)?)
            .multipart(form)
            .send()
            .await
            .context("request failed")?;
        handle_response(resp).await
    }
}

async fn handle_response(resp: reqwest::Response) -> Result<Value> {
    let status = resp.status();
    let body = resp.text().await.context("failed to read response body")?;
    if !status.is_success() {
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_owned))
            .unwrap_or(body);
        bail!("server returned {status}: {message}");
    }
    if body.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&body).context("failed to parse response JSON")
}

// ── Command dispatch ─────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!();
            eprintln!("  {RED}{BOLD}✗ Error:{RESET} {e:#}");
            eprintln!();
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Submit(args) => cmd_submit(&Client::new(&cli.addr, None), args).await,
        Commands::Login { key } => cmd_login(&cli.addr, key).await,
        Commands::Logout => cmd_logout(),
        Commands::Leads { action } => {
            let key = credentials::resolve(cli.admin_key, &credentials::key_path()?)?;
            cmd_leads(&Client::new(&cli.addr, key), action).await
        }
    }
}

// ── Intake ───────────────────────────────────────────────────────────

async fn cmd_submit(client: &Client, args: SubmitArgs) -> Result<()> {
    let name = validate::name(&args.name)?;
    let contact = validate::contact(&args.contact)?;

    let mut form = Form::new()
        .text("name", name.to_owned())
        .text("contact", contact.to_owned());
    if let Some(linkedin) = args.linkedin.filter(|s| !s.trim().is_empty()) {
        form = form.text("linkedin", linkedin);
    }
    if let Some(naukri) = args.naukri.filter(|s| !s.trim().is_empty()) {
        form = form.text("naukri", naukri);
    }
    if let Some(path) = &args.resume {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("resume")
            .to_owned();
        form = form.part("resume", Part::bytes(bytes).file_name(file_name));
    }

    let resp = client.post_form(&["api", "leads"], form).await?;
    let id = resp.get("leadId").and_then(Value::as_str).unwrap_or("-");

    success("Lead submitted");
    kv_line("Lead ID", id);
    Ok(())
}

// ── Admin session ────────────────────────────────────────────────────

async fn cmd_login(addr: &str, key: String) -> Result<()> {
    let key = key.trim().to_owned();
    if key.is_empty() {
        bail!("admin key must not be empty");
    }

    let client = Client::new(addr, Some(key.clone()));
    client
        .get(&["api", "admin", "verify"])
        .await
        .context("admin key was not accepted")?;

    let path = credentials::key_path()?;
    credentials::save(&path, &key)?;
    success(&format!("Admin key verified and saved to {}", path.display()));
    Ok(())
}

fn cmd_logout() -> Result<()> {
    let path = credentials::key_path()?;
    if credentials::remove(&path)? {
        success("Saved admin key removed");
    } else {
        warning("No saved admin key");
    }
    Ok(())
}

// ── Admin lead operations ────────────────────────────────────────────

async fn fetch_leads(client: &Client) -> Result<Vec<Lead>> {
    let resp = client.get(&["api", "admin", "leads"]).await?;
    serde_json::from_value(resp).context("unexpected lead list format")
}

async fn cmd_leads(client: &Client, action: LeadCommands) -> Result<()> {
    match action {
        LeadCommands::List {
            search,
            with_resume,
        } => {
            let leads = fetch_leads(client).await?;
            let filter = Filter {
                search: search.as_deref(),
                with_resume,
            };
            let hits = filter.apply(&leads);

            header("◆", &format!("Leads ({} of {})", hits.len(), leads.len()));
            if hits.is_empty() {
                warning("No leads match");
            }
            for lead in hits {
                print_lead(lead);
                println!();
            }
        }
        LeadCommands::Show { id } => {
            let resp = client.get(&["api", "admin", "leads", id.as_str()]).await?;
            let lead: Lead = serde_json::from_value(resp).context("unexpected lead format")?;
            header("◆", "Lead");
            print_lead(&lead);
        }
        LeadCommands::Delete { id, yes } => {
            if !yes && !confirm(&format!("Delete lead {id}? This cannot be undone. [y/N] "))? {
                warning("Aborted");
                return Ok(());
            }
            client.delete(&["api", "admin", "leads", id.as_str()]).await?;
            success(&format!("Lead {id} deleted"));
        }
        LeadCommands::Stats => {
            let leads = fetch_leads(client).await?;
            let stats = Stats::compute(&leads, Utc::now().date_naive());
            header("◆", "Lead stats");
            kv_line("Total", &stats.total.to_string());
            kv_line("New today", &stats.today.to_string());
            kv_line("With resume", &stats.with_resume.to_string());
        }
    }
    Ok(())
}

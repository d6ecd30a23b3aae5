use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    load_settings, CandidateSearchController, ClientSettings, ContactDraft, ControllerEvent,
    EmployerIdentity, SearchOutcome,
};
use shared::{
    domain::{AlumniId, FilterField, OptionsVariant},
    protocol::CandidateSummary,
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::error::RecvError,
};
use tracing_subscriber::EnvFilter;

mod intent;
mod render;

#[derive(Parser, Debug)]
#[command(name = "portal", about = "Employer candidate search for the alumni portal")]
struct Cli {
    /// Base URL of the portal API, e.g. http://127.0.0.1:8001/api
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    /// Settings file (defaults to ./portal.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    limit: Option<u32>,
    #[arg(long, global = true)]
    options_variant: Option<OptionsVariant>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the majors and secondary filter options.
    Options,
    /// Run one candidate search.
    Search {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long)]
        json: bool,
    },
    /// Send a contact message to a candidate.
    Contact(ContactArgs),
    /// Line-oriented search session.
    Interactive,
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    #[arg(long)]
    major: Option<String>,
    #[arg(long)]
    industry: Option<String>,
    #[arg(long)]
    min_gpa: Option<String>,
    #[arg(long)]
    experience: Option<String>,
    #[arg(long)]
    keyword: Option<String>,
}

impl FilterArgs {
    fn apply(&self, controller: &CandidateSearchController) {
        let fields = [
            (FilterField::Major, &self.major),
            (FilterField::Industry, &self.industry),
            (FilterField::MinGpa, &self.min_gpa),
            (FilterField::MinExperienceYears, &self.experience),
            (FilterField::Keyword, &self.keyword),
        ];
        for (field, raw) in fields {
            if let Some(raw) = raw {
                controller.set_filter(field, raw);
            }
        }
    }
}

#[derive(Args, Debug)]
struct ContactArgs {
    #[arg(long)]
    candidate_id: i64,
    #[arg(long)]
    candidate_email: String,
    #[arg(long)]
    candidate_name: String,
    #[arg(long, default_value = "")]
    candidate_major: String,
    #[arg(long)]
    employer_email: String,
    #[arg(long)]
    employer_name: Option<String>,
    #[arg(long)]
    company: Option<String>,
    /// Overrides the prefilled subject.
    #[arg(long)]
    subject: Option<String>,
    /// Overrides the prefilled message.
    #[arg(long)]
    message: Option<String>,
    #[arg(long, default_value = "")]
    job_title: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = resolve_settings(&cli)?;
    tracing::info!(api_base_url = %settings.api_base_url, "portal client configured");
    let controller = Arc::new(CandidateSearchController::new(&settings)?);

    match cli.command {
        Command::Options => {
            let options = controller.load_options().await;
            if options.is_empty() {
                println!("No filter options available");
            }
            render::print_options(&options);
        }
        Command::Search { filters, json } => {
            filters.apply(&controller);
            match controller.search().await {
                SearchOutcome::Applied { .. } => {
                    let results = controller.results();
                    if json {
                        println!("{}", serde_json::to_string_pretty(&results)?);
                    } else {
                        println!("{}", render::format_chips(&controller.active_filter_chips()));
                        render::print_results(&results);
                    }
                }
                SearchOutcome::Failed | SearchOutcome::Superseded => {
                    bail!("Failed to search candidates")
                }
            }
        }
        Command::Contact(args) => run_contact(&controller, args).await?,
        Command::Interactive => run_interactive(controller).await?,
    }

    Ok(())
}

fn resolve_settings(cli: &Cli) -> Result<ClientSettings> {
    let mut settings = load_settings(cli.config.as_deref()).context("failed to load settings")?;
    if let Some(api_url) = &cli.api_url {
        settings.api_base_url = api_url.clone();
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        settings.request_timeout_secs = timeout_secs;
    }
    if let Some(limit) = cli.limit {
        settings.result_limit = Some(limit);
    }
    if let Some(variant) = cli.options_variant {
        settings.options_variant = variant;
    }
    Ok(settings)
}

async fn run_contact(controller: &CandidateSearchController, args: ContactArgs) -> Result<()> {
    let mut employer = EmployerIdentity::new(args.employer_email);
    if let Some(name) = args.employer_name {
        employer = employer.with_full_name(name);
    }
    if let Some(company) = args.company {
        employer = employer.with_company(company);
    }

    let candidate = CandidateSummary {
        alumni_id: AlumniId(args.candidate_id),
        full_name: args.candidate_name,
        email: args.candidate_email,
        major: args.candidate_major,
        gpa: None,
        grad_year: None,
        current_company: None,
        current_title: None,
        industry: None,
        years_since_grad: None,
        skills: None,
    };

    let mut draft = ContactDraft::for_candidate(&employer, &candidate);
    if let Some(subject) = args.subject {
        draft.subject = subject;
    }
    if let Some(message) = args.message {
        draft.message = message;
    }
    draft.job_title = args.job_title;

    controller
        .contact_candidate(&employer, &candidate, &draft)
        .await?;
    println!("Message sent successfully!");
    Ok(())
}

async fn run_interactive(controller: Arc<CandidateSearchController>) -> Result<()> {
    let mut events = controller.subscribe_events();
    let printer = {
        let controller = Arc::clone(&controller);
        tokio::spawn(async move {
            loop {
                let event = match events.recv().await {
                    Ok(event) => event,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "event printer lagged");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };
                if let Some(line) = render::describe_event(&event) {
                    println!("{line}");
                }
                if let ControllerEvent::ResultsReplaced { .. } = event {
                    for candidate in controller.results() {
                        println!("  {}", render::format_candidate(&candidate));
                    }
                }
            }
        })
    };

    controller.initialize().await;
    render::print_options(&controller.options());
    println!("{}", intent::HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match intent::parse_intent(&line) {
            Ok(Some(intent)) => {
                if !intent::dispatch_intent(&controller, intent) {
                    break;
                }
            }
            Ok(None) => {}
            Err(err) => println!("{err}"),
        }
    }

    printer.abort();
    Ok(())
}

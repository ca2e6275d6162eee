use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use crate::client::{AssetDatabase, CalculationMode};
use crate::report::{ConsoleReporter, Reporter};
use crate::settings;
use crate::webapi::WebApiClient;
use crate::workflow::{self, AbortReason, CalculationRequest, Outcome};

// Exit codes: 0 success, 1 external failure, 2 validation (clap uses 2 for
// usage errors as well), 3 no matches, 4 declined at the prompt.
const EXIT_EXTERNAL_FAILURE: u8 = 1;
const EXIT_VALIDATION: u8 = 2;
const EXIT_NO_MATCHES: u8 = 3;
const EXIT_DECLINED: u8 = 4;

#[derive(Parser)]
#[command(name = "analysis-admin")]
#[command(about = "Asset analysis administration tooling", version)]
pub struct Cli {
    #[arg(
        long,
        alias = "afserver",
        global = true,
        help = "Asset server name (falls back to environment, then settings)."
    )]
    server: Option<String>,
    #[arg(
        long,
        alias = "afdatabase",
        visible_alias = "db",
        global = true,
        help = "Asset database name (falls back to environment, then settings)."
    )]
    database: Option<String>,
    #[arg(long, global = true, help = "Base URL of the asset web API.")]
    api_base: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Fill gaps in calculated data over a time range")]
    Backfill(CalcArgs),
    #[command(about = "Delete and recompute calculated data over a time range")]
    Recalculate(CalcArgs),
    #[command(
        visible_alias = "inputs",
        about = "Find analyses writing output to a time-series tag"
    )]
    FindTagInputs(TagArgs),
}

#[derive(Args)]
struct CalcArgs {
    #[arg(
        long,
        alias = "searchrootpath",
        help = "Delimited path to the search root element, e.g. Plant\\Area1."
    )]
    root: Option<String>,
    #[arg(
        long,
        visible_alias = "elem",
        alias = "elementname",
        default_value = "*",
        help = "Element name mask (server wildcard syntax)."
    )]
    element: String,
    #[arg(
        long,
        alias = "elementtemplate",
        help = "Restrict to elements assigned one of the matching templates."
    )]
    template: Option<String>,
    #[arg(
        long,
        alias = "analysisname",
        default_value = "*",
        help = "Analysis name mask (server wildcard syntax)."
    )]
    analysis: String,
    #[arg(
        long,
        alias = "searchfullhierarchy",
        help = "Search all descendants of the root instead of direct children."
    )]
    full_hierarchy: bool,
    #[arg(
        long,
        visible_alias = "st",
        alias = "starttime",
        help = "Start of the calculation window ('min' for unbounded)."
    )]
    start: String,
    #[arg(
        long,
        visible_alias = "et",
        alias = "endtime",
        help = "End of the calculation window ('max' for unbounded)."
    )]
    end: String,
}

#[derive(Args)]
struct TagArgs {
    #[arg(
        long,
        visible_alias = "point",
        aliases = ["tagname", "pipoint"],
        help = "Exact name of the time-series tag."
    )]
    tag: String,
}

pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter =
        EnvFilter::try_from_env("ANALYSIS_ADMIN_LOG").unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

impl Cli {
    pub fn run(self) -> ExitCode {
        let mut reporter = ConsoleReporter::new();

        let loaded = match settings::load_settings() {
            Ok(loaded) => loaded,
            Err(err) => {
                reporter.error(&format!("Failed to load settings: {err:#}"));
                return ExitCode::from(EXIT_EXTERNAL_FAILURE);
            }
        };
        let connection = loaded.connection(self.server, self.database, self.api_base);
        let client = match WebApiClient::from_config(&connection) {
            Ok(client) => client,
            Err(err) => {
                reporter.error(&format!("{err:#}"));
                return ExitCode::from(EXIT_VALIDATION);
            }
        };

        reporter.detail("Asset Server", client.server_name());
        reporter.detail("Asset Database", client.database_name());

        match self.command {
            Command::Backfill(args) => {
                run_calculation(&client, &mut reporter, args, CalculationMode::FillGaps)
            }
            Command::Recalculate(args) => run_calculation(
                &client,
                &mut reporter,
                args,
                CalculationMode::DeleteAndRecompute,
            ),
            Command::FindTagInputs(args) => run_find_tag_inputs(&client, &mut reporter, &args.tag),
        }
    }
}

fn run_calculation(
    db: &dyn AssetDatabase,
    reporter: &mut dyn Reporter,
    args: CalcArgs,
    mode: CalculationMode,
) -> ExitCode {
    let request = CalculationRequest {
        root_path: args.root,
        element_mask: args.element,
        template_mask: args.template,
        analysis_mask: args.analysis,
        full_hierarchy: args.full_hierarchy,
        start: args.start,
        end: args.end,
        mode,
    };
    match workflow::run_calculation(db, reporter, &request) {
        Ok(outcome) => ExitCode::from(outcome_code(outcome)),
        Err(err) => {
            reporter.error(&format!("{err:#}"));
            ExitCode::from(EXIT_EXTERNAL_FAILURE)
        }
    }
}

fn run_find_tag_inputs(
    db: &dyn AssetDatabase,
    reporter: &mut dyn Reporter,
    tag_name: &str,
) -> ExitCode {
    match workflow::run_find_tag_inputs(db, reporter, tag_name) {
        Ok(0) => ExitCode::from(EXIT_NO_MATCHES),
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            reporter.error(&format!("{err:#}"));
            ExitCode::from(EXIT_EXTERNAL_FAILURE)
        }
    }
}

fn outcome_code(outcome: Outcome) -> u8 {
    match outcome {
        Outcome::Submitted { .. } | Outcome::NothingToSubmit => 0,
        Outcome::Declined => EXIT_DECLINED,
        Outcome::Aborted(AbortReason::InvalidTimeRange | AbortReason::InvalidPath) => {
            EXIT_VALIDATION
        }
        Outcome::Aborted(
            AbortReason::NoMatchingTemplates
            | AbortReason::NoMatchingElements
            | AbortReason::NoMatchingAnalyses,
        ) => EXIT_NO_MATCHES,
    }
}

use std::error::Error;
use std::io;
use std::process;
use std::time::Duration;
use clap::{CommandFactory, Parser};
use log::{error, info, warn};
use url::Url;

use course_search_lib::{config, logger, output};
use course_search_lib::{search, Config, HttpTransport, SearchError, SearchOutcome, SearchResult};

/// Search the WueStudy course catalogue and print the matching courses.
#[derive(Parser, Debug)]
#[command(name = "course_search", version)]
struct Cli {
    /// Any valid WueStudy search pattern
    pattern: String,

    /// yyyy(s|w), e.g. 2020W for winter semester 2020
    semester: String,

    /// Fetch additional course details (may cause slowdown)
    #[arg(long)]
    details: bool,

    /// Print the results as JSON instead of a pipe separated table
    #[arg(long)]
    json: bool,

    /// Also print the results collected before a failure
    #[arg(long)]
    partial: bool,

    /// Log requests and session state
    #[arg(long)]
    debug: bool,

    /// Maximum number of detail pages fetched at the same time
    #[arg(long, default_value_t = config::DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Request timeout in seconds, 0 disables it
    #[arg(long, default_value_t = config::DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Server to talk to
    #[arg(long, default_value = config::BASE_URL)]
    base_url: Url,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            base_url: self.base_url.clone(),
            concurrency_limit: self.concurrency,
            request_timeout: (self.timeout > 0).then(|| Duration::from_secs(self.timeout)),
            ..Config::default()
        }
    }
}

fn main() {
    let cli = Cli::parse();
    logger::init(cli.debug);

    let config = cli.config();
    let transport = match HttpTransport::new(&config) {
        Ok(t) => t,
        Err(e) => {
            error!("{}", SearchError::transport("create http client", e));
            process::exit(1);
        }
    };

    let outcome = search(transport, config, &cli.pattern, &cli.semester, cli.details);
    if let Err(e) = report(&cli, &outcome) {
        error!("{}", e);
        process::exit(1);
    }
    process::exit(outcome.exit_code());
}

fn report(cli: &Cli, outcome: &SearchOutcome) -> Result<(), Box<dyn Error>> {
    if let Some(e) = &outcome.error {
        error!("{}", e);
        if outcome.is_input_error() {
            eprintln!("{}", Cli::command().render_usage());
        }
        if cli.partial && !outcome.results.is_empty() {
            warn!("Printing {} results collected before the failure.", outcome.results.len());
            print_results(cli, &outcome.results)?;
        }
        return Ok(());
    }

    if outcome.results.is_empty() {
        info!("no results found");
        return Ok(());
    }
    print_results(cli, &outcome.results)
}

fn print_results(cli: &Cli, results: &[SearchResult]) -> Result<(), Box<dyn Error>> {
    let stdout = io::stdout().lock();
    if cli.json {
        output::write_json(stdout, results, cli.details)
    } else {
        output::write_table(stdout, results, cli.details)
    }
}

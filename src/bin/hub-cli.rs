use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use hub_edge::config::{load_config, HubConfig};
use hub_edge::export::{
    encode_expenses_to_csv, encode_generic_records_to_csv, trigger_download, DirectorySink,
    Event, ExportError, Expense, FlatRecord, User,
};
use hub_edge::observability::logging;
use hub_edge::routing::{parse_cookie_header, Decision, EdgeRouter, RequestFacts};

#[derive(Parser)]
#[command(name = "hub-cli")]
#[command(about = "Export CSV files and inspect routing decisions for the hub", long_about = None)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(short, long, global = true, env = "HUB_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export expenses with resolved user and event names
    ExportExpenses {
        #[arg(long)]
        expenses: PathBuf,
        #[arg(long)]
        users: Option<PathBuf>,
        #[arg(long)]
        events: Option<PathBuf>,
        /// Output directory (defaults to export.output_dir)
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long, default_value = "expenses")]
        filename: String,
    },
    /// Export a JSON array of flat objects
    ExportRecords {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long, default_value = "export")]
        filename: String,
    },
    /// Print the router decision for a path
    Route {
        path: String,
        /// Cookie header value, e.g. "session=abc; theme=dark"
        #[arg(long)]
        cookie: Option<String>,
        #[arg(long)]
        origin: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => HubConfig::default(),
    };
    logging::init_logging(&config.observability.log_level);

    match cli.command {
        Commands::ExportExpenses {
            expenses,
            users,
            events,
            out_dir,
            filename,
        } => {
            let expenses: Vec<Expense> = read_json(&expenses)?;
            let users: Vec<User> = read_optional_json(users.as_deref())?;
            let events: Vec<Event> = read_optional_json(events.as_deref())?;

            let csv = encode_expenses_to_csv(&expenses, &users, &events);
            let sink = DirectorySink::new(out_dir.unwrap_or_else(|| config.export.output_dir.clone().into()));
            trigger_download(&sink, &csv, &filename)?;
            println!("Exported {} expenses to {}", expenses.len(), sink.root().display());
        }
        Commands::ExportRecords {
            input,
            out_dir,
            filename,
        } => {
            let records: Vec<FlatRecord> = read_json(&input)?;

            let csv = encode_generic_records_to_csv(&records);
            let sink = DirectorySink::new(out_dir.unwrap_or_else(|| config.export.output_dir.clone().into()));
            trigger_download(&sink, &csv, &filename)?;
            println!("Exported {} records to {}", records.len(), sink.root().display());
        }
        Commands::Route {
            path,
            cookie,
            origin,
        } => {
            let mut facts = RequestFacts::new(path);
            if let Some(raw) = cookie.as_deref() {
                facts.cookies.extend(parse_cookie_header(raw));
            }
            facts.origin = origin;

            let router = EdgeRouter::from_config(&config);
            let decision = router.decide(&facts);
            println!("{}", serde_json::to_string_pretty(&describe(&decision))?);
        }
    }

    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ExportError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn read_optional_json<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T, ExportError> {
    match path {
        Some(path) => read_json(path),
        None => Ok(T::default()),
    }
}

fn describe(decision: &Decision) -> Value {
    match decision {
        Decision::Redirect { location, .. } => json!({
            "outcome": decision.outcome(),
            "status": 307,
            "location": location,
        }),
        Decision::Forward { headers } => {
            let headers: Map<String, Value> = headers
                .iter()
                .map(|(name, value)| {
                    let text = value.to_str().unwrap_or_default().to_string();
                    (name.as_str().to_string(), Value::String(text))
                })
                .collect();
            json!({
                "outcome": decision.outcome(),
                "headers": headers,
            })
        }
    }
}

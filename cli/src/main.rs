//! CityPulse CLI binary: run the HTTP server or query local discovery from the command line.
//!
//! Subcommands: `serve`, `nearby`, `search`, `insights`, `suggest`.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use citypulse::{PerplexityClient, PlaceSummary, RetrievalPolicy, Retriever};
use cli::{parse_latitude, parse_longitude, CommandOutput};
use config::Settings;
use tracing::error;

#[derive(Parser, Debug)]
#[command(name = "citypulse")]
#[command(about = "CityPulse: live local events, restaurants and alerts around a point")]
struct Args {
    #[command(subcommand)]
    cmd: Command,

    /// Pretty-print JSON output (multi-line). Default: compact, one line
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Run the HTTP server (default 127.0.0.1:5001 or CITYPULSE_ADDR)
    Serve {
        /// Listen address
        #[arg(long, value_name = "ADDR")]
        addr: Option<String>,
    },
    /// Events, restaurants and alerts near a point, as JSON
    Nearby {
        #[arg(long, allow_hyphen_values = true, value_parser = parse_latitude)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true, value_parser = parse_longitude)]
        lng: f64,
    },
    /// Results for a free-text query near a point, as JSON
    Search {
        #[arg(long, allow_hyphen_values = true, value_parser = parse_latitude)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true, value_parser = parse_longitude)]
        lng: f64,
        /// Query words
        #[arg(required = true, trailing_var_arg = true)]
        query: Vec<String>,
    },
    /// Visiting advice for one place (markdown)
    Insights {
        #[arg(long)]
        name: String,
        #[arg(long = "type", value_name = "TYPE")]
        kind: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        address: Option<String>,
    },
    /// Search-term suggestions for a partial query, one per line
    Suggest {
        #[arg(long, allow_hyphen_values = true, value_parser = parse_latitude)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true, value_parser = parse_longitude)]
        lng: f64,
        /// Partial query words
        #[arg(required = true, trailing_var_arg = true)]
        partial: Vec<String>,
    },
}

fn retriever(settings: &Settings) -> Result<Retriever, citypulse::ConfigError> {
    let client = PerplexityClient::new(settings.perplexity_api_key.clone().unwrap_or_default())?
        .with_base_url(settings.base_url.clone());
    Ok(Retriever::new(Arc::new(client))
        .with_policy(RetrievalPolicy::new(settings.max_attempts, settings.attempt_timeout)))
}

fn finish(out: CommandOutput) {
    if out.ok {
        println!("{}", out.text);
    } else {
        eprintln!("{}", out.text);
        std::process::exit(1);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = config::load_and_apply("citypulse", None) {
        eprintln!("config error: {}", e);
        std::process::exit(1);
    }
    let _log_guard = config::tracing_init::init("citypulse")?;

    let args = Args::parse();
    let settings = Settings::from_env();

    if let Command::Serve { addr } = &args.cmd {
        let state = match serve::AppState::from_settings(&settings) {
            Ok(state) => state,
            Err(e) => {
                error!("{}", e);
                eprintln!("config error: {}", e);
                std::process::exit(1);
            }
        };
        let addr = addr.as_deref().unwrap_or(settings.addr.as_str());
        if let Err(e) = serve::run_serve(Some(addr), state).await {
            eprintln!("serve error: {}", e);
            std::process::exit(1);
        }
        return Ok(());
    }

    let retriever = match retriever(&settings) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("config error: {}", e);
            std::process::exit(1);
        }
    };

    let out = match args.cmd {
        Command::Serve { .. } => return Ok(()),
        Command::Nearby { lat, lng } => cli::nearby(&retriever, lat, lng, args.pretty).await?,
        Command::Search { lat, lng, query } => {
            cli::search(&retriever, lat, lng, &query.join(" "), args.pretty).await?
        }
        Command::Insights {
            name,
            kind,
            description,
            address,
        } => {
            let place = PlaceSummary {
                name,
                kind,
                description,
                address,
            };
            cli::insights(&retriever, &place).await
        }
        Command::Suggest { lat, lng, partial } => {
            cli::suggest(&retriever, lat, lng, &partial.join(" ")).await
        }
    };
    finish(out);
    Ok(())
}

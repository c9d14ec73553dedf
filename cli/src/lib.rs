//! CityPulse CLI library: command bodies behind the `citypulse` binary.
//!
//! Each command takes a [`Retriever`] and returns a [`CommandOutput`]; the binary prints it and
//! turns `ok == false` into exit code 1.

use citypulse::{PlaceSummary, Retriever};
use serde_json::Value;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] citypulse::ConfigError),
    #[error("serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

/// Text to print and whether the command succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub text: String,
    pub ok: bool,
}

/// Clap value parser for latitudes.
pub fn parse_latitude(s: &str) -> Result<f64, String> {
    parse_degrees(s, 90.0)
}

/// Clap value parser for longitudes.
pub fn parse_longitude(s: &str) -> Result<f64, String> {
    parse_degrees(s, 180.0)
}

fn parse_degrees(s: &str, limit: f64) -> Result<f64, String> {
    let v: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("not a number: {}", s))?;
    if v.is_finite() && (-limit..=limit).contains(&v) {
        Ok(v)
    } else {
        Err(format!("{} is outside ±{}", s, limit))
    }
}

/// Serializes to one line, or multi-line when `pretty`.
pub fn render_json(value: &Value, pretty: bool) -> Result<String, CliError> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}

/// `citypulse nearby`: the retrieval envelope as JSON.
pub async fn nearby(
    retriever: &Retriever,
    lat: f64,
    lng: f64,
    pretty: bool,
) -> Result<CommandOutput, CliError> {
    let outcome = retriever.fetch_nearby(lat, lng).await;
    debug!(attempts = outcome.attempts(), "nearby done");
    let value = serde_json::to_value(outcome.envelope())?;
    Ok(CommandOutput {
        text: render_json(&value, pretty)?,
        ok: outcome.is_success(),
    })
}

/// `citypulse search`: the retrieval envelope with the query echoed.
pub async fn search(
    retriever: &Retriever,
    lat: f64,
    lng: f64,
    query: &str,
    pretty: bool,
) -> Result<CommandOutput, CliError> {
    let outcome = retriever.fetch_for_query(lat, lng, query).await;
    let value = serde_json::to_value(outcome.envelope().with_query(query))?;
    Ok(CommandOutput {
        text: render_json(&value, pretty)?,
        ok: outcome.is_success(),
    })
}

/// `citypulse insights`: markdown advice, or the error message.
pub async fn insights(retriever: &Retriever, place: &PlaceSummary) -> CommandOutput {
    match retriever.fetch_insights(place).await {
        Ok(text) => CommandOutput { text, ok: true },
        Err(e) => CommandOutput {
            text: format!("error: {}", e),
            ok: false,
        },
    }
}

/// `citypulse suggest`: one suggestion per line.
pub async fn suggest(retriever: &Retriever, lat: f64, lng: f64, partial: &str) -> CommandOutput {
    match retriever.fetch_suggestions(lat, lng, partial).await {
        Ok(list) => CommandOutput {
            text: list.join("\n"),
            ok: true,
        },
        Err(e) => CommandOutput {
            text: format!("error: {}", e),
            ok: false,
        },
    }
}

//! HTML rendering of a debug retrieval run.

use super::RetrievalOutcome;

/// Point used by the debug endpoint when the caller gives no coordinates.
pub const DEBUG_COORDINATES: (f64, f64) = (30.59077127702062, -97.8626356236235);

/// Heading with the attempt number and the pretty-printed structure (or the error) in a `<pre>`.
pub fn debug_html(outcome: &RetrievalOutcome) -> String {
    match outcome {
        RetrievalOutcome::Success { data, attempts, .. } => {
            let body = serde_json::to_string_pretty(data).unwrap_or_default();
            format!(
                "<h2>Debug: Structured Response (Attempt {attempts})</h2>\n<pre>{}</pre>\n",
                escape(&body)
            )
        }
        RetrievalOutcome::Failure { error, attempts } => format!(
            "<h2>Debug: Error (Attempt {attempts})</h2>\n<pre>{}</pre>\n",
            escape(error)
        ),
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

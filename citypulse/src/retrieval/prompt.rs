//! User prompts for the discovery operations.

/// Longest user query interpolated into a prompt, in characters.
pub const MAX_QUERY_CHARS: usize = 200;

pub fn nearby(lat: f64, lng: f64) -> String {
    format!("Find current information near coordinates {lat}, {lng}")
}

pub fn for_query(lat: f64, lng: f64, query: &str) -> String {
    let query = sanitize_query(query);
    format!(
        "Find information about \"{query}\" near coordinates {lat}, {lng}.\n\n\
         Based on the query, categorize results appropriately:\n\
         - If it's about events/entertainment/activities, put in events array\n\
         - If it's about food/dining/restaurants, put in restaurants array\n\
         - If it's about alerts/traffic/weather/safety, put in alerts array\n\n\
         Include relevant results for the user's specific request: \"{query}\""
    )
}

pub fn nearby_text(lat: f64, lng: f64) -> String {
    format!(
        "Find current local events, popular restaurants, and any alerts or news happening near \
         coordinates {lat}, {lng}. Include specific names, addresses, and current status."
    )
}

pub fn suggestions(partial: &str, lat: f64, lng: f64) -> String {
    let partial = sanitize_query(partial);
    format!(
        "Based on the partial search query \"{partial}\" and location coordinates {lat}, {lng}, \
         suggest 5 relevant local search terms that users might be looking for.\n\n\
         Focus on:\n\
         - Local businesses and services\n\
         - Events and activities\n\
         - Popular local attractions\n\
         - Common local needs\n\n\
         Return suggestions as a simple JSON array of strings, like:\n\
         [\"coffee shops near me\", \"live music tonight\", \"parking downtown\", \"best restaurants\", \"happy hour specials\"]\n\n\
         Make suggestions specific and actionable for someone exploring this location."
    )
}

/// Trims, collapses line breaks, swaps double quotes for single ones and caps the length, so the
/// query cannot break out of its quoted slot in the prompt.
pub fn sanitize_query(query: &str) -> String {
    query
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('"', "'")
        .chars()
        .take(MAX_QUERY_CHARS)
        .collect()
}

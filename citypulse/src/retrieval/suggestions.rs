//! Parsing of search-term suggestions out of a free-text answer.

use serde_json::Value;

/// Most suggestions returned for one partial query.
pub const MAX_SUGGESTIONS: usize = 5;

/// Why a suggestions answer produced nothing usable.
#[derive(Debug, thiserror::Error)]
pub enum SuggestionError {
    #[error(transparent)]
    Gateway(#[from] crate::error::GatewayError),
    #[error("suggestions answer is JSON but not a list")]
    NotAList,
}

/// A JSON array keeps its first five string entries. Text that is not JSON falls back to the
/// first quoted span of each line. JSON of any other shape is [`SuggestionError::NotAList`].
pub fn parse_suggestions(answer: &str) -> Result<Vec<String>, SuggestionError> {
    match serde_json::from_str::<Value>(strip_fence(answer)) {
        Ok(Value::Array(items)) => Ok(items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .take(MAX_SUGGESTIONS)
            .collect()),
        Ok(_) => Err(SuggestionError::NotAList),
        Err(_) => Ok(quoted_spans(answer)),
    }
}

fn strip_fence(text: &str) -> &str {
    let t = text.trim();
    match t.strip_prefix("```") {
        Some(rest) => {
            let rest = rest.strip_prefix("json").unwrap_or(rest);
            rest.strip_suffix("```").unwrap_or(rest).trim()
        }
        None => t,
    }
}

fn quoted_spans(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| {
            let start = line.find('"')? + 1;
            let len = line[start..].find('"')?;
            let span = &line[start..start + len];
            (!span.trim().is_empty()).then(|| span.to_string())
        })
        .take(MAX_SUGGESTIONS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_array_is_capped_at_five() {
        let s = parse_suggestions(r#"["a","b","c","d","e","f"]"#).unwrap();
        assert_eq!(s, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn fenced_array_is_accepted() {
        let s = parse_suggestions("```json\n[\"coffee\", 3, \"tacos\"]\n```").unwrap();
        assert_eq!(s, vec!["coffee", "tacos"]);
    }

    #[test]
    fn prose_falls_back_to_quoted_spans() {
        let text = "Here you go:\n1. \"coffee shops near me\"\n2. \"live music\" tonight\nno quotes\n3. \"\"";
        let s = parse_suggestions(text).unwrap();
        assert_eq!(s, vec!["coffee shops near me", "live music"]);
    }

    #[test]
    fn json_object_is_not_a_list() {
        assert!(matches!(
            parse_suggestions(r#"{"suggestions": []}"#),
            Err(SuggestionError::NotAList)
        ));
    }
}

//! Result of one retrieval run and its JSON envelope.

use serde::Serialize;

use crate::gateway::CitationRef;
use crate::schema::LocalInfo;

/// Terminal state of a retrieval run. `attempts` counts gateway calls made, from 1 up to the
/// policy's budget.
#[derive(Clone, Debug, PartialEq)]
pub enum RetrievalOutcome {
    /// Non-empty data, or whatever the last attempt decoded (possibly all-empty).
    Success {
        data: LocalInfo,
        citations: Vec<CitationRef>,
        attempts: usize,
    },
    /// The last attempt failed; `error` is its message.
    Failure { error: String, attempts: usize },
}

impl RetrievalOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RetrievalOutcome::Success { .. })
    }

    pub fn attempts(&self) -> usize {
        match self {
            RetrievalOutcome::Success { attempts, .. } | RetrievalOutcome::Failure { attempts, .. } => {
                *attempts
            }
        }
    }

    /// `{success, data, citations, attempt}` or `{success: false, error, attempt}`.
    pub fn envelope(&self) -> Envelope<'_> {
        match self {
            RetrievalOutcome::Success {
                data,
                citations,
                attempts,
            } => Envelope {
                success: true,
                data: Some(data),
                citations: Some(citations),
                query: None,
                error: None,
                attempt: *attempts,
            },
            RetrievalOutcome::Failure { error, attempts } => Envelope {
                success: false,
                data: None,
                citations: None,
                query: None,
                error: Some(error),
                attempt: *attempts,
            },
        }
    }
}

/// Wire shape of a [`RetrievalOutcome`].
#[derive(Debug, Serialize)]
pub struct Envelope<'a> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<&'a LocalInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citations: Option<&'a [CitationRef]>,
    /// Echo of the user query, for query-driven discovery.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
    pub attempt: usize,
}

impl<'a> Envelope<'a> {
    /// Adds the query echo on success; failures carry no query.
    pub fn with_query(mut self, query: &'a str) -> Self {
        if self.success {
            self.query = Some(query);
        }
        self
    }
}

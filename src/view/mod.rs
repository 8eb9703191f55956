use serde::Serialize;
use tracing::{info, warn};

use crate::client::{is_lookup_code, ApiClient, ClientError};
use crate::explorer::{fallback_records, ExplorerState, SnapshotSource};
use crate::query::QueryValidator;
use crate::record::InfractionRecord;

pub const DEFAULT_EMPTY_MESSAGE: &str = "No infractions found for this search.";

/// What the client currently shows.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Results(T),
    Empty(EmptyView),
    Error { message: String },
}

impl<T> ViewState<T> {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Results(_) => "results",
            Self::Empty(_) => "empty",
            Self::Error { .. } => "error",
        }
    }
}

/// Holds the state of one view across a request: `Idle` until an action
/// starts, `Loading` while it runs, then whatever the action produced.
#[derive(Clone, Debug)]
pub struct ViewController<T> {
    state: ViewState<T>,
}

impl<T> Default for ViewController<T> {
    fn default() -> Self {
        Self {
            state: ViewState::Idle,
        }
    }
}

impl<T> ViewController<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState<T> {
        &self.state
    }

    /// Moves to `Loading`. Returns false, leaving the state alone, when a
    /// request is already loading.
    pub fn begin(&mut self) -> bool {
        if self.state.is_loading() {
            return false;
        }
        self.state = ViewState::Loading;
        true
    }

    /// Applies the outcome of the action. `None` means the action was
    /// ignored; a view left loading by it goes back to idle.
    pub fn finish(&mut self, outcome: Option<ViewState<T>>) {
        match outcome {
            Some(next) => self.state = next,
            None if self.state.is_loading() => self.state = ViewState::Idle,
            None => {}
        }
    }

    pub fn into_state(self) -> ViewState<T> {
        self.state
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EmptyView {
    pub message: String,
    pub suggestion: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub total: u64,
    pub records: Vec<InfractionRecord>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExplorerLoad {
    pub limit: usize,
    pub retries: usize,
    pub fallback: bool,
    pub page_size: usize,
}

/// Wires user actions to the validator and the API client and turns every
/// outcome into a [`ViewState`].
///
/// Each action returns `None` when it was ignored because the same kind of
/// request is still in flight.
#[derive(Debug)]
pub struct SearchSession {
    client: ApiClient,
    validator: QueryValidator,
}

impl SearchSession {
    pub fn new(client: ApiClient, validator: QueryValidator) -> Self {
        Self { client, validator }
    }

    pub fn validator(&self) -> &QueryValidator {
        &self.validator
    }

    pub async fn search(
        &self,
        raw: &str,
        skip: usize,
        limit: usize,
    ) -> Option<ViewState<SearchResults>> {
        let query = match self.validator.validate(raw) {
            Ok(query) => query,
            Err(rejection) => {
                info!(query = %raw.trim(), reason = %rejection, "query rejected");
                return Some(ViewState::error(rejection.to_string()));
            }
        };

        match self.client.search(query, skip, limit).await {
            Ok(response) if response.is_empty() => {
                let message = response
                    .message
                    .as_deref()
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .unwrap_or(DEFAULT_EMPTY_MESSAGE)
                    .to_string();
                Some(ViewState::Empty(EmptyView {
                    message,
                    suggestion: response.suggestion().map(str::to_string),
                }))
            }
            Ok(response) => Some(ViewState::Results(SearchResults {
                query: query.to_string(),
                total: response.total(),
                records: response.results,
            })),
            Err(ClientError::Busy) => None,
            Err(e) => {
                warn!(query = %query, error = %e, "search failed");
                Some(ViewState::error(e.to_string()))
            }
        }
    }

    pub async fn details(&self, code: &str) -> Option<ViewState<InfractionRecord>> {
        let code = code.trim();
        if code.is_empty() {
            return Some(ViewState::error("enter an infraction code"));
        }
        if !is_lookup_code(code) {
            return Some(ViewState::error(format!("invalid infraction code '{code}'")));
        }
        match self.client.get(code).await {
            Ok(record) => Some(ViewState::Results(record)),
            Err(ClientError::Busy) => None,
            Err(e) => {
                warn!(code = %code, error = %e, "detail lookup failed");
                Some(ViewState::error(e.to_string()))
            }
        }
    }

    /// Loads the explorer snapshot, retrying the listing up to
    /// `load.retries` more times. When every attempt fails and fallback is
    /// enabled the session starts from the built-in sample instead.
    pub async fn load_explorer(&self, load: ExplorerLoad) -> Option<ViewState<ExplorerState>> {
        let mut last_error = None;
        for attempt in 0..=load.retries {
            match self.client.list(load.limit).await {
                Ok(records) => {
                    return Some(ViewState::Results(ExplorerState::new(
                        records,
                        SnapshotSource::Backend,
                        load.page_size,
                    )));
                }
                Err(ClientError::Busy) => return None,
                Err(e) => {
                    warn!(attempt = attempt + 1, error = %e, "listing failed");
                    last_error = Some(e);
                }
            }
        }

        let message = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "failed to load the infraction listing".to_string());
        if load.fallback {
            warn!(error = %message, "using built-in sample data");
            return Some(ViewState::Results(ExplorerState::new(
                fallback_records(),
                SnapshotSource::Fallback,
                load.page_size,
            )));
        }
        Some(ViewState::error(message))
    }
}

//! Employer candidate search controller.
//!
//! The controller owns the filter state and the current result set. A rendering
//! layer reads snapshots, subscribes to [`ControllerEvent`]s and emits intents
//! (`set_filter`, `search`, `clear_filters`, `remove_filter_chip`); it never
//! mutates controller state directly.
//!
//! Every search is tagged with a generation number when it is issued. A
//! response is applied only if no later search has been issued since, so a
//! slow superseded request can never overwrite fresher state.

use std::{
    future::Future,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use shared::{
    domain::{FilterCatalog, FilterField, OptionsVariant},
    filters::{CandidateQuery, FilterChip, FilterState},
    protocol::{CandidateSummary, FilterOptions},
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::{
    config::ClientSettings,
    contact::{ContactDraft, EmployerIdentity},
    error::{BackendError, ContactError},
    events::{ControllerEvent, Notification, NotificationContext, SearchStatus},
    HttpSearchBackend, SearchBackend, SEARCH_CANDIDATES_PATH,
};

const SEARCH_FAILED_MESSAGE: &str = "Failed to search candidates";
const CONTACT_SENT_MESSAGE: &str = "Message sent successfully!";
const CONTACT_FAILED_MESSAGE: &str = "Failed to send message";
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// An issued search waiting for its response.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTicket {
    generation: u64,
    query: CandidateQuery,
}

impl SearchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn query(&self) -> &CandidateQuery {
        &self.query
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Applied { count: usize },
    Failed,
    Superseded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchSnapshot {
    pub filters: FilterState,
    pub options: FilterOptions,
    pub results: Vec<CandidateSummary>,
    pub status: SearchStatus,
    pub chips: Vec<FilterChip>,
    pub generation: u64,
}

#[derive(Default)]
struct ControllerState {
    filters: FilterState,
    options: FilterOptions,
    options_loaded: bool,
    results: Vec<CandidateSummary>,
    status: SearchStatus,
    issued_generation: u64,
}

pub struct CandidateSearchController {
    backend: Arc<dyn SearchBackend>,
    options_variant: OptionsVariant,
    request_timeout: Duration,
    state: Mutex<ControllerState>,
    events: broadcast::Sender<ControllerEvent>,
}

impl CandidateSearchController {
    pub fn new(settings: &ClientSettings) -> Result<Self, BackendError> {
        let backend = HttpSearchBackend::from_settings(settings)?;
        Ok(Self::with_backend(
            Arc::new(backend),
            settings.options_variant,
            settings.request_timeout(),
        ))
    }

    pub fn with_backend(
        backend: Arc<dyn SearchBackend>,
        options_variant: OptionsVariant,
        request_timeout: Duration,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            backend,
            options_variant,
            request_timeout,
            state: Mutex::new(ControllerState::default()),
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    /// Loads the filter options and runs the initial unfiltered search.
    ///
    /// Option failures degrade to empty lists; a failed search leaves the
    /// controller in [`SearchStatus::Failed`] without retrying.
    pub async fn initialize(&self) -> SearchOutcome {
        let initial = self.issue(CandidateQuery::default());
        let (_, outcome) = futures::join!(self.load_options(), self.finish_search(initial));
        outcome
    }

    /// Fetches majors and the secondary option list once per controller.
    pub async fn load_options(&self) -> FilterOptions {
        {
            let state = self.lock_state();
            if state.options_loaded {
                return state.options.clone();
            }
        }

        let secondary = FilterCatalog::from(self.options_variant);
        let fetched = futures::try_join!(
            self.fetch_catalog(FilterCatalog::Majors),
            self.fetch_catalog(secondary)
        );

        let options = match fetched {
            Ok((majors, values)) => {
                let mut options = FilterOptions {
                    majors,
                    ..FilterOptions::default()
                };
                match self.options_variant {
                    OptionsVariant::Industries => options.industries = values,
                    OptionsVariant::Skills => options.skills = values,
                }
                options
            }
            Err(err) => {
                warn!(error = %err, "failed to load filter options; continuing with empty lists");
                FilterOptions::default()
            }
        };

        let secondary_len = options.industries.len() + options.skills.len();
        {
            let mut state = self.lock_state();
            state.options = options.clone();
            state.options_loaded = true;
            self.emit(ControllerEvent::OptionsLoaded {
                majors: options.majors.len(),
                secondary: secondary_len,
            });
        }
        options
    }

    async fn fetch_catalog(&self, catalog: FilterCatalog) -> Result<Vec<String>, BackendError> {
        match tokio::time::timeout(self.request_timeout, self.backend.list_filter_values(catalog))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(BackendError::Timeout {
                endpoint: catalog.path().to_string(),
                timeout: self.request_timeout,
            }),
        }
    }

    /// Updates one field from raw UI input. Never triggers a search.
    pub fn set_filter(&self, field: FilterField, raw: &str) {
        let mut state = self.lock_state();
        state.filters.set_raw(field, raw);
        debug!(field = %field, constrained = state.filters.is_constrained(field), "filter updated");
    }

    /// Replaces the whole filter state. Never triggers a search.
    pub fn replace_filters(&self, filters: FilterState) {
        self.lock_state().filters = filters;
    }

    /// Issues a search for the current filters.
    ///
    /// The generation is assigned before this returns, so searches are ordered
    /// by call order even if the returned futures are polled out of order.
    pub fn search(&self) -> impl Future<Output = SearchOutcome> + Send + '_ {
        let ticket = self.begin_search();
        self.finish_search(ticket)
    }

    pub fn begin_search(&self) -> SearchTicket {
        let query = self.lock_state().filters.to_query();
        self.issue(query)
    }

    pub async fn finish_search(&self, ticket: SearchTicket) -> SearchOutcome {
        let SearchTicket { generation, query } = ticket;
        debug!(generation, query = %query, "candidate search issued");

        let response =
            match tokio::time::timeout(self.request_timeout, self.backend.search_candidates(&query))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(BackendError::Timeout {
                    endpoint: SEARCH_CANDIDATES_PATH.to_string(),
                    timeout: self.request_timeout,
                }),
            };

        self.apply_search_response(generation, response)
    }

    /// Resets every filter and always re-runs the search.
    pub fn clear_filters(&self) -> impl Future<Output = SearchOutcome> + Send + '_ {
        let ticket = self.begin_clear_filters();
        self.finish_search(ticket)
    }

    /// Issue step of [`Self::clear_filters`].
    pub fn begin_clear_filters(&self) -> SearchTicket {
        let query = {
            let mut state = self.lock_state();
            state.filters.clear_all();
            state.filters.to_query()
        };
        self.issue(query)
    }

    /// Clears one filter and immediately re-runs the search.
    pub fn remove_filter_chip(
        &self,
        field: FilterField,
    ) -> impl Future<Output = SearchOutcome> + Send + '_ {
        let ticket = self.begin_remove_filter_chip(field);
        self.finish_search(ticket)
    }

    /// Issue step of [`Self::remove_filter_chip`].
    pub fn begin_remove_filter_chip(&self, field: FilterField) -> SearchTicket {
        let query = {
            let mut state = self.lock_state();
            state.filters.clear(field);
            state.filters.to_query()
        };
        self.issue(query)
    }

    pub fn active_filter_chips(&self) -> Vec<FilterChip> {
        self.lock_state().filters.active_chips()
    }

    pub fn filters(&self) -> FilterState {
        self.lock_state().filters.clone()
    }

    pub fn options(&self) -> FilterOptions {
        self.lock_state().options.clone()
    }

    pub fn results(&self) -> Vec<CandidateSummary> {
        self.lock_state().results.clone()
    }

    pub fn status(&self) -> SearchStatus {
        self.lock_state().status
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        let state = self.lock_state();
        SearchSnapshot {
            filters: state.filters.clone(),
            options: state.options.clone(),
            results: state.results.clone(),
            status: state.status,
            chips: state.filters.active_chips(),
            generation: state.issued_generation,
        }
    }

    /// Sends a contact message to a search result. Search state is untouched.
    pub async fn contact_candidate(
        &self,
        employer: &EmployerIdentity,
        candidate: &CandidateSummary,
        draft: &ContactDraft,
    ) -> Result<(), ContactError> {
        if let Err(err) = draft.validate() {
            self.notify(Notification::error(NotificationContext::Contact, err.to_string()));
            return Err(err);
        }

        let request = draft.to_request(employer, candidate);
        let sent = match tokio::time::timeout(
            self.request_timeout,
            self.backend.contact_candidate(&request),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(BackendError::Timeout {
                endpoint: crate::CONTACT_CANDIDATE_PATH.to_string(),
                timeout: self.request_timeout,
            }),
        };

        match sent {
            Ok(()) => {
                info!(candidate_id = %candidate.alumni_id, "contact message sent");
                self.notify(Notification::success(
                    NotificationContext::Contact,
                    CONTACT_SENT_MESSAGE,
                ));
                Ok(())
            }
            Err(err) => {
                warn!(candidate_id = %candidate.alumni_id, error = %err, "contact message failed");
                self.notify(Notification::error(
                    NotificationContext::Contact,
                    CONTACT_FAILED_MESSAGE,
                ));
                Err(err.into())
            }
        }
    }

    /// Status events are sent while the state lock is held, so subscribers see
    /// them in the same order the state changed.
    fn issue(&self, query: CandidateQuery) -> SearchTicket {
        let mut state = self.lock_state();
        state.issued_generation += 1;
        state.status = SearchStatus::Loading;
        self.emit(ControllerEvent::StatusChanged(SearchStatus::Loading));
        SearchTicket {
            generation: state.issued_generation,
            query,
        }
    }

    fn apply_search_response(
        &self,
        generation: u64,
        response: Result<Vec<CandidateSummary>, BackendError>,
    ) -> SearchOutcome {
        let mut state = self.lock_state();
        if generation != state.issued_generation {
            debug!(
                generation,
                latest = state.issued_generation,
                "discarding superseded search response"
            );
            return SearchOutcome::Superseded;
        }

        match response {
            Ok(candidates) => {
                let count = candidates.len();
                state.results = candidates;
                state.status = SearchStatus::Ready;
                info!(generation, count, "candidate search completed");
                self.emit(ControllerEvent::StatusChanged(SearchStatus::Ready));
                self.emit(ControllerEvent::ResultsReplaced { generation, count });
                SearchOutcome::Applied { count }
            }
            Err(err) => {
                state.status = SearchStatus::Failed;
                warn!(generation, error = %err, "candidate search failed");
                self.emit(ControllerEvent::StatusChanged(SearchStatus::Failed));
                self.notify(Notification::error(
                    NotificationContext::Search,
                    SEARCH_FAILED_MESSAGE,
                ));
                SearchOutcome::Failed
            }
        }
    }

    fn notify(&self, notification: Notification) {
        self.emit(ControllerEvent::Notification(notification));
    }

    fn emit(&self, event: ControllerEvent) {
        let _ = self.events.send(event);
    }

    fn lock_state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;

//! The search/list view model.
//!
//! State lives in a `watch` channel: every mutation notifies subscribers,
//! and renderers read snapshots. Nothing holds the state across an await.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::api::{ApiVersion, ImageApi};
use crate::envelope::ListOutcome;
use crate::helpers::toggle_processed;
use crate::image::{ImageRecord, PageInfo};
use crate::location::{Location, SEARCH_KEY};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewState {
    pub search_string: String,
    /// `None` until a response has been applied, and again while a search
    /// is in flight.
    pub images: Option<Vec<ImageRecord>>,
    pub page: Option<PageInfo>,
    pub error: Option<String>,
    pub location: Location,
}

pub struct SearchListView {
    api: Arc<dyn ImageApi>,
    version: ApiVersion,
    state: watch::Sender<ViewState>,
    /// Ticket of the most recently issued request. Only its response is
    /// applied.
    issued: AtomicU64,
}

impl SearchListView {
    pub fn new(api: Arc<dyn ImageApi>, version: ApiVersion, location: Location) -> Self {
        let (state, _) = watch::channel(ViewState {
            location,
            ..Default::default()
        });
        Self {
            api,
            version,
            state,
            issued: AtomicU64::new(0),
        }
    }

    /// Builds the view and runs its initial load.
    pub async fn load(api: Arc<dyn ImageApi>, version: ApiVersion, location: Location) -> Self {
        let view = Self::new(api, version, location);
        view.initial_load().await;
        view
    }

    /// Fetches the unfiltered list, and when the location carries `q`, also
    /// runs that search. Both requests are in flight at once; the search was
    /// issued last, so it is the one that sticks.
    pub async fn initial_load(&self) {
        let seeded = self.state.borrow().location.search().map(str::to_string);
        match seeded {
            None => self.list(None).await,
            Some(query) => {
                log::debug!("Location carries q={:?}, searching right away", query);
                let unfiltered = self.list(None);
                let filtered = async {
                    self.set_search_string(&query);
                    self.search().await;
                };
                futures::future::join(unfiltered, filtered).await;
            }
        }
    }

    /// Issues one listing request and applies its result, unless a newer
    /// request has been issued in the meantime.
    pub async fn list(&self, query: Option<&str>) {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        log::debug!("Request #{} for images with query: {:?}", ticket, query);

        let result = self.api.list_images(query).await;

        if self.issued.load(Ordering::SeqCst) != ticket {
            log::debug!("Discarding response #{}, a newer request was issued", ticket);
            return;
        }

        match result {
            Ok(ListOutcome::Success(list)) => {
                log::debug!("Request #{} returned {} images", ticket, list.images.len());
                self.state.send_modify(|state| {
                    state.images = Some(list.images);
                    state.page = list.page;
                    state.error = None;
                });
            }
            Ok(ListOutcome::Failure(status)) => {
                log::warn!("Request #{} answered with status {:?}", ticket, status);
                self.state.send_modify(|state| state.error = Some(status));
            }
            Err(err) => {
                log::error!("Request #{} failed: {}", ticket, err);
                let message = err.user_message();
                self.state.send_modify(|state| state.error = Some(message));
            }
        }
    }

    /// Drops the current results, mirrors the search string into the
    /// location and lists with it.
    pub async fn search(&self) {
        let mut query = String::new();
        self.state.send_modify(|state| {
            state.images = None;
            state.page = None;
            state.location.set(SEARCH_KEY, &state.search_string);
            query = state.search_string.clone();
        });
        self.list(Some(&query)).await;
    }

    pub fn set_search_string(&self, query: &str) {
        self.state.send_if_modified(|state| {
            if state.search_string == query {
                return false;
            }
            state.search_string = query.to_string();
            true
        });
    }

    /// A page load at `location`.
    pub async fn navigate(&self, location: Location) {
        log::debug!("Navigating to ?{}", location.query_string());
        self.state.send_modify(|state| {
            state.search_string = location.search().unwrap_or_default().to_string();
            state.location = location;
            state.images = None;
            state.page = None;
            state.error = None;
        });
        self.initial_load().await;
    }

    /// Toggles the processed image of the record with `id`. Returns false
    /// when no such record is displayed.
    pub fn toggle(&self, id: i64) -> bool {
        let version = self.version;
        self.state.send_if_modified(|state| {
            let record = state
                .images
                .as_mut()
                .and_then(|images| images.iter_mut().find(|image| image.id == id));
            match record {
                Some(record) => {
                    toggle_processed(record, version);
                    true
                }
                None => false,
            }
        })
    }

    pub fn snapshot(&self) -> ViewState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    /// Runs `render` after every mutation until the view is dropped.
    pub fn on_change<F>(&self, mut render: F) -> JoinHandle<()>
    where
        F: FnMut(&ViewState) + Send + 'static,
    {
        let mut rx = self.state.subscribe();
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let state = rx.borrow_and_update().clone();
                render(&state);
            }
        })
    }
}

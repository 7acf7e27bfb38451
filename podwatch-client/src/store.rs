use std::collections::BTreeSet;

use podwatch::{unix_now, validate, Category, Podcast, PodcastDraft, PodcastError, PodcastPatch};

use crate::api::PodcastApi;

/// Lifecycle of one tracked request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OpStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// Store operations, each tracked on its own status slice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Fetch,
    Create,
    Update,
    Delete,
    Search,
    Filter,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct OperationStatus {
    pub fetch: OpStatus,
    pub create: OpStatus,
    pub update: OpStatus,
    pub delete: OpStatus,
    pub search: OpStatus,
    pub filter: OpStatus,
}

impl OperationStatus {
    pub fn get(&self, op: Op) -> OpStatus {
        match op {
            Op::Fetch => self.fetch,
            Op::Create => self.create,
            Op::Update => self.update,
            Op::Delete => self.delete,
            Op::Search => self.search,
            Op::Filter => self.filter,
        }
    }

    fn set(&mut self, op: Op, status: OpStatus) {
        match op {
            Op::Fetch => self.fetch = status,
            Op::Create => self.create = status,
            Op::Update => self.update = status,
            Op::Delete => self.delete = status,
            Op::Search => self.search = status,
            Op::Filter => self.filter = status,
        }
    }
}

/// Client-side projection of the watchlist plus the status of every
/// operation against it.
///
/// One instance per app session, built around an injected [`PodcastApi`].
/// Operations never return errors to the caller; a failure flips the
/// operation's status to `Failed`, records a message, and leaves every
/// collection untouched. Display precedence is a pure function of the
/// search/filter state, never of request completion order.
pub struct RequestStateStore<A> {
    api: A,
    podcasts: Vec<Podcast>,
    focused: Option<Podcast>,
    search_results: Vec<Podcast>,
    searching: bool,
    filtered: Vec<Podcast>,
    active_filters: BTreeSet<Category>,
    last_fetched: Option<u64>,
    status: OpStatus,
    ops: OperationStatus,
    last_error: Option<String>,
}

impl<A: PodcastApi> RequestStateStore<A> {
    pub fn new(api: A) -> Self {
        RequestStateStore {
            api,
            podcasts: Vec::new(),
            focused: None,
            search_results: Vec::new(),
            searching: false,
            filtered: Vec::new(),
            active_filters: BTreeSet::new(),
            last_fetched: None,
            status: OpStatus::Idle,
            ops: OperationStatus::default(),
            last_error: None,
        }
    }

    fn begin(&mut self, op: Op) {
        self.ops.set(op, OpStatus::Loading);
        self.status = OpStatus::Loading;
        self.last_error = None;
    }

    fn succeed(&mut self, op: Op) {
        self.ops.set(op, OpStatus::Succeeded);
        self.status = OpStatus::Succeeded;
    }

    fn fail(&mut self, op: Op, err: PodcastError) {
        self.ops.set(op, OpStatus::Failed);
        self.status = OpStatus::Failed;
        self.last_error = Some(err.to_string());
    }

    fn rederive_filtered(&mut self) {
        self.filtered =
            self.podcasts.iter().filter(|p| self.active_filters.contains(&p.category)).cloned().collect();
    }

    /// Load the full collection, replacing the list and re-deriving the
    /// filtered slice from it when filters are active.
    pub async fn fetch_all(&mut self) {
        self.begin(Op::Fetch);
        match self.api.fetch_all().await {
            Ok(podcasts) => {
                self.podcasts = podcasts;
                if !self.active_filters.is_empty() {
                    self.rederive_filtered();
                }
                self.last_fetched = Some(unix_now());
                self.succeed(Op::Fetch);
            }
            Err(err) => self.fail(Op::Fetch, err),
        }
    }

    /// Load one podcast into the focused slot. On failure the previous
    /// focused podcast and the list are left untouched.
    pub async fn fetch_one(&mut self, id: &str) {
        self.begin(Op::Fetch);
        match self.api.fetch_one(id).await {
            Ok(podcast) => {
                self.focused = Some(podcast);
                self.succeed(Op::Fetch);
            }
            Err(err) => self.fail(Op::Fetch, err),
        }
    }

    /// Create a podcast. URL domain and PIN format are checked locally
    /// first; malformed input never reaches the network.
    pub async fn create(&mut self, draft: &PodcastDraft) {
        self.begin(Op::Create);
        let precheck = match draft.url.as_deref() {
            Some(url) => validate::check_url(url),
            None => Err(PodcastError::validation(validate::URL_REQUIRED)),
        }
        .and_then(|()| validate::pin_format(draft.pin.as_deref()).map(|_| ()));
        if let Err(err) = precheck {
            return self.fail(Op::Create, err);
        }

        match self.api.create(draft).await {
            Ok(podcast) => {
                if self.active_filters.contains(&podcast.category) {
                    self.filtered.push(podcast.clone());
                }
                self.podcasts.push(podcast);
                self.succeed(Op::Create);
            }
            Err(err) => self.fail(Op::Create, err),
        }
    }

    /// Patch a podcast; any URL in the patch is re-validated locally. On
    /// success the entry is replaced by id in the list, the filtered slice
    /// and the focused slot.
    pub async fn update(&mut self, id: &str, patch: &PodcastPatch, pin: &str) {
        self.begin(Op::Update);
        if let Some(url) = patch.url.as_deref() {
            if let Err(err) = validate::check_url(url) {
                return self.fail(Op::Update, err);
            }
        }

        match self.api.update(id, patch, pin).await {
            Ok(updated) => {
                if let Some(entry) = self.podcasts.iter_mut().find(|p| p.id == updated.id) {
                    *entry = updated.clone();
                }
                if let Some(entry) = self.filtered.iter_mut().find(|p| p.id == updated.id) {
                    *entry = updated.clone();
                }
                if self.focused.as_ref().is_some_and(|p| p.id == updated.id) {
                    self.focused = Some(updated);
                }
                self.succeed(Op::Update);
            }
            Err(err) => self.fail(Op::Update, err),
        }
    }

    /// Delete a podcast; on success it is removed from the list and the
    /// filtered slice, and the focused slot is cleared if it held it.
    pub async fn delete(&mut self, id: &str, pin: &str) {
        self.begin(Op::Delete);
        match self.api.delete(id, pin).await {
            Ok(()) => {
                self.podcasts.retain(|p| p.id != id);
                self.filtered.retain(|p| p.id != id);
                if self.focused.as_ref().is_some_and(|p| p.id == id) {
                    self.focused = None;
                }
                self.succeed(Op::Delete);
            }
            Err(err) => self.fail(Op::Delete, err),
        }
    }

    /// Server-side search. A blank term clears the search state without a
    /// network call; it was never a request, so the slice goes back to idle.
    pub async fn search(&mut self, term: &str) {
        let term = term.trim();
        if term.is_empty() {
            self.searching = false;
            self.search_results.clear();
            self.ops.set(Op::Search, OpStatus::Idle);
            return;
        }

        self.begin(Op::Search);
        match self.api.search(term).await {
            Ok(results) => {
                self.search_results = results;
                self.searching = true;
                self.succeed(Op::Search);
            }
            Err(err) => self.fail(Op::Search, err),
        }
    }

    /// Category filtering is evaluated locally against the already-fetched
    /// list; no network round-trip. An empty set clears filtering.
    pub fn filter(&mut self, categories: &[Category]) {
        if categories.is_empty() {
            self.active_filters.clear();
            self.filtered.clear();
            self.ops.set(Op::Filter, OpStatus::Idle);
            return;
        }
        self.active_filters = categories.iter().copied().collect();
        self.rederive_filtered();
        self.ops.set(Op::Filter, OpStatus::Succeeded);
    }

    /// Display precedence: search > filter > full list.
    pub fn visible(&self) -> &[Podcast] {
        if self.searching {
            &self.search_results
        } else if !self.active_filters.is_empty() {
            &self.filtered
        } else {
            &self.podcasts
        }
    }

    pub fn podcasts(&self) -> &[Podcast] {
        &self.podcasts
    }

    pub fn focused(&self) -> Option<&Podcast> {
        self.focused.as_ref()
    }

    pub fn search_results(&self) -> &[Podcast] {
        &self.search_results
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    pub fn filtered(&self) -> &[Podcast] {
        &self.filtered
    }

    pub fn active_filters(&self) -> &BTreeSet<Category> {
        &self.active_filters
    }

    pub fn last_fetched(&self) -> Option<u64> {
        self.last_fetched
    }

    pub fn status(&self) -> OpStatus {
        self.status
    }

    pub fn operations(&self) -> &OperationStatus {
        &self.ops
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

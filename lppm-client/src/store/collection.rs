//! Remote collection cache
//!
//! One generic store per entity type. The local list is a cache of the
//! server: every mutation round-trips through the API and the cache is
//! reconciled from the record the server returns.
//!
//! The state lock is released before each request is sent, so two
//! overlapping requests are not coordinated and the later response wins.

use std::collections::BTreeMap;
use std::sync::Arc;

use shared::models::{CommunityService, ProgramStudi, ResearchProposal, User};
use shared::request::{ListQuery, SortOrder};
use shared::response::Pagination;
use tokio::sync::RwLock;
use validator::Validate;

use crate::api::{ApiClient, Resource, ResourceApi};
use crate::notify::NoticeBus;
use crate::{ClientError, ClientResult};

pub type ResearchStore = RemoteCollection<ResearchProposal>;
pub type ServiceStore = RemoteCollection<CommunityService>;
pub type ProgramStudiStore = RemoteCollection<ProgramStudi>;
pub type UserStore = RemoteCollection<User>;

/// Cached view of one collection
#[derive(Debug, Clone)]
pub struct CollectionState<R> {
    pub items: Vec<R>,
    /// Record opened through `fetch_one`
    pub current: Option<R>,
    pub query: ListQuery,
    pub pagination: Pagination,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl<R: Resource> CollectionState<R> {
    fn new(query: ListQuery) -> Self {
        Self {
            items: Vec::new(),
            current: None,
            pagination: Pagination::new(query.page, query.limit, 0),
            query,
            is_loading: false,
            error: None,
        }
    }

    pub fn find(&self, id: &str) -> Option<&R> {
        self.items
            .iter()
            .find(|item| item.id() == id)
            .or_else(|| self.current.as_ref().filter(|c| c.id() == id))
    }

    /// Append, or replace when the id is already cached
    fn upsert(&mut self, record: R) {
        match self.items.iter_mut().find(|item| item.id() == record.id()) {
            Some(slot) => *slot = record,
            None => {
                self.items.push(record);
                self.pagination.total += 1;
            }
        }
    }

    fn replace(&mut self, record: &R) {
        if let Some(slot) = self.items.iter_mut().find(|item| item.id() == record.id()) {
            *slot = record.clone();
        }
        if self.current.as_ref().is_some_and(|c| c.id() == record.id()) {
            self.current = Some(record.clone());
        }
    }

    fn remove(&mut self, id: &str) {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        if self.items.len() < before {
            self.pagination.total = self.pagination.total.saturating_sub(1);
        }
        if self.current.as_ref().is_some_and(|c| c.id() == id) {
            self.current = None;
        }
    }
}

/// Store handle over one collection; clones share state
pub struct RemoteCollection<R> {
    pub(crate) api: ResourceApi<R>,
    pub(crate) notices: NoticeBus,
    pub(crate) state: Arc<RwLock<CollectionState<R>>>,
    initial_query: ListQuery,
}

impl<R> Clone for RemoteCollection<R> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            notices: self.notices.clone(),
            state: Arc::clone(&self.state),
            initial_query: self.initial_query.clone(),
        }
    }
}

impl<R> std::fmt::Debug for RemoteCollection<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteCollection")
            .field("query", &self.initial_query)
            .finish_non_exhaustive()
    }
}

impl<R: Resource> RemoteCollection<R> {
    pub fn new(client: ApiClient, notices: NoticeBus) -> Self {
        Self::with_query(client, notices, ListQuery::default())
    }

    /// Start from a custom query (page size, default sort)
    pub fn with_query(client: ApiClient, notices: NoticeBus, query: ListQuery) -> Self {
        Self {
            api: ResourceApi::new(client),
            notices,
            state: Arc::new(RwLock::new(CollectionState::new(query.clone()))),
            initial_query: query,
        }
    }

    pub async fn snapshot(&self) -> CollectionState<R> {
        self.state.read().await.clone()
    }

    pub async fn items(&self) -> Vec<R> {
        self.state.read().await.items.clone()
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    pub async fn query(&self) -> ListQuery {
        self.state.read().await.query.clone()
    }

    /// Load the current page
    pub async fn fetch(&self) -> ClientResult<()> {
        let query = {
            let mut state = self.state.write().await;
            state.is_loading = true;
            state.error = None;
            state.query.clone()
        };

        match self.api.list(&query).await {
            Ok(response) => {
                let pagination = response.pagination_or_single_page();
                tracing::debug!(
                    resource = R::LABEL,
                    page = pagination.page,
                    count = response.data.len(),
                    total = pagination.total,
                    "Fetched page"
                );
                let mut state = self.state.write().await;
                state.items = response.data;
                state.pagination = pagination;
                state.is_loading = false;
                Ok(())
            }
            Err(e) => {
                self.fail(&e, "fetch").await;
                Err(e)
            }
        }
    }

    /// Load one record into `current`
    pub async fn fetch_one(&self, id: &str) -> ClientResult<R> {
        self.begin().await;
        match self.api.get(id).await {
            Ok(record) => {
                let mut state = self.state.write().await;
                state.current = Some(record.clone());
                state.is_loading = false;
                Ok(record)
            }
            Err(e) => {
                self.fail(&e, "fetch_one").await;
                Err(e)
            }
        }
    }

    pub async fn create(&self, payload: R::Create) -> ClientResult<R> {
        self.validate(&payload, "create").await?;
        self.begin().await;

        match self.api.create(&payload).await {
            Ok(record) => {
                tracing::info!(resource = R::LABEL, id = %record.id(), "Created");
                {
                    let mut state = self.state.write().await;
                    state.upsert(record.clone());
                    state.is_loading = false;
                }
                self.notices.success(format!("{} created", R::LABEL));
                Ok(record)
            }
            Err(e) => {
                self.fail(&e, "create").await;
                Err(e)
            }
        }
    }

    pub async fn update(&self, id: &str, payload: R::Update) -> ClientResult<R> {
        self.validate(&payload, "update").await?;
        self.begin().await;

        match self.api.update(id, &payload).await {
            Ok(record) => {
                tracing::info!(resource = R::LABEL, id = %record.id(), "Updated");
                self.apply(&record).await;
                self.notices.success(format!("{} updated", R::LABEL));
                Ok(record)
            }
            Err(e) => {
                self.fail(&e, "update").await;
                Err(e)
            }
        }
    }

    /// Delete a record; failure leaves the cache untouched and sets `error`
    pub async fn delete(&self, id: &str) -> bool {
        self.begin().await;

        match self.api.delete(id).await {
            Ok(()) => {
                tracing::info!(resource = R::LABEL, id, "Deleted");
                {
                    let mut state = self.state.write().await;
                    state.remove(id);
                    state.is_loading = false;
                }
                self.notices.success(format!("{} deleted", R::LABEL));
                true
            }
            Err(e) => {
                self.fail(&e, "delete").await;
                false
            }
        }
    }

    /// Set or, with a blank value, remove one filter
    pub async fn set_filter(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> ClientResult<()> {
        let (key, value) = (key.into(), value.into());
        self.requery(|q| {
            if value.trim().is_empty() {
                q.filters.remove(&key);
            } else {
                q.filters.insert(key, value);
            }
        })
        .await
    }

    pub async fn set_filters(&self, filters: BTreeMap<String, String>) -> ClientResult<()> {
        self.requery(|q| q.filters = filters).await
    }

    pub async fn clear_filters(&self) -> ClientResult<()> {
        self.requery(|q| {
            q.filters.clear();
            q.search = None;
        })
        .await
    }

    pub async fn set_search(&self, keyword: impl Into<String>) -> ClientResult<()> {
        let keyword = keyword.into();
        self.requery(|q| q.search = shared::util::non_blank(Some(&keyword)).map(str::to_string))
            .await
    }

    pub async fn set_sort(&self, field: impl Into<String>, order: SortOrder) -> ClientResult<()> {
        let field = field.into();
        self.requery(|q| {
            q.sort_by = Some(field);
            q.sort_order = order;
        })
        .await
    }

    pub async fn set_page_size(&self, limit: u32) -> ClientResult<()> {
        self.requery(|q| q.limit = limit.max(1)).await
    }

    /// Jump to a page; the only query change that keeps the page number
    pub async fn set_page(&self, page: u32) -> ClientResult<()> {
        self.state.write().await.query.page = page.max(1);
        self.fetch().await
    }

    /// Replace the whole query and fetch once, keeping its page
    pub async fn set_query(&self, query: ListQuery) -> ClientResult<()> {
        {
            let mut state = self.state.write().await;
            state.query = query;
            state.query.page = state.query.page.max(1);
            state.query.limit = state.query.limit.max(1);
        }
        self.fetch().await
    }

    pub async fn clear_error(&self) {
        self.state.write().await.error = None;
    }

    /// Discard everything cached and restore the initial query
    pub async fn reset(&self) {
        *self.state.write().await = CollectionState::new(self.initial_query.clone());
    }

    /// Change the query, go back to page 1 and refetch
    async fn requery(&self, change: impl FnOnce(&mut ListQuery)) -> ClientResult<()> {
        {
            let mut state = self.state.write().await;
            change(&mut state.query);
            state.query.reset_page();
        }
        self.fetch().await
    }

    pub(crate) async fn validate<P: Validate>(&self, payload: &P, op: &str) -> ClientResult<()> {
        if let Err(errors) = payload.validate() {
            let err = ClientError::from(errors);
            self.fail(&err, op).await;
            return Err(err);
        }
        Ok(())
    }

    pub(crate) async fn apply(&self, record: &R) {
        let mut state = self.state.write().await;
        state.replace(record);
        state.is_loading = false;
    }

    pub(crate) async fn begin(&self) {
        let mut state = self.state.write().await;
        state.is_loading = true;
        state.error = None;
    }

    pub(crate) async fn fail(&self, error: &ClientError, op: &str) {
        tracing::warn!(resource = R::LABEL, op, kind = ?error.kind(), error = %error, "Store operation failed");
        let message = error.to_string();
        {
            let mut state = self.state.write().await;
            state.is_loading = false;
            state.error = Some(message.clone());
        }
        self.notices.error(message);
    }
}

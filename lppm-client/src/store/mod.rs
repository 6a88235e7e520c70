//! Client-side stores
//!
//! - [`SessionStore`]: signed-in user and tokens
//! - [`RemoteCollection`]: paginated cache of one entity collection

pub mod collection;
pub mod proposal;
pub mod session;

pub use collection::{
    CollectionState, ProgramStudiStore, RemoteCollection, ResearchStore, ServiceStore, UserStore,
};
pub use session::{SessionState, SessionStore};

use std::sync::Arc;

use shared::request::ListQuery;

use crate::api::ApiClient;
use crate::notify::NoticeBus;
use crate::storage::Storage;

/// Every store of one application session, sharing a client and notice bus
#[derive(Debug, Clone)]
pub struct Stores {
    pub notices: NoticeBus,
    pub session: SessionStore,
    pub research: ResearchStore,
    pub services: ServiceStore,
    pub programs: ProgramStudiStore,
    pub users: UserStore,
}

impl Stores {
    pub async fn new(api: ApiClient, storage: Arc<dyn Storage>, page_size: u32) -> Self {
        let notices = NoticeBus::new();
        let query = ListQuery::new().paginate(1, page_size.max(1));
        Self {
            session: SessionStore::new(api.clone(), storage, notices.clone()).await,
            research: RemoteCollection::with_query(api.clone(), notices.clone(), query.clone()),
            services: RemoteCollection::with_query(api.clone(), notices.clone(), query.clone()),
            programs: RemoteCollection::with_query(api.clone(), notices.clone(), query.clone()),
            users: RemoteCollection::with_query(api, notices.clone(), query),
            notices,
        }
    }
}

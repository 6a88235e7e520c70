//! Entity collection endpoints
//!
//! Every collection on the LPPM API follows the same REST shape:
//!
//! | Operation | Request                    |
//! |-----------|----------------------------|
//! | list      | `GET {path}?page=..`       |
//! | get       | `GET {path}/{id}`          |
//! | create    | `POST {path}`              |
//! | update    | `PUT {path}/{id}`          |
//! | delete    | `DELETE {path}/{id}`       |
//!
//! Proposals additionally accept `POST {path}/{id}/submit` and
//! `PATCH {path}/{id}/status`.

use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::models::{
    CommunityService, ProgramStudi, ProgramStudiCreate, ProgramStudiUpdate, ProposalStatus,
    ResearchCreate, ResearchProposal, ResearchUpdate, ServiceCreate, ServiceUpdate,
    StatusUpdate, User, UserCreate, UserUpdate,
};
use shared::request::ListQuery;
use shared::response::PaginatedResponse;
use validator::Validate;

use super::ApiClient;
use crate::ClientResult;
use crate::http::ApiRequest;

/// An entity served as a REST collection
pub trait Resource: Clone + DeserializeOwned + Send + Sync + 'static {
    type Create: Serialize + Validate + Send + Sync;
    type Update: Serialize + Validate + Send + Sync;

    /// Collection path, e.g. `/api/research`
    const PATH: &'static str;

    /// Human-readable name used in notices
    const LABEL: &'static str;

    fn id(&self) -> &str;
}

/// Proposals carry a lifecycle status
pub trait ProposalResource: Resource {
    fn status(&self) -> ProposalStatus;
}

impl Resource for ProgramStudi {
    type Create = ProgramStudiCreate;
    type Update = ProgramStudiUpdate;
    const PATH: &'static str = "/api/program-studi";
    const LABEL: &'static str = "Program studi";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Resource for ResearchProposal {
    type Create = ResearchCreate;
    type Update = ResearchUpdate;
    const PATH: &'static str = "/api/research";
    const LABEL: &'static str = "Research proposal";

    fn id(&self) -> &str {
        &self.id
    }
}

impl ProposalResource for ResearchProposal {
    fn status(&self) -> ProposalStatus {
        self.status
    }
}

impl Resource for CommunityService {
    type Create = ServiceCreate;
    type Update = ServiceUpdate;
    const PATH: &'static str = "/api/service";
    const LABEL: &'static str = "Community service";

    fn id(&self) -> &str {
        &self.id
    }
}

impl ProposalResource for CommunityService {
    fn status(&self) -> ProposalStatus {
        self.status
    }
}

impl Resource for User {
    type Create = UserCreate;
    type Update = UserUpdate;
    const PATH: &'static str = "/api/users";
    const LABEL: &'static str = "User";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Typed access to one collection
#[derive(Debug)]
pub struct ResourceApi<R> {
    client: ApiClient,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceApi<R> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> ResourceApi<R> {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    fn item_path(id: &str) -> String {
        format!("{}/{}", R::PATH, urlencoding::encode(id))
    }

    pub async fn list(&self, query: &ListQuery) -> ClientResult<PaginatedResponse<R>> {
        self.client
            .send(ApiRequest::get(R::PATH).with_query(query.to_query_pairs()))
            .await
    }

    pub async fn get(&self, id: &str) -> ClientResult<R> {
        self.client.get(&Self::item_path(id)).await
    }

    pub async fn create(&self, payload: &R::Create) -> ClientResult<R> {
        self.client.post(R::PATH, payload).await
    }

    pub async fn update(&self, id: &str, payload: &R::Update) -> ClientResult<R> {
        self.client.put(&Self::item_path(id), payload).await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.client
            .execute(ApiRequest::delete(Self::item_path(id)))
            .await
    }
}

impl<R: ProposalResource> ResourceApi<R> {
    pub async fn submit(&self, id: &str) -> ClientResult<R> {
        self.client
            .send_data(ApiRequest::post(format!("{}/submit", Self::item_path(id))))
            .await
    }

    pub async fn update_status(&self, id: &str, update: &StatusUpdate) -> ClientResult<R> {
        self.client
            .patch(&format!("{}/status", Self::item_path(id)), update)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_path_encodes_id() {
        assert_eq!(
            ResourceApi::<ResearchProposal>::item_path("a/b c"),
            "/api/research/a%2Fb%20c"
        );
        assert_eq!(ResourceApi::<ProgramStudi>::item_path("7"), "/api/program-studi/7");
    }
}

//! Proposal lifecycle actions
//!
//! Research and community-service stores can submit drafts and move
//! proposals through review. A transition the cached record cannot make is
//! refused before any request is sent; records not in the cache are left to
//! the server to judge.

use shared::models::{ProposalStatus, StatusUpdate};

use super::collection::RemoteCollection;
use crate::api::ProposalResource;
use crate::{ClientError, ClientResult};

impl<R: ProposalResource> RemoteCollection<R> {
    /// Submit a draft for review
    pub async fn submit(&self, id: &str) -> ClientResult<R> {
        self.check_transition(id, ProposalStatus::Submitted, "submit")
            .await?;
        self.begin().await;

        match self.api.submit(id).await {
            Ok(record) => {
                tracing::info!(resource = R::LABEL, id, "Submitted");
                self.apply(&record).await;
                self.notices.success(format!("{} submitted", R::LABEL));
                Ok(record)
            }
            Err(e) => {
                self.fail(&e, "submit").await;
                Err(e)
            }
        }
    }

    /// Review decision or completion
    pub async fn update_status(&self, id: &str, update: StatusUpdate) -> ClientResult<R> {
        self.validate(&update, "update_status").await?;
        self.check_transition(id, update.status, "update_status")
            .await?;
        self.begin().await;

        match self.api.update_status(id, &update).await {
            Ok(record) => {
                tracing::info!(resource = R::LABEL, id, status = %record.status(), "Status changed");
                self.apply(&record).await;
                self.notices.success(format!(
                    "{} is now {}",
                    R::LABEL,
                    record.status().label()
                ));
                Ok(record)
            }
            Err(e) => {
                self.fail(&e, "update_status").await;
                Err(e)
            }
        }
    }

    async fn check_transition(&self, id: &str, next: ProposalStatus, op: &str) -> ClientResult<()> {
        let current = self.state.read().await.find(id).map(|r| r.status());
        match current {
            Some(status) if !status.can_transition_to(next) => {
                let err = ClientError::Validation(format!(
                    "Cannot change status from {} to {}",
                    status.label(),
                    next.label()
                ));
                self.fail(&err, op).await;
                Err(err)
            }
            _ => Ok(()),
        }
    }
}

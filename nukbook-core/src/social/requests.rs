//! Pending follow requests

use crate::client::ApiClient;
use crate::error::{NukbookError, Result};
use crate::optimistic::{OptimisticList, Snapshot};
use crate::types::{FollowRequest, Id};

pub struct FollowRequests {
    client: ApiClient,
    requests: OptimisticList<FollowRequest>,
    status: Option<String>,
}

impl FollowRequests {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            requests: OptimisticList::default(),
            status: None,
        }
    }

    pub fn items(&self) -> &[FollowRequest] {
        self.requests.items()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub async fn load(&mut self) -> Result<()> {
        self.status = None;
        if !self.client.tokens().is_logged_in().await {
            self.status = Some("Not logged in.".to_string());
            return Err(NukbookError::MissingToken);
        }
        match self.client.follow_requests().await {
            Ok(requests) => {
                self.requests.replace_all(requests);
                Ok(())
            }
            Err(e) => {
                self.status = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn approve(&mut self, request_id: Id) -> Result<()> {
        let snapshot = self.requests.remove(request_id);
        let result = self.client.approve_request(request_id).await.map(|_| ());
        self.settle(request_id, snapshot, result)
    }

    pub async fn deny(&mut self, request_id: Id) -> Result<()> {
        let snapshot = self.requests.remove(request_id);
        let result = self.client.deny_request(request_id).await;
        self.settle(request_id, snapshot, result)
    }

    fn settle(
        &mut self,
        request_id: Id,
        snapshot: Snapshot<FollowRequest>,
        result: Result<()>,
    ) -> Result<()> {
        if let Err(e) = &result {
            tracing::warn!(request_id, "Follow request answer failed: {}", e);
            self.requests.restore(snapshot);
            self.status = Some(e.to_string());
        }
        result
    }
}

use crate::advisor::Decision;
use crate::error::Result;
use crate::models::{
    AdvisorRequest, AdvisorRequestDetails, NewAdvisorRequest, NewProperty, Profile, Property,
    PropertyListing, PropertyUpdate,
};
use crate::store::types::{AuthIdentity, PropertyQuery, RequestQuery};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Hosted record store holding profiles, properties and advisor requests.
///
/// Selects return rows newest first by `created_at`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert_profile(&self, profile: Profile) -> Result<Profile>;

    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>>;

    async fn insert_property(&self, property: NewProperty, owner_id: &str) -> Result<Property>;

    async fn get_property(&self, id: &str) -> Result<Option<Property>>;

    /// Properties matching `query`, each joined with its owner's name and avatar
    async fn select_properties(&self, query: &PropertyQuery) -> Result<Vec<PropertyListing>>;

    async fn update_property(&self, id: &str, update: &PropertyUpdate) -> Result<Property>;

    async fn delete_property(&self, id: &str) -> Result<()>;

    /// Insert a request; status is forced to pending
    async fn insert_advisor_request(
        &self,
        request: NewAdvisorRequest,
        requester_id: &str,
    ) -> Result<AdvisorRequest>;

    async fn select_advisor_requests(&self, query: &RequestQuery) -> Result<Vec<AdvisorRequest>>;

    /// Requests joined with their property and requester profile
    async fn select_advisor_request_details(
        &self,
        query: &RequestQuery,
    ) -> Result<Vec<AdvisorRequestDetails>>;

    /// Record a decision only if the request is still pending.
    ///
    /// Must behave as one conditional update (`WHERE status = 'pending'`):
    /// a request that was already decided fails with `PreconditionFailed`
    /// and keeps its first decision.
    async fn decide_advisor_request(
        &self,
        id: &str,
        decision: &Decision,
        at: DateTime<Utc>,
    ) -> Result<AdvisorRequest>;

    /// Get the name of the backend
    fn backend_name(&self) -> &'static str;
}

/// Public-bucket blob storage for listing images
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `bytes` at `path` and return a publicly resolvable URI
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<String>;

    async fn remove(&self, path: &str) -> Result<()>;
}

/// Hosted email/password authentication
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthIdentity>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthIdentity>;

    async fn sign_out(&self) -> Result<()>;

    /// The signed-in identity, or `None` when there is no session
    async fn current_user(&self) -> Result<Option<AuthIdentity>>;
}

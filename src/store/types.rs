use crate::models::{AdvisorRequest, Property, RequestStatus};
use serde::{Deserialize, Serialize};

/// Identity returned by the auth provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthIdentity {
    pub id: String,
    pub email: String,
}

/// Exact-match filters for property selects
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PropertyQuery {
    /// Only listings owned by this user
    pub owner_id: Option<String>,
}

impl PropertyQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn owned_by(user_id: &str) -> Self {
        Self {
            owner_id: Some(user_id.to_string()),
        }
    }

    pub fn matches(&self, property: &Property) -> bool {
        self.owner_id
            .as_deref()
            .map_or(true, |owner| property.user_id == owner)
    }
}

/// Exact-match filters for advisor request selects
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RequestQuery {
    /// Only requests made by this user
    pub requester_id: Option<String>,
    /// Only requests about this property
    pub property_id: Option<String>,
    /// Only requests in this status
    pub status: Option<RequestStatus>,
}

impl RequestQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_requester(user_id: &str) -> Self {
        Self {
            requester_id: Some(user_id.to_string()),
            ..Default::default()
        }
    }

    pub fn for_property(mut self, property_id: &str) -> Self {
        self.property_id = Some(property_id.to_string());
        self
    }

    pub fn with_status(mut self, status: RequestStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, request: &AdvisorRequest) -> bool {
        self.requester_id
            .as_deref()
            .map_or(true, |id| request.user_id == id)
            && self
                .property_id
                .as_deref()
                .map_or(true, |id| request.property_id == id)
            && self.status.map_or(true, |status| request.status == status)
    }
}

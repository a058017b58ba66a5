use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Investment strategy a listing is offered for
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DealType {
    #[default]
    #[serde(rename = "Fix & Flip", alias = "Fix&Flip")]
    FixAndFlip,
    #[serde(rename = "BRRRR")]
    Brrrr,
    #[serde(rename = "Both")]
    Both,
}

impl DealType {
    pub fn label(&self) -> &'static str {
        match self {
            DealType::FixAndFlip => "Fix & Flip",
            DealType::Brrrr => "BRRRR",
            DealType::Both => "Both",
        }
    }
}

impl fmt::Display for DealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A listed asset, owned by the user who created it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Property {
    pub id: String,
    pub title: String,
    pub address: String,
    pub price: f64,
    pub deal_type: DealType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub user_id: String,
}

/// Submission for a new listing. The owner is taken from the session, never from here.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NewProperty {
    pub title: String,
    pub address: String,
    pub price: f64,
    pub deal_type: DealType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Owner edit of an existing listing; `None` leaves the field untouched
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PropertyUpdate {
    pub title: Option<String>,
    pub address: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
}

impl PropertyUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.address.is_none()
            && self.price.is_none()
            && self.description.is_none()
            && self.images.is_none()
    }

    pub(crate) fn apply_to(&self, property: &mut Property) {
        if let Some(title) = &self.title {
            property.title = title.clone();
        }
        if let Some(address) = &self.address {
            property.address = address.clone();
        }
        if let Some(price) = self.price {
            property.price = price;
        }
        if let Some(description) = &self.description {
            property.description = description.clone();
        }
        if let Some(images) = &self.images {
            property.images = images.clone();
        }
    }
}

/// Owner display data joined onto a listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OwnerSummary {
    pub name: String,
    pub avatar_url: Option<String>,
}

/// A property as returned by a listing query, with its owner joined in
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyListing {
    #[serde(flatten)]
    pub property: Property,
    pub profiles: Option<OwnerSummary>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// Stored account row. `role` is written once at provisioning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub role: Role,
}

/// An authenticated actor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub role: Role,
}

impl From<Profile> for User {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            name: profile.name,
            email: profile.email,
            avatar: profile.avatar_url,
            role: profile.role,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }

    /// Badge text shown next to a request
    pub fn label(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Approved => "Approved",
            RequestStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A request for human review of a property
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdvisorRequest {
    pub id: String,
    pub property_id: String,
    pub user_id: String,
    pub status: RequestStatus,
    #[serde(default)]
    pub message: String,
    pub response: Option<String>,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
    pub advisor_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NewAdvisorRequest {
    pub property_id: String,
    #[serde(default)]
    pub message: String,
}

/// Review queue entry: a request with its property and requester joined in
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdvisorRequestDetails {
    #[serde(flatten)]
    pub request: AdvisorRequest,
    pub properties: Option<Property>,
    pub profiles: Option<Profile>,
}

impl AdvisorRequestDetails {
    pub fn property_title(&self) -> &str {
        self.properties
            .as_ref()
            .map(|p| p.title.as_str())
            .unwrap_or("Property Details Unavailable")
    }

    pub fn requester_name(&self) -> &str {
        self.profiles
            .as_ref()
            .map(|p| p.name.as_str())
            .unwrap_or("Unknown User")
    }
}

/// A file picked for upload as a listing image
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

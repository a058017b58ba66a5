//! In-process backends for local runs and tests

use crate::advisor::{self, Decision};
use crate::error::{MarketError, Result};
use crate::models::{
    AdvisorRequest, AdvisorRequestDetails, NewAdvisorRequest, NewProperty, OwnerSummary, Profile,
    Property, PropertyListing, PropertyUpdate,
};
use crate::store::traits::{AuthProvider, ObjectStorage, RecordStore};
use crate::store::types::{AuthIdentity, PropertyQuery, RequestQuery};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Newest first; among equal timestamps the later insert comes first
fn newest_first<T, F>(rows: Vec<T>, created_at: F) -> Vec<T>
where
    F: Fn(&T) -> DateTime<Utc>,
{
    let mut rows: Vec<T> = rows.into_iter().rev().collect();
    rows.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    rows
}

/// Record store kept in memory
#[derive(Default)]
pub struct MemoryStore {
    profiles: Mutex<HashMap<String, Profile>>,
    properties: Mutex<Vec<Property>>,
    requests: Mutex<Vec<AdvisorRequest>>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail as if the backend were unreachable
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(MarketError::backend("record store unreachable"));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert_profile(&self, profile: Profile) -> Result<Profile> {
        self.check_online()?;
        let mut profiles = self.profiles.lock().await;
        if profiles.contains_key(&profile.id) {
            return Err(MarketError::Conflict(format!(
                "profile {} already exists",
                profile.id
            )));
        }
        profiles.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        self.check_online()?;
        Ok(self.profiles.lock().await.get(user_id).cloned())
    }

    async fn insert_property(&self, property: NewProperty, owner_id: &str) -> Result<Property> {
        self.check_online()?;
        let row = Property {
            id: new_id(),
            title: property.title,
            address: property.address,
            price: property.price,
            deal_type: property.deal_type,
            description: property.description,
            images: property.images,
            created_at: Utc::now(),
            user_id: owner_id.to_string(),
        };
        self.properties.lock().await.push(row.clone());
        debug!(id = %row.id, owner = owner_id, "Inserted property");
        Ok(row)
    }

    async fn get_property(&self, id: &str) -> Result<Option<Property>> {
        self.check_online()?;
        Ok(self
            .properties
            .lock()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn select_properties(&self, query: &PropertyQuery) -> Result<Vec<PropertyListing>> {
        self.check_online()?;
        let matching: Vec<Property> = self
            .properties
            .lock()
            .await
            .iter()
            .filter(|p| query.matches(p))
            .cloned()
            .collect();

        let profiles = self.profiles.lock().await;
        let listings = newest_first(matching, |p| p.created_at)
            .into_iter()
            .map(|property| {
                let owner = profiles.get(&property.user_id).map(|profile| OwnerSummary {
                    name: profile.name.clone(),
                    avatar_url: profile.avatar_url.clone(),
                });
                PropertyListing {
                    property,
                    profiles: owner,
                }
            })
            .collect();
        Ok(listings)
    }

    async fn update_property(&self, id: &str, update: &PropertyUpdate) -> Result<Property> {
        self.check_online()?;
        let mut properties = self.properties.lock().await;
        let property = properties
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| MarketError::not_found(format!("property {}", id)))?;
        update.apply_to(property);
        Ok(property.clone())
    }

    async fn delete_property(&self, id: &str) -> Result<()> {
        self.check_online()?;
        let mut properties = self.properties.lock().await;
        let before = properties.len();
        properties.retain(|p| p.id != id);
        if properties.len() == before {
            return Err(MarketError::not_found(format!("property {}", id)));
        }
        Ok(())
    }

    async fn insert_advisor_request(
        &self,
        request: NewAdvisorRequest,
        requester_id: &str,
    ) -> Result<AdvisorRequest> {
        self.check_online()?;
        let row = advisor::open_request(new_id(), request, requester_id, Utc::now());
        self.requests.lock().await.push(row.clone());
        debug!(id = %row.id, property_id = %row.property_id, "Inserted advisor request");
        Ok(row)
    }

    async fn select_advisor_requests(&self, query: &RequestQuery) -> Result<Vec<AdvisorRequest>> {
        self.check_online()?;
        let matching: Vec<AdvisorRequest> = self
            .requests
            .lock()
            .await
            .iter()
            .filter(|r| query.matches(r))
            .cloned()
            .collect();
        Ok(newest_first(matching, |r| r.created_at))
    }

    async fn select_advisor_request_details(
        &self,
        query: &RequestQuery,
    ) -> Result<Vec<AdvisorRequestDetails>> {
        let requests = self.select_advisor_requests(query).await?;
        let properties = self.properties.lock().await;
        let profiles = self.profiles.lock().await;

        Ok(requests
            .into_iter()
            .map(|request| AdvisorRequestDetails {
                properties: properties
                    .iter()
                    .find(|p| p.id == request.property_id)
                    .cloned(),
                profiles: profiles.get(&request.user_id).cloned(),
                request,
            })
            .collect())
    }

    async fn decide_advisor_request(
        &self,
        id: &str,
        decision: &Decision,
        at: DateTime<Utc>,
    ) -> Result<AdvisorRequest> {
        self.check_online()?;
        // Check and write under one lock so only one decision can land
        let mut requests = self.requests.lock().await;
        let request = requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| MarketError::not_found(format!("advisor request {}", id)))?;
        advisor::decide(request, decision, at)?;
        debug_assert!(advisor::lifecycle::is_consistent(request));
        Ok(request.clone())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

/// Object storage kept in memory, serving URIs under `base_url`
pub struct MemoryStorage {
    base_url: String,
    objects: Mutex<HashMap<String, (String, Vec<u8>)>>,
}

impl MemoryStorage {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            objects: Mutex::new(HashMap::new()),
        }
    }

    pub async fn contains(&self, path: &str) -> bool {
        self.objects.lock().await.contains_key(path)
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<String> {
        let mut objects = self.objects.lock().await;
        if objects.contains_key(path) {
            return Err(MarketError::storage(format!("{} already exists", path)));
        }
        objects.insert(path.to_string(), (content_type.to_string(), bytes));
        Ok(format!("{}/{}", self.base_url, path))
    }

    async fn remove(&self, path: &str) -> Result<()> {
        self.objects
            .lock()
            .await
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| MarketError::storage(format!("{} does not exist", path)))
    }
}

struct Account {
    identity: AuthIdentity,
    password: String,
}

/// Auth provider kept in memory. One signed-in identity at a time, like a browser session.
#[derive(Default)]
pub struct MemoryAuth {
    accounts: Mutex<HashMap<String, Account>>,
    current: Mutex<Option<AuthIdentity>>,
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthProvider for MemoryAuth {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthIdentity> {
        let key = email.trim().to_lowercase();
        let mut accounts = self.accounts.lock().await;
        if accounts.contains_key(&key) {
            return Err(MarketError::auth("email already registered"));
        }
        let identity = AuthIdentity {
            id: new_id(),
            email: email.trim().to_string(),
        };
        accounts.insert(
            key,
            Account {
                identity: identity.clone(),
                password: password.to_string(),
            },
        );
        *self.current.lock().await = Some(identity.clone());
        Ok(identity)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthIdentity> {
        let key = email.trim().to_lowercase();
        let accounts = self.accounts.lock().await;
        let account = accounts
            .get(&key)
            .filter(|a| a.password == password)
            .ok_or_else(|| MarketError::auth("invalid email or password"))?;
        *self.current.lock().await = Some(account.identity.clone());
        Ok(account.identity.clone())
    }

    async fn sign_out(&self) -> Result<()> {
        *self.current.lock().await = None;
        Ok(())
    }

    async fn current_user(&self) -> Result<Option<AuthIdentity>> {
        Ok(self.current.lock().await.clone())
    }
}

//! Marketplace operations composed over the hosted backend boundaries

use crate::advisor::{self, Decision, Verdict};
use crate::analysis::{DealAnalysisInput, DealAnalyzer, DealMetrics, LocalAnalyzer, RemoteAnalyzer};
use crate::config::Config;
use crate::error::{MarketError, Result};
use crate::filter::filter_properties;
use crate::models::{
    AdvisorRequest, AdvisorRequestDetails, ImageUpload, NewAdvisorRequest, NewProperty, Profile,
    Property, PropertyListing, PropertyUpdate, RequestStatus,
};
use crate::session::{fallback_name, RolePolicy, Session};
use crate::store::{AuthIdentity, AuthProvider, ObjectStorage, PropertyQuery, RecordStore, RequestQuery};
use crate::validation;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct Marketplace {
    store: Arc<dyn RecordStore>,
    storage: Arc<dyn ObjectStorage>,
    auth: Arc<dyn AuthProvider>,
    analyzer: Arc<dyn DealAnalyzer>,
    roles: RolePolicy,
    image_folder: String,
}

impl Marketplace {
    /// Create a marketplace; deals go to the ROI endpoint when one is configured
    pub fn new(
        config: &Config,
        store: Arc<dyn RecordStore>,
        storage: Arc<dyn ObjectStorage>,
        auth: Arc<dyn AuthProvider>,
    ) -> Result<Self> {
        let analyzer: Arc<dyn DealAnalyzer> = match &config.roi_endpoint {
            Some(endpoint) => Arc::new(RemoteAnalyzer::new(endpoint, config.request_timeout)?),
            None => Arc::new(LocalAnalyzer::new()),
        };

        info!(
            backend = store.backend_name(),
            analyzer = analyzer.engine_name(),
            "Marketplace ready"
        );

        Ok(Self {
            store,
            storage,
            auth,
            analyzer,
            roles: RolePolicy::new(&config.admin_emails),
            image_folder: config.image_folder.clone(),
        })
    }

    pub fn analyzer_name(&self) -> &'static str {
        self.analyzer.engine_name()
    }

    // --- accounts ---

    /// Create an account and its profile. The role is decided here, once.
    pub async fn sign_up(&self, email: &str, password: &str, name: &str) -> Result<Session> {
        if email.trim().is_empty() {
            return Err(validation_missing("email"));
        }
        if password.is_empty() {
            return Err(validation_missing("password"));
        }

        let identity = self.auth.sign_up(email, password).await?;
        let profile = self.provision_profile(&identity, name).await?;
        info!(user_id = %profile.id, role = ?profile.role, "Account created");
        Ok(Session::from_profile(profile))
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let identity = self.auth.sign_in(email, password).await?;
        let session = Session::from_profile(self.profile_for(&identity).await?);
        info!(user_id = %session.user.id, "Signed in");
        Ok(session)
    }

    pub async fn sign_out(&self) -> Result<()> {
        self.auth.sign_out().await
    }

    /// Session for whoever is signed in with the auth provider, if anyone
    pub async fn check_session(&self) -> Result<Option<Session>> {
        let identity = match self.auth.current_user().await? {
            Some(identity) => identity,
            None => return Ok(None),
        };
        let profile = self.profile_for(&identity).await?;
        Ok(Some(Session::from_profile(profile)))
    }

    /// Stored profile for an identity. An account whose profile was never
    /// written (the store failed during sign-up) gets one now.
    async fn profile_for(&self, identity: &AuthIdentity) -> Result<Profile> {
        match self.store.get_profile(&identity.id).await? {
            Some(profile) => Ok(profile),
            None => {
                warn!(user_id = %identity.id, "Account has no profile, creating it");
                self.provision_profile(identity, "").await
            }
        }
    }

    async fn provision_profile(&self, identity: &AuthIdentity, name: &str) -> Result<Profile> {
        let name = if name.trim().is_empty() {
            fallback_name(&identity.email)
        } else {
            name.trim().to_string()
        };
        let profile = Profile {
            id: identity.id.clone(),
            name,
            email: identity.email.clone(),
            avatar_url: None,
            role: self.roles.role_for(&identity.email),
        };

        match self.store.insert_profile(profile).await {
            Ok(profile) => Ok(profile),
            // written concurrently by another session for the same account
            Err(MarketError::Conflict(_)) => self
                .store
                .get_profile(&identity.id)
                .await?
                .ok_or_else(|| MarketError::not_found(format!("profile {}", identity.id))),
            Err(e) => Err(e),
        }
    }

    // --- properties ---

    pub async fn add_property(&self, session: &Session, property: NewProperty) -> Result<Property> {
        validation::validate_new_property(&property)?;
        let created = self.store.insert_property(property, session.user_id()).await?;
        info!(id = %created.id, owner = %created.user_id, "Property added");
        Ok(created)
    }

    pub async fn update_property(
        &self,
        session: &Session,
        id: &str,
        update: PropertyUpdate,
    ) -> Result<Property> {
        validation::validate_property_update(&update)?;
        self.owned_property(session, id).await?;
        let updated = self.store.update_property(id, &update).await?;
        info!(id, "Property updated");
        Ok(updated)
    }

    pub async fn delete_property(&self, session: &Session, id: &str) -> Result<()> {
        self.owned_property(session, id).await?;
        self.store.delete_property(id).await?;
        info!(id, "Property deleted");
        Ok(())
    }

    /// The session user's listings, newest first
    pub async fn my_properties(&self, session: &Session) -> Result<Vec<PropertyListing>> {
        self.store
            .select_properties(&PropertyQuery::owned_by(session.user_id()))
            .await
    }

    /// Every listing on the marketplace, newest first
    pub async fn listings(&self) -> Result<Vec<PropertyListing>> {
        self.store.select_properties(&PropertyQuery::all()).await
    }

    pub async fn search_my_properties(
        &self,
        session: &Session,
        query: &str,
    ) -> Result<Vec<PropertyListing>> {
        let listings = self.my_properties(session).await?;
        let found = filter_properties(listings, query);
        debug!(query, found = found.len(), "Searched listings");
        Ok(found)
    }

    async fn owned_property(&self, session: &Session, id: &str) -> Result<Property> {
        let property = self
            .store
            .get_property(id)
            .await?
            .ok_or_else(|| MarketError::not_found(format!("property {}", id)))?;

        if property.user_id != session.user_id() {
            warn!(id, user_id = session.user_id(), "Rejected change to another user's property");
            return Err(MarketError::forbidden(format!(
                "property {} belongs to another user",
                id
            )));
        }
        Ok(property)
    }

    // --- images ---

    /// Store a listing image and return its public URI.
    ///
    /// Images land under `<folder>/<user id>/`, so the path records who may
    /// remove them.
    pub async fn upload_image(&self, session: &Session, upload: ImageUpload) -> Result<String> {
        let extension = validation::validate_image(&upload)?;
        let path = format!("{}{}.{}", self.image_prefix(session), Uuid::new_v4(), extension);

        let url = self
            .storage
            .upload(&path, upload.bytes, &upload.content_type)
            .await?;
        info!(user_id = session.user_id(), path = %path, "Image uploaded");
        Ok(url)
    }

    /// Remove an image the session user uploaded
    pub async fn remove_image(&self, session: &Session, path: &str) -> Result<()> {
        let file = path
            .strip_prefix(&self.image_prefix(session))
            .filter(|file| !file.is_empty() && !file.contains('/') && !file.starts_with('.'));
        if file.is_none() {
            warn!(user_id = session.user_id(), path, "Rejected removal of another user's image");
            return Err(MarketError::forbidden(format!(
                "{} is not one of your listing images",
                path
            )));
        }

        self.storage.remove(path).await?;
        info!(user_id = session.user_id(), path, "Image removed");
        Ok(())
    }

    fn image_prefix(&self, session: &Session) -> String {
        format!("{}/{}/", self.image_folder, session.user_id())
    }

    // --- deal analysis ---

    pub async fn analyze_deal(&self, input: &DealAnalysisInput) -> Result<DealMetrics> {
        input.validate()?;
        self.analyzer.analyze(input).await
    }

    // --- advisor requests ---

    /// Ask for advisor review of a property.
    ///
    /// A user may hold one pending request per property; once it is decided
    /// they can ask again.
    pub async fn request_advisor(
        &self,
        session: &Session,
        property_id: &str,
        message: &str,
    ) -> Result<AdvisorRequest> {
        if self.store.get_property(property_id).await?.is_none() {
            return Err(MarketError::not_found(format!("property {}", property_id)));
        }

        let open = self
            .store
            .select_advisor_requests(
                &RequestQuery::by_requester(session.user_id())
                    .for_property(property_id)
                    .with_status(RequestStatus::Pending),
            )
            .await?;
        if !open.is_empty() {
            return Err(MarketError::Conflict(format!(
                "a review of property {} is already pending",
                property_id
            )));
        }

        let request = self
            .store
            .insert_advisor_request(
                NewAdvisorRequest {
                    property_id: property_id.to_string(),
                    message: message.to_string(),
                },
                session.user_id(),
            )
            .await?;
        info!(id = %request.id, property_id, "Advisor review requested");
        Ok(request)
    }

    /// The session user's requests, newest first
    pub async fn my_advisor_requests(&self, session: &Session) -> Result<Vec<AdvisorRequest>> {
        self.store
            .select_advisor_requests(&RequestQuery::by_requester(session.user_id()))
            .await
    }

    /// The latest of the session user's requests about a property
    pub async fn advisor_request_for(
        &self,
        session: &Session,
        property_id: &str,
    ) -> Result<Option<AdvisorRequest>> {
        let requests = self.my_advisor_requests(session).await?;
        Ok(advisor::request_for_property(property_id, &requests).cloned())
    }

    /// All requests with their property and requester, for admins
    pub async fn review_queue(&self, session: &Session) -> Result<Vec<AdvisorRequestDetails>> {
        session.require_admin()?;
        self.store
            .select_advisor_request_details(&RequestQuery::all())
            .await
    }

    /// Approve or reject a pending request
    pub async fn respond_to_request(
        &self,
        session: &Session,
        request_id: &str,
        verdict: Verdict,
        response: &str,
    ) -> Result<AdvisorRequest> {
        session.require_admin()?;
        let decision = Decision::new(verdict, response.trim(), session.user_id());
        decision.validate()?;

        let decided = self
            .store
            .decide_advisor_request(request_id, &decision, Utc::now())
            .await
            .map_err(|e| {
                if let MarketError::PreconditionFailed(reason) = &e {
                    warn!(request_id, reason = %reason, "Advisor request already decided");
                }
                e
            })?;

        info!(request_id, status = %decided.status, advisor = session.user_id(), "Advisor request decided");
        Ok(decided)
    }
}

fn validation_missing(field: &'static str) -> MarketError {
    crate::error::ValidationError::MissingField(field).into()
}

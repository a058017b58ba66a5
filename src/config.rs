//! Runtime options for the marketplace

use std::time::Duration;

/// Configuration options for the marketplace service
#[derive(Debug, Clone)]
pub struct Config {
    /// ROI endpoint; when unset, deals are analyzed in-process
    pub roi_endpoint: Option<String>,

    /// Emails granted the admin role when their account is provisioned
    pub admin_emails: Vec<String>,

    /// Timeout for calls to the ROI endpoint
    pub request_timeout: Duration,

    /// Folder in the image bucket that listing images are stored under
    pub image_folder: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            roi_endpoint: None,
            admin_emails: Vec::new(),
            request_timeout: Duration::from_secs(30),
            image_folder: "properties".to_string(),
        }
    }
}

impl Config {
    pub fn with_roi_endpoint(mut self, value: Option<&str>) -> Self {
        self.roi_endpoint = value.map(str::to_string);
        self
    }

    /// Add one admin email
    pub fn with_admin_email(mut self, value: &str) -> Self {
        self.admin_emails.push(value.trim().to_string());
        self
    }

    pub fn with_admin_emails(mut self, values: Vec<String>) -> Self {
        self.admin_emails = values
            .into_iter()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect();
        self
    }

    pub fn with_request_timeout(mut self, value: Duration) -> Self {
        self.request_timeout = value;
        self
    }

    pub fn with_image_folder(mut self, value: &str) -> Self {
        self.image_folder = value.trim_matches('/').to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.roi_endpoint.is_none());
        assert!(config.admin_emails.is_empty());
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.image_folder, "properties");
    }

    #[test]
    fn test_builders_normalize_values() {
        let config = Config::default()
            .with_admin_emails(vec![" admin@investoriq.com ".to_string(), "".to_string()])
            .with_image_folder("/listings/")
            .with_roi_endpoint(Some("http://localhost:5000/api/analyze-property"));
        assert_eq!(config.admin_emails, vec!["admin@investoriq.com"]);
        assert_eq!(config.image_folder, "listings");
        assert!(config.roi_endpoint.is_some());
    }
}

//! Configuration for the Firestore accessor.

use std::time::Duration;

/// Connection settings for a Firestore project.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Google Cloud project id.
    pub project_id: String,
    /// Database id within the project; virtually always `(default)`.
    pub database_id: String,
    /// API endpoint. Overridable so tests can point at a local mock server.
    pub endpoint: String,
    /// Bound on each outbound request.
    pub timeout: Duration,
}

impl StoreConfig {
    /// Settings for a project with the default database and endpoint.
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            database_id: "(default)".to_string(),
            endpoint: "https://firestore.googleapis.com".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Create a new builder for store configuration.
    pub fn builder(project_id: impl Into<String>) -> StoreConfigBuilder {
        StoreConfigBuilder {
            project_id: project_id.into(),
            database_id: None,
            endpoint: None,
            timeout: None,
        }
    }

    /// Root URL of the documents resource:
    /// `{endpoint}/v1/projects/{project}/databases/{database}/documents`.
    pub fn documents_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/databases/{}/documents",
            self.endpoint, self.project_id, self.database_id
        )
    }
}

/// Builder for [`StoreConfig`].
#[derive(Debug)]
pub struct StoreConfigBuilder {
    project_id: String,
    database_id: Option<String>,
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl StoreConfigBuilder {
    /// Set the database id.
    pub fn database_id(mut self, database_id: impl Into<String>) -> Self {
        self.database_id = Some(database_id.into());
        self
    }

    /// Set the API endpoint (no trailing slash).
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the store configuration.
    pub fn build(self) -> StoreConfig {
        let defaults = StoreConfig::new(self.project_id.clone());
        StoreConfig {
            project_id: self.project_id,
            database_id: self.database_id.unwrap_or(defaults.database_id),
            endpoint: self.endpoint.unwrap_or(defaults.endpoint),
            timeout: self.timeout.unwrap_or(defaults.timeout),
        }
    }
}

//! Request construction and transport for the VK API.

use serde_json::Value;

use vkgraph_core::{Group, User};

use crate::decode;

/// Fixed API version token sent with every request.
pub const API_VERSION: &str = "5.199";

const DEFAULT_BASE_URL: &str = "https://api.vk.com/method";

/// Errors from gateway calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{method} returned an error envelope: {payload}")]
    RemoteApi { method: String, payload: Value },

    #[error("{method} returned an empty response where empty is not allowed")]
    EmptyResponse { method: String },

    #[error("{method} response had an unexpected shape: {detail}")]
    Decode { method: String, detail: String },
}

/// Connection settings for the API gateway.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub access_token: String,
}

impl ApiConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: access_token.into(),
        }
    }
}

/// Client for the VK HTTP API. Clone is cheap (inner connection pool).
#[derive(Clone)]
pub struct VkClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl VkClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Issue one API call and unwrap the response envelope.
    ///
    /// `allow_empty` distinguishes call sites where an empty `response`
    /// is a valid outcome (zero followers, no such user) from those where
    /// it must fail.
    async fn call(
        &self,
        method: &str,
        params: Vec<(&'static str, String)>,
        allow_empty: bool,
    ) -> Result<Value, ApiError> {
        let mut form: Vec<(&str, String)> = vec![
            ("access_token", self.config.access_token.clone()),
            ("v", API_VERSION.to_string()),
        ];
        form.extend(params);

        let url = format!("{}/{}", self.config.base_url, method);
        tracing::debug!(method, "API request");

        let response = self.http.post(&url).form(&form).send().await?;
        let data: Value = response.error_for_status()?.json().await?;

        decode::unwrap_envelope(method, data, allow_empty)
    }

    /// Fetch user records by ids, or the token owner's profile when `ids`
    /// is absent. Requests the optional `sex` and `city` fields.
    pub async fn get_users(&self, ids: Option<&[i64]>) -> Result<Option<Vec<User>>, ApiError> {
        let method = "users.get";
        let mut params = Vec::new();
        if let Some(ids) = ids {
            let joined = ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(",");
            params.push(("user_ids", joined));
        }
        params.push(("fields", "sex,city".to_string()));

        let response = self.call(method, params, true).await?;
        decode::users(method, response)
    }

    /// Fetch follower ids for a user, or for the token owner when absent.
    ///
    /// The API reports `count == 0` explicitly; that case decodes to
    /// `None` ("fetched successfully, zero followers") rather than an
    /// empty sequence.
    pub async fn get_followers(
        &self,
        user_id: Option<i64>,
    ) -> Result<Option<Vec<i64>>, ApiError> {
        let method = "users.getFollowers";
        let mut params = Vec::new();
        if let Some(id) = user_id {
            params.push(("user_id", id.to_string()));
        }

        let response = self.call(method, params, true).await?;
        decode::followers(method, response)
    }

    /// Fetch group records for a user (extended form), or for the token
    /// owner when absent.
    pub async fn get_groups(
        &self,
        user_id: Option<i64>,
    ) -> Result<Option<Vec<Group>>, ApiError> {
        let method = "groups.get";
        let mut params = Vec::new();
        if let Some(id) = user_id {
            params.push(("user_id", id.to_string()));
        }
        params.push(("extended", "1".to_string()));

        let response = self.call(method, params, true).await?;
        decode::groups(method, response)
    }
}

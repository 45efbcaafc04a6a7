use std::future::Future;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Cheatsheet, SheetData, SheetList};

/// Default location of the backend API
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000/api";

/// Failure of a backend call
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("backend responded with status {status}")]
    Status {
        status: u16,
        /// The `message` field of the error body, when there was one
        message: Option<String>,
    },

    /// A success response whose body did not match the contract
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// The human-readable message supplied by the backend, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } if !message.is_empty() => Some(message.as_str()),
            _ => None,
        }
    }
}

/// The five operations the front end needs from the backend
///
/// Every call goes to the backend; implementations do not cache or retry.
pub trait SheetApi: Send + Sync {
    /// List the names of all cheatsheets
    fn list_all(&self) -> impl Future<Output = Result<SheetList, ApiError>> + Send;

    /// Fetch one cheatsheet by name
    fn get(&self, name: &str) -> impl Future<Output = Result<Cheatsheet, ApiError>> + Send;

    /// Create a cheatsheet under a new name
    fn create(
        &self,
        name: &str,
        data: &SheetData,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Replace the content of an existing cheatsheet; the name never changes
    fn update(
        &self,
        name: &str,
        data: &SheetData,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Delete a cheatsheet
    fn delete(&self, name: &str) -> impl Future<Output = Result<(), ApiError>> + Send;
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Serialize)]
struct UpdateBody<'a> {
    data: &'a SheetData,
}

/// `SheetApi` over HTTP
#[derive(Debug, Clone)]
pub struct HttpSheetApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSheetApi {
    /// Create a client for the API mounted at `base_url`
    ///
    /// # Arguments
    /// * `base_url` - Root of the API, e.g. `http://127.0.0.1:5000/api`
    ///
    /// # Examples
    /// ```
    /// use cheatsheeter::api::HttpSheetApi;
    ///
    /// let api = HttpSheetApi::new("http://localhost:5000/api/");
    /// assert_eq!(api.base_url(), "http://localhost:5000/api");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn list_url(&self) -> String {
        format!("{}/cheatsheets", self.base_url)
    }

    fn sheet_url(&self, name: &str) -> String {
        format!("{}/cheatsheets/{}", self.base_url, urlencoding::encode(name))
    }

    /// Turn a non-success response into `ApiError::Status`, otherwise read the body
    async fn read_body(response: reqwest::Response) -> Result<Vec<u8>, ApiError> {
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|body| body.message);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body.to_vec())
    }
}

impl SheetApi for HttpSheetApi {
    async fn list_all(&self) -> Result<SheetList, ApiError> {
        let url = self.list_url();
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        let body = Self::read_body(response).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn get(&self, name: &str) -> Result<Cheatsheet, ApiError> {
        let url = self.sheet_url(name);
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        let body = Self::read_body(response).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn create(&self, name: &str, data: &SheetData) -> Result<(), ApiError> {
        let url = self.sheet_url(name);
        debug!("POST {}", url);
        let response = self.client.post(&url).json(data).send().await?;
        Self::read_body(response).await?;
        Ok(())
    }

    async fn update(&self, name: &str, data: &SheetData) -> Result<(), ApiError> {
        let url = self.sheet_url(name);
        debug!("PUT {}", url);
        let response = self
            .client
            .put(&url)
            .json(&UpdateBody { data })
            .send()
            .await?;
        Self::read_body(response).await?;
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<(), ApiError> {
        let url = self.sheet_url(name);
        debug!("DELETE {}", url);
        let response = self.client.delete(&url).send().await?;
        Self::read_body(response).await?;
        Ok(())
    }
}

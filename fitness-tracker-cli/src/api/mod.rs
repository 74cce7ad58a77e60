use anyhow::{Context, Result};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ApiConfig;
use crate::models::{Resource, User, UserStatistics};

mod error;

pub use error::ApiError;

/// Login request payload
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Signup request payload
#[derive(Debug, Serialize)]
pub struct SignupRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Response of both credential endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

/// API client for communicating with the fitness tracker backend.
///
/// Every call is a single request: no retries and no caching. Cloning is
/// cheap and shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Attach (or detach) the bearer credential used by later requests
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token.filter(|t| !t.is_empty());
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("{} {}", method, url);

        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(response.json::<T>().await?)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, error_text))
        }
    }

    /// Authenticated GET
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.request(Method::GET, path)).await
    }

    /// Authenticated POST with a JSON body
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    /// Authenticated PUT with a JSON body
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::PUT, path).json(body)).await
    }

    /// Authenticated DELETE; any response body is ignored
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = self.request(Method::DELETE, path).send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, error_text))
        }
    }

    async fn authenticate<B: Serialize>(&self, path: &str, body: &B) -> Result<AuthResponse, ApiError> {
        let response = self.request(Method::POST, path).json(body).send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(response.json::<AuthResponse>().await?)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(ApiError::from_auth_status(status, error_text))
        }
    }

    /// `POST /auth/login`
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        tracing::debug!("Logging in as {}", email);
        self.authenticate("/auth/login", &LoginRequest { email, password })
            .await
    }

    /// `POST /auth/signup`
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ApiError> {
        tracing::debug!("Signing up {}", email);
        self.authenticate(
            "/auth/signup",
            &SignupRequest {
                name,
                email,
                password,
            },
        )
        .await
    }

    /// Fetch a whole collection
    pub async fn list<R: Resource>(&self) -> Result<Vec<R>, ApiError> {
        self.get(R::PATH).await
    }

    pub async fn create<R: Resource>(&self, payload: &R::Payload) -> Result<R, ApiError> {
        self.post(R::PATH, payload).await
    }

    pub async fn update<R: Resource>(&self, id: &str, payload: &R::Payload) -> Result<R, ApiError> {
        self.put(&item_path::<R>(id), payload).await
    }

    pub async fn remove<R: Resource>(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&item_path::<R>(id)).await
    }

    /// `GET /admin/statistics`
    pub async fn admin_statistics(&self) -> Result<Vec<UserStatistics>, ApiError> {
        self.get("/admin/statistics").await
    }
}

fn item_path<R: Resource>(id: &str) -> String {
    format!("{}/{}", R::PATH, urlencoding::encode(id))
}

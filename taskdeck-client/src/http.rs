/// HTTP client for the Taskdeck API
///
/// One method per route. The underlying reqwest client runs with a cookie
/// store, so the session cookie set by `login` rides along on every
/// subsequent request without the caller touching it. The bearer-header
/// transport exists server-side as a fallback; this client only uses the
/// cookie.

use crate::error::{error_from_response, ClientError};
use serde::{Deserialize, Serialize};
use taskdeck_shared::models::{
    task::{Task, TaskStatus},
    user::UserProfile,
};
use uuid::Uuid;

/// Typed client over the Taskdeck REST API
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

/// Envelope for routes answering `{ "user": ... }`
#[derive(Debug, Deserialize)]
struct UserEnvelope {
    user: UserProfile,
}

/// Envelope for the list route's `{ "tasks": [...] }`
#[derive(Debug, Deserialize)]
struct TasksEnvelope {
    tasks: Vec<Task>,
}

#[derive(Debug, Serialize)]
struct RegisterBody<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateTaskBody<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

/// Partial update for a task; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskPatch {
    /// New title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// New description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// New status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl ApiClient {
    /// Creates a client against the given base URL
    ///
    /// The base URL should not end with a slash, e.g.
    /// `http://localhost:8080`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Checks a response and deserializes its body on success
    async fn parse<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(response.json::<T>().await?)
    }

    /// Checks a response, discarding the body on success
    async fn check(response: reqwest::Response) -> Result<(), ClientError> {
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(())
    }

    /// Registers a new account; does not log in
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, ClientError> {
        let response = self
            .http
            .post(self.url("/auth/register"))
            .json(&RegisterBody {
                username,
                email,
                password,
            })
            .send()
            .await?;

        Ok(Self::parse::<UserEnvelope>(response).await?.user)
    }

    /// Logs in; the session cookie lands in the cookie store
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, ClientError> {
        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(&LoginBody { email, password })
            .send()
            .await?;

        Ok(Self::parse::<UserEnvelope>(response).await?.user)
    }

    /// Logs out, clearing the server-set session cookie
    pub async fn logout(&self) -> Result<(), ClientError> {
        let response = self.http.post(self.url("/auth/logout")).send().await?;

        Self::check(response).await
    }

    /// Resolves the current session to a user
    pub async fn me(&self) -> Result<UserProfile, ClientError> {
        let response = self.http.get(self.url("/auth/me")).send().await?;

        Ok(Self::parse::<UserEnvelope>(response).await?.user)
    }

    /// Lists the caller's tasks, newest-created first
    pub async fn list_tasks(&self) -> Result<Vec<Task>, ClientError> {
        let response = self.http.get(self.url("/tasks")).send().await?;

        Ok(Self::parse::<TasksEnvelope>(response).await?.tasks)
    }

    /// Fetches one task
    pub async fn get_task(&self, id: Uuid) -> Result<Task, ClientError> {
        let response = self
            .http
            .get(self.url(&format!("/tasks/{}", id)))
            .send()
            .await?;

        Self::parse(response).await
    }

    /// Creates a task
    pub async fn create_task(
        &self,
        title: &str,
        description: Option<&str>,
    ) -> Result<Task, ClientError> {
        let response = self
            .http
            .post(self.url("/tasks"))
            .json(&CreateTaskBody { title, description })
            .send()
            .await?;

        Self::parse(response).await
    }

    /// Applies a partial update to a task
    pub async fn update_task(&self, id: Uuid, patch: TaskPatch) -> Result<Task, ClientError> {
        let response = self
            .http
            .put(self.url(&format!("/tasks/{}", id)))
            .json(&patch)
            .send()
            .await?;

        Self::parse(response).await
    }

    /// Deletes a task
    pub async fn delete_task(&self, id: Uuid) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url(&format!("/tasks/{}", id)))
            .send()
            .await?;

        Self::check(response).await
    }

    /// Flips a task between pending and completed
    pub async fn toggle_task(&self, id: Uuid) -> Result<Task, ClientError> {
        let response = self
            .http
            .patch(self.url(&format!("/tasks/{}/toggle", id)))
            .send()
            .await?;

        Self::parse(response).await
    }
}

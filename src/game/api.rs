use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::game::{Course, CreateCourseRequest};

/// Default backend base URL.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server responded with status {0}")]
    Status(StatusCode),
}

/// Thin REST client for the course backend. One attempt per call, no
/// retries; a non-success status surfaces as `ApiError::Status`.
#[derive(Clone)]
pub struct CourseApi {
    client: Client,
    base_url: String,
}

impl CourseApi {
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create client from the `QUEST_API_BASE_URL` environment variable,
    /// falling back to the default if not set.
    pub fn from_env() -> Self {
        let base_url = std::env::var("QUEST_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        Self::new(&base_url)
    }

    pub async fn get_all_courses(&self) -> Result<Vec<Course>, ApiError> {
        self.get("/courses").await
    }

    pub async fn get_course_by_id(&self, id: u64) -> Result<Course, ApiError> {
        self.get(&format!("/courses/{}", id)).await
    }

    pub async fn create_course(&self, course: &CreateCourseRequest) -> Result<Course, ApiError> {
        self.post("/courses", course).await
    }

    pub async fn update_course(&self, id: u64, patch: &Value) -> Result<Course, ApiError> {
        self.put(&format!("/courses/{}", id), Some(patch)).await
    }

    pub async fn delete_course(&self, id: u64) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url(&format!("/courses/{}", id)))
            .send()
            .await?;
        Self::check(response)?;
        Ok(())
    }

    pub async fn toggle_course_active(&self, id: u64) -> Result<Course, ApiError> {
        self.put(&format!("/courses/{}/toggle", id), None).await
    }

    /// Kicks off quest generation for a course. The backend answers with an
    /// opaque acknowledgement; the quests themselves appear later,
    /// out-of-band.
    pub async fn generate_quests(&self, id: u64) -> Result<Value, ApiError> {
        self.post(&format!("/courses/{}/generate-quests", id), &serde_json::json!({}))
            .await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn check(response: Response) -> Result<Response, ApiError> {
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }
        Ok(response)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.client.get(self.url(path)).send().await?;
        let body = Self::check(response)?.json().await?;
        Ok(body)
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        let body = Self::check(response)?.json().await?;
        Ok(body)
    }

    async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T, ApiError> {
        let mut request = self.client.put(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        let body = Self::check(response)?.json().await?;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let api = CourseApi::new("http://localhost:8080/api/");
        assert_eq!(api.url("/courses"), "http://localhost:8080/api/courses");
        assert_eq!(
            api.url("/courses/3/toggle"),
            "http://localhost:8080/api/courses/3/toggle"
        );
    }
}

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::info;

use super::messages::*;
use super::BackendApi;
use crate::config::BackendConfig;

/// REST client for the product backend.
///
/// All endpoints speak JSON. When an API key is configured it is sent as a
/// bearer token on every request.
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpBackend {
    pub fn new(cfg: &BackendConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()
            .context("Failed to build backend HTTP client")?;

        info!("Backend client targeting {}", cfg.base_url);

        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send_checked(&self, req: reqwest::RequestBuilder, path: &str) -> Result<reqwest::Response> {
        let req = req.header("x-request-id", uuid::Uuid::new_v4().to_string());
        let req = match &self.api_key {
            Some(key) => req.bearer_auth(key),
            None => req,
        };

        let resp = req
            .send()
            .await
            .with_context(|| format!("Failed to reach backend at {}", path))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            // Prefer the backend's error envelope over a raw body dump
            let message = serde_json::from_str::<serde_json::Value>(&detail)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
                .unwrap_or_else(|| detail.chars().take(200).collect());
            anyhow::bail!("Backend returned {} for {}: {}", status, path, message);
        }

        Ok(resp)
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let resp = self
            .send_checked(self.http.post(self.url(path)).json(body), path)
            .await?;

        resp.json::<T>()
            .await
            .with_context(|| format!("Failed to parse backend response from {}", path))
    }

    async fn post_ack<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        self.send_checked(self.http.post(self.url(path)).json(body), path)
            .await?;
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self.send_checked(self.http.get(self.url(path)), path).await?;

        resp.json::<T>()
            .await
            .with_context(|| format!("Failed to parse backend response from {}", path))
    }
}

#[async_trait::async_trait]
impl BackendApi for HttpBackend {
    async fn register_call(&self, req: &RegisterCallRequest) -> Result<RegisterCallResponse> {
        self.post_json("/calls/register", req).await
    }

    async fn consume_credit(&self, req: &CreditConsumeRequest) -> Result<CreditBalance> {
        self.post_json("/credits/consume", req).await
    }

    async fn restore_credit(&self, req: &CreditRestoreRequest) -> Result<CreditBalance> {
        self.post_json("/credits/restore", req).await
    }

    async fn cancel_interview(&self, req: &InterviewCloseRequest) -> Result<()> {
        self.post_ack(&format!("/interviews/{}/cancel", req.interview_id), req)
            .await
    }

    async fn complete_interview(&self, req: &InterviewCloseRequest) -> Result<()> {
        self.post_ack(&format!("/interviews/{}/complete", req.interview_id), req)
            .await
    }

    async fn get_feedback(&self, interview_id: &str) -> Result<FeedbackReport> {
        self.get_json(&format!("/interviews/{}/feedback", interview_id))
            .await
    }
}

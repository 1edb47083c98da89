// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP implementation of the control-plane client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use vigil_core::{rfc1123, JobSpec, PreviewTask, StatusReport};

use super::{
    ControlClient, ControlError, JobListResponse, PreviewListResponse, RegisterRequest,
    RegisterResponse,
};

/// HTTP timeout for all control-plane calls.
const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Control-plane client over HTTP with bearer-token auth.
#[derive(Clone)]
pub struct HttpControlClient {
    base_url: String,
    token: String,
    client: Client,
}

impl HttpControlClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            base_url: base_url.into(),
            token: token.into(),
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl ControlClient for HttpControlClient {
    async fn fetch_jobs(
        &self,
        last_fetch_unix: Option<i64>,
    ) -> Result<Option<Vec<JobSpec>>, ControlError> {
        let mut req = self
            .client
            .get(self.url("/api/v1/device/jobs"))
            .bearer_auth(&self.token);
        if let Some(secs) = last_fetch_unix {
            req = req.header(reqwest::header::IF_MODIFIED_SINCE, rfc1123(secs));
        }

        let resp = req.send().await?;
        match resp.status() {
            StatusCode::NOT_MODIFIED => Ok(None),
            StatusCode::OK => {
                let body: JobListResponse = resp.json().await?;
                Ok(Some(body.items))
            }
            status => Err(ControlError::Status(status.as_u16())),
        }
    }

    async fn fetch_preview_tasks(&self) -> Result<Vec<PreviewTask>, ControlError> {
        let resp = self
            .client
            .get(self.url("/api/v1/device/preview-tasks"))
            .bearer_auth(&self.token)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ControlError::Status(resp.status().as_u16()));
        }
        let body: PreviewListResponse = resp.json().await?;
        Ok(body.items)
    }

    async fn report_status(&self, report: &StatusReport) -> Result<(), ControlError> {
        let resp = self
            .client
            .post(self.url("/api/v1/device/report-status"))
            .bearer_auth(&self.token)
            .json(report)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ControlError::Status(resp.status().as_u16()));
        }
        Ok(())
    }

    async fn unregister(&self) -> Result<(), ControlError> {
        let resp = self
            .client
            .post(self.url("/api/v1/device/unregister"))
            .bearer_auth(&self.token)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ControlError::Status(resp.status().as_u16()));
        }
        Ok(())
    }
}

/// Out-of-band device registration. Authenticates with the operator's
/// access token, not a device bearer token.
pub async fn register(
    base_url: &str,
    request: &RegisterRequest,
) -> Result<RegisterResponse, ControlError> {
    let client = Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .unwrap_or_default();
    let resp = client
        .post(format!("{base_url}/api/v1/device/register"))
        .json(request)
        .send()
        .await?;
    if !resp.status().is_success() {
        return Err(ControlError::Status(resp.status().as_u16()));
    }
    let body: RegisterResponse = resp.json().await?;
    Ok(body)
}

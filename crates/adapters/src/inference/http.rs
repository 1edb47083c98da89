// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP inference client speaking the open inference protocol.
//!
//! Health endpoints answer via status code; `infer` posts the JPEG bytes
//! (base64, BYTES tensor) plus a `dims` tensor and reads back the first
//! FP32 output as a flat detection tensor.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{InferenceClient, InferenceError};

/// HTTP timeout for inference calls. Per-call deadlines beyond this are
/// the server's business.
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct InferRequest {
    inputs: Vec<InferInput>,
}

#[derive(Serialize)]
struct InferInput {
    name: &'static str,
    shape: Vec<i64>,
    datatype: &'static str,
    data: serde_json::Value,
}

#[derive(Deserialize)]
struct InferResponse {
    outputs: Vec<InferOutput>,
}

#[derive(Deserialize)]
struct InferOutput {
    data: Vec<f32>,
}

/// Inference client over the model server's HTTP endpoint.
#[derive(Clone)]
pub struct HttpInferenceClient {
    base_url: String,
    client: Client,
}

impl HttpInferenceClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    async fn probe(&self, path: &str) -> Result<bool, InferenceError> {
        let resp = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }
}

#[async_trait]
impl InferenceClient for HttpInferenceClient {
    async fn server_live(&self) -> Result<bool, InferenceError> {
        self.probe("/v2/health/live").await
    }

    async fn server_ready(&self) -> Result<bool, InferenceError> {
        self.probe("/v2/health/ready").await
    }

    async fn model_ready(&self, model: &str) -> Result<bool, InferenceError> {
        self.probe(&format!("/v2/models/{model}/ready")).await
    }

    async fn infer(
        &self,
        model: &str,
        frame: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<f32>, InferenceError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(frame);
        let request = InferRequest {
            inputs: vec![
                InferInput {
                    name: "image",
                    shape: vec![1],
                    datatype: "BYTES",
                    data: serde_json::json!([encoded]),
                },
                InferInput {
                    name: "dims",
                    shape: vec![2],
                    datatype: "INT32",
                    data: serde_json::json!([height, width]),
                },
            ],
        };

        let resp = self
            .client
            .post(format!("{}/v2/models/{model}/infer", self.base_url))
            .json(&request)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(InferenceError::Status(resp.status().as_u16()));
        }

        let body: InferResponse = resp.json().await?;
        let output = body
            .outputs
            .into_iter()
            .next()
            .ok_or_else(|| InferenceError::Decode("no output tensor".to_string()))?;
        if output.data.len() % 6 != 0 {
            return Err(InferenceError::Decode(format!(
                "detection tensor length {} is not a multiple of 6",
                output.data.len()
            )));
        }
        Ok(output.data)
    }
}

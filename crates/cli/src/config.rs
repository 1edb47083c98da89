// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

/// Configuration for the Vigil agent.
///
/// Device identity and object-storage credentials are not configured
/// here; they live in the metadata store and come from registration.
#[derive(Debug, Clone, clap::Args)]
pub struct AgentConfig {
    /// Control-plane base URL.
    #[arg(long, default_value = "http://127.0.0.1:8080", env = "VIGIL_SERVER_ADDR")]
    pub server_addr: String,

    /// Working directory for the metadata store and job artifacts.
    #[arg(long, default_value = "/var/lib/vigil", env = "VIGIL_WORK_DIR")]
    pub work_dir: PathBuf,

    /// Inference server base URL.
    #[arg(long, default_value = "http://127.0.0.1:8000", env = "VIGIL_INFERENCE_ADDR")]
    pub inference_addr: String,

    /// NATS server URL.
    #[arg(long, default_value = "nats://127.0.0.1:4222", env = "VIGIL_NATS_URL")]
    pub nats_url: String,

    /// Subject that detection and segment messages are published to.
    #[arg(long, default_value = "vigil.events", env = "VIGIL_NATS_SUBJECT")]
    pub subject: String,

    /// S3-compatible endpoint for artifact uploads.
    #[arg(long, default_value = "http://127.0.0.1:9000", env = "VIGIL_S3_ENDPOINT")]
    pub s3_endpoint: String,

    /// Region for the object-storage endpoint.
    #[arg(long, default_value = "us-east-1", env = "VIGIL_S3_REGION")]
    pub s3_region: String,

    /// Bucket that artifacts are uploaded to.
    #[arg(long, default_value = "vigil", env = "VIGIL_S3_BUCKET")]
    pub s3_bucket: String,
}

impl AgentConfig {
    /// The embedded store file: `<workDir>/data/meta.redb`.
    pub fn store_path(&self) -> PathBuf {
        self.work_dir.join("data").join("meta.redb")
    }

    /// Per-job work directories live under `<workDir>/job/<jobUUID>`.
    pub fn job_root(&self) -> PathBuf {
        self.work_dir.join("job")
    }

    pub fn lock_path(&self) -> PathBuf {
        self.work_dir.join("vigil.lock")
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

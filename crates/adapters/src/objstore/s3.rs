// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! S3-compatible uploader on `object_store`.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, PutPayload};

use super::{content_type_for, UploadError, Uploader};

/// Per-upload deadline.
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the device's bucket.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub endpoint: String,
    pub region: String,
    pub bucket: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// Uploader against an S3-compatible endpoint.
#[derive(Clone)]
pub struct S3Uploader {
    store: Arc<AmazonS3>,
}

impl S3Uploader {
    pub fn new(config: &S3Config) -> Result<Self, UploadError> {
        let store = AmazonS3Builder::new()
            .with_endpoint(&config.endpoint)
            .with_region(&config.region)
            .with_bucket_name(&config.bucket)
            .with_access_key_id(&config.access_key_id)
            .with_secret_access_key(&config.secret_access_key)
            .with_allow_http(true)
            .build()?;
        Ok(Self {
            store: Arc::new(store),
        })
    }
}

#[async_trait]
impl Uploader for S3Uploader {
    async fn upload(&self, local: &Path, remote_key: &str) -> Result<(), UploadError> {
        let bytes = tokio::fs::read(local).await?;

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type_for(local).into());
        let options = PutOptions {
            attributes,
            ..PutOptions::default()
        };

        let key = object_store::path::Path::from(remote_key.trim_start_matches('/'));
        let put = self
            .store
            .put_opts(&key, PutPayload::from(bytes), options);
        match tokio::time::timeout(UPLOAD_TIMEOUT, put).await {
            Ok(result) => {
                result?;
                Ok(())
            }
            Err(_elapsed) => Err(UploadError::Timeout(UPLOAD_TIMEOUT.as_secs())),
        }
    }
}

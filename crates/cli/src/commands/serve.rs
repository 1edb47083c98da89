// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `serve` command: run the agent until interrupted.

use anyhow::Context;
use tokio::signal::unix::{signal, SignalKind};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use vigil_adapters::{
    FfmpegVideoSource, HttpControlClient, HttpInferenceClient, NatsPublisher, S3Config, S3Uploader,
};
use vigil_engine::{Agent, ExecutorFactory, FfmpegRestreamRunner};
use vigil_storage::{MetaStore, RedbStore};

use crate::config::AgentConfig;
use crate::lock;

pub async fn run(config: &AgentConfig) -> anyhow::Result<()> {
    let _lock = lock::acquire(&config.lock_path())?;

    std::fs::create_dir_all(config.job_root())
        .with_context(|| format!("creating {}", config.job_root().display()))?;
    let store = RedbStore::open(&config.store_path())
        .with_context(|| format!("opening store at {}", config.store_path().display()))?;

    // Device identity is a startup precondition.
    let device = store
        .device_info()?
        .filter(|device| device.is_complete())
        .context("device is not registered; run `vigil register <info.json>` first")?;

    let control = HttpControlClient::new(&config.server_addr, &device.token);
    let inference = HttpInferenceClient::new(&config.inference_addr);
    let uploader = S3Uploader::new(&S3Config {
        endpoint: config.s3_endpoint.clone(),
        region: config.s3_region.clone(),
        bucket: config.s3_bucket.clone(),
        access_key_id: device.s3_access_key_id.clone(),
        secret_access_key: device.s3_secret_access_key.clone(),
    })?;
    let publisher = NatsPublisher::connect(&config.nats_url).await?;

    let factory = ExecutorFactory {
        device_uuid: device.uuid.clone(),
        job_root: config.job_root(),
        subject: config.subject.clone(),
        video: FfmpegVideoSource::new(),
        inference,
        uploader,
        publisher: publisher.clone(),
    };

    let shutdown = CancellationToken::new();
    spawn_signal_handler(shutdown.clone())?;

    info!(device = %device.uuid, server = %config.server_addr, "vigil agent running");
    let agent = Agent::new(
        store,
        control,
        factory,
        FfmpegRestreamRunner::new(),
        shutdown,
    );
    // Returns after the root scope is cancelled and every executor and
    // restream has stopped; the store handle drops with the agent.
    agent.run().await;

    if let Err(e) = publisher.flush().await {
        warn!(error = %e, "publisher flush failed during shutdown");
    }
    Ok(())
}

fn spawn_signal_handler(shutdown: CancellationToken) -> anyhow::Result<()> {
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::spawn(async move {
        tokio::select! {
            _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
            _ = sigint.recv() => info!("received SIGINT, shutting down"),
        }
        shutdown.cancel();
    });
    Ok(())
}

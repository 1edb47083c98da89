// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The agent: root scope wiring for the reconciler and preview manager.

use tokio_util::sync::CancellationToken;
use tracing::info;

use vigil_adapters::{ControlClient, InferenceClient, Publisher, Uploader, VideoSource};
use vigil_storage::MetaStore;

use crate::executor::ExecutorFactory;
use crate::preview::{PreviewManager, RestreamRunner};
use crate::reconcile::Reconciler;

/// The long-lived edge agent process body.
///
/// Owns the root cancellation scope; every executor and restream scope
/// descends from it, so cancelling the root reaches everything.
pub struct Agent<S, C, V, I, U, P, R> {
    reconciler: Reconciler<S, C, V, I, U, P>,
    preview: PreviewManager<C, R>,
}

impl<S, C, V, I, U, P, R> Agent<S, C, V, I, U, P, R>
where
    S: MetaStore,
    C: ControlClient,
    V: VideoSource,
    I: InferenceClient,
    U: Uploader,
    P: Publisher,
    R: RestreamRunner,
{
    pub fn new(
        store: S,
        control: C,
        factory: ExecutorFactory<V, I, U, P>,
        runner: R,
        shutdown: CancellationToken,
    ) -> Self {
        let reconciler = Reconciler::new(store, control.clone(), factory, shutdown.clone());
        let preview = PreviewManager::new(control, runner, shutdown.clone());
        Self {
            reconciler,
            preview,
        }
    }

    /// Run until the shutdown token fires; returns only after every
    /// executor and restream has stopped.
    pub async fn run(self) {
        let reconciler = tokio::spawn(self.reconciler.run());
        let preview = tokio::spawn(self.preview.run());

        let _ = reconciler.await;
        let _ = preview.await;
        info!("agent stopped");
    }
}

use crate::cache::{CacheStorage, GenerationId};
use crate::config::WorkerConfig;
use crate::lifecycle::{ActivationReport, GenerationManager, InstallReport, WorkerState};
use crate::routing::{FetchOutcome, RequestRouter};
use crate::strategy::StrategyStats;
use crate::types::Request;
use crate::{Error, ErrorContext, Result};
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// One worker instance, bound to a single cache generation.
///
/// A redeploy with a new version tag means a new instance; the old one keeps
/// serving from its own generation until the new one activates.
pub struct OfflineWorker {
    pub(crate) config: Arc<WorkerConfig>,
    pub(crate) storage: Arc<dyn CacheStorage>,
    pub(crate) manager: GenerationManager,
    pub(crate) router: RequestRouter,
    pub(crate) state: RwLock<WorkerState>,
}

impl OfflineWorker {
    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn storage(&self) -> &Arc<dyn CacheStorage> {
        &self.storage
    }

    pub fn generation_id(&self) -> GenerationId {
        self.config.generation_id()
    }

    pub fn state(&self) -> WorkerState {
        *self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn transition(&self, from: WorkerState, to: WorkerState) -> Result<()> {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        if *state != from || !state.can_transition_to(to) {
            return Err(Error::lifecycle_with_context(
                format!("cannot move to {} from {}", to, *state),
                ErrorContext::new()
                    .with_details(format!("expected state {}", from))
                    .with_source("offline_worker"),
            ));
        }
        debug!(from = %*state, to = %to, "worker state change");
        *state = to;
        Ok(())
    }

    fn set_state(&self, to: WorkerState) {
        *self.state.write().unwrap_or_else(|e| e.into_inner()) = to;
    }

    /// Handle the install event.
    ///
    /// On failure the worker becomes redundant and the host's retry policy
    /// decides what happens next.
    pub async fn install(&self) -> Result<InstallReport> {
        self.transition(WorkerState::Parsed, WorkerState::Installing)?;
        match self.manager.install().await {
            Ok(report) => {
                self.set_state(WorkerState::Installed);
                Ok(report)
            }
            Err(e) => {
                self.set_state(WorkerState::Redundant);
                Err(e)
            }
        }
    }

    /// Handle the activate event.
    ///
    /// If stale generations cannot even be enumerated, the worker returns to
    /// `Installed` so the host may retry.
    pub async fn activate(&self) -> Result<ActivationReport> {
        self.transition(WorkerState::Installed, WorkerState::Activating)?;
        match self.manager.activate().await {
            Ok(report) => {
                self.set_state(WorkerState::Activated);
                info!(generation = %self.generation_id(), "worker active");
                Ok(report)
            }
            Err(e) => {
                self.set_state(WorkerState::Installed);
                Err(e)
            }
        }
    }

    /// Handle a fetch event. Never fails.
    pub async fn handle_fetch(&self, request: &Request) -> FetchOutcome {
        if !self.state().can_intercept_fetch() {
            return FetchOutcome::PassThrough;
        }
        self.router.route(request).await
    }

    /// Wait for all background cache writes to finish.
    pub async fn flush(&self) {
        self.router.context().flush().await;
    }

    pub fn stats(&self) -> StrategyStats {
        self.router.context().stats()
    }
}

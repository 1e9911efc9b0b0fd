use crate::config::AppConfig;
use crate::store::{PendingOperation, StoreHandle, StoreResult};
use chamberconnect_messaging::{seed, EntityStore, Mutation, MutationOutcome};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

pub struct AppState {
    config: AppConfig,
    store: StoreHandle,
}

impl AppState {
    pub fn new(config: AppConfig, store: StoreHandle) -> Arc<Self> {
        Arc::new(Self { config, store })
    }

    /// Builds the entity store described by `config` and starts its runtime.
    pub fn bootstrap(config: AppConfig) -> anyhow::Result<(Arc<Self>, JoinHandle<()>)> {
        let store = if config.seed {
            EntityStore::with_seed(config.local_user_id.as_str(), seed::chamber_fixture())?
        } else {
            EntityStore::new(config.local_user_id.as_str())
        };
        info!(
            local_user = %config.local_user_id,
            conversations = store.conversations().len(),
            notifications = store.notifications().len(),
            "entity store ready"
        );

        let (handle, task) = StoreHandle::spawn(store, config.command_buffer);
        Ok((Self::new(config, handle), task))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn build_id(&self) -> &str {
        &self.config.build_id
    }

    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    /// Applies a mutation as a pending operation, after the configured latency.
    pub async fn submit(&self, mutation: Mutation) -> StoreResult<MutationOutcome> {
        let store = self.store.clone();
        PendingOperation::spawn(self.config.simulated_latency, move || async move {
            store.apply(mutation).await
        })
        .outcome()
        .await
        .into_result()
    }
}

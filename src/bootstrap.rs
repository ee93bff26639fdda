//! Component wiring for Files Manager.

use std::sync::Arc;

use tracing::info;

use crate::auth::{MemorySessionStore, SessionAuthenticator};
use crate::config::Config;
use crate::db::{Database, NodeRepository, UserRepository, UserStore};
use crate::file::{FileContentStore, FileRegistry};
use crate::thumbnail::{start_workers, ThumbnailPipeline, WorkerPool};
use crate::web::AppState;

/// Everything a running service needs.
pub struct Services {
    /// Handler state.
    pub state: Arc<AppState>,
    /// Thumbnail workers; they stop once `state` is dropped.
    pub workers: WorkerPool,
}

/// Build the stores, components and thumbnail workers over `db`.
///
/// Must be called inside a tokio runtime.
pub fn build_services(config: &Config, db: Database) -> Services {
    let users: Arc<dyn UserStore> = Arc::new(UserRepository::new(db.pool().clone()));
    let nodes = Arc::new(NodeRepository::new(db.pool().clone()));
    let content = Arc::new(FileContentStore::new(&config.storage.folder_path));

    let auth = Arc::new(SessionAuthenticator::with_ttl(
        Arc::clone(&users),
        Arc::new(MemorySessionStore::new()),
        config.session.ttl(),
    ));
    let registry = Arc::new(FileRegistry::new(nodes, content));

    let pipeline = Arc::new(ThumbnailPipeline::new(Arc::clone(&registry)));
    let (thumbnails, workers) = start_workers(pipeline, &config.thumbnails);

    info!(
        storage = %config.storage.folder_path,
        token_ttl_secs = config.session.ttl_secs,
        "Services ready"
    );

    Services {
        state: Arc::new(AppState {
            db,
            users,
            auth,
            registry,
            thumbnails,
        }),
        workers,
    }
}

use axum::extract::FromRef;
use jodidar_database::storage::BlobStore;
use std::sync::Arc;

// Re-define complex state types here so they do not clog up
// the function signatures for routes
pub type Database = Arc<jodidar_database::Database>;
pub type Blobs = Arc<dyn BlobStore>;

#[derive(Clone)]
pub struct ApiState {
    pub db: Database,
    pub blobs: Blobs,
}

macro_rules! from_state {
    ($t:ty, $i:ident) => {
        impl FromRef<ApiState> for $t {
            fn from_ref(app_state: &ApiState) -> $t {
                app_state.$i.clone()
            }
        }
    };
}

from_state!(Database, db);
from_state!(Blobs, blobs);

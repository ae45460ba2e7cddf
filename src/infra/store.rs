use std::sync::Arc;

use tracing::debug;

use crate::auth::{FileTokenStore, MemoryTokenStore, TokenStore};
use crate::config::{AuthSettings, TokenStoreKind};

/// Build the token store selected by configuration.
pub fn build_token_store(settings: &AuthSettings) -> Arc<dyn TokenStore> {
    match &settings.store {
        TokenStoreKind::File(path) => {
            debug!(path = %path.display(), "using file token store");
            Arc::new(FileTokenStore::new(path.clone()))
        }
        TokenStoreKind::Memory => {
            debug!("using in-memory token store");
            Arc::new(MemoryTokenStore::new())
        }
    }
}

//! Credentials: token persistence and the login/logout session flow.

mod session;
mod store;

pub use session::Session;
pub use store::{
    ACCESS_TOKEN_KEY, FileTokenStore, MemoryTokenStore, REFRESH_TOKEN_KEY, StoreError, TokenStore,
};

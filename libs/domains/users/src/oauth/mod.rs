pub mod provider;
pub mod state_store;
pub mod twitter;

pub use provider::{AuthorizationRequest, OAuthProvider};
pub use state_store::{OAuthState, OAuthStateStore};
pub use twitter::TwitterProvider;

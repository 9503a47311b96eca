pub mod provider;
pub mod session;

pub use provider::{GithubProvider, ProviderError, ProviderUser};
pub use session::{session_key, SessionStorage};

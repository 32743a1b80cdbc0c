//! Auth-domain models: sessions, redacted secrets, credentials, and access token claims.

pub mod claims;
pub mod credentials;
pub mod secret;
pub mod session;

pub use claims::*;
pub use credentials::*;
pub use secret::*;
pub use session::*;

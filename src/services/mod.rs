pub mod auth;
pub mod dashboard;
pub mod export;
pub mod ingest;
pub mod password;
pub mod session;

pub use auth::{AuthService, Session};
pub use session::{Menu, SessionContext, SessionStore};

//! Client for the Rounds service.
//!
//! - `http` - one `ApiClient` for every call: base URL, bearer auth,
//!   response envelopes, status mapping
//! - `session` - login state, normalised once and persisted to disk
//! - `dto` - wire shapes and their mapping onto engine types
//! - `rounds` - typed rounds and records endpoints

pub mod dto;
pub mod http;
pub mod rounds;
pub mod session;

pub use http::{ApiClient, AuthPolicy, Envelope};
pub use rounds::RoundsApi;
pub use session::{LoginPayload, Session, SessionManager, UserProfile};

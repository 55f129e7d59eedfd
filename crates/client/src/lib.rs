//! Client SDK for the campus content API.
//!
//! [`CampusApi`] wraps the REST surface. On top of it sit the behaviours a
//! department site needs: the read-only [`PublicPanel`], the editing
//! [`AdminPanel`] with client-side form validation, and the [`SessionGate`]
//! that signs editors in and persists their session.

pub mod api;
pub mod config;
pub mod error;
pub mod form;
pub mod panel;
pub mod session;

pub use api::{AuthResponse, CampusApi, UserInfo};
pub use config::ClientConfig;
pub use error::ClientError;
pub use form::{ContentForm, FileInput};
pub use panel::{AdminPanel, PanelState, PublicPanel};
pub use session::{
    AuthState, FileSessionStore, MemorySessionStore, Session, SessionGate, SessionStore,
};

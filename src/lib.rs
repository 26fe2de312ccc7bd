//! # gatehouse
//!
//! Client-side session store for a remote auth API: signup, login, logout,
//! profile refresh and persistence of the session across restarts.
//!
//! The [`store::SessionStore`] is the single owner of authentication state.
//! It talks to the server through the [`api::AuthApi`] trait, writes the
//! persisted subset through [`storage::SessionStorage`] and reports
//! user-facing outcomes through [`notify::Notify`].

pub mod api;
pub mod config;
pub mod forms;
pub mod notify;
pub mod storage;
pub mod store;
pub mod types;

pub use api::{ApiError, AuthApi, HttpAuthApi};
pub use config::Config;
pub use notify::{LogNotifier, Notice, Notify};
pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError};
pub use store::SessionStore;
pub use types::{AuthResponse, PersistedSession, Session, User};

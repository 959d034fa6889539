//! User authentication subsystem.
//!
//! ```text
//! auth/
//! ├── types.rs          # domain types (User, requests, federated identity)
//! ├── errors.rs         # error taxonomy
//! ├── service.rs        # authentication decision logic
//! ├── core/             # token issuance and password hashing
//! │   ├── token_service.rs
//! │   └── password_service.rs
//! ├── providers/        # federated identity exchange
//! │   ├── trait.rs
//! │   └── google.rs
//! ├── storage/          # user persistence
//! │   ├── trait.rs
//! │   ├── memory.rs
//! │   └── sqlite.rs
//! └── api/              # HTTP surface
//!     ├── routes.rs
//!     └── handlers.rs
//! ```
//!
//! Layering: API → service → (storage, hasher, provider) → token issuer.
//! The provider and storage are injected as trait objects so tests can
//! substitute doubles.

pub mod api;
pub mod core;
pub mod errors;
pub mod providers;
pub mod service;
pub mod storage;
pub mod types;

pub use api::create_router;
pub use errors::AuthError;
pub use providers::{GoogleProvider, IdentityProvider};
pub use service::AuthService;
pub use storage::{MemoryStore, SqliteStore, UserStore};
pub use types::{Credential, Provenance, User};

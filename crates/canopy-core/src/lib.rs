//! Shared domain layer between `canopy-api` and the front-ends (CLI / TUI).
//!
//! - **Domain model** ([`model`]): one record type per tracked entity, each
//!   implementing [`Entity`] so a single generic view can manage it.
//!
//! - **[`Gateway`]**: typed async CRUD boundary. [`HttpGateway`] talks to
//!   the REST service; tests swap in an in-memory implementation.
//!
//! - **[`ViewController`]**: list, form mode, draft, filters, loading flag
//!   and notifications for one entity view. Intents produce [`Request`]s
//!   which run against a gateway and come back as [`Outcome`]s.
//!
//! - **[`SessionContext`]**: explicit login state, with [`auth`] helpers
//!   for validating and submitting the login / signup forms.

pub mod auth;
pub mod entity;
pub mod error;
pub mod filter;
pub mod form;
pub mod gateway;
pub mod model;
pub mod schema;
pub mod session;
pub mod stats;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use canopy_api::{ApiClient, AuthUser, DEFAULT_BASE_URL, Filter, TransportConfig};
pub use entity::{Entity, EntityKind};
pub use error::CoreError;
pub use filter::FilterInputs;
pub use form::Draft;
pub use gateway::{Gateway, HttpGateway};
pub use schema::{FieldKind, FieldSpec, FilterField, QuickFilter, Severity};
pub use session::{Session, SessionContext};
pub use stats::{Stat, StatValue};
pub use view::{FormMode, Mutation, Notification, NotificationLevel, Outcome, Request, ViewController};

pub use model::{Animal, EntityId, ForestOfficer, Plant, Resource, Tree, Visitor};

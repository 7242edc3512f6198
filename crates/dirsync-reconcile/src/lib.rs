//! Reconciliation engine.
//!
//! Loads the complete remote snapshot once, reconciles each desired identity
//! and group against it, then sweeps away everything the pass never touched.
//! The in-memory model is updated after every successful mutation so later
//! lookups in the same run see it.
//!
//! Call order is fixed: [`Engine::load`], then
//! [`Engine::reconcile_identity`] for every identity, then
//! [`Engine::reconcile_group`] for every group, then [`Engine::sweep`] once.
//! [`Engine::run`] does all of it for a [`DesiredState`].

pub mod credential;
pub mod desired;
pub mod engine;
pub mod group;
pub mod identity;
pub mod model;
pub mod report;
pub mod sweep;

pub use credential::Credential;
pub use desired::{DesiredGroup, DesiredIdentity, DesiredState};
pub use engine::Engine;
pub use model::{Group, Identity};
pub use report::RunReport;

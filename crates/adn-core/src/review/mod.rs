//! Review workflow model
//!
//! Decisions and stages are parsed from text at the boundary and handled as
//! enums everywhere else. [`derive`] is the single place where a stage is
//! computed; [`ReviewControls`] decides which review actions are available.

mod controls;
mod decision;
mod engine;
mod stage;
mod tags;

pub use controls::{ReviewControls, StageRegression};
pub use decision::ReviewDecision;
pub use engine::{derive, derive_raw, Derivation};
pub use stage::LifecycleStage;
pub use tags::{TagSet, DOCUMENT_TAG};

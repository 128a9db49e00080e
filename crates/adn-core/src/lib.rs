//! ADN core domain
//!
//! This crate holds the pieces of ADN that have no I/O of their own:
//!
//! - [`review`]: reviewer decisions, lifecycle stages, tag sets and the stage
//!   derivation engine, plus the gating rules that decide which review
//!   controls are offered for a given state.
//! - [`document`]: a generated note's review state and the actions that move
//!   it through the workflow.
//! - [`frontmatter`]: reading and rewriting the YAML front matter of a
//!   generated note.
//! - [`presentation`]: a keyed observer bus used by frontends to mirror the
//!   current review state.
//!
//! ## Usage
//!
//! ```rust
//! use adn_core::review::{derive, LifecycleStage, ReviewDecision};
//!
//! let derived = derive(
//!     ReviewDecision::Approved,
//!     ReviewDecision::Unset,
//!     LifecycleStage::Obtained,
//! );
//! assert_eq!(derived.stage, LifecycleStage::InSecondReview);
//! assert_eq!(derived.tags.as_slice()[0], "document");
//! ```

pub mod document;
pub mod error;
pub mod frontmatter;
pub mod presentation;
pub mod review;

pub use document::{Document, DocumentId, DocumentMetadata, ReviewAction, ReviewView};
pub use error::{ReviewError, ReviewResult};
pub use frontmatter::NoteFile;
pub use presentation::{PresentationBus, PresentationObserver};
pub use review::{
    derive, derive_raw, Derivation, LifecycleStage, ReviewControls, ReviewDecision,
    StageRegression, TagSet,
};

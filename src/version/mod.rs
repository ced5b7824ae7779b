//! Version resolution engine
//!
//! Turns the raw tags an upstream publishes into one "latest version" for a
//! tracked package. Everything in here is pure and synchronous.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Candidates  │────▶│  Normalize  │────▶│   Filter    │
//! │ (tag, id)   │     │ (literal,key│     │  (policy)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                                       │
//!        ▼                                       ▼
//! ┌─────────────┐                         ┌─────────────┐
//! │   Commit    │                         │   Order     │
//! │ short-circ. │                         │ (max, ties) │
//! └─────────────┘                         └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`resolver`]: the resolution entry points
//! - [`normalize`]: tag normalization and the ordering key
//! - [`policy`]: per-package rules and version restrictions
//! - [`commit`]: commit-hash detection and date stamps
//! - [`channel`]: development channel detection
//! - [`atom`]: Portage package atoms
//! - [`archive`]: distfile extension helpers
//! - [`semver`]: bridge to the `semver` crate for requirements
//! - [`types`]: `Candidate` and `ResolutionResult`
//! - [`error`]: error types

pub mod archive;
pub mod atom;
pub mod channel;
pub mod commit;
pub mod error;
pub mod normalize;
pub mod policy;
pub mod resolver;
pub mod semver;
pub mod types;

pub use atom::PackageAtom;
pub use policy::{Policy, VersionRestriction};
pub use resolver::{resolve, resolve_with_feed_date};
pub use types::{Candidate, ResolutionResult};

//! HTTP access for livecheck
//!
//! Every URL is routed to a [`Profile`](profile::Profile) that decides its
//! headers and credentials. Fetch failures never surface as errors: a
//! [`FetchResult`] always comes back, with status 503 when no response was
//! received.

pub mod credentials;
pub mod error;
pub mod fetcher;
pub mod memo;
pub mod probe;
pub mod profile;
pub mod session;

pub use credentials::{CredentialStore, FileCredentialStore, StaticCredentials};
pub use error::FetchError;
pub use fetcher::{ContentSource, FetchResult, Fetcher};
pub use probe::{ArtifactDigest, ArtifactProbe};
pub use profile::{Profile, detect_profile};

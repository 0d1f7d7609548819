//! Remote lookup clients: AI completion and clinic search.
//!
//! Both clients make a single attempt per call; retries are a caller
//! concern and are deliberately not implemented here.

pub mod clinics;
pub mod completion;
pub mod error;

pub use clinics::{ClinicHit, ClinicLocator, NominatimLocator};
pub use completion::{CompletionClient, HttpCompletionClient};
pub use error::LookupError;

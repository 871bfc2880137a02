mod domain;
mod garde;
mod redis;
mod salesforce;
pub mod soql;

pub use domain::*;
pub use garde::*;
pub use redis::*;
pub use salesforce::*;

// Re-export mocks when testing feature is enabled
#[cfg(any(test, feature = "testing"))]
pub use domain::MockCredentialStore;
#[cfg(any(test, feature = "testing"))]
pub use domain::MockCrmDataClient;
#[cfg(any(test, feature = "testing"))]
pub use domain::MockStatusStore;

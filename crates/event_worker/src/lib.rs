pub mod domain;
pub mod event_worker;

pub use domain::*;
pub use event_worker::*;

mod client;
mod credential_store;
mod status_store;

pub use client::*;
pub use credential_store::*;
pub use status_store::*;

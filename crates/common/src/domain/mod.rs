mod connection;
mod event;
mod record;
mod result;
mod status;

pub use connection::*;
pub use event::*;
pub use record::*;
pub use result::*;
pub use status::*;

mod process_event_service;

pub use process_event_service::*;

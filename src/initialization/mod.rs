//! Process-level initialization.
//!
//! Only the logger needs global setup; everything else (registry, observer
//! hub, badge surface) is constructed by the caller and passed by reference.

mod logger;

pub use logger::init_logger_with;

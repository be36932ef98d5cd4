//! Per-tab navigation and response tracking.
//!
//! Decides which response is the main-document response of each tab, keeps
//! the latest classification per tab, and detects navigations that completed
//! without any response event (a platform limitation for some externally
//! triggered loads).

mod models;
mod registry;


pub use models::{
    FrameId, PendingNavigation, PerformanceMetrics, TabId, TabSession, TabState, WindowId,
    MAIN_FRAME_ID,
};
pub use registry::{SessionRegistry, Transition};

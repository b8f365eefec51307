//! Tracks metadata for a rendering session.

use crate::log;

/// Metadata for a rendering session.
///
/// A session is created when a [`crate::api::CairoRenderer`] starts a render pass, and it
/// is handed down to everything that may want to log.  Tests can create one with logging
/// forced on or off, independently of the `RSVG_LOG` environment variable.
#[derive(Debug, Clone, Copy)]
pub struct Session {
    log_enabled: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            log_enabled: log::log_enabled(),
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_for_test_suite() -> Self {
        Self { log_enabled: false }
    }

    pub fn log_enabled(&self) -> bool {
        self.log_enabled
    }
}

//! # Progress Reporting
//!
//! The codec never logs on its own. Callers hand a [`Reporter`] to the
//! pipeline calls and decide where the events end up:
//!
//! - [`SilentReporter`]: drops everything (the default, used by tests)
//! - [`LogReporter`]: forwards to the `log` facade

use log::Level;
use std::fmt;

/// Sink for codec progress and diagnostic events.
pub trait Reporter: Send + Sync {
    fn report(&self, level: Level, args: fmt::Arguments<'_>);
}

/// Reporter that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn report(&self, _level: Level, _args: fmt::Arguments<'_>) {}
}

/// Reporter that forwards events to the `log` crate under a fixed target.
#[derive(Debug, Clone, Copy)]
pub struct LogReporter {
    target: &'static str,
}

impl LogReporter {
    pub fn new(target: &'static str) -> Self {
        Self { target }
    }
}

impl Default for LogReporter {
    fn default() -> Self {
        Self::new("lsb_stego")
    }
}

impl Reporter for LogReporter {
    fn report(&self, level: Level, args: fmt::Arguments<'_>) {
        log::log!(target: self.target, level, "{}", args);
    }
}

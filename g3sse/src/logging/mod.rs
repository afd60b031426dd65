/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::thread::JoinHandle;

use slog::{Drain, Level, slog_o};
use slog_scope::GlobalLoggerGuard;

mod stderr;

const LOG_CHANNEL_CAPACITY: usize = 1024;

fn log_levels(verbose: u8) -> (Level, log::Level) {
    match verbose {
        0 => (Level::Warning, log::Level::Warn),
        1 => (Level::Info, log::Level::Info),
        2 => (Level::Debug, log::Level::Debug),
        _ => (Level::Trace, log::Level::Trace),
    }
}

/// Flush all pending logs to stderr when dropped.
pub(crate) struct LoggerGuard {
    scope_guard: Option<GlobalLoggerGuard>,
    io_thread: Option<JoinHandle<()>>,
}

impl Drop for LoggerGuard {
    fn drop(&mut self) {
        // the channel will be closed after the global logger is released
        self.scope_guard.take();
        if let Some(handle) = self.io_thread.take() {
            let _ = handle.join();
        }
    }
}

/// Send all logs to stderr, keeping stdout for the response body.
pub(crate) fn setup_log(verbose: u8) -> anyhow::Result<LoggerGuard> {
    let (slog_level, log_level) = log_levels(verbose);

    let (drain, io_thread) = stderr::new_async_logger(LOG_CHANNEL_CAPACITY, verbose > 2)?;
    let drain = drain.filter_level(slog_level).fuse();
    let logger = slog::Logger::root(drain, slog_o!());

    let scope_guard = slog_scope::set_global_logger(logger);

    slog_stdlog::init_with_level(log_level)?;
    Ok(LoggerGuard {
        scope_guard: Some(scope_guard),
        io_thread: Some(io_thread),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels() {
        assert_eq!(log_levels(0).1, log::Level::Warn);
        assert_eq!(log_levels(1).0, Level::Info);
        assert_eq!(log_levels(2).0, Level::Debug);
        assert_eq!(log_levels(9).1, log::Level::Trace);
    }
}

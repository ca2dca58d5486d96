//! Ctrl-C / SIGTERM handling.
//!
//! The first signal cancels the invocation's `Context` so a pending GAPIS
//! request returns `Cancelled` and the session still gets closed. A second
//! signal exits immediately.

use super::context::Context;
use anyhow::Result;

#[cfg(unix)]
use anyhow::Context as _;
#[cfg(unix)]
use log::warn;
#[cfg(unix)]
use signal_hook::consts::signal::{SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

/// Keeps the signal listener alive for the duration of a command
pub struct InterruptGuard {
    #[cfg(unix)]
    handle: signal_hook::iterator::Handle,
    #[cfg(unix)]
    thread: Option<std::thread::JoinHandle<()>>,
}

impl InterruptGuard {
    #[cfg(unix)]
    pub fn install(ctx: &Context) -> Result<Self> {
        let mut signals =
            Signals::new([SIGINT, SIGTERM]).context("failed to register signal handlers")?;
        let handle = signals.handle();
        let ctx = ctx.clone();

        let thread = std::thread::spawn(move || {
            let mut received = signals.forever();
            if received.next().is_some() {
                warn!("Interrupted, cancelling (press Ctrl-C again to quit immediately)");
                ctx.cancel();
            }
            if received.next().is_some() {
                std::process::exit(130);
            }
        });

        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }

    #[cfg(not(unix))]
    pub fn install(_ctx: &Context) -> Result<Self> {
        Ok(Self {})
    }
}

impl Drop for InterruptGuard {
    #[cfg(unix)]
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }

    #[cfg(not(unix))]
    fn drop(&mut self) {}
}

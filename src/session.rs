//! Scoped ownership of a GAPIS connection.
//!
//! A `Session` is opened once per invocation and closes its client exactly
//! once: explicitly through [`Session::close`], or on drop when an early
//! return unwinds the pipeline.

use crate::rpc::{Connect, Gapis};
use crate::utils::config::ConnectionConfig;
use crate::utils::{Context, GapisError};
use log::{debug, info};
use std::ops::Deref;

pub struct Session<C: Gapis> {
    client: C,
    closed: bool,
}

impl<C: Gapis> Session<C> {
    /// Open a session through `connector`.
    ///
    /// Nothing is left to release when this fails.
    pub fn open<K>(ctx: &Context, connector: &K, config: &ConnectionConfig) -> Result<Self, GapisError>
    where
        K: Connect<Client = C>,
    {
        ctx.check()?;
        info!("Connecting to GAPIS at {}", config.gapis);

        let client = connector.connect(ctx, config)?;
        Ok(Self::new(client))
    }

    /// Take ownership of an already connected client
    pub fn new(client: C) -> Self {
        Self {
            client,
            closed: false,
        }
    }

    /// Close the session now instead of at end of scope
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.closed {
            self.closed = true;
            self.client.close();
            debug!("GAPIS session closed");
        }
    }
}

impl<C: Gapis> Deref for Session<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.client
    }
}

impl<C: Gapis> Drop for Session<C> {
    fn drop(&mut self) {
        self.release();
    }
}

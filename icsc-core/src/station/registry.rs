//! Command-to-handler registry

use alloc::boxed::Box;
use alloc::collections::BTreeMap;

use icsc_hal::SerialTx;
use icsc_protocol::Command;

use super::handler::Handler;

/// A registered handler
pub type BoxedHandler<S> = Box<dyn Handler<S> + Send>;

/// Handlers keyed by command code; one handler per code
pub struct Registry<S> {
    handlers: BTreeMap<Command, BoxedHandler<S>>,
}

impl<S: SerialTx> Default for Registry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SerialTx> Registry<S> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// Install a handler, returning the one it replaces
    pub fn insert(&mut self, cmd: Command, handler: BoxedHandler<S>) -> Option<BoxedHandler<S>> {
        self.handlers.insert(cmd, handler)
    }

    /// Handler for `cmd`, if any
    pub fn get_mut(&mut self, cmd: Command) -> Option<&mut BoxedHandler<S>> {
        self.handlers.get_mut(&cmd)
    }

    /// Check if `cmd` has a handler
    pub fn contains(&self, cmd: Command) -> bool {
        self.handlers.contains_key(&cmd)
    }

    /// Number of registered handlers
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if no handler is registered
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<S> core::fmt::Debug for Registry<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}

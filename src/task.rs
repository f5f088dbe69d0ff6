//! Scheduler-facing task interface.
//!
//! The cooperative scheduler itself lives outside this crate; this is the
//! capability its units of work implement. A task arming transfers is
//! expected to poll the completion queries (or use a scheduler-provided
//! wait on the channel's [`TransferFlags`](crate::TransferFlags)) before
//! reusing a buffer.

/// A cooperatively scheduled unit of application logic.
pub trait Task {
    /// One-time setup, called before the first [`run`](Self::run).
    fn initialize(&mut self);

    /// One cooperative slice of work; called repeatedly and must not block.
    fn run(&mut self);
}

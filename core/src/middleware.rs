//! Middleware - interceptors applied to every dispatched action
//!
//! Middleware sit between `Store::send` and the reducer. The pipeline is an
//! explicit ordered slice of interceptors, applied front to back, with the
//! reducer call as the terminal dispatcher. There is no nested closure
//! composition at the API surface; [`run_pipeline`] walks the slice.
//!
//! A middleware receives the action and the next dispatcher in the chain.
//! Observational middleware (logging, recording) forward the action
//! unchanged exactly once. A middleware that never calls `next` swallows
//! the action, and nothing downstream - including the reducer - runs.

/// An interceptor invoked for every dispatched action.
pub trait Middleware<A>: Send + Sync {
    /// Handle one action, forwarding it to `next` to continue the chain.
    fn handle(&self, action: A, next: &mut dyn FnMut(A));
}

/// Apply an ordered pipeline of middleware to one action.
///
/// `terminal` is the dispatcher at the end of the chain (in the store, the
/// reducer invocation). With an empty pipeline the action goes straight to
/// the terminal.
pub fn run_pipeline<A, M>(pipeline: &[M], action: A, terminal: &mut dyn FnMut(A))
where
    M: std::ops::Deref,
    M::Target: Middleware<A>,
{
    match pipeline.split_first() {
        None => terminal(action),
        Some((head, rest)) => {
            head.handle(action, &mut |a| run_pipeline(rest, a, terminal));
        }
    }
}

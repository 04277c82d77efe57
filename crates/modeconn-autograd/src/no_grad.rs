//! No-Grad Context - Disable Gradient Computation
//!
//! Provides context managers for temporarily disabling gradient computation.
//! This is essential for inference, evaluation, and parts of training that
//! don't need gradients (like updating running statistics in `BatchNorm`).
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use std::cell::Cell;

// =============================================================================
// Thread-Local Gradient State
// =============================================================================

thread_local! {
    /// Whether gradient computation is enabled for this thread.
    static GRAD_ENABLED: Cell<bool> = const { Cell::new(true) };

    /// Stack depth for nested no_grad contexts.
    static NO_GRAD_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Returns whether gradient computation is currently enabled.
#[must_use] pub fn is_grad_enabled() -> bool {
    GRAD_ENABLED.with(std::cell::Cell::get)
}

/// Sets whether gradient computation is enabled.
fn set_grad_enabled(enabled: bool) {
    GRAD_ENABLED.with(|g| g.set(enabled));
}

// =============================================================================
// NoGradGuard
// =============================================================================

/// RAII guard that disables gradient computation within its scope.
///
/// When the guard is dropped, gradient computation is restored to its
/// previous state. Guards can be nested safely.
///
/// # Example
/// ```rust,ignore
/// use modeconn_autograd::NoGradGuard;
///
/// {
///     let _guard = NoGradGuard::new();
///     // Gradient computation is disabled here
///     let y = x.relu();  // No gradient tracking
/// }
/// // Gradient computation is re-enabled here
/// ```
pub struct NoGradGuard {
    prev_state: bool,
}

impl NoGradGuard {
    /// Creates a new `NoGradGuard`, disabling gradient computation.
    #[must_use] pub fn new() -> Self {
        let prev_state = is_grad_enabled();
        set_grad_enabled(false);
        NO_GRAD_DEPTH.with(|d| d.set(d.get() + 1));
        Self { prev_state }
    }
}

impl Drop for NoGradGuard {
    fn drop(&mut self) {
        NO_GRAD_DEPTH.with(|d| d.set(d.get() - 1));
        // Only restore if we're at the outermost guard
        if NO_GRAD_DEPTH.with(std::cell::Cell::get) == 0 {
            set_grad_enabled(self.prev_state);
        }
    }
}

impl Default for NoGradGuard {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Convenience Functions
// =============================================================================

/// Executes a closure with gradient computation disabled.
///
/// # Example
/// ```rust,ignore
/// use modeconn_autograd::no_grad;
///
/// let output = no_grad(|| {
///     model.forward(&input)
/// });
/// ```
pub fn no_grad<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = NoGradGuard::new();
    f()
}

// =============================================================================
// Tests
// =============================================================================

//! Navigation seam used for post-login landing and forced logout

/// Moves the user to another view
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Logs navigation requests; used where there is no view to switch
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn navigate(&self, path: &str) {
        tracing::info!(%path, "navigate");
    }
}

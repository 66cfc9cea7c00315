/// ProgressReporter port for user-facing progress during long operations
///
/// Diagnostics go through `tracing`; this port is for the human watching a
/// batch being dispatched or a catalog being loaded.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, message: &str);

    /// Reports progress as `current` out of `total`
    fn report_progress(&self, current: usize, total: usize, message: Option<&str>);

    /// Reports an error or warning message
    fn report_error(&self, message: &str);

    fn report_completion(&self, message: &str);
}

/// Type alias for Result with anyhow::Error as the error type.
/// Domain failures are raised as [`crate::shared::OpenlcsError`] and carried inside.
pub type Result<T> = std::result::Result<T, anyhow::Error>;

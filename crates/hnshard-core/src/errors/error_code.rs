//! ErrorCode trait for the controller boundary.

/// Every error enum implements this to give the external controller a
/// stable, machine-readable classification independent of the message text.
pub trait ErrorCode {
    /// Returns the error code string (e.g., "SHARD_UNAVAILABLE").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

// Error code constants.
pub const CATALOG_ERROR: &str = "CATALOG_ERROR";
pub const SHARD_UNAVAILABLE: &str = "SHARD_UNAVAILABLE";
pub const POOL_CLOSED: &str = "POOL_CLOSED";
pub const INVALID_QUERY: &str = "INVALID_QUERY";
pub const CANCELLED: &str = "CANCELLED";
pub const ALL_SHARDS_UNAVAILABLE: &str = "ALL_SHARDS_UNAVAILABLE";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";

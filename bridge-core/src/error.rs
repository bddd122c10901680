use thiserror::Error;

/// Errors raised by the bridge core and its collaborators.
///
/// Failures local to one event or one destination are logged and swallowed at
/// the call site; only lifecycle failures travel back to the requesting user.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Delivery to channel {channel_id} failed: {reason}")]
    Delivery { channel_id: i64, reason: String },

    #[error("Relay to game console failed: {0}")]
    Relay(String),

    #[error("Server control error: {0}")]
    Control(#[from] ControlError),

    #[error("Database error: {0}")]
    Database(String),
}

/// Errors from the external process/container control capability.
#[derive(Error, Debug)]
pub enum ControlError {
    /// Restart/status/log-stream requested against a container that does not
    /// exist. Reported to the requester; no state change.
    #[error("Server container '{0}' not found")]
    TargetMissing(String),

    #[error("Container API error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, BridgeError>;

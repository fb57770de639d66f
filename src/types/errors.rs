//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation and provide
//! clear error messages with context.

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// JSON-RPC: invalid JSON was received.
pub const RPC_PARSE_ERROR: i64 = -32700;
/// JSON-RPC: the JSON sent is not a valid request object.
pub const RPC_INVALID_REQUEST: i64 = -32600;
/// JSON-RPC: the method does not exist.
pub const RPC_METHOD_NOT_FOUND: i64 = -32601;
/// JSON-RPC: invalid method parameters.
pub const RPC_INVALID_PARAMS: i64 = -32602;
/// JSON-RPC: internal error.
pub const RPC_INTERNAL_ERROR: i64 = -32603;

/// Main error enum for the ActionKit bridge.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or malformed configuration, including the signing key.
    /// Fatal: no tool can exist without it.
    #[error("configuration error: {0}")]
    Config(String),

    /// The action catalog could not be retrieved. Covers non-2xx responses,
    /// network errors and malformed bodies alike.
    #[error("catalog fetch failed: {0}")]
    Fetch(String),

    /// A property declared a type outside the supported kinds.
    #[error("unsupported type '{declared}' for property '{property}' of action '{action}'")]
    UnsupportedType {
        action: String,
        property: String,
        declared: String,
    },

    /// Tool set construction failed.
    #[error("tool set build failed: {0}")]
    Build(String),

    /// Arguments or descriptors failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Unknown tool or method.
    #[error("not found: {0}")]
    NotFound(String),

    /// The execution endpoint answered with a non-success status.
    #[error("action '{action}' rejected with status {status}: {body}")]
    InvocationRejected {
        action: String,
        status: u16,
        body: String,
    },

    /// The execution endpoint could not be reached or answered with an
    /// undecodable body.
    #[error("action '{action}' transport failure: {message}")]
    InvocationTransport { action: String, message: String },

    /// I/O errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this is a call-time failure of the remote action.
    pub fn is_invocation_failure(&self) -> bool {
        matches!(
            self,
            Error::InvocationRejected { .. } | Error::InvocationTransport { .. }
        )
    }

    /// Whether this failure aborts tool set construction.
    pub fn is_build_failure(&self) -> bool {
        matches!(self, Error::Build(_) | Error::UnsupportedType { .. })
    }

    /// Convert to a JSON-RPC error code.
    pub fn to_rpc_code(&self) -> i64 {
        match self {
            Error::Validation(_) | Error::UnsupportedType { .. } => RPC_INVALID_PARAMS,
            Error::NotFound(_) => RPC_METHOD_NOT_FOUND,
            Error::Config(_)
            | Error::Fetch(_)
            | Error::Build(_)
            | Error::InvocationRejected { .. }
            | Error::InvocationTransport { .. }
            | Error::Io(_) => RPC_INTERNAL_ERROR,
        }
    }
}

// Convenience constructors
impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    pub fn build(msg: impl Into<String>) -> Self {
        Self::Build(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn unsupported_type(
        action: impl Into<String>,
        property: impl Into<String>,
        declared: impl Into<String>,
    ) -> Self {
        Self::UnsupportedType {
            action: action.into(),
            property: property.into(),
            declared: declared.into(),
        }
    }
}

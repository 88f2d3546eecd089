//! Error types for `FsmLens`

use thiserror::Error;

/// The error type for `FsmLens` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file or buffer operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unexpected end of data while reading an asset or parameter.
    #[error("unexpected end of data")]
    UnexpectedEof,

    // ==================== Asset Store Errors ====================
    /// The referenced container is not loaded in the store.
    #[error("container {container} not found")]
    ContainerNotFound {
        /// The container handle that was requested.
        container: usize,
    },

    /// The object could not be found in its container.
    #[error("asset not found: file {file_id}, path {path_id}")]
    AssetNotFound {
        /// Local file index of the reference.
        file_id: i32,
        /// Object id inside the file.
        path_id: i64,
    },

    /// Neither the type tree nor the class database describe the type.
    #[error("no schema for class id {class_id}")]
    SchemaNotFound {
        /// Unity class id of the object.
        class_id: i32,
    },

    /// A schema exists but does not have the expected shape.
    #[error("malformed schema: {0}")]
    MalformedSchema(String),

    /// A field looked up by name does not exist in a parsed value.
    #[error("field not found: {0}")]
    FieldNotFound(String),

    // ==================== Decode Errors ====================
    /// A read ran past the parameter's declared byte range.
    #[error("read of {len} bytes at {offset} exceeds declared range of {declared} bytes")]
    ParamOverrun {
        /// Offset inside the parameter's byte range.
        offset: usize,
        /// Number of bytes requested.
        len: usize,
        /// Declared byte length of the parameter.
        declared: usize,
    },

    /// A parameter's byte range lies outside the raw byte buffer.
    #[error("parameter range {start}..{end} outside byte data of {len} bytes")]
    ParamOutOfBounds {
        /// Start of the declared range.
        start: usize,
        /// End of the declared range.
        end: usize,
        /// Length of the raw byte buffer.
        len: usize,
    },

    /// A side-table index is out of range.
    #[error("{table} index {index} out of range (len {len})")]
    SideTableIndex {
        /// The side-table that was indexed.
        table: &'static str,
        /// The requested position.
        index: i64,
        /// Number of entries in the side-table.
        len: usize,
    },

    /// A parallel parameter array is shorter than the parameter cursor.
    #[error("parameter index {0} out of range")]
    ParamIndex(usize),

    /// The override name of a generation-1 wrapper would have a negative length.
    #[error("override name length negative: declared {declared} bytes, consumed {consumed}")]
    NegativeNameLength {
        /// Declared byte length of the parameter.
        declared: usize,
        /// Bytes already consumed by the payload and use-variable flag.
        consumed: usize,
    },

    /// The parameter type tag is not decodable.
    #[error("{0} not implemented")]
    UnsupportedParamType(String),

    /// A negative element count was read.
    #[error("invalid element count: {0}")]
    InvalidCount(i64),

    // ==================== Parsing Errors ====================
    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// UTF-8 conversion error.
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    /// Invalid format error.
    #[error("invalid format: {0}")]
    InvalidFormat(String),
}

impl Error {
    /// Map short reads to [`Error::UnexpectedEof`], keep every other IO error.
    pub(crate) fn from_read(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            Error::UnexpectedEof
        } else {
            Error::Io(err)
        }
    }
}

/// A specialized Result type for `FsmLens` operations.
pub type Result<T> = std::result::Result<T, Error>;

use crate::value::ValueType;
use thiserror::Error;

/// Result type alias using DeltaError
pub type Result<T> = std::result::Result<T, DeltaError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that the presentation layer can
/// match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Values
    TypeMismatch,
    NotOrderable,

    // Navigation / lookup
    IndexOutOfRange,
    NotFound,

    // Correlation
    SchemaMismatch,

    // Arguments / configuration
    InvalidArgument,
    Config,

    // Loader / IO
    Persistence,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::TypeMismatch => "ERR_TYPE_MISMATCH",
            ExErrorKind::NotOrderable => "ERR_NOT_ORDERABLE",
            ExErrorKind::IndexOutOfRange => "ERR_INDEX_OUT_OF_RANGE",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::SchemaMismatch => "ERR_SCHEMA_MISMATCH",
            ExErrorKind::InvalidArgument => "ERR_INVALID_ARGUMENT",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification of a [`DeltaError`] together with the
/// operation and data-source context in which it was raised.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    data_source: Option<String>,
    index: Option<usize>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            data_source: None,
            index: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add data source context (table name or request text)
    pub fn with_data_source(mut self, data_source: impl Into<String>) -> Self {
        self.data_source = Some(data_source.into());
        self
    }

    /// Add index context
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the data source context, if any
    pub fn data_source(&self) -> Option<&str> {
        self.data_source.as_deref()
    }

    /// Get the index context, if any
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(data_source) = &self.data_source {
            write!(f, " (data_source: {})", data_source)?;
        }
        if let Some(index) = self.index {
            write!(f, " (index: {})", index)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for snapshot capture, change computation and navigation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeltaError {
    /// An ordering or type-narrowing operation on an unsupported value type
    #[error(
        "Type mismatch: value is {actual}, expected {}{}",
        type_list(.expected),
        counterpart_suffix(.counterpart)
    )]
    TypeMismatch {
        actual: ValueType,
        expected: Vec<ValueType>,
        /// Type of the other operand when it is the incompatible side
        counterpart: Option<ValueType>,
    },

    /// Numeric value that has no position in the numeric order (NaN)
    #[error("Value is not orderable: {reason}")]
    NotOrderable { reason: String },

    /// Navigation beyond the half-open range `[start, end)`
    #[error("Index {index} out of the limits of {what} [{start}, {end})")]
    IndexOutOfRange {
        what: String,
        index: usize,
        start: usize,
        end: usize,
    },

    /// Lookup by name with no match
    #[error("{what} not found: {name}")]
    NotFound { what: String, name: String },

    /// Same data source and primary key, but different column name sets
    #[error(
        "Column sets differ for {data_source} with primary key {pk}: only at start point {only_at_start:?}, only at end point {only_at_end:?}"
    )]
    SchemaMismatch {
        data_source: String,
        pk: String,
        only_at_start: Vec<String>,
        only_at_end: Vec<String>,
    },

    /// Missing or malformed identifier or literal
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// Failure reported by the external data loader
    #[error("Loading {data_source} failed: {message}")]
    Loader {
        data_source: String,
        message: String,
    },

    /// Configuration could not be parsed or validated
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// Broken internal invariant (e.g. canonical encoding failed)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DeltaError {
    /// Shorthand for an [`DeltaError::IndexOutOfRange`] over `[0, size)`
    pub fn index_out_of_range(what: impl Into<String>, index: usize, size: usize) -> Self {
        DeltaError::IndexOutOfRange {
            what: what.into(),
            index,
            start: 0,
            end: size,
        }
    }

    /// Shorthand for a [`DeltaError::NotFound`]
    pub fn not_found(what: impl Into<String>, name: impl Into<String>) -> Self {
        DeltaError::NotFound {
            what: what.into(),
            name: name.into(),
        }
    }

    /// Shorthand for a [`DeltaError::InvalidArgument`]
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        DeltaError::InvalidArgument {
            reason: reason.into(),
        }
    }
}

fn type_list(types: &[ValueType]) -> String {
    let names: Vec<String> = types.iter().map(|t| t.to_string()).collect();
    if names.len() == 1 {
        names.join("")
    } else {
        format!("one of [{}]", names.join(", "))
    }
}

fn counterpart_suffix(counterpart: &Option<ValueType>) -> String {
    match counterpart {
        Some(t) => format!(" (compared against {})", t),
        None => String::new(),
    }
}

impl From<DeltaError> for ExError {
    fn from(err: DeltaError) -> Self {
        let message = err.to_string();
        match err {
            DeltaError::TypeMismatch { .. } => {
                ExError::new(ExErrorKind::TypeMismatch).with_message(message)
            }
            DeltaError::NotOrderable { .. } => {
                ExError::new(ExErrorKind::NotOrderable).with_message(message)
            }
            DeltaError::IndexOutOfRange { index, .. } => ExError::new(ExErrorKind::IndexOutOfRange)
                .with_index(index)
                .with_message(message),
            DeltaError::NotFound { .. } => ExError::new(ExErrorKind::NotFound).with_message(message),
            DeltaError::SchemaMismatch { data_source, .. } => {
                ExError::new(ExErrorKind::SchemaMismatch)
                    .with_data_source(data_source)
                    .with_message(message)
            }
            DeltaError::InvalidArgument { .. } => {
                ExError::new(ExErrorKind::InvalidArgument).with_message(message)
            }
            DeltaError::Loader { data_source, .. } => ExError::new(ExErrorKind::Persistence)
                .with_data_source(data_source)
                .with_message(message),
            DeltaError::Config { .. } => ExError::new(ExErrorKind::Config).with_message(message),
            DeltaError::Internal { .. } => ExError::new(ExErrorKind::Internal).with_message(message),
        }
    }
}

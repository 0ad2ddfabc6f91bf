/// Decode errors for cell values, composite literals and array literals
///
/// Every decoder fails fast. As an error unwinds through nested decoders it is
/// wrapped in [`DecodeError::Context`] so the final message reads like a path,
/// e.g. `organization_memberships: element 2: metadata: invalid owner_id ""`.
/// [`DecodeError::root_cause`] peels the wrapping off again.

use thiserror::Error;

/// Decoding errors
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Cell is neither text nor bytes
    #[error("invalid type: expected text or bytes, found {found}")]
    InvalidType { found: &'static str },

    /// Byte cell is not valid UTF-8
    #[error("invalid utf-8 in byte cell: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// Composite literal is not enclosed in parentheses or has an unterminated quote
    #[error("malformed composite literal: {0}")]
    MalformedComposite(String),

    /// Array literal is not a one-dimensional braced list
    #[error("malformed array literal: {0}")]
    MalformedArray(String),

    /// Composite literal has the wrong number of fields
    #[error("invalid field count: expected {expected}, found {found}")]
    InvalidFieldCount { expected: usize, found: usize },

    /// Mandatory timestamp field failed to parse
    #[error("error parsing {field}: {value:?}")]
    TimestampParse { field: &'static str, value: String },

    #[error("invalid owner_id {0:?}")]
    InvalidOwnerId(String),

    #[error("invalid user_id {0:?}")]
    InvalidUserId(String),

    #[error("invalid organization_id {0:?}")]
    InvalidOrganizationId(String),

    #[error("invalid team_id {0:?}")]
    InvalidTeamId(String),

    #[error("invalid payment_plan_id {0:?}")]
    InvalidPaymentPlanId(String),

    /// Role field is empty
    #[error("invalid role: must not be empty")]
    InvalidRole,

    /// Numeric field failed to parse
    #[error("invalid {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    /// Row does not carry the requested column
    #[error("missing column: {0}")]
    MissingColumn(String),

    /// Inner error wrapped with the entity or field being decoded
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    /// Wraps this error with positional or entity context
    pub fn context(self, context: impl Into<String>) -> Self {
        DecodeError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping every `Context` layer
    pub fn root_cause(&self) -> &DecodeError {
        let mut current = self;
        while let DecodeError::Context { source, .. } = current {
            current = source;
        }
        current
    }
}

/// Adds `.context(..)` to decode results
pub trait DecodeResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T, DecodeError>;

    fn with_context<C, F>(self, f: F) -> Result<T, DecodeError>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T> DecodeResultExt<T> for Result<T, DecodeError> {
    fn context(self, context: impl Into<String>) -> Result<T, DecodeError> {
        self.map_err(|e| e.context(context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, DecodeError>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|e| e.context(f()))
    }
}

//! Error types for the gridshape crate.

use thiserror::Error;

/// Errors raised while computing or formatting cell values.
///
/// Filter resolution never produces these: an unknown operator or an
/// unparseable filter value simply means no filtering happens.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    /// A value function walked through a missing intermediate value.
    ///
    /// [`Column::value_for`](crate::Column::value_for) renders this as an
    /// empty cell instead of failing.
    #[error("missing value in member path")]
    MissingValue,

    /// A value function failed to parse its input.
    #[error("parse error: {0}")]
    Parse(String),

    /// The column format template is malformed.
    #[error("invalid format template '{template}': {reason}")]
    InvalidFormat { template: String, reason: String },

    /// Configuration names a column the grid does not have.
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    /// Failure raised by host code inside a value function.
    #[error("{0}")]
    Custom(String),
}

impl GridError {
    pub(crate) fn invalid_format(template: &str, reason: impl Into<String>) -> Self {
        GridError::InvalidFormat {
            template: template.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<std::num::ParseIntError> for GridError {
    fn from(err: std::num::ParseIntError) -> Self {
        GridError::Parse(err.to_string())
    }
}

impl From<std::num::ParseFloatError> for GridError {
    fn from(err: std::num::ParseFloatError) -> Self {
        GridError::Parse(err.to_string())
    }
}

impl From<std::str::ParseBoolError> for GridError {
    fn from(err: std::str::ParseBoolError) -> Self {
        GridError::Parse(err.to_string())
    }
}

impl From<chrono::ParseError> for GridError {
    fn from(err: chrono::ParseError) -> Self {
        GridError::Parse(err.to_string())
    }
}

/// Result type for gridshape operations.
pub type Result<T> = std::result::Result<T, GridError>;

/// Turns an absent intermediate into [`GridError::MissingValue`].
///
/// Value functions use this to walk optional member paths with `?`:
///
/// ```
/// use gridshape::{OptionExt, Result};
///
/// struct Address { city: Option<String> }
/// struct User { address: Option<Address> }
///
/// fn city_len(user: &User) -> Result<usize> {
///     let address = user.address.as_ref().or_missing()?;
///     Ok(address.city.as_ref().or_missing()?.len())
/// }
///
/// assert!(city_len(&User { address: None }).is_err());
/// ```
pub trait OptionExt<T> {
    /// Returns the contained value or [`GridError::MissingValue`].
    fn or_missing(self) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn or_missing(self) -> Result<T> {
        self.ok_or(GridError::MissingValue)
    }
}

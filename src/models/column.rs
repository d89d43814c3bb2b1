//! Column model for the SDK

use serde::{Deserialize, Serialize};

/// Column model representing one declared column of a table
///
/// TMDL column declarations carry no reliable type on the declaration line,
/// so a column is identified by name only. Names are stored unquoted.
///
/// # Example
///
/// ```rust
/// use tmdl_er_sdk::models::Column;
///
/// let column = Column::new("Order Date");
/// assert!(!column.calculated);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Column {
    /// Column name without quote delimiters
    pub name: String,
    /// Whether the declaration carries an inline expression (`column X = ...`)
    #[serde(default)]
    pub calculated: bool,
}

impl Column {
    /// Create a new physical column
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            calculated: false,
        }
    }

    /// Create a column defined by an inline expression
    pub fn calculated(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            calculated: true,
        }
    }
}

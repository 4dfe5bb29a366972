//! Core category domain types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::{TransactionType, UserId, ValidationError, database_id::CategoryId};

/// A validated, non-empty category name.
///
/// Names are matched exactly and case-sensitively when resolving a category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// This function will return a [ValidationError::EmptyCategoryName] if `name` is empty
    /// or only whitespace.
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        let name = name.trim();

        if name.is_empty() {
            Err(ValidationError::EmptyCategoryName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The glyph displayed next to a category, a single grapheme such as "🍔".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryIcon(String);

impl CategoryIcon {
    /// Create an icon from a single grapheme cluster.
    ///
    /// Multi-codepoint emoji such as flags or skin tone variants count as one
    /// grapheme.
    ///
    /// # Errors
    ///
    /// Returns a [ValidationError::InvalidIcon] if `icon` is empty or has more
    /// than one grapheme.
    pub fn new(icon: &str) -> Result<Self, ValidationError> {
        let icon = icon.trim();

        if icon.graphemes(true).count() == 1 {
            Ok(Self(icon.to_owned()))
        } else {
            Err(ValidationError::InvalidIcon(icon.to_owned()))
        }
    }

    /// Create an icon without validation.
    pub fn new_unchecked(icon: &str) -> Self {
        Self(icon.to_owned())
    }
}

impl AsRef<str> for CategoryIcon {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A user's category, e.g. "Salary" (income) or "Groceries" (expense).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The user that owns the category.
    pub user_id: UserId,
    /// The name of the category, unique per user.
    pub name: CategoryName,
    /// The icon displayed alongside the category.
    pub icon: CategoryIcon,
    /// Whether the category is for income or expenses.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

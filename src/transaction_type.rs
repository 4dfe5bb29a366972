//! Whether money was earned or spent.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::{Money, ValidationError};

/// The direction of a transaction. Categories are also scoped to one type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned, e.g. a salary payment.
    Income,
    /// Money spent, e.g. groceries.
    Expense,
}

impl TransactionType {
    /// The name used for this type in requests and in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Split `amount` into `(income, expense)` according to this type.
    ///
    /// The field that does not match the type is always zero.
    pub fn split_amount(self, amount: Money) -> (Money, Money) {
        match self {
            Self::Income => (amount, Money::ZERO),
            Self::Expense => (Money::ZERO, amount),
        }
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    /// Parse a transaction type. Only the exact lowercase names are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(ValidationError::InvalidTransactionType(other.to_owned())),
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

#[cfg(test)]
mod tests {
    use crate::{Money, TransactionType, ValidationError};

    #[test]
    fn parses_exact_names() {
        assert_eq!("income".parse(), Ok(TransactionType::Income));
        assert_eq!("expense".parse(), Ok(TransactionType::Expense));
    }

    #[test]
    fn rejects_other_spellings() {
        for input in ["Income", "EXPENSE", "", "transfer", " income"] {
            assert_eq!(
                input.parse::<TransactionType>(),
                Err(ValidationError::InvalidTransactionType(input.to_owned())),
                "input {input:?} should be rejected"
            );
        }
    }

    #[test]
    fn split_amount_only_fills_matching_side() {
        let amount = Money::from_cents(1250);

        assert_eq!(TransactionType::Income.split_amount(amount), (amount, Money::ZERO));
        assert_eq!(TransactionType::Expense.split_amount(amount), (Money::ZERO, amount));
    }
}

use crate::error::LedgerError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type EntryId = u32;

/// A whole-percent share, e.g. `20` for 20%.
pub type Percentage = u32;

/// The two-valued classification of an entry. Income and expense entries
/// live in separate sequences with independent id spaces.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
}

impl FromStr for EntryKind {
    type Err = LedgerError;

    /// Accepts the short wire form (`inc`/`exp`) used by delete targets as
    /// well as the long form. Anything else is an integration error from the
    /// caller, reported as [`LedgerError::InvalidKind`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inc" | "income" => Ok(Self::Income),
            "exp" | "expense" => Ok(Self::Expense),
            other => Err(LedgerError::InvalidKind(other.to_string())),
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => f.write_str("income"),
            Self::Expense => f.write_str("expense"),
        }
    }
}

/// A non-negative monetary amount.
///
/// Wrapper around `rust_decimal::Decimal` so that a negative value can never
/// reach the ledger; zero is allowed.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(value: Decimal) -> Result<Self, LedgerError> {
        if value >= Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(LedgerError::InvalidCommand(
                "amount must be non-negative".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = LedgerError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// `part` as a whole percent of `whole`, rounded half away from zero, or
/// `None` when `whole` is not positive. Never divides by zero.
pub(crate) fn share_of(part: Decimal, whole: Decimal) -> Option<Percentage> {
    if whole > Decimal::ZERO {
        let percent = (part / whole * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        // Saturate rather than alias an out-of-range share with the
        // zero-income `None`.
        Some(percent.to_u32().unwrap_or(Percentage::MAX))
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncomeEntry {
    pub id: EntryId,
    pub description: String,
    pub amount: Amount,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseEntry {
    pub id: EntryId,
    pub description: String,
    pub amount: Amount,
    /// Share of total income, refreshed by the percentage pass. `None` until
    /// first computed and whenever total income is zero.
    pub share: Option<Percentage>,
}

impl ExpenseEntry {
    pub(crate) fn update_share(&mut self, income_total: Decimal) {
        self.share = share_of(self.amount.value(), income_total);
    }
}

/// A single ledger record, returned by the add and delete operations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Entry {
    Income(IncomeEntry),
    Expense(ExpenseEntry),
}

impl Entry {
    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Income(_) => EntryKind::Income,
            Self::Expense(_) => EntryKind::Expense,
        }
    }

    pub fn id(&self) -> EntryId {
        match self {
            Self::Income(entry) => entry.id,
            Self::Expense(entry) => entry.id,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Self::Income(entry) => &entry.description,
            Self::Expense(entry) => &entry.description,
        }
    }

    pub fn amount(&self) -> Amount {
        match self {
            Self::Income(entry) => entry.amount,
            Self::Expense(entry) => entry.amount,
        }
    }
}

use crate::domain::entry::{Amount, Entry, EntryId, EntryKind};
use crate::domain::ledger::Ledger;
use crate::domain::ports::BudgetView;
use crate::error::Result;
use tracing::{debug, warn};

/// A validated mutation request, as produced by an input adapter. The
/// adapter has already checked the description, amount, and kind; the
/// orchestrator only routes.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add {
        kind: EntryKind,
        description: String,
        amount: Amount,
    },
    Delete {
        kind: EntryKind,
        id: EntryId,
    },
}

/// Drives the mutate, recompute, present cycle over one ledger and one view.
///
/// Each applied command performs exactly one ledger mutation, one aggregate
/// recompute, one expense-share recompute, and one view refresh, in that
/// order. Everything is synchronous; a mutation is never observable without
/// its recompute.
pub struct Orchestrator<V> {
    ledger: Ledger,
    view: V,
}

impl<V: BudgetView> Orchestrator<V> {
    pub fn new(view: V) -> Self {
        Self {
            ledger: Ledger::new(),
            view,
        }
    }

    /// Applies one command. Returns whether the ledger changed: a delete
    /// aimed at an id that is no longer present is a no-op, logged and
    /// reported as `false` rather than an error.
    pub fn apply(&mut self, command: Command) -> Result<bool> {
        match command {
            Command::Add {
                kind,
                description,
                amount,
            } => {
                let entry = self.ledger.add_entry(kind, description, amount);
                debug!(%kind, id = entry.id(), "added entry");
                self.recompute();
                self.view.entry_added(&entry)?;
                self.present()?;
                Ok(true)
            }
            Command::Delete { kind, id } => match self.ledger.delete_entry(kind, id) {
                Some(removed) => {
                    debug!(%kind, id, "deleted entry");
                    self.recompute();
                    self.view.entry_removed(removed.kind(), removed.id())?;
                    self.present()?;
                    Ok(true)
                }
                None => {
                    warn!(%kind, id, "delete target not found");
                    Ok(false)
                }
            },
        }
    }

    fn recompute(&mut self) {
        self.ledger.recompute_aggregates();
        self.ledger.recompute_expense_shares();
    }

    fn present(&mut self) -> Result<()> {
        self.view.totals_changed(&self.ledger.totals())?;
        self.view.shares_changed(&self.ledger.expense_shares())
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn into_parts(self) -> (Ledger, V) {
        (self.ledger, self.view)
    }
}

use super::entry::{Entry, EntryId, EntryKind, Percentage};
use super::ledger::Totals;
use crate::error::Result;

/// Presentation port driven by the orchestrator after every mutation cycle.
///
/// Implementations receive derived views only (the new or removed entry, the
/// totals snapshot, the positional share sequence), never the ledger itself.
/// The share sequence is positional: index `i` belongs to the `i`-th expense
/// entry currently held.
pub trait BudgetView {
    fn entry_added(&mut self, entry: &Entry) -> Result<()>;
    fn entry_removed(&mut self, kind: EntryKind, id: EntryId) -> Result<()>;
    fn totals_changed(&mut self, totals: &Totals) -> Result<()>;
    fn shares_changed(&mut self, shares: &[Option<Percentage>]) -> Result<()>;
}

use crate::domain::entry::{Entry, EntryId, EntryKind, ExpenseEntry, IncomeEntry, Percentage};
use crate::domain::ledger::Totals;
use crate::domain::ports::BudgetView;
use crate::error::Result;
use chrono::Local;
use rust_decimal::{Decimal, RoundingStrategy};
use std::io::Write;

/// Formats an amount the way the budget list shows it: a sign taken from the
/// entry kind, thousands separators, two decimals. `1234.5` as income
/// becomes `+ 1,234.50`; `54.687` as expense becomes `- 54.69`.
pub fn format_amount(value: Decimal, kind: EntryKind) -> String {
    let sign = match kind {
        EntryKind::Income => '+',
        EntryKind::Expense => '-',
    };
    let rounded = value
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{sign} {}", group_thousands(&format!("{rounded:.2}")))
}

/// `20` becomes `20%`; an undefined share becomes `---`.
pub fn format_share(share: Option<Percentage>) -> String {
    match share {
        Some(value) => format!("{value}%"),
        None => "---".to_string(),
    }
}

fn group_thousands(number: &str) -> String {
    let (ints, frac) = number.split_once('.').unwrap_or((number, ""));
    let mut grouped = String::with_capacity(number.len() + ints.len() / 3);
    for (i, ch) in ints.chars().enumerate() {
        if i > 0 && (ints.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if frac.is_empty() {
        grouped
    } else {
        format!("{grouped}.{frac}")
    }
}

fn totals_line(totals: &Totals) -> String {
    // The balance borrows the income sign while non-negative.
    let balance_kind = if totals.balance >= Decimal::ZERO {
        EntryKind::Income
    } else {
        EntryKind::Expense
    };
    format!(
        "balance {} | income {} | expenses {} | spent {}",
        format_amount(totals.balance, balance_kind),
        format_amount(totals.income_total, EntryKind::Income),
        format_amount(totals.expense_total, EntryKind::Expense),
        format_share(totals.spent),
    )
}

/// Renders the running budget as plain text: one line per view event while
/// commands stream through, plus a final itemized report. Only ever handed
/// derived views, never the ledger.
pub struct ReportWriter<W: Write> {
    out: W,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// The month heading the original interface showed, e.g. `August 2026`.
    pub fn write_heading(&mut self) -> Result<()> {
        writeln!(self.out, "Budget for {}", Local::now().format("%B %Y"))?;
        Ok(())
    }

    /// The itemized closing report: both entry lists and the totals line.
    pub fn write_report(
        &mut self,
        incomes: &[IncomeEntry],
        expenses: &[ExpenseEntry],
        totals: &Totals,
    ) -> Result<()> {
        writeln!(self.out, "income")?;
        for entry in incomes {
            writeln!(
                self.out,
                "  {} {} {}",
                entry.id,
                entry.description,
                format_amount(entry.amount.value(), EntryKind::Income),
            )?;
        }
        writeln!(self.out, "expenses")?;
        for entry in expenses {
            writeln!(
                self.out,
                "  {} {} {} ({})",
                entry.id,
                entry.description,
                format_amount(entry.amount.value(), EntryKind::Expense),
                format_share(entry.share),
            )?;
        }
        writeln!(self.out, "{}", totals_line(totals))?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> BudgetView for ReportWriter<W> {
    fn entry_added(&mut self, entry: &Entry) -> Result<()> {
        writeln!(
            self.out,
            "added {}-{} {} {}",
            entry.kind(),
            entry.id(),
            entry.description(),
            format_amount(entry.amount().value(), entry.kind()),
        )?;
        Ok(())
    }

    fn entry_removed(&mut self, kind: EntryKind, id: EntryId) -> Result<()> {
        writeln!(self.out, "removed {kind}-{id}")?;
        Ok(())
    }

    fn totals_changed(&mut self, totals: &Totals) -> Result<()> {
        writeln!(self.out, "{}", totals_line(totals))?;
        Ok(())
    }

    fn shares_changed(&mut self, shares: &[Option<Percentage>]) -> Result<()> {
        if shares.is_empty() {
            return Ok(());
        }
        let rendered: Vec<String> = shares.iter().map(|share| format_share(*share)).collect();
        writeln!(self.out, "shares {}", rendered.join(", "))?;
        Ok(())
    }
}

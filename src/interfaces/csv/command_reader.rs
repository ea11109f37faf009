use crate::application::orchestrator::Command;
use crate::domain::entry::{Amount, EntryId, EntryKind};
use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// One row of a command CSV, before validation. Which fields must be
/// present depends on `op`: adds carry kind/description/amount, deletes
/// carry a composite `<kind>-<id>` target.
#[derive(Debug, Deserialize)]
struct RawCommand {
    op: String,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    amount: Option<Decimal>,
    #[serde(default)]
    target: Option<String>,
}

fn validate(raw: RawCommand) -> Result<Command> {
    match raw.op.as_str() {
        "add" => {
            let kind = raw.kind.as_deref().unwrap_or_default().parse::<EntryKind>()?;
            let description = raw.description.unwrap_or_default();
            if description.is_empty() {
                return Err(LedgerError::InvalidCommand(
                    "add requires a description".to_string(),
                ));
            }
            let amount = raw
                .amount
                .ok_or_else(|| LedgerError::InvalidCommand("add requires an amount".to_string()))?;
            Ok(Command::Add {
                kind,
                description,
                amount: Amount::new(amount)?,
            })
        }
        "delete" => {
            let target = raw.target.ok_or_else(|| {
                LedgerError::InvalidCommand("delete requires a target".to_string())
            })?;
            parse_target(&target)
        }
        other => Err(LedgerError::InvalidCommand(format!("unknown op {other:?}"))),
    }
}

/// Parses the composite `<kind>-<id>` token delete rows carry, e.g. `exp-3`.
fn parse_target(token: &str) -> Result<Command> {
    let malformed = || LedgerError::InvalidCommand(format!("malformed delete target {token:?}"));
    let (kind, id) = token.split_once('-').ok_or_else(malformed)?;
    let kind = kind.parse::<EntryKind>()?;
    let id = id.parse::<EntryId>().map_err(|_| malformed())?;
    Ok(Command::Delete { kind, id })
}

/// Reads ledger commands from a CSV source.
///
/// Wraps `csv::Reader` and yields an iterator of `Result<Command>`, with
/// whitespace trimming and flexible record lengths so delete rows may leave
/// the add-only columns empty.
pub struct CommandReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CommandReader<R> {
    /// Creates a new `CommandReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads, deserializes, and validates
    /// commands. A bad row yields an `Err` without stopping the stream.
    pub fn commands(self) -> impl Iterator<Item = Result<Command>> {
        self.reader
            .into_deserialize()
            .map(|result: std::result::Result<RawCommand, csv::Error>| {
                result.map_err(LedgerError::from).and_then(validate)
            })
    }
}

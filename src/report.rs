use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::slice;

use crate::{Amount, Record};

/// The file a report is written to when no other path is given
pub const DEFAULT_REPORT_PATH: &str = "expense_report.txt";

/// The column header of a listing
pub const LIST_HEADER: &str = "ID   Date       Category       Amount  Description";

/// The line drawn between the listing header and its rows
pub const LIST_SEPARATOR: &str = "------------------------------------------------------------";

const REPORT_TITLE: &str = "Expense Report";
const REPORT_SEPARATOR: &str = "========================================";
const SUMMARY_SEPARATOR: &str = "------------------------------";

/// A printable view of the ledger
#[derive(Debug)]
pub enum Listing<'a> {
    /// The ledger holds no records
    Empty,
    /// The formatted rows in ledger order
    Rows(ListRows<'a>),
}

/// An iterator over the formatted rows of a listing
#[derive(Debug)]
pub struct ListRows<'a> {
    records: slice::Iter<'a, Record>,
}

impl<'a> Iterator for ListRows<'a> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.records.next().map(|record| {
            format!(
                "{:<4} {:<10} {:<12} {:>8}  {}",
                record.id(),
                record.date(),
                record.category(),
                record.amount(),
                record.description(),
            )
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.records.size_hint()
    }
}

impl ExactSizeIterator for ListRows<'_> {}

/// Lists the records of the ledger, one formatted row per record
pub fn list_view(ledger: &[Record]) -> Listing<'_> {
    match ledger {
        [] => Listing::Empty,
        records => Listing::Rows(ListRows { records: records.iter() }),
    }
}

/// Writes the listing of the ledger with its column header
///
/// An empty ledger gets a short notice instead of an empty table.
pub fn write_listing<W: Write>(ledger: &[Record], mut writer: W) -> io::Result<()> {
    match list_view(ledger) {
        Listing::Empty => writeln!(writer, "No expenses recorded yet.")?,
        Listing::Rows(rows) => {
            writeln!(writer, "\n{}", LIST_HEADER)?;
            writeln!(writer, "{}", LIST_SEPARATOR)?;
            for row in rows {
                writeln!(writer, "{}", row)?;
            }
            writeln!(writer)?;
        }
    }

    writer.flush()
}

/// The totals of a ledger
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    total: Amount,
    /// Sorted by descending amount, ties in order of first appearance
    by_category: Vec<(String, Amount)>,
}

impl Summary {
    /// The sum of all amounts
    pub fn total(&self) -> Amount {
        self.total
    }

    /// The summed amount of each category, largest first
    pub fn by_category(&self) -> &[(String, Amount)] {
        &self.by_category
    }

    /// The summed amount of a single category
    pub fn category(&self, name: &str) -> Option<Amount> {
        self.by_category
            .iter()
            .find(|(category, _)| category == name)
            .map(|(_, amount)| *amount)
    }

    /// Whether no category has any records
    pub fn is_empty(&self) -> bool {
        self.by_category.is_empty()
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Expense Summary")?;
        writeln!(f, "{}", SUMMARY_SEPARATOR)?;
        writeln!(f, "Total spent: {}", self.total)?;
        writeln!(f)?;
        writeln!(f, "By category:")?;
        for (category, amount) in &self.by_category {
            writeln!(f, "  {:<12} {:>8}", category, amount)?;
        }

        Ok(())
    }
}

/// Computes the total and the per category totals of the ledger
pub fn summarize(ledger: &[Record]) -> Summary {
    let mut by_category: Vec<(String, Amount)> = Vec::new();
    for record in ledger {
        match by_category.iter_mut().find(|(category, _)| category == record.category()) {
            Some((_, amount)) => *amount = *amount + record.amount(),
            None => by_category.push((record.category().to_owned(), record.amount())),
        }
    }
    // stable, so equal totals stay in order of first appearance
    by_category.sort_by(|(_, a), (_, b)| b.cmp(a));

    Summary {
        total: ledger.iter().map(Record::amount).sum(),
        by_category,
    }
}

/// Writes the text report of the ledger
pub fn write_report<W: Write>(ledger: &[Record], mut writer: W) -> io::Result<()> {
    writeln!(writer, "{}", REPORT_TITLE)?;
    writeln!(writer, "{}", REPORT_SEPARATOR)?;
    for record in ledger {
        writeln!(
            writer,
            "{} | {:<10} | {:>8} | {}",
            record.date(),
            record.category(),
            record.amount(),
            record.description(),
        )?;
    }

    writer.flush()
}

/// Writes the text report of the ledger to `path`, replacing any existing file
pub fn export_report(ledger: &[Record], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_report(ledger, BufWriter::new(file))?;
    log::debug!("exported {} records to {}", ledger.len(), path.display());

    Ok(())
}

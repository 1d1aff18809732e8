use std::io::{BufRead, Write};
use std::path::Path;

use crate::report::{self, DEFAULT_REPORT_PATH};
use crate::record::parse_date;
use crate::{Amount, LedgerStore, RecordDraft, StoreError};

/// The interactive expense tracker
///
/// Reads choices and record fields line by line from `input` and writes all
/// prompts and results to `output`. Bad record input sends the user back to
/// the menu; errors of the ledger itself end the session. Running out of
/// input ends the session like choosing to exit.
pub struct Menu<'a, R, W> {
    store: &'a LedgerStore,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(store: &'a LedgerStore, input: R, output: W) -> Self {
        Self { store, input, output }
    }

    /// Shows the menu until the user exits
    pub fn run(&mut self) -> Result<(), StoreError> {
        loop {
            writeln!(self.output, "\nPersonal Expense Tracker")?;
            writeln!(self.output, "1. Add expense")?;
            writeln!(self.output, "2. View expenses")?;
            writeln!(self.output, "3. Summary")?;
            writeln!(self.output, "4. Export report to text file")?;
            writeln!(self.output, "5. Exit")?;

            let choice = match self.prompt("Choose an option (1-5): ")? {
                Some(choice) => choice,
                None => return Ok(()),
            };
            let proceed = match choice.as_str() {
                "1" => self.add_expense()?,
                "2" => self.view_expenses()?,
                "3" => self.summary()?,
                "4" => self.export_report()?,
                "5" => {
                    writeln!(self.output, "Goodbye.")?;
                    return Ok(());
                }
                _ => {
                    writeln!(self.output, "Invalid option. Try again.")?;
                    true
                }
            };
            if !proceed {
                return Ok(());
            }
        }
    }

    /// Writes the prompt and reads the trimmed answer, `None` once the input is exhausted
    fn prompt(&mut self, text: &str) -> Result<Option<String>, StoreError> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        match self.input.read_line(&mut line)? {
            0 => Ok(None),
            _ => Ok(Some(line.trim().to_owned())),
        }
    }

    fn add_expense(&mut self) -> Result<bool, StoreError> {
        let mut draft = RecordDraft::default();

        draft.date = match self.prompt("Date (YYYY-MM-DD) [leave blank for today]: ")? {
            Some(date) => date,
            None => return Ok(false),
        };
        if !draft.date.is_empty() && parse_date(&draft.date).is_err() {
            return self.invalid_input();
        }
        draft.category = match self.prompt("Category (e.g., Food, Travel, Bills): ")? {
            Some(category) => category,
            None => return Ok(false),
        };
        draft.amount = match self.prompt("Amount: ")? {
            Some(amount) => amount,
            None => return Ok(false),
        };
        if Amount::parse(&draft.amount).is_err() {
            return self.invalid_input();
        }
        draft.description = match self.prompt("Description (optional): ")? {
            Some(description) => description,
            None => return Ok(false),
        };

        match self.store.append(&draft) {
            Ok(_) => writeln!(self.output, "Expense added.")?,
            Err(err) if err.is_input() => return self.invalid_input(),
            Err(err) => return Err(err),
        }

        Ok(true)
    }

    fn invalid_input(&mut self) -> Result<bool, StoreError> {
        writeln!(self.output, "Invalid input. Please try again.")?;

        Ok(true)
    }

    fn view_expenses(&mut self) -> Result<bool, StoreError> {
        let records = self.store.read_all()?;
        report::write_listing(&records, &mut self.output)?;

        Ok(true)
    }

    fn summary(&mut self) -> Result<bool, StoreError> {
        let records = self.store.read_all()?;
        writeln!(self.output, "\n{}", report::summarize(&records))?;

        Ok(true)
    }

    fn export_report(&mut self) -> Result<bool, StoreError> {
        let filename = match self.prompt("Filename (default: expense_report.txt): ")? {
            Some(filename) if filename.is_empty() => DEFAULT_REPORT_PATH.to_owned(),
            Some(filename) => filename,
            None => return Ok(false),
        };

        let records = self.store.read_all()?;
        report::export_report(&records, Path::new(&filename))?;
        writeln!(self.output, "Report exported to {}", filename)?;

        Ok(true)
    }
}

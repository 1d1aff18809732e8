use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;

use expense_tracker::report::DEFAULT_REPORT_PATH;
use expense_tracker::store::DEFAULT_LEDGER_PATH;
use expense_tracker::{LedgerConfig, LedgerStore, Menu, RecordDraft};

/// A cli interface to the personal expense tracker
#[derive(Debug, Parser)]
#[clap(version)]
struct Args {
    /// The path to the expense CSV file
    #[clap(long, env = "EXPENSES_FILE", default_value = DEFAULT_LEDGER_PATH)]
    file: PathBuf,
    /// Starts the interactive menu if omitted
    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// Appends an expense
    Add {
        /// The date as YYYY-MM-DD, today if omitted
        #[clap(long)]
        date: Option<String>,
        /// Misc if omitted
        #[clap(long)]
        category: Option<String>,
        #[clap(long, allow_hyphen_values = true)]
        amount: String,
        #[clap(long)]
        description: Option<String>,
    },
    /// Lists all expenses
    List,
    /// Shows the total and the totals per category
    Summary,
    /// Writes a text report of all expenses
    Export {
        #[clap(default_value = DEFAULT_REPORT_PATH)]
        output: PathBuf,
    },
    /// Starts the interactive menu
    Menu,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let store = LedgerStore::new(LedgerConfig::new(args.file));
    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    match args.command.unwrap_or(Command::Menu) {
        Command::Add { date, category, amount, description } => {
            let draft = RecordDraft {
                date: date.unwrap_or_default(),
                category: category.unwrap_or_default(),
                amount,
                description: description.unwrap_or_default(),
            };
            match store.append(&draft) {
                Ok(record) => writeln!(stdout, "Expense {} added.", record.id())?,
                Err(err) if err.is_input() => anyhow::bail!("Invalid input: {}", err),
                Err(err) => return Err(err.into()),
            }
        }
        Command::List => expense_tracker::write_listing(&store.read_all()?, &mut stdout)?,
        Command::Summary => writeln!(stdout, "{}", expense_tracker::summarize(&store.read_all()?))?,
        Command::Export { output } => {
            expense_tracker::export_report(&store.read_all()?, &output)?;
            writeln!(stdout, "Report exported to {}", output.display())?;
        }
        Command::Menu => {
            let stdin = io::stdin();
            Menu::new(&store, stdin.lock(), stdout).run()?;
        }
    }

    Ok(())
}

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use crate::application::{CategoryConflict, LedgerService, NewTransaction, TransactionOutcome};
use crate::domain::{format_cents, parse_cents};

const PROMPT: &str = "tally> ";

/// One line typed at the session prompt.
#[derive(Parser)]
#[command(name = "tally", no_binary_name = true, disable_version_flag = true)]
struct SessionLine {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Subcommand)]
pub enum SessionCommand {
    /// Category management commands
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Person management commands
    #[command(subcommand)]
    Person(PersonCommands),

    /// Product commands
    #[command(subcommand)]
    Product(ProductCommands),

    /// Transaction commands
    #[command(subcommand)]
    Transaction(TransactionCommands),

    /// Show why the last operation was rejected
    Error,

    /// Show record counts
    Status,

    /// Print the whole ledger as JSON
    Dump,

    /// End the session (all data is discarded)
    #[command(alias = "exit")]
    Quit,
}

#[derive(Subcommand)]
pub enum CategoryCommands {
    /// Add a new category
    Add {
        /// Category name (unique, case-insensitive)
        name: String,
    },

    /// List all categories
    List,
}

#[derive(Subcommand)]
pub enum PersonCommands {
    /// Add a new person
    Add {
        /// Person name (unique, case-insensitive)
        name: String,

        /// Group the person belongs to (repeatable)
        #[arg(short, long = "group")]
        groups: Vec<String>,
    },

    /// List all persons
    List,
}

#[derive(Subcommand)]
pub enum ProductCommands {
    /// List all products
    List,

    /// Show a product with its categories and transactions
    Show {
        /// Product name
        name: String,
    },
}

#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a transaction
    Add {
        /// Product name (created on first use)
        product: String,

        /// Signed amount: negative for expenses (e.g. "-4.00")
        #[arg(short, long, allow_hyphen_values = true)]
        cashflow: String,

        /// Number of units
        #[arg(short, long, default_value_t = 1, allow_hyphen_values = true)]
        quantity: i64,

        /// Date of the transaction (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Category of the product (repeatable)
        #[arg(long = "category")]
        categories: Vec<String>,

        /// Person the product was bought from or sold to (repeatable)
        #[arg(long = "from")]
        from_to: Vec<String>,

        /// Person the transaction was made for (repeatable)
        #[arg(long)]
        why: Vec<String>,
    },

    /// List recorded transactions
    List,
}

/// Whether the session keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Line-oriented interactive front end over a [`LedgerService`].
///
/// Category override prompts read their answer from the same input as commands.
pub struct Session<R, W> {
    service: LedgerService,
    input: R,
    output: W,
    assume_yes: bool,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(service: LedgerService, input: R, output: W) -> Self {
        Self {
            service,
            input,
            output,
            assume_yes: false,
        }
    }

    /// Approve every category override without prompting.
    pub fn with_assume_yes(mut self, assume_yes: bool) -> Self {
        self.assume_yes = assume_yes;
        self
    }

    pub fn service(&self) -> &LedgerService {
        &self.service
    }

    pub fn into_parts(self) -> (LedgerService, W) {
        (self.service, self.output)
    }

    /// Read and execute commands until `quit` or end of input.
    pub fn run(&mut self) -> Result<()> {
        writeln!(
            self.output,
            "Tally session started. Type 'help' for commands, 'quit' to exit."
        )?;

        loop {
            write!(self.output, "{PROMPT}")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                break;
            }

            match self.execute_line(&line) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(err) => writeln!(self.output, "Error: {err:#}")?,
            }
        }
        Ok(())
    }

    /// Parse and execute a single command line.
    pub fn execute_line(&mut self, line: &str) -> Result<Flow> {
        let args = shell_words::split(line).context("Could not split command line")?;
        if args.is_empty() {
            return Ok(Flow::Continue);
        }

        match SessionLine::try_parse_from(args) {
            Ok(parsed) => self.execute(parsed.command),
            Err(err) => {
                // Help output and usage errors alike are shown, never fatal.
                write!(self.output, "{err}")?;
                Ok(Flow::Continue)
            }
        }
    }

    pub fn execute(&mut self, command: SessionCommand) -> Result<Flow> {
        match command {
            SessionCommand::Category(cmd) => self.run_category_command(cmd)?,
            SessionCommand::Person(cmd) => self.run_person_command(cmd)?,
            SessionCommand::Product(cmd) => self.run_product_command(cmd)?,
            SessionCommand::Transaction(cmd) => self.run_transaction_command(cmd)?,

            SessionCommand::Error => match self.service.last_error() {
                Some(err) => writeln!(self.output, "Last error: {err}")?,
                None => writeln!(self.output, "No errors.")?,
            },

            SessionCommand::Status => {
                let stats = self.service.stats();
                writeln!(self.output, "Categories:   {}", stats.category_count)?;
                writeln!(self.output, "Persons:      {}", stats.person_count)?;
                writeln!(self.output, "Products:     {}", stats.product_count)?;
                writeln!(self.output, "Transactions: {}", stats.transaction_count)?;
            }

            SessionCommand::Dump => {
                let json = serde_json::to_string_pretty(&self.service.snapshot())
                    .context("Failed to serialize ledger")?;
                writeln!(self.output, "{json}")?;
            }

            SessionCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn run_category_command(&mut self, cmd: CategoryCommands) -> Result<()> {
        match cmd {
            CategoryCommands::Add { name } => {
                let category = self.service.add_category(&name)?;
                writeln!(self.output, "Added category: {}", category.name)?;
            }
            CategoryCommands::List => {
                let names = self.service.category_names();
                write_name_list(&mut self.output, &names, "No categories found.")?;
            }
        }
        Ok(())
    }

    fn run_person_command(&mut self, cmd: PersonCommands) -> Result<()> {
        match cmd {
            PersonCommands::Add { name, groups } => {
                let person = self.service.add_person_with_categories(&name, groups)?;
                writeln!(self.output, "Added person: {}", person.name)?;
            }
            PersonCommands::List => {
                let names = self.service.person_names();
                write_name_list(&mut self.output, &names, "No persons found.")?;
            }
        }
        Ok(())
    }

    fn run_product_command(&mut self, cmd: ProductCommands) -> Result<()> {
        match cmd {
            ProductCommands::List => {
                let names = self.service.product_names();
                write_name_list(&mut self.output, &names, "No products found.")?;
            }
            ProductCommands::Show { name } => {
                let product = self.service.product(&name)?;
                writeln!(self.output, "Product: {}", product.name)?;
                writeln!(self.output, "  ID:         {}", product.id)?;
                writeln!(self.output, "  Categories: {}", join_or_dash(&product.categories))?;
                for revision in &product.revisions {
                    writeln!(
                        self.output,
                        "  Until {}: {}",
                        revision.replaced_at.format("%Y-%m-%d %H:%M"),
                        join_or_dash(&revision.categories)
                    )?;
                }

                let transactions = self.service.product_transactions(&name)?;
                writeln!(self.output, "  Transactions: {}", transactions.len())?;
                for info in transactions {
                    let t = &info.transaction;
                    writeln!(
                        self.output,
                        "    {} x{} {}",
                        t.date,
                        t.quantity,
                        format_cents(t.cashflow_cents)
                    )?;
                }
            }
        }
        Ok(())
    }

    fn run_transaction_command(&mut self, cmd: TransactionCommands) -> Result<()> {
        match cmd {
            TransactionCommands::Add {
                product,
                cashflow,
                quantity,
                date,
                categories,
                from_to,
                why,
            } => {
                let cashflow_cents = parse_cents(&cashflow)
                    .with_context(|| format!("Invalid amount '{cashflow}'. Use '-4.00' or '12'"))?;
                let date = match date {
                    Some(date_str) => parse_date(&date_str)?,
                    None => Local::now().date_naive(),
                };

                let request = NewTransaction::new(date, product, quantity, cashflow_cents)
                    .with_categories(categories)
                    .with_from_to(from_to)
                    .with_why(why);

                let assume_yes = self.assume_yes;
                let Session {
                    service,
                    input,
                    output,
                    ..
                } = &mut *self;
                let outcome = service.add_transaction(request, &mut |conflict: &CategoryConflict| {
                    assume_yes || confirm_override(&mut *input, &mut *output, conflict).unwrap_or(false)
                })?;

                match outcome {
                    TransactionOutcome::Added(transaction) => {
                        let info = service.describe(&transaction);
                        writeln!(
                            output,
                            "Recorded transaction: {} {} x{} {} ({} each) ({})",
                            transaction.date,
                            info.product_name,
                            transaction.quantity,
                            format_cents(transaction.cashflow_cents),
                            format_cents(transaction.unit_cashflow_cents),
                            transaction.id
                        )?;
                    }
                    TransactionOutcome::NotAdded { product } => {
                        writeln!(
                            output,
                            "Not added: kept the existing categories of '{product}'."
                        )?;
                    }
                }
            }

            TransactionCommands::List => {
                let transactions = self.service.list_transaction_info();
                if transactions.is_empty() {
                    writeln!(self.output, "No transactions found.")?;
                } else {
                    writeln!(
                        self.output,
                        "{:<10} {:<20} {:>5} {:>12} {:>10} {:<20} {:<20}",
                        "DATE", "PRODUCT", "QTY", "CASHFLOW", "UNIT", "FROM/TO", "WHY"
                    )?;
                    writeln!(self.output, "{}", "-".repeat(103))?;
                    for info in transactions {
                        let t = &info.transaction;
                        writeln!(
                            self.output,
                            "{:<10} {:<20} {:>5} {:>12} {:>10} {:<20} {:<20}",
                            t.date,
                            truncate(&info.product_name, 20),
                            t.quantity,
                            format_cents(t.cashflow_cents),
                            format_cents(t.unit_cashflow_cents),
                            truncate(&join_or_dash(&info.from_to), 20),
                            truncate(&join_or_dash(&info.why), 20)
                        )?;
                    }
                }
            }
        }
        Ok(())
    }
}

fn confirm_override<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    conflict: &CategoryConflict,
) -> Result<bool> {
    write!(
        output,
        "Product '{}' is filed under [{}]. Re-file it and all its transactions under [{}]? [y/N] ",
        conflict.product,
        conflict.current.join(", "),
        conflict.proposed.join(", ")
    )?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes"
    ))
}

fn write_name_list<W: Write>(output: &mut W, names: &[String], empty: &str) -> Result<()> {
    if names.is_empty() {
        writeln!(output, "{empty}")?;
    }
    for name in names {
        writeln!(output, "{name}")?;
    }
    Ok(())
}

fn join_or_dash(values: &[String]) -> String {
    if values.is_empty() {
        "-".to_string()
    } else {
        values.join(", ")
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format '{date_str}'. Use YYYY-MM-DD"))
}

use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use expense_tracker::{DEFAULT_CATEGORIES, Expense, count_expenses, create_expense, initialize_db};

/// A utility for creating a test database for the expense_tracker server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// How many days of expenses to create, ending today.
    #[arg(long, short, default_value_t = 28)]
    days: i64,
}

/// Descriptions and amounts for each of the default categories.
const SAMPLE_EXPENSES: [(&str, f64); 5] = [
    ("Groceries", 42.35),
    ("Bus fare", 3.20),
    ("Weekly rent", 450.00),
    ("Power bill", 61.80),
    ("Pharmacy", 18.99),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating expenses for the last {} days...", args.days);

    let today = OffsetDateTime::now_utc().date();

    for day in 0..args.days {
        let date = today - Duration::days(day);

        // Rent is weekly, everything else rotates through the days.
        for (i, ((description, amount), category)) in
            SAMPLE_EXPENSES.iter().zip(DEFAULT_CATEGORIES).enumerate()
        {
            let is_due = if category == "Rent" {
                day % 7 == 0
            } else {
                (day + i as i64) % 3 == 0
            };

            if is_due {
                let amount = amount + (day % 5) as f64 * 1.25;
                create_expense(Expense::build(description, amount, category, date), &conn)?;
            }
        }
    }

    println!("Created {} expenses.", count_expenses(&conn)?);
    println!("Success!");

    Ok(())
}

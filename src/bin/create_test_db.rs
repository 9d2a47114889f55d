use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Month, PrimitiveDateTime, Time};

use sales_report::{NewTransaction, count_transactions, initialize_db, replace_all_transactions};

/// A utility for creating a test database for the sales report API server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The year the sample sales happened in.
    #[arg(long, default_value_t = 2022)]
    year: i32,

    /// The number of sample sales to create for each month.
    #[arg(long, default_value_t = 20)]
    per_month: u32,
}

const CATEGORIES: [&str; 4] = [
    "electronics",
    "jewelery",
    "men's clothing",
    "women's clothing",
];

/// Build `per_month` sales for every month of `year`.
///
/// Prices step through every price range and every third sale is unsold, so
/// each chart has something to show.
fn sample_transactions(year: i32, per_month: u32) -> Result<Vec<NewTransaction>, Box<dyn Error>> {
    let mut transactions = Vec::new();

    for month_number in 1..=12u8 {
        let month = Month::try_from(month_number)?;

        for i in 0..per_month {
            let day = (i % 28 + 1) as u8;
            let date = Date::from_calendar_date(year, month, day)?;
            let date_of_sale = PrimitiveDateTime::new(date, Time::MIDNIGHT).assume_utc();
            let category = CATEGORIES[i as usize % CATEGORIES.len()];

            transactions.push(
                NewTransaction::new(date_of_sale)
                    .title(&format!("Sample {category} item #{}", i + 1))
                    .description(&format!("A sample {category} sale from {month} {year}"))
                    .price(f64::from(i * 53 % 1_000) + 0.99)
                    .category(category)
                    .sold(i % 3 != 0),
            );
        }
    }

    Ok(transactions)
}

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
    let mut conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating sample transactions...");

    let transactions = sample_transactions(args.year, args.per_month)?;
    replace_all_transactions(&transactions, &mut conn)?;

    println!("Created {} transactions.", count_transactions(&conn)?);
    println!("Success!");

    Ok(())
}

use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Month, OffsetDateTime};

use ledger_rs::{
    NewEntry, PasswordHash, TagColor, TagName, Username, ValidatedPassword, create_entry,
    create_tag, create_user, initialize_db,
};

/// A utility for creating a test database for the ledger_rs server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("password1234"),
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user(Username::new("test")?, password_hash, &conn)?;

    println!("Creating tags...");

    let groceries = create_tag(
        user.id,
        TagName::new("Groceries")?,
        TagColor::new("#16a34a")?,
        &conn,
    )?;
    let rent = create_tag(user.id, TagName::new("Rent")?, TagColor::new("#2563eb")?, &conn)?;
    create_tag(user.id, TagName::new("Fun")?, TagColor::new("#db2777")?, &conn)?;

    println!("Creating entries...");

    let today = OffsetDateTime::now_utc().date();
    let last_month = today.month().previous();
    let last_month_year = if last_month == Month::December {
        today.year() - 1
    } else {
        today.year()
    };

    let entries = [
        ("Weekly shop", 84, 20, today.year(), today.month(), 1, Some(groceries.id)),
        ("Rent", 450, 0, today.year(), today.month(), 1, Some(rent.id)),
        ("Coffee", 4, 50, today.year(), today.month(), today.day(), None),
        ("Weekly shop", 91, 5, last_month_year, last_month, 20, Some(groceries.id)),
        ("Rent", 450, 0, last_month_year, last_month, 1, Some(rent.id)),
    ];

    for (description, dollars, cents, year, month, day, tag_id) in entries {
        create_entry(
            user.id,
            NewEntry {
                description: description.to_owned(),
                dollars,
                cents,
                year,
                month: month as u8,
                day,
                tag_id,
            },
            &conn,
        )?;
    }

    println!("Success! Log in with username 'test' and password 'password1234'.");

    Ok(())
}

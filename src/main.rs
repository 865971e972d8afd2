mod db;
mod ledger;
mod models;
mod operations;
mod view;

use ledger::Ledger;
use operations::add::add_expense;
use operations::browse::run_browse;
use operations::remove::remove_expense;
use operations::totals::totals_lines;
use operations::update::update_expense;
use std::io;
use std::str::FromStr;
use view::{CategoryFilter, ViewState};

pub enum UserCommands {
    Add,
    Edit,
    Remove,
    List,
    Filter,
    Totals,
    Browse,
    Exit,
}

fn main() {
    env_logger::init();

    println!("Welcome to the expense tracker!");
    let conn = db::connection::establish_connection().expect("Failed to connect to the database");
    let mut ledger = Ledger::from_records(db::snapshot::load(&conn));
    let mut view = ViewState::new();

    loop {
        println!("Please enter a command (add, edit, remove, list, filter, totals, browse, exit):");

        let input = match read_user_input() {
            Ok(cmd) => cmd,
            Err(e) => {
                println!("Error reading input: {}", e);
                continue;
            }
        };
        let parts: Vec<&str> = input.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }
        let command = check_for_command(parts[0]);
        match command {
            UserCommands::Add => {
                println!("Add command selected. Please enter expense details in the format:\ndescription, amount, category, date(YYYY-MM-DD, optional)");
                let input = match read_user_input() {
                    Ok(details) => details,
                    Err(e) => {
                        println!("Error reading input: {}", e);
                        continue;
                    }
                };
                match add_expense(&conn, &mut ledger, &input) {
                    Ok(record) => {
                        println!("Expense added successfully (id {}).", record.id);
                    }
                    Err(e) => {
                        println!("Error adding expense: {}", e);
                        println!("Please try again.");
                    }
                }
            }
            UserCommands::Edit => {
                println!("Edit command selected. Please enter the new details in the format:\nid, description, amount, category, date(YYYY-MM-DD, optional)");
                let input = match read_user_input() {
                    Ok(details) => details,
                    Err(e) => {
                        println!("Error reading input: {}", e);
                        continue;
                    }
                };
                match update_expense(&conn, &mut ledger, &input) {
                    Ok(record) => println!("Expense {} updated successfully.", record.id),
                    Err(e) => println!("Error updating expense: {}", e),
                }
            }
            UserCommands::Remove => {
                println!("Remove command selected. Provide the expense ID to remove:");
                let input = match read_user_input() {
                    Ok(details) => details,
                    Err(e) => {
                        println!("Error reading input: {}", e);
                        continue;
                    }
                };
                match remove_expense(&conn, &mut ledger, &input) {
                    Ok(true) => println!("Expense removed successfully."),
                    Ok(false) => println!("No expense with that ID."),
                    Err(e) => println!("Error: {}", e),
                }
            }
            UserCommands::List => {
                let visible = view.filtered(&ledger);
                if visible.is_empty() {
                    println!("No expenses (filter: {}).", view.filter.label());
                } else {
                    println!("Expenses (filter: {}):", view.filter.label());
                    for record in visible {
                        println!(
                            "{}  {:<30} {:<10} ${:>10} {}",
                            record.date.format("%Y-%m-%d"),
                            record.description,
                            record.category.as_str(),
                            format!("{:.2}", record.amount),
                            record.id,
                        );
                    }
                }
            }
            UserCommands::Filter => {
                println!("Filter command selected. Choose All, Food, Transport, Bills, Shopping or Other:");
                let input = match read_user_input() {
                    Ok(details) => details,
                    Err(e) => {
                        println!("Error reading input: {}", e);
                        continue;
                    }
                };
                match CategoryFilter::from_str(&input) {
                    Ok(filter) => {
                        view.set_filter(filter);
                        println!("Filter set to {}.", view.filter.label());
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            UserCommands::Totals => {
                println!("Totals:");
                for line in totals_lines(&ledger) {
                    println!("{}", line);
                }
            }
            UserCommands::Browse => {
                if let Err(e) = run_browse(&conn, &mut ledger, &mut view) {
                    println!("Error running browse view: {}", e);
                }
            }
            UserCommands::Exit => {
                println!("Exiting the application.");
                break;
            }
        }
    }
}

fn read_user_input() -> Result<String, String> {
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|_| "Failed to read line".to_string())?;
    Ok(input.trim().to_string())
}

fn check_for_command(input: &str) -> UserCommands {
    match input {
        "add" => UserCommands::Add,
        "edit" => UserCommands::Edit,
        "remove" => UserCommands::Remove,
        "list" => UserCommands::List,
        "filter" => UserCommands::Filter,
        "totals" => UserCommands::Totals,
        "browse" => UserCommands::Browse,
        "exit" => UserCommands::Exit,
        _ => {
            println!("No valid command found. Exiting.");
            UserCommands::Exit
        }
    }
}

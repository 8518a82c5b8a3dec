mod config;
mod db;
mod error;
mod logging;
mod models;
mod operations;
mod presentation;
mod shell;

use clap::Parser;
use config::{Cli, Commands};
use error::AppError;
use operations::auth::AuthGate;
use presentation::menu::render_help;
use rusqlite::Connection;
use shell::{Outcome, execute, parse_command};
use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_tracing(&cli.log_level);

    let conn = match db::connection::establish_connection(&cli.db) {
        Ok(conn) => conn,
        Err(e) => {
            eprintln!("Failed to open the tax database {}: {}", cli.db.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command() {
        Commands::Shell => run_shell(&conn),
        Commands::Dashboard { year, category } => {
            presentation::dashboard::run_dashboard(&conn, year, category.as_deref())
        }
        Commands::Report {
            username,
            password,
            output,
        } => run_report(&conn, &username, &password, output.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_shell(conn: &Connection) -> Result<(), AppError> {
    println!("Sistem Informasi Pajak Daerah");
    let mut gate = AuthGate::default();
    print!("{}", render_help(&gate));

    loop {
        let prompt = if gate.is_authenticated() { "admin> " } else { "> " };
        let input = match read_user_input(prompt) {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                println!("Error reading input: {}", e);
                continue;
            }
        };

        let command = match parse_command(&input) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("Error: {}", e);
                continue;
            }
        };

        match execute(conn, &mut gate, command) {
            Ok(Outcome::Reply(text)) => println!("{}", text.trim_end()),
            Ok(Outcome::OpenDashboard) => {
                if let Err(e) = presentation::dashboard::run_dashboard(conn, None, None) {
                    println!("Error: {}", e);
                }
            }
            Ok(Outcome::Exit) => break,
            Err(e) => println!("Error: {}", e),
        }
    }

    println!("Goodbye.");
    Ok(())
}

fn run_report(
    conn: &Connection,
    username: &str,
    password: &str,
    output: Option<&std::path::Path>,
) -> Result<(), AppError> {
    let mut gate = AuthGate::default();
    gate.login(conn, username, password)?;

    let rows = operations::views::report(conn)?;
    match output {
        Some(path) => {
            let written = presentation::export::write_report_csv(path, &rows)?;
            println!("Exported {} report rows to {}.", written, path.display());
        }
        None => {
            let bytes = presentation::export::report_csv(&rows)?;
            io::stdout().write_all(&bytes)?;
        }
    }
    Ok(())
}

/// `Ok(None)` on end of input.
fn read_user_input(prompt: &str) -> io::Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    // Only the line ending is dropped; passwords may carry spaces.
    Ok(Some(input.trim_end_matches(['\r', '\n']).to_string()))
}

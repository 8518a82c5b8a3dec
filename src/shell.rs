use crate::error::AppError;
use crate::models::view::{ChartLayout, SeriesKind, ViewData};
use crate::operations::auth::{AuthGate, update_account};
use crate::operations::category::{add_category_db, delete_category_db, list_categories_db};
use crate::operations::normalize::parse_year;
use crate::operations::realization::{
    add_realization_db, delete_realization_db, find_realization_db, list_realizations_db,
    update_realization_db,
};
use crate::operations::target::{
    add_target_db, delete_target_db, find_target_db, list_targets_db, update_target_db,
};
use crate::operations::views;
use crate::presentation::chart::{
    ALL_CATEGORIES, BarChartData, LineChartData, NO_DATA_AT_ALL, comparison_chart, no_data_message,
    trend_chart,
};
use crate::presentation::export::{dated_report_file, write_report_csv};
use crate::presentation::format::format_rupiah;
use crate::presentation::menu::render_help;
use crate::presentation::table::{category_table, realization_table, report_table, target_table};
use chrono::Local;
use rusqlite::Connection;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Exit,
    Years,
    View { year: Option<String>, category: Option<String> },
    Trend { year: String, category: String },
    Dashboard,
    Login { username: String, password: String },
    Logout,
    Account { username: String, password: String },
    Categories,
    AddCategory(String),
    DeleteCategory(String),
    Targets,
    Target(String),
    AddTarget { year: String, amount: String, category: String },
    UpdateTarget { id: String, year: String, amount: String, category: String },
    DeleteTarget(String),
    Realizations,
    Realization(String),
    AddRealization { year: String, month: String, amount: String, category: String },
    UpdateRealization { id: String, year: String, month: String, amount: String, category: String },
    DeleteRealization(String),
    Report,
    Export(Option<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Reply(String),
    OpenDashboard,
    Exit,
}

/// Splits a line into a command. Category names may contain spaces, so the
/// category is always the last argument and takes the rest of the line.
pub fn parse_command(line: &str) -> Result<Option<Command>, AppError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some((name, args)) = parts.split_first() else {
        return Ok(None);
    };

    let command = match *name {
        "help" => Command::Help,
        "exit" | "quit" => Command::Exit,
        "years" => Command::Years,
        "view" => Command::View {
            year: args.first().map(|s| s.to_string()),
            category: rest(args, 1),
        },
        "trend" => Command::Trend {
            year: arg(args, 0, "year")?,
            category: required_rest(args, 1, "category")?,
        },
        "dashboard" => Command::Dashboard,
        "login" => Command::Login {
            username: arg(args, 0, "username")?,
            password: raw_rest(line, 2).unwrap_or_default(),
        },
        "logout" => Command::Logout,
        "account" => Command::Account {
            username: arg(args, 0, "username")?,
            password: raw_rest(line, 2).unwrap_or_default(),
        },
        "categories" => Command::Categories,
        "add-category" => Command::AddCategory(required_rest(args, 0, "category name")?),
        "delete-category" => Command::DeleteCategory(required_rest(args, 0, "category name")?),
        "targets" => Command::Targets,
        "target" => Command::Target(arg(args, 0, "ID")?),
        "add-target" => Command::AddTarget {
            year: arg(args, 0, "year")?,
            amount: arg(args, 1, "amount")?,
            category: required_rest(args, 2, "category")?,
        },
        "update-target" => Command::UpdateTarget {
            id: arg(args, 0, "ID")?,
            year: arg(args, 1, "year")?,
            amount: arg(args, 2, "amount")?,
            category: required_rest(args, 3, "category")?,
        },
        "delete-target" => Command::DeleteTarget(arg(args, 0, "ID")?),
        "realizations" => Command::Realizations,
        "realization" => Command::Realization(arg(args, 0, "ID")?),
        "add-realization" => Command::AddRealization {
            year: arg(args, 0, "year")?,
            month: arg(args, 1, "month")?,
            amount: arg(args, 2, "amount")?,
            category: required_rest(args, 3, "category")?,
        },
        "update-realization" => Command::UpdateRealization {
            id: arg(args, 0, "ID")?,
            year: arg(args, 1, "year")?,
            month: arg(args, 2, "month")?,
            amount: arg(args, 3, "amount")?,
            category: required_rest(args, 4, "category")?,
        },
        "delete-realization" => Command::DeleteRealization(arg(args, 0, "ID")?),
        "report" => Command::Report,
        "export" => Command::Export(args.first().map(|s| s.to_string())),
        other => {
            return Err(AppError::InvalidInput {
                field: "command",
                reason: format!("unknown command '{}', type 'help'", other),
            });
        }
    };
    Ok(Some(command))
}

fn arg(args: &[&str], idx: usize, field: &'static str) -> Result<String, AppError> {
    args.get(idx)
        .map(|s| s.to_string())
        .ok_or_else(|| AppError::empty(field))
}

fn rest(args: &[&str], from: usize) -> Option<String> {
    let joined = args.get(from..)?.join(" ");
    if joined.is_empty() { None } else { Some(joined) }
}

/// Text after the first `words` words and the single separator that follows
/// them, taken verbatim so passwords keep their spaces.
fn raw_rest(line: &str, words: usize) -> Option<String> {
    let mut remaining = line;
    for _ in 0..words {
        remaining = remaining.trim_start();
        let end = remaining.find(char::is_whitespace)?;
        remaining = &remaining[end..];
    }
    let mut chars = remaining.chars();
    chars.next()?;
    let text = chars.as_str();
    if text.is_empty() { None } else { Some(text.to_string()) }
}

fn required_rest(args: &[&str], from: usize, field: &'static str) -> Result<String, AppError> {
    rest(args, from).ok_or_else(|| AppError::empty(field))
}

fn category_filter(category: Option<&str>) -> Option<&str> {
    category.filter(|c| !c.eq_ignore_ascii_case("all") && *c != ALL_CATEGORIES)
}

/// Runs one command against the store. Admin commands are refused unless the
/// gate is authenticated.
pub fn execute(conn: &Connection, gate: &mut AuthGate, command: Command) -> Result<Outcome, AppError> {
    let reply = match command {
        Command::Help => render_help(gate),
        Command::Exit => return Ok(Outcome::Exit),
        Command::Dashboard => return Ok(Outcome::OpenDashboard),
        Command::Years => {
            let years = views::available_years(conn)?;
            if years.is_empty() {
                NO_DATA_AT_ALL.to_string()
            } else {
                let years: Vec<String> = years.iter().map(|y| y.to_string()).collect();
                let mut categories = vec![ALL_CATEGORIES.to_string()];
                categories.extend(views::available_categories(conn)?);
                format!("Tahun: {}\nJenis Pajak: {}", years.join(", "), categories.join(", "))
            }
        }
        Command::View { year, category } => public_view(conn, year.as_deref(), category.as_deref())?,
        Command::Trend { year, category } => {
            let year = parse_year(&year)?;
            let Some(category) = category_filter(Some(category.as_str())) else {
                return Err(AppError::InvalidInput {
                    field: "category",
                    reason: "the monthly trend needs a single category".to_string(),
                });
            };
            match views::monthly_trend(conn, year, category)? {
                ViewData::Ready(trend) => render_line_text(&trend_chart(&trend)),
                ViewData::NoData => no_data_message(year, Some(category)),
            }
        }
        Command::Login { username, password } => {
            gate.login(conn, &username, &password)?;
            format!("Logged in as {}.", username)
        }
        Command::Logout => {
            gate.require_admin()?;
            gate.logout();
            "Logged out.".to_string()
        }
        Command::Account { username, password } => {
            gate.require_admin()?;
            update_account(conn, &username, &password)?;
            "Admin account updated.".to_string()
        }
        Command::Categories => {
            gate.require_admin()?;
            category_table(&list_categories_db(conn)?).to_text()
        }
        Command::AddCategory(name) => {
            gate.require_admin()?;
            let stored = add_category_db(conn, &name)?;
            format!("Tax category '{}' added.", stored)
        }
        Command::DeleteCategory(name) => {
            gate.require_admin()?;
            delete_category_db(conn, &name)?;
            format!("Tax category '{}' deleted.", name)
        }
        Command::Targets => {
            gate.require_admin()?;
            let table = target_table(&list_targets_db(conn)?);
            if table.is_empty() {
                "No targets recorded yet.".to_string()
            } else {
                table.to_text()
            }
        }
        Command::Target(id) => {
            gate.require_admin()?;
            target_table(&[find_target_db(conn, &id)?]).to_text()
        }
        Command::AddTarget { year, amount, category } => {
            gate.require_admin()?;
            let id = add_target_db(conn, &year, &category, &amount)?;
            let stored = find_target_db(conn, &id.to_string())?;
            format!("Target {} saved (ID {}).", format_rupiah(stored.amount), id)
        }
        Command::UpdateTarget { id, year, amount, category } => {
            gate.require_admin()?;
            let id = update_target_db(conn, &id, &year, &category, &amount)?;
            format!("Target ID {} updated.", id)
        }
        Command::DeleteTarget(id) => {
            gate.require_admin()?;
            let id = delete_target_db(conn, &id)?;
            format!("Target ID {} deleted.", id)
        }
        Command::Realizations => {
            gate.require_admin()?;
            let table = realization_table(&list_realizations_db(conn)?);
            if table.is_empty() {
                "No realizations recorded yet.".to_string()
            } else {
                table.to_text()
            }
        }
        Command::Realization(id) => {
            gate.require_admin()?;
            realization_table(&[find_realization_db(conn, &id)?]).to_text()
        }
        Command::AddRealization { year, month, amount, category } => {
            gate.require_admin()?;
            let id = add_realization_db(conn, &year, &month, &category, &amount)?;
            let stored = find_realization_db(conn, &id.to_string())?;
            format!("Realization {} saved (ID {}).", format_rupiah(stored.amount), id)
        }
        Command::UpdateRealization { id, year, month, amount, category } => {
            gate.require_admin()?;
            let id = update_realization_db(conn, &id, &year, &month, &category, &amount)?;
            format!("Realization ID {} updated.", id)
        }
        Command::DeleteRealization(id) => {
            gate.require_admin()?;
            let id = delete_realization_db(conn, &id)?;
            format!("Realization ID {} deleted.", id)
        }
        Command::Report => {
            gate.require_admin()?;
            let rows = views::report(conn)?;
            if rows.is_empty() {
                "No targets recorded yet, nothing to report.".to_string()
            } else {
                report_table(&rows).to_text()
            }
        }
        Command::Export(path) => {
            gate.require_admin()?;
            let path = path
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(dated_report_file(Local::now().date_naive())));
            let rows = views::report(conn)?;
            let written = write_report_csv(&path, &rows)?;
            format!("Exported {} report rows to {}.", written, path.display())
        }
    };
    Ok(Outcome::Reply(reply))
}

fn public_view(conn: &Connection, year: Option<&str>, category: Option<&str>) -> Result<String, AppError> {
    if !views::has_any_data(conn)? {
        return Ok(NO_DATA_AT_ALL.to_string());
    }

    let year = match year {
        Some(year) => parse_year(year)?,
        None => match views::available_years(conn)?.first() {
            Some(year) => *year,
            None => return Ok(NO_DATA_AT_ALL.to_string()),
        },
    };
    let category = category_filter(category);

    let view = match views::comparison_view(conn, year, category)? {
        ViewData::Ready(view) => view,
        ViewData::NoData => return Ok(no_data_message(year, category)),
    };

    let mut out = render_bars_text(&comparison_chart(&view));
    if view.layout == ChartLayout::Faceted {
        out.push_str(&format!(
            "  Total: Target {} | Realization {}\n",
            format_rupiah(view.total(SeriesKind::Target)?),
            format_rupiah(view.total(SeriesKind::Realization)?)
        ));
    }
    if let Some(category) = category {
        if let ViewData::Ready(trend) = views::monthly_trend(conn, year, category)? {
            out.push('\n');
            out.push_str(&render_line_text(&trend_chart(&trend)));
        }
    }
    Ok(out)
}

fn render_bars_text(chart: &BarChartData) -> String {
    let mut out = format!("{}\n", chart.title);
    for bar in chart.groups.iter().flat_map(|g| &g.bars) {
        out.push_str(&format!("  {}\n", bar.tooltip));
    }
    out
}

fn render_line_text(chart: &LineChartData) -> String {
    let mut out = format!("{}\n", chart.title);
    for point in &chart.points {
        out.push_str(&format!("  {}\n", point.tooltip));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::establish_test_connection;
    use std::fs;
    use tempfile::tempdir;

    fn run(conn: &Connection, gate: &mut AuthGate, line: &str) -> Result<String, AppError> {
        let command = parse_command(line)?.expect("non-empty command");
        match execute(conn, gate, command)? {
            Outcome::Reply(text) => Ok(text),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    fn admin(conn: &Connection) -> AuthGate {
        let mut gate = AuthGate::default();
        run(conn, &mut gate, "login admin admin123").unwrap();
        gate
    }

    #[test]
    fn test_parse_multi_word_category() {
        let command = parse_command("add-target 2025 1.000.000 Opsen MBLB").unwrap().unwrap();
        assert_eq!(
            command,
            Command::AddTarget {
                year: "2025".to_string(),
                amount: "1.000.000".to_string(),
                category: "Opsen MBLB".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_empty_and_unknown() {
        assert_eq!(parse_command("   ").unwrap(), None);
        assert!(matches!(parse_command("frobnicate"), Err(AppError::InvalidInput { field: "command", .. })));
        assert!(matches!(parse_command("add-target 2025"), Err(AppError::InvalidInput { field: "amount", .. })));
        assert!(matches!(parse_command("trend 2025"), Err(AppError::InvalidInput { field: "category", .. })));
    }

    #[test]
    fn test_parse_outcomes() {
        let conn = establish_test_connection().unwrap();
        let mut gate = AuthGate::default();
        assert_eq!(execute(&conn, &mut gate, Command::Exit).unwrap(), Outcome::Exit);
        assert_eq!(execute(&conn, &mut gate, Command::Dashboard).unwrap(), Outcome::OpenDashboard);
    }

    #[test]
    fn test_admin_commands_need_login() {
        let conn = establish_test_connection().unwrap();
        let mut gate = AuthGate::default();

        for line in ["targets", "add-category PBB", "report", "export out.csv", "logout"] {
            assert!(matches!(run(&conn, &mut gate, line), Err(AppError::AuthFailed)), "{}", line);
        }
    }

    #[test]
    fn test_failed_login_stays_anonymous() {
        let conn = establish_test_connection().unwrap();
        let mut gate = AuthGate::default();

        assert!(matches!(run(&conn, &mut gate, "login admin salah"), Err(AppError::AuthFailed)));
        assert!(!gate.is_authenticated());
        assert!(run(&conn, &mut gate, "help").unwrap().starts_with("Menu Publik"));
    }

    #[test]
    fn test_admin_session_end_to_end() {
        let conn = establish_test_connection().unwrap();
        let mut gate = admin(&conn);

        let reply = run(&conn, &mut gate, "add-target 2025 1.000.000.000 PKB").unwrap();
        assert_eq!(reply, "Target Rp 1,000,000,000 saved (ID 1).");
        run(&conn, &mut gate, "add-realization 2025 1 100,000,000 PKB").unwrap();
        run(&conn, &mut gate, "add-realization 2025 2 150000000 PKB").unwrap();

        let report = run(&conn, &mut gate, "report").unwrap();
        assert!(report.contains("Rp 250,000,000"));
        assert!(report.contains("25.00%"));

        run(&conn, &mut gate, "logout").unwrap();
        assert!(!gate.is_authenticated());
    }

    #[test]
    fn test_inline_errors_do_not_change_state() {
        let conn = establish_test_connection().unwrap();
        let mut gate = admin(&conn);

        assert!(matches!(run(&conn, &mut gate, "add-target 2025 abc PKB"), Err(AppError::InvalidAmount { .. })));
        assert!(matches!(run(&conn, &mut gate, "add-category pkb"), Err(AppError::DuplicateCategory { .. })));
        assert!(matches!(run(&conn, &mut gate, "delete-target 9"), Err(AppError::NotFound { .. })));
        assert_eq!(run(&conn, &mut gate, "targets").unwrap(), "No targets recorded yet.");
        assert!(gate.is_authenticated());
    }

    #[test]
    fn test_public_view_and_trend() {
        let conn = establish_test_connection().unwrap();
        let mut gate = AuthGate::default();
        assert_eq!(run(&conn, &mut gate, "view").unwrap(), NO_DATA_AT_ALL);

        let mut admin_gate = admin(&conn);
        run(&conn, &mut admin_gate, "add-target 2025 1000 PKB").unwrap();
        run(&conn, &mut admin_gate, "add-realization 2025 2 300 PKB").unwrap();
        run(&conn, &mut admin_gate, "add-realization 2025 1 200 PKB").unwrap();

        let all = run(&conn, &mut gate, "view").unwrap();
        assert!(all.starts_with("Perbandingan Realisasi vs Target Pajak Tahun 2025"));
        assert!(!all.contains("Progress Realisasi"));

        let single = run(&conn, &mut gate, "view 2025 PKB").unwrap();
        assert!(single.contains("Progress Realisasi Pajak PKB Tahun 2025"));
        let jan = single.find("Jan").unwrap();
        let feb = single.find("Feb").unwrap();
        assert!(jan < feb);

        let missing = run(&conn, &mut gate, "view 2024 all").unwrap();
        assert_eq!(missing, no_data_message(2024, None));

        assert!(matches!(run(&conn, &mut gate, "trend 2025 all"), Err(AppError::InvalidInput { .. })));
        assert!(run(&conn, &mut gate, "trend 2025 PKB").unwrap().contains("Rp 200"));
    }

    #[test]
    fn test_orphaned_category_still_shown() {
        let conn = establish_test_connection().unwrap();
        let mut gate = admin(&conn);
        run(&conn, &mut gate, "add-target 2025 1000 PAP").unwrap();
        run(&conn, &mut gate, "add-realization 2025 4 500 PAP").unwrap();

        run(&conn, &mut gate, "delete-category PAP").unwrap();
        assert!(!run(&conn, &mut gate, "categories").unwrap().contains("PAP"));

        assert!(run(&conn, &mut gate, "targets").unwrap().contains("PAP"));
        assert!(run(&conn, &mut gate, "report").unwrap().contains("50.00%"));
        assert!(run(&conn, &mut gate, "view 2025 PAP").unwrap().contains("Rp 500"));
    }

    #[test]
    fn test_export_writes_file() {
        let conn = establish_test_connection().unwrap();
        let mut gate = admin(&conn);
        run(&conn, &mut gate, "add-target 2025 1000 PKB").unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join("laporan.csv");
        let reply = run(&conn, &mut gate, &format!("export {}", path.display())).unwrap();

        assert!(reply.starts_with("Exported 1 report rows"));
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("2025,PKB,\"Rp 1,000\",Rp 0,0.00%"));
    }

    #[test]
    fn test_password_spaces_kept_verbatim() {
        let command = parse_command("login admin  two  spaces ").unwrap().unwrap();
        assert_eq!(
            command,
            Command::Login {
                username: "admin".to_string(),
                password: " two  spaces ".to_string(),
            }
        );
        assert_eq!(raw_rest("login admin", 2), None);
        assert_eq!(raw_rest("login admin ", 2), None);

        let conn = establish_test_connection().unwrap();
        let mut gate = admin(&conn);
        run(&conn, &mut gate, "account baru  rahasia  kita ").unwrap();
        run(&conn, &mut gate, "logout").unwrap();

        assert!(run(&conn, &mut gate, "login baru rahasia kita").is_err());
        assert!(run(&conn, &mut gate, "login baru  rahasia  kita ").is_ok());
    }

    #[test]
    fn test_account_update_via_shell() {
        let conn = establish_test_connection().unwrap();
        let mut gate = admin(&conn);

        assert!(matches!(run(&conn, &mut gate, "account baru"), Err(AppError::InvalidInput { field: "password", .. })));
        run(&conn, &mut gate, "account baru sandi").unwrap();
        run(&conn, &mut gate, "logout").unwrap();

        assert!(run(&conn, &mut gate, "login admin admin123").is_err());
        assert!(run(&conn, &mut gate, "login baru sandi").is_ok());
    }
}

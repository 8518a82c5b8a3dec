use crate::operations::auth::AuthGate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Visualization,
    Login,
    Dashboard,
    Account,
    Categories,
    Targets,
    Realizations,
    Report,
    Logout,
}

impl MenuItem {
    pub fn title(self) -> &'static str {
        match self {
            MenuItem::Visualization => "Visualisasi Pajak Daerah",
            MenuItem::Login => "Login Admin",
            MenuItem::Dashboard => "Dashboard",
            MenuItem::Account => "Manajemen Akun",
            MenuItem::Categories => "Manajemen Jenis Pajak",
            MenuItem::Targets => "Manajemen Target",
            MenuItem::Realizations => "Manajemen Realisasi",
            MenuItem::Report => "Laporan",
            MenuItem::Logout => "Logout",
        }
    }

    /// Shell commands that belong to this menu entry.
    pub fn commands(self) -> &'static [&'static str] {
        match self {
            MenuItem::Visualization => &["years", "view <year> [category]", "trend <year> <category>", "dashboard"],
            MenuItem::Login => &["login <username> <password>"],
            MenuItem::Dashboard => &["dashboard"],
            MenuItem::Account => &["account <new-username> <new-password>"],
            MenuItem::Categories => &["categories", "add-category <name>", "delete-category <name>"],
            MenuItem::Targets => &[
                "targets",
                "target <id>",
                "add-target <year> <amount> <category>",
                "update-target <id> <year> <amount> <category>",
                "delete-target <id>",
            ],
            MenuItem::Realizations => &[
                "realizations",
                "realization <id>",
                "add-realization <year> <month> <amount> <category>",
                "update-realization <id> <year> <month> <amount> <category>",
                "delete-realization <id>",
            ],
            MenuItem::Report => &["report", "export [path]"],
            MenuItem::Logout => &["logout"],
        }
    }
}

const PUBLIC_MENU: [MenuItem; 2] = [MenuItem::Visualization, MenuItem::Login];

const ADMIN_MENU: [MenuItem; 7] = [
    MenuItem::Dashboard,
    MenuItem::Account,
    MenuItem::Categories,
    MenuItem::Targets,
    MenuItem::Realizations,
    MenuItem::Report,
    MenuItem::Logout,
];

pub fn menu_for(gate: &AuthGate) -> &'static [MenuItem] {
    if gate.is_authenticated() {
        &ADMIN_MENU
    } else {
        &PUBLIC_MENU
    }
}

pub fn render_help(gate: &AuthGate) -> String {
    let mut out = String::new();
    match gate.username() {
        Some(username) => out.push_str(&format!("Menu Admin ({})\n", username)),
        None => out.push_str("Menu Publik\n"),
    }
    for item in menu_for(gate) {
        out.push_str(&format!("  {}\n", item.title()));
        for command in item.commands() {
            out.push_str(&format!("    {}\n", command));
        }
    }
    out.push_str("  help | exit\n");
    out
}

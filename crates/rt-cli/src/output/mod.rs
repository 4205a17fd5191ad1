//! Output formatting utilities for the CLI
//!
//! Colored status messages and the saved-profile table. Messages are printed
//! only while the terminal is in its normal mode; during a relay session the
//! terminal belongs to the remote connection.

use tabled::{settings::Style, Table, Tabled};

use rt_core::config::Profile;
use rt_core::ConnectionParams;

/// Format saved profiles as an ASCII table
///
/// Credentials are never shown.
///
/// # Returns
/// A formatted string suitable for terminal output, or "No saved profiles"
/// if the list is empty.
pub fn format_profiles(profiles: &[Profile]) -> String {
    if profiles.is_empty() {
        return "No saved profiles".to_string();
    }

    #[derive(Tabled)]
    struct ProfileRow {
        #[tabled(rename = "NAME")]
        name: String,
        #[tabled(rename = "KIND")]
        kind: String,
        #[tabled(rename = "TARGET")]
        target: String,
    }

    let rows: Vec<ProfileRow> = profiles
        .iter()
        .map(|p| ProfileRow {
            name: p.name.clone(),
            kind: p.params.kind().to_string(),
            target: describe_target(&p.params),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

/// Short description of where a connection goes
fn describe_target(params: &ConnectionParams) -> String {
    match params {
        ConnectionParams::Serial { port, baud } => format!("{} @ {} baud", port, baud),
        ConnectionParams::Ssh {
            host, port, user, ..
        } => format!("{}@{}:{}", user, host, port),
    }
}

/// Print a success message in green with a checkmark prefix
///
/// Outputs to stdout with green coloring for positive feedback to the user.
pub fn print_success(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stdout = std::io::stdout();
    let _ = crossterm::execute!(
        stdout,
        SetForegroundColor(Color::Green),
        Print("✓ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

/// Print an error message in red with an X prefix
///
/// Outputs to stderr with red coloring for error feedback to the user.
pub fn print_error(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stderr = std::io::stderr();
    let _ = crossterm::execute!(
        stderr,
        SetForegroundColor(Color::Red),
        Print("✗ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

/// Print a warning message in yellow with a warning symbol prefix
pub fn print_warning(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stderr = std::io::stderr();
    let _ = crossterm::execute!(
        stderr,
        SetForegroundColor(Color::Yellow),
        Print("⚠ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

/// Print an informational message in cyan with an info symbol prefix
pub fn print_info(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stdout = std::io::stdout();
    let _ = crossterm::execute!(
        stdout,
        SetForegroundColor(Color::Cyan),
        Print("ℹ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_profiles() {
        assert_eq!(format_profiles(&[]), "No saved profiles");
    }

    #[test]
    fn test_profile_table_hides_password() {
        let profiles = vec![
            Profile {
                name: "bench".into(),
                params: ConnectionParams::serial("/dev/ttyUSB0", 115200),
            },
            Profile {
                name: "router".into(),
                params: ConnectionParams::ssh("192.168.1.1", 22, "admin", "s3cret"),
            },
        ];

        let table = format_profiles(&profiles);

        assert!(table.contains("NAME"));
        assert!(table.contains("/dev/ttyUSB0 @ 115200 baud"));
        assert!(table.contains("admin@192.168.1.1:22"));
        assert!(!table.contains("s3cret"));
    }
}

//! Startup banner and URL display

use super::config::is_all_interfaces;
use super::constants::APP_NAME;
use crate::domain::services::BootstrapAdmin;

/// Label column width
const W: usize = 16;

/// OSC 8 hyperlink when the terminal supports it, cyan text otherwise
fn terminal_link(url: &str) -> String {
    if supports_hyperlinks::on(supports_hyperlinks::Stream::Stdout) {
        format!("\x1b]8;;{}\x07\x1b[36m{}\x1b[0m\x1b]8;;\x07", url, url)
    } else {
        format!("\x1b[36m{}\x1b[0m", url)
    }
}

/// Print the startup banner with URLs and, on first run, the administrator login
pub fn print_banner(host: &str, port: u16, data_dir: &str, bootstrap: Option<&BootstrapAdmin>) {
    // Use localhost for display when binding to all interfaces
    let display_host = if is_all_interfaces(host) {
        "localhost"
    } else {
        host
    };

    println!();
    println!(
        "  \x1b[1m\x1b[36m{}\x1b[0m \x1b[90mv{}\x1b[0m",
        APP_NAME,
        env!("CARGO_PKG_VERSION")
    );
    println!();

    let api_url = format!("http://{}:{}/api/v1", display_host, port);
    let docs_url = format!("http://{}:{}/api/docs", display_host, port);
    println!(
        "  \x1b[32m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m {}",
        "API:",
        terminal_link(&api_url)
    );
    println!(
        "  \x1b[32m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m {}",
        "Docs:",
        terminal_link(&docs_url)
    );

    if host == "127.0.0.1" || host == "localhost" {
        println!(
            "  \x1b[90m➜  {:<W$} use --host 0.0.0.0 to expose\x1b[0m",
            "Network:"
        );
    } else if is_all_interfaces(host) {
        if let Ok(interfaces) = local_ip_address::list_afinet_netifas() {
            for (_, ip) in interfaces
                .iter()
                .filter(|(_, ip)| ip.is_ipv4() && !ip.is_loopback())
            {
                let network_url = format!("http://{}:{}/api/v1", ip, port);
                println!(
                    "  \x1b[32m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m {}",
                    "Network:",
                    terminal_link(&network_url)
                );
            }
        }
    } else {
        let network_url = format!("http://{}:{}/api/v1", host, port);
        println!(
            "  \x1b[32m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m {}",
            "Network:",
            terminal_link(&network_url)
        );
    }
    println!("  \x1b[90m➜  {:<W$} {}\x1b[0m", "Data:", data_dir);

    if let Some(admin) = bootstrap {
        println!();
        println!("  \x1b[33m[Administrator created]\x1b[0m");
        println!("  \x1b[1m{:<W$}\x1b[0m {}", "Email:", admin.email);
        if let Some(password) = &admin.generated_password {
            println!("  \x1b[1m{:<W$}\x1b[0m {}", "Password:", password);
            println!("  \x1b[90mShown once. Change it after logging in.\x1b[0m");
        }
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_link_contains_url() {
        let url = "http://localhost:5390/api/v1?x=1&y=2";
        let result = terminal_link(url);
        assert!(result.contains(url));
        assert!(result.contains("\x1b[36m"));
        assert!(result.ends_with("\x1b[0m") || result.ends_with("\x07"));
    }
}

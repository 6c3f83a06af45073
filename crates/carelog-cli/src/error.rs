use colored::Colorize;

pub fn handle_error(err: anyhow::Error) -> ! {
    eprintln!("{} {:#}", "Error:".red().bold(), err);

    let msg = format!("{err:#}").to_lowercase();

    if msg.contains("invalid subject id") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Subject ids must be non-empty and must not contain '/' or '\\'.");
    }

    if msg.contains("database already open") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Another carelog process holds the database. Retry once it exits, or use:");
        eprintln!("  {} carelog --backend fs ...", "$".dimmed());
    }

    if msg.contains("config file") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Check the TOML syntax of your configuration file.");
    }

    std::process::exit(1);
}

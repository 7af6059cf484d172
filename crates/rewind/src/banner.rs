use colored::Colorize;

const BANNER: &str = r"
  ____                _           _
 |  _ \ _____      __(_)_ __   __| |
 | |_) / _ \ \ /\ / /| | '_ \ / _` |
 |  _ <  __/\ V  V / | | | | | (_| |
 |_| \_\___| \_/\_/  |_|_| |_|\__,_|
";

pub fn print_banner_with_version() {
    println!("{}", BANNER.trim_start_matches('\n').bright_blue().bold());
    println!(
        "  {} {}",
        "rewind".bold(),
        env!("CARGO_PKG_VERSION").bright_blue()
    );
    println!("  {}", env!("CARGO_PKG_DESCRIPTION").dimmed());
}

//! Built-in package layouts

use aur_schema::Package;
use crossterm::style::Stylize;

const LABEL_WIDTH: usize = 15;

/// Full labelled description of a package, followed by a blank line.
pub fn info_block(pkg: &Package) -> String {
    let mut out = String::new();
    let mut line = |label: &str, value: &str| {
        let padded = format!("{label:<LABEL_WIDTH$}");
        out.push_str(&format!("{}: {value}\n", padded.bold()));
    };

    line("Repository", "aur");
    line("Name", pkg.name());
    line("Version", pkg.version());
    line("URL", pkg.upstream_url.as_deref().unwrap_or("None"));
    line("Depends On", &list(&pkg.depends));
    line("Optional Deps", &list(&pkg.optdepends));
    line("Make Deps", &list(&pkg.makedepends));
    line("Check Deps", &list(&pkg.checkdepends));
    line("Provides", &list(&pkg.provides));
    line("Conflicts With", &list(&pkg.conflicts));
    line("Replaces", &list(&pkg.replaces));
    line("Groups", &list(&pkg.groups));
    line("Licenses", &list(&pkg.licenses));
    line("Votes", &pkg.votes.to_string());
    line("Out Of Date", &out_of_date(pkg.out_of_date));
    line("Maintainer", pkg.maintainer.as_deref().unwrap_or("(orphan)"));
    line("Submitted", &timestamp(pkg.submitted));
    line("Last Modified", &timestamp(pkg.modified));
    line("Description", pkg.description.as_deref().unwrap_or("None"));

    out.push('\n');
    out
}

/// Two-line search hit: `aur/<name> <version> (<votes>)` and the
/// indented description.
pub fn search_line(pkg: &Package) -> String {
    format!(
        "{}{} {} ({})\n    {}\n",
        "aur/".magenta().bold(),
        pkg.name().white().bold(),
        pkg.version().green().bold(),
        pkg.votes,
        pkg.description.as_deref().unwrap_or_default()
    )
}

fn list(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join("  ")
    }
}

fn out_of_date(flagged: i64) -> String {
    if flagged > 0 {
        format!("Yes ({})", timestamp(flagged))
    } else {
        "No".to_string()
    }
}

fn timestamp(secs: i64) -> String {
    chrono::DateTime::from_timestamp(secs, 0)
        .unwrap_or_default()
        .with_timezone(&chrono::Local)
        .format("%c")
        .to_string()
}

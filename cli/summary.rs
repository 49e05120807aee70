use console::style;
use tcisd_core::{Outcome, ProcessingReport};

fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}

pub fn print_report(report: &ProcessingReport) {
    if report.had_issues() {
        println!(
            "Found comments in {} {}:",
            style(report.len()).cyan(),
            plural(report.len())
        );
        for (path, issues) in report.iter() {
            println!("  {}:", style(path).yellow());
            for issue in issues {
                println!("    - {}", issue);
            }
        }
    }

    match report.outcome() {
        Outcome::Clean => println!("{}", style("No comments found in files").green()),
        Outcome::IssuesFound => println!("{}", style("Comments found in files").red()),
        Outcome::Rewritten => println!("{}", style("Files were modified successfully").green()),
        Outcome::DryRun => println!(
            "{}",
            style("Dry run: comments found, no files were modified").yellow()
        ),
    }
}

use crate::output::{print_json, print_table};
use crate::project::Project;
use anyhow::Context;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum ReportSubcommand {
    /// Incidents with their owner's name (inner join), newest first
    Joined,
    /// Number of incidents per user, including users with none
    Counts,
}

pub fn run(project: &Project, subcmd: ReportSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ReportSubcommand::Joined => joined(project, json),
        ReportSubcommand::Counts => counts(project, json),
    }
}

fn joined(project: &Project, json: bool) -> anyhow::Result<()> {
    let store = project.open_store()?;
    let rows = store
        .incidents_with_user_names()
        .context("failed to run joined report")?;

    if json {
        print_json(&rows)?;
        return Ok(());
    }
    if rows.is_empty() {
        println!("No incidents.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = rows
        .into_iter()
        .map(|r| vec![r.id.to_string(), r.title, r.priority.to_string(), r.user_name])
        .collect();
    print_table(&["ID", "TITLE", "PRIORITY", "USER"], rows);
    Ok(())
}

fn counts(project: &Project, json: bool) -> anyhow::Result<()> {
    let store = project.open_store()?;
    let counts = store
        .incident_counts_per_user()
        .context("failed to run counts report")?;

    if json {
        print_json(&counts)?;
        return Ok(());
    }
    if counts.is_empty() {
        println!("No data.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = counts
        .into_iter()
        .map(|c| vec![c.user_name, c.incidents.to_string()])
        .collect();
    print_table(&["USER", "INCIDENTS"], rows);
    Ok(())
}

use crate::output::print_json;
use crate::project::Project;
use anyhow::Context;
use clap::Subcommand;
use tickets_core::{config::Config, paths};

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the resolved configuration
    Show,
    /// Write a default config file if none exists
    Init,
}

pub fn run(project: &Project, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(project, json),
        ConfigSubcommand::Init => init(project, json),
    }
}

fn show(project: &Project, json: bool) -> anyhow::Result<()> {
    let config = project.config()?;
    let database = project.database_path(&config);
    let file = paths::config_path(project.root());

    if json {
        print_json(&serde_json::json!({
            "root": project.root(),
            "config_file": file,
            "config_file_exists": file.exists(),
            "database": database,
            "busy_timeout_ms": config.busy_timeout_ms,
        }))?;
        return Ok(());
    }

    println!("Root:         {}", project.root().display());
    println!(
        "Config file:  {}{}",
        file.display(),
        if file.exists() { "" } else { " (not present, using defaults)" }
    );
    println!("Database:     {}", database.display());
    println!("Busy timeout: {} ms", config.busy_timeout_ms);
    Ok(())
}

fn init(project: &Project, json: bool) -> anyhow::Result<()> {
    let written = Config::init(project.root()).context("failed to write config")?;
    let file = paths::config_path(project.root());

    if json {
        print_json(&serde_json::json!({ "config_file": file, "written": written }))?;
    } else if written {
        println!("Wrote {}", file.display());
    } else {
        println!("{} already exists; left unchanged", file.display());
    }
    Ok(())
}

use crate::output::{print_json, print_table};
use crate::project::Project;
use anyhow::{bail, Context};
use clap::Subcommand;
use tickets_core::{IncidentFilter, IncidentUpdate, Priority};

#[derive(Subcommand)]
pub enum IncidentSubcommand {
    /// Open an incident for an existing user
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        /// Low, Medium or High
        #[arg(long, default_value = "Low")]
        priority: Priority,
        /// Owning user id
        #[arg(long)]
        user: i64,
    },
    /// List incidents, newest first
    List {
        /// Only incidents owned by this user id
        #[arg(long)]
        user: Option<i64>,
        /// Only incidents with this priority
        #[arg(long)]
        priority: Option<Priority>,
    },
    /// Show one incident
    Show { id: i64 },
    /// Change any subset of an incident's fields
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        priority: Option<Priority>,
        /// Reassign to this user id
        #[arg(long)]
        user: Option<i64>,
    },
    /// Delete an incident
    Delete {
        id: i64,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(project: &Project, subcmd: IncidentSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        IncidentSubcommand::Add {
            title,
            description,
            priority,
            user,
        } => add(project, &title, &description, priority, user, json),
        IncidentSubcommand::List { user, priority } => list(
            project,
            &IncidentFilter {
                user_id: user,
                priority,
            },
            json,
        ),
        IncidentSubcommand::Show { id } => show(project, id, json),
        IncidentSubcommand::Edit {
            id,
            title,
            description,
            priority,
            user,
        } => edit(
            project,
            id,
            &IncidentUpdate {
                title,
                description,
                priority,
                user_id: user,
            },
            json,
        ),
        IncidentSubcommand::Delete { id, yes } => delete(project, id, yes, json),
    }
}

fn add(
    project: &Project,
    title: &str,
    description: &str,
    priority: Priority,
    user: i64,
    json: bool,
) -> anyhow::Result<()> {
    let mut store = project.open_store()?;
    let incident = store
        .create_incident(title, description, priority, user)
        .context("failed to create incident")?;

    if json {
        print_json(&incident)?;
    } else {
        println!("Created incident [{}]: {}", incident.id, incident.title);
    }
    Ok(())
}

fn list(project: &Project, filter: &IncidentFilter, json: bool) -> anyhow::Result<()> {
    let store = project.open_store()?;
    let incidents = store
        .list_incidents(filter)
        .context("failed to list incidents")?;

    if json {
        print_json(&incidents)?;
        return Ok(());
    }

    if incidents.is_empty() {
        println!("No incidents.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = incidents
        .into_iter()
        .map(|l| {
            vec![
                l.incident.id.to_string(),
                l.incident.title,
                l.incident.priority.to_string(),
                l.user_name.unwrap_or_default(),
            ]
        })
        .collect();
    print_table(&["ID", "TITLE", "PRIORITY", "USER"], rows);
    Ok(())
}

fn show(project: &Project, id: i64, json: bool) -> anyhow::Result<()> {
    let store = project.open_store()?;
    let incident = store
        .get_incident(id)
        .context("failed to load incident")?
        .with_context(|| format!("incident {id} not found"))?;

    if json {
        print_json(&incident)?;
        return Ok(());
    }

    let owner = store
        .get_user(incident.user_id)
        .context("failed to load owner")?
        .map(|u| u.name)
        .unwrap_or_else(|| "(missing)".to_string());

    println!("Incident:    {}", incident.id);
    println!("Title:       {}", incident.title);
    println!("Priority:    {}", incident.priority);
    println!("User:        {} [{}]", owner, incident.user_id);
    println!("Description: {}", incident.description);
    Ok(())
}

fn edit(project: &Project, id: i64, update: &IncidentUpdate, json: bool) -> anyhow::Result<()> {
    if update.is_empty() {
        bail!("nothing to change: pass at least one of --title, --description, --priority, --user");
    }
    let mut store = project.open_store()?;
    let incident = store
        .edit_incident(id, update)
        .context("failed to edit incident")?
        .with_context(|| format!("incident {id} not found"))?;

    if json {
        print_json(&incident)?;
    } else {
        println!("Updated incident [{}]", incident.id);
    }
    Ok(())
}

fn delete(project: &Project, id: i64, yes: bool, json: bool) -> anyhow::Result<()> {
    if !yes {
        bail!("refusing to delete incident {id} without --yes");
    }
    let mut store = project.open_store()?;
    if !store.delete_incident(id).context("failed to delete incident")? {
        bail!("incident {id} not found");
    }

    if json {
        print_json(&serde_json::json!({ "id": id, "deleted": true }))?;
    } else {
        println!("Deleted incident [{id}]");
    }
    Ok(())
}

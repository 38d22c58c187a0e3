use crate::output::{print_json, print_table};
use crate::project::Project;
use anyhow::{bail, Context};
use clap::Subcommand;
use tickets_core::User;

#[derive(Subcommand)]
pub enum UserSubcommand {
    /// Create a user
    Add { name: String, email: String },
    /// List users by name
    List,
    /// Show one user
    Show { id: i64 },
    /// Replace a user's name and email
    Edit {
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    /// Delete a user that owns no incidents
    Delete {
        id: i64,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(project: &Project, subcmd: UserSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        UserSubcommand::Add { name, email } => add(project, &name, &email, json),
        UserSubcommand::List => list(project, json),
        UserSubcommand::Show { id } => show(project, id, json),
        UserSubcommand::Edit { id, name, email } => edit(project, id, &name, &email, json),
        UserSubcommand::Delete { id, yes } => delete(project, id, yes, json),
    }
}

fn add(project: &Project, name: &str, email: &str, json: bool) -> anyhow::Result<()> {
    let mut store = project.open_store()?;
    let user = store
        .create_user(name, email)
        .context("failed to create user")?;

    if json {
        print_json(&user)?;
    } else {
        println!("Created user [{}]: {} <{}>", user.id, user.name, user.email);
    }
    Ok(())
}

fn list(project: &Project, json: bool) -> anyhow::Result<()> {
    let store = project.open_store()?;
    let users = store.list_users().context("failed to list users")?;

    if json {
        print_json(&users)?;
        return Ok(());
    }

    if users.is_empty() {
        println!("No users.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = users
        .into_iter()
        .map(|u| vec![u.id.to_string(), u.name, u.email])
        .collect();
    print_table(&["ID", "NAME", "EMAIL"], rows);
    Ok(())
}

fn show(project: &Project, id: i64, json: bool) -> anyhow::Result<()> {
    let store = project.open_store()?;
    let user: User = store
        .get_user(id)
        .context("failed to load user")?
        .with_context(|| format!("user {id} not found"))?;

    if json {
        print_json(&user)?;
        return Ok(());
    }

    println!("User:  {}", user.id);
    println!("Name:  {}", user.name);
    println!("Email: {}", user.email);
    Ok(())
}

fn edit(project: &Project, id: i64, name: &str, email: &str, json: bool) -> anyhow::Result<()> {
    let mut store = project.open_store()?;
    let user = store
        .edit_user(id, name, email)
        .context("failed to edit user")?
        .with_context(|| format!("user {id} not found"))?;

    if json {
        print_json(&user)?;
    } else {
        println!("Updated user [{}]", user.id);
    }
    Ok(())
}

fn delete(project: &Project, id: i64, yes: bool, json: bool) -> anyhow::Result<()> {
    if !yes {
        bail!("refusing to delete user {id} without --yes");
    }
    let mut store = project.open_store()?;
    if !store.delete_user(id).context("failed to delete user")? {
        bail!("user {id} not found");
    }

    if json {
        print_json(&serde_json::json!({ "id": id, "deleted": true }))?;
    } else {
        println!("Deleted user [{id}]");
    }
    Ok(())
}

//! Modal input forms. Each returns a complete, validated set of values or
//! `None` when the user cancels.

use std::io::{self, BufRead, Write};

use tickets_core::{Incident, Priority, User};

use crate::console::{Answer, Console, MessageKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInput {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidentInput {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub user_id: i64,
}

/// Keep asking until a non-blank answer or a cancel.
fn required<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    label: &str,
    current: Option<&str>,
) -> io::Result<Option<String>> {
    loop {
        match console.ask(label, current)? {
            Answer::Cancel => return Ok(None),
            Answer::Value(v) if !v.trim().is_empty() => return Ok(Some(v.trim().to_string())),
            Answer::Value(_) => {
                console.message(MessageKind::Warning, &format!("{label} is required"))?;
            }
        }
    }
}

pub fn user_form<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    current: Option<&User>,
) -> io::Result<Option<UserInput>> {
    let Some(name) = required(console, "Name", current.map(|u| u.name.as_str()))? else {
        return Ok(None);
    };
    let Some(email) = required(console, "Email", current.map(|u| u.email.as_str()))? else {
        return Ok(None);
    };
    Ok(Some(UserInput { name, email }))
}

/// `users` must be non-empty; the owner is picked from it by number.
pub fn incident_form<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    users: &[User],
    current: Option<&Incident>,
) -> io::Result<Option<IncidentInput>> {
    let Some(title) = required(console, "Title", current.map(|i| i.title.as_str()))? else {
        return Ok(None);
    };
    let Some(description) =
        required(console, "Description", current.map(|i| i.description.as_str()))?
    else {
        return Ok(None);
    };

    let priorities: Vec<String> = Priority::all().iter().map(|p| p.to_string()).collect();
    let current_priority = current
        .and_then(|i| Priority::all().iter().position(|p| *p == i.priority))
        .unwrap_or(0);
    let Some(p) = console.choose("Priority", &priorities, current_priority)? else {
        return Ok(None);
    };

    let names: Vec<String> = users.iter().map(|u| u.name.clone()).collect();
    let current_user = current
        .and_then(|i| users.iter().position(|u| u.id == i.user_id))
        .unwrap_or(0);
    let Some(u) = console.choose("User", &names, current_user)? else {
        return Ok(None);
    };

    Ok(Some(IncidentInput {
        title,
        description,
        priority: Priority::all()[p],
        user_id: users[u].id,
    }))
}

//! Interactive two-tab application.
//!
//! The Incidents tab is shown first. Each command runs one data-access call
//! and, on success, re-fetches and redraws the current tab. Failures are
//! printed as `error:` lines and leave the view as it was.

use std::fmt;
use std::io::{self, BufRead, Write};

use tickets_core::{IncidentFilter, IncidentUpdate, Priority, Store, User};

use crate::console::{Console, MessageKind};
use crate::forms::{incident_form, user_form};
use crate::output::write_table;

const HELP: &str = "\
Commands (both tabs):
  incidents | users      switch tab
  new                    create a record
  edit <id>              edit a record
  delete <id>            delete a record (asks for confirmation)
  refresh                reload the current tab
  help                   show this help
  quit                   leave the application
Incidents tab only:
  filter user <name|all>
  filter priority <Low|Medium|High|all>
  clear                  reset both filters
  summary                incidents per user
In forms, an empty answer keeps the value in brackets and '.' cancels.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Incidents,
    Users,
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tab::Incidents => f.write_str("incidents"),
            Tab::Users => f.write_str("users"),
        }
    }
}

enum Flow {
    Continue,
    Quit,
}

/// Parse a record id typed by the user. Ids start at 1, so zero and
/// negatives never name a record.
fn selection(arg: Option<&str>) -> Option<i64> {
    arg.and_then(|a| a.parse::<i64>().ok()).filter(|id| *id > 0)
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App<'s, R, W> {
    store: &'s mut Store,
    console: Console<R, W>,
    tab: Tab,
    user_filter: Option<i64>,
    priority_filter: Option<Priority>,
    /// Users offered by the filter bar and the incident form, refreshed
    /// whenever users change.
    users: Vec<User>,
}

impl<'s, R: BufRead, W: Write> App<'s, R, W> {
    pub fn new(store: &'s mut Store, console: Console<R, W>) -> Self {
        Self {
            store,
            console,
            tab: Tab::Incidents,
            user_filter: None,
            priority_filter: None,
            users: Vec::new(),
        }
    }

    pub fn into_output(self) -> W {
        self.console.into_output()
    }

    /// Run until `quit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.console.out(), "Tickets. Type 'help' for commands.")?;
        self.reload_filters()?;
        self.render()?;

        loop {
            let prompt = format!("[{}]> ", self.tab);
            let Some(line) = self.console.read_line(&prompt)? else {
                break;
            };
            let words: Vec<&str> = line.split_whitespace().collect();
            let Some((command, args)) = words.split_first() else {
                continue;
            };
            if let Flow::Quit = self.dispatch(command, args)? {
                break;
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, command: &str, args: &[&str]) -> io::Result<Flow> {
        tracing::debug!(tab = %self.tab, command, "dispatch");
        match (self.tab, command) {
            (_, "quit" | "exit" | "q") => return Ok(Flow::Quit),
            (_, "help" | "?") => writeln!(self.console.out(), "{HELP}")?,
            (_, "incidents") => self.switch(Tab::Incidents)?,
            (_, "users") => self.switch(Tab::Users)?,
            (_, "refresh") => self.render()?,

            (Tab::Users, "new") => self.new_user()?,
            (Tab::Users, "edit") => self.edit_user(selection(args.first().copied()))?,
            (Tab::Users, "delete") => self.delete_user(selection(args.first().copied()))?,

            (Tab::Incidents, "new") => self.new_incident()?,
            (Tab::Incidents, "edit") => self.edit_incident(selection(args.first().copied()))?,
            (Tab::Incidents, "delete") => {
                self.delete_incident(selection(args.first().copied()))?
            }
            (Tab::Incidents, "filter") => self.filter(args)?,
            (Tab::Incidents, "clear") => {
                self.user_filter = None;
                self.priority_filter = None;
                self.render()?;
            }
            (Tab::Incidents, "summary") => self.summary()?,

            _ => self.console.message(
                MessageKind::Warning,
                &format!("unknown command '{command}' on the {} tab; try 'help'", self.tab),
            )?,
        }
        Ok(Flow::Continue)
    }

    fn switch(&mut self, tab: Tab) -> io::Result<()> {
        self.tab = tab;
        self.render()
    }

    /// Print a data-access failure and hand back the value on success.
    fn check<T>(&mut self, result: tickets_core::Result<T>) -> io::Result<Option<T>> {
        match result {
            Ok(v) => Ok(Some(v)),
            Err(e) => {
                self.console.message(MessageKind::Error, &e.to_string())?;
                Ok(None)
            }
        }
    }

    fn reload_filters(&mut self) -> io::Result<()> {
        let users = self.store.list_users();
        if let Some(users) = self.check(users)? {
            self.users = users;
        }
        self.user_filter = None;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    fn render(&mut self) -> io::Result<()> {
        match self.tab {
            Tab::Users => self.render_users(),
            Tab::Incidents => self.render_incidents(),
        }
    }

    fn render_users(&mut self) -> io::Result<()> {
        let users = self.store.list_users();
        let Some(users) = self.check(users)? else {
            return Ok(());
        };
        writeln!(self.console.out(), "== Users ==")?;
        if users.is_empty() {
            return writeln!(self.console.out(), "No users.");
        }
        let rows: Vec<Vec<String>> = users
            .into_iter()
            .map(|u| vec![u.id.to_string(), u.name, u.email])
            .collect();
        write_table(self.console.out(), &["ID", "NAME", "EMAIL"], &rows)
    }

    fn render_incidents(&mut self) -> io::Result<()> {
        let filter = IncidentFilter {
            user_id: self.user_filter,
            priority: self.priority_filter,
        };

        // Unfiltered views go through the joined report; filtered views use
        // the plain listing.
        let rows: Vec<Vec<String>> = if filter.is_empty() {
            let summaries = self.store.incidents_with_user_names();
            let Some(summaries) = self.check(summaries)? else {
                return Ok(());
            };
            summaries
                .into_iter()
                .map(|s| vec![s.id.to_string(), s.title, s.priority.to_string(), s.user_name])
                .collect()
        } else {
            let listings = self.store.list_incidents(&filter);
            let Some(listings) = self.check(listings)? else {
                return Ok(());
            };
            listings
                .into_iter()
                .map(|l| {
                    vec![
                        l.incident.id.to_string(),
                        l.incident.title,
                        l.incident.priority.to_string(),
                        l.user_name.unwrap_or_default(),
                    ]
                })
                .collect()
        };

        let user_label = self
            .user_filter
            .and_then(|id| self.users.iter().find(|u| u.id == id))
            .map_or("(all)", |u| u.name.as_str())
            .to_string();
        let priority_label = self
            .priority_filter
            .map_or_else(|| "(all)".to_string(), |p| p.to_string());

        let out = self.console.out();
        writeln!(out, "== Incidents ==")?;
        writeln!(out, "Filter: user={user_label} priority={priority_label}")?;
        if rows.is_empty() {
            return writeln!(out, "No incidents.");
        }
        write_table(out, &["ID", "TITLE", "PRIORITY", "USER"], &rows)
    }

    // -----------------------------------------------------------------------
    // Users tab
    // -----------------------------------------------------------------------

    fn new_user(&mut self) -> io::Result<()> {
        let Some(input) = user_form(&mut self.console, None)? else {
            return Ok(());
        };
        let created = self.store.create_user(&input.name, &input.email);
        let Some(user) = self.check(created)? else {
            return Ok(());
        };
        self.reload_filters()?;
        self.render()?;
        self.console
            .message(MessageKind::Info, &format!("user '{}' created", user.name))
    }

    fn edit_user(&mut self, id: Option<i64>) -> io::Result<()> {
        let Some(id) = id else {
            return self.console.message(MessageKind::Warning, "select a user first");
        };
        let found = self.store.get_user(id);
        let Some(found) = self.check(found)? else {
            return Ok(());
        };
        let Some(user) = found else {
            return self
                .console
                .message(MessageKind::Warning, &format!("user {id} not found"));
        };
        let Some(input) = user_form(&mut self.console, Some(&user))? else {
            return Ok(());
        };
        let edited = self.store.edit_user(id, &input.name, &input.email);
        match self.check(edited)? {
            Some(Some(_)) => {
                self.reload_filters()?;
                self.render()?;
                self.console.message(MessageKind::Info, "user updated")
            }
            Some(None) => self
                .console
                .message(MessageKind::Warning, &format!("user {id} not found")),
            None => Ok(()),
        }
    }

    fn delete_user(&mut self, id: Option<i64>) -> io::Result<()> {
        let Some(id) = id else {
            return self.console.message(MessageKind::Warning, "select a user first");
        };
        if !self.console.confirm(&format!("Delete user {id}?"))? {
            return Ok(());
        }
        let deleted = self.store.delete_user(id);
        match self.check(deleted)? {
            Some(true) => {
                self.reload_filters()?;
                self.render()?;
                self.console.message(MessageKind::Info, "user deleted")
            }
            Some(false) => self
                .console
                .message(MessageKind::Warning, &format!("user {id} not found")),
            None => Ok(()),
        }
    }

    // -----------------------------------------------------------------------
    // Incidents tab
    // -----------------------------------------------------------------------

    fn new_incident(&mut self) -> io::Result<()> {
        if self.users.is_empty() {
            return self
                .console
                .message(MessageKind::Info, "create a user first");
        }
        let Some(input) = incident_form(&mut self.console, &self.users, None)? else {
            return Ok(());
        };
        let created = self.store.create_incident(
            &input.title,
            &input.description,
            input.priority,
            input.user_id,
        );
        let Some(incident) = self.check(created)? else {
            return Ok(());
        };
        self.render()?;
        self.console.message(
            MessageKind::Info,
            &format!("incident '{}' created", incident.title),
        )
    }

    fn edit_incident(&mut self, id: Option<i64>) -> io::Result<()> {
        let Some(id) = id else {
            return self
                .console
                .message(MessageKind::Warning, "select an incident first");
        };
        let found = self.store.get_incident(id);
        let Some(found) = self.check(found)? else {
            return Ok(());
        };
        let Some(incident) = found else {
            return self
                .console
                .message(MessageKind::Warning, &format!("incident {id} not found"));
        };
        let Some(input) = incident_form(&mut self.console, &self.users, Some(&incident))? else {
            return Ok(());
        };
        let update = IncidentUpdate::default()
            .title(input.title)
            .description(input.description)
            .priority(input.priority)
            .user_id(input.user_id);
        let edited = self.store.edit_incident(id, &update);
        match self.check(edited)? {
            Some(Some(_)) => {
                self.render()?;
                self.console.message(MessageKind::Info, "incident updated")
            }
            Some(None) => self
                .console
                .message(MessageKind::Warning, &format!("incident {id} not found")),
            None => Ok(()),
        }
    }

    fn delete_incident(&mut self, id: Option<i64>) -> io::Result<()> {
        let Some(id) = id else {
            return self
                .console
                .message(MessageKind::Warning, "select an incident first");
        };
        if !self.console.confirm(&format!("Delete incident {id}?"))? {
            return Ok(());
        }
        let deleted = self.store.delete_incident(id);
        match self.check(deleted)? {
            Some(true) => {
                self.render()?;
                self.console.message(MessageKind::Info, "incident deleted")
            }
            Some(false) => self
                .console
                .message(MessageKind::Warning, &format!("incident {id} not found")),
            None => Ok(()),
        }
    }

    fn filter(&mut self, args: &[&str]) -> io::Result<()> {
        let Some((field, value)) = args.split_first() else {
            return self.console.message(
                MessageKind::Warning,
                "usage: filter user <name|all> | filter priority <level|all>",
            );
        };
        let value = value.join(" ");
        let all = value.is_empty() || value.eq_ignore_ascii_case("all");

        match *field {
            "user" if all => self.user_filter = None,
            "user" => {
                let found = self
                    .users
                    .iter()
                    .find(|u| u.name.eq_ignore_ascii_case(&value))
                    .map(|u| u.id);
                match found {
                    Some(id) => self.user_filter = Some(id),
                    None => {
                        return self
                            .console
                            .message(MessageKind::Warning, &format!("no user named '{value}'"))
                    }
                }
            }
            "priority" if all => self.priority_filter = None,
            "priority" => match value.parse::<Priority>() {
                Ok(p) => self.priority_filter = Some(p),
                Err(e) => return self.console.message(MessageKind::Warning, &e.to_string()),
            },
            other => {
                return self.console.message(
                    MessageKind::Warning,
                    &format!("cannot filter by '{other}'; use user or priority"),
                )
            }
        }
        self.render()
    }

    fn summary(&mut self) -> io::Result<()> {
        let counts = self.store.incident_counts_per_user();
        let Some(counts) = self.check(counts)? else {
            return Ok(());
        };
        let out = self.console.out();
        if counts.is_empty() {
            return writeln!(out, "Summary: no data.");
        }
        writeln!(out, "== Incidents per user ==")?;
        for c in counts {
            writeln!(out, "{}: {}", c.user_name, c.incidents)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(store: &mut Store, input: &str) -> String {
        let console = Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        let mut app = App::new(store, console);
        app.run().unwrap();
        String::from_utf8(app.into_output()).unwrap()
    }

    #[test]
    fn selection_rejects_zero_and_garbage() {
        assert_eq!(selection(Some("3")), Some(3));
        assert_eq!(selection(Some("0")), None);
        assert_eq!(selection(Some("-2")), None);
        assert_eq!(selection(Some("abc")), None);
        assert_eq!(selection(None), None);
    }

    #[test]
    fn starts_on_incidents_tab_and_quits() {
        let mut store = Store::open_in_memory().unwrap();
        let out = run(&mut store, "quit\n");
        assert!(out.contains("== Incidents =="));
        assert!(out.contains("No incidents."));
        assert!(out.contains("[incidents]> "));
    }

    #[test]
    fn creates_user_then_incident() {
        let mut store = Store::open_in_memory().unwrap();
        let out = run(
            &mut store,
            "users\nnew\n Ana \nANA@X.com\nincidents\nnew\nPrinter down\nNo ink\n3\n1\n",
        );
        assert!(out.contains("info: user 'Ana' created"));
        assert!(out.contains("info: incident 'Printer down' created"));

        let users = store.list_users().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email, "ana@x.com");
        let joined = store.incidents_with_user_names().unwrap();
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].priority, Priority::High);
        assert_eq!(joined[0].user_name, "Ana");
    }

    #[test]
    fn new_incident_without_users_asks_for_user_first() {
        let mut store = Store::open_in_memory().unwrap();
        let out = run(&mut store, "new\n");
        assert!(out.contains("info: create a user first"));
        assert!(!out.contains("Title:"));
    }

    #[test]
    fn duplicate_email_is_shown_not_raised() {
        let mut store = Store::open_in_memory().unwrap();
        store.create_user("Ana", "ana@x.com").unwrap();
        let out = run(&mut store, "users\nnew\nOther\nAna@x.com\nquit\n");
        assert!(out.contains("error: email already in use: ana@x.com"));
        assert_eq!(store.list_users().unwrap().len(), 1);
    }

    #[test]
    fn delete_user_with_incidents_is_refused() {
        let mut store = Store::open_in_memory().unwrap();
        let ana = store.create_user("Ana", "ana@x.com").unwrap();
        store
            .create_incident("Printer down", "No ink", Priority::High, ana.id)
            .unwrap();

        let out = run(&mut store, &format!("users\ndelete {}\ny\n", ana.id));
        assert!(out.contains("still owns 1 incident"));
        assert!(store.get_user(ana.id).unwrap().is_some());
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut store = Store::open_in_memory().unwrap();
        let ana = store.create_user("Ana", "ana@x.com").unwrap();
        run(&mut store, &format!("users\ndelete {}\nn\n", ana.id));
        assert!(store.get_user(ana.id).unwrap().is_some());

        let out = run(&mut store, &format!("users\ndelete {}\nyes\n", ana.id));
        assert!(out.contains("info: user deleted"));
        assert!(store.get_user(ana.id).unwrap().is_none());
    }

    #[test]
    fn edit_without_selection_warns() {
        let mut store = Store::open_in_memory().unwrap();
        let out = run(&mut store, "edit\nusers\nedit 0\n");
        assert!(out.contains("warning: select an incident first"));
        assert!(out.contains("warning: select a user first"));
    }

    #[test]
    fn edit_incident_keeps_defaults() {
        let mut store = Store::open_in_memory().unwrap();
        let ana = store.create_user("Ana", "ana@x.com").unwrap();
        let bea = store.create_user("Bea", "bea@x.com").unwrap();
        let inc = store
            .create_incident("Printer down", "No ink", Priority::Low, ana.id)
            .unwrap();

        // Users are listed by name: 1) Ana 2) Bea.
        let out = run(&mut store, &format!("edit {}\nPrinter fixed\n\n\n2\n", inc.id));
        assert!(out.contains("info: incident updated"));

        let edited = store.get_incident(inc.id).unwrap().unwrap();
        assert_eq!(edited.title, "Printer fixed");
        assert_eq!(edited.description, "No ink");
        assert_eq!(edited.priority, Priority::Low);
        assert_eq!(edited.user_id, bea.id);
    }

    #[test]
    fn filters_narrow_the_listing() {
        let mut store = Store::open_in_memory().unwrap();
        let ana = store.create_user("Ana", "ana@x.com").unwrap();
        let bea = store.create_user("Bea", "bea@x.com").unwrap();
        store
            .create_incident("Printer down", "No ink", Priority::High, ana.id)
            .unwrap();
        store
            .create_incident("Mouse broken", "Left click", Priority::Low, bea.id)
            .unwrap();

        let out = run(&mut store, "filter user bea\nfilter priority high\n");
        let last = out.rsplit("== Incidents ==").next().unwrap();
        assert!(last.contains("Filter: user=Bea priority=High"));
        assert!(last.contains("No incidents."));

        let out = run(&mut store, "filter priority Alta\n");
        let last = out.rsplit("== Incidents ==").next().unwrap();
        assert!(last.contains("Printer down"));
        assert!(!last.contains("Mouse broken"));
    }

    #[test]
    fn unknown_filter_user_warns() {
        let mut store = Store::open_in_memory().unwrap();
        let out = run(&mut store, "filter user Nobody\nfilter priority urgent\n");
        assert!(out.contains("warning: no user named 'Nobody'"));
        assert!(out.contains("warning: invalid priority 'urgent'"));
    }

    #[test]
    fn summary_lists_every_user() {
        let mut store = Store::open_in_memory().unwrap();
        let out = run(&mut store, "summary\n");
        assert!(out.contains("Summary: no data."));

        let ana = store.create_user("Ana", "ana@x.com").unwrap();
        store.create_user("Zoe", "zoe@x.com").unwrap();
        store
            .create_incident("Printer down", "No ink", Priority::High, ana.id)
            .unwrap();
        let out = run(&mut store, "summary\n");
        assert!(out.contains("Ana: 1\nZoe: 0\n"));
    }

    #[test]
    fn invalid_utf8_input_does_not_end_the_session() {
        let mut store = Store::open_in_memory().unwrap();
        let input = b"users\nnew\nJos\xe9\njose@x.com\nquit\n".to_vec();
        let mut app = App::new(&mut store, Console::new(Cursor::new(input), Vec::new()));
        app.run().unwrap();
        let out = String::from_utf8(app.into_output()).unwrap();
        assert!(out.contains("info: user 'Jos\u{FFFD}' created"));

        let users = store.list_users().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email, "jose@x.com");
    }

    #[test]
    fn unknown_command_is_reported() {
        let mut store = Store::open_in_memory().unwrap();
        let out = run(&mut store, "users\nsummary\n");
        assert!(out.contains("warning: unknown command 'summary' on the users tab"));
    }
}

use crate::app::App;
use crate::console::Console;
use crate::project::Project;

/// Launch the interactive application on the process terminal.
pub fn run(project: &Project) -> anyhow::Result<()> {
    let mut store = project.open_store()?;
    tracing::info!(root = %project.root().display(), "starting interactive session");

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let console = Console::new(stdin.lock(), stdout.lock());
    App::new(&mut store, console).run()?;
    Ok(())
}

use anyhow::Result;

use crate::{
    cli::{Cli, Command},
    ui,
    usecases::{bootstrap, clear_history::clear_history},
};

pub fn run(cli: Cli) -> Result<()> {
    match cli.command_or_default() {
        Command::Run => {
            let context = bootstrap::bootstrap(cli.config.as_deref())?;
            let mut composed = bootstrap::compose_shell(&context);
            let mut event_source = ui::CrosstermEventSource::default();

            ui::shell::start(
                &mut composed.shell,
                &mut event_source,
                &composed.engine_events,
            )?;
        }
        Command::Clear => {
            let _context = bootstrap::bootstrap(cli.config.as_deref())?;
            let mut store = bootstrap::open_store();
            let outcome = clear_history(store.as_mut())?;

            if outcome.removed {
                println!("Conversation history cleared.");
            } else {
                println!("No stored conversation found; nothing to clear.");
            }
        }
    }

    Ok(())
}

//! The interactive session shell.
//!
//! A [`Session`] shows the top-level menu, reads a choice and runs the
//! matching operation against a [`Database`]. Catalog, statement,
//! validation and coercion errors are reported on the console and the menu
//! is shown again; console I/O errors end the session. End of input ends it
//! cleanly.

mod actions;
mod console;
mod menu;

pub use console::{Console, LineConsole};
pub use menu::MenuChoice;

use std::io::ErrorKind;

use tracing::{info, warn};

use crate::coerce::Coercer;
use crate::config::SessionConfig;
use crate::core::traits::Database;
use crate::error::{CrudError, Result};

const RULE: &str = "===============";

/// One interactive session over a borrowed database connection.
pub struct Session<'a, D: Database + ?Sized, C: Console> {
    db: &'a D,
    console: C,
    config: SessionConfig,
    coercer: Coercer,
}

impl<'a, D: Database + ?Sized, C: Console> Session<'a, D, C> {
    pub fn new(db: &'a D, console: C, config: SessionConfig) -> Self {
        let coercer = Coercer::new(config.coercion);
        Self {
            db,
            console,
            config,
            coercer,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Give back the console, e.g. to inspect captured output.
    pub fn into_console(self) -> C {
        self.console
    }

    /// Run the menu loop until EXIT or end of input.
    pub async fn run(&mut self) -> Result<()> {
        info!(
            "Session started (schema '{}', {:?} coercion)",
            self.config.schema,
            self.coercer.mode()
        );

        loop {
            self.print_menu()?;

            let Some(input) = self.console.prompt("Choose an option: ")? else {
                break;
            };
            writeln!(self.console.writer(), "\n{}", RULE)?;

            let choice = match input.parse::<MenuChoice>() {
                Ok(MenuChoice::Exit) => break,
                Ok(choice) => choice,
                Err(_) => {
                    writeln!(self.console.writer(), "Invalid option")?;
                    continue;
                }
            };

            match self.dispatch(choice).await {
                Ok(()) => {}
                Err(CrudError::Io(e)) if e.kind() == ErrorKind::UnexpectedEof => break,
                Err(e) if e.is_recoverable() => {
                    warn!("{} failed: {}", choice.label(), e);
                    writeln!(self.console.writer(), "\nError: {}", e)?;
                }
                Err(e) => return Err(e),
            }
        }

        writeln!(self.console.writer(), "Bye")?;
        info!("Session ended");
        Ok(())
    }

    async fn dispatch(&mut self, choice: MenuChoice) -> Result<()> {
        match choice {
            MenuChoice::Create => self.create().await,
            MenuChoice::Read => self.read().await,
            MenuChoice::Update => self.update().await,
            MenuChoice::Delete => self.delete().await,
            MenuChoice::List => self.list().await,
            MenuChoice::Exit => Ok(()),
        }
    }

    fn print_menu(&mut self) -> Result<()> {
        let out = self.console.writer();
        writeln!(out, "\n{}", RULE)?;
        for choice in MenuChoice::ALL {
            writeln!(out, "{}. {}", choice.number(), choice.label())?;
        }
        writeln!(out, "{}", RULE)?;
        Ok(())
    }

    /// Prompt for a line. End of input aborts the operation and the session.
    fn ask(&mut self, label: &str) -> Result<String> {
        self.console.prompt(label)?.ok_or_else(|| {
            CrudError::Io(std::io::Error::new(
                ErrorKind::UnexpectedEof,
                "console input closed",
            ))
        })
    }
}

#[cfg(test)]
mod tests;

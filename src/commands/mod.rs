//! CLI command implementations
//!
//! This module contains implementations of the commands
//! supported by the CLI application using the Command pattern.

pub mod command_traits;
pub mod run_command;
pub mod inspect_command;
pub mod qa_command;

pub use command_traits::{Command, CommandFactory};
pub use run_command::RunCommand;
pub use inspect_command::InspectCommand;
pub use qa_command::QaCommand;

use clap::ArgMatches;
use crate::utils::logger::Logger;
use crate::raster::errors::RasterResult;

/// Factory for creating command instances based on CLI arguments
pub struct CompkitCommandFactory;

impl CompkitCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        CompkitCommandFactory
    }
}

impl Default for CompkitCommandFactory {
    fn default() -> Self {
        CompkitCommandFactory::new()
    }
}

impl<'a> CommandFactory<'a> for CompkitCommandFactory {
    fn create_command(&self, args: &ArgMatches, logger: &'a Logger) -> RasterResult<Box<dyn Command + 'a>> {
        if args.contains_id("qa") {
            Ok(Box::new(QaCommand::new(args, logger)?))
        } else if args.get_flag("inspect") {
            Ok(Box::new(InspectCommand::new(args, logger)?))
        } else {
            // Default to running the workflow
            Ok(Box::new(RunCommand::new(args, logger)?))
        }
    }
}

//! Catalog inspection command

use clap::ArgMatches;
use log::info;

use crate::commands::command_traits::Command;
use crate::raster::errors::{RasterError, RasterResult};
use crate::service::Catalog;
use crate::utils::logger::Logger;

/// Command listing the archives and scenes of a catalog
pub struct InspectCommand<'a> {
    catalog_file: String,
    logger: &'a Logger,
}

impl<'a> InspectCommand<'a> {
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> RasterResult<Self> {
        let catalog_file = args.get_one::<String>("catalog")
            .ok_or_else(|| RasterError::GenericError("Missing catalog file".to_string()))?
            .clone();

        Ok(InspectCommand { catalog_file, logger })
    }
}

impl<'a> Command for InspectCommand<'a> {
    fn execute(&self) -> RasterResult<()> {
        info!("Inspecting catalog {}", self.catalog_file);

        let lines = Catalog::from_file(&self.catalog_file)?.describe();
        for line in &lines {
            println!("{}", line);
        }
        self.logger.log_section(&format!("Catalog {}", self.catalog_file), &lines)?;
        Ok(())
    }
}

//! Workflow command
//!
//! Runs the compositing workflow over a scene catalog and prints the
//! region statistics, area and histogram.

use clap::ArgMatches;
use log::info;

use crate::commands::command_traits::Command;
use crate::raster::errors::{RasterError, RasterResult};
use crate::service::{Catalog, LocalImageryService};
use crate::utils::logger::Logger;
use crate::visualization::{ConsoleOutput, LayerRegistry};
use crate::workflow::{Workflow, WorkflowConfig};

/// Command running the full workflow
pub struct RunCommand<'a> {
    /// Path to the scene catalog
    catalog_file: String,
    /// Workflow configuration (reference values unless a file was given)
    config: WorkflowConfig,
    /// Whether to show per-image progress
    progress: bool,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> RunCommand<'a> {
    /// Create a new run command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording operations
    ///
    /// # Returns
    /// A new RunCommand instance or an error
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> RasterResult<Self> {
        let catalog_file = args.get_one::<String>("catalog")
            .ok_or_else(|| RasterError::GenericError("Missing catalog file".to_string()))?
            .clone();

        let config = match args.get_one::<String>("config") {
            Some(path) => {
                info!("Using workflow config {}", path);
                WorkflowConfig::from_file(path)?
            }
            None => {
                info!("No config given, using reference workflow values");
                WorkflowConfig::default()
            }
        };

        Ok(RunCommand {
            catalog_file,
            config,
            progress: args.get_flag("progress"),
            logger,
        })
    }
}

impl<'a> Command for RunCommand<'a> {
    fn execute(&self) -> RasterResult<()> {
        info!("Running workflow over catalog {}", self.catalog_file);

        let catalog = Catalog::from_file(&self.catalog_file)?;
        let service = LocalImageryService::new(catalog).with_progress(self.progress);
        let mut map = LayerRegistry::new();
        let mut output = ConsoleOutput;

        let report = Workflow::new(&service, &self.config).run(&mut map, &mut output)?;

        let layers: Vec<String> = map.layers().iter()
            .map(|layer| format!("{}: {}", layer.name, layer.summary))
            .collect();
        self.logger.log_section("Map layers", &layers)?;
        if let Some(view) = map.view() {
            self.logger.log(&format!("Map view: ({:.4}, {:.4}) zoom {}", view.center.x, view.center.y, view.zoom))?;
        }
        self.logger.log(&format!(
            "{} scenes, region {} = {}, area {} km2",
            report.scene_count, self.config.index.name, report.region_statistics, report.area_km2
        ))?;

        info!("Workflow completed");
        Ok(())
    }
}

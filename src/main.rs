use clap::{Arg, Command as ClapCommand, ArgAction};
use std::process;
use log::{error, LevelFilter};

use compkit::utils::logger::Logger;
use compkit::commands::{CommandFactory, CompkitCommandFactory};

fn main() {
    let matches = ClapCommand::new("compkit")
        .version("0.1.0")
        .author("Maurice Schilpp")
        .about("QA-masked median composites, NDVI and region statistics for satellite scenes")
        .arg(
            Arg::new("catalog")
                .help("Scene catalog (JSON)")
                .required_unless_present("qa")
                .index(1),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Workflow configuration (TOML); reference values are used when omitted")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("progress")
                .long("progress")
                .help("Show progress while mapping over scenes")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("inspect")
                .short('i')
                .long("inspect")
                .help("List the archives and scenes of the catalog")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("qa")
                .long("qa")
                .help("Explain comma-separated QA codes (e.g. '322,328,0b101000')")
                .value_name("VALUES")
                .required(false),
        )
        .arg(
            Arg::new("encoding")
                .long("encoding")
                .help("QA bit encoding used with --qa")
                .value_name("NAME")
                .default_value(compkit::qa::DEFAULT_ENCODING)
                .required(false),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Log file path")
                .value_name("FILE")
                .default_value("compkit.log")
                .required(false),
        )
        .get_matches();

    let level = if matches.get_flag("verbose") { LevelFilter::Debug } else { LevelFilter::Info };
    let log_file = matches.get_one::<String>("log-file")
        .map(String::as_str)
        .unwrap_or("compkit.log");

    let logger = match Logger::new(log_file) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error initializing logger: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = Logger::init_global_logger("compkit-global.log", level) {
        eprintln!("Error setting up global logger: {}", e);
        process::exit(1);
    }

    let factory = CompkitCommandFactory::new();

    match factory.create_command(&matches, &logger) {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}

use anyhow::{Context, Result};
use cherry::cli::{CliArgs, print_help, run_repl};
use cherry::config::Config;
use cherry::context::{AppContext, StandardContext};
use cherry::controller::Session;
use cherry::storage::LocalStorage;
use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};
use std::env;
use std::fs::OpenOptions;
use std::io;

fn main() -> Result<()> {
    let args = match CliArgs::parse(env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}", msg);
            print_help("cherry");
            std::process::exit(2);
        }
    };
    if args.help {
        print_help("cherry");
        return Ok(());
    }

    let ctx = StandardContext::new(args.root.clone());
    let config_exists = ctx.get_config_file_path()?.exists();
    let mut config = Config::load_or_default(&ctx)?;
    if !config_exists {
        // First run: leave an editable copy of the defaults behind.
        if let Err(e) = config.save(&ctx) {
            eprintln!("Could not write default config: {:#}", e);
        }
    }
    if let Some(data_file) = args.data_file.clone() {
        config.data_file = Some(data_file);
    }

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        config.log_level_filter()
    };
    init_logging(&ctx, level)?;

    let storage = LocalStorage::new(config.task_file_path(&ctx)?);
    let mut session = match Session::open(Box::new(storage), &config) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Could not open task list: {}", e);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    if let Some(command) = args.command {
        println!("{}", session.handle(&command));
        return Ok(());
    }

    run_repl(&mut session, io::stdin().lock(), io::stdout().lock())?;
    Ok(())
}

fn init_logging(ctx: &dyn AppContext, level: LevelFilter) -> Result<()> {
    let path = ctx.get_log_path()?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;
    WriteLogger::init(level, ConfigBuilder::new().build(), file)?;
    Ok(())
}

use clap::Parser;
use ticklist::cli::commands::{Cli, Commands};
use ticklist::cli::handlers;
use ticklist::io::{config_io, logging};

fn main() {
    let cli = Cli::parse();
    let data_dir = config_io::resolve_data_dir(cli.data_dir.as_deref());

    // Init runs before the config is read, so a broken config can be replaced
    if let Some(Commands::Init(args)) = &cli.command {
        if let Err(e) = handlers::cmd_init(args, &data_dir) {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let config = match config_io::read_config(&data_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = logging::init_logging(config.log.level.as_deref(), &data_dir) {
        eprintln!("warning: logging disabled: {}", e);
    }

    let result = match cli.command {
        // No subcommand → launch TUI
        None => ticklist::tui::run(&data_dir, &config),
        Some(_) => handlers::dispatch(cli, &data_dir, &config),
    };
    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

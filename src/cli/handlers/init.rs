use std::fs;
use std::path::Path;

use log::info;

use crate::cli::commands::InitArgs;
use crate::io::config_io::{self, ConfigError};

pub fn cmd_init(args: &InitArgs, data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let path = config_io::config_path(data_dir);
    if args.force && path.exists() {
        fs::remove_file(&path)?;
    }

    match config_io::write_config_template(data_dir) {
        Ok(path) => {
            info!("event=config_init module=cli path={}", path.display());
            println!("wrote {}", path.display());
            Ok(())
        }
        Err(ConfigError::AlreadyExists(path)) => Err(format!(
            "{} already exists (use --force to replace it)",
            path.display()
        )
        .into()),
        Err(e) => Err(e.into()),
    }
}

use std::fs;

use crate::cli::commands::InitArgs;
use crate::io::config_io;
use crate::io::storage::atomic_write;

const CONFIG_TEMPLATE: &str = r##"# habitgrid configuration

# Where the data file lives. Defaults to $XDG_DATA_HOME/habitgrid
# (or ~/.local/share/habitgrid). `habit --data-dir` overrides this.
# data_dir = "/path/to/habits"

# Range used by `habit stats` when --range is not given: 1D, 7D, 30D or ALL
default_range = "7D"

# On first run (or if the data file is unreadable), start with one demo task.
seed = true
seed_title = "My first task"
"##;

pub fn cmd_init(args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let path = config_io::config_path();
    if path.exists() && !args.force {
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )
        .into());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    atomic_write(&path, CONFIG_TEMPLATE.as_bytes())?;
    println!("wrote {}", path.display());
    Ok(())
}

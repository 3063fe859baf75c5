use std::env;
use std::path::PathBuf;

use portfolio::config::{read_config, Config};
use portfolio::logger::default_log_location;

use crate::CFG_FILE_NAME;

fn get_config_path() -> Option<PathBuf> {
    let mut candidates = vec![];
    if let Some(exe_dir) = env::current_exe().ok().and_then(|exe| exe.parent().map(|dir| dir.to_path_buf())) {
        candidates.push(exe_dir);
    }
    if let Ok(cur_dir) = env::current_dir() {
        candidates.push(cur_dir);
    }
    if let Some(cfg_dir) = dirs::config_dir() {
        candidates.push(cfg_dir);
    }

    candidates.into_iter()
        .map(|dir| dir.join(CFG_FILE_NAME))
        .find(|path| path.exists())
}

pub(crate) fn open_config(cfg_path: Option<PathBuf>) -> Result<Config, String> {
    let config_path = match cfg_path.or_else(get_config_path) {
        None => return Err("Could not find Portfolio configuration".to_string()),
        Some(x) => x,
    };

    println!("Reading config from {}", config_path.display());
    let mut config = match read_config(&config_path) {
        Ok(config) => config,
        Err(e) => return Err(e.to_string()),
    };

    if let Some(ref mut log) = config.log {
        let location = log.location.take().unwrap_or_else(default_log_location);
        println!("Log enabled. Files will be written in {}", location.display());
        log.location = Some(location);
    } else {
        println!("Log disabled. Using stdout");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_an_error() {
        let err = open_config(Some(PathBuf::from("this/does/not/exist/portfolio.toml"))).unwrap_err();
        assert!(err.starts_with("Error opening configuration file"));
    }
}

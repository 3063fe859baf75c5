use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs, io};

use serde::Deserialize;

use crate::blog::DEFAULT_MAX_CACHE_AGE;

const EXE_DIR_VAR: &str = "${exe_dir}";

#[derive(Deserialize, Debug)]
pub struct Personal {
    pub name: String,
    pub activity_start_year: i32,
    pub contact_email: String,
}

#[derive(Deserialize, Debug)]
pub struct Paths {
    pub template_dir: PathBuf,
    pub public_dir: PathBuf,
    pub posts_dir: PathBuf,
    pub projects_file: PathBuf,
}

#[derive(Deserialize, Debug)]
pub struct Blog {
    pub posts_per_page: u32,
    pub max_cache_age_secs: Option<u64>,
}

impl Blog {
    pub fn max_cache_age(&self) -> Duration {
        self.max_cache_age_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_MAX_CACHE_AGE)
    }
}

#[derive(Deserialize, Debug)]
pub struct Server {
    pub address: String,
    pub port: u16,
}

#[derive(Deserialize, Debug)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Copy, Clone, Debug, PartialEq)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize, Debug)]
pub struct Config {
    pub personal: Personal,
    pub paths: Paths,
    pub blog: Blog,
    pub server: Server,
    pub log: Option<Log>,
}

fn exe_dir() -> io::Result<PathBuf> {
    let cur_exe = env::current_exe()?;
    cur_exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| io::Error::new(ErrorKind::NotFound, "Executable has no parent directory"))
}

/// Expands a leading `${exe_dir}` into the directory of the running executable
fn parse_path(path: PathBuf, exe_dir: &Path) -> PathBuf {
    match path.strip_prefix(EXE_DIR_VAR) {
        Ok(rest) => exe_dir.join(rest),
        Err(_) => path,
    }
}

pub fn parse_config(content: &str, exe_dir: &Path) -> io::Result<Config> {
    let mut cfg: Config = match toml::from_str::<Config>(content) {
        Ok(cfg) => cfg,
        Err(e) => return Err(io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e))),
    };

    if cfg.blog.posts_per_page == 0 {
        return Err(io::Error::new(
            ErrorKind::InvalidData, "Error parsing configuration file: blog.posts_per_page must be at least 1"));
    }

    cfg.paths = Paths {
        template_dir: parse_path(cfg.paths.template_dir, exe_dir),
        public_dir: parse_path(cfg.paths.public_dir, exe_dir),
        posts_dir: parse_path(cfg.paths.posts_dir, exe_dir),
        projects_file: parse_path(cfg.paths.projects_file, exe_dir),
    };

    if let Some(ref mut log) = cfg.log {
        log.location = log.location.take().map(|location| parse_path(location, exe_dir));
    }

    Ok(cfg)
}

pub fn read_config(cfg_path: &Path) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.display(), e))),
    };

    parse_config(&cfg_content, &exe_dir()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
[personal]
name = "Jane Doe"
activity_start_year = 2004
contact_email = "jane@example.com"

[paths]
template_dir = "${exe_dir}/template"
public_dir = "/srv/portfolio/public"
posts_dir = "posts"
projects_file = "${exe_dir}/projects.json"

[blog]
posts_per_page = 10

[server]
address = "0.0.0.0"
port = 5050

[log]
level = "Debug"
log_to_console = true
"#;

    #[test]
    fn test_parse_config() {
        let cfg = parse_config(CONFIG, Path::new("/opt/portfolio")).unwrap();
        assert_eq!(cfg.personal.name, "Jane Doe");
        assert_eq!(cfg.personal.activity_start_year, 2004);
        assert_eq!(cfg.blog.posts_per_page, 10);
        assert_eq!(cfg.server.port, 5050);

        let log = cfg.log.unwrap();
        assert_eq!(log.level, LogLevel::Debug);
        assert!(log.location.is_none());
    }

    #[test]
    fn test_exe_dir_expansion() {
        let cfg = parse_config(CONFIG, Path::new("/opt/portfolio")).unwrap();
        assert_eq!(cfg.paths.template_dir, PathBuf::from("/opt/portfolio/template"));
        assert_eq!(cfg.paths.projects_file, PathBuf::from("/opt/portfolio/projects.json"));
        assert_eq!(cfg.paths.public_dir, PathBuf::from("/srv/portfolio/public"));
        assert_eq!(cfg.paths.posts_dir, PathBuf::from("posts"));
    }

    #[test]
    fn test_max_cache_age() {
        let cfg = parse_config(CONFIG, Path::new("/")).unwrap();
        assert_eq!(cfg.blog.max_cache_age(), DEFAULT_MAX_CACHE_AGE);

        let content = CONFIG.replace("posts_per_page = 10", "posts_per_page = 5\nmax_cache_age_secs = 60");
        let cfg = parse_config(&content, Path::new("/")).unwrap();
        assert_eq!(cfg.blog.max_cache_age(), Duration::from_secs(60));
    }

    #[test]
    fn test_zero_posts_per_page() {
        let content = CONFIG.replace("posts_per_page = 10", "posts_per_page = 0");
        let err = parse_config(&content, Path::new("/")).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert!(err.to_string().contains("posts_per_page"));
    }

    #[test]
    fn test_invalid_config() {
        let err = parse_config("[personal]\nname = 1\n", Path::new("/")).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }
}

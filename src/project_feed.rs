use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Deserializer};
use spdlog::{debug, info};
use thiserror::Error;

use crate::content_cache::{ContentCache, Expire};

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Project {
    #[serde(deserialize_with = "string_or_number")]
    pub project_id: String,
    pub name: String,
    pub description: String,
    pub link: String,
    pub link_description: String,
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Project feed must be initialised before it is queried")]
    NotInitialised,

    #[error("Supplied path for the project feed does not exist - {}", .0.display())]
    InvalidPath(PathBuf),

    #[error("Error reading project feed {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid project feed {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Projects listed on the home page, read once from a JSON file
pub struct ProjectFeed {
    path: RwLock<Option<PathBuf>>,
    cache: ContentCache<Vec<Project>>,
}

impl ProjectFeed {
    pub fn new() -> Self {
        ProjectFeed {
            path: RwLock::new(None),
            cache: ContentCache::new(),
        }
    }

    pub fn initialise(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.cache.reset(|| {
            *self.path.write().unwrap_or_else(PoisonError::into_inner) = Some(path);
        });
    }

    /// Projects in file order. The file is read on the first call only.
    pub fn get_feed(&self) -> Result<Arc<Vec<Project>>, FeedError> {
        self.cache.get_or_load(&Expire::Never, || load_projects(&self.path()?))
    }

    fn path(&self) -> Result<PathBuf, FeedError> {
        self.path.read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(FeedError::NotInitialised)
    }

    pub fn load_count(&self) -> u64 {
        self.cache.load_count()
    }
}

impl Default for ProjectFeed {
    fn default() -> Self {
        Self::new()
    }
}

fn load_projects(path: &Path) -> Result<Vec<Project>, FeedError> {
    debug!("Loading project feed from {}", path.display());

    if !path.is_file() {
        return Err(FeedError::InvalidPath(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| FeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let projects: Vec<Project> = serde_json::from_str(&content).map_err(|source| FeedError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Loaded {} projects", projects.len());
    Ok(projects)
}

/// Project ids are written either as numbers or as strings
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct StringOrNumber;

    impl<'de> Visitor<'de> for StringOrNumber {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or an integer")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value)
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(StringOrNumber)
}

#[cfg(test)]
mod tests {
    use std::sync::Barrier;
    use std::thread;

    use crate::test_data::PROJECTS_DATA;

    use super::*;

    fn feed_file(content: &str) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), content).unwrap();
        file
    }

    #[test]
    fn test_not_initialised() {
        let feed = ProjectFeed::new();
        assert!(matches!(feed.get_feed(), Err(FeedError::NotInitialised)));
    }

    #[test]
    fn test_load_feed() {
        let file = feed_file(PROJECTS_DATA);
        let feed = ProjectFeed::new();
        feed.initialise(file.path());
        assert_eq!(feed.load_count(), 0);

        let projects = feed.get_feed().unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].project_id, "1");
        assert_eq!(projects[0].name, "Notebook");
        assert_eq!(projects[1].project_id, "portfolio");
        assert_eq!(projects[1].link_description, "Visit");
    }

    #[test]
    fn test_loaded_once() {
        let file = feed_file(PROJECTS_DATA);
        let feed = ProjectFeed::new();
        feed.initialise(file.path());

        let first = feed.get_feed().unwrap();
        // Changes on disk are not picked up
        fs::write(file.path(), "[]").unwrap();
        let second = feed.get_feed().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(feed.load_count(), 1);
    }

    #[test]
    fn test_invalid_path() {
        let feed = ProjectFeed::new();
        feed.initialise("this/does/not/exist.json");
        assert!(matches!(feed.get_feed(), Err(FeedError::InvalidPath(_))));
    }

    #[test]
    fn test_invalid_json() {
        let file = feed_file("{ not json");
        let feed = ProjectFeed::new();
        feed.initialise(file.path());
        assert!(matches!(feed.get_feed(), Err(FeedError::Json { .. })));

        // Fixed on disk, next query succeeds
        fs::write(file.path(), PROJECTS_DATA).unwrap();
        assert_eq!(feed.get_feed().unwrap().len(), 2);
        assert_eq!(feed.load_count(), 1);
    }

    #[test]
    fn test_concurrent_first_query() {
        let file = feed_file(PROJECTS_DATA);
        let feed = Arc::new(ProjectFeed::new());
        feed.initialise(file.path());

        let barrier = Arc::new(Barrier::new(8));
        let handles: Vec<_> = (0..8).map(|_| {
            let feed = feed.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                feed.get_feed().unwrap().len()
            })
        }).collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 2);
        }
        assert_eq!(feed.load_count(), 1);
    }
}

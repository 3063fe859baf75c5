//! Blog posts loaded from a directory of markdown files.
//!
//! Posts are read lazily on the first query and kept in memory, newest first,
//! until they are older than the configured maximum age. The whole set is then
//! loaded again and replaced in one go.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use indexmap::IndexMap;
use spdlog::{debug, info};

use crate::content_cache::{ContentCache, Expire};
use crate::post_list::PostList;

pub mod error;
pub mod post;
pub mod post_parser;

pub use error::BlogError;
pub use post::{FileInfo, Post, PostId};
pub use post_parser::{MarkdownParser, Metadata, ParsedPost, PostParser};

/// Posts are reloaded from disk once a day unless configured otherwise
pub const DEFAULT_MAX_CACHE_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// Route to post, newest post first
pub type PostIndex = IndexMap<String, Arc<Post>>;

#[derive(Clone)]
struct BlogSettings {
    path: PathBuf,
    parser: Arc<dyn PostParser>,
    expire: Expire,
}

pub struct Blog {
    settings: RwLock<Option<BlogSettings>>,
    cache: ContentCache<PostIndex>,
}

impl Blog {
    pub fn new() -> Self {
        Blog {
            settings: RwLock::new(None),
            cache: ContentCache::new(),
        }
    }

    /// Sets where posts are read from. Nothing is read until the first query.
    pub fn initialise(&self, path: impl Into<PathBuf>, parser: Arc<dyn PostParser>, max_cache_age: Duration) {
        let settings = BlogSettings {
            path: path.into(),
            parser,
            expire: Expire::After(max_cache_age),
        };

        // Posts loaded with a previous configuration are not valid anymore
        self.cache.reset(|| {
            *self.settings.write().unwrap_or_else(PoisonError::into_inner) = Some(settings);
        });
    }

    pub fn get(&self, route: &str) -> Result<Arc<Post>, BlogError> {
        let posts = self.posts()?;
        posts.get(route)
            .cloned()
            .ok_or_else(|| BlogError::NotFound(route.to_string()))
    }

    /// Posts `[skip, skip + limit)` of the newest first list, plus the total number of posts.
    ///
    /// Without a limit (`None` or `Some(0)`) every post is returned and `skip` is ignored.
    pub fn get_range(&self, skip: usize, limit: Option<usize>) -> Result<(Vec<Arc<Post>>, usize), BlogError> {
        let posts = self.posts()?;
        let total = posts.len();

        let range = match limit {
            Some(limit) if limit > 0 => posts.values().skip(skip).take(limit).cloned().collect(),
            _ => posts.values().cloned().collect(),
        };

        Ok((range, total))
    }

    pub fn get_matching<F>(&self, predicate: F) -> Result<Vec<Arc<Post>>, BlogError>
    where
        F: Fn(&Post) -> bool,
    {
        let posts = self.posts()?;
        let matching = posts.values()
            .filter(|post| predicate(post))
            .cloned()
            .collect();
        Ok(matching)
    }

    pub fn get_with_tag(&self, tag: &str) -> Result<Vec<Arc<Post>>, BlogError> {
        let tag = tag.to_lowercase();
        self.get_matching(|post| post.has_tag(&tag))
    }

    pub fn get_with_year(&self, year: &str) -> Result<Vec<Arc<Post>>, BlogError> {
        self.get_matching(|post| post.year == year)
    }

    /// Every tag with the number of posts using it, most used first
    pub fn tags(&self) -> Result<Vec<(String, usize)>, BlogError> {
        let posts = self.posts()?;

        let mut tag_map: HashMap<&str, usize> = HashMap::new();
        for post in posts.values() {
            for tag in post.tags.iter() {
                *tag_map.entry(tag.as_str()).or_insert(0) += 1;
            }
        }

        let mut tag_list: Vec<(String, usize)> = tag_map.into_iter()
            .map(|(tag, count)| (tag.to_string(), count))
            .collect();
        tag_list.sort_by(|(ta, ca), (tb, cb)| cb.cmp(ca).then_with(|| ta.cmp(tb)));

        Ok(tag_list)
    }

    /// How many times posts were loaded from disk
    pub fn load_count(&self) -> u64 {
        self.cache.load_count()
    }

    fn settings(&self) -> Result<BlogSettings, BlogError> {
        let settings = self.settings.read().unwrap_or_else(PoisonError::into_inner);
        settings.clone().ok_or(BlogError::NotInitialised)
    }

    fn posts(&self) -> Result<Arc<PostIndex>, BlogError> {
        let expire = self.settings()?.expire;
        self.cache.get_or_load(&expire, || {
            // Read again under the loader lock, initialise may have replaced them
            let settings = self.settings()?;
            load_posts(&settings.path, settings.parser.as_ref())
        })
    }
}

impl Default for Blog {
    fn default() -> Self {
        Self::new()
    }
}

fn load_posts(path: &Path, parser: &dyn PostParser) -> Result<PostIndex, BlogError> {
    debug!("Loading blog posts from {}", path.display());

    if !path.is_dir() {
        return Err(BlogError::InvalidPath(path.to_path_buf()));
    }

    let files = PostList::new(path).retrieve_files().map_err(|source| BlogError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut posts: Vec<Post> = Vec::with_capacity(files.len());
    let mut routes: HashMap<String, PathBuf> = HashMap::new();

    for file in files {
        let post = Post::from_file(&file, parser)?;

        // Same day and same title. The files have to be fixed by hand.
        if let Some(first) = routes.get(&post.route) {
            return Err(BlogError::DuplicatePost {
                route: post.route,
                first: first.clone(),
                second: file,
            });
        }

        debug!("Processed post: {}", post.route);
        routes.insert(post.route.clone(), file);
        posts.push(post);
    }

    // Stable sort, posts from the same day keep the file name order
    posts.sort_by(|a, b| b.date.cmp(&a.date));
    info!("Loaded {} blog posts from {}", posts.len(), path.display());

    Ok(posts.into_iter()
        .map(|post| (post.route.clone(), Arc::new(post)))
        .collect())
}

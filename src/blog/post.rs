use std::fmt::{self, Display, Formatter};
use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Local, NaiveDate};
use uuid::Uuid;

use crate::blog::error::BlogError;
use crate::blog::post_parser::{Metadata, ParsedPost, PostParser};
use crate::text_utils::{count_words, format_date, format_date_time, parse_post_date, slugify, split_tags};

/// Identifier of a post, only stable until the next time posts are loaded
#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct PostId(pub String);

impl PostId {
    pub fn generate() -> Self {
        PostId(format!("blog_post_{}", Uuid::new_v4()))
    }
}

impl Display for PostId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileInfo {
    pub file_name: String,
    pub size: u64,
    pub modified: DateTime<Local>,
}

#[derive(Debug, Clone)]
pub struct Post {
    pub id: PostId,
    pub file: FileInfo,
    /// Full text of the post file
    pub text: String,
    /// Markdown after the front-matter
    pub body: String,
    pub html: Option<String>,
    pub title: String,
    pub date: NaiveDate,
    pub tags: Vec<String>,
    pub words: usize,
    /// Every other front-matter entry
    pub extra: Metadata,

    pub year: String,
    pub month: String,
    pub day: String,
    pub slug: String,
    /// `{year}/{month}/{day}/{slug}`, unique among loaded posts
    pub route: String,
}

/// One line summary: id, title, date, words and file modification time
impl Display for Post {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let (modified_date, modified_time) = format_date_time(&self.file.modified);
        write!(f, "{} | {} | {} | {} words | modified {} {}",
               self.id,
               self.title,
               format_date(&self.date),
               self.words,
               modified_date,
               modified_time,
        )
    }
}

impl Post {
    pub fn from_file(path: &Path, parser: &dyn PostParser) -> Result<Post, BlogError> {
        let io_error = |source: io::Error| BlogError::Io { path: path.to_path_buf(), source };

        let text = fs::read_to_string(path).map_err(io_error)?;
        let metadata = fs::metadata(path).map_err(io_error)?;
        let modified = metadata.modified().map_err(io_error)?;

        let file = FileInfo {
            file_name: path.file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default(),
            size: metadata.len(),
            modified: DateTime::<Local>::from(modified),
        };

        let parsed = parser.parse(&text).map_err(|e| BlogError::InvalidPost {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Self::new(PostId::generate(), file, text, parsed).map_err(|reason| BlogError::InvalidPost {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Builds a post from parsed content. `title`, `date` and `tags` are required.
    pub fn new(id: PostId, file: FileInfo, text: String, parsed: ParsedPost) -> Result<Post, String> {
        let ParsedPost { mut metadata, body, html } = parsed;

        let title = take_required(&mut metadata, "title")?;
        let date = parse_post_date(&take_required(&mut metadata, "date")?)?;
        let tags = split_tags(&take_required(&mut metadata, "tags")?);

        let slug = slugify(&title);
        if slug.is_empty() {
            return Err(format!("Title '{}' has nothing to build a link from", title));
        }

        let year = date.format("%Y").to_string();
        let month = date.format("%m").to_string();
        let day = date.format("%d").to_string();
        let route = format!("{}/{}/{}/{}", year, month, day, slug);
        let words = count_words(&body);

        Ok(Post {
            id,
            file,
            text,
            body,
            html,
            title,
            date,
            tags,
            words,
            extra: metadata,
            year,
            month,
            day,
            slug,
            route,
        })
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Rows describing the post, in display order
    pub fn info(&self) -> Vec<(String, String)> {
        let (modified_date, modified_time) = format_date_time(&self.file.modified);
        let mut rows = vec![
            ("Post ID".to_string(), self.id.to_string()),
            ("Modified".to_string(), format!("{} {}", modified_date, modified_time)),
            ("Title".to_string(), self.title.clone()),
            ("Date".to_string(), format_date(&self.date)),
            ("Tags".to_string(), self.tags.join(", ")),
            ("Words".to_string(), self.words.to_string()),
            ("Filename".to_string(), self.file.file_name.clone()),
            ("Filesize".to_string(), self.file.size.to_string()),
        ];

        for (key, values) in self.extra.iter() {
            rows.push((title_case(key), values.join(", ")));
        }

        rows
    }
}

fn take_required(metadata: &mut Metadata, key: &str) -> Result<String, String> {
    metadata.remove(key)
        .and_then(|values| values.into_iter().next())
        .ok_or_else(|| format!("Missing required field '{}'", key))
}

fn title_case(key: &str) -> String {
    key.split(|c: char| c == ' ' || c == '_' || c == '-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

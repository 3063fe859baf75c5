use std::collections::BTreeMap;
use std::io;
use std::io::ErrorKind;

use lazy_static::lazy_static;
use markdown::Options;
use regex::Regex;

/// Front-matter keys (lowercase) and every value given for them
pub type Metadata = BTreeMap<String, Vec<String>>;

pub struct ParsedPost {
    pub metadata: Metadata,
    pub body: String,
    pub html: Option<String>,
}

/// Extracts metadata and content from the raw text of a post file.
pub trait PostParser: Send + Sync {
    fn parse(&self, raw: &str) -> io::Result<ParsedPost>;
}

/// Parser for markdown posts starting with a block of `Key: value` lines.
///
/// ```text
/// Title: Hello, World!
/// Date: March 04, 2021
/// Tags: Python, Web
/// Summary: A summary spread
///     over two lines
///
/// The post body starts after the first blank line.
/// ```
pub struct MarkdownParser {
    render_html: bool,
}

impl MarkdownParser {
    pub fn new() -> Self {
        MarkdownParser {
            render_html: true,
        }
    }

    /// Only collects metadata, the post html is left empty
    pub fn metadata_only() -> Self {
        MarkdownParser {
            render_html: false,
        }
    }

    fn render_markdown(md_text: &str) -> io::Result<String> {
        match markdown::to_html_with_options(md_text, &Options::gfm()) {
            Ok(x) => Ok(x),
            Err(e) => Err(io::Error::new(ErrorKind::InvalidInput, e.reason)),
        }
    }
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

impl PostParser for MarkdownParser {
    fn parse(&self, raw: &str) -> io::Result<ParsedPost> {
        let (metadata, body) = split_front_matter(raw);
        let html = if self.render_html {
            Some(Self::render_markdown(body)?)
        } else {
            None
        };

        Ok(ParsedPost {
            metadata,
            body: body.to_string(),
            html,
        })
    }
}

pub fn split_front_matter(raw: &str) -> (Metadata, &str) {
    lazy_static! {
        static ref BEGIN_REGEX: Regex = Regex::new(r"^-{3}(\s.*)?$").unwrap();
        static ref END_REGEX: Regex = Regex::new(r"^(-{3}|\.{3})(\s.*)?$").unwrap();
        static ref META_REGEX: Regex = Regex::new(r"^[ ]{0,3}(?P<key>[A-Za-z0-9_-]+):\s*(?P<value>.*)$").unwrap();
        static ref CONTINUATION_REGEX: Regex = Regex::new(r"^[ ]{4,}(?P<value>.*)$").unwrap();
    }

    let mut metadata = Metadata::new();
    let mut key: Option<String> = None;
    let mut body_start = 0;

    for (index, line) in raw.split_inclusive('\n').enumerate() {
        let line_end = body_start + line.len();
        let line = line.trim_end_matches(['\n', '\r']);

        if index == 0 && BEGIN_REGEX.is_match(line) {
            body_start = line_end;
            continue;
        }

        if line.trim().is_empty() || END_REGEX.is_match(line) {
            body_start = line_end;
            break;
        }

        if let Some(cap) = META_REGEX.captures(line) {
            let name = cap["key"].to_lowercase();
            let value = cap["value"].trim().to_string();
            metadata.entry(name.clone()).or_default().push(value);
            key = Some(name);
        } else if let (Some(cap), Some(name)) = (CONTINUATION_REGEX.captures(line), key.as_ref()) {
            let value = cap["value"].trim().to_string();
            metadata.entry(name.clone()).or_default().push(value);
        } else {
            // First line that is not metadata, the body starts here
            break;
        }
        body_start = line_end;
    }

    (metadata, &raw[body_start..])
}

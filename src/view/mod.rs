use std::io;
use std::io::ErrorKind;
use std::path::Path;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use ramhorns::Template;

use crate::blog::Post;
use crate::text_utils::format_date;

pub mod list_renderer;
pub mod page_renderer;
pub mod post_renderer;

pub fn read_template(tpl_dir: &Path, file_name: &str) -> io::Result<String> {
    let full_path = tpl_dir.join(file_name);
    std::fs::read_to_string(&full_path).map_err(|e| {
        io::Error::new(e.kind(), format!("Error loading template {}: {}", full_path.display(), e))
    })
}

fn compile_template<'a>(tpl_src: &'a str, name: &str) -> io::Result<Template<'a>> {
    match Template::new(tpl_src) {
        Ok(x) => Ok(x),
        Err(e) => Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing {} template: {}", name, e))),
    }
}

pub fn post_link(post: &Post) -> String {
    format!("/blog/{}", post.route)
}

/// Tags may hold spaces, slashes or `+`. The router decodes the segment again.
pub fn tag_link(tag: &str) -> String {
    format!("/blog/tag/{}/", utf8_percent_encode(tag, NON_ALPHANUMERIC))
}

#[derive(ramhorns::Content)]
struct ViewTag<'a> {
    tag: &'a str,
    url: String,
}

impl<'a> ViewTag<'a> {
    fn list(tags: &'a [String]) -> Vec<ViewTag<'a>> {
        tags.iter()
            .map(|tag| ViewTag { tag: tag.as_str(), url: tag_link(tag) })
            .collect()
    }
}

#[derive(ramhorns::Content)]
struct PostItem<'a> {
    title: &'a str,
    link: String,
    date: String,
    year: &'a str,
    words: u32,
    summary: String,
    tags: Vec<ViewTag<'a>>,
}

impl<'a> PostItem<'a> {
    fn from_post(post: &'a Post) -> Self {
        PostItem {
            title: post.title.as_str(),
            link: post_link(post),
            date: format_date(&post.date),
            year: post.year.as_str(),
            words: post.words as u32,
            summary: post.extra.get("summary")
                .map(|lines| lines.join(" "))
                .unwrap_or_default(),
            tags: ViewTag::list(&post.tags),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_link() {
        assert_eq!(tag_link("rust"), "/blog/tag/rust/");
        assert_eq!(tag_link("c++ / rust"), "/blog/tag/c%2B%2B%20%2F%20rust/");
        assert_eq!(tag_link("café"), "/blog/tag/caf%C3%A9/");
    }
}

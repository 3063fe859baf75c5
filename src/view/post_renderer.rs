use std::io;

use ramhorns::Template;

use crate::blog::Post;
use crate::text_utils::format_date;
use crate::view::{compile_template, post_link, ViewTag};

#[derive(ramhorns::Content)]
struct ViewItem<'a> {
    id: String,
    link: String,
    post_title: &'a str,
    date: String,
    tags: Vec<ViewTag<'a>>,
    words: u32,
    post_content: &'a str,
    info: Vec<ViewInfo>,
}

#[derive(ramhorns::Content)]
struct ViewInfo {
    key: String,
    value: String,
}

pub struct PostRenderer<'a> {
    pub template: Template<'a>,
}

impl PostRenderer<'_> {
    pub fn new(view_tpl_src: &str) -> io::Result<PostRenderer> {
        let template = compile_template(view_tpl_src, "post view")?;
        Ok(PostRenderer { template })
    }

    pub fn render(&self, post: &Post) -> String {
        let info = post.info().into_iter()
            .map(|(key, value)| ViewInfo { key, value })
            .collect();

        self.template.render(&ViewItem {
            id: post.id.to_string(),
            link: post_link(post),
            post_title: post.title.as_str(),
            date: format_date(&post.date),
            tags: ViewTag::list(&post.tags),
            words: post.words as u32,
            // Posts parsed without html fall back to the markdown source
            post_content: post.html.as_deref().unwrap_or(post.body.as_str()),
            info,
        })
    }
}

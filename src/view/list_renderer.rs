use std::io;
use std::sync::Arc;

use ramhorns::Template;

use crate::blog::Post;
use crate::paginator::{PageItem, Pagination};
use crate::view::{compile_template, tag_link, PostItem};

#[derive(ramhorns::Content)]
struct ListPage<'a> {
    post_list: Vec<PostItem<'a>>,
    tags: Vec<TagCount<'a>>,
    page_list: Vec<ViewPagination>,
    show_pagination: bool,
    has_previous: bool,
    previous_page: u32,
    has_next: bool,
    next_page: u32,
}

#[derive(ramhorns::Content)]
struct FilteredPage<'a> {
    filter_kind: &'a str,
    filter: &'a str,
    post_list: Vec<PostItem<'a>>,
    post_count: u32,
    is_empty: bool,
    tags: Vec<TagCount<'a>>,
}

#[derive(ramhorns::Content)]
struct TagCount<'a> {
    tag: &'a str,
    url: String,
    count: u32,
}

#[derive(ramhorns::Content)]
struct ViewPagination {
    number: u32,
    current: bool,
    gap: bool,
}

/// What a filtered list was filtered by
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ListFilter<'a> {
    Tag(&'a str),
    Year(&'a str),
}

pub struct ListRenderer<'a> {
    pub template: Template<'a>,
}

impl ListRenderer<'_> {
    pub fn new(list_tpl_src: &str) -> io::Result<ListRenderer> {
        let template = compile_template(list_tpl_src, "list")?;
        Ok(ListRenderer { template })
    }

    /// One page of the newest first list
    pub fn render(&self, posts: &[Arc<Post>], pagination: &Pagination, tags: &[(String, usize)]) -> String {
        let post_list = posts.iter().map(|p| PostItem::from_post(p)).collect();

        let page_list: Vec<ViewPagination> = pagination.pages()
            .map(|item| match item {
                PageItem::Page(number) => ViewPagination {
                    number,
                    current: number == pagination.page,
                    gap: false,
                },
                PageItem::Gap => ViewPagination {
                    number: 0,
                    current: false,
                    gap: true,
                },
            })
            .collect();

        self.template.render(&ListPage {
            post_list,
            tags: tag_counts(tags),
            show_pagination: page_list.len() > 1,
            page_list,
            has_previous: pagination.has_previous(),
            previous_page: pagination.page.saturating_sub(1),
            has_next: pagination.has_next(),
            next_page: pagination.page + 1,
        })
    }

    /// Every post matching a tag or a year. No matches is not an error.
    pub fn render_filtered(&self, posts: &[Arc<Post>], filter: ListFilter, tags: &[(String, usize)]) -> String {
        let (filter_kind, filter) = match filter {
            ListFilter::Tag(tag) => ("tag", tag),
            ListFilter::Year(year) => ("year", year),
        };

        self.template.render(&FilteredPage {
            filter_kind,
            filter,
            post_list: posts.iter().map(|p| PostItem::from_post(p)).collect(),
            post_count: posts.len() as u32,
            is_empty: posts.is_empty(),
            tags: tag_counts(tags),
        })
    }
}

fn tag_counts(tags: &[(String, usize)]) -> Vec<TagCount> {
    tags.iter()
        .map(|(tag, count)| TagCount { tag: tag.as_str(), url: tag_link(tag), count: *count as u32 })
        .collect()
}

pub mod blog;
pub mod config;
pub mod content_cache;
pub mod logger;
pub mod paginator;
pub mod project_feed;
pub mod server;
pub mod text_utils;
pub mod view;
mod post_list;
mod test_data;

use std::sync::Arc;

use anyhow::Result;
use chrono::{Datelike, Local};
use ntex::web;
use ntex::web::HttpRequest;
use ntex_files::NamedFile;
use spdlog::{error, info};

use crate::blog::{Blog, BlogError, MarkdownParser};
use crate::config::Config;
use crate::paginator::Pagination;
use crate::project_feed::ProjectFeed;
use crate::view::list_renderer::{ListFilter, ListRenderer};
use crate::view::page_renderer::PageRenderer;
use crate::view::post_renderer::PostRenderer;
use crate::view::read_template;

/// Home, about and contact pages
const PAGE_MAX_AGE: u32 = 21600;
/// Blog lists and posts
const BLOG_MAX_AGE: u32 = 10800;

/// Routes also answered without their trailing slash, by redirecting to it
const SLASHLESS_ROUTES: [&str; 8] = [
    "/home",
    "/index",
    "/about",
    "/contact",
    "/blog",
    "/blog/page/{page}",
    "/blog/tag/{tag}",
    "/blog/year/{year}",
];

pub struct AppState {
    pub config: Config,
    pub blog: Blog,
    pub projects: ProjectFeed,
}

impl AppState {
    /// Points the blog and the project feed to the configured files. Nothing is read yet.
    pub fn new(config: Config) -> Self {
        let blog = Blog::new();
        blog.initialise(config.paths.posts_dir.clone(), Arc::new(MarkdownParser::new()), config.blog.max_cache_age());

        let projects = ProjectFeed::new();
        projects.initialise(config.paths.projects_file.clone());

        AppState {
            config,
            blog,
            projects,
        }
    }

    fn current_year(&self) -> i32 {
        Local::now().year()
    }

    pub fn render_home(&self) -> Result<String> {
        let tpl_src = read_template(&self.config.paths.template_dir, "home.tpl")?;
        let projects = self.projects.get_feed()?;
        let (_, post_count) = self.blog.get_range(0, None)?;

        let renderer = PageRenderer::new(&tpl_src)?;
        Ok(renderer.render_home(&self.config.personal, self.current_year(), post_count, &projects))
    }

    /// About, contact and not found pages
    pub fn render_page(&self, template_name: &str, request_path: &str) -> Result<String> {
        let tpl_src = read_template(&self.config.paths.template_dir, template_name)?;
        let renderer = PageRenderer::new(&tpl_src)?;
        Ok(renderer.render(&self.config.personal, self.current_year(), request_path))
    }

    /// `None` when the page is past the last post
    pub fn render_blog_page(&self, page: u32) -> Result<Option<String>> {
        let per_page = self.config.blog.posts_per_page.max(1);
        let pagination = Pagination::new(page, per_page, 0);
        let (posts, total_count) = self.blog.get_range(pagination.skip(), Some(per_page as usize))?;

        if page == 0 || (posts.is_empty() && page != 1) {
            return Ok(None);
        }

        let tags = self.blog.tags()?;
        let pagination = Pagination::new(page, per_page, total_count as u32);

        let tpl_src = read_template(&self.config.paths.template_dir, "blog.tpl")?;
        let renderer = ListRenderer::new(&tpl_src)?;
        Ok(Some(renderer.render(&posts, &pagination, &tags)))
    }

    pub fn render_post(&self, route: &str) -> Result<String> {
        let post = self.blog.get(route)?;

        let tpl_src = read_template(&self.config.paths.template_dir, "blog_post.tpl")?;
        let renderer = PostRenderer::new(&tpl_src)?;
        Ok(renderer.render(&post))
    }

    pub fn render_filtered(&self, filter: ListFilter) -> Result<String> {
        let posts = match filter {
            ListFilter::Tag(tag) => self.blog.get_with_tag(tag)?,
            ListFilter::Year(year) => self.blog.get_with_year(year)?,
        };
        let tags = self.blog.tags()?;

        let tpl_src = read_template(&self.config.paths.template_dir, "blog_filtered.tpl")?;
        let renderer = ListRenderer::new(&tpl_src)?;
        Ok(renderer.render_filtered(&posts, filter, &tags))
    }
}

type SharedState = web::types::State<Arc<AppState>>;

fn is_not_found(err: &anyhow::Error) -> bool {
    err.downcast_ref::<BlogError>()
        .map(BlogError::is_not_found)
        .unwrap_or(false)
}

fn html_response(rendered: String, max_age: u32) -> web::HttpResponse {
    web::HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .header("Cache-Control", format!("public, max-age={}", max_age))
        .body(rendered)
}

fn redirect(location: &str) -> web::HttpResponse {
    web::HttpResponse::Found()
        .header("Location", location)
        .content_type("text/html; charset=utf-8")
        .finish()
}

fn not_found_response(state: &AppState, req: &HttpRequest) -> web::HttpResponse {
    match state.render_page("404.tpl", req.path()) {
        Ok(rendered) => web::HttpResponse::NotFound()
            .content_type("text/html; charset=utf-8")
            .body(rendered),
        Err(e) => {
            error!("Error rendering not found page for {}: {:#}", req.path(), e);
            web::HttpResponse::NotFound().body("Page not found")
        }
    }
}

fn respond(state: &AppState, req: &HttpRequest, rendered: Result<String>, max_age: u32) -> web::HttpResponse {
    match rendered {
        Ok(rendered) => html_response(rendered, max_age),
        Err(e) if is_not_found(&e) => not_found_response(state, req),
        Err(e) => {
            error!("Error serving {}: {:#}", req.path(), e);
            web::HttpResponse::InternalServerError()
                .content_type("text/html; charset=utf-8")
                .body("Internal server error")
        }
    }
}

async fn add_slash(req: HttpRequest) -> web::HttpResponse {
    let location = match req.uri().query() {
        Some(query) => format!("{}/?{}", req.path(), query),
        None => format!("{}/", req.path()),
    };

    web::HttpResponse::PermanentRedirect()
        .header("Location", location)
        .content_type("text/html; charset=utf-8")
        .finish()
}

#[web::get("/")]
async fn index(req: HttpRequest, state: SharedState) -> web::HttpResponse {
    respond(&state, &req, state.render_home(), PAGE_MAX_AGE)
}

#[web::get("/home/")]
async fn home(req: HttpRequest, state: SharedState) -> web::HttpResponse {
    respond(&state, &req, state.render_home(), PAGE_MAX_AGE)
}

#[web::get("/index/")]
async fn index_page(req: HttpRequest, state: SharedState) -> web::HttpResponse {
    respond(&state, &req, state.render_home(), PAGE_MAX_AGE)
}

#[web::get("/about/")]
async fn about(req: HttpRequest, state: SharedState) -> web::HttpResponse {
    respond(&state, &req, state.render_page("about.tpl", req.path()), PAGE_MAX_AGE)
}

#[web::get("/contact/")]
async fn contact(req: HttpRequest, state: SharedState) -> web::HttpResponse {
    respond(&state, &req, state.render_page("contact.tpl", req.path()), PAGE_MAX_AGE)
}

fn blog_page(req: &HttpRequest, state: &AppState, page: u32) -> web::HttpResponse {
    match state.render_blog_page(page) {
        Ok(Some(rendered)) => html_response(rendered, BLOG_MAX_AGE),
        Ok(None) => redirect("/blog/"),
        Err(e) => respond(state, req, Err(e), BLOG_MAX_AGE),
    }
}

#[web::get("/blog/")]
async fn blog_list(req: HttpRequest, state: SharedState) -> web::HttpResponse {
    blog_page(&req, &state, 1)
}

#[web::get("/blog/page/{page}/")]
async fn blog_paged(req: HttpRequest, path: web::types::Path<u32>, state: SharedState) -> web::HttpResponse {
    blog_page(&req, &state, path.into_inner())
}

#[web::get("/blog/tag/{tag}/")]
async fn blog_by_tag(req: HttpRequest, path: web::types::Path<String>, state: SharedState) -> web::HttpResponse {
    let tag = path.into_inner().to_lowercase();
    respond(&state, &req, state.render_filtered(ListFilter::Tag(&tag)), BLOG_MAX_AGE)
}

#[web::get("/blog/year/{year}/")]
async fn blog_by_year(req: HttpRequest, path: web::types::Path<String>, state: SharedState) -> web::HttpResponse {
    let year = path.into_inner();
    respond(&state, &req, state.render_filtered(ListFilter::Year(&year)), BLOG_MAX_AGE)
}

#[web::get("/blog/{year}/{month}/{day}/{slug}")]
async fn blog_post(
    req: HttpRequest,
    path: web::types::Path<(String, String, String, String)>,
    state: SharedState) -> web::HttpResponse {
    let (year, month, day, slug) = path.into_inner();
    let route = format!("{}/{}/{}/{}", year, month, day, slug);
    respond(&state, &req, state.render_post(&route), BLOG_MAX_AGE)
}

#[web::get("/static/{file_name}")]
async fn static_files(path: web::types::Path<String>, state: SharedState) -> Result<NamedFile, web::Error> {
    if path.contains("..") {
        return Err(web::error::ErrorForbidden("Access forbidden").into());
    }

    let file_path = state.config.paths.public_dir.join(path.into_inner());
    Ok(NamedFile::open(file_path)?)
}

async fn not_found(req: HttpRequest, state: SharedState) -> web::HttpResponse {
    not_found_response(&state, &req)
}

pub async fn server_run(config: Config) -> Result<()> {
    let bind_addr = config.server.address.clone();
    let bind_port = config.server.port;
    info!("Posts are read from {}", config.paths.posts_dir.display());

    let app_state = Arc::new(AppState::new(config));

    web::HttpServer::new(move || {
        let mut app = web::App::new()
            .state(app_state.clone())
            .service(index)
            .service(home)
            .service(index_page)
            .service(about)
            .service(contact)
            .service(blog_list)
            .service(blog_paged)
            .service(blog_by_tag)
            .service(blog_by_year)
            .service(blog_post)
            .service(static_files);

        for route in SLASHLESS_ROUTES {
            app = app.service(web::resource(route).route(web::get().to(add_slash)));
        }

        app.default_service(web::route().to(not_found))
    })
        .bind((bind_addr, bind_port))?
        .run()
        .await?;

    Ok(())
}

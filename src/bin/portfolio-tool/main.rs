use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use portfolio::blog::{Blog, MarkdownParser, DEFAULT_MAX_CACHE_AGE};
use portfolio::project_feed::ProjectFeed;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
enum Args {
    /// Lists the posts of a posts directory, newest first
    List(ListArgs),
    /// Lists the projects of a project feed file
    Projects(ProjectsArgs),
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct ListArgs {
    /// Directory with the post files
    #[arg(short, long)]
    posts_dir: String,

    /// Only posts with this tag
    #[arg(short, long)]
    tag: Option<String>,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct ProjectsArgs {
    /// JSON file with the projects
    #[arg(short, long)]
    file: String,
}

fn list_cmd(args: ListArgs) -> Result<()> {
    let blog = Blog::new();
    blog.initialise(PathBuf::from(args.posts_dir), Arc::new(MarkdownParser::metadata_only()), DEFAULT_MAX_CACHE_AGE);

    let posts = match args.tag {
        Some(ref tag) => blog.get_with_tag(tag)?,
        None => blog.get_range(0, None)?.0,
    };

    println!("{} posts", posts.len());
    for post in posts.iter() {
        println!("{}", post);
    }

    Ok(())
}

fn projects_cmd(args: ProjectsArgs) -> Result<()> {
    let feed = ProjectFeed::new();
    feed.initialise(PathBuf::from(args.file));

    let projects = feed.get_feed()?;
    println!("{} projects", projects.len());
    for project in projects.iter() {
        println!("{} | {} | {} | {}", project.project_id, project.name, project.link, project.description);
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let res = match args {
        Args::List(args) => list_cmd(args),
        Args::Projects(args) => projects_cmd(args),
    };

    match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

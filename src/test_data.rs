#[cfg(test)]
pub const POST_DATA: &str = "Title: What I learned after 20+ years of software development
Date: April 02, 2022
Tags: Career, Software
Summary: A list of things I try to do
    every day

How to be a great software engineer?

Someone asked me this question today and I didn’t have an answer. After thinking for a while, I came up with a list of what I try to do myself.

## Non technical

### Have a honest image of yourself

You finished university and learned a lot. You solved many hard problems.
";

#[cfg(test)]
pub const PROJECTS_DATA: &str = r#"[
  {
    "project_id": 1,
    "name": "Notebook",
    "description": "A markdown blog platform",
    "link": "https://github.com/example/notebook",
    "link_description": "Source on GitHub"
  },
  {
    "project_id": "portfolio",
    "name": "Portfolio",
    "description": "This website",
    "link": "https://example.com",
    "link_description": "Visit"
  }
]"#;

/// Writes a post file with the usual front-matter into `dir`.
#[cfg(test)]
pub fn write_post(dir: &std::path::Path, file_name: &str, title: &str, date: &str, tags: &str) {
    let content = format!("Title: {}\nDate: {}\nTags: {}\n\nSome words about {}.\n", title, date, tags, title);
    std::fs::write(dir.join(file_name), content).unwrap();
}

use std::io;

use ramhorns::Template;

use crate::config::Personal;
use crate::project_feed::Project;
use crate::view::compile_template;

#[derive(ramhorns::Content)]
struct HomePage<'a> {
    name: &'a str,
    contact_email: &'a str,
    years_active: i64,
    post_count: i64,
    projects: Vec<ViewProject<'a>>,
    has_projects: bool,
}

#[derive(ramhorns::Content)]
struct ViewProject<'a> {
    project_id: &'a str,
    name: &'a str,
    description: &'a str,
    link: &'a str,
    link_description: &'a str,
}

/// About, contact and error pages only need the site owner
#[derive(ramhorns::Content)]
struct PersonalPage<'a> {
    name: &'a str,
    contact_email: &'a str,
    years_active: i64,
    request_path: &'a str,
}

pub fn years_since(start_year: i32, current_year: i32) -> i64 {
    (current_year - start_year).max(0) as i64
}

pub struct PageRenderer<'a> {
    pub template: Template<'a>,
}

impl PageRenderer<'_> {
    pub fn new(tpl_src: &str) -> io::Result<PageRenderer> {
        let template = compile_template(tpl_src, "page")?;
        Ok(PageRenderer { template })
    }

    pub fn render_home(&self, personal: &Personal, current_year: i32, post_count: usize, projects: &[Project]) -> String {
        let projects: Vec<ViewProject> = projects.iter()
            .map(|p| ViewProject {
                project_id: p.project_id.as_str(),
                name: p.name.as_str(),
                description: p.description.as_str(),
                link: p.link.as_str(),
                link_description: p.link_description.as_str(),
            })
            .collect();

        self.template.render(&HomePage {
            name: personal.name.as_str(),
            contact_email: personal.contact_email.as_str(),
            years_active: years_since(personal.activity_start_year, current_year),
            post_count: post_count as i64,
            has_projects: !projects.is_empty(),
            projects,
        })
    }

    pub fn render(&self, personal: &Personal, current_year: i32, request_path: &str) -> String {
        self.template.render(&PersonalPage {
            name: personal.name.as_str(),
            contact_email: personal.contact_email.as_str(),
            years_active: years_since(personal.activity_start_year, current_year),
            request_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn personal() -> Personal {
        Personal {
            name: "Jane Doe".to_string(),
            activity_start_year: 2004,
            contact_email: "jane@example.com".to_string(),
        }
    }

    #[test]
    fn render_home() {
        let renderer = PageRenderer::new(
            "{{name}} {{years_active}}y {{post_count}} posts{{#projects}} [{{project_id}}:{{name}}|{{link}}]{{/projects}}{{^has_projects}} none{{/has_projects}}"
        ).unwrap();

        let projects = vec![Project {
            project_id: "1".to_string(),
            name: "notebook".to_string(),
            description: "A markdown blog platform".to_string(),
            link: "https://github.com/example/notebook".to_string(),
            link_description: "Source".to_string(),
        }];

        assert_eq!(renderer.render_home(&personal(), 2024, 12, &projects),
                   "Jane Doe 20y 12 posts [1:notebook|https://github.com/example/notebook]");
        assert_eq!(renderer.render_home(&personal(), 2024, 0, &[]), "Jane Doe 20y 0 posts none");
    }

    #[test]
    fn render_personal_page() {
        let renderer = PageRenderer::new("{{contact_email}} {{request_path}}").unwrap();
        assert_eq!(renderer.render(&personal(), 2024, "/missing/"), "jane@example.com /missing/");
    }

    #[test]
    fn test_years_since() {
        assert_eq!(years_since(2004, 2024), 20);
        assert_eq!(years_since(2030, 2024), 0);
    }

    #[test]
    fn invalid_template() {
        let err = PageRenderer::new("Hello {{name").err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(err.to_string().starts_with("Error parsing page template"));
    }
}

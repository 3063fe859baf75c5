use std::{fs, io};
use std::path::{Path, PathBuf};

pub struct PostList {
    pub root_dir: PathBuf,
}

impl PostList {
    pub fn new(root_dir: &Path) -> Self {
        PostList {
            root_dir: root_dir.to_path_buf(),
        }
    }

    /// Every regular, non-hidden file in the posts directory, sorted by file name.
    pub fn retrieve_files(&self) -> io::Result<Vec<PathBuf>> {
        let mut posts = vec![];
        let entries = fs::read_dir(self.root_dir.as_path())?;
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }

            // Platform files such as .DS_Store are not posts
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }

            posts.push(entry.path());
        }

        posts.sort();
        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retrieve_files() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("b-post.md"), "b")?;
        fs::write(dir.path().join("a-post.md"), "a")?;
        fs::write(dir.path().join(".DS_Store"), "")?;
        fs::create_dir(dir.path().join("drafts"))?;
        fs::write(dir.path().join("drafts").join("c-post.md"), "c")?;

        let post_list = PostList::new(dir.path());
        let files = post_list.retrieve_files()?;
        let names: Vec<String> = files.iter()
            .map(|f| f.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, ["a-post.md", "b-post.md"]);
        Ok(())
    }

    #[test]
    fn test_missing_dir() {
        let post_list = PostList::new(Path::new("this/does/not/exist"));
        assert!(post_list.retrieve_files().is_err());
    }
}

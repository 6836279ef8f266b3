use std::sync::Mutex;

use git2::Oid;

use crate::error::{ModtagError, Result};
use crate::git::{CommitInfo, TagInfo};

/// In-memory [Repository](super::Repository) with a linear history, for
/// engine tests that don't need a real repository on disk.
///
/// Commits are held newest first, the way a history walk produces them.
/// Tag creations and pushes are recorded instead of applied so tests can
/// assert on them.
pub struct MockRepository {
    commits: Vec<CommitInfo>,
    tags: Vec<TagInfo>,
    next_id: u8,
    created: Mutex<Vec<String>>,
    pushed: Mutex<Vec<(String, Vec<String>)>>,
}

impl MockRepository {
    pub fn new() -> Self {
        MockRepository {
            commits: Vec::new(),
            tags: Vec::new(),
            next_id: 1,
            created: Mutex::new(Vec::new()),
            pushed: Mutex::new(Vec::new()),
        }
    }

    /// Append a commit to the history and return its id
    pub fn commit(&mut self, message: &str, paths: &[&str]) -> Oid {
        let id = Oid::from_bytes(&[self.next_id; 20]).expect("constant-width oid");
        self.next_id += 1;
        self.commits.insert(
            0,
            CommitInfo {
                id,
                message: message.to_string(),
                paths: paths.iter().map(|p| p.to_string()).collect(),
            },
        );
        id
    }

    /// Tag the current head commit
    pub fn tag_head(&mut self, name: &str) {
        let target = self.commits.first().expect("tag on empty history").id;
        self.tags.push(TagInfo {
            name: name.to_string(),
            target,
        });
    }

    /// Tag names passed to `create_annotated_tag`, in call order
    pub fn created_tags(&self) -> Vec<String> {
        self.created.lock().expect("created lock").clone()
    }

    /// `(remote, refs)` pairs passed to `push`, in call order
    pub fn pushes(&self) -> Vec<(String, Vec<String>)> {
        self.pushed.lock().expect("pushed lock").clone()
    }

    fn index_of(&self, id: Oid) -> Result<usize> {
        self.commits
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| ModtagError::driver("lookup", git2::Error::from_str("unknown commit")))
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl super::Repository for MockRepository {
    fn head(&self) -> Result<CommitInfo> {
        self.commits
            .first()
            .cloned()
            .ok_or_else(|| ModtagError::driver("head", git2::Error::from_str("empty repository")))
    }

    fn walk_commits(&self, from: Oid, until: Option<Oid>) -> Result<Vec<CommitInfo>> {
        let start = self.index_of(from)?;
        let end = match until {
            Some(until) => self.index_of(until)?,
            None => self.commits.len(),
        };
        Ok(self.commits[start..end].to_vec())
    }

    fn tags_reachable_from(&self, from: Oid) -> Result<Vec<TagInfo>> {
        let start = self.index_of(from)?;
        let mut reachable = Vec::new();
        for tag in &self.tags {
            if self.index_of(tag.target)? >= start {
                reachable.push(tag.clone());
            }
        }
        Ok(reachable)
    }

    fn create_annotated_tag(&self, name: &str, _target: Oid, _message: &str) -> Result<()> {
        self.created.lock().expect("created lock").push(name.to_string());
        Ok(())
    }

    fn push(&self, remote: &str, refs: &[String]) -> Result<()> {
        self.pushed
            .lock()
            .expect("pushed lock")
            .push((remote.to_string(), refs.to_vec()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::Repository;

    #[test]
    fn test_walk_stops_at_until() {
        let mut repo = MockRepository::new();
        let first = repo.commit("feat: one", &["a"]);
        repo.commit("feat: two", &["b"]);
        let head = repo.commit("feat: three", &["c"]);

        let all = repo.walk_commits(head, None).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].message, "feat: three");

        let since = repo.walk_commits(head, Some(first)).unwrap();
        assert_eq!(since.len(), 2);
    }

    #[test]
    fn test_tags_reachable_excludes_descendants() {
        let mut repo = MockRepository::new();
        let first = repo.commit("feat: one", &["a"]);
        repo.tag_head("v1.0.0");
        repo.commit("feat: two", &["b"]);
        repo.tag_head("v1.1.0");

        // from the first commit, only the older tag is visible
        let tags = repo.tags_reachable_from(first).unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "v1.0.0");
    }

    #[test]
    fn test_records_created_tags_and_pushes() {
        let mut repo = MockRepository::new();
        let head = repo.commit("release: it", &["CHANGELOG.md"]);

        repo.create_annotated_tag("v1.0.0", head, "v1.0.0").unwrap();
        repo.push("origin", &["v1.0.0".to_string()]).unwrap();

        assert_eq!(repo.created_tags(), vec!["v1.0.0"]);
        assert_eq!(
            repo.pushes(),
            vec![("origin".to_string(), vec!["v1.0.0".to_string()])]
        );
    }
}

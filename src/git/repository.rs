use std::path::{Path, PathBuf};

use git2::{Oid, Repository as Git2Repo, Signature};

use crate::error::{ModtagError, Result};
use crate::git::{CommitInfo, TagInfo};

/// Repository driver backed by the `git2` bindings to libgit2.
///
/// Read operations are safe to share across threads; tag creation and push
/// mutate the ref store, so concurrent invocations against the same
/// working tree must be serialized by the caller.
pub struct Git2Repository {
    repo: Git2Repo,
}

impl std::fmt::Debug for Git2Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git2Repository")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git2Repository {
    /// Discover and open the repository containing `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path.as_ref()).map_err(|_| ModtagError::NotARepository {
            path: path.as_ref().to_path_buf(),
        })?;
        Ok(Git2Repository { repo })
    }

    /// Root of the working tree, for module discovery
    pub fn workdir(&self) -> Option<PathBuf> {
        self.repo.workdir().map(Path::to_path_buf)
    }

    fn commit_info(&self, id: Oid) -> Result<CommitInfo> {
        let commit = self
            .repo
            .find_commit(id)
            .map_err(|e| ModtagError::driver("lookup", e))?;

        let tree = commit.tree().map_err(|e| ModtagError::driver("lookup", e))?;
        let parent_tree = match commit.parent(0) {
            Ok(parent) => Some(parent.tree().map_err(|e| ModtagError::driver("lookup", e))?),
            Err(_) => None,
        };

        let diff = self
            .repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)
            .map_err(|e| ModtagError::driver("diff", e))?;

        let mut paths = Vec::new();
        for delta in diff.deltas() {
            for file in [delta.old_file().path(), delta.new_file().path()] {
                if let Some(p) = file {
                    let p = p.to_string_lossy().replace('\\', "/");
                    if !paths.contains(&p) {
                        paths.push(p);
                    }
                }
            }
        }

        Ok(CommitInfo {
            id,
            message: commit.message().unwrap_or("").to_string(),
            paths,
        })
    }
}

impl super::Repository for Git2Repository {
    fn head(&self) -> Result<CommitInfo> {
        let head = self
            .repo
            .head()
            .and_then(|r| r.peel_to_commit())
            .map_err(|e| ModtagError::driver("head", e))?;
        self.commit_info(head.id())
    }

    fn walk_commits(&self, from: Oid, until: Option<Oid>) -> Result<Vec<CommitInfo>> {
        let mut revwalk = self
            .repo
            .revwalk()
            .map_err(|e| ModtagError::driver("walk", e))?;
        revwalk
            .push(from)
            .map_err(|e| ModtagError::driver("walk", e))?;
        if let Some(until) = until {
            revwalk
                .hide(until)
                .map_err(|e| ModtagError::driver("walk", e))?;
        }

        let mut commits = Vec::new();
        for oid in revwalk {
            let oid = oid.map_err(|e| ModtagError::driver("walk", e))?;
            commits.push(self.commit_info(oid)?);
        }
        Ok(commits)
    }

    fn tags_reachable_from(&self, from: Oid) -> Result<Vec<TagInfo>> {
        let names = self
            .repo
            .tag_names(None)
            .map_err(|e| ModtagError::driver("tags", e))?;

        let mut tags = Vec::new();
        for name in names.iter().flatten() {
            let reference = match self.repo.find_reference(&format!("refs/tags/{}", name)) {
                Ok(r) => r,
                Err(_) => continue,
            };
            let target = match reference.peel_to_commit() {
                Ok(c) => c.id(),
                Err(_) => continue,
            };

            let reachable = target == from
                || self
                    .repo
                    .graph_descendant_of(from, target)
                    .map_err(|e| ModtagError::driver("tags", e))?;
            if reachable {
                tags.push(TagInfo {
                    name: name.to_string(),
                    target,
                });
            }
        }
        Ok(tags)
    }

    fn create_annotated_tag(&self, name: &str, target: Oid, message: &str) -> Result<()> {
        if let Ok(existing) = self.repo.find_reference(&format!("refs/tags/{}", name)) {
            let existing_target = existing
                .peel_to_commit()
                .map_err(|e| ModtagError::driver("tag", e))?
                .id();
            if existing_target == target {
                return Ok(());
            }
            return Err(ModtagError::driver(
                "tag",
                git2::Error::from_str(&format!(
                    "tag '{}' already exists on {}",
                    name, existing_target
                )),
            ));
        }

        let object = self
            .repo
            .find_object(target, None)
            .map_err(|e| ModtagError::driver("tag", e))?;
        let signature = self
            .repo
            .signature()
            .or_else(|_| Signature::now("modtag", "modtag@localhost"))
            .map_err(|e| ModtagError::driver("tag", e))?;

        self.repo
            .tag(name, &object, &signature, message, false)
            .map_err(|e| ModtagError::driver("tag", e))?;
        Ok(())
    }

    fn push(&self, remote: &str, refs: &[String]) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(remote)
            .map_err(|e| ModtagError::driver("push", e))?;

        let refspecs: Vec<String> = refs
            .iter()
            .map(|name| format!("refs/tags/{}:refs/tags/{}", name, name))
            .collect();
        let refspecs: Vec<&str> = refspecs.iter().map(String::as_str).collect();

        remote
            .push(&refspecs, None)
            .map_err(|e| ModtagError::driver("push", e))?;
        Ok(())
    }
}

// SAFETY: Git2Repository only hands out owned values and git2's read paths
// are thread-safe through libgit2.
unsafe impl Sync for Git2Repository {}

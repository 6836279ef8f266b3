//! Repository driver abstraction.
//!
//! The engine consumes git through the [Repository] trait so it can run
//! against a real repository ([repository::Git2Repository]) or an
//! in-memory one ([mock::MockRepository]) in tests. Implementations map
//! their underlying errors to [crate::error::ModtagError::Driver] with the
//! operation that failed.

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use git2::Oid;

use crate::error::Result;

/// A commit as the engine sees it: identifier, full message, and the file
/// paths it changed relative to its first parent (forward-slashed,
/// repository-root-relative).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub id: Oid,
    pub message: String,
    pub paths: Vec<String>,
}

/// A tag name and the commit it points at (peeled for annotated tags)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInfo {
    pub name: String,
    pub target: Oid,
}

/// Read and mutate operations the version engine needs from a repository.
///
/// Reads never change the ref store; the only mutations are
/// [Repository::create_annotated_tag] and [Repository::push], and the
/// engine batches them (all tags, then one push). Implementors must be
/// `Send + Sync`.
pub trait Repository: Send + Sync {
    /// The commit HEAD points at
    fn head(&self) -> Result<CommitInfo>;

    /// Commits reachable from `from` excluding those reachable from
    /// `until`, newest first. `None` walks the whole history of `from`.
    fn walk_commits(&self, from: Oid, until: Option<Oid>) -> Result<Vec<CommitInfo>>;

    /// Tags whose target is an ancestor of `from` (or `from` itself);
    /// descendants are never returned.
    fn tags_reachable_from(&self, from: Oid) -> Result<Vec<TagInfo>>;

    /// Create an annotated tag at `target`. Re-creating an identical tag
    /// succeeds; an existing tag of the same name on a different commit is
    /// an error.
    fn create_annotated_tag(&self, name: &str, target: Oid, message: &str) -> Result<()>;

    /// Push tag refs to the named remote
    fn push(&self, remote: &str, refs: &[String]) -> Result<()>;
}

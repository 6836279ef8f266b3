//! Repository-building helpers shared by the integration tests.
//!
//! Each builder lays out a small repository in a temporary directory with
//! git2, mirroring layouts the engine has to handle: a single root module
//! with a submodule, v1/v2 split across branches, v2 in a subdirectory,
//! and mixed prefixed/unprefixed tags.

use std::fs;
use std::path::Path;

use git2::build::CheckoutBuilder;
use git2::{Commit, Oid, Repository, Signature};

pub struct TestRepo {
    dir: tempfile::TempDir,
    pub repo: Repository,
}

pub fn init() -> TestRepo {
    let dir = tempfile::tempdir().unwrap();
    let repo = Repository::init(dir.path()).unwrap();
    let mut config = repo.config().unwrap();
    config.set_str("user.name", "tagger tests").unwrap();
    config.set_str("user.email", "tagger-tests@localhost").unwrap();
    TestRepo { dir, repo }
}

impl TestRepo {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn commit_file(&self, file: &str, message: &str, contents: &str) -> Oid {
        self.commit_files(message, &[(file, contents)])
    }

    pub fn commit_files(&self, message: &str, files: &[(&str, &str)]) -> Oid {
        let mut index = self.repo.index().unwrap();
        for (file, contents) in files {
            let path = self.dir.path().join(file);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, contents).unwrap();
            index.add_path(Path::new(file)).unwrap();
        }
        index.write().unwrap();

        let tree_id = index.write_tree().unwrap();
        let tree = self.repo.find_tree(tree_id).unwrap();
        let sig: Signature = self.repo.signature().unwrap();

        let parent = self.repo.head().ok().map(|h| h.peel_to_commit().unwrap());
        let parents: Vec<&Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    /// Lightweight tag on the current HEAD commit
    pub fn tag(&self, name: &str) {
        let head = self.repo.head().unwrap().peel_to_commit().unwrap();
        self.repo
            .tag_lightweight(name, head.as_object(), false)
            .unwrap();
    }

    pub fn head_ref(&self) -> String {
        self.repo.head().unwrap().name().unwrap().to_string()
    }

    pub fn branch_at(&self, name: &str, target: Oid) {
        let commit = self.repo.find_commit(target).unwrap();
        self.repo.branch(name, &commit, false).unwrap();
    }

    /// Check out another branch, forcing the working tree to match
    pub fn switch(&self, refname: &str) {
        self.repo.set_head(refname).unwrap();
        let mut checkout = CheckoutBuilder::new();
        checkout.force();
        self.repo.checkout_head(Some(&mut checkout)).unwrap();
    }
}

/// Root module `foo` tagged v1.0.0, plus `foo/sub/module` tagged
/// sub/module/v0.1.0 with one fix on top.
pub fn simple_repo() -> TestRepo {
    let r = init();
    r.commit_file("foo.txt", "feat: foo", "foo\n");
    r.tag("v1.0.0");
    r.commit_file("bar.txt", "feat: bar\n\nThis is a great bar.", "bar\n");
    r.commit_file("go.mod", "feat: add go.mod", "module foo\n");
    r.commit_file("sub/module/go.mod", "feat: add a submodule", "module foo/sub/module\n");
    r.commit_file("sub/module/file", "feat: add a file to submodule", "some data");
    r.tag("sub/module/v0.1.0");
    r.commit_file("sub/module/file", "fix: fix submodule", "some more data");
    r
}

/// No manifests anywhere, just commits and a v1.0.0 tag
pub fn plain_repo() -> TestRepo {
    let r = init();
    r.commit_file("foo.txt", "feat: foo", "foo\n");
    r.tag("v1.0.0");
    r.commit_file("bar.txt", "feat: bar", "bar\n");
    r
}

fn setup_v1(r: &TestRepo) -> Oid {
    r.commit_file("go.mod", "feat: add go.mod", "module foo\n");
    r.tag("v1.0.0");
    let head = r.commit_file("bar/go.mod", "feat: add bar/go.mod", "module foo/bar\n");
    r.tag("bar/v1.0.0");
    head
}

fn setup_v2(r: &TestRepo) -> Oid {
    r.commit_file("go.mod", "feat!: add foo/v2 go.mod", "module foo/v2\n");
    r.tag("v2.0.0");
    let head = r.commit_file("bar/go.mod", "feat!: add bar/v2 go.mod", "module foo/bar/v2\n");
    r.tag("bar/v2.0.0");
    head
}

/// `foo` and `foo/bar` on the default branch; their v2 successors live on
/// a `v2` branch, so the v2 tags are not reachable from HEAD.
pub fn master_v1_repo() -> TestRepo {
    let r = init();
    let head = setup_v1(&r);
    let default_ref = r.head_ref();

    r.branch_at("v2", head);
    r.switch("refs/heads/v2");
    setup_v2(&r);
    r.switch(&default_ref);
    r
}

/// `foo/v2` and `foo/bar/v2` on the default branch, with the v1 history
/// preserved on a `v1` branch.
pub fn master_v2_repo() -> TestRepo {
    let r = init();
    let head = setup_v1(&r);
    r.branch_at("v1", head);
    setup_v2(&r);
    r
}

/// All four modules in one tree: `foo` at the root with `v2/` beside it,
/// `foo/bar` under `bar/` with `bar/v2/` beside it.
pub fn v2_dir_repo() -> TestRepo {
    let r = init();
    r.commit_file("go.mod", "feat: add go.mod", "module foo\n");
    r.tag("v1.0.0");
    r.commit_file("bar/go.mod", "feat: add bar/go.mod", "module foo/bar\n");
    r.tag("bar/v1.0.0");
    r.commit_file("v2/go.mod", "feat!: add v2/go.mod", "module foo/v2\n");
    r.tag("v2.0.0");
    r.commit_file("bar/v2/go.mod", "feat!: add bar/v2/go.mod", "module foo/bar/v2\n");
    r.tag("bar/v2.0.0");
    r
}

/// A root module carrying both a v-prefixed and an unprefixed tag line
pub fn mixed_tag_repo() -> TestRepo {
    let r = init();
    r.commit_file("go.mod", "feat: add go.mod", "module foo\n");
    r.tag("v1.0.0");
    r.commit_file("foo.go", "feat: add foo.go", "foo\n");
    r.commit_file("bar.go", "feat: add bar.go", "bar\n");
    r.tag("0.1.0");
    r
}

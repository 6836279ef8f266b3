//! The version engine: combines module discovery, commit attribution and
//! conventional-commit semantics into next-version decisions, and
//! materializes them as tags through the repository driver.

use std::path::{Path, PathBuf};

use git2::Oid;

use crate::attribute;
use crate::config::Config;
use crate::conventional::{self, ConventionalCommit};
use crate::discover;
use crate::domain::{Module, Version, VersionBump};
use crate::error::{ModtagError, Result};
use crate::git::{CommitInfo, Git2Repository, Repository};

/// Computes next versions for the modules of a working tree.
///
/// A `Tagger` holds the immutable [Config] for one invocation plus the
/// repository driver. It keeps no other state: every public operation
/// re-reads the working tree and the ref store, and only
/// [Tagger::tag_repo] ever writes (when `create_tag` is set).
#[derive(Debug)]
pub struct Tagger<R: Repository> {
    pub config: Config,
    root: PathBuf,
    repo: R,
}

impl Tagger<Git2Repository> {
    /// Open the repository containing `path` with default configuration
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repository::open(path.as_ref())?;
        let root = repo.workdir().ok_or_else(|| ModtagError::NotARepository {
            path: path.as_ref().to_path_buf(),
        })?;
        Ok(Tagger {
            config: Config::default(),
            root,
            repo,
        })
    }
}

impl<R: Repository> Tagger<R> {
    /// Build a tagger over an explicit driver and working-tree root
    pub fn with_repository(config: Config, root: impl Into<PathBuf>, repo: R) -> Self {
        Tagger {
            config,
            root: root.into(),
            repo,
        }
    }

    /// Next version of the primary module: the first discovered module, or
    /// the repository root when nothing declares a manifest.
    ///
    /// When HEAD already carries a tag for the primary module that
    /// outranks the computed version, that tag wins; a hand-tagged higher
    /// number is never regressed.
    pub fn version(&self) -> Result<String> {
        let modules = self.modules_or_root()?;
        let head = self.repo.head()?;
        let primary = &modules[0];

        let mut best = self.next_version(primary, &modules, &head)?;
        for tag in self.repo.tags_reachable_from(head.id)? {
            if tag.target != head.id {
                continue;
            }
            if let Some(v) = self.module_tag_version(&tag.name, primary, &modules) {
                if v > best {
                    best = v;
                }
            }
        }
        Ok(best.to_string())
    }

    /// Next tags (`<module prefix><version prefix><version>`) for the
    /// requested import paths, or for every module when `names` is empty.
    /// Results follow discovery order.
    pub fn module_versions(&self, names: &[String]) -> Result<Vec<String>> {
        let modules = self.find_all_modules()?;
        let head = self.repo.head()?;

        let mut tags = Vec::new();
        for module in &modules {
            if !names.is_empty() && !names.iter().any(|n| n == &module.name) {
                continue;
            }
            let next = self.next_version(module, &modules, &head)?;
            tags.push(format!("{}{}", module.prefix, next));
        }
        Ok(tags)
    }

    /// Compute the tags a release of HEAD produces, and create them when
    /// configured to.
    ///
    /// A release commit (conventional type `release`) names its modules in
    /// a `Modules` footer, or implicitly releases the module its tree
    /// delta touches. The declared set must match the changed set exactly;
    /// tags come back in footer order. When HEAD is not a release commit
    /// the next tags for all modules are returned and no refs change.
    pub fn tag_repo(&self) -> Result<Vec<String>> {
        let head = self.repo.head()?;
        let commit = ConventionalCommit::parse(&head.message);
        if !commit.is_release() {
            return self.module_versions(&[]);
        }

        let modules = self.modules_or_root()?;
        let changed = attribute::changed_modules(&head.paths, &modules);

        let names = commit.modules();
        let declared: Vec<Module> = if names.is_empty() {
            changed.first().cloned().into_iter().collect()
        } else {
            names
                .iter()
                .filter_map(|name| modules.iter().find(|m| &m.name == name).cloned())
                .collect()
        };

        validate_commit_modules(&declared, &changed)?;

        let mut tags = Vec::new();
        for module in &declared {
            let next = self.next_version(module, &modules, &head)?;
            tags.push(format!("{}{}", module.prefix, next));
        }

        if self.config.create_tag {
            for tag in &tags {
                self.repo.create_annotated_tag(tag, head.id, tag)?;
            }
            if self.config.push {
                self.repo.push(&self.config.remote, &tags)?;
            }
        }
        Ok(tags)
    }

    fn find_all_modules(&self) -> Result<Vec<Module>> {
        discover::find_modules(&self.root, &[], &self.config.exclude_modules)
    }

    fn modules_or_root(&self) -> Result<Vec<Module>> {
        let modules = self.find_all_modules()?;
        Ok(if modules.is_empty() {
            vec![Module::root()]
        } else {
            modules
        })
    }

    /// Highest version tagged for `module` among the ancestors of `head`,
    /// with the commit that carries it. `0.0.0` and no commit when the
    /// module was never tagged.
    fn latest(
        &self,
        module: &Module,
        modules: &[Module],
        head: &CommitInfo,
    ) -> Result<(Version, Option<Oid>)> {
        let mut best: Option<(Version, Oid)> = None;
        for tag in self.repo.tags_reachable_from(head.id)? {
            let Some(version) = self.module_tag_version(&tag.name, module, modules) else {
                continue;
            };
            // ties go to the later tag in driver order
            match &best {
                Some((current, _)) if *current > version => {}
                _ => best = Some((version, tag.target)),
            }
        }
        Ok(match best {
            Some((version, target)) => (version, Some(target)),
            None => (Version::zero(self.config.version_prefix.as_str()), None),
        })
    }

    /// Parse a tag name as a version of `module`, enforcing prefix and
    /// major-version discipline. `None` for tags that belong to another
    /// module, carry a foreign prefix, or don't parse at all.
    fn module_tag_version(&self, name: &str, module: &Module, modules: &[Module]) -> Option<Version> {
        let name = name.strip_prefix("refs/tags/").unwrap_or(name);
        let rest = name.strip_prefix(&module.prefix)?;
        let version = Version::parse(rest, &self.config.version_prefix).ok()?;

        match module.major_suffix() {
            // a /vN module only ever owns major N
            Some(n) => (version.major() == n).then_some(version),
            // an unsuffixed module cedes majors owned by suffixed siblings
            // sharing its tag prefix
            None => {
                let ceded = modules.iter().any(|sibling| {
                    sibling != module
                        && sibling.prefix == module.prefix
                        && sibling.major_suffix() == Some(version.major())
                });
                (!ceded).then_some(version)
            }
        }
    }

    /// Next version for `module` per the bump rules, seeded from its
    /// latest tag
    fn next_version(&self, module: &Module, modules: &[Module], head: &CommitInfo) -> Result<Version> {
        let (latest, tagged_at) = self.latest(module, modules, head)?;

        let commits = self.repo.walk_commits(head.id, tagged_at)?;
        let groups = attribute::group_commits(&commits, modules);
        let parsed: Vec<ConventionalCommit> = groups
            .get(module)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .map(|c| ConventionalCommit::parse(&c.message))
            .collect();

        Ok(self.apply_bump(&latest, conventional::version_bump(&parsed)))
    }

    fn apply_bump(&self, latest: &Version, bump: VersionBump) -> Version {
        match bump {
            VersionBump::Major if latest.major() == 0 && self.config.pre_major => {
                latest.bump(VersionBump::Minor)
            }
            VersionBump::Major if latest.major() == 0 => {
                Version::new(latest.prefix.as_str(), 1, 0, 0)
            }
            other => latest.bump(other),
        }
    }
}

/// Check that a release commit's declared modules are exactly the modules
/// its tree delta touched.
fn validate_commit_modules(declared: &[Module], changed: &[Module]) -> Result<()> {
    let mut extra: Vec<&str> = declared
        .iter()
        .filter(|m| !changed.contains(m))
        .map(|m| m.name.as_str())
        .collect();
    let mut missing: Vec<&str> = changed
        .iter()
        .filter(|m| !declared.contains(m))
        .map(|m| m.name.as_str())
        .collect();

    if extra.is_empty() && missing.is_empty() {
        return Ok(());
    }

    extra.sort_unstable();
    missing.sort_unstable();

    let mut message = String::from("module validation failed:");
    if !extra.is_empty() {
        message.push_str("\nmodules not changed by commit: ");
        message.push_str(&extra.join(", "));
    }
    if !missing.is_empty() {
        message.push_str("\nchanged modules not released by commit: ");
        message.push_str(&missing.join(", "));
    }
    Err(ModtagError::ModuleValidation(message))
}

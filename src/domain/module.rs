use regex::Regex;

/// An addressable unit of versioning inside a repository.
///
/// `path` is the directory the manifest lives in (`.` for the root, always
/// forward-slashed). `name` is the import path the manifest declares.
/// `prefix` is what gets prepended to version numbers when forming tags:
/// empty for root-level modules, `<subdir>/` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Module {
    pub path: String,
    pub name: String,
    pub prefix: String,
}

impl Module {
    /// Build a module from its relative directory and declared import path,
    /// deriving the tag prefix.
    ///
    /// The prefix comes from the directory, not the import path, but a
    /// trailing `vN` directory component is dropped when it matches the
    /// import path's major suffix: `v2/` holding `foo/v2` emits unprefixed
    /// tags (`v2.0.0`), while `bar/v2/` holding `foo/bar/v2` emits
    /// `bar/`-prefixed ones (`bar/v2.1.0`).
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        let path = path.into().replace('\\', "/");
        let name = name.into();

        let mut prefix = if path == "." { String::new() } else { path.clone() };
        if let Some(n) = major_suffix(&name) {
            let suffix = format!("v{}", n);
            if prefix == suffix {
                prefix.clear();
            } else if let Some(parent) = prefix.strip_suffix(&format!("/{}", suffix)) {
                prefix = parent.to_string();
            }
        }
        if !prefix.is_empty() {
            prefix.push('/');
        }

        Module { path, name, prefix }
    }

    /// A stand-in for repositories with no manifest at all: the whole tree
    /// versioned as one unnamed root module.
    pub fn root() -> Self {
        Module {
            path: ".".to_string(),
            name: String::new(),
            prefix: String::new(),
        }
    }

    /// `Some(N)` when the import path ends in `/vN` with N >= 2.
    pub fn major_suffix(&self) -> Option<u64> {
        major_suffix(&self.name)
    }

    /// Whether a repository-root-relative file path lies in this module's
    /// directory (ignoring deeper sibling modules; see `attribute`).
    pub fn contains(&self, file: &str) -> bool {
        if self.path == "." {
            return true;
        }
        file.strip_prefix(&self.path)
            .map_or(false, |rest| rest.starts_with('/'))
    }
}

fn major_suffix(name: &str) -> Option<u64> {
    let (_, last) = name.rsplit_once('/')?;
    let re = Regex::new(r"^v(\d+)$").expect("major suffix pattern");
    let n: u64 = re.captures(last)?.get(1)?.as_str().parse().ok()?;
    (n >= 2).then_some(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_module_has_empty_prefix() {
        let m = Module::new(".", "foo");
        assert_eq!(m.prefix, "");
        assert_eq!(m.major_suffix(), None);
    }

    #[test]
    fn test_subdirectory_prefix() {
        let m = Module::new("sub/module", "foo/sub/module");
        assert_eq!(m.prefix, "sub/module/");
    }

    #[test]
    fn test_major_suffix_directory_at_root() {
        // v2/ holding foo/v2 is the module root for major 2
        let m = Module::new("v2", "foo/v2");
        assert_eq!(m.prefix, "");
        assert_eq!(m.major_suffix(), Some(2));
    }

    #[test]
    fn test_major_suffix_directory_in_subdir() {
        let m = Module::new("bar/v2", "foo/bar/v2");
        assert_eq!(m.prefix, "bar/");
        assert_eq!(m.major_suffix(), Some(2));
    }

    #[test]
    fn test_major_suffix_module_at_repository_root() {
        // a v2 module living at `.` (major branch layout)
        let m = Module::new(".", "foo/v2");
        assert_eq!(m.prefix, "");
        assert_eq!(m.major_suffix(), Some(2));
    }

    #[test]
    fn test_major_suffix_module_in_plain_directory() {
        let m = Module::new("bar", "foo/bar/v2");
        assert_eq!(m.prefix, "bar/");
        assert_eq!(m.major_suffix(), Some(2));
    }

    #[test]
    fn test_v1_suffix_is_not_major() {
        let m = Module::new("v1", "foo/v1");
        assert_eq!(m.major_suffix(), None);
        assert_eq!(m.prefix, "v1/");
    }

    #[test]
    fn test_backslash_paths_normalized() {
        let m = Module::new("sub\\module", "foo/sub/module");
        assert_eq!(m.path, "sub/module");
        assert_eq!(m.prefix, "sub/module/");
    }

    #[test]
    fn test_contains() {
        let root = Module::new(".", "foo");
        let bar = Module::new("bar", "foo/bar");
        assert!(root.contains("anything.txt"));
        assert!(bar.contains("bar/bar.go"));
        assert!(!bar.contains("barista/file"));
        assert!(!bar.contains("bar"));
    }
}

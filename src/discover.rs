//! Module discovery: walk a working tree and collect every directory that
//! declares a module manifest.

use std::fs;
use std::path::Path;

use crate::domain::Module;
use crate::error::{ModtagError, Result};

/// Manifest file that marks a directory as a module root
pub const MANIFEST: &str = "go.mod";

/// Walk `root` and return the modules it hosts, ordered root-first with
/// each major-suffix module following its unsuffixed sibling.
///
/// `include` is a list of import paths to keep (empty keeps everything).
/// `exclude` entries drop a module when they match its import path or its
/// exact forward-slashed relative path.
pub fn find_modules(root: &Path, include: &[String], exclude: &[String]) -> Result<Vec<Module>> {
    let mut modules = Vec::new();
    walk(root, root, &mut modules)?;

    if !include.is_empty() {
        modules.retain(|m| include.iter().any(|name| name == &m.name));
    }
    modules.retain(|m| !exclude.iter().any(|e| e == &m.name || e == &m.path));

    modules.sort_by(|a, b| {
        (&a.prefix, a.major_suffix().unwrap_or(0), &a.path)
            .cmp(&(&b.prefix, b.major_suffix().unwrap_or(0), &b.path))
    });
    Ok(modules)
}

fn walk(root: &Path, dir: &Path, out: &mut Vec<Module>) -> Result<()> {
    let manifest = dir.join(MANIFEST);
    if manifest.is_file() {
        if let Some(name) = declared_module(&manifest)? {
            let rel = dir
                .strip_prefix(root)
                .expect("walk stays under root")
                .to_string_lossy()
                .replace('\\', "/");
            let rel = if rel.is_empty() { ".".to_string() } else { rel };
            out.push(Module::new(rel, name));
        }
    }

    let mut entries: Vec<fs::DirEntry> = fs::read_dir(dir)
        .map_err(|e| discovery_error(dir, e))?
        .collect::<std::io::Result<_>>()
        .map_err(|e| discovery_error(dir, e))?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        if !entry.file_type().map_err(|e| discovery_error(dir, e))?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name == "testdata" || name.starts_with('.') || name.starts_with('_') {
            continue;
        }
        walk(root, &entry.path(), out)?;
    }
    Ok(())
}

/// Read the import path a manifest declares: the first whitespace-tolerant
/// `module <path>` line. Directory names are never consulted.
fn declared_module(manifest: &Path) -> Result<Option<String>> {
    let text = fs::read_to_string(manifest).map_err(|e| discovery_error(manifest, e))?;
    for line in text.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("module") {
            if rest.starts_with(char::is_whitespace) {
                let name = rest.trim().trim_matches('"');
                if !name.is_empty() {
                    return Ok(Some(name.to_string()));
                }
            }
        }
    }
    Ok(None)
}

fn discovery_error(path: &Path, source: std::io::Error) -> ModtagError {
    ModtagError::Discovery {
        path: path.to_path_buf(),
        source,
    }
}

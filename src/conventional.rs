//! Conventional-commit message parsing.
//!
//! Grammar: `type[(scope)][!]: subject` on the first line, an optional
//! body, and an optional trailing footer block. The last paragraph is the
//! footer block iff every non-blank line in it reads `key: value` or
//! `key #value`.

use regex::Regex;

use crate::domain::VersionBump;

/// One `key: value` pair from a commit's trailing footer block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footer {
    pub key: String,
    pub value: String,
}

/// Parsed representation of a conventional commit message.
///
/// Messages whose first line is not a conventional header still parse: they
/// get an empty type, no footers and no breaking flag, so they can be
/// attributed to a module but never move its version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionalCommit {
    pub r#type: String,
    pub scope: Option<String>,
    pub subject: String,
    pub breaking: bool,
    pub footers: Vec<Footer>,
}

impl ConventionalCommit {
    pub fn parse(message: &str) -> Self {
        let message = message.replace("\r\n", "\n");
        let message = message.trim_end();

        let header = message.lines().next().unwrap_or("");
        let re = Regex::new(r"^([a-z]+)(\(([^)]+)\))?(!)?:\s*(.*)$").expect("header pattern");

        let Some(caps) = re.captures(header) else {
            return ConventionalCommit {
                r#type: String::new(),
                scope: None,
                subject: String::new(),
                breaking: false,
                footers: Vec::new(),
            };
        };

        let r#type = caps.get(1).map_or("", |m| m.as_str()).to_string();
        let scope = caps.get(3).map(|m| m.as_str().to_string());
        let bang = caps.get(4).is_some();
        let subject = caps.get(5).map_or("", |m| m.as_str()).trim_end().to_string();

        let footers = parse_footers(message);
        let breaking = bang || footers.iter().any(|f| is_breaking_key(&f.key));

        ConventionalCommit {
            r#type,
            scope,
            subject,
            breaking,
            footers,
        }
    }

    /// Release commits trigger tag creation
    pub fn is_release(&self) -> bool {
        self.r#type == "release"
    }

    /// Import paths listed in the `Modules` footer (case-insensitive key),
    /// comma-split and trimmed. Empty when the footer is absent, which
    /// means "whichever single module the commit is in".
    pub fn modules(&self) -> Vec<String> {
        self.footers
            .iter()
            .filter(|f| f.key.eq_ignore_ascii_case("modules"))
            .flat_map(|f| f.value.split(','))
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect()
    }
}

/// Parse the trailing footer block, if the last paragraph qualifies
fn parse_footers(message: &str) -> Vec<Footer> {
    let paragraphs: Vec<&str> = message
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    // the header paragraph alone is never a footer block
    if paragraphs.len() < 2 {
        return Vec::new();
    }
    let block = paragraphs[paragraphs.len() - 1];

    let re = Regex::new(r"^(BREAKING CHANGE|[A-Za-z][A-Za-z0-9-]*)(: | #)(.*)$")
        .expect("footer pattern");

    let mut footers = Vec::new();
    for line in block.lines().filter(|l| !l.trim().is_empty()) {
        let Some(caps) = re.captures(line) else {
            return Vec::new();
        };
        footers.push(Footer {
            key: caps[1].to_string(),
            value: caps[3].trim().to_string(),
        });
    }
    footers
}

fn is_breaking_key(key: &str) -> bool {
    key.eq_ignore_ascii_case("BREAKING CHANGE") || key.eq_ignore_ascii_case("BREAKING-CHANGE")
}

/// Fold a set of parsed commits into the highest change kind:
/// breaking > feat > any other non-empty type > nothing.
pub fn version_bump(commits: &[ConventionalCommit]) -> VersionBump {
    let mut bump = VersionBump::None;
    for commit in commits {
        let kind = if commit.breaking {
            VersionBump::Major
        } else if commit.r#type == "feat" {
            VersionBump::Minor
        } else if !commit.r#type.is_empty() {
            VersionBump::Patch
        } else {
            VersionBump::None
        };
        bump = bump.max(kind);
        if bump == VersionBump::Major {
            break;
        }
    }
    bump
}

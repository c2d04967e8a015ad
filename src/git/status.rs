//! git::status
//!
//! Parsing of `git status --porcelain [--branch]` output.
//!
//! Porcelain v1 output is stable across git versions and locales, which is
//! why the precondition checks read it instead of the human-facing format.
//! The only part read beyond "is there anything at all" is the `## ` branch
//! header:
//!
//! ```text
//! ## master...origin/master [ahead 1, behind 2]
//! ## master...origin/master [gone]
//! ## master
//! ## No commits yet on master
//! ## No commits yet on master...origin/master [gone]
//! ## HEAD (no branch)
//! ```

/// Whether `git status --porcelain` output describes a clean working tree.
pub fn is_clean(porcelain: &str) -> bool {
    porcelain
        .lines()
        .all(|line| line.trim().is_empty() || line.starts_with("##"))
}

/// The current branch and its relation to its upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchStatus {
    /// Current branch, or `None` when HEAD is detached.
    pub branch: Option<String>,
    /// Upstream tracking ref, e.g. `origin/master`.
    pub upstream: Option<String>,
    /// Commits on the branch that are not on the upstream.
    pub ahead: u32,
    /// Commits on the upstream that are not on the branch.
    pub behind: u32,
    /// The upstream is configured but no longer exists.
    pub gone: bool,
}

impl BranchStatus {
    /// Parse the `## ` header of `git status --porcelain --branch` output.
    ///
    /// Output without a header yields the default (detached, no upstream).
    ///
    /// # Example
    ///
    /// ```
    /// use git_rflow::git::status::BranchStatus;
    ///
    /// let status = BranchStatus::parse("## master...origin/master [ahead 2]\n");
    /// assert_eq!(status.branch.as_deref(), Some("master"));
    /// assert_eq!(status.upstream.as_deref(), Some("origin/master"));
    /// assert_eq!(status.ahead, 2);
    /// assert!(!status.gone);
    /// ```
    pub fn parse(porcelain: &str) -> Self {
        let Some(header) = porcelain.lines().find_map(|l| l.strip_prefix("## ")) else {
            return Self::default();
        };

        let (refs, tracking) = match header.find(" [") {
            Some(idx) if header.ends_with(']') => {
                (&header[..idx], Some(&header[idx + 2..header.len() - 1]))
            }
            _ => (header, None),
        };

        let mut status = Self::default();
        let refs = refs
            .strip_prefix("No commits yet on ")
            .or_else(|| refs.strip_prefix("Initial commit on "))
            .unwrap_or(refs);

        if refs.starts_with("HEAD (no branch)") {
            status.branch = None;
        } else if let Some((branch, upstream)) = refs.split_once("...") {
            status.branch = Some(branch.to_string());
            status.upstream = Some(upstream.to_string());
        } else {
            status.branch = Some(refs.to_string());
        }

        for part in tracking.into_iter().flat_map(|t| t.split(", ")) {
            if part == "gone" {
                status.gone = true;
            } else if let Some(n) = part.strip_prefix("ahead ") {
                status.ahead = n.parse().unwrap_or(0);
            } else if let Some(n) = part.strip_prefix("behind ") {
                status.behind = n.parse().unwrap_or(0);
            }
        }

        status
    }

    /// Name of the commit new branches are based on: the current branch, or
    /// `HEAD` when detached.
    pub fn base_name(&self) -> &str {
        self.branch.as_deref().unwrap_or("HEAD")
    }

    /// Whether there are local commits not present on the upstream.
    pub fn has_unpushed(&self) -> bool {
        self.ahead > 0
    }
}

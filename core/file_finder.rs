use crate::CoreError;
use globset::{GlobBuilder, GlobMatcher};
use ignore::WalkBuilder;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

const BUILTIN_EXCLUDES: &[&str] = &[
    "**/*.exe",
    "**/.git/**",
    "**/node_modules/**",
    "**/vendor/**",
    "**/.task/**",
    "**/.cache/**",
];
const HIDDEN_EXCLUDES: &[&str] = &["**/.*", "**/.*/**"];
const WILDCARDS: &[char] = &['*', '?', '[', '{'];
const BINARY_SNIFF_LEN: u64 = 512;

struct ExcludePattern {
    pattern: String,
    matcher: GlobMatcher,
}

/// Accumulates files matched by successive patterns, applying exclusions.
///
/// Order is first-match-wins across patterns; a path is never listed twice.
pub struct FileMatcher {
    excludes: Vec<ExcludePattern>,
    executable: Option<String>,
    seen: HashSet<String>,
    files: Vec<String>,
}

impl FileMatcher {
    pub fn new(hidden: bool, exclude: &[String]) -> Result<Self, CoreError> {
        let mut patterns: Vec<String> = exclude.iter().map(|p| anchor(p)).collect();
        patterns.extend(BUILTIN_EXCLUDES.iter().map(|p| p.to_string()));
        if !hidden {
            patterns.extend(HIDDEN_EXCLUDES.iter().map(|p| p.to_string()));
        }

        let excludes = patterns
            .into_iter()
            .map(|pattern| {
                compile(&pattern).map(|matcher| ExcludePattern { pattern, matcher })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FileMatcher {
            excludes,
            executable: std::env::current_exe().ok().map(|p| normalize(&p)),
            seen: HashSet::new(),
            files: Vec::new(),
        })
    }

    /// Adds every regular file `pattern` matches.
    ///
    /// A pattern without wildcards names a file directly and skips the
    /// exclude rules; if it names a directory, its contents are matched as
    /// `<dir>/**` with exclusions applied.
    pub fn match_pattern(&mut self, pattern: &str) -> Result<(), CoreError> {
        if !is_glob(pattern) {
            let path = Path::new(pattern);
            if path.is_file() {
                self.consider(path, true);
            } else if path.is_dir() {
                let expanded = format!("{}/**", pattern.trim_end_matches('/'));
                self.match_glob(&expanded)?;
            } else {
                debug!(pattern, "no such file");
            }
            return Ok(());
        }
        self.match_glob(pattern)
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn into_files(self) -> Vec<String> {
        self.files
    }

    fn match_glob(&mut self, pattern: &str) -> Result<(), CoreError> {
        let matcher = compile(pattern)?;
        let (base, depth) = split_base(pattern);
        let relative = base.as_os_str().is_empty();
        let root = if relative { PathBuf::from(".") } else { base };

        let mut walker = WalkBuilder::new(&root);
        walker
            .standard_filters(false)
            .follow_links(false)
            .max_depth(depth)
            .sort_by_file_name(|a, b| a.cmp(b));

        for entry in walker.build() {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    debug!("skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let candidate = if relative {
                entry.path().strip_prefix(".").unwrap_or(entry.path())
            } else {
                entry.path()
            };
            if matcher.is_match(candidate) {
                self.consider(entry.path(), false);
            }
        }
        Ok(())
    }

    fn consider(&mut self, path: &Path, explicit: bool) {
        let file = normalize(path);
        if self.seen.contains(&file) {
            debug!(file = %file, "skipped: already in matches");
            return;
        }
        if explicit {
            debug!(file = %file, "including: explicitly included");
        } else if let Some(pattern) = self.excluded_by(&file) {
            debug!(file = %file, pattern, "skipped: matches exclude pattern");
            return;
        } else if is_binary(path) {
            debug!(file = %file, "skipped: binary file");
            return;
        }
        self.seen.insert(file.clone());
        self.files.push(file);
    }

    fn excluded_by(&self, file: &str) -> Option<&str> {
        if let Some(exe) = self.executable.as_deref().filter(|exe| *exe == file) {
            return Some(exe);
        }
        self.excludes
            .iter()
            .find(|e| e.matcher.is_match(file))
            .map(|e| e.pattern.as_str())
    }
}

/// Expands `patterns` in order into a deduplicated list of absolute,
/// slash-separated file paths.
pub fn resolve<'a, I>(patterns: I, exclude: &[String], hidden: bool) -> Result<Vec<String>, CoreError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut matcher = FileMatcher::new(hidden, exclude)?;
    for pattern in patterns {
        matcher.match_pattern(pattern)?;
    }
    Ok(matcher.into_files())
}

/// NUL byte within the first 512 bytes. Unreadable files count as text.
pub fn is_binary(path: &Path) -> bool {
    let Ok(file) = File::open(path) else {
        return false;
    };
    let mut head = Vec::with_capacity(BINARY_SNIFF_LEN as usize);
    if file.take(BINARY_SNIFF_LEN).read_to_end(&mut head).is_err() {
        return false;
    }
    head.contains(&0)
}

pub fn is_glob(pattern: &str) -> bool {
    pattern.contains(WILDCARDS)
}

/// Absolute, lexically cleaned (`.` dropped, `..` folded), slash-separated.
/// Symlinks are not resolved.
pub fn normalize(path: &Path) -> String {
    let abs = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut clean = PathBuf::new();
    for component in abs.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                clean.pop();
            }
            other => clean.push(other),
        }
    }
    clean.to_string_lossy().replace('\\', "/")
}

fn compile(pattern: &str) -> Result<GlobMatcher, CoreError> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map(|g| g.compile_matcher())
        .map_err(|source| CoreError::Pattern {
            pattern: pattern.to_string(),
            source,
        })
}

fn anchor(pattern: &str) -> String {
    if pattern.starts_with("**") || pattern.starts_with('/') || Path::new(pattern).is_absolute() {
        pattern.to_string()
    } else {
        format!("**/{}", pattern)
    }
}

/// Leading wildcard-free directory of `pattern`, and how deep below it a
/// match can sit (`None` once `**` is involved).
fn split_base(pattern: &str) -> (PathBuf, Option<usize>) {
    let components: Vec<&str> = pattern.split('/').collect();
    let literal = components.iter().take_while(|c| !is_glob(c)).count();

    let mut base = PathBuf::new();
    for (i, component) in components[..literal].iter().enumerate() {
        if i == 0 && component.is_empty() {
            base.push("/");
        } else {
            base.push(component);
        }
    }

    let rest = &components[literal..];
    let depth = if rest.iter().any(|c| c.contains("**")) {
        None
    } else {
        Some(rest.len())
    };
    (base, depth)
}

pub mod c_family;
pub mod common;
pub mod dockerfile;
pub mod python;
pub mod shell;

pub use common::{LineAction, StripResult};

use std::collections::HashMap;
use std::fmt;

/// Turns the lines of one file into its rewritten lines plus the issues found.
///
/// Implementations are pure: no I/O, no state kept between calls.
pub trait Stripper: Send + Sync {
    fn strip(&self, lines: &[&[u8]]) -> StripResult;
}

impl<F> Stripper for F
where
    F: Fn(&[&[u8]]) -> StripResult + Send + Sync,
{
    fn strip(&self, lines: &[&[u8]]) -> StripResult {
        self(lines)
    }
}

/// Splits `content` on `\n`, strips it, and hands back the result.
pub fn strip_content(stripper: &dyn Stripper, content: &[u8]) -> StripResult {
    let lines: Vec<&[u8]> = content.split(|&b| b == b'\n').collect();
    stripper.strip(&lines)
}

/// Language identifier to stripper bindings, built once per run.
pub struct StripperRegistry {
    strippers: HashMap<String, Box<dyn Stripper>>,
}

impl StripperRegistry {
    pub fn empty() -> Self {
        StripperRegistry {
            strippers: HashMap::new(),
        }
    }

    pub fn with_builtins() -> Self {
        let mut registry = StripperRegistry::empty();
        registry.register("go", c_family::strip);
        registry.register("python", python::strip);
        registry.register("bash", shell::strip);
        registry.register("dockerfile", dockerfile::strip);
        registry
    }

    /// Binds `language` to `stripper`, replacing any earlier binding.
    pub fn register<S>(&mut self, language: impl Into<String>, stripper: S)
    where
        S: Stripper + 'static,
    {
        self.strippers.insert(language.into(), Box::new(stripper));
    }

    pub fn lookup(&self, language: &str) -> Option<&dyn Stripper> {
        self.strippers.get(language).map(|s| s.as_ref())
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.strippers.keys().map(String::as_str)
    }
}

impl Default for StripperRegistry {
    fn default() -> Self {
        StripperRegistry::with_builtins()
    }
}

impl fmt::Debug for StripperRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut languages: Vec<&str> = self.languages().collect();
        languages.sort_unstable();
        f.debug_struct("StripperRegistry")
            .field("languages", &languages)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_cover_every_file_type() {
        let registry = StripperRegistry::with_builtins();
        for language in ["go", "python", "bash", "dockerfile"] {
            assert!(registry.lookup(language).is_some(), "{language}");
        }
        assert!(registry.lookup(".rs").is_none());
    }

    #[test]
    fn register_overwrites_existing_binding() {
        let mut registry = StripperRegistry::with_builtins();
        registry.register("go", |lines: &[&[u8]]| StripResult {
            lines: lines.iter().map(|l| l.to_ascii_uppercase()).collect(),
            issues: vec!["shouted".to_string()],
        });
        let stripper = registry.lookup("go").unwrap();
        let result = strip_content(stripper, b"// x\ny");
        assert_eq!(result.text_lines(), vec!["// X", "Y"]);
        assert_eq!(result.issues, vec!["shouted"]);
    }

    #[test]
    fn empty_registry_only_knows_what_it_is_given() {
        let mut registry = StripperRegistry::empty();
        assert!(registry.lookup("python").is_none());
        registry.register("python", python::strip);
        let result = strip_content(registry.lookup("python").unwrap(), b"# c\nx = 1\n");
        assert_eq!(result.content(), b"x = 1\n");
        assert_eq!(registry.languages().count(), 1);
    }
}

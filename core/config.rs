use crate::CoreError;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Lint,
    Format,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Go,
    Python,
    Dockerfile,
    Bash,
}

impl FileType {
    pub const ALL: [FileType; 4] = [
        FileType::Go,
        FileType::Python,
        FileType::Dockerfile,
        FileType::Bash,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FileType::Go => "go",
            FileType::Python => "python",
            FileType::Dockerfile => "dockerfile",
            FileType::Bash => "bash",
        }
    }

    pub fn default_patterns(self) -> &'static [&'static str] {
        match self {
            FileType::Go => &["**/*.go"],
            FileType::Python => &["**/*.py"],
            FileType::Dockerfile => &["**/Dockerfile", "**/Dockerfile.*"],
            FileType::Bash => &["**/*.sh", "**/*.bash"],
        }
    }
}

/// Fully resolved run configuration handed to discovery and the processor.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub mode: Mode,
    pub paths: Vec<String>,
    pub patterns: Vec<String>,
    pub exclude: Vec<String>,
    pub types: Vec<FileType>,
    pub hidden: bool,
    pub dry_run: bool,
    pub parallel: usize,
}

impl Config {
    pub fn new(mode: Mode) -> Self {
        Config {
            mode,
            paths: Vec::new(),
            patterns: Vec::new(),
            exclude: Vec::new(),
            types: FileType::ALL.to_vec(),
            hidden: false,
            dry_run: false,
            parallel: num_cpus::get(),
        }
    }

    pub fn validate(&mut self) -> Result<(), CoreError> {
        if self.parallel == 0 {
            return Err(CoreError::Usage(format!(
                "invalid number of parallel jobs: {}",
                self.parallel
            )));
        }
        if self.types.is_empty() {
            return Err(CoreError::Usage("no file types requested".to_string()));
        }
        if self.paths.is_empty() && self.patterns.is_empty() {
            for t in &self.types {
                self.patterns
                    .extend(t.default_patterns().iter().map(|p| p.to_string()));
            }
        }
        Ok(())
    }

    pub fn discovery_patterns(&self) -> impl Iterator<Item = &str> {
        self.paths
            .iter()
            .chain(self.patterns.iter())
            .map(String::as_str)
    }

    pub fn wants(&self, language: &str) -> bool {
        self.types.iter().any(|t| t.as_str() == language)
    }
}

#[derive(Debug, Parser, Clone)]
#[clap(
    name = "tcisd",
    version,
    about = "Strip comments from code files",
    long_about = "Checks files for comments (lint) or removes them in place (format).\nWith no paths or patterns, files are found from the requested types.",
    propagate_version = true
)]
pub struct CliArgs {
    #[clap(subcommand)]
    pub command: Command,

    #[clap(
        short,
        long,
        global = true,
        help = "Log discovery and per-file decisions"
    )]
    pub verbose: bool,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    #[clap(about = "Check files for comments without modifying them")]
    Lint(ScanArgs),
    #[clap(about = "Strip comments from files, modifying them in place")]
    Format(FormatArgs),
    #[clap(about = "Generate shell completion scripts")]
    Completion(CompletionArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct ScanArgs {
    #[clap(value_name = "PATH", help = "Files, directories or glob patterns to process")]
    pub paths: Vec<String>,

    #[clap( short, long, value_name = "PATTERN", help = "Glob pattern for files to include [multiple allowed]", action = clap::ArgAction::Append )]
    pub pattern: Vec<String>,
    #[clap( short, long, value_enum, value_name = "TYPE", help = "File types to process [multiple allowed]", default_values_t = FileType::ALL, action = clap::ArgAction::Append )]
    pub types: Vec<FileType>,
    #[clap( short, long, value_name = "PATTERN", help = "Glob pattern for files/directories to exclude [multiple allowed]", action = clap::ArgAction::Append )]
    pub exclude: Vec<String>,
    #[clap(short = 'a', long, help = "Include hidden files and directories")]
    pub hidden: bool,
    #[clap(short = 'j', long, value_name = "N", default_value_t = num_cpus::get(), help = "Number of concurrent jobs")]
    pub parallel: usize,
    #[clap(short, long, help = "Show the configuration and exit")]
    pub show: bool,
}

#[derive(Debug, Parser, Clone)]
pub struct FormatArgs {
    #[clap(flatten)]
    pub scan: ScanArgs,

    #[clap(
        short,
        long,
        help = "Report what would be changed without modifying files"
    )]
    pub dry_run: bool,
}

#[derive(Debug, Parser, Clone)]
pub struct CompletionArgs {
    #[clap(value_parser = clap::value_parser!(clap_complete::Shell))]
    pub shell: clap_complete::Shell,
}

impl ScanArgs {
    pub fn into_config(self, mode: Mode) -> Config {
        Config {
            mode,
            paths: self.paths,
            patterns: self.pattern,
            exclude: self.exclude,
            types: self.types,
            hidden: self.hidden,
            dry_run: false,
            parallel: self.parallel,
        }
    }
}

impl FormatArgs {
    pub fn into_config(self) -> Config {
        Config {
            dry_run: self.dry_run,
            ..self.scan.into_config(Mode::Format)
        }
    }
}

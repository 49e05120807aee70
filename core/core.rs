pub mod classifier;
pub mod config;
pub mod file_finder;
pub mod processor;
pub mod stripper;

pub use classifier::classify;
pub use config::{CliArgs, Command, CompletionArgs, Config, FileType, FormatArgs, Mode, ScanArgs};
pub use file_finder::{FileMatcher, resolve};
pub use processor::{FileRecord, Outcome, ProcessingReport, Processor, process};
pub use stripper::{StripResult, Stripper, StripperRegistry, strip_content};

#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    #[error("usage error: {0}")]
    Usage(String),

    #[error("invalid pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("no files found")]
    NoFiles,

    #[error("failed to start worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

impl CoreError {
    pub fn is_usage(&self) -> bool {
        matches!(self, CoreError::Usage(_))
    }
}

use crate::classifier::classify;
use crate::config::{Config, Mode};
use crate::file_finder;
use crate::stripper::{StripperRegistry, strip_content};
use crate::CoreError;
use crossbeam::channel::{self, Receiver, Sender};
use rayon::ThreadPoolBuilder;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, info, warn};

/// Issues found in one file. Only files with at least one issue produce a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: String,
    pub language: String,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Clean,
    IssuesFound,
    Rewritten,
    DryRun,
}

impl Outcome {
    pub fn is_failure(self) -> bool {
        matches!(self, Outcome::IssuesFound)
    }
}

/// Path to issues for every file that had any, sorted by path.
#[derive(Debug, Clone)]
pub struct ProcessingReport {
    mode: Mode,
    dry_run: bool,
    files: BTreeMap<String, Vec<String>>,
}

impl ProcessingReport {
    fn new(mode: Mode, dry_run: bool) -> Self {
        ProcessingReport {
            mode,
            dry_run,
            files: BTreeMap::new(),
        }
    }

    pub fn had_issues(&self) -> bool {
        !self.files.is_empty()
    }

    pub fn outcome(&self) -> Outcome {
        match (self.had_issues(), self.mode) {
            (false, _) => Outcome::Clean,
            (true, Mode::Lint) => Outcome::IssuesFound,
            (true, Mode::Format) if self.dry_run => Outcome::DryRun,
            (true, Mode::Format) => Outcome::Rewritten,
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn issues(&self, path: &str) -> Option<&[String]> {
        self.files.get(path).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.files
            .iter()
            .map(|(path, issues)| (path.as_str(), issues.as_slice()))
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }
}

#[derive(thiserror::Error, Debug)]
enum FileError {
    #[error("reading {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("writing {path}: {source}")]
    Write { path: String, source: io::Error },

    #[error("no stripper registered for file type {language} ({path})")]
    NoStripper { path: String, language: String },
}

/// Read-only view a worker needs to handle one file.
struct Worker<'a> {
    config: &'a Config,
    registry: &'a StripperRegistry,
}

impl Worker<'_> {
    fn run(&self, id: usize, jobs: Receiver<String>, results: Sender<FileRecord>) {
        for path in jobs.iter() {
            match self.process_file(&path) {
                Ok(Some(record)) => {
                    if results.send(record).is_err() {
                        warn!(worker = id, "result channel closed, stopping");
                        return;
                    }
                }
                Ok(None) => {}
                Err(e) => warn!(worker = id, "{}", e),
            }
        }
        debug!(worker = id, "queue drained");
    }

    fn process_file(&self, path: &str) -> Result<Option<FileRecord>, FileError> {
        let language = classify(Path::new(path));
        if !self.config.wants(&language) {
            debug!(path, language = %language, "skipped: type not requested");
            return Ok(None);
        }

        let stripper = self
            .registry
            .lookup(&language)
            .ok_or_else(|| FileError::NoStripper {
                path: path.to_string(),
                language: language.clone(),
            })?;

        let content = fs::read(path).map_err(|source| FileError::Read {
            path: path.to_string(),
            source,
        })?;

        let result = strip_content(stripper, &content);
        if result.is_clean() {
            return Ok(None);
        }

        if self.config.mode == Mode::Format && !self.config.dry_run {
            write_atomic(Path::new(path), &result.content()).map_err(|source| {
                FileError::Write {
                    path: path.to_string(),
                    source,
                }
            })?;
            debug!(path, issues = result.issues.len(), "rewritten");
        }

        Ok(Some(FileRecord {
            path: path.to_string(),
            language,
            issues: result.issues,
        }))
    }
}

/// Replaces `path` with `content` through a sibling temp file and a rename,
/// keeping the original permissions.
fn write_atomic(path: &Path, content: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let permissions = fs::metadata(path)?.permissions();

    let mut temp_file = tempfile::Builder::new()
        .prefix(".tcisd_")
        .tempfile_in(parent)?;
    temp_file.write_all(content)?;
    temp_file.as_file().sync_all()?;
    fs::set_permissions(temp_file.path(), permissions)?;
    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn worker_count(parallel: usize, files: usize) -> usize {
    parallel.min(files).max(1)
}

pub struct Processor<'a> {
    config: &'a Config,
    registry: &'a StripperRegistry,
    files: Vec<String>,
    records: Vec<FileRecord>,
}

impl<'a> Processor<'a> {
    pub fn new(config: &'a Config, registry: &'a StripperRegistry) -> Self {
        Processor {
            config,
            registry,
            files: Vec::new(),
            records: Vec::new(),
        }
    }

    /// Discovery phase. Fails on a bad pattern or when nothing matches.
    pub fn resolve(&mut self) -> Result<&[String], CoreError> {
        self.files = file_finder::resolve(
            self.config.discovery_patterns(),
            &self.config.exclude,
            self.config.hidden,
        )?;
        if self.files.is_empty() {
            return Err(CoreError::NoFiles);
        }
        debug!(files = self.files.len(), "discovery complete");
        Ok(&self.files)
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Strips every resolved file on a fixed pool of workers.
    ///
    /// The queue is filled and closed before any worker starts; results are
    /// drained only after every worker has exited.
    pub fn run_all(&mut self) -> Result<(), CoreError> {
        if self.files.is_empty() {
            return Err(CoreError::NoFiles);
        }
        let workers = worker_count(self.config.parallel, self.files.len());
        info!(
            files = self.files.len(),
            workers,
            mode = ?self.config.mode,
            "processing"
        );

        let (job_tx, job_rx) = channel::bounded::<String>(self.files.len());
        let (result_tx, result_rx) = channel::bounded::<FileRecord>(self.files.len());
        // Capacity covers every file and `job_rx` is still held, so no send
        // can block or fail here.
        for file in &self.files {
            let _ = job_tx.send(file.clone());
        }
        drop(job_tx);

        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("tcisd-worker-{}", i))
            .build()?;
        let worker = Worker {
            config: self.config,
            registry: self.registry,
        };

        pool.scope(|s| {
            for id in 0..workers {
                let jobs = job_rx.clone();
                let results = result_tx.clone();
                let worker = &worker;
                s.spawn(move |_| worker.run(id, jobs, results));
            }
        });
        drop(result_tx);

        self.records = result_rx.iter().collect();
        info!(with_issues = self.records.len(), "processing complete");
        Ok(())
    }

    /// Folds the collected records into the final report.
    pub fn into_report(self) -> ProcessingReport {
        let mut report = ProcessingReport::new(self.config.mode, self.config.dry_run);
        for record in self.records {
            report.files.insert(record.path, record.issues);
        }
        report
    }
}

/// Discovery, processing and aggregation in one call.
pub fn process(config: &Config, registry: &StripperRegistry) -> Result<ProcessingReport, CoreError> {
    let mut processor = Processor::new(config, registry);
    processor.resolve()?;
    processor.run_all()?;
    Ok(processor.into_report())
}

use std::path::{Path, PathBuf};

use futures::stream::{FuturesOrdered, StreamExt};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::error::{Error, FormatError, IoError, Result};
use crate::io::ArchiveSource;

use super::parser::WadParser;
use super::path;
use super::structures::{Entry, ParseOptions, WadIndex};

/// What to do when one entry fails to extract
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OnError {
    /// Stop at the first failure
    #[default]
    Abort,
    /// Extract everything possible and report all failures at the end
    Continue,
}

/// Policy for output files that already exist
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Overwrite {
    #[default]
    Forbid,
    Allow,
}

/// Extraction configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    pub output_root: PathBuf,
    pub on_error: OnError,
    pub overwrite: Overwrite,
    /// Number of entries written concurrently; 1 is strictly sequential
    pub jobs: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("."),
            on_error: OnError::default(),
            overwrite: Overwrite::default(),
            jobs: 1,
        }
    }
}

/// Receiver for extraction progress
pub trait Progress {
    fn directory_created(&self, path: &Path);
    fn file_extracted(&self, path: &Path, size: u64);
}

/// Prints progress lines to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleProgress {
    pub quiet: bool,
}

impl Progress for ConsoleProgress {
    fn directory_created(&self, path: &Path) {
        if !self.quiet {
            println!("Directory \"{}\" created.", path.display());
        }
    }

    fn file_extracted(&self, path: &Path, size: u64) {
        if !self.quiet {
            println!("File \"{}\" (size {} bytes) extracted.", path.display(), size);
        }
    }
}

/// One entry that could not be extracted
#[derive(Debug)]
pub struct EntryFailure {
    pub index: usize,
    pub name: String,
    pub error: Error,
}

/// Outcome of an extraction run
#[derive(Debug, Default)]
pub struct ExtractSummary {
    pub files: usize,
    pub bytes: u64,
    /// Always empty unless extracting with [`OnError::Continue`]
    pub failures: Vec<EntryFailure>,
}

impl ExtractSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// WAD file extractor
pub struct WadExtractor<S: ArchiveSource> {
    source: S,
    parser: WadParser,
}

impl<S: ArchiveSource> WadExtractor<S> {
    pub fn new(source: S, options: ParseOptions) -> Self {
        Self {
            source,
            parser: WadParser::new(options),
        }
    }

    /// Parse and validate the whole header.
    pub fn index(&self) -> Result<WadIndex<'_>> {
        Ok(self.parser.parse(self.source.as_bytes())?)
    }

    /// List all entries in the archive
    pub fn list_files(&self) -> Result<Vec<Entry<'_>>> {
        Ok(self.index()?.entries)
    }

    /// Extract every entry under `options.output_root`.
    ///
    /// The header is fully validated before the first file is created.
    pub async fn extract_all(
        &self,
        options: &ExtractOptions,
        progress: &dyn Progress,
    ) -> Result<ExtractSummary> {
        let index = self.index()?;
        self.extract(&index, options, progress).await
    }

    /// Extract the entries of an index obtained from [`WadExtractor::index`].
    ///
    /// On abort, no new entry is started but writes already in flight run to
    /// completion, so none is cut off halfway.
    pub async fn extract(
        &self,
        index: &WadIndex<'_>,
        options: &ExtractOptions,
        progress: &dyn Progress,
    ) -> Result<ExtractSummary> {
        let jobs = options.jobs.max(1);
        let mut summary = ExtractSummary::default();
        let mut first_error = None;

        debug!(
            "Extracting {} entries into {:?} with {} job(s)",
            index.len(),
            options.output_root,
            jobs
        );

        let start = |i, entry| async move {
            let result = extract_entry(index, i, entry, options, progress).await;
            (i, entry, result)
        };
        let mut pending = index.entries.iter().enumerate();
        let mut in_flight = FuturesOrdered::new();

        loop {
            while first_error.is_none() && in_flight.len() < jobs {
                match pending.next() {
                    Some((i, entry)) => in_flight.push_back(start(i, entry)),
                    None => break,
                }
            }
            let Some((i, entry, result)) = in_flight.next().await else {
                break;
            };

            match result {
                Ok(size) => {
                    summary.files += 1;
                    summary.bytes += size;
                }
                Err(error) => match options.on_error {
                    OnError::Abort => {
                        debug!("Entry {} failed, waiting for {} in flight", i, in_flight.len());
                        if first_error.is_none() {
                            first_error = Some(error);
                        }
                    }
                    OnError::Continue => {
                        warn!("Entry {} failed: {}", i, error);
                        summary.failures.push(EntryFailure {
                            index: i,
                            name: entry.display_name(),
                            error,
                        });
                    }
                },
            }
        }

        match first_error {
            Some(error) => Err(error),
            None => Ok(summary),
        }
    }
}

/// Write one validated entry, returning the number of bytes written.
async fn extract_entry(
    index: &WadIndex<'_>,
    i: usize,
    entry: &Entry<'_>,
    options: &ExtractOptions,
    progress: &dyn Progress,
) -> Result<u64> {
    let contents = index
        .contents(entry)
        .ok_or(FormatError::EntryOutOfBounds {
            index: i,
            offset: entry.data_offset,
            length: entry.data_length,
            region: index.data_region().len() as u64,
        })?;
    let output_path = path::resolve(&options.output_root, entry.name)?;

    if let Some(parent) = output_path.parent() {
        create_parents(parent, progress).await?;
    }

    write_new_file(&output_path, contents, options.overwrite).await?;
    progress.file_extracted(&output_path, contents.len() as u64);

    Ok(contents.len() as u64)
}

/// Create `dir` and any missing ancestors, reporting each one created.
async fn create_parents(dir: &Path, progress: &dyn Progress) -> Result<()> {
    let mut missing = Vec::new();
    let mut current = Some(dir);
    while let Some(d) = current {
        if d.as_os_str().is_empty() || fs::metadata(d).await.is_ok() {
            break;
        }
        missing.push(d);
        current = d.parent();
    }

    for d in missing.into_iter().rev() {
        match fs::create_dir(d).await {
            Ok(()) => progress.directory_created(d),
            // Another job got there first
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(source) => {
                return Err(IoError::CreateDir {
                    path: d.to_path_buf(),
                    source,
                }
                .into());
            }
        }
    }

    Ok(())
}

async fn write_new_file(path: &Path, contents: &[u8], overwrite: Overwrite) -> Result<()> {
    let mut open = fs::OpenOptions::new();
    open.write(true);
    match overwrite {
        Overwrite::Forbid => open.create_new(true),
        Overwrite::Allow => open.create(true).truncate(true),
    };
    #[cfg(unix)]
    open.mode(0o660);

    let mut file = open.open(path).await.map_err(|source| {
        if source.kind() == std::io::ErrorKind::AlreadyExists {
            IoError::AlreadyExists {
                path: path.to_path_buf(),
            }
        } else {
            IoError::Create {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let result = write_fully(&mut file, path, contents).await;
    drop(file);

    if result.is_err() {
        // Don't leave a half-written file behind
        if let Err(e) = fs::remove_file(path).await {
            warn!("Cannot remove partial file {:?}: {}", path, e);
        }
    }
    result
}

async fn write_fully(file: &mut fs::File, path: &Path, contents: &[u8]) -> Result<()> {
    let write_err = |source| IoError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut written = 0;
    while written < contents.len() {
        let n = file.write(&contents[written..]).await.map_err(write_err)?;
        if n == 0 {
            break;
        }
        written += n;
    }
    file.flush().await.map_err(write_err)?;

    if written < contents.len() {
        return Err(IoError::ShortWrite {
            path: path.to_path_buf(),
            expected: contents.len() as u64,
            written: written as u64,
        }
        .into());
    }
    Ok(())
}

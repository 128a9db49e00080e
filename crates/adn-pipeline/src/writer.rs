//! Note output
//!
//! [`FsOutputWriter`] writes each note to a hidden temporary sibling and then
//! renames it into place, so readers never observe a partially written note.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use encoding_rs::Encoding;
use tracing::{debug, warn};

use crate::error::{PipelineError, PipelineResult};

/// Destination for rendered notes
#[async_trait]
pub trait OutputWriter: Send + Sync {
    async fn exists(&self, path: &Path) -> bool;

    /// Write `contents` to `path`, creating parent directories as needed.
    async fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
}

/// Writes notes to the local filesystem in a fixed encoding
#[derive(Debug, Clone)]
pub struct FsOutputWriter {
    encoding: &'static Encoding,
}

impl Default for FsOutputWriter {
    fn default() -> Self {
        Self {
            encoding: encoding_rs::UTF_8,
        }
    }
}

impl FsOutputWriter {
    /// Writer for an encoding label such as `utf-8` or `latin1`
    pub fn with_encoding(label: &str) -> PipelineResult<Self> {
        let encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| PipelineError::InvalidConfig(format!("unknown encoding '{label}'")))?;
        // encoding_rs only encodes to ASCII-compatible charsets; UTF-16 and
        // the replacement encoding would silently come out as UTF-8.
        if encoding.output_encoding() != encoding {
            return Err(PipelineError::InvalidConfig(format!(
                "cannot write notes as {}",
                encoding.name()
            )));
        }
        Ok(Self { encoding })
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.{}.tmp", uuid::Uuid::new_v4()))
}

#[async_trait]
impl OutputWriter for FsOutputWriter {
    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            // create_dir_all tolerates a concurrent creator
            tokio::fs::create_dir_all(parent).await?;
        }

        let (bytes, _, unmappable) = self.encoding.encode(contents);
        if unmappable {
            warn!(
                "Characters not representable in {} were escaped in {}",
                self.encoding.name(),
                path.display()
            );
        }

        let temp = temp_sibling(path);
        tokio::fs::write(&temp, &bytes).await?;
        if let Err(err) = tokio::fs::rename(&temp, path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(err);
        }

        debug!("Wrote {}", path.display());
        Ok(())
    }
}

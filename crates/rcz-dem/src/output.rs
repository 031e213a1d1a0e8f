//! Crash-safe output file handling.

use crate::{DemError, GeoRaster, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A reserved output location.
///
/// Creating one opens a temporary file next to the destination right away,
/// so an unwritable path is reported before any work is done. The raster is
/// only moved into place by [`commit`](Self::commit); dropping the handle
/// without committing removes the temporary file and leaves the destination
/// untouched.
#[derive(Debug)]
pub struct AtomicOutput {
    destination: PathBuf,
    temp_path: PathBuf,
    writer: Option<BufWriter<File>>,
    committed: bool,
}

impl AtomicOutput {
    /// Reserve `path` for writing.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let destination = path.as_ref().to_path_buf();
        let file_name = destination
            .file_name()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                DemError::InvalidRaster(format!(
                    "output path has no file name: {}",
                    destination.display()
                ))
            })?;

        if destination.is_dir() {
            return Err(DemError::InvalidRaster(format!(
                "output path is a directory: {}",
                destination.display()
            )));
        }

        let temp_name = format!(".{}.{}.partial", file_name, std::process::id());
        let temp_path = destination.with_file_name(temp_name);
        let file = File::create(&temp_path)?;

        debug!(temp = %temp_path.display(), "reserved output");

        Ok(Self {
            destination,
            temp_path,
            writer: Some(BufWriter::new(file)),
            committed: false,
        })
    }

    /// Final location of the file.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Encode `raster` and move it over the destination.
    pub fn commit(mut self, raster: &GeoRaster) -> Result<()> {
        let mut writer = self
            .writer
            .take()
            .ok_or_else(|| DemError::InvalidRaster("output already committed".to_string()))?;

        raster.write_to(&mut writer)?;
        writer.flush()?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&self.temp_path, &self.destination)?;
        self.committed = true;
        debug!(path = %self.destination.display(), "committed output");
        Ok(())
    }
}

impl Drop for AtomicOutput {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        drop(self.writer.take());
        if self.temp_path.exists() {
            if let Err(e) = fs::remove_file(&self.temp_path) {
                warn!(
                    temp = %self.temp_path.display(),
                    "failed to remove partial output: {}",
                    e
                );
            }
        }
    }
}

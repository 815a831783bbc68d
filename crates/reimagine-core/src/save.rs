//! Writing downloaded images under collision-free names.
//!
//! `dall.png` is tried first, then `dall_1.png`, `dall_2.png`, and so on.
//! Files are opened with `create_new`, so an existing file is never
//! truncated even if it appears between the name check and the write.

use crate::error::{PipelineError, PipelineResult};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

const MAX_SUFFIX: u32 = 10_000;

/// Candidate name for a given suffix index (0 = the base name itself).
fn candidate(dir: &Path, base_name: &str, index: u32) -> PathBuf {
    if index == 0 {
        return dir.join(base_name);
    }
    let base = Path::new(base_name);
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| base_name.to_string());
    match base.extension() {
        Some(ext) => dir.join(format!("{stem}_{index}.{}", ext.to_string_lossy())),
        None => dir.join(format!("{stem}_{index}")),
    }
}

/// Write `data` to a fresh file in `dir` and return its path.
pub fn save_binary_file(dir: &Path, base_name: &str, data: &[u8]) -> PipelineResult<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| PipelineError::Save {
        path: dir.to_path_buf(),
        message: format!("Cannot create output directory: {e}"),
    })?;

    for index in 0..=MAX_SUFFIX {
        let path = candidate(dir, base_name, index);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(PipelineError::Save {
                    path,
                    message: e.to_string(),
                })
            }
        };

        if let Err(e) = file.write_all(data).and_then(|()| file.flush()) {
            drop(file);
            let _ = std::fs::remove_file(&path);
            return Err(PipelineError::Save {
                path,
                message: e.to_string(),
            });
        }

        tracing::debug!("Wrote {} bytes to {:?}", data.len(), path);
        return Ok(path);
    }

    Err(PipelineError::Save {
        path: dir.join(base_name),
        message: format!("no free file name after {MAX_SUFFIX} attempts"),
    })
}

//! Standalone JSON exports (topic lists, content drafts).

use crate::atomic::{ensure_dir, write_atomic};
use notecraft_error::{JsonError, NotecraftResult};
use serde::Serialize;
use std::path::Path;
use tracing::{info, instrument};

/// Writes `value` as pretty-printed JSON to `path`, creating parent directories.
#[instrument(skip(value), fields(path = %path.display()))]
pub async fn write_json<T>(path: &Path, value: &T) -> NotecraftResult<()>
where
    T: Serialize + ?Sized,
{
    let data = serde_json::to_vec_pretty(value)
        .map_err(|e| JsonError::new(format!("Failed to encode {}: {}", path.display(), e)))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    write_atomic(path, &data).await?;
    info!(bytes = data.len(), "Wrote JSON export");
    Ok(())
}

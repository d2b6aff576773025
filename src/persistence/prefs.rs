use super::backend::{Backend, COMPACT_VIEW_KEY};

/// Load the compact-display flag; anything but "1" (or a read error) is off
pub fn load_compact_view<B: Backend>(backend: &B) -> bool {
    match backend.read(COMPACT_VIEW_KEY) {
        Ok(value) => value.as_deref().map(str::trim) == Some("1"),
        Err(e) => {
            tracing::warn!(error = %e, "could not read compact view preference");
            false
        }
    }
}

/// Save the compact-display flag; failures are logged and ignored
pub fn save_compact_view<B: Backend>(backend: &mut B, compact: bool) {
    let value = if compact { "1" } else { "0" };
    if let Err(e) = backend.write(COMPACT_VIEW_KEY, value) {
        tracing::warn!(error = %e, "could not save compact view preference");
    }
}

use std::path::Path;

use lofty::prelude::AudioFile;
use tracing::debug;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::AudioEntry;

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// List the audio files under `dir`, sorted by name (case-insensitive).
///
/// Unreadable entries are skipped. Durations come from the file's metadata
/// and are `None` when it cannot be parsed or reports no length.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<AudioEntry> {
    let mut entries: Vec<AudioEntry> = Vec::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !path.is_file() || !is_audio_file(path, settings) {
            continue;
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let duration = lofty::read_from_path(path)
            .ok()
            .map(|tagged| tagged.properties().duration())
            .filter(|d| !d.is_zero());

        entries.push(AudioEntry {
            path: path.to_path_buf(),
            name,
            duration,
        });
    }

    entries.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    debug!("found {} audio files under {}", entries.len(), dir.display());
    entries
}

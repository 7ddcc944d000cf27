//! `rodio` backed [`Sound`].
//!
//! Each sound keeps its own output stream and a single `Sink` holding the
//! decoded file. Seeking uses `Sink::try_seek`; formats that cannot seek are
//! handled by rebuilding the sink with `Source::skip_duration`, the same
//! primitive scrubbing used before `try_seek` existed.

use std::fmt::Display;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::prelude::AudioFile;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::{debug, warn};

use crate::error::{Error, Result};

use super::types::Sound;

fn load_error(path: &Path, reason: impl Display) -> Error {
    Error::Load {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn decode(path: &Path) -> Result<Decoder<BufReader<File>>> {
    let file = File::open(path).map_err(|e| load_error(path, e))?;
    Decoder::new(BufReader::new(file)).map_err(|e| load_error(path, e))
}

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
fn create_sink_at(stream: &OutputStream, path: &Path, start_at: Duration) -> Result<Sink> {
    let source = decode(path)?.skip_duration(start_at);
    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok(sink)
}

/// Length from the file's metadata, for decoders that cannot report it.
fn probe_length(path: &Path) -> Option<Duration> {
    lofty::read_from_path(path)
        .ok()
        .map(|tagged| tagged.properties().duration())
        .filter(|d| !d.is_zero())
}

pub struct RodioSound {
    path: PathBuf,
    stream: OutputStream,
    sink: Option<Sink>,
    length: Option<Duration>,
    /// Where the current sink's source starts in the file. Non-zero only
    /// after a `skip_duration` rebuild.
    offset: Duration,
}

impl RodioSound {
    /// Open the default output device and decode `path`, paused at the start.
    pub fn open(path: &Path) -> Result<Self> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| load_error(path, format!("no audio output device: {e}")))?;
        // rodio logs to stderr when the stream is dropped, which would land on the TUI.
        stream.log_on_drop(false);

        let source = decode(path)?;
        let length = source.total_duration().or_else(|| probe_length(path));

        let sink = Sink::connect_new(stream.mixer());
        sink.append(source);
        sink.pause();

        debug!(
            "opened {} ({})",
            path.display(),
            length.map_or("unknown length".to_string(), |d| format!("{:.1}s", d.as_secs_f64()))
        );

        Ok(Self {
            path: path.to_path_buf(),
            stream,
            sink: Some(sink),
            length,
            offset: Duration::ZERO,
        })
    }

    /// Replace the sink with a fresh one whose source starts at `target`.
    fn rebuild_at(&mut self, target: Duration) {
        let was_playing = self.is_playing();
        if let Some(old) = self.sink.take() {
            old.stop();
        }

        match create_sink_at(&self.stream, &self.path, target) {
            Ok(sink) => {
                if was_playing {
                    sink.play();
                }
                self.sink = Some(sink);
                self.offset = target;
            }
            Err(e) => warn!("could not reopen sound for seeking: {e}"),
        }
    }
}

impl Sound for RodioSound {
    fn length(&self) -> Option<f64> {
        self.length.map(|d| d.as_secs_f64())
    }

    fn position(&self) -> f64 {
        match self.sink.as_ref() {
            Some(sink) if !sink.empty() => (self.offset + sink.get_pos()).as_secs_f64(),
            // The source ran out: the playhead sits at the end.
            Some(_) => self.length().unwrap_or(0.0),
            None => 0.0,
        }
    }

    fn seek(&mut self, position: f64) {
        let target = Duration::from_secs_f64(position.max(0.0));

        let seeked = match self.sink.as_ref() {
            Some(sink) if !sink.empty() && self.offset.is_zero() => match sink.try_seek(target) {
                Ok(()) => true,
                Err(e) => {
                    debug!("try_seek failed, rebuilding sink: {e}");
                    false
                }
            },
            _ => false,
        };

        if !seeked {
            self.rebuild_at(target);
        }
    }

    fn play(&mut self) {
        if let Some(sink) = self.sink.as_ref() {
            sink.play();
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.as_ref() {
            sink.pause();
        }
    }

    fn is_playing(&self) -> bool {
        self.sink
            .as_ref()
            .map(|s| !s.is_paused() && !s.empty())
            .unwrap_or(false)
    }

    fn unload(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
            debug!("unloaded {}", self.path.display());
        }
    }
}

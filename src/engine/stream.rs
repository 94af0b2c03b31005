//! Production engine: rodio playback over spooled HTTP streams or local
//! files.
//!
//! Each handle owns a dedicated thread holding the audio output and sink;
//! the handle talks to it over a channel and the thread reports status at a
//! fixed tick. HTTP sources are spooled to a temp file by a reader thread and
//! decoding starts once a prefetch threshold is buffered. If the connection
//! stalls for good the decoder reaches the end of the spool and the track
//! finishes; reconnecting is the caller's decision, not the engine's.

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use rodio::{Decoder, OutputStreamBuilder, Sink, Source};
use tempfile::NamedTempFile;
use tracing::{debug, warn};
use ureq::Agent;

use crate::config::PlaybackSettings;

use super::{
    AudioEngine, ControlsMetadata, EngineError, EngineHandle, EngineStatus, ForegroundControls,
    StatusCallback,
};

const SPOOL_CHUNK_BYTES: usize = 8 * 1024;

type CallbackSlot = Arc<Mutex<Option<StatusCallback>>>;

pub struct StreamEngine {
    agent: Agent,
    prefetch_bytes: u64,
    tick: Duration,
    controls: Option<Arc<dyn ForegroundControls>>,
}

impl StreamEngine {
    pub fn new(settings: &PlaybackSettings) -> Self {
        // Connect/response timeouts only: the body of a live stream is
        // endless by design and must not be bounded.
        let config = Agent::config_builder()
            .timeout_connect(Some(Duration::from_secs(10)))
            .timeout_recv_response(Some(Duration::from_secs(10)))
            .build();

        Self {
            agent: config.into(),
            prefetch_bytes: settings.prefetch_kb * 1024,
            tick: Duration::from_millis(settings.tick_ms),
            controls: None,
        }
    }

    /// Attach a media-control surface; handles forward their
    /// `set_foreground_controls` calls to it.
    pub fn with_controls(mut self, controls: Arc<dyn ForegroundControls>) -> Self {
        self.controls = Some(controls);
        self
    }
}

impl AudioEngine for StreamEngine {
    fn create(&self, uri: &str) -> Result<Box<dyn EngineHandle>, EngineError> {
        let input = if is_http_uri(uri) {
            let response = self.agent.get(uri).call()?;
            let (_parts, body) = response.into_parts();

            let temp = NamedTempFile::new()?;
            let writer = temp.reopen()?;
            let spool = Arc::new(Spool::default());
            let reader_spool = Arc::clone(&spool);
            let reader = body.into_reader();
            thread::spawn(move || spool_stream(reader, writer, reader_spool));

            debug!(%uri, "spooling stream");
            Input::Spooled { temp, spool }
        } else {
            // Treat anything that is not http(s) as a local path; validate it
            // here so an unplayable URI fails the build, not the thread.
            File::open(uri)?;
            Input::Local(PathBuf::from(uri))
        };

        let (tx, rx) = mpsc::channel::<HandleCmd>();
        let callback: CallbackSlot = Arc::new(Mutex::new(None));
        let removed = Arc::new(AtomicBool::new(false));

        let thread_callback = Arc::clone(&callback);
        let thread_removed = Arc::clone(&removed);
        let prefetch = self.prefetch_bytes;
        let tick = self.tick;
        thread::spawn(move || {
            run_playback(input, rx, thread_callback, thread_removed, prefetch, tick);
        });

        Ok(Box::new(StreamHandle {
            tx,
            callback,
            removed,
            controls: self.controls.clone(),
        }))
    }
}

enum HandleCmd {
    Play,
    Pause,
    Remove,
}

struct StreamHandle {
    tx: Sender<HandleCmd>,
    callback: CallbackSlot,
    removed: Arc<AtomicBool>,
    controls: Option<Arc<dyn ForegroundControls>>,
}

impl EngineHandle for StreamHandle {
    fn play(&self) {
        let _ = self.tx.send(HandleCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(HandleCmd::Pause);
    }

    fn remove(&self) {
        if self.removed.swap(true, Ordering::SeqCst) {
            return;
        }
        let _ = self.tx.send(HandleCmd::Remove);
        if let Some(controls) = &self.controls {
            controls.clear();
        }
        if let Ok(mut slot) = self.callback.lock() {
            *slot = None;
        }
    }

    fn subscribe(&self, on_status: StatusCallback) {
        if let Ok(mut slot) = self.callback.lock() {
            *slot = Some(on_status);
        }
    }

    fn set_foreground_controls(&self, active: bool, metadata: &ControlsMetadata) {
        let Some(controls) = &self.controls else {
            return;
        };
        if active {
            controls.show(metadata);
        } else {
            controls.clear();
        }
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        self.remove();
    }
}

enum Input {
    Local(PathBuf),
    Spooled {
        temp: NamedTempFile,
        spool: Arc<Spool>,
    },
}

impl Input {
    fn open(&self) -> std::io::Result<File> {
        match self {
            Self::Local(path) => File::open(path),
            Self::Spooled { temp, .. } => temp.reopen(),
        }
    }
}

/// Download-side bookkeeping shared between the reader thread and the
/// playback thread.
#[derive(Default)]
pub(super) struct Spool {
    pub(super) bytes: AtomicU64,
    pub(super) done: AtomicBool,
    pub(super) abort: AtomicBool,
}

/// Copy the HTTP body into the spool file until the stream ends, the
/// connection drops, or the handle is removed.
pub(super) fn spool_stream(mut reader: impl Read, mut writer: File, spool: Arc<Spool>) {
    let mut buf = [0u8; SPOOL_CHUNK_BYTES];
    loop {
        if spool.abort.load(Ordering::SeqCst) {
            break;
        }
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                if writer.write_all(&buf[..n]).is_err() {
                    break;
                }
                spool.bytes.fetch_add(n as u64, Ordering::SeqCst);
            }
            Err(e) => {
                warn!("stream download ended: {e}");
                break;
            }
        }
    }
    spool.done.store(true, Ordering::SeqCst);
}

fn run_playback(
    input: Input,
    rx: Receiver<HandleCmd>,
    callback: CallbackSlot,
    removed: Arc<AtomicBool>,
    prefetch_bytes: u64,
    tick: Duration,
) {
    // Hold the prefetch before decoding, reporting buffering meanwhile.
    if let Input::Spooled { spool, .. } = &input {
        while spool.bytes.load(Ordering::SeqCst) < prefetch_bytes
            && !spool.done.load(Ordering::SeqCst)
        {
            if removed.load(Ordering::SeqCst) {
                spool.abort.store(true, Ordering::SeqCst);
                return;
            }
            emit(
                &callback,
                EngineStatus {
                    buffering: true,
                    ..Default::default()
                },
            );
            thread::sleep(Duration::from_millis(50));
        }
    }
    if removed.load(Ordering::SeqCst) {
        if let Input::Spooled { spool, .. } = &input {
            spool.abort.store(true, Ordering::SeqCst);
        }
        return;
    }

    let stream = match OutputStreamBuilder::open_default_stream() {
        Ok(s) => s,
        Err(e) => {
            warn!("no audio output device: {e}");
            emit(&callback, finished_status(None));
            return;
        }
    };
    // rodio logs to stderr when OutputStream is dropped. That's useful in
    // debugging, but noisy for a terminal app.
    let mut stream = stream;
    stream.log_on_drop(false);

    let file = match input.open() {
        Ok(f) => f,
        Err(e) => {
            warn!("could not reopen source: {e}");
            emit(&callback, finished_status(None));
            return;
        }
    };
    let source = match Decoder::new(BufReader::new(file)) {
        Ok(source) => source,
        Err(e) => {
            warn!("could not decode stream: {e}");
            emit(&callback, finished_status(None));
            return;
        }
    };
    // Live streams have no total length; files do.
    let total = source.total_duration();

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();

    let mut playing = false;
    // Track start time and accumulated elapsed when paused.
    let mut started_at: Option<Instant> = None;
    let mut accumulated = Duration::ZERO;
    let mut finished = false;

    let position = |accumulated: Duration, started_at: Option<Instant>| {
        accumulated + started_at.map_or(Duration::ZERO, |st| st.elapsed())
    };

    loop {
        match rx.recv_timeout(tick) {
            Ok(HandleCmd::Play) => {
                sink.play();
                playing = true;
                finished = false;
                if started_at.is_none() {
                    started_at = Some(Instant::now());
                }
                emit(
                    &callback,
                    EngineStatus {
                        playing: true,
                        position: position(accumulated, started_at),
                        duration: total,
                        ..Default::default()
                    },
                );
            }
            Ok(HandleCmd::Pause) => {
                if let Some(st) = started_at.take() {
                    accumulated += st.elapsed();
                }
                sink.pause();
                playing = false;
                emit(
                    &callback,
                    EngineStatus {
                        playing: false,
                        position: accumulated,
                        duration: total,
                        ..Default::default()
                    },
                );
            }
            Ok(HandleCmd::Remove) | Err(RecvTimeoutError::Disconnected) => {
                sink.stop();
                break;
            }
            Err(RecvTimeoutError::Timeout) => {
                if playing && sink.empty() && !finished {
                    // The source ran out on its own.
                    finished = true;
                    playing = false;
                    started_at = None;
                    accumulated = Duration::ZERO;
                    emit(&callback, finished_status(total));
                    continue;
                }
                emit(
                    &callback,
                    EngineStatus {
                        playing,
                        position: position(accumulated, started_at),
                        duration: total,
                        ..Default::default()
                    },
                );
            }
        }
    }

    if let Input::Spooled { spool, .. } = &input {
        spool.abort.store(true, Ordering::SeqCst);
    }
}

fn finished_status(duration: Option<Duration>) -> EngineStatus {
    EngineStatus {
        playing: false,
        buffering: false,
        position: Duration::ZERO,
        duration,
        finished: true,
    }
}

fn emit(callback: &CallbackSlot, status: EngineStatus) {
    let Ok(slot) = callback.lock() else {
        return;
    };
    if let Some(cb) = slot.as_ref() {
        cb(status);
    }
}

/// True for locators the engine must fetch over HTTP; everything else is
/// treated as a local path.
pub(super) fn is_http_uri(uri: &str) -> bool {
    let lower = uri.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

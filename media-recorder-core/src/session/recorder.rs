use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use parking_lot::Mutex;

use crate::models::clip::WavClip;
use crate::models::config::RecorderConfig;
use crate::models::error::RecorderError;
use crate::models::source::SessionDiagnostics;
use crate::models::state::RecorderState;
use crate::processing::accumulator::{Channel, ChannelAccumulator};
use crate::processing::{merge, wav};
use crate::traits::capture_source::{BlockCallback, CaptureSource};
use crate::traits::playback_sink::{PlaybackObserver, PlaybackSink};
use crate::traits::recorder_delegate::RecorderDelegate;

/// Both channels of one captured block, moved over the queue as a unit so a
/// drop or a flush can never leave the channel lists out of lockstep.
struct BlockPair {
    left: Vec<f32>,
    right: Vec<f32>,
}

/// How long the drain thread waits on the queue before checking shutdown.
const DRAIN_POLL: Duration = Duration::from_millis(25);

/// The pipeline always records interleaved stereo.
const OUTPUT_CHANNELS: u16 = 2;

/// Recording session controller.
///
/// Owns a capture backend and a playback sink and orchestrates the
/// lifecycle: start capture, accumulate delivered blocks, stop and encode,
/// hand the encoded clip to playback.
///
/// ```text
/// [CaptureSource] → callback → [bounded queue] → drain thread
///                                                     ↓
///                                           [ChannelAccumulator]
///                                                     ↓ (stop)
///                                     merge → interleave → WAV encode
///                                                     ↓
///                                        [WavClip] → [PlaybackSink]
/// ```
///
/// The capture callback only copies the block and enqueues it; the drain
/// thread does the appending. Stop joins the drain thread before merging,
/// so the merge always sees a quiescent accumulator.
pub struct Recorder<C: CaptureSource, P: PlaybackSink> {
    capture: C,
    playback: P,
    config: RecorderConfig,
    state: RecorderState,
    clip: Option<WavClip>,
    delegate: Option<Arc<dyn RecorderDelegate>>,

    // Shared with the capture callback and the drain thread.
    accumulator: Arc<Mutex<ChannelAccumulator>>,
    diagnostics: Arc<Mutex<SessionDiagnostics>>,

    // Drain thread control.
    drain_running: Arc<AtomicBool>,
    drain_handle: Option<thread::JoinHandle<()>>,
}

impl<C: CaptureSource, P: PlaybackSink> Recorder<C, P> {
    pub fn new(capture: C, playback: P) -> Self {
        Self::with_config(capture, playback, RecorderConfig::default())
    }

    pub fn with_config(capture: C, playback: P, config: RecorderConfig) -> Self {
        Self {
            capture,
            playback,
            config,
            state: RecorderState::Idle,
            clip: None,
            delegate: None,
            accumulator: Arc::new(Mutex::new(ChannelAccumulator::new())),
            diagnostics: Arc::new(Mutex::new(SessionDiagnostics::default())),
            drain_running: Arc::new(AtomicBool::new(false)),
            drain_handle: None,
        }
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn RecorderDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    /// The clip produced by the most recently stopped session, if any.
    pub fn clip(&self) -> Option<&WavClip> {
        self.clip.as_ref()
    }

    pub fn diagnostics(&self) -> SessionDiagnostics {
        *self.diagnostics.lock()
    }

    /// Start a new recording session.
    ///
    /// Rejects with `AlreadyRecording` while a session is capturing.
    /// Clears the accumulator and discards the previous clip, then starts
    /// the backend; if the device cannot be acquired the session stays
    /// idle and the error is returned.
    pub fn start(&mut self) -> Result<(), RecorderError> {
        if self.state.is_capturing() {
            return Err(RecorderError::AlreadyRecording);
        }
        self.config.validate().map_err(RecorderError::InvalidConfig)?;

        let info = self.capture.info();
        log::info!("starting capture on {} ({})", info.name, info.id);

        // The accumulator must be clean before the first block can arrive.
        self.accumulator.lock().reset();
        *self.diagnostics.lock() = SessionDiagnostics::default();

        let (tx, rx) = bounded::<BlockPair>(self.config.queue_blocks);
        self.spawn_drain_thread(rx);

        if let Err(err) = self.capture.start(self.block_callback(tx)) {
            self.shutdown_drain_thread();
            log::warn!("capture source failed to start: {}", err);
            return Err(err);
        }

        self.clip = None;
        self.set_state(RecorderState::Capturing);
        Ok(())
    }

    /// Stop the active session and encode the accumulated audio.
    ///
    /// Valid only while capturing; otherwise `NotRecording`. Runs the
    /// merge, interleave, and encode steps synchronously on the calling
    /// thread — capture has already been released, so nothing is blocked.
    pub fn stop(&mut self) -> Result<(), RecorderError> {
        if !self.state.is_capturing() {
            return Err(RecorderError::NotRecording);
        }

        if let Err(err) = self.capture.stop() {
            log::warn!("capture source failed to stop cleanly: {}", err);
        }
        self.shutdown_drain_thread();

        let (left_blocks, right_blocks) = self.accumulator.lock().take();
        log::debug!("merging {} blocks per channel", left_blocks.len());

        let left = merge::merge_blocks(&left_blocks);
        let right = merge::merge_blocks(&right_blocks);
        let stereo = match merge::interleave(&left, &right) {
            Ok(stereo) => stereo,
            Err(err) => {
                // The capture path delivered the channels out of lockstep;
                // nothing usable was recorded.
                self.set_state(RecorderState::Idle);
                if let Some(delegate) = &self.delegate {
                    delegate.on_error(&err);
                }
                return Err(err);
            }
        };

        let frames = left.len() as u64;
        let bytes = wav::encode(&stereo, self.config.sample_rate, OUTPUT_CHANNELS, self.config.volume);
        let clip = WavClip::new(bytes, self.config.sample_rate, OUTPUT_CHANNELS, frames);
        log::info!("recorded {:.2}s clip ({} bytes)", clip.duration_secs(), clip.len());

        self.clip = Some(clip);
        self.set_state(RecorderState::Stopped);
        if let (Some(delegate), Some(clip)) = (&self.delegate, &self.clip) {
            delegate.on_clip_ready(clip);
        }
        Ok(())
    }

    /// Hand the recorded clip to the playback sink.
    ///
    /// Valid only from `Stopped` with a clip; otherwise `NothingRecorded`.
    /// The sink's ready/ended signals are logged and forwarded to the
    /// delegate.
    pub fn play(&mut self) -> Result<(), RecorderError> {
        let clip = match (&self.state, &self.clip) {
            (RecorderState::Stopped, Some(clip)) => clip,
            _ => return Err(RecorderError::NothingRecorded),
        };

        log::info!("handing {:.2}s clip to playback sink", clip.duration_secs());
        let observer: Arc<dyn PlaybackObserver> = Arc::new(SessionPlaybackObserver {
            delegate: self.delegate.clone(),
        });
        self.playback.play(clip, observer)
    }

    fn set_state(&mut self, new_state: RecorderState) {
        log::debug!("session state: {:?} to {:?}", self.state, new_state);
        self.state = new_state;
        if let Some(delegate) = &self.delegate {
            delegate.on_state_changed(new_state);
        }
    }

    /// Build the callback handed to the capture source.
    ///
    /// Copies both channel slices while they are valid, then enqueues them
    /// without blocking: a full queue drops the block whole and counts it.
    fn block_callback(&self, tx: Sender<BlockPair>) -> BlockCallback {
        let diagnostics = Arc::clone(&self.diagnostics);
        Arc::new(move |left: &[f32], right: &[f32]| {
            let pair = BlockPair {
                left: left.to_vec(),
                right: right.to_vec(),
            };
            match tx.try_send(pair) {
                Ok(()) => {
                    diagnostics.lock().blocks_delivered += 1;
                }
                Err(TrySendError::Full(pair)) => {
                    let mut diag = diagnostics.lock();
                    diag.blocks_delivered += 1;
                    diag.blocks_dropped += 1;
                    drop(diag);
                    log::warn!("block queue full, dropping {}-frame block", pair.left.len());
                }
                // Session already shut down; late delivery is ignored.
                Err(TrySendError::Disconnected(_)) => {}
            }
        })
    }

    fn spawn_drain_thread(&mut self, rx: Receiver<BlockPair>) {
        self.drain_running.store(true, Ordering::SeqCst);

        let running = Arc::clone(&self.drain_running);
        let accumulator = Arc::clone(&self.accumulator);
        let diagnostics = Arc::clone(&self.diagnostics);

        let handle = thread::Builder::new()
            .name("recorder-drain".into())
            .spawn(move || loop {
                match rx.recv_timeout(DRAIN_POLL) {
                    Ok(pair) => Self::append_pair(&accumulator, &diagnostics, pair),
                    Err(RecvTimeoutError::Timeout) => {
                        if !running.load(Ordering::SeqCst) {
                            // Flush what is still queued so a delivered
                            // block is never half-recorded.
                            while let Ok(pair) = rx.try_recv() {
                                Self::append_pair(&accumulator, &diagnostics, pair);
                            }
                            break;
                        }
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            })
            .expect("failed to spawn drain thread");

        self.drain_handle = Some(handle);
    }

    fn shutdown_drain_thread(&mut self) {
        self.drain_running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.drain_handle.take() {
            let _ = handle.join();
        }
    }

    fn append_pair(
        accumulator: &Mutex<ChannelAccumulator>,
        diagnostics: &Mutex<SessionDiagnostics>,
        pair: BlockPair,
    ) {
        let frames = pair.left.len() as u64;
        {
            let mut acc = accumulator.lock();
            acc.append(Channel::Left, &pair.left);
            acc.append(Channel::Right, &pair.right);
        }
        diagnostics.lock().frames_accumulated += frames;
    }
}

impl<C: CaptureSource, P: PlaybackSink> Drop for Recorder<C, P> {
    fn drop(&mut self) {
        if self.state.is_capturing() {
            let _ = self.capture.stop();
            self.shutdown_drain_thread();
        }
    }
}

/// Forwards a sink's playback signals to the session delegate.
struct SessionPlaybackObserver {
    delegate: Option<Arc<dyn RecorderDelegate>>,
}

impl PlaybackObserver for SessionPlaybackObserver {
    fn on_ready(&self) {
        log::debug!("playback ready");
        if let Some(delegate) = &self.delegate {
            delegate.on_playback_ready();
        }
    }

    fn on_ended(&self) {
        log::debug!("playback ended");
        if let Some(delegate) = &self.delegate {
            delegate.on_playback_ended();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::source::SourceInfo;
    use crate::processing::wav::WavHeader;

    /// Capture source driven by the test: `start` parks the callback in a
    /// shared slot, and a `SourceHandle` pushes blocks through it.
    struct ScriptedSource {
        callback: Arc<Mutex<Option<BlockCallback>>>,
        fail_start: bool,
    }

    #[derive(Clone)]
    struct SourceHandle {
        callback: Arc<Mutex<Option<BlockCallback>>>,
    }

    impl ScriptedSource {
        fn new() -> (Self, SourceHandle) {
            let callback = Arc::new(Mutex::new(None));
            let source = Self {
                callback: Arc::clone(&callback),
                fail_start: false,
            };
            (source, SourceHandle { callback })
        }

        fn failing() -> Self {
            Self {
                callback: Arc::new(Mutex::new(None)),
                fail_start: true,
            }
        }
    }

    impl SourceHandle {
        fn emit(&self, left: &[f32], right: &[f32]) {
            let guard = self.callback.lock();
            if let Some(callback) = guard.as_ref() {
                callback(left, right);
            }
        }
    }

    impl CaptureSource for ScriptedSource {
        fn is_available(&self) -> bool {
            !self.fail_start
        }

        fn start(&mut self, callback: BlockCallback) -> Result<(), RecorderError> {
            if self.fail_start {
                return Err(RecorderError::CaptureUnavailable("scripted failure".into()));
            }
            *self.callback.lock() = Some(callback);
            Ok(())
        }

        fn stop(&mut self) -> Result<(), RecorderError> {
            *self.callback.lock() = None;
            Ok(())
        }

        fn info(&self) -> SourceInfo {
            SourceInfo {
                id: "scripted".into(),
                name: "Scripted source".into(),
                is_default: true,
            }
        }
    }

    /// Sink that records what it was asked to play and completes at once.
    #[derive(Default)]
    struct RecordingSink {
        played: Arc<Mutex<Vec<Vec<u8>>>>,
    }

    impl PlaybackSink for RecordingSink {
        fn play(&mut self, clip: &WavClip, observer: Arc<dyn PlaybackObserver>) -> Result<(), RecorderError> {
            self.played.lock().push(clip.as_bytes().to_vec());
            observer.on_ready();
            observer.on_ended();
            Ok(())
        }
    }

    #[derive(Default)]
    struct EventLog {
        events: Mutex<Vec<String>>,
    }

    impl RecorderDelegate for EventLog {
        fn on_state_changed(&self, state: RecorderState) {
            self.events.lock().push(format!("state:{:?}", state));
        }

        fn on_clip_ready(&self, clip: &WavClip) {
            self.events.lock().push(format!("clip:{}", clip.len()));
        }

        fn on_playback_ready(&self) {
            self.events.lock().push("playback-ready".into());
        }

        fn on_playback_ended(&self) {
            self.events.lock().push("playback-ended".into());
        }
    }

    fn recorder() -> (Recorder<ScriptedSource, RecordingSink>, SourceHandle) {
        let (source, handle) = ScriptedSource::new();
        (Recorder::new(source, RecordingSink::default()), handle)
    }

    const LEFT_BLOCK: [f32; 4] = [0.1, -0.1, 0.2, -0.2];
    const RIGHT_BLOCK: [f32; 4] = [0.2, -0.2, 0.4, -0.4];

    #[test]
    fn capture_two_blocks_end_to_end() {
        let (mut recorder, handle) = recorder();

        recorder.start().unwrap();
        assert!(recorder.state().is_capturing());

        handle.emit(&LEFT_BLOCK, &RIGHT_BLOCK);
        handle.emit(&LEFT_BLOCK, &RIGHT_BLOCK);

        recorder.stop().unwrap();
        assert!(recorder.state().is_stopped());

        let clip = recorder.clip().expect("clip after stop");
        // 8 frames per channel, 16 interleaved samples, 44 + 32 bytes.
        assert_eq!(clip.frames(), 8);
        assert_eq!(clip.len(), 76);
        assert_eq!(clip.sample_rate(), 44_100);
        assert_eq!(clip.channels(), 2);

        let header = WavHeader::parse(clip.as_bytes()).unwrap();
        assert_eq!(header.sample_rate, 44_100);
        assert_eq!(header.channels, 2);
        assert_eq!(header.data_len, 32);

        // First frame is left[0] then right[0].
        let bytes = clip.as_bytes();
        let l0 = i16::from_le_bytes([bytes[44], bytes[45]]);
        let r0 = i16::from_le_bytes([bytes[46], bytes[47]]);
        assert_eq!(l0, wav::quantize(0.1, 1.0));
        assert_eq!(r0, wav::quantize(0.2, 1.0));

        let diag = recorder.diagnostics();
        assert_eq!(diag.blocks_delivered, 2);
        assert_eq!(diag.blocks_dropped, 0);
        assert_eq!(diag.frames_accumulated, 8);
    }

    #[test]
    fn stop_while_idle_is_not_recording() {
        let (mut recorder, _handle) = recorder();

        assert_eq!(recorder.stop().unwrap_err(), RecorderError::NotRecording);
        assert!(recorder.state().is_idle());
    }

    #[test]
    fn play_without_recording_is_nothing_recorded() {
        let (mut recorder, _handle) = recorder();

        assert_eq!(recorder.play().unwrap_err(), RecorderError::NothingRecorded);
    }

    #[test]
    fn start_while_capturing_is_rejected() {
        let (mut recorder, _handle) = recorder();

        recorder.start().unwrap();
        assert_eq!(recorder.start().unwrap_err(), RecorderError::AlreadyRecording);
        assert!(recorder.state().is_capturing());

        recorder.stop().unwrap();
    }

    #[test]
    fn failed_device_leaves_session_idle() {
        let mut recorder = Recorder::new(ScriptedSource::failing(), RecordingSink::default());

        let err = recorder.start().unwrap_err();
        assert!(matches!(err, RecorderError::CaptureUnavailable(_)));
        assert!(recorder.state().is_idle());

        // Recoverable by retry; still idle, still reports the device.
        assert!(matches!(
            recorder.start().unwrap_err(),
            RecorderError::CaptureUnavailable(_)
        ));
        assert!(recorder.state().is_idle());
    }

    #[test]
    fn invalid_config_is_rejected_at_start() {
        let (source, _handle) = ScriptedSource::new();
        let config = RecorderConfig {
            sample_rate: 0,
            ..Default::default()
        };
        let mut recorder = Recorder::with_config(source, RecordingSink::default(), config);

        assert!(matches!(recorder.start().unwrap_err(), RecorderError::InvalidConfig(_)));
        assert!(recorder.state().is_idle());
    }

    #[test]
    fn stopping_an_empty_session_yields_a_bare_container() {
        let (mut recorder, _handle) = recorder();

        recorder.start().unwrap();
        recorder.stop().unwrap();

        let clip = recorder.clip().expect("clip after stop");
        assert_eq!(clip.frames(), 0);
        assert_eq!(clip.len(), 44);
    }

    #[test]
    fn restart_discards_previous_session() {
        let (mut recorder, handle) = recorder();

        recorder.start().unwrap();
        handle.emit(&[0.1, 0.2], &[0.1, 0.2]);
        recorder.stop().unwrap();
        assert_eq!(recorder.clip().unwrap().frames(), 2);

        // A new session must not inherit the old blocks or the old clip.
        recorder.start().unwrap();
        assert!(recorder.clip().is_none());
        handle.emit(&LEFT_BLOCK, &RIGHT_BLOCK);
        recorder.stop().unwrap();

        assert_eq!(recorder.clip().unwrap().frames(), 4);
    }

    #[test]
    fn play_hands_container_to_sink_and_reports_events() {
        let played = Arc::new(Mutex::new(Vec::new()));
        let sink = RecordingSink {
            played: Arc::clone(&played),
        };
        let (source, handle) = ScriptedSource::new();
        let mut recorder = Recorder::new(source, sink);

        let log = Arc::new(EventLog::default());
        recorder.set_delegate(Arc::clone(&log) as Arc<dyn RecorderDelegate>);

        recorder.start().unwrap();
        handle.emit(&LEFT_BLOCK, &RIGHT_BLOCK);
        recorder.stop().unwrap();
        recorder.play().unwrap();

        let played = played.lock();
        assert_eq!(played.len(), 1);
        assert_eq!(played[0], recorder.clip().unwrap().as_bytes());

        let events = log.events.lock();
        assert_eq!(
            *events,
            vec![
                "state:Capturing".to_string(),
                "state:Stopped".to_string(),
                format!("clip:{}", recorder.clip().unwrap().len()),
                "playback-ready".to_string(),
                "playback-ended".to_string(),
            ]
        );
    }

    #[test]
    fn overflowing_queue_drops_whole_blocks() {
        let (source, handle) = ScriptedSource::new();
        let config = RecorderConfig {
            queue_blocks: 1,
            ..Default::default()
        };
        let mut recorder = Recorder::with_config(source, RecordingSink::default(), config);

        recorder.start().unwrap();
        for _ in 0..5 {
            handle.emit(&LEFT_BLOCK, &RIGHT_BLOCK);
        }
        recorder.stop().unwrap();

        // How many blocks squeeze through depends on drain timing, but
        // every delivery is counted and every surviving block is whole.
        let diag = recorder.diagnostics();
        assert_eq!(diag.blocks_delivered, 5);
        assert_eq!(
            diag.frames_accumulated,
            (5 - diag.blocks_dropped) * LEFT_BLOCK.len() as u64
        );
        assert_eq!(recorder.clip().unwrap().frames(), diag.frames_accumulated);
    }
}

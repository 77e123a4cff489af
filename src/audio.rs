//! Audio feedback: synthesized tones through rodio
//!
//! No sample assets; every effect is a short sine tone (or a stack of
//! them), mirroring the oscillator-based effects of the original page.

use crate::feedback::FeedbackSink;
use rand::Rng;
use rodio::source::SineWave;
use rodio::{OutputStream, OutputStreamHandle, Sink, Source};
use std::time::Duration;

/// The jackpot arpeggio: C5 E5 G5 C6 E6 G6, one note every 100ms
const JACKPOT_NOTES: [f32; 6] = [523.25, 659.25, 783.99, 1046.50, 1318.51, 1567.98];

/// Tone synthesis over the default output device
pub struct AudioManager {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    sfx_volume: f32,
}

impl AudioManager {
    /// Open the default output device. None when no audio is available;
    /// the picker runs silently in that case.
    pub fn new() -> Option<Self> {
        let (stream, stream_handle) = OutputStream::try_default().ok()?;
        Some(Self {
            _stream: stream,
            stream_handle,
            sfx_volume: 0.5,
        })
    }

    /// Set effect volume (0.0 to 1.0)
    pub fn set_sfx_volume(&mut self, volume: f32) {
        self.sfx_volume = volume.clamp(0.0, 1.0);
    }

    pub fn sfx_volume(&self) -> f32 {
        self.sfx_volume
    }

    /// Play one tone and let it clean itself up
    fn play_tone(&self, freq: f32, duration: Duration, delay: Duration, vol: f32) {
        if self.sfx_volume <= 0.0 {
            return;
        }
        let Ok(sink) = Sink::try_new(&self.stream_handle) else {
            return;
        };
        let source = SineWave::new(freq)
            .take_duration(duration)
            .amplify(vol)
            .delay(delay);
        sink.set_volume(self.sfx_volume);
        sink.append(source);
        sink.detach();
    }

    /// Short blip while the reels churn, pitch jittered per tick
    pub fn play_spin_tick(&self) {
        let freq = rand::thread_rng().gen_range(800.0..1000.0);
        self.play_tone(freq, Duration::from_millis(50), Duration::ZERO, 0.05);
    }

    /// Low thud when a column lands
    pub fn play_column_stop(&self) {
        self.play_tone(150.0, Duration::from_millis(300), Duration::ZERO, 0.2);
        self.play_tone(100.0, Duration::from_millis(300), Duration::ZERO, 0.2);
    }

    /// Click for a lock toggle
    pub fn play_lock(&self) {
        self.play_tone(400.0, Duration::from_millis(100), Duration::ZERO, 0.1);
    }

    /// Ascending arpeggio when the whole cycle lands
    pub fn play_jackpot(&self) {
        for (i, freq) in JACKPOT_NOTES.iter().enumerate() {
            self.play_tone(
                *freq,
                Duration::from_millis(500),
                Duration::from_millis(i as u64 * 100),
                0.1,
            );
        }
    }
}

/// Feedback sink backed by an optional audio device
pub struct AudioFeedback {
    audio: Option<AudioManager>,
}

impl AudioFeedback {
    pub fn new(audio: Option<AudioManager>) -> Self {
        Self { audio }
    }

    pub fn audio_mut(&mut self) -> Option<&mut AudioManager> {
        self.audio.as_mut()
    }
}

impl FeedbackSink for AudioFeedback {
    fn on_tick(&mut self) {
        if let Some(audio) = &self.audio {
            audio.play_spin_tick();
        }
    }

    fn on_column_stop(&mut self) {
        if let Some(audio) = &self.audio {
            audio.play_column_stop();
        }
    }

    fn on_all_settled(&mut self) {
        if let Some(audio) = &self.audio {
            audio.play_jackpot();
        }
    }

    fn on_lock_toggle(&mut self) {
        if let Some(audio) = &self.audio {
            audio.play_lock();
        }
    }
}

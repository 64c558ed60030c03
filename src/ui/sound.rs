/// Sound engine: procedural sound effects via rodio.
///
/// All cues are synthesized into in-memory WAV buffers at init time.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink.
///
/// Compile with `--no-default-features` or without "sound" feature
/// to disable audio entirely (the stub SoundEngine does nothing).

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use super::{gen_eat, gen_game_over, gen_powerup, make_wav};

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_eat: Arc<Vec<u8>>,
        sfx_powerup: Arc<Vec<u8>>,
        sfx_game_over: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;
            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_eat: Arc::new(make_wav(&gen_eat())),
                sfx_powerup: Arc::new(make_wav(&gen_powerup())),
                sfx_game_over: Arc::new(make_wav(&gen_game_over())),
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }

        pub fn play_eat(&self) { self.play(&self.sfx_eat); }
        pub fn play_powerup(&self) { self.play(&self.sfx_powerup); }
        pub fn play_game_over(&self) { self.play(&self.sfx_game_over); }
    }
}

// ════════════════════════════════════════════════════════════
//  Waveform generators: all produce Vec<f32> mono samples
// ════════════════════════════════════════════════════════════

const SAMPLE_RATE: u32 = 22050;
const PEAK: f32 = 0.3;
const TAIL: f32 = 0.03;

#[cfg_attr(not(feature = "sound"), allow(dead_code))]
#[derive(Clone, Copy)]
enum Wave {
    Sine,
    Square,
    Sawtooth,
}

#[cfg_attr(not(feature = "sound"), allow(dead_code))]
impl Wave {
    /// `phase` in cycles; only the fractional part matters.
    fn sample(self, phase: f32) -> f32 {
        let p = phase.fract();
        match self {
            Wave::Sine => (p * std::f32::consts::TAU).sin(),
            Wave::Square => if p < 0.5 { 1.0 } else { -1.0 },
            Wave::Sawtooth => 2.0 * p - 1.0,
        }
    }
}

/// Exponential pitch glide through `freqs`, one segment of `seg_dur`
/// seconds per adjacent pair, with an exponential volume decay over the
/// whole cue. Phase is accumulated so the glide has no clicks.
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn glide(wave: Wave, freqs: &[f32], seg_dur: f32) -> Vec<f32> {
    let segments = freqs.len().saturating_sub(1).max(1);
    let seg_len = (SAMPLE_RATE as f32 * seg_dur) as usize;
    let total = seg_len * segments;
    let mut samples = Vec::with_capacity(total);
    let mut phase = 0.0_f32;
    for i in 0..total {
        let seg = (i / seg_len.max(1)).min(segments - 1);
        let f0 = freqs.get(seg).copied().unwrap_or(440.0);
        let f1 = freqs.get(seg + 1).copied().unwrap_or(f0);
        let t = (i - seg * seg_len) as f32 / seg_len.max(1) as f32;
        let freq = f0 * (f1 / f0).powf(t);
        let env = PEAK * (TAIL / PEAK).powf(i as f32 / total as f32);
        samples.push(wave.sample(phase) * env);
        phase = (phase + freq / SAMPLE_RATE as f32).fract();
    }
    samples
}

/// Food: sine drop 880 → 440 Hz in 0.1 s
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn gen_eat() -> Vec<f32> {
    glide(Wave::Sine, &[880.0, 440.0], 0.1)
}

/// Powerup: square climb 440 → 880 → 1320 Hz in 0.2 s
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn gen_powerup() -> Vec<f32> {
    glide(Wave::Square, &[440.0, 880.0, 1320.0], 0.1)
}

/// Game over: sawtooth slide 220 → 110 Hz in 0.5 s
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn gen_game_over() -> Vec<f32> {
    glide(Wave::Sawtooth, &[220.0, 110.0], 0.5)
}

// ════════════════════════════════════════════════════════════
//  WAV encoder: wraps f32 samples into a valid WAV buffer
// ════════════════════════════════════════════════════════════

#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn make_wav(samples: &[f32]) -> Vec<u8> {
    let num_channels: u16 = 1;
    let bits_per_sample: u16 = 16;
    let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
    let block_align = num_channels * bits_per_sample / 8;
    let data_size = samples.len() as u32 * 2;
    let file_size = 36 + data_size;

    let mut buf = Vec::with_capacity(44 + data_size as usize);

    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&file_size.to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
    buf.extend_from_slice(&num_channels.to_le_bytes());
    buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&bits_per_sample.to_le_bytes());

    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());
    for &s in samples {
        let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
        buf.extend_from_slice(&val.to_le_bytes());
    }
    buf
}

// ════════════════════════════════════════════════════════════
//  Public API: compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_eat(&self) {}
    pub fn play_powerup(&self) {}
    pub fn play_game_over(&self) {}
}

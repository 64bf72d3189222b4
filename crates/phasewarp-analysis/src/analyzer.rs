//! Real-time spectrum analyzer.
//!
//! Split into two halves that share a single-slot mailbox:
//!
//! - [`SpectrumProducer`] lives on the audio thread. It collects samples
//!   into a queue of one FFT length and, each time the queue fills, offers
//!   the block to the mailbox. If the consumer has not taken the previous
//!   block yet, the new one is dropped and counted. It never blocks and
//!   never allocates.
//! - [`SpectrumAnalyzer`] is ticked from a UI timer. When a block is
//!   waiting it windows it, runs a forward FFT and folds the bin
//!   magnitudes into a peak-hold display buffer. Every tick decays that
//!   buffer so peaks fall away when the input stops.
//!
//! The mailbox flag is the only synchronization: the producer publishes a
//! block with a `Release` store, the consumer takes it with an `Acquire`
//! load and hands the slot back with another `Release` store.
//!
//! ```rust
//! use phasewarp_analysis::{AnalyzerSettings, spectrum_analyzer};
//!
//! let (mut producer, mut analyzer) = spectrum_analyzer(AnalyzerSettings {
//!     fft_order: 8,
//!     ..AnalyzerSettings::default()
//! });
//!
//! let block: Vec<f32> = (0..256)
//!     .map(|i| (std::f32::consts::TAU * 16.0 * i as f32 / 256.0).sin())
//!     .collect();
//! producer.push_buffer(&block);
//! assert!(analyzer.tick());
//!
//! let peak = analyzer
//!     .magnitudes()
//!     .iter()
//!     .enumerate()
//!     .max_by(|a, b| a.1.total_cmp(b.1))
//!     .map(|(bin, _)| bin);
//! assert_eq!(peak, Some(16));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::window::Window;

/// Smallest supported FFT order (64 points).
pub const MIN_FFT_ORDER: u32 = 6;
/// Largest supported FFT order (32768 points).
pub const MAX_FFT_ORDER: u32 = 15;
/// FFT order used when none is configured (2048 points).
pub const DEFAULT_FFT_ORDER: u32 = 11;
/// Per-tick decay applied to the display buffer.
pub const DEFAULT_DECAY: f32 = 0.7;
/// UI refresh rate the decay is tuned for.
pub const DEFAULT_REFRESH_HZ: f32 = 30.0;

/// Construction settings for [`spectrum_analyzer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyzerSettings {
    /// FFT length is `2^fft_order`, limited to
    /// `MIN_FFT_ORDER..=MAX_FFT_ORDER`.
    pub fft_order: u32,
    /// Multiplier applied to every bin on every tick, limited to `[0, 1]`.
    pub decay: f32,
    /// Window applied to each block before the FFT.
    pub window: Window,
    /// Scale the window to unit mean.
    pub normalize_window: bool,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            fft_order: DEFAULT_FFT_ORDER,
            decay: DEFAULT_DECAY,
            window: Window::Hann,
            normalize_window: true,
        }
    }
}

struct Mailbox {
    ready: AtomicBool,
    block: Box<[AtomicU32]>,
    dropped: AtomicU64,
}

/// Create a connected producer/consumer pair.
pub fn spectrum_analyzer(settings: AnalyzerSettings) -> (SpectrumProducer, SpectrumAnalyzer) {
    let order = settings.fft_order.clamp(MIN_FFT_ORDER, MAX_FFT_ORDER);
    let size = 1usize << order;
    let decay = if settings.decay.is_finite() {
        settings.decay.clamp(0.0, 1.0)
    } else {
        DEFAULT_DECAY
    };

    let mailbox = Arc::new(Mailbox {
        ready: AtomicBool::new(false),
        block: (0..size).map(|_| AtomicU32::new(0)).collect(),
        dropped: AtomicU64::new(0),
    });

    let fft = FftPlanner::new().plan_fft_forward(size);
    let scratch_len = fft.get_inplace_scratch_len();

    tracing::debug!(fft_size = size, decay, window = ?settings.window, "spectrum analyzer created");

    let producer = SpectrumProducer {
        queue: vec![0.0; size].into_boxed_slice(),
        index: 0,
        mailbox: Arc::clone(&mailbox),
    };
    let analyzer = SpectrumAnalyzer {
        fft,
        window: settings.window.table(size, settings.normalize_window),
        buffer: vec![Complex::new(0.0, 0.0); size],
        scratch: vec![Complex::new(0.0, 0.0); scratch_len],
        output: vec![0.0; size / 2],
        decay,
        mailbox,
        reported_drops: 0,
    };
    (producer, analyzer)
}

/// Audio-thread half of the analyzer.
pub struct SpectrumProducer {
    queue: Box<[f32]>,
    index: usize,
    mailbox: Arc<Mailbox>,
}

impl SpectrumProducer {
    /// Queue every sample of `buffer`.
    pub fn push_buffer(&mut self, buffer: &[f32]) {
        for &sample in buffer {
            self.push_next_sample(sample);
        }
    }

    /// Queue one sample, handing the block off when the queue fills.
    #[inline]
    pub fn push_next_sample(&mut self, sample: f32) {
        self.queue[self.index] = sample;
        self.index += 1;
        if self.index == self.queue.len() {
            self.hand_off();
            self.index = 0;
        }
    }

    fn hand_off(&self) {
        let mailbox = &*self.mailbox;
        if mailbox.ready.load(Ordering::Acquire) {
            mailbox.dropped.fetch_add(1, Ordering::Relaxed);
            return;
        }
        for (slot, &sample) in mailbox.block.iter().zip(self.queue.iter()) {
            slot.store(sample.to_bits(), Ordering::Relaxed);
        }
        mailbox.ready.store(true, Ordering::Release);
    }

    /// Samples per block.
    pub fn fft_size(&self) -> usize {
        self.queue.len()
    }

    /// Samples queued toward the next block.
    pub fn queued(&self) -> usize {
        self.index
    }
}

/// UI-side half of the analyzer.
pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    window: Box<[f32]>,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    output: Vec<f32>,
    decay: f32,
    mailbox: Arc<Mailbox>,
    reported_drops: u64,
}

impl SpectrumAnalyzer {
    /// Fold in a waiting block, if any, then decay the display buffer.
    ///
    /// Returns `true` when a new block was analysed.
    pub fn tick(&mut self) -> bool {
        let mailbox = &*self.mailbox;
        let fresh = mailbox.ready.load(Ordering::Acquire);

        if fresh {
            for ((value, slot), &w) in self
                .buffer
                .iter_mut()
                .zip(mailbox.block.iter())
                .zip(self.window.iter())
            {
                *value = Complex::new(f32::from_bits(slot.load(Ordering::Relaxed)) * w, 0.0);
            }
            mailbox.ready.store(false, Ordering::Release);

            self.fft.process_with_scratch(&mut self.buffer, &mut self.scratch);
            for (out, bin) in self.output.iter_mut().zip(self.buffer.iter()) {
                *out = out.max(bin.norm());
            }
        }

        let dropped = mailbox.dropped.load(Ordering::Relaxed);
        if dropped != self.reported_drops {
            tracing::trace!(
                dropped = dropped - self.reported_drops,
                total = dropped,
                "analyzer blocks dropped"
            );
            self.reported_drops = dropped;
        }

        for out in &mut self.output {
            *out *= self.decay;
        }
        fresh
    }

    /// Peak-held bin magnitudes, `fft_size / 2` of them.
    pub fn magnitudes(&self) -> &[f32] {
        &self.output
    }

    /// FFT length in samples.
    pub fn fft_size(&self) -> usize {
        self.buffer.len()
    }

    /// Blocks the producer discarded because the mailbox was still full.
    pub fn dropped_blocks(&self) -> u64 {
        self.mailbox.dropped.load(Ordering::Relaxed)
    }

    /// Per-tick decay factor.
    pub fn decay(&self) -> f32 {
        self.decay
    }

    /// Zero the display buffer.
    pub fn clear(&mut self) {
        self.output.fill(0.0);
    }

    /// Tick period for a refresh rate in Hz, limited to 1..=240 Hz.
    ///
    /// Non-finite rates fall back to [`DEFAULT_REFRESH_HZ`].
    pub fn refresh_interval(hz: f32) -> Duration {
        let hz = if hz.is_finite() {
            hz.clamp(1.0, 240.0)
        } else {
            DEFAULT_REFRESH_HZ
        };
        Duration::from_secs_f32(1.0 / hz)
    }
}

impl std::fmt::Debug for SpectrumAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpectrumAnalyzer")
            .field("fft_size", &self.fft_size())
            .field("decay", &self.decay)
            .field("dropped_blocks", &self.dropped_blocks())
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for SpectrumProducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpectrumProducer")
            .field("fft_size", &self.fft_size())
            .field("queued", &self.index)
            .finish_non_exhaustive()
    }
}

//! Shared CLI helpers used across multiple commands.

use std::path::Path;

use anyhow::Context;
use clap::Args;
use phasewarp_config::EngineConfig;
use phasewarp_synth::{Amplifier, ParameterStore, SynthVoice, Voice};

/// Parse an `id=value` parameter override for clap's `value_parser`.
pub fn parse_key_val(s: &str) -> Result<(String, f32), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid parameter format: '{}' (expected id=value)", s))?;
    let value = value
        .trim()
        .parse::<f32>()
        .map_err(|e| format!("Invalid value for '{}': {}", key, e))?;
    Ok((key.trim().to_string(), value))
}

/// Load the engine configuration, apply `--param` overrides and validate.
///
/// Without a path the built-in defaults are used.
pub fn load_config(path: Option<&Path>, overrides: &[(String, f32)]) -> anyhow::Result<EngineConfig> {
    let mut config = match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    for (id, value) in overrides {
        config.params.insert(id.clone(), *value);
    }
    config.validate().context("invalid engine configuration")?;

    tracing::info!(
        sample_rate = config.sample_rate,
        block_size = config.block_size,
        fft_size = 1usize << config.analyzer.fft_order,
        overrides = config.params.len(),
        "engine config"
    );
    Ok(config)
}

/// Note to render.
#[derive(Args, Debug, Clone)]
pub struct NoteArgs {
    /// MIDI note number
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u8).range(0..=127))]
    pub note: u8,

    /// Note velocity (0-1)
    #[arg(long, default_value_t = 1.0)]
    pub velocity: f32,

    /// Seconds the note is held before release
    #[arg(long, default_value_t = 1.0)]
    pub duration: f32,

    /// Maximum seconds rendered after release
    #[arg(long, default_value_t = 2.0)]
    pub tail: f32,

    /// Parameter override, repeatable (e.g. "filter_cutoff=800")
    #[arg(long, value_parser = parse_key_val, number_of_values = 1)]
    pub param: Vec<(String, f32)>,
}

impl NoteArgs {
    fn check(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.velocity),
            "velocity must be between 0 and 1, got {}",
            self.velocity
        );
        anyhow::ensure!(
            self.duration.is_finite() && self.duration > 0.0,
            "duration must be positive, got {}",
            self.duration
        );
        anyhow::ensure!(
            self.tail.is_finite() && self.tail >= 0.0,
            "tail must not be negative, got {}",
            self.tail
        );
        Ok(())
    }
}

/// What [`render_note`] produced.
#[derive(Debug, Clone, Copy)]
pub struct RenderStats {
    /// Samples rendered while the note was held.
    pub held: usize,
    /// Samples rendered after release.
    pub tail: usize,
    /// Whether the release finished within the tail limit.
    pub finished: bool,
    /// Largest absolute sample.
    pub peak: f32,
}

impl RenderStats {
    /// Total samples rendered.
    pub fn samples(&self) -> usize {
        self.held + self.tail
    }
}

/// Render one note through a fresh voice and the output amplifier, passing
/// each finished block to `sink`.
///
/// The note is held for `note.duration` seconds, then released with a
/// tail-off; rendering stops when the voice finishes or the tail limit is
/// reached.
pub fn render_note(
    config: &EngineConfig,
    store: &ParameterStore,
    note: &NoteArgs,
    mut sink: impl FnMut(&[f32]),
) -> anyhow::Result<RenderStats> {
    note.check()?;

    let sample_rate = config.sample_rate;
    let mut voice = Voice::new(store, sample_rate).context("building voice")?;
    let mut amp = Amplifier::new(store).context("building amplifier")?;

    let hold = (note.duration * sample_rate).round() as usize;
    let tail_limit = (note.tail * sample_rate).round() as usize;
    let mut buffer = vec![0.0f32; config.block_size];
    let mut peak = 0.0f32;

    let mut render = |voice: &mut Voice, len: usize| {
        let block = &mut buffer[..len];
        voice.render_next_block(block, 0, len);
        amp.process_block(block);
        peak = block.iter().fold(peak, |m, s| m.max(s.abs()));
        sink(block);
    };

    voice.start_note(note.note, note.velocity);
    let mut held = 0;
    while held < hold {
        let len = config.block_size.min(hold - held);
        render(&mut voice, len);
        held += len;
    }

    voice.stop_note(note.velocity, true);
    let mut tail = 0;
    while !voice.is_finished() && tail < tail_limit {
        let len = config.block_size.min(tail_limit - tail);
        render(&mut voice, len);
        tail += len;
    }

    Ok(RenderStats {
        held,
        tail,
        finished: voice.is_finished(),
        peak,
    })
}

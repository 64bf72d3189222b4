//! Offline note rendering to WAV.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use hound::{SampleFormat, WavSpec, WavWriter};
use indicatif::{ProgressBar, ProgressStyle};
use phasewarp_core::gain_to_db;

use super::common::{NoteArgs, load_config, render_note};

#[derive(Args)]
pub struct RenderArgs {
    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    #[command(flatten)]
    note: NoteArgs,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(config_path: Option<&Path>, args: RenderArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        matches!(args.bit_depth, 16 | 24 | 32),
        "bit depth must be 16, 24 or 32, got {}",
        args.bit_depth
    );

    let config = load_config(config_path, &args.note.param)?;
    let store = config.build_store()?;

    let spec = WavSpec {
        channels: 1,
        sample_rate: config.sample_rate.round() as u32,
        bits_per_sample: args.bit_depth,
        sample_format: if args.bit_depth == 32 {
            SampleFormat::Float
        } else {
            SampleFormat::Int
        },
    };
    let mut writer = WavWriter::create(&args.output, spec)
        .with_context(|| format!("creating {}", args.output.display()))?;

    println!(
        "Rendering note {} (velocity {:.2}) for {:.2}s...",
        args.note.note, args.note.velocity, args.note.duration
    );

    let expected = ((args.note.duration + args.note.tail) * config.sample_rate) as u64;
    let pb = ProgressBar::new(expected);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let max_val = (1i32 << (args.bit_depth - 1)) as f32;
    let mut write_result = Ok(());
    let stats = render_note(&config, &store, &args.note, |block| {
        if write_result.is_err() {
            return;
        }
        write_result = write_block(&mut writer, block, args.bit_depth, max_val);
        pb.inc(block.len() as u64);
    })?;
    write_result.with_context(|| format!("writing {}", args.output.display()))?;
    writer
        .finalize()
        .with_context(|| format!("finalizing {}", args.output.display()))?;
    pb.finish_and_clear();

    let seconds = stats.samples() as f32 / config.sample_rate;
    tracing::info!(
        samples = stats.samples(),
        held = stats.held,
        tail = stats.tail,
        finished = stats.finished,
        peak_db = gain_to_db(stats.peak),
        "render complete"
    );
    if !stats.finished {
        tracing::warn!("release did not finish within the tail limit; output is truncated");
    }

    println!(
        "Wrote {} samples ({:.2}s, peak {:.1} dB) to {}",
        stats.samples(),
        seconds,
        gain_to_db(stats.peak),
        args.output.display()
    );
    Ok(())
}

fn write_block<W>(
    writer: &mut WavWriter<W>,
    block: &[f32],
    bit_depth: u16,
    max_val: f32,
) -> Result<(), hound::Error>
where
    W: std::io::Write + std::io::Seek,
{
    if bit_depth == 32 {
        for &sample in block {
            writer.write_sample(sample)?;
        }
    } else {
        for &sample in block {
            let int_sample = (sample * max_val).clamp(-max_val, max_val - 1.0) as i32;
            writer.write_sample(int_sample)?;
        }
    }
    Ok(())
}

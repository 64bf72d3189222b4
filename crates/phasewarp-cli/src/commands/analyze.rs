//! Spectrum analysis of a rendered note.
//!
//! The note is rendered on the calling thread, paced like an audio
//! callback, and pushed into the analyzer producer. A second thread ticks
//! the analyzer at the configured refresh rate, the way a UI timer would.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Args;
use phasewarp_analysis::{SpectrumAnalyzer, display_levels, gain_to_decibels, spectrum_analyzer};
use phasewarp_core::midi_to_freq;
use serde::Serialize;

use super::common::{NoteArgs, load_config, render_note};

#[derive(Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    note: NoteArgs,

    /// Window function (rectangular, hann, hamming, blackman-harris);
    /// overrides the config file
    #[arg(long)]
    window: Option<String>,

    /// Number of spectral peaks to report
    #[arg(long, default_value = "8")]
    peaks: usize,

    /// Render as fast as possible instead of in real time
    #[arg(long)]
    no_pacing: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct Peak {
    bin: usize,
    frequency_hz: f32,
    magnitude: f32,
    level_db: f32,
    display_level: f32,
}

#[derive(Debug, Serialize)]
struct Report {
    note: u8,
    fundamental_hz: f32,
    sample_rate: f32,
    fft_size: usize,
    window: &'static str,
    ticks: u64,
    blocks_analyzed: u64,
    dropped_blocks: u64,
    peaks: Vec<Peak>,
}

struct ConsumerResult {
    magnitudes: Vec<f32>,
    ticks: u64,
    analyzed: u64,
    dropped: u64,
}

fn consume(mut analyzer: SpectrumAnalyzer, interval: Duration, done: &AtomicBool) -> ConsumerResult {
    let mut ticks = 0;
    let mut analyzed = 0;
    let mut next = Instant::now();

    while !done.load(Ordering::Acquire) {
        if analyzer.tick() {
            analyzed += 1;
        }
        ticks += 1;
        next += interval;
        if let Some(wait) = next.checked_duration_since(Instant::now()) {
            thread::sleep(wait);
        }
    }
    // Pick up the last block handed off before the producer finished
    if analyzer.tick() {
        analyzed += 1;
    }
    ticks += 1;

    ConsumerResult {
        magnitudes: analyzer.magnitudes().to_vec(),
        ticks,
        analyzed,
        dropped: analyzer.dropped_blocks(),
    }
}

/// Local maxima of `magnitudes`, loudest first.
fn find_peaks(magnitudes: &[f32], count: usize) -> Vec<usize> {
    let mut peaks: Vec<usize> = (1..magnitudes.len().saturating_sub(1))
        .filter(|&i| {
            magnitudes[i] > 0.0
                && magnitudes[i] >= magnitudes[i - 1]
                && magnitudes[i] > magnitudes[i + 1]
        })
        .collect();
    peaks.sort_by(|&a, &b| magnitudes[b].total_cmp(&magnitudes[a]));
    peaks.truncate(count);
    peaks
}

pub fn run(config_path: Option<&Path>, args: AnalyzeArgs) -> anyhow::Result<()> {
    let mut config = load_config(config_path, &args.note.param)?;
    if let Some(window) = args.window.as_deref() {
        config.analyzer.window = window.to_string();
        config.validate()?;
    }
    let store = config.build_store()?;
    let sample_rate = config.sample_rate;

    let settings = config.analyzer.settings();
    let (mut producer, analyzer) = spectrum_analyzer(settings);
    let fft_size = analyzer.fft_size();
    let interval = config.analyzer.refresh_interval();

    let done = Arc::new(AtomicBool::new(false));
    let consumer = {
        let done = Arc::clone(&done);
        thread::Builder::new()
            .name("analyzer".into())
            .spawn(move || consume(analyzer, interval, &done))
            .context("spawning analyzer thread")?
    };

    let block_time = Duration::from_secs_f32(config.block_size as f32 / sample_rate);
    let start = Instant::now();
    let mut rendered = Duration::ZERO;
    let render = render_note(&config, &store, &args.note, |block| {
        producer.push_buffer(block);
        if !args.no_pacing {
            rendered += block_time.mul_f32(block.len() as f32 / config.block_size as f32);
            if let Some(wait) = rendered.checked_sub(start.elapsed()) {
                thread::sleep(wait);
            }
        }
    });

    done.store(true, Ordering::Release);
    let result = consumer
        .join()
        .map_err(|_| anyhow::anyhow!("analyzer thread panicked"))?;
    let stats = render?;

    tracing::info!(
        samples = stats.samples(),
        ticks = result.ticks,
        analyzed = result.analyzed,
        dropped = result.dropped,
        "analysis complete"
    );

    let display = display_levels(&result.magnitudes, fft_size);
    let reference = (fft_size as f32).max(result.magnitudes.iter().copied().fold(0.0, f32::max));
    let peaks = find_peaks(&result.magnitudes, args.peaks)
        .into_iter()
        .map(|bin| Peak {
            bin,
            frequency_hz: bin as f32 * sample_rate / fft_size as f32,
            magnitude: result.magnitudes[bin],
            level_db: gain_to_decibels(result.magnitudes[bin] / reference),
            display_level: display[bin].level,
        })
        .collect();

    let report = Report {
        note: args.note.note,
        fundamental_hz: midi_to_freq(f32::from(args.note.note)),
        sample_rate,
        fft_size,
        window: settings.window.name(),
        ticks: result.ticks,
        blocks_analyzed: result.analyzed,
        dropped_blocks: result.dropped,
        peaks,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &Report) {
    println!(
        "Note {} ({:.1} Hz), {}-point {} FFT at {} Hz",
        report.note, report.fundamental_hz, report.fft_size, report.window, report.sample_rate
    );
    println!(
        "  {} ticks, {} blocks analyzed, {} dropped",
        report.ticks, report.blocks_analyzed, report.dropped_blocks
    );
    println!();
    println!("  {:>6}  {:>10}  {:>9}", "Bin", "Hz", "dB");
    println!("  {:>6}  {:>10}  {:>9}", "---", "--", "--");
    for peak in &report.peaks {
        println!(
            "  {:>6}  {:>10.1}  {:>9.1}",
            peak.bin, peak.frequency_hz, peak.level_db
        );
    }
}

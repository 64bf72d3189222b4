//! Integration tests for phasewarp-config.
//!
//! File round trips through a temporary directory and configurations
//! driving the synth and analyzer.

use phasewarp_analysis::{Window, spectrum_analyzer};
use phasewarp_config::{ConfigError, EngineConfig, ValidationError};
use phasewarp_synth::{SynthVoice, Voice, ids};
use tempfile::TempDir;

const EXAMPLE: &str = r#"
sample_rate = 44100.0
block_size = 256

[analyzer]
fft_order = 10
refresh_hz = 60.0
decay = 0.8
window = "blackman-harris"

[params]
filter_cutoff = 1500.0
osc_mix = 0.0
phasor_shape = 1.0
"#;

#[test]
fn test_save_and_load_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("engine.toml");

    let config = EngineConfig::from_toml_str(EXAMPLE).unwrap();
    config.save(&path).unwrap();
    assert!(path.exists());

    let loaded = EngineConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = EngineConfig::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn test_load_malformed_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "sample_rate = [").unwrap();
    assert!(matches!(
        EngineConfig::load(&path),
        Err(ConfigError::TomlParse(_))
    ));
}

#[test]
fn test_invalid_file_fails_validation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("engine.toml");
    std::fs::write(&path, "block_size = 100000\n[params]\nnot_a_param = 1.0\n").unwrap();

    let config = EngineConfig::load(&path).unwrap();
    match config.validate() {
        Err(ConfigError::Validation(ValidationError::Multiple(errors))) => {
            assert_eq!(errors.len(), 2);
            assert!(errors.contains(&ValidationError::UnknownParameter(
                "not_a_param".to_string()
            )));
        }
        other => panic!("expected two validation errors, got {other:?}"),
    }
}

#[test]
fn test_config_drives_voice_and_analyzer() {
    let config = EngineConfig::from_toml_str(EXAMPLE).unwrap();
    config.validate().unwrap();

    let store = config.build_store().unwrap();
    assert_eq!(store.get(ids::FILTER_CUTOFF), Some(1500.0));
    assert_eq!(store.get(ids::PHASOR_SHAPE), Some(1.0));

    let mut voice = Voice::new(&store, config.sample_rate).unwrap();
    let settings = config.analyzer.settings();
    assert_eq!(settings.window, Window::BlackmanHarris);
    let (mut producer, mut analyzer) = spectrum_analyzer(settings);
    assert_eq!(analyzer.fft_size(), 1024);

    voice.start_note(60, 1.0);
    let mut block = vec![0.0f32; config.block_size];
    for _ in 0..8 {
        voice.render_next_block(&mut block, 0, config.block_size);
        assert!(block.iter().all(|s| s.is_finite()));
        producer.push_buffer(&block);
    }
    assert!(analyzer.tick());
    assert!(analyzer.magnitudes().iter().any(|&m| m > 0.0));
    assert!(analyzer.dropped_blocks() > 0);
}

//! Parameter layout for the synth voice.
//!
//! Every control the voice reads is declared here with its range and
//! default. [`create_store`] builds a [`ParameterStore`] holding all of
//! them; components resolve their handles from it by the ids in [`ids`].
//!
//! Envelope times are in seconds. Envelope sustain is a level control in
//! 6 dB steps per doubling: the envelope converts it with `2^(sustain / 6)`,
//! so 0 is full scale and -60 is roughly -60 dB.

use phasewarp_core::{ParamDescriptor, ParamError, ParameterStore};

/// Parameter identifiers.
pub mod ids {
    /// Phasor shape selector (0 = sawtooth, 1 and 2 = square).
    pub const PHASOR_SHAPE: &str = "phasor_shape";
    /// How strongly the phase envelope warps the phase.
    pub const PHASOR_EG_INTENSITY: &str = "phasor_eg_intensity";
    /// How strongly the LFO warps the phase.
    pub const PHASOR_LFO_INTENSITY: &str = "phasor_lfo_intensity";

    /// Primary oscillator range in octaves.
    pub const OSC1_RANGE: &str = "osc1_range";
    /// Primary oscillator coarse tune in semitones.
    pub const OSC1_TUNE: &str = "osc1_tune";
    /// Primary oscillator fine tune in cents.
    pub const OSC1_FINE: &str = "osc1_fine";
    /// Primary oscillator waveshaper depth.
    pub const OSC1_MOD_DEPTH: &str = "osc1_mod_depth";

    /// Secondary oscillator range in octaves.
    pub const OSC2_RANGE: &str = "osc2_range";
    /// Secondary oscillator coarse tune in semitones.
    pub const OSC2_TUNE: &str = "osc2_tune";
    /// Secondary oscillator fine tune in cents.
    pub const OSC2_FINE: &str = "osc2_fine";
    /// Secondary oscillator waveshaper depth.
    pub const OSC2_MOD_DEPTH: &str = "osc2_mod_depth";

    /// Hard sync of the secondary oscillator to the primary (0 = off, 1 = on).
    pub const OSC_SYNC: &str = "osc_sync";
    /// Crossfade from primary (0) to secondary (1).
    pub const OSC_MIX: &str = "osc_mix";

    /// Amplitude envelope attack.
    pub const AMP_EG_ATTACK: &str = "amp_eg_attack";
    /// Amplitude envelope decay.
    pub const AMP_EG_DECAY: &str = "amp_eg_decay";
    /// Amplitude envelope sustain.
    pub const AMP_EG_SUSTAIN: &str = "amp_eg_sustain";
    /// Amplitude envelope release.
    pub const AMP_EG_RELEASE: &str = "amp_eg_release";

    /// Phase envelope attack.
    pub const PHASE_EG_ATTACK: &str = "phase_eg_attack";
    /// Phase envelope decay.
    pub const PHASE_EG_DECAY: &str = "phase_eg_decay";
    /// Phase envelope sustain.
    pub const PHASE_EG_SUSTAIN: &str = "phase_eg_sustain";
    /// Phase envelope release.
    pub const PHASE_EG_RELEASE: &str = "phase_eg_release";

    /// Filter envelope attack.
    pub const FILTER_EG_ATTACK: &str = "filter_eg_attack";
    /// Filter envelope decay.
    pub const FILTER_EG_DECAY: &str = "filter_eg_decay";
    /// Filter envelope sustain.
    pub const FILTER_EG_SUSTAIN: &str = "filter_eg_sustain";
    /// Filter envelope release.
    pub const FILTER_EG_RELEASE: &str = "filter_eg_release";

    /// Mod envelope attack.
    pub const MOD_EG_ATTACK: &str = "mod_eg_attack";
    /// Mod envelope decay.
    pub const MOD_EG_DECAY: &str = "mod_eg_decay";
    /// Mod envelope sustain.
    pub const MOD_EG_SUSTAIN: &str = "mod_eg_sustain";
    /// Mod envelope release.
    pub const MOD_EG_RELEASE: &str = "mod_eg_release";

    /// Base filter cutoff in Hz.
    pub const FILTER_CUTOFF: &str = "filter_cutoff";
    /// Filter resonance (Q).
    pub const FILTER_RESONANCE: &str = "filter_resonance";
    /// Bipolar amount the filter envelope moves the cutoff.
    pub const FILTER_EG_INTENSITY: &str = "filter_eg_intensity";

    /// LFO rate in Hz.
    pub const LFO_RATE: &str = "lfo_rate";
    /// LFO output depth.
    pub const LFO_DEPTH: &str = "lfo_depth";
    /// LFO waveform (0 = sine, 1 = triangle, 2 = saw, 3 = square).
    pub const LFO_SHAPE: &str = "lfo_shape";

    /// Output gain in dB applied after the voice mix.
    pub const MASTER_GAIN: &str = "master_gain";
}

const fn envelope(
    attack: &'static str,
    decay: &'static str,
    sustain: &'static str,
    release: &'static str,
    names: [&'static str; 4],
    defaults: [f32; 4],
) -> [ParamDescriptor; 4] {
    [
        ParamDescriptor::new(attack, names[0], 0.0, 10.0, defaults[0]),
        ParamDescriptor::new(decay, names[1], 0.0, 10.0, defaults[1]),
        ParamDescriptor::new(sustain, names[2], -60.0, 0.0, defaults[2]),
        ParamDescriptor::new(release, names[3], 0.0, 10.0, defaults[3]),
    ]
}

const AMP_EG: [ParamDescriptor; 4] = envelope(
    ids::AMP_EG_ATTACK,
    ids::AMP_EG_DECAY,
    ids::AMP_EG_SUSTAIN,
    ids::AMP_EG_RELEASE,
    ["Amp Attack", "Amp Decay", "Amp Sustain", "Amp Release"],
    [0.005, 0.2, -6.0, 0.3],
);

const PHASE_EG: [ParamDescriptor; 4] = envelope(
    ids::PHASE_EG_ATTACK,
    ids::PHASE_EG_DECAY,
    ids::PHASE_EG_SUSTAIN,
    ids::PHASE_EG_RELEASE,
    ["Phase Attack", "Phase Decay", "Phase Sustain", "Phase Release"],
    [0.01, 0.5, -12.0, 0.3],
);

const FILTER_EG: [ParamDescriptor; 4] = envelope(
    ids::FILTER_EG_ATTACK,
    ids::FILTER_EG_DECAY,
    ids::FILTER_EG_SUSTAIN,
    ids::FILTER_EG_RELEASE,
    ["Filter Attack", "Filter Decay", "Filter Sustain", "Filter Release"],
    [0.01, 0.4, -18.0, 0.3],
);

const MOD_EG: [ParamDescriptor; 4] = envelope(
    ids::MOD_EG_ATTACK,
    ids::MOD_EG_DECAY,
    ids::MOD_EG_SUSTAIN,
    ids::MOD_EG_RELEASE,
    ["Mod Attack", "Mod Decay", "Mod Sustain", "Mod Release"],
    [0.01, 0.3, -12.0, 0.3],
);

const CONTROLS: [ParamDescriptor; 20] = [
    ParamDescriptor::stepped(ids::PHASOR_SHAPE, "Phasor Shape", 0.0, 2.0, 0.0),
    ParamDescriptor::new(ids::PHASOR_EG_INTENSITY, "Phasor EG Intensity", 0.0, 1.0, 0.5),
    ParamDescriptor::new(ids::PHASOR_LFO_INTENSITY, "Phasor LFO Intensity", 0.0, 1.0, 0.0),
    ParamDescriptor::stepped(ids::OSC1_RANGE, "Osc 1 Range", -2.0, 2.0, 0.0),
    ParamDescriptor::stepped(ids::OSC1_TUNE, "Osc 1 Tune", -12.0, 12.0, 0.0),
    ParamDescriptor::new(ids::OSC1_FINE, "Osc 1 Fine", -100.0, 100.0, 0.0),
    ParamDescriptor::new(ids::OSC1_MOD_DEPTH, "Osc 1 Mod Depth", 0.0, 1.0, 0.0),
    ParamDescriptor::stepped(ids::OSC2_RANGE, "Osc 2 Range", -2.0, 2.0, 0.0),
    ParamDescriptor::stepped(ids::OSC2_TUNE, "Osc 2 Tune", -12.0, 12.0, 0.0),
    ParamDescriptor::new(ids::OSC2_FINE, "Osc 2 Fine", -100.0, 100.0, 7.0),
    ParamDescriptor::new(ids::OSC2_MOD_DEPTH, "Osc 2 Mod Depth", 0.0, 1.0, 0.0),
    ParamDescriptor::stepped(ids::OSC_SYNC, "Osc Sync", 0.0, 1.0, 0.0),
    ParamDescriptor::new(ids::OSC_MIX, "Osc Mix", 0.0, 1.0, 0.5),
    ParamDescriptor::new(ids::FILTER_CUTOFF, "Filter Cutoff", 20.0, 20000.0, 2000.0),
    ParamDescriptor::new(ids::FILTER_RESONANCE, "Filter Resonance", 0.5, 10.0, 0.707),
    ParamDescriptor::new(ids::FILTER_EG_INTENSITY, "Filter EG Intensity", -1.0, 1.0, 0.0),
    ParamDescriptor::new(ids::LFO_RATE, "LFO Rate", 0.01, 20.0, 1.0),
    ParamDescriptor::new(ids::LFO_DEPTH, "LFO Depth", 0.0, 1.0, 1.0),
    ParamDescriptor::stepped(ids::LFO_SHAPE, "LFO Shape", 0.0, 3.0, 0.0),
    ParamDescriptor::new(ids::MASTER_GAIN, "Master Gain", -60.0, 6.0, 0.0),
];

/// Every parameter the voice and amplifier read, in display order.
pub fn parameter_layout() -> impl Iterator<Item = ParamDescriptor> {
    CONTROLS
        .into_iter()
        .chain(AMP_EG)
        .chain(PHASE_EG)
        .chain(FILTER_EG)
        .chain(MOD_EG)
}

/// Build a store holding the full [`parameter_layout`] at default values.
pub fn create_store() -> Result<ParameterStore, ParamError> {
    ParameterStore::with_params(parameter_layout())
}

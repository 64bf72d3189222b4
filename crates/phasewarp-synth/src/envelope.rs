//! ADSR envelopes.
//!
//! [`AdsrEnvelope`] is a plain linear ADSR: every stage moves at a constant
//! rate so that it covers its distance in exactly the configured time.
//! [`EnvelopeGenerator`] wraps one with the parameter plumbing the voice
//! needs: it reads one of four disjoint parameter quartets (chosen by
//! [`EnvelopeRole`]), smooths sustain-control changes, and smooths its
//! output with a two-sample average so parameter edits never click.

use phasewarp_core::{ParamError, ParamHandle, ParameterStore};

use crate::params::ids;

/// ADSR envelope states
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnvelopeState {
    /// Inactive, output is zero.
    #[default]
    Idle,
    /// Rising toward full scale.
    Attack,
    /// Falling from full scale toward the sustain level.
    Decay,
    /// Holding the sustain level while the note is held.
    Sustain,
    /// Falling to zero after note off.
    Release,
}

/// Stage times and sustain level for an [`AdsrEnvelope`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdsrParameters {
    /// Attack time in seconds.
    pub attack: f32,
    /// Decay time in seconds.
    pub decay: f32,
    /// Sustain level as linear gain, `[0, 1]`.
    pub sustain: f32,
    /// Release time in seconds.
    pub release: f32,
}

impl Default for AdsrParameters {
    fn default() -> Self {
        Self {
            attack: 0.1,
            decay: 0.1,
            sustain: 1.0,
            release: 0.1,
        }
    }
}

/// Linear ADSR envelope.
///
/// Stages with zero time are skipped: a zero attack starts in Decay at full
/// scale, a zero release goes straight to Idle. Retriggering keeps the
/// current level, so a note restarted mid-release ramps up from where it is.
///
/// # Example
///
/// ```rust
/// use phasewarp_synth::{AdsrEnvelope, AdsrParameters, EnvelopeState};
///
/// let mut env = AdsrEnvelope::new(48000.0);
/// env.set_parameters(AdsrParameters {
///     attack: 0.01,
///     decay: 0.1,
///     sustain: 0.7,
///     release: 0.2,
/// });
///
/// env.note_on();
/// for _ in 0..480 {
///     env.next_sample();
/// }
/// assert_eq!(env.state(), EnvelopeState::Decay);
///
/// env.note_off();
/// assert_eq!(env.state(), EnvelopeState::Release);
/// ```
#[derive(Debug, Clone)]
pub struct AdsrEnvelope {
    state: EnvelopeState,
    level: f32,
    sample_rate: f32,
    parameters: AdsrParameters,

    // Per-sample increments; zero means the stage is skipped.
    attack_rate: f32,
    decay_rate: f32,
    release_rate: f32,
}

impl Default for AdsrEnvelope {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl AdsrEnvelope {
    /// Create an idle envelope with [`AdsrParameters::default`].
    pub fn new(sample_rate: f32) -> Self {
        let mut env = Self {
            state: EnvelopeState::Idle,
            level: 0.0,
            sample_rate: if sample_rate > 0.0 { sample_rate } else { 48000.0 },
            parameters: AdsrParameters::default(),
            attack_rate: 0.0,
            decay_rate: 0.0,
            release_rate: 0.0,
        };
        env.recalculate_rates();
        env
    }

    /// Replace stage times and sustain level.
    ///
    /// Negative or non-finite times are treated as zero and the sustain is
    /// clamped to `[0, 1]`. A release already in progress keeps its rate.
    pub fn set_parameters(&mut self, parameters: AdsrParameters) {
        let time = |t: f32| if t.is_finite() { t.max(0.0) } else { 0.0 };
        self.parameters = AdsrParameters {
            attack: time(parameters.attack),
            decay: time(parameters.decay),
            sustain: if parameters.sustain.is_nan() {
                0.0
            } else {
                parameters.sustain.clamp(0.0, 1.0)
            },
            release: time(parameters.release),
        };
        self.recalculate_rates();
    }

    /// Current parameters.
    pub fn parameters(&self) -> AdsrParameters {
        self.parameters
    }

    /// Set sample rate. Non-positive rates are ignored.
    ///
    /// A release in progress keeps its remaining time in seconds.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if sample_rate > 0.0 && sample_rate.is_finite() && sample_rate != self.sample_rate {
            if self.state == EnvelopeState::Release {
                self.release_rate *= self.sample_rate / sample_rate;
            }
            self.sample_rate = sample_rate;
            self.recalculate_rates();
        }
    }

    /// Start (or restart) the envelope from its current level.
    pub fn note_on(&mut self) {
        if self.attack_rate > 0.0 {
            self.state = EnvelopeState::Attack;
        } else if self.decay_rate > 0.0 {
            self.level = 1.0;
            self.state = EnvelopeState::Decay;
        } else {
            self.level = self.parameters.sustain;
            self.state = EnvelopeState::Sustain;
        }
    }

    /// Enter Release from any active state.
    ///
    /// The release rate is fixed here from the current level, so the
    /// envelope reaches zero in exactly the release time wherever it was.
    pub fn note_off(&mut self) {
        if self.state == EnvelopeState::Idle {
            return;
        }
        if self.parameters.release > 0.0 {
            self.release_rate = self.level / (self.parameters.release * self.sample_rate);
            self.state = EnvelopeState::Release;
        } else {
            self.reset();
        }
    }

    /// Force Idle at level zero.
    pub fn reset(&mut self) {
        self.state = EnvelopeState::Idle;
        self.level = 0.0;
    }

    /// Current state.
    pub fn state(&self) -> EnvelopeState {
        self.state
    }

    /// Current level without advancing.
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Whether the envelope is outside Idle.
    pub fn is_active(&self) -> bool {
        self.state != EnvelopeState::Idle
    }

    /// Advance by one sample and return the new level.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        match self.state {
            EnvelopeState::Idle => return 0.0,

            EnvelopeState::Attack => {
                self.level += self.attack_rate;
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.advance_stage();
                }
            }

            EnvelopeState::Decay => {
                self.level -= self.decay_rate;
                if self.level <= self.parameters.sustain {
                    self.level = self.parameters.sustain;
                    self.advance_stage();
                }
            }

            EnvelopeState::Sustain => {
                self.level = self.parameters.sustain;
            }

            EnvelopeState::Release => {
                self.level -= self.release_rate;
                if self.level <= 0.0 {
                    self.advance_stage();
                }
            }
        }

        self.level
    }

    fn advance_stage(&mut self) {
        self.state = match self.state {
            EnvelopeState::Attack if self.decay_rate > 0.0 => EnvelopeState::Decay,
            EnvelopeState::Attack | EnvelopeState::Decay => EnvelopeState::Sustain,
            EnvelopeState::Release | EnvelopeState::Idle => {
                self.level = 0.0;
                EnvelopeState::Idle
            }
            EnvelopeState::Sustain => EnvelopeState::Sustain,
        };
    }

    fn rate(distance: f32, time: f32, sample_rate: f32) -> f32 {
        if time > 0.0 {
            distance / (time * sample_rate)
        } else {
            0.0
        }
    }

    fn recalculate_rates(&mut self) {
        let p = self.parameters;
        self.attack_rate = Self::rate(1.0, p.attack, self.sample_rate);
        self.decay_rate = Self::rate(1.0 - p.sustain, p.decay, self.sample_rate);
        if self.state != EnvelopeState::Release {
            self.release_rate = Self::rate(p.sustain, p.release, self.sample_rate);
        }

        let skip = match self.state {
            EnvelopeState::Attack => self.attack_rate <= 0.0,
            EnvelopeState::Decay => self.decay_rate <= 0.0 || self.level <= p.sustain,
            EnvelopeState::Release => p.release <= 0.0,
            EnvelopeState::Idle | EnvelopeState::Sustain => false,
        };
        if skip {
            self.advance_stage();
        }
    }
}

/// Which modulation target an [`EnvelopeGenerator`] serves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnvelopeRole {
    /// Output amplitude; its Idle state ends the voice.
    Amp,
    /// Phasor warp amount.
    Phase,
    /// Filter cutoff offset.
    Filter,
    /// Waveshaper drive.
    Mod,
}

impl EnvelopeRole {
    /// All roles, in voice order.
    pub const ALL: [Self; 4] = [Self::Amp, Self::Phase, Self::Filter, Self::Mod];

    /// `[attack, decay, sustain, release]` parameter ids for this role.
    pub fn param_ids(self) -> [&'static str; 4] {
        match self {
            Self::Amp => [
                ids::AMP_EG_ATTACK,
                ids::AMP_EG_DECAY,
                ids::AMP_EG_SUSTAIN,
                ids::AMP_EG_RELEASE,
            ],
            Self::Phase => [
                ids::PHASE_EG_ATTACK,
                ids::PHASE_EG_DECAY,
                ids::PHASE_EG_SUSTAIN,
                ids::PHASE_EG_RELEASE,
            ],
            Self::Filter => [
                ids::FILTER_EG_ATTACK,
                ids::FILTER_EG_DECAY,
                ids::FILTER_EG_SUSTAIN,
                ids::FILTER_EG_RELEASE,
            ],
            Self::Mod => [
                ids::MOD_EG_ATTACK,
                ids::MOD_EG_DECAY,
                ids::MOD_EG_SUSTAIN,
                ids::MOD_EG_RELEASE,
            ],
        }
    }
}

/// Convert a sustain control value to linear gain: `2^(sustain / 6)`,
/// limited to `[0, 1]`.
#[inline]
pub fn sustain_gain(sustain: f32) -> f32 {
    libm::exp2f(sustain / 6.0).clamp(0.0, 1.0)
}

/// Parameter-driven ADSR for one [`EnvelopeRole`].
///
/// Call [`update`](Self::update) once per block to pick up parameter
/// changes, then [`evaluate`](Self::evaluate) once per sample.
///
/// Sustain changes are smoothed on the control side: on each update where
/// the raw control differs from the remembered one, the two are averaged and
/// the average becomes both the new remembered value and the applied level.
/// The output is smoothed again on the audio side by averaging each sample
/// with the previous output.
#[derive(Debug, Clone)]
pub struct EnvelopeGenerator {
    role: EnvelopeRole,
    envelope: AdsrEnvelope,
    attack: ParamHandle,
    decay: ParamHandle,
    sustain: ParamHandle,
    release: ParamHandle,
    previous_output: f32,
    previous_sustain: f32,
    sustain_gain: f32,
}

impl EnvelopeGenerator {
    /// Resolve the role's parameters and load their current values.
    pub fn new(store: &ParameterStore, role: EnvelopeRole) -> Result<Self, ParamError> {
        let [attack, decay, sustain, release] = role.param_ids();
        let sustain = store.handle(sustain)?;
        let previous_sustain = sustain.get();

        let mut generator = Self {
            role,
            envelope: AdsrEnvelope::default(),
            attack: store.handle(attack)?,
            decay: store.handle(decay)?,
            sustain,
            release: store.handle(release)?,
            previous_output: 0.0,
            previous_sustain,
            sustain_gain: sustain_gain(previous_sustain),
        };
        generator.apply_parameters();
        Ok(generator)
    }

    /// Re-read the role's parameters and propagate the sample rate.
    pub fn update(&mut self, sample_rate: f32) {
        let raw = self.sustain.get();
        if raw != self.previous_sustain {
            let smoothed = (self.previous_sustain + raw) / 2.0;
            self.previous_sustain = smoothed;
            self.sustain_gain = sustain_gain(smoothed);
        }
        self.envelope.set_sample_rate(sample_rate);
        self.apply_parameters();
    }

    fn apply_parameters(&mut self) {
        self.envelope.set_parameters(AdsrParameters {
            attack: self.attack.get(),
            decay: self.decay.get(),
            sustain: self.sustain_gain,
            release: self.release.get(),
        });
    }

    /// Next smoothed envelope sample.
    #[inline]
    pub fn evaluate(&mut self) -> f32 {
        let out = (self.envelope.next_sample() + self.previous_output) / 2.0;
        self.previous_output = out;
        out
    }

    /// Trigger Attack.
    pub fn note_on(&mut self) {
        self.envelope.note_on();
    }

    /// Trigger Release.
    pub fn note_off(&mut self) {
        self.envelope.note_off();
    }

    /// Force Idle and clear the output smoothing.
    pub fn reset(&mut self) {
        self.envelope.reset();
        self.previous_output = 0.0;
    }

    /// State of the underlying ADSR.
    pub fn state(&self) -> EnvelopeState {
        self.envelope.state()
    }

    /// Whether the underlying ADSR is outside Idle.
    pub fn is_active(&self) -> bool {
        self.envelope.is_active()
    }

    /// Role fixed at construction.
    pub fn role(&self) -> EnvelopeRole {
        self.role
    }

    /// Sustain gain currently applied to the ADSR.
    pub fn sustain_level(&self) -> f32 {
        self.sustain_gain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::create_store;

    fn adsr(attack: f32, decay: f32, sustain: f32, release: f32) -> AdsrEnvelope {
        let mut env = AdsrEnvelope::new(1000.0);
        env.set_parameters(AdsrParameters {
            attack,
            decay,
            sustain,
            release,
        });
        env
    }

    #[test]
    fn test_envelope_idle_state() {
        let mut env = AdsrEnvelope::new(48000.0);
        assert_eq!(env.state(), EnvelopeState::Idle);
        for _ in 0..100 {
            assert_eq!(env.next_sample(), 0.0);
        }
    }

    #[test]
    fn test_attack_is_linear_and_exact() {
        let mut env = adsr(0.01, 0.01, 0.5, 0.01); // 10 samples each at 1 kHz
        env.note_on();
        for i in 1..10 {
            let v = env.next_sample();
            assert!((v - i as f32 / 10.0).abs() < 1e-5, "sample {i}: {v}");
            assert_eq!(env.state(), EnvelopeState::Attack);
        }
        // Rounding decides whether the tenth or eleventh sample hits the top.
        env.next_sample();
        env.next_sample();
        assert_eq!(env.state(), EnvelopeState::Decay);
        assert!(env.level() > 0.9 && env.level() <= 1.0);
    }

    #[test]
    fn test_decay_to_sustain() {
        let mut env = adsr(0.001, 0.01, 0.5, 0.01);
        env.note_on();
        for _ in 0..20 {
            env.next_sample();
        }
        assert_eq!(env.state(), EnvelopeState::Sustain);
        assert_eq!(env.level(), 0.5);
        assert_eq!(env.next_sample(), 0.5);
    }

    #[test]
    fn test_release_reaches_idle_in_release_time() {
        let mut env = adsr(0.001, 0.001, 0.8, 0.02);
        env.note_on();
        for _ in 0..10 {
            env.next_sample();
        }
        env.note_off();
        assert_eq!(env.state(), EnvelopeState::Release);

        for _ in 0..19 {
            env.next_sample();
        }
        assert_eq!(env.state(), EnvelopeState::Release);
        env.next_sample();
        env.next_sample();
        assert_eq!(env.state(), EnvelopeState::Idle);
        assert_eq!(env.level(), 0.0);
    }

    #[test]
    fn test_release_from_attack_uses_current_level() {
        let mut env = adsr(0.1, 0.1, 0.5, 0.01);
        env.note_on();
        for _ in 0..30 {
            env.next_sample();
        }
        let level = env.level();
        env.note_off();
        let first = env.next_sample();
        assert!((level - first - level / 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_zero_stages_are_skipped() {
        let mut env = adsr(0.0, 0.0, 0.6, 0.0);
        env.note_on();
        assert_eq!(env.state(), EnvelopeState::Sustain);
        assert_eq!(env.next_sample(), 0.6);
        env.note_off();
        assert_eq!(env.state(), EnvelopeState::Idle);

        let mut env = adsr(0.0, 0.01, 0.6, 0.0);
        env.note_on();
        assert_eq!(env.state(), EnvelopeState::Decay);
        assert_eq!(env.level(), 1.0);
    }

    #[test]
    fn test_retrigger_keeps_level() {
        let mut env = adsr(0.05, 0.05, 0.5, 0.1);
        env.note_on();
        for _ in 0..200 {
            env.next_sample();
        }
        env.note_off();
        for _ in 0..20 {
            env.next_sample();
        }
        let before = env.level();
        env.note_on();
        assert_eq!(env.state(), EnvelopeState::Attack);
        assert_eq!(env.level(), before);
    }

    #[test]
    fn test_note_off_when_idle_is_noop() {
        let mut env = adsr(0.01, 0.01, 0.5, 0.01);
        env.note_off();
        assert_eq!(env.state(), EnvelopeState::Idle);
    }

    #[test]
    fn test_parameter_update_keeps_release_rate() {
        let mut env = adsr(0.001, 0.001, 1.0, 0.01);
        env.note_on();
        for _ in 0..5 {
            env.next_sample();
        }
        env.note_off();
        let a = env.next_sample();
        env.set_parameters(AdsrParameters {
            attack: 0.001,
            decay: 0.001,
            sustain: 0.2,
            release: 0.01,
        });
        let b = env.next_sample();
        assert!(((1.0 - a) - (a - b)).abs() < 1e-6);
    }

    #[test]
    fn test_sample_rate_change_mid_release_keeps_release_time() {
        // 20 ms release at 1 kHz
        let mut env = adsr(0.0, 0.0, 1.0, 0.02);
        env.note_on();
        env.note_off();
        for _ in 0..10 {
            env.next_sample();
        }
        assert!((env.level() - 0.5).abs() < 1e-5);

        // The remaining 10 ms is 20 samples at 2 kHz
        env.set_sample_rate(2000.0);
        for _ in 0..19 {
            env.next_sample();
        }
        assert_eq!(env.state(), EnvelopeState::Release);
        env.next_sample();
        env.next_sample();
        assert_eq!(env.state(), EnvelopeState::Idle);
    }

    #[test]
    fn test_sustain_gain_conversion() {
        assert_eq!(sustain_gain(0.0), 1.0);
        assert!((sustain_gain(-6.0) - 0.5).abs() < 1e-6);
        assert!((sustain_gain(-12.0) - 0.25).abs() < 1e-6);
        assert_eq!(sustain_gain(12.0), 1.0);
    }

    #[test]
    fn test_roles_have_disjoint_ids() {
        let mut all: Vec<&str> = EnvelopeRole::ALL
            .iter()
            .flat_map(|r| r.param_ids())
            .collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 16);
    }

    #[test]
    fn test_generator_reads_its_role() {
        let store = create_store().unwrap();
        store.set(ids::FILTER_EG_SUSTAIN, -6.0).unwrap();
        store.set(ids::AMP_EG_SUSTAIN, 0.0).unwrap();
        let filter = EnvelopeGenerator::new(&store, EnvelopeRole::Filter).unwrap();
        let amp = EnvelopeGenerator::new(&store, EnvelopeRole::Amp).unwrap();
        assert_eq!(filter.role(), EnvelopeRole::Filter);
        assert!((filter.sustain_level() - 0.5).abs() < 1e-6);
        assert_eq!(amp.sustain_level(), 1.0);
    }

    #[test]
    fn test_sustain_control_smoothing() {
        let store = create_store().unwrap();
        store.set(ids::MOD_EG_SUSTAIN, 0.0).unwrap();
        let mut eg = EnvelopeGenerator::new(&store, EnvelopeRole::Mod).unwrap();

        store.set(ids::MOD_EG_SUSTAIN, -12.0).unwrap();
        eg.update(48000.0);
        // average of 0 and -12 dB-steps is -6 -> gain 0.5
        assert!((eg.sustain_level() - 0.5).abs() < 1e-6);
        eg.update(48000.0);
        // average of -6 and -12 is -9
        assert!((eg.sustain_level() - libm::exp2f(-1.5)).abs() < 1e-6);
        for _ in 0..40 {
            eg.update(48000.0);
        }
        assert!((eg.sustain_level() - 0.25).abs() < 1e-4);
    }

    #[test]
    fn test_evaluate_averages_with_previous() {
        let store = create_store().unwrap();
        store.set(ids::AMP_EG_ATTACK, 0.0).unwrap();
        store.set(ids::AMP_EG_DECAY, 0.0).unwrap();
        store.set(ids::AMP_EG_SUSTAIN, 0.0).unwrap();
        let mut eg = EnvelopeGenerator::new(&store, EnvelopeRole::Amp).unwrap();
        eg.update(48000.0);
        eg.note_on();
        assert_eq!(eg.evaluate(), 0.5);
        assert_eq!(eg.evaluate(), 0.75);
        assert_eq!(eg.evaluate(), 0.875);
    }

    #[test]
    fn test_reset_clears_smoothing() {
        let store = create_store().unwrap();
        let mut eg = EnvelopeGenerator::new(&store, EnvelopeRole::Amp).unwrap();
        eg.update(48000.0);
        eg.note_on();
        for _ in 0..1000 {
            eg.evaluate();
        }
        eg.reset();
        assert_eq!(eg.state(), EnvelopeState::Idle);
        assert_eq!(eg.evaluate(), 0.0);
    }
}

//! Envelope-modulated resonant filter.
//!
//! Wraps the core [`StateVariableFilter`]. Resonance is a control-rate
//! parameter applied in [`ModulatedFilter::update`]; cutoff is recomputed
//! from the base control and the filter envelope on every sample in
//! [`ModulatedFilter::evaluate`]. Only coefficients change with the cutoff,
//! so sweeps are smooth.

use phasewarp_core::{ParamError, ParamHandle, ParameterStore, StateVariableFilter, SvfOutput};

use crate::params::ids;

/// Filter response, fixed when the filter is built.
pub type FilterMode = SvfOutput;

/// Hz added to the cutoff per unit of `envelope * intensity`.
pub const CUTOFF_MODULATION_MULTIPLIER: f32 = 10_000.0;
/// Lowest cutoff after modulation, in Hz.
pub const CUTOFF_LOWER_BOUND: f32 = 20.0;
/// Highest cutoff after modulation, in Hz.
pub const CUTOFF_UPPER_BOUND: f32 = 20_000.0;

/// Resonant filter whose cutoff follows an envelope.
#[derive(Debug, Clone)]
pub struct ModulatedFilter {
    filter: StateVariableFilter,
    cutoff: ParamHandle,
    resonance: ParamHandle,
    eg_intensity: ParamHandle,
}

impl ModulatedFilter {
    /// Build a filter with the given response and apply the current
    /// resonance.
    pub fn new(store: &ParameterStore, mode: FilterMode, sample_rate: f32) -> Result<Self, ParamError> {
        let mut filter = StateVariableFilter::new(sample_rate);
        filter.set_output_type(mode);

        let mut modulated = Self {
            filter,
            cutoff: store.handle(ids::FILTER_CUTOFF)?,
            resonance: store.handle(ids::FILTER_RESONANCE)?,
            eg_intensity: store.handle(ids::FILTER_EG_INTENSITY)?,
        };
        modulated.update();
        Ok(modulated)
    }

    /// Apply the resonance control. Cutoff is left to
    /// [`evaluate`](Self::evaluate) so it never jumps at block boundaries.
    pub fn update(&mut self) {
        self.filter.set_resonance(self.resonance.get());
    }

    /// Filter one sample with the cutoff offset by `envelope`.
    ///
    /// `cutoff = clamp(base + MULTIPLIER * envelope * intensity, 20, 20000)`,
    /// further limited below Nyquist by the filter itself.
    #[inline]
    pub fn evaluate(&mut self, sample: f32, envelope: f32) -> f32 {
        let offset = CUTOFF_MODULATION_MULTIPLIER * envelope * self.eg_intensity.get();
        let frequency = self.cutoff.get() + offset;
        let frequency = if frequency.is_nan() {
            CUTOFF_LOWER_BOUND
        } else {
            frequency.clamp(CUTOFF_LOWER_BOUND, CUTOFF_UPPER_BOUND)
        };
        self.filter.set_cutoff(frequency);
        self.filter.process(sample)
    }

    /// Cutoff applied to the most recent sample, in Hz.
    pub fn cutoff(&self) -> f32 {
        self.filter.cutoff()
    }

    /// Current resonance.
    pub fn resonance(&self) -> f32 {
        self.filter.resonance()
    }

    /// Response selected at construction.
    pub fn mode(&self) -> FilterMode {
        self.filter.output_type()
    }

    /// Change the sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.filter.set_sample_rate(sample_rate);
    }

    /// Clear filter state.
    pub fn reset(&mut self) {
        self.filter.reset();
    }
}

//! Parameter-driven LFO for the voice.

use phasewarp_core::{Lfo, LfoWaveform, ParamError, ParamHandle, ParameterStore};

use crate::params::ids;

/// Per-voice LFO reading `lfo_rate`, `lfo_depth` and `lfo_shape`.
///
/// Rate, depth and shape are picked up in [`update`](Self::update), once per
/// block. Output is `depth * lfo`, in `[-1, 1]`.
#[derive(Debug, Clone)]
pub struct VoiceLfo {
    lfo: Lfo,
    depth: f32,
    rate_param: ParamHandle,
    depth_param: ParamHandle,
    shape_param: ParamHandle,
}

impl VoiceLfo {
    /// Resolve parameters and apply their current values.
    pub fn new(store: &ParameterStore, sample_rate: f32) -> Result<Self, ParamError> {
        let mut lfo = Self {
            lfo: Lfo::new(sample_rate, 1.0),
            depth: 0.0,
            rate_param: store.handle(ids::LFO_RATE)?,
            depth_param: store.handle(ids::LFO_DEPTH)?,
            shape_param: store.handle(ids::LFO_SHAPE)?,
        };
        lfo.update(sample_rate);
        Ok(lfo)
    }

    /// Re-read rate, depth and shape.
    pub fn update(&mut self, sample_rate: f32) {
        self.lfo.set_sample_rate(sample_rate);
        self.lfo.set_frequency(self.rate_param.get());
        self.lfo
            .set_waveform(LfoWaveform::from_index(self.shape_param.get()));
        self.depth = self.depth_param.get().clamp(0.0, 1.0);
    }

    /// Next LFO sample.
    #[inline]
    pub fn evaluate(&mut self) -> f32 {
        self.depth * self.lfo.next()
    }

    /// Restart the cycle.
    pub fn reset(&mut self) {
        self.lfo.reset();
    }

    /// Current waveform.
    pub fn waveform(&self) -> LfoWaveform {
        self.lfo.waveform()
    }
}

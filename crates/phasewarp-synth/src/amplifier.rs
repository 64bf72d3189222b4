//! Master output gain.

use phasewarp_core::{ParamError, ParamHandle, ParameterStore, db_to_linear};

use crate::params::ids;

/// Post-mix gain stage driven by `master_gain` (dB).
///
/// Gain changes are ramped linearly across the next block, so automation
/// moves smoothly instead of stepping at block boundaries.
#[derive(Debug, Clone)]
pub struct Amplifier {
    gain_db: ParamHandle,
    current: f32,
}

impl Amplifier {
    /// Resolve `master_gain` and start at its current value.
    pub fn new(store: &ParameterStore) -> Result<Self, ParamError> {
        let gain_db = store.handle(ids::MASTER_GAIN)?;
        let current = db_to_linear(gain_db.get());
        Ok(Self { gain_db, current })
    }

    /// Apply the gain in place.
    pub fn process_block(&mut self, buffer: &mut [f32]) {
        if buffer.is_empty() {
            return;
        }
        let target = db_to_linear(self.gain_db.get());
        let start = self.current;
        let step = (target - start) / buffer.len() as f32;

        for (i, sample) in buffer.iter_mut().enumerate() {
            *sample *= start + step * (i + 1) as f32;
        }
        self.current = target;
    }

    /// Linear gain reached at the end of the last block.
    pub fn gain(&self) -> f32 {
        self.current
    }
}

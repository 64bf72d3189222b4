//! Lock-free named parameter store.
//!
//! Parameters are `f32` values shared between a control thread that writes
//! them and the audio thread that reads them. Each value lives in an
//! [`AtomicParam`] (an `f32` bit-cast into an `AtomicU32`), so neither side
//! ever takes a lock.
//!
//! ## Access Pattern
//!
//! Components resolve a [`ParamHandle`] once, at construction time, and then
//! read through it on every block or sample. Resolution is the only step
//! that can fail, so a misspelt id surfaces as a [`ParamError`] when a voice
//! is built rather than as silence at render time.
//!
//! ```rust
//! use phasewarp_core::{ParamDescriptor, ParameterStore};
//!
//! let mut store = ParameterStore::new();
//! store
//!     .register(ParamDescriptor::new("master_gain", "Master Gain", -60.0, 6.0, 0.0))
//!     .unwrap();
//!
//! let gain = store.handle("master_gain").unwrap();
//! store.set("master_gain", 100.0).unwrap(); // clamped to max
//! assert_eq!(gain.get(), 6.0);
//! ```

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::sync::atomic::{AtomicU32, Ordering};

/// Static metadata for one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Stable identifier used for lookup (e.g. `"filter_cutoff"`).
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Minimum value (inclusive).
    pub min: f32,
    /// Maximum value (inclusive).
    pub max: f32,
    /// Value at construction and after [`ParameterStore::reset`].
    pub default: f32,
    /// Whether the parameter takes integer steps (shape selectors, octaves).
    pub stepped: bool,
}

impl ParamDescriptor {
    /// Continuous parameter.
    pub const fn new(id: &'static str, name: &'static str, min: f32, max: f32, default: f32) -> Self {
        Self {
            id,
            name,
            min,
            max,
            default,
            stepped: false,
        }
    }

    /// Integer-stepped parameter.
    pub const fn stepped(
        id: &'static str,
        name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            id,
            name,
            min,
            max,
            default,
            stepped: true,
        }
    }

    /// Clamp `value` into `[min, max]`, rounding stepped parameters.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        let v = if self.stepped { libm::roundf(value) } else { value };
        v.clamp(self.min, self.max)
    }
}

/// Errors raised while building or addressing a [`ParameterStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    /// No parameter with this id is registered.
    UnknownParameter(String),
    /// A parameter with this id is already registered.
    DuplicateParameter(&'static str),
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownParameter(id) => write!(f, "unknown parameter '{id}'"),
            Self::DuplicateParameter(id) => write!(f, "parameter '{id}' is already registered"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParamError {}

/// Atomic `f32` with range clamping.
///
/// Writers use `Release`, readers `Acquire`, so a value written on the
/// control thread is fully visible to the audio thread's next load.
#[derive(Debug)]
pub struct AtomicParam {
    bits: AtomicU32,
    descriptor: ParamDescriptor,
}

impl AtomicParam {
    /// Create a parameter holding the descriptor's default.
    pub fn new(descriptor: ParamDescriptor) -> Self {
        Self {
            bits: AtomicU32::new(descriptor.clamp(descriptor.default).to_bits()),
            descriptor,
        }
    }

    /// Current value.
    #[inline]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Acquire))
    }

    /// Store a new value, clamped into range. Non-finite values are ignored.
    #[inline]
    pub fn set(&self, value: f32) {
        if value.is_finite() {
            self.bits
                .store(self.descriptor.clamp(value).to_bits(), Ordering::Release);
        }
    }

    /// Restore the default value.
    pub fn reset(&self) {
        self.set(self.descriptor.default);
    }

    /// Descriptor this parameter was created from.
    pub fn descriptor(&self) -> &ParamDescriptor {
        &self.descriptor
    }
}

/// Resolved, shareable reference to one parameter.
///
/// Cloning is an `Arc` clone; reading is a single atomic load.
#[derive(Debug, Clone)]
pub struct ParamHandle {
    param: Arc<AtomicParam>,
}

impl ParamHandle {
    /// Current value.
    #[inline]
    pub fn get(&self) -> f32 {
        self.param.get()
    }

    /// Parameter id.
    pub fn id(&self) -> &'static str {
        self.param.descriptor.id
    }

    /// Parameter descriptor.
    pub fn descriptor(&self) -> &ParamDescriptor {
        &self.param.descriptor
    }
}

/// Ordered registry of named atomic parameters.
///
/// Registration happens once, before audio starts. Afterwards the store is
/// shared (typically behind an `Arc`) and only `get`/`set`/`handle` are used.
#[derive(Debug, Default)]
pub struct ParameterStore {
    params: Vec<Arc<AtomicParam>>,
}

impl ParameterStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Create a store holding every descriptor in `descriptors`.
    pub fn with_params<I>(descriptors: I) -> Result<Self, ParamError>
    where
        I: IntoIterator<Item = ParamDescriptor>,
    {
        let mut store = Self::new();
        for descriptor in descriptors {
            store.register(descriptor)?;
        }
        Ok(store)
    }

    /// Add a parameter. Ids must be unique.
    pub fn register(&mut self, descriptor: ParamDescriptor) -> Result<(), ParamError> {
        if self.find(descriptor.id).is_some() {
            return Err(ParamError::DuplicateParameter(descriptor.id));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            id = descriptor.id,
            min = descriptor.min,
            max = descriptor.max,
            default = descriptor.default,
            "registered parameter"
        );

        self.params.push(Arc::new(AtomicParam::new(descriptor)));
        Ok(())
    }

    /// Resolve a handle for `id`.
    pub fn handle(&self, id: &str) -> Result<ParamHandle, ParamError> {
        self.find(id)
            .map(|param| ParamHandle {
                param: Arc::clone(param),
            })
            .ok_or_else(|| ParamError::UnknownParameter(id.into()))
    }

    /// Current value of `id`, or `None` if it is not registered.
    pub fn get(&self, id: &str) -> Option<f32> {
        self.find(id).map(|param| param.get())
    }

    /// Set `id` to `value`, clamped into the parameter's range.
    ///
    /// Non-finite values leave the parameter unchanged.
    pub fn set(&self, id: &str, value: f32) -> Result<(), ParamError> {
        let param = self
            .find(id)
            .ok_or_else(|| ParamError::UnknownParameter(id.into()))?;
        param.set(value);
        Ok(())
    }

    /// Restore every parameter to its default.
    pub fn reset(&self) {
        for param in &self.params {
            param.reset();
        }
    }

    /// Descriptors in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &ParamDescriptor> {
        self.params.iter().map(|param| param.descriptor())
    }

    /// Number of registered parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether no parameters are registered.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    fn find(&self, id: &str) -> Option<&Arc<AtomicParam>> {
        self.params.iter().find(|param| param.descriptor.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn store() -> ParameterStore {
        ParameterStore::with_params([
            ParamDescriptor::new("cutoff", "Cutoff", 20.0, 20000.0, 1000.0),
            ParamDescriptor::stepped("shape", "Shape", 0.0, 2.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_defaults_after_registration() {
        let s = store();
        assert_eq!(s.len(), 2);
        assert_eq!(s.get("cutoff"), Some(1000.0));
        assert_eq!(s.get("shape"), Some(0.0));
        assert_eq!(s.get("missing"), None);
    }

    #[test]
    fn test_set_clamps_into_range() {
        let s = store();
        s.set("cutoff", 1.0e6).unwrap();
        assert_eq!(s.get("cutoff"), Some(20000.0));
        s.set("cutoff", -5.0).unwrap();
        assert_eq!(s.get("cutoff"), Some(20.0));
    }

    #[test]
    fn test_set_rounds_stepped() {
        let s = store();
        s.set("shape", 1.4).unwrap();
        assert_eq!(s.get("shape"), Some(1.0));
        s.set("shape", 1.6).unwrap();
        assert_eq!(s.get("shape"), Some(2.0));
    }

    #[test]
    fn test_set_ignores_non_finite() {
        let s = store();
        s.set("cutoff", 500.0).unwrap();
        s.set("cutoff", f32::NAN).unwrap();
        s.set("cutoff", f32::INFINITY).unwrap();
        assert_eq!(s.get("cutoff"), Some(500.0));
    }

    #[test]
    fn test_unknown_parameter() {
        let s = store();
        assert_eq!(
            s.set("resonance", 1.0),
            Err(ParamError::UnknownParameter("resonance".to_string()))
        );
        assert!(matches!(
            s.handle("resonance"),
            Err(ParamError::UnknownParameter(_))
        ));
    }

    #[test]
    fn test_duplicate_registration() {
        let mut s = store();
        let err = s
            .register(ParamDescriptor::new("cutoff", "Again", 0.0, 1.0, 0.0))
            .unwrap_err();
        assert_eq!(err, ParamError::DuplicateParameter("cutoff"));
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn test_handle_sees_later_writes() {
        let s = store();
        let h = s.handle("cutoff").unwrap();
        let h2 = h.clone();
        s.set("cutoff", 2500.0).unwrap();
        assert_eq!(h.get(), 2500.0);
        assert_eq!(h2.get(), 2500.0);
        assert_eq!(h.id(), "cutoff");
    }

    #[test]
    fn test_reset_restores_defaults() {
        let s = store();
        s.set("cutoff", 300.0).unwrap();
        s.set("shape", 2.0).unwrap();
        s.reset();
        assert_eq!(s.get("cutoff"), Some(1000.0));
        assert_eq!(s.get("shape"), Some(0.0));
    }

    #[test]
    fn test_descriptors_keep_registration_order() {
        let s = store();
        let ids: Vec<&str> = s.descriptors().map(|d| d.id).collect();
        assert_eq!(ids, ["cutoff", "shape"]);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ParamError::UnknownParameter("x".to_string()).to_string(),
            "unknown parameter 'x'"
        );
        assert_eq!(
            ParamError::DuplicateParameter("y").to_string(),
            "parameter 'y' is already registered"
        );
    }

    #[test]
    fn test_empty_store() {
        let s = ParameterStore::new();
        assert!(s.is_empty());
        assert_eq!(s.len(), 0);
    }
}

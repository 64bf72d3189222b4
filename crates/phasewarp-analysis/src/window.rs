//! Window functions applied before the analyzer FFT.

use std::f32::consts::PI;

/// Window function types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Window {
    /// Rectangular (no windowing)
    Rectangular,
    /// Hann window (raised cosine)
    #[default]
    Hann,
    /// Hamming window
    Hamming,
    /// Blackman-Harris window (better sidelobe suppression)
    BlackmanHarris,
}

impl Window {
    /// Every window, in the order they are listed to users.
    pub const ALL: [Self; 4] = [
        Self::Rectangular,
        Self::Hann,
        Self::Hamming,
        Self::BlackmanHarris,
    ];

    /// Name used in config files and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Window::Rectangular => "rectangular",
            Window::Hann => "hann",
            Window::Hamming => "hamming",
            Window::BlackmanHarris => "blackman-harris",
        }
    }

    /// Look a window up by name, ignoring case. `rect` and `none` select
    /// [`Window::Rectangular`].
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "rectangular" | "rect" | "none" => Some(Window::Rectangular),
            "hann" => Some(Window::Hann),
            "hamming" => Some(Window::Hamming),
            "blackman-harris" | "blackmanharris" => Some(Window::BlackmanHarris),
            _ => None,
        }
    }

    /// Coefficient `i` of an `n`-point periodic window.
    pub fn coefficient(self, i: usize, n: usize) -> f32 {
        if n == 0 {
            return 1.0;
        }
        let x = 2.0 * PI * i as f32 / n as f32;
        match self {
            Window::Rectangular => 1.0,
            Window::Hann => 0.5 * (1.0 - x.cos()),
            Window::Hamming => 0.54 - 0.46 * x.cos(),
            Window::BlackmanHarris => {
                0.35875 - 0.48829 * x.cos() + 0.14128 * (2.0 * x).cos()
                    - 0.01168 * (3.0 * x).cos()
            }
        }
    }

    /// Window table of `size` coefficients.
    ///
    /// With `normalize`, the table is scaled to a mean of one so the
    /// window does not change the level of a steady signal.
    pub fn table(self, size: usize, normalize: bool) -> Box<[f32]> {
        let mut table: Box<[f32]> = (0..size).map(|i| self.coefficient(i, size)).collect();
        if normalize {
            let sum: f32 = table.iter().sum();
            if sum > 0.0 {
                let scale = size as f32 / sum;
                for c in table.iter_mut() {
                    *c *= scale;
                }
            }
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_hann() {
        let table = Window::Hann.table(100, false);

        // zero at the start, one at the centre
        assert!(table[0] < 0.01);
        assert!(table[99] < 0.01);
        assert!((table[50] - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_rectangular_is_flat() {
        assert!(Window::Rectangular.table(16, true).iter().all(|&c| c == 1.0));
    }

    #[test]
    fn test_normalized_table_has_unit_mean() {
        for window in [Window::Hann, Window::Hamming, Window::BlackmanHarris] {
            let table = window.table(2048, true);
            let mean = table.iter().sum::<f32>() / table.len() as f32;
            assert!((mean - 1.0).abs() < 1e-3, "{window:?} mean {mean}");
        }
    }

    #[test]
    fn test_hann_normalization_doubles_peak() {
        let table = Window::Hann.table(1024, true);
        assert!((table[512] - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_empty_table() {
        assert!(Window::Hann.table(0, true).is_empty());
    }

    #[test]
    fn test_names_round_trip() {
        for window in Window::ALL {
            assert_eq!(Window::from_name(window.name()), Some(window));
        }
        assert_eq!(Window::from_name(" Hann "), Some(Window::Hann));
        assert_eq!(Window::from_name("none"), Some(Window::Rectangular));
        assert_eq!(Window::from_name("kaiser"), None);
    }
}

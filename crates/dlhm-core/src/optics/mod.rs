pub mod apodization;
pub mod fft;
pub mod kreuzer;
pub mod propagation;
pub mod spectral;

pub use apodization::{ApodizationMask, MaskCache};
pub use kreuzer::{kreuzer_reconstruct, KreuzerGeometry};
pub use propagation::{propagate, propagate_scaled};
pub use spectral::{filter_sideband, Quadrant, SidebandPeak, SidebandSpectrum};

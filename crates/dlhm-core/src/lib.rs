pub mod compensation;
pub mod config;
pub mod consts;
pub mod error;
pub mod filters;
pub mod focus;
pub mod frame;
pub mod io;
pub mod optics;
pub mod params;
pub mod pipeline;
pub mod reconstruction;
pub mod source;

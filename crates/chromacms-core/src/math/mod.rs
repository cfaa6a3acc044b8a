//! Numeric primitives shared by decoders and pipeline stages

pub mod curves;
pub mod chromatic_adaptation;
pub mod interpolation;
pub mod matrix;

pub use chromatic_adaptation::adaptation_matrix;
pub use curves::{ParametricCurve, ParametricCurveType};
pub use matrix::Matrix3x3;

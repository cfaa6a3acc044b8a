//! Device-independent color types used by the connection space

mod lab;
pub mod white_point;
mod xyz;

pub use lab::{lab_to_xyz, xyz_to_lab};
pub use white_point::WhitePoint;
pub use xyz::Xyz;

//! Bundled observables; everything else consumes the framework from the
//! outside.

mod cnum;
mod hausdorff2d;
mod ricci2d;
mod volume_profile;

pub use cnum::CnumHistogram;
pub use hausdorff2d::Hausdorff2d;
pub use ricci2d::Ricci2d;
pub use volume_profile::VolumeProfile;

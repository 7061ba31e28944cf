//! Foundation types for the CDT Monte Carlo engine: typed labels, the
//! fixed-capacity entity [`Pool`], the constant-time sampling [`Bag`],
//! structured errors and the deterministic [`RngHandle`].

pub mod bag;
pub mod errors;
pub mod label;
pub mod pool;
pub mod rng;

pub use bag::Bag;
pub use errors::{CdtError, ErrorInfo};
pub use label::Label;
pub use pool::Pool;
pub use rng::RngHandle;

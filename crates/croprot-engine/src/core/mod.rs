pub use self::{color::*, seed_tiers::*};

pub(crate) mod color;
pub(crate) mod seed_tiers;

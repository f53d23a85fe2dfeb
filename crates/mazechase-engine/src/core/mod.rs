pub use self::{direction::*, maze::*, tile::*};

pub(crate) mod direction;
pub(crate) mod maze;
pub(crate) mod tile;

//! Per-cell D8 analysis: window construction, the direction table, steepest
//! descent search, pit filling and grid-wide tie relaxation.
pub mod cell;
pub mod direction;
pub mod evaluate;
pub mod sink;
pub mod ties;
pub mod window;

pub use cell::{CellResult, CellStatus};
pub use direction::{Direction, DIRECTIONS};
pub use evaluate::evaluate;
pub use sink::fill_sink;
pub use ties::{resolve_ties, TieReport};
pub use window::{EdgeTag, Window};

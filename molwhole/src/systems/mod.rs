mod cell;
pub use self::cell::{UnitCell, CellShape};

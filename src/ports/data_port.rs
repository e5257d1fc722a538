//! Bar source port trait.

use crate::domain::bar::Bar;
use crate::domain::error::BarstatError;

/// Produces an ordered bar sequence for the analytics engine.
pub trait BarSource {
    fn load_bars(&self) -> Result<Vec<Bar>, BarstatError>;
}

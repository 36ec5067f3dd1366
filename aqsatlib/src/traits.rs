//! Унифицированный трэйт вывода графика на основе std::io::Write.

use crate::{error::Result, model::Schedule};
use std::io::Write;

pub trait WriteFormat {
    fn write<W: Write>(w: W, schedule: &Schedule) -> Result<()>;
}

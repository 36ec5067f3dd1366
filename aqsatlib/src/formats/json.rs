use crate::{error::Result, model::Schedule};
use std::io::Write;

pub struct Json;

impl crate::traits::WriteFormat for Json {
    fn write<W: Write>(mut w: W, schedule: &Schedule) -> Result<()> {
        serde_json::to_writer_pretty(&mut w, schedule)?;
        writeln!(w)?;
        Ok(())
    }
}

//! Упрощённый XML: <Schedule><price/><down_payment/>...<results>...</results></Schedule>

use crate::{error::{AqsatError, Result}, model::Schedule};
use quick_xml::se::to_string;
use std::io::Write;

pub struct SimpleXml;

impl crate::traits::WriteFormat for SimpleXml {
    fn write<W: Write>(mut w: W, schedule: &Schedule) -> Result<()> {
        // Decimal уходит строкой (serde::str в модели), так что значения не теряют точность
        let s = to_string(schedule).map_err(|e| AqsatError::Xml(format!("{e}")))?;
        w.write_all(s.as_bytes())?;
        Ok(())
    }
}

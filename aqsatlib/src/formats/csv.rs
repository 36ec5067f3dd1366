//! CSV: одна строка на тариф, заголовки:
//! months,rate,monthly_payment,total_payment,down_payment,principal,price

use crate::{error::Result, model::Schedule};
use csv::WriterBuilder;
use std::io::Write;

#[derive(serde::Serialize)]
struct CsvOutRow {
    months: u32,
    rate: String,
    monthly_payment: String,
    total_payment: String,
    down_payment: String,
    principal: String,
    price: String,
}

pub struct Csv;

impl crate::traits::WriteFormat for Csv {
    fn write<W: Write>(mut w: W, schedule: &Schedule) -> Result<()> {
        let mut wrt = WriterBuilder::new().from_writer(&mut w);

        for r in &schedule.results {
            let out = CsvOutRow {
                months: r.months,
                rate: r.rate.normalize().to_string(),
                monthly_payment: r.monthly_payment.normalize().to_string(),
                total_payment: r.total_payment.normalize().to_string(),
                down_payment: schedule.down_payment.amount.normalize().to_string(),
                principal: schedule.principal.normalize().to_string(),
                price: schedule.price.normalize().to_string(),
            };
            wrt.serialize(out)?;
        }
        wrt.flush()?;
        Ok(())
    }
}

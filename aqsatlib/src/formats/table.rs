//! Текстовая таблица для терминала. Суммы до целых, с разделителем разрядов.

use crate::{error::Result, model::Schedule};
use rust_decimal::{Decimal, RoundingStrategy};
use std::io::Write;

pub struct Table;

impl crate::traits::WriteFormat for Table {
    fn write<W: Write>(mut w: W, schedule: &Schedule) -> Result<()> {
        use std::fmt::Write as FmtWrite;
        let mut s = String::new();
        let _ = writeln!(s, "Price: {}", group_thousands(schedule.price));
        if schedule.down_payment.amount > Decimal::ZERO {
            let _ = writeln!(
                s,
                "{}: {}",
                schedule.down_payment.label,
                group_thousands(schedule.down_payment.amount)
            );
        }
        let _ = writeln!(s, "Financed: {}", group_thousands(schedule.principal));
        let _ = writeln!(s);
        let _ = writeln!(s, "{:>6}  {:>6}  {:>16}  {:>18}", "months", "rate %", "monthly", "total");
        for r in &schedule.results {
            let _ = writeln!(
                s,
                "{:>6}  {:>6}  {:>16}  {:>18}",
                r.months,
                r.rate.normalize(),
                group_thousands(r.monthly_payment),
                group_thousands(r.total_payment)
            );
        }
        w.write_all(s.as_bytes())?;
        Ok(())
    }
}

/// 1234567.6 → "1,234,568"
pub fn group_thousands(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

//! PlanBuilder: превращает сырой текст настроек в упорядоченный список тарифов.
//!
//! Простой режим: `"3,6,12"` + одна ставка на все сроки.
//! Расширенный режим: по строке на тариф, `месяцы|ставка`.
//! Некорректные записи молча отбрасываются — это ввод оператора, а не ошибка.

use crate::model::PlanDefinition;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const MONTHS_DELIMITER: char = ',';
pub const FIELD_DELIMITER: char = '|';

/// Источник тарифов в том виде, в каком он хранится в настройках.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum PlanSource {
    Simple {
        months: String,
        #[serde(with = "rust_decimal::serde::str")]
        rate: Decimal,
    },
    Advanced {
        text: String,
    },
}

impl PlanSource {
    pub fn build(&self) -> Vec<PlanDefinition> {
        match self {
            PlanSource::Simple { months, rate } => build_simple(months, *rate),
            PlanSource::Advanced { text } => build_advanced(text),
        }
    }
}

pub fn build_simple(months: &str, rate: Decimal) -> Vec<PlanDefinition> {
    let rate = non_negative_rate(rate);
    let mut plans: Vec<PlanDefinition> = months
        .split(MONTHS_DELIMITER)
        .filter_map(|token| parse_months(token).map(|m| PlanDefinition::new(m, rate)))
        .collect();
    sort_plans(&mut plans);
    plans
}

pub fn build_advanced(text: &str) -> Vec<PlanDefinition> {
    let mut plans = Vec::new();
    for line in text.lines() {
        let mut fields = line.split(FIELD_DELIMITER);
        let (Some(m), Some(r)) = (fields.next(), fields.next()) else {
            if !line.trim().is_empty() {
                debug!(line, "plan line without '|' discarded");
            }
            continue;
        };
        let Some(months) = parse_months(m) else {
            continue;
        };
        plans.push(PlanDefinition::new(months, non_negative_rate(parse_rate(r))));
    }
    sort_plans(&mut plans);
    plans
}

/// Срок: целое > 0. Всё остальное — `None`.
fn parse_months(token: &str) -> Option<u32> {
    let t = token.trim();
    match t.parse::<u32>() {
        Ok(m) if m > 0 => Some(m),
        _ => {
            if !t.is_empty() {
                debug!(token = t, "plan months discarded");
            }
            None
        }
    }
}

/// Пустая или нечитаемая ставка считается нулевой.
fn parse_rate(field: &str) -> Decimal {
    let f = field.trim();
    if f.is_empty() {
        return Decimal::ZERO;
    }
    f.parse::<Decimal>().unwrap_or_else(|e| {
        debug!(field = f, error = %e, "plan rate unreadable, using 0");
        Decimal::ZERO
    })
}

fn non_negative_rate(rate: Decimal) -> Decimal {
    if rate.is_sign_negative() {
        debug!(%rate, "negative rate clamped to 0");
        Decimal::ZERO
    } else {
        rate
    }
}

// sort_by_key стабилен: равные сроки сохраняют порядок ввода
fn sort_plans(plans: &mut [PlanDefinition]) {
    plans.sort_by_key(|p| p.months);
}

//! Доменные модели — общий слой между разбором настроек, калькулятором и форматами вывода.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Один тариф: срок в месяцах и ставка в процентах.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanDefinition {
    pub months: u32,
    #[serde(with = "rust_decimal::serde::str")]
    pub rate: Decimal,
}

impl PlanDefinition {
    pub fn new(months: u32, rate: Decimal) -> Self {
        Self { months, rate }
    }
}

/// Модель начисления процентов.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InterestModel {
    /// Простая наценка: ставка за месяц умножается на срок.
    #[default]
    Markup,
    /// Аннуитет: равные платежи по формуле PMT.
    Apr,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct DownPaymentInput {
    /// Процент от цены. Если > 0, фиксированная сумма игнорируется.
    #[serde(with = "rust_decimal::serde::str")]
    pub percent: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub fixed: Decimal,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct CalculationConfig {
    pub interest_model: InterestModel,
    /// Шаг округления ежемесячного платежа; 0 — без округления.
    pub rounding_step: u64,
    pub down_payment: DownPaymentInput,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DownPayment {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub label: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PlanResult {
    pub months: u32,
    #[serde(with = "rust_decimal::serde::str")]
    pub rate: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub monthly_payment: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_payment: Decimal,
}

/// Результат одного расчёта. Пересчитывается при каждом изменении цены.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Schedule {
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub down_payment: DownPayment,
    #[serde(with = "rust_decimal::serde::str")]
    pub principal: Decimal,
    pub results: Vec<PlanResult>,
}

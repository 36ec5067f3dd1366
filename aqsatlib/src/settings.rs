//! Настройки магазина (TOML) и политика «показывать ли график вообще».

use crate::{
    calculator::calculate,
    error::{AqsatError, Result},
    model::{CalculationConfig, DownPaymentInput, InterestModel, PlanDefinition, Schedule},
    plans::PlanSource,
};
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

/// Допустимые шаги округления в настройках магазина.
pub const ROUNDING_STEPS: [u64; 3] = [0, 1000, 10000];

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CalcMode {
    #[default]
    Simple,
    Advanced,
}

/// Сумма в настройках: число или строка вида `"1,500,000"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Amount {
    Number(#[serde(with = "rust_decimal::serde::float")] Decimal),
    Text(String),
}

impl Default for Amount {
    fn default() -> Self {
        Amount::Number(Decimal::ZERO)
    }
}

impl Amount {
    /// Всё, кроме цифр и точки, выбрасывается, затем берётся самый длинный
    /// числовой префикс: `"1.500.000"` → 1.5. Без цифр — 0.
    pub fn to_decimal(&self) -> Result<Decimal> {
        match self {
            Amount::Number(d) => Ok(*d),
            Amount::Text(s) => {
                let strip = Regex::new(r"[^\d.]").map_err(|e| AqsatError::Parse(e.to_string()))?;
                let prefix = Regex::new(r"^(\d+(?:\.\d+)?|\.\d+)")
                    .map_err(|e| AqsatError::Parse(e.to_string()))?;
                let digits = strip.replace_all(s, "");
                match prefix.find(&digits).and_then(|m| m.as_str().parse::<Decimal>().ok()) {
                    Some(d) => Ok(d),
                    None => {
                        debug!(text = s.as_str(), "amount unreadable, using 0");
                        Ok(Decimal::ZERO)
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub calc_mode: CalcMode,
    /// Сроки для простого режима, через запятую.
    pub months: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize", deserialize_with = "lenient_decimal")]
    pub monthly_rate: Decimal,
    /// Тарифы расширенного режима: `месяцы|ставка` по строке.
    pub advanced_plan: String,
    #[serde(deserialize_with = "lenient_model")]
    pub calc_type: InterestModel,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize", deserialize_with = "lenient_decimal")]
    pub down_percent: Decimal,
    pub down_fixed: Amount,
    /// Один из `ROUNDING_STEPS`; остальное `sanitize` сбрасывает в 0.
    #[serde(deserialize_with = "lenient_rounding")]
    pub rounding: u64,
    /// Ниже этой цены график не показывается; 0 — без порога.
    #[serde(serialize_with = "rust_decimal::serde::float::serialize", deserialize_with = "lenient_decimal")]
    pub min_price: Decimal,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            calc_mode: CalcMode::Simple,
            months: "8,10,12".into(),
            monthly_rate: Decimal::ZERO,
            advanced_plan: String::new(),
            calc_type: InterestModel::Markup,
            down_percent: Decimal::ZERO,
            down_fixed: Amount::default(),
            rounding: 0,
            min_price: Decimal::ZERO,
        }
    }
}

impl Settings {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Приводит значения к допустимым диапазонам, как форма настроек.
    pub fn sanitize(mut self) -> Result<Self> {
        self.down_percent = self.down_percent.clamp(Decimal::ZERO, dec!(100));
        self.down_fixed = Amount::Number(self.down_fixed.to_decimal()?.max(Decimal::ZERO));
        self.monthly_rate = self.monthly_rate.max(Decimal::ZERO);
        self.min_price = self.min_price.max(Decimal::ZERO);
        if !ROUNDING_STEPS.contains(&self.rounding) {
            debug!(rounding = self.rounding, "unsupported rounding step, using 0");
            self.rounding = 0;
        }
        Ok(self)
    }

    pub fn plan_source(&self) -> PlanSource {
        match self.calc_mode {
            CalcMode::Simple => PlanSource::Simple {
                months: self.months.clone(),
                rate: self.monthly_rate,
            },
            CalcMode::Advanced => PlanSource::Advanced {
                text: self.advanced_plan.clone(),
            },
        }
    }

    pub fn calculation_config(&self) -> Result<CalculationConfig> {
        Ok(CalculationConfig {
            interest_model: self.calc_type,
            rounding_step: self.rounding,
            down_payment: DownPaymentInput {
                percent: self.down_percent,
                fixed: self.down_fixed.to_decimal()?,
            },
        })
    }

    /// Разбирает тарифы один раз; дальше `quote` можно звать на каждое изменение цены.
    pub fn engine(&self) -> Result<Installments> {
        Ok(Installments {
            plans: self.plan_source().build(),
            config: self.calculation_config()?,
            min_price: self.min_price,
        })
    }
}

// Ошибочное значение в файле настроек не должно ронять загрузку целиком:
// поле откатывается к значению по умолчанию.

fn lenient_model<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<InterestModel, D::Error> {
    Ok(match toml::Value::deserialize(d)? {
        toml::Value::String(s) if s.trim().eq_ignore_ascii_case("apr") => InterestModel::Apr,
        toml::Value::String(s) if s.trim().eq_ignore_ascii_case("markup") => InterestModel::Markup,
        other => {
            debug!(value = %other, "unknown calc_type, using markup");
            InterestModel::Markup
        }
    })
}

fn lenient_decimal<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Decimal, D::Error> {
    let value = toml::Value::deserialize(d)?;
    let parsed = match &value {
        toml::Value::Integer(i) => Some(Decimal::from(*i)),
        toml::Value::Float(f) => Decimal::try_from(*f).ok(),
        toml::Value::String(s) => s.trim().parse::<Decimal>().ok(),
        _ => None,
    };
    Ok(parsed.unwrap_or_else(|| {
        debug!(%value, "non-numeric setting, using 0");
        Decimal::ZERO
    }))
}

fn lenient_rounding<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<u64, D::Error> {
    let value = toml::Value::deserialize(d)?;
    let parsed = match &value {
        toml::Value::Integer(i) => u64::try_from(*i).ok(),
        toml::Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    Ok(parsed.unwrap_or_else(|| {
        debug!(%value, "unreadable rounding, using 0");
        0
    }))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Installments {
    pub plans: Vec<PlanDefinition>,
    pub config: CalculationConfig,
    pub min_price: Decimal,
}

impl Installments {
    /// `None` — показывать нечего: цена <= 0, ниже порога или тарифов нет.
    pub fn quote(&self, price: Decimal) -> Result<Option<Schedule>> {
        if price <= Decimal::ZERO {
            debug!(%price, "non-positive price, nothing to show");
            return Ok(None);
        }
        if self.min_price > Decimal::ZERO && price < self.min_price {
            debug!(%price, min_price = %self.min_price, "price below threshold");
            return Ok(None);
        }
        if self.plans.is_empty() {
            debug!("no installment plans configured");
            return Ok(None);
        }
        calculate(price, &self.plans, &self.config).map(Some)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            kind: self.config.interest_model,
            rounding: self.config.rounding_step,
            plans: self.plans.clone(),
            down_pct: self.config.down_payment.percent,
            down_fix: self.config.down_payment.fixed,
        }
    }
}

/// То, что уходит в браузер для пересчёта без запроса к серверу.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    #[serde(rename = "type")]
    pub kind: InterestModel,
    pub rounding: u64,
    pub plans: Vec<PlanDefinition>,
    #[serde(with = "rust_decimal::serde::str")]
    pub down_pct: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub down_fix: Decimal,
}

impl ClientConfig {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

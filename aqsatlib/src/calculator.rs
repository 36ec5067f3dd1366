//! InstallmentCalculator — чистая функция: цена + тарифы + настройки → график.
//!
//! Вся арифметика на `Decimal`, поэтому один и тот же вход даёт один и тот же
//! результат на сервере и в любом другом месте, где вызывается `calculate`.
//!
//! Наценка (`Markup`) считается по варианту «ставка за месяц × срок»:
//! `monthly = principal * (1 + rate * months / 100) / months`.

use crate::{
    error::{AqsatError, Result},
    model::{
        CalculationConfig, DownPayment, DownPaymentInput, InterestModel, PlanDefinition,
        PlanResult, Schedule,
    },
};
use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use rust_decimal_macros::dec;
use tracing::{debug, trace};

const HUNDRED: Decimal = dec!(100);

pub const DOWN_PAYMENT_LABEL: &str = "Down payment";

/// Процент имеет приоритет над фиксированной суммой; они никогда не складываются.
pub fn resolve_down_payment(price: Decimal, input: &DownPaymentInput) -> Result<DownPayment> {
    if input.percent > Decimal::ZERO {
        let amount = price
            .checked_mul(input.percent / HUNDRED)
            .ok_or(AqsatError::Overflow("down payment"))?;
        Ok(DownPayment {
            amount,
            label: format!("{DOWN_PAYMENT_LABEL} ({}%)", input.percent.normalize()),
        })
    } else if input.fixed > Decimal::ZERO {
        Ok(DownPayment {
            amount: price.min(input.fixed),
            label: DOWN_PAYMENT_LABEL.to_string(),
        })
    } else {
        Ok(DownPayment {
            amount: Decimal::ZERO,
            label: String::new(),
        })
    }
}

/// Ежемесячный платёж до округления. `plan.months` обязан быть >= 1.
/// Отрицательная ставка считается нулевой в обеих моделях.
pub fn monthly_payment(model: InterestModel, principal: Decimal, plan: &PlanDefinition) -> Result<Decimal> {
    let m = Decimal::from(plan.months);
    let rate = plan.rate.max(Decimal::ZERO);
    match model {
        InterestModel::Apr => {
            let rr = rate / HUNDRED;
            if rr.is_zero() {
                return Ok(principal / m);
            }
            match (Decimal::ONE + rr).checked_powi(i64::from(plan.months)) {
                Some(pow) if pow == Decimal::ONE => Ok(principal / m),
                // pow / (pow - 1) считаем отдельно, иначе principal * pow переполняется
                Some(pow) => pow
                    .checked_div(pow - Decimal::ONE)
                    .and_then(|factor| principal.checked_mul(rr)?.checked_mul(factor))
                    .ok_or(AqsatError::Overflow("annuity payment")),
                // (1+rr)^m вне диапазона Decimal: pow / (pow - 1) → 1
                None => principal
                    .checked_mul(rr)
                    .ok_or(AqsatError::Overflow("annuity payment")),
            }
        }
        InterestModel::Markup => {
            let total_interest = rate
                .checked_mul(m)
                .ok_or(AqsatError::Overflow("markup"))?
                / HUNDRED;
            Decimal::ONE
                .checked_add(total_interest)
                .and_then(|factor| factor.checked_mul(principal))
                .ok_or(AqsatError::Overflow("markup payment"))
                .map(|total| total / m)
        }
    }
}

/// Округление до ближайшего кратного `step`, половина — вверх. `step == 0` — без изменений.
pub fn round_to_step(value: Decimal, step: u64) -> Result<Decimal> {
    if step == 0 {
        return Ok(value);
    }
    let step = Decimal::from(step);
    (value / step)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .checked_mul(step)
        .ok_or(AqsatError::Overflow("rounding"))
}

pub fn calculate(
    price: Decimal,
    plans: &[PlanDefinition],
    config: &CalculationConfig,
) -> Result<Schedule> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(AqsatError::InvalidPrice(price));
    }
    if let Some(bad) = plans.iter().find(|p| p.months == 0) {
        return Err(AqsatError::InvalidPlan { months: bad.months });
    }
    if price.is_zero() {
        debug!("zero price, empty schedule");
        return Ok(Schedule {
            price,
            down_payment: resolve_down_payment(price, &DownPaymentInput::default())?,
            principal: Decimal::ZERO,
            results: Vec::new(),
        });
    }

    let down_payment = resolve_down_payment(price, &config.down_payment)?;
    let principal = (price - down_payment.amount).max(Decimal::ZERO);

    let results = plans
        .iter()
        .map(|plan| {
            let raw = monthly_payment(config.interest_model, principal, plan)?;
            let monthly = round_to_step(raw, config.rounding_step)?;
            // итог всегда из округлённого платежа, сам итог не округляется
            let total = monthly
                .checked_mul(Decimal::from(plan.months))
                .and_then(|paid| paid.checked_add(down_payment.amount))
                .ok_or(AqsatError::Overflow("total payment"))?;
            trace!(months = plan.months, rate = %plan.rate, %raw, %monthly, %total, "plan priced");
            Ok(PlanResult {
                months: plan.months,
                rate: plan.rate,
                monthly_payment: monthly,
                total_payment: total,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Schedule {
        price,
        down_payment,
        principal,
        results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(model: InterestModel, step: u64, percent: Decimal, fixed: Decimal) -> CalculationConfig {
        CalculationConfig {
            interest_model: model,
            rounding_step: step,
            down_payment: DownPaymentInput { percent, fixed },
        }
    }

    #[test]
    fn percent_wins_over_fixed() {
        let dp = resolve_down_payment(dec!(1000), &DownPaymentInput { percent: dec!(10), fixed: dec!(500) })
            .expect("down payment");
        assert_eq!(dp.amount, dec!(100));
        assert_eq!(dp.label, "Down payment (10%)");
    }

    #[test]
    fn fixed_is_capped_by_price() {
        let dp = resolve_down_payment(dec!(300), &DownPaymentInput { percent: Decimal::ZERO, fixed: dec!(500) })
            .expect("down payment");
        assert_eq!(dp.amount, dec!(300));
        assert_eq!(dp.label, "Down payment");
    }

    #[test]
    fn no_down_payment_configured() {
        let dp = resolve_down_payment(dec!(300), &DownPaymentInput::default()).expect("down payment");
        assert_eq!(dp.amount, Decimal::ZERO);
        assert!(dp.label.is_empty());
    }

    #[test]
    fn rounding_half_up() {
        assert_eq!(round_to_step(dec!(1500), 1000).expect("round"), dec!(2000));
        assert_eq!(round_to_step(dec!(1499.99), 1000).expect("round"), dec!(1000));
        assert_eq!(round_to_step(dec!(2500), 1000).expect("round"), dec!(3000));
        assert_eq!(round_to_step(dec!(123.456), 0).expect("round"), dec!(123.456));
    }

    #[test]
    fn zero_rate_apr_is_equal_split() {
        let plan = PlanDefinition::new(4, Decimal::ZERO);
        assert_eq!(monthly_payment(InterestModel::Apr, dec!(1000), &plan).expect("monthly"), dec!(250));
    }

    #[test]
    fn apr_survives_huge_power() {
        let plan = PlanDefinition::new(600, dec!(100));
        let monthly = monthly_payment(InterestModel::Apr, dec!(1000), &plan).expect("monthly");
        assert_eq!(monthly, dec!(1000));
    }

    #[test]
    fn zero_months_fails_fast() {
        let err = calculate(
            dec!(100),
            &[PlanDefinition::new(0, dec!(1))],
            &config(InterestModel::Markup, 0, Decimal::ZERO, Decimal::ZERO),
        )
        .unwrap_err();
        assert!(matches!(err, AqsatError::InvalidPlan { months: 0 }));
    }

    #[test]
    fn negative_price_fails_fast() {
        let err = calculate(dec!(-1), &[], &CalculationConfig::default()).unwrap_err();
        assert!(matches!(err, AqsatError::InvalidPrice(_)));
    }

    #[test]
    fn zero_price_is_empty() {
        let s = calculate(
            Decimal::ZERO,
            &[PlanDefinition::new(3, dec!(1))],
            &config(InterestModel::Apr, 1000, dec!(20), Decimal::ZERO),
        )
        .expect("zero price");
        assert!(s.results.is_empty());
        assert_eq!(s.principal, Decimal::ZERO);
    }

    #[test]
    fn down_payment_consumes_price() {
        let s = calculate(
            dec!(400),
            &[PlanDefinition::new(3, dec!(5)), PlanDefinition::new(6, dec!(5))],
            &config(InterestModel::Apr, 0, Decimal::ZERO, dec!(1000)),
        )
        .expect("calc");
        assert_eq!(s.principal, Decimal::ZERO);
        for r in &s.results {
            assert_eq!(r.monthly_payment, Decimal::ZERO);
            assert_eq!(r.total_payment, dec!(400));
        }
    }

    #[test]
    fn huge_price_overflows_into_error() {
        let err = calculate(
            Decimal::MAX,
            &[PlanDefinition::new(12, dec!(2))],
            &config(InterestModel::Apr, 0, dec!(20), Decimal::ZERO),
        )
        .unwrap_err();
        assert!(matches!(err, AqsatError::Overflow(_)));

        let err = calculate(
            Decimal::MAX,
            &[PlanDefinition::new(12, dec!(5))],
            &config(InterestModel::Markup, 1000, Decimal::ZERO, Decimal::ZERO),
        )
        .unwrap_err();
        assert!(matches!(err, AqsatError::Overflow(_)));
    }

    #[test]
    fn negative_rate_is_treated_as_zero() {
        let plan = PlanDefinition::new(4, dec!(-5));
        assert_eq!(monthly_payment(InterestModel::Markup, dec!(1000), &plan).expect("markup"), dec!(250));
        assert_eq!(monthly_payment(InterestModel::Apr, dec!(1000), &plan).expect("apr"), dec!(250));
    }
}

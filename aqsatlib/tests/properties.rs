use aqsatlib::{
    calculate,
    calculator::round_to_step,
    model::{CalculationConfig, DownPaymentInput, InterestModel, PlanDefinition},
};
use proptest::prelude::{prop_assert, prop_assert_eq, proptest};
use rust_decimal::Decimal;

fn model(apr: bool) -> InterestModel {
    if apr { InterestModel::Apr } else { InterestModel::Markup }
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(64))]

    #[test]
    fn payments_are_non_negative_and_cover_down_payment(
        price in 1u64..50_000_000,
        months in 1u32..73,
        rate_bp in 0u32..1_000,
        down_pct in 0u32..101,
        down_fix in 0u64..60_000_000,
        step in proptest::sample::select(vec![0u64, 1, 1000, 10_000]),
        apr in proptest::bool::ANY,
    ) {
        let config = CalculationConfig {
            interest_model: model(apr),
            rounding_step: step,
            down_payment: DownPaymentInput {
                percent: Decimal::from(down_pct),
                fixed: Decimal::from(down_fix),
            },
        };
        let plans = [PlanDefinition::new(months, Decimal::new(i64::from(rate_bp), 2))];
        let s = calculate(Decimal::from(price), &plans, &config).expect("calc");

        prop_assert_eq!(s.principal, (Decimal::from(price) - s.down_payment.amount).max(Decimal::ZERO));
        for r in &s.results {
            prop_assert!(r.monthly_payment >= Decimal::ZERO);
            prop_assert!(r.total_payment >= s.down_payment.amount);
        }
    }

    #[test]
    fn percent_ignores_fixed(price in 1u64..10_000_000, pct in 1u32..101, fix in 1u64..10_000_000) {
        let input = DownPaymentInput { percent: Decimal::from(pct), fixed: Decimal::from(fix) };
        let dp = aqsatlib::calculator::resolve_down_payment(Decimal::from(price), &input).expect("down payment");
        prop_assert_eq!(dp.amount, Decimal::from(price) * Decimal::from(pct) / Decimal::ONE_HUNDRED);
    }

    #[test]
    fn fixed_above_price_takes_everything(price in 1u64..10_000_000, extra in 0u64..1_000_000) {
        let config = CalculationConfig {
            interest_model: InterestModel::Apr,
            rounding_step: 0,
            down_payment: DownPaymentInput { percent: Decimal::ZERO, fixed: Decimal::from(price + extra) },
        };
        let s = calculate(Decimal::from(price), &[PlanDefinition::new(6, Decimal::TEN)], &config).expect("calc");
        prop_assert_eq!(s.down_payment.amount, Decimal::from(price));
        prop_assert_eq!(s.principal, Decimal::ZERO);
        prop_assert_eq!(s.results[0].total_payment, Decimal::from(price));
    }

    #[test]
    fn rounding_is_idempotent(cents in 0i64..10_000_000_000, step in 0u64..100_000) {
        let once = round_to_step(Decimal::new(cents, 2), step).expect("round");
        prop_assert_eq!(round_to_step(once, step).expect("round"), once);
    }

    #[test]
    fn zero_rate_apr_is_equal_split(principal in 1u64..100_000_000, months in 1u32..121) {
        let plans = [PlanDefinition::new(months, Decimal::ZERO)];
        let config = CalculationConfig { interest_model: InterestModel::Apr, ..CalculationConfig::default() };
        let s = calculate(Decimal::from(principal), &plans, &config).expect("calc");
        prop_assert_eq!(s.results[0].monthly_payment, Decimal::from(principal) / Decimal::from(months));
    }
}

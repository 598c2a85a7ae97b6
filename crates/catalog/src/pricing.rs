//! Pricing rules for discounts. Pure functions.

use rust_decimal::Decimal;

use flashsale_core::{DomainError, DomainResult};

use crate::discount::{Discount, DiscountType};

/// Human-readable form of a discount: `"10.00%"`, `"$15.00"`, or
/// `"Unknown discount type"`.
pub fn describe_discount(discount: &Discount) -> String {
    match discount.discount_type {
        DiscountType::Percentage => format!("{:.2}%", discount.discount_value),
        DiscountType::FixedAmount => format!("${:.2}", discount.discount_value),
        DiscountType::Unrecognized(_) => "Unknown discount type".to_string(),
    }
}

/// Price after applying `discount` to `base_price`.
///
/// The result is not clamped: a fixed amount larger than the base price yields a
/// negative price. A result outside the `Decimal` range is a validation error.
pub fn apply_discount(base_price: Decimal, discount: &Discount) -> DomainResult<Decimal> {
    let price = match discount.discount_type {
        DiscountType::Percentage => Decimal::ONE
            .checked_sub(discount.discount_value / Decimal::ONE_HUNDRED)
            .and_then(|factor| base_price.checked_mul(factor)),
        DiscountType::FixedAmount => base_price.checked_sub(discount.discount_value),
        DiscountType::Unrecognized(_) => Some(base_price),
    };

    price.ok_or_else(|| {
        DomainError::validation(format!(
            "discount {} overflows the price of {}",
            describe_discount(discount),
            base_price
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use flashsale_core::{EntityId, RecordMeta};
    use proptest::prelude::*;

    fn discount(kind: DiscountType, value: Decimal) -> Discount {
        let now = Utc::now();
        Discount {
            id: EntityId::new("d-1"),
            name: "test".to_string(),
            description: String::new(),
            discount_type: kind,
            discount_value: value,
            start_date: now,
            end_date: now,
            is_active: true,
            meta: RecordMeta::created(now),
        }
    }

    #[test]
    fn percentage_discount() {
        let d = discount(DiscountType::Percentage, Decimal::new(10, 0));
        assert_eq!(apply_discount(Decimal::ONE_HUNDRED, &d).unwrap(), Decimal::new(90, 0));
        assert_eq!(describe_discount(&d), "10.00%");
    }

    #[test]
    fn fixed_amount_discount() {
        let d = discount(DiscountType::FixedAmount, Decimal::new(15, 0));
        assert_eq!(apply_discount(Decimal::ONE_HUNDRED, &d).unwrap(), Decimal::new(85, 0));
        assert_eq!(describe_discount(&d), "$15.00");
    }

    #[test]
    fn fixed_amount_is_not_clamped() {
        let d = discount(DiscountType::FixedAmount, Decimal::new(150, 0));
        assert_eq!(apply_discount(Decimal::ONE_HUNDRED, &d).unwrap(), Decimal::new(-50, 0));
    }

    #[test]
    fn unknown_type_leaves_price_alone() {
        let d = discount(DiscountType::Unrecognized("BOGO".to_string()), Decimal::new(50, 0));
        assert_eq!(apply_discount(Decimal::ONE_HUNDRED, &d).unwrap(), Decimal::ONE_HUNDRED);
        assert_eq!(describe_discount(&d), "Unknown discount type");
    }

    #[test]
    fn description_rounds_to_cents() {
        let d = discount(DiscountType::Percentage, Decimal::new(125, 1));
        assert_eq!(describe_discount(&d), "12.50%");
    }

    #[test]
    fn percentage_above_one_hundred_goes_negative() {
        let d = discount(DiscountType::Percentage, Decimal::new(150, 0));
        assert_eq!(apply_discount(Decimal::ONE_HUNDRED, &d).unwrap(), Decimal::new(-50, 0));
    }

    #[test]
    fn overflowing_percentage_is_a_validation_error() {
        let huge = Decimal::from_i128_with_scale(1_000_000_000_000_000_000, 0);
        let d = discount(DiscountType::Percentage, huge);

        let err = apply_discount(huge, &d).unwrap_err();
        assert_eq!(err.kind(), flashsale_core::ErrorKind::Validation);
    }

    #[test]
    fn prices_near_the_decimal_limits() {
        let d = discount(DiscountType::Percentage, Decimal::new(50, 0));
        assert_eq!(apply_discount(Decimal::MAX, &d).unwrap(), Decimal::MAX * Decimal::new(5, 1));

        let d = discount(DiscountType::Percentage, Decimal::ZERO);
        assert_eq!(apply_discount(Decimal::MAX, &d).unwrap(), Decimal::MAX);

        let d = discount(DiscountType::Percentage, Decimal::new(300, 0));
        assert!(apply_discount(Decimal::MAX, &d).is_err());

        let d = discount(DiscountType::FixedAmount, Decimal::MAX);
        assert!(apply_discount(Decimal::MIN, &d).is_err());
        assert_eq!(apply_discount(Decimal::ZERO, &d).unwrap(), Decimal::MIN);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: a percentage in [0, 100] never raises the price or makes it negative.
        #[test]
        fn percentage_stays_within_base(base in 0i64..1_000_000, pct in 0i64..=100) {
            let base = Decimal::new(base, 2);
            let d = discount(DiscountType::Percentage, Decimal::from(pct));
            let price = apply_discount(base, &d).unwrap();
            prop_assert!(price <= base);
            prop_assert!(price >= Decimal::ZERO);
        }

        /// Property: a fixed amount subtracts exactly its value.
        #[test]
        fn fixed_amount_subtracts_exactly(base in 0i64..1_000_000, off in 0i64..1_000_000) {
            let base = Decimal::new(base, 2);
            let off = Decimal::new(off, 2);
            let d = discount(DiscountType::FixedAmount, off);
            prop_assert_eq!(apply_discount(base, &d).unwrap() + off, base);
        }

        /// Property: any non-negative percentage either prices or reports a validation
        /// error; it never panics.
        #[test]
        fn any_percentage_is_total(
            base in any::<i64>().prop_map(|v| Decimal::from(v.unsigned_abs()) * Decimal::from(u32::MAX)),
            pct in any::<u64>(),
        ) {
            let d = discount(DiscountType::Percentage, Decimal::from(pct) * Decimal::from(u32::MAX));
            if let Err(err) = apply_discount(base, &d) {
                prop_assert_eq!(err.kind(), flashsale_core::ErrorKind::Validation);
            }
        }
    }
}

/// Growth applied to shop item copies when no config overrides it.
pub const DEFAULT_ITEM_PRICE_GROWTH: f64 = 1.15;

/// How a price grows with the number of copies or levels already owned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceCurve {
    /// `base * growth^count`
    Exponential { growth: f64 },
    /// `base * (1 + count * factor)`
    Linear { factor: f64 },
}

impl PriceCurve {
    /// Price of the next copy after `count` owned. Never decreases with
    /// `count` for non-negative bases and growth factors at or above 1.
    pub fn price(self, base: f64, count: f64) -> f64 {
        let count = count.max(0.0);
        match self {
            Self::Exponential { growth } => base * growth.max(1.0).powf(count),
            Self::Linear { factor } => base * (1.0 + count * factor.max(0.0)),
        }
    }
}

/// Price of the next copy of a shop item.
pub fn get_item_price(base: f64, count: u32) -> f64 {
    PriceCurve::Exponential {
        growth: DEFAULT_ITEM_PRICE_GROWTH,
    }
    .price(base, f64::from(count))
}

#[cfg(test)]
mod tests {
    use super::{PriceCurve, get_item_price};

    const EPSILON: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPSILON,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn first_copy_costs_the_base_price() {
        assert_close(get_item_price(10.0, 0), 10.0);
        assert_close(get_item_price(10.0, 1), 11.5);
        assert_close(get_item_price(10.0, 2), 13.225);
    }

    #[test]
    fn item_price_never_decreases() {
        let mut last = 0.0;
        for count in 0..200 {
            let price = get_item_price(40.0, count);
            assert!(price >= last, "price dropped at count {count}");
            last = price;
        }
    }

    #[test]
    fn linear_curve_steps_by_factor() {
        let curve = PriceCurve::Linear { factor: 0.25 };
        assert_close(curve.price(200.0, 0.0), 200.0);
        assert_close(curve.price(200.0, 3.0), 350.0);
    }

    #[test]
    fn shrinking_growth_is_treated_as_flat() {
        let curve = PriceCurve::Exponential { growth: 0.5 };
        assert_close(curve.price(8.0, 5.0), 8.0);
    }
}

//! Slippage and fee adjusted profitability of a buy-here / sell-there trade.
//!
//! Uses rust_decimal for exact precision in financial calculations.

use rust_decimal::Decimal;

/// Per-leg cost assumptions for one exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LegCosts {
    /// Conservative price move expected between quote and fill (fraction)
    pub slippage: Decimal,
    /// Taker fee charged on the leg (fraction)
    pub taker_fee: Decimal,
}

impl LegCosts {
    pub fn new(slippage: Decimal, taker_fee: Decimal) -> Self {
        Self {
            slippage,
            taker_fee,
        }
    }
}

/// Profitability calculations for cross-exchange taker arbitrage.
pub struct FeeCalculator;

impl FeeCalculator {
    /// Buy price widened upwards by the slippage buffer.
    ///
    /// Formula: buy_price * (1 + slippage)
    pub fn adjusted_buy_price(buy_price: Decimal, slippage: Decimal) -> Decimal {
        buy_price * (Decimal::ONE + slippage)
    }

    /// Sell price narrowed downwards by the slippage buffer.
    ///
    /// Formula: sell_price * (1 - slippage)
    pub fn adjusted_sell_price(sell_price: Decimal, slippage: Decimal) -> Decimal {
        sell_price * (Decimal::ONE - slippage)
    }

    /// Net profitability of buying at `buy_price` and selling at `sell_price`,
    /// as a fraction of the buy-side notional.
    ///
    /// ```text
    /// gross = (adjusted_sell - adjusted_buy) / adjusted_buy
    /// net   = gross - buy_fee - sell_fee
    /// ```
    ///
    /// Fees are subtracted as flat fractions rather than compounded into the
    /// prices. Returns `None` if the adjusted buy price is not positive.
    pub fn net_profitability(
        buy_price: Decimal,
        sell_price: Decimal,
        buy: LegCosts,
        sell: LegCosts,
    ) -> Option<Decimal> {
        let adjusted_buy = Self::adjusted_buy_price(buy_price, buy.slippage);
        if adjusted_buy <= Decimal::ZERO {
            return None;
        }
        let adjusted_sell = Self::adjusted_sell_price(sell_price, sell.slippage);

        let gross = (adjusted_sell - adjusted_buy) / adjusted_buy;
        Some(gross - buy.taker_fee - sell.taker_fee)
    }

    /// Quote currency needed to fund a buy of `amount` at `ask_price`, with
    /// `buffer` headroom for the fill price moving before settlement.
    ///
    /// Formula: amount * ask_price * (1 + buffer)
    pub fn required_quote_balance(amount: Decimal, ask_price: Decimal, buffer: Decimal) -> Decimal {
        amount * ask_price * (Decimal::ONE + buffer)
    }

    /// Expected quote currency profit of trading `amount` at a net profitability.
    pub fn expected_profit(amount: Decimal, buy_price: Decimal, net_profitability: Decimal) -> Decimal {
        amount * buy_price * net_profitability
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn costs() -> LegCosts {
        LegCosts::new(dec!(0.001), dec!(0.001))
    }

    #[test]
    fn test_adjusted_prices() {
        assert_eq!(FeeCalculator::adjusted_buy_price(dec!(100), dec!(0.001)), dec!(100.1));
        assert_eq!(FeeCalculator::adjusted_sell_price(dec!(102), dec!(0.001)), dec!(101.898));
    }

    #[test]
    fn test_equal_prices_without_costs_is_exactly_zero() {
        let net = FeeCalculator::net_profitability(
            dec!(100),
            dec!(100),
            LegCosts::default(),
            LegCosts::default(),
        );
        assert_eq!(net, Some(Decimal::ZERO));
    }

    #[test]
    fn test_net_profitability_worked_example() {
        // adjusted_buy = 100.1, adjusted_sell = 101.898
        // gross = 1.798 / 100.1 ~= 0.017962
        // net = gross - 0.002 ~= 0.015962
        let net = FeeCalculator::net_profitability(dec!(100), dec!(102), costs(), costs()).unwrap();

        assert!((net - dec!(0.015962)).abs() < dec!(0.000001), "net was {net}");
        assert_eq!(net.round_dp(4), dec!(0.0160));
    }

    #[test]
    fn test_net_profitability_negative_when_prices_cross_against_us() {
        let net = FeeCalculator::net_profitability(dec!(102), dec!(100), costs(), costs()).unwrap();
        assert!(net < Decimal::ZERO);
    }

    #[test]
    fn test_net_profitability_rejects_non_positive_buy_price() {
        assert_eq!(
            FeeCalculator::net_profitability(Decimal::ZERO, dec!(1), costs(), costs()),
            None
        );
    }

    #[test]
    fn test_net_profitability_monotonic() {
        let prices = [dec!(0.05), dec!(0.1199), dec!(0.12), dec!(0.1201), dec!(1), dec!(250)];
        let leg_costs = [
            LegCosts::default(),
            costs(),
            LegCosts::new(dec!(0.0015), dec!(0.0026)),
        ];

        for buy in leg_costs {
            for sell in leg_costs {
                for window in prices.windows(2) {
                    let (low, high) = (window[0], window[1]);
                    for fixed in prices {
                        let net = |b, s| FeeCalculator::net_profitability(b, s, buy, sell).unwrap();

                        assert!(net(fixed, high) > net(fixed, low), "increasing in sell price");
                        assert!(net(high, fixed) < net(low, fixed), "decreasing in buy price");
                    }
                }
            }
        }
    }

    #[test]
    fn test_required_quote_balance() {
        // 100 KAS at 0.12 with 1% headroom
        let required = FeeCalculator::required_quote_balance(dec!(100), dec!(0.12), dec!(0.01));
        assert_eq!(required, dec!(12.12));
    }

    #[test]
    fn test_expected_profit() {
        let profit = FeeCalculator::expected_profit(dec!(100), dec!(0.12), dec!(0.01));
        assert_eq!(profit, dec!(0.12));
    }
}

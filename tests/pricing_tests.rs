//! Black-Scholes pricing properties.

mod support;

use optedge::domain::option::OptionSide;
use optedge::domain::pricing::{norm_cdf, price_chain, price_quote, theoretical_price};
use optedge::testkit::domain::{chain, quote, quote_builder};
use support::assertions::assert_near;

#[test]
fn at_the_money_year_prices_within_expected_bands() {
    for spot in [50.0, 100.0, 250.0] {
        let call = theoretical_price(spot, spot, 1.0, 0.05, 0.2, OptionSide::Call).unwrap();
        let put = theoretical_price(spot, spot, 1.0, 0.05, 0.2, OptionSide::Put).unwrap();
        let scale = spot / 100.0;

        assert!((10.0 * scale..=11.0 * scale).contains(&call), "call {call}");
        assert!((5.0 * scale..=6.0 * scale).contains(&put), "put {put}");
        assert_near(call - put, spot - spot * (-0.05_f64).exp(), 1e-9);
    }
}

#[test]
fn put_call_parity_holds_across_strikes() {
    let (spot, years, rate, sigma) = (100.0, 0.5, 0.03, 0.35);
    for strike in [60.0, 90.0, 100.0, 110.0, 160.0] {
        let call = theoretical_price(spot, strike, years, rate, sigma, OptionSide::Call).unwrap();
        let put = theoretical_price(spot, strike, years, rate, sigma, OptionSide::Put).unwrap();
        assert_near(call - put, spot - strike * (-rate * years).exp(), 1e-9);
    }
}

#[test]
fn out_of_domain_inputs_are_undefined_for_both_sides() {
    let cases = [
        (100.0, 100.0, 0.0, 0.2),
        (100.0, 100.0, -1.0, 0.2),
        (100.0, 100.0, 1.0, 0.0),
        (100.0, 100.0, 1.0, -0.2),
        (0.0, 100.0, 1.0, 0.2),
        (-5.0, 100.0, 1.0, 0.2),
        (100.0, 0.0, 1.0, 0.2),
        (100.0, -1.0, 1.0, 0.2),
        (f64::NAN, 100.0, 1.0, 0.2),
        (100.0, 100.0, f64::NAN, 0.2),
    ];
    for (spot, strike, years, sigma) in cases {
        for side in [OptionSide::Call, OptionSide::Put] {
            assert_eq!(
                theoretical_price(spot, strike, years, 0.05, sigma, side),
                None,
                "S={spot} K={strike} T={years} sigma={sigma} {side:?}"
            );
        }
    }
}

#[test]
fn normal_cdf_is_symmetric_and_accurate() {
    assert_near(norm_cdf(0.0), 0.5, 1e-15);
    assert_near(norm_cdf(1.96), 0.975_002_104_851_780, 1e-9);
    for x in [-8.0, -3.0, -0.5, 0.25, 2.0, 8.0] {
        assert_near(norm_cdf(x) + norm_cdf(-x), 1.0, 1e-12);
    }
}

#[test]
fn price_quote_reports_gap_against_mid() {
    let contract = quote("SPY", OptionSide::Call, 100.0, 4.0, 4.4);
    let priced = price_quote(&contract, 100.0, 0.045, 5.0, 0.01);

    let theo = priced.theo_price.unwrap();
    assert_near(priced.pricing_gap.unwrap(), 4.2 - theo, 1e-12);
    assert_near(priced.pricing_gap_pct.unwrap(), (4.2 - theo) / theo, 1e-12);
}

#[test]
fn unusable_volatility_leaves_gap_undefined() {
    for iv in [None, Some(0.0), Some(5.0), Some(12.0)] {
        let contract = quote_builder("SPY", OptionSide::Put, 100.0)
            .bid(3.0)
            .ask(3.2)
            .implied_volatility(iv)
            .build()
            .unwrap();
        let priced = price_quote(&contract, 100.0, 0.045, 5.0, 0.01);
        assert_eq!(priced.theo_price, None, "iv {iv:?}");
        assert_eq!(priced.pricing_gap, None);
        assert_eq!(priced.pricing_gap_pct, None);
    }
}

#[test]
fn price_chain_preserves_order() {
    let quotes = chain("QQQ", 400.0, 0.045, 0.1);
    let priced = price_chain(&quotes, 400.0, 0.045, 5.0, 0.01);

    assert_eq!(priced.len(), quotes.len());
    for (p, q) in priced.iter().zip(&quotes) {
        assert_eq!(&p.quote, q);
        let pct = p.pricing_gap_pct.unwrap();
        assert!(pct > 0.0, "expected quotes above model value, got {pct}");
    }
}

use mapato::models::{
    BuyRange, Confidence, Config, RiskControls, Sector, StockPick, ValuationMetrics,
};

/// A well-formed pick with passable but unremarkable figures. Tests
/// adjust the fields they care about.
pub fn sample_pick(symbol: &str, sector: Sector) -> StockPick {
    StockPick {
        symbol: symbol.to_string(),
        sector,
        current_price: 25.0,
        price_change_pct: Some(0.5),
        quality_pass: true,
        valuation: ValuationMetrics {
            pe: 10.0,
            pb: 1.5,
            div_yield_pct: 5.0,
        },
        buy_range_kes: BuyRange { low: 20.0, high: 27.0 },
        position_size_pct: 5.0,
        risk_controls: RiskControls {
            stop_kes: 18.0,
            max_drawdown_pct: 12.0,
        },
        fair_value_target_kes: 32.0,
        catalysts: vec!["Earnings release".to_string()],
        confidence: Confidence {
            score: 75.0,
            explanation: "Steady fundamentals".to_string(),
        },
        notes: "Test pick".to_string(),
        news_headline: None,
        recent_sentiment: None,
        technicals: None,
    }
}

/// A pick that maxes out every sub-score: quality pass, deep value
/// gate satisfied, full confidence and saturated catalysts.
pub fn strong_pick(symbol: &str, sector: Sector) -> StockPick {
    let mut pick = sample_pick(symbol, sector);
    pick.valuation.pe = 4.0;
    pick.valuation.pb = 0.8;
    pick.confidence.score = 100.0;
    pick.catalysts = vec![
        "Dividend announcement".to_string(),
        "Regulatory approval".to_string(),
        "Capacity expansion".to_string(),
        "Buyback programme".to_string(),
    ];
    pick
}

/// Config pointed at a test server instead of the live endpoint.
pub fn test_config(base_url: &str) -> Config {
    Config {
        gemini_api_key: "test-key".to_string(),
        gemini_base_url: base_url.to_string(),
        gemini_model: "gemini-3-flash-preview".to_string(),
        request_timeout_secs: 5,
    }
}

use chrono::NaiveDate;
use tracing::warn;

use crate::models::*;
use crate::scoring::SectorWeightTable;

/// Explicit, constructed data source for the report and weight table.
///
/// Views and the query layer take this by reference instead of reaching
/// for module-level globals, so tests can hand in doctored reports and a
/// future live feed only has to produce a `Report`.
pub struct ReportRepository {
    report: Report,
    weights: SectorWeightTable,
}

impl ReportRepository {
    /// Wrap a report and weight table, logging a warning for every seed
    /// value that is outside its documented contract. The data is kept
    /// as-is; scoring reproduces the original behavior on bad inputs.
    pub fn new(report: Report, weights: SectorWeightTable) -> Self {
        for issue in validation_issues(&report) {
            warn!("report validation: {}", issue);
        }
        Self { report, weights }
    }

    /// Repository over the compiled-in NSE research report.
    pub fn with_seed_data() -> Self {
        Self::new(seed_report(), SectorWeightTable::default_nse())
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    pub fn picks(&self) -> &[StockPick] {
        &self.report.picks
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.report.alerts
    }

    pub fn yearly_picks(&self) -> &[YearlyPick] {
        &self.report.yearly_picks
    }

    pub fn portfolio_mode(&self, kind: PortfolioModeKind) -> Option<&PortfolioMode> {
        self.report.portfolio_modes.iter().find(|m| m.kind == kind)
    }

    pub fn weights(&self) -> &SectorWeightTable {
        &self.weights
    }
}

/// Out-of-contract seed values worth flagging: confidence outside 0-100
/// and portfolio allocations that do not sum to 100%. Flagged, never
/// repaired.
pub fn validation_issues(report: &Report) -> Vec<String> {
    let mut issues = Vec::new();

    for pick in &report.picks {
        if !(0.0..=100.0).contains(&pick.confidence.score) {
            issues.push(format!(
                "{}: confidence score {} outside 0-100",
                pick.symbol, pick.confidence.score
            ));
        }
    }

    for mode in &report.portfolio_modes {
        let total: f64 = mode.allocation.iter().map(|a| a.weight_pct).sum();
        if (total - 100.0).abs() > 0.01 {
            issues.push(format!(
                "{} portfolio allocations sum to {:.1}% instead of 100%",
                mode.kind.label(),
                total
            ));
        }
    }

    issues
}

/// The compiled-in NSE research report. Static seed data; a production
/// deployment would refresh this from a live feed.
pub fn seed_report() -> Report {
    Report {
        as_of: NaiveDate::from_ymd_opt(2026, 8, 28).expect("valid seed date"),
        market_snapshot: MarketSnapshot {
            indices: vec![
                IndexQuote { name: "NSE All Share".to_string(), value: 104.5, change_pct: 0.8 },
                IndexQuote { name: "NSE 20".to_string(), value: 1620.4, change_pct: -0.2 },
            ],
            sectors: vec![
                SectorSnapshot { name: "Finance".to_string(), market_cap_kes: 450_000_000_000.0, div_yield_pct: 8.5 },
                SectorSnapshot { name: "Telecom".to_string(), market_cap_kes: 650_000_000_000.0, div_yield_pct: 4.2 },
                SectorSnapshot { name: "Utilities".to_string(), market_cap_kes: 120_000_000_000.0, div_yield_pct: 12.1 },
                SectorSnapshot { name: "Manufacturing".to_string(), market_cap_kes: 180_000_000_000.0, div_yield_pct: 9.3 },
            ],
        },
        picks: seed_picks(),
        yearly_picks: vec![YearlyPick {
            symbol: "COOP".to_string(),
            thesis: InvestmentThesis {
                fundamentals: "Strong cooperative backbone".to_string(),
                dividend_policy: "Stable payouts".to_string(),
                re_rating_path: "Credit growth recovery".to_string(),
            },
            role: "Core".to_string(),
            risk_summary: "Macro-economic headwinds impacting credit quality".to_string(),
            monitoring: Monitoring {
                events: vec!["earnings".to_string(), "policy".to_string()],
                review_cycle: "quarterly".to_string(),
            },
        }],
        sector_rotation: vec![
            SectorRotation {
                sector: "Finance".to_string(),
                signal: "Improving Breadth".to_string(),
                action: "Overweight".to_string(),
                evidence: "Banks showing resilient NIM despite inflation.".to_string(),
            },
            SectorRotation {
                sector: "Utilities".to_string(),
                signal: "Policy Shift".to_string(),
                action: "Equal-weight".to_string(),
                evidence: "Regulatory updates favoring grid modernization.".to_string(),
            },
        ],
        portfolio_modes: vec![
            PortfolioMode {
                kind: PortfolioModeKind::Standard,
                allocation: vec![
                    Allocation { symbol: "EQTY".to_string(), weight_pct: 15.0 },
                    Allocation { symbol: "SCOM".to_string(), weight_pct: 20.0 },
                    Allocation { symbol: "KCB".to_string(), weight_pct: 10.0 },
                    Allocation { symbol: "BAT".to_string(), weight_pct: 10.0 },
                    Allocation { symbol: "COOP".to_string(), weight_pct: 10.0 },
                ],
                notes: None,
                var_95_pct: None,
            },
            PortfolioMode {
                kind: PortfolioModeKind::LowRisk,
                allocation: vec![
                    Allocation { symbol: "BAT".to_string(), weight_pct: 15.0 },
                    Allocation { symbol: "KEGN".to_string(), weight_pct: 12.0 },
                    Allocation { symbol: "COOP".to_string(), weight_pct: 12.0 },
                    Allocation { symbol: "SCBK".to_string(), weight_pct: 15.0 },
                ],
                notes: Some(
                    "Kuza-style constraints: Max 8% per stock, focus on dividend yield > 10%."
                        .to_string(),
                ),
                var_95_pct: None,
            },
            PortfolioMode {
                kind: PortfolioModeKind::Opportunistic,
                allocation: vec![
                    Allocation { symbol: "KPLC".to_string(), weight_pct: 15.0 },
                    Allocation { symbol: "NCBA".to_string(), weight_pct: 12.0 },
                    Allocation { symbol: "SCOM".to_string(), weight_pct: 25.0 },
                ],
                notes: None,
                var_95_pct: Some(4.5),
            },
        ],
        alerts: seed_alerts(),
        audit: AuditInfo {
            data_sources: vec![
                "NSE".to_string(),
                "TradingView".to_string(),
                "Internal Analytics".to_string(),
            ],
            market_cap_kes: 1_850_000_000_000.0,
            market_pe: 7.2,
            changes_vs_prior: vec![
                "Added KPLC due to valuation trigger".to_string(),
                "Reduced SCOM weight".to_string(),
            ],
            assumptions: vec!["No guarantees; educational use only".to_string()],
        },
    }
}

fn seed_picks() -> Vec<StockPick> {
    vec![
        StockPick {
            symbol: "KPLC".to_string(),
            sector: Sector::Utilities,
            current_price: 1.85,
            price_change_pct: Some(2.8),
            quality_pass: true,
            valuation: ValuationMetrics { pe: 2.1, pb: 0.2, div_yield_pct: 0.0 },
            buy_range_kes: BuyRange { low: 1.5, high: 1.9 },
            position_size_pct: 8.0,
            risk_controls: RiskControls { stop_kes: 1.4, max_drawdown_pct: 15.0 },
            fair_value_target_kes: 3.5,
            catalysts: vec![
                "Debt restructuring".to_string(),
                "Tariff review success".to_string(),
                "Improved hydrology".to_string(),
            ],
            confidence: Confidence {
                score: 82.0,
                explanation: "Deep value play with significant margin of safety on PB basis."
                    .to_string(),
            },
            notes: "Nyoro-style accumulation rationale: Extreme undervaluation vs book value."
                .to_string(),
            news_headline: Some("Kenya Power returns to profitability on tariff adjustment".to_string()),
            recent_sentiment: Some(Sentiment::Positive),
            technicals: Some(TechnicalIndicators {
                rsi: 58.0,
                macd: MacdSignal::Bullish,
                volume_24h: 4_200_000,
                trend: TrendDirection::Up,
            }),
        },
        StockPick {
            symbol: "EQTY".to_string(),
            sector: Sector::Finance,
            current_price: 44.50,
            price_change_pct: Some(1.2),
            quality_pass: true,
            valuation: ValuationMetrics { pe: 4.5, pb: 0.9, div_yield_pct: 8.9 },
            buy_range_kes: BuyRange { low: 38.0, high: 45.0 },
            position_size_pct: 12.0,
            risk_controls: RiskControls { stop_kes: 35.0, max_drawdown_pct: 10.0 },
            fair_value_target_kes: 58.0,
            catalysts: vec![
                "Regional expansion".to_string(),
                "Interest rate cap removal tailwinds".to_string(),
                "High dividend payout".to_string(),
            ],
            confidence: Confidence {
                score: 91.0,
                explanation: "Consistent ROE outperformer with solid regional diversification."
                    .to_string(),
            },
            notes: "Core holding for high-yield portfolio.".to_string(),
            news_headline: Some("Equity Group lifts interim dividend on record half-year profit".to_string()),
            recent_sentiment: Some(Sentiment::Positive),
            technicals: Some(TechnicalIndicators {
                rsi: 62.0,
                macd: MacdSignal::Bullish,
                volume_24h: 7_800_000,
                trend: TrendDirection::Up,
            }),
        },
        StockPick {
            symbol: "KCB".to_string(),
            sector: Sector::Finance,
            current_price: 38.10,
            price_change_pct: Some(-0.5),
            quality_pass: true,
            valuation: ValuationMetrics { pe: 3.8, pb: 0.8, div_yield_pct: 7.5 },
            buy_range_kes: BuyRange { low: 33.0, high: 39.0 },
            position_size_pct: 8.0,
            risk_controls: RiskControls { stop_kes: 30.0, max_drawdown_pct: 12.0 },
            fair_value_target_kes: 50.0,
            catalysts: vec![
                "NPL ratio normalization".to_string(),
                "DRC subsidiary earnings".to_string(),
            ],
            confidence: Confidence {
                score: 78.0,
                explanation: "Cheapest large bank on book value; asset quality still healing."
                    .to_string(),
            },
            notes: "Secondary bank exposure behind EQTY.".to_string(),
            news_headline: None,
            recent_sentiment: Some(Sentiment::Neutral),
            technicals: None,
        },
        StockPick {
            symbol: "SCOM".to_string(),
            sector: Sector::Telecommunication,
            current_price: 15.20,
            price_change_pct: Some(0.7),
            quality_pass: true,
            valuation: ValuationMetrics { pe: 11.2, pb: 4.5, div_yield_pct: 5.8 },
            buy_range_kes: BuyRange { low: 13.5, high: 16.0 },
            position_size_pct: 15.0,
            risk_controls: RiskControls { stop_kes: 12.0, max_drawdown_pct: 12.0 },
            fair_value_target_kes: 22.0,
            catalysts: vec![
                "Ethiopia operations break-even".to_string(),
                "M-Pesa growth acceleration".to_string(),
            ],
            confidence: Confidence {
                score: 75.0,
                explanation: "Momentum play contingent on Ethiopia stabilization.".to_string(),
            },
            notes: "Accumulate on dips below 14.0.".to_string(),
            news_headline: Some("Safaricom Ethiopia narrows losses as subscriber base doubles".to_string()),
            recent_sentiment: Some(Sentiment::Positive),
            technicals: Some(TechnicalIndicators {
                rsi: 55.0,
                macd: MacdSignal::Flat,
                volume_24h: 21_500_000,
                trend: TrendDirection::Sideways,
            }),
        },
        StockPick {
            symbol: "KUKZ".to_string(),
            sector: Sector::Agriculture,
            current_price: 385.0,
            price_change_pct: Some(0.0),
            quality_pass: true,
            valuation: ValuationMetrics { pe: 9.1, pb: 1.4, div_yield_pct: 6.2 },
            buy_range_kes: BuyRange { low: 350.0, high: 400.0 },
            position_size_pct: 5.0,
            risk_controls: RiskControls { stop_kes: 320.0, max_drawdown_pct: 15.0 },
            fair_value_target_kes: 470.0,
            catalysts: vec![
                "Avocado export season".to_string(),
                "Macadamia price recovery".to_string(),
            ],
            confidence: Confidence {
                score: 68.0,
                explanation: "Export earner with forex hedge characteristics; illiquid counter."
                    .to_string(),
            },
            notes: "Position sizing capped by thin order book.".to_string(),
            news_headline: None,
            recent_sentiment: Some(Sentiment::Neutral),
            technicals: None,
        },
        StockPick {
            symbol: "BAT".to_string(),
            sector: Sector::Manufacturing,
            current_price: 360.0,
            price_change_pct: Some(-1.1),
            quality_pass: true,
            valuation: ValuationMetrics { pe: 7.4, pb: 2.8, div_yield_pct: 13.1 },
            buy_range_kes: BuyRange { low: 330.0, high: 375.0 },
            position_size_pct: 7.0,
            risk_controls: RiskControls { stop_kes: 300.0, max_drawdown_pct: 10.0 },
            fair_value_target_kes: 430.0,
            catalysts: vec!["Excise stability".to_string()],
            confidence: Confidence {
                score: 71.0,
                explanation: "Dividend anchor; volume pressure offset by pricing power.".to_string(),
            },
            notes: "Held for yield, not re-rating.".to_string(),
            news_headline: None,
            recent_sentiment: Some(Sentiment::Neutral),
            technicals: None,
        },
        StockPick {
            symbol: "FAHR".to_string(),
            sector: Sector::RealEstate,
            current_price: 6.10,
            price_change_pct: Some(0.3),
            quality_pass: false,
            valuation: ValuationMetrics { pe: 6.5, pb: 0.3, div_yield_pct: 10.8 },
            buy_range_kes: BuyRange { low: 5.5, high: 6.4 },
            position_size_pct: 4.0,
            risk_controls: RiskControls { stop_kes: 5.0, max_drawdown_pct: 18.0 },
            fair_value_target_kes: 9.0,
            catalysts: vec![
                "REIT framework review".to_string(),
                "Asset disposal at NAV".to_string(),
            ],
            confidence: Confidence {
                score: 54.0,
                explanation: "Deep NAV discount but structurally weak trading volumes.".to_string(),
            },
            notes: "Speculative NAV-discount closure play.".to_string(),
            news_headline: None,
            recent_sentiment: Some(Sentiment::Negative),
            technicals: None,
        },
        StockPick {
            symbol: "TOTL".to_string(),
            sector: Sector::EnergyAndPetroleum,
            current_price: 22.50,
            price_change_pct: Some(1.8),
            quality_pass: true,
            valuation: ValuationMetrics { pe: 5.9, pb: 0.9, div_yield_pct: 8.4 },
            buy_range_kes: BuyRange { low: 19.0, high: 23.0 },
            position_size_pct: 6.0,
            risk_controls: RiskControls { stop_kes: 17.0, max_drawdown_pct: 12.0 },
            fair_value_target_kes: 30.0,
            catalysts: vec![
                "Margin expansion from pricing formula".to_string(),
                "Special dividend potential".to_string(),
            ],
            confidence: Confidence {
                score: 73.0,
                explanation: "Cash-rich downstream distributor trading below book.".to_string(),
            },
            notes: "Low beta energy exposure.".to_string(),
            news_headline: None,
            recent_sentiment: Some(Sentiment::Positive),
            technicals: None,
        },
        StockPick {
            symbol: "CTUM".to_string(),
            sector: Sector::Investment,
            current_price: 9.80,
            price_change_pct: Some(-0.8),
            quality_pass: false,
            valuation: ValuationMetrics { pe: 12.4, pb: 0.2, div_yield_pct: 3.1 },
            buy_range_kes: BuyRange { low: 8.5, high: 10.5 },
            position_size_pct: 4.0,
            risk_controls: RiskControls { stop_kes: 7.5, max_drawdown_pct: 20.0 },
            fair_value_target_kes: 16.0,
            catalysts: vec![
                "Two Rivers exit".to_string(),
                "Share buyback program".to_string(),
                "Beverage stake monetization".to_string(),
            ],
            confidence: Confidence {
                score: 61.0,
                explanation: "Holding-company discount to NAV exceeds 70%; catalyst dependent."
                    .to_string(),
            },
            notes: "NAV realization story with patient capital horizon.".to_string(),
            news_headline: None,
            recent_sentiment: Some(Sentiment::Neutral),
            technicals: None,
        },
    ]
}

fn seed_alerts() -> Vec<Alert> {
    vec![
        Alert {
            kind: AlertKind::Buy,
            symbol: "KPLC".to_string(),
            sector: Sector::Utilities,
            message: "Price entered undervalued band (1.78). Stage 1 entry enabled.".to_string(),
            severity: Severity::Info,
            window: TimeWindow::Last24h,
        },
        Alert {
            kind: AlertKind::Exit,
            symbol: "SCOM".to_string(),
            sector: Sector::Telecommunication,
            message: "Nearing fair value (15.20). Consider 30% exit or trailing stops.".to_string(),
            severity: Severity::Warning,
            window: TimeWindow::Last24h,
        },
        Alert {
            kind: AlertKind::Fundamental,
            symbol: "KEGN".to_string(),
            sector: Sector::EnergyAndPetroleum,
            message: "Sector profitability under pressure due to forex losses.".to_string(),
            severity: Severity::Critical,
            window: TimeWindow::LastWeek,
        },
        Alert {
            kind: AlertKind::Dividend,
            symbol: "EQTY".to_string(),
            sector: Sector::Finance,
            message: "Books close for interim dividend KES 1.50 next Friday.".to_string(),
            severity: Severity::Info,
            window: TimeWindow::LastWeek,
        },
        Alert {
            kind: AlertKind::Fundamental,
            symbol: "FAHR".to_string(),
            sector: Sector::RealEstate,
            message: "Occupancy rates slipped below covenant threshold in quarterly filing.".to_string(),
            severity: Severity::Warning,
            window: TimeWindow::LastMonth,
        },
        Alert {
            kind: AlertKind::Dividend,
            symbol: "BAT".to_string(),
            sector: Sector::Manufacturing,
            message: "Final dividend KES 45.00 declared; yield above 13% at current price.".to_string(),
            severity: Severity::Info,
            window: TimeWindow::LastMonth,
        },
    ]
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// NSE industry classification used to key the sector weight table
/// and to group picks in sector views.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Sector {
    Finance,
    Utilities,
    Telecommunication,
    Agriculture,
    Manufacturing,
    RealEstate,
    EnergyAndPetroleum,
    Investment,
}

impl Sector {
    /// All variants, in the order sector views list them.
    pub const ALL: [Sector; 8] = [
        Sector::Finance,
        Sector::Utilities,
        Sector::Telecommunication,
        Sector::Agriculture,
        Sector::Manufacturing,
        Sector::RealEstate,
        Sector::EnergyAndPetroleum,
        Sector::Investment,
    ];

    /// Human-readable name shown in the UI and matched by search.
    pub fn display_name(&self) -> &'static str {
        match self {
            Sector::Finance => "Finance",
            Sector::Utilities => "Utilities",
            Sector::Telecommunication => "Telecommunication",
            Sector::Agriculture => "Agriculture",
            Sector::Manufacturing => "Manufacturing",
            Sector::RealEstate => "Real Estate",
            Sector::EnergyAndPetroleum => "Energy & Petroleum",
            Sector::Investment => "Investment",
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Per-sector blending weights for the four composite sub-scores.
/// Each row of the table must sum to 1.0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SectorWeights {
    pub quality: f64,
    pub valuation: f64,
    pub momentum: f64,
    pub catalysts: f64,
}

impl SectorWeights {
    pub fn sum(&self) -> f64 {
        self.quality + self.valuation + self.momentum + self.catalysts
    }
}

/// Valuation ratios for a pick
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ValuationMetrics {
    pub pe: f64,
    pub pb: f64,
    pub div_yield_pct: f64,
}

/// Suggested accumulation band in KES
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BuyRange {
    pub low: f64,
    pub high: f64,
}

/// Position risk parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RiskControls {
    pub stop_kes: f64,
    pub max_drawdown_pct: f64,
}

/// Externally supplied momentum proxy. The score is reused verbatim as
/// the momentum sub-score and is expected to be within 0-100; the
/// repository flags values outside that range at load time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Confidence {
    pub score: f64,
    pub explanation: String,
}

/// News tone classification for an enriched pick
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

/// MACD line position relative to signal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum MacdSignal {
    Bullish,
    Bearish,
    Flat,
}

/// Price trend direction enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum TrendDirection {
    Up,
    Down,
    Sideways,
}

/// Optional technical enrichment for a pick
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TechnicalIndicators {
    pub rsi: f64,
    pub macd: MacdSignal,
    pub volume_24h: i64,
    pub trend: TrendDirection,
}

/// A researched stock pick - the central entity of the report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockPick {
    pub symbol: String,
    pub sector: Sector,
    pub current_price: f64,
    pub price_change_pct: Option<f64>,
    pub quality_pass: bool,
    pub valuation: ValuationMetrics,
    pub buy_range_kes: BuyRange,
    pub position_size_pct: f64,
    pub risk_controls: RiskControls,
    pub fair_value_target_kes: f64,
    pub catalysts: Vec<String>,
    pub confidence: Confidence,
    pub notes: String,
    pub news_headline: Option<String>,
    pub recent_sentiment: Option<Sentiment>,
    pub technicals: Option<TechnicalIndicators>,
}

/// Portfolio deployment profile
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PortfolioModeKind {
    Standard,
    LowRisk,
    Opportunistic,
}

impl PortfolioModeKind {
    pub const ALL: [PortfolioModeKind; 3] = [
        PortfolioModeKind::Standard,
        PortfolioModeKind::LowRisk,
        PortfolioModeKind::Opportunistic,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PortfolioModeKind::Standard => "Standard",
            PortfolioModeKind::LowRisk => "Low Risk",
            PortfolioModeKind::Opportunistic => "Opportunistic",
        }
    }
}

/// One line of a portfolio allocation list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Allocation {
    pub symbol: String,
    pub weight_pct: f64,
}

/// A portfolio mode: ordered allocation list plus optional commentary
/// and risk constraints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortfolioMode {
    pub kind: PortfolioModeKind,
    pub allocation: Vec<Allocation>,
    pub notes: Option<String>,
    pub var_95_pct: Option<f64>,
}

/// Alert category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AlertKind {
    Buy,
    Exit,
    Fundamental,
    Dividend,
}

impl AlertKind {
    pub fn label(&self) -> &'static str {
        match self {
            AlertKind::Buy => "BUY",
            AlertKind::Exit => "EXIT",
            AlertKind::Fundamental => "FUNDAMENTAL",
            AlertKind::Dividend => "DIVIDEND",
        }
    }
}

/// Alert severity level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// Age bucket an alert is tagged with. Window filtering is nested:
/// a wider window admits everything a narrower one does.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum TimeWindow {
    Last24h,
    LastWeek,
    LastMonth,
}

impl TimeWindow {
    pub fn label(&self) -> &'static str {
        match self {
            TimeWindow::Last24h => "24h",
            TimeWindow::LastWeek => "1w",
            TimeWindow::LastMonth => "1m",
        }
    }
}

/// Ephemeral alert entry shown on the alert board. Not persisted;
/// regenerated from the seed lists on each render.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alert {
    pub kind: AlertKind,
    pub symbol: String,
    pub sector: Sector,
    pub message: String,
    pub severity: Severity,
    pub window: TimeWindow,
}

/// Three-legged investment thesis behind a yearly conviction pick
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvestmentThesis {
    pub fundamentals: String,
    pub dividend_policy: String,
    pub re_rating_path: String,
}

/// What to watch and how often for a yearly pick
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Monitoring {
    pub events: Vec<String>,
    pub review_cycle: String,
}

/// A conviction holding carried for the full year, with its thesis,
/// portfolio role and monitoring plan. Distinct from the tactical
/// `StockPick` list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YearlyPick {
    pub symbol: String,
    pub thesis: InvestmentThesis,
    pub role: String,
    pub risk_summary: String,
    pub monitoring: Monitoring,
}

/// Market index quote for the dashboard summary cards
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexQuote {
    pub name: String,
    pub value: f64,
    pub change_pct: f64,
}

/// Aggregate sector figures for the market overview
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectorSnapshot {
    pub name: String,
    pub market_cap_kes: f64,
    pub div_yield_pct: f64,
}

/// Index and sector aggregates rendered on the overview tab
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarketSnapshot {
    pub indices: Vec<IndexQuote>,
    pub sectors: Vec<SectorSnapshot>,
}

/// Sector rotation signal from the research desk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectorRotation {
    pub sector: String,
    pub signal: String,
    pub action: String,
    pub evidence: String,
}

/// Report provenance metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditInfo {
    pub data_sources: Vec<String>,
    pub market_cap_kes: f64,
    pub market_pe: f64,
    pub changes_vs_prior: Vec<String>,
    pub assumptions: Vec<String>,
}

/// The full compiled-in research report - the seed dataset every view
/// is rendered from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub as_of: NaiveDate,
    pub market_snapshot: MarketSnapshot,
    pub picks: Vec<StockPick>,
    pub yearly_picks: Vec<YearlyPick>,
    pub sector_rotation: Vec<SectorRotation>,
    pub portfolio_modes: Vec<PortfolioMode>,
    pub alerts: Vec<Alert>,
    pub audit: AuditInfo,
}

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_base_url: String,
    pub gemini_model: String,
    pub request_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Ok(Config {
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .map_err(|_| anyhow::anyhow!("GEMINI_API_KEY environment variable required"))?,
            gemini_base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string()),
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-3-flash-preview".to_string()),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
        })
    }
}

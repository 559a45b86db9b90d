use crate::models::{Alert, Sector, StockPick, TimeWindow};
use crate::scoring::{composite_score, SectorWeightTable};

/// Screener sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Symbol,
    Price,
    ChangePct,
    Score,
}

impl SortField {
    pub const ALL: [SortField; 4] = [
        SortField::Symbol,
        SortField::Price,
        SortField::ChangePct,
        SortField::Score,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SortField::Symbol => "Symbol",
            SortField::Price => "Price",
            SortField::ChangePct => "Change %",
            SortField::Score => "Score",
        }
    }
}

/// Screener sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// One display-ready screener table row
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenerRow {
    pub symbol: String,
    pub sector: Sector,
    pub price: f64,
    pub change_pct: Option<f64>,
    pub score: i32,
}

/// Partition picks by sector, in `Sector::ALL` order. Sectors with no
/// members are omitted entirely.
pub fn group_by_sector<'a>(picks: &'a [StockPick]) -> Vec<(Sector, Vec<&'a StockPick>)> {
    Sector::ALL
        .iter()
        .filter_map(|&sector| {
            let members: Vec<&StockPick> = picks.iter().filter(|p| p.sector == sector).collect();
            if members.is_empty() {
                None
            } else {
                Some((sector, members))
            }
        })
        .collect()
}

/// Highest-scoring pick within each non-empty sector group. Ties keep the
/// first-encountered pick (stable reduction).
pub fn top_pick_per_sector<'a>(
    picks: &'a [StockPick],
    table: &SectorWeightTable,
) -> Vec<(Sector, &'a StockPick, i32)> {
    group_by_sector(picks)
        .into_iter()
        .map(|(sector, members)| {
            let mut best = members[0];
            let mut best_score = composite_score(best, table);
            for pick in &members[1..] {
                let score = composite_score(pick, table);
                if score > best_score {
                    best = pick;
                    best_score = score;
                }
            }
            (sector, best, best_score)
        })
        .collect()
}

/// Case-insensitive substring match against the ticker symbol or the
/// sector display name. An empty query matches everything.
pub fn search<'a>(picks: &'a [StockPick], query: &str) -> Vec<&'a StockPick> {
    let needle = query.to_lowercase();
    picks
        .iter()
        .filter(|p| {
            needle.is_empty()
                || p.symbol.to_lowercase().contains(&needle)
                || p.sector.display_name().to_lowercase().contains(&needle)
        })
        .collect()
}

/// Build unsorted screener rows for a set of picks.
pub fn screener_rows(picks: &[StockPick], table: &SectorWeightTable) -> Vec<ScreenerRow> {
    picks
        .iter()
        .map(|p| ScreenerRow {
            symbol: p.symbol.clone(),
            sector: p.sector,
            price: p.current_price,
            change_pct: p.price_change_pct,
            score: composite_score(p, table),
        })
        .collect()
}

/// Stable sort of screener rows by the selected field and direction.
/// Rows without a change figure sort as 0% for the change column.
pub fn sort_rows(rows: &mut [ScreenerRow], field: SortField, direction: SortDirection) {
    rows.sort_by(|a, b| {
        let ordering = match field {
            SortField::Symbol => a.symbol.cmp(&b.symbol),
            SortField::Price => a.price.total_cmp(&b.price),
            SortField::ChangePct => a
                .change_pct
                .unwrap_or(0.0)
                .total_cmp(&b.change_pct.unwrap_or(0.0)),
            SortField::Score => a.score.cmp(&b.score),
        };
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

/// Alerts admitted by the selected time window. Windows nest: 24h is a
/// subset of 1w, which is a subset of 1m.
pub fn filter_alerts<'a>(alerts: &'a [Alert], window: TimeWindow) -> Vec<&'a Alert> {
    alerts.iter().filter(|a| a.window <= window).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AlertKind, BuyRange, Confidence, RiskControls, Severity, ValuationMetrics,
    };

    fn pick(symbol: &str, sector: Sector, confidence: f64) -> StockPick {
        StockPick {
            symbol: symbol.to_string(),
            sector,
            current_price: 20.0,
            price_change_pct: Some(1.0),
            quality_pass: true,
            valuation: ValuationMetrics { pe: 10.0, pb: 2.0, div_yield_pct: 4.0 },
            buy_range_kes: BuyRange { low: 15.0, high: 22.0 },
            position_size_pct: 5.0,
            risk_controls: RiskControls { stop_kes: 12.0, max_drawdown_pct: 10.0 },
            fair_value_target_kes: 28.0,
            catalysts: vec!["event".to_string()],
            confidence: Confidence { score: confidence, explanation: String::new() },
            notes: String::new(),
            news_headline: None,
            recent_sentiment: None,
            technicals: None,
        }
    }

    fn alert(symbol: &str, window: TimeWindow) -> Alert {
        Alert {
            kind: AlertKind::Buy,
            symbol: symbol.to_string(),
            sector: Sector::Finance,
            message: String::new(),
            severity: Severity::Info,
            window,
        }
    }

    #[test]
    fn test_grouping_omits_empty_sectors() {
        let picks = vec![pick("EQTY", Sector::Finance, 80.0), pick("SCOM", Sector::Telecommunication, 70.0)];
        let groups = group_by_sector(&picks);
        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|(_, members)| !members.is_empty()));
    }

    #[test]
    fn test_top_pick_is_maximal_and_stable() {
        let picks = vec![
            pick("KCB", Sector::Finance, 60.0),
            pick("EQTY", Sector::Finance, 90.0),
            pick("COOP", Sector::Finance, 90.0), // same score as EQTY
        ];
        let table = SectorWeightTable::default_nse();
        let tops = top_pick_per_sector(&picks, &table);
        assert_eq!(tops.len(), 1);
        let (_, best, best_score) = &tops[0];
        // First-encountered wins the tie.
        assert_eq!(best.symbol, "EQTY");
        for p in &picks {
            assert!(*best_score >= composite_score(p, &table));
        }
    }

    #[test]
    fn test_search_is_case_insensitive_over_symbol_and_sector() {
        let picks = vec![pick("EQTY", Sector::Finance, 80.0), pick("SCOM", Sector::Telecommunication, 70.0)];
        assert_eq!(search(&picks, "eqty").len(), 1);
        assert_eq!(search(&picks, "TELECOM").len(), 1);
        assert_eq!(search(&picks, "").len(), 2);
        assert!(search(&picks, "zzz").is_empty());
    }

    #[test]
    fn test_sort_toggle_reverses_order() {
        let picks = vec![pick("B", Sector::Finance, 80.0), pick("A", Sector::Finance, 70.0)];
        let table = SectorWeightTable::default_nse();
        let mut rows = screener_rows(&picks, &table);

        sort_rows(&mut rows, SortField::Symbol, SortDirection::Ascending);
        assert_eq!(rows[0].symbol, "A");
        sort_rows(&mut rows, SortField::Symbol, SortDirection::Descending);
        assert_eq!(rows[0].symbol, "B");
    }

    #[test]
    fn test_alert_windows_are_nested() {
        let alerts = vec![
            alert("KPLC", TimeWindow::Last24h),
            alert("SCOM", TimeWindow::LastWeek),
            alert("EQTY", TimeWindow::LastMonth),
        ];
        let day = filter_alerts(&alerts, TimeWindow::Last24h);
        let week = filter_alerts(&alerts, TimeWindow::LastWeek);
        let month = filter_alerts(&alerts, TimeWindow::LastMonth);

        assert_eq!(day.len(), 1);
        assert_eq!(week.len(), 2);
        assert_eq!(month.len(), 3);
        assert!(day.iter().all(|a| week.contains(a)));
        assert!(week.iter().all(|a| month.contains(a)));
    }
}

use pretty_assertions::assert_eq;

use mapato::models::{Alert, AlertKind, Sector, Severity, TimeWindow};
use mapato::query::{
    self, filter_alerts, group_by_sector, search, sort_rows, top_pick_per_sector, SortDirection,
    SortField,
};
use mapato::scoring::SectorWeightTable;

use crate::common::{sample_pick, strong_pick};

fn alert(symbol: &str, window: TimeWindow) -> Alert {
    Alert {
        kind: AlertKind::Buy,
        symbol: symbol.to_string(),
        sector: Sector::Finance,
        message: "test".to_string(),
        severity: Severity::Info,
        window,
    }
}

#[test]
fn grouping_follows_canonical_sector_order() {
    // Deliberately out of order on input.
    let picks = vec![
        sample_pick("SCOM", Sector::Telecommunication),
        sample_pick("EQTY", Sector::Finance),
        sample_pick("KPLC", Sector::Utilities),
    ];
    let groups = group_by_sector(&picks);
    let sectors: Vec<Sector> = groups.iter().map(|(s, _)| *s).collect();
    assert_eq!(
        sectors,
        vec![Sector::Finance, Sector::Utilities, Sector::Telecommunication]
    );
}

#[test]
fn grouping_preserves_input_order_within_a_sector() {
    let picks = vec![
        sample_pick("KCB", Sector::Finance),
        sample_pick("EQTY", Sector::Finance),
        sample_pick("COOP", Sector::Finance),
    ];
    let groups = group_by_sector(&picks);
    let symbols: Vec<&str> = groups[0].1.iter().map(|p| p.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["KCB", "EQTY", "COOP"]);
}

#[test]
fn top_pick_tie_goes_to_first_encountered() {
    let picks = vec![
        sample_pick("KCB", Sector::Finance),
        strong_pick("EQTY", Sector::Finance),
        strong_pick("COOP", Sector::Finance),
    ];
    let table = SectorWeightTable::default_nse();
    let tops = top_pick_per_sector(&picks, &table);
    assert_eq!(tops.len(), 1);
    assert_eq!(tops[0].1.symbol, "EQTY");
}

#[test]
fn search_matches_symbol_and_sector_name() {
    let picks = vec![
        sample_pick("EQTY", Sector::Finance),
        sample_pick("KPLC", Sector::Utilities),
    ];
    assert_eq!(search(&picks, "eq").len(), 1);
    assert_eq!(search(&picks, "UTIL").len(), 1);
    assert_eq!(search(&picks, "").len(), 2);
    assert!(search(&picks, "xyz").is_empty());
}

#[test]
fn sort_by_score_then_toggle_direction() {
    let picks = vec![
        sample_pick("KCB", Sector::Finance),
        strong_pick("EQTY", Sector::Finance),
    ];
    let table = SectorWeightTable::default_nse();
    let mut rows = query::screener_rows(&picks, &table);

    sort_rows(&mut rows, SortField::Score, SortDirection::Descending);
    assert_eq!(rows[0].symbol, "EQTY");

    sort_rows(&mut rows, SortField::Score, SortDirection::Ascending);
    assert_eq!(rows[0].symbol, "KCB");
}

#[test]
fn equal_keys_keep_relative_order() {
    // Same score, so a stable sort must not reorder them.
    let picks = vec![
        sample_pick("ZZZZ", Sector::Finance),
        sample_pick("AAAA", Sector::Finance),
    ];
    let table = SectorWeightTable::default_nse();
    let mut rows = query::screener_rows(&picks, &table);
    sort_rows(&mut rows, SortField::Score, SortDirection::Descending);
    assert_eq!(rows[0].symbol, "ZZZZ");
    assert_eq!(rows[1].symbol, "AAAA");
}

#[test]
fn missing_change_sorts_as_zero() {
    let mut flat = sample_pick("FLAT", Sector::Finance);
    flat.price_change_pct = None;
    let mut down = sample_pick("DOWN", Sector::Finance);
    down.price_change_pct = Some(-2.0);
    let picks = vec![flat, down];

    let table = SectorWeightTable::default_nse();
    let mut rows = query::screener_rows(&picks, &table);
    sort_rows(&mut rows, SortField::ChangePct, SortDirection::Descending);
    assert_eq!(rows[0].symbol, "FLAT");
}

#[test]
fn alert_windows_nest() {
    let alerts = vec![
        alert("A", TimeWindow::Last24h),
        alert("B", TimeWindow::LastWeek),
        alert("C", TimeWindow::LastMonth),
    ];
    assert_eq!(filter_alerts(&alerts, TimeWindow::Last24h).len(), 1);
    assert_eq!(filter_alerts(&alerts, TimeWindow::LastWeek).len(), 2);
    assert_eq!(filter_alerts(&alerts, TimeWindow::LastMonth).len(), 3);
}

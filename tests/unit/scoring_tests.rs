use pretty_assertions::assert_eq;

use mapato::models::{Sector, SectorWeights};
use mapato::scoring::{composite_score, score_breakdown, SectorWeightTable};

use crate::common::{sample_pick, strong_pick};

#[test]
fn finance_pick_scores_weighted_blend() {
    // quality 90, valuation 95 (PE < 8 and PB < 1), momentum 82,
    // catalysts 3 * 25 = 75, blended with Finance weights
    // .40/.30/.15/.15 = 88.05, rounded to 88.
    let mut pick = sample_pick("EQTY", Sector::Finance);
    pick.valuation.pe = 6.0;
    pick.valuation.pb = 0.9;
    pick.confidence.score = 82.0;
    pick.catalysts = vec!["a".into(), "b".into(), "c".into()];

    let table = SectorWeightTable::default_nse();
    assert_eq!(composite_score(&pick, &table), 88);
}

#[test]
fn valuation_gate_requires_both_ratios() {
    let table = SectorWeightTable::default_nse();

    let mut cheap_pe_only = sample_pick("KCB", Sector::Finance);
    cheap_pe_only.valuation.pe = 6.0;
    cheap_pe_only.valuation.pb = 1.4;
    assert_eq!(score_breakdown(&cheap_pe_only, &table).valuation, 60.0);

    let mut cheap_pb_only = sample_pick("COOP", Sector::Finance);
    cheap_pb_only.valuation.pe = 12.0;
    cheap_pb_only.valuation.pb = 0.7;
    assert_eq!(score_breakdown(&cheap_pb_only, &table).valuation, 60.0);

    let mut deep_value = sample_pick("HFCK", Sector::Finance);
    deep_value.valuation.pe = 6.0;
    deep_value.valuation.pb = 0.7;
    assert_eq!(score_breakdown(&deep_value, &table).valuation, 95.0);
}

#[test]
fn quality_fail_drops_sub_score_to_floor() {
    let table = SectorWeightTable::default_nse();
    let mut pick = sample_pick("FAHR", Sector::RealEstate);
    pick.quality_pass = false;
    assert_eq!(score_breakdown(&pick, &table).quality, 40.0);
}

#[test]
fn catalysts_saturate_at_four() {
    let table = SectorWeightTable::default_nse();
    let four = strong_pick("KPLC", Sector::Utilities);
    let mut five = four.clone();
    five.catalysts.push("One more".to_string());
    assert_eq!(
        composite_score(&four, &table),
        composite_score(&five, &table)
    );
    assert_eq!(score_breakdown(&four, &table).catalysts, 100.0);
}

#[test]
fn momentum_carries_confidence_verbatim() {
    let table = SectorWeightTable::default_nse();
    let mut pick = sample_pick("SCOM", Sector::Telecommunication);
    pick.confidence.score = 140.0; // out of range, deliberately not clamped
    assert_eq!(score_breakdown(&pick, &table).momentum, 140.0);
}

#[test]
fn sector_missing_from_table_scores_zero() {
    let table = SectorWeightTable::new(vec![(
        Sector::Finance,
        SectorWeights {
            quality: 0.4,
            valuation: 0.3,
            momentum: 0.15,
            catalysts: 0.15,
        },
    )])
    .unwrap();

    let pick = strong_pick("KUKZ", Sector::Agriculture);
    assert_eq!(composite_score(&pick, &table), 0);

    let breakdown = score_breakdown(&pick, &table);
    assert_eq!(breakdown.composite, 0);
    assert_eq!(breakdown.quality, 0.0);
}

#[test]
fn unbalanced_weight_row_is_rejected() {
    let result = SectorWeightTable::new(vec![(
        Sector::Finance,
        SectorWeights {
            quality: 0.5,
            valuation: 0.3,
            momentum: 0.15,
            catalysts: 0.15,
        },
    )]);
    assert!(result.is_err());
}

#[test]
fn default_table_covers_every_sector() {
    let table = SectorWeightTable::default_nse();
    for sector in Sector::ALL {
        assert!(table.get(sector).is_some(), "missing weights for {}", sector);
    }
}

#[test]
fn scoring_is_deterministic() {
    let table = SectorWeightTable::default_nse();
    let pick = sample_pick("BAT", Sector::Manufacturing);
    let first = composite_score(&pick, &table);
    for _ in 0..10 {
        assert_eq!(composite_score(&pick, &table), first);
    }
}

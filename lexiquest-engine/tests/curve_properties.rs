use lexiquest_engine::level_curve::{LevelCurveConfig, generate, level_for_xp, level_progress};

fn config(total_xp: i64, max_level: u32, growth_rate: f64) -> LevelCurveConfig {
    LevelCurveConfig {
        total_xp,
        max_level,
        growth_rate,
    }
}

#[test]
fn exact_total_holds_across_config_sweep() {
    let totals = [1_000i64, 50_000, 1_000_000];
    let levels = [1u32, 5, 20, 100];
    let rates = [1.01f64, 1.06, 1.5, 2.0];

    for total in totals {
        for max_level in levels {
            for rate in rates {
                let cfg = config(total, max_level, rate);
                let rows = generate(&cfg).unwrap();
                assert_eq!(rows.len(), max_level as usize);

                let sum: i64 = rows.iter().map(|row| row.delta_xp).sum();
                assert_eq!(
                    sum, total,
                    "delta sum diverged for total={total} levels={max_level} rate={rate}"
                );
                assert_eq!(rows.last().unwrap().cumulative_xp, total);

                let mut running = 0i64;
                for row in &rows {
                    assert!(row.delta_xp >= 1);
                    running += row.delta_xp;
                    assert_eq!(row.cumulative_xp, running);
                }
                for pair in rows.windows(2) {
                    assert!(pair[1].cumulative_xp > pair[0].cumulative_xp);
                    assert_eq!(pair[1].level, pair[0].level + 1);
                }
            }
        }
    }
}

#[test]
fn advertised_default_curve_is_exact() {
    let rows = generate(&config(1_000_000, 100, 1.06)).unwrap();
    assert_eq!(rows.last().unwrap().cumulative_xp, 1_000_000);
    assert!(rows.iter().all(|row| row.delta_xp >= 1));
}

#[test]
fn single_level_curve_is_one_row() {
    let rows = generate(&config(500, 1, 1.5)).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].level, 1);
    assert_eq!(rows[0].delta_xp, 500);
    assert_eq!(rows[0].cumulative_xp, 500);
}

#[test]
fn lookup_agrees_with_rows_everywhere() {
    let rows = generate(&config(10_000, 25, 1.1)).unwrap();
    for row in &rows {
        // One XP short of completing the level still displays that level.
        assert_eq!(level_for_xp(&rows, row.cumulative_xp - 1), row.level);
        let at_boundary = level_for_xp(&rows, row.cumulative_xp);
        assert_eq!(at_boundary, (row.level + 1).min(25));
    }

    for xp in [0i64, 1, 137, 4_200, 9_999, 10_000, 50_000] {
        let progress = level_progress(&rows, xp);
        assert_eq!(progress.level, level_for_xp(&rows, xp));
        assert!(progress.xp_into_level >= 0);
        assert!(progress.xp_to_next >= 0);
        if progress.level < 25 {
            let row = rows[progress.level as usize - 1];
            assert_eq!(progress.xp_into_level + progress.xp_to_next, row.delta_xp);
        }
    }
}

use std::sync::Arc;

use rfpaint::font::VerticalMetrics;
use rfpaint::rendering::measure_fit_rescan;
use rfpaint::{
    measure_extent, measure_fit, BlockFace, FitResult, FontAdapter, FontFace, FontStyle, SizeF,
};
use tiny_skia::Path;

/// Face with uneven advances and one kerning pair.
#[derive(Debug)]
struct Proportional;

impl FontFace for Proportional {
    fn family_name(&self) -> &str {
        "Proportional"
    }

    fn vertical_metrics(&self, em_px: f64) -> VerticalMetrics {
        VerticalMetrics {
            ascent: em_px * 0.8,
            descent: em_px * 0.2,
            line_gap: em_px * 0.1,
        }
    }

    fn advance(&self, ch: char, em_px: f64) -> f64 {
        match ch {
            'i' | 'l' | '.' => em_px * 0.25,
            'm' | 'w' | 'W' => em_px * 0.8,
            ' ' => em_px * 0.3,
            c if c.is_control() => 0.0,
            _ => em_px * 0.55,
        }
    }

    fn kerning(&self, left: char, right: char, em_px: f64) -> f64 {
        if left == 'A' && right == 'V' {
            -em_px * 0.1
        } else {
            0.0
        }
    }

    fn glyph_outline(&self, _ch: char, _em_px: f64, _x: f64, _baseline: f64) -> Option<Path> {
        None
    }
}

fn block() -> FontAdapter {
    FontAdapter::new(Arc::new(BlockFace::new()), 12.0, FontStyle::REGULAR)
}

fn proportional() -> FontAdapter {
    FontAdapter::new(Arc::new(Proportional), 13.5, FontStyle::REGULAR)
}

const SAMPLES: &[&str] = &[
    "Hello World",
    "AVAVAV wimpy llama",
    "two\nlines here",
    "tab\there",
    "ünïcödé ✓ text",
    " leading and trailing ",
    "x",
];

#[test]
fn non_positive_budget_fits_nothing() {
    let f = proportional();
    for s in SAMPLES {
        for w in [0.0, -0.5, -100.0] {
            assert_eq!(measure_fit(s, &f, w), FitResult::default(), "{:?} @ {}", s, w);
        }
    }
}

#[test]
fn fitted_prefix_is_narrower_than_budget() {
    let f = proportional();
    for s in SAMPLES {
        for w in [1.0, 5.0, 17.3, 40.0, 90.0, 400.0] {
            let r = measure_fit(s, &f, w);
            assert!(r.char_fit <= s.chars().count());
            if r.char_fit > 0 {
                let prefix = r.prefix(s);
                let measured = measure_extent(prefix, &f).width;
                assert_eq!(measured, r.char_fit_width, "{:?} @ {}", s, w);
                assert!(measured < w);
            } else {
                assert_eq!(r.char_fit_width, 0.0);
            }
        }
    }
}

#[test]
fn char_fit_grows_with_budget() {
    let f = proportional();
    for s in SAMPLES {
        let mut last = 0;
        let mut w = 0.0;
        while w < 300.0 {
            let fit = measure_fit(s, &f, w).char_fit;
            assert!(fit >= last, "{:?}: {} then {} at {}", s, last, fit, w);
            last = fit;
            w += 0.75;
        }
    }
}

#[test]
fn cumulative_scan_matches_prefix_rescan() {
    let f = proportional();
    for s in SAMPLES {
        for w in [0.0, 3.0, 7.4, 7.425, 22.0, 60.0, 1000.0] {
            assert_eq!(measure_fit(s, &f, w), measure_fit_rescan(s, &f, w), "{:?} @ {}", s, w);
        }
    }
}

#[test]
fn extent_is_idempotent_and_caches_once() {
    let f = block();
    assert!(f.cached_metrics().is_none());

    let first = measure_extent("Hello World", &f);
    let cached = f.cached_metrics().expect("metrics cached after first measure");
    assert!(cached.height > 0.0);
    assert!(cached.underline_offset >= 0.0);

    let second = measure_extent("Hello World", &f);
    assert_eq!(first, second);
    assert_eq!(f.cached_metrics(), Some(cached));
}

#[test]
fn empty_text_measures_zero() {
    let f = block();
    assert_eq!(measure_extent("", &f), SizeF::ZERO);
    for w in [0.0, 1.0, 1e9] {
        assert_eq!(measure_fit("", &f, w), FitResult::default());
    }
}

#[test]
fn kerning_pair_narrows_the_run() {
    let f = proportional();
    let em = f.em_px();
    let av = measure_extent("AV", &f).width;
    assert!((av - (em * 0.55 * 2.0 - em * 0.1)).abs() < 1e-9);
}

#[test]
fn line_height_includes_line_gap() {
    let f = proportional();
    // 18px em: 14.4 + 3.6 + 1.8 = 19.8, rounded up
    assert_eq!(f.em_px(), 18.0);
    assert_eq!(measure_extent("a\nb", &f).height, 40.0);
}

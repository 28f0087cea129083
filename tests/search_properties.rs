use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use imgsearch::lowlevel::{dispatch, scan, search_across_scales, ScaleRange, SearchContext};
use imgsearch::{
    BoxResizer, BufferScreen, ColorValue, ImageSearcher, Match, MemoryLoader, PixelBuffer,
    Resizer, ScanParams, SearchConfig, SearchError, SearchRequest, SearchResult, Strategy,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const KEY: ColorValue = 0x00FF_00FF;

fn noise(rng: &mut StdRng, width: usize, height: usize) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, |_, _| {
        let v = rng.random_range(0..4u32) * 0x40;
        (v << 16) | (v << 8) | v
    })
    .unwrap()
}

fn positions(found: &[Match]) -> HashSet<(i32, i32)> {
    found.iter().map(|m| (m.x, m.y)).collect()
}

struct CountingResizer {
    calls: AtomicUsize,
}

impl Resizer for CountingResizer {
    fn resize(&self, src: &PixelBuffer, width: usize, height: usize) -> SearchResult<PixelBuffer> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        BoxResizer.resize(src, width, height)
    }
}

/// Resizer that always fails, counting attempts.
struct FailingResizer {
    calls: AtomicUsize,
}

impl Resizer for FailingResizer {
    fn resize(&self, _src: &PixelBuffer, width: usize, height: usize) -> SearchResult<PixelBuffer> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(SearchError::InvalidScale { width, height })
    }
}

fn white_block_target() -> PixelBuffer {
    PixelBuffer::filled(10, 10, 0)
        .unwrap()
        .with_patch(&PixelBuffer::filled(3, 3, 0xFFFFFF).unwrap(), 4, 4)
}

#[test]
fn raising_tolerance_never_removes_matches() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..10 {
        let target = noise(&mut rng, 16, 12);
        let reference = noise(&mut rng, 3, 2);
        let mut previous: HashSet<(i32, i32)> = HashSet::new();
        for tolerance in [0u8, 0x20, 0x40, 0x80, 0xC0, 0xFF] {
            let params = ScanParams {
                tolerance,
                transparent: None,
            };
            let found = positions(&scan(&target, &reference, (0, 0), params, true, Strategy::Scalar));
            assert!(previous.is_subset(&found), "tolerance {tolerance} lost matches");
            previous = found;
        }
        // Every placement matches at the maximum tolerance.
        assert_eq!(previous.len(), 14 * 11);
    }
}

#[test]
fn keying_reference_pixels_never_removes_matches() {
    let mut rng = StdRng::seed_from_u64(9);
    let params = ScanParams {
        tolerance: 0x40,
        transparent: Some(KEY),
    };
    for _ in 0..10 {
        let target = noise(&mut rng, 20, 8);
        let mut reference = noise(&mut rng, 4, 3);
        let mut previous = positions(&scan(&target, &reference, (0, 0), params, true, Strategy::Vector));
        for _ in 0..6 {
            let x = rng.random_range(0..4);
            let y = rng.random_range(0..3);
            reference = reference.with_patch(&PixelBuffer::filled(1, 1, KEY).unwrap(), x, y);
            let found = positions(&scan(&target, &reference, (0, 0), params, true, Strategy::Vector));
            assert!(previous.is_subset(&found));
            previous = found;
        }
    }
}

#[test]
fn first_match_is_smallest_row_then_column() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..20 {
        let target = noise(&mut rng, 12, 12);
        let reference = noise(&mut rng, 2, 1);
        let params = ScanParams {
            tolerance: 0x40,
            transparent: None,
        };
        let all = scan(&target, &reference, (0, 0), params, true, Strategy::Scalar);
        let first = scan(&target, &reference, (0, 0), params, false, Strategy::Scalar);
        let mut sorted = all.clone();
        sorted.sort_by_key(|m| (m.y, m.x));
        assert_eq!(all, sorted, "find_all results must be row-major");
        assert_eq!(first.first(), all.first());
        assert!(first.len() <= 1);
    }
}

#[test]
fn sweep_stops_at_first_scale_with_a_hit() {
    let target = white_block_target();
    let reference = PixelBuffer::filled(3, 3, 0xFFFFFF).unwrap();
    let resizer = CountingResizer {
        calls: AtomicUsize::new(0),
    };
    let mut ctx = SearchContext {
        target: &target,
        origin: (0, 0),
        params: ScanParams::default(),
        scales: ScaleRange::new(1.0, 2.0, 0.5),
        find_all: false,
        strategy: Strategy::Scalar,
    };

    let found = search_across_scales(&ctx, &reference, &resizer);
    assert_eq!(found.len(), 1);
    assert_eq!(resizer.calls.load(Ordering::SeqCst), 0);

    // find_all keeps sweeping: 1.5 and 2.0 are resized (and do not fit the block).
    ctx.find_all = true;
    let found = search_across_scales(&ctx, &reference, &resizer);
    assert_eq!(found.len(), 1);
    assert_eq!(resizer.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn failed_and_degenerate_scales_are_skipped() {
    let target = white_block_target();
    let reference = PixelBuffer::filled(3, 3, 0xFFFFFF).unwrap();
    let resizer = FailingResizer {
        calls: AtomicUsize::new(0),
    };
    // 0.1 rounds the reference to 0x0 and never reaches the resizer; 0.55
    // fails to resize; 1.0 scans the unscaled reference.
    let ctx = SearchContext {
        target: &target,
        origin: (0, 0),
        params: ScanParams::default(),
        scales: ScaleRange::new(0.1, 1.0, 0.45),
        find_all: false,
        strategy: Strategy::Scalar,
    };
    let found = search_across_scales(&ctx, &reference, &resizer);
    assert_eq!(found, vec![Match { x: 4, y: 4, w: 3, h: 3 }]);
    assert_eq!(resizer.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn drifted_unit_scale_uses_unscaled_reference() {
    let target = white_block_target();
    let reference = PixelBuffer::filled(3, 3, 0xFFFFFF).unwrap();
    for (min, max, step) in [(0.1, 1.0, 0.01), (0.5, 1.5, 0.1)] {
        let resizer = FailingResizer {
            calls: AtomicUsize::new(0),
        };
        let ctx = SearchContext {
            target: &target,
            origin: (0, 0),
            params: ScanParams::default(),
            scales: ScaleRange::new(min, max, step),
            find_all: true,
            strategy: Strategy::Scalar,
        };
        let found = search_across_scales(&ctx, &reference, &resizer);
        assert_eq!(found, vec![Match { x: 4, y: 4, w: 3, h: 3 }], "sweep {min}..{max}/{step}");
    }
}

#[test]
fn smaller_scale_reports_scaled_size() {
    let target = white_block_target();
    let reference = PixelBuffer::filled(6, 6, 0xFFFFFF).unwrap();
    let ctx = SearchContext {
        target: &target,
        origin: (0, 0),
        params: ScanParams::default(),
        scales: ScaleRange::new(0.5, 1.0, 0.5),
        find_all: false,
        strategy: Strategy::Scalar,
    };
    let found = search_across_scales(&ctx, &reference, &BoxResizer);
    assert_eq!(found, vec![Match { x: 4, y: 4, w: 3, h: 3 }]);
}

#[test]
fn dispatcher_keeps_submission_order() {
    let target = PixelBuffer::from_fn(40, 4, |x, _| (x as u32) * 0x010101).unwrap();
    let mut loader = MemoryLoader::new();
    let mut names = Vec::new();
    for (i, x0) in [30usize, 2, 17, 9, 25, 0].into_iter().enumerate() {
        let name = format!("ref{i}.png");
        loader.insert(name.clone(), target.crop(x0, 0, 3, 4).unwrap());
        names.push(name);
    }
    names.insert(2, "missing.png".to_string());
    let paths: Vec<&str> = names.iter().map(String::as_str).collect();

    let ctx = SearchContext {
        target: &target,
        origin: (0, 0),
        params: ScanParams::default(),
        scales: ScaleRange::identity(),
        find_all: true,
        strategy: Strategy::detect(),
    };
    let parallel = dispatch(&ctx, &paths, &loader, &BoxResizer, true);
    let sequential = dispatch(&ctx, &paths, &loader, &BoxResizer, false);
    assert_eq!(parallel, sequential);
    let xs: Vec<i32> = parallel.matches.iter().map(|m| m.x).collect();
    assert_eq!(xs, vec![30, 2, 17, 9, 25, 0]);
    assert_eq!(parallel.skipped, 1);
}

#[test]
fn every_reference_reports_without_find_all() {
    let target = white_block_target();
    let loader = MemoryLoader::new()
        .with("a.png", PixelBuffer::filled(3, 3, 0xFFFFFF).unwrap())
        .with("b.png", PixelBuffer::filled(2, 2, 0xFFFFFF).unwrap());
    let screen = BufferScreen::new(target);
    let request = SearchRequest::new("a.png|b.png").with_config(SearchConfig {
        tolerance: 0,
        center: false,
        ..SearchConfig::default()
    });
    let out = ImageSearcher::new(screen, loader).search(&request);
    assert_eq!(out, "{2}[4|4|3|3,4|4|2|2]");
}

#[test]
fn repeated_searches_are_identical() {
    let mut rng = StdRng::seed_from_u64(77);
    let frame = noise(&mut rng, 64, 48);
    let loader = MemoryLoader::new()
        .with("a.png", frame.crop(10, 10, 5, 4).unwrap())
        .with("b.png", frame.crop(40, 30, 6, 6).unwrap());
    let searcher = ImageSearcher::new(BufferScreen::new(frame), loader);
    let request = SearchRequest::new("a.png|b.png").with_config(SearchConfig {
        find_all: true,
        tolerance: 0x40,
        scale_min: 0.8,
        scale_max: 1.2,
        debug: true,
        ..SearchConfig::default()
    });
    let first = searcher.search(&request);
    for _ in 0..5 {
        assert_eq!(searcher.search(&request), first);
    }
}

use deepbrot_core::{
    BigFloatBackend, DecimalBackend, EscapeBackend, EscapeResult, NativeBackend, PrecisionContext,
    Viewport,
};

/// Render every pixel of the home view through the public API and collect
/// the escape results into a flat Vec.
fn render_grid<B: EscapeBackend>(
    backend: &B,
    width: u32,
    height: u32,
    num_iterations: u32,
) -> Vec<EscapeResult> {
    let viewport = Viewport::new(
        backend.from_f64(-2.0).unwrap(),
        backend.from_f64(-1.2).unwrap(),
        backend.from_f64(3.0).unwrap(),
    );
    let bounds = viewport.bounds(backend, width, height).unwrap();
    let columns = bounds.column_coords(backend, width).unwrap();
    let mut results = Vec::with_capacity((width * height) as usize);
    for py in 0..height {
        let y0 = bounds.row_coord(backend, py, height).unwrap();
        for x0 in &columns {
            results.push(backend.escape(x0, &y0, num_iterations).unwrap());
        }
    }
    results
}

fn count_kinds(results: &[EscapeResult]) -> (usize, usize) {
    let escaped = results
        .iter()
        .filter(|r| matches!(r, EscapeResult::Escaped { .. }))
        .count();
    let interior = results.iter().filter(|r| r.is_interior()).count();
    (escaped, interior)
}

#[test]
fn headless_native_grid() {
    let backend = NativeBackend::new();
    let results = render_grid(&backend, 100, 100, 256);

    assert_eq!(results.len(), 100 * 100);

    let (escaped, interior) = count_kinds(&results);
    assert!(escaped > 0, "should have some escaped points");
    assert!(interior > 0, "should have some interior points");
    assert_eq!(escaped + interior, 10_000);
}

#[test]
fn headless_render_is_deterministic() {
    let backend = NativeBackend::new();

    let run1 = render_grid(&backend, 80, 60, 128);
    let run2 = render_grid(&backend, 80, 60, 128);

    assert_eq!(
        run1, run2,
        "two identical renders must produce identical results"
    );
}

#[test]
fn headless_decimal_grid() {
    let ctx = PrecisionContext::new(8).unwrap();
    let backend = DecimalBackend::new(ctx).unwrap();
    let results = render_grid(&backend, 10, 8, 32);

    assert_eq!(results.len(), 80);

    // The grid hits (-2, -1.2) which escapes immediately and (-0.5, 0)
    // which sits inside the main cardioid.
    let (escaped, interior) = count_kinds(&results);
    assert!(escaped > 0, "should have some escaped points");
    assert!(interior > 0, "should have some interior points");
}

#[test]
fn headless_bigfloat_grid() {
    let backend = BigFloatBackend::with_decimal_digits(12);
    let results = render_grid(&backend, 10, 8, 32);

    let (escaped, interior) = count_kinds(&results);
    assert!(escaped > 0, "should have some escaped points");
    assert!(interior > 0, "should have some interior points");
}

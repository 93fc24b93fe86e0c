use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};

use deepbrot_core::{DecimalBackend, EscapeBackend, NativeBackend, PrecisionContext};
use deepbrot_render::{Palette, PixelSurface, Renderer, DEFAULT_CONTROL_COLORS};

fn finish<B: EscapeBackend>(renderer: &mut Renderer<B>) {
    loop {
        let (done, total) = renderer.progress();
        if done >= total || renderer.is_cancelled() {
            break;
        }
        std::thread::yield_now();
    }
    renderer.terminate_threads();
}

fn bench_full_frame_render(c: &mut Criterion) {
    c.bench_function("native_full_frame_320x240", |b| {
        b.iter(|| {
            let surface = Arc::new(PixelSurface::new(320, 240).unwrap());
            let mut renderer =
                Renderer::new(NativeBackend::new(), 320, 240, surface, Palette::default())
                    .unwrap();
            renderer.draw(256, 4).unwrap();
            finish(&mut renderer);
        });
    });
}

fn bench_decimal_escape(c: &mut Criterion) {
    let ctx = PrecisionContext::new(20).unwrap();
    let backend = DecimalBackend::new(ctx).unwrap();
    let x0 = backend.from_f64(-0.7436).unwrap();
    let y0 = backend.from_f64(0.1318).unwrap();

    c.bench_function("decimal_escape_p20_200iter", |b| {
        b.iter(|| backend.escape(&x0, &y0, 200));
    });
}

fn bench_palette_build(c: &mut Criterion) {
    c.bench_function("palette_build_1024", |b| {
        b.iter(|| Palette::from_controls(&DEFAULT_CONTROL_COLORS, 1024));
    });
}

criterion_group!(
    benches,
    bench_full_frame_render,
    bench_decimal_escape,
    bench_palette_build
);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tetris_view::adapter::parse_snapshot;
use tetris_view::term::{
    encode_diff_into, encode_full_into, CanvasView, FrameBuffer, PixelCanvas, SnapshotRenderer,
    Viewport,
};
use tetris_view::types::Snapshot;

fn board_json() -> String {
    let colors = ["#00F0F0", "#F0F000", "#A000F0", "#000000"];
    let rows: Vec<String> = (0..20)
        .map(|y| {
            let cells: Vec<String> = (0..10)
                .map(|x| format!("\"{}\"", colors[(x + y) % colors.len()]))
                .collect();
            format!("[{}]", cells.join(","))
        })
        .collect();
    format!(
        r##"{{"grid": [{}],
            "current_piece": {{"shape": [[0,1,0],[1,1,1]], "x": 3, "y": 0, "color": "#A000F0"}},
            "next_piece": {{"shape": [[1,1,1,1]], "color": "#00F0F0"}},
            "hold_piece": {{"shape": [[1,1],[1,1]], "color": "#F0F000"}},
            "score": 123456, "level": 12, "high_score": 999999}}"##,
        rows.join(",")
    )
}

fn full_board() -> Snapshot {
    parse_snapshot(&board_json()).unwrap()
}

fn bench_redraw(c: &mut Criterion) {
    let snap = full_board();
    let renderer = SnapshotRenderer::default();
    let mut canvas = PixelCanvas::default();

    c.bench_function("redraw_10x20_into_canvas", |b| {
        b.iter(|| renderer.redraw(&mut canvas, black_box(&snap)))
    });
}

fn bench_parse(c: &mut Criterion) {
    let json = board_json();
    c.bench_function("parse_snapshot_10x20", |b| {
        b.iter(|| parse_snapshot(black_box(&json)).unwrap())
    });
}

fn bench_present(c: &mut Criterion) {
    let snap = full_board();
    let renderer = SnapshotRenderer::default();
    let mut canvas = PixelCanvas::default();
    renderer.redraw(&mut canvas, &snap);

    let view = CanvasView;
    let viewport = Viewport::new(80, 30);
    let mut fb = FrameBuffer::new(80, 30);
    let mut out = Vec::with_capacity(64 * 1024);

    c.bench_function("canvas_to_framebuffer", |b| {
        b.iter(|| view.render_into(black_box(&canvas), None, viewport, &mut fb))
    });

    let prev = fb.clone();
    c.bench_function("encode_full_frame", |b| {
        b.iter(|| {
            out.clear();
            encode_full_into(black_box(&fb), &mut out).unwrap();
        })
    });

    c.bench_function("encode_unchanged_diff", |b| {
        b.iter(|| {
            out.clear();
            encode_diff_into(black_box(&prev), black_box(&fb), &mut out).unwrap();
        })
    });
}

criterion_group!(benches, bench_redraw, bench_parse, bench_present);
criterion_main!(benches);

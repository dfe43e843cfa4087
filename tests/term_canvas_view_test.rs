//! Integration test: a decoded snapshot all the way to terminal cells.

use tetris_view::adapter::parse_snapshot;
use tetris_view::term::{
    encode_diff_into, encode_full_into, CanvasView, LinkState, PixelCanvas, StatusView, Viewport,
};
use tetris_view::types::Rgb;
use tetris_view::Session;

const FRAME: &str = r##"{
    "grid": [["#000000", "#000000"], ["#000000", [0, 240, 0]]],
    "current_piece": {"shape": [[1]], "x": 0, "y": 0, "color": "#F00000"},
    "score": 10, "level": 1, "high_score": 100
}"##;

fn drawn_canvas() -> PixelCanvas {
    let mut s = Session::new(PixelCanvas::default());
    s.apply(&parse_snapshot(FRAME).unwrap()).unwrap();
    s.surface().clone()
}

#[test]
fn snapshot_reaches_terminal_cells() {
    let canvas = drawn_canvas();
    let fb = CanvasView.render(&canvas, None, Viewport::new(60, 25));

    let red = Rgb::new(0xF0, 0, 0);
    let green = Rgb::new(0, 0xF0, 0);
    // Grid square (0,0) spans columns 0-1 of row 0.
    for x in 0..2 {
        let cell = fb.get(x, 0).unwrap();
        assert_eq!((cell.style.fg, cell.style.bg), (red, red));
    }
    // Grid square (1,1) spans columns 2-3 of row 1.
    let cell = fb.get(2, 1).unwrap();
    assert_eq!((cell.style.fg, cell.style.bg), (green, green));

    let score_row: String = fb.row_text(2).chars().skip(42).collect();
    assert!(score_row.starts_with("Score: 10"), "{score_row:?}");
    let level_row: String = fb.row_text(4).chars().skip(42).collect();
    assert!(level_row.starts_with("Level: 1"), "{level_row:?}");
}

#[test]
fn status_line_tracks_session() {
    let canvas = drawn_canvas();
    let status = StatusView {
        link: LinkState::Open,
        frames: 7,
        rejected: 2,
    };
    let fb = CanvasView.render(&canvas, Some(&status), Viewport::new(80, 30));
    let line = fb.row_text(29);
    assert!(line.contains("connected"), "{line:?}");
    assert!(line.contains("frames 7"), "{line:?}");
    assert!(line.contains("rejected 2"), "{line:?}");
}

#[test]
fn unchanged_frame_encodes_to_nothing() {
    let canvas = drawn_canvas();
    let view = CanvasView;
    let a = view.render(&canvas, None, Viewport::new(60, 25));
    let b = view.render(&canvas, None, Viewport::new(60, 25));

    let mut out = Vec::new();
    encode_diff_into(&a, &b, &mut out).unwrap();
    assert!(out.is_empty());

    encode_full_into(&b, &mut out).unwrap();
    assert!(!out.is_empty());
}

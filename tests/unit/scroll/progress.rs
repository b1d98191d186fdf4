use super::*;

fn container() -> Rect {
    Rect::new(0.0, 2000.0, 1200.0, 5000.0)
}

fn viewport() -> Size {
    Size::new(1200.0, 1000.0)
}

#[test]
fn full_traverse_spans_container_height() {
    let mut m = ScrollProgressMapper::new(ScrollWindow::FullTraverse, container(), viewport());
    assert_eq!(m.on_scroll(0.0), 0.0);
    assert_eq!(m.on_scroll(2000.0), 0.0);
    assert_eq!(m.on_scroll(3000.0), 0.5);
    assert_eq!(m.on_scroll(4000.0), 1.0);
    assert_eq!(m.on_scroll(9000.0), 1.0);
}

#[test]
fn reveal_runs_from_bottom_edge_to_center() {
    let mut m = ScrollProgressMapper::new(ScrollWindow::Reveal, container(), viewport());
    assert_eq!(m.on_scroll(500.0), 0.0);
    assert_eq!(m.on_scroll(1000.0), 0.0);
    assert_eq!(m.on_scroll(1250.0), 0.5);
    assert_eq!(m.on_scroll(1500.0), 1.0);
    assert_eq!(m.on_scroll(4000.0), 1.0);
}

#[test]
fn resize_recomputes_without_scrolling() {
    let mut m = ScrollProgressMapper::new(ScrollWindow::FullTraverse, container(), viewport());
    m.on_scroll(3000.0);
    let p = m.on_resize(Size::new(1200.0, 2000.0), container());
    assert_eq!(p, 1.0);
    assert_eq!(m.progress(), 1.0);
    assert_eq!(m.scroll_y(), 3000.0);
}

#[test]
fn degenerate_windows_report_zero() {
    let short = Rect::new(0.0, 0.0, 100.0, 500.0);
    assert_eq!(scroll_progress(ScrollWindow::FullTraverse, short, 1000.0), 0.0);
    assert_eq!(scroll_progress(ScrollWindow::Reveal, short, 0.0), 0.0);
}

#[test]
fn container_in_viewport_shifts_by_scroll() {
    let mut m = ScrollProgressMapper::new(ScrollWindow::Reveal, container(), viewport());
    m.on_scroll(150.0);
    assert_eq!(m.container_in_viewport(), Rect::new(0.0, 1850.0, 1200.0, 4850.0));
    assert_eq!(m.window(), ScrollWindow::Reveal);
}

#[test]
fn window_deserializes_snake_case() {
    let w: ScrollWindow = serde_json::from_str("\"full_traverse\"").unwrap();
    assert_eq!(w, ScrollWindow::FullTraverse);
    let w: ScrollWindow = serde_json::from_str("\"reveal\"").unwrap();
    assert_eq!(w, ScrollWindow::Reveal);
}

#[test]
fn scroll_range_matches_window_edges() {
    let mut m = ScrollProgressMapper::new(ScrollWindow::FullTraverse, container(), viewport());
    assert_eq!(m.scroll_range(), (2000.0, 4000.0));
    let (start, end) = m.scroll_range();
    assert_eq!(m.on_scroll(start), 0.0);
    assert_eq!(m.on_scroll(end), 1.0);

    let m = ScrollProgressMapper::new(ScrollWindow::Reveal, container(), viewport());
    assert_eq!(m.scroll_range(), (1000.0, 1500.0));
}

#[test]
fn progress_at_window_start_is_positive_zero() {
    let top = Rect::new(0.0, 0.0, 100.0, 3000.0);
    let p = scroll_progress(ScrollWindow::FullTraverse, top, 1000.0);
    assert_eq!(p, 0.0);
    assert!(p.is_sign_positive());

    let m = ScrollProgressMapper::new(ScrollWindow::FullTraverse, top, Size::new(100.0, 1000.0));
    assert!(m.progress().is_sign_positive());
}

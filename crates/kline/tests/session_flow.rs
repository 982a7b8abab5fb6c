//! End-to-end tests driving a chart session with in-memory data.

use kline::drawing::{Shape, ToolPhase};
use kline::{ChartEvent, ChartSession, DrawingTool, PixelPos, PixelRect};
use kline_config::{Config, IndicatorOverride, PaneIndicator};
use kline_core::{aggregate_candles, Candle, SeriesKey, Timeframe, VisibleRange};
use kline_data::{MemorySource, SeriesStore};

/// Main pane area is (11, 1, 798, 198); 61 bars of width 11 fit.
const BOUNDS: PixelRect = PixelRect::new(0, 0, 865, 500);

fn daily_candles(len: usize) -> Vec<Candle> {
    (0..len)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.3).sin() * 10.0;
            Candle::new(i as f64 * 86_400.0, close, close + 2.0, close - 2.0, close, 1_000.0 + i as f64)
        })
        .collect()
}

fn make_session_with(config: Config) -> ChartSession<MemorySource> {
    let daily = daily_candles(100);
    let weekly = aggregate_candles(&daily, Timeframe::Week1);
    let source = MemorySource::new()
        .with_series(SeriesKey::new("2330.tw", Timeframe::Day1), daily)
        .with_series(SeriesKey::new("2330.tw", Timeframe::Week1), weekly);

    let mut session = ChartSession::new(SeriesStore::new(source), config);
    session.handle(ChartEvent::Resize(BOUNDS));
    session
}

fn make_session() -> ChartSession<MemorySource> {
    make_session_with(Config::default())
}

fn draw(session: &mut ChartSession<MemorySource>, tool: DrawingTool, from: PixelPos, to: PixelPos) {
    session.handle(ChartEvent::ToolSelected(tool));
    session.handle(ChartEvent::PointerDown(from));
    session.handle(ChartEvent::PointerDrag(to));
    session.handle(ChartEvent::PointerUp(to));
}

/// Test loading scrolls to the newest bars.
#[test]
fn test_load_scrolls_to_end() {
    let session = make_session();
    assert_eq!(session.series().len(), 100);
    assert_eq!(session.visible_range(), VisibleRange::new(39, 100));
    assert!(!session.value_range(0).is_degenerate());
    assert_eq!(session.value_range(2).min, 0.0);
    assert_eq!(session.value_range(2).max, 100.0);
}

/// Test scroll and zoom keep the right edge anchored.
#[test]
fn test_scroll_and_zoom() {
    let mut session = make_session();
    session.handle(ChartEvent::Scroll(-10));
    assert_eq!(session.visible_range(), VisibleRange::new(29, 90));

    session.handle(ChartEvent::ZoomIn);
    assert_eq!(session.viewport().bar_width(), 13);
    assert_eq!(session.visible_range(), VisibleRange::new(37, 90));

    session.handle(ChartEvent::ZoomReset);
    assert_eq!(session.visible_range(), VisibleRange::new(29, 90));
}

/// Test a finished trendline moves into the store.
#[test]
fn test_trendline_is_committed() {
    let mut session = make_session();
    draw(&mut session, DrawingTool::Trendline, PixelPos::new(100, 50), PixelPos::new(300, 100));

    let annotations = session.annotations();
    assert_eq!(annotations.len(), 1);
    assert!(annotations[0].is_finished());
    assert_eq!(annotations[0].chart_index, 0);
    assert_eq!(Some(annotations[0].projection.area), session.layout().area(0));

    // Ready for the next gesture with the same tool
    assert_eq!(session.tool().tool(), DrawingTool::Trendline);
    assert_eq!(session.tool().phase(), ToolPhase::Idle);
}

/// Test an annotation takes the scale of the pane it starts in.
#[test]
fn test_annotation_binds_to_pane() {
    let mut session = make_session();
    draw(&mut session, DrawingTool::FreeLine, PixelPos::new(100, 450), PixelPos::new(200, 420));

    let annotations = session.annotations();
    assert_eq!(annotations[0].chart_index, 3);
    assert_eq!(annotations[0].projection.value_range, session.value_range(3));
}

/// Test vertical lines use the union of all panes.
#[test]
fn test_vertical_line_spans_panes() {
    let mut session = make_session();
    draw(&mut session, DrawingTool::VerticalLine, PixelPos::new(100, 300), PixelPos::new(100, 300));

    let annotations = session.annotations();
    assert_eq!(annotations.len(), 1);
    assert_eq!(annotations[0].chart_index, 0);
    assert_eq!(annotations[0].projection.area, session.layout().union_area());
}

/// Test a press outside every pane starts nothing.
#[test]
fn test_pointer_outside_panes_is_ignored() {
    let mut session = make_session();
    draw(&mut session, DrawingTool::Trendline, PixelPos::new(5, 5), PixelPos::new(100, 100));
    assert!(session.annotations().is_empty());
    assert_eq!(session.tool().phase(), ToolPhase::Idle);
}

/// Test the two-gesture parallel lines tool.
#[test]
fn test_parallel_lines_flow() {
    let mut session = make_session();
    draw(&mut session, DrawingTool::ParallelLines, PixelPos::new(100, 100), PixelPos::new(300, 100));
    assert_eq!(session.tool().phase(), ToolPhase::BaseConfirmed);
    assert!(session.annotations().is_empty());

    session.handle(ChartEvent::PointerDown(PixelPos::new(200, 150)));
    assert_eq!(session.tool().phase(), ToolPhase::Offsetting);
    session.handle(ChartEvent::PointerUp(PixelPos::new(200, 150)));

    assert_eq!(session.annotations().len(), 1);
    // Base at y = 100 plus parallels at 150 and 50
    let ys: Vec<f64> = session
        .shapes()
        .iter()
        .filter_map(|shape| match shape {
            Shape::Line(line) => Some(line.start.y),
            Shape::FibonacciMarker { .. } => None,
        })
        .collect();
    assert_eq!(ys, vec![100.0, 150.0, 50.0]);
}

/// Test clicking an erase affordance removes its annotation.
#[test]
fn test_erase_affordance_click() {
    let mut session = make_session();
    draw(&mut session, DrawingTool::HorizontalLine, PixelPos::new(100, 100), PixelPos::new(100, 100));
    assert_eq!(session.annotations().len(), 1);
    assert!(session.affordances().is_empty());

    session.handle(ChartEvent::ToolSelected(DrawingTool::Erase));
    let affordances = session.affordances();
    assert_eq!(affordances.len(), 1);
    assert_eq!(affordances[0].bounds, PixelRect::new(3, 92, 16, 16));

    // A miss leaves everything in place
    session.handle(ChartEvent::PointerDown(PixelPos::new(400, 100)));
    assert_eq!(session.annotations().len(), 1);

    session.handle(ChartEvent::PointerDown(PixelPos::new(11, 100)));
    session.handle(ChartEvent::PointerUp(PixelPos::new(11, 100)));
    assert!(session.annotations().is_empty());
    assert!(session.affordances().is_empty());
}

/// Test erase commands.
#[test]
fn test_erase_one_and_all() {
    let mut session = make_session();
    draw(&mut session, DrawingTool::HorizontalLine, PixelPos::new(100, 60), PixelPos::new(100, 60));
    draw(&mut session, DrawingTool::HorizontalLine, PixelPos::new(100, 120), PixelPos::new(100, 120));
    draw(&mut session, DrawingTool::VerticalLine, PixelPos::new(300, 120), PixelPos::new(300, 120));

    let first = session.annotations()[0].id;
    session.handle(ChartEvent::EraseOne(first));
    assert_eq!(session.annotations().len(), 2);
    assert!(session.annotations().iter().all(|a| a.id != first));

    session.handle(ChartEvent::EraseAll);
    assert!(session.annotations().is_empty());
}

/// Test stored annotations follow zoom and scroll.
#[test]
fn test_zoom_reprojects_annotations() {
    let mut session = make_session();
    draw(&mut session, DrawingTool::Trendline, PixelPos::new(100, 50), PixelPos::new(300, 100));
    let anchors = session.annotations()[0].drawing.anchors();

    session.handle(ChartEvent::ZoomIn);
    session.handle(ChartEvent::Scroll(-5));

    let annotation = session.annotations()[0];
    assert_eq!(annotation.projection.bar_width, 13);
    assert_eq!(annotation.projection.visible, session.visible_range());
    assert_eq!(annotation.drawing.anchors(), anchors);
}

/// Test annotations are kept per instrument.
#[test]
fn test_annotations_are_per_instrument() {
    let mut session = make_session();
    draw(&mut session, DrawingTool::HorizontalLine, PixelPos::new(100, 100), PixelPos::new(100, 100));

    session.handle(ChartEvent::InstrumentChanged("9999.tw".to_string()));
    assert!(session.series().is_empty());
    assert!(session.visible_range().is_empty());
    assert!(session.value_range(0).is_degenerate());
    assert!(session.annotations().is_empty());
    assert_eq!(session.tool().tool(), DrawingTool::HorizontalLine);

    session.handle(ChartEvent::PointerMove(PixelPos::new(100, 100)));
    assert!(session.crosshair().is_none());

    session.handle(ChartEvent::InstrumentChanged("2330.tw".to_string()));
    assert_eq!(session.visible_range(), VisibleRange::new(39, 100));
    assert_eq!(session.annotations().len(), 1);
}

/// Test crosshair readouts for every pane.
#[test]
fn test_crosshair_readouts() {
    let mut session = make_session();
    session.handle(ChartEvent::PointerMove(PixelPos::new(18, 50)));

    let crosshair = session.crosshair().unwrap();
    assert_eq!(crosshair.chart_index, 0);
    assert_eq!(crosshair.index, 39);
    assert_eq!(crosshair.timestamp, 39.0 * 86_400.0);
    assert_eq!(crosshair.readouts.len(), 4);
    assert_eq!(crosshair.readouts[0][0].label, "O");
    assert_eq!(crosshair.readouts[1][0].value, Some(1_039.0));

    session.handle(ChartEvent::PointerExit);
    assert!(session.crosshair().is_none());
}

/// Test a per-timeframe override rebuilds the panes.
#[test]
fn test_timeframe_override_changes_panes() {
    let mut config = Config::default();
    config.indicators.timeframes.insert(
        "1w".to_string(),
        IndicatorOverride {
            subsidiary: Some(vec![PaneIndicator::Macd]),
            ..Default::default()
        },
    );
    let mut session = make_session_with(config);
    draw(&mut session, DrawingTool::HorizontalLine, PixelPos::new(100, 100), PixelPos::new(100, 100));

    session.handle(ChartEvent::TimeframeChanged(Timeframe::Week1));
    assert_eq!(session.timeframe(), Timeframe::Week1);
    assert_eq!(session.engine().pane_count(), 2);
    assert_eq!(session.layout().pane_count(), 2);
    assert_eq!(session.series().len(), 15);
    assert!(session.annotations().is_empty());

    session.handle(ChartEvent::TimeframeChanged(Timeframe::Day1));
    assert_eq!(session.engine().pane_count(), 4);
    assert_eq!(session.annotations().len(), 1);
}

/// Test a session reading a CSV directory tree, including weekly aggregation.
#[test]
fn test_csv_backed_session() {
    let dir = tempfile::tempdir().unwrap();
    let day_k = dir.path().join("tw").join("day_k");
    std::fs::create_dir_all(&day_k).unwrap();

    let mut content = String::from("Date,Open,High,Low,Close,Volume\n");
    for day in 1..=30 {
        let close = 500.0 + f64::from(day);
        content.push_str(&format!("2024/01/{day:02},{close},{},{},{close},{}\n", close + 3.0, close - 3.0, day * 100));
    }
    std::fs::write(day_k.join("2330.csv"), content).unwrap();

    let store = SeriesStore::new(kline_data::CsvDirectorySource::new(dir.path()));
    let mut session = ChartSession::new(store, Config::default());
    session.handle(ChartEvent::Resize(BOUNDS));

    assert_eq!(session.series().len(), 30);
    // Fewer bars than fit: everything is shown
    assert_eq!(session.visible_range(), VisibleRange::new(0, 30));
    assert!(session.value_range(0).min <= 498.0);
    assert!(session.value_range(0).max >= 533.0);

    // 2024-01-01 was a Monday: four full weeks plus the 29th and 30th
    session.handle(ChartEvent::TimeframeChanged(Timeframe::Week1));
    assert_eq!(session.series().len(), 5);
    assert_eq!(session.series().timestamp(0), Some(1_704_067_200.0));
    assert_eq!(session.series().timestamp(4), Some(1_704_067_200.0 + 28.0 * 86_400.0));
    assert_eq!(session.visible_range(), VisibleRange::new(0, 5));

    session.handle(ChartEvent::TimeframeChanged(Timeframe::Month1));
    assert_eq!(session.series().len(), 1);
    assert_eq!(session.series().get(0).map(|c| c.volume), Some(46_500.0));
}

/// Test a series shorter than the indicator periods survives scroll, zoom and resize.
#[test]
fn test_short_series_rerange() {
    let source =
        MemorySource::new().with_series(SeriesKey::new("2330.tw", Timeframe::Day1), daily_candles(10));
    let mut session = ChartSession::new(SeriesStore::new(source), Config::default());
    session.handle(ChartEvent::Resize(BOUNDS));
    assert_eq!(session.visible_range(), VisibleRange::new(0, 10));

    for event in [
        ChartEvent::Scroll(-1),
        ChartEvent::ZoomIn,
        ChartEvent::ZoomOut,
        ChartEvent::Resize(PixelRect::new(0, 0, 400, 300)),
        ChartEvent::Resize(BOUNDS),
    ] {
        session.handle(event);
        assert_eq!(session.visible_range(), VisibleRange::new(0, 10));
        assert!(!session.value_range(0).is_degenerate());
        // MACD needs more bars than there are
        assert!(session.value_range(3).is_degenerate());
    }

    session.handle(ChartEvent::PointerMove(PixelPos::new(18, 50)));
    let crosshair = session.crosshair().unwrap();
    assert_eq!(crosshair.index, 0);
    assert_eq!(crosshair.readouts[0][5].value, None);
}

//! Chart session: the single owner of all mutable chart state.
//!
//! Events are applied strictly in arrival order through [`ChartSession::handle`],
//! which takes `&mut self`; queries observe the fully applied effects of every
//! earlier event.

use kline_config::{Config, IndicatorParams, PaneIndicator};
use kline_core::{OhlcvSeries, SeriesKey, Timeframe, ValueRange, VisibleRange};
use kline_data::{SeriesSource, SeriesStore};
use kline_indicators::{IndicatorEngine, IndicatorKind, ReadoutEntry};

use crate::coords::{price_at, time_index_at, PixelPos, PixelRect, Projection, DEFAULT_BAR_WIDTH};
use crate::drawing::{
    Annotation, AnnotationStore, DrawingId, DrawingTool, EraseAffordance, Shape, ToolMachine, ToolPhase,
};
use crate::events::ChartEvent;
use crate::layout::ChartLayout;
use crate::viewport::Viewport;

/// What the pointer is over, with every pane's readout at that bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Crosshair {
    pub position: PixelPos,
    pub chart_index: usize,
    pub index: usize,
    pub timestamp: f64,
    pub price: f64,
    pub readouts: Vec<Vec<ReadoutEntry>>,
}

/// Build the indicator engine for one set of parameters.
pub fn engine_for(params: &IndicatorParams) -> IndicatorEngine {
    let mut main = vec![IndicatorKind::Price];
    main.extend(params.ma_periods.iter().map(|&period| IndicatorKind::MovingAverage { period }));

    let subsidiary = params
        .subsidiary
        .iter()
        .map(|pane| match pane {
            PaneIndicator::Volume => IndicatorKind::Volume,
            PaneIndicator::Kd => IndicatorKind::Stochastic {
                period: params.stochastic.period,
                rsv_weight: params.stochastic.rsv_weight,
                k_weight: params.stochastic.k_weight,
            },
            PaneIndicator::Macd => IndicatorKind::Macd {
                short_period: params.macd.short_period,
                long_period: params.macd.long_period,
                signal_period: params.macd.signal_period,
            },
        })
        .collect();

    IndicatorEngine::new(main, subsidiary)
}

/// Viewport parameters an annotation of `tool` in pane `chart_index` is drawn with.
///
/// Tools spanning every pane use the union area and the main pane's scale.
fn projection_for(
    layout: &ChartLayout,
    engine: &IndicatorEngine,
    viewport: &Viewport,
    tool: DrawingTool,
    chart_index: usize,
) -> Option<Projection> {
    let (area, value_range) = if tool.spans_all_panes() {
        (layout.union_area(), engine.value_range(0))
    } else {
        (layout.area(chart_index)?, engine.value_range(chart_index))
    };
    Some(Projection::new(area, value_range, viewport.range(), viewport.bar_width()))
}

/// Interactive chart over one series at a time.
pub struct ChartSession<S> {
    store: SeriesStore<S>,
    config: Config,
    key: SeriesKey,
    series: OhlcvSeries,
    params: IndicatorParams,
    engine: IndicatorEngine,
    viewport: Viewport,
    bounds: PixelRect,
    layout: ChartLayout,
    annotations: AnnotationStore,
    tool: ToolMachine,
    pointer: Option<PixelPos>,
}

impl<S: SeriesSource> ChartSession<S> {
    /// Open the configured default instrument and timeframe.
    pub fn new(store: SeriesStore<S>, config: Config) -> Self {
        let key = SeriesKey::new(
            config.general.default_instrument.clone(),
            config.general.default_timeframe,
        );
        let params = config.indicators_for_timeframe(key.timeframe);
        let bar_width = i32::try_from(config.chart.default_bar_width).unwrap_or(DEFAULT_BAR_WIDTH);

        let mut session = Self {
            store,
            engine: engine_for(&params),
            params,
            viewport: Viewport::new(bar_width),
            key,
            series: OhlcvSeries::empty(),
            bounds: PixelRect::default(),
            layout: ChartLayout::default(),
            annotations: AnnotationStore::new(),
            tool: ToolMachine::None,
            pointer: None,
            config,
        };
        session.relayout();
        session.load_series();
        session
    }

    /// Apply one event.
    pub fn handle(&mut self, event: ChartEvent) {
        if let Some(pos) = event.position() {
            self.pointer = Some(pos);
        }
        let moves_viewport = event.moves_viewport();

        match event {
            ChartEvent::Resize(bounds) => {
                self.bounds = bounds;
                self.relayout();
                self.refresh();
            }
            ChartEvent::InstrumentChanged(instrument) => {
                if instrument == self.key.instrument {
                    return;
                }
                log::info!("Instrument changed: {} -> {}", self.key.instrument, instrument);
                self.key = SeriesKey::new(instrument, self.key.timeframe);
                self.load_series();
            }
            ChartEvent::TimeframeChanged(timeframe) => {
                if timeframe == self.key.timeframe {
                    return;
                }
                log::info!("Timeframe changed: {} -> {}", self.key.timeframe, timeframe);
                self.key = SeriesKey::new(self.key.instrument.clone(), timeframe);
                self.load_series();
            }
            ChartEvent::ToolSelected(tool) => {
                self.tool = ToolMachine::new(tool, &self.annotations, &self.key);
            }
            ChartEvent::PointerDown(pos) => self.pointer_down(pos),
            ChartEvent::PointerDrag(pos) => self.tool.process(pos, &self.series),
            ChartEvent::PointerUp(pos) => {
                self.tool.end(pos, &self.series);
                self.commit_finished();
            }
            ChartEvent::PointerMove(_) => {}
            ChartEvent::PointerExit => self.pointer = None,
            ChartEvent::Scroll(delta) => {
                self.viewport.scroll_by(delta);
                self.refresh();
            }
            ChartEvent::ZoomIn => {
                if self.viewport.zoom_in() {
                    self.refresh();
                }
            }
            ChartEvent::ZoomOut => {
                if self.viewport.zoom_out() {
                    self.refresh();
                }
            }
            ChartEvent::ZoomReset => {
                if self.viewport.zoom_reset() {
                    self.refresh();
                }
            }
            ChartEvent::EraseOne(id) => self.erase(id),
            ChartEvent::EraseAll => {
                let removed = self.annotations.clear(&self.key);
                log::debug!("Erased {} annotations of {}", removed, self.key);
            }
        }

        if moves_viewport {
            let range = self.viewport.range();
            log::debug!(
                "Showing bars {}..{} of {} at width {}",
                range.start,
                range.end,
                self.series.len(),
                self.viewport.bar_width()
            );
        }
    }

    fn load_series(&mut self) {
        self.series = self.store.get(&self.key);

        let params = self.config.indicators_for_timeframe(self.key.timeframe);
        if params != self.params {
            self.engine = engine_for(&params);
            self.params = params;
            self.relayout();
        }

        self.viewport.set_range_limits(self.series.len());
        self.viewport.scroll_to_end();
        self.engine.on_series_changed();
        self.refresh();

        self.tool = ToolMachine::new(self.tool.tool(), &self.annotations, &self.key);
    }

    fn relayout(&mut self) {
        self.layout = ChartLayout::compute(
            self.bounds,
            self.engine.subsidiary().len(),
            self.config.chart.subsidiary_height_percent,
        );
        self.viewport.resize(self.layout.plot_width());
    }

    /// Re-range indicators for the current window and re-project every annotation.
    fn refresh(&mut self) {
        self.engine.recalculate(&self.series, self.viewport.range());

        if let Some((tool, chart_index)) = self.tool.annotation().map(|a| (a.tool(), a.chart_index)) {
            if let Some(projection) = projection_for(&self.layout, &self.engine, &self.viewport, tool, chart_index) {
                self.tool.zoom_changed(projection);
            }
        }

        for annotation in self.annotations.annotations_mut(&self.key) {
            let projection = projection_for(
                &self.layout,
                &self.engine,
                &self.viewport,
                annotation.tool(),
                annotation.chart_index,
            );
            annotation.zoom_changed(projection.unwrap_or_default());
        }
    }

    fn pointer_down(&mut self, pos: PixelPos) {
        if let ToolMachine::Erase(erase) = &self.tool {
            if let Some(id) = erase.hit_test(pos, &self.annotations, &self.key, &self.series) {
                self.erase(id);
            }
            return;
        }

        let tool = self.tool.tool();
        if !tool.is_drawing_tool() {
            return;
        }

        let chart_index = match self.tool.phase() {
            ToolPhase::BaseConfirmed => self.tool.annotation().map_or(0, |a| a.chart_index),
            _ if tool.spans_all_panes() => 0,
            _ => match self.layout.chart_index_at(pos) {
                Some(index) => index,
                None => return,
            },
        };

        if let Some(projection) = projection_for(&self.layout, &self.engine, &self.viewport, tool, chart_index) {
            self.tool.begin(pos, projection, chart_index, &self.series);
        }
    }

    fn commit_finished(&mut self) {
        let Some(annotation) = self.tool.take_finished() else {
            return;
        };
        let tool = annotation.tool();
        match self.annotations.insert(&self.key, annotation) {
            Ok(id) => log::debug!("Committed {} {} on {}", tool.name(), id, self.key),
            Err(e) => log::warn!("Dropped annotation: {}", e),
        }
    }

    fn erase(&mut self, id: DrawingId) {
        if self.annotations.remove(&self.key, id).is_some() {
            log::debug!("Erased annotation {} of {}", id, self.key);
        }
    }

    pub fn key(&self) -> &SeriesKey {
        &self.key
    }

    pub fn timeframe(&self) -> Timeframe {
        self.key.timeframe
    }

    pub fn series(&self) -> &OhlcvSeries {
        &self.series
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    pub fn engine(&self) -> &IndicatorEngine {
        &self.engine
    }

    pub fn tool(&self) -> &ToolMachine {
        &self.tool
    }

    pub fn visible_range(&self) -> VisibleRange {
        self.viewport.range()
    }

    pub fn value_range(&self, chart_index: usize) -> ValueRange {
        self.engine.value_range(chart_index)
    }

    /// Committed annotations of the current series.
    pub fn annotations(&self) -> Vec<&Annotation> {
        self.annotations.annotations(&self.key)
    }

    /// Erase buttons, present only while the erase tool is active.
    pub fn affordances(&self) -> Vec<EraseAffordance> {
        match &self.tool {
            ToolMachine::Erase(erase) => erase.affordances(&self.annotations, &self.key, &self.series),
            _ => Vec::new(),
        }
    }

    /// Render geometry of every committed annotation plus the one in progress.
    pub fn shapes(&self) -> Vec<Shape> {
        self.annotations()
            .into_iter()
            .chain(self.tool.annotation())
            .flat_map(|annotation| annotation.shapes(&self.series))
            .collect()
    }

    pub fn crosshair(&self) -> Option<Crosshair> {
        let position = self.pointer?;
        let chart_index = self.layout.chart_index_at(position)?;
        let area = self.layout.area(chart_index)?;
        let range = self.viewport.range();
        if range.is_empty() {
            return None;
        }

        let index = time_index_at(position.x, range, area, self.viewport.bar_width());
        Some(Crosshair {
            position,
            chart_index,
            index,
            timestamp: self.series.timestamp(index).unwrap_or(0.0),
            price: price_at(position.y, area, self.engine.value_range(chart_index)),
            readouts: self.engine.readouts(&self.series, index),
        })
    }
}

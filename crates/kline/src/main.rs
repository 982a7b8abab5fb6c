//! Kline - loads a series and prints what the chart would show.
//!
//! Usage: `kline [instrument] [timeframe]`, e.g. `kline 2330.tw 15m`.

use anyhow::Result;

use kline::{ChartEvent, ChartSession, PixelPos, PixelRect};
use kline_config::Config;
use kline_core::Timeframe;
use kline_data::{CsvDirectorySource, SeriesStore};

/// Chart region used for the printed summary.
const SUMMARY_BOUNDS: PixelRect = PixelRect::new(0, 0, 1280, 640);

fn run() -> Result<()> {
    env_logger::init();

    let config = Config::load_default();
    let root = config.data.get_root();
    log::info!("Data root: {}", root.display());

    let mut args = std::env::args().skip(1);
    let instrument = args.next();
    let timeframe = args.next().map(|s| s.parse::<Timeframe>()).transpose()?;

    let store = SeriesStore::new(CsvDirectorySource::new(root));
    let mut session = ChartSession::new(store, config);
    session.handle(ChartEvent::Resize(SUMMARY_BOUNDS));
    if let Some(instrument) = instrument {
        session.handle(ChartEvent::InstrumentChanged(instrument));
    }
    if let Some(timeframe) = timeframe {
        session.handle(ChartEvent::TimeframeChanged(timeframe));
    }

    let range = session.visible_range();
    println!("{}: {} bars, showing {}..{}", session.key(), session.series().len(), range.start, range.end);
    if range.is_empty() {
        println!("Nothing to draw");
        return Ok(());
    }

    for pane in 0..session.engine().pane_count() {
        let names: Vec<String> = session.engine().pane(pane).iter().map(|i| i.name()).collect();
        let value_range = session.value_range(pane);
        println!(
            "pane {}: {} [{:.2}, {:.2}]",
            pane,
            names.join(", "),
            value_range.min,
            value_range.max
        );
    }

    // Crosshair on the newest bar of the main pane
    if let Some(area) = session.layout().area(0) {
        session.handle(ChartEvent::PointerMove(PixelPos::new(area.right() - 1, area.y)));
    }
    if let Some(crosshair) = session.crosshair() {
        for readout in &crosshair.readouts {
            let line: Vec<String> = readout.iter().map(ToString::to_string).collect();
            println!("  {}", line.join("  "));
        }
    }

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
    }
}

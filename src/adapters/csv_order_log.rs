//! CSV output for fills and decision events.

use std::fs::File;
use std::io;
use std::path::Path;

use crate::adapters::paper_broker::Fill;
use crate::domain::error::BandtraderError;
use crate::domain::event::{SignalEvent, Trigger};

const FILL_HEADER: [&str; 6] = ["date", "action", "size", "price", "commission", "cash"];
const EVENT_HEADER: [&str; 8] = [
    "date", "action", "size", "price", "trigger", "upper", "trend", "average",
];

fn csv_error(e: csv::Error) -> BandtraderError {
    match e.into_kind() {
        csv::ErrorKind::Io(io) => BandtraderError::Io(io),
        other => BandtraderError::Data {
            reason: format!("CSV write error: {:?}", other),
        },
    }
}

pub fn write_fills<W: io::Write>(writer: W, fills: &[Fill]) -> Result<(), BandtraderError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(FILL_HEADER).map_err(csv_error)?;
    for fill in fills {
        wtr.write_record([
            fill.date.format("%Y-%m-%d").to_string(),
            fill.action.to_string(),
            fill.size.to_string(),
            format!("{:.4}", fill.price),
            format!("{:.4}", fill.commission),
            format!("{:.2}", fill.cash),
        ])
        .map_err(csv_error)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Columns that do not apply to a trigger are left empty.
pub fn write_events<W: io::Write>(
    writer: W,
    events: &[SignalEvent],
) -> Result<(), BandtraderError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(EVENT_HEADER).map_err(csv_error)?;
    for event in events {
        let (upper, trend, average) = match event.trigger {
            Trigger::BandBreakout { upper, trend } => {
                (format!("{upper:.4}"), format!("{trend:.4}"), String::new())
            }
            Trigger::AdaptiveAverageTouch { average, upper, .. } => {
                (format!("{upper:.4}"), String::new(), format!("{average:.4}"))
            }
        };
        wtr.write_record([
            event.date.format("%Y-%m-%d").to_string(),
            event.action.to_string(),
            event.size.to_string(),
            format!("{:.4}", event.price),
            event.trigger.name().to_string(),
            upper,
            trend,
            average,
        ])
        .map_err(csv_error)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_fills_to_path(path: &Path, fills: &[Fill]) -> Result<(), BandtraderError> {
    write_fills(File::create(path)?, fills)
}

pub fn write_events_to_path(path: &Path, events: &[SignalEvent]) -> Result<(), BandtraderError> {
    write_events(File::create(path)?, events)
}

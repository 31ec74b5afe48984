mod coerce;
pub mod config;
mod error;
mod format;
mod input;
mod ledger;
mod parser;
mod raster;
mod render;
mod sheet;
mod snapshot;
mod store;
mod writer;

/// Money and quantities as typed on the sheet. Only the discount is rounded
/// (to cents), everything else is plain float arithmetic.
pub type Amount = f64;

pub use coerce::{days_between, normalize_remarks, parse_amount, parse_date, round2};
pub use error::Error;
pub use format::{format_date, format_number};
pub use input::*;
pub use ledger::*;
pub use parser::{parse_csv, parse_from_reader, Header, ParserError};
pub use raster::{escape_xml, Image, RasterError, Rasterizer, SvgRasterizer};
pub use render::{render, Cell, Preview, ShortageSign};
pub use sheet::import_sheet;
pub use snapshot::{capture_snapshot, Snapshot};
pub use store::{
    FileStore, Gallery, KeyValueStore, MemoryStore, StoreError, DEFAULT_KEY, DEFAULT_MAX_ENTRIES,
};
pub use writer::{write_csv, OUTPUT_HEADERS};

/// Reads a batch of pattis, computes each one and writes the results.
/// Rows that fail to parse are skipped.
pub fn execute<R: std::io::Read, W: std::io::Write>(
    reader: R,
    writer: W,
) -> Result<(), error::Error> {
    let mut rows = Vec::new();
    for (line, session) in parse_csv(reader)?.enumerate() {
        match session {
            Ok(session) => {
                let output = session.output();
                rows.push((session.into_input(), output));
            }
            Err(error) => tracing::warn!(row = line + 1, %error, "skipping patti"),
        }
    }

    Ok(write_csv(rows.iter().map(|(i, o)| (i, o)), writer)?)
}

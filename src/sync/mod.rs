//! Incremental sync: reads rows, converts them to records and writes
//! Singer messages.
//!
//! # Example
//!
//! ```no_run
//! use sanetap::sync::{JsonSource, Tap};
//! use sanetap::TapConfig;
//!
//! fn main() -> sanetap::Result<()> {
//!     let config = TapConfig::from_file("config.json")?;
//!     let mut source = JsonSource::from_file("rows.json")?;
//!     let mut tap = Tap::new(config);
//!     tap.run(&mut source, &mut std::io::stdout().lock())?;
//!     Ok(())
//! }
//! ```

mod message;
mod source;
mod state;

pub use message::Message;
pub use source::{JsonSource, RecordSource};
pub use state::{Bookmark, State};

use std::io::Write;

use chrono::Utc;
use rayon::prelude::*;

use crate::config::{RenderErrorPolicy, TapConfig};
use crate::error::Result;
use crate::stream::{SpaceNodeRow, SpaceRow, StreamKind, StreamRow, UserRow};

/// Counts for one synced stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSummary {
    /// Stream synced
    pub stream: StreamKind,
    /// Rows received from the source
    pub fetched: usize,
    /// Rows older than the bookmark
    pub filtered: usize,
    /// Records written
    pub emitted: usize,
    /// Records dropped after a render failure
    pub skipped: usize,
}

/// Runs syncs for the configured streams.
#[derive(Debug)]
pub struct Tap {
    config: TapConfig,
    state: State,
}

impl Tap {
    /// Create a tap with no prior state.
    pub fn new(config: TapConfig) -> Self {
        Self::with_state(config, State::new())
    }

    /// Create a tap resuming from saved bookmarks.
    pub fn with_state(config: TapConfig, state: State) -> Self {
        Self { config, state }
    }

    /// Current bookmarks.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Sync every selected stream, writing messages to `out`.
    pub fn run<S, W>(&mut self, source: &mut S, out: &mut W) -> Result<Vec<StreamSummary>>
    where
        S: RecordSource + ?Sized,
        W: Write,
    {
        let mut summaries = Vec::new();
        for kind in self.config.selected_streams()? {
            let summary = match kind {
                StreamKind::Users => self.sync_stream::<UserRow, _, _>(kind, source, out)?,
                StreamKind::Spaces => self.sync_stream::<SpaceRow, _, _>(kind, source, out)?,
                StreamKind::SpaceNodes => {
                    self.sync_stream::<SpaceNodeRow, _, _>(kind, source, out)?
                }
            };
            log::info!(
                "{}: {} emitted, {} skipped, {} before bookmark",
                kind,
                summary.emitted,
                summary.skipped,
                summary.filtered
            );
            summaries.push(summary);
        }
        out.flush()?;
        Ok(summaries)
    }

    fn sync_stream<R, S, W>(
        &mut self,
        kind: StreamKind,
        source: &mut S,
        out: &mut W,
    ) -> Result<StreamSummary>
    where
        R: StreamRow,
        S: RecordSource + ?Sized,
        W: Write,
    {
        Message::schema(kind).write_to(out)?;

        let since = self
            .state
            .bookmark(kind)
            .unwrap_or_else(|| self.config.start_date());
        log::info!("syncing {} from {}", kind, since.to_rfc3339());

        let raw = source.fetch(kind)?;
        let fetched = raw.len();
        let mut rows = raw
            .into_iter()
            .map(serde_json::from_value::<R>)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.retain(|row| row.replication_value() >= since);
        rows.sort_by_key(|row| row.replication_value());
        let filtered = fetched - rows.len();

        let options = self.config.render_options();
        let converted: Vec<_> = rows
            .into_par_iter()
            .map(|row| {
                let value = row.replication_value();
                (value, row.into_record(&options))
            })
            .collect();

        let time_extracted = Utc::now();
        let mut summary = StreamSummary {
            stream: kind,
            fetched,
            filtered,
            emitted: 0,
            skipped: 0,
        };

        for (value, record) in converted {
            match record {
                Ok(record) => {
                    Message::record(kind, &record, time_extracted)?.write_to(out)?;
                    summary.emitted += 1;
                }
                Err(e)
                    if e.is_block_error()
                        && self.config.on_render_error == RenderErrorPolicy::Skip =>
                {
                    log::warn!("{}: dropping record: {}", kind, e);
                    summary.skipped += 1;
                }
                Err(e) => return Err(e),
            }
            self.state.advance(kind, value);
        }

        Message::State {
            value: self.state.clone(),
        }
        .write_to(out)?;

        Ok(summary)
    }
}

//! Lookahead pipeline
//!
//! Streams records through a [`CircularQueue`]: records are pulled from the
//! source in batches, consumed one at a time, and each consumed record is
//! emitted together with the records that follow it. The queue is topped up
//! whenever fewer records are pending than the lookahead needs, so it only
//! ever holds about one batch plus the lookahead window.

use crate::core::query::QuerySummary;
use crate::queue::CircularQueue;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Rendering of emitted windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// "seq: record | next | next"
    #[default]
    Text,
    /// One JSON object per window
    Json,
}

/// Tuning for a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Records pulled from the source per refill (at least 1)
    pub batch_size: usize,
    /// Records shown after the current one
    pub lookahead: usize,
    /// Slots reserved before the first refill
    pub initial_capacity: usize,
    pub output: OutputFormat,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            batch_size: 64,
            lookahead: 2,
            initial_capacity: 0,
            output: OutputFormat::Text,
        }
    }
}

/// A consumed record and the records right after it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Window {
    /// 1-based position of the record in the stream
    pub seq: u64,
    pub record: String,
    pub lookahead: Vec<String>,
}

/// Counters collected over a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PipelineStats {
    /// Records read from the source
    pub records: u64,
    /// Non-empty batches enqueued
    pub batches: u64,
    /// Windows emitted
    pub windows: u64,
    /// Largest queue capacity reached
    pub peak_capacity: usize,
}

/// Sliding-window stream processor over a record source
pub struct LookaheadPipeline<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    source: I,
    queue: CircularQueue<String>,
    options: PipelineOptions,
    stats: PipelineStats,
    exhausted: bool,
}

impl<I> LookaheadPipeline<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    pub fn new<S>(source: S, options: PipelineOptions) -> Self
    where
        S: IntoIterator<IntoIter = I>,
    {
        let options = PipelineOptions {
            batch_size: options.batch_size.max(1),
            ..options
        };
        let queue = CircularQueue::with_capacity(options.initial_capacity);
        let stats = PipelineStats {
            peak_capacity: queue.capacity(),
            ..PipelineStats::default()
        };

        Self {
            source: source.into_iter(),
            queue,
            options,
            stats,
            exhausted: false,
        }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    /// Produce the next window, or `None` once the source is drained
    pub fn next_window(&mut self) -> io::Result<Option<Window>> {
        while self.queue.len() <= self.options.lookahead && !self.exhausted {
            self.refill()?;
        }

        if !self.queue.advance() {
            return Ok(None);
        }
        let Some(record) = self.queue.take_value() else {
            return Ok(None);
        };

        let lookahead = (0..self.options.lookahead)
            .map_while(|offset| self.queue.peek(offset).cloned())
            .collect();

        self.stats.windows += 1;
        Ok(Some(Window {
            seq: self.stats.windows,
            record,
            lookahead,
        }))
    }

    /// Emit every remaining window to `out`
    pub fn run<W: Write>(&mut self, out: &mut W) -> io::Result<PipelineStats> {
        while let Some(window) = self.next_window()? {
            write_window(out, &window, self.options.output)?;
        }
        out.flush()?;

        log::debug!(
            "Pipeline drained: {} records in {} batches, peak capacity {}",
            self.stats.records,
            self.stats.batches,
            self.stats.peak_capacity
        );
        Ok(self.stats)
    }

    /// Pull up to one batch from the source into the queue
    ///
    /// Records read before a source error are still enqueued, so a caller
    /// that keeps iterating past the error sees them.
    fn refill(&mut self) -> io::Result<()> {
        let mut batch = Vec::with_capacity(self.options.batch_size);
        let mut failure = None;
        while batch.len() < self.options.batch_size {
            match self.source.next() {
                Some(Ok(record)) => batch.push(record),
                Some(Err(err)) => {
                    failure = Some(err);
                    break;
                }
                None => {
                    self.exhausted = true;
                    break;
                }
            }
        }

        if !batch.is_empty() {
            self.enqueue_batch(batch);
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn enqueue_batch(&mut self, batch: Vec<String>) {
        let batch_len = batch.len();
        self.queue.enqueue(batch);
        self.stats.records += batch_len as u64;
        self.stats.batches += 1;
        self.stats.peak_capacity = self.stats.peak_capacity.max(self.queue.capacity());

        log::trace!(
            "Enqueued batch of {} records ({} pending, capacity {})",
            batch_len,
            self.queue.len(),
            self.queue.capacity()
        );
    }
}

impl<I> Iterator for LookaheadPipeline<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    type Item = io::Result<Window>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_window().transpose()
    }
}

/// Write one window in the requested format
pub fn write_window<W: Write>(
    out: &mut W,
    window: &Window,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Text => {
            write!(out, "{}: {}", window.seq, window.record)?;
            for next in &window.lookahead {
                write!(out, " | {}", next)?;
            }
            writeln!(out)
        }
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, window)?;
            writeln!(out)
        }
    }
}

#[derive(Serialize)]
struct Summary<'a> {
    summary: &'a PipelineStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<&'a QuerySummary>,
}

/// Write the closing summary line
pub fn write_summary<W: Write>(
    out: &mut W,
    stats: &PipelineStats,
    query: Option<&QuerySummary>,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Text => {
            if let Some(query) = query {
                writeln!(
                    out,
                    "# query: {} (org {} / {})",
                    query.stmt, query.org, query.org_id
                )?;
            }
            writeln!(
                out,
                "# {} records, {} windows, {} batches, peak capacity {}",
                stats.records, stats.windows, stats.batches, stats.peak_capacity
            )
        }
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, &Summary { summary: stats, query })?;
            writeln!(out)
        }
    }
}

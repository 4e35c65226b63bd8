//! Command-line logger
use super::{LogError, Loggable, StatsLogger};
use crate::utils::fmt::{DisplayFn, PrettyPrint};
use crate::utils::stats::OnlineMeanVariance;
use std::collections::{btree_map::Entry, BTreeMap};
use std::io::{self, Write};
use std::time::{Duration, Instant};
use yansi::Paint;

/// Logger that displays summaries of every `interval` groups.
///
/// Each summary line shows the mean and standard deviation of a scalar,
/// or the running total of a counter.
#[derive(Debug)]
pub struct DisplayLogger<W: Write = io::Stdout> {
    writer: W,
    /// Number of groups per displayed chunk.
    interval: u64,
    groups_in_chunk: u64,
    // A binary tree so that entries are displayed in sorted order
    summaries: BTreeMap<&'static str, Summary>,
    chunk_start: Instant,
}

impl DisplayLogger<io::Stdout> {
    /// Display to standard output.
    pub fn new(interval: u64) -> Self {
        Self::with_writer(io::stdout(), interval)
    }
}

impl<W: Write> DisplayLogger<W> {
    pub fn with_writer(writer: W, interval: u64) -> Self {
        Self {
            writer,
            interval: interval.max(1),
            groups_in_chunk: 0,
            summaries: BTreeMap::new(),
            chunk_start: Instant::now(),
        }
    }

    fn write_chunk(&mut self) -> io::Result<()> {
        let elapsed = self.chunk_start.elapsed();
        let num_groups = self.groups_in_chunk;
        writeln!(
            self.writer,
            "{}",
            Paint::fixed(
                8,
                DisplayFn(|f| write!(f, "---- {} groups in {:.2?}", num_groups, elapsed))
            )
        )?;
        for (name, summary) in &self.summaries {
            if summary.is_dirty() {
                writeln!(
                    self.writer,
                    "{:<24} {}",
                    Paint::fixed(35, name),
                    DisplaySummary(summary, elapsed)
                )?;
            }
        }
        Ok(())
    }
}

impl<W: Write> StatsLogger for DisplayLogger<W> {
    fn group_start(&mut self) {}

    fn group_log(&mut self, name: &'static str, value: Loggable) -> Result<(), LogError> {
        match self.summaries.entry(name) {
            Entry::Vacant(e) => {
                e.insert(Summary::new(value));
                Ok(())
            }
            Entry::Occupied(mut e) => e
                .get_mut()
                .push(value)
                .map_err(|expected| LogError::new(name, value, expected)),
        }
    }

    fn group_end(&mut self) {
        self.groups_in_chunk += 1;
        if self.groups_in_chunk >= self.interval {
            self.flush();
        }
    }

    fn flush(&mut self) {
        if self.groups_in_chunk > 0 || self.summaries.values().any(Summary::is_dirty) {
            if let Err(err) = self.write_chunk() {
                log::warn!("failed to display log summary: {}", err);
            }
        }
        for summary in self.summaries.values_mut() {
            summary.reset();
        }
        self.groups_in_chunk = 0;
        self.chunk_start = Instant::now();
    }
}

impl<W: Write> Drop for DisplayLogger<W> {
    fn drop(&mut self) {
        self.flush();
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Summary {
    Scalar(OnlineMeanVariance<f64>),
    Counter { total: u64, increment: u64 },
}

impl Summary {
    fn new(value: Loggable) -> Self {
        match value {
            Loggable::Scalar(x) => Self::Scalar(std::iter::once(x).collect()),
            Loggable::CounterIncrement(inc) => Self::Counter {
                total: inc,
                increment: inc,
            },
        }
    }

    /// Add a value; on mismatch returns the expected kind.
    fn push(&mut self, value: Loggable) -> Result<(), &'static str> {
        match (self, value) {
            (Self::Scalar(stats), Loggable::Scalar(x)) => {
                stats.push(x);
                Ok(())
            }
            (Self::Counter { total, increment }, Loggable::CounterIncrement(inc)) => {
                *total += inc;
                *increment += inc;
                Ok(())
            }
            (Self::Scalar(_), _) => Err("scalar"),
            (Self::Counter { .. }, _) => Err("counter"),
        }
    }

    fn is_dirty(&self) -> bool {
        match self {
            Self::Scalar(stats) => stats.count() > 0,
            Self::Counter { increment, .. } => *increment > 0,
        }
    }

    fn reset(&mut self) {
        match self {
            Self::Scalar(stats) => *stats = OnlineMeanVariance::default(),
            Self::Counter { increment, .. } => *increment = 0,
        }
    }
}

struct DisplaySummary<'a>(&'a Summary, Duration);

impl std::fmt::Display for DisplaySummary<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.0 {
            Summary::Scalar(stats) => {
                write!(f, "{:.3}", PrettyPrint(stats.mean()))?;
                if let Some(stddev) = stats.variance().filter(|_| stats.count() > 1).map(f64::sqrt)
                {
                    write!(
                        f,
                        " {}",
                        Paint::fixed(8, DisplayFn(|f| write!(f, "(σ {:.3})", PrettyPrint(stddev))))
                    )?;
                }
                Ok(())
            }
            Summary::Counter { total, increment } => {
                write!(f, "{}  (+{})", total, Paint::fixed(253, increment))?;
                let secs = self.1.as_secs_f64();
                if secs > 0.0 {
                    #[allow(clippy::cast_precision_loss)]
                    let rate = *increment as f64 / secs;
                    write!(
                        f,
                        "  {}",
                        Paint::fixed(111, DisplayFn(|f| write!(f, "{:.2}/s", PrettyPrint(rate))))
                    )?;
                }
                Ok(())
            }
        }
    }
}

//! Subcommand handlers. Each prints to stdout, as text or as JSON.

use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use chrono::DateTime;
use period_engine::{
    format_seconds, Clock, EpochSeconds, Interval, IntervalOptions, Period, PeriodChunk, Unit,
};
use serde::{Serialize, Serializer};
use serde_json::json;
use tracing::debug;

use crate::cli::{AgoArgs, AlignArgs, BucketArgs, ConvertArgs, ExpressionArgs, FormatArgs};

/// Output settings shared by every subcommand.
pub struct Output {
    pub json: bool,
}

impl Output {
    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", text());
        }
        Ok(())
    }
}

pub fn inspect(args: &ExpressionArgs, out: &Output) -> Result<()> {
    let period = parse_period(&args.expression)?;
    out.emit(&period, || {
        let chunks: Vec<String> = period.chunks().iter().map(ToString::to_string).collect();
        format!(
            "expression:    {}\ntotal_seconds: {}\ndominant_unit: {}\nchunks:        {}",
            period,
            period.total_seconds(),
            period.dominant_unit().map_or("none", Unit::name),
            chunks.join(" "),
        )
    })
}

pub fn seconds(args: &ExpressionArgs, out: &Output) -> Result<()> {
    let total = parse_period(&args.expression)?.total_seconds();
    out.emit(&json!({ "total_seconds": total }), || total.to_string())
}

pub fn ago(args: &AgoArgs, clock: &impl Clock, out: &Output) -> Result<()> {
    let period = parse_period(&args.expression)?;
    let timestamp = period.ago(clock, args.precision.into());
    out.emit(&json!({ "timestamp": timestamp }), || timestamp.to_string())
}

/// Which way [`align`] moves the timestamp.
#[derive(Debug, Clone, Copy)]
pub enum Direction {
    Reset,
    Fill,
}

pub fn align(
    args: &AlignArgs,
    direction: Direction,
    clock: &impl Clock,
    out: &Output,
) -> Result<()> {
    let period = parse_period(&args.expression)?;
    let anchor = match &args.timestamp {
        Some(raw) => parse_anchor(raw)?,
        None => clock.now(),
    };
    let (aligned, datetime) = match direction {
        Direction::Reset => (period.reset(anchor), period.reset_datetime(anchor)),
        Direction::Fill => (period.fill(anchor), period.fill_datetime(anchor)),
    };
    // chrono covers a narrower range than f64 seconds.
    let datetime = match datetime {
        Ok(datetime) => Some(datetime.to_rfc3339()),
        Err(err) => {
            debug!(%err, "no calendar datetime for aligned timestamp");
            None
        }
    };
    debug!(anchor, aligned, ?direction, "aligned timestamp");

    out.emit(
        &json!({ "timestamp": aligned, "datetime": datetime }),
        || match &datetime {
            Some(datetime) => format!("{aligned}\t{datetime}"),
            None => aligned.to_string(),
        },
    )
}

pub fn convert(args: &ConvertArgs, out: &Output) -> Result<()> {
    let period = parse_period(&args.expression)?;
    let sum = period
        .chunks()
        .iter()
        .copied()
        .reduce(|total, chunk| total + chunk)
        .unwrap_or_else(|| PeriodChunk::forced(0.0, Unit::Minute));
    let converted = sum.to_unit_code(&args.unit)?;
    out.emit(&converted, || converted.to_string())
}

#[derive(Serialize)]
struct BucketListing<'a> {
    interval: &'a Interval,
    #[serde(serialize_with = "serialize_buckets")]
    buckets: &'a Interval,
}

/// Writes the buckets as a JSON array straight from the lazy iterator.
fn serialize_buckets<S: Serializer>(
    interval: &&Interval,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_seq(interval.buckets())
}

pub fn buckets(args: &BucketArgs, clock: &impl Clock, out: &Output) -> Result<()> {
    let period = parse_period(&args.expression)?;
    let options = IntervalOptions {
        before: args.before.as_deref().map(parse_period).transpose()?,
        step: args.step.as_deref().map(parse_period).transpose()?,
        natural: !args.no_natural,
    };
    let interval = Interval::from_period_with_clock(&period, clock, &options)?;

    // Both forms write straight from the lazy iterator.
    let mut stdout = BufWriter::new(io::stdout().lock());
    if out.json {
        let listing = BucketListing {
            interval: &interval,
            buckets: &interval,
        };
        serde_json::to_writer_pretty(&mut stdout, &listing)?;
        writeln!(stdout)?;
    } else {
        let mut count = 0_u64;
        for bucket in &interval {
            writeln!(stdout, "{}\t{}", bucket.after(), bucket.before())?;
            count += 1;
        }
        debug!(count, "listed buckets");
    }
    stdout.flush()?;
    Ok(())
}

pub fn format(args: &FormatArgs, out: &Output) -> Result<()> {
    let rendered = format_seconds(args.seconds, &args.pattern);
    out.emit(&json!({ "formatted": rendered }), || rendered.clone())
}

fn parse_period(expression: &str) -> Result<Period> {
    Period::parse(expression).with_context(|| format!("can't parse duration '{expression}'"))
}

/// Epoch seconds, or an RFC 3339 datetime.
fn parse_anchor(raw: &str) -> Result<f64> {
    if let Ok(seconds) = raw.parse::<f64>() {
        return Ok(seconds);
    }
    let datetime = DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("'{raw}' is neither epoch seconds nor an RFC 3339 datetime"))?;
    Ok(datetime.epoch_seconds())
}

//! CLI argument definitions for `period`.

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use period_engine::Precision;

/// Parse compact duration strings ("2w1.5d", "15M"), snap timestamps to
/// natural boundaries, and split time ranges into buckets.
#[derive(Debug, Parser)]
#[command(name = "period")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Use this epoch timestamp (seconds) as "now" instead of the system clock.
    #[arg(long, global = true, value_name = "SECONDS", allow_negative_numbers = true)]
    pub now: Option<f64>,

    /// Output JSON instead of plain text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Log to stderr; repeat for more detail (-v debug, -vv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the normalized chunks, total seconds, and dominant unit.
    Inspect(ExpressionArgs),

    /// Print the total number of seconds in a duration.
    Seconds(ExpressionArgs),

    /// Print the timestamp a duration before now.
    Ago(AgoArgs),

    /// Round a timestamp down to the duration's natural boundary.
    Reset(AlignArgs),

    /// Advance a timestamp to the duration's next natural boundary.
    Fill(AlignArgs),

    /// Express a duration in a single unit.
    Convert(ConvertArgs),

    /// Build the interval covering a duration and list its buckets.
    Buckets(BucketArgs),

    /// Render a number of seconds through a pattern.
    Format(FormatArgs),
}

#[derive(Debug, Args)]
pub struct ExpressionArgs {
    /// A duration such as "2w1.5d", "15M", or "now".
    pub expression: String,
}

#[derive(Debug, Args)]
pub struct AgoArgs {
    /// A duration such as "2w1.5d", "15M", or "now".
    pub expression: String,

    /// Resolution of the printed timestamp.
    #[arg(long, value_enum, default_value_t = PrecisionArg::Seconds)]
    pub precision: PrecisionArg,
}

#[derive(Debug, Args)]
pub struct AlignArgs {
    /// A duration whose dominant unit picks the boundary.
    pub expression: String,

    /// Epoch seconds or an RFC 3339 datetime. Defaults to now.
    #[arg(allow_hyphen_values = true)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// A duration such as "2w1.5d".
    pub expression: String,

    /// Target unit code: M, H, d, w, or m.
    pub unit: String,
}

#[derive(Debug, Args)]
pub struct BucketArgs {
    /// Length of the interval, e.g. "1d".
    pub expression: String,

    /// End the interval this long before now, e.g. "1w".
    #[arg(long, value_name = "DURATION")]
    pub before: Option<String>,

    /// Bucket size, e.g. "1H".
    #[arg(long, value_name = "DURATION")]
    pub step: Option<String>,

    /// Keep the end at "now" instead of snapping it to a natural boundary.
    #[arg(long)]
    pub no_natural: bool,
}

#[derive(Debug, Args)]
pub struct FormatArgs {
    /// Number of seconds.
    #[arg(allow_negative_numbers = true)]
    pub seconds: f64,

    /// Pattern with %d, %h, %m, %s, and %ms placeholders.
    #[arg(long, default_value = period_engine::format::DEFAULT_PATTERN)]
    pub pattern: String,
}

/// `--precision` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PrecisionArg {
    Seconds,
    Millis,
    Fractional,
}

impl From<PrecisionArg> for Precision {
    fn from(arg: PrecisionArg) -> Self {
        match arg {
            PrecisionArg::Seconds => Precision::Seconds,
            PrecisionArg::Millis => Precision::Millis,
            PrecisionArg::Fractional => Precision::Fractional,
        }
    }
}

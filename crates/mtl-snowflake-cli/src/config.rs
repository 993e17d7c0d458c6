use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use mtl_snowflake::{
    DEFAULT_EPOCH, DEFAULT_NODE_BITS, DEFAULT_SEQ_BITS, DEFAULT_TIME_BITS, DEFAULT_TIMELINE_BITS,
    Settings, TIME_UNIT_NANOS,
};

/// Runtime configuration for the `mtl-snowflake` binary.
///
/// Every layout setting can come from a flag or an environment variable (a
/// `.env` file is honoured). The four bit widths must add up to 63, and every
/// node in a fleet must share them and the epoch while using a distinct node
/// id.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "mtl-snowflake",
    version,
    about = "Generate and inspect multi-timeline Snowflake IDs"
)]
pub struct CliArgs {
    /// Node identifier encoded into every generated ID.
    ///
    /// Must be within `0..=2^node_bits - 1` and unique across the fleet.
    ///
    /// Environment variable: `NODE_ID`
    #[arg(long, env = "NODE_ID", default_value_t = 0, allow_negative_numbers = true)]
    pub node_id: i64,

    /// Width of the time field.
    ///
    /// Environment variable: `TIME_BITS`
    #[arg(long, env = "TIME_BITS", default_value_t = DEFAULT_TIME_BITS)]
    pub time_bits: u8,

    /// Width of the node id field.
    ///
    /// Environment variable: `NODE_BITS`
    #[arg(long, env = "NODE_BITS", default_value_t = DEFAULT_NODE_BITS)]
    pub node_bits: u8,

    /// Width of the timeline field. `2^timeline_bits` timelines are kept.
    ///
    /// Environment variable: `TIMELINE_BITS`
    #[arg(long, env = "TIMELINE_BITS", default_value_t = DEFAULT_TIMELINE_BITS)]
    pub timeline_bits: u8,

    /// Width of the sequence field.
    ///
    /// Environment variable: `SEQ_BITS`
    #[arg(long, env = "SEQ_BITS", default_value_t = DEFAULT_SEQ_BITS)]
    pub seq_bits: u8,

    /// Epoch in milliseconds since 1970-01-01 UTC. Defaults to 2020-06-10.
    ///
    /// Environment variable: `EPOCH_MS`
    #[arg(long, env = "EPOCH_MS", default_value_t = DEFAULT_EPOCH / TIME_UNIT_NANOS)]
    pub epoch_ms: i64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Generate IDs, one per line.
    Generate {
        /// How many IDs to generate.
        #[arg(short = 'n', long, env = "COUNT", default_value_t = 1)]
        count: usize,

        /// Also print the readable form next to each ID.
        #[arg(short, long, default_value_t = false)]
        readable: bool,
    },
    /// Print the time, node, timeline and sequence fields of IDs.
    Decompose {
        #[arg(required = true, allow_negative_numbers = true)]
        ids: Vec<i64>,
    },
    /// Print the readable form of IDs.
    Readable {
        #[arg(required = true, allow_negative_numbers = true)]
        ids: Vec<i64>,
    },
}

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub node_id: i64,
    pub settings: Settings,
    pub command: Command,
}

impl TryFrom<CliArgs> for CliConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let epoch = args
            .epoch_ms
            .checked_mul(TIME_UNIT_NANOS)
            .ok_or_else(|| anyhow::anyhow!("EPOCH_MS ({}) overflows nanoseconds", args.epoch_ms))?;

        let settings = Settings::default()
            .with_time_bits(args.time_bits)
            .with_node_bits(args.node_bits)
            .with_timeline_bits(args.timeline_bits)
            .with_seq_bits(args.seq_bits)
            .with_epoch(epoch);
        let layout = settings.layout().context("invalid ID layout")?;

        if !(0..=layout.max_node_id()).contains(&args.node_id) {
            bail!(
                "NODE_ID ({}) exceeds available node id space (max = {})",
                args.node_id,
                layout.max_node_id()
            );
        }

        if let Command::Generate { count: 0, .. } = args.command {
            bail!("COUNT must be greater than 0");
        }

        Ok(Self {
            node_id: args.node_id,
            settings,
            command: args.command,
        })
    }
}

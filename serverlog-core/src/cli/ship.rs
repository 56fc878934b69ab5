use crate::record::{Level, LogRecord};
use crate::ship::LogShipper;
use anyhow::{Context, Result};
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Args, Debug)]
pub struct ShipArgs {
    /// Server to send to
    #[arg(long, default_value = "127.0.0.1:9911")]
    pub host: String,

    /// Channel of every shipped record
    #[arg(long, default_value = "app")]
    pub channel: String,

    /// Level name or number
    #[arg(long, default_value = "info")]
    pub level: Level,

    /// Correlation id attached to every record
    #[arg(long)]
    pub log_id: Option<String>,
}

impl ShipArgs {
    pub fn record(&self, message: &str) -> LogRecord {
        let record = LogRecord::new(self.level, self.channel.as_str(), message);
        match &self.log_id {
            Some(id) => record.with_log_id(id.as_str()),
            None => record,
        }
    }
}

/// Ship each non-empty stdin line as one record.
pub fn run_ship(args: ShipArgs) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let mut shipper = LogShipper::connect(&args.host)
            .await
            .with_context(|| format!("failed to connect to {}", args.host))?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut sent = 0usize;
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            shipper.send(&args.record(&line)).await?;
            sent += 1;
        }

        shipper.close().await?;
        tracing::debug!(sent, "stdin exhausted");
        Ok::<_, anyhow::Error>(())
    })
}

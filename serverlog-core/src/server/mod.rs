//! The viewer's control loop.
//!
//! [`LogServer`] owns the [`SocketMultiplexer`] and a [`RecordPipeline`] and
//! runs both on one task: every line is decoded, filtered and rendered before
//! the next one is pulled from the sockets. Nothing here is shared, so nothing
//! is locked.

mod error;
mod pipeline;


pub use error::ServerError;
pub use pipeline::{LineOutcome, RecordPipeline};

use crate::conf::ViewerConfig;
use crate::filter::FilterEvaluator;
use crate::net::SocketMultiplexer;
use crate::record::PROTOCOL_VERSION;
use crate::render::LogRenderer;
use anyhow::Result;
use std::io::{self, Write};
use std::net::SocketAddr;

pub struct LogServer<W> {
    multiplexer: SocketMultiplexer,
    pipeline: RecordPipeline<W>,
}

impl<W: Write> LogServer<W> {
    /// Compile the filter, then bind. Either failing is fatal.
    pub async fn bind(config: &ViewerConfig, sink: W) -> Result<Self, ServerError> {
        let filter = FilterEvaluator::from_config(config.filter.as_deref())?;
        if let Some(filter) = &filter {
            tracing::debug!(expression = filter.expression(), "filter compiled");
        }

        let multiplexer = SocketMultiplexer::bind(&config.listen)
            .await
            .map_err(|source| ServerError::Bind {
                address: config.listen.to_string(),
                source,
            })?;

        tracing::info!(
            address = %config.listen,
            protocol = PROTOCOL_VERSION,
            "listening for log records"
        );

        let renderer = LogRenderer::new(sink, config.formatter(), config.gate());

        Ok(Self {
            multiplexer,
            pipeline: RecordPipeline::new(filter, renderer),
        })
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.multiplexer.local_addr()
    }

    /// Runs until the filter or the output fails.
    pub async fn run(mut self) -> Result<(), ServerError> {
        loop {
            let (connection, line) = self.multiplexer.next_line().await;
            let outcome = self.pipeline.process(connection, &line)?;
            tracing::trace!(connection, ?outcome, "line processed");
        }
    }

    /// Like [`run`](Self::run), but a Ctrl-C ends the loop with `Ok`.
    /// Open connections are dropped, not drained.
    pub async fn run_until_ctrl_c(self) -> Result<(), ServerError> {
        tokio::select! {
            res = self.run() => res,
            signal = tokio::signal::ctrl_c() => {
                signal.map_err(ServerError::Signal)?;
                tracing::info!("interrupted, shutting down");
                Ok(())
            }
        }
    }
}

/// Serve on a current-thread runtime, rendering to stdout.
pub fn run(config: ViewerConfig) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let server = LogServer::bind(&config, io::stdout()).await?;
        server.run_until_ctrl_c().await
    })?;

    Ok(())
}

use crate::filter::FilterError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("server start failed on \"{address}\": {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("failed to write to the output: {0}")]
    Output(#[from] io::Error),

    #[error("failed to listen for Ctrl-C: {0}")]
    Signal(#[source] io::Error),
}

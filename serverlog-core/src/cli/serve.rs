use crate::conf::{ConfigOverrides, load_config_file, resolve};
use crate::logging::stdout_is_terminal;
use crate::render::Verbosity;
use crate::server;
use anyhow::Result;
use clap::{ArgAction, Args};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Address to listen on: [tcp://]host:port or unix:///path (default 0:9911)
    #[arg(long, env = "SERVERLOG_HOST")]
    pub host: Option<String>,

    /// Line template, e.g. "%datetime% %level_name% %message%\n"
    #[arg(long)]
    pub format: Option<String>,

    /// strftime template for %datetime%
    #[arg(long)]
    pub date_format: Option<String>,

    /// Only show records matching this expression, e.g. "level > 200 or channel in ['app']"
    #[arg(long)]
    pub filter: Option<String>,

    /// HCL file supplying defaults for the options above
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Show lower levels: -v notice, -vv info, -vvv debug with multi-line context
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only show errors and above
    #[arg(short, long)]
    pub quiet: bool,

    /// Force colored output
    #[arg(long, conflicts_with = "no_ansi")]
    pub ansi: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_ansi: bool,
}

impl ServeArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        let verbosity =
            (self.quiet || self.verbose > 0).then(|| Verbosity::from_flags(self.quiet, self.verbose));

        let colors = match (self.ansi, self.no_ansi) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };

        ConfigOverrides {
            listen: self.host.clone(),
            format: self.format.clone(),
            date_format: self.date_format.clone(),
            filter: self.filter.clone(),
            colors,
            verbosity,
        }
    }
}

pub fn run_serve(args: ServeArgs) -> Result<()> {
    let file = args.config.as_deref().map(load_config_file).transpose()?;
    let config = resolve(args.overrides(), file, stdout_is_terminal())?;

    tracing::debug!(?config, "configuration resolved");
    server::run(config)
}

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    /// Refresh period of the running display, in milliseconds.
    #[arg(
        short,
        long,
        env = "WEBWATCH_INTERVAL_MS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval_ms: u64,

    /// Print frames without ANSI codes, only after key presses.
    #[arg(short, long, env = "WEBWATCH_PLAIN")]
    pub plain: bool,

    /// Log filter in env_logger syntax, e.g. "webwatch=debug".
    #[arg(short, long, env = "WEBWATCH_LOG")]
    pub log_filter: Option<String>,
}

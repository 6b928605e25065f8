use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "pollflow-server", version, about = "Poll creation and voting server")]
pub struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "pollflow.toml")]
    pub config: String,

    /// Directory holding the built web UI (overrides the config file).
    #[arg(long)]
    pub web_dir: Option<String>,
}

use clap::Parser;
use wallgen_cli::{init_tracing, run, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());
    run(cli, &mut std::io::stdout().lock())
}

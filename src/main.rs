mod cli;
mod compiler;
mod config;
mod convert;
mod logging;
mod runner;

fn main() -> anyhow::Result<()> {
    let app = cli::parse();
    logging::init(app.verbose);
    runner::run(app)
}

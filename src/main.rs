use {
    anyhow::Result,
    clap::Parser,
    replay_rl::cli::{
        run,
        Args,
    },
};

fn main() -> Result<()> {
    run(Args::parse())
}

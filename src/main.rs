use anyhow::Result;

fn main() -> Result<()> {
    // Progress and diagnostics both go to stderr; stdout stays clean.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    source_atlas::cli::run()
}

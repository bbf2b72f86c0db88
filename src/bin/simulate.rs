use mazehunt::app::App;

fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let app = App::default();

    let mut args = std::env::args();
    args.next(); // Skip executable name
    let runs = args.next().and_then(|s| s.parse::<u64>().ok()).unwrap_or(100);
    let base_seed = args.next().and_then(|s| s.parse::<u64>().ok()).unwrap_or(0);
    app.profile(runs, base_seed, 100_000)?;
    Ok(())
}

use mazehunt::app::App;

fn main() -> std::io::Result<()> {
    init_logging();

    // Optional seed for a reproducible board
    let mut args = std::env::args();
    args.next(); // Skip executable name
    let seed = args.next().and_then(|s| s.parse::<u64>().ok());

    let mut stdout = std::io::stdout();
    App::setup_terminal(&mut stdout)?;
    let result = App::default().run(&mut stdout, seed);
    App::restore_terminal(&mut stdout)?;
    result
}

/// Log to a file only: the game owns the terminal in raw mode, so anything
/// written to stderr would tear the board apart.
fn init_logging() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let file_appender = tracing_appender::rolling::never(".", "mazehunt.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    // Keep the non-blocking writer alive for the process lifetime
    std::mem::forget(guard);
}

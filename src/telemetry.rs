use tracing_subscriber::filter::LevelFilter;

/// Installs a fmt subscriber at `level`. Safe to call more than once; later
/// calls are ignored if a global subscriber is already set.
pub fn init_tracing(level: LevelFilter) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .try_init();
}

/// Flame output for `inferno-flamegraph`, written next to the bench invocation.
#[cfg(feature = "tracing")]
const FLAME_FILE: &str = "./rsg-bench.folded";

/// Install a subscriber for bench runs. `RUST_LOG` overrides the default `rsg=debug` filter.
#[cfg(feature = "tracing")]
#[must_use]
pub fn init_tracing() -> impl Drop {
    use tracing_flame::FlameLayer;
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rsg=debug"));
    let fmt_layer = fmt::Layer::default().with_writer(std::io::stderr);
    let (flame_layer, guard) = FlameLayer::with_file(FLAME_FILE).unwrap();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(flame_layer)
        .init();

    guard
}

#[cfg(not(feature = "tracing"))]
#[allow(clippy::missing_const_for_fn)]
pub fn init_tracing() {}

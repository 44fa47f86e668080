//! Command line driver for the binding compiler: input expansion, parallel
//! per-file compilation and output writing.

pub mod compile;

/// `RUST_LOG` controls verbosity; compiler crates log at `info` by default.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();
}

use log::LevelFilter;

/// Installs `env_logger` with a `warn` default. `RUST_LOG` directives are
/// applied on top of that default; a `-v` flag then wins for this tool and
/// the core crate.
pub fn init(verbose: u8) -> anyhow::Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Warn);
    builder.parse_default_env();

    if let Some(level) = verbosity_level(verbose) {
        builder.filter_module("ipgeolocation_core", level);
        builder.filter_module("ipgeo", level);
    }
    builder.format_timestamp(None);

    builder.try_init()?;
    Ok(())
}

/// Level forced by `-v` flags; `None` leaves `RUST_LOG` in charge.
fn verbosity_level(verbose: u8) -> Option<LevelFilter> {
    match verbose {
        0 => None,
        1 => Some(LevelFilter::Info),
        2 => Some(LevelFilter::Debug),
        _ => Some(LevelFilter::Trace),
    }
}

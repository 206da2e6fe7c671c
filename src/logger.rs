use data::log::Error;

pub fn setup(is_debug: bool) -> Result<(), Error> {
    let level_filter = if is_debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let mut logger = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}: {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ));
        })
        .level(log::LevelFilter::Off)
        .level_for("busymap", level_filter)
        .level_for("busymap_data", level_filter);

    if is_debug {
        logger = logger.chain(std::io::stdout());
    } else {
        logger = logger.chain(data::log::file()?);
    }

    logger.apply()?;
    Ok(())
}

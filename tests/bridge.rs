use mtlog_verbose::{Error, LogBuffer, Verbosity, facility_config};

#[test]
fn test_log_crate_bridge() {
    let buffer = LogBuffer::new();
    let facility = facility_config()
        .with_color(false)
        .with_writer(buffer.clone())
        .build();
    facility.logger("bridge").install().unwrap();
    assert_eq!(
        facility.logger(()).install().unwrap_err(),
        Error::LoggerAlreadySet
    );

    log::warn!("hidden warning");
    log::debug!("hidden debug");
    assert!(buffer.contents().is_empty());

    log::info!("info {}", 1);
    let block = buffer.take();
    assert_eq!(block.lines().count(), 3);
    assert!(block.contains("Logger: bridge >>>>>"));
    assert!(block.contains("[日志] info 1\n"));

    let line = line!() + 1;
    log::error!("broken");
    let block = buffer.take();
    assert!(block.starts_with(&format!("tests/bridge.rs:{line}\n")), "{block}");
    assert!(block.contains("[错误] broken\n"));

    facility.set_verbosity(Verbosity::Debug);
    log::trace!("deep");
    assert!(buffer.take().contains("[调试] deep\n"));
}

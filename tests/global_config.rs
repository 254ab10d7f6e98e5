// Kept in its own test binary: it mutates process-wide settings.

use bf::config::{self, ConfigError};
use bf::{CellWidth, InterpreterConfig};

#[test]
fn execute_follows_process_wide_settings() {
    assert_eq!(config::global(), InterpreterConfig::DEFAULT);

    let err = config::set_global(InterpreterConfig {
        tape_length: 0,
        ..InterpreterConfig::DEFAULT
    })
    .unwrap_err();
    assert!(matches!(err, ConfigError::ZeroTapeLength));
    assert_eq!(config::global(), InterpreterConfig::DEFAULT);

    config::set_global(InterpreterConfig {
        tape_length: 2,
        cell_width: CellWidth::Sixteen,
        console_echo: false,
    })
    .expect("valid settings");

    let report = bf::execute("<-", None, None).expect("run");
    assert_eq!(report.tape.len(), 2);
    assert_eq!(report.tape.pointer(), 1);
    assert_eq!(report.tape.cells()[1], 65535);
}

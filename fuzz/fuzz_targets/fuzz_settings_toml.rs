#![no_main]

use libfuzzer_sys::fuzz_target;
use vaultstat_settings::Settings;

const MAX_INPUT_SIZE: usize = 8 * 1024;

fuzz_target!(|data: &[u8]| {
    if data.len() > MAX_INPUT_SIZE {
        return;
    }
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(settings) = Settings::parse(text) {
        assert!(settings.drain_interval_ms > 0);
        assert_eq!(settings.drain_interval().as_millis(), u128::from(settings.drain_interval_ms));
        let _ = settings.exclude_set();
    }
});

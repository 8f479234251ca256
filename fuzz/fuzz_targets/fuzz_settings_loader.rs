#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Arbitrary TOML must either parse or be rejected, never panic.
    if let Ok(settings) = receipt_config::load_toml(data) {
        let _ = settings.validate();
    }
});

use std::env;

/// Compile-time defaults for session options, overridable from the environment
const DEFAULTS: &[(&str, u64)] = &[
    // Quiet period before an auto-save
    ("WEBCONF_SAVE_DELAY_MS", 5_000),
    // Length of the timed configuration window
    ("WEBCONF_WINDOW_TIMEOUT_MS", 300_000),
    // Bytes reserved for the configuration record
    ("WEBCONF_STORAGE_CAPACITY", 4_096),
];

fn main() {
    for &(name, default) in DEFAULTS {
        let value = match env::var(name) {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(value) => {
                    println!("cargo:warning=Using {} from environment: {}", name, value);
                    value
                }
                Err(_) => {
                    println!(
                        "cargo:warning=Ignoring invalid {}={:?}, using {}",
                        name, raw, default
                    );
                    default
                }
            },
            Err(_) => default,
        };
        println!("cargo:rustc-env={}={}", name, value);
        println!("cargo:rerun-if-env-changed={}", name);
    }
}

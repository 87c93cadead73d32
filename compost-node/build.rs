use std::env;

use dotenvy::from_path;

// Wi-Fi and backend credentials are injected at build time so they never live
// in the source tree. Missing variables fall back to placeholders that keep
// the firmware buildable for bench work without a `.env` file.
const BUILD_ENV: &[(&str, &str)] = &[
    ("COMPOST_WIFI_SSID", "ssid"),
    ("COMPOST_WIFI_PASS", ""),
    ("COMPOST_API_KEY", "api-key"),
    ("COMPOST_DATABASE_URL", "https://example.firebaseio.com"),
    ("COMPOST_USER_EMAIL", "user@example.com"),
    ("COMPOST_USER_PASSWORD", "password"),
    ("COMPOST_STORAGE_BUCKET", "example.appspot.com"),
];

fn main() {
    let _ = from_path(".env");

    println!("cargo:rerun-if-changed=.env");

    for (name, default) in BUILD_ENV {
        let value = env::var(name).unwrap_or_else(|_| (*default).to_string());
        println!("cargo:rustc-env={name}={value}");
    }

    embuild::espidf::sysenv::output();
}

use std::process::Command;
use chrono::TimeZone;

fn main() {
    // Short commit shown in the footer
    let hash = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .unwrap_or_else(|| "dev".to_string());
    println!("cargo:rustc-env=BUILD_HASH={}", hash);

    // Local build time with zone abbreviation, e.g. 2024-05-01 14:03 PDT
    let now = chrono::Local::now();
    let zone = iana_time_zone::get_timezone()
        .ok()
        .and_then(|name| name.parse::<chrono_tz::Tz>().ok())
        .map(|tz| tz.from_utc_datetime(&now.naive_utc()).format("%Z").to_string())
        .unwrap_or_default();
    println!("cargo:rustc-env=BUILD_TIMESTAMP={} {}", now.format("%Y-%m-%d %H:%M"), zone);

    println!("cargo:rerun-if-env-changed=BOARDSHELF_API_BASE");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads");
}

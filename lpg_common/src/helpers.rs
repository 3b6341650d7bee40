use std::{env, fmt::Display, str::FromStr, time::Duration};

use log::*;

/// Reads and parses the environment variable `name`. If it is not set, or cannot be parsed, `default` is returned and
/// the reason is logged.
pub fn env_or_default<T>(name: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(name) {
        Ok(s) => s.trim().parse::<T>().unwrap_or_else(|e| {
            warn!("🪛️ Invalid configuration value for {name} ({s}). {e}. Using the default, {default}, instead.");
            default
        }),
        Err(_) => {
            info!("🪛️ {name} is not set. Using the default value of {default}.");
            default
        },
    }
}

/// Reads a whole number of `unit_secs`-second units from `name`, e.g. hours when `unit_secs` is 3600.
///
/// Values too large to represent saturate at `u64::MAX` seconds. Callers should clamp the result to something sensible.
pub fn env_duration(name: &str, default: Duration, unit_secs: u64) -> Duration {
    let unit_secs = unit_secs.max(1);
    let units = env_or_default(name, default.as_secs() / unit_secs);
    Duration::from_secs(units.saturating_mul(unit_secs))
}

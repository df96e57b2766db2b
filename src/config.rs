//! Runtime configuration
//!
//! Defaults match a 128x64 module on `/dev/i2c-1` at `0x3C`. Each field can
//! be overridden through an `OLED_*` environment variable.

use std::str::FromStr;

use crate::ssd1306::driver::DEFAULT_CHUNK_SIZE;
use crate::ssd1306::error::{Error, Result};
use crate::ssd1306::interface::DEFAULT_ADDRESS;
use crate::ssd1306::{HEIGHT, WIDTH};

/// I2C bus index override
pub const ENV_BUS: &str = "OLED_I2C_BUS";
/// Device address override, decimal or `0x` hex
pub const ENV_ADDRESS: &str = "OLED_ADDRESS";
/// Panel width override
pub const ENV_WIDTH: &str = "OLED_WIDTH";
/// Panel height override
pub const ENV_HEIGHT: &str = "OLED_HEIGHT";
/// Bytes per data transaction override
pub const ENV_CHUNK_SIZE: &str = "OLED_CHUNK_SIZE";
/// Image threshold override
pub const ENV_THRESHOLD: &str = "OLED_THRESHOLD";

/// Where the display is and what shape it has
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayConfig {
    /// I2C bus index, opened as `/dev/i2c-<bus>`
    pub bus: u8,
    /// 7-bit device address
    pub address: u8,
    /// Panel width in pixels
    pub width: u32,
    /// Panel height in pixels: 16, 32 or 64
    pub height: u32,
    /// Bytes per data transaction
    pub chunk_size: usize,
    /// Luma threshold for image composition
    pub threshold: u8,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            bus: 1,
            address: DEFAULT_ADDRESS,
            width: u32::from(WIDTH),
            height: u32::from(HEIGHT),
            chunk_size: DEFAULT_CHUNK_SIZE,
            threshold: 128,
        }
    }
}

impl DisplayConfig {
    /// Defaults overridden by the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `OLED_*` key
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = DisplayConfig::default();

        if let Some(value) = lookup(ENV_BUS) {
            config.bus = parse(ENV_BUS, &value)?;
        }
        if let Some(value) = lookup(ENV_ADDRESS) {
            config.address = parse_address(&value)?;
        }
        if let Some(value) = lookup(ENV_WIDTH) {
            config.width = parse(ENV_WIDTH, &value)?;
        }
        if let Some(value) = lookup(ENV_HEIGHT) {
            config.height = parse(ENV_HEIGHT, &value)?;
        }
        if let Some(value) = lookup(ENV_CHUNK_SIZE) {
            config.chunk_size = parse(ENV_CHUNK_SIZE, &value)?;
        }
        if let Some(value) = lookup(ENV_THRESHOLD) {
            config.threshold = parse(ENV_THRESHOLD, &value)?;
        }

        log::debug!("Display configuration: {:?}", config);
        Ok(config)
    }

    /// Device node of the configured bus
    pub fn device_path(&self) -> String {
        format!("/dev/i2c-{}", self.bus)
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::config(format!("{key}: cannot parse {value:?}")))
}

/// Decimal or `0x`-prefixed hexadecimal 7-bit address
pub fn parse_address(value: &str) -> Result<u8> {
    let value = value.trim();
    let parsed = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => value.parse(),
    };

    match parsed {
        Ok(address) if address <= 0x7F => Ok(address),
        _ => Err(Error::config(format!(
            "{ENV_ADDRESS}: {value:?} is not a 7-bit I2C address"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_the_common_module() {
        let config = DisplayConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, DisplayConfig::default());
        assert_eq!(config.address, 0x3C);
        assert_eq!(config.chunk_size, 16);
        assert_eq!(config.device_path(), "/dev/i2c-1");
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = DisplayConfig::from_lookup(lookup(&[
            (ENV_BUS, "0"),
            (ENV_ADDRESS, "0x3D"),
            (ENV_HEIGHT, "32"),
            (ENV_CHUNK_SIZE, " 32 "),
            (ENV_THRESHOLD, "90"),
        ]))
        .unwrap();

        assert_eq!(config.bus, 0);
        assert_eq!(config.address, 0x3D);
        assert_eq!(config.width, 128);
        assert_eq!(config.height, 32);
        assert_eq!(config.chunk_size, 32);
        assert_eq!(config.threshold, 90);
        assert_eq!(config.device_path(), "/dev/i2c-0");
    }

    #[test]
    fn addresses_accept_decimal_and_hex() {
        assert_eq!(parse_address("60").unwrap(), 0x3C);
        assert_eq!(parse_address("0x3c").unwrap(), 0x3C);
        assert_eq!(parse_address("0X3D").unwrap(), 0x3D);
        assert!(parse_address("0x80").is_err());
        assert!(parse_address("oled").is_err());
    }

    #[test]
    fn malformed_values_are_configuration_errors() {
        let err = DisplayConfig::from_lookup(lookup(&[(ENV_WIDTH, "wide")])).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().contains(ENV_WIDTH));

        assert!(DisplayConfig::from_lookup(lookup(&[(ENV_THRESHOLD, "300")])).is_err());
    }
}

use std::env::{self, VarError};
use std::net::SocketAddr;
use std::str::FromStr;

use crate::entities::{Pricing, BLOCK_SIZE_KG, FEE_PER_BLOCK, RATE_PER_KM};
use crate::error::{config_error, Error};
use crate::external::google_maps::DEFAULT_API_BASE;

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:5000";

pub const REQUIRED_VARIABLES: &[&str] = &["GOOGLE_MAPS_API_KEY"];

#[derive(Clone)]
pub struct Config {
    pub google_maps_api_base: String,
    pub google_maps_api_key: String,
    pub listen_addr: SocketAddr,
    pub pricing: Pricing,
}

impl Config {
    /// Reads the configuration from the environment, after loading `.env`
    /// when one is present.
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();

        Self::from_lookup(|name| env::var(name))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let google_maps_api_key = lookup("GOOGLE_MAPS_API_KEY")?;
        let google_maps_api_base =
            optional(&lookup, "GOOGLE_MAPS_API_BASE")?.unwrap_or_else(|| DEFAULT_API_BASE.into());

        let listen_addr = parse_or(&lookup, "LISTEN_ADDR", DEFAULT_LISTEN_ADDR.parse())?;

        let pricing = Pricing {
            rate_per_km: parse_or(&lookup, "RATE_PER_KM", Ok(RATE_PER_KM))?,
            fee_per_block: parse_or(&lookup, "FEE_PER_BLOCK", Ok(FEE_PER_BLOCK))?,
            block_size_kg: parse_or(&lookup, "BLOCK_SIZE_KG", Ok(BLOCK_SIZE_KG))?,
        };
        pricing.validate().map_err(|err| config_error(err.message))?;

        Ok(Self {
            google_maps_api_base,
            google_maps_api_key,
            listen_addr,
            pricing,
        })
    }

    pub fn log(&self) {
        tracing::info!(
            api_base = %self.google_maps_api_base,
            listen_addr = %self.listen_addr,
            rate_per_km = self.pricing.rate_per_km,
            fee_per_block = self.pricing.fee_per_block,
            block_size_kg = self.pricing.block_size_kg,
            "loaded configuration"
        );
    }
}

fn optional<F>(lookup: &F, name: &str) -> Result<Option<String>, Error>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    match lookup(name) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(err) => Err(config_error(format!("{}: {}", name, err))),
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: Result<T, T::Err>) -> Result<T, Error>
where
    F: Fn(&str) -> Result<String, VarError>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let parsed = match optional(lookup, name)? {
        Some(value) => value.trim().parse::<T>(),
        None => default,
    };

    parsed.map_err(|err| config_error(format!("{}: {}", name, err)))
}

#[cfg(test)]
fn lookup_from(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Result<String, VarError> {
    move |name| {
        pairs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn defaults_apply_when_only_the_key_is_set() {
    let config = Config::from_lookup(lookup_from(&[("GOOGLE_MAPS_API_KEY", "secret")])).unwrap();

    assert_eq!(config.google_maps_api_base, "maps.googleapis.com");
    assert_eq!(config.listen_addr, "127.0.0.1:5000".parse::<SocketAddr>().unwrap());
    assert_eq!(config.pricing, Pricing::default());
}

#[test]
fn missing_api_key_is_an_internal_error() {
    let err = Config::from_lookup(lookup_from(&[])).err().unwrap();
    assert_eq!(err.code, 1);
}

#[test]
fn pricing_overrides_are_parsed_and_validated() {
    let config = Config::from_lookup(lookup_from(&[
        ("GOOGLE_MAPS_API_KEY", "secret"),
        ("RATE_PER_KM", "180"),
        ("BLOCK_SIZE_KG", "25"),
    ]))
    .unwrap();
    assert_eq!(config.pricing.rate_per_km, 180.0);
    assert_eq!(config.pricing.fee_per_kg(), 14.0);

    let err = Config::from_lookup(lookup_from(&[
        ("GOOGLE_MAPS_API_KEY", "secret"),
        ("BLOCK_SIZE_KG", "0"),
    ]))
    .err()
    .unwrap();
    assert_eq!(err.code, 5);

    let err = Config::from_lookup(lookup_from(&[
        ("GOOGLE_MAPS_API_KEY", "secret"),
        ("RATE_PER_KM", "cheap"),
    ]))
    .err()
    .unwrap();
    assert_eq!(err.code, 5);
}

//! # Counter Configuration
//!
//! Shop settings loaded at startup.
//!
//! ## Load Order (later overrides earlier)
//! 1. Defaults (this file)
//! 2. Config file (`--config` path, or `counter.toml` in the platform
//!    config directory)
//! 3. Environment variables (`SLICE_*`)
//! 4. Command-line flags (`--db`, `--cache-dir`), applied by `run()`
//!
//! ## Example `counter.toml`
//! ```toml
//! [store]
//! name = "Slice Pizzeria"
//! currency_symbol = "$"
//! currency_decimals = 0
//! default_phone = "5490000000000"
//!
//! [pricing]
//! debit_bps = 500
//! credit_bps = 1000
//! surcharge_base = "subtotal_and_delivery"
//! default_delivery_fee = "1000"
//! promo_pick_count = 2
//!
//! [admin]
//! pin = "4321"
//!
//! [storage]
//! database_path = "/var/lib/slice/slice.db"
//! cache_dir = "/var/lib/slice/cache"
//!
//! [printer]
//! spool_path = "/var/spool/slice/ticket.txt"
//! paper_width = 32
//! ```
//!
//! Read-only after startup.

use serde::{Deserialize, Serialize};
use slice_core::format::OrderFormatter;
use slice_core::money::CurrencyFormat;
use slice_core::pricing::{PricingPolicy, SurchargeBase};
use slice_core::validation::{validate_phone, validate_surcharge_bps};
use slice_core::{
    Money, SurchargeRate, ValidationError, DEFAULT_ADMIN_PIN, DEFAULT_DELIVERY_FEE_UNITS,
    DEFAULT_PHONE, PROMO_PICK_COUNT,
};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config could not be written: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("No config path available")]
    NoPath,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// `[store]`: what the customer sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Printed on the message header and the receipt title
    pub name: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Decimal places shown; amounts are rounded only for display
    pub currency_decimals: u32,

    /// Chat number used when the stored catalog has none
    pub default_phone: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: "Slice Pizzeria".to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: 0,
            default_phone: DEFAULT_PHONE.to_string(),
        }
    }
}

/// `[pricing]`: surcharges and delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingSettings {
    /// Debit card surcharge in basis points (500 = 5%)
    pub debit_bps: u32,

    /// Credit card surcharge in basis points (1000 = 10%)
    pub credit_bps: u32,

    /// Whether the surcharge also applies to the delivery fee
    pub surcharge_base: SurchargeBase,

    /// Fee pre-filled when an order switches to delivery
    pub default_delivery_fee: Money,

    /// Items included in every promotion
    pub promo_pick_count: usize,
}

impl Default for PricingSettings {
    fn default() -> Self {
        let policy = PricingPolicy::default();
        PricingSettings {
            debit_bps: policy.debit_rate.bps(),
            credit_bps: policy.credit_rate.bps(),
            surcharge_base: policy.surcharge_base,
            default_delivery_fee: Money::from_units(DEFAULT_DELIVERY_FEE_UNITS),
            promo_pick_count: PROMO_PICK_COUNT,
        }
    }
}

/// `[admin]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminSettings {
    /// Shared PIN for the catalog editor
    pub pin: String,
}

impl Default for AdminSettings {
    fn default() -> Self {
        AdminSettings {
            pin: DEFAULT_ADMIN_PIN.to_string(),
        }
    }
}

/// `[storage]`: unset paths resolve to the platform data directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub database_path: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,
}

/// `[printer]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrinterSettings {
    /// Spool file each receipt is written to; stdout when unset
    pub spool_path: Option<PathBuf>,

    /// Paper width in characters (typically 32, 42, or 48)
    pub paper_width: usize,
}

impl Default for PrinterSettings {
    fn default() -> Self {
        PrinterSettings {
            spool_path: None,
            paper_width: 32,
        }
    }
}

// =============================================================================
// AppConfig
// =============================================================================

/// Counter configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreSettings,
    pub pricing: PricingSettings,
    pub admin: AdminSettings,
    pub storage: StorageSettings,
    pub printer: PrinterSettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading counter config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load counter config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoPath)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Counter config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.store.name.trim().is_empty() {
            return Err(ConfigError::Invalid("store.name must not be empty".into()));
        }

        if self.store.currency_decimals > 4 {
            return Err(ConfigError::Invalid(format!(
                "store.currency_decimals must be 0-4, got {}",
                self.store.currency_decimals
            )));
        }

        validate_phone(&self.store.default_phone)?;
        validate_surcharge_bps("pricing.debit_bps", self.pricing.debit_bps)?;
        validate_surcharge_bps("pricing.credit_bps", self.pricing.credit_bps)?;

        if self.pricing.default_delivery_fee.is_negative() {
            return Err(ConfigError::Invalid(
                "pricing.default_delivery_fee must not be negative".into(),
            ));
        }

        if self.pricing.promo_pick_count == 0 {
            return Err(ConfigError::Invalid(
                "pricing.promo_pick_count must be greater than 0".into(),
            ));
        }

        if self.admin.pin.trim().is_empty() {
            return Err(ConfigError::Invalid("admin.pin must not be empty".into()));
        }

        if self.printer.paper_width < 16 {
            return Err(ConfigError::Invalid(
                "printer.paper_width must be at least 16".into(),
            ));
        }

        Ok(())
    }

    /// Applies `SLICE_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = var("SLICE_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = Some(PathBuf::from(path));
        }

        if let Some(dir) = var("SLICE_CACHE_DIR") {
            self.storage.cache_dir = Some(PathBuf::from(dir));
        }

        if let Some(pin) = var("SLICE_ADMIN_PIN") {
            self.admin.pin = pin;
        }

        if let Some(phone) = var("SLICE_PHONE") {
            match validate_phone(&phone) {
                Ok(normalized) => self.store.default_phone = normalized,
                Err(e) => warn!(error = %e, "Ignoring SLICE_PHONE"),
            }
        }

        if let Some(name) = var("SLICE_STORE_NAME") {
            self.store.name = name;
        }

        if let Some(path) = var("SLICE_PRINTER_SPOOL") {
            self.printer.spool_path = Some(PathBuf::from(path));
        }
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "slice", "pos")
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("counter.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Database file: configured path, else `slice.db` in the platform data
    /// directory, else the working directory.
    pub fn database_path(&self) -> PathBuf {
        self.storage.database_path.clone().unwrap_or_else(|| {
            Self::project_dirs()
                .map(|dirs| dirs.data_dir().join("slice.db"))
                .unwrap_or_else(|| PathBuf::from("slice.db"))
        })
    }

    /// Fallback cache directory, resolved like [`Self::database_path`].
    pub fn cache_dir(&self) -> PathBuf {
        self.storage.cache_dir.clone().unwrap_or_else(|| {
            Self::project_dirs()
                .map(|dirs| dirs.cache_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from("cache"))
        })
    }

    pub fn currency(&self) -> CurrencyFormat {
        CurrencyFormat::new(self.store.currency_symbol.clone(), self.store.currency_decimals)
    }

    pub fn pricing_policy(&self) -> PricingPolicy {
        PricingPolicy {
            debit_rate: SurchargeRate::from_bps(self.pricing.debit_bps),
            credit_rate: SurchargeRate::from_bps(self.pricing.credit_bps),
            surcharge_base: self.pricing.surcharge_base,
        }
    }

    pub fn formatter(&self) -> OrderFormatter {
        OrderFormatter {
            store_name: self.store.name.clone(),
            currency: self.currency(),
            paper_width: self.printer.paper_width,
        }
    }

    /// Formats an amount with the shop's symbol and decimals.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = AppConfig::default();
    /// assert_eq!(config.format_currency(Money::from_units(9900)), "$9900");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        self.currency().format(amount)
    }
}

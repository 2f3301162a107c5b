//! Runtime-configurable tuning parameters for tessera.
//!
//! All values have sensible defaults. Override via environment variables
//! (prefixed `TESSERA_`) or by constructing a custom `TesseraConfig`.

/// Tuning parameters for schedule polling.
#[derive(Debug, Clone)]
pub struct TesseraConfig {
    /// Yield the driving thread after this many poll passes without
    /// completion. Zero disables yielding.
    pub yield_interval_passes: u64,

    /// Emit a one-shot stall warning after this many poll passes without
    /// completion.
    pub stall_warn_passes: u64,
}

impl Default for TesseraConfig {
    fn default() -> Self {
        Self {
            yield_interval_passes: 64,
            stall_warn_passes: 1_000_000,
        }
    }
}

impl TesseraConfig {
    /// Load config from environment variables, falling back to defaults.
    ///
    /// Recognized variables:
    /// - `TESSERA_YIELD_INTERVAL_PASSES`
    /// - `TESSERA_STALL_WARN_PASSES`
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("TESSERA_YIELD_INTERVAL_PASSES") {
            if let Ok(n) = v.parse::<u64>() {
                cfg.yield_interval_passes = n;
            }
        }
        if let Ok(v) = std::env::var("TESSERA_STALL_WARN_PASSES") {
            if let Ok(n) = v.parse::<u64>() {
                cfg.stall_warn_passes = n;
            }
        }

        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = TesseraConfig::default();
        assert_eq!(cfg.yield_interval_passes, 64);
        assert_eq!(cfg.stall_warn_passes, 1_000_000);
    }

    #[test]
    fn test_from_env_ignores_garbage() {
        // Unset or unparsable variables leave the defaults intact. Avoid
        // touching real process env here; parse paths are covered by the
        // default fallback.
        let cfg = TesseraConfig::from_env();
        assert!(cfg.stall_warn_passes > 0);
    }
}

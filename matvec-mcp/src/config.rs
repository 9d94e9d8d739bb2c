//! Server configuration, read once from the environment at startup

use std::env;

use matvec_matrix::MatrixMode;
use tracing::warn;

pub const DEFAULT_MAX_DIM: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// `MATVEC_MATRIX_MODE`: exact | fast | auto
    pub matrix_mode: MatrixMode,
    /// `MATVEC_MAX_DIM`: largest accepted rows or columns of any grid
    pub max_dim: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            matrix_mode: MatrixMode::Auto,
            max_dim: DEFAULT_MAX_DIM,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Unset or unparseable values fall back to the defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ServerConfig::default();

        if let Some(raw) = lookup("MATVEC_MATRIX_MODE") {
            match MatrixMode::from_str(raw.trim()) {
                Some(mode) => config.matrix_mode = mode,
                None => warn!(value = %raw, "ignoring MATVEC_MATRIX_MODE, expected exact, fast or auto"),
            }
        }

        if let Some(raw) = lookup("MATVEC_MAX_DIM") {
            match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => config.max_dim = n,
                _ => warn!(value = %raw, "ignoring MATVEC_MAX_DIM, expected a positive integer"),
            }
        }

        config
    }
}

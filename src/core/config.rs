//! Runtime configuration: LLM endpoint from the environment, company profile from disk.

use std::env;
use std::path::{Path, PathBuf};

use async_openai::config::OpenAIConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::paths;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "anthropic/claude-haiku-4.5";
pub const DEFAULT_MAX_QUOTATIONS: usize = 200;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OPENROUTER_API_KEY is not set")]
    MissingApiKey,
    #[error("invalid company profile {path}: {source}")]
    InvalidCompany {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Bank account printed at the foot of customer documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankDetails {
    pub bank: String,
    pub account_holder: String,
    pub account: String,
    pub clabe: String,
}

impl BankDetails {
    /// Labelled rows in display order. Empty values are left out.
    pub fn fields(&self) -> Vec<(String, String)> {
        [
            ("Banco", &self.bank),
            ("Titular", &self.account_holder),
            ("Cuenta", &self.account),
            ("CLABE", &self.clabe),
        ]
        .into_iter()
        .filter(|(_, v)| !v.trim().is_empty())
        .map(|(k, v)| (k.to_string(), v.trim().to_string()))
        .collect()
    }
}

/// Issuer data shown on rendered documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyProfile {
    pub name: String,
    /// Appended after the parsed notes of every customer document.
    pub legal_notes: Vec<String>,
    pub bank: Option<BankDetails>,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            name: "Materiales y Suministros".to_string(),
            legal_notes: vec![
                "Precios sujetos a cambio sin previo aviso.".to_string(),
                "Vigencia de la cotización: 15 días naturales.".to_string(),
                "Tiempo de entrega sujeto a disponibilidad del proveedor.".to_string(),
            ],
            bank: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// None when `OPENROUTER_API_KEY` is unset; offline commands still work.
    pub openai_config: Option<OpenAIConfig>,
    pub model_id: String,
    pub max_quotations: usize,
    pub company: CompanyProfile,
    /// Path the company profile was read from, None when using the built-in one.
    pub company_source: Option<PathBuf>,
}

impl Config {
    /// Endpoint config for commands that talk to the model.
    pub fn llm(&self) -> Result<&OpenAIConfig, ConfigError> {
        self.openai_config.as_ref().ok_or(ConfigError::MissingApiKey)
    }
}

/// Read a company profile from `path`. Missing fields take their defaults.
pub fn load_company(path: &Path) -> Result<CompanyProfile, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::InvalidCompany {
        path: path.to_path_buf(),
        source,
    })
}

fn max_quotations() -> usize {
    match env::var("COTIZADOR_MAX_QUOTATIONS") {
        Ok(v) => v.trim().parse().unwrap_or_else(|_| {
            log::warn!("ignoring invalid COTIZADOR_MAX_QUOTATIONS={v:?}");
            DEFAULT_MAX_QUOTATIONS
        }),
        Err(_) => DEFAULT_MAX_QUOTATIONS,
    }
}

/// Load configuration from the environment and the config directory.
///
/// A missing API key is not an error here; see [`Config::llm`]. A present but
/// malformed `company.json` is.
pub fn load() -> Result<Config, ConfigError> {
    let base_url = env::var("OPENROUTER_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let model_id = env::var("OPENROUTER_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

    let openai_config = env::var("OPENROUTER_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty())
        .map(|key| OpenAIConfig::new().with_api_base(base_url).with_api_key(key));

    let company_path = paths::company_file();
    let (company, company_source) = match company_path {
        Some(path) if path.exists() => (load_company(&path)?, Some(path)),
        _ => (CompanyProfile::default(), None),
    };

    Ok(Config {
        openai_config,
        model_id,
        max_quotations: max_quotations(),
        company,
        company_source,
    })
}

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default = "default_datadir")]
    pub datadir: String,
    #[serde(default)]
    pub artifacts: ArtifactsConfig,
    #[serde(default)]
    pub recommender: RecommenderConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(skip)]
    pub debug_logs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: ListenConfig::default(),
            datadir: default_datadir(),
            artifacts: ArtifactsConfig::default(),
            recommender: RecommenderConfig::default(),
            api: ApiConfig::default(),
            debug_logs: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenConfig {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "default_port")]
    pub port: String,
    #[serde(default)]
    pub tlscert: Option<String>,
    #[serde(default)]
    pub tlskey: Option<String>,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: None,
            port: default_port(),
            tlscert: None,
            tlskey: None,
        }
    }
}

/// File names of the precomputed artifacts, relative to `datadir` unless absolute.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtifactsConfig {
    #[serde(default = "default_ratings")]
    pub ratings: String,
    #[serde(alias = "normalizedmatrix", default = "default_normalized_matrix")]
    pub normalized_matrix: String,
    #[serde(alias = "rawmatrix", default = "default_raw_matrix")]
    pub raw_matrix: String,
    #[serde(default = "default_courses")]
    pub courses: String,
    #[serde(alias = "similaritymatrix", default = "default_similarity_matrix")]
    pub similarity_matrix: String,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            ratings: default_ratings(),
            normalized_matrix: default_normalized_matrix(),
            raw_matrix: default_raw_matrix(),
            courses: default_courses(),
            similarity_matrix: default_similarity_matrix(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecommenderConfig {
    #[serde(default = "default_neighbors")]
    pub neighbors: usize,
    #[serde(alias = "topn", default = "default_top_n")]
    pub top_n: usize,
    #[serde(alias = "similarcount", default = "default_similar_count")]
    pub similar_count: usize,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            neighbors: default_neighbors(),
            top_n: default_top_n(),
            similar_count: default_similar_count(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Send not-found payloads with 404 instead of 200.
    #[serde(alias = "notfoundstatus", default)]
    pub not_found_status: bool,
}

fn default_port() -> String {
    "8000".to_string()
}

fn default_datadir() -> String {
    "data".to_string()
}

fn default_ratings() -> String {
    "datos_recomendador.json".to_string()
}

fn default_normalized_matrix() -> String {
    "matriz_normalizada.json".to_string()
}

fn default_raw_matrix() -> String {
    "matriz_final.json".to_string()
}

fn default_courses() -> String {
    "df_cursos.json".to_string()
}

fn default_similarity_matrix() -> String {
    "similarity_matrix.json".to_string()
}

fn default_neighbors() -> usize {
    3
}

fn default_top_n() -> usize {
    5
}

fn default_similar_count() -> usize {
    10
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_string(), e))?;

        Self::from_yaml(&content).map_err(|e| match e {
            ConfigError::ParseError(_, err) => ConfigError::ParseError(path.to_string(), err),
            other => other,
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty mapping.
        let config: Config = if content.trim().is_empty() {
            serde_yaml::from_str("{}")
        } else {
            serde_yaml::from_str(content)
        }
        .map_err(|e| ConfigError::ParseError("<inline>".to_string(), e))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let r = &self.recommender;
        if r.neighbors == 0 {
            return Err(ConfigError::Invalid("recommender.neighbors must be at least 1".to_string()));
        }
        if r.top_n == 0 {
            return Err(ConfigError::Invalid("recommender.top_n must be at least 1".to_string()));
        }
        if r.similar_count == 0 {
            return Err(ConfigError::Invalid(
                "recommender.similar_count must be at least 1".to_string(),
            ));
        }
        if self.listen.tlscert.is_some() != self.listen.tlskey.is_some() {
            return Err(ConfigError::Invalid(
                "listen.tlscert and listen.tlskey must be set together".to_string(),
            ));
        }
        Ok(())
    }

    pub fn artifact_path(&self, name: &str) -> PathBuf {
        let path = Path::new(name);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            PathBuf::from(&self.datadir).join(path)
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(String, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(String, serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

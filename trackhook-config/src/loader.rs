// Configuration file loaders

use crate::{ConfigError, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileFormat {
    Json,
    Toml,
    Env,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(FileFormat::Json),
            "toml" => Some(FileFormat::Toml),
            "env" => Some(FileFormat::Env),
            _ => None,
        }
    }

    /// Detect the format of a path; `.env` style names count as env files
    pub fn detect(path: &Path) -> Option<Self> {
        if let Some(ext) = path.extension().and_then(|s| s.to_str()) {
            return Self::from_extension(ext);
        }
        match path.file_name().and_then(|s| s.to_str()) {
            Some(".env") => Some(FileFormat::Env),
            _ => None,
        }
    }
}

/// Configuration file loader producing a flat JSON object
pub struct ConfigLoader {
    format: FileFormat,
}

impl ConfigLoader {
    pub fn new(format: FileFormat) -> Self {
        Self { format }
    }

    /// Auto-detect format from the file name
    pub fn auto(path: &Path) -> Result<Self> {
        let format = FileFormat::detect(path).ok_or_else(|| {
            ConfigError::LoadError(format!("Unsupported config file: {}", path.display()))
        })?;

        Ok(Self::new(format))
    }

    /// Load configuration from file
    pub fn load_file(&self, path: &Path) -> Result<Value> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::LoadError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        self.parse(&content)
    }

    /// Parse configuration from string
    pub fn parse(&self, content: &str) -> Result<Value> {
        let value = match self.format {
            FileFormat::Json => serde_json::from_str(content)
                .map_err(|e| ConfigError::ParseError(format!("JSON parse error: {}", e)))?,
            FileFormat::Toml => {
                let table: toml::Table = toml::from_str(content)
                    .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;
                serde_json::to_value(table)
                    .map_err(|e| ConfigError::ParseError(format!("TOML conversion error: {}", e)))?
            }
            FileFormat::Env => parse_env(content),
        };

        if !value.is_object() {
            return Err(ConfigError::ParseError(
                "Configuration root must be an object".to_string(),
            ));
        }

        Ok(value)
    }
}

fn parse_env(content: &str) -> Value {
    let mut map = serde_json::Map::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line = line.strip_prefix("export ").unwrap_or(line);
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim().to_lowercase();
            let value = value.trim().trim_matches('"').trim_matches('\'');
            map.insert(key, Value::String(value.to_string()));
        }
    }

    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json() {
        let loader = ConfigLoader::new(FileFormat::Json);
        let result = loader
            .parse(r#"{"api_key": "abc", "verify_tls": false}"#)
            .unwrap();

        assert_eq!(result["api_key"], "abc");
        assert_eq!(result["verify_tls"], false);
    }

    #[test]
    fn test_parse_toml() {
        let loader = ConfigLoader::new(FileFormat::Toml);
        let toml = r#"
            api_key = "abc"
            max_body_size = 2048
        "#;

        let result = loader.parse(toml).unwrap();
        assert_eq!(result["api_key"], "abc");
        assert_eq!(result["max_body_size"], 2048);
    }

    #[test]
    fn test_parse_env() {
        let loader = ConfigLoader::new(FileFormat::Env);
        let env = r#"
            API_KEY=value
            # Comment
            export WEBHOOK_SECRET="quoted value"
        "#;

        let result = loader.parse(env).unwrap();
        assert_eq!(result["api_key"], "value");
        assert_eq!(result["webhook_secret"], "quoted value");
    }

    #[test]
    fn test_json_root_must_be_object() {
        let loader = ConfigLoader::new(FileFormat::Json);
        assert!(loader.parse("[1, 2]").is_err());
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(FileFormat::from_extension("json"), Some(FileFormat::Json));
        assert_eq!(FileFormat::from_extension("TOML"), Some(FileFormat::Toml));
        assert_eq!(FileFormat::from_extension("yaml"), None);
        assert_eq!(
            FileFormat::detect(Path::new("/etc/trackhook/.env")),
            Some(FileFormat::Env)
        );
        assert_eq!(
            FileFormat::detect(Path::new("trackhook.toml")),
            Some(FileFormat::Toml)
        );
    }
}

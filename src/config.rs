use std::collections::HashMap;
use std::fs;

#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self, String> {
        let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(format!("Invalid config line {}: {}", idx + 1, line));
            };
            let key = key.trim();
            let mut value = value.trim().to_string();
            if (value.starts_with('"') && value.ends_with('"'))
                || (value.starts_with('\'') && value.ends_with('\''))
            {
                value = value[1..value.len() - 1].to_string();
            }
            values.insert(key.to_string(), value);
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).as_deref().map(Self::truthy)
    }

    pub fn truthy(raw: &str) -> bool {
        matches!(raw.to_ascii_lowercase().as_str(), "true" | "1" | "yes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn parses_values_and_booleans() {
        let dir = env::temp_dir().join(format!("deckwatch_cfg_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config");
        fs::write(
            &path,
            "# comment\nexport JENKINS_URL=\"https://ci.example.com\"\nALL_DAY=true\nFREE=0\n",
        )
        .unwrap();

        let config = AppConfig::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(
            config.get("JENKINS_URL").as_deref(),
            Some("https://ci.example.com")
        );
        assert_eq!(config.get_bool("ALL_DAY"), Some(true));
        assert_eq!(config.get_bool("FREE"), Some(false));
        assert_eq!(config.get_bool("OUT_OF_OFFICE"), None);
    }

    #[test]
    fn truthy_accepts_the_usual_spellings() {
        assert!(AppConfig::truthy("TRUE"));
        assert!(AppConfig::truthy("1"));
        assert!(AppConfig::truthy("Yes"));
        assert!(!AppConfig::truthy("no"));
        assert!(!AppConfig::truthy(""));
    }
}

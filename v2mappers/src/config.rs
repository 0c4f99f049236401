//! Where the rule files of a conversion live.
//!
//! A config file uses the same `key = value` syntax as the rule files:
//!
//! ```text
//! mappings_dir = "mappings"
//! culture_map = "cultureMap.txt"
//! union_cultures = { "00_cultures.txt" "01_cultures.txt" }
//! eu4_dir = "C:/Games/Europa Universalis IV"
//! ```
//!
//! Every key is optional. Relative paths are resolved against the directory
//! holding the config file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::MapperError;
use crate::loader::parse_file;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    pub mappings_dir: String,
    pub culture_map: String,
    pub religion_map: String,
    pub government_map: String,
    pub minority_pops: String,
    pub union_tags: String,
    pub union_cultures: Vec<String>,
    pub idea_effects: String,
    pub colonial_rules: String,
    pub region_file: String,
    /// Missing on disk means `region_file` is in the legacy one-level format.
    pub area_file: String,
    /// EU4 install. When set, `region_file` and `area_file` are read from its
    /// `map/` directory and culture files from `common/cultures/`.
    pub eu4_dir: Option<String>,
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            mappings_dir: "mappings".to_string(),
            culture_map: "cultureMap.txt".to_string(),
            religion_map: "religionMap.txt".to_string(),
            government_map: "governmentMap.txt".to_string(),
            minority_pops: "minorityPops.txt".to_string(),
            union_tags: "unions.txt".to_string(),
            union_cultures: vec!["00_cultures.txt".to_string()],
            idea_effects: "idea_effects.txt".to_string(),
            colonial_rules: "colonial.txt".to_string(),
            region_file: "region.txt".to_string(),
            area_file: "area.txt".to_string(),
            eu4_dir: None,
            base_dir: PathBuf::new(),
        }
    }
}

impl MapperConfig {
    /// Default layout rooted at `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: dir.into(),
            ..Self::default()
        }
    }

    pub fn load(path: &Path) -> Result<Self, MapperError> {
        let root = parse_file(path)?;
        let mut config: Self = eu4txt::from_node(&root).map_err(|source| MapperError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        log::debug!("Loaded mapper config from {}", path.display());
        Ok(config)
    }

    pub fn mappings_path(&self) -> PathBuf {
        self.base_dir.join(&self.mappings_dir)
    }

    /// A rule file under the mappings directory.
    pub fn mapping_file(&self, name: &str) -> PathBuf {
        self.mappings_path().join(name)
    }

    fn eu4_file(&self, subdir: &str, name: &str) -> PathBuf {
        match &self.eu4_dir {
            Some(eu4) => self.base_dir.join(eu4).join(subdir).join(name),
            None => self.mapping_file(name),
        }
    }

    pub fn region_path(&self) -> PathBuf {
        self.eu4_file("map", &self.region_file)
    }

    pub fn area_path(&self) -> PathBuf {
        self.eu4_file("map", &self.area_file)
    }

    pub fn union_culture_paths(&self) -> Vec<PathBuf> {
        self.union_cultures
            .iter()
            .map(|name| self.eu4_file("common/cultures", name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_empty_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mapper.txt");
        fs::write(&path, "").unwrap();

        let config = MapperConfig::load(&path).unwrap();
        assert_eq!(config.culture_map, "cultureMap.txt");
        assert_eq!(config.union_cultures, vec!["00_cultures.txt"]);
        assert_eq!(
            config.mapping_file(&config.religion_map),
            dir.path().join("mappings").join("religionMap.txt")
        );
        assert_eq!(config.region_path(), dir.path().join("mappings/region.txt"));
    }

    #[test]
    fn test_overrides_and_eu4_dir() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mapper.txt");
        fs::write(
            &path,
            r#"
            mappings_dir = "rules"
            culture_map = "cultures_custom.txt"
            union_cultures = { "00_cultures.txt" "01_cultures.txt" }
            eu4_dir = "eu4"
            unknown_option = yes
            "#,
        )
        .unwrap();

        let config = MapperConfig::load(&path).unwrap();
        assert_eq!(
            config.mapping_file(&config.culture_map),
            dir.path().join("rules/cultures_custom.txt")
        );
        assert_eq!(config.area_path(), dir.path().join("eu4/map/area.txt"));
        assert_eq!(
            config.union_culture_paths(),
            vec![
                dir.path().join("eu4/common/cultures/00_cultures.txt"),
                dir.path().join("eu4/common/cultures/01_cultures.txt"),
            ]
        );
    }

    #[test]
    fn test_bad_value_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mapper.txt");
        fs::write(&path, "union_cultures = { a = b }").unwrap();
        assert!(matches!(
            MapperConfig::load(&path),
            Err(MapperError::Config { .. })
        ));
    }

    #[test]
    fn test_missing_config_is_io_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            MapperConfig::load(&dir.path().join("absent.txt")),
            Err(MapperError::Io { .. })
        ));
    }
}

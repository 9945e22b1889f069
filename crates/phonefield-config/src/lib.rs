use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use phonefield_core::{
    normalize_country_iso, CoreError, CountryRule, MaskTiming, PhoneEngine, PrefixMatch,
    ResolveOptions, RuleTable, UnmatchedPrefix,
};
use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "phonefield";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_COUNTRY_ISO: &str = "BRA";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub default_country_iso: String,
    pub resolve: ResolveOptions,
    pub mask_timing: MaskTiming,
    pub rules: RuleTable,
}

impl AppConfig {
    pub fn engine(&self) -> std::result::Result<PhoneEngine, CoreError> {
        PhoneEngine::new(self.rules.clone(), &self.default_country_iso, self.resolve)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_country_iso: DEFAULT_COUNTRY_ISO.to_string(),
            resolve: ResolveOptions::default(),
            mask_timing: MaskTiming::default(),
            rules: RuleTable::builtin(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("invalid default_country value: {0}")]
    InvalidDefaultCountry(String),
    #[error("default_country {0} has no rule")]
    UnknownDefaultCountry(String),
    #[error("invalid rule #{index}: {source}")]
    InvalidRule {
        index: usize,
        #[source]
        source: CoreError,
    },
    #[error("duplicate rule for {0}")]
    DuplicateRule(String),
    #[error("rule table is empty")]
    EmptyRules,
    #[error("invalid rule table: {0}")]
    RuleTable(#[source] CoreError),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    default_country: Option<String>,
    prefix_match: Option<PrefixMatch>,
    unmatched_prefix: Option<UnmatchedPrefix>,
    mask_timing: Option<MaskTiming>,
    replace_default_rules: Option<bool>,
    #[serde(default)]
    rules: Vec<RuleFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleFile {
    country_iso: String,
    country_code: String,
    mask: Option<String>,
    pattern: Option<String>,
}

impl RuleFile {
    fn to_rule(&self) -> std::result::Result<CountryRule, CoreError> {
        let mut rule = CountryRule::new(&self.country_iso, &self.country_code)?;
        if let Some(mask) = self.mask.as_deref() {
            rule = rule.with_mask(mask)?;
        }
        if let Some(pattern) = self.pattern.as_deref() {
            rule = rule.with_pattern(pattern)?;
        }
        Ok(rule)
    }
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path.clone()) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

pub fn parse_str(contents: &str, path: &Path) -> Result<AppConfig> {
    let parsed: ConfigFile = toml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    merge_config(parsed)
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(parse_str(&contents, path)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(prefix_match) = parsed.prefix_match {
        config.resolve.prefix_match = prefix_match;
    }
    if let Some(unmatched_prefix) = parsed.unmatched_prefix {
        config.resolve.unmatched_prefix = unmatched_prefix;
    }
    if let Some(timing) = parsed.mask_timing {
        config.mask_timing = timing;
    }

    config.rules = merge_rules(
        parsed.replace_default_rules.unwrap_or(false),
        &parsed.rules,
    )?;

    if let Some(raw) = parsed.default_country {
        let iso = normalize_country_iso(&raw)
            .map_err(|_| ConfigError::InvalidDefaultCountry(raw.clone()))?;
        config.default_country_iso = iso;
    }
    if config.rules.get(&config.default_country_iso).is_none() {
        return Err(ConfigError::UnknownDefaultCountry(
            config.default_country_iso,
        ));
    }

    Ok(config)
}

fn merge_rules(replace_defaults: bool, overrides: &[RuleFile]) -> Result<RuleTable> {
    let mut rules: Vec<CountryRule> = if replace_defaults {
        Vec::new()
    } else {
        RuleTable::builtin().into_rules()
    };
    let mut from_file: Vec<String> = Vec::new();

    for (index, raw) in overrides.iter().enumerate() {
        let rule = raw
            .to_rule()
            .map_err(|source| ConfigError::InvalidRule { index, source })?;
        let iso = rule.country_iso().to_string();
        if from_file.contains(&iso) {
            return Err(ConfigError::DuplicateRule(iso));
        }
        from_file.push(iso.clone());

        match rules.iter_mut().find(|existing| existing.country_iso() == iso) {
            Some(existing) => *existing = rule,
            None => rules.push(rule),
        }
    }

    RuleTable::new(rules).map_err(|err| match err {
        CoreError::EmptyRuleTable => ConfigError::EmptyRules,
        other => ConfigError::RuleTable(other),
    })
}

#[cfg(test)]
mod tests {
    use super::{load, load_at_path, merge_config, parse_str, ConfigError, ConfigFile, RuleFile};
    use phonefield_core::{MaskTiming, PrefixMatch, UnmatchedPrefix};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn rule_file(iso: &str, code: &str, mask: Option<&str>) -> RuleFile {
        RuleFile {
            country_iso: iso.to_string(),
            country_code: code.to_string(),
            mask: mask.map(str::to_string),
            pattern: None,
        }
    }

    #[test]
    fn defaults_use_builtin_rules() {
        let config = merge_config(ConfigFile::default()).expect("merge");
        assert_eq!(config.default_country_iso, "BRA");
        assert_eq!(config.resolve.prefix_match, PrefixMatch::Longest);
        assert_eq!(config.resolve.unmatched_prefix, UnmatchedPrefix::Strict);
        assert_eq!(config.mask_timing, MaskTiming::Keystroke);
        assert_eq!(config.rules.len(), 3);
    }

    #[test]
    fn merge_config_applies_values() {
        let parsed = ConfigFile {
            default_country: Some("chl".to_string()),
            prefix_match: Some(PrefixMatch::First),
            unmatched_prefix: Some(UnmatchedPrefix::Lenient),
            mask_timing: Some(MaskTiming::Blur),
            replace_default_rules: None,
            rules: vec![rule_file("CHL", "56", Some("9 9999 9999"))],
        };
        let merged = merge_config(parsed).expect("merge");
        assert_eq!(merged.default_country_iso, "CHL");
        assert_eq!(merged.resolve.prefix_match, PrefixMatch::First);
        assert_eq!(merged.resolve.unmatched_prefix, UnmatchedPrefix::Lenient);
        assert_eq!(merged.mask_timing, MaskTiming::Blur);
        assert_eq!(merged.rules.len(), 4);
        assert!(merged.engine().is_ok());
    }

    #[test]
    fn file_rule_replaces_builtin_in_place() {
        let parsed = ConfigFile {
            rules: vec![rule_file("BRA", "55", Some("(99) 99999-9999"))],
            ..ConfigFile::default()
        };
        let merged = merge_config(parsed).expect("merge");
        let isos: Vec<&str> = merged.rules.iter().map(|rule| rule.country_iso()).collect();
        assert_eq!(isos, vec!["BRA", "ARG", "USA"]);
        let mask = merged.rules.get("BRA").and_then(|rule| rule.mask()).expect("mask");
        assert_eq!(mask.capacity(), 11);
    }

    #[test]
    fn replace_default_rules_drops_builtins() {
        let parsed = ConfigFile {
            default_country: Some("CHL".to_string()),
            replace_default_rules: Some(true),
            rules: vec![rule_file("CHL", "56", None)],
            ..ConfigFile::default()
        };
        let merged = merge_config(parsed).expect("merge");
        assert_eq!(merged.rules.len(), 1);
    }

    #[test]
    fn replacing_everything_with_nothing_is_rejected() {
        let parsed = ConfigFile {
            replace_default_rules: Some(true),
            ..ConfigFile::default()
        };
        assert!(matches!(merge_config(parsed), Err(ConfigError::EmptyRules)));
    }

    #[test]
    fn default_country_must_have_a_rule() {
        let parsed = ConfigFile {
            default_country: Some("CHL".to_string()),
            ..ConfigFile::default()
        };
        assert!(matches!(
            merge_config(parsed),
            Err(ConfigError::UnknownDefaultCountry(iso)) if iso == "CHL"
        ));
    }

    #[test]
    fn invalid_rule_reports_index() {
        let parsed = ConfigFile {
            rules: vec![
                rule_file("CHL", "56", None),
                rule_file("PER", "51", Some("99 [9")),
            ],
            ..ConfigFile::default()
        };
        let err = merge_config(parsed).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRule { index: 1, .. }));
    }

    #[test]
    fn duplicate_file_rules_are_rejected() {
        let parsed = ConfigFile {
            rules: vec![rule_file("CHL", "56", None), rule_file("chl", "56", None)],
            ..ConfigFile::default()
        };
        assert!(matches!(
            merge_config(parsed),
            Err(ConfigError::DuplicateRule(iso)) if iso == "CHL"
        ));
    }

    #[test]
    fn load_at_path_requires_file_when_requested() {
        let temp = TempDir::new().expect("tempdir");
        let missing = temp.path().join("config.toml");
        let err = load_at_path(&missing, true).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("config file not found"));
    }

    #[test]
    fn load_at_path_skips_missing_optional_file() {
        let temp = TempDir::new().expect("tempdir");
        let missing = temp.path().join("config.toml");
        assert!(load_at_path(&missing, false).expect("load").is_none());
    }

    #[test]
    fn load_parses_toml() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            concat!(
                "default_country = \"USA\"\n",
                "prefix_match = \"first\"\n",
                "mask_timing = \"blur\"\n",
                "\n",
                "[[rules]]\n",
                "country_iso = \"CHL\"\n",
                "country_code = \"56\"\n",
                "pattern = '569\\d{8}'\n",
            ),
        )
        .expect("write config");

        let config = load(Some(path)).expect("load");
        assert_eq!(config.default_country_iso, "USA");
        assert_eq!(config.resolve.prefix_match, PrefixMatch::First);
        assert_eq!(config.mask_timing, MaskTiming::Blur);
        let chile = config.rules.get("CHL").expect("chile rule");
        assert_eq!(chile.pattern().map(|p| p.as_str()), Some(r"569\d{8}"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = parse_str("colour = \"blue\"\n", Path::new("config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}

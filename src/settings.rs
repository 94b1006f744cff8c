//! # Declarative Merge Settings
//!
//! [`MergeSettings`] is the serializable form of a
//! [`crate::config::MergeConfig`]. It can be read from a YAML or TOML file and
//! extended from the command line, then turned into a configuration for any
//! value backend. Scalar mergers are named [`Strategy`] values instead of
//! closures.
//!
//! ## File Format
//!
//! ```yaml
//! stop_on:
//!   - type: list
//!     depth: 2
//! mergers:
//!   - lhs: int
//!     rhs: int
//!     strategy: sum
//! known_fractal_types: [str]
//! fractal_check_depth: 9
//! ```
//!
//! Every field is optional. Omitting `known_fractal_types` keeps the default
//! (`str`); an explicit empty list removes it.
//!
//! ## Command-Line Rules
//!
//! - Stop rule: `TYPE@DEPTH`, e.g. `list@2`
//! - Merger rule: `LHS,RHS=STRATEGY`, e.g. `int,int=sum`

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::MergeConfig;
use crate::error::{Error, Result};
use crate::shape::TypeTag;
use crate::strategy::{ScalarAccess, Strategy};

/// Serializable merge configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergeSettings {
    /// Left-hand types and depths at which merging stops.
    pub stop_on: Vec<StopRule>,
    /// Strategies for scalar type pairs.
    pub mergers: Vec<MergerRule>,
    /// Types always treated as atomic. `None` keeps the default (`str`).
    pub known_fractal_types: Option<Vec<TypeTag>>,
    /// Depth of the fractal probe. `None` keeps the default (9).
    pub fractal_check_depth: Option<usize>,
}

/// Stop merging when the left operand has this type at this depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StopRule {
    #[serde(rename = "type")]
    pub type_tag: TypeTag,
    pub depth: usize,
}

/// Combine scalars of this type pair with a strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergerRule {
    pub lhs: TypeTag,
    pub rhs: TypeTag,
    pub strategy: Strategy,
}

impl FromStr for StopRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (type_name, depth) = s.split_once('@').ok_or_else(|| Error::Settings {
            message: format!("stop rule '{}' must look like TYPE@DEPTH", s),
        })?;
        let type_name = type_name.trim();
        if type_name.is_empty() {
            return Err(Error::Settings {
                message: format!("stop rule '{}' is missing a type", s),
            });
        }
        let depth = depth.trim().parse::<usize>().map_err(|_| Error::Settings {
            message: format!("stop rule '{}' has an invalid depth", s),
        })?;

        Ok(StopRule {
            type_tag: TypeTag::from(type_name),
            depth,
        })
    }
}

impl FromStr for MergerRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || Error::Settings {
            message: format!("merger rule '{}' must look like LHS,RHS=STRATEGY", s),
        };
        let (types, strategy) = s.split_once('=').ok_or_else(malformed)?;
        let (lhs, rhs) = types.split_once(',').ok_or_else(malformed)?;
        let (lhs, rhs) = (lhs.trim(), rhs.trim());
        if lhs.is_empty() || rhs.is_empty() {
            return Err(malformed());
        }

        Ok(MergerRule {
            lhs: TypeTag::from(lhs),
            rhs: TypeTag::from(rhs),
            strategy: strategy.parse()?,
        })
    }
}

impl MergeSettings {
    /// Parse settings from YAML text. JSON is accepted as well.
    ///
    /// # Errors
    ///
    /// Returns `Error::Settings` if the text does not describe valid settings.
    pub fn parse_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: MergeSettings = serde_yaml::from_str(text).map_err(|err| Error::Settings {
            message: err.to_string(),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `Error::Settings` if the text does not describe valid settings.
    pub fn parse_toml(text: &str) -> Result<Self> {
        let settings: MergeSettings = toml::from_str(text).map_err(|err| Error::Settings {
            message: err.to_string(),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a file. Files ending in `.toml` are read as TOML,
    /// everything else as YAML.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read, or `Error::Settings`
    /// if its content is invalid.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            Self::parse_toml(&text)
        } else {
            Self::parse_yaml(&text)
        }
    }

    /// Check values that deserialize but make no sense.
    ///
    /// # Errors
    ///
    /// Returns `Error::Settings` if the fractal check depth is zero.
    pub fn validate(&self) -> Result<()> {
        if self.fractal_check_depth == Some(0) {
            return Err(Error::Settings {
                message: "fractal_check_depth must be a positive integer".to_string(),
            });
        }
        Ok(())
    }

    /// Add rules on top of these settings. Later merger rules for the same
    /// type pair win.
    pub fn extend(&mut self, stop_on: Vec<StopRule>, mergers: Vec<MergerRule>) {
        self.stop_on.extend(stop_on);
        self.mergers.extend(mergers);
    }

    /// Build a merge configuration for a value backend.
    ///
    /// # Errors
    ///
    /// Returns `Error::Settings` if the settings are invalid.
    pub fn to_config<V: ScalarAccess + 'static>(&self) -> Result<MergeConfig<V>> {
        self.validate()?;

        let mut config = MergeConfig::new();
        for rule in &self.stop_on {
            config = config.stop_on(rule.type_tag.clone(), rule.depth);
        }
        for rule in &self.mergers {
            config = config.with_boxed_merger(
                rule.lhs.clone(),
                rule.rhs.clone(),
                rule.strategy.into_merger(),
            );
        }
        if let Some(known) = &self.known_fractal_types {
            config = config.without_known_fractals();
            for type_tag in known {
                config = config.known_fractal(type_tag.clone());
            }
        }
        if let Some(depth) = self.fractal_check_depth {
            config = config.fractal_check_depth(depth);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use std::io::Write;

    mod rule_parsing_tests {
        use super::*;

        #[test]
        fn test_parse_stop_rule() {
            let rule: StopRule = "list@2".parse().unwrap();
            assert_eq!(rule.type_tag, TypeTag::LIST);
            assert_eq!(rule.depth, 2);
        }

        #[test]
        fn test_parse_stop_rule_errors() {
            assert!("list".parse::<StopRule>().is_err());
            assert!("@2".parse::<StopRule>().is_err());
            assert!("list@deep".parse::<StopRule>().is_err());
        }

        #[test]
        fn test_parse_merger_rule() {
            let rule: MergerRule = " int , float = max ".parse().unwrap();
            assert_eq!(rule.lhs, TypeTag::INT);
            assert_eq!(rule.rhs, TypeTag::FLOAT);
            assert_eq!(rule.strategy, Strategy::Max);
        }

        #[test]
        fn test_parse_merger_rule_errors() {
            assert!("int,int".parse::<MergerRule>().is_err());
            assert!("int=sum".parse::<MergerRule>().is_err());
            assert!(",int=sum".parse::<MergerRule>().is_err());
            let err = "int,int=avg".parse::<MergerRule>().unwrap_err();
            assert!(err.to_string().contains("unknown strategy"));
        }
    }

    mod file_parsing_tests {
        use super::*;

        #[test]
        fn test_parse_yaml_settings() {
            let settings = MergeSettings::parse_yaml(
                r#"
stop_on:
  - type: list
    depth: 2
mergers:
  - lhs: int
    rhs: int
    strategy: sum
known_fractal_types: [str, bytes]
fractal_check_depth: 4
"#,
            )
            .unwrap();
            assert_eq!(
                settings.stop_on,
                vec![StopRule {
                    type_tag: TypeTag::LIST,
                    depth: 2
                }]
            );
            assert_eq!(settings.mergers[0].strategy, Strategy::Sum);
            assert_eq!(
                settings.known_fractal_types,
                Some(vec![TypeTag::STR, TypeTag::new("bytes")])
            );
            assert_eq!(settings.fractal_check_depth, Some(4));
        }

        #[test]
        fn test_parse_empty_yaml_is_default() {
            assert_eq!(MergeSettings::parse_yaml("").unwrap(), MergeSettings::default());
        }

        #[test]
        fn test_parse_toml_settings() {
            let settings = MergeSettings::parse_toml(
                r#"
fractal_check_depth = 3

[[mergers]]
lhs = "str"
rhs = "str"
strategy = "concat"
"#,
            )
            .unwrap();
            assert_eq!(settings.mergers.len(), 1);
            assert_eq!(settings.mergers[0].strategy, Strategy::Concat);
            assert_eq!(settings.fractal_check_depth, Some(3));
        }

        #[test]
        fn test_unknown_fields_are_rejected() {
            let err = MergeSettings::parse_yaml("stop_at: []").unwrap_err();
            assert!(matches!(err, Error::Settings { .. }));
        }

        #[test]
        fn test_unknown_strategy_is_rejected() {
            let err = MergeSettings::parse_yaml(
                "mergers:\n  - lhs: int\n    rhs: int\n    strategy: average\n",
            )
            .unwrap_err();
            assert!(matches!(err, Error::Settings { .. }));
        }

        #[test]
        fn test_zero_fractal_depth_is_rejected() {
            let err = MergeSettings::parse_yaml("fractal_check_depth: 0").unwrap_err();
            assert!(err.to_string().contains("positive integer"));
        }

        #[test]
        fn test_from_file_picks_format_by_extension() {
            let dir = tempfile::tempdir().unwrap();
            let toml_path = dir.path().join("merge.toml");
            let mut file = fs::File::create(&toml_path).unwrap();
            writeln!(file, "fractal_check_depth = 2").unwrap();
            assert_eq!(
                MergeSettings::from_file(&toml_path).unwrap().fractal_check_depth,
                Some(2)
            );

            let yaml_path = dir.path().join("merge.yaml");
            fs::write(&yaml_path, "fractal_check_depth: 5\n").unwrap();
            assert_eq!(
                MergeSettings::from_file(&yaml_path).unwrap().fractal_check_depth,
                Some(5)
            );
        }

        #[test]
        fn test_from_file_missing() {
            let err = MergeSettings::from_file(Path::new("/nonexistent/merge.yaml")).unwrap_err();
            assert!(matches!(err, Error::Io(_)));
        }
    }

    mod config_tests {
        use super::*;

        #[test]
        fn test_to_config_applies_every_rule() {
            let mut settings = MergeSettings::default();
            settings.extend(
                vec!["dict@3".parse().unwrap()],
                vec!["int,int=sum".parse().unwrap()],
            );
            settings.known_fractal_types = Some(vec![]);
            settings.fractal_check_depth = Some(2);

            let config = settings.to_config::<Value>().unwrap();
            assert!(config.should_stop(&TypeTag::DICT, 3));
            let merger = config.merger(&TypeTag::INT, &TypeTag::INT).unwrap();
            assert_eq!(merger(&Value::from(1), &Value::from(2)), Value::from(3));
            assert!(!config.fractals().is_known(&TypeTag::STR));
            assert_eq!(config.fractals().check_depth(), 2);
        }

        #[test]
        fn test_to_config_defaults() {
            let config = MergeSettings::default().to_config::<Value>().unwrap();
            assert!(config.fractals().is_known(&TypeTag::STR));
            assert_eq!(config.fractals().check_depth(), 9);
        }

        #[test]
        fn test_later_merger_rule_wins() {
            let mut settings = MergeSettings::default();
            settings.extend(
                vec![],
                vec![
                    "int,int=sum".parse().unwrap(),
                    "int,int=keep-right".parse().unwrap(),
                ],
            );
            let config = settings.to_config::<Value>().unwrap();
            let merger = config.merger(&TypeTag::INT, &TypeTag::INT).unwrap();
            assert_eq!(merger(&Value::from(1), &Value::from(2)), Value::from(2));
        }
    }
}

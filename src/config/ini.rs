//! INI reader compatible with the classic `ConfigParser` format
//!
//! - `[section]` headers, `key = value` or `key: value` pairs
//! - keys are case-insensitive, section names are not
//! - `#` and `;` start full-line comments
//! - indented lines continue the previous value
//! - `[DEFAULT]` values are visible from every section
//! - a file without any header is read as if it began with the implicit section

use std::collections::HashMap;
use std::str::FromStr;

use super::error::{ConfigError, Result};
use crate::common::constants::paths::DEFAULT_SECTION;

#[derive(Debug, Default)]
pub struct IniDocument {
    defaults: HashMap<String, String>,
    sections: HashMap<String, HashMap<String, String>>,
}

impl IniDocument {
    /// Parse `text`. Key/value lines that appear before any header are placed
    /// in `implicit_section`.
    pub fn parse(text: &str, implicit_section: &str) -> Result<Self> {
        let mut doc = Self::default();
        let mut current_section: Option<String> = None;
        let mut current_key: Option<String> = None;

        for (index, raw_line) in text.lines().enumerate() {
            let line_number = index + 1;
            let trimmed = raw_line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            let indented = raw_line.starts_with(char::is_whitespace);
            if indented
                && let (Some(section), Some(key)) = (&current_section, &current_key)
            {
                let value = doc
                    .entries_mut(section)
                    .get_mut(key)
                    .ok_or_else(|| syntax(line_number, "continuation without a key"))?;
                if !value.is_empty() {
                    value.push('\n');
                }
                value.push_str(trimmed);
                continue;
            }

            if let Some(header) = trimmed.strip_prefix('[') {
                let name = header
                    .strip_suffix(']')
                    .ok_or_else(|| syntax(line_number, "unterminated section header"))?
                    .trim();
                if name.is_empty() {
                    return Err(syntax(line_number, "empty section name"));
                }
                doc.entries_mut(name);
                current_section = Some(name.to_string());
                current_key = None;
                continue;
            }

            let Some(split_at) = trimmed.find(['=', ':']) else {
                return Err(syntax(
                    line_number,
                    format!("expected 'key = value', found '{}'", trimmed),
                ));
            };
            let key = trimmed[..split_at].trim().to_lowercase();
            let value = trimmed[split_at + 1..].trim().to_string();
            if key.is_empty() {
                return Err(syntax(line_number, "missing key before separator"));
            }

            let section = current_section.get_or_insert_with(|| implicit_section.to_string());
            doc.entries_mut(section).insert(key.clone(), value);
            current_key = Some(key);
        }

        Ok(doc)
    }

    fn entries_mut(&mut self, section: &str) -> &mut HashMap<String, String> {
        if section == DEFAULT_SECTION {
            &mut self.defaults
        } else {
            self.sections.entry(section.to_string()).or_default()
        }
    }

    /// View of a section with `[DEFAULT]` values filled in
    pub fn section(&self, name: &str) -> Option<Section<'_>> {
        if name == DEFAULT_SECTION {
            return Some(Section {
                own: None,
                defaults: &self.defaults,
            });
        }
        self.sections.get(name).map(|own| Section {
            own: Some(own),
            defaults: &self.defaults,
        })
    }
}

fn syntax(line: usize, message: impl Into<String>) -> ConfigError {
    ConfigError::Syntax {
        line,
        message: message.into(),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Section<'a> {
    own: Option<&'a HashMap<String, String>>,
    defaults: &'a HashMap<String, String>,
}

impl<'a> Section<'a> {
    /// Raw value with surrounding quotes removed
    pub fn get(&self, key: &str) -> Option<&'a str> {
        let key = key.to_lowercase();
        self.own
            .and_then(|own| own.get(&key))
            .or_else(|| self.defaults.get(&key))
            .map(|value| value.trim_matches(|c| c == '"' || c == '\''))
    }

    /// All keys visible from this section, sorted
    pub fn keys(&self) -> Vec<&'a str> {
        let mut keys: Vec<&str> = self
            .defaults
            .keys()
            .chain(self.own.into_iter().flat_map(|own| own.keys()))
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }

    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        match value.to_ascii_lowercase().as_str() {
            "1" | "yes" | "true" | "on" => Ok(Some(true)),
            "0" | "no" | "false" | "off" => Ok(Some(false)),
            _ => Err(ConfigError::invalid(key, value, "expected a boolean")),
        }
    }

    /// Parse a value with `FromStr`, reporting the parser's message on failure
    pub fn get_parsed<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(key)
            .map(|value| {
                value
                    .trim()
                    .parse::<T>()
                    .map_err(|e| ConfigError::invalid(key, value, e.to_string()))
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_and_defaults() {
        let text = "\
[DEFAULT]
message = UNCLASSIFIED
fgcolor = #FFFFFF

[secret]
message = SECRET
bgcolor = #C8102E
";
        let doc = IniDocument::parse(text, DEFAULT_SECTION).unwrap();

        let secret = doc.section("secret").unwrap();
        assert_eq!(secret.get("message"), Some("SECRET"));
        assert_eq!(secret.get("fgcolor"), Some("#FFFFFF"));
        assert_eq!(secret.get("bgcolor"), Some("#C8102E"));

        let defaults = doc.section(DEFAULT_SECTION).unwrap();
        assert_eq!(defaults.get("message"), Some("UNCLASSIFIED"));
        assert_eq!(defaults.get("bgcolor"), None);

        assert!(doc.section("missing").is_none());
        assert!(doc.section("Secret").is_none());
    }

    #[test]
    fn test_headerless_file_uses_implicit_section() {
        let text = "message = \"CONFIDENTIAL\"\nshow_bottom = False\n";
        let doc = IniDocument::parse(text, "site").unwrap();
        let section = doc.section("site").unwrap();
        assert_eq!(section.get("message"), Some("CONFIDENTIAL"));
        assert_eq!(section.get_bool("show_bottom").unwrap(), Some(false));
    }

    #[test]
    fn test_comments_separators_and_case() {
        let text = "\
# leading comment
; another comment
[DEFAULT]
Message: TOP SECRET
  hres=1920
";
        let doc = IniDocument::parse(text, DEFAULT_SECTION).unwrap();
        let section = doc.section(DEFAULT_SECTION).unwrap();
        // Indented line after a key continues the value
        assert_eq!(section.get("MESSAGE"), Some("TOP SECRET\nhres=1920"));
        assert_eq!(section.get("hres"), None);
    }

    #[test]
    fn test_quotes_are_stripped() {
        let doc = IniDocument::parse("face = 'liberation-sans'\nsize=\"large\"", "x").unwrap();
        let section = doc.section("x").unwrap();
        assert_eq!(section.get("face"), Some("liberation-sans"));
        assert_eq!(section.get("size"), Some("large"));
    }

    #[test]
    fn test_booleans() {
        let text = "a = yes\nb = Off\nc = 1\nd = TRUE\ne = maybe\n";
        let doc = IniDocument::parse(text, DEFAULT_SECTION).unwrap();
        let section = doc.section(DEFAULT_SECTION).unwrap();
        assert_eq!(section.get_bool("a").unwrap(), Some(true));
        assert_eq!(section.get_bool("b").unwrap(), Some(false));
        assert_eq!(section.get_bool("c").unwrap(), Some(true));
        assert_eq!(section.get_bool("d").unwrap(), Some(true));
        assert_eq!(section.get_bool("missing").unwrap(), None);
        assert!(matches!(
            section.get_bool("e"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_parsed_values() {
        let doc = IniDocument::parse("hres = 1920\nopacity = 0.5\nvres = tall", "s").unwrap();
        let section = doc.section("s").unwrap();
        assert_eq!(section.get_parsed::<u16>("hres").unwrap(), Some(1920));
        assert_eq!(section.get_parsed::<f32>("opacity").unwrap(), Some(0.5));
        assert!(section.get_parsed::<u16>("vres").is_err());
    }

    #[test]
    fn test_syntax_errors_report_line() {
        let err = IniDocument::parse("[DEFAULT]\nmessage SECRET\n", DEFAULT_SECTION).unwrap_err();
        assert!(matches!(err, ConfigError::Syntax { line: 2, .. }));

        let err = IniDocument::parse("[broken\n", DEFAULT_SECTION).unwrap_err();
        assert!(matches!(err, ConfigError::Syntax { line: 1, .. }));

        let err = IniDocument::parse("= value\n", DEFAULT_SECTION).unwrap_err();
        assert!(matches!(err, ConfigError::Syntax { line: 1, .. }));
    }

    #[test]
    fn test_keys_merge_defaults() {
        let text = "[DEFAULT]\nmessage = A\n[site]\nbgcolor = red\nmessage = B\n";
        let doc = IniDocument::parse(text, DEFAULT_SECTION).unwrap();
        assert_eq!(doc.section("site").unwrap().keys(), vec!["bgcolor", "message"]);
    }
}

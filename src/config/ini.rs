// INI reader and writer for the config store
//
// Lexing is done by `configparser`; this module reshapes its map into
// ordered sections with `[DEFAULT]` held apart, and writes them back.

use configparser::ini::Ini;

/// Name of the section whose entries every other section falls back to
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Where `configparser` files options that come before any header. Empty so
/// that it cannot clash with a real `[DEFAULT]`.
const HEADERLESS: &str = "";

/// A single `key = value` entry. Keys are stored lower-cased; a key written
/// without a delimiter has no value.
pub type Entry = (String, Option<String>);

/// One `[name]` block, entries in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub entries: Vec<Entry>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Section {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Look up a key (already lower-cased by the caller)
    pub fn get(&self, key: &str) -> Option<&Option<String>> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Insert or replace a key, keeping the position of an existing entry
    pub fn set(&mut self, key: String, value: Option<String>) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parsed contents of a config file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    /// Entries of the `[DEFAULT]` section
    pub defaults: Section,
    /// Every other section in the order it first appeared
    pub sections: Vec<Section>,
}

impl IniDocument {
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        if name == DEFAULT_SECTION {
            return Some(&mut self.defaults);
        }
        self.sections.iter_mut().find(|s| s.name == name)
    }

    /// Parse INI text.
    ///
    /// Accepts `key = value` and `key: value`, `#` and `;` comments,
    /// indented continuation lines and keys without a value. Section names
    /// keep their case, keys are lower-cased. Repeated sections are merged.
    pub fn parse(text: &str) -> Result<Self, String> {
        let mut ini = Ini::new_cs();
        ini.set_default_section(HEADERLESS);
        ini.set_multiline(true);
        let map = ini.read(text.to_string())?;

        let mut doc = IniDocument {
            defaults: Section::new(DEFAULT_SECTION),
            sections: Vec::new(),
        };
        for (name, values) in map {
            if name == HEADERLESS {
                if values.is_empty() {
                    continue;
                }
                return Err("option outside of any section".to_string());
            }

            let mut section = Section::new(name.as_str());
            for (key, value) in values {
                if key.is_empty() {
                    return Err(format!("empty option name in section '{}'", name));
                }
                section.set(key.to_lowercase(), value);
            }
            if name == DEFAULT_SECTION {
                doc.defaults = section;
            } else {
                doc.sections.push(section);
            }
        }
        Ok(doc)
    }

    /// Serialize back to INI text
    pub fn to_ini_string(&self) -> String {
        let mut out = String::new();
        if !self.defaults.is_empty() {
            write_section(&mut out, &self.defaults);
        }
        for section in &self.sections {
            write_section(&mut out, section);
        }
        out
    }
}

fn write_section(out: &mut String, section: &Section) {
    out.push('[');
    out.push_str(&section.name);
    out.push_str("]\n");
    for (key, value) in &section.entries {
        match value {
            Some(v) => {
                out.push_str(key);
                out.push_str(" = ");
                out.push_str(&v.replace('\n', "\n\t"));
            }
            None => out.push_str(key),
        }
        out.push('\n');
    }
    out.push('\n');
}

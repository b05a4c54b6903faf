//! Family name → face lookup, built explicitly and passed by reference.

use super::face::{FontFace, GlyphFace};
use super::FontStyle;
use crate::error::{Error, Result};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

/// A family known to a registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontFamily {
    name: String,
}

impl FontFamily {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

struct RegisteredFace {
    style: FontStyle,
    face: Arc<dyn FontFace>,
}

/// Maps logical family names to installed or in-memory faces.
///
/// Faces discovered through `fontdb` are parsed on first use and kept for
/// the lifetime of the registry.
pub struct FontRegistry {
    db: fontdb::Database,
    custom: BTreeMap<String, (FontFamily, Vec<RegisteredFace>)>,
    aliases: HashMap<String, String>,
    loaded: RefCell<HashMap<fontdb::ID, Arc<dyn FontFace>>>,
}

fn key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl FontRegistry {
    /// An empty registry with no aliases.
    pub fn empty() -> Self {
        Self {
            db: fontdb::Database::new(),
            custom: BTreeMap::new(),
            aliases: HashMap::new(),
            loaded: RefCell::new(HashMap::new()),
        }
    }

    /// An empty registry carrying the default generic-family aliases.
    pub fn new() -> Self {
        let mut r = Self::empty();
        r.add_alias("monospace", "Courier New");
        r.add_alias("Helvetica", "Arial");
        r
    }

    /// Registry populated from the fonts installed on this machine.
    #[cfg(feature = "system-fonts")]
    pub fn with_system_fonts() -> Self {
        let mut r = Self::new();
        r.db.load_system_fonts();
        log::debug!("discovered {} system font faces", r.db.len());
        r
    }

    pub fn add_alias(&mut self, alias: &str, family: &str) {
        self.aliases.insert(key(alias), family.to_string());
    }

    /// Registers an in-memory face under its family name.
    pub fn add_face(&mut self, face: Arc<dyn FontFace>, style: FontStyle) {
        let name = face.family_name().to_string();
        let entry = self
            .custom
            .entry(key(&name))
            .or_insert_with(|| (FontFamily::new(name), Vec::new()));
        entry.1.push(RegisteredFace { style, face });
    }

    pub fn load_font_file(&mut self, path: &Path) -> Result<()> {
        self.db.load_font_file(path)?;
        Ok(())
    }

    pub fn load_fonts_dir(&mut self, dir: &Path) -> Result<()> {
        if !dir.is_dir() {
            return Err(Error::ConfigError(format!(
                "font directory {} does not exist",
                dir.display()
            )));
        }
        let before = self.db.len();
        self.db.load_fonts_dir(dir);
        log::debug!("loaded {} faces from {}", self.db.len() - before, dir.display());
        Ok(())
    }

    /// All known families, in-memory ones first.
    pub fn families(&self) -> Vec<FontFamily> {
        let mut out: Vec<FontFamily> = self.custom.values().map(|(f, _)| f.clone()).collect();
        let mut seen: std::collections::HashSet<String> = self.custom.keys().cloned().collect();
        for info in self.db.faces() {
            if let Some((name, _)) = info.families.first() {
                if seen.insert(key(name)) {
                    out.push(FontFamily::new(name.clone()));
                }
            }
        }
        out
    }

    pub fn contains_family(&self, name: &str) -> bool {
        self.resolve_name(name).is_some()
    }

    /// The family `name` resolves to after alias mapping, if any.
    pub fn resolve_name(&self, name: &str) -> Option<FontFamily> {
        let target = self.aliases.get(&key(name)).map(String::as_str).unwrap_or(name);
        if let Some((family, _)) = self.custom.get(&key(target)) {
            return Some(family.clone());
        }
        self.db.faces().find_map(|info| {
            info.families
                .iter()
                .find(|(n, _)| key(n) == key(target))
                .map(|(n, _)| FontFamily::new(n.clone()))
        })
    }

    /// Finds the best face of `family` for `style`.
    pub fn face(&self, family: &str, style: FontStyle) -> Result<Arc<dyn FontFace>> {
        let resolved = self
            .resolve_name(family)
            .ok_or_else(|| Error::FontNotFound(family.to_string()))?;

        if let Some((_, faces)) = self.custom.get(&key(resolved.name())) {
            let want = style & (FontStyle::BOLD | FontStyle::ITALIC);
            let best = faces
                .iter()
                .max_by_key(|f| {
                    let have = f.style & (FontStyle::BOLD | FontStyle::ITALIC);
                    let weight = have.contains(FontStyle::BOLD) == want.contains(FontStyle::BOLD);
                    (have == want) as u8 * 2 + weight as u8
                })
                .ok_or_else(|| Error::FontNotFound(family.to_string()))?;
            return Ok(best.face.clone());
        }

        let families = [fontdb::Family::Name(resolved.name())];
        let query = fontdb::Query {
            families: &families,
            weight: if style.contains(FontStyle::BOLD) {
                fontdb::Weight::BOLD
            } else {
                fontdb::Weight::NORMAL
            },
            stretch: fontdb::Stretch::Normal,
            style: if style.contains(FontStyle::ITALIC) {
                fontdb::Style::Italic
            } else {
                fontdb::Style::Normal
            },
        };
        let id = self
            .db
            .query(&query)
            .ok_or_else(|| Error::FontNotFound(family.to_string()))?;

        if let Some(face) = self.loaded.borrow().get(&id) {
            return Ok(face.clone());
        }

        let name = resolved.name().to_string();
        let face = self
            .db
            .with_face_data(id, |data, index| {
                GlyphFace::from_bytes(name.clone(), data.to_vec(), index)
            })
            .ok_or_else(|| Error::FontLoad(format!("face data for {} is unavailable", name)))??;
        let face: Arc<dyn FontFace> = Arc::new(face);
        self.loaded.borrow_mut().insert(id, face.clone());
        log::debug!("loaded face for family {}", name);
        Ok(face)
    }
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Opaque material token id. Id 0 is always air.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MaterialId(pub u16);

impl MaterialId {
    pub const AIR: MaterialId = MaterialId(0);

    #[inline]
    pub fn is_air(self) -> bool {
        self.0 == 0
    }
}

#[derive(Clone, Debug)]
pub struct Material {
    pub id: MaterialId,
    pub key: String,
    /// Concrete block identifier the token exports as, e.g. `minecraft:stone`.
    pub block: String,
}

/// Key for the sentinel material every unrecognized token resolves to.
pub const UNKNOWN_KEY: &str = "unknown";
const UNKNOWN_BLOCK: &str = "minecraft:magenta_wool";

const DEFAULT_PALETTE: &str = include_str!("default_materials.toml");

#[derive(Clone, Debug)]
pub struct MaterialCatalog {
    pub materials: Vec<Material>,
    pub by_key: HashMap<String, MaterialId>,
    unknown: MaterialId,
}

impl MaterialCatalog {
    /// The embedded default palette. A config file can override it wholesale
    /// via [`MaterialCatalog::from_path`].
    pub fn builtin() -> Result<Self, Box<dyn Error>> {
        Self::from_toml_str(DEFAULT_PALETTE)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: PaletteConfig = toml::from_str(toml_str)?;
        let mut catalog = MaterialCatalog {
            materials: Vec::new(),
            by_key: HashMap::new(),
            unknown: MaterialId::AIR,
        };
        // Air is pinned to id 0 no matter what the file says.
        catalog.push("air", "minecraft:air");
        let mut entries: Vec<(String, String)> = cfg.materials.into_iter().collect();
        // HashMap iteration order is nondeterministic; sort keys so id assignment is stable.
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        for (key, block) in entries {
            catalog.push(&key, &block);
        }
        if !catalog.by_key.contains_key(UNKNOWN_KEY) {
            catalog.push(UNKNOWN_KEY, UNKNOWN_BLOCK);
        }
        catalog.unknown = catalog
            .by_key
            .get(UNKNOWN_KEY)
            .copied()
            .unwrap_or(MaterialId::AIR);
        Ok(catalog)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    fn push(&mut self, key: &str, block: &str) {
        if self.by_key.contains_key(key) {
            return;
        }
        let id = MaterialId(self.materials.len() as u16);
        self.by_key.insert(key.to_string(), id);
        self.materials.push(Material {
            id,
            key: key.to_string(),
            block: block.to_string(),
        });
    }

    pub fn get_id(&self, key: &str) -> Option<MaterialId> {
        self.by_key.get(key).copied()
    }

    /// Total lookup: keys the palette does not know resolve to the unknown
    /// sentinel instead of failing.
    pub fn resolve(&self, key: &str) -> MaterialId {
        self.get_id(key).unwrap_or(self.unknown)
    }

    pub fn unknown_id(&self) -> MaterialId {
        self.unknown
    }

    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0 as usize)
    }

    pub fn block_name(&self, id: MaterialId) -> &str {
        self.get(id).map(|m| m.block.as_str()).unwrap_or("minecraft:air")
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

// --- Config ---

#[derive(Deserialize)]
struct PaletteConfig {
    // token = "namespace:block_name"
    materials: HashMap<String, String>,
}

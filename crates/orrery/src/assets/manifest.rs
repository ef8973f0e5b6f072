use serde::{Deserialize, Serialize};

use crate::bodies::BodyRegistry;
use crate::error::{OrreryError, Result};

/// Texture manifest: every image the host must load, addressed by slot.
/// Loaded from JSON or derived from the body registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextureManifest {
    /// Slot `i` is `textures[i]`.
    pub textures: Vec<TextureDescriptor>,
}

/// A single named image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureDescriptor {
    /// Lookup name, e.g. `"earth"` or `"saturn_ring"`.
    pub name: String,
    /// Relative path or URL of the image (e.g. `"./image/earth.jpg"`).
    pub path: String,
}

impl TextureManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// One `.jpg` per body surface and one `.png` per ring, under `dir`.
    pub fn for_registry(registry: &BodyRegistry, dir: &str) -> Self {
        let dir = dir.trim_end_matches('/');
        let mut textures = Vec::new();
        for body in registry.iter() {
            textures.push(TextureDescriptor {
                name: body.texture_key.to_string(),
                path: format!("{}/{}.jpg", dir, body.texture_key),
            });
        }
        for ring in registry.iter().filter_map(|b| b.ring) {
            textures.push(TextureDescriptor {
                name: ring.texture.to_string(),
                path: format!("{}/{}.png", dir, ring.texture),
            });
        }
        Self { textures }
    }

    /// Slot of the texture with the given name.
    pub fn slot(&self, name: &str) -> Option<u32> {
        self.textures
            .iter()
            .position(|t| t.name == name)
            .map(|i| i as u32)
    }

    pub fn path(&self, slot: u32) -> Option<&str> {
        self.textures.get(slot as usize).map(|t| t.path.as_str())
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Check that every body has a texture whose path maps back to that body
    /// through the registry's case-insensitive key lookup.
    pub fn validate(&self, registry: &BodyRegistry) -> Result<()> {
        for body in registry.iter() {
            let missing = || OrreryError::MissingTexture {
                body: body.name.to_string(),
                key: body.texture_key.to_string(),
            };
            let slot = self.slot(body.texture_key).ok_or_else(missing)?;
            let path = self.path(slot).ok_or_else(missing)?;

            match registry.find_by_texture(path) {
                Some(found) if found.id == body.id => {}
                Some(found) => {
                    return Err(OrreryError::DuplicateTextureKey {
                        key: found.texture_key.to_string(),
                        first: body.name.to_string(),
                        second: found.name.to_string(),
                    })
                }
                None => return Err(missing()),
            }
        }
        Ok(())
    }
}

// src/fallback_catalog.rs
use crate::image_url::fallback_index;
use crate::site_config::ConfigError;
use serde::{Deserialize, Serialize};

const STOCK_IMAGES: [&str; 31] = [
    "https://images.unsplash.com/photo-1568605114967-8130f3a36994?w=800",
    "https://images.unsplash.com/photo-1600596542815-ffad4c1539a9?w=800",
    "https://images.unsplash.com/photo-1600585154340-be6161a56a0c?w=800",
    "https://images.unsplash.com/photo-1600607687939-ce8a6c25118c?w=800",
    "https://images.unsplash.com/photo-1600566753190-17f0baa2a6c3?w=800",
    "https://images.unsplash.com/photo-1600585154084-4e5fe7c39198?w=800",
    "https://images.unsplash.com/photo-1522708323590-d24dbb6b0267?w=800",
    "https://images.unsplash.com/photo-1484154218962-a197022b5858?w=800",
    "https://images.unsplash.com/photo-1505691723518-36a5ac3b2d52?w=800",
    "https://images.unsplash.com/photo-1505693416388-ac5ce068fe85?w=800",
    "https://images.unsplash.com/photo-1507089947368-19c1da9775ae?w=800",
    "https://images.unsplash.com/photo-1502005229762-cf1b2da7c74f?w=800",
    "https://images.unsplash.com/photo-1460353581641-37baddab0fa2?w=800",
    "https://images.unsplash.com/photo-1502672023488-70e25813eb80?w=800",
    "https://images.unsplash.com/photo-1493809842364-78817add7ffb?w=800",
    "https://images.unsplash.com/photo-1444418776041-9c7e33cc5a9c?w=800",
    "https://images.unsplash.com/photo-1451976664376-cb1bfab35d23?w=800",
    "https://images.unsplash.com/photo-1493666438817-866a91353ca9?w=800",
    "https://images.unsplash.com/photo-1490195117352-aa267f47f2f2?w=800",
    "https://images.unsplash.com/photo-1512917774080-9991f1c4c750?w=800",
    "https://images.unsplash.com/photo-1519710164239-da123dc03ef4?w=800",
    "https://images.unsplash.com/photo-1520880867055-1e30d1cb001c?w=800",
    "https://images.unsplash.com/photo-1501183638710-841dd1904471?w=800",
    "https://images.unsplash.com/photo-1497366216540-94aef0b6b826?w=800",
    "https://images.unsplash.com/photo-1524758631624-e2822e304c36?w=800",
    "https://images.unsplash.com/photo-1505691938895-1758d7feb511?w=800",
    "https://images.unsplash.com/photo-1537726235470-8504e3beef77?w=800",
    "https://images.unsplash.com/photo-1472220625704-91e1462799b2?w=800",
    "https://images.unsplash.com/photo-1500530855697-b586d89ba3ee?w=800",
    "https://images.unsplash.com/photo-1500534314209-a25ddb2bd429?w=800",
    "https://images.unsplash.com/photo-1499914485622-0b66d4fa0f0e?w=800",
];

/// Ordered stock images shown when a listing has nothing usable of its own.
/// Never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FallbackCatalog {
    images: Vec<String>,
}

impl FallbackCatalog {
    pub fn new(images: Vec<String>) -> Result<Self, ConfigError> {
        let images: Vec<String> = images
            .into_iter()
            .map(|img| img.trim().to_string())
            .filter(|img| !img.is_empty())
            .collect();
        if images.is_empty() {
            return Err(ConfigError::EmptyFallbackCatalog);
        }
        Ok(Self { images })
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn anchor_index(&self, entity_id: &str) -> usize {
        fallback_index(entity_id, self.images.len())
    }

    /// The image a listing is pinned to once every candidate has failed.
    pub fn primary_for(&self, entity_id: &str) -> &str {
        &self.images[self.anchor_index(entity_id)]
    }

    /// Up to `count` consecutive catalog entries starting at the entity's anchor,
    /// wrapping. Never longer than the catalog, so entries are distinct.
    pub fn rotation_for(&self, entity_id: &str, count: usize) -> Vec<String> {
        let anchor = self.anchor_index(entity_id);
        (0..count.min(self.images.len()))
            .map(|offset| self.images[(anchor + offset) % self.images.len()].clone())
            .collect()
    }
}

impl Default for FallbackCatalog {
    fn default() -> Self {
        Self {
            images: STOCK_IMAGES.iter().map(|img| img.to_string()).collect(),
        }
    }
}

impl TryFrom<Vec<String>> for FallbackCatalog {
    type Error = ConfigError;

    fn try_from(images: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(images)
    }
}

impl From<FallbackCatalog> for Vec<String> {
    fn from(catalog: FallbackCatalog) -> Self {
        catalog.images
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_catalog() -> FallbackCatalog {
        FallbackCatalog::new(vec!["a".into(), "b".into(), "c".into(), "d".into(), "e".into()])
            .unwrap()
    }

    #[test]
    fn rejects_empty_catalog() {
        assert!(matches!(
            FallbackCatalog::new(vec![" ".into()]),
            Err(ConfigError::EmptyFallbackCatalog)
        ));
    }

    #[test]
    fn primary_uses_digits_of_id() {
        let catalog = small_catalog();
        assert_eq!(catalog.primary_for("prop-7"), "c");
        assert_eq!(catalog.primary_for("12"), "c");
        assert_eq!(catalog.primary_for(""), "a");
    }

    #[test]
    fn rotation_wraps_around_catalog() {
        let catalog = small_catalog();
        assert_eq!(catalog.rotation_for("3", 4), vec!["d", "e", "a", "b"]);
        assert_eq!(catalog.rotation_for("3", 4)[0], catalog.primary_for("3"));
    }

    #[test]
    fn rotation_is_capped_by_small_catalog() {
        let catalog = FallbackCatalog::new(vec!["only".into()]).unwrap();
        assert_eq!(catalog.rotation_for("x", 4), vec!["only"]);

        let catalog = FallbackCatalog::new(vec!["a".into(), "b".into()]).unwrap();
        assert_eq!(catalog.rotation_for("1", 4), vec!["b", "a"]);
    }

    #[test]
    fn default_catalog_is_stock_list() {
        let catalog = FallbackCatalog::default();
        assert_eq!(catalog.len(), STOCK_IMAGES.len());
        assert_eq!(catalog.primary_for("0"), STOCK_IMAGES[0]);
    }
}

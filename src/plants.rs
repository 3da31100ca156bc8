use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::health::{Humidity, Lighting, Moisture, Temperature};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlantError {
    #[error("plant name must not be empty")]
    EmptyName,
    #[error("plant {0} not found")]
    NotFound(Uuid),
}

// ---------------------------------------------------------------------------
// PlantProfile
// ---------------------------------------------------------------------------

/// A plant and its configured ideal-range category per monitored dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PlantProfile {
    pub id: Uuid,
    pub name: String,
    /// Opaque reference to the plant's photo asset.
    pub photo_reference: String,
    pub lighting: Lighting,
    pub moisture: Moisture,
    pub humidity: Humidity,
    pub temperature: Temperature,
}

impl PlantProfile {
    pub fn new(
        name: impl Into<String>,
        photo_reference: impl Into<String>,
        lighting: Lighting,
        moisture: Moisture,
        humidity: Humidity,
        temperature: Temperature,
    ) -> Result<Self, PlantError> {
        let name: String = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(PlantError::EmptyName);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            photo_reference: photo_reference.into(),
            lighting,
            moisture,
            humidity,
            temperature,
        })
    }

    fn apply(&mut self, update: &CategoryUpdate) {
        if let Some(v) = update.lighting {
            self.lighting = v;
        }
        if let Some(v) = update.moisture {
            self.moisture = v;
        }
        if let Some(v) = update.humidity {
            self.humidity = v;
        }
        if let Some(v) = update.temperature {
            self.temperature = v;
        }
    }
}

/// Partial change of a plant's category selections. Absent fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryUpdate {
    pub lighting: Option<Lighting>,
    pub moisture: Option<Moisture>,
    pub humidity: Option<Humidity>,
    pub temperature: Option<Temperature>,
}

// ---------------------------------------------------------------------------
// PlantRegistry
// ---------------------------------------------------------------------------

/// Ordered in-memory store of plant profiles.
///
/// Cloning shares the underlying list.
#[derive(Clone, Default)]
pub struct PlantRegistry {
    inner: Arc<RwLock<Vec<PlantProfile>>>,
}

impl PlantRegistry {
    pub fn new(plants: Vec<PlantProfile>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(plants)),
        }
    }

    /// Registry pre-populated with the demo plants.
    pub fn seeded() -> Self {
        Self::new(demo_plants())
    }

    pub async fn list(&self) -> Vec<PlantProfile> {
        self.inner.read().await.clone()
    }

    pub async fn get(&self, id: Uuid) -> Result<PlantProfile, PlantError> {
        self.inner
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(PlantError::NotFound(id))
    }

    pub async fn add(&self, plant: PlantProfile) -> PlantProfile {
        self.inner.write().await.push(plant.clone());
        plant
    }

    pub async fn update_categories(
        &self,
        id: Uuid,
        update: &CategoryUpdate,
    ) -> Result<PlantProfile, PlantError> {
        let mut plants = self.inner.write().await;
        let plant = plants
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(PlantError::NotFound(id))?;
        plant.apply(update);
        Ok(plant.clone())
    }

    pub async fn remove(&self, id: Uuid) -> Result<PlantProfile, PlantError> {
        let mut plants = self.inner.write().await;
        let idx = plants
            .iter()
            .position(|p| p.id == id)
            .ok_or(PlantError::NotFound(id))?;
        Ok(plants.remove(idx))
    }
}

fn demo_plants() -> Vec<PlantProfile> {
    [
        ("The Undying", "IMG_5718", Lighting::Shade, Moisture::Dry, Humidity::Normal, Temperature::Normal),
        ("Actually fake", "IMG_5716", Lighting::Shade, Moisture::BoneDry, Humidity::Dry, Temperature::Cold),
        ("On the edge", "IMG_5721", Lighting::BrightLight, Moisture::BoneDry, Humidity::Dry, Temperature::Hot),
        ("Just Thrivin'", "IMG_5720", Lighting::Shade, Moisture::Dry, Humidity::Normal, Temperature::Normal),
    ]
    .into_iter()
    .filter_map(|(name, photo, l, m, h, t)| PlantProfile::new(name, photo, l, m, h, t).ok())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fern() -> PlantProfile {
        PlantProfile::new("Fern", "IMG_1", Lighting::Shade, Moisture::Dry, Humidity::Humid, Temperature::Normal)
            .unwrap()
    }

    #[test]
    fn new_rejects_blank_name() {
        let err = PlantProfile::new("   ", "x", Lighting::Shade, Moisture::Dry, Humidity::Dry, Temperature::Cold)
            .unwrap_err();
        assert_eq!(err, PlantError::EmptyName);
    }

    #[test]
    fn new_trims_name() {
        let p = PlantProfile::new(" Fern ", "x", Lighting::Shade, Moisture::Dry, Humidity::Dry, Temperature::Cold)
            .unwrap();
        assert_eq!(p.name, "Fern");
    }

    #[tokio::test]
    async fn seeded_registry_has_demo_plants_in_order() {
        let registry = PlantRegistry::seeded();
        let names: Vec<_> = registry.list().await.into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["The Undying", "Actually fake", "On the edge", "Just Thrivin'"]);
    }

    #[tokio::test]
    async fn get_unknown_plant_errors() {
        let registry = PlantRegistry::default();
        let id = Uuid::new_v4();
        assert_eq!(registry.get(id).await.unwrap_err(), PlantError::NotFound(id));
    }

    #[tokio::test]
    async fn add_then_get() {
        let registry = PlantRegistry::default();
        let added = registry.add(fern()).await;
        assert_eq!(registry.get(added.id).await.unwrap(), added);
    }

    #[tokio::test]
    async fn update_categories_is_partial() {
        let registry = PlantRegistry::default();
        let added = registry.add(fern()).await;

        let update = CategoryUpdate {
            temperature: Some(Temperature::Hot),
            ..Default::default()
        };
        let updated = registry.update_categories(added.id, &update).await.unwrap();

        assert_eq!(updated.temperature, Temperature::Hot);
        assert_eq!(updated.lighting, Lighting::Shade);
        assert_eq!(updated.humidity, Humidity::Humid);
        assert_eq!(registry.get(added.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn remove_deletes_only_that_plant() {
        let registry = PlantRegistry::seeded();
        let first = registry.list().await[0].clone();

        let removed = registry.remove(first.id).await.unwrap();
        assert_eq!(removed.id, first.id);

        let remaining = registry.list().await;
        assert_eq!(remaining.len(), 3);
        assert!(remaining.iter().all(|p| p.id != first.id));
        assert!(registry.remove(first.id).await.is_err());
    }

    #[tokio::test]
    async fn clone_shares_state() {
        let registry = PlantRegistry::default();
        let clone = registry.clone();
        let added = registry.add(fern()).await;
        assert_eq!(clone.get(added.id).await.unwrap().name, "Fern");
    }
}

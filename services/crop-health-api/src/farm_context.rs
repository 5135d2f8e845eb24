//! The farm registry and current selection.

use field_common::{Farm, FarmCatalog, FieldError, FieldResult};

/// Farms known to the service and which one the user is looking at.
///
/// Created once at startup and shared through the application state.
#[derive(Debug, Clone)]
pub struct FarmContext {
    farms: Vec<Farm>,
    selected: usize,
}

impl FarmContext {
    /// The first farm in the catalog starts out selected.
    pub fn new(catalog: FarmCatalog) -> FieldResult<Self> {
        if catalog.farms.is_empty() {
            return Err(FieldError::Configuration(
                "farm catalog must contain at least one farm".to_string(),
            ));
        }
        Ok(Self {
            farms: catalog.farms,
            selected: 0,
        })
    }

    pub fn farms(&self) -> &[Farm] {
        &self.farms
    }

    pub fn selected(&self) -> &Farm {
        &self.farms[self.selected]
    }

    pub fn get(&self, id: &str) -> Option<&Farm> {
        self.farms.iter().find(|f| f.id == id)
    }

    /// Select a farm by id.
    pub fn select(&mut self, id: &str) -> FieldResult<&Farm> {
        let index = self
            .farms
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| FieldError::NotFound(format!("farm '{}'", id)))?;
        self.selected = index;
        Ok(&self.farms[index])
    }

    /// Register a new farm. Ids are unique.
    pub fn add(&mut self, farm: Farm) -> FieldResult<()> {
        farm.validate()?;
        if self.get(&farm.id).is_some() {
            return Err(FieldError::Conflict(format!(
                "farm '{}' already exists",
                farm.id
            )));
        }
        tracing::info!(farm_id = %farm.id, name = %farm.name, "Farm added");
        self.farms.push(farm);
        Ok(())
    }
}

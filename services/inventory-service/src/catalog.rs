use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogVehicle {
    pub id: i64,
    pub license_plate: &'static str,
    pub model: &'static str,
    pub status: &'static str,
}

const SEED: [CatalogVehicle; 3] = [
    CatalogVehicle {
        id: 1,
        license_plate: "А123БВ77",
        model: "ГАЗель NEXT",
        status: "active",
    },
    CatalogVehicle {
        id: 2,
        license_plate: "В456ГД78",
        model: "Камаз 54901",
        status: "active",
    },
    CatalogVehicle {
        id: 3,
        license_plate: "Е789ЖЗ79",
        model: "Volvo FH",
        status: "maintenance",
    },
];

/// Read-only vehicle list served without any backing store.
#[derive(Clone)]
pub struct Catalog {
    vehicles: Arc<[CatalogVehicle]>,
}

impl Catalog {
    pub fn new(vehicles: Vec<CatalogVehicle>) -> Self {
        Self {
            vehicles: vehicles.into(),
        }
    }

    pub fn seeded() -> Self {
        Self::new(SEED.to_vec())
    }

    pub fn all(&self) -> &[CatalogVehicle] {
        &self.vehicles
    }

    pub fn find(&self, id: i64) -> Option<&CatalogVehicle> {
        self.vehicles.iter().find(|vehicle| vehicle.id == id)
    }

    pub fn active_count(&self) -> usize {
        self.vehicles
            .iter()
            .filter(|vehicle| vehicle.status == "active")
            .count()
    }
}

//! NDVI classification used both for the imagery evalscript and the map legend.

use serde::{Serialize, Serializer};

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }

    /// `#RRGGBB` form, alpha dropped.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Channels normalized to 0..=1, as returned from a pixel evaluation script.
    pub fn to_unit(&self) -> [f64; 4] {
        [
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
            self.a as f64 / 255.0,
        ]
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// One NDVI bucket: values in `[min, max)` map to `color`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NdviClass {
    /// Inclusive lower bound, `None` for negative infinity.
    pub min: Option<f64>,
    /// Exclusive upper bound, `None` for positive infinity.
    pub max: Option<f64>,
    pub label: &'static str,
    pub color: Rgba,
}

impl NdviClass {
    pub fn contains(&self, value: f64) -> bool {
        let in_min = self.min.map(|m| value >= m).unwrap_or(true);
        let in_max = self.max.map(|m| value < m).unwrap_or(true);
        in_min && in_max
    }
}

/// Seven health buckets from no data through very healthy vegetation.
pub const NDVI_CLASSES: [NdviClass; 7] = [
    NdviClass {
        min: None,
        max: Some(-0.2),
        label: "Water / no data",
        color: Rgba::rgb(51, 51, 51),
    },
    NdviClass {
        min: Some(-0.2),
        max: Some(0.0),
        label: "Barren land",
        color: Rgba::rgb(210, 180, 140),
    },
    NdviClass {
        min: Some(0.0),
        max: Some(0.2),
        label: "Stressed vegetation",
        color: Rgba::rgb(255, 0, 0),
    },
    NdviClass {
        min: Some(0.2),
        max: Some(0.4),
        label: "Moderately stressed",
        color: Rgba::rgb(255, 165, 0),
    },
    NdviClass {
        min: Some(0.4),
        max: Some(0.6),
        label: "Moderate health",
        color: Rgba::rgb(255, 255, 0),
    },
    NdviClass {
        min: Some(0.6),
        max: Some(0.8),
        label: "Healthy vegetation",
        color: Rgba::rgb(50, 205, 50),
    },
    NdviClass {
        min: Some(0.8),
        max: None,
        label: "Very healthy vegetation",
        color: Rgba::rgb(0, 100, 0),
    },
];

/// Scene classification values masked as transparent:
/// cloud shadow, cloud medium/high probability, thin cirrus.
pub const MASKED_SCENE_CLASSES: [u8; 4] = [3, 8, 9, 10];

/// Normalized difference of near-infrared and red reflectance.
pub fn ndvi(nir: f64, red: f64) -> f64 {
    (nir - red) / (nir + red + 1e-6)
}

/// Bucket for an NDVI value. Every finite value falls in exactly one class.
pub fn classify(value: f64) -> &'static NdviClass {
    NDVI_CLASSES
        .iter()
        .find(|c| c.contains(value))
        .unwrap_or(&NDVI_CLASSES[0])
}

/// Color for one pixel, transparent where the scene class is masked.
pub fn pixel_color(scene_class: u8, nir: f64, red: f64) -> Rgba {
    if MASKED_SCENE_CLASSES.contains(&scene_class) {
        return Rgba::transparent();
    }
    classify(ndvi(nir, red)).color
}

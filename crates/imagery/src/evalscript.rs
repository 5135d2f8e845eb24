//! Pixel evaluation script sent with every process request.
//!
//! Generated from the shared NDVI classification table so the rendered map
//! and the legend served to the UI always agree.

use std::fmt::Write;

use field_common::ndvi::{Rgba, MASKED_SCENE_CLASSES, NDVI_CLASSES};

fn color_literal(color: &Rgba) -> String {
    let [r, g, b, a] = color.to_unit();
    format!("[{:.4}, {:.4}, {:.4}, {:.4}]", r, g, b, a)
}

/// Evalscript (V3) rendering red/NIR NDVI into seven color buckets, with
/// cloud, cloud-shadow and cirrus pixels fully transparent.
pub fn ndvi_evalscript() -> String {
    let mut script = String::from(
        "//VERSION=3\n\
         function setup() {\n  \
           return { input: [{ bands: [\"B04\", \"B08\", \"SCL\"] }], output: { bands: 4 } };\n\
         }\n\
         function evaluatePixel(sample) {\n  \
           var scl = sample.SCL;\n",
    );

    let mask = MASKED_SCENE_CLASSES
        .iter()
        .map(|c| format!("scl === {}", c))
        .collect::<Vec<_>>()
        .join(" || ");
    let _ = writeln!(script, "  if ({}) return [0, 0, 0, 0];", mask);
    script.push_str("  var ndvi = (sample.B08 - sample.B04) / (sample.B08 + sample.B04 + 1e-6);\n");

    for class in NDVI_CLASSES.iter() {
        match class.max {
            Some(max) => {
                let _ = writeln!(
                    script,
                    "  if (ndvi < {}) return {}; // {}",
                    max,
                    color_literal(&class.color),
                    class.label
                );
            }
            None => {
                let _ = writeln!(
                    script,
                    "  return {}; // {}",
                    color_literal(&class.color),
                    class.label
                );
            }
        }
    }
    script.push_str("}\n");
    script
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masks_clouds_and_shadows() {
        let script = ndvi_evalscript();
        assert!(script.starts_with("//VERSION=3"));
        assert!(script.contains(
            "if (scl === 3 || scl === 8 || scl === 9 || scl === 10) return [0, 0, 0, 0];"
        ));
    }

    #[test]
    fn test_thresholds_in_order() {
        let script = ndvi_evalscript();
        let positions: Vec<usize> = ["ndvi < -0.2)", "ndvi < 0)", "ndvi < 0.2)", "ndvi < 0.4)", "ndvi < 0.6)", "ndvi < 0.8)"]
            .iter()
            .map(|needle| script.find(needle).unwrap_or_else(|| panic!("missing {}", needle)))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_final_bucket_is_dark_green() {
        let script = ndvi_evalscript();
        assert!(script.contains("return [0.0000, 0.3922, 0.0000, 1.0000]; // Very healthy vegetation"));
        assert!(script.contains("return [0.2000, 0.2000, 0.2000, 1.0000]; // Water / no data"));
    }

    #[test]
    fn test_uses_red_nir_and_scene_bands() {
        let script = ndvi_evalscript();
        assert!(script.contains("bands: [\"B04\", \"B08\", \"SCL\"]"));
        assert!(script.contains("output: { bands: 4 }"));
    }
}

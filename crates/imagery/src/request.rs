//! Process API request body.

use serde::Serialize;

use field_common::{BoundingBox, DateWindow, Geometry};

use crate::config::SentinelHubConfig;
use crate::evalscript::ndvi_evalscript;

/// WGS84 longitude/latitude axis order.
pub const CRS84: &str = "http://www.opengis.net/def/crs/OGC/1.3/CRS84";

/// Level-2A (atmospherically corrected) Sentinel-2 collection.
pub const SENTINEL_2_L2A: &str = "sentinel-2-l2a";

#[derive(Debug, Clone, Serialize)]
pub struct ProcessRequest {
    pub input: ProcessInput,
    pub output: ProcessOutput,
    pub evalscript: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessInput {
    pub bounds: InputBounds,
    pub data: Vec<DataSource>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputBounds {
    pub properties: BoundsProperties,
    pub bbox: BoundingBox,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoundsProperties {
    pub crs: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DataSource {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(rename = "dataFilter")]
    pub data_filter: DataFilter,
}

#[derive(Debug, Clone, Serialize)]
pub struct DataFilter {
    #[serde(rename = "timeRange")]
    pub time_range: TimeRange,
    #[serde(rename = "maxCloudCoverage")]
    pub max_cloud_coverage: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeRange {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessOutput {
    pub width: u32,
    pub height: u32,
    pub responses: Vec<OutputResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputResponse {
    pub identifier: String,
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputFormat {
    #[serde(rename = "type")]
    pub type_: String,
}

impl ProcessRequest {
    /// Build the NDVI render request for one field.
    pub fn ndvi(
        geometry: &Geometry,
        bbox: BoundingBox,
        window: DateWindow,
        config: &SentinelHubConfig,
    ) -> Self {
        Self {
            input: ProcessInput {
                bounds: InputBounds {
                    properties: BoundsProperties {
                        crs: CRS84.to_string(),
                    },
                    bbox,
                    geometry: geometry.clone(),
                },
                data: vec![DataSource {
                    type_: SENTINEL_2_L2A.to_string(),
                    data_filter: DataFilter {
                        time_range: TimeRange {
                            from: window.from_timestamp(),
                            to: window.to_timestamp(),
                        },
                        max_cloud_coverage: config.max_cloud_coverage,
                    },
                }],
            },
            output: ProcessOutput {
                width: config.output_width,
                height: config.output_height,
                responses: vec![OutputResponse {
                    identifier: "default".to_string(),
                    format: OutputFormat {
                        type_: "image/png".to_string(),
                    },
                }],
            },
            evalscript: ndvi_evalscript(),
        }
    }
}

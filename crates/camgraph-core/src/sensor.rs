//! Sensor sockets, enumerated inventory and the catalog of supported image sensors

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{PipelineError, Result};
use crate::names::NameTable;

/// Board connector a physical sensor is attached to
///
/// Index 0 is `CAM_A`, 1 is `CAM_B` and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SensorSocket(pub u16);

impl SensorSocket {
    pub const CAM_A: Self = Self(0);
    pub const CAM_B: Self = Self(1);
    pub const CAM_C: Self = Self(2);
    pub const CAM_D: Self = Self(3);
    pub const CAM_E: Self = Self(4);

    /// Default color sensor socket
    pub const RGB: Self = Self::CAM_A;
    /// Default left stereo socket
    pub const LEFT: Self = Self::CAM_B;
    /// Default right stereo socket
    pub const RIGHT: Self = Self::CAM_C;

    pub fn index(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for SensorSocket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 26 {
            write!(f, "CAM_{}", (b'A' + self.0 as u8) as char)
        } else {
            write!(f, "CAM_{}", self.0)
        }
    }
}

impl FromStr for SensorSocket {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.to_uppercase();
        let socket = match upper.as_str() {
            "RGB" => Some(Self::RGB),
            "LEFT" => Some(Self::LEFT),
            "RIGHT" => Some(Self::RIGHT),
            _ => upper.strip_prefix("CAM_").and_then(|suffix| {
                let bytes = suffix.as_bytes();
                if bytes.len() == 1 && bytes[0].is_ascii_uppercase() {
                    Some(Self((bytes[0] - b'A') as u16))
                } else {
                    suffix.parse::<u16>().ok().map(Self)
                }
            }),
        };

        socket.ok_or_else(|| PipelineError::UnknownConfigurationValue {
            kind: "sensor socket",
            value: s.to_string(),
        })
    }
}

impl TryFrom<String> for SensorSocket {
    type Error = PipelineError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<SensorSocket> for String {
    fn from(socket: SensorSocket) -> Self {
        socket.to_string()
    }
}

/// Sensor output resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorResolution {
    P400,
    P480,
    P720,
    P800,
    P1080,
    P1200,
    Uhd4K,
    Mp5,
    Mp12,
    Mp13,
    R4000x3000,
    R5312x6000,
    Mp48,
    R1440x1080,
}

pub static RESOLUTION_NAMES: NameTable<SensorResolution> = NameTable::new(
    "sensor resolution",
    &[
        ("400P", SensorResolution::P400),
        ("480P", SensorResolution::P480),
        ("720P", SensorResolution::P720),
        ("800P", SensorResolution::P800),
        ("1080P", SensorResolution::P1080),
        ("1200P", SensorResolution::P1200),
        ("4K", SensorResolution::Uhd4K),
        ("5MP", SensorResolution::Mp5),
        ("12MP", SensorResolution::Mp12),
        ("13MP", SensorResolution::Mp13),
        ("4000X3000", SensorResolution::R4000x3000),
        ("5312X6000", SensorResolution::R5312x6000),
        ("48MP", SensorResolution::Mp48),
        ("1440X1080", SensorResolution::R1440x1080),
    ],
);

impl SensorResolution {
    /// Pixel size as (width, height)
    pub fn size(self) -> (u32, u32) {
        match self {
            SensorResolution::P400 => (640, 400),
            SensorResolution::P480 => (640, 480),
            SensorResolution::P720 => (1280, 720),
            SensorResolution::P800 => (1280, 800),
            SensorResolution::P1080 => (1920, 1080),
            SensorResolution::P1200 => (1920, 1200),
            SensorResolution::Uhd4K => (3840, 2160),
            SensorResolution::Mp5 => (2592, 1944),
            SensorResolution::Mp12 => (4056, 3040),
            SensorResolution::Mp13 => (4208, 3120),
            SensorResolution::R4000x3000 => (4000, 3000),
            SensorResolution::R5312x6000 => (5312, 6000),
            SensorResolution::Mp48 => (8000, 6000),
            SensorResolution::R1440x1080 => (1440, 1080),
        }
    }
}

impl FromStr for SensorResolution {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        RESOLUTION_NAMES.resolve(s)
    }
}

impl fmt::Display for SensorResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", RESOLUTION_NAMES.key_of(*self).unwrap_or("UNKNOWN"))
    }
}

/// A supported image sensor model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSensor {
    pub model: &'static str,
    /// Supported resolutions, default first
    pub resolutions: &'static [SensorResolution],
    pub color: bool,
}

impl ImageSensor {
    pub fn default_resolution(&self) -> SensorResolution {
        self.resolutions[0]
    }

    pub fn supports(&self, resolution: SensorResolution) -> bool {
        self.resolutions.contains(&resolution)
    }
}

use SensorResolution::*;

const MONO_OV: &[SensorResolution] = &[P800, P720, P400];
const VGA: &[SensorResolution] = &[P480, P400];

pub static SENSOR_CATALOG: &[ImageSensor] = &[
    ImageSensor { model: "IMX378", resolutions: &[Mp12, Uhd4K], color: true },
    ImageSensor { model: "OV9282", resolutions: MONO_OV, color: false },
    ImageSensor { model: "OV9782", resolutions: MONO_OV, color: true },
    ImageSensor { model: "OV9281", resolutions: MONO_OV, color: true },
    ImageSensor { model: "IMX214", resolutions: &[Mp13, Mp12, Uhd4K, P1080], color: true },
    ImageSensor { model: "IMX412", resolutions: &[Mp13, Mp12, Uhd4K, P1080, P720], color: true },
    ImageSensor { model: "OV7750", resolutions: VGA, color: false },
    ImageSensor { model: "OV7251", resolutions: VGA, color: false },
    ImageSensor { model: "IMX477", resolutions: &[Mp12, Uhd4K, P1080], color: true },
    ImageSensor { model: "IMX577", resolutions: &[Mp12, Uhd4K, P1080], color: true },
    ImageSensor { model: "AR0234", resolutions: &[P1200], color: true },
    ImageSensor { model: "IMX582", resolutions: &[Mp48, Mp12, Uhd4K], color: true },
    ImageSensor { model: "LCM48", resolutions: &[Mp48, Mp12, Uhd4K], color: true },
];

/// Find a sensor model in the catalog (case-insensitive)
pub fn lookup_sensor(model: &str) -> Option<&'static ImageSensor> {
    SENSOR_CATALOG
        .iter()
        .find(|s| s.model.eq_ignore_ascii_case(model))
}

/// One enumerated sensor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorInfo {
    pub socket: SensorSocket,
    /// Sensor model name as reported by the device (e.g. "IMX378")
    pub model: String,
}

impl SensorInfo {
    pub fn new(socket: SensorSocket, model: impl Into<String>) -> Self {
        Self {
            socket,
            model: model.into(),
        }
    }

    /// Catalog entry for this sensor's model
    pub fn catalog_entry(&self) -> Result<&'static ImageSensor> {
        lookup_sensor(&self.model).ok_or_else(|| PipelineError::UnsupportedSensor {
            model: self.model.clone(),
            socket: self.socket,
        })
    }
}

/// Sensors available on the device, in enumeration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorInventory {
    sensors: Vec<SensorInfo>,
}

impl SensorInventory {
    pub fn new(sensors: Vec<SensorInfo>) -> Self {
        Self { sensors }
    }

    pub fn sensor_count(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    /// Look up the sensor bound to `socket`
    pub fn find(&self, socket: SensorSocket) -> Option<&SensorInfo> {
        self.sensors.iter().find(|s| s.socket == socket)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SensorInfo> {
        self.sensors.iter()
    }
}

impl FromIterator<SensorInfo> for SensorInventory {
    fn from_iter<I: IntoIterator<Item = SensorInfo>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_names() {
        assert_eq!(SensorSocket::CAM_A.to_string(), "CAM_A");
        assert_eq!(SensorSocket::CAM_E.to_string(), "CAM_E");
        assert_eq!(SensorSocket(30).to_string(), "CAM_30");
        assert_eq!("cam_c".parse::<SensorSocket>().unwrap(), SensorSocket::CAM_C);
        assert_eq!("rgb".parse::<SensorSocket>().unwrap(), SensorSocket::CAM_A);
        assert_eq!("Left".parse::<SensorSocket>().unwrap(), SensorSocket::CAM_B);
        assert_eq!("RIGHT".parse::<SensorSocket>().unwrap(), SensorSocket::CAM_C);
        assert_eq!("CAM_30".parse::<SensorSocket>().unwrap(), SensorSocket(30));
        assert!("CAM_".parse::<SensorSocket>().is_err());
        assert!("front".parse::<SensorSocket>().is_err());
    }

    #[test]
    fn test_resolution_sizes() {
        assert_eq!(SensorResolution::P800.size(), (1280, 800));
        assert_eq!(SensorResolution::Mp12.size(), (4056, 3040));
        assert_eq!("4k".parse::<SensorResolution>().unwrap(), SensorResolution::Uhd4K);
        assert_eq!(
            "1440x1080".parse::<SensorResolution>().unwrap(),
            SensorResolution::R1440x1080
        );
        assert!("8k".parse::<SensorResolution>().is_err());
    }

    #[test]
    fn test_sensor_catalog() {
        let imx = lookup_sensor("imx378").unwrap();
        assert!(imx.color);
        assert_eq!(imx.default_resolution(), SensorResolution::Mp12);
        assert!(imx.supports(SensorResolution::Uhd4K));
        assert!(!imx.supports(SensorResolution::P720));

        let mono = lookup_sensor("OV9282").unwrap();
        assert!(!mono.color);
        assert_eq!(mono.default_resolution().size(), (1280, 800));

        assert!(lookup_sensor("IMX999").is_none());
    }

    #[test]
    fn test_inventory_lookup() {
        let inventory: SensorInventory = [
            SensorInfo::new(SensorSocket::CAM_A, "IMX378"),
            SensorInfo::new(SensorSocket::CAM_B, "OV9282"),
        ]
        .into_iter()
        .collect();

        assert_eq!(inventory.sensor_count(), 2);
        assert_eq!(inventory.find(SensorSocket::LEFT).unwrap().model, "OV9282");
        assert!(inventory.find(SensorSocket::RIGHT).is_none());

        let bad = SensorInfo::new(SensorSocket::CAM_D, "XYZ1");
        assert_eq!(
            bad.catalog_entry().unwrap_err(),
            PipelineError::UnsupportedSensor {
                model: "XYZ1".to_string(),
                socket: SensorSocket::CAM_D,
            }
        );
    }

    #[test]
    fn test_socket_serde_as_string() {
        let info = SensorInfo::new(SensorSocket::CAM_B, "OV9282");
        let json = serde_json::to_string(&info).unwrap();
        assert_eq!(json, r#"{"socket":"CAM_B","model":"OV9282"}"#);
        let back: SensorInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(back, info);
    }
}

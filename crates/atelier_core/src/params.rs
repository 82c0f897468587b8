//! Kind-specific transformation parameters with documented defaults.

use crate::TransformKind;
use serde::{Deserialize, Serialize};

/// Upscale factor for HD enhancement. Default: 4x.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Default,
    derive_more::Display,
)]
pub enum ScaleFactor {
    /// 2x upscale
    #[serde(rename = "2")]
    #[display("2")]
    X2,
    /// 4x upscale
    #[default]
    #[serde(rename = "4")]
    #[display("4")]
    X4,
}

impl ScaleFactor {
    /// Numeric factor for provider payloads.
    pub fn factor(&self) -> u32 {
        match self {
            ScaleFactor::X2 => 2,
            ScaleFactor::X4 => 4,
        }
    }
}

/// GFPGAN restoration model version. Default: v1.3.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Default,
    derive_more::Display,
)]
pub enum RestoreVersion {
    /// v1.3, balanced quality (default)
    #[default]
    #[serde(rename = "v1.3")]
    #[display("v1.3")]
    V1_3,
    /// v1.4, more detail, can over-sharpen
    #[serde(rename = "v1.4")]
    #[display("v1.4")]
    V1_4,
}

/// Cartoon stylization preset. Default: cartoon.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Default,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CartoonStyle {
    /// General cartoon look (default)
    #[default]
    Cartoon,
    /// Comic-book look
    Comic,
    /// Arcane-series look
    Arcane,
}

/// Animal character for the animal-toon transformation. Default: bunny.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Default,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AnimalType {
    /// Cute cartoon bunny (default)
    #[default]
    Bunny,
    /// Cartoon cat
    Cat,
    /// Cartoon fox
    Fox,
    /// Cartoon dog
    Dog,
    /// Cartoon bear
    Bear,
}

/// Artistic style for style transfer. Default: mosaic.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Default,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ArtStyleName {
    /// Mosaic tiling (default)
    #[default]
    Mosaic,
    /// Oil painting
    Oil,
    /// Watercolor
    Watercolor,
}

/// Muscle enhancement intensity. Default: moderate.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Default,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MuscleIntensity {
    /// Slightly more defined, natural athletic look
    Light,
    /// Defined muscles, athletic body (default)
    #[default]
    Moderate,
    /// Bodybuilder physique
    Strong,
}

/// Kind-specific scalar parameters.
///
/// Every parameter carries a documented default, applied when the caller
/// omits it.
///
/// # Examples
///
/// ```
/// use atelier_core::{ScaleFactor, TransformKind, TransformParams};
///
/// let params = TransformParams::default_for(TransformKind::Upscale);
/// assert_eq!(params, TransformParams::Upscale { scale: ScaleFactor::X4 });
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransformParams {
    /// Face swap: media kind of the target (source is always an image)
    FaceSwap {
        /// Whether the target is an image or a video
        target: crate::MediaKind,
    },
    /// Template video swap: no scalar parameters
    VideoSwap,
    /// HD upscale
    Upscale {
        /// Upscale factor
        scale: ScaleFactor,
    },
    /// Photo restoration
    Restore {
        /// Model version
        version: RestoreVersion,
    },
    /// Cartoon stylization
    Cartoonify {
        /// Style preset
        style: CartoonStyle,
        /// Style strength in `[0.0, 1.0]`
        degree: f32,
    },
    /// Animal cartoon character
    AnimalToon {
        /// Animal to render
        animal: AnimalType,
    },
    /// Artistic style transfer
    ArtStyle {
        /// Style to apply
        style: ArtStyleName,
    },
    /// Memoji avatar: no scalar parameters
    Memoji,
    /// Muscle enhancement
    Muscle {
        /// Enhancement intensity
        intensity: MuscleIntensity,
    },
}

impl TransformParams {
    /// Default parameters for a transformation kind.
    pub fn default_for(kind: TransformKind) -> Self {
        match kind {
            TransformKind::FaceSwap => TransformParams::FaceSwap {
                target: crate::MediaKind::Image,
            },
            TransformKind::VideoSwap => TransformParams::VideoSwap,
            TransformKind::Upscale => TransformParams::Upscale {
                scale: ScaleFactor::default(),
            },
            TransformKind::Restore => TransformParams::Restore {
                version: RestoreVersion::default(),
            },
            TransformKind::Cartoonify => TransformParams::Cartoonify {
                style: CartoonStyle::default(),
                degree: 0.5,
            },
            TransformKind::AnimalToon => TransformParams::AnimalToon {
                animal: AnimalType::default(),
            },
            TransformKind::ArtStyle => TransformParams::ArtStyle {
                style: ArtStyleName::default(),
            },
            TransformKind::Memoji => TransformParams::Memoji,
            TransformKind::Muscle => TransformParams::Muscle {
                intensity: MuscleIntensity::default(),
            },
        }
    }

    /// The kind these parameters belong to.
    pub fn kind(&self) -> TransformKind {
        match self {
            TransformParams::FaceSwap { .. } => TransformKind::FaceSwap,
            TransformParams::VideoSwap => TransformKind::VideoSwap,
            TransformParams::Upscale { .. } => TransformKind::Upscale,
            TransformParams::Restore { .. } => TransformKind::Restore,
            TransformParams::Cartoonify { .. } => TransformKind::Cartoonify,
            TransformParams::AnimalToon { .. } => TransformKind::AnimalToon,
            TransformParams::ArtStyle { .. } => TransformKind::ArtStyle,
            TransformParams::Memoji => TransformKind::Memoji,
            TransformParams::Muscle { .. } => TransformKind::Muscle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn defaults_cover_every_kind() {
        for kind in TransformKind::iter() {
            let params = TransformParams::default_for(kind);
            assert_eq!(params.kind(), kind);
        }
    }

    #[test]
    fn documented_defaults() {
        assert_eq!(ScaleFactor::default().factor(), 4);
        assert_eq!(format!("{}", RestoreVersion::default()), "v1.3");
        assert_eq!(AnimalType::default(), AnimalType::Bunny);
        assert_eq!(MuscleIntensity::default(), MuscleIntensity::Moderate);
        match TransformParams::default_for(TransformKind::Cartoonify) {
            TransformParams::Cartoonify { style, degree } => {
                assert_eq!(style, CartoonStyle::Cartoon);
                assert!((degree - 0.5).abs() < f32::EPSILON);
            }
            other => panic!("unexpected params: {other:?}"),
        }
    }
}

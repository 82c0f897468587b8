//! Transformation kinds.

use serde::{Deserialize, Serialize};

/// The transformations the gateway can route.
///
/// Each kind owns an ordered provider list, configured once at startup from
/// available credentials.
///
/// # Examples
///
/// ```
/// use atelier_core::TransformKind;
/// use std::str::FromStr;
///
/// assert_eq!(format!("{}", TransformKind::FaceSwap), "face_swap");
/// assert_eq!(TransformKind::from_str("upscale").unwrap(), TransformKind::Upscale);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TransformKind {
    /// Swap a source face onto a target image or video
    FaceSwap,
    /// Swap a user's face into a template video
    VideoSwap,
    /// HD upscaling (2x or 4x)
    Upscale,
    /// Old-photo restoration
    Restore,
    /// Cartoon stylization
    Cartoonify,
    /// Animal cartoon character rendering
    AnimalToon,
    /// Artistic style transfer
    ArtStyle,
    /// 3D memoji-style avatar rendering
    Memoji,
    /// Body muscle enhancement
    Muscle,
}

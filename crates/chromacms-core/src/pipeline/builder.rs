//! Pipeline construction from a profile pair
//!
//! Each side contributes its half of the chain: the source maps device
//! values to D50-relative XYZ, the destination maps XYZ back to device
//! values. LUT profiles contribute their decoded element chains plus a
//! PCS decode/encode step; matrix-shaper profiles contribute TRC
//! curves and a colorant matrix; gray profiles contribute their kTRC
//! and a luminance bridge along the white axis.

use crate::error::BuildError;
use crate::icc::header::{ColorSpace, RenderingIntent};
use crate::icc::profile::Profile;
use crate::icc::tags::{Lut, LutElement};
use crate::icc::types::TagSignature;
use crate::math::chromatic_adaptation::adaptation_matrix;
use crate::math::Matrix3x3;
use crate::pipeline::{Pipeline, Stage};

/// 16-bit PCS XYZ encoding: the wire value 1.0 means XYZ 32768/65535
const XYZ_ENCODE_SCALE: f64 = 32768.0 / 65535.0;

fn space_name(space: ColorSpace) -> &'static str {
    match space {
        ColorSpace::Xyz => "XYZ",
        ColorSpace::Lab => "Lab",
        ColorSpace::Rgb => "RGB",
        ColorSpace::Gray => "Gray",
        ColorSpace::Cmyk => "CMYK",
        ColorSpace::Cmy => "CMY",
    }
}

fn lut_stages(lut: &Lut) -> Vec<Stage> {
    lut.elements
        .iter()
        .map(|element| match element {
            LutElement::Curves(curves) => Stage::curves(curves.clone()),
            LutElement::Matrix { matrix, offset } => Stage::Matrix {
                matrix: *matrix,
                offset: *offset,
            },
            LutElement::Clut(clut) => Stage::Clut(clut.clone()),
        })
        .collect()
}

/// Stages mapping source device values to D50-relative XYZ
fn device_to_pcs(profile: &Profile, intent: RenderingIntent) -> Result<Vec<Stage>, BuildError> {
    if let Some(lut) = profile.a2b_for_intent(intent) {
        let mut stages = lut_stages(lut);
        match profile.pcs() {
            ColorSpace::Lab => stages.push(Stage::LabToXyz),
            _ => stages.push(Stage::matrix(Matrix3x3::diagonal(
                1.0 / XYZ_ENCODE_SCALE,
                1.0 / XYZ_ENCODE_SCALE,
                1.0 / XYZ_ENCODE_SCALE,
            ))),
        }
        return Ok(stages);
    }

    match profile.color_space() {
        ColorSpace::Rgb => {
            let trc = profile.rgb_trc().ok_or(BuildError::MissingTransform {
                side: "source",
                tag: TagSignature::RED_TRC,
            })?;
            let colorants =
                profile
                    .colorant_matrix()
                    .ok_or(BuildError::MissingTransform {
                        side: "source",
                        tag: TagSignature::RED_COLORANT,
                    })?;
            Ok(vec![
                Stage::curves(trc.map(Clone::clone).to_vec()),
                Stage::matrix(colorants),
            ])
        }
        ColorSpace::Gray => {
            let trc = profile
                .curve(TagSignature::GRAY_TRC)
                .ok_or(BuildError::MissingTransform {
                    side: "source",
                    tag: TagSignature::GRAY_TRC,
                })?;
            Ok(vec![Stage::curves(vec![trc.clone()]), Stage::GrayToXyz])
        }
        other => Err(BuildError::UnsupportedColorSpace {
            side: "source",
            space: space_name(other),
        }),
    }
}

/// Stages mapping D50-relative XYZ to destination device values
fn pcs_to_device(profile: &Profile, intent: RenderingIntent) -> Result<Vec<Stage>, BuildError> {
    if let Some(lut) = profile.b2a_for_intent(intent) {
        let mut stages = Vec::new();
        match profile.pcs() {
            ColorSpace::Lab => stages.push(Stage::XyzToLab),
            _ => stages.push(Stage::matrix(Matrix3x3::diagonal(
                XYZ_ENCODE_SCALE,
                XYZ_ENCODE_SCALE,
                XYZ_ENCODE_SCALE,
            ))),
        }
        stages.extend(lut_stages(lut));
        return Ok(stages);
    }

    match profile.color_space() {
        ColorSpace::Rgb => {
            let trc = profile.rgb_trc().ok_or(BuildError::MissingTransform {
                side: "destination",
                tag: TagSignature::RED_TRC,
            })?;
            let colorants =
                profile
                    .colorant_matrix()
                    .ok_or(BuildError::MissingTransform {
                        side: "destination",
                        tag: TagSignature::RED_COLORANT,
                    })?;
            let inverse = colorants
                .inverse()
                .ok_or(BuildError::SingularMatrix {
                    side: "destination",
                })?;
            Ok(vec![
                Stage::matrix(inverse),
                Stage::inverse_curves(trc.map(Clone::clone).to_vec()),
            ])
        }
        ColorSpace::Gray => {
            let trc = profile
                .curve(TagSignature::GRAY_TRC)
                .ok_or(BuildError::MissingTransform {
                    side: "destination",
                    tag: TagSignature::GRAY_TRC,
                })?;
            Ok(vec![Stage::XyzToGray, Stage::inverse_curves(vec![trc.clone()])])
        }
        other => Err(BuildError::UnsupportedColorSpace {
            side: "destination",
            space: space_name(other),
        }),
    }
}

/// Compose the full device → device pipeline for an intent
///
/// Relative colorimetric connects directly: both halves already speak
/// media-relative D50 XYZ. Absolute colorimetric inserts a Bradford
/// adaptation between the two media white points.
pub fn build_pipeline(
    src: &Profile,
    dst: &Profile,
    intent: RenderingIntent,
) -> Result<Pipeline, BuildError> {
    let mut stages = device_to_pcs(src, intent)?;

    if intent == RenderingIntent::AbsoluteColorimetric {
        let adapt = adaptation_matrix(&src.white_point(), &dst.white_point());
        if !adapt.is_identity(1e-9) {
            stages.push(Stage::matrix(adapt));
        }
    }

    stages.extend(pcs_to_device(dst, intent)?);
    Pipeline::new(stages)
}

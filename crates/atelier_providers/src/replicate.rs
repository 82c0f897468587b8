//! Replicate prediction client covering every transformation kind.

use crate::render;
use async_trait::async_trait;
use atelier_core::{
    AnimalType, ArtStyleName, CartoonStyle, MediaReference, MuscleIntensity, ProviderOutcome,
    ProviderSuccess, TransformKind, TransformParams, TransformRequest,
};
use atelier_error::{AtelierResult, ProviderError, ProviderErrorKind};
use atelier_interface::{InvocationMode, TransformDriver};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, instrument, warn};

const API_BASE: &str = "https://api.replicate.com/v1";

/// One Replicate model in a kind's fallback cascade.
#[derive(Debug, Clone, Copy)]
pub struct ReplicateModel {
    /// Model identifier, `owner/name`
    pub id: &'static str,
    /// Pinned version hash; unpinned models run their latest version
    pub version: Option<&'static str>,
    /// Wall-clock budget for this model's blocking call
    pub timeout: Duration,
}

/// Replicate driver. One instance serves one transformation kind, holding
/// an ordered cascade of models tried until one succeeds.
///
/// Uses the synchronous `Prefer: wait` protocol: the prediction POST blocks
/// until the model finishes or the HTTP-level hold expires.
#[derive(Debug, Clone)]
pub struct ReplicateProvider {
    client: Client,
    api_token: String,
    kind: TransformKind,
    models: Vec<ReplicateModel>,
}

fn models_for(kind: TransformKind) -> Vec<ReplicateModel> {
    match kind {
        TransformKind::FaceSwap => vec![
            ReplicateModel {
                id: "easel/advanced-face-swap",
                version: None,
                timeout: Duration::from_secs(90),
            },
            ReplicateModel {
                id: "cdingram/face-swap",
                version: Some("d1d6ea8c8be89d664a07a457526f7128109dee7030fdac424788d762c71ed111"),
                timeout: Duration::from_secs(60),
            },
        ],
        TransformKind::VideoSwap => vec![ReplicateModel {
            id: "arabyai-replicate/roop_face_swap",
            version: Some("11b6bf0f4e14d808f655e87e5448233cceff10a45f659d71539cafb7163b2e84"),
            timeout: Duration::from_secs(90),
        }],
        TransformKind::Upscale => vec![ReplicateModel {
            id: "nightmareai/real-esrgan",
            version: Some("42fed1c4974146d4d2414e2be2c5277c7fcf05fcc3a73abf41610695738c1d7b"),
            timeout: Duration::from_secs(60),
        }],
        TransformKind::Restore => vec![ReplicateModel {
            id: "tencentarc/gfpgan",
            version: Some("0fbacf7afc6c144e5be9767cff80f25aff23e52b0708f17e20f9879b2f21516c"),
            timeout: Duration::from_secs(60),
        }],
        TransformKind::Cartoonify => vec![ReplicateModel {
            id: "412392713/vtoonify",
            version: Some("54daf6387dc7c4d41ed5238e28e06277a6ee9027af5cd16486b7e0c261ba2522"),
            timeout: Duration::from_secs(60),
        }],
        TransformKind::AnimalToon => vec![
            ReplicateModel {
                id: "tencentarc/photomaker",
                version: Some("ddfc2b08d209f9fa8c1eca692712918bd449f695dabb4a958da31802a9570fe4"),
                timeout: Duration::from_secs(75),
            },
            ReplicateModel {
                id: "zsxkib/instant-id",
                version: Some("c45c1a7c84b47c9e7a1107f1c978d265dfb126cdddc3246c87077c2c57e07e2b"),
                timeout: Duration::from_secs(75),
            },
        ],
        TransformKind::ArtStyle => vec![ReplicateModel {
            id: "nkolkin13/neuralneighborstyletransfer",
            version: Some("7c7a8f9f69ff8e2f85c062aa97f3f3a839a5e06ca4f8a8c66eb7207c1673b54e"),
            timeout: Duration::from_secs(90),
        }],
        TransformKind::Memoji => vec![ReplicateModel {
            id: "tencentarc/photomaker-style",
            version: Some("467d062309da518648ba89d226490e02b8ed09b5abc15026e54e31c5a8cd0769"),
            timeout: Duration::from_secs(75),
        }],
        TransformKind::Muscle => vec![ReplicateModel {
            id: "timothybrooks/instruct-pix2pix",
            version: Some("30c1d0b916a6f8efce20493f5d61ee27491ab2a60437c13c588468b9810ec23f"),
            timeout: Duration::from_secs(60),
        }],
    }
}

fn style_image_url(style: ArtStyleName) -> &'static str {
    match style {
        ArtStyleName::Mosaic => {
            "https://upload.wikimedia.org/wikipedia/commons/9/9d/Mosaic_fountain_detail.jpg"
        }
        ArtStyleName::Oil => {
            "https://upload.wikimedia.org/wikipedia/commons/e/ea/Van_Gogh_-_Starry_Night.jpg"
        }
        ArtStyleName::Watercolor => {
            "https://upload.wikimedia.org/wikipedia/commons/a/a6/Watercolour_landscape.jpg"
        }
    }
}

fn vtoonify_style(style: CartoonStyle) -> &'static str {
    match style {
        CartoonStyle::Cartoon => "cartoon1",
        CartoonStyle::Comic => "comic1-d",
        CartoonStyle::Arcane => "arcane1",
    }
}

fn animal_prompt(animal: AnimalType) -> String {
    format!(
        "a cute cartoon {animal} img, 3d animated style, big expressive eyes, \
         soft studio lighting, high quality render"
    )
}

fn muscle_prompt(intensity: MuscleIntensity) -> &'static str {
    match intensity {
        MuscleIntensity::Light => "make the person slightly more muscular with a natural athletic build",
        MuscleIntensity::Moderate => "make the person muscular with well-defined muscles and an athletic body",
        MuscleIntensity::Strong => "make the person extremely muscular with a bodybuilder physique",
    }
}

fn secondary_source<'a>(request: &'a TransformRequest) -> AtelierResult<&'a MediaReference> {
    request.secondary.as_ref().ok_or_else(|| {
        ProviderError::new(ProviderErrorKind::Unsupported(
            "face swap requires a secondary source image".to_string(),
        ))
        .into()
    })
}

/// Model-specific input payload for one request.
fn build_input(model_id: &str, request: &TransformRequest) -> AtelierResult<Value> {
    let primary = render(&request.primary);
    let input = match (model_id, request.params_or_default()) {
        ("easel/advanced-face-swap", TransformParams::FaceSwap { .. }) => json!({
            "target_image": primary,
            "swap_image": render(secondary_source(request)?),
            "hair_source": "target",
        }),
        ("cdingram/face-swap", TransformParams::FaceSwap { .. }) => json!({
            "input_image": primary,
            "swap_image": render(secondary_source(request)?),
        }),
        // Template swap: primary is the template video, secondary the face
        ("arabyai-replicate/roop_face_swap", TransformParams::VideoSwap) => json!({
            "swap_image": render(secondary_source(request)?),
            "target_video": primary,
        }),
        ("nightmareai/real-esrgan", TransformParams::Upscale { scale }) => json!({
            "image": primary,
            "scale": scale.factor(),
            "face_enhance": false,
        }),
        ("tencentarc/gfpgan", TransformParams::Restore { version }) => json!({
            "img": primary,
            "version": version.to_string(),
            "scale": 2,
        }),
        ("412392713/vtoonify", TransformParams::Cartoonify { style, degree }) => json!({
            "image": primary,
            "style": vtoonify_style(style),
            "style_degree": degree,
            "padding": 200,
        }),
        ("tencentarc/photomaker", TransformParams::AnimalToon { animal }) => json!({
            "input_image": primary,
            "prompt": animal_prompt(animal),
            "style_name": "Digital Art",
            "negative_prompt": "realistic, photo, deformed, ugly, blurry",
            "style_strength_ratio": 35,
        }),
        ("zsxkib/instant-id", TransformParams::AnimalToon { animal }) => json!({
            "image": primary,
            "prompt": animal_prompt(animal),
        }),
        ("nkolkin13/neuralneighborstyletransfer", TransformParams::ArtStyle { style }) => json!({
            "image": primary,
            "style_image": style_image_url(style),
        }),
        ("tencentarc/photomaker-style", TransformParams::Memoji) => json!({
            "input_image": primary,
            "prompt": "a person img as a 3D memoji avatar, apple memoji style, \
                       smooth skin, friendly expression, plain background",
            "negative_prompt": "realistic, photo, deformed, ugly, blurry",
            "style_strength_ratio": 30,
        }),
        ("timothybrooks/instruct-pix2pix", TransformParams::Muscle { intensity }) => json!({
            "image": primary,
            "prompt": muscle_prompt(intensity),
        }),
        (id, params) => {
            return Err(ProviderError::new(ProviderErrorKind::Unsupported(format!(
                "model {id} has no input mapping for {} parameters",
                params.kind(),
            ))))?;
        }
    };
    Ok(input)
}

#[derive(Debug, Deserialize)]
struct Prediction {
    status: String,
    #[serde(default)]
    output: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

/// First output URL in a prediction's `output` field, which is either a
/// bare string or an array of strings depending on the model.
fn extract_output(output: Option<&Value>) -> Option<String> {
    match output? {
        Value::String(url) => Some(url.clone()),
        Value::Array(items) => items.iter().find_map(|item| match item {
            Value::String(url) => Some(url.clone()),
            _ => None,
        }),
        _ => None,
    }
}

impl ReplicateProvider {
    /// Create a driver for one transformation kind.
    pub fn new(api_token: impl Into<String>, kind: TransformKind) -> Self {
        Self {
            client: Client::new(),
            api_token: api_token.into(),
            kind,
            models: models_for(kind),
        }
    }

    /// The ordered model cascade this driver runs.
    pub fn models(&self) -> &[ReplicateModel] {
        &self.models
    }

    #[instrument(skip(self, input), fields(model = model.id))]
    async fn predict(&self, model: &ReplicateModel, input: &Value) -> AtelierResult<String> {
        let (url, body) = match model.version {
            Some(version) => (
                format!("{API_BASE}/predictions"),
                json!({ "version": version, "input": input }),
            ),
            None => (
                format!("{API_BASE}/models/{}/predictions", model.id),
                json!({ "input": input }),
            ),
        };
        debug!(url = %url, "Sending prediction request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .header("Prefer", "wait")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                ProviderError::new(ProviderErrorKind::Transport(format!("Request failed: {e}")))
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::new(ProviderErrorKind::Remote {
                status: Some(status),
                message,
            }))?;
        }

        let prediction: Prediction = response.json().await.map_err(|e| {
            ProviderError::new(ProviderErrorKind::Parse(format!(
                "Failed to parse prediction: {e}"
            )))
        })?;

        if prediction.status != "succeeded" {
            let message = prediction
                .error
                .map(|e| e.to_string())
                .unwrap_or_else(|| format!("prediction ended with status {}", prediction.status));
            return Err(ProviderError::new(ProviderErrorKind::Remote {
                status: None,
                message,
            }))?;
        }

        extract_output(prediction.output.as_ref())
            .ok_or_else(|| ProviderError::new(ProviderErrorKind::EmptyOutput).into())
    }
}

#[async_trait]
impl TransformDriver for ReplicateProvider {
    #[instrument(skip(self, request), fields(kind = %request.kind))]
    async fn invoke(&self, request: &TransformRequest) -> AtelierResult<ProviderOutcome> {
        if request.kind != self.kind {
            return Err(ProviderError::new(ProviderErrorKind::Unsupported(format!(
                "driver is configured for {}, not {}",
                self.kind, request.kind
            ))))?;
        }

        let mut last_error = None;
        for model in &self.models {
            let input = build_input(model.id, request)?;
            let attempt = tokio::time::timeout(model.timeout, self.predict(model, &input)).await;
            match attempt {
                Ok(Ok(output_url)) => {
                    return Ok(ProviderOutcome::Resolved(ProviderSuccess {
                        media: MediaReference::Url(output_url),
                        provider: self.name().to_string(),
                        attribution: Some(model.id.to_string()),
                    }));
                }
                Ok(Err(error)) => {
                    warn!(model = model.id, %error, "Model failed, trying next in cascade");
                    last_error = Some(error);
                }
                Err(_) => {
                    warn!(model = model.id, "Model timed out, trying next in cascade");
                    last_error = Some(
                        ProviderError::new(ProviderErrorKind::Timeout {
                            elapsed_secs: model.timeout.as_secs(),
                            job_id: None,
                        })
                        .into(),
                    );
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| ProviderError::new(ProviderErrorKind::EmptyOutput).into()))
    }

    fn name(&self) -> &str {
        "Replicate"
    }

    fn timeout(&self) -> Duration {
        self.models
            .iter()
            .map(|m| m.timeout)
            .max()
            .unwrap_or(Duration::from_secs(60))
    }

    fn mode(&self) -> InvocationMode {
        InvocationMode::SyncCall
    }

    fn supports(&self, kind: TransformKind) -> bool {
        kind == self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_core::{RestoreVersion, ScaleFactor};

    fn request(kind: TransformKind) -> TransformRequest {
        TransformRequest::builder()
            .kind(kind)
            .primary(MediaReference::Url(
                "https://cdn.example.com/in.png".to_string(),
            ))
            .build()
            .unwrap()
    }

    #[test]
    fn every_kind_has_a_cascade() {
        use strum::IntoEnumIterator;
        for kind in TransformKind::iter() {
            assert!(
                !models_for(kind).is_empty(),
                "no models registered for {kind}"
            );
        }
    }

    #[test]
    fn upscale_input_carries_numeric_scale() {
        let mut req = request(TransformKind::Upscale);
        req.params = Some(TransformParams::Upscale {
            scale: ScaleFactor::X2,
        });
        let input = build_input("nightmareai/real-esrgan", &req).unwrap();
        assert_eq!(input["image"], "https://cdn.example.com/in.png");
        assert_eq!(input["scale"], 2);
        assert_eq!(input["face_enhance"], false);
    }

    #[test]
    fn restore_input_uses_dotted_version_string() {
        let mut req = request(TransformKind::Restore);
        req.params = Some(TransformParams::Restore {
            version: RestoreVersion::V1_4,
        });
        let input = build_input("tencentarc/gfpgan", &req).unwrap();
        assert_eq!(input["img"], "https://cdn.example.com/in.png");
        assert_eq!(input["version"], "v1.4");
    }

    #[test]
    fn face_swap_without_source_is_unsupported() {
        let req = request(TransformKind::FaceSwap);
        let error = build_input("easel/advanced-face-swap", &req).unwrap_err();
        match error.kind() {
            atelier_error::AtelierErrorKind::Provider(e) => {
                assert!(matches!(e.kind, ProviderErrorKind::Unsupported(_)));
                assert!(!e.kind.is_retryable());
            }
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[test]
    fn face_swap_maps_target_and_source() {
        let mut req = request(TransformKind::FaceSwap);
        req.secondary = Some(MediaReference::Url(
            "https://cdn.example.com/face.png".to_string(),
        ));
        let input = build_input("easel/advanced-face-swap", &req).unwrap();
        assert_eq!(input["target_image"], "https://cdn.example.com/in.png");
        assert_eq!(input["swap_image"], "https://cdn.example.com/face.png");
        assert_eq!(input["hair_source"], "target");
    }

    #[test]
    fn video_swap_sends_template_as_target_video() {
        let mut req = TransformRequest::builder()
            .kind(TransformKind::VideoSwap)
            .primary(MediaReference::Url(
                "https://cdn.example.com/template.mp4".to_string(),
            ))
            .build()
            .unwrap();
        req.secondary = Some(MediaReference::Url(
            "https://cdn.example.com/face.png".to_string(),
        ));
        let input = build_input("arabyai-replicate/roop_face_swap", &req).unwrap();
        assert_eq!(input["target_video"], "https://cdn.example.com/template.mp4");
        assert_eq!(input["swap_image"], "https://cdn.example.com/face.png");
    }

    #[test]
    fn output_extraction_handles_string_and_array() {
        let single = serde_json::json!("https://replicate.delivery/out.png");
        assert_eq!(
            extract_output(Some(&single)).as_deref(),
            Some("https://replicate.delivery/out.png")
        );

        let array = serde_json::json!(["https://replicate.delivery/a.png", "ignored"]);
        assert_eq!(
            extract_output(Some(&array)).as_deref(),
            Some("https://replicate.delivery/a.png")
        );

        assert_eq!(extract_output(Some(&serde_json::json!({}))), None);
        assert_eq!(extract_output(None), None);
    }

    #[test]
    fn driver_timeout_is_the_slowest_model() {
        let provider = ReplicateProvider::new("tok", TransformKind::FaceSwap);
        assert_eq!(provider.timeout(), Duration::from_secs(90));
        assert_eq!(provider.mode(), InvocationMode::SyncCall);
        assert!(provider.supports(TransformKind::FaceSwap));
        assert!(!provider.supports(TransformKind::Upscale));
    }
}

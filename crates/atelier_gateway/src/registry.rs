//! Provider registry: which drivers serve which kind, in what order.

use crate::Credentials;
use atelier_core::TransformKind;
use atelier_interface::TransformDriver;
use atelier_providers::{HuggingFaceProvider, PiApiProvider, ReplicateProvider, VModelProvider};
use std::collections::HashMap;
use std::sync::Arc;
use strum::IntoEnumIterator;
use tracing::{debug, instrument};

/// Ordered provider chains, one per transformation kind.
///
/// Order is fixed at construction from which credentials are present; the
/// gateway walks each chain front to back and never reorders at runtime.
/// Specialists go first where one exists (PiAPI for face swap, VModel for
/// template video swap, HuggingFace for upscaling) with Replicate as the
/// generalist behind them.
#[derive(Default)]
pub struct ProviderRegistry {
    chains: HashMap<TransformKind, Vec<Arc<dyn TransformDriver>>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the chains from whichever credentials are present.
    #[instrument(skip(credentials))]
    pub fn from_credentials(credentials: &Credentials) -> Self {
        let mut registry = Self::new();

        if let Some(key) = &credentials.piapi {
            registry.register(TransformKind::FaceSwap, Arc::new(PiApiProvider::new(key)));
        }
        if let Some(token) = &credentials.vmodel {
            registry.register(TransformKind::VideoSwap, Arc::new(VModelProvider::new(token)));
        }
        if let Some(token) = &credentials.huggingface {
            registry.register(TransformKind::Upscale, Arc::new(HuggingFaceProvider::new(token)));
        }
        if let Some(token) = &credentials.replicate {
            for kind in TransformKind::iter() {
                registry.register(kind, Arc::new(ReplicateProvider::new(token.clone(), kind)));
            }
        }

        for (kind, chain) in &registry.chains {
            debug!(
                %kind,
                providers = ?chain.iter().map(|p| p.name().to_string()).collect::<Vec<_>>(),
                "Registered provider chain"
            );
        }
        registry
    }

    /// Append a driver to a kind's chain.
    pub fn register(&mut self, kind: TransformKind, driver: Arc<dyn TransformDriver>) {
        self.chains.entry(kind).or_default().push(driver);
    }

    /// The ordered chain for a kind; empty when nothing is configured.
    pub fn chain(&self, kind: TransformKind) -> &[Arc<dyn TransformDriver>] {
        self.chains.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Kinds that have at least one provider.
    pub fn configured_kinds(&self) -> Vec<TransformKind> {
        let mut kinds: Vec<TransformKind> = TransformKind::iter()
            .filter(|kind| !self.chain(*kind).is_empty())
            .collect();
        kinds.sort_by_key(|k| k.to_string());
        kinds
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (kind, chain) in &self.chains {
            map.entry(
                &kind.to_string(),
                &chain.iter().map(|p| p.name().to_string()).collect::<Vec<_>>(),
            );
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specialists_come_before_the_generalist() {
        let credentials = Credentials {
            replicate: Some("r".to_string()),
            piapi: Some("p".to_string()),
            vmodel: Some("v".to_string()),
            huggingface: Some("h".to_string()),
        };
        let registry = ProviderRegistry::from_credentials(&credentials);

        let face_swap: Vec<&str> = registry
            .chain(TransformKind::FaceSwap)
            .iter()
            .map(|p| p.name())
            .collect();
        assert_eq!(face_swap, ["PiAPI", "Replicate"]);

        let video_swap: Vec<&str> = registry
            .chain(TransformKind::VideoSwap)
            .iter()
            .map(|p| p.name())
            .collect();
        assert_eq!(video_swap, ["VModel", "Replicate"]);

        let upscale: Vec<&str> = registry
            .chain(TransformKind::Upscale)
            .iter()
            .map(|p| p.name())
            .collect();
        assert_eq!(upscale, ["HuggingFace", "Replicate"]);

        // Kinds with no specialist get Replicate alone
        let restore: Vec<&str> = registry
            .chain(TransformKind::Restore)
            .iter()
            .map(|p| p.name())
            .collect();
        assert_eq!(restore, ["Replicate"]);
    }

    #[test]
    fn missing_credentials_leave_kinds_unconfigured() {
        let credentials = Credentials {
            piapi: Some("p".to_string()),
            ..Credentials::default()
        };
        let registry = ProviderRegistry::from_credentials(&credentials);

        assert_eq!(registry.chain(TransformKind::FaceSwap).len(), 1);
        assert!(registry.chain(TransformKind::Upscale).is_empty());
        assert_eq!(registry.configured_kinds(), vec![TransformKind::FaceSwap]);
    }
}

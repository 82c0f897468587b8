//! Core data types for the Atelier media-transformation gateway.
//!
//! This crate provides the foundation data types used across the Atelier
//! workspace: media references, transformation requests, provider outcomes,
//! and async job bookkeeping.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod job;
mod kind;
mod media;
mod outcome;
mod params;
mod request;
mod response;
mod telemetry;

pub use job::{AsyncJob, JobStatus};
pub use kind::TransformKind;
pub use media::{MediaKind, MediaReference};
pub use outcome::{AcceptedJob, GatewayResult, ProviderOutcome, ProviderSuccess};
pub use params::{
    AnimalType, ArtStyleName, CartoonStyle, MuscleIntensity, RestoreVersion, ScaleFactor,
    TransformParams,
};
pub use request::{ResultPreference, TransformRequest, TransformRequestBuilder};
pub use response::TransformResponse;
pub use telemetry::init_telemetry;

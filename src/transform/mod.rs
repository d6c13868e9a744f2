//! The request transformation pipeline.
//!
//! This module owns the decision logic of the service:
//!
//! - [`params`] - query validation with exact user-visible messages
//! - [`dimensions`] - aspect-ratio-preserving target size resolution
//! - [`service`] - the orchestrator sequencing
//!   fetch → sniff → decode → resize → encode, with the passthrough
//!   short-circuits and per-stage failure mapping
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     TransformService<F, H>                   │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │                    transform()                         │  │
//! │  │  1. Fetch          4. Decode        7. Encode          │  │
//! │  │  2. Sniff          5. Resolve size                     │  │
//! │  │  3. Fast path      6. Resize                           │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │        │                  │                   │              │
//! │        ▼                  ▼                   ▼              │
//! │  ┌───────────┐      ┌────────────┐      ┌────────────┐      │
//! │  │ F: Fetch  │      │ CodecGate  │      │ H: Hash    │      │
//! │  │  Gateway  │      │    way     │      │  Gateway   │      │
//! │  └───────────┘      └────────────┘      └────────────┘      │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod dimensions;
pub mod params;
mod service;

pub use dimensions::{resolve, ResolvedDimensions};
pub use params::{RawMetaQuery, RawTransformQuery, TransformParams};
pub use service::{ImageMetadata, TransformOutput, TransformService, OCTET_STREAM};

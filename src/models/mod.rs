//! Data models for the media scanner.

mod media;
mod source;

pub use media::{MediaEnrichment, MediaRecord, SearchOrigin, SocialMedia, SourceCandidate};
pub use source::{KnownSource, NewSource, VerificationState};

//! Data models for IntoTheHeaven entities.
//!
//! This module contains the request and response shapes exchanged with the
//! backend REST API:
//!
//! - `User`: member profile
//! - `Church`, `JoinRequest`: churches and membership requests
//! - `Group`: small groups within a church
//! - `Gathering`, `GatheringDetail`, `GatheringMember`: weekly meetings with
//!   attendance, stories and prayer requests
//! - `MyPrayer`: the signed-in member's own prayer requests
//! - `Message`: direct messages between members
//! - Media uploads: presigned upload URLs and their completion records
//! - Auth payloads: `LoginRequest`, `LoginResponse`, `SignupRequest`

pub mod auth;
pub mod church;
pub mod gathering;
pub mod group;
pub mod media;
pub mod member;
pub mod message;
pub mod prayer;

pub use auth::{
    Availability, LoginRequest, LoginResponse, SignupRequest, SignupResponse, VerificationPurpose,
};
pub use church::{BirthdayMember, Church, JoinRequest, JoinStatus, PrayerRequestCount};
pub use gathering::{
    CreateGatheringRequest, Gathering, GatheringDetail, GatheringMember, GatheringMemberRecord,
    GatheringResponse, Media, Prayer, PrayerInput, UpdateGatheringMember, UpdateGatheringRequest,
};
pub use group::{Group, GroupType};
pub use media::{
    CompleteUploadRequest, CompleteUploadResponse, CompletedUpload, MediaEntityType, MediaType,
    PresignedUpload, PresignedUrlRequest, PresignedUrls, UploadedMedia,
};
pub use member::{BaptismStatus, Sex, UpdateMyInfo, User};
pub use message::{Message, SendMessage, UnreadCount};
pub use prayer::MyPrayer;

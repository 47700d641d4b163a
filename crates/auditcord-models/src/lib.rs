pub mod asset;
pub mod audit_log;
pub mod auto_moderation;
pub mod channel;
pub mod colour;
pub mod emoji;
pub mod enums;
pub mod guild;
pub mod invite;
pub mod member;
pub mod object;
pub mod permissions;
pub mod role;
pub mod stage_instance;
pub mod sticker;
pub mod user;

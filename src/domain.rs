//! Domain module - card catalog entities

pub mod card;

pub use card::{ArtsIcon, BatonSlot, CardColor, CardField, CardRecord, KeywordSubtype, Skill, SkillIcons};

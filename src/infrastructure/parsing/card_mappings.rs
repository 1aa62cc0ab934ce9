//! Label and icon mapping tables for the card list layout
//!
//! Plain immutable tables plus lookup functions. They are total and fixed for
//! the card list layout currently served by the site; unknown labels and
//! icons simply do not match.

use super::{ParsingError, ParsingResult};
use crate::domain::card::{ArtsIcon, CardColor, CardField, KeywordSubtype};

/// Transform from a definition's raw text to a normalized field
pub type FieldTransform = fn(&str) -> ParsingResult<CardField>;

/// How a row of the detail list is read
#[derive(Clone, Copy)]
pub enum DetailRule {
    /// Color taken from the embedded `type_*.png` icon
    ColorIcon,
    /// One slot per embedded `arts_*.png` icon, `no` when there is none
    BatonTouchIcons,
    /// Trimmed definition text through a field transform
    Text(FieldTransform),
}

/// Rows of the card `info` list
pub static INFO_FIELDS: &[(&str, FieldTransform)] = &[
    ("LIFE", life),
    ("カードタイプ", card_type),
    ("タグ", tags),
    ("レアリティ", rarity),
    ("収録商品", product),
    ("HP", hp),
    ("Bloomレベル", bloom_level),
];

/// Rows of the `info_Detail` list
pub static DETAIL_FIELDS: &[(&str, DetailRule)] = &[
    ("色", DetailRule::ColorIcon),
    ("HP", DetailRule::Text(hp)),
    ("LIFE", DetailRule::Text(life)),
    ("Bloomレベル", DetailRule::Text(bloom_level)),
    ("バトンタッチ", DetailRule::BatonTouchIcons),
];

/// Card color icon family
pub static COLOR_ICONS: &[(&str, CardColor)] = &[
    ("type_red.png", CardColor::Red),
    ("type_blue.png", CardColor::Blue),
    ("type_yellow.png", CardColor::Yellow),
    ("type_green.png", CardColor::Green),
    ("type_purple.png", CardColor::Purple),
    ("type_white.png", CardColor::White),
];

/// Arts cost icon family
pub static ARTS_ICONS: &[(&str, ArtsIcon)] = &[
    ("arts_null.png", ArtsIcon::Any),
    ("arts_red.png", ArtsIcon::Red),
    ("arts_blue.png", ArtsIcon::Blue),
    ("arts_yellow.png", ArtsIcon::Yellow),
    ("arts_green.png", ArtsIcon::Green),
    ("arts_purple.png", ArtsIcon::Purple),
    ("arts_white.png", ArtsIcon::White),
];

pub static KEYWORD_SUBTYPES: &[(&str, KeywordSubtype)] = &[
    ("bloomEF.png", KeywordSubtype::BloomEffect),
    ("collabEF.png", KeywordSubtype::CollabEffect),
    ("gift.png", KeywordSubtype::Gift),
];

/// Skill block labels as printed on the site
pub mod labels {
    pub const OSHI_SKILL: &str = "推しスキル";
    pub const SP_OSHI_SKILL: &str = "SP推しスキル";
    pub const ARTS: &str = "アーツ";
    pub const KEYWORD: &str = "キーワード";

    /// Marker inside `card_type` of support cards
    pub const SUPPORT_MARKER: &str = "サポート";
    /// Info row holding a support card's effect
    pub const ABILITY_TEXT: &str = "能力テキスト";
    /// Type of the skill synthesized from the ability text
    pub const SUPPORT_EFFECT: &str = "サポート効果";
}

pub fn info_field(label: &str) -> Option<FieldTransform> {
    lookup_exact(INFO_FIELDS, label)
}

pub fn detail_field(label: &str) -> Option<DetailRule> {
    lookup_exact(DETAIL_FIELDS, label)
}

/// Card color of an icon `src`, matched by filename fragment
pub fn color_icon(src: &str) -> Option<CardColor> {
    lookup_fragment(COLOR_ICONS, src)
}

pub fn arts_icon(src: &str) -> Option<ArtsIcon> {
    lookup_fragment(ARTS_ICONS, src)
}

pub fn keyword_subtype(src: &str) -> Option<KeywordSubtype> {
    lookup_fragment(KEYWORD_SUBTYPES, src)
}

fn lookup_exact<T: Copy>(table: &[(&str, T)], label: &str) -> Option<T> {
    table
        .iter()
        .find(|(key, _)| *key == label)
        .map(|(_, value)| *value)
}

fn lookup_fragment<T: Copy>(table: &[(&str, T)], src: &str) -> Option<T> {
    table
        .iter()
        .find(|(fragment, _)| src.contains(fragment))
        .map(|(_, value)| *value)
}

fn card_type(raw: &str) -> ParsingResult<CardField> {
    Ok(CardField::CardType(raw.trim().to_string()))
}

fn tags(raw: &str) -> ParsingResult<CardField> {
    let tags = raw
        .split_whitespace()
        .map(|tag| tag.trim_matches('#').to_string())
        .collect();
    Ok(CardField::Tags(tags))
}

fn rarity(raw: &str) -> ParsingResult<CardField> {
    Ok(CardField::Rarity(raw.trim().to_string()))
}

fn product(raw: &str) -> ParsingResult<CardField> {
    Ok(CardField::Product(raw.trim().to_string()))
}

fn hp(raw: &str) -> ParsingResult<CardField> {
    Ok(CardField::Hp(raw.trim().to_string()))
}

fn life(raw: &str) -> ParsingResult<CardField> {
    let value = raw.trim();
    value
        .parse::<u32>()
        .map(CardField::Life)
        .map_err(|e| ParsingError::field_transform_failed("life", value, e))
}

fn bloom_level(raw: &str) -> ParsingResult<CardField> {
    Ok(CardField::BloomLevel(raw.trim().to_string()))
}

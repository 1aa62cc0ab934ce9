//! Card catalog entities
//!
//! Normalized records produced from one card fragment of the card list.
//! Every optional field is omitted from the serialized form when absent so
//! the dataset file only carries what the site actually showed.

use serde::{Deserialize, Serialize};

/// Card color as shown by the `type_*.png` icon family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardColor {
    Red,
    Blue,
    Yellow,
    Green,
    Purple,
    White,
}

/// Cost icon of an arts skill (`arts_*.png` family)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtsIcon {
    Red,
    Blue,
    Yellow,
    Green,
    Purple,
    White,
    /// Wildcard cost (`arts_null.png`)
    Any,
}

/// One baton touch slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatonSlot {
    Red,
    Blue,
    Yellow,
    Green,
    Purple,
    White,
    Any,
    /// No icon at all: the card cannot baton touch
    No,
}

impl From<ArtsIcon> for BatonSlot {
    fn from(icon: ArtsIcon) -> Self {
        match icon {
            ArtsIcon::Red => Self::Red,
            ArtsIcon::Blue => Self::Blue,
            ArtsIcon::Yellow => Self::Yellow,
            ArtsIcon::Green => Self::Green,
            ArtsIcon::Purple => Self::Purple,
            ArtsIcon::White => Self::White,
            ArtsIcon::Any => Self::Any,
        }
    }
}

/// Fixed effect family of a keyword skill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeywordSubtype {
    #[serde(rename = "ブルームエフェクト")]
    BloomEffect,
    #[serde(rename = "コラボエフェクト")]
    CollabEffect,
    #[serde(rename = "ギフト")]
    Gift,
}

/// Icons attached to a skill block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillIcons {
    /// Cost icons, excluding the one inside the special-attack marker;
    /// serialized as `null` when the block has none
    #[serde(default)]
    pub main: Option<Vec<ArtsIcon>>,

    /// Special-attack (tokkou) icon alt text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokkou: Option<Vec<String>>,
}

/// One parsed ability block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<KeywordSubtype>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dmg: Option<String>,

    /// Body text after a successful name/body split
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Raw body text when no split pattern applied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icons: Option<SkillIcons>,
}

impl Skill {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }
}

/// A single normalized field produced by the label mapping tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardField {
    CardType(String),
    Tags(Vec<String>),
    Rarity(String),
    Product(String),
    Color(CardColor),
    Hp(String),
    Life(u32),
    BloomLevel(String),
    BatonTouch(Vec<BatonSlot>),
}

/// One normalized card entry of the catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    #[serde(default)]
    pub number: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_alt: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<CardColor>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub life: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bloom_level: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baton_touch: Option<Vec<BatonSlot>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<Skill>>,

    pub id: String,
}

impl CardRecord {
    /// Store a mapped field, replacing any value a previous pass set
    pub fn apply(&mut self, field: CardField) {
        match field {
            CardField::CardType(v) => self.card_type = Some(v),
            CardField::Tags(v) => self.tags = Some(v),
            CardField::Rarity(v) => self.rarity = Some(v),
            CardField::Product(v) => self.product = Some(v),
            CardField::Color(v) => self.color = Some(v),
            CardField::Hp(v) => self.hp = Some(v),
            CardField::Life(v) => self.life = Some(v),
            CardField::BloomLevel(v) => self.bloom_level = Some(v),
            CardField::BatonTouch(v) => self.baton_touch = Some(v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields_are_not_serialized() {
        let record = CardRecord {
            number: "hSD01-001".to_string(),
            name: "ときのそら".to_string(),
            id: "hSD01-001_OSR".to_string(),
            ..CardRecord::default()
        };

        let value = serde_json::to_value(&record).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 3);
        assert!(object.get("skills").is_none());
        assert!(object.get("baton_touch").is_none());
    }

    #[test]
    fn test_enum_wire_names() {
        let slots = vec![BatonSlot::from(ArtsIcon::Any), BatonSlot::No, BatonSlot::White];
        assert_eq!(serde_json::to_string(&slots).unwrap(), r#"["any","no","white"]"#);

        let subtype = serde_json::to_string(&KeywordSubtype::Gift).unwrap();
        assert_eq!(subtype, "\"ギフト\"");
    }

    #[test]
    fn test_skill_type_is_renamed() {
        let mut skill = Skill::new("アーツ");
        skill.name = Some("たいあたり".to_string());
        skill.dmg = Some("10".to_string());

        let value = serde_json::to_value(&skill).unwrap();
        assert_eq!(value["type"], "アーツ");
        assert_eq!(value["dmg"], "10");
        assert!(value.get("kind").is_none());
        assert!(value.get("icons").is_none());
    }

    #[test]
    fn test_apply_overwrites_previous_value() {
        let mut record = CardRecord::default();
        record.apply(CardField::Hp("100".to_string()));
        record.apply(CardField::Hp("120".to_string()));
        record.apply(CardField::Life(5));

        assert_eq!(record.hp.as_deref(), Some("120"));
        assert_eq!(record.life, Some(5));
    }
}

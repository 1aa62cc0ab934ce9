//! Skill block parsing
//!
//! Turns one `div.oshi` / `div.sp` / `div.arts` / `div.keyword` block into a
//! [`Skill`]. The body text rules for arts and keyword skills are plain
//! functions over strings so they can be exercised without markup.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::ElementRef;

use super::card_mappings::{self, labels};
use super::config::CompiledSelectors;
use super::{ParsingError, ParsingResult};
use crate::domain::card::{Skill, SkillIcons};

/// `<name><optional whitespace><damage>` on the first line of an arts body
static ARTS_HEAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.+?)\s*(\d+\+?|\?\+?)$").expect("arts head pattern is valid")
});

/// Parser for the skill blocks of one card fragment
pub struct SkillParser<'a> {
    selectors: &'a CompiledSelectors,
}

impl<'a> SkillParser<'a> {
    pub fn new(selectors: &'a CompiledSelectors) -> Self {
        Self { selectors }
    }

    /// Parse a single skill block
    ///
    /// The type is the first paragraph of the block and the body is the last
    /// one; a block without any paragraph is rejected.
    pub fn parse_skill(&self, block: ElementRef<'_>) -> ParsingResult<Skill> {
        let paragraphs: Vec<ElementRef<'_>> = block.select(&self.selectors.paragraph).collect();
        let (Some(first), Some(last)) = (paragraphs.first(), paragraphs.last()) else {
            return Err(ParsingError::element_missing("p", "skill block"));
        };

        let kind = element_text(*first);
        let body = element_text(*last);
        let mut skill = Skill::new(kind.as_str());

        if kind == labels::KEYWORD {
            skill.subtype = block
                .select(&self.selectors.img)
                .next()
                .and_then(|img| card_mappings::keyword_subtype(img.value().attr("src").unwrap_or("")));
        }

        match kind.as_str() {
            labels::ARTS => apply_arts_text(&mut skill, &body),
            labels::KEYWORD => apply_keyword_text(&mut skill, &body),
            _ => skill.text = Some(body),
        }

        if ![labels::OSHI_SKILL, labels::SP_OSHI_SKILL, labels::KEYWORD].contains(&kind.as_str()) {
            skill.icons = Some(self.parse_icons(block));
        }

        Ok(skill)
    }

    /// Cost icons of the block, with the special-attack icon tracked apart
    pub fn parse_icons(&self, block: ElementRef<'_>) -> SkillIcons {
        let special: Vec<_> = block
            .select(&self.selectors.special_attack)
            .flat_map(|marker| marker.select(&self.selectors.img))
            .map(|img| img.id())
            .collect();

        let main: Vec<_> = block
            .select(&self.selectors.img)
            .filter(|img| !special.contains(&img.id()))
            .filter_map(|img| card_mappings::arts_icon(img.value().attr("src").unwrap_or("")))
            .collect();

        let tokkou = block
            .select(&self.selectors.special_attack)
            .next()
            .and_then(|marker| marker.select(&self.selectors.img).next())
            .and_then(|img| img.value().attr("alt"))
            .filter(|alt| !alt.is_empty())
            .map(|alt| vec![alt.to_string()]);

        SkillIcons {
            main: Some(main).filter(|icons| !icons.is_empty()),
            tokkou,
        }
    }
}

/// Split an arts body into name, damage and description
///
/// When the first line does not end in a damage token the whole body is kept
/// as `text` instead.
pub fn apply_arts_text(skill: &mut Skill, body: &str) {
    let (head, rest) = split_first_line(body);

    let Some(captures) = ARTS_HEAD.captures(head.trim()) else {
        skill.text = Some(body.to_string());
        return;
    };

    skill.name = Some(captures[1].trim().to_string());
    skill.dmg = Some(captures[2].trim().to_string());
    skill.description = rest
        .map(str::trim)
        .filter(|rest| !rest.is_empty())
        .map(str::to_string);
}

/// Split a keyword body into name and (possibly empty) description
pub fn apply_keyword_text(skill: &mut Skill, body: &str) {
    let (head, rest) = split_first_line(body);
    skill.name = Some(head.trim().to_string());
    skill.description = Some(rest.map(str::trim).unwrap_or("").to_string());
}

fn split_first_line(body: &str) -> (&str, Option<&str>) {
    match body.split_once('\n') {
        Some((head, rest)) => (head, Some(rest)),
        None => (body, None),
    }
}

/// Concatenated, trimmed text content of an element
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

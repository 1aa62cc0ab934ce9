//! Card record parser
//!
//! Builds one [`CardRecord`] from one `li.ex-item` fragment through four
//! independent passes (basic info, info list, detail list, skills) followed by
//! the id derivation. A failing pass is logged and contributes nothing; the
//! fields of the other passes are kept.

use scraper::ElementRef;
use tracing::{debug, error, warn};
use url::Url;

use super::card_mappings::{self, DetailRule, labels};
use super::config::CompiledSelectors;
use super::skill_parser::{SkillParser, element_text};
use super::{ParsingError, ParsingResult};
use crate::domain::card::{BatonSlot, CardField, CardRecord, Skill};

/// Fields of the basic info pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicInfo {
    pub number: String,
    pub name: String,
    pub image: Option<CardImage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardImage {
    pub url: String,
    pub alt: String,
}

/// Parser for a single card fragment
pub struct CardRecordParser<'a> {
    element: ElementRef<'a>,
    selectors: &'a CompiledSelectors,
    origin: &'a Url,
}

impl<'a> CardRecordParser<'a> {
    pub fn new(element: ElementRef<'a>, selectors: &'a CompiledSelectors, origin: &'a Url) -> Self {
        Self {
            element,
            selectors,
            origin,
        }
    }

    /// Run every pass and derive the record id
    pub fn parse(&self) -> CardRecord {
        let mut record = CardRecord::default();

        let basic = self.parse_basic_info();
        record.number = basic.number;
        record.name = basic.name;
        if let Some(image) = basic.image {
            record.image_url = Some(image.url);
            record.image_alt = Some(image.alt);
        }

        match self.parse_card_info() {
            Ok(fields) => fields.into_iter().for_each(|field| record.apply(field)),
            Err(e) => error!("Error parsing card info of '{}': {}", record.number, e),
        }

        match self.parse_detail_info() {
            Ok(fields) => fields.into_iter().for_each(|field| record.apply(field)),
            Err(e) => error!("Error parsing detail info of '{}': {}", record.number, e),
        }

        let skills = self.parse_skills(record.card_type.as_deref());
        if !skills.is_empty() {
            record.skills = Some(skills);
        }

        let id = parse_id(&mut record);
        debug!("Parsed card {} ({})", id, record.name);
        record
    }

    /// Number, name and card image
    ///
    /// Missing number or name yield empty strings. An image that cannot be
    /// resolved is logged and left out.
    pub fn parse_basic_info(&self) -> BasicInfo {
        let number = self.first_text(&self.selectors.number).unwrap_or_default();
        let name = self.first_text(&self.selectors.name).unwrap_or_default();

        let image = match self.extract_image() {
            Ok(image) => image,
            Err(e) => {
                error!("Error parsing basic info of '{}': {}", number, e);
                None
            }
        };

        BasicInfo {
            number,
            name,
            image,
        }
    }

    /// Rows of the `div.info` definition list mapped through the info table
    ///
    /// A row whose value cannot be transformed is logged and skipped; the
    /// other rows are kept.
    pub fn parse_card_info(&self) -> ParsingResult<Vec<CardField>> {
        let info_list = self.info_list()?;

        let mut fields = Vec::new();
        for (term, definition) in self.definition_pairs(info_list) {
            let label = element_text(term);
            let Some(transform) = card_mappings::info_field(&label) else {
                continue;
            };
            let raw: String = definition.text().collect();
            match transform(&raw) {
                Ok(field) => fields.push(field),
                Err(e) => error!("Skipping info row '{}': {}", label, e),
            }
        }

        Ok(fields)
    }

    /// Rows of the `dl.info_Detail` list; icon rows are read from their images
    pub fn parse_detail_info(&self) -> ParsingResult<Vec<CardField>> {
        let Some(detail_list) = self.element.select(&self.selectors.detail_list).next() else {
            debug!("No detail list in card fragment");
            return Ok(Vec::new());
        };

        let mut fields = Vec::new();
        for (term, definition) in self.definition_pairs(detail_list) {
            let label = element_text(term);
            let Some(rule) = card_mappings::detail_field(&label) else {
                continue;
            };

            let field = match rule {
                DetailRule::ColorIcon => definition
                    .select(&self.selectors.img)
                    .next()
                    .and_then(|img| card_mappings::color_icon(img.value().attr("src").unwrap_or("")))
                    .map(CardField::Color),
                DetailRule::BatonTouchIcons => {
                    let slots = self.parse_baton_touch(definition);
                    (!slots.is_empty()).then_some(CardField::BatonTouch(slots))
                }
                DetailRule::Text(transform) => {
                    let value = element_text(definition);
                    if value.is_empty() {
                        None
                    } else {
                        transform(&value)
                            .map_err(|e| error!("Skipping detail row '{}': {}", label, e))
                            .ok()
                    }
                }
            };

            if let Some(field) = field {
                fields.push(field);
            }
        }

        Ok(fields)
    }

    /// Support effect (support cards only) followed by every skill block
    ///
    /// A block that cannot be parsed is logged and dropped.
    pub fn parse_skills(&self, card_type: Option<&str>) -> Vec<Skill> {
        let mut skills = Vec::new();

        if card_type.is_some_and(|kind| kind.contains(labels::SUPPORT_MARKER)) {
            if let Some(support) = self.parse_support_skill() {
                skills.push(support);
            }
        }

        let skill_parser = SkillParser::new(self.selectors);
        for block in self.element.select(&self.selectors.skill_block) {
            match skill_parser.parse_skill(block) {
                Ok(skill) => skills.push(skill),
                Err(e) => error!("Error parsing skill: {}", e),
            }
        }

        skills
    }

    fn parse_support_skill(&self) -> Option<Skill> {
        let info_list = match self.info_list() {
            Ok(list) => list,
            Err(e) => {
                warn!("Support card without ability text: {}", e);
                return None;
            }
        };

        self.definition_pairs(info_list)
            .find(|(term, _)| element_text(*term) == labels::ABILITY_TEXT)
            .map(|(_, definition)| {
                let mut skill = Skill::new(labels::SUPPORT_EFFECT);
                skill.name = Some(element_text(definition));
                skill
            })
    }

    fn parse_baton_touch(&self, definition: ElementRef<'_>) -> Vec<BatonSlot> {
        let icons: Vec<ElementRef<'_>> = definition.select(&self.selectors.img).collect();
        if icons.is_empty() {
            return vec![BatonSlot::No];
        }

        icons
            .into_iter()
            .filter_map(|img| card_mappings::arts_icon(img.value().attr("src").unwrap_or("")))
            .map(BatonSlot::from)
            .collect()
    }

    fn extract_image(&self) -> ParsingResult<Option<CardImage>> {
        let Some(container) = self.element.select(&self.selectors.image_container).next() else {
            return Err(ParsingError::element_missing("div.img", "card fragment"));
        };
        let Some(img) = container.select(&self.selectors.img).next() else {
            return Ok(None);
        };

        let src = img
            .value()
            .attr("src")
            .ok_or_else(|| ParsingError::attribute_missing("src", "img"))?;
        let url = self
            .origin
            .join(src)
            .map_err(|e| ParsingError::UrlResolutionFailed {
                url: src.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Some(CardImage {
            url: url.to_string(),
            alt: img.value().attr("alt").unwrap_or("").to_string(),
        }))
    }

    fn info_list(&self) -> ParsingResult<ElementRef<'a>> {
        self.element
            .select(&self.selectors.info_block)
            .next()
            .ok_or_else(|| ParsingError::element_missing("div.info", "card fragment"))?
            .select(&self.selectors.definition_list)
            .next()
            .ok_or_else(|| ParsingError::element_missing("dl", "div.info"))
    }

    /// `dt`/`dd` pairs of a definition list, zipped in document order
    fn definition_pairs(
        &self,
        list: ElementRef<'a>,
    ) -> impl Iterator<Item = (ElementRef<'a>, ElementRef<'a>)> {
        list.select(&self.selectors.term)
            .zip(list.select(&self.selectors.definition))
    }

    fn first_text(&self, selector: &scraper::Selector) -> Option<String> {
        self.element.select(selector).next().map(element_text)
    }
}

/// Derive the record id and store it under `id`
///
/// The id is the image filename without extension; cards without an image
/// fall back to `"{number}-{rarity}"`.
pub fn parse_id(record: &mut CardRecord) -> String {
    let id = derive_card_id(record.image_url.as_deref(), &record.number, record.rarity.as_deref());
    record.id.clone_from(&id);
    id
}

pub fn derive_card_id(image_url: Option<&str>, number: &str, rarity: Option<&str>) -> String {
    match image_url.filter(|url| !url.is_empty()) {
        Some(url) => {
            let file_name = url.rsplit('/').next().unwrap_or(url);
            file_name.split('.').next().unwrap_or(file_name).to_string()
        }
        None => format!("{}-{}", number, rarity.unwrap_or("")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::card::{ArtsIcon, CardColor, KeywordSubtype};
    use crate::infrastructure::parsing::config::CardListSelectors;
    use proptest::prelude::*;
    use scraper::Html;

    const ORIGIN: &str = "https://hololive-official-cardgame.com";

    const HOLOMEN_CARD: &str = r#"
<li class="ex-item">
  <div class="img"><img src="/wp-content/images/cardlist/hSD01/hSD01-003_RR.png" alt="ときのそら"></div>
  <div class="info">
    <p class="number">hSD01-003</p>
    <p class="name">ときのそら</p>
    <dl>
      <dt>カードタイプ</dt><dd>ホロメン</dd>
      <dt>タグ</dt><dd>#JP #0期生 #歌</dd>
      <dt>レアリティ</dt><dd>RR</dd>
      <dt>収録商品</dt><dd>スタートデッキ「ときのそら＆AZKi」</dd>
    </dl>
    <dl class="info_Detail">
      <dt>色</dt><dd><img src="/wp-content/images/texticon/type_white.png" alt="白"></dd>
      <dt>HP</dt><dd>150</dd>
      <dt>Bloomレベル</dt><dd>1st</dd>
      <dt>バトンタッチ</dt><dd><img src="/wp-content/images/texticon/arts_null.png" alt="◇"></dd>
    </dl>
    <div class="arts">
      <p>アーツ</p>
      <span><img src="/wp-content/images/texticon/arts_white.png" alt="白"></span>
      <p>たいあたり 10
少し痛い。</p>
    </div>
    <div class="keyword">
      <p>キーワード</p>
      <span><img src="/wp-content/images/texticon/gift.png" alt="ギフト"></span>
      <p>ずっと一緒
効果テキスト</p>
    </div>
  </div>
</li>"#;

    const SUPPORT_CARD: &str = r#"
<li class="ex-item">
  <div class="img"><img src="/wp-content/images/cardlist/hBP01/hBP01-104_U.png" alt="マネちゃん"></div>
  <p class="number">hBP01-104</p>
  <p class="name">マネちゃん</p>
  <div class="info">
    <dl>
      <dt>カードタイプ</dt><dd>サポート・スタッフ</dd>
      <dt>能力テキスト</dt><dd>自分の手札を全てデッキに戻す。</dd>
      <dt>レアリティ</dt><dd>U</dd>
    </dl>
  </div>
</li>"#;

    fn with_card<T>(markup: &str, f: impl for<'p> FnOnce(&CardRecordParser<'p>) -> T) -> T {
        let selectors = CompiledSelectors::compile(&CardListSelectors::default()).unwrap();
        let origin = Url::parse(ORIGIN).unwrap();
        let html = Html::parse_fragment(markup);
        let element = html.select(&selectors.card_item).next().unwrap();
        let parser = CardRecordParser::new(element, &selectors, &origin);
        f(&parser)
    }

    #[test]
    fn test_full_holomen_card() {
        let record = with_card(HOLOMEN_CARD, |parser| parser.parse());

        assert_eq!(record.id, "hSD01-003_RR");
        assert_eq!(record.number, "hSD01-003");
        assert_eq!(record.name, "ときのそら");
        assert_eq!(
            record.image_url.as_deref(),
            Some("https://hololive-official-cardgame.com/wp-content/images/cardlist/hSD01/hSD01-003_RR.png")
        );
        assert_eq!(record.image_alt.as_deref(), Some("ときのそら"));
        assert_eq!(record.card_type.as_deref(), Some("ホロメン"));
        assert_eq!(
            record.tags,
            Some(vec!["JP".to_string(), "0期生".to_string(), "歌".to_string()])
        );
        assert_eq!(record.color, Some(CardColor::White));
        assert_eq!(record.hp.as_deref(), Some("150"));
        assert_eq!(record.bloom_level.as_deref(), Some("1st"));
        assert_eq!(record.baton_touch, Some(vec![BatonSlot::Any]));

        let skills = record.skills.unwrap();
        assert_eq!(skills.len(), 2);
        assert_eq!(skills[0].kind, "アーツ");
        assert_eq!(skills[0].name.as_deref(), Some("たいあたり"));
        assert_eq!(skills[0].icons.as_ref().unwrap().main, Some(vec![ArtsIcon::White]));
        assert_eq!(skills[1].subtype, Some(KeywordSubtype::Gift));
    }

    #[test]
    fn test_support_card_synthesizes_support_effect() {
        let record = with_card(SUPPORT_CARD, |parser| parser.parse());

        let skills = record.skills.unwrap();
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].kind, "サポート効果");
        assert_eq!(skills[0].name.as_deref(), Some("自分の手札を全てデッキに戻す。"));
        assert!(record.color.is_none());
        assert!(record.baton_touch.is_none());
    }

    #[test]
    fn test_missing_detail_block_keeps_basic_info() {
        let markup = r#"<li class="ex-item">
            <div class="img"><img src="/cards/hBP01-001_OSR.png" alt="x"></div>
            <p class="number">hBP01-001</p><p class="name">AZKi</p>
        </li>"#;
        let record = with_card(markup, |parser| parser.parse());

        assert_eq!(record.number, "hBP01-001");
        assert_eq!(record.name, "AZKi");
        assert_eq!(
            record.image_url.as_deref(),
            Some("https://hololive-official-cardgame.com/cards/hBP01-001_OSR.png")
        );
        assert!(record.skills.is_none());
        assert_eq!(record.id, "hBP01-001_OSR");
    }

    #[test]
    fn test_baton_touch_without_icons_is_no() {
        let markup = r#"<li class="ex-item"><dl class="info_Detail">
            <dt>バトンタッチ</dt><dd></dd>
            <dt>LIFE</dt><dd>5</dd>
        </dl></li>"#;
        let fields = with_card(markup, |parser| parser.parse_detail_info()).unwrap();

        assert_eq!(
            fields,
            vec![CardField::BatonTouch(vec![BatonSlot::No]), CardField::Life(5)]
        );
    }

    #[test]
    fn test_baton_touch_slots_keep_order_and_duplicates() {
        let markup = r#"<li class="ex-item"><dl class="info_Detail">
            <dt>バトンタッチ</dt><dd><img src="/i/arts_blue.png"><img src="/i/arts_blue.png"><img src="/i/arts_null.png"></dd>
        </dl></li>"#;
        let fields = with_card(markup, |parser| parser.parse_detail_info()).unwrap();

        assert_eq!(
            fields,
            vec![CardField::BatonTouch(vec![BatonSlot::Blue, BatonSlot::Blue, BatonSlot::Any])]
        );
    }

    #[test]
    fn test_detail_drops_empty_values_and_unknown_colors() {
        let markup = r#"<li class="ex-item"><dl class="info_Detail">
            <dt>色</dt><dd><img src="/i/type_rainbow.png"></dd>
            <dt>HP</dt><dd>  </dd>
            <dt>特殊</dt><dd>?</dd>
        </dl></li>"#;
        let fields = with_card(markup, |parser| parser.parse_detail_info()).unwrap();
        assert!(fields.is_empty());
    }

    #[test]
    fn test_bad_info_row_keeps_sibling_rows() {
        let markup = r#"<li class="ex-item">
            <p class="number">hYS01-001</p>
            <div class="info"><dl>
              <dt>カードタイプ</dt><dd>推しホロメン</dd>
              <dt>LIFE</dt><dd>たくさん</dd>
              <dt>レアリティ</dt><dd>OSR</dd>
            </dl></div>
            <dl class="info_Detail"><dt>HP</dt><dd>200</dd></dl>
        </li>"#;

        let fields = with_card(markup, |parser| parser.parse_card_info()).unwrap();
        assert_eq!(
            fields,
            vec![
                CardField::CardType("推しホロメン".to_string()),
                CardField::Rarity("OSR".to_string()),
            ]
        );

        let record = with_card(markup, |parser| parser.parse());
        assert_eq!(record.card_type.as_deref(), Some("推しホロメン"));
        assert!(record.life.is_none());
        assert_eq!(record.hp.as_deref(), Some("200"));
        assert_eq!(record.id, "hYS01-001-OSR");
    }

    #[test]
    fn test_support_card_with_bad_life_keeps_effect_and_key() {
        let markup = r#"<li class="ex-item">
            <p class="number">hBP01-104</p>
            <div class="info"><dl>
              <dt>カードタイプ</dt><dd>サポート・アイテム</dd>
              <dt>レアリティ</dt><dd>U</dd>
              <dt>LIFE</dt><dd>-</dd>
              <dt>能力テキスト</dt><dd>効果</dd>
            </dl></div>
        </li>"#;

        let record = with_card(markup, |parser| parser.parse());
        assert_eq!(record.card_type.as_deref(), Some("サポート・アイテム"));
        assert_eq!(record.rarity.as_deref(), Some("U"));
        assert_eq!(record.id, "hBP01-104-U");

        let skills = record.skills.unwrap();
        assert_eq!(skills[0].kind, "サポート効果");
        assert_eq!(skills[0].name.as_deref(), Some("効果"));
    }

    #[test]
    fn test_bad_detail_row_keeps_sibling_rows() {
        let markup = r#"<li class="ex-item"><dl class="info_Detail">
            <dt>LIFE</dt><dd>x</dd>
            <dt>HP</dt><dd>120</dd>
        </dl></li>"#;
        let fields = with_card(markup, |parser| parser.parse_detail_info()).unwrap();
        assert_eq!(fields, vec![CardField::Hp("120".to_string())]);
    }

    #[test]
    fn test_unparsable_skill_block_is_dropped() {
        let markup = r#"<li class="ex-item">
            <p class="number">hBP01-010</p>
            <div class="info">
              <div class="oshi"><p>推しスキル</p><p>ソウルフレンド</p></div>
              <div class="arts"><span><img src="/i/arts_red.png"></span></div>
              <div class="keyword"><p>キーワード</p><span><img src="/i/collabEF.png"></span><p>コラボ
効果</p></div>
            </div>
        </li>"#;

        let skills = with_card(markup, |parser| parser.parse_skills(None));
        let kinds: Vec<&str> = skills.iter().map(|s| s.kind.as_str()).collect();
        assert_eq!(kinds, vec!["推しスキル", "キーワード"]);
        assert_eq!(skills[1].subtype, Some(KeywordSubtype::CollabEffect));
    }

    #[test]
    fn test_unknown_info_terms_are_skipped() {
        let markup = r#"<li class="ex-item"><div class="info"><dl>
            <dt>イラストレーター</dt><dd>someone</dd>
            <dt>レアリティ</dt><dd> C </dd>
        </dl></div></li>"#;
        let fields = with_card(markup, |parser| parser.parse_card_info()).unwrap();
        assert_eq!(fields, vec![CardField::Rarity("C".to_string())]);
    }

    #[test]
    fn test_derive_card_id() {
        assert_eq!(
            derive_card_id(Some("https://example.com/a/b/hSD01-001_OSR.png"), "hSD01-001", Some("OSR")),
            "hSD01-001_OSR"
        );
        assert_eq!(derive_card_id(None, "hSD01-001", Some("OSR")), "hSD01-001-OSR");
        assert_eq!(derive_card_id(Some(""), "hSD01-001", None), "hSD01-001-");
    }

    proptest! {
        #[test]
        fn prop_card_id_depends_only_on_file_stem(
            stem in "[A-Za-z0-9_-]{1,24}",
            dir_a in "[a-z]{1,8}",
            dir_b in "[a-z]{1,8}",
            number in "[A-Za-z0-9-]{0,12}",
        ) {
            let first = derive_card_id(Some(&format!("https://x.test/{dir_a}/{stem}.png")), &number, Some("R"));
            let second = derive_card_id(Some(&format!("https://y.test/{dir_b}/{stem}.png")), "other", None);
            prop_assert_eq!(&first, &stem);
            prop_assert_eq!(first, second);
        }
    }
}

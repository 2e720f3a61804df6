//! In-memory save document with byte-preserving round-trip.
//!
//! The document is held as the original event stream. Untouched events are
//! re-emitted verbatim on serialization, so unrelated content (including the
//! game's non-standard `<?xml?>` declaration) survives byte-for-byte. Only
//! when a `customSong<N>` attribute actually changes is the `game` start tag
//! rebuilt, keeping every other attribute in its original order with its
//! original raw (still-escaped) value bytes.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::escape::{escape, unescape};
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;

use zonetune_model::CustomSongValue;

use crate::error::{Result, SaveError};

const GAME_TAG: &[u8] = b"game";

/// Whether the `game` element was written as `<game ...>` or `<game .../>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GameTagForm {
    Start,
    Empty,
}

/// One attribute of the `game` element, value kept in raw escaped form.
#[derive(Debug, Clone)]
struct SaveAttribute {
    key: String,
    raw_value: String,
}

#[derive(Debug)]
struct GameElement {
    /// Position of the `game` start/empty event in the stream.
    event_index: usize,
    form: GameTagForm,
    attributes: Vec<SaveAttribute>,
    /// Set once any attribute changed; until then the original tag bytes are
    /// re-emitted verbatim.
    rebuilt: bool,
}

/// A parsed save document, owned exclusively for one edit transaction.
#[derive(Debug)]
pub struct SaveDocument {
    events: Vec<Event<'static>>,
    game: GameElement,
}

impl SaveDocument {
    /// Parse a save document from its full text.
    pub fn parse(content: &str) -> Result<Self> {
        let mut reader = Reader::from_str(content);
        let mut events: Vec<Event<'static>> = Vec::new();
        let mut game: Option<GameElement> = None;

        loop {
            let event = reader.read_event().map_err(|e| SaveError::Parse {
                source: Box::new(e),
            })?;
            if matches!(event, Event::Eof) {
                break;
            }

            if game.is_none() {
                let found = match &event {
                    Event::Start(e) if e.name().as_ref() == GAME_TAG => {
                        Some((e, GameTagForm::Start))
                    }
                    Event::Empty(e) if e.name().as_ref() == GAME_TAG => {
                        Some((e, GameTagForm::Empty))
                    }
                    _ => None,
                };
                if let Some((element, form)) = found {
                    game = Some(GameElement {
                        event_index: events.len(),
                        form,
                        attributes: read_attributes(element)?,
                        rebuilt: false,
                    });
                }
            }

            events.push(event.into_owned());
        }

        let game = game.ok_or(SaveError::MissingGameElement)?;
        Ok(Self { events, game })
    }

    /// Current value of a slot's attribute, `None` when the attribute is
    /// absent (zone never customized).
    pub fn custom_song(&self, slot_index: u32) -> Option<CustomSongValue> {
        let key = attribute_key(slot_index);
        let attribute = self.game.attributes.iter().find(|a| a.key == key)?;
        Some(CustomSongValue::from_attribute_value(&unescape_raw(
            &attribute.raw_value,
        )))
    }

    /// Set a slot's attribute, returning `true` iff the stored value changed.
    pub fn set_custom_song(&mut self, slot_index: u32, value: &CustomSongValue) -> bool {
        let key = attribute_key(slot_index);
        let new_value = value.as_attribute_value();

        if let Some(attribute) = self.game.attributes.iter_mut().find(|a| a.key == key) {
            if unescape_raw(&attribute.raw_value) == new_value {
                return false;
            }
            attribute.raw_value = escape(new_value).into_owned();
        } else {
            self.game.attributes.push(SaveAttribute {
                key,
                raw_value: escape(new_value).into_owned(),
            });
        }
        self.game.rebuilt = true;
        true
    }

    /// Serialize the document back to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());

        for (index, event) in self.events.iter().enumerate() {
            if index == self.game.event_index && self.game.rebuilt {
                let event = match self.game.form {
                    GameTagForm::Start => Event::Start(self.rebuild_game_tag()),
                    GameTagForm::Empty => Event::Empty(self.rebuild_game_tag()),
                };
                writer.write_event(event).map_err(|e| SaveError::Serialize {
                    source: Box::new(e),
                })?;
            } else {
                writer
                    .write_event(event.clone())
                    .map_err(|e| SaveError::Serialize {
                        source: Box::new(e),
                    })?;
            }
        }

        Ok(writer.into_inner())
    }

    fn rebuild_game_tag(&self) -> BytesStart<'_> {
        let mut tag = BytesStart::new("game");
        for attribute in &self.game.attributes {
            tag.push_attribute(Attribute {
                key: QName(attribute.key.as_bytes()),
                value: Cow::Borrowed(attribute.raw_value.as_bytes()),
            });
        }
        tag
    }
}

fn read_attributes(element: &BytesStart<'_>) -> Result<Vec<SaveAttribute>> {
    let mut attributes = Vec::new();
    for attribute in element.attributes() {
        let attribute = attribute.map_err(|e| SaveError::Parse {
            source: Box::new(e),
        })?;
        attributes.push(SaveAttribute {
            key: String::from_utf8_lossy(attribute.key.as_ref()).into_owned(),
            raw_value: String::from_utf8_lossy(&attribute.value).into_owned(),
        });
    }
    Ok(attributes)
}

fn attribute_key(slot_index: u32) -> String {
    format!("customSong{slot_index}")
}

/// Unescape a raw attribute value, falling back to the raw bytes when the
/// entity content is something the parser does not recognize.
fn unescape_raw(raw: &str) -> String {
    unescape(raw).map(Cow::into_owned).unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use zonetune_model::NO_CUSTOM_SONG;

    const SAMPLE: &str = "<?xml?><save><game version=\"84\" customSong0=\"|2350|DEFAULT|\" \
gold=\"1234\"/><stats deaths=\"7\"/></save>";

    #[test]
    fn untouched_document_round_trips_byte_identically() {
        let document = SaveDocument::parse(SAMPLE).unwrap();
        let output = document.to_bytes().unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), SAMPLE);
    }

    #[test]
    fn same_value_write_is_not_a_change() {
        let mut document = SaveDocument::parse(SAMPLE).unwrap();
        let changed = document.set_custom_song(0, &CustomSongValue::Default);
        assert!(!changed);
        // No rebuild happened, so the bytes stay identical too.
        assert_eq!(
            String::from_utf8(document.to_bytes().unwrap()).unwrap(),
            SAMPLE
        );
    }

    #[test]
    fn changed_value_preserves_other_attributes_in_order() {
        let mut document = SaveDocument::parse(SAMPLE).unwrap();
        let value = CustomSongValue::Path("C:/music/song_lobby.mp3".to_string());
        assert!(document.set_custom_song(0, &value));

        let output = String::from_utf8(document.to_bytes().unwrap()).unwrap();
        assert!(output.starts_with("<?xml?>"));
        assert!(output.contains(
            "<game version=\"84\" customSong0=\"C:/music/song_lobby.mp3\" gold=\"1234\"/>"
        ));
        assert!(output.contains("<stats deaths=\"7\"/>"));
    }

    #[test]
    fn absent_attribute_is_distinct_from_sentinel() {
        let mut document = SaveDocument::parse(SAMPLE).unwrap();
        assert_eq!(document.custom_song(0), Some(CustomSongValue::Default));
        assert_eq!(document.custom_song(3), None);

        // Writing the sentinel into an absent slot is a real change.
        assert!(document.set_custom_song(3, &CustomSongValue::Default));
        assert_eq!(document.custom_song(3), Some(CustomSongValue::Default));
        let output = String::from_utf8(document.to_bytes().unwrap()).unwrap();
        assert!(output.contains(&format!("customSong3=\"{NO_CUSTOM_SONG}\"")));
    }

    #[test]
    fn missing_game_element_is_rejected() {
        let result = SaveDocument::parse("<?xml?><save><stats/></save>");
        assert!(matches!(result, Err(SaveError::MissingGameElement)));
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let result = SaveDocument::parse("<?xml?><save><game></save>");
        assert!(matches!(result, Err(SaveError::Parse { .. })));
    }

    #[test]
    fn game_element_with_children_keeps_its_end_tag() {
        let content = "<?xml?><save><game customSong1=\"old\"><npc/></game></save>";
        let mut document = SaveDocument::parse(content).unwrap();
        let value = CustomSongValue::Path("new".to_string());
        assert!(document.set_custom_song(1, &value));
        let output = String::from_utf8(document.to_bytes().unwrap()).unwrap();
        assert_eq!(output, "<?xml?><save><game customSong1=\"new\"><npc/></game></save>");
    }
}

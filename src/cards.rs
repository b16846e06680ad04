//! Card records and the fixed-size card collection
//!
//! Every ingestion path (startup load, JSON import, reset) goes through
//! [`normalize_card`], so defaulting is identical everywhere.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::consts::{CARD_COUNT, DEFAULT_LABEL_PREFIX, PLACEHOLDER_IMAGE};

/// A single flippable card: image on the front, text on the back
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub text: String,
    /// Path or URL of the front image
    pub image: String,
    /// Face down (image visible) when false
    pub flipped: bool,
}

impl Card {
    /// Default card for display position `index + 1`
    pub fn default_for(index: usize) -> Self {
        Self {
            text: default_label(index),
            image: PLACEHOLDER_IMAGE.to_string(),
            flipped: false,
        }
    }
}

/// `"Carta N"` where N is the 1-based display position
pub fn default_label(index: usize) -> String {
    format!("{} {}", DEFAULT_LABEL_PREFIX, index + 1)
}

/// What to do with an incoming `flipped` value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipPolicy {
    /// Coerce whatever is stored to a boolean
    Keep,
    /// Always face down (imports)
    FaceDown,
}

/// Coerce one raw JSON element into a card for position `index`.
///
/// Anything that is not an object counts as an empty object. Non-string or
/// empty `text` gets the default label, non-string `image` gets the
/// placeholder, and `flipped` follows JavaScript truthiness.
pub fn normalize_card(raw: Option<&Value>, index: usize, policy: FlipPolicy) -> Card {
    let field = |name: &str| raw.and_then(|v| v.get(name));

    let text = field("text")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| default_label(index));

    let image = field("image")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());

    let flipped = match policy {
        FlipPolicy::Keep => field("flipped").is_some_and(truthy),
        FlipPolicy::FaceDown => false,
    };

    Card {
        text,
        image,
        flipped,
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Exactly [`CARD_COUNT`] cards, addressed by index 0..CARD_COUNT
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CardCollection(Vec<Card>);

impl CardCollection {
    /// Fresh collection of default cards
    pub fn defaults() -> Self {
        Self((0..CARD_COUNT).map(Card::default_for).collect())
    }

    /// Normalize an arbitrary-length slice of raw elements.
    ///
    /// Extra elements are dropped and missing ones padded with defaults.
    pub fn from_raw(raw: &[Value], policy: FlipPolicy) -> Self {
        Self(
            (0..CARD_COUNT)
                .map(|i| normalize_card(raw.get(i), i, policy))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Card> {
        self.0.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Card> {
        self.0.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.0.iter()
    }

    /// Toggle a card and return its new state
    pub fn toggle_flip(&mut self, index: usize) -> Option<bool> {
        let card = self.0.get_mut(index)?;
        card.flipped = !card.flipped;
        Some(card.flipped)
    }
}

impl Default for CardCollection {
    fn default() -> Self {
        Self::defaults()
    }
}

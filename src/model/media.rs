use serde::{Deserialize, Serialize};

/// Extra content attached to a [`super::Place`]: credits, text, pictures.
///
/// Media is carried in a place's JSON form only. It has no table of its own
/// and is not written or read by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    #[serde(default)]
    pub id: i64,
    /// Title shown with the media.
    pub name: String,
    /// Body text.
    pub contents: String,
    /// Kind of media, such as `text` or `image`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Picture URL, if any.
    #[serde(rename = "image")]
    pub image_url: String,
}

use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchemaType {
    Object,
    Array,
    String,
}

/// Response-shape constraint sent alongside a structured completion request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSchema {
    #[serde(rename = "type")]
    pub kind: SchemaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, ResponseSchema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ResponseSchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl ResponseSchema {
    fn of(kind: SchemaType) -> Self {
        Self {
            kind,
            description: None,
            properties: BTreeMap::new(),
            items: None,
            min_items: None,
            max_items: None,
            required: Vec::new(),
        }
    }

    pub fn string() -> Self {
        Self::of(SchemaType::String)
    }

    /// An object whose listed properties are all required.
    pub fn object<I>(properties: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, ResponseSchema)>,
    {
        let mut schema = Self::of(SchemaType::Object);
        for (name, property) in properties {
            schema.required.push(name.to_string());
            schema.properties.insert(name.to_string(), property);
        }
        schema
    }

    pub fn array(items: ResponseSchema) -> Self {
        Self { items: Some(Box::new(items)), ..Self::of(SchemaType::Array) }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_exact_len(mut self, len: u32) -> Self {
        self.min_items = Some(len);
        self.max_items = Some(len);
        self
    }
}

/// `{ songs: [{ title, artist }] }` with exactly `track_count` entries requested.
pub fn playlist_schema(track_count: u32) -> ResponseSchema {
    let song = ResponseSchema::object([
        ("title", ResponseSchema::string().with_description("The title of the song.")),
        ("artist", ResponseSchema::string().with_description("The name of the artist or band.")),
    ]);

    ResponseSchema::object([(
        "songs",
        ResponseSchema::array(song)
            .with_description(format!("An array of exactly {track_count} song objects."))
            .with_exact_len(track_count),
    )])
}

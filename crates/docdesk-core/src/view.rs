//! Projection of documents into display cards.

use docdesk_store::Document;

use crate::codec;

/// One rendered field row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRow {
    pub field: String,
    pub value: String,
}

/// A document as the panel shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    /// Display id (last path segment).
    pub id: String,
    /// Full resource path, carried by the edit and delete actions.
    pub path: String,
    pub rows: Vec<CardRow>,
}

impl From<&Document> for Card {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id().to_owned(),
            path: doc.name.clone(),
            rows: doc
                .fields
                .iter()
                .map(|(field, value)| CardRow {
                    field: field.clone(),
                    value: codec::decode(value),
                })
                .collect(),
        }
    }
}

/// Build the full card list, optionally keeping only documents whose id
/// contains `search` (case-insensitive). Blank search keeps everything.
pub fn project(documents: &[Document], search: Option<&str>) -> Vec<Card> {
    let term = search
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase);

    documents
        .iter()
        .filter(|doc| {
            term.as_deref()
                .is_none_or(|t| doc.id().to_lowercase().contains(t))
        })
        .map(Card::from)
        .collect()
}

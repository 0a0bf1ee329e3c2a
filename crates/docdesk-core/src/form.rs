//! Typed add/edit form built from the schema registry.
//!
//! The server renders a [`FormModel`] as HTML and rebuilds it from the posted
//! values, so the encode contract only ever sees schema-declared fields.

use docdesk_store::Document;

use crate::codec;
use crate::confirm::{PendingAction, PendingSave};
use crate::error::FormError;
use crate::schema::{self, FieldDescriptor};

/// Whether the form creates a new document or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { path: String },
}

/// One schema field and its current raw value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormInput {
    pub descriptor: FieldDescriptor,
    pub value: String,
}

/// The add/edit form for one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormModel {
    pub collection: String,
    pub mode: FormMode,
    /// Document id. Optional on create; fixed on edit.
    pub doc_id: String,
    pub inputs: Vec<FormInput>,
}

impl FormModel {
    /// Blank form for a new document in `collection`.
    pub fn create(collection: &str) -> Self {
        Self {
            collection: collection.to_owned(),
            mode: FormMode::Create,
            doc_id: String::new(),
            inputs: schema::fields_for(collection)
                .iter()
                .map(|descriptor| FormInput {
                    descriptor: *descriptor,
                    value: String::new(),
                })
                .collect(),
        }
    }

    /// Form pre-filled from an existing document.
    pub fn edit(collection: &str, doc: &Document) -> Self {
        let mut form = Self::create(collection);
        form.mode = FormMode::Edit {
            path: doc.name.clone(),
        };
        doc.id().clone_into(&mut form.doc_id);
        for input in &mut form.inputs {
            if let Some(value) = doc.fields.get(input.descriptor.name) {
                input.value = codec::decode_for_input(value);
            }
        }
        form
    }

    /// Dialog heading.
    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Add New Record",
            FormMode::Edit { .. } => "Edit Record",
        }
    }

    /// The id can only be chosen when creating.
    pub fn id_editable(&self) -> bool {
        self.mode == FormMode::Create
    }

    /// Set the document id; ignored in edit mode.
    pub fn set_doc_id(&mut self, id: &str) {
        if self.id_editable() {
            id.trim().clone_into(&mut self.doc_id);
        }
    }

    /// Copy submitted `(field, value)` pairs onto matching inputs. Names the
    /// schema does not declare are ignored.
    pub fn apply<'a, I>(&mut self, submitted: I)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (name, value) in submitted {
            if let Some(input) = self
                .inputs
                .iter_mut()
                .find(|input| input.descriptor.name == name)
            {
                value.clone_into(&mut input.value);
            }
        }
    }

    /// Labels of required inputs that are empty after trimming.
    pub fn missing_required(&self) -> Vec<&'static str> {
        self.inputs
            .iter()
            .filter(|input| input.descriptor.required && input.value.trim().is_empty())
            .map(|input| input.descriptor.label)
            .collect()
    }

    /// Validate and encode the form into a save awaiting confirmation.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::MissingRequired`] if any required input is empty.
    pub fn submit(&self) -> Result<PendingAction, FormError> {
        let labels = self.missing_required();
        if !labels.is_empty() {
            return Err(FormError::MissingRequired { labels });
        }

        let filled: Vec<(&str, &str)> = self
            .inputs
            .iter()
            .map(|input| (input.descriptor.name, input.value.trim()))
            .filter(|(_, value)| !value.is_empty())
            .collect();

        let doc_id = match self.mode {
            FormMode::Create if !self.doc_id.is_empty() => Some(self.doc_id.clone()),
            _ => None,
        };

        Ok(PendingAction::Save(PendingSave {
            collection: self.collection.clone(),
            mode: self.mode.clone(),
            doc_id,
            fields: codec::encode_fields(filled.iter().copied()),
            preview: filled
                .iter()
                .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
                .collect(),
        }))
    }
}

//! Static per-collection form schemas.
//!
//! Unknown collections have no schema; their form renders without inputs
//! rather than failing.

/// HTML input kind for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Number,
    Email,
}

impl InputKind {
    /// Value for the `type` attribute of an `<input>`.
    pub fn as_html(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Email => "email",
        }
    }
}

/// One form field of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Document field name.
    pub name: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    pub kind: InputKind,
    /// Checked when the form is submitted, never while typing.
    pub required: bool,
}

const fn required(name: &'static str, label: &'static str, kind: InputKind) -> FieldDescriptor {
    FieldDescriptor {
        name,
        label,
        kind,
        required: true,
    }
}

const STUDENTS: &[FieldDescriptor] = &[
    required("fname", "First Name", InputKind::Text),
    required("lname", "Last Name", InputKind::Text),
    required("program", "Program", InputKind::Text),
    required("year_level", "Year Level", InputKind::Number),
];

const INSTRUCTORS: &[FieldDescriptor] = &[
    required("full_name", "Name", InputKind::Text),
    required("email", "Email", InputKind::Email),
    required("department", "Department", InputKind::Text),
];

const PROGRAMS: &[FieldDescriptor] = &[
    required("name", "Program Name", InputKind::Text),
    required("department", "Department", InputKind::Text),
    required("program_code", "Program Code", InputKind::Text),
];

/// Known collections in display order.
const REGISTRY: &[(&str, &[FieldDescriptor])] = &[
    ("students", STUDENTS),
    ("instructors", INSTRUCTORS),
    ("programs", PROGRAMS),
];

/// Ordered field descriptors for `collection`; empty if unknown.
pub fn fields_for(collection: &str) -> &'static [FieldDescriptor] {
    REGISTRY
        .iter()
        .find(|(name, _)| *name == collection)
        .map(|(_, fields)| *fields)
        .unwrap_or_default()
}

/// Names of the collections the panel offers.
pub fn collections() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|(name, _)| *name)
}

/// Whether `collection` is one the panel offers.
pub fn is_known(collection: &str) -> bool {
    collections().any(|c| c == collection)
}

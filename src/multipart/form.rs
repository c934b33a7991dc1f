use indexmap::IndexMap;
use serde_json::{json, Value};

use super::part::{DecodedFile, DecodedPart};

/// The decoded form: text fields by name and uploaded files in body order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    fields: IndexMap<String, String>,
    files: Vec<DecodedFile>,
}

impl Form {
    pub fn fields(&self) -> &IndexMap<String, String> {
        &self.fields
    }

    pub fn files(&self) -> &[DecodedFile] {
        &self.files
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// First file uploaded under `field_name`.
    pub fn file(&self, field_name: &str) -> Option<&DecodedFile> {
        self.files.iter().find(|file| file.field_name == field_name)
    }

    /// Every file uploaded under `field_name`, e.g. from a multi-file input.
    pub fn files_named<'a>(
        &'a self,
        field_name: &'a str,
    ) -> impl Iterator<Item = &'a DecodedFile> + 'a {
        self.files
            .iter()
            .filter(move |file| file.field_name == field_name)
    }

    pub fn len(&self) -> usize {
        self.fields.len() + self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.files.is_empty()
    }

    pub fn into_parts(self) -> (IndexMap<String, String>, Vec<DecodedFile>) {
        (self.fields, self.files)
    }

    /// Fields plus file metadata. File contents are left out.
    pub fn to_json(&self) -> Value {
        let files: Vec<Value> = self
            .files
            .iter()
            .map(|file| {
                json!({
                    "field_name": file.field_name,
                    "filename": file.filename,
                    "content_type": file.mime_type(),
                    "size": file.len(),
                })
            })
            .collect();

        json!({
            "fields": self.fields,
            "files": files,
        })
    }
}

/// Collects decoded parts into a [`Form`].
///
/// A repeated field name overwrites the earlier value but keeps its original
/// position, so single-value consumers see the last one sent. Files are never
/// merged.
pub fn assemble<I>(parts: I) -> Form
where
    I: IntoIterator<Item = DecodedPart>,
{
    let mut form = Form::default();
    for part in parts {
        match part {
            DecodedPart::Field(field) => {
                form.fields.insert(field.name, field.value);
            }
            DecodedPart::File(file) => form.files.push(file),
        }
    }
    form
}

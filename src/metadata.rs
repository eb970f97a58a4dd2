//! Attribute document derived from a selection

use serde::{Deserialize, Serialize};

use crate::selector::Selection;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Attribute {
    pub trait_type: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FrameMetadata {
    pub name: String,
    pub identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub attributes: Vec<Attribute>,
}

impl FrameMetadata {
    /// Unset categories are left out of `attributes`
    pub fn from_selection(selection: &Selection) -> Self {
        let identifier = selection.identifier().to_string();
        let attributes = selection
            .iter()
            .filter_map(|(category, option)| {
                option.map(|o| Attribute {
                    trait_type: category.to_string(),
                    value: o.id.clone(),
                })
            })
            .collect();

        Self {
            name: format!("Frame #{}", identifier),
            identifier,
            image: None,
            attributes,
        }
    }

    /// Attach an image URL; `{id}` is replaced with the identifier
    pub fn with_image(mut self, template: &str) -> Self {
        self.image = Some(template.replace("{id}", &self.identifier));
        self
    }
}

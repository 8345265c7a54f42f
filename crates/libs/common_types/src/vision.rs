use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Feature groups the analysis service can be asked to compute for an image.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
pub enum VisualFeature {
    Categories,
    Description,
    Faces,
    ImageType,
    Tags,
    Adult,
    Color,
    Brands,
    Objects,
}

impl VisualFeature {
    /// Every feature group, in the order the service documents them.
    pub const ALL: [Self; 9] = [
        Self::Categories,
        Self::Description,
        Self::Faces,
        Self::ImageType,
        Self::Tags,
        Self::Adult,
        Self::Color,
        Self::Brands,
        Self::Objects,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Categories => "Categories",
            Self::Description => "Description",
            Self::Faces => "Faces",
            Self::ImageType => "ImageType",
            Self::Tags => "Tags",
            Self::Adult => "Adult",
            Self::Color => "Color",
            Self::Brands => "Brands",
            Self::Objects => "Objects",
        }
    }
}

impl fmt::Display for VisualFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected face, reduced to the fields this app keeps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FaceResult {
    /// Gender label as reported by the service, empty when it reported none.
    pub gender: String,
    pub age: i32,
    /// Bounding box as `[left, top, right, bottom]` in pixels.
    pub coordinates: [i32; 4],
}

//! Content type update builder.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ContentTypeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_seo: Option<bool>,
}

impl ContentTypeUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.slug.is_none() && self.enable_seo.is_none()
    }
}

pub struct ContentTypeUpdateBuilder(ContentTypeUpdate);

impl ContentTypeUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(ContentTypeUpdate::default())
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.0.slug = Some(slug.into());
        self
    }

    #[must_use]
    pub const fn enable_seo(mut self, enable_seo: bool) -> Self {
        self.0.enable_seo = Some(enable_seo);
        self
    }

    #[must_use]
    pub fn build(self) -> ContentTypeUpdate {
        self.0
    }
}

impl Default for ContentTypeUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//! Read-only access to marketing content owned by the headless CMS.

pub mod contentstack;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// An uploaded asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub title: String,
}

/// Which side of a block the image sits on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    ImageLeft,
    #[default]
    ImageRight,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockMetadata {
    pub uid: String,
}

/// One layout block: optional title, rich-text copy and image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    #[serde(rename = "_metadata")]
    pub metadata: BlockMetadata,
    pub title: Option<String>,
    /// Rich text as HTML.
    pub copy: Option<String>,
    pub image: Option<Image>,
    #[serde(default)]
    pub layout: Layout,
}

/// Modular-block wrapper: every entry of `blocks` is `{"block": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockItem {
    pub block: Block,
}

/// A page entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub uid: String,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub image: Option<Image>,
    /// Rich text as HTML.
    pub rich_text: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub blocks: Vec<BlockItem>,
}

impl Page {
    pub fn has_blocks(&self) -> bool {
        !self.blocks.is_empty()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<BlockItem>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<BlockItem>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Somewhere pages come from.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// The page published at `url`, or `None` if there is none.
    async fn page(&self, url: &str) -> Result<Option<Page>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_with_blocks() {
        let page: Page = serde_json::from_str(
            r#"{
                "uid": "blt1",
                "title": "Home",
                "url": "/",
                "description": "Find. Replace. Sync.",
                "image": {"url": "https://images.example.com/hero.png", "title": "Hero"},
                "rich_text": "<p>Hello</p>",
                "blocks": [
                    {"block": {
                        "_metadata": {"uid": "cs1"},
                        "title": "Left",
                        "copy": "<p>copy</p>",
                        "image": {"url": "https://images.example.com/a.png", "title": "A"},
                        "layout": "image_left"
                    }},
                    {"block": {"_metadata": {"uid": "cs2"}, "layout": "image_right"}}
                ]
            }"#,
        )
        .unwrap();

        assert!(page.has_blocks());
        assert_eq!(page.blocks.len(), 2);
        assert_eq!(page.blocks[0].block.layout, Layout::ImageLeft);
        assert_eq!(page.blocks[0].block.metadata.uid, "cs1");
        assert_eq!(page.blocks[1].block.layout, Layout::ImageRight);
        assert!(page.blocks[1].block.title.is_none());
        assert_eq!(page.image.unwrap().title, "Hero");
    }

    #[test]
    fn missing_blocks_is_empty() {
        let page: Page =
            serde_json::from_str(r#"{"uid": "blt1", "title": "Editor", "url": "/editor"}"#).unwrap();
        assert!(!page.has_blocks());
        assert!(page.description.is_none());
    }

    #[test]
    fn null_blocks_is_empty() {
        let page: Page = serde_json::from_str(
            r#"{"uid": "blt1", "title": "Editor", "url": "/editor", "blocks": null}"#,
        )
        .unwrap();
        assert!(page.blocks.is_empty());
    }

    #[test]
    fn editable_tags_are_ignored() {
        let page: Page = serde_json::from_str(
            r#"{
                "uid": "blt1", "title": "Home", "url": "/",
                "$": {"title": {"data-cslp": "page.blt1.en-us.title"}},
                "locale": "en-us",
                "_version": 4
            }"#,
        )
        .unwrap();
        assert_eq!(page.title, "Home");
    }

    #[test]
    fn missing_layout_defaults_to_image_right() {
        let block: Block = serde_json::from_str(r#"{"_metadata": {"uid": "x"}}"#).unwrap();
        assert_eq!(block.layout, Layout::ImageRight);
    }

    #[test]
    fn serialized_page_keeps_cms_field_names() {
        let page = Page {
            uid: "blt1".to_string(),
            title: "Home".to_string(),
            url: "/".to_string(),
            description: None,
            image: None,
            rich_text: None,
            blocks: vec![BlockItem {
                block: Block {
                    metadata: BlockMetadata {
                        uid: "cs1".to_string(),
                    },
                    title: None,
                    copy: None,
                    image: None,
                    layout: Layout::ImageLeft,
                },
            }],
        };
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["blocks"][0]["block"]["_metadata"]["uid"], "cs1");
        assert_eq!(json["blocks"][0]["block"]["layout"], "image_left");
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Subdirectory of the media root that receives generated images.
pub const GENERATED_DIR: &str = "generated";

/// The three images rendered for every story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageKind {
    /// Characters placed inside their environment.
    FullScene,
    /// Characters alone, for a character study.
    Character,
    /// Environment only, no characters.
    Background,
}

impl ImageKind {
    /// All kinds, in the order the pipeline renders them.
    pub const ALL: [ImageKind; 3] = [
        ImageKind::FullScene,
        ImageKind::Character,
        ImageKind::Background,
    ];

    /// File name of the rendered PNG.
    pub fn file_name(self) -> &'static str {
        match self {
            ImageKind::FullScene => "full_scene.png",
            ImageKind::Character => "character.png",
            ImageKind::Background => "background.png",
        }
    }

    /// On-disk location under `media_root`.
    pub fn path_in(self, media_root: &Path) -> PathBuf {
        media_root.join(GENERATED_DIR).join(self.file_name())
    }

    /// Public URL path under `media_url` (e.g. `/media/generated/character.png`).
    pub fn url_in(self, media_url: &str) -> String {
        let base = media_url.trim_end_matches('/');
        format!("{}/{}/{}", base, GENERATED_DIR, self.file_name())
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ImageKind::FullScene => "full scene",
            ImageKind::Character => "character",
            ImageKind::Background => "background",
        };
        f.write_str(label)
    }
}

/// Externally visible result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPayload {
    /// The prompt as submitted.
    pub prompt: String,
    /// Salient terms extracted from the prompt.
    pub key_objects: Vec<String>,
    pub short_story: String,
    pub character_description: String,
    pub background_description: String,
    pub full_scene_image: String,
    pub character_image: String,
    pub background_image: String,
    /// Unix timestamp appended by the form flow so browsers refetch images.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_buster: Option<i64>,
}

impl ResultPayload {
    /// Image URL for the given kind.
    pub fn image(&self, kind: ImageKind) -> &str {
        match kind {
            ImageKind::FullScene => &self.full_scene_image,
            ImageKind::Character => &self.character_image,
            ImageKind::Background => &self.background_image,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_fixed_per_kind() {
        let root = Path::new("/srv/media");
        assert_eq!(
            ImageKind::FullScene.path_in(root),
            PathBuf::from("/srv/media/generated/full_scene.png")
        );
        assert_eq!(
            ImageKind::Background.path_in(root),
            PathBuf::from("/srv/media/generated/background.png")
        );
    }

    #[test]
    fn test_url_tolerates_missing_trailing_slash() {
        assert_eq!(
            ImageKind::Character.url_in("/media/"),
            "/media/generated/character.png"
        );
        assert_eq!(
            ImageKind::Character.url_in("/media"),
            "/media/generated/character.png"
        );
    }

    #[test]
    fn test_cache_buster_omitted_when_absent() {
        let payload = ResultPayload {
            prompt: "p".into(),
            key_objects: vec!["p".into()],
            short_story: "s".into(),
            character_description: "c".into(),
            background_description: "b".into(),
            full_scene_image: ImageKind::FullScene.url_in("/media/"),
            character_image: ImageKind::Character.url_in("/media/"),
            background_image: ImageKind::Background.url_in("/media/"),
            cache_buster: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("cache_buster").is_none());
        assert_eq!(json["full_scene_image"], "/media/generated/full_scene.png");
        assert_eq!(payload.image(ImageKind::Background), "/media/generated/background.png");
    }
}

use std::sync::LazyLock;

use regex::{Captures, Regex};

static EMBED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[\[([^\]]+)\]\]").expect("embed pattern is valid"));

static HIGHLIGHT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"==([^=]+)==").expect("highlight pattern is valid"));

static IMAGE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)\s]+)\)").expect("image link pattern is valid"));

const AUDIO_EXTENSIONS: [&str; 7] = ["mp3", "m4a", "wav", "ogg", "aac", "flac", "webm"];

/// Rewrite Obsidian syntax into plain markdown.
///
/// `![[file]]` becomes `![file](file)` with the target percent-encoded, and
/// `==text==` becomes `<mark>text</mark>`.
pub fn preprocess(content: &str) -> String {
    let embedded = EMBED.replace_all(content, |caps: &Captures| {
        format!("![{}]({})", &caps[1], urlencoding::encode(&caps[1]))
    });

    HIGHLIGHT
        .replace_all(&embedded, "<mark>$1</mark>")
        .into_owned()
}

/// Image or audio embed that points at a group asset rather than a URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalAsset {
    pub alt: String,
    /// Decoded file name, last path segment only
    pub filename: String,
    pub is_audio: bool,
}

/// Local embeds of preprocessed markdown, in document order
pub fn local_assets(markdown: &str) -> Vec<LocalAsset> {
    IMAGE_LINK
        .captures_iter(markdown)
        .filter(|caps| !caps[2].starts_with("http"))
        .map(|caps| {
            let target = caps[2].rsplit('/').next().unwrap_or(&caps[2]);
            let filename = urlencoding::decode(target)
                .map(|name| name.into_owned())
                .unwrap_or_else(|_| target.to_string());
            let alt = if caps[1].is_empty() {
                filename.clone()
            } else {
                caps[1].to_string()
            };

            LocalAsset {
                is_audio: is_audio_file(&filename),
                alt,
                filename,
            }
        })
        .collect()
}

fn extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
}

pub fn is_audio_file(filename: &str) -> bool {
    extension(filename).is_some_and(|ext| AUDIO_EXTENSIONS.contains(&ext.as_str()))
}

/// How a file from a group is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Audio,
    Markdown,
}

impl FileKind {
    pub fn of(filename: &str) -> Self {
        if filename.to_lowercase().ends_with(".csv") {
            FileKind::Csv
        } else if is_audio_file(filename) {
            FileKind::Audio
        } else {
            FileKind::Markdown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_links() {
        assert_eq!(
            preprocess("see ![[cat picture.png]] here"),
            "see ![cat picture.png](cat%20picture.png) here"
        );
    }

    #[test]
    fn test_highlight() {
        assert_eq!(preprocess("a ==key== b"), "a <mark>key</mark> b");
        assert_eq!(preprocess("x == y"), "x == y");
    }

    #[test]
    fn test_multiple_rewrites() {
        let out = preprocess("![[a.mp3]]\n==one== and ==two==");
        assert_eq!(out, "![a.mp3](a.mp3)\n<mark>one</mark> and <mark>two</mark>");
    }

    #[test]
    fn test_local_assets() {
        let md = preprocess("![[word list.mp3]]\n![logo](https://x.test/a.png)\n![](img/cat.png)");
        let assets = local_assets(&md);
        assert_eq!(
            assets,
            vec![
                LocalAsset {
                    alt: "word list.mp3".to_string(),
                    filename: "word list.mp3".to_string(),
                    is_audio: true,
                },
                LocalAsset {
                    alt: "cat.png".to_string(),
                    filename: "cat.png".to_string(),
                    is_audio: false,
                },
            ]
        );
    }

    #[test]
    fn test_audio_detection() {
        assert!(is_audio_file("lesson.MP3"));
        assert!(is_audio_file("clip.webm"));
        assert!(!is_audio_file("notes.md"));
        assert!(!is_audio_file("mp3"));
    }

    #[test]
    fn test_file_kind() {
        assert_eq!(FileKind::of("Words.CSV"), FileKind::Csv);
        assert_eq!(FileKind::of("intro.m4a"), FileKind::Audio);
        assert_eq!(FileKind::of("README"), FileKind::Markdown);
    }
}

//! Saved file name value object

use std::fmt;

use crate::domain::recording::MediaType;

/// Base name used when the user leaves the name blank
pub const DEFAULT_BASE_NAME: &str = "testimonial";

/// Output file name, always carrying the media extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileName(String);

impl FileName {
    /// Normalize user input into a file name.
    ///
    /// Only the last path component is kept, so the name can never point
    /// outside the destination directory. Blank input (or a bare `.`/`..`)
    /// falls back to the default base name; the extension is appended unless
    /// already present.
    pub fn normalize(input: &str, media_type: MediaType) -> Self {
        let last = input
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default()
            .trim();
        let mut name = match last {
            "" | "." | ".." => DEFAULT_BASE_NAME.to_string(),
            other => other.to_string(),
        };

        let suffix = format!(".{}", media_type.extension());
        if !name.ends_with(&suffix) {
            name.push_str(&suffix);
        }
        Self(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Same name with ` (n)` inserted before the extension
    pub fn numbered(&self, n: u32) -> Self {
        match self.0.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => Self(format!("{} ({}).{}", stem, n, ext)),
            _ => Self(format!("{} ({})", self.0, n)),
        }
    }
}

impl fmt::Display for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn webm(input: &str) -> String {
        FileName::normalize(input, MediaType::Webm).to_string()
    }

    #[test]
    fn appends_extension() {
        assert_eq!(webm("clip"), "clip.webm");
    }

    #[test]
    fn blank_uses_default() {
        assert_eq!(webm(""), "testimonial.webm");
        assert_eq!(webm("   "), "testimonial.webm");
    }

    #[test]
    fn no_double_extension() {
        assert_eq!(webm("clip.webm"), "clip.webm");
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(webm("  my clip  "), "my clip.webm");
    }

    #[test]
    fn other_extension_still_gets_webm() {
        assert_eq!(webm("clip.mp4"), "clip.mp4.webm");
    }

    #[test]
    fn directories_are_stripped() {
        assert_eq!(webm("/tmp/elsewhere/evil"), "evil.webm");
        assert_eq!(webm("../up"), "up.webm");
        assert_eq!(webm("..\\..\\win"), "win.webm");
        assert_eq!(webm("nested/clip.webm"), "clip.webm");
    }

    #[test]
    fn bare_dots_use_default() {
        assert_eq!(webm(".."), "testimonial.webm");
        assert_eq!(webm("clips/."), "testimonial.webm");
        assert_eq!(webm("clips/"), "testimonial.webm");
    }

    #[test]
    fn numbered_goes_before_extension() {
        let name = FileName::normalize("clip", MediaType::Webm);
        assert_eq!(name.numbered(1).as_str(), "clip (1).webm");
        assert_eq!(name.numbered(12).as_str(), "clip (12).webm");
    }
}

//! Visual presets and output formats for posters.
//!
//! Both registries are fixed at compile time. Lookups by label never fail:
//! unknown labels fall back to [`StylePreset::DEFAULT`] / [`FormatSpec::DEFAULT`].

use serde::{Deserialize, Serialize};

/// Colors, typography and card decoration for one preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleParams {
    pub background: &'static str,
    pub text: &'static str,
    pub accent: &'static str,
    /// CSS `font-family` value.
    pub font_family: &'static str,
    /// CSS declarations applied to the ingredient and step cards.
    pub card: &'static str,
}

/// Named visual preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StylePreset {
    MinimalistLuxury,
    RetroChalkboard,
    NeonPopArt,
    HomeyHandwritten,
    ModernBento,
}

impl StylePreset {
    pub const ALL: [StylePreset; 5] = [
        StylePreset::MinimalistLuxury,
        StylePreset::RetroChalkboard,
        StylePreset::NeonPopArt,
        StylePreset::HomeyHandwritten,
        StylePreset::ModernBento,
    ];

    pub const DEFAULT: StylePreset = StylePreset::ModernBento;

    pub fn label(self) -> &'static str {
        match self {
            StylePreset::MinimalistLuxury => "Minimalist Luxury",
            StylePreset::RetroChalkboard => "Retro Chalkboard",
            StylePreset::NeonPopArt => "Neon Pop Art",
            StylePreset::HomeyHandwritten => "Homey Handwritten",
            StylePreset::ModernBento => "Modern Bento",
        }
    }

    /// Exact label match, no fallback.
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.label().eq_ignore_ascii_case(label))
    }

    /// Look up a preset by label, falling back to [`StylePreset::DEFAULT`].
    pub fn from_label(label: &str) -> Self {
        Self::parse(label).unwrap_or_else(|| {
            tracing::warn!(label, fallback = Self::DEFAULT.label(), "Unknown style preset");
            Self::DEFAULT
        })
    }

    /// Style used for the second, comparison variant.
    pub fn comparison_alternative(self) -> Self {
        if self == StylePreset::ModernBento {
            StylePreset::NeonPopArt
        } else {
            StylePreset::ModernBento
        }
    }

    pub fn params(self) -> StyleParams {
        match self {
            StylePreset::MinimalistLuxury => StyleParams {
                background: "#ffffff",
                text: "#1a1a1a",
                accent: "#af9164",
                font_family: "'Playfair Display', serif",
                card: "border: 1px solid #eee; background: #fff;",
            },
            StylePreset::RetroChalkboard => StyleParams {
                background: "#1e1e1e",
                text: "#ffffff",
                accent: "#feb236",
                font_family: "'Indie Flower', cursive",
                card: "border: 2px dashed #fff; background: #262626;",
            },
            StylePreset::NeonPopArt => StyleParams {
                background: "#0f0c29",
                text: "#00f2fe",
                accent: "#ff0080",
                font_family: "'Orbitron', sans-serif",
                card: "border: none; background: rgba(255,255,255,0.1); backdrop-filter: blur(10px); box-shadow: 0 0 15px #ff0080;",
            },
            StylePreset::HomeyHandwritten => StyleParams {
                background: "#fdf5e6",
                text: "#5d4037",
                accent: "#8bc34a",
                font_family: "'Caveat', cursive",
                card: "border-radius: 20px; background: #fff; box-shadow: 5px 5px 0px #8bc34a;",
            },
            StylePreset::ModernBento => StyleParams {
                background: "#f0f2f5",
                text: "#1c1e21",
                accent: "#007bff",
                font_family: "'Inter', sans-serif",
                card: "border-radius: 12px; background: #fff; border: 1px solid #e1e4e8;",
            },
        }
    }
}

impl std::fmt::Display for StylePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Named output layout with fixed pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormatSpec {
    InstagramStory,
    SquarePost,
    PrintA4,
}

impl FormatSpec {
    pub const ALL: [FormatSpec; 3] = [
        FormatSpec::InstagramStory,
        FormatSpec::SquarePost,
        FormatSpec::PrintA4,
    ];

    pub const DEFAULT: FormatSpec = FormatSpec::SquarePost;

    pub fn label(self) -> &'static str {
        match self {
            FormatSpec::InstagramStory => "Instagram Story (9:16)",
            FormatSpec::SquarePost => "Square Post (1:1)",
            FormatSpec::PrintA4 => "Print A4",
        }
    }

    /// Exact label match, no fallback. "Cetak A4" is accepted for print.
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.eq_ignore_ascii_case("Cetak A4") {
            return Some(FormatSpec::PrintA4);
        }
        Self::ALL
            .into_iter()
            .find(|f| f.label().eq_ignore_ascii_case(label))
    }

    /// Look up a format by label, falling back to [`FormatSpec::DEFAULT`].
    pub fn from_label(label: &str) -> Self {
        Self::parse(label).unwrap_or_else(|| {
            tracing::warn!(label, fallback = Self::DEFAULT.label(), "Unknown poster format");
            Self::DEFAULT
        })
    }

    /// (width, height) in CSS pixels.
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            FormatSpec::InstagramStory => (400, 711),
            FormatSpec::SquarePost => (500, 500),
            FormatSpec::PrintA4 => (595, 842),
        }
    }
}

impl std::fmt::Display for FormatSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

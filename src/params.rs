//! Generation modes and the static option tables keyed by mode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Top-level generation variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Red envelope cover image.
    #[default]
    Image,
    /// Festive character avatar.
    Avatar,
}

impl Mode {
    /// Wire name of the mode.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Avatar => "avatar",
        }
    }

    /// Option table for this mode.
    #[must_use]
    pub fn options(self) -> &'static OptionTable {
        match self {
            Self::Image => &IMAGE_OPTIONS,
            Self::Avatar => &AVATAR_OPTIONS,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(Self::Image),
            "avatar" => Ok(Self::Avatar),
            _ => Err(format!("Unsupported mode '{s}'. Valid: image, avatar")),
        }
    }
}

/// A selectable value with its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    /// Value stored in settings and sent on the wire.
    pub value: &'static str,
    /// Human-readable label.
    pub label: &'static str,
}

const fn choice(value: &'static str, label: &'static str) -> Choice {
    Choice { value, label }
}

/// Settings fields whose values are constrained by the mode's option table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// AI model selector.
    AiModel,
    /// Output resolution.
    Resolution,
    /// Visual style.
    Style,
    /// Background treatment.
    Background,
    /// Lighting setup.
    Lighting,
    /// Character pose.
    Pose,
    /// Aspect ratio.
    AspectRatio,
}

impl Field {
    /// Every constrained field, in display order.
    pub const ALL: [Self; 7] = [
        Self::AiModel,
        Self::Resolution,
        Self::Style,
        Self::Background,
        Self::Lighting,
        Self::Pose,
        Self::AspectRatio,
    ];

    /// Display name, as used in messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::AiModel => "AI model",
            Self::Resolution => "resolution",
            Self::Style => "style",
            Self::Background => "background",
            Self::Lighting => "lighting",
            Self::Pose => "pose",
            Self::AspectRatio => "aspect ratio",
        }
    }
}

/// Everything that varies by mode: option sets, defaults and display copy.
#[derive(Debug)]
pub struct OptionTable {
    ai_models: &'static [Choice],
    resolutions: &'static [Choice],
    styles: &'static [Choice],
    backgrounds: &'static [Choice],
    lighting: &'static [Choice],
    poses: &'static [Choice],
    aspect_ratios: &'static [Choice],
    /// Placeholder shown in the empty prompt box.
    pub placeholder: &'static str,
    /// Prompt suggestions offered under the prompt box.
    pub suggestions: &'static [&'static str],
    /// Status lines cycled while a request is in flight.
    pub loading_texts: &'static [&'static str],
    /// Rough duration hint shown while loading.
    pub estimate: &'static str,
    /// Simulated progress added per tick.
    pub progress_step: f32,
}

impl OptionTable {
    /// Valid choices for a field.
    #[must_use]
    pub fn choices(&self, field: Field) -> &'static [Choice] {
        match field {
            Field::AiModel => self.ai_models,
            Field::Resolution => self.resolutions,
            Field::Style => self.styles,
            Field::Background => self.backgrounds,
            Field::Lighting => self.lighting,
            Field::Pose => self.poses,
            Field::AspectRatio => self.aspect_ratios,
        }
    }

    /// Default value for a field. Always a member of [`Self::choices`].
    #[must_use]
    pub fn default_value(&self, field: Field) -> &'static str {
        match field {
            Field::AiModel => "imagen-3.0-generate-002",
            Field::Resolution => "1024x1024",
            Field::Style => "artistic",
            Field::Background | Field::Lighting => "studio",
            Field::Pose => "profile",
            Field::AspectRatio => "9:16",
        }
    }

    /// Whether `value` is a valid choice for `field`.
    #[must_use]
    pub fn allows(&self, field: Field, value: &str) -> bool {
        self.choices(field).iter().any(|c| c.value == value)
    }
}

const AI_MODELS: &[Choice] = &[choice("imagen-3.0-generate-002", "Imagen 3")];

const COMMON_LIGHTING: &[Choice] = &[
    choice("soft", "Soft"),
    choice("dramatic", "Dramatic"),
    choice("natural", "Natural"),
    choice("studio", "Studio"),
];

const ASPECT_RATIOS: &[Choice] = &[
    choice("1:1", "1:1 Square"),
    choice("9:16", "9:16 Portrait"),
    choice("16:9", "16:9 Landscape"),
    choice("4:3", "4:3 Landscape"),
    choice("3:4", "3:4 Portrait"),
];

static IMAGE_OPTIONS: OptionTable = OptionTable {
    ai_models: AI_MODELS,
    resolutions: &[
        choice("512x512", "512×512"),
        choice("768x768", "768×768"),
        choice("1024x1024", "1024×1024"),
        choice("1536x1536", "1536×1536"),
    ],
    styles: &[
        choice("professional", "Professional"),
        choice("artistic", "Artistic"),
        choice("casual", "Casual"),
        choice("vintage", "Vintage"),
    ],
    backgrounds: &[
        choice("studio", "Studio"),
        choice("gradient", "Gradient"),
        choice("solid", "Solid Color"),
        choice("transparent", "Transparent"),
        choice("outdoor", "Outdoor"),
        choice("office", "Office"),
    ],
    lighting: COMMON_LIGHTING,
    poses: &[
        choice("headshot", "Headshot"),
        choice("half-body", "Half Body"),
        choice("full-body", "Full Body"),
        choice("profile", "Profile"),
    ],
    aspect_ratios: ASPECT_RATIOS,
    placeholder: "金色祥云与红色灯笼，新年喜庆氛围",
    suggestions: &[
        "红色背景配金色祥云，春节喜庆氛围",
        "粉色樱花飘落，浪漫唯美风格",
        "金色鲤鱼跃龙门，寓意吉祥如意",
        "红色灯笼与烟花，热闹新年气氛",
    ],
    loading_texts: &["正在生成红包封面...", "添加喜庆元素...", "完善细节中..."],
    estimate: "This usually takes 10-15 seconds",
    progress_step: 1.5,
};

static AVATAR_OPTIONS: OptionTable = OptionTable {
    ai_models: AI_MODELS,
    resolutions: &[
        choice("512x512", "512×512"),
        choice("768x768", "768×768"),
        choice("1024x1024", "1024×1024"),
        choice("2048x2048", "2048×2048"),
    ],
    styles: &[
        choice("professional", "Professional"),
        choice("artistic", "Artistic"),
        choice("casual", "Casual"),
        choice("vintage", "Vintage"),
        choice("cartoon", "Cartoon"),
        choice("anime", "Anime"),
    ],
    backgrounds: &[
        choice("studio", "Studio"),
        choice("gradient", "Gradient"),
        choice("solid", "Solid Color"),
        choice("transparent", "Transparent"),
    ],
    lighting: COMMON_LIGHTING,
    poses: &[
        choice("headshot", "Headshot"),
        choice("half-body", "Half Body"),
        choice("full-body", "Full Body"),
        choice("profile", "Profile"),
        choice("bust", "Bust"),
    ],
    aspect_ratios: ASPECT_RATIOS,
    placeholder: "可爱的卡通龙宝宝，穿着红色唐装",
    suggestions: &[
        "可爱的卡通财神爷，手持金元宝",
        "萌萌的小龙人，穿着红色新年装",
        "Q版福娃，手拿春联和红包",
        "卡通锦鲤，金光闪闪喜气洋洋",
    ],
    loading_texts: &["正在创建角色...", "添加节日装扮...", "完善细节中..."],
    estimate: "This usually takes 30-45 seconds",
    progress_step: 0.5,
};

/// Aspect ratio used when a request omits one.
pub const DEFAULT_ASPECT_RATIO: &str = "9:16";

/// Validate a settings value against the mode's option table.
///
/// # Errors
///
/// Returns an error naming the valid choices if `value` is not one of them.
pub fn validate_choice(mode: Mode, field: Field, value: &str) -> Result<(), String> {
    let table = mode.options();
    if table.allows(field, value) {
        return Ok(());
    }
    let valid: Vec<&str> = table.choices(field).iter().map(|c| c.value).collect();
    Err(format!("Unsupported {} '{value}' for {mode} mode. Valid: {valid:?}", field.name()))
}

/// Human-readable listing of everything `mode` offers: prompt placeholder,
/// suggestions, each field's choices (default marked `*`) and the time estimate.
#[must_use]
pub fn describe_options(mode: Mode) -> String {
    let table = mode.options();
    let mut out = format!("Mode: {mode}\nPlaceholder: {}\nSuggestions:\n", table.placeholder);
    for (i, suggestion) in table.suggestions.iter().enumerate() {
        out.push_str(&format!("  {i}. {suggestion}\n"));
    }
    for field in Field::ALL {
        out.push_str(&format!("{}:\n", field.name()));
        let default = table.default_value(field);
        for choice in table.choices(field) {
            let marker = if choice.value == default { '*' } else { ' ' };
            out.push_str(&format!("  {marker} {:<24} {}\n", choice.value, choice.label));
        }
    }
    out.push_str(table.estimate);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parses_wire_names() {
        assert_eq!("image".parse::<Mode>().unwrap(), Mode::Image);
        assert_eq!("avatar".parse::<Mode>().unwrap(), Mode::Avatar);
        assert!("video".parse::<Mode>().is_err());
    }

    #[test]
    fn mode_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&Mode::Avatar).unwrap(), "\"avatar\"");
        let mode: Mode = serde_json::from_str("\"image\"").unwrap();
        assert_eq!(mode, Mode::Image);
    }

    #[test]
    fn defaults_are_valid_in_every_mode() {
        for mode in [Mode::Image, Mode::Avatar] {
            let table = mode.options();
            for field in Field::ALL {
                assert!(
                    table.allows(field, table.default_value(field)),
                    "default for {field:?} invalid in {mode}"
                );
            }
        }
    }

    #[test]
    fn mode_specific_choices() {
        assert!(Mode::Avatar.options().allows(Field::Style, "cartoon"));
        assert!(!Mode::Image.options().allows(Field::Style, "cartoon"));
        assert!(Mode::Image.options().allows(Field::Background, "outdoor"));
        assert!(!Mode::Avatar.options().allows(Field::Background, "outdoor"));
        assert!(Mode::Avatar.options().allows(Field::Resolution, "2048x2048"));
        assert!(!Mode::Image.options().allows(Field::Resolution, "2048x2048"));
        assert!(Mode::Avatar.options().allows(Field::Pose, "bust"));
    }

    #[test]
    fn validate_choice_names_valid_values() {
        assert!(validate_choice(Mode::Avatar, Field::Style, "anime").is_ok());
        let err = validate_choice(Mode::Image, Field::Style, "anime").unwrap_err();
        assert!(err.contains("Unsupported style 'anime' for image mode"));
        assert!(err.contains("artistic"));
    }

    #[test]
    fn describe_lists_labels_and_marks_defaults() {
        let text = describe_options(Mode::Avatar);
        assert!(text.starts_with("Mode: avatar\nPlaceholder: 可爱的卡通龙宝宝，穿着红色唐装\n"));
        assert!(text.contains("  0. 可爱的卡通财神爷，手持金元宝\n"));
        assert!(text.contains("style:\n"));
        assert!(text.contains("anime"));
        assert!(text.lines().any(|l| l.starts_with("  * 9:16")));
        assert!(text.ends_with("This usually takes 30-45 seconds\n"));

        let image = describe_options(Mode::Image);
        let imagen = image.lines().find(|l| l.contains("imagen-3.0-generate-002")).unwrap();
        assert!(imagen.starts_with("  * ") && imagen.ends_with("Imagen 3"));
    }

    #[test]
    fn loading_texts_and_rates_differ_by_mode() {
        assert_eq!(Mode::Image.options().loading_texts.len(), 3);
        assert!(Mode::Image.options().progress_step > Mode::Avatar.options().progress_step);
        assert_eq!(Mode::Avatar.options().suggestions.len(), 4);
    }
}

//! User-editable generation settings and their reconciliation against a mode.

use crate::params::{Field, Mode};
use crate::ports::GenerationRequest;

/// Negative prompt a fresh session starts with.
pub const DEFAULT_NEGATIVE_PROMPT: &str = "blurry, low quality, distorted features";

/// Settings owned by the session; read at submission time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSettings {
    /// Visual style.
    pub style: String,
    /// Background treatment.
    pub background: String,
    /// Lighting setup.
    pub lighting: String,
    /// Character pose.
    pub pose: String,
    /// Aspect ratio.
    pub aspect_ratio: String,
    /// AI model selector. Kept client-side; the server picks the provider model.
    pub ai_model: String,
    /// Resolution. Sent on the wire, not forwarded to the provider.
    pub resolution: String,
    /// Prompt text.
    pub prompt: String,
    /// Extra terms to avoid.
    pub negative_prompt: String,
    /// Advanced: seed.
    pub seed: Option<u64>,
    /// Advanced: sampling steps.
    pub steps: Option<u32>,
}

impl GenerationSettings {
    /// Fresh settings for `mode`, every constrained field at its default.
    #[must_use]
    pub fn defaults_for(mode: Mode) -> Self {
        let table = mode.options();
        Self {
            style: table.default_value(Field::Style).to_string(),
            background: table.default_value(Field::Background).to_string(),
            lighting: table.default_value(Field::Lighting).to_string(),
            pose: table.default_value(Field::Pose).to_string(),
            aspect_ratio: table.default_value(Field::AspectRatio).to_string(),
            ai_model: table.default_value(Field::AiModel).to_string(),
            resolution: table.default_value(Field::Resolution).to_string(),
            prompt: String::new(),
            negative_prompt: DEFAULT_NEGATIVE_PROMPT.to_string(),
            seed: None,
            steps: None,
        }
    }

    /// Current value of a constrained field.
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::AiModel => &self.ai_model,
            Field::Resolution => &self.resolution,
            Field::Style => &self.style,
            Field::Background => &self.background,
            Field::Lighting => &self.lighting,
            Field::Pose => &self.pose,
            Field::AspectRatio => &self.aspect_ratio,
        }
    }

    fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::AiModel => &mut self.ai_model,
            Field::Resolution => &mut self.resolution,
            Field::Style => &mut self.style,
            Field::Background => &mut self.background,
            Field::Lighting => &mut self.lighting,
            Field::Pose => &mut self.pose,
            Field::AspectRatio => &mut self.aspect_ratio,
        }
    }

    /// Set a constrained field if `value` is valid for `mode`.
    /// Returns whether the value was accepted.
    pub fn set(&mut self, mode: Mode, field: Field, value: &str) -> bool {
        if !mode.options().allows(field, value) {
            return false;
        }
        *self.slot(field) = value.to_string();
        true
    }

    /// Reset every field that `mode` does not allow to that mode's default.
    /// Returns the fields that were reset.
    pub fn reconcile(&mut self, mode: Mode) -> Vec<Field> {
        let table = mode.options();
        let mut reset = Vec::new();
        for field in Field::ALL {
            if !table.allows(field, self.get(field)) {
                *self.slot(field) = table.default_value(field).to_string();
                reset.push(field);
            }
        }
        reset
    }

    /// Serialize into the request body for `mode`.
    #[must_use]
    pub fn to_request(&self, mode: Mode) -> GenerationRequest {
        let non_empty = |s: &str| (!s.trim().is_empty()).then(|| s.to_string());
        GenerationRequest {
            prompt: self.prompt.clone(),
            negative_prompt: non_empty(&self.negative_prompt),
            aspect_ratio: non_empty(&self.aspect_ratio),
            resolution: non_empty(&self.resolution),
            style: non_empty(&self.style),
            mode,
        }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self::defaults_for(Mode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_rejects_values_outside_mode_table() {
        let mut settings = GenerationSettings::default();
        assert!(!settings.set(Mode::Image, Field::Style, "anime"));
        assert_eq!(settings.style, "artistic");
        assert!(settings.set(Mode::Avatar, Field::Style, "anime"));
        assert_eq!(settings.style, "anime");
    }

    #[test]
    fn reconcile_resets_only_invalid_fields() {
        let mut settings = GenerationSettings::defaults_for(Mode::Avatar);
        settings.set(Mode::Avatar, Field::Style, "cartoon");
        settings.set(Mode::Avatar, Field::Pose, "bust");
        settings.set(Mode::Avatar, Field::Resolution, "2048x2048");
        settings.set(Mode::Avatar, Field::Lighting, "dramatic");
        settings.prompt = "财神爷".into();

        let reset = settings.reconcile(Mode::Image);
        assert_eq!(reset, vec![Field::Resolution, Field::Style, Field::Pose]);
        assert_eq!(settings.style, "artistic");
        assert_eq!(settings.pose, "profile");
        assert_eq!(settings.resolution, "1024x1024");
        assert_eq!(settings.lighting, "dramatic");
        assert_eq!(settings.prompt, "财神爷");
    }

    #[test]
    fn reconcile_is_a_no_op_for_valid_settings() {
        let mut settings = GenerationSettings::default();
        assert!(settings.reconcile(Mode::Avatar).is_empty());
    }

    #[test]
    fn to_request_carries_mode_and_drops_blank_fields() {
        let mut settings = GenerationSettings::default();
        settings.prompt = "金色祥云".into();
        settings.negative_prompt = "  ".into();

        let request = settings.to_request(Mode::Avatar);
        assert_eq!(request.prompt, "金色祥云");
        assert_eq!(request.mode, Mode::Avatar);
        assert!(request.negative_prompt.is_none());
        assert_eq!(request.aspect_ratio.as_deref(), Some("9:16"));
        assert_eq!(request.style.as_deref(), Some("artistic"));
        assert_eq!(request.resolution.as_deref(), Some("1024x1024"));
    }
}

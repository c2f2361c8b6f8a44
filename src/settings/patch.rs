//! Field-level settings updates.

use serde::{Deserialize, Deserializer};

use super::{
    BackgroundPattern, ContentType, DotStyle, ErrorCorrection, GradientType, LabelAlignment,
    LabelFont, LabelWeight, Settings,
};

/// Distinguishes an absent `logo` key (leave unchanged) from `"logo": null` (remove).
fn deserialize_logo<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// A partial update. Every `Some` field overwrites the matching setting;
/// `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    pub content_type: Option<ContentType>,
    pub data: Option<String>,
    pub foreground_color: Option<String>,
    pub background_color: Option<String>,
    pub size: Option<u32>,
    pub margin: Option<u32>,
    pub error_correction_level: Option<ErrorCorrection>,
    pub dot_style: Option<DotStyle>,
    #[serde(deserialize_with = "deserialize_logo")]
    pub logo: Option<Option<String>>,
    pub logo_size: Option<u8>,
    pub logo_opacity: Option<u8>,
    pub label_text: Option<String>,
    pub label_color: Option<String>,
    pub label_size: Option<u32>,
    pub label_font: Option<LabelFont>,
    pub label_alignment: Option<LabelAlignment>,
    pub label_weight: Option<LabelWeight>,
    pub gradient_enabled: Option<bool>,
    pub gradient_start: Option<String>,
    pub gradient_end: Option<String>,
    pub gradient_type: Option<GradientType>,
    pub background_pattern: Option<BackgroundPattern>,
    pub glow_effect: Option<bool>,
    pub outline_color: Option<String>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        *self == SettingsPatch::default()
    }

    /// Merge this patch into `settings`, then clamp ranged fields.
    pub fn apply(self, settings: &mut Settings) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(v) = value {
                *slot = v;
            }
        }

        set(&mut settings.content_type, self.content_type);
        set(&mut settings.data, self.data);
        set(&mut settings.foreground_color, self.foreground_color);
        set(&mut settings.background_color, self.background_color);
        set(&mut settings.size, self.size);
        set(&mut settings.margin, self.margin);
        set(&mut settings.error_correction_level, self.error_correction_level);
        set(&mut settings.dot_style, self.dot_style);
        set(&mut settings.logo, self.logo);
        set(&mut settings.logo_size, self.logo_size);
        set(&mut settings.logo_opacity, self.logo_opacity);
        set(&mut settings.label_text, self.label_text);
        set(&mut settings.label_color, self.label_color);
        set(&mut settings.label_size, self.label_size);
        set(&mut settings.label_font, self.label_font);
        set(&mut settings.label_alignment, self.label_alignment);
        set(&mut settings.label_weight, self.label_weight);
        set(&mut settings.gradient_enabled, self.gradient_enabled);
        set(&mut settings.gradient_start, self.gradient_start);
        set(&mut settings.gradient_end, self.gradient_end);
        set(&mut settings.gradient_type, self.gradient_type);
        set(&mut settings.background_pattern, self.background_pattern);
        set(&mut settings.glow_effect, self.glow_effect);
        set(&mut settings.outline_color, self.outline_color);

        *settings = std::mem::take(settings).normalized();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_merges_only_given_fields() {
        let mut settings = Settings {
            data: "https://example.com".into(),
            label_text: "Scan me".into(),
            ..Default::default()
        };
        SettingsPatch {
            foreground_color: Some("#000000".into()),
            ..Default::default()
        }
        .apply(&mut settings);

        assert_eq!(settings.foreground_color, "#000000");
        assert_eq!(settings.data, "https://example.com");
        assert_eq!(settings.label_text, "Scan me");
    }

    #[test]
    fn test_apply_clamps() {
        let mut settings = Settings::default();
        SettingsPatch {
            size: Some(10),
            margin: Some(99),
            ..Default::default()
        }
        .apply(&mut settings);
        assert_eq!(settings.size, 200);
        assert_eq!(settings.margin, 20);
    }

    #[test]
    fn test_logo_null_removes_and_absent_keeps() {
        let mut settings = Settings {
            logo: Some("data:image/png;base64,AAAA".into()),
            ..Default::default()
        };

        let keep: SettingsPatch = serde_json::from_str(r#"{"logoSize": 40}"#).unwrap();
        assert_eq!(keep.logo, None);
        keep.apply(&mut settings);
        assert!(settings.logo.is_some());
        assert_eq!(settings.logo_size, 40);

        let remove: SettingsPatch = serde_json::from_str(r#"{"logo": null}"#).unwrap();
        assert_eq!(remove.logo, Some(None));
        remove.apply(&mut settings);
        assert!(settings.logo.is_none());
    }

    #[test]
    fn test_empty_patch() {
        let patch: SettingsPatch = serde_json::from_str("{}").unwrap();
        assert!(patch.is_empty());
    }
}

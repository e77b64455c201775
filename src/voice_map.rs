use std::collections::HashMap;

pub const VOICE_ENV_PREFIX: &str = "VOICE_";

/// Language tag to voice identifier lookup built once at startup
#[derive(Debug, Clone, Default)]
pub struct VoiceMap {
    voices: HashMap<String, String>,
}

impl VoiceMap {
    pub fn from_env() -> Self {
        Self::from_entries(std::env::vars())
    }

    /// Entries whose key carries the `VOICE_` prefix and whose value is
    /// non-empty contribute `stripped-key -> value`. The stripped key is
    /// stored verbatim, no case folding or format validation.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        let voices = entries
            .into_iter()
            .filter_map(|(key, value)| {
                let language = key.strip_prefix(VOICE_ENV_PREFIX)?;
                if value.is_empty() {
                    return None;
                }
                Some((language.to_owned(), value))
            })
            .collect();
        VoiceMap { voices }
    }

    /// Exact match wins, then the prefix before the first `-`, then the
    /// default voice. An empty tag always selects the default.
    pub fn choose<'a>(&'a self, language: &str, default_voice: &'a str) -> &'a str {
        if language.is_empty() {
            return default_voice;
        }
        if let Some(voice) = self.voices.get(language) {
            return voice;
        }
        if let Some((prefix, _)) = language.split_once('-') {
            if let Some(voice) = self.voices.get(prefix) {
                return voice;
            }
        }
        default_voice
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn loader_keeps_prefixed_entries_only() {
        let map = VoiceMap::from_entries(entries(&[
            ("VOICE_en", "Bella"),
            ("VOICE_de", "Antoni"),
            ("PATH", "/usr/bin"),
            ("OPENAI_API_KEY", "sk-test"),
        ]));
        assert_eq!(map.len(), 2);
        assert_eq!(map.choose("en", "fallback"), "Bella");
        assert_eq!(map.choose("de", "fallback"), "Antoni");
    }

    #[test]
    fn loader_skips_empty_values() {
        let map = VoiceMap::from_entries(entries(&[("VOICE_en", "")]));
        assert!(map.is_empty());
        assert_eq!(map.choose("en", "fallback"), "fallback");
    }

    #[test]
    fn empty_tag_selects_default() {
        let map = VoiceMap::from_entries(entries(&[("VOICE_en", "Bella")]));
        assert_eq!(map.choose("", "fallback"), "fallback");
    }

    #[test]
    fn unknown_tag_without_separator_selects_default() {
        let map = VoiceMap::from_entries(entries(&[("VOICE_en", "Bella")]));
        assert_eq!(map.choose("sw", "fallback"), "fallback");
    }

    #[test]
    fn regional_tag_falls_back_to_language_prefix() {
        let map = VoiceMap::from_entries(entries(&[("VOICE_en", "Bella")]));
        assert_eq!(map.choose("en-GB", "fallback"), "Bella");
    }

    #[test]
    fn exact_match_beats_prefix_match() {
        let map = VoiceMap::from_entries(entries(&[
            ("VOICE_en", "Bella"),
            ("VOICE_en-GB", "Charlotte"),
        ]));
        assert_eq!(map.choose("en-GB", "fallback"), "Charlotte");
        assert_eq!(map.choose("en", "fallback"), "Bella");
    }

    #[test]
    fn unknown_regional_tag_selects_default() {
        let map = VoiceMap::from_entries(entries(&[("VOICE_de", "Antoni")]));
        assert_eq!(map.choose("fr-CA", "fallback"), "fallback");
    }
}

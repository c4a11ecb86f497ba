//! Language identification

use whatlang::Lang;

/// Best-effort language identification.
///
/// Returns an ISO language code, or `None` when the input is too short or
/// too ambiguous for a confident guess. Identification never fails loudly;
/// an absent result is an ordinary outcome the router consumes.
pub trait LanguageIdentifier: Send + Sync {
    fn identify(&self, text: &str) -> Option<String>;
}

/// Trigram-based identifier backed by `whatlang`
#[derive(Debug, Clone, Default)]
pub struct WhatlangIdentifier {
    /// Accept detections whatlang itself flags as unreliable
    accept_unreliable: bool,
}

impl WhatlangIdentifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also return low-confidence detections
    pub fn accept_unreliable(mut self, accept: bool) -> Self {
        self.accept_unreliable = accept;
        self
    }
}

impl LanguageIdentifier for WhatlangIdentifier {
    fn identify(&self, text: &str) -> Option<String> {
        let info = whatlang::detect(text)?;
        if !info.is_reliable() && !self.accept_unreliable {
            tracing::trace!(
                lang = info.lang().code(),
                confidence = info.confidence(),
                "Discarding unreliable language detection"
            );
            return None;
        }

        Some(iso_code(info.lang()).to_string())
    }
}

/// ISO 639-1 for the languages the router cares about, 639-3 otherwise
fn iso_code(lang: Lang) -> &'static str {
    match lang {
        Lang::Hin => "hi",
        Lang::Eng => "en",
        other => other.code(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifies_devanagari_hindi() {
        let identifier = WhatlangIdentifier::new().accept_unreliable(true);
        let lang = identifier.identify("मुझे यह फिल्म बहुत पसंद है, यह बहुत अच्छी है");
        assert_eq!(lang.as_deref(), Some("hi"));
    }

    #[test]
    fn test_identifies_english() {
        let identifier = WhatlangIdentifier::new().accept_unreliable(true);
        let lang = identifier.identify(
            "The weather today is absolutely wonderful and everyone is enjoying the sunshine",
        );
        assert_eq!(lang.as_deref(), Some("en"));
    }

    #[test]
    fn test_empty_input_is_absent() {
        let identifier = WhatlangIdentifier::new();
        assert_eq!(identifier.identify(""), None);
        assert_eq!(identifier.identify("123 !!"), None);
    }
}

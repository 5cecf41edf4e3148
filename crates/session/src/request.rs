//! Diagram generation requests.

use anyhow::bail;
use derive_more::Display;
use serde::de::value::StringDeserializer;
use serde::de::IntoDeserializer;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const AUTO: &str = "auto";

/// Output language of a generated diagram.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Language {
    #[display(fmt = "ja")]
    Ja,

    #[default]
    #[display(fmt = "en")]
    En,
}

impl From<String> for Language {
    /// Anything but `"ja"` is English.
    fn from(name: String) -> Self {
        if name.eq_ignore_ascii_case("ja") {
            Self::Ja
        } else {
            Self::En
        }
    }
}

/// Kind of diagram to generate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramType {
    #[default]
    #[display(fmt = "flowchart")]
    Flowchart,

    #[display(fmt = "sequence")]
    Sequence,

    #[display(fmt = "gantt")]
    Gantt,

    #[display(fmt = "class")]
    Class,

    #[display(fmt = "er")]
    Er,

    #[display(fmt = "state")]
    State,

    #[display(fmt = "journey")]
    Journey,
}

/// A hint that is either `auto` (let the backend decide) or a fixed value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Hint<T> {
    #[default]
    Auto,
    Fixed(T),
}

impl<T: Copy> Hint<T> {
    /// `None` for `auto`, otherwise the fixed value.
    pub fn normalized(&self) -> Option<T> {
        match self {
            Self::Auto => None,
            Self::Fixed(value) => Some(*value),
        }
    }
}

impl<T> From<Option<T>> for Hint<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Auto, Self::Fixed)
    }
}

impl<T: Serialize> Serialize for Hint<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Auto => serializer.serialize_str(AUTO),
            Self::Fixed(value) => value.serialize(serializer),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Hint<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        if name == AUTO {
            return Ok(Self::Auto);
        }
        let value: StringDeserializer<D::Error> = name.into_deserializer();
        T::deserialize(value).map(Self::Fixed)
    }
}

/// What the user asked for. Kept by the session so a retry can resend it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramRequest {
    pub prompt: String,

    #[serde(default)]
    pub language_hint: Hint<Language>,

    #[serde(default)]
    pub diagram_type_hint: Hint<DiagramType>,
}

impl DiagramRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            language_hint: Hint::Auto,
            diagram_type_hint: Hint::Auto,
        }
    }

    pub fn language(mut self, language: Language) -> Self {
        self.language_hint = Hint::Fixed(language);
        self
    }

    pub fn diagram_type(mut self, diagram_type: DiagramType) -> Self {
        self.diagram_type_hint = Hint::Fixed(diagram_type);
        self
    }

    /// Reject requests the backend would refuse.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.prompt.trim().is_empty() {
            bail!("Prompt must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_hints_default_to_auto() {
        let request: DiagramRequest = serde_json::from_str(r#"{"prompt": "login flow"}"#).unwrap();
        assert_eq!(request.language_hint.normalized(), None);
        assert_eq!(request.diagram_type_hint.normalized(), None);
    }

    #[test]
    fn test_hints_parse_fixed_and_auto() {
        let request: DiagramRequest = serde_json::from_str(
            r#"{"prompt": "p", "language_hint": "auto", "diagram_type_hint": "sequence"}"#,
        )
        .unwrap();
        assert_eq!(request.language_hint, Hint::Auto);
        assert_eq!(request.diagram_type_hint.normalized(), Some(DiagramType::Sequence));
    }

    #[test]
    fn test_serialize_request() {
        let request = DiagramRequest::new("p").language(Language::Ja);
        let json = serde_json::to_string(&request).unwrap();
        insta::assert_snapshot!(
            json,
            @r#"{"prompt":"p","language_hint":"ja","diagram_type_hint":"auto"}"#
        );
    }

    #[test]
    fn test_validate_rejects_blank_prompt() {
        assert!(DiagramRequest::new("   ").validate().is_err());
        assert!(DiagramRequest::new("a state machine").validate().is_ok());
    }

    #[test]
    fn test_unknown_language_is_english() {
        let language: Language = serde_json::from_str("\"fr\"").unwrap();
        assert_eq!(language, Language::En);
    }
}

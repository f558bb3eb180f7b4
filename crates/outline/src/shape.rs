use serde_json::{Map, Value};

/// The shapes an outline value can take, decided by a single check per value
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum OutlineShape<'a> {
    /// Becomes a node; `content` is visited with the new node as parent
    Heading {
        text: Option<&'a Value>,
        content: Option<&'a Value>,
    },
    /// Pass-through: items are visited against the current parent
    Wrapper(Items<'a>),
    /// Paragraphs, scalars and unknown objects; contributes nothing
    Leaf,
}

/// Items of a content wrapper
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Items<'a> {
    Many(&'a [Value]),
    One(&'a Value),
}

impl<'a> Items<'a> {
    /// Items in source order
    pub(crate) fn as_slice(self) -> &'a [Value] {
        match self {
            Items::Many(items) => items,
            Items::One(item) => std::slice::from_ref(item),
        }
    }
}

impl<'a> OutlineShape<'a> {
    pub(crate) fn classify(value: &'a Value) -> Self {
        match value {
            Value::Array(items) => OutlineShape::Wrapper(Items::Many(items)),
            Value::Object(map) => classify_object(map),
            _ => OutlineShape::Leaf,
        }
    }

    /// Items a heading's `content` field expands to
    pub(crate) fn content_items(content: Option<&'a Value>) -> &'a [Value] {
        match content {
            Some(Value::Array(items)) => items,
            Some(item @ Value::Object(_)) => std::slice::from_ref(item),
            _ => &[],
        }
    }
}

fn classify_object(map: &Map<String, Value>) -> OutlineShape<'_> {
    match map.get("heading") {
        // {heading: {level, text, content}}
        Some(Value::Object(heading)) => {
            return OutlineShape::Heading {
                text: heading_text(heading),
                content: heading.get("content").or_else(|| map.get("content")),
            };
        }
        // {heading: "text", content: [...]}
        Some(text @ (Value::String(_) | Value::Number(_))) => {
            return OutlineShape::Heading {
                text: Some(text),
                content: map.get("content"),
            };
        }
        _ => {}
    }

    // {type: "heading", text, content}
    if map
        .get("type")
        .and_then(Value::as_str)
        .is_some_and(|kind| kind.eq_ignore_ascii_case("heading"))
    {
        return OutlineShape::Heading {
            text: heading_text(map),
            content: map.get("content"),
        };
    }

    match map.get("content") {
        Some(Value::Array(items)) => OutlineShape::Wrapper(Items::Many(items)),
        Some(item @ Value::Object(_)) => OutlineShape::Wrapper(Items::One(item)),
        _ => OutlineShape::Leaf,
    }
}

fn heading_text(map: &Map<String, Value>) -> Option<&Value> {
    ["text", "title", "name"]
        .iter()
        .find_map(|key| map.get(*key).filter(|value| label(Some(value)).is_some()))
}

/// Render heading text, `None` when missing or blank
pub(crate) fn label(text: Option<&Value>) -> Option<String> {
    let label = match text? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!label.is_empty()).then_some(label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_nested_heading() {
        let value = json!({"heading": {"level": 1, "text": "Intro", "content": []}});
        match OutlineShape::classify(&value) {
            OutlineShape::Heading { text, content } => {
                assert_eq!(text, Some(&json!("Intro")));
                assert_eq!(content, Some(&json!([])));
            }
            other => panic!("expected heading, got {other:?}"),
        }
    }

    #[test]
    fn classifies_flat_and_typed_headings() {
        let flat = json!({"heading": "Scope", "content": [{"type": "paragraph"}]});
        assert!(matches!(
            OutlineShape::classify(&flat),
            OutlineShape::Heading { text: Some(_), content: Some(_) }
        ));

        let typed = json!({"type": "Heading", "title": "Scope"});
        match OutlineShape::classify(&typed) {
            OutlineShape::Heading { text, content } => {
                assert_eq!(label(text).as_deref(), Some("Scope"));
                assert!(content.is_none());
            }
            other => panic!("expected heading, got {other:?}"),
        }
    }

    #[test]
    fn classifies_wrappers() {
        let list = json!({"content": [1, 2]});
        assert_eq!(
            OutlineShape::classify(&list),
            OutlineShape::Wrapper(Items::Many(&[json!(1), json!(2)]))
        );

        let single = json!({"content": {"heading": {"text": "A"}}});
        match OutlineShape::classify(&single) {
            OutlineShape::Wrapper(items) => assert_eq!(items.as_slice().len(), 1),
            other => panic!("expected wrapper, got {other:?}"),
        }

        let bare = json!([]);
        assert!(matches!(OutlineShape::classify(&bare), OutlineShape::Wrapper(_)));
    }

    #[test]
    fn classifies_leaves() {
        for value in [
            json!({"type": "paragraph", "text": "hi"}),
            json!("text"),
            json!(3),
            json!(null),
            json!({"content": "just text"}),
            json!({"heading": null}),
        ] {
            assert_eq!(OutlineShape::classify(&value), OutlineShape::Leaf, "{value}");
        }
    }

    #[test]
    fn labels_fall_back_to_none() {
        assert_eq!(label(Some(&json!("  Intro "))).as_deref(), Some("Intro"));
        assert_eq!(label(Some(&json!(2))).as_deref(), Some("2"));
        assert_eq!(label(Some(&json!("   "))), None);
        assert_eq!(label(Some(&json!(["a"]))), None);
        assert_eq!(label(None), None);
    }

    #[test]
    fn text_aliases_skip_null() {
        let map = json!({"text": null, "title": "Aliased"});
        let Value::Object(map) = map else { unreachable!() };
        assert_eq!(heading_text(&map), Some(&json!("Aliased")));
    }

    #[test]
    fn blank_text_falls_through_to_aliases() {
        let map = json!({"text": "  ", "title": "", "name": "Named"});
        let Value::Object(map) = map else { unreachable!() };
        assert_eq!(heading_text(&map), Some(&json!("Named")));

        let map = json!({"text": "", "title": "Real"});
        let Value::Object(map) = map else { unreachable!() };
        assert_eq!(label(heading_text(&map)).as_deref(), Some("Real"));

        let map = json!({"text": "", "title": {"nested": true}});
        let Value::Object(map) = map else { unreachable!() };
        assert_eq!(heading_text(&map), None);
    }
}

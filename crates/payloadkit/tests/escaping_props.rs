//! Property tests: XML and JSON payloads parse and carry parameter values back
//! unchanged. Values XML cannot carry are refused rather than emitted.

use payloadkit::{
    ContentFormat, MessageRenderer, RenderContext, RenderError, FROM_CURRENCY_PARAM,
    TO_CURRENCY_PARAM,
};
use proptest::prelude::*;
use quick_xml::events::Event;
use quick_xml::Reader;

fn context(from: &str, to: &str) -> RenderContext {
    RenderContext::new()
        .with(FROM_CURRENCY_PARAM, from)
        .with(TO_CURRENCY_PARAM, to)
}

/// Concatenated text of every element with the given local name.
fn element_text(xml: &str, local_name: &str) -> Result<String, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut inside = false;
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => inside = e.local_name().as_ref() == local_name.as_bytes(),
            Event::End(_) => inside = false,
            Event::Text(t) if inside => text.push_str(&t.unescape()?),
            Event::Eof => return Ok(text),
            _ => {}
        }
    }
}

proptest! {
    // XML 1.0 forbids most control characters outright, so XML values are
    // drawn from printable characters only.
    #[test]
    fn xml_round_trips_printable_values(from in "\\PC*", to in "\\PC*") {
        let renderer = MessageRenderer::bundled();
        let xml = renderer
            .render("xml/currency_conversion_request", &context(&from, &to))
            .unwrap();

        prop_assert_eq!(element_text(&xml, "FromCurrency").unwrap(), from);
        prop_assert_eq!(element_text(&xml, "ToCurrency").unwrap(), to);
    }

    // Arbitrary values either render to a parseable document or are refused
    // up front; malformed XML is never produced.
    #[test]
    fn xml_never_emits_unparseable_output(from in any::<String>(), to in "\\PC*") {
        let renderer = MessageRenderer::bundled();
        match renderer.render("xml/currency_conversion_request", &context(&from, &to)) {
            Ok(xml) => {
                prop_assert!(element_text(&xml, "FromCurrency").is_ok());
                prop_assert!(element_text(&xml, "ToCurrency").is_ok());
            }
            Err(RenderError::InvalidValue { parameter, format, character, .. }) => {
                prop_assert_eq!(parameter, FROM_CURRENCY_PARAM);
                prop_assert_eq!(format, ContentFormat::Xml);
                prop_assert!(from.contains(character));
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }

    #[test]
    fn json_round_trips_any_value(from in any::<String>(), to in any::<String>()) {
        let renderer = MessageRenderer::bundled();
        let json = renderer
            .render("json/currency_conversion_request", &context(&from, &to))
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(parsed["conversion_rate"]["from_currency"].as_str(), Some(from.as_str()));
        prop_assert_eq!(parsed["conversion_rate"]["to_currency"].as_str(), Some(to.as_str()));
    }

    #[test]
    fn text_contains_values_verbatim(from in "\\PC*", to in "\\PC*") {
        let renderer = MessageRenderer::bundled();
        let text = renderer
            .render("text/currency_conversion_request", &context(&from, &to))
            .unwrap();

        prop_assert!(text.contains(&from));
        prop_assert!(text.contains(&to));
    }
}

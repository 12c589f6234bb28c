//! Form state reconciliation
//!
//! Browser-side form controls change without the server asking. On `input`
//! and `change` events the reported control state is copied into the mirror
//! so that later serializations match what the user sees.

use tracing::debug;

use crate::{DomError, Element, Event, MutationRecord, tags};

fn is_form_event(kind: &str) -> bool {
    matches!(kind, "input" | "change")
}

fn input_type(element: &Element) -> String {
    element
        .get_attribute("type")
        .unwrap_or_else(|| "text".to_string())
        .to_ascii_lowercase()
}

/// `option` descendants of a select element
pub fn options(select: &Element) -> Vec<Element> {
    select.elements_by_tag("option")
}

/// Options currently marked selected
pub fn selected_options(select: &Element) -> Vec<Element> {
    options(select)
        .into_iter()
        .filter(|opt| opt.has_attribute("selected"))
        .collect()
}

fn set_checked(element: &Element, checked: bool) -> Result<MutationRecord, DomError> {
    if checked {
        element.set_attribute_local("checked", "true")?;
        Ok(MutationRecord::set_attribute(element, "checked", "true"))
    } else {
        element.remove_attribute_local("checked")?;
        Ok(MutationRecord::remove_attribute(element, "checked"))
    }
}

/// Same-name radio buttons sharing `radio`'s root
fn radio_group(radio: &Element) -> Vec<Element> {
    let Some(name) = radio.get_attribute("name") else {
        return Vec::new();
    };
    radio
        .root()
        .elements_by_tag(radio.tag())
        .into_iter()
        .filter(|el| {
            *el != *radio
                && input_type(el) == "radio"
                && el.get_attribute("name").as_deref() == Some(name.as_str())
        })
        .collect()
}

/// Copy browser form state from `event` into `element`.
///
/// Changes are applied without being reported; the returned records describe
/// them so they can be forwarded to other browsers.
pub fn reconcile(element: &Element, event: &Event) -> Result<Vec<MutationRecord>, DomError> {
    if !is_form_event(event.kind()) {
        return Ok(Vec::new());
    }
    let mut records = Vec::new();
    let desc = element.descriptor();

    if desc.is_a(&tags::TEXTAREA) || element.tag() == "textarea" {
        if let Some(value) = event.value() {
            element.set_text_content_local(value);
            records.push(MutationRecord::text_content(element, value));
        }
    } else if desc.is_a(&tags::SELECT) || element.tag() == "select" {
        if let Some(value) = event.value() {
            element.set_attribute_local("value", value)?;
            records.push(MutationRecord::set_attribute(element, "value", value));
        }
        let selected = event.selected_options();
        for opt in options(element) {
            let is_selected = selected.iter().any(|id| id == opt.id().as_str());
            if is_selected {
                opt.set_attribute_local("selected", "true")?;
                records.push(MutationRecord::set_attribute(&opt, "selected", "true"));
            } else if opt.has_attribute("selected") {
                opt.remove_attribute_local("selected")?;
                records.push(MutationRecord::remove_attribute(&opt, "selected"));
            }
        }
    } else if element.tag() == "input" {
        match input_type(element).as_str() {
            "checkbox" => {
                if let Some(checked) = event.checked() {
                    records.push(set_checked(element, checked)?);
                }
            }
            "radio" => {
                if let Some(checked) = event.checked() {
                    records.push(set_checked(element, checked)?);
                    if checked {
                        for other in radio_group(element) {
                            if other.has_attribute("checked") {
                                records.push(set_checked(&other, false)?);
                            }
                        }
                    }
                }
            }
            _ => {
                if let Some(value) = event.value() {
                    element.set_attribute_local("value", value)?;
                    records.push(MutationRecord::set_attribute(element, "value", value));
                }
            }
        }
    } else {
        debug!("no form state to reconcile on <{}>", element.tag());
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(kind: &str, current_target: serde_json::Value) -> Event {
        Event::with_init(kind, json!({ "type": kind, "currentTarget": current_target }))
    }

    #[test]
    fn test_text_input_value() {
        let input = Element::connectable(&tags::TEXT_INPUT);
        let records = reconcile(&input, &event("input", json!({"value": "hello"}))).unwrap();
        assert_eq!(input.get_attribute("value").as_deref(), Some("hello"));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].params["value"], "hello");
    }

    #[test]
    fn test_click_is_ignored() {
        let input = Element::connectable(&tags::TEXT_INPUT);
        let records = reconcile(&input, &event("click", json!({"value": "x"}))).unwrap();
        assert!(records.is_empty());
        assert!(!input.has_attribute("value"));
    }

    #[test]
    fn test_checkbox() {
        let checkbox = Element::connectable(&tags::CHECKBOX);
        reconcile(&checkbox, &event("change", json!({"checked": true}))).unwrap();
        assert!(checkbox.html().contains(" checked"));
        reconcile(&checkbox, &event("change", json!({"checked": false}))).unwrap();
        assert!(!checkbox.has_attribute("checked"));
    }

    #[test]
    fn test_radio_group_unchecks_siblings() {
        let form = Element::connectable(&tags::FORM);
        let a = Element::connectable(&tags::RADIO);
        let b = Element::connectable(&tags::RADIO);
        let other = Element::connectable(&tags::RADIO);
        a.set_attribute("name", "g").unwrap();
        b.set_attribute("name", "g").unwrap();
        other.set_attribute("name", "h").unwrap();
        other.set_attribute("checked", "true").unwrap();
        form.extend([&a, &b, &other]).unwrap();

        reconcile(&a, &event("change", json!({"checked": true}))).unwrap();
        reconcile(&b, &event("change", json!({"checked": true}))).unwrap();
        assert!(!a.has_attribute("checked"));
        assert!(b.has_attribute("checked"));
        assert!(other.has_attribute("checked"));
    }

    #[test]
    fn test_textarea() {
        let area = Element::connectable(&tags::TEXTAREA);
        area.set_text_content("old");
        reconcile(&area, &event("input", json!({"value": "new"}))).unwrap();
        assert_eq!(area.text_content(), "new");
    }

    #[test]
    fn test_select_options() {
        let select = Element::connectable(&tags::SELECT);
        let one = Element::with_id(&tags::OPTION, "o1");
        let two = Element::with_id(&tags::OPTION, "o2");
        one.set_attribute("selected", "true").unwrap();
        select.extend([&one, &two]).unwrap();

        let records = reconcile(
            &select,
            &event("change", json!({"value": "2", "selectedOptions": ["o2"]})),
        )
        .unwrap();
        assert_eq!(select.get_attribute("value").as_deref(), Some("2"));
        assert_eq!(selected_options(&select), vec![two]);
        assert_eq!(records.len(), 3);
    }
}

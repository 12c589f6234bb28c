//! Standard tag kinds

use crate::TagDescriptor;

// Document structure
pub static HTML: TagDescriptor = TagDescriptor::new("Html", "html");
pub static HEAD: TagDescriptor = TagDescriptor::new("Head", "head");
pub static BODY: TagDescriptor = TagDescriptor::new("Body", "body");
pub static TITLE: TagDescriptor = TagDescriptor::new("Title", "title");
pub static META: TagDescriptor = TagDescriptor::new("Meta", "meta");
pub static LINK: TagDescriptor = TagDescriptor::new("Link", "link");
pub static SCRIPT: TagDescriptor = TagDescriptor::new("Script", "script")
    .input_type("text/javascript")
    .raw_text();
pub static STYLE: TagDescriptor = TagDescriptor::new("Style", "style").raw_text();

// Containers
pub static DIV: TagDescriptor = TagDescriptor::new("Div", "div");
pub static SPAN: TagDescriptor = TagDescriptor::new("Span", "span");

// Typography
pub static P: TagDescriptor = TagDescriptor::new("P", "p");
pub static H1: TagDescriptor = TagDescriptor::new("H1", "h1");
pub static H2: TagDescriptor = TagDescriptor::new("H2", "h2");
pub static H3: TagDescriptor = TagDescriptor::new("H3", "h3");
pub static H4: TagDescriptor = TagDescriptor::new("H4", "h4");
pub static H5: TagDescriptor = TagDescriptor::new("H5", "h5");
pub static H6: TagDescriptor = TagDescriptor::new("H6", "h6");
pub static A: TagDescriptor = TagDescriptor::new("A", "a");
pub static STRONG: TagDescriptor = TagDescriptor::new("Strong", "strong");
pub static EM: TagDescriptor = TagDescriptor::new("Em", "em");
pub static CODE: TagDescriptor = TagDescriptor::new("Code", "code");
pub static PRE: TagDescriptor = TagDescriptor::new("Pre", "pre");
pub static BR: TagDescriptor = TagDescriptor::new("Br", "br");
pub static HR: TagDescriptor = TagDescriptor::new("Hr", "hr");
pub static IMG: TagDescriptor = TagDescriptor::new("Img", "img");

// Tables
pub static TABLE: TagDescriptor = TagDescriptor::new("Table", "table");
pub static THEAD: TagDescriptor = TagDescriptor::new("Thead", "thead");
pub static TBODY: TagDescriptor = TagDescriptor::new("Tbody", "tbody");
pub static TR: TagDescriptor = TagDescriptor::new("Tr", "tr");
pub static TH: TagDescriptor = TagDescriptor::new("Th", "th");
pub static TD: TagDescriptor = TagDescriptor::new("Td", "td");

// Lists
pub static UL: TagDescriptor = TagDescriptor::new("Ul", "ul");
pub static OL: TagDescriptor = TagDescriptor::new("Ol", "ol");
pub static LI: TagDescriptor = TagDescriptor::new("Li", "li");

// Forms
pub static FORM: TagDescriptor = TagDescriptor::new("Form", "form");
pub static LABEL: TagDescriptor = TagDescriptor::new("Label", "label");
pub static BUTTON: TagDescriptor = TagDescriptor::new("Button", "button");
pub static INPUT: TagDescriptor = TagDescriptor::new("Input", "input");
pub static TEXT_INPUT: TagDescriptor = TagDescriptor::derive("TextInput", &INPUT).input_type("text");
pub static CHECKBOX: TagDescriptor = TagDescriptor::derive("CheckBox", &INPUT).input_type("checkbox");
pub static RADIO: TagDescriptor = TagDescriptor::derive("Radio", &INPUT).input_type("radio");
pub static TEXTAREA: TagDescriptor = TagDescriptor::new("Textarea", "textarea");
pub static SELECT: TagDescriptor = TagDescriptor::new("Select", "select");
pub static OPTION: TagDescriptor = TagDescriptor::new("Option", "option");

static STANDARD: &[&TagDescriptor] = &[
    &HTML, &HEAD, &BODY, &TITLE, &META, &LINK, &SCRIPT, &STYLE, &DIV, &SPAN,
    &P, &H1, &H2, &H3, &H4, &H5, &H6, &A, &STRONG, &EM, &CODE, &PRE, &BR, &HR,
    &IMG, &TABLE, &THEAD, &TBODY, &TR, &TH, &TD, &UL, &OL, &LI, &FORM, &LABEL,
    &BUTTON, &INPUT, &TEXTAREA, &SELECT, &OPTION,
];

/// Look up the base kind for an HTML tag name
pub fn by_tag(tag: &str) -> Option<&'static TagDescriptor> {
    let tag = tag.to_ascii_lowercase();
    STANDARD.iter().copied().find(|desc| desc.tag == tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert!(std::ptr::eq(by_tag("DIV").unwrap(), &DIV));
        assert!(std::ptr::eq(by_tag("input").unwrap(), &INPUT));
        assert!(by_tag("blink").is_none());
    }

    #[test]
    fn test_input_kinds() {
        assert_eq!(CHECKBOX.tag, "input");
        assert_eq!(CHECKBOX.type_, Some("checkbox"));
        assert!(RADIO.is_a(&INPUT));
        assert!(INPUT.is_void());
        assert!(!SCRIPT.escape_text);
    }
}

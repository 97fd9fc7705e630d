//! Built-in HTML knowledge.
//!
//! Provides the BuiltIn and DeclaredExtension layers:
//! - Global attributes (id, class, hidden, aria-*, etc.)
//! - Common elements with typed attributes and their reflected properties
//! - Global DOM events with their event object types
//! - The `HTMLElement` base class every element extends
//!
//! Attribute-to-property names use compile-time perfect hash maps (phf).

use litho_canon::SimpleType;
use phf::phf_map;

use crate::descriptor::{EventDescriptor, MemberDescriptor, TagDescriptor, TypeCell};
use crate::layer::{GlobalBucket, HtmlCollection};

/// Attribute value shape in the built-in tables.
#[derive(Debug, Clone, Copy)]
enum Attr {
    Str,
    Num,
    Bool,
    Values(&'static [&'static str]),
}

impl Attr {
    fn cell(self) -> TypeCell {
        match self {
            Attr::Str => TypeCell::fixed(SimpleType::String),
            Attr::Num => TypeCell::fixed(SimpleType::Number),
            Attr::Bool => TypeCell::fixed(SimpleType::Boolean),
            Attr::Values(values) => TypeCell::values(values.iter().map(|v| (*v).into()).collect()),
        }
    }
}

type AttrTable = &'static [(&'static str, Attr)];

// =============================================================================
// Global attributes
// =============================================================================

const DIR: Attr = Attr::Values(&["ltr", "rtl", "auto"]);
const BOOL_STRING: Attr = Attr::Values(&["true", "false"]);
const TARGET: Attr = Attr::Values(&["_self", "_blank", "_parent", "_top"]);

static GLOBAL_ATTRIBUTES: AttrTable = &[
    ("accesskey", Attr::Str),
    ("autocapitalize", Attr::Values(&["off", "none", "on", "sentences", "words", "characters"])),
    ("autofocus", Attr::Bool),
    ("class", Attr::Str),
    ("contenteditable", Attr::Values(&["true", "false", "plaintext-only", ""])),
    ("dir", DIR),
    ("draggable", BOOL_STRING),
    ("enterkeyhint", Attr::Values(&["enter", "done", "go", "next", "previous", "search", "send"])),
    ("exportparts", Attr::Str),
    ("hidden", Attr::Bool),
    ("id", Attr::Str),
    ("inert", Attr::Bool),
    ("inputmode", Attr::Values(&["none", "text", "decimal", "numeric", "tel", "search", "email", "url"])),
    ("is", Attr::Str),
    ("lang", Attr::Str),
    ("nonce", Attr::Str),
    ("part", Attr::Str),
    ("popover", Attr::Values(&["auto", "manual", ""])),
    ("role", Attr::Str),
    ("slot", Attr::Str),
    ("spellcheck", BOOL_STRING),
    ("style", Attr::Str),
    ("tabindex", Attr::Num),
    ("title", Attr::Str),
    ("translate", Attr::Values(&["yes", "no"])),
    ("aria-label", Attr::Str),
    ("aria-labelledby", Attr::Str),
    ("aria-describedby", Attr::Str),
    ("aria-hidden", BOOL_STRING),
    ("aria-expanded", BOOL_STRING),
    ("aria-controls", Attr::Str),
    ("aria-live", Attr::Values(&["off", "polite", "assertive"])),
    ("aria-disabled", BOOL_STRING),
    ("aria-selected", BOOL_STRING),
    ("aria-checked", Attr::Values(&["true", "false", "mixed"])),
    ("aria-pressed", Attr::Values(&["true", "false", "mixed"])),
    ("aria-current", Attr::Values(&["page", "step", "location", "date", "time", "true", "false"])),
];

// =============================================================================
// Elements
// =============================================================================

static A: AttrTable = &[
    ("download", Attr::Str),
    ("href", Attr::Str),
    ("hreflang", Attr::Str),
    ("ping", Attr::Str),
    ("referrerpolicy", Attr::Str),
    ("rel", Attr::Str),
    ("target", TARGET),
    ("type", Attr::Str),
];

static BUTTON: AttrTable = &[
    ("disabled", Attr::Bool),
    ("form", Attr::Str),
    ("formaction", Attr::Str),
    ("formnovalidate", Attr::Bool),
    ("formtarget", TARGET),
    ("name", Attr::Str),
    ("type", Attr::Values(&["submit", "reset", "button"])),
    ("value", Attr::Str),
];

static INPUT: AttrTable = &[
    ("accept", Attr::Str),
    ("alt", Attr::Str),
    ("autocomplete", Attr::Str),
    ("checked", Attr::Bool),
    ("disabled", Attr::Bool),
    ("form", Attr::Str),
    ("height", Attr::Num),
    ("list", Attr::Str),
    ("max", Attr::Str),
    ("maxlength", Attr::Num),
    ("min", Attr::Str),
    ("minlength", Attr::Num),
    ("multiple", Attr::Bool),
    ("name", Attr::Str),
    ("pattern", Attr::Str),
    ("placeholder", Attr::Str),
    ("readonly", Attr::Bool),
    ("required", Attr::Bool),
    ("size", Attr::Num),
    ("src", Attr::Str),
    ("step", Attr::Str),
    (
        "type",
        Attr::Values(&[
            "button", "checkbox", "color", "date", "datetime-local", "email", "file", "hidden",
            "image", "month", "number", "password", "radio", "range", "reset", "search", "submit",
            "tel", "text", "time", "url", "week",
        ]),
    ),
    ("value", Attr::Str),
    ("width", Attr::Num),
];

static TEXTAREA: AttrTable = &[
    ("autocomplete", Attr::Str),
    ("cols", Attr::Num),
    ("disabled", Attr::Bool),
    ("form", Attr::Str),
    ("maxlength", Attr::Num),
    ("minlength", Attr::Num),
    ("name", Attr::Str),
    ("placeholder", Attr::Str),
    ("readonly", Attr::Bool),
    ("required", Attr::Bool),
    ("rows", Attr::Num),
    ("wrap", Attr::Values(&["hard", "soft", "off"])),
];

static SELECT: AttrTable = &[
    ("autocomplete", Attr::Str),
    ("disabled", Attr::Bool),
    ("form", Attr::Str),
    ("multiple", Attr::Bool),
    ("name", Attr::Str),
    ("required", Attr::Bool),
    ("size", Attr::Num),
];

static OPTION: AttrTable = &[
    ("disabled", Attr::Bool),
    ("label", Attr::Str),
    ("selected", Attr::Bool),
    ("value", Attr::Str),
];

static FORM: AttrTable = &[
    ("accept-charset", Attr::Str),
    ("action", Attr::Str),
    ("autocomplete", Attr::Values(&["on", "off"])),
    ("enctype", Attr::Str),
    ("method", Attr::Values(&["get", "post", "dialog"])),
    ("name", Attr::Str),
    ("novalidate", Attr::Bool),
    ("target", TARGET),
];

static LABEL: AttrTable = &[("for", Attr::Str), ("form", Attr::Str)];

static IMG: AttrTable = &[
    ("alt", Attr::Str),
    ("crossorigin", Attr::Values(&["anonymous", "use-credentials", ""])),
    ("decoding", Attr::Values(&["sync", "async", "auto"])),
    ("height", Attr::Num),
    ("loading", Attr::Values(&["eager", "lazy"])),
    ("sizes", Attr::Str),
    ("src", Attr::Str),
    ("srcset", Attr::Str),
    ("usemap", Attr::Str),
    ("width", Attr::Num),
];

static IFRAME: AttrTable = &[
    ("allow", Attr::Str),
    ("allowfullscreen", Attr::Bool),
    ("height", Attr::Num),
    ("loading", Attr::Values(&["eager", "lazy"])),
    ("name", Attr::Str),
    ("sandbox", Attr::Str),
    ("src", Attr::Str),
    ("srcdoc", Attr::Str),
    ("width", Attr::Num),
];

static SCRIPT: AttrTable = &[
    ("async", Attr::Bool),
    ("crossorigin", Attr::Str),
    ("defer", Attr::Bool),
    ("integrity", Attr::Str),
    ("nomodule", Attr::Bool),
    ("src", Attr::Str),
    ("type", Attr::Str),
];

static EMBED: AttrTable = &[
    ("height", Attr::Num),
    ("src", Attr::Str),
    ("type", Attr::Str),
    ("width", Attr::Num),
];

static OBJECT: AttrTable = &[
    ("data", Attr::Str),
    ("form", Attr::Str),
    ("height", Attr::Num),
    ("name", Attr::Str),
    ("type", Attr::Str),
    ("width", Attr::Num),
];

static MEDIA: AttrTable = &[
    ("autoplay", Attr::Bool),
    ("controls", Attr::Bool),
    ("crossorigin", Attr::Str),
    ("loop", Attr::Bool),
    ("muted", Attr::Bool),
    ("preload", Attr::Values(&["none", "metadata", "auto", ""])),
    ("src", Attr::Str),
];

static VIDEO: AttrTable = &[
    ("height", Attr::Num),
    ("playsinline", Attr::Bool),
    ("poster", Attr::Str),
    ("width", Attr::Num),
];

static SOURCE: AttrTable = &[
    ("media", Attr::Str),
    ("sizes", Attr::Str),
    ("src", Attr::Str),
    ("srcset", Attr::Str),
    ("type", Attr::Str),
];

static LINK: AttrTable = &[
    ("as", Attr::Str),
    ("crossorigin", Attr::Str),
    ("href", Attr::Str),
    ("media", Attr::Str),
    ("rel", Attr::Str),
    ("type", Attr::Str),
];

static TD: AttrTable = &[
    ("colspan", Attr::Num),
    ("headers", Attr::Str),
    ("rowspan", Attr::Num),
];

static DETAILS: AttrTable = &[("open", Attr::Bool), ("name", Attr::Str)];

static DIALOG: AttrTable = &[("open", Attr::Bool)];

static OL: AttrTable = &[
    ("reversed", Attr::Bool),
    ("start", Attr::Num),
    ("type", Attr::Values(&["1", "a", "A", "i", "I"])),
];

static PROGRESS: AttrTable = &[("max", Attr::Num), ("value", Attr::Num)];

static METER: AttrTable = &[
    ("high", Attr::Num),
    ("low", Attr::Num),
    ("max", Attr::Num),
    ("min", Attr::Num),
    ("optimum", Attr::Num),
    ("value", Attr::Num),
];

static FIELDSET: AttrTable = &[
    ("disabled", Attr::Bool),
    ("form", Attr::Str),
    ("name", Attr::Str),
];

static SLOT: AttrTable = &[("name", Attr::Str)];

static TIME: AttrTable = &[("datetime", Attr::Str)];

static CANVAS: AttrTable = &[("height", Attr::Num), ("width", Attr::Num)];

static ELEMENTS: &[(&str, AttrTable)] = &[
    ("a", A),
    ("audio", MEDIA),
    ("button", BUTTON),
    ("canvas", CANVAS),
    ("details", DETAILS),
    ("dialog", DIALOG),
    ("embed", EMBED),
    ("fieldset", FIELDSET),
    ("form", FORM),
    ("iframe", IFRAME),
    ("img", IMG),
    ("input", INPUT),
    ("label", LABEL),
    ("link", LINK),
    ("meter", METER),
    ("object", OBJECT),
    ("ol", OL),
    ("option", OPTION),
    ("progress", PROGRESS),
    ("script", SCRIPT),
    ("select", SELECT),
    ("slot", SLOT),
    ("source", SOURCE),
    ("td", TD),
    ("textarea", TEXTAREA),
    ("th", TD),
    ("time", TIME),
    ("video", VIDEO),
];

/// Elements without element-specific attributes.
static PLAIN_ELEMENTS: &[&str] = &[
    "abbr", "address", "article", "aside", "b", "base", "bdi", "bdo", "blockquote", "body", "br",
    "caption", "cite", "code", "col", "colgroup", "data", "datalist", "dd", "del", "dfn", "div",
    "dl", "dt", "em", "figcaption", "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "head",
    "header", "hgroup", "hr", "html", "i", "ins", "kbd", "legend", "li", "main", "map", "mark",
    "menu", "meta", "nav", "noscript", "optgroup", "output", "p", "picture", "pre", "q", "rp",
    "rt", "ruby", "s", "samp", "search", "section", "small", "span", "strong", "style", "sub",
    "summary", "sup", "table", "tbody", "template", "tfoot", "thead", "title", "tr", "track", "u",
    "ul", "var", "wbr", "svg", "math",
];

/// Reflected property names that differ from their attribute.
static ATTRIBUTE_TO_PROPERTY: phf::Map<&'static str, &'static str> = phf_map! {
    "accesskey" => "accessKey",
    "accept-charset" => "acceptCharset",
    "allowfullscreen" => "allowFullscreen",
    "class" => "className",
    "colspan" => "colSpan",
    "contenteditable" => "contentEditable",
    "crossorigin" => "crossOrigin",
    "datetime" => "dateTime",
    "enterkeyhint" => "enterKeyHint",
    "for" => "htmlFor",
    "formaction" => "formAction",
    "formnovalidate" => "formNoValidate",
    "formtarget" => "formTarget",
    "inputmode" => "inputMode",
    "maxlength" => "maxLength",
    "minlength" => "minLength",
    "nomodule" => "noModule",
    "novalidate" => "noValidate",
    "playsinline" => "playsInline",
    "readonly" => "readOnly",
    "referrerpolicy" => "referrerPolicy",
    "rowspan" => "rowSpan",
    "tabindex" => "tabIndex",
    "usemap" => "useMap",
};

/// Attributes without a reflected property.
static UNREFLECTED: &[&str] = &["style", "exportparts", "is", "part", "form", "list"];

fn property_name(attribute: &str) -> Option<&'static str> {
    if attribute.starts_with("aria-") || UNREFLECTED.iter().any(|u| *u == attribute) {
        return None;
    }
    ATTRIBUTE_TO_PROPERTY.get(attribute).copied()
}

fn attributes(table: AttrTable) -> Vec<MemberDescriptor> {
    table
        .iter()
        .map(|(name, attr)| MemberDescriptor::new(*name, attr.cell()))
        .collect()
}

fn properties(table: AttrTable) -> Vec<MemberDescriptor> {
    table
        .iter()
        .filter(|(name, _)| !name.starts_with("aria-") && !UNREFLECTED.contains(name))
        .map(|(name, attr)| {
            let property = property_name(name).unwrap_or(*name);
            MemberDescriptor::new(property, attr.cell())
        })
        .collect()
}

// =============================================================================
// Events
// =============================================================================

static GLOBAL_EVENTS: &[(&str, &str)] = &[
    ("abort", "UIEvent"),
    ("animationend", "AnimationEvent"),
    ("animationstart", "AnimationEvent"),
    ("blur", "FocusEvent"),
    ("change", "Event"),
    ("click", "MouseEvent"),
    ("contextmenu", "MouseEvent"),
    ("copy", "ClipboardEvent"),
    ("cut", "ClipboardEvent"),
    ("dblclick", "MouseEvent"),
    ("drag", "DragEvent"),
    ("dragend", "DragEvent"),
    ("dragenter", "DragEvent"),
    ("dragleave", "DragEvent"),
    ("dragover", "DragEvent"),
    ("dragstart", "DragEvent"),
    ("drop", "DragEvent"),
    ("error", "ErrorEvent"),
    ("focus", "FocusEvent"),
    ("focusin", "FocusEvent"),
    ("focusout", "FocusEvent"),
    ("input", "InputEvent"),
    ("invalid", "Event"),
    ("keydown", "KeyboardEvent"),
    ("keyup", "KeyboardEvent"),
    ("load", "Event"),
    ("mousedown", "MouseEvent"),
    ("mouseenter", "MouseEvent"),
    ("mouseleave", "MouseEvent"),
    ("mousemove", "MouseEvent"),
    ("mouseout", "MouseEvent"),
    ("mouseover", "MouseEvent"),
    ("mouseup", "MouseEvent"),
    ("paste", "ClipboardEvent"),
    ("pointercancel", "PointerEvent"),
    ("pointerdown", "PointerEvent"),
    ("pointerenter", "PointerEvent"),
    ("pointerleave", "PointerEvent"),
    ("pointermove", "PointerEvent"),
    ("pointerup", "PointerEvent"),
    ("reset", "Event"),
    ("resize", "UIEvent"),
    ("scroll", "Event"),
    ("select", "Event"),
    ("submit", "SubmitEvent"),
    ("toggle", "ToggleEvent"),
    ("touchend", "TouchEvent"),
    ("touchmove", "TouchEvent"),
    ("touchstart", "TouchEvent"),
    ("transitionend", "TransitionEvent"),
    ("wheel", "WheelEvent"),
];

fn event_type(name: &str) -> TypeCell {
    TypeCell::fixed(SimpleType::named(name))
}

// =============================================================================
// HTMLElement
// =============================================================================

static HTML_ELEMENT_PROPERTIES: AttrTable = &[
    ("accessKey", Attr::Str),
    ("autofocus", Attr::Bool),
    ("className", Attr::Str),
    ("contentEditable", Attr::Str),
    ("dir", Attr::Str),
    ("draggable", Attr::Bool),
    ("hidden", Attr::Bool),
    ("id", Attr::Str),
    ("inert", Attr::Bool),
    ("innerHTML", Attr::Str),
    ("innerText", Attr::Str),
    ("lang", Attr::Str),
    ("outerHTML", Attr::Str),
    ("slot", Attr::Str),
    ("spellcheck", Attr::Bool),
    ("tabIndex", Attr::Num),
    ("textContent", Attr::Str),
    ("title", Attr::Str),
    ("translate", Attr::Bool),
];

/// Name of the declared extension tag.
pub const HTML_ELEMENT: &str = "HTMLElement";

/// The BuiltIn layer: html elements, global attributes and global events.
pub fn builtin_collection() -> HtmlCollection {
    let mut tags = Vec::with_capacity(ELEMENTS.len() + PLAIN_ELEMENTS.len());
    for (name, table) in ELEMENTS {
        let mut tag = TagDescriptor::new(*name);
        tag.built_in = true;
        tag.attributes = attributes(table);
        tag.properties = properties(table);
        tags.push(tag);
    }
    for name in PLAIN_ELEMENTS {
        let mut tag = TagDescriptor::new(*name);
        tag.built_in = true;
        tags.push(tag);
    }

    let global = GlobalBucket {
        attributes: attributes(GLOBAL_ATTRIBUTES),
        properties: properties(GLOBAL_ATTRIBUTES),
        events: GLOBAL_EVENTS
            .iter()
            .map(|(name, ty)| EventDescriptor::new(*name, event_type(ty)))
            .collect(),
        ..Default::default()
    };

    HtmlCollection { tags, global }
}

/// The DeclaredExtension layer: the `HTMLElement` base class.
pub fn extension_collection() -> HtmlCollection {
    let mut tag = TagDescriptor::new(HTML_ELEMENT);
    tag.built_in = true;
    tag.declared = true;
    tag.properties = HTML_ELEMENT_PROPERTIES
        .iter()
        .map(|(name, attr)| MemberDescriptor::new(*name, attr.cell()))
        .collect();
    HtmlCollection {
        tags: vec![tag],
        global: GlobalBucket::default(),
    }
}

//! HTML tokenizer for template documents.
//!
//! A byte-level state machine in the style of htmlparser2. It knows nothing
//! about bindings: `?x`, `.x` and `@x` are ordinary attribute names, and
//! interpolation placeholders are ordinary text.

use litho_carton::is_raw_text_tag;
use litho_relief::ErrorCode;

/// Character codes for fast comparison
pub mod char_codes {
    pub const TAB: u8 = 0x09;
    pub const NEWLINE: u8 = 0x0A;
    pub const FORM_FEED: u8 = 0x0C;
    pub const CARRIAGE_RETURN: u8 = 0x0D;
    pub const SPACE: u8 = 0x20;
    pub const EXCLAMATION_MARK: u8 = 0x21;
    pub const DOUBLE_QUOTE: u8 = 0x22;
    pub const SINGLE_QUOTE: u8 = 0x27;
    pub const DASH: u8 = 0x2D;
    pub const SLASH: u8 = 0x2F;
    pub const LT: u8 = 0x3C;
    pub const EQ: u8 = 0x3D;
    pub const GT: u8 = 0x3E;
    pub const QUESTION_MARK: u8 = 0x3F;
    pub const UPPER_A: u8 = 0x41;
    pub const UPPER_Z: u8 = 0x5A;
    pub const LOWER_A: u8 = 0x61;
    pub const LOWER_Z: u8 = 0x7A;
}

use char_codes::*;

/// All the states the tokenizer can be in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum State {
    Text = 1,

    // Tags
    BeforeTagName,
    InTagName,
    InSelfClosingTag,
    BeforeClosingTagName,
    InClosingTagName,
    AfterClosingTagName,

    // Attributes
    BeforeAttrName,
    InAttrName,
    AfterAttrName,
    BeforeAttrValue,
    InAttrValueDq,
    InAttrValueSq,
    InAttrValueNq,

    // Declarations
    BeforeDeclaration,
    InDeclaration,

    // Processing instructions
    InProcessingInstruction,

    // Comments
    BeforeComment,
    InCommentLike,

    // Content of <style>, <script>, <textarea>, <title>
    InRawText,
}

/// Quote type for attribute values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum QuoteType {
    NoValue = 0,
    Unquoted = 1,
    Single = 2,
    Double = 3,
}

/// Tokenizer callbacks
pub trait Callbacks {
    fn on_text(&mut self, start: usize, end: usize);

    fn on_open_tag_name(&mut self, start: usize, end: usize);
    /// `end` is the index of `>`
    fn on_open_tag_end(&mut self, end: usize);
    /// `end` is the index of `>`
    fn on_self_closing_tag(&mut self, end: usize);
    /// `tag_start` is the index of `<`, `end` is one past `>`
    fn on_close_tag(&mut self, tag_start: usize, name_start: usize, name_end: usize, end: usize);

    fn on_attrib_name(&mut self, start: usize, end: usize);
    fn on_attrib_data(&mut self, start: usize, end: usize);
    fn on_attrib_end(&mut self, quote: QuoteType, end: usize);

    fn on_comment(&mut self, start: usize, end: usize);

    fn on_end(&mut self);
    fn on_error(&mut self, code: ErrorCode, index: usize);
}

/// Check if character is a tag start character (a-z, A-Z)
#[inline]
pub fn is_tag_start_char(c: u8) -> bool {
    (LOWER_A..=LOWER_Z).contains(&c) || (UPPER_A..=UPPER_Z).contains(&c)
}

/// Check if character is whitespace
#[inline]
pub fn is_whitespace(c: u8) -> bool {
    c == SPACE || c == NEWLINE || c == TAB || c == FORM_FEED || c == CARRIAGE_RETURN
}

/// Check if character ends a tag section
#[inline]
pub fn is_end_of_tag_section(c: u8) -> bool {
    c == SLASH || c == GT || is_whitespace(c)
}

/// HTML tokenizer
pub struct Tokenizer<'a, C: Callbacks> {
    /// Input source
    input: &'a [u8],
    /// Current state
    state: State,
    /// Buffer start position
    section_start: usize,
    /// Current index
    index: usize,
    /// Index of the `<` of the tag being tokenized
    tag_start: usize,
    /// Name range of the current closing tag
    closing_name: (usize, usize),
    /// Name range of the last opened tag
    open_name: (usize, usize),
    /// Tag name whose end tag terminates raw text
    raw_text_end: Option<(usize, usize)>,
    /// Callbacks
    callbacks: C,
}

impl<'a, C: Callbacks> Tokenizer<'a, C> {
    /// Create a new tokenizer
    pub fn new(input: &'a str, callbacks: C) -> Self {
        Self {
            input: input.as_bytes(),
            state: State::Text,
            section_start: 0,
            index: 0,
            tag_start: 0,
            closing_name: (0, 0),
            open_name: (0, 0),
            raw_text_end: None,
            callbacks,
        }
    }

    /// Tokenize the input
    pub fn tokenize(&mut self) {
        while self.index < self.input.len() {
            let c = self.input[self.index];

            match self.state {
                State::Text => self.state_text(c),
                State::BeforeTagName => self.state_before_tag_name(c),
                State::InTagName => self.state_in_tag_name(c),
                State::InSelfClosingTag => self.state_in_self_closing_tag(c),
                State::BeforeClosingTagName => self.state_before_closing_tag_name(c),
                State::InClosingTagName => self.state_in_closing_tag_name(c),
                State::AfterClosingTagName => self.state_after_closing_tag_name(c),
                State::BeforeAttrName => self.state_before_attr_name(c),
                State::InAttrName => self.state_in_attr_name(c),
                State::AfterAttrName => self.state_after_attr_name(c),
                State::BeforeAttrValue => self.state_before_attr_value(c),
                State::InAttrValueDq => self.state_in_attr_value_dq(c),
                State::InAttrValueSq => self.state_in_attr_value_sq(c),
                State::InAttrValueNq => self.state_in_attr_value_nq(c),
                State::BeforeDeclaration => self.state_before_declaration(c),
                State::InDeclaration => self.state_in_declaration(c),
                State::InProcessingInstruction => self.state_in_processing_instruction(c),
                State::BeforeComment => self.state_before_comment(c),
                State::InCommentLike => self.state_in_comment_like(c),
                State::InRawText => self.state_in_raw_text(c),
            }

            self.index += 1;
        }

        // Handle remaining content
        self.cleanup();
        self.callbacks.on_end();
    }

    /// Consume the tokenizer and hand back its callbacks.
    pub fn into_callbacks(self) -> C {
        self.callbacks
    }

    fn cleanup(&mut self) {
        match self.state {
            State::Text | State::InRawText => {
                if self.section_start < self.index {
                    self.callbacks.on_text(self.section_start, self.index);
                }
            }
            State::InTagName => {
                self.callbacks
                    .on_open_tag_name(self.section_start, self.index);
                self.callbacks.on_error(ErrorCode::EofInTag, self.index);
            }
            State::InAttrName => {
                self.callbacks
                    .on_attrib_name(self.section_start, self.index);
                self.callbacks.on_attrib_end(QuoteType::NoValue, self.index);
                self.callbacks.on_error(ErrorCode::EofInTag, self.index);
            }
            State::AfterAttrName => {
                self.callbacks.on_attrib_end(QuoteType::NoValue, self.index);
                self.callbacks.on_error(ErrorCode::EofInTag, self.index);
            }
            State::InAttrValueDq | State::InAttrValueSq | State::InAttrValueNq => {
                if self.section_start < self.index {
                    self.callbacks
                        .on_attrib_data(self.section_start, self.index);
                }
                self.callbacks.on_attrib_end(QuoteType::Unquoted, self.index);
                self.callbacks.on_error(ErrorCode::EofInTag, self.index);
            }
            State::BeforeAttrName
            | State::BeforeAttrValue
            | State::InSelfClosingTag
            | State::BeforeClosingTagName
            | State::InClosingTagName
            | State::AfterClosingTagName => {
                self.callbacks.on_error(ErrorCode::EofInTag, self.index);
            }
            State::InCommentLike => {
                self.callbacks.on_error(ErrorCode::EofInComment, self.index);
                self.callbacks.on_comment(self.section_start, self.index);
            }
            _ => {}
        }
    }

    // ========== State handlers ==========

    fn state_text(&mut self, c: u8) {
        if c == LT {
            if self.index > self.section_start {
                self.callbacks.on_text(self.section_start, self.index);
            }
            self.state = State::BeforeTagName;
            self.section_start = self.index;
            self.tag_start = self.index;
        }
    }

    fn state_before_tag_name(&mut self, c: u8) {
        if c == EXCLAMATION_MARK {
            self.state = State::BeforeDeclaration;
            self.section_start = self.index + 1;
        } else if c == QUESTION_MARK {
            self.state = State::InProcessingInstruction;
            self.section_start = self.index + 1;
        } else if is_tag_start_char(c) {
            self.section_start = self.index;
            self.state = State::InTagName;
        } else if c == SLASH {
            self.state = State::BeforeClosingTagName;
        } else {
            // `a < b`: the `<` stays part of the text
            self.state = State::Text;
            self.state_text(c);
        }
    }

    fn state_in_tag_name(&mut self, c: u8) {
        if is_end_of_tag_section(c) {
            self.callbacks
                .on_open_tag_name(self.section_start, self.index);
            self.open_name = (self.section_start, self.index);
            self.section_start = self.index;
            self.state = State::BeforeAttrName;
            self.state_before_attr_name(c);
        }
    }

    fn state_in_self_closing_tag(&mut self, c: u8) {
        if c == GT {
            self.callbacks.on_self_closing_tag(self.index);
            self.state = State::Text;
            self.section_start = self.index + 1;
        } else if !is_whitespace(c) {
            self.state = State::BeforeAttrName;
            self.state_before_attr_name(c);
        }
    }

    fn state_before_closing_tag_name(&mut self, c: u8) {
        if is_whitespace(c) {
            // Skip
        } else if c == GT {
            self.callbacks
                .on_error(ErrorCode::MissingEndTagName, self.index);
            self.state = State::Text;
            self.section_start = self.index + 1;
        } else {
            self.state = State::InClosingTagName;
            self.section_start = self.index;
        }
    }

    fn state_in_closing_tag_name(&mut self, c: u8) {
        if c == GT || is_whitespace(c) {
            self.closing_name = (self.section_start, self.index);
            if c == GT {
                self.emit_close_tag();
            } else {
                self.state = State::AfterClosingTagName;
            }
        }
    }

    fn state_after_closing_tag_name(&mut self, c: u8) {
        if c == GT {
            self.emit_close_tag();
        }
    }

    fn emit_close_tag(&mut self) {
        let (name_start, name_end) = self.closing_name;
        self.callbacks
            .on_close_tag(self.tag_start, name_start, name_end, self.index + 1);
        self.state = State::Text;
        self.section_start = self.index + 1;
    }

    fn state_before_attr_name(&mut self, c: u8) {
        if c == GT {
            self.callbacks.on_open_tag_end(self.index);
            self.section_start = self.index + 1;
            self.enter_content();
        } else if c == SLASH {
            self.state = State::InSelfClosingTag;
        } else if !is_whitespace(c) {
            self.state = State::InAttrName;
            self.section_start = self.index;
        }
    }

    /// Switch to text, or to raw text for `<style>` and friends.
    fn enter_content(&mut self) {
        let (start, end) = self.open_name;
        let name = std::str::from_utf8(&self.input[start..end]).unwrap_or_default();
        if is_raw_text_tag(name) {
            self.raw_text_end = Some(self.open_name);
            self.state = State::InRawText;
        } else {
            self.state = State::Text;
        }
    }

    fn state_in_attr_name(&mut self, c: u8) {
        if c == EQ || is_end_of_tag_section(c) {
            self.callbacks
                .on_attrib_name(self.section_start, self.index);
            self.section_start = self.index;
            self.state = State::AfterAttrName;
            self.state_after_attr_name(c);
        }
    }

    fn state_after_attr_name(&mut self, c: u8) {
        if c == EQ {
            self.state = State::BeforeAttrValue;
        } else if c == SLASH || c == GT {
            self.callbacks.on_attrib_end(QuoteType::NoValue, self.index);
            self.state = State::BeforeAttrName;
            self.state_before_attr_name(c);
        } else if !is_whitespace(c) {
            self.callbacks.on_attrib_end(QuoteType::NoValue, self.index);
            self.state = State::InAttrName;
            self.section_start = self.index;
        }
    }

    fn state_before_attr_value(&mut self, c: u8) {
        if c == DOUBLE_QUOTE {
            self.state = State::InAttrValueDq;
            self.section_start = self.index + 1;
        } else if c == SINGLE_QUOTE {
            self.state = State::InAttrValueSq;
            self.section_start = self.index + 1;
        } else if !is_whitespace(c) {
            self.section_start = self.index;
            self.state = State::InAttrValueNq;
            self.state_in_attr_value_nq(c);
        }
    }

    fn state_in_attr_value_dq(&mut self, c: u8) {
        if c == DOUBLE_QUOTE {
            self.emit_attr_value(QuoteType::Double);
        }
    }

    fn state_in_attr_value_sq(&mut self, c: u8) {
        if c == SINGLE_QUOTE {
            self.emit_attr_value(QuoteType::Single);
        }
    }

    fn state_in_attr_value_nq(&mut self, c: u8) {
        if is_whitespace(c) || c == GT {
            self.emit_attr_value(QuoteType::Unquoted);
            self.state_before_attr_name(c);
        }
    }

    fn emit_attr_value(&mut self, quote: QuoteType) {
        if self.section_start < self.index {
            self.callbacks
                .on_attrib_data(self.section_start, self.index);
        }
        self.callbacks.on_attrib_end(quote, self.index);
        self.section_start = self.index + 1;
        self.state = State::BeforeAttrName;
    }

    fn state_before_declaration(&mut self, c: u8) {
        if c == DASH {
            self.state = State::BeforeComment;
            self.section_start = self.index + 1;
        } else {
            self.state = State::InDeclaration;
            self.state_in_declaration(c);
        }
    }

    fn state_in_declaration(&mut self, c: u8) {
        if c == GT {
            self.state = State::Text;
            self.section_start = self.index + 1;
        }
    }

    fn state_in_processing_instruction(&mut self, c: u8) {
        if c == GT {
            self.state = State::Text;
            self.section_start = self.index + 1;
        }
    }

    fn state_before_comment(&mut self, c: u8) {
        if c == DASH {
            self.state = State::InCommentLike;
            self.section_start = self.index + 1;
        } else {
            self.state = State::InDeclaration;
            self.state_in_declaration(c);
        }
    }

    fn state_in_comment_like(&mut self, c: u8) {
        if c == DASH
            && self.index + 2 < self.input.len()
            && self.input[self.index + 1] == DASH
            && self.input[self.index + 2] == GT
        {
            self.callbacks.on_comment(self.section_start, self.index);
            self.index += 2;
            self.state = State::Text;
            self.section_start = self.index + 1;
        }
    }

    fn state_in_raw_text(&mut self, c: u8) {
        if c != LT || !self.at_raw_text_end() {
            return;
        }
        if self.index > self.section_start {
            self.callbacks.on_text(self.section_start, self.index);
        }
        self.raw_text_end = None;
        self.tag_start = self.index;
        self.section_start = self.index;
        self.state = State::BeforeTagName;
    }

    /// Check for `</name` followed by the end of the tag name.
    fn at_raw_text_end(&self) -> bool {
        let Some((start, end)) = self.raw_text_end else {
            return false;
        };
        let name = &self.input[start..end];
        let after = self.index + 2 + name.len();
        self.input.get(self.index + 1) == Some(&SLASH)
            && self
                .input
                .get(self.index + 2..after)
                .is_some_and(|candidate| candidate.eq_ignore_ascii_case(name))
            && self
                .input
                .get(after)
                .map_or(true, |c| is_end_of_tag_section(*c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder<'s> {
        source: &'s str,
        events: Vec<String>,
    }

    impl Callbacks for Recorder<'_> {
        fn on_text(&mut self, start: usize, end: usize) {
            self.events.push(format!("text {:?}", &self.source[start..end]));
        }
        fn on_open_tag_name(&mut self, start: usize, end: usize) {
            self.events.push(format!("open {}", &self.source[start..end]));
        }
        fn on_open_tag_end(&mut self, _end: usize) {
            self.events.push("open-end".into());
        }
        fn on_self_closing_tag(&mut self, _end: usize) {
            self.events.push("self-close".into());
        }
        fn on_close_tag(&mut self, _tag_start: usize, start: usize, end: usize, _end: usize) {
            self.events.push(format!("close {}", &self.source[start..end]));
        }
        fn on_attrib_name(&mut self, start: usize, end: usize) {
            self.events.push(format!("attr {}", &self.source[start..end]));
        }
        fn on_attrib_data(&mut self, start: usize, end: usize) {
            self.events.push(format!("value {:?}", &self.source[start..end]));
        }
        fn on_attrib_end(&mut self, quote: QuoteType, _end: usize) {
            self.events.push(format!("attr-end {:?}", quote));
        }
        fn on_comment(&mut self, start: usize, end: usize) {
            self.events.push(format!("comment {:?}", &self.source[start..end]));
        }
        fn on_end(&mut self) {}
        fn on_error(&mut self, code: ErrorCode, _index: usize) {
            self.events.push(format!("error {:?}", code));
        }
    }

    fn tokenize(source: &str) -> Vec<String> {
        let mut tokenizer = Tokenizer::new(
            source,
            Recorder {
                source,
                ..Default::default()
            },
        );
        tokenizer.tokenize();
        tokenizer.into_callbacks().events
    }

    #[test]
    fn test_attributes() {
        let events = tokenize(r#"<a ?b .c="x" @d=y e>"#);
        assert_eq!(
            events,
            vec![
                "open a",
                "attr ?b",
                "attr-end NoValue",
                "attr .c",
                "value \"x\"",
                "attr-end Double",
                "attr @d",
                "value \"y\"",
                "attr-end Unquoted",
                "attr e",
                "attr-end NoValue",
                "open-end",
            ]
        );
    }

    #[test]
    fn test_raw_text_style() {
        let events = tokenize("<style>a > b { color: red }</style>");
        assert_eq!(
            events,
            vec![
                "open style",
                "open-end",
                "text \"a > b { color: red }\"",
                "close style",
            ]
        );
    }

    #[test]
    fn test_comment_and_self_closing() {
        let events = tokenize("<!-- <b> --><x-a/>");
        assert_eq!(events, vec!["comment \" <b> \"", "open x-a", "self-close"]);
    }

    #[test]
    fn test_eof_in_tag() {
        let events = tokenize("<div class");
        assert_eq!(
            events,
            vec!["open div", "attr class", "attr-end NoValue", "error EofInTag"]
        );
    }
}

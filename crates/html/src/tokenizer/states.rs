//! Tokenizer state machine definitions.
//!
//! Raw-text tags are recognised one letter at a time (`BeforeScript1..5`,
//! `AfterStyle1..4`, ...) so the tokenizer never has to look ahead.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TokenizerState {
    Text,
    BeforeTagName,
    InTagName,
    BeforeClosingTagName,
    InClosingTagName,
    AfterClosingTagName,
    AfterSelfCloseSlash,

    BeforeAttributeName,
    InAttributeName,
    AfterAttributeName,
    BeforeAttributeValue,
    InAttributeValueDoubleQuotes,
    InAttributeValueSingleQuotes,
    InAttributeValueNoQuotes,
    AfterQuotedAttributeValue,

    BeforeDeclaration,
    InDeclaration,
    InProcessingInstruction,

    BeforeComment,
    InComment,
    AfterComment1,
    AfterComment2,

    BeforeCData1,
    BeforeCData2,
    BeforeCData3,
    BeforeCData4,
    BeforeCData5,
    BeforeCData6,
    InCData,
    AfterCData1,
    AfterCData2,

    BeforeSpecial,
    BeforeSpecialEnd,

    BeforeScript1,
    BeforeScript2,
    BeforeScript3,
    BeforeScript4,
    BeforeScript5,
    AfterScript1,
    AfterScript2,
    AfterScript3,
    AfterScript4,
    AfterScript5,

    BeforeStyle1,
    BeforeStyle2,
    BeforeStyle3,
    BeforeStyle4,
    AfterStyle1,
    AfterStyle2,
    AfterStyle3,
    AfterStyle4,
}

/// Raw-text element the tokenizer is currently inside of.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum RawText {
    #[default]
    None,
    Script,
    Style,
}

pub(crate) fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// `-` is accepted for custom element names.
pub(crate) fn is_legal_in_tag_name(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

pub(crate) fn is_legal_in_attribute_name(c: char) -> bool {
    !matches!(c, '"' | '\'' | '<' | '=')
}

pub(crate) fn is_legal_in_unquoted_attribute_value(c: char) -> bool {
    !matches!(c, '<' | '=')
}

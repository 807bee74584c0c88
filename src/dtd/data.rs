//! Declarative XHTML 1.0 tables: elements, content-model text, attribute
//! lists, and the entity-name set.
//!
//! Content models are kept as DTD content-spec text and packed by
//! [`super::coder`] when the dataset is built.  Element ids are the indices
//! into [`ELEMENTS`]; the `ELM_*` constants below must stay in table order
//! (checked by the tests in `dtd::tests`).

use const_format::concatcp;

use super::{AttributeDef, AttributeType, DefaultDecl};

/// Index into the element table. Must stay below `0x80` so it fits in a
/// packed model byte.
pub type ElementId = usize;

pub const ENV_S: u8 = 1;
pub const ENV_T: u8 = 2;
pub const ENV_F: u8 = 4;
pub const ENV_TF: u8 = ENV_T | ENV_F;
pub const ENV_STF: u8 = ENV_S | ENV_T | ENV_F;

pub const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";

/// Content specification of one element in one DTD variant.
#[derive(Debug, Clone, Copy)]
pub enum Spec {
    /// Element absent from this variant.
    None,
    Empty,
    Any,
    /// `(#PCDATA | a | b | ...)*` held as the flat name list (`""` for
    /// PCDATA-only content).
    Mixed(&'static str),
    /// Element content held as content-spec text, e.g. `"(head,body)"`.
    Children(&'static str),
}

pub struct ElementDecl {
    pub name: &'static str,
    pub environment: u8,
    /// Indexed by `Doctype::index()`: strict, transitional, frameset.
    pub content: [Spec; 3],
    pub attlist: &'static [AttributeDef],
}

// ---------------------------------------------------------------------------
// Parameter-entity style name sets, composed once at compile time.
// ---------------------------------------------------------------------------

const FONTSTYLE: &str = "tt|i|b|big|small";
const FONTSTYLE_T: &str = concatcp!(FONTSTYLE, "|u|s|strike");
const PHRASE: &str = "em|strong|dfn|code|samp|kbd|var|cite|abbr|acronym";
// Inline elements also allowed inside pre.
const SPECIAL_PRE: &str = "a|br|span|bdo|map|q";
const SPECIAL_S: &str = concatcp!(SPECIAL_PRE, "|object|img|sub|sup|script");
const SPECIAL_T: &str = concatcp!(SPECIAL_S, "|applet|font|basefont|iframe");
const FORMCTRL: &str = "input|select|textarea|label|button";
const MISC_INLINE: &str = "ins|del";

const INLINE_S: &str = concatcp!(SPECIAL_S, "|", FONTSTYLE, "|", PHRASE, "|", FORMCTRL, "|", MISC_INLINE);
const INLINE_T: &str = concatcp!(SPECIAL_T, "|", FONTSTYLE_T, "|", PHRASE, "|", FORMCTRL, "|", MISC_INLINE);

const HEADING: &str = "h1|h2|h3|h4|h5|h6";
const BLOCKTEXT: &str = "pre|hr|blockquote|address";
const BLOCK_S: &str = concatcp!("p|", HEADING, "|div|ul|ol|dl|", BLOCKTEXT, "|fieldset|table|noscript");
const BLOCK_T: &str = concatcp!(
    "p|", HEADING, "|div|ul|ol|dl|dir|menu|", BLOCKTEXT,
    "|center|isindex|fieldset|table|noscript|noframes|form"
);

const FLOW_S: &str = concatcp!(BLOCK_S, "|form|", INLINE_S);
const FLOW_T: &str = concatcp!(BLOCK_T, "|", INLINE_T);

// a excludes itself from its own content.
const A_CONTENT_S: &str = concatcp!(
    "br|span|bdo|map|q|object|img|sub|sup|script|",
    FONTSTYLE, "|", PHRASE, "|", FORMCTRL, "|", MISC_INLINE
);
const A_CONTENT_T: &str = concatcp!(
    "br|span|bdo|map|q|object|img|sub|sup|script|applet|font|basefont|iframe|",
    FONTSTYLE_T, "|", PHRASE, "|", FORMCTRL, "|", MISC_INLINE
);

// pre excludes images, objects and vertical-offset markup.
const PRE_CONTENT: &str = concatcp!(SPECIAL_PRE, "|tt|i|b|", PHRASE, "|", FORMCTRL, "|", MISC_INLINE);

// button forbids nested interactive content; the insertion prohibitions in
// the session enforce the exclusions the flat list cannot express.
const BUTTON_CONTENT: &str = concatcp!(
    "p|", HEADING, "|div|ul|ol|dl|", BLOCKTEXT,
    "|table|br|span|bdo|map|q|object|img|sub|sup|script|", FONTSTYLE, "|", PHRASE
);

const OBJECT_CONTENT_S: &str = concatcp!("param|", FLOW_S);
const OBJECT_CONTENT_T: &str = concatcp!("param|", FLOW_T);
const FIELDSET_CONTENT_S: &str = concatcp!("legend|", FLOW_S);
const FIELDSET_CONTENT_T: &str = concatcp!("legend|", FLOW_T);
const ADDRESS_T: &str = concatcp!(INLINE_T, "|p");

const HTML_CONTENT: &str = "(head,body)";
const HTML_CONTENT_F: &str = "(head,frameset)";

const HEAD_MISC: &str = "(script|style|meta|link|object)*";
const HEAD_CONTENT: &str = concatcp!(
    "(", HEAD_MISC,
    ",((title,", HEAD_MISC, ",(base,", HEAD_MISC, ")?)",
    "|(base,", HEAD_MISC, ",(title,", HEAD_MISC, "))))"
);

const BODY_CONTENT_S: &str = concatcp!("(", BLOCK_S, "|form|ins|del|script)*");
const BLOCKQUOTE_CONTENT_S: &str = concatcp!("(", BLOCK_S, "|script)*");
const NOSCRIPT_CONTENT_S: &str = concatcp!("(", BLOCK_S, "|form|ins|del)+");
const FORM_CONTENT_S: &str = concatcp!("(", BLOCK_S, "|ins|del|script)*");
const MAP_CONTENT_S: &str = concatcp!("((", BLOCK_S, "|form|ins|del)+|(area)+)");
const MAP_CONTENT_T: &str = concatcp!("((", BLOCK_T, "|ins|del)+|(area)+)");

const LIST_CONTENT: &str = "(li)+";
const DL_CONTENT: &str = "(dt|dd)+";
const SELECT_CONTENT: &str = "(optgroup|option)+";
const OPTGROUP_CONTENT: &str = "(option)+";
const TABLE_CONTENT: &str = "(caption?,(col*|colgroup*),thead?,tfoot?,(tbody+|tr+))";
const TR_CONTENT: &str = "(th|td)+";
const ROWS_CONTENT: &str = "(tr)+";
const COLGROUP_CONTENT: &str = "(col)*";
const FRAMESET_CONTENT: &str = "((frameset|frame)+,noframes?)";
const NOFRAMES_CONTENT_F: &str = "(body)";

// ---------------------------------------------------------------------------
// Attribute definitions.
// ---------------------------------------------------------------------------

use AttributeType::*;

const fn implied(name: &'static str, atype: AttributeType) -> AttributeDef {
    AttributeDef {
        name,
        atype,
        default_decl: DefaultDecl::Implied,
        default_value: None,
        environment: ENV_STF,
    }
}

const fn required(name: &'static str, atype: AttributeType) -> AttributeDef {
    AttributeDef {
        name,
        atype,
        default_decl: DefaultDecl::Required,
        default_value: None,
        environment: ENV_STF,
    }
}

const fn defaulted(name: &'static str, atype: AttributeType, value: &'static str) -> AttributeDef {
    AttributeDef {
        name,
        atype,
        default_decl: DefaultDecl::Default,
        default_value: Some(value),
        environment: ENV_STF,
    }
}

const fn fixed(name: &'static str, atype: AttributeType, value: &'static str) -> AttributeDef {
    AttributeDef {
        name,
        atype,
        default_decl: DefaultDecl::Fixed,
        default_value: Some(value),
        environment: ENV_STF,
    }
}

const fn in_env(def: AttributeDef, environment: u8) -> AttributeDef {
    AttributeDef { environment, ..def }
}

pub const ATT_ID: AttributeDef = implied("id", Id);
pub const ATT_CLASS: AttributeDef = implied("class", Cdata);
pub const ATT_STYLE: AttributeDef = implied("style", Cdata);
pub const ATT_TITLE: AttributeDef = implied("title", Cdata);
pub const ATT_LANG: AttributeDef = implied("lang", NmToken);
pub const ATT_XML_LANG: AttributeDef = implied("xml:lang", NmToken);
pub const ATT_DIR: AttributeDef = implied("dir", Enumerated(&["ltr", "rtl"]));
pub const ATT_DIR_REQUIRED: AttributeDef = required("dir", Enumerated(&["ltr", "rtl"]));
pub const ATT_XMLNS: AttributeDef = fixed("xmlns", Cdata, XHTML_NS);
pub const ATT_XML_SPACE: AttributeDef = fixed("xml:space", Enumerated(&["preserve"]), "preserve");

pub const ATT_PROFILE: AttributeDef = implied("profile", Cdata);
pub const ATT_HREF: AttributeDef = implied("href", Cdata);
pub const ATT_NAME: AttributeDef = implied("name", Cdata);
pub const ATT_SHAPE: AttributeDef =
    defaulted("shape", Enumerated(&["rect", "circle", "poly", "default"]), "rect");
pub const ATT_COORDS: AttributeDef = implied("coords", Cdata);
pub const ATT_SRC: AttributeDef = implied("src", Cdata);
pub const ATT_SRC_REQUIRED: AttributeDef = required("src", Cdata);
pub const ATT_ALT_REQUIRED: AttributeDef = required("alt", Cdata);
pub const ATT_TYPE: AttributeDef = implied("type", Cdata);
pub const ATT_TYPE_REQUIRED: AttributeDef = required("type", Cdata);
pub const ATT_INPUT_TYPE: AttributeDef = defaulted(
    "type",
    Enumerated(&[
        "text", "password", "checkbox", "radio", "submit", "reset", "file", "hidden", "image",
        "button",
    ]),
    "text",
);
pub const ATT_BUTTON_TYPE: AttributeDef =
    defaulted("type", Enumerated(&["button", "submit", "reset"]), "submit");
pub const ATT_CONTENT_REQUIRED: AttributeDef = required("content", Cdata);
pub const ATT_HTTP_EQUIV: AttributeDef = implied("http-equiv", Cdata);
pub const ATT_SCHEME: AttributeDef = implied("scheme", Cdata);
pub const ATT_ACTION_REQUIRED: AttributeDef = required("action", Cdata);
pub const ATT_METHOD: AttributeDef = defaulted("method", Enumerated(&["get", "post"]), "get");
pub const ATT_ENCTYPE: AttributeDef =
    defaulted("enctype", Cdata, "application/x-www-form-urlencoded");
pub const ATT_ROWS_REQUIRED: AttributeDef = required("rows", Cdata);
pub const ATT_COLS_REQUIRED: AttributeDef = required("cols", Cdata);
pub const ATT_FRAME_ROWS: AttributeDef = in_env(implied("rows", Cdata), ENV_F);
pub const ATT_FRAME_COLS: AttributeDef = in_env(implied("cols", Cdata), ENV_F);

pub const ATT_CELL_ALIGN: AttributeDef =
    implied("align", Enumerated(&["left", "center", "right", "justify", "char"]));
pub const ATT_VALIGN: AttributeDef =
    implied("valign", Enumerated(&["top", "middle", "bottom", "baseline"]));
pub const ATT_IMG_ALIGN: AttributeDef = in_env(
    implied("align", Enumerated(&["top", "middle", "bottom", "left", "right"])),
    ENV_TF,
);
pub const ATT_BLOCK_ALIGN: AttributeDef = in_env(
    implied("align", Enumerated(&["left", "center", "right", "justify"])),
    ENV_TF,
);
pub const ATT_HR_ALIGN: AttributeDef =
    in_env(implied("align", Enumerated(&["left", "center", "right"])), ENV_TF);
pub const ATT_CAPTION_ALIGN: AttributeDef =
    in_env(implied("align", Enumerated(&["top", "bottom", "left", "right"])), ENV_TF);

pub const ATT_CHECKED: AttributeDef = implied("checked", Enumerated(&["checked"]));
pub const ATT_DISABLED: AttributeDef = implied("disabled", Enumerated(&["disabled"]));
pub const ATT_READONLY: AttributeDef = implied("readonly", Enumerated(&["readonly"]));
pub const ATT_SELECTED: AttributeDef = implied("selected", Enumerated(&["selected"]));
pub const ATT_MULTIPLE: AttributeDef = implied("multiple", Enumerated(&["multiple"]));
pub const ATT_DEFER: AttributeDef = implied("defer", Enumerated(&["defer"]));
pub const ATT_ISMAP: AttributeDef = implied("ismap", Enumerated(&["ismap"]));
pub const ATT_NOHREF: AttributeDef = implied("nohref", Enumerated(&["nohref"]));
pub const ATT_NORESIZE: AttributeDef = in_env(implied("noresize", Enumerated(&["noresize"])), ENV_F);
pub const ATT_NOSHADE: AttributeDef = in_env(implied("noshade", Enumerated(&["noshade"])), ENV_TF);
pub const ATT_COMPACT: AttributeDef = in_env(implied("compact", Enumerated(&["compact"])), ENV_TF);

pub const ATT_FOR: AttributeDef = implied("for", IdRef);
pub const ATT_HEADERS: AttributeDef = implied("headers", IdRefs);
pub const ATT_REL: AttributeDef = implied("rel", NmTokens);
pub const ATT_REV: AttributeDef = implied("rev", NmTokens);
pub const ATT_HREFLANG: AttributeDef = implied("hreflang", NmToken);
pub const ATT_MEDIA: AttributeDef = implied("media", Cdata);
pub const ATT_CHARSET: AttributeDef = implied("charset", Cdata);

pub const ATT_VALUE: AttributeDef = implied("value", Cdata);
pub const ATT_LI_VALUE: AttributeDef = in_env(implied("value", Cdata), ENV_TF);
pub const ATT_WIDTH: AttributeDef = implied("width", Cdata);
pub const ATT_HEIGHT: AttributeDef = implied("height", Cdata);
pub const ATT_BORDER: AttributeDef = implied("border", Cdata);
pub const ATT_IMG_BORDER: AttributeDef = in_env(implied("border", Cdata), ENV_TF);
pub const ATT_CELLSPACING: AttributeDef = implied("cellspacing", Cdata);
pub const ATT_CELLPADDING: AttributeDef = implied("cellpadding", Cdata);
pub const ATT_SUMMARY: AttributeDef = implied("summary", Cdata);
pub const ATT_SPAN: AttributeDef = defaulted("span", Cdata, "1");
pub const ATT_COLSPAN: AttributeDef = defaulted("colspan", Cdata, "1");
pub const ATT_ROWSPAN: AttributeDef = defaulted("rowspan", Cdata, "1");

pub const ATT_SCROLLING: AttributeDef =
    defaulted("scrolling", Enumerated(&["yes", "no", "auto"]), "auto");
pub const ATT_FRAMEBORDER: AttributeDef = defaulted("frameborder", Enumerated(&["1", "0"]), "1");
pub const ATT_LONGDESC: AttributeDef = implied("longdesc", Cdata);
pub const ATT_USEMAP: AttributeDef = implied("usemap", Cdata);
pub const ATT_SIZE: AttributeDef = implied("size", Cdata);
pub const ATT_MAXLENGTH: AttributeDef = implied("maxlength", Cdata);
pub const ATT_TABINDEX: AttributeDef = implied("tabindex", Cdata);
pub const ATT_ACCESSKEY: AttributeDef = implied("accesskey", Cdata);
pub const ATT_LABEL: AttributeDef = implied("label", Cdata);
pub const ATT_LABEL_REQUIRED: AttributeDef = required("label", Cdata);
pub const ATT_CITE: AttributeDef = implied("cite", Cdata);
pub const ATT_DATETIME: AttributeDef = implied("datetime", Cdata);

pub const ATT_BGCOLOR: AttributeDef = in_env(implied("bgcolor", Cdata), ENV_TF);
pub const ATT_TEXT: AttributeDef = in_env(implied("text", Cdata), ENV_TF);
pub const ATT_START: AttributeDef = in_env(implied("start", Cdata), ENV_TF);
pub const ATT_COLOR: AttributeDef = in_env(implied("color", Cdata), ENV_TF);
pub const ATT_FACE: AttributeDef = in_env(implied("face", Cdata), ENV_TF);
pub const ATT_PROMPT: AttributeDef = in_env(implied("prompt", Cdata), ENV_TF);
pub const ATT_LANGUAGE: AttributeDef = in_env(implied("language", Cdata), ENV_TF);
pub const ATT_TARGET: AttributeDef = in_env(implied("target", Cdata), ENV_TF);

// ---------------------------------------------------------------------------
// Attribute lists.
// ---------------------------------------------------------------------------

/// Expand to an attribute list, optionally prefixed with the core+i18n set.
macro_rules! attlist {
    (common $(, $extra:expr)* $(,)?) => {
        &[
            ATT_ID, ATT_CLASS, ATT_STYLE, ATT_TITLE,
            ATT_LANG, ATT_XML_LANG, ATT_DIR
            $(, $extra)*
        ]
    };
    ($($extra:expr),* $(,)?) => { &[$($extra),*] };
}

static ATTS_COMMON: &[AttributeDef] = attlist![common];
static ATTS_HTML: &[AttributeDef] = attlist![ATT_ID, ATT_LANG, ATT_XML_LANG, ATT_DIR, ATT_XMLNS];
static ATTS_HEAD: &[AttributeDef] =
    attlist![ATT_ID, ATT_LANG, ATT_XML_LANG, ATT_DIR, ATT_PROFILE];
static ATTS_TITLE: &[AttributeDef] = attlist![ATT_ID, ATT_LANG, ATT_XML_LANG, ATT_DIR];
static ATTS_BASE: &[AttributeDef] = attlist![ATT_ID, ATT_HREF, ATT_TARGET];
static ATTS_META: &[AttributeDef] = attlist![
    ATT_ID, ATT_LANG, ATT_XML_LANG, ATT_DIR,
    ATT_HTTP_EQUIV, ATT_NAME, ATT_CONTENT_REQUIRED, ATT_SCHEME,
];
static ATTS_LINK: &[AttributeDef] = attlist![
    common,
    ATT_CHARSET, ATT_HREF, ATT_HREFLANG, ATT_TYPE, ATT_REL, ATT_REV, ATT_MEDIA, ATT_TARGET,
];
static ATTS_STYLE_ELM: &[AttributeDef] = attlist![
    ATT_ID, ATT_LANG, ATT_XML_LANG, ATT_DIR,
    ATT_TYPE_REQUIRED, ATT_MEDIA, ATT_TITLE, ATT_XML_SPACE,
];
static ATTS_SCRIPT: &[AttributeDef] = attlist![
    ATT_ID, ATT_CHARSET, ATT_TYPE_REQUIRED, ATT_LANGUAGE, ATT_SRC, ATT_DEFER, ATT_XML_SPACE,
];
static ATTS_BODY: &[AttributeDef] = attlist![common, ATT_BGCOLOR, ATT_TEXT];
static ATTS_FRAMESET: &[AttributeDef] =
    attlist![ATT_ID, ATT_CLASS, ATT_STYLE, ATT_TITLE, ATT_FRAME_ROWS, ATT_FRAME_COLS];
static ATTS_FRAME: &[AttributeDef] = attlist![
    ATT_ID, ATT_CLASS, ATT_STYLE, ATT_TITLE,
    ATT_LONGDESC, ATT_NAME, ATT_SRC, ATT_FRAMEBORDER, ATT_NORESIZE, ATT_SCROLLING,
];
static ATTS_IFRAME: &[AttributeDef] = attlist![
    ATT_ID, ATT_CLASS, ATT_STYLE, ATT_TITLE,
    ATT_LONGDESC, ATT_NAME, ATT_SRC, ATT_FRAMEBORDER, ATT_SCROLLING,
    ATT_IMG_ALIGN, ATT_WIDTH, ATT_HEIGHT,
];
static ATTS_BLOCK_ALIGNED: &[AttributeDef] = attlist![common, ATT_BLOCK_ALIGN];
static ATTS_UL: &[AttributeDef] = attlist![common, ATT_COMPACT];
static ATTS_OL: &[AttributeDef] = attlist![common, ATT_COMPACT, ATT_START];
static ATTS_LI: &[AttributeDef] = attlist![common, ATT_LI_VALUE];
static ATTS_HR: &[AttributeDef] = attlist![common, ATT_HR_ALIGN, ATT_NOSHADE, ATT_SIZE, ATT_WIDTH];
static ATTS_PRE: &[AttributeDef] = attlist![common, ATT_WIDTH, ATT_XML_SPACE];
static ATTS_QUOTE: &[AttributeDef] = attlist![common, ATT_CITE];
static ATTS_INS_DEL: &[AttributeDef] = attlist![common, ATT_CITE, ATT_DATETIME];
static ATTS_A: &[AttributeDef] = attlist![
    common,
    ATT_CHARSET, ATT_TYPE, ATT_NAME, ATT_HREF, ATT_HREFLANG, ATT_REL, ATT_REV,
    ATT_SHAPE, ATT_COORDS, ATT_TABINDEX, ATT_ACCESSKEY, ATT_TARGET,
];
static ATTS_BDO: &[AttributeDef] =
    attlist![ATT_ID, ATT_CLASS, ATT_STYLE, ATT_TITLE, ATT_LANG, ATT_XML_LANG, ATT_DIR_REQUIRED];
static ATTS_FONT: &[AttributeDef] = attlist![
    ATT_ID, ATT_CLASS, ATT_STYLE, ATT_TITLE, ATT_LANG, ATT_XML_LANG, ATT_DIR,
    ATT_SIZE, ATT_COLOR, ATT_FACE,
];
static ATTS_BASEFONT: &[AttributeDef] = attlist![ATT_ID, ATT_SIZE, ATT_COLOR, ATT_FACE];
static ATTS_OBJECT: &[AttributeDef] = attlist![
    common,
    ATT_TYPE, ATT_NAME, ATT_WIDTH, ATT_HEIGHT, ATT_USEMAP, ATT_TABINDEX,
    ATT_IMG_ALIGN, ATT_IMG_BORDER,
];
static ATTS_PARAM: &[AttributeDef] = attlist![ATT_ID, ATT_NAME, ATT_VALUE, ATT_TYPE];
static ATTS_IMG: &[AttributeDef] = attlist![
    common,
    ATT_SRC_REQUIRED, ATT_ALT_REQUIRED, ATT_LONGDESC, ATT_NAME,
    ATT_HEIGHT, ATT_WIDTH, ATT_USEMAP, ATT_ISMAP, ATT_IMG_ALIGN, ATT_IMG_BORDER,
];
static ATTS_MAP: &[AttributeDef] = attlist![common, ATT_NAME];
static ATTS_AREA: &[AttributeDef] = attlist![
    common,
    ATT_SHAPE, ATT_COORDS, ATT_HREF, ATT_NOHREF, ATT_ALT_REQUIRED,
    ATT_TABINDEX, ATT_ACCESSKEY, ATT_TARGET,
];
static ATTS_FORM: &[AttributeDef] = attlist![
    common,
    ATT_ACTION_REQUIRED, ATT_METHOD, ATT_ENCTYPE, ATT_NAME, ATT_TARGET,
];
static ATTS_LABEL: &[AttributeDef] = attlist![common, ATT_FOR, ATT_ACCESSKEY];
static ATTS_INPUT: &[AttributeDef] = attlist![
    common,
    ATT_INPUT_TYPE, ATT_NAME, ATT_VALUE, ATT_CHECKED, ATT_DISABLED, ATT_READONLY,
    ATT_SIZE, ATT_MAXLENGTH, ATT_SRC, ATT_USEMAP, ATT_TABINDEX, ATT_ACCESSKEY,
];
static ATTS_SELECT: &[AttributeDef] =
    attlist![common, ATT_NAME, ATT_SIZE, ATT_MULTIPLE, ATT_DISABLED, ATT_TABINDEX];
static ATTS_OPTGROUP: &[AttributeDef] = attlist![common, ATT_DISABLED, ATT_LABEL_REQUIRED];
static ATTS_OPTION: &[AttributeDef] =
    attlist![common, ATT_SELECTED, ATT_DISABLED, ATT_LABEL, ATT_VALUE];
static ATTS_TEXTAREA: &[AttributeDef] = attlist![
    common,
    ATT_NAME, ATT_ROWS_REQUIRED, ATT_COLS_REQUIRED, ATT_DISABLED, ATT_READONLY,
    ATT_TABINDEX, ATT_ACCESSKEY,
];
static ATTS_LEGEND: &[AttributeDef] = attlist![common, ATT_ACCESSKEY];
static ATTS_BUTTON: &[AttributeDef] = attlist![
    common,
    ATT_NAME, ATT_VALUE, ATT_BUTTON_TYPE, ATT_DISABLED, ATT_TABINDEX, ATT_ACCESSKEY,
];
static ATTS_ISINDEX: &[AttributeDef] =
    attlist![ATT_ID, ATT_CLASS, ATT_STYLE, ATT_TITLE, ATT_LANG, ATT_XML_LANG, ATT_DIR, ATT_PROMPT];
static ATTS_TABLE: &[AttributeDef] = attlist![
    common,
    ATT_SUMMARY, ATT_WIDTH, ATT_BORDER, ATT_CELLSPACING, ATT_CELLPADDING, ATT_BGCOLOR,
];
static ATTS_CAPTION: &[AttributeDef] = attlist![common, ATT_CAPTION_ALIGN];
static ATTS_ROWGROUP: &[AttributeDef] = attlist![common, ATT_CELL_ALIGN, ATT_VALIGN];
static ATTS_COL: &[AttributeDef] = attlist![common, ATT_SPAN, ATT_WIDTH, ATT_CELL_ALIGN, ATT_VALIGN];
static ATTS_TR: &[AttributeDef] = attlist![common, ATT_CELL_ALIGN, ATT_VALIGN, ATT_BGCOLOR];
static ATTS_CELL: &[AttributeDef] = attlist![
    common,
    ATT_HEADERS, ATT_COLSPAN, ATT_ROWSPAN, ATT_CELL_ALIGN, ATT_VALIGN,
    ATT_BGCOLOR, ATT_WIDTH, ATT_HEIGHT,
];
static ATTS_APPLET: &[AttributeDef] =
    attlist![common, ATT_NAME, ATT_WIDTH, ATT_HEIGHT, ATT_IMG_ALIGN];

// ---------------------------------------------------------------------------
// Element table.
// ---------------------------------------------------------------------------

pub const ELM_HTML: ElementId = 0;
pub const ELM_HEAD: ElementId = 1;
pub const ELM_TITLE: ElementId = 2;
pub const ELM_BASE: ElementId = 3;
pub const ELM_META: ElementId = 4;
pub const ELM_LINK: ElementId = 5;
pub const ELM_STYLE: ElementId = 6;
pub const ELM_SCRIPT: ElementId = 7;
pub const ELM_NOSCRIPT: ElementId = 8;
pub const ELM_BODY: ElementId = 9;
pub const ELM_FRAMESET: ElementId = 10;
pub const ELM_FRAME: ElementId = 11;
pub const ELM_NOFRAMES: ElementId = 12;
pub const ELM_IFRAME: ElementId = 13;
pub const ELM_DIV: ElementId = 14;
pub const ELM_P: ElementId = 15;
pub const ELM_H1: ElementId = 16;
pub const ELM_H2: ElementId = 17;
pub const ELM_H3: ElementId = 18;
pub const ELM_H4: ElementId = 19;
pub const ELM_H5: ElementId = 20;
pub const ELM_H6: ElementId = 21;
pub const ELM_UL: ElementId = 22;
pub const ELM_OL: ElementId = 23;
pub const ELM_LI: ElementId = 24;
pub const ELM_DL: ElementId = 25;
pub const ELM_DT: ElementId = 26;
pub const ELM_DD: ElementId = 27;
pub const ELM_DIR: ElementId = 28;
pub const ELM_MENU: ElementId = 29;
pub const ELM_ADDRESS: ElementId = 30;
pub const ELM_HR: ElementId = 31;
pub const ELM_PRE: ElementId = 32;
pub const ELM_BLOCKQUOTE: ElementId = 33;
pub const ELM_CENTER: ElementId = 34;
pub const ELM_INS: ElementId = 35;
pub const ELM_DEL: ElementId = 36;
pub const ELM_A: ElementId = 37;
pub const ELM_SPAN: ElementId = 38;
pub const ELM_BDO: ElementId = 39;
pub const ELM_BR: ElementId = 40;
pub const ELM_EM: ElementId = 41;
pub const ELM_STRONG: ElementId = 42;
pub const ELM_DFN: ElementId = 43;
pub const ELM_CODE: ElementId = 44;
pub const ELM_SAMP: ElementId = 45;
pub const ELM_KBD: ElementId = 46;
pub const ELM_VAR: ElementId = 47;
pub const ELM_CITE: ElementId = 48;
pub const ELM_ABBR: ElementId = 49;
pub const ELM_ACRONYM: ElementId = 50;
pub const ELM_Q: ElementId = 51;
pub const ELM_SUB: ElementId = 52;
pub const ELM_SUP: ElementId = 53;
pub const ELM_TT: ElementId = 54;
pub const ELM_I: ElementId = 55;
pub const ELM_B: ElementId = 56;
pub const ELM_BIG: ElementId = 57;
pub const ELM_SMALL: ElementId = 58;
pub const ELM_U: ElementId = 59;
pub const ELM_S: ElementId = 60;
pub const ELM_STRIKE: ElementId = 61;
pub const ELM_FONT: ElementId = 62;
pub const ELM_BASEFONT: ElementId = 63;
pub const ELM_OBJECT: ElementId = 64;
pub const ELM_PARAM: ElementId = 65;
pub const ELM_IMG: ElementId = 66;
pub const ELM_MAP: ElementId = 67;
pub const ELM_AREA: ElementId = 68;
pub const ELM_FORM: ElementId = 69;
pub const ELM_LABEL: ElementId = 70;
pub const ELM_INPUT: ElementId = 71;
pub const ELM_SELECT: ElementId = 72;
pub const ELM_OPTGROUP: ElementId = 73;
pub const ELM_OPTION: ElementId = 74;
pub const ELM_TEXTAREA: ElementId = 75;
pub const ELM_FIELDSET: ElementId = 76;
pub const ELM_LEGEND: ElementId = 77;
pub const ELM_BUTTON: ElementId = 78;
pub const ELM_ISINDEX: ElementId = 79;
pub const ELM_TABLE: ElementId = 80;
pub const ELM_CAPTION: ElementId = 81;
pub const ELM_THEAD: ElementId = 82;
pub const ELM_TFOOT: ElementId = 83;
pub const ELM_TBODY: ElementId = 84;
pub const ELM_COLGROUP: ElementId = 85;
pub const ELM_COL: ElementId = 86;
pub const ELM_TR: ElementId = 87;
pub const ELM_TH: ElementId = 88;
pub const ELM_TD: ElementId = 89;
pub const ELM_APPLET: ElementId = 90;

/// All variants share the spec.
const fn stf(name: &'static str, spec: Spec, attlist: &'static [AttributeDef]) -> ElementDecl {
    ElementDecl { name, environment: ENV_STF, content: [spec, spec, spec], attlist }
}

/// Strict spec differs from the transitional/frameset one.
const fn stf2(
    name: &'static str,
    strict: Spec,
    loose: Spec,
    attlist: &'static [AttributeDef],
) -> ElementDecl {
    ElementDecl { name, environment: ENV_STF, content: [strict, loose, loose], attlist }
}

/// Transitional and frameset only.
const fn tf(name: &'static str, spec: Spec, attlist: &'static [AttributeDef]) -> ElementDecl {
    ElementDecl { name, environment: ENV_TF, content: [Spec::None, spec, spec], attlist }
}

/// Frameset only.
const fn fr(name: &'static str, spec: Spec, attlist: &'static [AttributeDef]) -> ElementDecl {
    ElementDecl { name, environment: ENV_F, content: [Spec::None, Spec::None, spec], attlist }
}

use Spec::{Children, Empty, Mixed};

pub static ELEMENTS: &[ElementDecl] = &[
    ElementDecl {
        name: "html",
        environment: ENV_STF,
        content: [Children(HTML_CONTENT), Children(HTML_CONTENT), Children(HTML_CONTENT_F)],
        attlist: ATTS_HTML,
    },
    stf("head", Children(HEAD_CONTENT), ATTS_HEAD),
    stf("title", Mixed(""), ATTS_TITLE),
    stf("base", Empty, ATTS_BASE),
    stf("meta", Empty, ATTS_META),
    stf("link", Empty, ATTS_LINK),
    stf("style", Mixed(""), ATTS_STYLE_ELM),
    stf("script", Mixed(""), ATTS_SCRIPT),
    stf2("noscript", Children(NOSCRIPT_CONTENT_S), Mixed(FLOW_T), ATTS_COMMON),
    stf2("body", Children(BODY_CONTENT_S), Mixed(FLOW_T), ATTS_BODY),
    fr("frameset", Children(FRAMESET_CONTENT), ATTS_FRAMESET),
    fr("frame", Empty, ATTS_FRAME),
    ElementDecl {
        name: "noframes",
        environment: ENV_TF,
        content: [Spec::None, Mixed(FLOW_T), Children(NOFRAMES_CONTENT_F)],
        attlist: ATTS_COMMON,
    },
    tf("iframe", Mixed(FLOW_T), ATTS_IFRAME),
    stf2("div", Mixed(FLOW_S), Mixed(FLOW_T), ATTS_BLOCK_ALIGNED),
    stf2("p", Mixed(INLINE_S), Mixed(INLINE_T), ATTS_BLOCK_ALIGNED),
    stf2("h1", Mixed(INLINE_S), Mixed(INLINE_T), ATTS_BLOCK_ALIGNED),
    stf2("h2", Mixed(INLINE_S), Mixed(INLINE_T), ATTS_BLOCK_ALIGNED),
    stf2("h3", Mixed(INLINE_S), Mixed(INLINE_T), ATTS_BLOCK_ALIGNED),
    stf2("h4", Mixed(INLINE_S), Mixed(INLINE_T), ATTS_BLOCK_ALIGNED),
    stf2("h5", Mixed(INLINE_S), Mixed(INLINE_T), ATTS_BLOCK_ALIGNED),
    stf2("h6", Mixed(INLINE_S), Mixed(INLINE_T), ATTS_BLOCK_ALIGNED),
    stf("ul", Children(LIST_CONTENT), ATTS_UL),
    stf("ol", Children(LIST_CONTENT), ATTS_OL),
    stf2("li", Mixed(FLOW_S), Mixed(FLOW_T), ATTS_LI),
    stf("dl", Children(DL_CONTENT), ATTS_COMMON),
    stf2("dt", Mixed(INLINE_S), Mixed(INLINE_T), ATTS_COMMON),
    stf2("dd", Mixed(FLOW_S), Mixed(FLOW_T), ATTS_COMMON),
    tf("dir", Children(LIST_CONTENT), ATTS_UL),
    tf("menu", Children(LIST_CONTENT), ATTS_UL),
    stf2("address", Mixed(INLINE_S), Mixed(ADDRESS_T), ATTS_COMMON),
    stf("hr", Empty, ATTS_HR),
    stf("pre", Mixed(PRE_CONTENT), ATTS_PRE),
    stf2("blockquote", Children(BLOCKQUOTE_CONTENT_S), Mixed(FLOW_T), ATTS_QUOTE),
    tf("center", Mixed(FLOW_T), ATTS_COMMON),
    stf2("ins", Mixed(FLOW_S), Mixed(FLOW_T), ATTS_INS_DEL),
    stf2("del", Mixed(FLOW_S), Mixed(FLOW_T), ATTS_INS_DEL),
    stf2("a", Mixed(A_CONTENT_S), Mixed(A_CONTENT_T), ATTS_A),
    stf2("span", Mixed(INLINE_S), Mixed(INLINE_T), ATTS_COMMON),
    stf2("bdo", Mixed(INLINE_S), Mixed(INLINE_T), ATTS_BDO),
    stf("br", Empty, ATTS_COMMON),
    stf2("em", Mixed(INLINE_S), Mixed(INLINE_T), ATTS_COMMON),
    stf2("strong", Mixed(INLINE_S), Mixed(INLINE_T), ATTS_COMMON),
    stf2("dfn", Mixed(INLINE_S), Mixed(INLINE_T), ATTS_COMMON),
    stf2("code", Mixed(INLINE_S), Mixed(INLINE_T), ATTS_COMMON),
    stf2("samp", Mixed(INLINE_S), Mixed(INLINE_T), ATTS_COMMON),
    stf2("kbd", Mixed(INLINE_S), Mixed(INLINE_T), ATTS_COMMON),
    stf2("var", Mixed(INLINE_S), Mixed(INLINE_T), ATTS_COMMON),
    stf2("cite", Mixed(INLINE_S), Mixed(INLINE_T), ATTS_COMMON),
    stf2("abbr", Mixed(INLINE_S), Mixed(INLINE_T), ATTS_COMMON),
    stf2("acronym", Mixed(INLINE_S), Mixed(INLINE_T), ATTS_COMMON),
    stf2("q", Mixed(INLINE_S), Mixed(INLINE_T), ATTS_QUOTE),
    stf2("sub", Mixed(INLINE_S), Mixed(INLINE_T), ATTS_COMMON),
    stf2("sup", Mixed(INLINE_S), Mixed(INLINE_T), ATTS_COMMON),
    stf2("tt", Mixed(INLINE_S), Mixed(INLINE_T), ATTS_COMMON),
    stf2("i", Mixed(INLINE_S), Mixed(INLINE_T), ATTS_COMMON),
    stf2("b", Mixed(INLINE_S), Mixed(INLINE_T), ATTS_COMMON),
    stf2("big", Mixed(INLINE_S), Mixed(INLINE_T), ATTS_COMMON),
    stf2("small", Mixed(INLINE_S), Mixed(INLINE_T), ATTS_COMMON),
    tf("u", Mixed(INLINE_T), ATTS_COMMON),
    tf("s", Mixed(INLINE_T), ATTS_COMMON),
    tf("strike", Mixed(INLINE_T), ATTS_COMMON),
    tf("font", Mixed(INLINE_T), ATTS_FONT),
    tf("basefont", Empty, ATTS_BASEFONT),
    stf2("object", Mixed(OBJECT_CONTENT_S), Mixed(OBJECT_CONTENT_T), ATTS_OBJECT),
    stf("param", Empty, ATTS_PARAM),
    stf("img", Empty, ATTS_IMG),
    stf2("map", Children(MAP_CONTENT_S), Children(MAP_CONTENT_T), ATTS_MAP),
    stf("area", Empty, ATTS_AREA),
    stf2("form", Children(FORM_CONTENT_S), Mixed(FLOW_T), ATTS_FORM),
    stf2("label", Mixed(INLINE_S), Mixed(INLINE_T), ATTS_LABEL),
    stf("input", Empty, ATTS_INPUT),
    stf("select", Children(SELECT_CONTENT), ATTS_SELECT),
    stf("optgroup", Children(OPTGROUP_CONTENT), ATTS_OPTGROUP),
    stf("option", Mixed(""), ATTS_OPTION),
    stf("textarea", Mixed(""), ATTS_TEXTAREA),
    stf2("fieldset", Mixed(FIELDSET_CONTENT_S), Mixed(FIELDSET_CONTENT_T), ATTS_COMMON),
    stf2("legend", Mixed(INLINE_S), Mixed(INLINE_T), ATTS_LEGEND),
    stf("button", Mixed(BUTTON_CONTENT), ATTS_BUTTON),
    tf("isindex", Empty, ATTS_ISINDEX),
    stf("table", Children(TABLE_CONTENT), ATTS_TABLE),
    stf2("caption", Mixed(INLINE_S), Mixed(INLINE_T), ATTS_CAPTION),
    stf("thead", Children(ROWS_CONTENT), ATTS_ROWGROUP),
    stf("tfoot", Children(ROWS_CONTENT), ATTS_ROWGROUP),
    stf("tbody", Children(ROWS_CONTENT), ATTS_ROWGROUP),
    stf("colgroup", Children(COLGROUP_CONTENT), ATTS_COL),
    stf("col", Empty, ATTS_COL),
    stf("tr", Children(TR_CONTENT), ATTS_TR),
    stf2("th", Mixed(FLOW_S), Mixed(FLOW_T), ATTS_CELL),
    stf2("td", Mixed(FLOW_S), Mixed(FLOW_T), ATTS_CELL),
    tf("applet", Mixed(OBJECT_CONTENT_T), ATTS_APPLET),
];

/// Tag-name aliases normalized before element lookup.
pub static ALIASES: &[(&str, &str)] = &[
    ("listing", "pre"),
    ("plaintext", "pre"),
    ("xmp", "pre"),
];

/// XHTML 1.0 named character entities (lat1 + special + symbol sets).
pub static ENTITIES: &[&str] = &[
    // XML / special
    "quot", "amp", "lt", "gt", "apos",
    "OElig", "oelig", "Scaron", "scaron", "Yuml", "circ", "tilde",
    "ensp", "emsp", "thinsp", "zwnj", "zwj", "lrm", "rlm",
    "ndash", "mdash", "lsquo", "rsquo", "sbquo", "ldquo", "rdquo", "bdquo",
    "dagger", "Dagger", "permil", "lsaquo", "rsaquo", "euro",
    // lat1
    "nbsp", "iexcl", "cent", "pound", "curren", "yen", "brvbar", "sect",
    "uml", "copy", "ordf", "laquo", "not", "shy", "reg", "macr",
    "deg", "plusmn", "sup2", "sup3", "acute", "micro", "para", "middot",
    "cedil", "sup1", "ordm", "raquo", "frac14", "frac12", "frac34", "iquest",
    "Agrave", "Aacute", "Acirc", "Atilde", "Auml", "Aring", "AElig", "Ccedil",
    "Egrave", "Eacute", "Ecirc", "Euml", "Igrave", "Iacute", "Icirc", "Iuml",
    "ETH", "Ntilde", "Ograve", "Oacute", "Ocirc", "Otilde", "Ouml", "times",
    "Oslash", "Ugrave", "Uacute", "Ucirc", "Uuml", "Yacute", "THORN", "szlig",
    "agrave", "aacute", "acirc", "atilde", "auml", "aring", "aelig", "ccedil",
    "egrave", "eacute", "ecirc", "euml", "igrave", "iacute", "icirc", "iuml",
    "eth", "ntilde", "ograve", "oacute", "ocirc", "otilde", "ouml", "divide",
    "oslash", "ugrave", "uacute", "ucirc", "uuml", "yacute", "thorn", "yuml",
    // symbols
    "fnof", "Alpha", "Beta", "Gamma", "Delta", "Epsilon", "Zeta", "Eta",
    "Theta", "Iota", "Kappa", "Lambda", "Mu", "Nu", "Xi", "Omicron",
    "Pi", "Rho", "Sigma", "Tau", "Upsilon", "Phi", "Chi", "Psi", "Omega",
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta",
    "iota", "kappa", "lambda", "mu", "nu", "xi", "omicron", "pi", "rho",
    "sigmaf", "sigma", "tau", "upsilon", "phi", "chi", "psi", "omega",
    "thetasym", "upsih", "piv",
    "bull", "hellip", "prime", "Prime", "oline", "frasl", "weierp",
    "image", "real", "trade", "alefsym", "larr", "uarr", "rarr", "darr",
    "harr", "crarr", "lArr", "uArr", "rArr", "dArr", "hArr",
    "forall", "part", "exist", "empty", "nabla", "isin", "notin", "ni",
    "prod", "sum", "minus", "lowast", "radic", "prop", "infin", "ang",
    "and", "or", "cap", "cup", "int", "there4", "sim", "cong", "asymp",
    "ne", "equiv", "le", "ge", "sub", "sup", "nsub", "sube", "supe",
    "oplus", "otimes", "perp", "sdot", "lceil", "rceil", "lfloor", "rfloor",
    "lang", "rang", "loz", "spades", "clubs", "hearts", "diams",
];

// Roboto 400 (cyrillic-ext, latin) and Open Sans 700 italic (latin), as served by
// https://fonts.googleapis.com/css2 to a desktop Firefox
pub const FONTS_CSS: &str = include_str!("./fonts.css");

pub const ROBOTO_LATIN_CHUNK: &str = "/* latin */\n@font-face{font-family: 'Roboto'; font-style: normal; font-weight: 400; src: url(https://x/roboto.woff2);}";

/// What the service returns to clients it does not recognise: no charset comments.
pub const NO_COMMENT_CSS: &str = "@font-face {\n  font-family: 'Roboto';\n  font-style: normal;\n  font-weight: 400;\n  src: url(https://fonts.gstatic.com/s/roboto/v30/KFOmCnqEu92Fr1Mu4mxK.woff2) format('woff2');\n}\n";

pub const WOFF2_HEADER: &[u8] = b"wOF2OTTO\x00\x00\x1c\x40\x00\x0c\x00\x00";
pub const OTF_HEADER: &[u8] = b"OTTO\x00\x0a\x00\x80\x00\x03\x00\x20";

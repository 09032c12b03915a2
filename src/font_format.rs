//! Identifying a font's container format from its leading signature

use std::fmt;

use bytes::Buf;
use four_cc::FourCC;
use safer_bytes::{error::Truncated, SafeBuf};
use thiserror::Error;

use crate::magic_numbers::{
    TTF_APPLE_TRUE_TYPE_FLAVOR, TTF_CFF_FLAVOR, TTF_COLLECTION_FLAVOR, TTF_TRUE_TYPE_FLAVOR,
    WOFF2_SIGNATURE, WOFF_SIGNATURE,
};

/// Number of bytes [`FontFormat::sniff`] needs.
pub const SIGNATURE_LEN: usize = 4;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SniffError {
    #[error("Truncated signature")]
    Truncated,
}

impl From<Truncated> for SniffError {
    fn from(_: Truncated) -> Self {
        SniffError::Truncated
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFormat {
    Woff2,
    Woff,
    TrueType,
    OpenType,
    Collection,
    Unknown(FourCC),
}

impl FontFormat {
    /// Reads the signature at the front of `buffer`.
    pub fn sniff(buffer: &mut impl Buf) -> Result<Self, SniffError> {
        let signature = FourCC(SafeBuf::try_get_u32(buffer)?.to_be_bytes());
        Ok(match signature {
            WOFF2_SIGNATURE => FontFormat::Woff2,
            WOFF_SIGNATURE => FontFormat::Woff,
            TTF_TRUE_TYPE_FLAVOR | TTF_APPLE_TRUE_TYPE_FLAVOR => FontFormat::TrueType,
            TTF_CFF_FLAVOR => FontFormat::OpenType,
            TTF_COLLECTION_FLAVOR => FontFormat::Collection,
            other => FontFormat::Unknown(other),
        })
    }

    /// The usual file extension, if the format is known.
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            FontFormat::Woff2 => Some("woff2"),
            FontFormat::Woff => Some("woff"),
            FontFormat::TrueType => Some("ttf"),
            FontFormat::OpenType => Some("otf"),
            FontFormat::Collection => Some("ttc"),
            FontFormat::Unknown(_) => None,
        }
    }
}

impl fmt::Display for FontFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontFormat::Woff2 => f.write_str("WOFF2"),
            FontFormat::Woff => f.write_str("WOFF"),
            FontFormat::TrueType => f.write_str("TrueType"),
            FontFormat::OpenType => f.write_str("OpenType (CFF)"),
            FontFormat::Collection => f.write_str("font collection"),
            FontFormat::Unknown(signature) => write!(f, "unknown format {signature:?}"),
        }
    }
}

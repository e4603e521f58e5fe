//! Output formats
//!
//!     treeviz     one line per node, nesting drawn with box characters
//!     json        serde_json, pretty printed
//!     yaml        serde_yaml
//!
//!     The same three formats apply to token lists; tokens in treeviz form are one line
//!     each, optionally prefixed with their `line:column`.

pub mod serialize;
pub mod treeviz;

pub use serialize::{to_json, to_yaml, FormatError};
pub use treeviz::{to_token_listing, to_treeviz_str};

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Treeviz,
    Json,
    Yaml,
}

impl Format {
    pub const NAMES: [&'static str; 3] = ["treeviz", "json", "yaml"];
}

impl FromStr for Format {
    type Err = FormatError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "treeviz" => Ok(Format::Treeviz),
            "json" => Ok(Format::Json),
            "yaml" => Ok(Format::Yaml),
            _ => Err(FormatError::UnknownFormat(name.to_string())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Treeviz => "treeviz",
            Format::Json => "json",
            Format::Yaml => "yaml",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_names() {
        for name in Format::NAMES {
            let format: Format = name.parse().unwrap();
            assert_eq!(format.to_string(), name);
        }
        assert!("xml".parse::<Format>().is_err());
        assert_eq!("JSON".parse::<Format>().unwrap(), Format::Json);
    }
}

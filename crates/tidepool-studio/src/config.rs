use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Result};

/// Effect page shown by the studio.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum PageKind {
    #[default]
    Water,
    Glitch,
}

impl PageKind {
    pub const ALL: [PageKind; 2] = [PageKind::Water, PageKind::Glitch];

    pub fn name(self) -> &'static str {
        match self {
            PageKind::Water => "water",
            PageKind::Glitch => "glitch",
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PageKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match PageKind::ALL.iter().find(|k| k.name().eq_ignore_ascii_case(s)) {
            Some(kind) => Ok(*kind),
            None => bail!("unknown page '{s}' (expected one of: water, glitch)"),
        }
    }
}

/// Studio startup configuration.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    pub page: PageKind,
    pub width: f64,
    pub height: f64,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            page: PageKind::default(),
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl StudioConfig {
    /// Builds the config from command-line arguments (program name excluded).
    ///
    /// The first argument selects the page; no argument means the default page.
    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();

        if let Some(page) = args.next() {
            config.page = page.as_ref().parse()?;
        }
        if let Some(extra) = args.next() {
            bail!("unexpected argument '{}'", extra.as_ref());
        }

        Ok(config)
    }

    pub fn title(&self) -> String {
        format!("tidepool · {}", self.page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_argument_selects_water() {
        let config = StudioConfig::from_args(Vec::<String>::new()).unwrap();
        assert_eq!(config.page, PageKind::Water);
    }

    #[test]
    fn page_names_parse_case_insensitively() {
        assert_eq!("glitch".parse::<PageKind>().unwrap(), PageKind::Glitch);
        assert_eq!("WATER".parse::<PageKind>().unwrap(), PageKind::Water);
    }

    #[test]
    fn unknown_page_is_an_error() {
        let err = StudioConfig::from_args(["needles"]).unwrap_err();
        assert!(err.to_string().contains("needles"));
    }

    #[test]
    fn extra_arguments_are_rejected() {
        assert!(StudioConfig::from_args(["water", "glitch"]).is_err());
    }

    #[test]
    fn title_names_the_page() {
        let config = StudioConfig::from_args(["glitch"]).unwrap();
        assert_eq!(config.title(), "tidepool · glitch");
    }
}

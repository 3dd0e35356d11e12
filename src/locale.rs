//! Locale identifiers for localized desktop entry keys.
//!
//! A locale has the form `lang_COUNTRY.ENCODING@MODIFIER`, where everything
//! but `lang` is optional. The encoding never takes part in key matching.

use std::fmt;

/// A parsed locale identifier such as `sr_YU@Latn` or `en_US.UTF-8`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    /// Language code (e.g. "en", "sr")
    pub lang: String,
    /// Optional country code (e.g. "US")
    pub country: Option<String>,
    /// Optional encoding (e.g. "UTF-8"), ignored for matching
    pub encoding: Option<String>,
    /// Optional modifier (e.g. "Latn", "euro")
    pub modifier: Option<String>,
}

impl Locale {
    /// Parse a locale identifier.
    ///
    /// Returns `None` for an empty value and for the `C` and `POSIX` locales,
    /// which mean "no translation".
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        let (rest, modifier) = match value.split_once('@') {
            Some((rest, modifier)) => (rest, Some(modifier.to_string())),
            None => (value, None),
        };
        let (rest, encoding) = match rest.split_once('.') {
            Some((rest, encoding)) => (rest, Some(encoding.to_string())),
            None => (rest, None),
        };
        let (lang, country) = match rest.split_once('_') {
            Some((lang, country)) => (lang, Some(country.to_string())),
            None => (rest, None),
        };

        if lang.is_empty() || lang == "C" || lang == "POSIX" {
            return None;
        }

        Some(Self {
            lang: lang.to_string(),
            country,
            encoding,
            modifier,
        })
    }

    /// Resolve the message locale from environment-style variables.
    ///
    /// Looks at `LC_ALL`, `LC_MESSAGES` and `LANG` in that order; the first
    /// non-empty one decides.
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|var| lookup(var))
            .find(|value| !value.trim().is_empty())
            .and_then(|value| Self::parse(&value))
    }

    /// Locale suffixes to try for a localized key, most specific first.
    ///
    /// Follows the desktop entry matching order: `lang_COUNTRY@MODIFIER`,
    /// `lang_COUNTRY`, `lang@MODIFIER`, `lang`.
    pub fn candidates(&self) -> Vec<String> {
        let mut candidates = Vec::with_capacity(4);
        if let (Some(country), Some(modifier)) = (&self.country, &self.modifier) {
            candidates.push(format!("{}_{}@{}", self.lang, country, modifier));
        }
        if let Some(country) = &self.country {
            candidates.push(format!("{}_{}", self.lang, country));
        }
        if let Some(modifier) = &self.modifier {
            candidates.push(format!("{}@{}", self.lang, modifier));
        }
        candidates.push(self.lang.clone());
        candidates
    }

    /// The suffix written when storing a translation for this locale.
    ///
    /// This is the most specific form without the encoding.
    pub fn key_suffix(&self) -> String {
        let mut suffix = self.lang.clone();
        if let Some(country) = &self.country {
            suffix.push('_');
            suffix.push_str(country);
        }
        if let Some(modifier) = &self.modifier {
            suffix.push('@');
            suffix.push_str(modifier);
        }
        suffix
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lang)?;
        if let Some(country) = &self.country {
            write!(f, "_{}", country)?;
        }
        if let Some(encoding) = &self.encoding {
            write!(f, ".{}", encoding)?;
        }
        if let Some(modifier) = &self.modifier {
            write!(f, "@{}", modifier)?;
        }
        Ok(())
    }
}

//! Palettes and built-in palette definitions.
//!
//! A palette maps short token names (`skin`, `iron`, ...) to color strings.
//! Rig files either inline one or reference a built-in with `@name`.

use crate::color::{parse_color, ColorError, TRANSPARENT};
use crate::models::PaletteRef;
use image::Rgba;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// List of all available built-in palette names.
const BUILTIN_NAMES: &[&str] = &["miner", "ore", "grayscale"];

/// Error resolving a palette reference or token.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaletteError {
    #[error("unknown built-in palette '@{0}' (available: {})", BUILTIN_NAMES.join(", "))]
    UnknownBuiltin(String),
    #[error("'{token}' is neither a token of palette '{palette}' nor a color")]
    UnknownToken { token: String, palette: String },
    #[error("palette '{palette}' token '{token}': {source}")]
    BadColor {
        palette: String,
        token: String,
        #[source]
        source: ColorError,
    },
}

/// A named set of color tokens, parsed up front.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub name: String,
    colors: HashMap<String, Rgba<u8>>,
}

impl Palette {
    /// Build a palette from token → color-string pairs.
    pub fn from_strings<'a, I>(name: &str, entries: I) -> Result<Self, PaletteError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut colors = HashMap::new();
        for (token, value) in entries {
            let color = parse_color(value).map_err(|source| PaletteError::BadColor {
                palette: name.to_string(),
                token: token.to_string(),
                source,
            })?;
            colors.insert(token.to_string(), color);
        }
        Ok(Self { name: name.to_string(), colors })
    }

    /// Resolve a palette token or a literal color string.
    ///
    /// `_` and `transparent` always resolve to a fully transparent pixel.
    pub fn resolve(&self, token: &str) -> Result<Rgba<u8>, PaletteError> {
        if token == "_" || token == "transparent" {
            return Ok(TRANSPARENT);
        }
        if let Some(color) = self.colors.get(token) {
            return Ok(*color);
        }
        parse_color(token).map_err(|_| PaletteError::UnknownToken {
            token: token.to_string(),
            palette: self.name.clone(),
        })
    }

    /// Number of tokens defined.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Tokens and colors, sorted by token name.
    pub fn entries(&self) -> BTreeMap<&str, Rgba<u8>> {
        self.colors.iter().map(|(k, v)| (k.as_str(), *v)).collect()
    }
}

/// Returns a list of all available built-in palette names.
pub fn list_builtins() -> Vec<&'static str> {
    BUILTIN_NAMES.to_vec()
}

/// Returns a built-in palette by name (without the `@`), or None if not found.
pub fn get_builtin(name: &str) -> Option<Palette> {
    let entries: &[(&str, &str)] = match name {
        "miner" => MINER,
        "ore" => ORE,
        "grayscale" => GRAYSCALE,
        _ => return None,
    };
    // Built-in tables are hex literals and always parse
    Palette::from_strings(name, entries.iter().copied()).ok()
}

/// Resolve a `@name` reference to a built-in palette.
pub fn resolve_builtin_ref(reference: &str) -> Result<Palette, PaletteError> {
    let name = reference.strip_prefix('@').unwrap_or(reference);
    get_builtin(name).ok_or_else(|| PaletteError::UnknownBuiltin(name.to_string()))
}

/// Resolve a rig's palette reference into a palette.
///
/// Inline palettes are named after the rig that declares them.
pub fn resolve_palette(palette: &PaletteRef, rig_name: &str) -> Result<Palette, PaletteError> {
    match palette {
        PaletteRef::Named(reference) => resolve_builtin_ref(reference),
        PaletteRef::Inline(entries) => {
            Palette::from_strings(rig_name, entries.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        }
    }
}

/// The miner character: skin, hard hat, work clothes and pickaxe.
const MINER: &[(&str, &str)] = &[
    ("outline", "#1B1421"),
    ("skin", "#E8B796"),
    ("skin_shadow", "#C08B6B"),
    ("hair", "#4A2F1F"),
    ("eye", "#1B1421"),
    ("helmet", "#F2C230"),
    ("helmet_shadow", "#C8901C"),
    ("lamp", "#FFF6B0"),
    ("shirt", "#3F6FB5"),
    ("shirt_shadow", "#2B4C80"),
    ("pants", "#5A4632"),
    ("pants_shadow", "#3F3022"),
    ("boots", "#2E2420"),
    ("wood", "#8B5A2B"),
    ("wood_shadow", "#5E3B1B"),
    ("iron", "#B8C0C8"),
    ("iron_shadow", "#6E7780"),
];

/// Ground and ore tones for terrain tiles.
const ORE: &[(&str, &str)] = &[
    ("dirt", "#7A5230"),
    ("dirt_dark", "#553820"),
    ("stone", "#7F7F86"),
    ("stone_dark", "#55555C"),
    ("coal", "#2A2A2E"),
    ("copper", "#C8733A"),
    ("iron", "#C9B8A8"),
    ("gold", "#F2C94C"),
    ("diamond", "#7FE3F0"),
];

/// Five-step grayscale ramp.
const GRAYSCALE: &[(&str, &str)] = &[
    ("black", "#000000"),
    ("dark", "#404040"),
    ("mid", "#808080"),
    ("light", "#C0C0C0"),
    ("white", "#FFFFFF"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_builtins_load() {
        for name in list_builtins() {
            let palette = get_builtin(name).expect("built-in palette should parse");
            assert!(!palette.is_empty(), "palette {} is empty", name);
        }
    }

    #[test]
    fn test_resolve_token_and_literal() {
        let palette = get_builtin("miner").unwrap();
        assert_eq!(palette.resolve("wood").unwrap(), Rgba([0x8B, 0x5A, 0x2B, 255]));
        assert_eq!(palette.resolve("#FFF").unwrap(), Rgba([255, 255, 255, 255]));
        assert_eq!(palette.resolve("_").unwrap(), TRANSPARENT);
    }

    #[test]
    fn test_unknown_token() {
        let palette = get_builtin("ore").unwrap();
        assert!(matches!(
            palette.resolve("mithril"),
            Err(PaletteError::UnknownToken { .. })
        ));
    }

    #[test]
    fn test_builtin_ref() {
        assert_eq!(resolve_builtin_ref("@grayscale").unwrap().len(), 5);
        assert_eq!(
            resolve_builtin_ref("@nope"),
            Err(PaletteError::UnknownBuiltin("nope".to_string()))
        );
    }

    #[test]
    fn test_resolve_palette_ref() {
        let named = resolve_palette(&PaletteRef::Named("@ore".to_string()), "tile").unwrap();
        assert_eq!(named.name, "ore");

        let inline = PaletteRef::Inline(
            [("glow".to_string(), "#FF0".to_string())].into_iter().collect(),
        );
        let palette = resolve_palette(&inline, "lantern").unwrap();
        assert_eq!(palette.name, "lantern");
        assert_eq!(palette.resolve("glow").unwrap(), Rgba([255, 255, 0, 255]));
    }

    #[test]
    fn test_bad_inline_color() {
        let err = Palette::from_strings("custom", [("skin", "#12")]).unwrap_err();
        assert!(matches!(err, PaletteError::BadColor { .. }));
        assert!(err.to_string().contains("skin"));
    }
}

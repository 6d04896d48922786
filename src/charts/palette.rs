//! Dashboard color palette.

use crate::charts::spec::Rgb;

pub const MARKER_COLOR: Rgb = Rgb(255, 0, 0);
pub const FALLBACK_COLOR: Rgb = Rgb(96, 125, 139);

/// Stock and intake materials.
const MATERIALS: [(&str, Rgb); 10] = [
    ("Rocha Detonada", Rgb(0x00, 0x66, 0x99)),
    ("Rachão", Rgb(0x99, 0x00, 0x33)),
    ("Macadame", Rgb(0x33, 0x99, 0xFF)),
    ("Pó de Pedra", Rgb(0x00, 0x66, 0x99)),
    ("Pedrisco", Rgb(0x66, 0x00, 0x99)),
    ("Brita 1", Rgb(0x99, 0x00, 0x33)),
    ("Brita 2", Rgb(0xFF, 0xCC, 0x00)),
    ("Cimento Asfáltico", Rgb(0x33, 0x99, 0x66)),
    ("Enchimento", Rgb(0xCC, 0x00, 0x99)),
    ("Cimento", Rgb(0xCC, 0x00, 0x66)),
];

pub fn material_color(name: &str) -> Rgb {
    MATERIALS
        .iter()
        .find(|(material, _)| *material == name)
        .map(|(_, color)| *color)
        .unwrap_or(FALLBACK_COLOR)
}

/// Primary outflow pie.
pub const PIE_SALES: Rgb = Rgb(0x00, 0x66, 0x99);
pub const PIE_INTERNAL_USE: Rgb = Rgb(0x66, 0x00, 0x99);
pub const PIE_REMAINING: Rgb = Rgb(0x99, 0x00, 0x33);

/// Bar chart and product-line pies.
pub const SALES: Rgb = Rgb(0x99, 0x00, 0x33);
pub const INTERNAL_USE: Rgb = Rgb(0x00, 0x66, 0x99);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_materials_have_colors() {
        assert_eq!(material_color("Brita 2"), Rgb(0xFF, 0xCC, 0x00));
        assert_eq!(material_color("Cimento"), Rgb(0xCC, 0x00, 0x66));
    }

    #[test]
    fn unknown_names_fall_back() {
        assert_eq!(material_color("Estoque"), FALLBACK_COLOR);
        assert_eq!(material_color("Areia"), FALLBACK_COLOR);
    }
}

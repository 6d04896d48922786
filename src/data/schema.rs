//! Sheet Schema Module
//! Declarative column tables for the three workbook sheets.

/// Date column shared by every sheet.
pub const DATE_COL: &str = "Dias";
/// Free-text observation column.
pub const NOTE_COL: &str = "Obs";
/// Derived reporting period column (`YYYY-MM`).
pub const PERIOD_COL: &str = "Mês";

pub const PRODUCTION_COL: &str = "Total Producao";
pub const SALES_COL: &str = "Vendas";
pub const INTERNAL_USE_COL: &str = "Obras";

/// Primary circuit stock materials.
pub const PRIMARY_MATERIALS: [&str; 2] = ["Rocha Detonada", "Rachão"];

/// Secondary circuit stock materials.
pub const SECONDARY_MATERIALS: [&str; 5] =
    ["Macadame", "Pó de Pedra", "Pedrisco", "Brita 1", "Brita 2"];

/// Sales and internal-use columns of one material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutflowColumns {
    pub material: &'static str,
    pub sales: &'static str,
    pub internal_use: &'static str,
}

/// Secondary circuit outflow columns, in chart order.
pub const SECONDARY_OUTFLOWS: [OutflowColumns; 5] = [
    OutflowColumns {
        material: "Macadame",
        sales: "Venda Mac",
        internal_use: "Obras Mac",
    },
    OutflowColumns {
        material: "Pó de Pedra",
        sales: "Venda Po",
        internal_use: "Obras Po",
    },
    OutflowColumns {
        material: "Pedrisco",
        sales: "Venda Ped",
        internal_use: "Obras Ped",
    },
    OutflowColumns {
        material: "Brita 1",
        sales: "Venda B1",
        internal_use: "Obras B1",
    },
    OutflowColumns {
        material: "Brita 2",
        sales: "Venda B2",
        internal_use: "Obras B2",
    },
];

/// The three sheets read from the workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetKind {
    Primary,
    Secondary,
    Plants,
}

impl SheetKind {
    pub fn schema(self) -> &'static SheetSchema {
        match self {
            SheetKind::Primary => &PRIMARY_SCHEMA,
            SheetKind::Secondary => &SECONDARY_SCHEMA,
            SheetKind::Plants => &PLANTS_SCHEMA,
        }
    }
}

/// Static description of one sheet: its name, header renames and the
/// canonical columns that must exist once renamed.
#[derive(Debug)]
pub struct SheetSchema {
    pub sheet_name: &'static str,
    pub renames: &'static [(&'static str, &'static str)],
    pub required: &'static [&'static str],
    /// Quantity columns read when present but not required at load.
    pub optional_quantities: &'static [&'static str],
}

impl SheetSchema {
    /// Whether `name` holds tonnages that are zero-filled on load.
    /// Any other column is carried through untouched.
    pub fn is_quantity_column(&self, name: &str) -> bool {
        self.required.contains(&name) || self.optional_quantities.contains(&name)
    }
}

pub static PRIMARY_SCHEMA: SheetSchema = SheetSchema {
    sheet_name: "PRIMARIO",
    renames: &[
        ("Estoque RD", "Rocha Detonada"),
        ("Estoque Rachão", "Rachão"),
    ],
    required: &[
        "Rocha Detonada",
        "Rachão",
        PRODUCTION_COL,
        SALES_COL,
        INTERNAL_USE_COL,
    ],
    optional_quantities: &[],
};

pub static SECONDARY_SCHEMA: SheetSchema = SheetSchema {
    sheet_name: "SECUNDARIO",
    renames: &[
        ("Estoque Mac", "Macadame"),
        ("Estoque Po", "Pó de Pedra"),
        ("Estoque Ped", "Pedrisco"),
        ("Estoque B1", "Brita 1"),
        ("Estoque B2", "Brita 2"),
    ],
    required: &[
        "Macadame",
        "Pó de Pedra",
        "Pedrisco",
        "Brita 1",
        "Brita 2",
        "Venda Mac",
        "Obras Mac",
        "Venda Po",
        "Obras Po",
        "Venda Ped",
        "Obras Ped",
        "Venda B1",
        "Obras B1",
        "Venda B2",
        "Obras B2",
    ],
    optional_quantities: &[],
};

// Plant columns are checked when a plant is selected, not at load time.
pub static PLANTS_SCHEMA: SheetSchema = SheetSchema {
    sheet_name: "USA&USS",
    renames: &[],
    required: &[],
    optional_quantities: &[
        "Cimento Asfáltico",
        "USA B2",
        "USA B1",
        "USA Pedrisco",
        "USA Pó de Pedra",
        "Enchimento",
        "CBUQ",
        "Vendas CBUQ",
        "Obras CBUQ",
        "Binder",
        "Vendas Binder",
        "Obras Binder",
        "BGS",
        "Vendas BGS",
        "Obras BGS",
        "BGMC",
        "Vendas BGMC",
        "Obras BGMC",
        "BGTC",
        "Vendas BGTC",
        "Obras BGTC",
        "USS Cimento",
        "USS B2",
        "USS B1",
        "USS Pedrisco",
        "USS Pó de Pedra",
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renames_target_required_columns() {
        for kind in [SheetKind::Primary, SheetKind::Secondary, SheetKind::Plants] {
            let schema = kind.schema();
            for (_, canonical) in schema.renames {
                assert!(schema.required.contains(canonical), "{canonical} not required");
            }
        }
    }

    #[test]
    fn secondary_outflows_cover_required_columns() {
        for outflow in SECONDARY_OUTFLOWS {
            assert!(SECONDARY_SCHEMA.required.contains(&outflow.sales));
            assert!(SECONDARY_SCHEMA.required.contains(&outflow.internal_use));
            assert!(SECONDARY_MATERIALS.contains(&outflow.material));
        }
    }

    #[test]
    fn only_known_columns_are_quantities() {
        assert!(PRIMARY_SCHEMA.is_quantity_column("Rocha Detonada"));
        assert!(PRIMARY_SCHEMA.is_quantity_column(SALES_COL));
        assert!(!PRIMARY_SCHEMA.is_quantity_column("Dia da Semana"));
        assert!(!PRIMARY_SCHEMA.is_quantity_column(DATE_COL));
        assert!(!PRIMARY_SCHEMA.is_quantity_column(NOTE_COL));
        assert!(PLANTS_SCHEMA.is_quantity_column("USS B2"));
        assert!(!PLANTS_SCHEMA.is_quantity_column("Responsável"));
    }
}

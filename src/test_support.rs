//! Raw sheet fixtures shared by unit tests.

use polars::prelude::*;

pub fn raw_primary() -> DataFrame {
    df!(
        "Dias" => ["05/01/2025", "06/01/2025", "07/01/2025", "03/02/2025"],
        "Estoque RD" => [Some(100.0), Some(120.0), None, Some(60.0)],
        "Estoque Rachão" => [Some(50.0), Some(45.0), Some(70.0), Some(30.0)],
        "Total Producao" => [Some(20.0), Some(25.0), Some(5.0), Some(12.0)],
        "Vendas" => [Some(10.0), Some(6.0), None, Some(4.0)],
        "Obras" => [Some(5.0), Some(2.0), Some(1.0), None],
        "Obs" => [Some("0"), Some("manutenção"), None, Some("chuva")]
    )
    .unwrap()
}

pub fn raw_secondary() -> DataFrame {
    df!(
        "Dias" => ["05/01/2025", "06/01/2025", "03/02/2025"],
        "Estoque Mac" => [10.0, 12.0, 8.0],
        "Estoque Po" => [30.0, 28.0, 20.0],
        "Estoque Ped" => [15.0, 14.0, 9.0],
        "Estoque B1" => [40.0, 38.0, 33.0],
        "Estoque B2" => [25.0, 22.0, 21.0],
        "Venda Mac" => [Some(1.0), None, Some(2.0)],
        "Obras Mac" => [0.0, 1.0, 0.0],
        "Venda Po" => [2.0, 2.0, 1.0],
        "Obras Po" => [1.0, 0.0, 0.0],
        "Venda Ped" => [0.5, 0.5, 0.0],
        "Obras Ped" => [0.0, 0.0, 1.0],
        "Venda B1" => [3.0, 4.0, 5.0],
        "Obras B1" => [1.0, 1.0, 1.0],
        "Venda B2" => [0.0, 2.0, 0.0],
        "Obras B2" => [2.0, 0.0, 0.0],
        "Obs" => [None::<&str>, Some("peneira trocada"), None]
    )
    .unwrap()
}

pub fn raw_plants() -> DataFrame {
    df!(
        "Dias" => ["05/01/2025", "06/01/2025", "03/02/2025"],
        "Cimento Asfáltico" => [10.0, 12.0, 9.0],
        "USA B2" => [1.0, 2.0, 3.0],
        "USA B1" => [3.0, 4.0, 5.0],
        "USA Pedrisco" => [5.0, 6.0, 7.0],
        "USA Pó de Pedra" => [7.0, 8.0, 9.0],
        "Enchimento" => [0.5, 0.5, 0.5],
        "CBUQ" => [20.0, 30.0, 10.0],
        "Vendas CBUQ" => [15.0, 20.0, 5.0],
        "Obras CBUQ" => [5.0, 10.0, 5.0],
        "Binder" => [8.0, 0.0, 1.0],
        "Vendas Binder" => [6.0, 0.0, 1.0],
        "Obras Binder" => [2.0, 0.0, 0.0],
        "BGS" => [4.0, 4.0, 4.0],
        "Vendas BGS" => [3.0, 3.0, 3.0],
        "Obras BGS" => [1.0, 1.0, 1.0],
        "BGMC" => [0.0, 9.0, 0.0],
        "Vendas BGMC" => [0.0, 5.0, 0.0],
        "Obras BGMC" => [0.0, 4.0, 0.0],
        "BGTC" => [2.0, 2.0, 2.0],
        "Vendas BGTC" => [2.0, 0.0, 1.0],
        "Obras BGTC" => [0.0, 2.0, 1.0],
        "USS Cimento" => [1.0, 1.5, 2.0],
        "USS B2" => [11.0, 12.0, 13.0],
        "USS B1" => [13.0, 14.0, 15.0],
        "USS Pedrisco" => [15.0, 16.0, 17.0],
        "USS Pó de Pedra" => [17.0, 18.0, 19.0],
        "Obs" => ["0", "usina parada", "0"]
    )
    .unwrap()
}

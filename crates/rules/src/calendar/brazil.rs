//! Brazilian national and state holidays.

use chrono::{Duration, NaiveDate};

/// State codes with a regional table.
pub const KNOWN_REGIONS: &[&str] = &[
    "AC", "AL", "AM", "AP", "BA", "DF", "ES", "MA", "MG", "PA", "PI", "RJ", "RR", "RS", "SE",
    "SP", "TO",
];

/// Easter Sunday (anonymous Gregorian algorithm).
pub fn easter(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

fn fixed(year: i32, entries: &[(u32, u32, &'static str)]) -> Vec<(NaiveDate, &'static str)> {
    entries
        .iter()
        .filter_map(|&(m, d, name)| NaiveDate::from_ymd_opt(year, m, d).map(|date| (date, name)))
        .collect()
}

fn easter_offset(year: i32, days: i64, name: &'static str) -> Option<(NaiveDate, &'static str)> {
    easter(year).map(|e| (e + Duration::days(days), name))
}

/// Nationwide holidays for one year.
pub fn national(year: i32) -> Vec<(NaiveDate, &'static str)> {
    let mut days = fixed(
        year,
        &[
            (1, 1, "Confraternização Universal"),
            (4, 21, "Tiradentes"),
            (5, 1, "Dia do Trabalhador"),
            (9, 7, "Independência do Brasil"),
            (10, 12, "Nossa Senhora Aparecida"),
            (11, 2, "Finados"),
            (11, 15, "Proclamação da República"),
            (12, 25, "Natal"),
        ],
    );
    days.extend(easter_offset(year, -2, "Sexta-feira Santa"));
    if year >= 2024 {
        days.extend(fixed(
            year,
            &[(11, 20, "Dia Nacional de Zumbi e da Consciência Negra")],
        ));
    }
    days.sort_by_key(|(date, _)| *date);
    days
}

/// State holidays for one year; `None` when the code has no table.
pub fn regional(region: &str, year: i32) -> Option<Vec<(NaiveDate, &'static str)>> {
    let days = match region {
        "AC" => fixed(
            year,
            &[
                (1, 23, "Dia do Evangélico"),
                (6, 15, "Aniversário do Acre"),
                (9, 5, "Dia da Amazônia"),
                (11, 17, "Assinatura do Tratado de Petrópolis"),
            ],
        ),
        "AL" => fixed(
            year,
            &[
                (6, 24, "São João"),
                (6, 29, "São Pedro"),
                (9, 16, "Emancipação Política de Alagoas"),
            ],
        ),
        "AM" => fixed(
            year,
            &[
                (9, 5, "Elevação do Amazonas à Categoria de Província"),
                (12, 8, "Dia de Nossa Senhora da Conceição"),
            ],
        ),
        "AP" => fixed(
            year,
            &[
                (3, 19, "Dia de São José"),
                (7, 25, "São Tiago"),
                (10, 5, "Criação do Estado do Amapá"),
            ],
        ),
        "BA" => fixed(year, &[(7, 2, "Independência da Bahia")]),
        "DF" => fixed(
            year,
            &[(4, 21, "Fundação de Brasília"), (11, 30, "Dia do Evangélico")],
        ),
        "ES" => fixed(year, &[(10, 28, "Dia do Servidor Público")]),
        "MA" => fixed(
            year,
            &[(7, 28, "Adesão do Maranhão à Independência do Brasil")],
        ),
        "MG" => fixed(year, &[(4, 21, "Data Magna de Minas Gerais")]),
        "PA" => fixed(
            year,
            &[(8, 15, "Adesão do Grão-Pará à Independência do Brasil")],
        ),
        "PI" => fixed(year, &[(10, 19, "Dia do Piauí")]),
        "RJ" => {
            let mut days = fixed(
                year,
                &[
                    (4, 23, "Dia de São Jorge"),
                    (11, 20, "Dia da Consciência Negra"),
                ],
            );
            days.extend(easter_offset(year, -47, "Carnaval"));
            days
        }
        "RR" => fixed(year, &[(10, 5, "Criação de Roraima")]),
        "RS" => fixed(year, &[(9, 20, "Revolução Farroupilha")]),
        "SE" => fixed(year, &[(7, 8, "Autonomia Política de Sergipe")]),
        "SP" => fixed(year, &[(7, 9, "Revolução Constitucionalista de 1932")]),
        "TO" => fixed(
            year,
            &[
                (3, 18, "Autonomia do Tocantins"),
                (9, 8, "Nossa Senhora da Natividade"),
                (10, 5, "Criação do Tocantins"),
            ],
        ),
        _ => return None,
    };
    Some(days)
}

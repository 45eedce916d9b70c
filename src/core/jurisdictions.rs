//! Brazilian federative units (UF) and their IBGE numeric codes.

/// Code used for foreign parties in place of a UF.
pub const FOREIGN: &str = "EX";

/// The 27 federative units with their IBGE codes, sorted by abbreviation.
static JURISDICTIONS: &[(&str, &str)] = &[
    ("AC", "12"),
    ("AL", "27"),
    ("AM", "13"),
    ("AP", "16"),
    ("BA", "29"),
    ("CE", "23"),
    ("DF", "53"),
    ("ES", "32"),
    ("GO", "52"),
    ("MA", "21"),
    ("MG", "31"),
    ("MS", "50"),
    ("MT", "51"),
    ("PA", "15"),
    ("PB", "25"),
    ("PE", "26"),
    ("PI", "22"),
    ("PR", "41"),
    ("RJ", "33"),
    ("RN", "24"),
    ("RO", "11"),
    ("RR", "14"),
    ("RS", "43"),
    ("SC", "42"),
    ("SE", "28"),
    ("SP", "35"),
    ("TO", "17"),
];

/// Check whether `uf` is one of the 27 federative units.
pub fn is_known_jurisdiction(uf: &str) -> bool {
    JURISDICTIONS.binary_search_by(|(code, _)| code.cmp(&uf)).is_ok()
}

/// IBGE numeric code for a UF (e.g. "SP" → "35").
pub fn ibge_code(uf: &str) -> Option<&'static str> {
    JURISDICTIONS
        .binary_search_by(|(code, _)| code.cmp(&uf))
        .ok()
        .map(|i| JURISDICTIONS[i].1)
}

/// UF for an IBGE numeric code (e.g. "35" → "SP").
pub fn jurisdiction_for_ibge(code: &str) -> Option<&'static str> {
    JURISDICTIONS
        .iter()
        .find(|(_, ibge)| *ibge == code)
        .map(|(uf, _)| *uf)
}

/// All UF abbreviations, sorted.
pub fn all_jurisdictions() -> impl Iterator<Item = &'static str> {
    JURISDICTIONS.iter().map(|(uf, _)| *uf)
}

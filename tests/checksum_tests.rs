use nota::checksum::*;

// ── Taxpayer ids ─────────────────────────────────────────────────────────────

#[test]
fn cnpj_known_values() {
    assert_eq!(check_cnpj("11222333000181"), CheckResult::Valid);
    assert_eq!(check_cnpj("33987654000100"), CheckResult::Valid);
    assert_eq!(check_cnpj("04567890000179"), CheckResult::Valid);
    assert_eq!(cnpj_check_digits("339876540001"), Some([0, 0]));
}

#[test]
fn cnpj_mismatch_reports_both_digit_pairs() {
    assert_eq!(
        check_cnpj("11222333000180"),
        CheckResult::Mismatch {
            expected: "81".into(),
            found: "80".into(),
        }
    );
}

#[test]
fn cnpj_malformed_inputs() {
    assert!(check_cnpj("").is_invalid_format());
    assert!(check_cnpj("1122233300018").is_invalid_format());
    assert!(check_cnpj("11.222.333/0001-81").is_invalid_format());
    assert!(check_cnpj("00000000000000").is_invalid_format());
    assert!(check_cnpj("1122233300018a").is_invalid_format());
}

#[test]
fn cpf_known_values() {
    assert_eq!(check_cpf("52998224725"), CheckResult::Valid);
    assert_eq!(cpf_check_digits("529982247"), Some([2, 5]));
    assert!(matches!(check_cpf("52998224726"), CheckResult::Mismatch { .. }));
    assert!(check_cpf("11111111111").is_invalid_format());
}

#[test]
fn tax_id_dispatches_by_length() {
    assert!(check_tax_id("11222333000181").is_valid());
    assert!(check_tax_id("52998224725").is_valid());
    let r = check_tax_id("123456789");
    assert!(r.is_invalid_format());
    assert!(r.to_string().contains("got 9"));
}

// ── Access keys ──────────────────────────────────────────────────────────────

const NFE_KEY: &str = "35240611222333000181550010000012341000056786";
const CTE_KEY: &str = "35240611222333000181570010000012341000056783";
const MDFE_KEY: &str = "35240611222333000181580010000012341000056787";

#[test]
fn access_keys_validate() {
    for key in [NFE_KEY, CTE_KEY, MDFE_KEY] {
        assert_eq!(check_access_key(key), CheckResult::Valid, "{key}");
    }
}

#[test]
fn access_key_check_digit_matches_last_position() {
    assert_eq!(access_key_check_digit(&NFE_KEY[..43]), Some(6));
    assert_eq!(access_key_check_digit(&CTE_KEY[..43]), Some(3));
    assert_eq!(access_key_check_digit("123"), None);
}

#[test]
fn access_key_corruption() {
    let mut bad = NFE_KEY[..43].to_string();
    bad.push('5');
    assert_eq!(
        check_access_key(&bad),
        CheckResult::Mismatch {
            expected: "6".into(),
            found: "5".into(),
        }
    );
    assert!(check_access_key(&NFE_KEY[..43]).is_invalid_format());
    assert!(check_access_key("3524 0611222333000181550010000012341000056786").is_invalid_format());
}

#[test]
fn compose_then_parse() {
    let key = compose_access_key("35", "2406", "11222333000181", "55", 1, 1234, 1, 5678).unwrap();
    assert_eq!(key, NFE_KEY);

    let parsed = AccessKey::parse(&key).unwrap();
    assert_eq!(parsed.jurisdiction_code, "35");
    assert_eq!(parsed.year, 24);
    assert_eq!(parsed.month, 6);
    assert_eq!(parsed.cnpj, "11222333000181");
    assert_eq!(parsed.model, "55");
    assert_eq!(parsed.series, 1);
    assert_eq!(parsed.number, 1234);
    assert_eq!(parsed.emission_type, 1);
    assert_eq!(parsed.check_digit, 6);
}

#[test]
fn compose_rejects_oversized_fields() {
    assert!(compose_access_key("35", "2406", "11222333000181", "55", 1000, 1, 1, 1).is_none());
    assert!(
        compose_access_key("35", "2406", "11222333000181", "55", 1, 1_000_000_000, 1, 1)
            .is_none()
    );
}

#[test]
fn parse_rejects_wrong_length() {
    assert!(AccessKey::parse("123").is_none());
}

// ── State registrations ──────────────────────────────────────────────────────

/// One published sample registration per jurisdiction.
const REGISTRATIONS: [(&str, &str); 27] = [
    ("AC", "0100482300112"),
    ("AL", "240000048"),
    ("AM", "999999990"),
    ("AP", "030123459"),
    ("BA", "12345663"),
    ("CE", "060000015"),
    ("DF", "0730000100109"),
    ("ES", "999999990"),
    ("GO", "109876547"),
    ("MA", "120000385"),
    ("MG", "0623079040081"),
    ("MS", "280000006"),
    ("MT", "00130000019"),
    ("PA", "159999995"),
    ("PB", "060000015"),
    ("PE", "032141840"),
    ("PI", "012345679"),
    ("PR", "1234567850"),
    ("RJ", "99999993"),
    ("RN", "200400401"),
    ("RO", "00000000625213"),
    ("RR", "240066281"),
    ("RS", "2243658792"),
    ("SC", "251040852"),
    ("SE", "271234563"),
    ("SP", "110042490114"),
    ("TO", "290102278"),
];

#[test]
fn every_jurisdiction_accepts_its_sample() {
    for (uf, ie) in REGISTRATIONS {
        assert_eq!(check_registration(uf, ie), CheckResult::Valid, "{uf} {ie}");
    }
}

#[test]
fn every_jurisdiction_rejects_a_wrong_last_digit() {
    for (uf, ie) in REGISTRATIONS {
        let last = ie.as_bytes()[ie.len() - 1] - b'0';
        let bad = format!("{}{}", &ie[..ie.len() - 1], (last + 1) % 10);
        assert!(
            matches!(check_registration(uf, &bad), CheckResult::Mismatch { .. }),
            "{uf} {bad}"
        );
    }
}

#[test]
fn alternative_layouts() {
    assert!(check_registration("BA", "61234557").is_valid());
    assert!(check_registration("BA", "100000306").is_valid());
    assert!(check_registration("RN", "2000400400").is_valid());
    assert!(check_registration("TO", "29010227836").is_valid());
    assert!(check_registration("AP", "030170011").is_valid());
}

#[test]
fn formatting_characters_are_ignored() {
    assert!(check_registration("SP", "110.042.490.114").is_valid());
    assert!(check_registration("MG", "062.307.904/0081").is_valid());
    assert!(check_registration("PE", "0321418-40").is_valid());
}

#[test]
fn exempt_marker() {
    for uf in ["SP", "RJ", "MG"] {
        assert_eq!(check_registration(uf, EXEMPT), CheckResult::Exempt);
    }
    assert!(CheckResult::Exempt.is_valid());
}

#[test]
fn registration_format_errors() {
    assert!(check_registration("SP", "11004249011").is_invalid_format());
    assert!(check_registration("AL", "250000048").is_invalid_format());
    assert!(check_registration("SP", "11004249011X").is_invalid_format());
    assert!(check_registration("ZZ", "110042490114").is_invalid_format());
    assert!(check_registration("SP", "").is_invalid_format());
}

#[test]
fn scheme_table_is_exposed() {
    let sp = schemes_for("SP").unwrap();
    assert_eq!(sp.len(), 1);
    assert_eq!(sp[0].length, 12);
    assert_eq!(sp[0].checks.len(), 2);
    assert!(schemes_for("EX").is_none());
}

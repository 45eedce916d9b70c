//! Transport-specific checks for CT-e and MDF-e documents.

use rust_decimal::Decimal;

use crate::core::{DocumentCategory, TransportInfo, is_known_jurisdiction};

use super::Check;

/// Modal codes accepted on transport service documents.
pub const SERVICE_MODALS: &[&str] = &["01", "02", "03", "04", "05", "06"];

/// Modal codes accepted on manifests (no pipeline, no multimodal).
pub const MANIFEST_MODALS: &[&str] = &["01", "02", "03", "04"];

/// Modal code must be present and belong to the category's set.
pub fn check_modal(category: DocumentCategory, modal: Option<&str>) -> Check {
    let allowed = match category {
        DocumentCategory::TransportManifest => MANIFEST_MODALS,
        DocumentCategory::TransportService | DocumentCategory::Invoice => SERVICE_MODALS,
    };
    match modal {
        None => Check::Fail("modal code is missing".into()),
        Some(m) if allowed.contains(&m) => Check::Pass,
        Some(m) => Check::Fail(format!(
            "modal code '{m}' is not valid for a {category} (expected one of {})",
            allowed.join(", ")
        )),
    }
}

/// Carrier registration (RNTRC) is 8 digits when present.
pub fn check_carrier_registration(registration: Option<&str>) -> Check {
    match registration {
        None => Check::Pass,
        Some(r) if r.len() == 8 && r.bytes().all(|b| b.is_ascii_digit()) => Check::Pass,
        Some(r) => Check::Fail(format!(
            "carrier registration '{r}' must have exactly 8 digits"
        )),
    }
}

/// Legacy (`ABC1234`, `ABC-1234`) or Mercosul (`ABC1D23`) plate.
pub fn is_valid_plate(plate: &str) -> bool {
    let plate: String = plate
        .trim()
        .chars()
        .filter(|&c| c != '-')
        .map(|c| c.to_ascii_uppercase())
        .collect();
    let b = plate.as_bytes();
    if b.len() != 7 || !b[..3].iter().all(u8::is_ascii_uppercase) {
        return false;
    }
    let legacy = b[3..].iter().all(u8::is_ascii_digit);
    let mercosul = b[3].is_ascii_digit()
        && b[4].is_ascii_uppercase()
        && b[5].is_ascii_digit()
        && b[6].is_ascii_digit();
    legacy || mercosul
}

pub fn check_vehicle_plate(plate: Option<&str>) -> Check {
    match plate {
        None => Check::Pass,
        Some(p) if is_valid_plate(p) => Check::Pass,
        Some(p) => Check::Fail(format!(
            "vehicle plate '{p}' matches neither the legacy nor the Mercosul format"
        )),
    }
}

/// Every route entry must be a known jurisdiction.
pub fn check_route_codes(route: &[String]) -> Check {
    let invalid: Vec<&str> = route
        .iter()
        .map(String::as_str)
        .filter(|uf| !is_known_jurisdiction(uf))
        .collect();
    if invalid.is_empty() {
        Check::Pass
    } else {
        Check::Fail(format!(
            "route contains unknown jurisdictions: {}",
            invalid.join(", ")
        ))
    }
}

/// The same jurisdiction must not appear twice in a row.
pub fn check_route_repeats(route: &[String]) -> Check {
    match route.windows(2).position(|w| w[0] == w[1]) {
        None => Check::Pass,
        Some(i) => Check::Fail(format!(
            "route repeats {} at positions {} and {}",
            route[i],
            i,
            i + 1
        )),
    }
}

/// Cargo weight must be present and strictly positive.
pub fn check_cargo_weight(weight: Option<Decimal>) -> Check {
    match weight {
        None => Check::Fail("cargo weight is missing".into()),
        Some(w) if w > Decimal::ZERO => Check::Pass,
        Some(w) => Check::Fail(format!("cargo weight {w} must be positive")),
    }
}

/// Dangerous cargo requires both the total weight and the dangerous-goods
/// quantity.
pub fn check_dangerous_cargo(info: &TransportInfo) -> Check {
    if !info.dangerous_cargo {
        return Check::Pass;
    }
    let mut missing = Vec::new();
    if info.cargo_weight.is_none() {
        missing.push("cargo_weight");
    }
    if info.dangerous_goods_quantity.is_none() {
        missing.push("dangerous_goods_quantity");
    }
    if missing.is_empty() {
        Check::Pass
    } else {
        Check::Fail(format!(
            "dangerous cargo declared without {}",
            missing.join(" and ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn route(ufs: &[&str]) -> Vec<String> {
        ufs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn modal_sets_differ_by_category() {
        assert!(check_modal(DocumentCategory::TransportService, Some("06")).is_pass());
        assert!(!check_modal(DocumentCategory::TransportManifest, Some("06")).is_pass());
        assert!(check_modal(DocumentCategory::TransportManifest, Some("01")).is_pass());
        assert!(!check_modal(DocumentCategory::TransportService, None).is_pass());
        assert!(!check_modal(DocumentCategory::TransportService, Some("1")).is_pass());
    }

    #[test]
    fn carrier_registration() {
        assert!(check_carrier_registration(None).is_pass());
        assert!(check_carrier_registration(Some("12345678")).is_pass());
        assert!(!check_carrier_registration(Some("1234567")).is_pass());
        assert!(!check_carrier_registration(Some("1234567A")).is_pass());
    }

    #[test]
    fn plates() {
        assert!(is_valid_plate("ABC1234"));
        assert!(is_valid_plate("abc-1234"));
        assert!(is_valid_plate("BRA2E19"));
        assert!(!is_valid_plate("AB12345"));
        assert!(!is_valid_plate("BRA2E1"));
        assert!(!is_valid_plate("BRA2EE9"));
        assert!(!is_valid_plate("ÁBC1234"));
    }

    #[test]
    fn route_checks() {
        assert!(check_route_codes(&route(&["SP", "MG", "BA"])).is_pass());
        assert!(!check_route_codes(&route(&["SP", "XX"])).is_pass());
        assert!(check_route_repeats(&route(&["SP", "MG", "SP"])).is_pass());
        let c = check_route_repeats(&route(&["SP", "MG", "MG"]));
        assert_eq!(c.detail(), Some("route repeats MG at positions 1 and 2"));
    }

    #[test]
    fn cargo_weight() {
        assert!(check_cargo_weight(Some(dec!(1500.5))).is_pass());
        assert!(!check_cargo_weight(Some(dec!(0))).is_pass());
        assert!(!check_cargo_weight(None).is_pass());
    }

    #[test]
    fn dangerous_cargo_requires_weights() {
        let mut info = TransportInfo {
            dangerous_cargo: true,
            cargo_weight: Some(dec!(1000)),
            ..Default::default()
        };
        let c = check_dangerous_cargo(&info);
        assert_eq!(
            c.detail(),
            Some("dangerous cargo declared without dangerous_goods_quantity")
        );
        info.dangerous_goods_quantity = Some(dec!(200));
        assert!(check_dangerous_cargo(&info).is_pass());
        info.dangerous_cargo = false;
        info.cargo_weight = None;
        assert!(check_dangerous_cargo(&info).is_pass());
    }
}
